//! Reading flow: the screen-level state machine around a draw session
//!
//! ```text
//! DeckSelection -> SpreadSelection -> (CustomSpreadCreator) -> DrawMethod
//!               -> Drawing(mode) -> Result
//! ```
//!
//! The flow owns the bound deck, the chosen spread, the live session, the
//! continuous-mode history, and the logger. Navigating back discards the
//! session; only `restart` zeroes the continuous round counter.

use crate::config::ReaderConfig;
use crate::core::{CardId, Deck, LayoutPoint, Spread, SpreadCatalog, SpreadSpec};
use crate::loader::AsyncDeckCatalog;
use crate::logger::ReadingLogger;
use crate::session::{DrawMode, DrawSession, Reading, SelectionStatus, SlotDraw, ToggleOutcome};
use crate::shuffle::DrawRng;
use crate::{Result, TarotError};
use rand::RngCore;
use std::fmt;
use std::sync::Arc;

/// Screen the reader is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    DeckSelection,
    SpreadSelection,
    CustomSpreadCreator,
    DrawMethod,
    Drawing(DrawMode),
    Result,
}

impl Step {
    fn order(&self) -> u8 {
        match self {
            Step::DeckSelection => 0,
            Step::SpreadSelection => 1,
            Step::CustomSpreadCreator => 2,
            Step::DrawMethod => 3,
            Step::Drawing(_) => 4,
            Step::Result => 5,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::DeckSelection => f.write_str("deck selection"),
            Step::SpreadSelection => f.write_str("spread selection"),
            Step::CustomSpreadCreator => f.write_str("custom spread creator"),
            Step::DrawMethod => f.write_str("draw method"),
            Step::Drawing(mode) => write!(f, "{mode} drawing"),
            Step::Result => f.write_str("result"),
        }
    }
}

pub struct ReadingFlow {
    step: Step,
    deck: Option<Arc<Deck>>,
    spread: Option<Spread>,
    session: Option<DrawSession>,
    spreads: SpreadCatalog,
    /// Seeds each new session's shuffle engine
    rng: DrawRng,
    /// Continuous rounds drawn since the last restart
    round: u32,
    /// Continuous-mode readings, oldest first
    history: Vec<Reading>,
    /// Set once the current continuous round is in `history`
    round_recorded: bool,
    last_reading: Option<Reading>,
    logger: ReadingLogger,
}

impl ReadingFlow {
    pub fn new(config: &ReaderConfig) -> Self {
        let mut logger = ReadingLogger::with_verbosity(config.verbosity);
        logger.set_output_format(config.output_format);

        ReadingFlow {
            step: Step::DeckSelection,
            deck: None,
            spread: None,
            session: None,
            spreads: SpreadCatalog::new(),
            rng: DrawRng::from_optional_seed(config.seed),
            round: 0,
            history: Vec::new(),
            round_recorded: false,
            last_reading: None,
            logger,
        }
    }

    /// Replace the logger (e.g., with a capturing one)
    pub fn with_logger(mut self, logger: ReadingLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn deck(&self) -> Option<&Arc<Deck>> {
        self.deck.as_ref()
    }

    pub fn spread(&self) -> Option<&Spread> {
        self.spread.as_ref()
    }

    pub fn session(&self) -> Option<&DrawSession> {
        self.session.as_ref()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn history(&self) -> &[Reading] {
        &self.history
    }

    pub fn last_reading(&self) -> Option<&Reading> {
        self.last_reading.as_ref()
    }

    pub fn logger(&self) -> &ReadingLogger {
        &self.logger
    }

    pub fn spreads(&self) -> &SpreadCatalog {
        &self.spreads
    }

    /// Bind an already-loaded deck and move on to spread selection
    pub fn bind_deck(&mut self, deck: Arc<Deck>) -> Result<()> {
        self.require_step(Step::DeckSelection, "bind a deck")?;
        self.logger.normal(
            "deck",
            &format!("Loaded deck '{}' ({} cards)", deck.name(), deck.len()),
        );
        self.deck = Some(deck);
        self.step = Step::SpreadSelection;
        Ok(())
    }

    /// Load a deck from the catalog and bind it
    ///
    /// The flow stays on deck selection if the load fails.
    pub async fn select_deck(&mut self, catalog: &AsyncDeckCatalog, id: &str) -> Result<()> {
        self.require_step(Step::DeckSelection, "select a deck")?;
        match catalog.load_deck(id).await {
            Ok(deck) => self.bind_deck(deck),
            Err(e) => {
                self.logger
                    .verbose("deck", &format!("Failed to load deck '{id}': {e}"));
                Err(e)
            }
        }
    }

    pub fn choose_spread(&mut self, key: &str) -> Result<&Spread> {
        self.require_step(Step::SpreadSelection, "choose a spread")?;
        let spread = self.spreads.get(key)?;
        Ok(self.set_spread(spread))
    }

    pub fn open_custom_creator(&mut self) -> Result<()> {
        self.require_step(Step::SpreadSelection, "open the custom spread creator")?;
        self.step = Step::CustomSpreadCreator;
        Ok(())
    }

    /// Confirm a custom spread from the creator screen
    pub fn confirm_custom(
        &mut self,
        count: usize,
        labels: Vec<String>,
        layout: Option<Vec<LayoutPoint>>,
    ) -> Result<&Spread> {
        self.require_step(Step::CustomSpreadCreator, "confirm a custom spread")?;
        let spread = self.spreads.resolve(&SpreadSpec::Custom {
            count,
            labels,
            layout,
        })?;
        Ok(self.set_spread(spread))
    }

    /// Create and start a session for `mode`
    pub fn choose_mode(&mut self, mode: DrawMode) -> Result<()> {
        self.require_step(Step::DrawMethod, "choose a draw method")?;
        let (Some(deck), Some(spread)) = (self.deck.clone(), self.spread.clone()) else {
            return Err(TarotError::InvalidStep {
                action: "choose a draw method",
                step: self.step.to_string(),
            });
        };

        let rng = DrawRng::from_seed(self.rng.next_u64());
        let mut session = DrawSession::new(deck, spread, mode, rng);
        if mode == DrawMode::Continuous {
            session = session.with_round(self.round);
        }
        session.start();
        if mode == DrawMode::Continuous {
            self.round = session.round();
        }
        self.log_start(&session);

        self.session = Some(session);
        self.round_recorded = false;
        self.step = Step::Drawing(mode);
        Ok(())
    }

    pub fn toggle_select(&mut self, card_id: CardId) -> Result<SelectionStatus> {
        let status = self.drawing_session("select a card")?.toggle_select(card_id)?;
        match status.outcome {
            ToggleOutcome::Selected => self.logger.normal(
                "select",
                &format!("Selected card {card_id} ({} chosen)", status.count),
            ),
            ToggleOutcome::Deselected => self.logger.normal(
                "select",
                &format!("Deselected card {card_id} ({} chosen)", status.count),
            ),
            ToggleOutcome::SelectionFull => self
                .logger
                .verbose("select", &format!("Selection full, ignored card {card_id}")),
        }
        Ok(status)
    }

    pub fn reshuffle_display(&mut self) -> Result<()> {
        self.drawing_session("reshuffle the display")?
            .reshuffle_display()?;
        self.logger.verbose("shuffle", "Reshuffled displayed cards");
        Ok(())
    }

    pub fn draw_next(&mut self, slot: usize) -> Result<SlotDraw> {
        let result = self.drawing_session("draw a card")?.draw_next(slot);
        match &result {
            Ok(draw) => self.logger.normal(
                "draw",
                &format!("Slot {}: {}", draw.slot + 1, draw.card.name),
            ),
            Err(e) => self.logger.verbose("draw", &format!("Draw rejected: {e}")),
        }
        result
    }

    /// Finalize the current session
    ///
    /// Manual/auto readings move the flow to the result step. Continuous
    /// readings are appended to the history and the flow stays on the
    /// drawing step, ready for `reset_draw`. A continuous round can only
    /// be confirmed once.
    pub fn confirm(&mut self) -> Result<Reading> {
        if self.round_recorded {
            return Err(TarotError::InvalidStep {
                action: "confirm an already recorded round",
                step: self.step.to_string(),
            });
        }
        let reading = self.drawing_session("confirm the reading")?.finalize()?;
        self.logger.minimal(
            "reading",
            &format!(
                "{} reading complete ({} cards)",
                reading.spread_name,
                reading.len()
            ),
        );

        if reading.mode == DrawMode::Continuous {
            self.history.push(reading.clone());
            self.round_recorded = true;
        } else {
            self.last_reading = Some(reading.clone());
            self.step = Step::Result;
        }
        Ok(reading)
    }

    /// Reshuffle and start over in the same mode (a new round in continuous mode)
    pub fn reset_draw(&mut self) -> Result<()> {
        let session = self.drawing_session("reset the draw")?;
        session.reset();
        let (mode, round) = (session.mode(), session.round());
        if mode == DrawMode::Continuous {
            self.round = round;
        }
        self.round_recorded = false;
        if let Some(session) = &self.session {
            self.log_start(session);
        }
        Ok(())
    }

    /// Navigate back to an earlier step, discarding what came after it
    pub fn back(&mut self, target: Step) -> Result<()> {
        let reachable = target.order() < self.step.order()
            && !matches!(target, Step::Drawing(_) | Step::Result);
        if !reachable {
            return Err(TarotError::InvalidStep {
                action: "go back",
                step: self.step.to_string(),
            });
        }

        self.session = None;
        self.round_recorded = false;
        self.last_reading = None;
        match target {
            Step::DeckSelection => {
                self.deck = None;
                self.spread = None;
            }
            Step::SpreadSelection | Step::CustomSpreadCreator => self.spread = None,
            _ => {}
        }

        self.logger
            .verbose("flow", &format!("Back from {} to {target}", self.step));
        self.step = target;
        Ok(())
    }

    /// Full restart: forget the deck, spread, session, history, and round count
    pub fn restart(&mut self) {
        self.step = Step::DeckSelection;
        self.deck = None;
        self.spread = None;
        self.session = None;
        self.round = 0;
        self.history.clear();
        self.round_recorded = false;
        self.last_reading = None;
        self.logger.normal("flow", "Restarted");
    }

    fn set_spread(&mut self, spread: Spread) -> &Spread {
        self.logger.normal(
            "spread",
            &format!("Spread '{}' ({} cards)", spread.name, spread.count()),
        );
        self.session = None;
        self.step = Step::DrawMethod;
        self.spread.insert(spread)
    }

    fn log_start(&self, session: &DrawSession) {
        let message = match session.mode() {
            DrawMode::Manual => format!(
                "Laid out {} cards, choose {}",
                session.display_order().len(),
                session.spread().count()
            ),
            DrawMode::Auto => format!("Shuffled {} cards", session.remaining().len()),
            DrawMode::Continuous => format!(
                "Round {}: shuffled {} cards",
                session.round(),
                session.remaining().len()
            ),
        };
        self.logger.normal("shuffle", &message);
    }

    fn drawing_session(&mut self, action: &'static str) -> Result<&mut DrawSession> {
        match (self.step, self.session.as_mut()) {
            (Step::Drawing(_), Some(session)) => Ok(session),
            (step, _) => Err(TarotError::InvalidStep {
                action,
                step: step.to_string(),
            }),
        }
    }

    fn require_step(&self, expected: Step, action: &'static str) -> Result<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(TarotError::InvalidStep {
                action,
                step: self.step.to_string(),
            })
        }
    }
}
