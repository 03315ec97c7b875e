//! Draw session state machine
//!
//! A `DrawSession` binds one deck, one spread, and one draw mode, and walks
//! `ModeChosen -> InProgress -> Complete`:
//!
//! - **Manual**: the user toggles cards by id out of a separately shuffled
//!   display order; chosen cards map onto positions in the order they were
//!   added.
//! - **Auto**: slots are filled strictly left to right, each by popping the
//!   tail of a pool shuffled at `start`.
//! - **Continuous**: like Auto, but every `start`/`reset` opens a new round
//!   and bumps the round counter.
//!
//! Invariants: at most `spread.count()` cards are selected or allocated, no
//! card id appears twice, and a card popped from the pool never returns to
//! it within the same shuffle. Every failing operation leaves the session
//! exactly as it was.

use crate::core::{Card, CardId, Deck, LayoutPoint, Spread};
use crate::pool::CardPool;
use crate::shuffle::{DrawRng, ShuffleEngine};
use crate::{Result, TarotError};
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use std::fmt;
use std::sync::Arc;

/// How the cards of a spread get chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    /// Free pick from the visible pool
    Manual,
    /// Sequential reveal by slot
    Auto,
    /// Repeatable auto rounds
    Continuous,
}

impl DrawMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrawMode::Manual => "manual",
            DrawMode::Auto => "auto",
            DrawMode::Continuous => "continuous",
        }
    }

    /// Whether cards are allocated by popping the shuffled pool
    pub fn draws_from_pool(&self) -> bool {
        !matches!(self, DrawMode::Manual)
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DrawMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(DrawMode::Manual),
            "auto" => Ok(DrawMode::Auto),
            "continuous" => Ok(DrawMode::Continuous),
            _ => Err(format!(
                "invalid draw mode '{s}' (expected: manual, auto, continuous)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Deck, spread, and mode are bound but nothing is shuffled yet
    ModeChosen,
    InProgress,
    /// Every position has a card; `finalize` will succeed
    Complete,
}

/// What a manual toggle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected,
    Deselected,
    /// Selection was already at capacity; nothing changed
    SelectionFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionStatus {
    pub outcome: ToggleOutcome,
    pub count: usize,
    /// True when exactly `spread.count()` cards are selected
    pub full: bool,
}

/// Result of filling one auto/continuous slot
#[derive(Debug, Clone, PartialEq)]
pub struct SlotDraw {
    pub slot: usize,
    pub card: Card,
    /// True when this draw filled the last open slot
    pub complete: bool,
}

/// One position of a finalized reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingEntry {
    pub index: usize,
    pub position: String,
    pub card: Card,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutPoint>,
}

/// A finalized draw, ready for a presenter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub deck_id: String,
    pub deck_name: String,
    pub spread_name: String,
    pub mode: DrawMode,
    pub round: u32,
    pub entries: Vec<ReadingEntry>,
}

impl Reading {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (position label, card) pairs in position order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &Card)> {
        self.entries.iter().map(|e| (e.position.as_str(), &e.card))
    }
}

/// The mutable state of one reading
#[derive(Debug, Clone)]
pub struct DrawSession {
    deck: Arc<Deck>,
    spread: Spread,
    mode: DrawMode,
    engine: ShuffleEngine,
    started: bool,

    /// Allocation pool; shuffled for auto/continuous, deck order for manual
    pool: CardPool,

    /// Manual mode only: the order cards are shown in
    display: CardPool,

    /// Manual mode: chosen ids in the order they were added
    selected: SmallVec<[CardId; 10]>,

    /// Auto/continuous mode: one entry per spread position
    slots: SmallVec<[Option<CardId>; 10]>,

    round: u32,
}

impl DrawSession {
    /// Bind a deck, spread, and mode; call `start` before drawing
    pub fn new(deck: Arc<Deck>, spread: Spread, mode: DrawMode, rng: DrawRng) -> Self {
        DrawSession {
            deck,
            spread,
            mode,
            engine: ShuffleEngine::new(rng),
            started: false,
            pool: CardPool::new(),
            display: CardPool::new(),
            selected: SmallVec::new(),
            slots: SmallVec::new(),
            round: 0,
        }
    }

    /// Carry a continuous-round count over from an earlier session
    pub fn with_round(mut self, round: u32) -> Self {
        self.round = round;
        self
    }

    /// Shuffle and clear all selection/allocation state
    ///
    /// In continuous mode every call opens a new round.
    pub fn start(&mut self) {
        let ids = self.deck.card_ids();
        match self.mode {
            DrawMode::Manual => {
                self.pool = CardPool::from_ids(ids);
                self.display = CardPool::shuffled(self.pool.as_slice(), &mut self.engine);
            }
            DrawMode::Auto | DrawMode::Continuous => {
                self.pool = CardPool::shuffled(&ids, &mut self.engine);
                self.display.clear();
            }
        }

        self.selected.clear();
        self.slots = smallvec![None; self.spread.count()];
        if self.mode == DrawMode::Continuous {
            self.round += 1;
        }
        self.started = true;
    }

    /// Re-enter the mode's initial state (a new round in continuous mode)
    pub fn reset(&mut self) {
        self.start();
    }

    /// Manual mode: select `card_id`, or deselect it if already chosen
    ///
    /// Selecting past capacity is not an error; it reports `SelectionFull`
    /// and leaves the selection alone.
    pub fn toggle_select(&mut self, card_id: CardId) -> Result<SelectionStatus> {
        self.require_started()?;
        self.require_mode(DrawMode::Manual, "toggle_select")?;
        if !self.deck.contains(card_id) {
            return Err(TarotError::UnknownCard(card_id));
        }

        let outcome = if let Some(pos) = self.selected.iter().position(|&id| id == card_id) {
            self.selected.remove(pos);
            ToggleOutcome::Deselected
        } else if self.selected.len() < self.spread.count() {
            self.selected.push(card_id);
            ToggleOutcome::Selected
        } else {
            ToggleOutcome::SelectionFull
        };

        Ok(SelectionStatus {
            outcome,
            count: self.selected.len(),
            full: self.is_full(),
        })
    }

    /// Manual mode: reorder the displayed cards without touching the selection
    pub fn reshuffle_display(&mut self) -> Result<()> {
        self.require_started()?;
        self.require_mode(DrawMode::Manual, "reshuffle_display")?;
        self.display.reshuffle(&mut self.engine);
        Ok(())
    }

    /// Auto/continuous mode: fill `slot` with the top card of the pool
    ///
    /// Only the lowest open slot may be drawn; a repeated or skipped slot is
    /// rejected with `OutOfOrderDraw`.
    pub fn draw_next(&mut self, slot: usize) -> Result<SlotDraw> {
        self.require_started()?;
        if !self.mode.draws_from_pool() {
            return Err(TarotError::ModeMismatch {
                operation: "draw_next",
                mode: self.mode.as_str(),
            });
        }

        let expected = self.next_slot();
        if expected != Some(slot) {
            return Err(TarotError::OutOfOrderDraw { slot, expected });
        }

        let card_id = self
            .pool
            .peek_top()
            .ok_or(TarotError::PoolExhausted { slot })?;
        let card = self
            .deck
            .card(card_id)
            .cloned()
            .ok_or(TarotError::UnknownCard(card_id))?;

        self.pool.draw_top();
        self.slots[slot] = Some(card_id);

        Ok(SlotDraw {
            slot,
            card,
            complete: self.is_full(),
        })
    }

    /// Pair every position with its card
    ///
    /// Fails with `IncompleteSelection` until every position is filled.
    pub fn finalize(&self) -> Result<Reading> {
        self.require_started()?;
        let need = self.spread.count();
        let have = self.filled();
        if have != need {
            return Err(TarotError::IncompleteSelection { have, need });
        }

        let ids: Vec<CardId> = match self.mode {
            DrawMode::Manual => self.selected.to_vec(),
            DrawMode::Auto | DrawMode::Continuous => self.slots.iter().flatten().copied().collect(),
        };

        let entries = ids
            .into_iter()
            .zip(self.spread.positions.iter())
            .enumerate()
            .map(|(index, (card_id, position))| -> Result<ReadingEntry> {
                let card = self
                    .deck
                    .card(card_id)
                    .cloned()
                    .ok_or(TarotError::UnknownCard(card_id))?;
                Ok(ReadingEntry {
                    index,
                    position: position.clone(),
                    card,
                    layout: self.spread.layout_point(index),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Reading {
            deck_id: self.deck.id.clone(),
            deck_name: self.deck.name().to_string(),
            spread_name: self.spread.name.clone(),
            mode: self.mode,
            round: self.round,
            entries,
        })
    }

    pub fn phase(&self) -> SessionPhase {
        if !self.started {
            SessionPhase::ModeChosen
        } else if self.is_full() {
            SessionPhase::Complete
        } else {
            SessionPhase::InProgress
        }
    }

    /// Number of positions holding a card
    pub fn filled(&self) -> usize {
        match self.mode {
            DrawMode::Manual => self.selected.len(),
            DrawMode::Auto | DrawMode::Continuous => {
                self.slots.iter().filter(|s| s.is_some()).count()
            }
        }
    }

    pub fn is_full(&self) -> bool {
        self.started && self.filled() == self.spread.count()
    }

    /// Lowest slot still waiting for a card (auto/continuous)
    pub fn next_slot(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    pub fn deck(&self) -> &Arc<Deck> {
        &self.deck
    }

    pub fn spread(&self) -> &Spread {
        &self.spread
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn selected(&self) -> &[CardId] {
        &self.selected
    }

    pub fn is_selected(&self, card_id: CardId) -> bool {
        self.selected.contains(&card_id)
    }

    pub fn slots(&self) -> &[Option<CardId>] {
        &self.slots
    }

    /// Cards left in the allocation pool
    pub fn remaining(&self) -> &[CardId] {
        self.pool.as_slice()
    }

    /// Manual mode: card ids in the order they are shown
    pub fn display_order(&self) -> &[CardId] {
        self.display.as_slice()
    }

    fn require_started(&self) -> Result<()> {
        if self.started {
            Ok(())
        } else {
            Err(TarotError::SessionNotStarted)
        }
    }

    fn require_mode(&self, mode: DrawMode, operation: &'static str) -> Result<()> {
        if self.mode == mode {
            Ok(())
        } else {
            Err(TarotError::ModeMismatch {
                operation,
                mode: self.mode.as_str(),
            })
        }
    }
}
