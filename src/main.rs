//! Tarot Reader - Main Binary
//!
//! Text presenter for tarot readings: list decks and spreads, or run a draw

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tarot_reader::{
    config::ReaderConfig,
    core::{CardId, LayoutPoint, SpreadCatalog},
    flow::ReadingFlow,
    loader::AsyncDeckCatalog,
    logger::{OutputFormat, VerbosityLevel},
    session::{DrawMode, Reading, ToggleOutcome},
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Pick cards yourself (--pick)
    Manual,
    /// Reveal each position in order
    Auto,
    /// Repeat auto rounds (--rounds)
    Continuous,
}

impl From<ModeArg> for DrawMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Manual => DrawMode::Manual,
            ModeArg::Auto => DrawMode::Auto,
            ModeArg::Continuous => DrawMode::Continuous,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Verbosity level (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

#[derive(Parser)]
#[command(name = "tarot")]
#[command(about = "Tarot Reader - draw spreads from tarot decks", long_about = None)]
struct Cli {
    /// Directory containing index.json and data/<id>.json
    #[arg(long, global = true, default_value = "decks")]
    decks_dir: PathBuf,

    /// Output format for readings and log lines
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: FormatArg,

    /// Verbosity level (0=silent, 1=minimal, 2=normal, 3=verbose)
    #[arg(long, global = true, default_value = "normal", short = 'v')]
    verbosity: VerbosityArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available decks
    Decks,

    /// List built-in spreads
    Spreads,

    /// Draw a reading
    Draw {
        /// Deck id (defaults to the universal_waite deck)
        #[arg(long, short = 'd')]
        deck: Option<String>,

        /// Built-in spread key
        #[arg(long, short = 's', default_value = "three-card", conflicts_with = "custom")]
        spread: String,

        /// Use a custom spread with this many cards (1-20)
        #[arg(long, value_name = "COUNT")]
        custom: Option<usize>,

        /// Position labels for a custom spread (comma separated)
        #[arg(long, value_delimiter = ',', requires = "custom")]
        labels: Vec<String>,

        /// Layout for a custom spread, "x,y" points separated by ';'
        #[arg(long, requires = "custom")]
        layout: Option<String>,

        /// Draw method
        #[arg(long, short = 'm', value_enum, default_value = "auto")]
        mode: ModeArg,

        /// Card ids to pick in manual mode (comma separated)
        #[arg(long, value_delimiter = ',')]
        pick: Vec<CardId>,

        /// Number of rounds in continuous mode
        #[arg(long, default_value_t = 1)]
        rounds: u32,

        /// Random seed for a reproducible reading
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ReaderConfig::default().with_decks_dir(cli.decks_dir);
    config.verbosity = cli.verbosity.0;
    config.output_format = cli.format.into();

    match cli.command {
        Commands::Decks => list_decks(&config).await?,
        Commands::Spreads => list_spreads(&config)?,
        Commands::Draw {
            deck,
            spread,
            custom,
            labels,
            layout,
            mode,
            pick,
            rounds,
            seed,
        } => {
            config.seed = seed;
            if let Some(deck) = deck {
                config.default_deck = deck;
            }
            let layout = layout.as_deref().map(parse_layout).transpose()?;
            let spread = match custom {
                Some(count) => SpreadChoice::Custom {
                    count,
                    labels,
                    layout,
                },
                None => SpreadChoice::Builtin(spread),
            };
            run_draw(&config, spread, mode.into(), pick, rounds).await?
        }
    }

    Ok(())
}

enum SpreadChoice {
    Builtin(String),
    Custom {
        count: usize,
        labels: Vec<String>,
        layout: Option<Vec<LayoutPoint>>,
    },
}

async fn list_decks(config: &ReaderConfig) -> anyhow::Result<()> {
    let catalog = AsyncDeckCatalog::new(config.decks_dir.clone());
    let decks = catalog.list_decks().await?;

    match config.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&decks)?),
        OutputFormat::Text => {
            for deck in decks {
                println!("{:<20} {}", deck.id, deck.name);
                if !deck.description.is_empty() {
                    println!("{:<20} {}", "", deck.description);
                }
            }
        }
    }
    Ok(())
}

fn list_spreads(config: &ReaderConfig) -> anyhow::Result<()> {
    let spreads = SpreadCatalog::new().list();

    match config.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&spreads)?),
        OutputFormat::Text => {
            for spread in spreads {
                println!(
                    "{:<14} {} ({} cards): {}",
                    spread.key.as_deref().unwrap_or("custom"),
                    spread.name,
                    spread.count(),
                    spread.positions.join(", ")
                );
            }
        }
    }
    Ok(())
}

async fn run_draw(
    config: &ReaderConfig,
    spread: SpreadChoice,
    mode: DrawMode,
    pick: Vec<CardId>,
    rounds: u32,
) -> anyhow::Result<()> {
    let catalog = AsyncDeckCatalog::new(config.decks_dir.clone());
    let mut flow = ReadingFlow::new(config);

    flow.select_deck(&catalog, &config.default_deck)
        .await
        .with_context(|| format!("could not load deck '{}'", config.default_deck))?;

    match spread {
        SpreadChoice::Builtin(key) => {
            flow.choose_spread(&key)?;
        }
        SpreadChoice::Custom {
            count,
            labels,
            layout,
        } => {
            flow.open_custom_creator()?;
            flow.confirm_custom(count, labels, layout)?;
        }
    }

    flow.choose_mode(mode)?;
    let count = flow.spread().map_or(0, |s| s.count());

    match mode {
        DrawMode::Manual => {
            let picks: Vec<CardId> = if pick.is_empty() {
                flow.session()
                    .map(|s| s.display_order().iter().take(count).copied().collect())
                    .unwrap_or_default()
            } else {
                pick
            };
            for card_id in picks {
                let status = flow.toggle_select(card_id)?;
                if status.outcome == ToggleOutcome::SelectionFull {
                    eprintln!("Selection already has {count} cards, ignoring card {card_id}");
                }
            }
            let reading = flow.confirm()?;
            present(config, &reading)?;
        }
        DrawMode::Auto => {
            for slot in 0..count {
                flow.draw_next(slot)?;
            }
            let reading = flow.confirm()?;
            present(config, &reading)?;
        }
        DrawMode::Continuous => {
            for round in 0..rounds {
                if round > 0 {
                    flow.reset_draw()?;
                }
                for slot in 0..count {
                    flow.draw_next(slot)?;
                }
                let reading = flow.confirm()?;
                present(config, &reading)?;
            }
        }
    }

    Ok(())
}

fn present(config: &ReaderConfig, reading: &Reading) -> anyhow::Result<()> {
    if config.output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string(reading)?);
        return Ok(());
    }

    if reading.mode == DrawMode::Continuous {
        println!("Round {}", reading.round);
    }
    println!("{} / {} ({})", reading.spread_name, reading.deck_name, reading.mode);
    for entry in &reading.entries {
        let keywords = entry.card.keyword_line();
        if keywords.is_empty() {
            println!("  {}. {}: {}", entry.index + 1, entry.position, entry.card);
        } else {
            println!(
                "  {}. {}: {} [{}]",
                entry.index + 1,
                entry.position,
                entry.card,
                keywords
            );
        }
    }
    Ok(())
}

/// Parse "x,y;x,y;..." into layout points
fn parse_layout(text: &str) -> anyhow::Result<Vec<LayoutPoint>> {
    text.split(';')
        .filter(|p| !p.trim().is_empty())
        .map(|point| -> anyhow::Result<LayoutPoint> {
            let Some((x, y)) = point.split_once(',') else {
                bail!("layout point '{point}' must look like x,y");
            };
            let x: f32 = x.trim().parse().with_context(|| format!("bad x in '{point}'"))?;
            let y: f32 = y.trim().parse().with_context(|| format!("bad y in '{point}'"))?;
            Ok(LayoutPoint::new(x, y))
        })
        .collect()
}
