//! Runtime configuration for a reader

use crate::logger::{OutputFormat, VerbosityLevel};
use std::path::PathBuf;

/// Deck preloaded when nothing else is requested
pub const DEFAULT_DECK: &str = "universal_waite";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Directory holding `index.json` and `data/<id>.json`
    pub decks_dir: PathBuf,
    pub default_deck: String,
    /// Fixed seed for reproducible shuffles; entropy when `None`
    pub seed: Option<u64>,
    pub verbosity: VerbosityLevel,
    pub output_format: OutputFormat,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            decks_dir: PathBuf::from("decks"),
            default_deck: DEFAULT_DECK.to_string(),
            seed: None,
            verbosity: VerbosityLevel::default(),
            output_format: OutputFormat::default(),
        }
    }
}

impl ReaderConfig {
    pub fn with_decks_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.decks_dir = dir.into();
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}
