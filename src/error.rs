//! Error types for the tarot reader

use crate::core::CardId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TarotError {
    #[error("Deck catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Deck not found: {0}")]
    DeckNotFound(String),

    #[error("Malformed deck data: {0}")]
    DeckMalformed(String),

    #[error("Unknown spread: {0}")]
    UnknownSpread(String),

    #[error("Invalid card count {count} (must be between 1 and {max})")]
    InvalidCardCount { count: usize, max: usize },

    #[error("Slot {slot} cannot be drawn now (next open slot: {expected:?})")]
    OutOfOrderDraw {
        slot: usize,
        expected: Option<usize>,
    },

    #[error("No cards left in the pool to fill slot {slot}")]
    PoolExhausted { slot: usize },

    #[error("Selection incomplete: {have} of {need} cards chosen")]
    IncompleteSelection { have: usize, need: usize },

    #[error("Card {0} is not part of this deck")]
    UnknownCard(CardId),

    #[error("Operation '{operation}' is not available in {mode} mode")]
    ModeMismatch {
        operation: &'static str,
        mode: &'static str,
    },

    #[error("Draw session has not been started")]
    SessionNotStarted,

    #[error("Layout has {actual} points but the spread has {expected} positions")]
    LayoutMismatch { expected: usize, actual: usize },

    #[error("Cannot {action} from the {step} step")]
    InvalidStep { action: &'static str, step: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, TarotError>;
