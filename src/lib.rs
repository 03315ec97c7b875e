//! Tarot Reader - deck loading, spreads, and draw sessions
//!
//! Pick a deck, a spread, and a draw method, then fill the spread's
//! positions one card at a time. Presentation (rendering, animation,
//! layout editing) is left to whatever consumes a finalized `Reading`.

pub mod config;
pub mod core;
pub mod error;
pub mod flow;
pub mod loader;
pub mod logger;
pub mod pool;
pub mod session;
pub mod shuffle;

pub use error::{Result, TarotError};
