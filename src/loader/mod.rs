//! Deck loaders
//!
//! Parser for JSON deck files plus sync and async catalogs over a deck directory

pub mod catalog;
pub mod catalog_async;
pub mod deck;

pub use catalog::{DeckCatalog, DeckSummary};
pub use catalog_async::AsyncDeckCatalog;
pub use deck::DeckLoader;
