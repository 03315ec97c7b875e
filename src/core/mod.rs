//! Core tarot types: cards, decks, and spreads

pub mod card;
pub mod deck;
pub mod spread;

pub use card::{Card, CardId};
pub use deck::{Deck, DeckInfo};
pub use spread::{
    LayoutPoint, Spread, SpreadCatalog, SpreadSpec, CUSTOM_SPREAD_NAME, MAX_CUSTOM_CARDS,
};
