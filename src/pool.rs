//! Ordered card pools
//!
//! The draw pool of auto/continuous sessions and the visual order of a
//! manual session are both ordered lists of card ids. The "top" of a pool
//! is its tail, matching how cards are popped off a shuffled deck.

use crate::core::CardId;
use crate::shuffle::ShuffleEngine;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPool {
    cards: Vec<CardId>,
}

impl CardPool {
    pub fn new() -> Self {
        CardPool { cards: Vec::new() }
    }

    pub fn from_ids(cards: Vec<CardId>) -> Self {
        CardPool { cards }
    }

    /// Fresh pool holding a shuffled copy of `ids`
    pub fn shuffled(ids: &[CardId], engine: &mut ShuffleEngine) -> Self {
        CardPool {
            cards: engine.shuffle(ids),
        }
    }

    /// Remove and return the top card
    pub fn draw_top(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    /// Look at the top card without removing it
    pub fn peek_top(&self) -> Option<CardId> {
        self.cards.last().copied()
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.cards.contains(&card_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn as_slice(&self) -> &[CardId] {
        &self.cards
    }

    /// Reorder in place (for display pools)
    pub fn reshuffle(&mut self, engine: &mut ShuffleEngine) {
        self.cards = engine.shuffle(&self.cards);
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}
