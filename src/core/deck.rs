//! Deck of cards with identifier lookup

use crate::core::{Card, CardId};
use crate::{Result, TarotError};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Deck-wide metadata shared by every card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckInfo {
    pub name: String,
    /// Base path prepended to every image reference
    pub image_path: String,
    /// Back-face image, relative to `image_path`
    pub back_image: String,
    pub description: Option<String>,
}

/// A fully-loaded, validated deck
///
/// Card ids are unique within the deck; `Deck::new` refuses anything else.
/// Decks are immutable after construction and shared behind `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deck {
    pub id: String,
    pub info: DeckInfo,
    pub cards: Vec<Card>,
    #[serde(skip)]
    index: FxHashMap<CardId, usize>,
}

impl Deck {
    pub fn new(id: impl Into<String>, info: DeckInfo, cards: Vec<Card>) -> Result<Self> {
        let id = id.into();
        if cards.is_empty() {
            return Err(TarotError::DeckMalformed(format!("deck '{id}' has no cards")));
        }

        let mut index = FxHashMap::default();
        for (pos, card) in cards.iter().enumerate() {
            if index.insert(card.id, pos).is_some() {
                return Err(TarotError::DeckMalformed(format!(
                    "deck '{id}' contains card id {} more than once",
                    card.id
                )));
            }
        }

        Ok(Deck {
            id,
            info,
            cards,
            index,
        })
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Look up a card by its stable id
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.index.get(&id).map(|&pos| &self.cards[pos])
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.index.contains_key(&id)
    }

    /// Card ids in deck order
    pub fn card_ids(&self) -> Vec<CardId> {
        self.cards.iter().map(|c| c.id).collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Full image path for a card's face, if it has one
    pub fn image_url(&self, card: &Card) -> Option<String> {
        card.image
            .as_ref()
            .map(|image| format!("{}{}", self.info.image_path, image))
    }

    pub fn back_image_url(&self) -> String {
        format!("{}{}", self.info.image_path, self.info.back_image)
    }
}
