//! Deck file loader (JSON format)
//!
//! A deck file looks like:
//!
//! ```json
//! {
//!   "deckInfo": { "name": "Universal Waite", "imagePath": "assets/images/uw/", "backImage": "back.jpg" },
//!   "cards": [ { "id": 0, "name": "The Fool", "keywords": ["beginnings"], "image": "00.jpg" } ]
//! }
//! ```

use crate::core::{Card, CardId, Deck, DeckInfo};
use crate::{Result, TarotError};
use serde::Deserialize;
use smallvec::SmallVec;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDeckInfo {
    name: Option<String>,
    image_path: Option<String>,
    back_image: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCard {
    id: Option<u32>,
    name: Option<String>,
    #[serde(default)]
    keywords: SmallVec<[String; 4]>,
    image: Option<String>,
    description: Option<String>,
    glyph: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDeck {
    deck_info: Option<RawDeckInfo>,
    cards: Option<Vec<RawCard>>,
}

/// Loader for JSON deck files
pub struct DeckLoader;

impl DeckLoader {
    /// Load a deck from a file; `id` becomes the deck's identifier
    pub fn load_from_file(id: &str, path: &Path) -> Result<Deck> {
        let content = fs::read_to_string(path).map_err(TarotError::IoError)?;
        Self::parse(id, &content)
    }

    /// Parse and validate a deck from JSON text
    pub fn parse(id: &str, content: &str) -> Result<Deck> {
        let raw: RawDeck = serde_json::from_str(content)
            .map_err(|e| TarotError::DeckMalformed(format!("deck '{id}': {e}")))?;

        let missing =
            |field: &str| TarotError::DeckMalformed(format!("deck '{id}': missing {field}"));

        let raw_info = raw.deck_info.ok_or_else(|| missing("deckInfo"))?;
        let info = DeckInfo {
            name: raw_info.name.ok_or_else(|| missing("deckInfo.name"))?,
            image_path: raw_info.image_path.ok_or_else(|| missing("deckInfo.imagePath"))?,
            back_image: raw_info.back_image.ok_or_else(|| missing("deckInfo.backImage"))?,
            description: raw_info.description,
        };

        let raw_cards = raw.cards.ok_or_else(|| missing("cards"))?;
        let cards = raw_cards
            .into_iter()
            .enumerate()
            .map(|(pos, raw)| -> Result<Card> {
                let card_id = raw
                    .id
                    .ok_or_else(|| missing(&format!("id of card #{pos}")))?;
                let name = raw
                    .name
                    .ok_or_else(|| missing(&format!("name of card {card_id}")))?;
                Ok(Card {
                    id: CardId::new(card_id),
                    name,
                    keywords: raw.keywords,
                    image: raw.image,
                    description: raw.description,
                    glyph: raw.glyph,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Deck::new(id, info, cards)
    }
}
