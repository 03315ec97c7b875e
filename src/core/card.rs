//! Card identifiers and definitions

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Stable card identifier, unique within a deck
///
/// Decks number their cards themselves (the deck files use plain integers),
/// so the id survives reshuffles and is what selections are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(u32);

impl CardId {
    pub fn new(id: u32) -> Self {
        CardId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CardId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(CardId)
    }
}

/// A single card of a deck
///
/// Immutable once loaded. Image references are relative to the owning
/// deck's image base path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,

    /// Display name (e.g., "The Fool")
    pub name: String,

    /// Keywords in the order the deck lists them
    #[serde(default)]
    pub keywords: SmallVec<[String; 4]>,

    /// Face image, relative to the deck's image path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Symbol shown when no image is available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyph: Option<String>,
}

impl Card {
    pub fn new(id: CardId, name: impl Into<String>) -> Self {
        Card {
            id,
            name: name.into(),
            keywords: SmallVec::new(),
            image: None,
            description: None,
            glyph: None,
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_glyph(mut self, glyph: impl Into<String>) -> Self {
        self.glyph = Some(glyph.into());
        self
    }

    /// Keywords joined for display ("new beginnings, innocence")
    pub fn keyword_line(&self) -> String {
        self.keywords.join(", ")
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.glyph {
            Some(glyph) => write!(f, "{glyph} {}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
