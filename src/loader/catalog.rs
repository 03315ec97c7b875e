//! Directory-backed deck catalog
//!
//! Layout under the catalog root:
//!
//! ```text
//! decks/
//!   index.json          {"decks": [{"id", "name", "description"}]}
//!   data/<id>.json      one deck file per id
//! ```

use crate::core::Deck;
use crate::loader::DeckLoader;
use crate::{Result, TarotError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Menu entry for a selectable deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct DeckIndex {
    decks: Vec<DeckSummary>,
}

/// Normalize a deck id for the filesystem
///
/// "Universal Waite" -> "universal_waite", "Thoth-Crowley" -> "thoth_crowley".
/// Non-ASCII names are transliterated. Returns `None` for ids that could
/// escape the data directory or normalize to nothing.
pub fn normalize_deck_id(id: &str) -> Option<String> {
    let normalized: String = deunicode::deunicode(id.trim())
        .to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            _ => c,
        })
        .collect();

    let unsafe_id = normalized.is_empty()
        || normalized.contains("..")
        || normalized.contains('/')
        || normalized.contains('\\');
    if unsafe_id {
        None
    } else {
        Some(normalized)
    }
}

/// Path of the deck file for an already-normalized id
pub(crate) fn deck_file_path(root: &Path, key: &str) -> PathBuf {
    root.join("data").join(format!("{key}.json"))
}

pub(crate) fn index_path(root: &Path) -> PathBuf {
    root.join("index.json")
}

pub(crate) fn parse_index(content: &str) -> Result<Vec<DeckSummary>> {
    serde_json::from_str::<DeckIndex>(content)
        .map(|index| index.decks)
        .map_err(|e| TarotError::CatalogUnavailable(format!("malformed deck index: {e}")))
}

/// Synchronous deck catalog reading straight from disk (no caching)
pub struct DeckCatalog {
    root: PathBuf,
}

impl DeckCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DeckCatalog { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the deck menu
    pub fn list_decks(&self) -> Result<Vec<DeckSummary>> {
        let path = index_path(&self.root);
        let content = fs::read_to_string(&path).map_err(|e| {
            TarotError::CatalogUnavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        parse_index(&content)
    }

    /// Load and validate one deck
    pub fn load_deck(&self, id: &str) -> Result<Deck> {
        let key = normalize_deck_id(id).ok_or_else(|| TarotError::DeckNotFound(id.to_string()))?;
        let path = deck_file_path(&self.root, &key);
        if !path.exists() {
            return Err(TarotError::DeckNotFound(id.to_string()));
        }

        DeckLoader::load_from_file(&key, &path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decks_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("decks")
    }

    #[test]
    fn test_normalize_deck_id() {
        assert_eq!(
            normalize_deck_id("Universal Waite").as_deref(),
            Some("universal_waite")
        );
        assert_eq!(
            normalize_deck_id("Thoth-Crowley").as_deref(),
            Some("thoth_crowley")
        );
        assert_eq!(
            normalize_deck_id("Tarot de Marseille Ñ").as_deref(),
            Some("tarot_de_marseille_n")
        );
        assert_eq!(normalize_deck_id("../secrets"), None);
        assert_eq!(normalize_deck_id("a/b"), None);
        assert_eq!(normalize_deck_id("   "), None);
    }

    #[test]
    fn test_deck_file_path() {
        let key = normalize_deck_id("Major Arcana").unwrap();
        let path = deck_file_path(Path::new("decks"), &key);
        assert_eq!(path, PathBuf::from("decks/data/major_arcana.json"));
    }

    #[test]
    fn test_list_and_load() {
        let catalog = DeckCatalog::new(decks_dir());
        let decks = catalog.list_decks().unwrap();
        assert!(decks.iter().any(|d| d.id == "universal_waite"));

        let deck = catalog.load_deck("universal_waite").unwrap();
        assert_eq!(deck.len(), 78);
    }

    #[test]
    fn test_load_uses_normalized_id() {
        let catalog = DeckCatalog::new(decks_dir());
        let deck = catalog.load_deck("Major Arcana").unwrap();
        assert_eq!(deck.id, "major_arcana");
        assert_eq!(deck.len(), 22);
    }

    #[test]
    fn test_unknown_deck() {
        let catalog = DeckCatalog::new(decks_dir());
        assert!(matches!(
            catalog.load_deck("no_such_deck"),
            Err(TarotError::DeckNotFound(_))
        ));
        assert!(matches!(
            catalog.load_deck("../index"),
            Err(TarotError::DeckNotFound(_))
        ));
    }

    #[test]
    fn test_missing_index_is_unavailable() {
        let catalog = DeckCatalog::new(decks_dir().join("does-not-exist"));
        assert!(matches!(
            catalog.list_decks(),
            Err(TarotError::CatalogUnavailable(_))
        ));
    }

    #[test]
    fn test_malformed_index() {
        assert!(matches!(
            parse_index(r#"{"menu": []}"#),
            Err(TarotError::CatalogUnavailable(_))
        ));
        let decks = parse_index(r#"{"decks": [{"id": "a", "name": "A"}]}"#).unwrap();
        assert_eq!(decks[0].description, "");
    }
}
