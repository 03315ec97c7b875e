//! Async deck catalog with a shared cache
//!
//! Deck loads are the only suspension point of a reading. Loaded decks are
//! cached behind `Arc`, so repeated loads of one id return the same data.

use crate::core::Deck;
use crate::loader::catalog::{deck_file_path, index_path, normalize_deck_id, parse_index};
use crate::loader::{DeckLoader, DeckSummary};
use crate::{Result, TarotError};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Instant;

pub struct AsyncDeckCatalog {
    root: PathBuf,
    /// Loaded decks keyed by normalized id (shared between handles)
    decks: Arc<RwLock<FxHashMap<String, Arc<Deck>>>>,
}

impl AsyncDeckCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        AsyncDeckCatalog {
            root: root.into(),
            decks: Arc::new(RwLock::new(FxHashMap::default())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the deck menu
    pub async fn list_decks(&self) -> Result<Vec<DeckSummary>> {
        let path = index_path(&self.root);
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            TarotError::CatalogUnavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        parse_index(&content)
    }

    /// Load a deck by id, hitting the cache first
    pub async fn load_deck(&self, id: &str) -> Result<Arc<Deck>> {
        let key = normalize_deck_id(id).ok_or_else(|| TarotError::DeckNotFound(id.to_string()))?;

        {
            let decks = self.decks.read().await;
            if let Some(deck) = decks.get(&key) {
                return Ok(Arc::clone(deck));
            }
        }

        let path = deck_file_path(&self.root, &key);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TarotError::DeckNotFound(id.to_string()))
            }
            Err(e) => return Err(TarotError::IoError(e)),
        };

        let deck = Arc::new(DeckLoader::parse(&key, &content)?);
        let mut decks = self.decks.write().await;
        // A concurrent load may have won the race; keep the first one
        let cached = decks.entry(key).or_insert_with(|| Arc::clone(&deck));
        Ok(Arc::clone(cached))
    }

    /// Load several decks in parallel, failing on the first error
    ///
    /// Returns (decks_loaded, duration).
    pub async fn prefetch(&self, ids: &[String]) -> Result<(usize, std::time::Duration)> {
        let start = Instant::now();

        let mut tasks = Vec::new();
        for id in ids {
            let id = id.clone();
            let catalog = self.clone_handle();
            tasks.push(tokio::spawn(async move { catalog.load_deck(&id).await }));
        }

        let mut loaded = 0;
        for task in tasks {
            task.await??;
            loaded += 1;
        }

        Ok((loaded, start.elapsed()))
    }

    /// Handle sharing this catalog's cache
    pub fn clone_handle(&self) -> Self {
        AsyncDeckCatalog {
            root: self.root.clone(),
            decks: Arc::clone(&self.decks),
        }
    }

    pub async fn contains(&self, id: &str) -> bool {
        match normalize_deck_id(id) {
            Some(key) => self.decks.read().await.contains_key(&key),
            None => false,
        }
    }

    /// Number of decks currently cached
    pub async fn len(&self) -> usize {
        self.decks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.decks.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> AsyncDeckCatalog {
        AsyncDeckCatalog::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("decks"))
    }

    #[tokio::test]
    async fn test_lazy_loading_hits_cache() {
        let catalog = catalog();
        assert!(catalog.is_empty().await);

        let first = catalog.load_deck("universal_waite").await.unwrap();
        assert_eq!(catalog.len().await, 1);

        let second = catalog.load_deck("Universal Waite").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(catalog.len().await, 1);
        assert!(catalog.contains("universal_waite").await);
    }

    #[tokio::test]
    async fn test_clone_handle_shares_cache() {
        let catalog = catalog();
        let handle = catalog.clone_handle();
        handle.load_deck("major_arcana").await.unwrap();
        assert!(catalog.contains("major_arcana").await);
    }

    #[tokio::test]
    async fn test_prefetch() {
        let catalog = catalog();
        let ids = vec!["universal_waite".to_string(), "major_arcana".to_string()];
        let (loaded, _duration) = catalog.prefetch(&ids).await.unwrap();
        assert_eq!(loaded, 2);
        assert_eq!(catalog.len().await, 2);
    }

    #[tokio::test]
    async fn test_prefetch_fails_on_missing_deck() {
        let catalog = catalog();
        let ids = vec!["major_arcana".to_string(), "missing".to_string()];
        assert!(matches!(
            catalog.prefetch(&ids).await,
            Err(TarotError::DeckNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_not_found() {
        let catalog = catalog();
        assert!(matches!(
            catalog.load_deck("nope").await,
            Err(TarotError::DeckNotFound(_))
        ));
        assert!(catalog.is_empty().await);
    }
}
