//! Deck catalog tests
//!
//! Loads the decks shipped in `decks/` through the async catalog

use std::path::PathBuf;
use tarot_reader::{
    core::CardId,
    loader::{AsyncDeckCatalog, DeckCatalog},
    Result, TarotError,
};

fn decks_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("decks")
}

/// Every deck in the menu loads and has unique card ids
#[tokio::test]
async fn test_every_listed_deck_loads() -> Result<()> {
    let catalog = AsyncDeckCatalog::new(decks_dir());
    let menu = catalog.list_decks().await?;
    assert_eq!(menu.len(), 2);

    for entry in &menu {
        let deck = catalog.load_deck(&entry.id).await?;
        assert_eq!(deck.id, entry.id);
        assert_eq!(deck.name(), entry.name);
        assert!(!deck.is_empty());
    }

    assert_eq!(catalog.len().await, menu.len());
    Ok(())
}

#[tokio::test]
async fn test_universal_waite_contents() -> Result<()> {
    let catalog = AsyncDeckCatalog::new(decks_dir());
    let deck = catalog.load_deck("universal_waite").await?;

    assert_eq!(deck.len(), 78);
    let fool = deck.card(CardId::new(0)).expect("The Fool");
    assert_eq!(fool.name, "The Fool");
    assert_eq!(
        deck.image_url(fool).as_deref(),
        Some("assets/images/universal_waite/major/00.jpg")
    );
    assert_eq!(
        deck.back_image_url(),
        "assets/images/universal_waite/back.jpg"
    );

    let last = deck.card(CardId::new(77)).expect("last card");
    assert_eq!(last.name, "King of Pentacles");
    Ok(())
}

#[tokio::test]
async fn test_major_arcana_uses_glyphs() -> Result<()> {
    let catalog = AsyncDeckCatalog::new(decks_dir());
    let deck = catalog.load_deck("major_arcana").await?;

    assert_eq!(deck.len(), 22);
    for card in &deck.cards {
        assert!(card.image.is_none());
        assert!(card.glyph.is_some(), "{} has no glyph", card.name);
    }
    Ok(())
}

/// Repeated loads are idempotent and equal to a fresh sync load
#[tokio::test]
async fn test_repeated_loads_are_equal() -> Result<()> {
    let catalog = AsyncDeckCatalog::new(decks_dir());
    let first = catalog.load_deck("major_arcana").await?;
    let second = catalog.load_deck("major_arcana").await?;
    assert_eq!(*first, *second);

    let uncached = DeckCatalog::new(decks_dir()).load_deck("major_arcana")?;
    assert_eq!(*first, uncached);
    Ok(())
}

#[tokio::test]
async fn test_catalog_failures() {
    let missing_root = AsyncDeckCatalog::new(decks_dir().join("nowhere"));
    assert!(matches!(
        missing_root.list_decks().await,
        Err(TarotError::CatalogUnavailable(_))
    ));
    assert!(matches!(
        missing_root.load_deck("universal_waite").await,
        Err(TarotError::DeckNotFound(_))
    ));

    let catalog = AsyncDeckCatalog::new(decks_dir());
    assert!(matches!(
        catalog.load_deck("../index").await,
        Err(TarotError::DeckNotFound(_))
    ));
}
