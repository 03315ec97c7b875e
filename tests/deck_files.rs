//! Validation of every bundled deck file
//!
//! One test is generated per `.json` file in `decks/data/` by `dir-test`;
//! dropping a new deck file in that directory is enough to cover it.

use dir_test::{dir_test, Fixture};
use std::path::Path;
use tarot_reader::{core::SpreadCatalog, loader::DeckLoader};

#[dir_test(
    dir: "$CARGO_MANIFEST_DIR/decks/data",
    glob: "*.json",
)]
fn test_deck_file_is_valid(fixture: Fixture<&str>) {
    let id = Path::new(fixture.path())
        .file_stem()
        .and_then(|s| s.to_str())
        .expect("deck file name");

    let deck = DeckLoader::parse(id, fixture.content())
        .unwrap_or_else(|e| panic!("{} failed to load: {e}", fixture.path()));

    // every built-in spread must be drawable from every deck
    for spread in SpreadCatalog::new().list() {
        assert!(
            spread.count() <= deck.len(),
            "{} is too small for {}",
            id,
            spread.name
        );
    }

    for card in &deck.cards {
        assert!(!card.name.trim().is_empty(), "{id}: card {} has no name", card.id);
        assert!(
            card.image.is_some() || card.glyph.is_some(),
            "{id}: card {} has neither image nor glyph",
            card.id
        );
    }
}
