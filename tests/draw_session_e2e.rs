//! End-to-end draw session tests against the bundled 78-card deck

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tarot_reader::{
    core::{CardId, Deck, SpreadCatalog},
    loader::DeckCatalog,
    session::{DrawMode, DrawSession, SessionPhase, ToggleOutcome},
    shuffle::{DrawRng, ShuffleEngine},
    Result, TarotError,
};

fn universal_waite() -> Arc<Deck> {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("decks");
    Arc::new(
        DeckCatalog::new(dir)
            .load_deck("universal_waite")
            .expect("bundled deck loads"),
    )
}

/// Auto three-card reading: Past/Present/Future come off the tail of the pool
#[test]
fn test_three_card_auto_reading() -> Result<()> {
    let deck = universal_waite();
    let spread = SpreadCatalog::new().get("three-card")?;
    let mut session = DrawSession::new(deck, spread, DrawMode::Auto, DrawRng::from_seed(42));
    session.start();

    assert_eq!(session.remaining().len(), 78);
    let pool = session.remaining().to_vec();

    for slot in 0..3 {
        session.draw_next(slot)?;
    }
    assert_eq!(session.phase(), SessionPhase::Complete);

    let reading = session.finalize()?;
    let pairs: Vec<(&str, CardId)> = reading.pairs().map(|(p, c)| (p, c.id)).collect();
    assert_eq!(
        pairs,
        vec![
            ("Past", pool[77]),
            ("Present", pool[76]),
            ("Future", pool[75]),
        ]
    );
    assert_eq!(reading.deck_id, "universal_waite");
    assert_eq!(reading.spread_name, "Three Card");
    Ok(())
}

/// Shuffling the real deck is a bijection for many seeds
#[test]
fn test_shuffle_bijection_on_deck() {
    let deck = universal_waite();
    let mut expected = deck.card_ids();
    expected.sort();

    for seed in 0..100 {
        let mut shuffled = ShuffleEngine::seeded(seed).shuffle(&deck.cards);
        assert_eq!(shuffled.len(), deck.len());
        shuffled.sort_by_key(|c| c.id);
        let ids: Vec<CardId> = shuffled.iter().map(|c| c.id).collect();
        assert_eq!(ids, expected);
    }
}

/// Celtic cross in auto mode never repeats a card
#[test]
fn test_celtic_cross_has_no_duplicates() -> Result<()> {
    let deck = universal_waite();
    let spread = SpreadCatalog::new().get("celtic-cross")?;

    for seed in 0..25 {
        let mut session = DrawSession::new(
            deck.clone(),
            spread.clone(),
            DrawMode::Auto,
            DrawRng::from_seed(seed),
        );
        session.start();
        for slot in 0..10 {
            let draw = session.draw_next(slot)?;
            assert_eq!(draw.complete, slot == 9);
        }
        let reading = session.finalize()?;
        let unique: HashSet<CardId> = reading.entries.iter().map(|e| e.card.id).collect();
        assert_eq!(unique.len(), 10);
        assert_eq!(session.remaining().len(), 68);
    }
    Ok(())
}

/// Manual selection is keyed by card id, capped at the spread size
#[test]
fn test_manual_celtic_cross_capacity() -> Result<()> {
    let deck = universal_waite();
    let spread = SpreadCatalog::new().get("celtic-cross")?;
    let mut session = DrawSession::new(deck, spread, DrawMode::Manual, DrawRng::from_seed(5));
    session.start();

    let shown: Vec<CardId> = session.display_order().to_vec();
    assert_eq!(shown.len(), 78);

    for &card_id in shown.iter().take(10) {
        session.toggle_select(card_id)?;
    }
    let overflow = session.toggle_select(shown[10])?;
    assert_eq!(overflow.outcome, ToggleOutcome::SelectionFull);
    assert_eq!(overflow.count, 10);

    session.reshuffle_display()?;
    let reading = session.finalize()?;
    let chosen: Vec<CardId> = reading.entries.iter().map(|e| e.card.id).collect();
    assert_eq!(chosen, shown[..10].to_vec());
    assert_eq!(reading.entries[9].position, "Outcome");
    Ok(())
}

/// Failed operations leave the session untouched
#[test]
fn test_errors_do_not_corrupt_state() -> Result<()> {
    let deck = universal_waite();
    let spread = SpreadCatalog::new().get("three-card")?;
    let mut session = DrawSession::new(deck, spread, DrawMode::Continuous, DrawRng::from_seed(3));
    session.start();
    session.draw_next(0)?;

    let before_pool = session.remaining().to_vec();
    let before_slots = session.slots().to_vec();

    assert!(matches!(
        session.draw_next(2),
        Err(TarotError::OutOfOrderDraw { .. })
    ));
    assert!(matches!(
        session.finalize(),
        Err(TarotError::IncompleteSelection { have: 1, need: 3 })
    ));
    assert!(matches!(
        session.toggle_select(CardId::new(1)),
        Err(TarotError::ModeMismatch { .. })
    ));

    assert_eq!(session.remaining(), before_pool.as_slice());
    assert_eq!(session.slots(), before_slots.as_slice());
    assert_eq!(session.round(), 1);
    Ok(())
}
