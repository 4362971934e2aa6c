//! End-to-end scenarios driven through the public API.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Duration, Utc};
use flashdeck::domain::{CardDraft, DeckPatch};
use flashdeck::focus::{ElementId, FocusHost};
use flashdeck::input::Key;
use flashdeck::registry::{DeckRegistry, EventKind, ListenerError};
use flashdeck::storage::{FileSlotStore, MemoryStore, PersistentStore, Snapshot, DEFAULT_MAX_SNAPSHOT_BYTES};
use flashdeck::ui::Target;
use flashdeck::{initialize_with_store, Config, FlashdeckError, ViewCoordinator};
use tempfile::TempDir;

fn app_over(memory: &MemoryStore) -> ViewCoordinator {
    initialize_with_store(&Config::default(), Box::new(memory.clone()))
}

fn type_text(app: &mut ViewCoordinator, text: &str) {
    let now = Utc::now();
    for c in text.chars() {
        let key = if c == ' ' { Key::Space } else { Key::Char(c) };
        app.handle_key(key, now);
    }
}

#[test]
fn registry_hands_out_copies() {
    let mut registry = DeckRegistry::new();
    let deck = registry.create_deck("Spanish").unwrap();
    registry.add_card(deck.id, CardDraft::new("hola", "hello")).unwrap();

    let mut copies = registry.get_all();
    copies[0].name = "Changed".to_string();
    copies[0].cards.clear();

    let stored = registry.get_by_id(deck.id).unwrap();
    assert_eq!(stored.name, "Spanish");
    assert_eq!(stored.cards.len(), 1);
    assert_eq!(stored.cards[0].front, "hola");
}

#[test]
fn failing_listeners_do_not_block_mutations() {
    let mut registry = DeckRegistry::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    registry.subscribe(|_| Err(ListenerError("boom".to_string())));
    registry.subscribe(|_| panic!("listener panicked"));
    let sink = Rc::clone(&seen);
    registry.subscribe(move |event| {
        sink.borrow_mut().push(event.kind());
        Ok(())
    });

    let deck = registry.create_deck("French").unwrap();
    registry.update_deck(deck.id, DeckPatch::rename("Français")).unwrap();

    assert_eq!(*seen.borrow(), vec![EventKind::DeckCreated, EventKind::DeckUpdated]);
    assert_eq!(registry.get_by_id(deck.id).unwrap().name, "Français");
}

#[test]
fn rejected_names_leave_the_registry_untouched() {
    let mut registry = DeckRegistry::new();
    assert!(matches!(registry.create_deck("   "), Err(FlashdeckError::Validation(_))));
    assert_eq!(registry.deck_count(), 0);
}

#[test]
fn new_deck_through_the_keyboard() {
    let memory = MemoryStore::new();
    let mut app = app_over(&memory);

    app.handle_key(Key::Char('n'), Utc::now());
    type_text(&mut app, "Spanish verbs");
    app.handle_key(Key::Enter, Utc::now());

    let decks = app.registry().get_all();
    assert_eq!(decks.len(), 1);
    assert_eq!(decks[0].name, "Spanish verbs");
    assert_eq!(app.registry().selected_deck_id(), Some(decks[0].id));
    assert!(app.prompt().is_none());
    assert!(memory.raw("flashdeck-state").unwrap().contains("Spanish verbs"));
}

#[test]
fn tab_wraps_inside_the_modal() {
    let mut app = app_over(&MemoryStore::new());
    app.create_deck("Spanish").unwrap();
    let now = Utc::now();
    let focused = |app: &ViewCoordinator| app.document().focused();

    app.handle_key(Key::Char('n'), now);
    assert_eq!(focused(&app), Some(ElementId::from("input")));

    app.handle_key(Key::Tab, now);
    assert_eq!(focused(&app), Some(ElementId::from("cancel")));
    app.handle_key(Key::Tab, now);
    assert_eq!(focused(&app), Some(ElementId::from("confirm")));
    app.handle_key(Key::Tab, now);
    assert_eq!(focused(&app), Some(ElementId::from("close")));
    app.handle_key(Key::BackTab, now);
    assert_eq!(focused(&app), Some(ElementId::from("confirm")));
}

#[test]
fn escape_restores_focus_on_the_next_tick() {
    let mut app = app_over(&MemoryStore::new());
    let deck = app.create_deck("Spanish").unwrap();
    let now = Utc::now();
    assert_eq!(app.document().focused_target(), Some(Target::Deck(deck.id)));

    app.handle_key(Key::Char('r'), now);
    app.handle_key(Key::Esc, now);

    assert!(!app.focus_trap().is_active());
    assert!(app.prompt().is_none());
    assert!(app.has_deferred());

    app.tick(now);
    assert_eq!(app.document().focused_target(), Some(Target::Deck(deck.id)));
    assert_eq!(app.registry().get_by_id(deck.id).unwrap().name, "Spanish");
}

#[test]
fn studying_three_cards_wraps_around() {
    let mut app = app_over(&MemoryStore::new());
    let deck = app.create_deck("Animals").unwrap();
    for (front, back) in [("gato", "cat"), ("perro", "dog"), ("pájaro", "bird")] {
        app.add_card(deck.id, CardDraft::new(front, back)).unwrap();
    }

    let start = Utc::now();
    app.handle_key(Key::Char('s'), start);
    assert!(app.study().is_active());
    assert_eq!(app.study().position(), (0, 3));

    app.handle_key(Key::Space, start);
    assert!(app.study().is_flipped());

    for _ in 0..3 {
        app.handle_key(Key::Right, start);
    }
    assert_eq!(app.study().position(), (0, 3));
    assert!(!app.study().is_flipped());

    app.handle_key(Key::Left, start);
    assert_eq!(app.study().current_card().map(|c| c.front.as_str()), Some("pájaro"));

    app.handle_key(Key::Esc, start + Duration::seconds(42));
    let summary = app.last_summary().unwrap();
    assert_eq!(summary.cards_visited, 3);
    assert_eq!(summary.elapsed_seconds, 42);
    assert!(!app.study().is_active());
}

#[test]
fn search_narrows_the_grid_after_the_debounce_window() {
    let mut app = app_over(&MemoryStore::new());
    let deck = app.create_deck("Animals").unwrap();
    app.add_card(deck.id, CardDraft::new("gato", "cat")).unwrap();
    app.add_card(deck.id, CardDraft::new("perro", "dog")).unwrap();

    let now = Utc::now();
    app.set_search_query("CAT", now);
    assert_eq!(app.visible_cards().len(), 2);

    assert!(app.poll(now + Duration::milliseconds(500)));
    let visible = app.visible_cards();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].front, "gato");
}

#[test]
fn deleting_the_selected_deck_clears_the_selection() {
    let mut app = app_over(&MemoryStore::new());
    let deck = app.create_deck("Spanish").unwrap();
    assert_eq!(app.registry().selected_deck_id(), Some(deck.id));

    app.delete_deck(deck.id).unwrap();
    assert_eq!(app.registry().selected_deck_id(), None);
    assert!(app.registry().get_selected().is_none());
    assert!(matches!(app.delete_deck(deck.id), Err(FlashdeckError::DeckNotFound(_))));
}

#[test]
fn decks_survive_a_restart() {
    let memory = MemoryStore::new();
    let mut app = app_over(&memory);
    let deck = app.create_deck("Spanish").unwrap();
    app.add_card(deck.id, CardDraft::new("hola", "hello")).unwrap();
    drop(app);

    let app = app_over(&memory);
    let restored = app.registry().get_selected().unwrap();
    assert_eq!(restored.name, "Spanish");
    assert_eq!(restored.cards[0].back, "hello");
}

#[test]
fn last_save_wins_on_disk() {
    let dir = TempDir::new().unwrap();
    let open = || {
        PersistentStore::new(
            Box::new(FileSlotStore::new(dir.path().to_path_buf())),
            "flashdeck-state",
            DEFAULT_MAX_SNAPSHOT_BYTES,
        )
    };

    let mut registry = DeckRegistry::new();
    let mut store = open();
    registry.create_deck("First").unwrap();
    assert!(store.save(&registry.to_snapshot("")));
    registry.create_deck("Second").unwrap();
    assert!(store.save(&registry.to_snapshot("sec")));

    let loaded: Snapshot = open().load();
    let names: Vec<_> = loaded.decks.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["First", "Second"]);
    assert_eq!(loaded.search_query, "sec");
}
