//! The view coordinator: glue between the registry, persistence, and views.
//!
//! [`ViewCoordinator`] owns every stateful component of the application. It
//! subscribes to the deck registry, turns notifications into dirty views,
//! writes a snapshot after every mutation, and routes keys to whichever
//! component currently owns the keyboard.
//!
//! # Key Routing
//!
//! ```text
//! key ──▶ KeyDispatcher top owner
//!           ├─ FocusTrap ─▶ prompt modal (Tab containment, text entry, Esc)
//!           ├─ Study     ─▶ study session (←/→, Space, Esc)
//!           └─ none      ─▶ main view (decks, cards, search field)
//! ```

use super::modes::InputMode;
use super::prompt::{Prompt, PromptKind, PromptOutcome};
use super::state::{DirtyViews, ViewTracker};
use crate::domain::error::{FlashdeckError, Result};
use crate::domain::{Card, CardDraft, CardId, Deck, DeckPatch};
use crate::focus::{Deferred, FocusHost, FocusTrap};
use crate::input::{Key, KeyDispatcher, KeyDisposition, KeyOwner};
use crate::registry::{DeckRegistry, ListenerError};
use crate::search::{filter_cards, SearchIndex};
use crate::storage::PersistentStore;
use crate::study::{StudySession, StudySummary};
use crate::ui::document::{Document, Target, MODAL_CANCEL, MODAL_CLOSE, MODAL_INPUT};
use crate::ui::Theme;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A search window that has settled.
///
/// Only the query is kept: the cards it ran over may be stale by the time
/// the coordinator picks it up.
#[derive(Debug)]
struct SettledSearch {
    query: String,
    match_count: usize,
}

/// Owns the registry, store, focus trap, study session and document, and
/// keeps the views consistent with them.
#[derive(Debug)]
pub struct ViewCoordinator {
    registry: DeckRegistry,
    store: PersistentStore,
    tracker: Rc<RefCell<ViewTracker>>,

    search: SearchIndex,
    search_query: String,
    applied_query: String,
    search_results: Vec<Card>,
    search_inbox: Rc<RefCell<Option<SettledSearch>>>,

    keys: KeyDispatcher,
    trap: FocusTrap,
    study: StudySession,
    document: Document,
    prompt: Option<Prompt>,
    deferred: VecDeque<Deferred>,

    status: Option<String>,
    last_summary: Option<StudySummary>,
    theme: Theme,
}

impl ViewCoordinator {
    /// Loads the stored snapshot and wires the registry subscription.
    #[must_use]
    pub fn new(store: PersistentStore, theme: Theme, search_debounce_ms: u64) -> Self {
        let _span = tracing::debug_span!("coordinator_new", slot = %store.slot()).entered();

        let snapshot = store.load();
        let mut registry = DeckRegistry::from_snapshot(&snapshot);

        let tracker = Rc::new(RefCell::new(ViewTracker {
            dirty: DirtyViews::all(),
            displayed_deck: registry.selected_deck_id(),
            ..ViewTracker::default()
        }));
        let sink = Rc::clone(&tracker);
        registry.subscribe(move |event| {
            let mut tracker = sink
                .try_borrow_mut()
                .map_err(|_| ListenerError("view tracker is already borrowed".to_string()))?;
            tracker.observe(event);
            Ok(())
        });

        let mut app = Self {
            registry,
            store,
            tracker,
            search: SearchIndex::new(search_debounce_ms),
            search_query: snapshot.search_query.clone(),
            applied_query: snapshot.search_query,
            search_results: Vec::new(),
            search_inbox: Rc::new(RefCell::new(None)),
            keys: KeyDispatcher::new(),
            trap: FocusTrap::new(),
            study: StudySession::new(),
            document: Document::new(),
            prompt: None,
            deferred: VecDeque::new(),
            status: None,
            last_summary: None,
            theme,
        };
        app.refresh_search_results();
        app.rebuild_document();

        tracing::info!(decks = app.registry.deck_count(), "coordinator ready");
        app
    }

    // ---- registry operations -------------------------------------------

    /// Creates a deck and selects it.
    ///
    /// # Errors
    ///
    /// Returns [`FlashdeckError::Validation`] for a blank name.
    pub fn create_deck(&mut self, name: &str) -> Result<Deck> {
        let _span = tracing::debug_span!("create_deck").entered();
        let deck = self.registry.create_deck(name);
        let deck = self.settle(deck)?;
        self.select_deck(deck.id)
    }

    /// # Errors
    ///
    /// Returns [`FlashdeckError::Validation`] or [`FlashdeckError::DeckNotFound`].
    pub fn rename_deck(&mut self, id: u64, name: &str) -> Result<Deck> {
        let _span = tracing::debug_span!("rename_deck", deck_id = id).entered();
        let result = self.registry.update_deck(id, DeckPatch::rename(name));
        self.settle(result)
    }

    /// # Errors
    ///
    /// Returns [`FlashdeckError::DeckNotFound`].
    pub fn delete_deck(&mut self, id: u64) -> Result<Deck> {
        let _span = tracing::debug_span!("delete_deck", deck_id = id).entered();
        let result = self.registry.delete_deck(id);
        self.settle(result)
    }

    /// # Errors
    ///
    /// Returns [`FlashdeckError::DeckNotFound`].
    pub fn select_deck(&mut self, id: u64) -> Result<Deck> {
        let _span = tracing::debug_span!("select_deck", deck_id = id).entered();
        let result = self.registry.select_deck(id);
        let deck = self.settle(result)?;
        self.document.focus(&Target::Deck(deck.id).element_id());
        Ok(deck)
    }

    /// # Errors
    ///
    /// Returns [`FlashdeckError::Validation`] or [`FlashdeckError::DeckNotFound`].
    pub fn add_card(&mut self, deck_id: u64, draft: CardDraft) -> Result<Card> {
        let _span = tracing::debug_span!("add_card", deck_id = deck_id).entered();
        let result = self.registry.add_card(deck_id, draft);
        self.settle(result)
    }

    /// # Errors
    ///
    /// Returns [`FlashdeckError::Validation`], [`FlashdeckError::DeckNotFound`]
    /// or [`FlashdeckError::CardNotFound`].
    pub fn update_card(&mut self, deck_id: u64, card_id: &CardId, draft: CardDraft) -> Result<Card> {
        let _span = tracing::debug_span!("update_card", deck_id = deck_id, card_id = %card_id).entered();
        let result = self.registry.update_card(deck_id, card_id, draft);
        self.settle(result)
    }

    /// # Errors
    ///
    /// Returns [`FlashdeckError::DeckNotFound`] or [`FlashdeckError::CardNotFound`].
    pub fn delete_card(&mut self, deck_id: u64, card_id: &CardId) -> Result<Card> {
        let _span = tracing::debug_span!("delete_card", deck_id = deck_id, card_id = %card_id).entered();
        let result = self.registry.delete_card(deck_id, card_id);
        self.settle(result)
    }

    fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.after_mutation(),
            Err(e) => self.report(e),
        }
        result
    }

    fn after_mutation(&mut self) {
        let (persist, study_stale) = {
            let mut tracker = self.tracker.borrow_mut();
            (
                std::mem::take(&mut tracker.persist_requested),
                std::mem::take(&mut tracker.study_stale),
            )
        };

        if study_stale {
            self.refresh_study();
        }
        self.refresh_search_results();
        self.rebuild_document();
        if persist {
            self.persist();
        }
    }

    fn report(&mut self, error: &FlashdeckError) {
        if error.is_user_facing() {
            tracing::debug!(error = %error, "rejected user input");
            self.status = Some(error.to_string());
            self.mark(|d| d.footer = true);
        } else if error.is_not_found() {
            tracing::warn!(error = %error, "stale reference");
        } else {
            tracing::error!(error = %error, "operation failed");
        }
    }

    fn persist(&mut self) {
        let snapshot = self.registry.to_snapshot(&self.search_query);
        if !self.store.save(&snapshot) {
            self.status = Some("Changes could not be saved".to_string());
            self.mark(|d| d.footer = true);
        }
    }

    // ---- search ---------------------------------------------------------

    /// Updates the search field and schedules a debounced search over the
    /// selected deck.
    pub fn set_search_query(&mut self, query: &str, now: DateTime<Utc>) {
        self.search_query = query.to_string();
        let cards = self.selected_cards();
        let inbox = Rc::clone(&self.search_inbox);
        let settled_query = query.to_string();
        self.search.search(&cards, query, now, move |_, count| {
            *inbox.borrow_mut() = Some(SettledSearch {
                query: settled_query,
                match_count: count,
            });
        });
        self.mark(|d| d.search = true);
    }

    /// Delivers a due search. Returns `true` if results changed the view.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        if !self.search.poll(now) {
            return false;
        }
        let Some(settled) = self.search_inbox.borrow_mut().take() else {
            return false;
        };

        // Decks or cards may have changed during the window.
        self.search_results = filter_cards(&self.selected_cards(), &settled.query);
        tracing::debug!(
            match_count = self.search_results.len(),
            at_request = settled.match_count,
            "search results applied"
        );
        self.applied_query = settled.query;
        self.rebuild_document();
        self.mark(|d| {
            d.grid = true;
            d.search = true;
        });
        self.persist();
        true
    }

    fn selected_cards(&self) -> Vec<Card> {
        self.registry
            .get_selected()
            .map(|deck| deck.cards)
            .unwrap_or_default()
    }

    fn refresh_search_results(&mut self) {
        if !self.applied_query.trim().is_empty() {
            self.search_results = filter_cards(&self.selected_cards(), &self.applied_query);
        }
    }

    /// Cards shown in the grid: the selected deck, narrowed by the last
    /// settled search.
    #[must_use]
    pub fn visible_cards(&self) -> Vec<Card> {
        if self.applied_query.trim().is_empty() {
            self.selected_cards()
        } else {
            self.search_results.clone()
        }
    }

    // ---- grid -----------------------------------------------------------

    /// Flips a card in the grid view. Returns the new state.
    pub fn toggle_card_flip(&mut self, card_id: &CardId) -> bool {
        let flipped = self.tracker.borrow_mut().flips.toggle(card_id);
        self.mark(|d| d.grid = true);
        flipped
    }

    #[must_use]
    pub fn is_card_flipped(&self, card_id: &CardId) -> bool {
        self.tracker.borrow().flips.is_flipped(card_id)
    }

    fn select_adjacent(&mut self, forward: bool) {
        let decks = self.registry.decks();
        if decks.is_empty() {
            return;
        }
        let len = decks.len();
        let current = self
            .registry
            .selected_deck_id()
            .and_then(|id| decks.iter().position(|d| d.id == id));
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        let id = decks[next].id;
        let _ = self.select_deck(id);
    }

    fn rebuild_document(&mut self) {
        let selected = self.registry.get_selected();
        let no_selection = selected.is_none();

        let mut elements = vec![
            Target::NewDeck.element(false),
            Target::Search.element(no_selection),
        ];
        elements.extend(self.registry.decks().iter().map(|d| Target::Deck(d.id).element(false)));
        elements.push(Target::AddCard.element(no_selection));
        elements.push(Target::Study.element(selected.as_ref().map_or(true, Deck::is_empty)));
        elements.extend(
            self.visible_cards()
                .into_iter()
                .map(|card| Target::Card(card.id).element(false)),
        );
        self.document.set_main(elements);
    }

    // ---- study ----------------------------------------------------------

    /// Starts studying the selected deck.
    ///
    /// # Errors
    ///
    /// Returns [`FlashdeckError::Validation`] without a selection and
    /// [`FlashdeckError::EmptyDeck`] for a deck without cards.
    pub fn enter_study(&mut self, now: DateTime<Utc>) -> Result<()> {
        let _span = tracing::debug_span!("enter_study").entered();

        let Some(deck) = self.registry.get_selected() else {
            let err = FlashdeckError::Validation("select a deck to study".to_string());
            self.report(&err);
            return Err(err);
        };

        let result = self.study.enter(&deck, &mut self.keys, now);
        self.tracker.borrow_mut().studied_deck = self.study.deck_id();
        match result {
            Ok(()) => {
                self.status = None;
                self.mark(|d| {
                    d.study = true;
                    d.footer = true;
                });
                Ok(())
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Ends study mode and returns to the grid.
    pub fn exit_study(&mut self, now: DateTime<Utc>) -> Option<StudySummary> {
        let summary = self.study.exit(&mut self.keys, now)?;
        self.finish_study(summary);
        Some(summary)
    }

    fn finish_study(&mut self, summary: StudySummary) {
        debug_assert!(
            self.keys.active_owner() != Some(KeyOwner::Study),
            "grid restored while study mode still owns the keys"
        );
        self.tracker.borrow_mut().studied_deck = None;
        self.status = Some(format!(
            "Studied {} cards in {}s",
            summary.cards_visited, summary.elapsed_seconds
        ));
        self.last_summary = Some(summary);
        self.mark(|d| {
            d.study = true;
            d.grid = true;
            d.footer = true;
        });
    }

    fn refresh_study(&mut self) {
        let Some(deck_id) = self.study.deck_id() else {
            return;
        };
        let still_studyable = self
            .registry
            .get_by_id(deck_id)
            .is_some_and(|deck| self.study.refresh(&deck));
        if still_studyable {
            self.mark(|d| d.study = true);
        } else {
            tracing::debug!(deck_id = deck_id, "studied deck emptied or removed");
            self.exit_study(Utc::now());
        }
    }

    // ---- prompts --------------------------------------------------------

    /// Opens the modal prompt and traps focus in it.
    pub fn open_prompt(&mut self, kind: PromptKind) {
        let _span = tracing::debug_span!("open_prompt", kind = ?kind).entered();

        let (title, value) = self.prompt_text(&kind);
        self.document.set_input_visible(kind.takes_text());
        self.prompt = Some(Prompt::new(kind, title, value));
        self.trap.open(&mut self.document, &mut self.keys, None);
        self.mark(|d| {
            d.modal = true;
            d.footer = true;
        });
    }

    fn prompt_text(&self, kind: &PromptKind) -> (String, String) {
        let card = |deck_id: u64, card_id: &Option<CardId>| {
            card_id
                .as_ref()
                .and_then(|id| {
                    self.registry
                        .get_by_id(deck_id)
                        .and_then(|deck| deck.card(id).cloned())
                })
        };
        match kind {
            PromptKind::NewDeck => ("New deck name".to_string(), String::new()),
            PromptKind::RenameDeck(id) => (
                "Rename deck".to_string(),
                self.registry.get_by_id(*id).map(|d| d.name).unwrap_or_default(),
            ),
            PromptKind::CardFront { deck_id, card_id } => (
                "Front of card".to_string(),
                card(*deck_id, card_id).map(|c| c.front).unwrap_or_default(),
            ),
            PromptKind::CardBack { deck_id, card_id, .. } => (
                "Back of card".to_string(),
                card(*deck_id, card_id).map(|c| c.back).unwrap_or_default(),
            ),
            PromptKind::ConfirmDeleteDeck(id) => {
                let title = self.registry.get_by_id(*id).map_or_else(
                    || "Delete deck?".to_string(),
                    |d| format!("Delete deck \"{}\" and its {} cards?", d.name, d.len()),
                );
                (title, String::new())
            }
            PromptKind::ConfirmDeleteCard { .. } => ("Delete this card?".to_string(), String::new()),
        }
    }

    /// Submits the open prompt with its current text.
    ///
    /// The front-of-card step chains into the back-of-card step without
    /// closing the modal.
    pub fn submit_prompt(&mut self) -> Option<PromptOutcome> {
        let prompt = self.prompt.take()?;
        let (kind, outcome) = prompt.submit();
        let PromptOutcome::Submitted(text) = outcome.clone() else {
            return Some(outcome);
        };

        if let PromptKind::CardFront { deck_id, card_id } = kind {
            let next = PromptKind::CardBack {
                deck_id,
                card_id,
                front: text,
            };
            let (title, value) = self.prompt_text(&next);
            self.prompt = Some(Prompt::new(next, title, value));
            self.document.focus(&MODAL_INPUT.into());
            self.mark(|d| d.modal = true);
            return Some(outcome);
        }

        self.close_modal();
        self.apply_prompt(kind, text);
        Some(outcome)
    }

    /// Dismisses the open prompt without applying it.
    pub fn cancel_prompt(&mut self) -> Option<PromptOutcome> {
        self.prompt.take()?;
        tracing::debug!("prompt cancelled");
        self.close_modal();
        Some(PromptOutcome::Cancelled)
    }

    fn close_modal(&mut self) {
        if let Some(task) = self.trap.close(&mut self.document, &mut self.keys) {
            self.deferred.push_back(task);
        }
        self.document.set_input_visible(true);
        self.mark(|d| {
            d.modal = true;
            d.footer = true;
        });
    }

    fn apply_prompt(&mut self, kind: PromptKind, text: String) {
        // Failures are already reported through `settle`.
        let _ = match kind {
            PromptKind::NewDeck => self.create_deck(&text).map(drop),
            PromptKind::RenameDeck(id) => self.rename_deck(id, &text).map(drop),
            PromptKind::CardFront { deck_id, card_id } => {
                tracing::warn!(deck_id = deck_id, card_id = ?card_id, "front step applied directly");
                Ok(())
            }
            PromptKind::CardBack {
                deck_id,
                card_id: None,
                front,
            } => self.add_card(deck_id, CardDraft::new(front, text)).map(drop),
            PromptKind::CardBack {
                deck_id,
                card_id: Some(card_id),
                front,
            } => self
                .update_card(deck_id, &card_id, CardDraft::new(front, text))
                .map(drop),
            PromptKind::ConfirmDeleteDeck(id) => self.delete_deck(id).map(drop),
            PromptKind::ConfirmDeleteCard { deck_id, card_id } => {
                self.delete_card(deck_id, &card_id).map(drop)
            }
        };
    }

    // ---- keys -----------------------------------------------------------

    /// Routes a key press to the current key owner.
    pub fn handle_key(&mut self, key: Key, now: DateTime<Utc>) -> KeyDisposition {
        let _span = tracing::debug_span!("handle_key", key = ?key, owner = ?self.keys.active_owner()).entered();

        match self.keys.active_owner() {
            Some(KeyOwner::FocusTrap) => self.handle_prompt_key(key),
            Some(KeyOwner::Study) => self.handle_study_key(key, now),
            None => self.handle_main_key(key, now),
        }
    }

    fn handle_prompt_key(&mut self, key: Key) -> KeyDisposition {
        let (disposition, deferred) = self.trap.handle_key(&mut self.document, &mut self.keys, key);
        if let Some(task) = deferred {
            self.deferred.push_back(task);
        }

        if key == Key::Esc && !self.trap.is_active() {
            self.cancel_prompt();
            return disposition;
        }
        if key.is_tab() {
            if disposition == KeyDisposition::Default {
                self.document.native_tab(key == Key::BackTab);
            }
            self.mark(|d| d.modal = true);
            return disposition;
        }

        let focused = self.document.focused();
        let on = |id: &str| focused.as_ref().is_some_and(|f| f.as_str() == id);
        let takes_text = self.prompt.as_ref().is_some_and(|p| p.kind.takes_text());

        match key {
            Key::Enter if on(MODAL_CLOSE) || on(MODAL_CANCEL) => {
                self.cancel_prompt();
            }
            Key::Enter => {
                self.submit_prompt();
            }
            Key::Char('y') if !takes_text => {
                self.submit_prompt();
            }
            Key::Char(c) if on(MODAL_INPUT) => self.edit_prompt(|p| p.push(c)),
            Key::Space if on(MODAL_INPUT) => self.edit_prompt(|p| p.push(' ')),
            Key::Backspace if on(MODAL_INPUT) => self.edit_prompt(Prompt::backspace),
            _ => return KeyDisposition::Default,
        }
        KeyDisposition::PreventDefault
    }

    fn edit_prompt(&mut self, edit: impl FnOnce(&mut Prompt)) {
        if let Some(prompt) = self.prompt.as_mut() {
            edit(prompt);
            self.mark(|d| d.modal = true);
        }
    }

    fn handle_study_key(&mut self, key: Key, now: DateTime<Utc>) -> KeyDisposition {
        let (disposition, summary) = self.study.handle_key(&mut self.keys, key, now);
        if let Some(summary) = summary {
            self.finish_study(summary);
        } else if disposition.is_handled() {
            self.mark(|d| d.study = true);
        }
        disposition
    }

    fn handle_main_key(&mut self, key: Key, now: DateTime<Utc>) -> KeyDisposition {
        let focused = self.document.focused_target();

        if focused == Some(Target::Search) {
            let mut query = self.search_query.clone();
            match key {
                Key::Char(c) => query.push(c),
                Key::Space => query.push(' '),
                Key::Backspace => {
                    query.pop();
                }
                Key::Enter | Key::Esc => {
                    self.document.blur();
                    self.mark(|d| {
                        d.search = true;
                        d.footer = true;
                    });
                    return KeyDisposition::PreventDefault;
                }
                _ => {}
            }
            if query != self.search_query {
                self.set_search_query(&query, now);
                return KeyDisposition::PreventDefault;
            }
        }

        let selected = self.registry.selected_deck_id();
        let focused_card = match &focused {
            Some(Target::Card(id)) => selected.map(|deck_id| (deck_id, id.clone())),
            _ => None,
        };

        match key {
            Key::Tab | Key::BackTab => {
                self.document.native_tab(key == Key::BackTab);
                self.mark(|d| {
                    d.sidebar = true;
                    d.grid = true;
                    d.search = true;
                    d.footer = true;
                });
                return KeyDisposition::Default;
            }
            Key::Up | Key::Char('k') => self.select_adjacent(false),
            Key::Down | Key::Char('j') => self.select_adjacent(true),
            Key::Enter => return self.activate(focused, now),
            Key::Space => match focused_card {
                Some((_, card_id)) => {
                    self.toggle_card_flip(&card_id);
                }
                None => return KeyDisposition::Ignored,
            },
            Key::Char('n') => self.open_prompt(PromptKind::NewDeck),
            Key::Char('a') => match selected {
                Some(deck_id) => self.open_prompt(PromptKind::CardFront {
                    deck_id,
                    card_id: None,
                }),
                None => return KeyDisposition::Ignored,
            },
            Key::Char('e') => match focused_card {
                Some((deck_id, card_id)) => self.open_prompt(PromptKind::CardFront {
                    deck_id,
                    card_id: Some(card_id),
                }),
                None => return KeyDisposition::Ignored,
            },
            Key::Char('x') => match focused_card {
                Some((deck_id, card_id)) => {
                    self.open_prompt(PromptKind::ConfirmDeleteCard { deck_id, card_id });
                }
                None => return KeyDisposition::Ignored,
            },
            Key::Char('r') => match selected {
                Some(id) => self.open_prompt(PromptKind::RenameDeck(id)),
                None => return KeyDisposition::Ignored,
            },
            Key::Char('d') => match selected {
                Some(id) => self.open_prompt(PromptKind::ConfirmDeleteDeck(id)),
                None => return KeyDisposition::Ignored,
            },
            Key::Char('s') => {
                let _ = self.enter_study(now);
            }
            Key::Char('/') => {
                self.document.focus(&Target::Search.element_id());
                self.mark(|d| {
                    d.search = true;
                    d.footer = true;
                });
            }
            _ => return KeyDisposition::Ignored,
        }
        KeyDisposition::PreventDefault
    }

    fn activate(&mut self, target: Option<Target>, now: DateTime<Utc>) -> KeyDisposition {
        match target {
            Some(Target::NewDeck) => self.open_prompt(PromptKind::NewDeck),
            Some(Target::Deck(id)) => {
                let _ = self.select_deck(id);
            }
            Some(Target::AddCard) => {
                if let Some(deck_id) = self.registry.selected_deck_id() {
                    self.open_prompt(PromptKind::CardFront {
                        deck_id,
                        card_id: None,
                    });
                }
            }
            Some(Target::Study) => {
                let _ = self.enter_study(now);
            }
            Some(Target::Card(card_id)) => {
                self.toggle_card_flip(&card_id);
            }
            Some(Target::Search) | None => return KeyDisposition::Ignored,
        }
        KeyDisposition::PreventDefault
    }

    // ---- ticks ----------------------------------------------------------

    /// Runs tasks deferred to the next tick. Returns how many ran.
    pub fn run_deferred(&mut self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.deferred.pop_front() {
            task.run(&mut self.document);
            ran += 1;
        }
        if ran > 0 {
            self.mark(|d| {
                d.sidebar = true;
                d.grid = true;
            });
        }
        ran
    }

    /// Timer callback: deferred tasks first, then a due search.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.run_deferred();
        self.poll(now);
    }

    /// Seconds until the host should call [`tick`](Self::tick), if ever.
    #[must_use]
    pub fn next_tick_in(&self, now: DateTime<Utc>) -> Option<f64> {
        if !self.deferred.is_empty() {
            return Some(0.0);
        }
        self.search.due_in(now).map(|due| {
            #[allow(clippy::cast_precision_loss)]
            let millis = due.num_milliseconds() as f64;
            millis / 1000.0
        })
    }

    // ---- accessors ------------------------------------------------------

    /// Returns and clears the set of views that changed.
    pub fn take_dirty_views(&mut self) -> DirtyViews {
        self.tracker.borrow_mut().take_dirty()
    }

    fn mark(&self, update: impl FnOnce(&mut DirtyViews)) {
        update(&mut self.tracker.borrow_mut().dirty);
    }

    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        match self.keys.active_owner() {
            Some(KeyOwner::FocusTrap) => InputMode::Prompt,
            Some(KeyOwner::Study) => InputMode::Study,
            None if self.document.focused_target() == Some(Target::Search) => InputMode::Search,
            None => InputMode::Normal,
        }
    }

    #[must_use]
    pub const fn registry(&self) -> &DeckRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub const fn study(&self) -> &StudySession {
        &self.study
    }

    #[must_use]
    pub const fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    #[must_use]
    pub const fn focus_trap(&self) -> &FocusTrap {
        &self.trap
    }

    #[must_use]
    pub const fn keys(&self) -> &KeyDispatcher {
        &self.keys
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    #[must_use]
    pub const fn last_summary(&self) -> Option<StudySummary> {
        self.last_summary
    }

    #[must_use]
    pub const fn theme(&self) -> &Theme {
        &self.theme
    }

    #[must_use]
    pub fn has_deferred(&self) -> bool {
        !self.deferred.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::ElementId;
    use crate::storage::{MemoryStore, DEFAULT_MAX_SNAPSHOT_BYTES};
    use chrono::Duration;

    const SLOT: &str = "flashdeck-state";

    fn coordinator() -> (ViewCoordinator, MemoryStore) {
        let memory = MemoryStore::new();
        let store = PersistentStore::new(Box::new(memory.clone()), SLOT, DEFAULT_MAX_SNAPSHOT_BYTES);
        (ViewCoordinator::new(store, Theme::default(), 150), memory)
    }

    fn type_text(app: &mut ViewCoordinator, text: &str, now: DateTime<Utc>) {
        for c in text.chars() {
            let key = if c == ' ' { Key::Space } else { Key::Char(c) };
            app.handle_key(key, now);
        }
    }

    #[test]
    fn every_mutation_is_persisted() {
        let (mut app, memory) = coordinator();
        let deck = app.create_deck("Spanish").unwrap();
        app.add_card(deck.id, CardDraft::new("hola", "hello")).unwrap();

        // create + select + add
        assert_eq!(memory.write_count(), 3);
        let raw = memory.raw(SLOT).unwrap();
        assert!(raw.contains("\"hola\""));
        assert!(raw.contains("\"selectedDeckId\":1"));
    }

    #[test]
    fn rejected_input_sets_status_and_skips_persistence() {
        let (mut app, memory) = coordinator();
        assert!(app.create_deck("   ").is_err());
        assert_eq!(memory.write_count(), 0);
        assert!(app.status().is_some());
        assert!(app.take_dirty_views().footer);
    }

    #[test]
    fn dirty_views_follow_mutations() {
        let (mut app, _) = coordinator();
        app.take_dirty_views();

        let spanish = app.create_deck("Spanish").unwrap();
        let dirty = app.take_dirty_views();
        assert!(dirty.sidebar && dirty.grid);

        let other = app.registry.create_deck("French").unwrap();
        app.after_mutation();
        app.take_dirty_views();

        app.add_card(other.id, CardDraft::new("bonjour", "hello")).unwrap();
        let dirty = app.take_dirty_views();
        assert!(dirty.sidebar);
        assert!(!dirty.grid);

        app.add_card(spanish.id, CardDraft::new("hola", "hello")).unwrap();
        assert!(app.take_dirty_views().grid);
        assert!(app.take_dirty_views().is_empty());
    }

    #[test]
    fn new_deck_prompt_flow() {
        let (mut app, _) = coordinator();
        let now = Utc::now();

        app.handle_key(Key::Char('n'), now);
        assert_eq!(app.input_mode(), InputMode::Prompt);
        assert_eq!(app.document.focused(), Some(ElementId::from(MODAL_INPUT)));

        type_text(&mut app, "Spanish", now);
        app.handle_key(Key::Enter, now);

        assert!(app.prompt().is_none());
        assert_eq!(app.registry.get_selected().map(|d| d.name), Some("Spanish".to_string()));
        assert_eq!(app.input_mode(), InputMode::Normal);
    }

    #[test]
    fn escape_cancels_and_restores_focus_next_tick() {
        let (mut app, _) = coordinator();
        let now = Utc::now();
        app.create_deck("Spanish").unwrap();
        let opener = Target::Deck(1).element_id();
        assert_eq!(app.document.focused(), Some(opener.clone()));

        app.handle_key(Key::Char('r'), now);
        type_text(&mut app, "ignored", now);
        let disposition = app.handle_key(Key::Esc, now);

        assert_eq!(disposition, KeyDisposition::PreventDefault);
        assert!(app.prompt().is_none());
        assert!(app.keys.is_empty());
        assert_eq!(app.document.focused(), None);
        assert_eq!(app.next_tick_in(now), Some(0.0));

        assert_eq!(app.run_deferred(), 1);
        assert_eq!(app.document.focused(), Some(opener));
        assert_eq!(app.registry.get_by_id(1).map(|d| d.name), Some("Spanish".to_string()));
    }

    #[test]
    fn card_prompts_chain_front_then_back() {
        let (mut app, _) = coordinator();
        let now = Utc::now();
        app.create_deck("Spanish").unwrap();

        app.handle_key(Key::Char('a'), now);
        type_text(&mut app, "hola", now);
        app.handle_key(Key::Enter, now);
        assert!(matches!(
            app.prompt().map(|p| &p.kind),
            Some(PromptKind::CardBack { .. })
        ));
        assert!(app.focus_trap().is_active());

        type_text(&mut app, "hello", now);
        app.handle_key(Key::Enter, now);

        let deck = app.registry.get_selected().unwrap();
        assert_eq!(deck.cards.len(), 1);
        assert_eq!(deck.cards[0].front, "hola");
        assert_eq!(deck.cards[0].back, "hello");
        assert!(app.keys.is_empty());
    }

    #[test]
    fn deleting_the_opener_skips_focus_restore() {
        let (mut app, _) = coordinator();
        let now = Utc::now();
        app.create_deck("Spanish").unwrap();

        app.handle_key(Key::Char('d'), now);
        app.handle_key(Key::Char('y'), now);
        assert_eq!(app.registry.deck_count(), 0);

        app.run_deferred();
        assert_eq!(app.document.focused(), None);
    }

    #[test]
    fn search_is_debounced_and_persisted() {
        let (mut app, memory) = coordinator();
        let now = Utc::now();
        let deck = app.create_deck("Spanish").unwrap();
        app.add_card(deck.id, CardDraft::new("hola", "hello")).unwrap();
        app.add_card(deck.id, CardDraft::new("gato", "cat")).unwrap();
        let writes = memory.write_count();

        app.handle_key(Key::Char('/'), now);
        assert_eq!(app.input_mode(), InputMode::Search);
        type_text(&mut app, "cat", now);

        assert_eq!(app.visible_cards().len(), 2);
        assert!(!app.poll(now + Duration::milliseconds(100)));
        assert!(app.poll(now + Duration::milliseconds(150)));

        let visible = app.visible_cards();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].front, "gato");
        assert_eq!(memory.write_count(), writes + 1);
        assert!(memory.raw(SLOT).unwrap().contains("\"searchQuery\":\"cat\""));
    }

    #[test]
    fn settled_search_uses_the_deck_selected_when_it_settles() {
        let (mut app, _) = coordinator();
        let now = Utc::now();
        let first = app.create_deck("Spanish").unwrap();
        app.add_card(first.id, CardDraft::new("hola", "hello")).unwrap();
        let second = app.create_deck("Animals").unwrap();
        app.add_card(second.id, CardDraft::new("gato", "cat")).unwrap();
        app.select_deck(first.id).unwrap();

        app.handle_key(Key::Char('/'), now);
        app.handle_key(Key::Char('a'), now);
        app.handle_key(Key::Down, now);
        assert_eq!(app.registry.selected_deck_id(), Some(second.id));

        assert!(app.poll(now + Duration::milliseconds(200)));
        let fronts: Vec<_> = app.visible_cards().into_iter().map(|c| c.front).collect();
        assert_eq!(fronts, ["gato"]);
        let card_elements = app
            .document
            .elements()
            .into_iter()
            .filter(|e| e.id.as_str().starts_with("card-"))
            .count();
        assert_eq!(card_elements, 1);
    }

    #[test]
    fn settled_search_skips_cards_deleted_during_the_window() {
        let (mut app, _) = coordinator();
        let now = Utc::now();
        let deck = app.create_deck("Spanish").unwrap();
        let card = app.add_card(deck.id, CardDraft::new("hola", "hello")).unwrap();

        app.set_search_query("hol", now);
        app.delete_card(deck.id, &card.id).unwrap();
        assert!(app.poll(now + Duration::milliseconds(200)));

        assert!(app.registry.get_by_id(deck.id).unwrap().is_empty());
        assert!(app.visible_cards().is_empty());
    }

    #[test]
    fn search_results_track_card_changes() {
        let (mut app, _) = coordinator();
        let now = Utc::now();
        let deck = app.create_deck("Spanish").unwrap();
        app.add_card(deck.id, CardDraft::new("gato", "cat")).unwrap();
        app.set_search_query("gat", now);
        app.poll(now + Duration::seconds(1));

        app.add_card(deck.id, CardDraft::new("gatito", "kitten")).unwrap();
        assert_eq!(app.visible_cards().len(), 2);
    }

    #[test]
    fn study_keys_and_summary() {
        let (mut app, _) = coordinator();
        let now = Utc::now();
        let deck = app.create_deck("Spanish").unwrap();
        for (front, back) in [("uno", "one"), ("dos", "two"), ("tres", "three")] {
            app.add_card(deck.id, CardDraft::new(front, back)).unwrap();
        }

        app.handle_key(Key::Char('s'), now);
        assert_eq!(app.input_mode(), InputMode::Study);
        app.handle_key(Key::Right, now);
        app.handle_key(Key::Space, now);
        assert!(app.study().is_flipped());

        app.handle_key(Key::Esc, now + Duration::seconds(5));
        assert_eq!(app.input_mode(), InputMode::Normal);
        let summary = app.last_summary().unwrap();
        assert_eq!(summary.cards_visited, 2);
        assert_eq!(summary.elapsed_seconds, 5);
        assert!(app.take_dirty_views().grid);
    }

    #[test]
    fn study_hands_keys_back_before_the_grid_returns() {
        let (mut app, _) = coordinator();
        let now = Utc::now();
        let deck = app.create_deck("Animals").unwrap();
        app.add_card(deck.id, CardDraft::new("gato", "cat")).unwrap();
        let watcher = app.keys().clone();
        app.enter_study(now).unwrap();
        assert_eq!(watcher.active_owner(), Some(KeyOwner::Study));
        app.take_dirty_views();

        // finish_study asserts the release already happened.
        app.handle_key(Key::Esc, now);

        assert!(watcher.is_empty());
        assert_eq!(app.input_mode(), InputMode::Normal);
        let dirty = app.take_dirty_views();
        assert!(dirty.grid && dirty.study);
        assert!(app.compute_viewmodel(40, 120).study.is_none());
    }

    #[test]
    fn deleting_the_card_on_screen_keeps_study_showing_a_card() {
        let (mut app, _) = coordinator();
        let now = Utc::now();
        let deck = app.create_deck("Animals").unwrap();
        for front in ["gato", "perro", "pato"] {
            app.add_card(deck.id, CardDraft::new(front, "")).unwrap();
        }
        app.enter_study(now).unwrap();
        app.handle_key(Key::Right, now);
        app.handle_key(Key::Right, now);

        let last = app.registry.get_by_id(deck.id).unwrap().cards[2].id.clone();
        app.delete_card(deck.id, &last).unwrap();

        assert!(app.study.is_active());
        assert_eq!(app.study.position(), (1, 2));
        assert_eq!(app.study.current_card().map(|c| c.front.as_str()), Some("perro"));
        assert!(app.compute_viewmodel(40, 120).study.is_some());
    }

    #[test]
    fn studying_an_empty_deck_reports_status() {
        let (mut app, _) = coordinator();
        app.create_deck("Empty").unwrap();
        assert!(matches!(app.enter_study(Utc::now()), Err(FlashdeckError::EmptyDeck(1))));
        assert!(app.status().is_some());
        assert!(!app.study().is_active());
    }

    #[test]
    fn deleting_the_studied_deck_ends_study() {
        let (mut app, _) = coordinator();
        let deck = app.create_deck("Spanish").unwrap();
        app.add_card(deck.id, CardDraft::new("hola", "hello")).unwrap();
        app.enter_study(Utc::now()).unwrap();

        app.delete_deck(deck.id).unwrap();
        assert!(!app.study().is_active());
        assert!(app.keys.is_empty());
    }

    #[test]
    fn state_survives_restart() {
        let memory = MemoryStore::new();
        let store = || PersistentStore::new(Box::new(memory.clone()), SLOT, DEFAULT_MAX_SNAPSHOT_BYTES);

        let mut app = ViewCoordinator::new(store(), Theme::default(), 150);
        let deck = app.create_deck("Spanish").unwrap();
        app.add_card(deck.id, CardDraft::new("hola", "hello")).unwrap();
        let temp = app.create_deck("Temp").unwrap();
        app.delete_deck(temp.id).unwrap();

        let mut app = ViewCoordinator::new(store(), Theme::default(), 150);
        assert_eq!(app.registry().deck_count(), 1);
        assert_eq!(app.visible_cards().len(), 0);
        app.select_deck(deck.id).unwrap();
        assert_eq!(app.visible_cards()[0].front, "hola");
        assert!(app.create_deck("French").unwrap().id > deck.id);
    }
}
