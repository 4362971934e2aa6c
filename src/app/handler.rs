//! Event handling entry point for the plugin runtime.
//!
//! The shim in `main.rs` translates host events into [`Event`]s and calls
//! [`handle_event`], which forwards them to the [`ViewCoordinator`] and
//! answers with a render decision plus the [`Action`]s to execute.
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use flashdeck::app::{handle_event, Action, Event, ViewCoordinator};
//! use flashdeck::input::Key;
//! use flashdeck::storage::{MemoryStore, PersistentStore, DEFAULT_MAX_SNAPSHOT_BYTES};
//! use flashdeck::ui::Theme;
//!
//! let store = PersistentStore::new(Box::new(MemoryStore::new()), "demo", DEFAULT_MAX_SNAPSHOT_BYTES);
//! let mut app = ViewCoordinator::new(store, Theme::default(), 150);
//!
//! let (_, actions) = handle_event(&mut app, &Event::Key(Key::Char('q')), Utc::now());
//! assert_eq!(actions, vec![Action::CloseFocus]);
//! ```

use crate::app::{Action, InputMode, ViewCoordinator};
use crate::input::Key;
use chrono::{DateTime, Utc};

/// Events delivered by the plugin runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A key press.
    Key(Key),
    /// A timer scheduled through [`Action::ScheduleTick`] fired.
    Tick,
}

/// Processes an event and returns `(should_render, actions)`.
///
/// Rendering is requested only when some view went dirty. A
/// [`Action::ScheduleTick`] is emitted whenever deferred work or a pending
/// search needs a later callback.
pub fn handle_event(app: &mut ViewCoordinator, event: &Event, now: DateTime<Utc>) -> (bool, Vec<Action>) {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    let mut actions = Vec::new();
    match *event {
        Event::Key(Key::Char('q')) if app.input_mode() == InputMode::Normal => {
            tracing::debug!("close requested");
            actions.push(Action::CloseFocus);
        }
        Event::Key(key) => {
            let disposition = app.handle_key(key, now);
            tracing::trace!(disposition = ?disposition, "key handled");
        }
        Event::Tick => app.tick(now),
    }

    if let Some(after_secs) = app.next_tick_in(now) {
        actions.push(Action::ScheduleTick { after_secs });
    }

    let dirty = app.take_dirty_views();
    tracing::trace!(dirty = ?dirty, "event processed");
    (!dirty.is_empty(), actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, PersistentStore, DEFAULT_MAX_SNAPSHOT_BYTES};
    use crate::ui::Theme;
    use chrono::Duration;

    fn app() -> ViewCoordinator {
        let store = PersistentStore::new(Box::new(MemoryStore::new()), "test", DEFAULT_MAX_SNAPSHOT_BYTES);
        let mut app = ViewCoordinator::new(store, Theme::default(), 150);
        app.take_dirty_views();
        app
    }

    #[test]
    fn q_closes_only_in_normal_mode() {
        let mut app = app();
        let now = Utc::now();

        let (render, actions) = handle_event(&mut app, &Event::Key(Key::Char('q')), now);
        assert!(!render);
        assert_eq!(actions, vec![Action::CloseFocus]);

        handle_event(&mut app, &Event::Key(Key::Char('n')), now);
        let (render, actions) = handle_event(&mut app, &Event::Key(Key::Char('q')), now);
        assert!(render);
        assert!(actions.is_empty());
        assert_eq!(app.prompt().map(|p| p.value.as_str()), Some("q"));
    }

    #[test]
    fn cancelled_prompt_schedules_an_immediate_tick() {
        let mut app = app();
        let now = Utc::now();
        app.create_deck("Spanish").unwrap();

        handle_event(&mut app, &Event::Key(Key::Char('r')), now);
        let (render, actions) = handle_event(&mut app, &Event::Key(Key::Esc), now);
        assert!(render);
        assert_eq!(actions, vec![Action::ScheduleTick { after_secs: 0.0 }]);

        let (render, actions) = handle_event(&mut app, &Event::Tick, now);
        assert!(render);
        assert!(actions.is_empty());
        assert!(!app.has_deferred());
    }

    #[test]
    fn search_typing_schedules_the_debounce_window() {
        let mut app = app();
        let now = Utc::now();
        app.create_deck("Spanish").unwrap();

        handle_event(&mut app, &Event::Key(Key::Char('/')), now);
        let (_, actions) = handle_event(&mut app, &Event::Key(Key::Char('h')), now);
        assert_eq!(actions, vec![Action::ScheduleTick { after_secs: 0.15 }]);

        let (_, actions) = handle_event(&mut app, &Event::Tick, now + Duration::milliseconds(150));
        assert!(actions.is_empty());
        assert_eq!(app.search_query(), "h");
    }

    #[test]
    fn unchanged_state_skips_render() {
        let mut app = app();
        let (render, actions) = handle_event(&mut app, &Event::Tick, Utc::now());
        assert!(!render);
        assert!(actions.is_empty());
    }
}
