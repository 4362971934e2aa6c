//! Zellij plugin wrapper and entry point.
//!
//! Thin integration layer between the Flashdeck library and the Zellij
//! plugin system. It implements `ZellijPlugin`, decodes host events into
//! library [`Event`]s, and executes the [`Action`]s the library returns.
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, request filesystem access
//! 2. **Permission granted**: Load the stored snapshot from the data directory
//! 3. **Update**: Translate keys and timers, delegate to `handle_event`
//! 4. **Render**: Print the frame built by the library renderer
//!
//! # Event Mapping
//!
//! - `Key(Tab)` with Shift → `Key::BackTab`
//! - `Key(Char(' '))` → `Key::Space`
//! - other supported keys map one-to-one
//! - `Timer` → `Event::Tick`
//!
//! # Keybindings
//!
//! In normal mode:
//! - `Tab`/`Shift+Tab`: Move focus
//! - `j`/`Down`, `k`/`Up`: Move between decks or cards
//! - `Enter`: Activate the focused element
//! - `Space`: Flip the focused card
//! - `n`: New deck, `r`: Rename deck, `d`: Delete deck
//! - `a`: Add card, `e`: Edit card, `x`: Delete card
//! - `s`: Study the selected deck
//! - `/`: Search
//! - `q`: Close plugin
//!
//! In study mode:
//! - `Space`: Flip, `Right`: Next, `Left`: Previous
//! - `Esc`: Leave study mode

#![allow(clippy::multiple_crate_versions)]

#[cfg(target_arch = "wasm32")]
use zellij_tile::prelude::*;

#[cfg(target_arch = "wasm32")]
register_plugin!(plugin::State);

#[cfg(target_arch = "wasm32")]
mod plugin {
    use std::collections::BTreeMap;
    use zellij_tile::prelude::*;

    use chrono::Utc;
    use flashdeck::input::Key;
    use flashdeck::{handle_event, Action, Config, Event, ViewCoordinator};

    /// Plugin state wrapper.
    ///
    /// Holds the library coordinator plus the parsed configuration, which is
    /// needed again once storage becomes reachable.
    pub struct State {
        app: ViewCoordinator,
        config: Config,
        /// Set once filesystem access is granted and the snapshot is loaded.
        ready: bool,
    }

    impl Default for State {
        fn default() -> Self {
            let config = Config::default();
            Self {
                app: flashdeck::initialize_with_store(&config, Box::new(flashdeck::storage::MemoryStore::new())),
                config,
                ready: false,
            }
        }
    }

    impl ZellijPlugin for State {
        /// Initializes the plugin on load.
        ///
        /// # Permissions
        ///
        /// Requests `FullHdAccess` so the snapshot can live under the host
        /// data directory.
        ///
        /// # Subscriptions
        ///
        /// - `Key`: Keyboard input
        /// - `Timer`: Deferred focus restore and search debounce
        /// - `PermissionRequestResult`: Storage becomes available
        fn load(&mut self, configuration: BTreeMap<String, String>) {
            self.config = Config::from_zellij(&configuration);
            flashdeck::observability::init_tracing(&self.config);

            let _guard = tracing::debug_span!("plugin_load").entered();
            tracing::debug!(slot = %self.config.storage_slot, "parsed configuration");

            request_permission(&[PermissionType::FullHdAccess]);
            subscribe(&[EventType::Key, EventType::Timer, EventType::PermissionRequestResult]);

            tracing::debug!("plugin load complete - waiting for permissions");
        }

        /// Handles incoming Zellij events and returns whether to re-render.
        fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
            let event = match event {
                zellij_tile::prelude::Event::PermissionRequestResult(status) => {
                    return self.on_permission(status);
                }
                zellij_tile::prelude::Event::Key(key) if self.ready => match Self::map_key(&key) {
                    Some(key) => Event::Key(key),
                    None => return false,
                },
                zellij_tile::prelude::Event::Timer(_) => Event::Tick,
                _ => return false,
            };

            let (should_render, actions) = handle_event(&mut self.app, &event, Utc::now());
            for action in &actions {
                Self::execute_action(action);
            }
            should_render
        }

        fn render(&mut self, rows: usize, cols: usize) {
            print!("{}", flashdeck::ui::render(&self.app, rows, cols));
        }
    }

    impl State {
        fn on_permission(&mut self, status: PermissionStatus) -> bool {
            match status {
                PermissionStatus::Granted => {
                    tracing::debug!("permissions granted, loading decks");
                    self.app = flashdeck::initialize(&self.config);
                    self.ready = true;
                    true
                }
                PermissionStatus::Denied => {
                    tracing::warn!("filesystem access denied, decks will not be saved");
                    self.app = flashdeck::initialize_with_store(
                        &self.config,
                        Box::new(flashdeck::storage::MemoryStore::new()),
                    );
                    self.ready = true;
                    true
                }
            }
        }

        /// Decodes a Zellij key; keys with Ctrl or Alt are not ours.
        fn map_key(key: &KeyWithModifier) -> Option<Key> {
            if key.key_modifiers.contains(&KeyModifier::Ctrl) || key.key_modifiers.contains(&KeyModifier::Alt) {
                return None;
            }

            let shift = key.key_modifiers.contains(&KeyModifier::Shift);
            let mapped = match key.bare_key {
                BareKey::Tab if shift => Key::BackTab,
                BareKey::Tab => Key::Tab,
                BareKey::Enter => Key::Enter,
                BareKey::Esc => Key::Esc,
                BareKey::Left => Key::Left,
                BareKey::Right => Key::Right,
                BareKey::Up => Key::Up,
                BareKey::Down => Key::Down,
                BareKey::Backspace => Key::Backspace,
                BareKey::Char(' ') => Key::Space,
                BareKey::Char(c) => Key::Char(c),
                _ => return None,
            };
            Some(mapped)
        }

        #[tracing::instrument(level = "debug")]
        fn execute_action(action: &Action) {
            match *action {
                Action::CloseFocus => hide_self(),
                Action::ScheduleTick { after_secs } => set_timeout(after_secs),
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("flashdeck is a Zellij plugin; build it for wasm32-wasip1 and load the .wasm from a layout");
}
