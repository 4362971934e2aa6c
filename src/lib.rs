//! Flashdeck: a flashcard study plugin for Zellij.
//!
//! Flashdeck keeps decks of two-sided cards, lets you search them, flip them
//! in a grid, and study a deck one card at a time. State survives restarts
//! through a versioned JSON snapshot.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - ViewCoordinator, event handling, prompts         │
//! │  - Dirty tracking and view model computation        │
//! └─────────────────────────────────────────────────────┘
//!    │             │             │             │
//! ┌────────┐ ┌──────────┐ ┌──────────┐ ┌───────────────┐
//! │registry│ │ focus/   │ │ study/   │ │ search/       │
//! │ decks  │ │ input/   │ │ session  │ │ debounced     │
//! │ events │ │ trap,keys│ │          │ │ filtering     │
//! └────────┘ └──────────┘ └──────────┘ └───────────────┘
//!    │                                        │
//! ┌──────────────────────┐   ┌──────────────────────────┐
//! │ storage/             │   │ ui/                      │
//! │ snapshot, migration, │   │ document, components,    │
//! │ slot backends        │   │ themes                   │
//! └──────────────────────┘   └──────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  domain/ (types, errors) · infrastructure/ (paths)  │
//! │  observability/ (tracing to a JSON-lines file)      │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/flashdeck.wasm" {
//!         storage_slot "flashdeck-state"
//!         search_debounce_ms "150"
//!         max_snapshot_bytes "4194304"
//!         storage_quota_bytes "5242880"
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use flashdeck::domain::CardDraft;
//! use flashdeck::storage::MemoryStore;
//! use flashdeck::{initialize_with_store, Config};
//!
//! let mut app = initialize_with_store(&Config::default(), Box::new(MemoryStore::new()));
//! let deck = app.create_deck("Spanish")?;
//! app.add_card(deck.id, CardDraft::new("hola", "hello"))?;
//! app.enter_study(Utc::now())?;
//! assert_eq!(app.study().current_card().map(|c| c.front.as_str()), Some("hola"));
//! # Ok::<(), flashdeck::FlashdeckError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod focus;
pub mod infrastructure;
pub mod input;
pub mod registry;
pub mod search;
pub mod storage;
pub mod study;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, Event, InputMode, ViewCoordinator};
pub use domain::{FlashdeckError, Result};
pub use ui::Theme;

use search::DEFAULT_DEBOUNCE_MS;
use std::collections::BTreeMap;
use storage::{FileSlotStore, KeyValueStore, PersistentStore, DEFAULT_MAX_SNAPSHOT_BYTES};

/// Slot name used when none is configured.
pub const DEFAULT_STORAGE_SLOT: &str = "flashdeck-state";

/// Plugin configuration parsed from Zellij's plugin options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Storage slot holding the snapshot. Default: `flashdeck-state`.
    pub storage_slot: String,

    /// Search debounce window in milliseconds. Default: 150.
    pub search_debounce_ms: u64,

    /// Snapshots larger than this are not written. Default: 4 MiB.
    pub max_snapshot_bytes: usize,

    /// Optional cap on a single slot, enforced by the file backend.
    pub storage_quota_bytes: Option<usize>,

    /// Built-in theme name. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a TOML theme file; `~` maps to the sandbox home.
    pub theme_file: Option<String>,

    /// `trace`, `debug`, `info`, `warn` or `error`. Default: `info`.
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_slot: DEFAULT_STORAGE_SLOT.to_string(),
            search_debounce_ms: DEFAULT_DEBOUNCE_MS,
            max_snapshot_bytes: DEFAULT_MAX_SNAPSHOT_BYTES,
            storage_quota_bytes: None,
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses the option map Zellij passes to `load`.
    ///
    /// Unparseable numbers fall back to their defaults; a blank slot name
    /// falls back to `flashdeck-state`.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use flashdeck::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("search_debounce_ms".to_string(), "300".to_string());
    /// map.insert("storage_quota_bytes".to_string(), "lots".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.search_debounce_ms, 300);
    /// assert_eq!(config.storage_quota_bytes, None);
    /// assert_eq!(config.storage_slot, "flashdeck-state");
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let number = |key: &str| config.get(key).and_then(|s| s.trim().parse::<usize>().ok());

        let storage_slot = config
            .get("storage_slot")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map_or(defaults.storage_slot, String::from);

        Self {
            storage_slot,
            search_debounce_ms: config
                .get("search_debounce_ms")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(defaults.search_debounce_ms),
            max_snapshot_bytes: number("max_snapshot_bytes").unwrap_or(defaults.max_snapshot_bytes),
            storage_quota_bytes: number("storage_quota_bytes"),
            theme_name: config.get("theme").cloned(),
            theme_file: config.get("theme_file").cloned(),
            trace_level: config.get("trace_level").cloned(),
        }
    }

    /// Resolves the configured theme: file first, then name, then default.
    #[must_use]
    pub fn theme(&self) -> Theme {
        if let Some(theme_file) = &self.theme_file {
            let path = infrastructure::expand_tilde(theme_file);
            match Theme::from_file(&path) {
                Ok(theme) => return theme,
                Err(e) => tracing::warn!(theme_file = %path, error = %e, "failed to load theme file, using default"),
            }
        }

        self.theme_name.as_deref().map_or_else(Theme::default, |name| {
            Theme::from_name(name).unwrap_or_else(|| {
                tracing::warn!(theme_name = %name, "unknown theme, using default");
                Theme::default()
            })
        })
    }
}

/// Builds the coordinator over the file slot store in the plugin data
/// directory.
#[must_use]
pub fn initialize(config: &Config) -> ViewCoordinator {
    let backend = FileSlotStore::new(infrastructure::get_data_dir()).with_quota(config.storage_quota_bytes);
    initialize_with_store(config, Box::new(backend))
}

/// Builds the coordinator over any slot backend.
#[must_use]
pub fn initialize_with_store(config: &Config, backend: Box<dyn KeyValueStore>) -> ViewCoordinator {
    let _span = tracing::debug_span!("initialize", slot = %config.storage_slot).entered();

    let store = PersistentStore::new(backend, config.storage_slot.clone(), config.max_snapshot_bytes);
    ViewCoordinator::new(store, config.theme(), config.search_debounce_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_map_yields_defaults() {
        assert_eq!(Config::from_zellij(&BTreeMap::new()), Config::default());
    }

    #[test]
    fn parses_every_option() {
        let map: BTreeMap<String, String> = [
            ("storage_slot", "cards"),
            ("search_debounce_ms", "50"),
            ("max_snapshot_bytes", "1024"),
            ("storage_quota_bytes", "2048"),
            ("theme", "gruvbox-dark"),
            ("trace_level", "debug"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = Config::from_zellij(&map);
        assert_eq!(config.storage_slot, "cards");
        assert_eq!(config.search_debounce_ms, 50);
        assert_eq!(config.max_snapshot_bytes, 1024);
        assert_eq!(config.storage_quota_bytes, Some(2048));
        assert_eq!(config.theme().name, "gruvbox-dark");
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
    }

    #[test]
    fn bad_theme_settings_fall_back_to_default() {
        let config = Config {
            theme_name: Some("neon".to_string()),
            theme_file: Some("/no/such/theme.toml".to_string()),
            ..Config::default()
        };
        assert_eq!(config.theme().name, "catppuccin-mocha");
    }
}
