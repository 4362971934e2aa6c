//! Application layer coordinating the registry, focus, study and views.
//!
//! This layer sits between the plugin runtime (`main.rs`) and the domain,
//! storage and UI layers. Data flows one way:
//!
//! ```text
//! Key/Tick → handle_event → ViewCoordinator → DeckRegistry ─┐
//!                               ▲                          │ events
//!                               └──── ViewTracker ◀────────┘
//!                                          │
//!                          dirty views → render, snapshot → store
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effects requested from the runtime
//! - [`coordinator`]: The [`ViewCoordinator`] owning all stateful components
//! - [`handler`]: Event entry point
//! - [`modes`]: Input mode derived from key ownership
//! - [`prompt`]: Modal text prompts
//! - [`state`]: Dirty tracking and view model computation

pub mod actions;
pub mod coordinator;
pub mod handler;
pub mod modes;
pub mod prompt;
pub mod state;

pub use actions::Action;
pub use coordinator::ViewCoordinator;
pub use handler::{handle_event, Event};
pub use modes::InputMode;
pub use prompt::{Prompt, PromptKind, PromptOutcome};
pub use state::{DirtyViews, ViewTracker};
