//! Terminal user interface.
//!
//! ```text
//! ViewCoordinator → compute_viewmodel → UIViewModel → render → ANSI frame
//! ```
//!
//! # Modules
//!
//! - [`document`]: Focusable element inventory standing in for a DOM
//! - [`viewmodel`]: Display-ready view model types
//! - [`renderer`]: Frame rendering entry point
//! - [`components`]: Component renderers
//! - [`helpers`]: Cursor, truncation and highlight utilities
//! - [`theme`]: Palettes and ANSI color sequences

pub mod components;
pub mod document;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use document::{Document, Target};
pub use renderer::{render, render_viewmodel};
pub use theme::Theme;
pub use viewmodel::{
    CardItem, DeckItem, EmptyState, FooterInfo, HeaderInfo, ModalView, SearchBarInfo, StudyView,
    ToolbarButton, UIViewModel,
};
