//! Modal focus containment.
//!
//! While a modal is open, Tab and Shift+Tab cycle through the modal's own
//! focusable elements only, Escape closes it, and focus goes back to whatever
//! opened the modal once it is hidden.
//!
//! # Modules
//!
//! - `element`: Element inventory and the focus eligibility filter
//! - `host`: The [`FocusHost`] capability implemented by the rendered document
//! - `trap`: The [`FocusTrap`] state machine

pub mod element;
pub mod host;
pub mod trap;

pub use element::{focusable, Element, ElementId, ElementKind, Visibility};
pub use host::FocusHost;
pub use trap::{Deferred, FocusTrap};
