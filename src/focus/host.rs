//! The seam between the focus trap and whatever draws the modal.

use super::element::{Element, ElementId};

/// The document a [`FocusTrap`](super::FocusTrap) operates on.
///
/// Implemented by the rendered view. Everything the trap needs is queried on
/// demand, so elements added, removed, disabled or hidden while the modal is
/// open are picked up on the next key press.
pub trait FocusHost {
    /// Every element inside the modal region, in document order, regardless
    /// of eligibility.
    fn contained_elements(&self) -> Vec<Element>;

    /// The element that currently has focus, if any.
    fn focused(&self) -> Option<ElementId>;

    /// Moves focus to `id`.
    fn focus(&mut self, id: &ElementId);

    /// Moves focus to the modal region itself.
    fn focus_container(&mut self);

    /// Whether `id` is still attached, visible and enabled.
    fn can_receive_focus(&self, id: &ElementId) -> bool;

    fn show_region(&mut self);

    fn hide_region(&mut self);
}
