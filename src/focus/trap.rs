//! Modal focus containment.
//!
//! While open, the trap owns the keyboard through a [`KeyToken`] and keeps
//! Tab/Shift+Tab cycling inside the modal region. Closing hands the keys
//! back first and defers focus restoration to the next tick.

use super::element::{focusable, ElementId};
use super::host::FocusHost;
use crate::input::{Key, KeyDispatcher, KeyDisposition, KeyOwner, KeyToken};

/// Work scheduled for the next tick instead of running synchronously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred {
    /// Give focus back to the element that opened a modal.
    RestoreFocus(ElementId),
}

impl Deferred {
    /// Runs the task against `host`.
    ///
    /// Restoration is skipped when the target has since been removed,
    /// hidden or disabled.
    pub fn run(self, host: &mut dyn FocusHost) {
        match self {
            Self::RestoreFocus(target) => {
                if host.can_receive_focus(&target) {
                    tracing::debug!(target = %target, "focus restored");
                    host.focus(&target);
                } else {
                    tracing::debug!(target = %target, "restore target gone, focus left in place");
                }
            }
        }
    }
}

/// Keeps keyboard focus inside a modal region while it is open.
///
/// # Lifecycle
///
/// ```text
///   Closed ──open()──▶ Open ──Tab/Shift+Tab──▶ Open
///     ▲                 │
///     └──close()/Esc────┘   (focus restore deferred to the next tick)
/// ```
#[derive(Debug, Default)]
pub struct FocusTrap {
    active: bool,
    restore_target: Option<ElementId>,
    token: Option<KeyToken>,
}

impl FocusTrap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub const fn restore_target(&self) -> Option<&ElementId> {
        self.restore_target.as_ref()
    }

    /// Shows the modal region and moves focus into it.
    ///
    /// `restore_target` defaults to the element focused when the call is
    /// made. Re-opening an open trap tears the previous one down first and
    /// keeps its original restore target, since the currently focused element
    /// is then inside the modal.
    pub fn open(
        &mut self,
        host: &mut dyn FocusHost,
        dispatcher: &mut KeyDispatcher,
        restore_target: Option<ElementId>,
    ) {
        let _span = tracing::debug_span!("focus_trap_open").entered();

        let inherited = if self.active {
            tracing::debug!("trap already open, closing previous instance");
            let previous = self.restore_target.clone();
            // The previous restore would pull focus out of the new modal.
            drop(self.close(host, dispatcher));
            previous
        } else {
            None
        };

        self.restore_target = restore_target.or(inherited).or_else(|| host.focused());
        host.show_region();

        let contained = focusable(host.contained_elements());
        self.active = true;
        self.token = Some(dispatcher.acquire(KeyOwner::FocusTrap));

        let initial = contained
            .iter()
            .find(|e| e.is_text_entry())
            .or_else(|| contained.first());
        match initial {
            Some(element) => host.focus(&element.id),
            None => host.focus_container(),
        }

        tracing::debug!(
            contained = contained.len(),
            restore_target = ?self.restore_target,
            "focus trap opened"
        );
    }

    /// Hides the modal region and schedules focus restoration.
    ///
    /// Key ownership is released before the region is hidden. Returns `None`
    /// when the trap was not open or nothing was focused when it opened.
    #[must_use = "the returned task restores focus and must be run on the next tick"]
    pub fn close(&mut self, host: &mut dyn FocusHost, dispatcher: &mut KeyDispatcher) -> Option<Deferred> {
        if !self.active {
            return None;
        }

        self.active = false;
        if let Some(token) = self.token.take() {
            dispatcher.release(token);
        }
        host.hide_region();

        tracing::debug!(restore_target = ?self.restore_target, "focus trap closed");
        self.restore_target.take().map(Deferred::RestoreFocus)
    }

    /// Handles a key press while the trap owns the keyboard.
    ///
    /// The contained set is recomputed on every call.
    pub fn handle_key(
        &mut self,
        host: &mut dyn FocusHost,
        dispatcher: &mut KeyDispatcher,
        key: Key,
    ) -> (KeyDisposition, Option<Deferred>) {
        if !self.active {
            return (KeyDisposition::Ignored, None);
        }
        if !self.token.as_ref().is_some_and(|t| dispatcher.is_active(t)) {
            return (KeyDisposition::Ignored, None);
        }

        match key {
            Key::Esc => {
                let deferred = self.close(host, dispatcher);
                (KeyDisposition::PreventDefault, deferred)
            }
            Key::Tab | Key::BackTab => (self.cycle(host, key == Key::BackTab), None),
            _ => (KeyDisposition::Default, None),
        }
    }

    fn cycle(&self, host: &mut dyn FocusHost, backwards: bool) -> KeyDisposition {
        let contained = focusable(host.contained_elements());
        let (Some(first), Some(last)) = (contained.first(), contained.last()) else {
            return KeyDisposition::PreventDefault;
        };

        let focused = host.focused();
        let position = focused
            .as_ref()
            .and_then(|id| contained.iter().position(|e| &e.id == id));

        let target = match position {
            // Focus has left the region (or was never in it): pull it back.
            None => Some(if backwards { last } else { first }),
            Some(0) if backwards => Some(last),
            Some(i) if !backwards && i + 1 == contained.len() => Some(first),
            Some(_) => None,
        };

        match target {
            Some(element) => {
                tracing::trace!(target = %element.id, backwards = backwards, "focus wrapped");
                host.focus(&element.id);
                KeyDisposition::PreventDefault
            }
            None => KeyDisposition::Default,
        }
    }
}
