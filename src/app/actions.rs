//! Side effects requested from the plugin runtime.
//!
//! The event handler never calls host APIs itself. It returns [`Action`]s
//! that the shim in `main.rs` executes after each event.

/// Commands executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Requests a `Timer` event after the given delay.
    ///
    /// Used for the next-tick focus restore (zero delay) and for the search
    /// debounce window.
    ScheduleTick {
        /// Delay in seconds.
        after_secs: f64,
    },
}
