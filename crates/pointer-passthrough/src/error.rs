//! Errors surfaced by the passthrough core.

use thiserror::Error;

/// A handle could not accept pointer listener registrations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// The region has been unmounted.
    #[error("Region '{region}' is not mounted")]
    Unmounted { region: String },

    /// The target refused the registration for another reason.
    #[error("Listener registration rejected: {0}")]
    Rejected(String),
}

/// The host failed a `set_ignore_cursor_events` request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostRequestError {
    /// The target window no longer exists.
    #[error("Window '{0}' is unavailable")]
    WindowUnavailable(String),

    /// The windowing system rejected the call.
    #[error("Platform error: {0}")]
    Platform(String),
}
