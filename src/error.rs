//! Central error types for the click-through shell.
//!
//! All errors implement `Serialize` for Tauri IPC compatibility.

use pointer_passthrough::{BindingError, HostRequestError};
use serde::Serialize;
use thiserror::Error;

/// Main error type for shell operations.
#[derive(Error, Debug)]
pub enum ClickThroughError {
    /// The handle could not accept pointer listeners
    #[error("Binding error: {0}")]
    Binding(#[from] BindingError),

    /// The window refused a passthrough request
    #[error("Host request failed: {0}")]
    HostRequest(#[from] HostRequestError),

    /// No region registered under this handle
    #[error("Region not found: {handle}")]
    RegionNotFound { handle: String },

    /// No controller attached to this handle
    #[error("Passthrough not attached: {handle}")]
    NotAttached { handle: String },

    /// Window management error
    #[error("Window error: {0}")]
    WindowError(String),

    /// File system error (logging)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// Tauri requires errors to be serializable to send to the frontend.
impl Serialize for ClickThroughError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<tauri::Error> for ClickThroughError {
    fn from(err: tauri::Error) -> Self {
        ClickThroughError::WindowError(err.to_string())
    }
}

impl From<String> for ClickThroughError {
    fn from(msg: String) -> Self {
        ClickThroughError::Other(msg)
    }
}

impl From<&str> for ClickThroughError {
    fn from(msg: &str) -> Self {
        ClickThroughError::Other(msg.to_string())
    }
}

/// Extension trait for adding context to Results.
///
/// # Example
/// ```ignore
/// use crate::error::{ResultExt, ClickThroughResult};
///
/// fn hwnd_of(window: &WebviewWindow) -> ClickThroughResult<HWND> {
///     let hwnd = window.hwnd().context("failed to get HWND")?;
///     // ...
/// }
/// ```
pub trait ResultExt<T> {
    /// Add context to an error, converting it to ClickThroughError::Other.
    fn context(self, msg: &str) -> ClickThroughResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context(self, msg: &str) -> ClickThroughResult<T> {
        self.map_err(|e| ClickThroughError::Other(format!("{}: {}", msg, e)))
    }
}

/// Type alias for Results using ClickThroughError.
pub type ClickThroughResult<T> = Result<T, ClickThroughError>;
