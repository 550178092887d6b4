//! Platform side of mouse-move forwarding.
//!
//! A window that ignores cursor events stops receiving mouse moves, so the
//! page would never notice the pointer leaving the handle. On Windows a
//! low-level mouse hook re-sends `WM_MOUSEMOVE` to the webview while
//! forwarding is on. Other platforms have no equivalent yet.

#[cfg(target_os = "windows")]
mod win;

#[cfg(target_os = "windows")]
pub use win::{forget_window, set_forward_mouse_messages};

#[cfg(not(target_os = "windows"))]
mod fallback;

#[cfg(not(target_os = "windows"))]
pub use fallback::{forget_window, set_forward_mouse_messages};
