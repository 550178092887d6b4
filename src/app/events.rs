//! Window event handlers.

use tauri::{Manager, Window, WindowEvent};

use crate::commands::passthrough::PassthroughRegistry;
use crate::platform;

/// Handle window events for the application.
///
/// This is called from the Tauri builder's `on_window_event` hook.
pub fn handle_window_event(window: &Window, event: &WindowEvent) {
    if let WindowEvent::Destroyed = event {
        let label = window.label();

        // Controllers of a destroyed window would only produce
        // WindowUnavailable errors from here on
        if let Some(registry) = window.app_handle().try_state::<PassthroughRegistry>() {
            let detached = registry.detach_window(label);
            if detached > 0 {
                log::debug!(
                    "[PASSTHROUGH] Detached {} handle(s) of destroyed window '{}'",
                    detached,
                    label
                );
            }
        }

        platform::forget_window(label);
    }
}
