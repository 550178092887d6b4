use tauri::WebviewWindow;

use crate::error::ClickThroughResult;

pub fn set_forward_mouse_messages(
    window: &WebviewWindow,
    forward: bool,
) -> ClickThroughResult<()> {
    log::debug!(
        "[FORWARD] Mouse-move forwarding unsupported on this platform (window '{}', forward={})",
        window.label(),
        forward
    );
    Ok(())
}

pub fn forget_window(_label: &str) {}
