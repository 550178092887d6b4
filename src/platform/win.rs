//! Windows mouse-move forwarding via a `WH_MOUSE_LL` hook.
//!
//! Must be driven from the main thread: a low-level hook is serviced by the
//! message loop of the thread that installed it.

use std::collections::HashMap;

use lazy_static::lazy_static;
use parking_lot::Mutex;
use pointer_passthrough::geometry::{make_lparam, Point, Rect};
use pointer_passthrough::{ForwardingRegistry, HookChange};
use tauri::WebviewWindow;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, POINT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::ScreenToClient;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, GetClientRect, GetWindow, SendMessageW, SetWindowsHookExW,
    UnhookWindowsHookEx, GW_CHILD, HHOOK, MSLLHOOKSTRUCT, WH_MOUSE_LL, WM_MOUSEMOVE,
};

use crate::error::{ClickThroughError, ClickThroughResult, ResultExt};

struct ForwardState {
    registry: ForwardingRegistry,
    /// Window label -> browser child HWND, for cleanup after destroy.
    labels: HashMap<String, isize>,
    /// Installed hook handle (stored as isize, HHOOK is not Send).
    hook: Option<isize>,
}

lazy_static! {
    static ref FORWARD_STATE: Mutex<ForwardState> = Mutex::new(ForwardState {
        registry: ForwardingRegistry::new(),
        labels: HashMap::new(),
        hook: None,
    });
}

/// The page lives two levels down: top-level -> webview host -> browser.
fn browser_hwnd(hwnd: HWND) -> ClickThroughResult<HWND> {
    unsafe {
        let host = GetWindow(hwnd, GW_CHILD).context("Failed to get webview host window")?;
        GetWindow(host, GW_CHILD).context("Failed to get browser window")
    }
}

/// Enable or disable mouse-move forwarding for `window`'s webview.
pub fn set_forward_mouse_messages(
    window: &WebviewWindow,
    forward: bool,
) -> ClickThroughResult<()> {
    let label = window.label().to_string();
    let hwnd = window.hwnd().context("Failed to get HWND")?;

    let mut state = FORWARD_STATE.lock();
    let browser = match browser_hwnd(HWND(hwnd.0)) {
        Ok(browser) => browser.0 as isize,
        // Turning forwarding off only needs the handle we stored earlier
        Err(_) if !forward => match state.labels.get(&label) {
            Some(raw) => *raw,
            None => return Ok(()),
        },
        Err(e) => return Err(e),
    };

    state.labels.insert(label, browser);
    let change = state.registry.set_forwarding(browser, forward);
    apply_hook_change(&mut state, change)
}

/// Stop forwarding to a window that is going away.
pub fn forget_window(label: &str) {
    let mut state = FORWARD_STATE.lock();
    let Some(browser) = state.labels.remove(label) else {
        return;
    };
    let change = state.registry.set_forwarding(browser, false);
    if let Err(e) = apply_hook_change(&mut state, change) {
        log::warn!("[FORWARD] Cleanup for '{}' failed: {}", label, e);
    }
}

fn apply_hook_change(state: &mut ForwardState, change: HookChange) -> ClickThroughResult<()> {
    match change {
        HookChange::Install => unsafe {
            match SetWindowsHookExW(WH_MOUSE_LL, Some(mousemove_forward), None, 0) {
                Ok(hook) => {
                    state.hook = Some(hook.0 as isize);
                    log::debug!("[FORWARD] Mouse hook installed");
                    Ok(())
                },
                Err(e) => {
                    state.registry.install_failed();
                    Err(ClickThroughError::WindowError(format!(
                        "Failed to install mouse hook: {}",
                        e
                    )))
                },
            }
        },
        HookChange::Uninstall => {
            if let Some(raw) = state.hook.take() {
                unsafe {
                    UnhookWindowsHookEx(HHOOK(raw as *mut _))
                        .context("Failed to remove mouse hook")?;
                }
                log::debug!("[FORWARD] Mouse hook removed");
            }
            Ok(())
        },
        HookChange::Unchanged => Ok(()),
    }
}

/// Re-send a mouse move to `hwnd` if the cursor is over its client area.
unsafe fn forward_to(hwnd: HWND, screen: POINT) {
    let mut client = RECT::default();
    if GetClientRect(hwnd, &mut client).is_err() {
        return;
    }

    let mut pt = screen;
    if !ScreenToClient(hwnd, &mut pt).as_bool() {
        return;
    }

    let client = Rect::new(client.left, client.top, client.right, client.bottom);
    if client.contains(Point::new(pt.x, pt.y)) {
        let _ = SendMessageW(
            hwnd,
            WM_MOUSEMOVE,
            WPARAM(1),
            LPARAM(make_lparam(pt.x, pt.y)),
        );
    }
}

unsafe extern "system" fn mousemove_forward(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code >= 0 && w_param.0 as u32 == WM_MOUSEMOVE {
        let info = &*(l_param.0 as *const MSLLHOOKSTRUCT);

        // Never block the input thread on the registry
        let targets = match FORWARD_STATE.try_lock() {
            Some(state) => state.registry.windows(),
            None => Vec::new(),
        };

        for raw in targets {
            forward_to(HWND(raw as *mut _), info.pt);
        }
    }

    CallNextHookEx(HHOOK::default(), n_code, w_param, l_param)
}
