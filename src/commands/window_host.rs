//! Production `PassthroughHost` backed by a Tauri webview window.

use std::sync::Arc;

use futures::channel::oneshot;
use futures::future::{self, BoxFuture};
use futures::FutureExt;
use pointer_passthrough::{
    effective_forward, HostRequestError, PassthroughHost, PassthroughRequest, Spawn,
};
use tauri::{AppHandle, Manager, WebviewWindow};

use crate::config::overlay::forward_mouse_moves;
use crate::error::ClickThroughResult;
use crate::platform;

/// Sends passthrough requests to the window with `label`.
///
/// The window is looked up on every request so a destroyed window turns
/// into `HostRequestError::WindowUnavailable` instead of a dangling handle.
pub struct TauriWindowHost {
    app: AppHandle,
    label: String,
}

impl TauriWindowHost {
    pub fn new(app: AppHandle, label: impl Into<String>) -> Self {
        Self {
            app,
            label: label.into(),
        }
    }
}

impl PassthroughHost for TauriWindowHost {
    /// Queues the request on the main thread before returning.
    ///
    /// Requests are applied in the order the controller emits them; only
    /// their completion is awaited on the spawner.
    fn set_ignore_cursor_events(
        &self,
        request: PassthroughRequest,
    ) -> BoxFuture<'static, Result<(), HostRequestError>> {
        let Some(window) = self.app.get_webview_window(&self.label) else {
            return future::ready(Err(HostRequestError::WindowUnavailable(self.label.clone())))
                .boxed();
        };

        let target = window.clone();
        queue_request(
            |task| window.run_on_main_thread(task),
            move || apply_passthrough(&target, request),
        )
    }
}

type QueuedTask = Box<dyn FnOnce() + Send>;

/// Hand `apply` to `enqueue` before returning and resolve with its result.
fn queue_request<Q, D, A>(
    enqueue: Q,
    apply: A,
) -> BoxFuture<'static, Result<(), HostRequestError>>
where
    Q: FnOnce(QueuedTask) -> Result<(), D>,
    D: std::fmt::Display,
    A: FnOnce() -> ClickThroughResult<()> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    let queued = enqueue(Box::new(move || {
        let _ = tx.send(apply());
    }));
    if let Err(e) = queued {
        return future::ready(Err(HostRequestError::Platform(e.to_string()))).boxed();
    }

    async move {
        match rx.await {
            Ok(result) => result.map_err(|e| HostRequestError::Platform(e.to_string())),
            Err(_) => Err(HostRequestError::Platform(
                "Main thread dropped passthrough request".to_string(),
            )),
        }
    }
    .boxed()
}

/// Detached tasks run on Tauri's async runtime.
pub fn tauri_spawner() -> Arc<dyn Spawn> {
    Arc::new(|task: BoxFuture<'static, ()>| {
        tauri::async_runtime::spawn(task);
    })
}

/// Whether the platform layer should forward mouse moves for `request`.
///
/// Forwarding needs the window to ignore cursor events, the request to ask
/// for it, and the user not to have turned it off.
pub fn platform_forward(request: PassthroughRequest, forward_mouse_moves: bool) -> bool {
    effective_forward(request.ignore, request.forward) && forward_mouse_moves
}

/// Toggle cursor-event ignoring and mouse-move forwarding for `window`.
///
/// Must run on the main thread, where the mouse hook lives. Forwarding is
/// enabled before the window turns click-through, so a forwarding failure
/// leaves the window capturing instead of ignoring with no leave event.
pub fn apply_passthrough(
    window: &WebviewWindow,
    request: PassthroughRequest,
) -> ClickThroughResult<()> {
    let forward = platform_forward(request, forward_mouse_moves());

    if !request.ignore {
        window.set_ignore_cursor_events(false)?;
        return platform::set_forward_mouse_messages(window, forward);
    }

    platform::set_forward_mouse_messages(window, forward)?;
    if let Err(e) = window.set_ignore_cursor_events(true) {
        if let Err(cleanup) = platform::set_forward_mouse_messages(window, false) {
            log::warn!(
                "[FORWARD] Could not stop forwarding for '{}': {}",
                window.label(),
                cleanup
            );
        }
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    use crate::error::ClickThroughError;

    #[test]
    fn test_requests_are_queued_in_call_order() {
        let queue: Arc<Mutex<Vec<QueuedTask>>> = Arc::default();
        let applied: Arc<Mutex<Vec<bool>>> = Arc::default();

        let mut pending = Vec::new();
        for ignore in [true, false] {
            let q = Arc::clone(&queue);
            let a = Arc::clone(&applied);
            pending.push(queue_request(
                move |task| {
                    q.lock().push(task);
                    Ok::<(), String>(())
                },
                move || {
                    a.lock().push(ignore);
                    Ok(())
                },
            ));
        }

        // Both are queued before either future is polled
        assert_eq!(queue.lock().len(), 2);
        assert!(applied.lock().is_empty());

        for task in std::mem::take(&mut *queue.lock()) {
            task();
        }
        assert_eq!(*applied.lock(), vec![true, false]);

        // Completion order does not matter
        for result in pending.into_iter().rev() {
            assert!(futures::executor::block_on(result).is_ok());
        }
    }

    #[test]
    fn test_queue_failures_surface_as_platform_errors() {
        let refused = queue_request(|_task| Err("event loop closed"), || Ok(()));
        let err = futures::executor::block_on(refused).unwrap_err();
        assert_eq!(err, HostRequestError::Platform("event loop closed".to_string()));

        let failed = queue_request(
            |task: QueuedTask| {
                task();
                Ok::<(), String>(())
            },
            || Err(ClickThroughError::WindowError("gone".to_string())),
        );
        let err = futures::executor::block_on(failed).unwrap_err();
        assert!(matches!(err, HostRequestError::Platform(ref msg) if msg.contains("gone")));

        let dropped = queue_request(
            |task: QueuedTask| {
                drop(task);
                Ok::<(), String>(())
            },
            || Ok(()),
        );
        assert!(futures::executor::block_on(dropped).is_err());
    }

    #[test]
    fn test_platform_forward_needs_every_input() {
        for ignore in [false, true] {
            for forward in [false, true] {
                for enabled in [false, true] {
                    let request = PassthroughRequest::new(ignore, forward);
                    assert_eq!(
                        platform_forward(request, enabled),
                        ignore && forward && enabled,
                        "ignore={ignore} forward={forward} enabled={enabled}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_config_off_disables_forwarding_while_ignoring() {
        let request = PassthroughRequest::new(true, true);
        assert!(platform_forward(request, true));
        assert!(!platform_forward(request, false));
    }
}
