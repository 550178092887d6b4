//! Passthrough commands.
//!
//! The frontend registers its handle element as a region, forwards the
//! element's `mouseenter` / `mouseleave` through `pointer_event`, and the
//! attached controller asks the calling window to toggle click-through.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use pointer_passthrough::{
    PassthroughHost, PassthroughRequest, PassthroughState, PointerEvent,
    PointerPassthroughController, Region, Spawn,
};
use tauri::{command, AppHandle, State, WebviewWindow};

use super::logging::LogLevel;
use super::window_host::{apply_passthrough, tauri_spawner, TauriWindowHost};
use crate::app_log;
use crate::config::overlay::auto_attach;
use crate::error::{ClickThroughError, ClickThroughResult};

struct Attachment {
    window: String,
    controller: PointerPassthroughController,
}

/// Regions and their controllers, keyed by handle id.
pub struct PassthroughRegistry {
    regions: Mutex<HashMap<String, Arc<Region>>>,
    attachments: Mutex<HashMap<String, Attachment>>,
}

impl Default for PassthroughRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PassthroughRegistry {
    pub fn new() -> Self {
        Self {
            regions: Mutex::new(HashMap::new()),
            attachments: Mutex::new(HashMap::new()),
        }
    }

    /// Create the region for `handle`, or remount the existing one.
    pub fn register_region(&self, handle: &str) -> Arc<Region> {
        let mut regions = self.regions.lock();
        let region = regions
            .entry(handle.to_string())
            .or_insert_with(|| Arc::new(Region::new(handle)));
        region.mount();
        Arc::clone(region)
    }

    /// Detach, unmount and forget the region. Returns false if unknown.
    pub fn unregister_region(&self, handle: &str) -> bool {
        if let Some(mut attachment) = self.attachments.lock().remove(handle) {
            attachment.controller.detach();
        }

        match self.regions.lock().remove(handle) {
            Some(region) => {
                region.unmount();
                true
            },
            None => false,
        }
    }

    /// Bind a new controller for `window` to the region of `handle`.
    ///
    /// Replaces any controller already attached to that handle.
    pub fn attach(
        &self,
        handle: &str,
        window: &str,
        host: Arc<dyn PassthroughHost>,
        spawner: Arc<dyn Spawn>,
    ) -> ClickThroughResult<()> {
        let region = self.region(handle)?;

        let mut controller = PointerPassthroughController::new(host, spawner);
        let source = handle.to_string();
        controller.set_error_callback(move |e| {
            app_log!(LogLevel::Warn, "passthrough", "'{}' host request failed: {}", source, e);
        });
        controller.attach(region)?;

        // A replaced controller detaches when dropped
        self.attachments.lock().insert(
            handle.to_string(),
            Attachment {
                window: window.to_string(),
                controller,
            },
        );

        app_log!(
            LogLevel::Info,
            "passthrough",
            "Attached '{}' to window '{}'",
            handle,
            window
        );
        Ok(())
    }

    pub fn detach(&self, handle: &str) -> ClickThroughResult<()> {
        let mut attachment = self.attachments.lock().remove(handle).ok_or_else(|| {
            ClickThroughError::NotAttached {
                handle: handle.to_string(),
            }
        })?;
        attachment.controller.detach();

        app_log!(LogLevel::Info, "passthrough", "Detached '{}'", handle);
        Ok(())
    }

    /// Detach every controller bound to `window`. Returns how many.
    pub fn detach_window(&self, window: &str) -> usize {
        let mut attachments = self.attachments.lock();
        let handles: Vec<String> = attachments
            .iter()
            .filter(|(_, a)| a.window == window)
            .map(|(h, _)| h.clone())
            .collect();

        for handle in &handles {
            if let Some(mut attachment) = attachments.remove(handle) {
                attachment.controller.detach();
            }
        }
        handles.len()
    }

    /// Deliver a pointer event to the region of `handle`.
    pub fn dispatch(&self, handle: &str, event: PointerEvent) -> ClickThroughResult<usize> {
        let region = self.region(handle)?;
        Ok(region.dispatch(event))
    }

    pub fn state(&self, handle: &str) -> ClickThroughResult<PassthroughState> {
        self.attachments
            .lock()
            .get(handle)
            .map(|a| a.controller.state())
            .ok_or_else(|| ClickThroughError::NotAttached {
                handle: handle.to_string(),
            })
    }

    fn region(&self, handle: &str) -> ClickThroughResult<Arc<Region>> {
        self.regions
            .lock()
            .get(handle)
            .cloned()
            .ok_or_else(|| ClickThroughError::RegionNotFound {
                handle: handle.to_string(),
            })
    }
}

fn attach_to_window(
    app: &AppHandle,
    window: &WebviewWindow,
    registry: &PassthroughRegistry,
    handle: &str,
) -> ClickThroughResult<()> {
    let host = Arc::new(TauriWindowHost::new(app.clone(), window.label()));
    registry.attach(handle, window.label(), host, tauri_spawner())
}

// ============================================================================
// Tauri Commands
// ============================================================================

/// Raw host request for the calling window.
#[command]
pub fn set_ignore_cursor_events(
    window: WebviewWindow,
    ignore: bool,
    forward: bool,
) -> ClickThroughResult<()> {
    apply_passthrough(&window, PassthroughRequest::new(ignore, forward))
}

#[command]
pub fn register_region(
    app: AppHandle,
    window: WebviewWindow,
    registry: State<'_, PassthroughRegistry>,
    handle: String,
) -> ClickThroughResult<()> {
    registry.register_region(&handle);
    log::debug!("[REGION] Registered '{}' for window '{}'", handle, window.label());

    if auto_attach() {
        attach_to_window(&app, &window, &registry, &handle)?;
    }
    Ok(())
}

#[command]
pub fn unregister_region(registry: State<'_, PassthroughRegistry>, handle: String) -> bool {
    registry.unregister_region(&handle)
}

#[command]
pub fn attach_passthrough(
    app: AppHandle,
    window: WebviewWindow,
    registry: State<'_, PassthroughRegistry>,
    handle: String,
) -> ClickThroughResult<()> {
    attach_to_window(&app, &window, &registry, &handle)
}

#[command]
pub fn detach_passthrough(
    registry: State<'_, PassthroughRegistry>,
    handle: String,
) -> ClickThroughResult<()> {
    registry.detach(&handle)
}

/// Forward a DOM `mouseenter` / `mouseleave` on the handle.
#[command]
pub fn pointer_event(
    registry: State<'_, PassthroughRegistry>,
    handle: String,
    event: PointerEvent,
) -> ClickThroughResult<()> {
    registry.dispatch(&handle, event)?;
    Ok(())
}

#[command]
pub fn get_passthrough_state(
    registry: State<'_, PassthroughRegistry>,
    handle: String,
) -> ClickThroughResult<PassthroughState> {
    registry.state(&handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use pointer_passthrough::HostRequestError;

    #[derive(Default)]
    struct RecordingHost {
        calls: Mutex<Vec<PassthroughRequest>>,
    }

    impl PassthroughHost for RecordingHost {
        fn set_ignore_cursor_events(
            &self,
            request: PassthroughRequest,
        ) -> BoxFuture<'static, Result<(), HostRequestError>> {
            self.calls.lock().push(request);
            async { Ok(()) }.boxed()
        }
    }

    fn inline_spawner() -> Arc<dyn Spawn> {
        Arc::new(|task: BoxFuture<'static, ()>| futures::executor::block_on(task))
    }

    fn attached(registry: &PassthroughRegistry, handle: &str, window: &str) -> Arc<RecordingHost> {
        let host = Arc::new(RecordingHost::default());
        registry.register_region(handle);
        registry
            .attach(handle, window, host.clone(), inline_spawner())
            .unwrap();
        host
    }

    #[test]
    fn test_enter_leave_through_registry() {
        let registry = PassthroughRegistry::new();
        let host = attached(&registry, "click-through", "main");

        assert_eq!(registry.state("click-through").unwrap(), PassthroughState::NotIgnoring);

        assert_eq!(registry.dispatch("click-through", PointerEvent::Enter).unwrap(), 1);
        assert_eq!(registry.state("click-through").unwrap(), PassthroughState::Ignoring);

        registry.dispatch("click-through", PointerEvent::Leave).unwrap();
        assert_eq!(registry.state("click-through").unwrap(), PassthroughState::NotIgnoring);

        assert_eq!(
            *host.calls.lock(),
            vec![PassthroughRequest::new(true, true), PassthroughRequest::new(false, true)]
        );
    }

    #[test]
    fn test_unknown_region() {
        let registry = PassthroughRegistry::new();
        let host = Arc::new(RecordingHost::default());

        let err = registry
            .attach("missing", "main", host, inline_spawner())
            .unwrap_err();
        assert!(matches!(err, ClickThroughError::RegionNotFound { .. }));

        let err = registry.dispatch("missing", PointerEvent::Enter).unwrap_err();
        assert!(matches!(err, ClickThroughError::RegionNotFound { .. }));
    }

    #[test]
    fn test_detach_stops_requests() {
        let registry = PassthroughRegistry::new();
        let host = attached(&registry, "click-through", "main");

        registry.detach("click-through").unwrap();
        assert_eq!(registry.dispatch("click-through", PointerEvent::Enter).unwrap(), 0);
        assert!(host.calls.lock().is_empty());

        let err = registry.detach("click-through").unwrap_err();
        assert!(matches!(err, ClickThroughError::NotAttached { .. }));
        assert!(registry.state("click-through").is_err());
    }

    #[test]
    fn test_reattach_replaces_controller() {
        let registry = PassthroughRegistry::new();
        let first = attached(&registry, "click-through", "main");
        let second = Arc::new(RecordingHost::default());
        registry
            .attach("click-through", "main", second.clone(), inline_spawner())
            .unwrap();

        // Only the new controller reacts
        assert_eq!(registry.dispatch("click-through", PointerEvent::Enter).unwrap(), 1);
        assert!(first.calls.lock().is_empty());
        assert_eq!(second.calls.lock().len(), 1);
    }

    #[test]
    fn test_unregister_region() {
        let registry = PassthroughRegistry::new();
        let host = attached(&registry, "click-through", "main");

        assert!(registry.unregister_region("click-through"));
        assert!(!registry.unregister_region("click-through"));

        assert!(registry.dispatch("click-through", PointerEvent::Enter).is_err());
        assert!(host.calls.lock().is_empty());
    }

    #[test]
    fn test_register_region_remounts() {
        let registry = PassthroughRegistry::new();
        let region = registry.register_region("click-through");
        region.unmount();

        let again = registry.register_region("click-through");
        assert!(Arc::ptr_eq(&region, &again));
        assert!(again.is_mounted());
    }

    #[test]
    fn test_detach_window() {
        let registry = PassthroughRegistry::new();
        let main_a = attached(&registry, "a", "main");
        let main_b = attached(&registry, "b", "main");
        let other = attached(&registry, "c", "other");

        assert_eq!(registry.detach_window("main"), 2);
        assert_eq!(registry.detach_window("main"), 0);

        for handle in ["a", "b", "c"] {
            registry.dispatch(handle, PointerEvent::Enter).unwrap();
        }
        assert!(main_a.calls.lock().is_empty());
        assert!(main_b.calls.lock().is_empty());
        assert_eq!(other.calls.lock().len(), 1);
    }
}
