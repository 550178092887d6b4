//! Pointer targets.
//!
//! A [`Region`] is the in-process stand-in for the UI element acting as the
//! handle. The frontend forwards the element's enter/leave notifications and
//! the region fans them out to whoever registered for them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::BindingError;
use crate::state::PointerEvent;

/// Callback invoked when a registered pointer event fires.
pub type PointerListener = Arc<dyn Fn(PointerEvent) + Send + Sync>;

/// Identifies one listener registration on a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Anything that can receive pointer enter/leave registrations.
pub trait PointerTarget: Send + Sync {
    /// Stable identifier, used in logs.
    fn id(&self) -> &str;

    /// Register `listener` for `event`.
    fn add_listener(
        &self,
        event: PointerEvent,
        listener: PointerListener,
    ) -> Result<ListenerId, BindingError>;

    /// Remove a registration. Returns false if it was already gone.
    fn remove_listener(&self, id: ListenerId) -> bool;
}

struct Registration {
    id: ListenerId,
    event: PointerEvent,
    listener: PointerListener,
}

struct RegionInner {
    mounted: bool,
    registrations: Vec<Registration>,
}

/// A mountable pointer region with its own listener list.
pub struct Region {
    id: String,
    next_id: AtomicU64,
    inner: Mutex<RegionInner>,
}

impl Region {
    /// Create a mounted region.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            next_id: AtomicU64::new(1),
            inner: Mutex::new(RegionInner {
                mounted: true,
                registrations: Vec::new(),
            }),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.lock().mounted
    }

    /// Make the region accept registrations again.
    pub fn mount(&self) {
        self.inner.lock().mounted = true;
    }

    /// Drop every listener and refuse new ones.
    pub fn unmount(&self) {
        let mut inner = self.inner.lock();
        inner.mounted = false;
        let dropped = inner.registrations.len();
        inner.registrations.clear();
        log::debug!("[REGION] '{}' unmounted ({} listeners dropped)", self.id, dropped);
    }

    /// Number of live registrations.
    pub fn listener_count(&self) -> usize {
        self.inner.lock().registrations.len()
    }

    /// Deliver `event` to every listener registered for it.
    ///
    /// Listeners run outside the region lock so they may register or remove
    /// listeners themselves. Returns the number of listeners invoked.
    pub fn dispatch(&self, event: PointerEvent) -> usize {
        let listeners: Vec<PointerListener> = {
            let inner = self.inner.lock();
            if !inner.mounted {
                log::debug!("[REGION] '{}' dropped {} on unmounted region", self.id, event);
                return 0;
            }
            inner
                .registrations
                .iter()
                .filter(|r| r.event == event)
                .map(|r| Arc::clone(&r.listener))
                .collect()
        };

        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }
}

impl PointerTarget for Region {
    fn id(&self) -> &str {
        &self.id
    }

    fn add_listener(
        &self,
        event: PointerEvent,
        listener: PointerListener,
    ) -> Result<ListenerId, BindingError> {
        let mut inner = self.inner.lock();
        if !inner.mounted {
            return Err(BindingError::Unmounted {
                region: self.id.clone(),
            });
        }

        let id = ListenerId::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed));
        inner.registrations.push(Registration {
            id,
            event,
            listener,
        });
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.registrations.len();
        inner.registrations.retain(|r| r.id != id);
        inner.registrations.len() != before
    }
}
