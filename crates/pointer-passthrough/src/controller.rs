//! Pointer passthrough controller.
//!
//! Binds to one handle and turns its enter/leave events into
//! `set_ignore_cursor_events` requests on the injected host.
//!
//! # Request flow
//!
//! 1. The handle dispatches an event to one of the two registered reactions.
//! 2. The reaction applies [`PassthroughState::transition`] under the state lock
//!    and calls the host while still holding it. Reactions belonging to an
//!    earlier binding are dropped, so a `detach` (or a re-attach elsewhere)
//!    is never followed by a host call from the old target.
//! 3. The host future is handed to the spawner and never awaited; failures
//!    are logged and reported to the error callback without touching state.

use std::sync::{Arc, Weak};

use futures::FutureExt;
use parking_lot::Mutex;

use crate::error::{BindingError, HostRequestError};
use crate::host::{PassthroughHost, Spawn};
use crate::region::{ListenerId, PointerListener, PointerTarget};
use crate::state::{PassthroughState, PointerEvent};


/// Receives host failures. Runs on the spawner, not the event thread.
pub type ErrorCallback = Arc<dyn Fn(&HostRequestError) + Send + Sync>;

struct Machine {
    state: PassthroughState,
    attached: bool,
    /// Bumped on every attach and detach; reactions of older bindings
    /// carry a stale value and are ignored.
    generation: u64,
}

struct Shared {
    machine: Mutex<Machine>,
    host: Arc<dyn PassthroughHost>,
    spawner: Arc<dyn Spawn>,
    on_error: Mutex<Option<ErrorCallback>>,
}

impl Shared {
    fn react(&self, generation: u64, event: PointerEvent) {
        let (request, future) = {
            let mut machine = self.machine.lock();
            if !machine.attached || machine.generation != generation {
                return;
            }
            let (next, request) = machine.state.transition(event);
            log::debug!(
                "[PASSTHROUGH] {} : {:?} -> {:?}",
                event,
                machine.state,
                next
            );
            machine.state = next;
            (request, self.host.set_ignore_cursor_events(request))
        };

        let on_error = self.on_error.lock().clone();
        let task = async move {
            if let Err(e) = future.await {
                log::warn!(
                    "[PASSTHROUGH] set_ignore_cursor_events(ignore={}, forward={}) failed: {}",
                    request.ignore,
                    request.forward,
                    e
                );
                if let Some(cb) = on_error {
                    cb(&e);
                }
            }
        };
        self.spawner.spawn(task.boxed());
    }
}

struct Binding {
    target: Arc<dyn PointerTarget>,
    enter: ListenerId,
    leave: ListenerId,
}

/// Owns the passthrough state of a single handle.
pub struct PointerPassthroughController {
    shared: Arc<Shared>,
    binding: Option<Binding>,
}

impl PointerPassthroughController {
    pub fn new(host: Arc<dyn PassthroughHost>, spawner: Arc<dyn Spawn>) -> Self {
        Self {
            shared: Arc::new(Shared {
                machine: Mutex::new(Machine {
                    state: PassthroughState::NotIgnoring,
                    attached: false,
                    generation: 0,
                }),
                host,
                spawner,
                on_error: Mutex::new(None),
            }),
            binding: None,
        }
    }

    /// Report host failures to `callback` in addition to the log.
    pub fn set_error_callback<F>(&self, callback: F)
    where
        F: Fn(&HostRequestError) + Send + Sync + 'static,
    {
        *self.shared.on_error.lock() = Some(Arc::new(callback));
    }

    /// Register the enter and leave reactions on `target`.
    ///
    /// State starts over at [`PassthroughState::NotIgnoring`]. A controller
    /// that is already attached is detached from its previous target first.
    /// On failure nothing stays registered.
    pub fn attach(&mut self, target: Arc<dyn PointerTarget>) -> Result<(), BindingError> {
        if self.binding.is_some() {
            self.detach();
        }

        let generation = {
            let mut machine = self.shared.machine.lock();
            machine.state = PassthroughState::NotIgnoring;
            machine.attached = true;
            machine.generation += 1;
            machine.generation
        };

        let enter = match target.add_listener(PointerEvent::Enter, self.reaction(generation)) {
            Ok(id) => id,
            Err(e) => {
                self.shared.machine.lock().attached = false;
                return Err(e);
            },
        };
        let leave = match target.add_listener(PointerEvent::Leave, self.reaction(generation)) {
            Ok(id) => id,
            Err(e) => {
                target.remove_listener(enter);
                self.shared.machine.lock().attached = false;
                return Err(e);
            },
        };

        log::debug!("[PASSTHROUGH] Attached to '{}'", target.id());
        self.binding = Some(Binding {
            target,
            enter,
            leave,
        });
        Ok(())
    }

    /// Remove both reactions. Returns false if the controller was not attached.
    ///
    /// No host call is made after this returns.
    pub fn detach(&mut self) -> bool {
        let Some(binding) = self.binding.take() else {
            return false;
        };

        {
            let mut machine = self.shared.machine.lock();
            machine.attached = false;
            machine.generation += 1;
        }
        binding.target.remove_listener(binding.enter);
        binding.target.remove_listener(binding.leave);
        log::debug!("[PASSTHROUGH] Detached from '{}'", binding.target.id());
        true
    }

    pub fn state(&self) -> PassthroughState {
        self.shared.machine.lock().state
    }

    pub fn is_ignoring(&self) -> bool {
        self.state().is_ignoring()
    }

    pub fn is_attached(&self) -> bool {
        self.binding.is_some()
    }

    /// Id of the target this controller is bound to.
    pub fn target_id(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.target.id())
    }

    fn reaction(&self, generation: u64) -> PointerListener {
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        Arc::new(move |event: PointerEvent| {
            if let Some(shared) = shared.upgrade() {
                shared.react(generation, event);
            }
        })
    }
}

impl Drop for PointerPassthroughController {
    fn drop(&mut self) {
        self.detach();
    }
}
