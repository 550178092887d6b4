//! Pointer passthrough toggle for overlay windows.
//!
//! When the pointer enters a handle region the window is asked to ignore
//! cursor events so clicks fall through to whatever is beneath it; when the
//! pointer leaves, normal capture is restored.
//!
//! - `state` - the two-state machine and the request it emits
//! - `controller` - binds the machine to a handle and a host
//! - `region` - in-process pointer targets
//! - `host` - host and spawner seams
//! - `forwarding` - mouse-move forwarding bookkeeping for the host
//! - `geometry` - client-area helpers for forwarding

pub mod controller;
pub mod error;
pub mod forwarding;
pub mod geometry;
pub mod host;
pub mod region;
pub mod state;

pub use controller::{ErrorCallback, PointerPassthroughController};
pub use error::{BindingError, HostRequestError};
pub use forwarding::{effective_forward, ForwardingRegistry, HookChange};
pub use host::{PassthroughHost, Spawn};
pub use region::{ListenerId, PointerListener, PointerTarget, Region};
pub use state::{PassthroughRequest, PassthroughState, PointerEvent};
