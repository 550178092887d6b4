//! Host collaborator seam.
//!
//! The controller never talks to a window directly. It is given a
//! [`PassthroughHost`] and a [`Spawn`] implementation at construction time,
//! and every request becomes a detached task on that spawner.

use futures::future::BoxFuture;

use crate::error::HostRequestError;
use crate::state::PassthroughRequest;

/// Window manager side of the toggle.
pub trait PassthroughHost: Send + Sync + 'static {
    /// Ask the host window to ignore (or capture) cursor events.
    ///
    /// The returned future is driven on the controller's spawner; its result
    /// is only logged.
    fn set_ignore_cursor_events(
        &self,
        request: PassthroughRequest,
    ) -> BoxFuture<'static, Result<(), HostRequestError>>;
}

/// Runs fire-and-forget tasks.
pub trait Spawn: Send + Sync + 'static {
    fn spawn(&self, task: BoxFuture<'static, ()>);
}

impl<F> Spawn for F
where
    F: Fn(BoxFuture<'static, ()>) + Send + Sync + 'static,
{
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        self(task)
    }
}
