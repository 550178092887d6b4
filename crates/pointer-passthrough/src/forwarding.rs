//! Bookkeeping for mouse-move forwarding.
//!
//! While a window ignores cursor events it stops receiving `WM_MOUSEMOVE`,
//! which would also stop the page from ever seeing the pointer leave the
//! handle. The platform layer keeps a set of windows that still want mouse
//! moves and one process-wide hook serving all of them. This type owns the
//! set and tells the caller when the hook must be installed or removed; the
//! hook itself lives in the platform code.

use std::collections::HashSet;

/// What the caller must do with the process-wide hook after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookChange {
    Install,
    Uninstall,
    Unchanged,
}

/// Forwarding is only meaningful while the window ignores cursor events.
#[inline]
pub fn effective_forward(ignore: bool, forward: bool) -> bool {
    ignore && forward
}

/// Set of raw window handles that receive forwarded mouse moves.
#[derive(Debug, Default)]
pub struct ForwardingRegistry {
    windows: HashSet<isize>,
    hook_installed: bool,
}

impl ForwardingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or remove `window` and report the required hook change.
    pub fn set_forwarding(&mut self, window: isize, forward: bool) -> HookChange {
        if forward {
            self.windows.insert(window);
            if !self.hook_installed {
                self.hook_installed = true;
                return HookChange::Install;
            }
        } else {
            self.windows.remove(&window);
            if self.windows.is_empty() && self.hook_installed {
                self.hook_installed = false;
                return HookChange::Uninstall;
            }
        }
        HookChange::Unchanged
    }

    /// Undo a failed install so the next request retries it.
    pub fn install_failed(&mut self) {
        self.hook_installed = false;
    }

    pub fn is_forwarding(&self, window: isize) -> bool {
        self.windows.contains(&window)
    }

    pub fn hook_installed(&self) -> bool {
        self.hook_installed
    }

    /// Snapshot of the forwarding windows.
    pub fn windows(&self) -> Vec<isize> {
        self.windows.iter().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_forward() {
        assert!(effective_forward(true, true));
        assert!(!effective_forward(true, false));
        assert!(!effective_forward(false, true));
        assert!(!effective_forward(false, false));
    }

    #[test]
    fn test_first_window_installs_hook() {
        let mut registry = ForwardingRegistry::new();
        assert_eq!(registry.set_forwarding(10, true), HookChange::Install);
        assert_eq!(registry.set_forwarding(20, true), HookChange::Unchanged);
        assert_eq!(registry.set_forwarding(10, true), HookChange::Unchanged);

        assert!(registry.hook_installed());
        assert!(registry.is_forwarding(10));
        assert!(registry.is_forwarding(20));
    }

    #[test]
    fn test_last_window_uninstalls_hook() {
        let mut registry = ForwardingRegistry::new();
        registry.set_forwarding(10, true);
        registry.set_forwarding(20, true);

        assert_eq!(registry.set_forwarding(10, false), HookChange::Unchanged);
        assert_eq!(registry.set_forwarding(20, false), HookChange::Uninstall);
        assert!(!registry.hook_installed());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_unknown_window_without_hook() {
        let mut registry = ForwardingRegistry::new();
        assert_eq!(registry.set_forwarding(10, false), HookChange::Unchanged);
        assert!(!registry.hook_installed());
    }

    #[test]
    fn test_install_failed_retries() {
        let mut registry = ForwardingRegistry::new();
        assert_eq!(registry.set_forwarding(10, true), HookChange::Install);
        registry.install_failed();
        assert_eq!(registry.set_forwarding(10, true), HookChange::Install);
    }

    #[test]
    fn test_windows_snapshot() {
        let mut registry = ForwardingRegistry::new();
        registry.set_forwarding(1, true);
        registry.set_forwarding(2, true);

        let mut windows = registry.windows();
        windows.sort();
        assert_eq!(windows, vec![1, 2]);
    }
}
