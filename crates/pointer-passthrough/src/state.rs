//! Two-state passthrough machine.
//!
//! The whole toggle is a single transition function: every pointer event
//! yields the next state and the request that must be sent to the host.

use serde::{Deserialize, Serialize};

/// Pointer occupancy event delivered by a handle region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointerEvent {
    /// Pointer entered the handle.
    Enter,
    /// Pointer left the handle.
    Leave,
}

/// Whether the window is currently asked to ignore cursor events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PassthroughState {
    #[default]
    NotIgnoring,
    Ignoring,
}

/// Outbound `set_ignore_cursor_events` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassthroughRequest {
    /// Make the window pointer-transparent.
    pub ignore: bool,
    /// Keep delivering the triggering event to the region.
    pub forward: bool,
}

impl PassthroughRequest {
    pub fn new(ignore: bool, forward: bool) -> Self {
        Self { ignore, forward }
    }
}

impl PassthroughState {
    /// Apply a pointer event.
    ///
    /// Repeated enter or leave events leave the state unchanged but still
    /// produce their request; there is no de-duplication.
    pub fn transition(self, event: PointerEvent) -> (PassthroughState, PassthroughRequest) {
        match event {
            PointerEvent::Enter => (
                PassthroughState::Ignoring,
                PassthroughRequest::new(true, true),
            ),
            PointerEvent::Leave => (
                PassthroughState::NotIgnoring,
                PassthroughRequest::new(false, true),
            ),
        }
    }

    pub fn is_ignoring(self) -> bool {
        self == PassthroughState::Ignoring
    }
}

impl std::fmt::Display for PointerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointerEvent::Enter => write!(f, "enter"),
            PointerEvent::Leave => write!(f, "leave"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_not_ignoring() {
        assert_eq!(PassthroughState::default(), PassthroughState::NotIgnoring);
        assert!(!PassthroughState::default().is_ignoring());
    }

    #[test]
    fn test_enter_starts_ignoring() {
        let (next, request) = PassthroughState::NotIgnoring.transition(PointerEvent::Enter);
        assert_eq!(next, PassthroughState::Ignoring);
        assert_eq!(request, PassthroughRequest::new(true, true));
    }

    #[test]
    fn test_leave_stops_ignoring() {
        let (next, request) = PassthroughState::Ignoring.transition(PointerEvent::Leave);
        assert_eq!(next, PassthroughState::NotIgnoring);
        assert_eq!(request, PassthroughRequest::new(false, true));
    }

    #[test]
    fn test_repeated_events_still_emit() {
        let (next, request) = PassthroughState::Ignoring.transition(PointerEvent::Enter);
        assert_eq!(next, PassthroughState::Ignoring);
        assert!(request.ignore);

        // Spurious leave without a prior enter
        let (next, request) = PassthroughState::NotIgnoring.transition(PointerEvent::Leave);
        assert_eq!(next, PassthroughState::NotIgnoring);
        assert!(!request.ignore);
        assert!(request.forward);
    }

    #[test]
    fn test_state_tracks_last_event() {
        let events = [
            PointerEvent::Leave,
            PointerEvent::Enter,
            PointerEvent::Enter,
            PointerEvent::Leave,
            PointerEvent::Leave,
            PointerEvent::Enter,
        ];

        let mut state = PassthroughState::default();
        for event in events {
            let (next, request) = state.transition(event);
            state = next;
            assert_eq!(state.is_ignoring(), event == PointerEvent::Enter);
            assert_eq!(request.ignore, event == PointerEvent::Enter);
            assert!(request.forward);
        }
    }

    #[test]
    fn test_serialization() {
        let request = PassthroughRequest::new(true, true);
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"ignore":true,"forward":true}"#);

        let event: PointerEvent = serde_json::from_str(r#""leave""#).unwrap();
        assert_eq!(event, PointerEvent::Leave);

        let state = serde_json::to_string(&PassthroughState::NotIgnoring).unwrap();
        assert_eq!(state, r#""notIgnoring""#);
    }
}
