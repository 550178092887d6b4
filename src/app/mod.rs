//! Application lifecycle and platform integration.
//!
//! - `events`: Window event handlers

pub mod events;
