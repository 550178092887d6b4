//! Application configuration management.
//!
//! `OverlayConfig` holds the user-tunable parts of the click-through overlay
//! behind a `parking_lot::RwLock`, so the frontend can replace it in a
//! single IPC call and the host can read it on every request without
//! poisoning concerns.

pub mod overlay;
