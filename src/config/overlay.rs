//! Overlay configuration.
//!
//! Contains the preferences that shape how the passthrough toggle is wired:
//! - Which handle the frontend registers by default
//! - Whether mouse moves keep reaching the page while click-through is on
//! - Whether registering a region also attaches a controller

use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Element id used by the bundled frontend.
pub const DEFAULT_HANDLE_ID: &str = "click-through";

lazy_static! {
    /// Global overlay configuration.
    pub static ref OVERLAY_CONFIG: RwLock<OverlayConfig> = RwLock::new(OverlayConfig::default());
}

/// Overlay-wide user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../ui/types/generated/")]
pub struct OverlayConfig {
    /// Element id of the handle region.
    pub handle_id: String,

    /// Forward mouse moves to the page while the window ignores cursor events.
    /// When false the platform layer never installs the mouse hook; the
    /// requests emitted by the controller keep `forward: true` regardless.
    pub forward_mouse_moves: bool,

    /// `register_region` also attaches a passthrough controller.
    pub auto_attach: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            handle_id: DEFAULT_HANDLE_ID.to_string(),
            forward_mouse_moves: true,
            auto_attach: true,
        }
    }
}

impl OverlayConfig {
    /// Normalize user input.
    pub fn validate(&mut self) {
        let trimmed = self.handle_id.trim();
        self.handle_id = if trimmed.is_empty() {
            DEFAULT_HANDLE_ID.to_string()
        } else {
            trimmed.to_string()
        };
    }
}

// ============================================================================
// Getters (for internal Rust use)
// ============================================================================

pub fn forward_mouse_moves() -> bool {
    OVERLAY_CONFIG.read().forward_mouse_moves
}

pub fn auto_attach() -> bool {
    OVERLAY_CONFIG.read().auto_attach
}

// ============================================================================
// Tauri Commands
// ============================================================================

/// Get the current overlay configuration.
#[tauri::command]
pub fn get_overlay_config() -> OverlayConfig {
    OVERLAY_CONFIG.read().clone()
}

/// Set the entire overlay configuration at once (for frontend sync).
#[tauri::command]
pub fn set_overlay_config(mut config: OverlayConfig) {
    config.validate();
    log::debug!("[OVERLAY_CONFIG] set_overlay_config({:?})", config);
    *OVERLAY_CONFIG.write() = config;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OverlayConfig::default();
        assert_eq!(config.handle_id, "click-through");
        assert!(config.forward_mouse_moves);
        assert!(config.auto_attach);
    }

    #[test]
    fn test_validate_trims_handle() {
        let mut config = OverlayConfig {
            handle_id: "  grip  ".to_string(),
            ..Default::default()
        };
        config.validate();
        assert_eq!(config.handle_id, "grip");

        config.handle_id = "   ".to_string();
        config.validate();
        assert_eq!(config.handle_id, DEFAULT_HANDLE_ID);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: OverlayConfig =
            serde_json::from_str(r#"{"forwardMouseMoves":false}"#).unwrap();
        assert!(!config.forward_mouse_moves);
        assert!(config.auto_attach);
        assert_eq!(config.handle_id, DEFAULT_HANDLE_ID);
    }

    #[test]
    fn test_handle_id_wire_name() {
        // The frontend looks up its handle element by `handleId`
        let json = serde_json::to_value(OverlayConfig::default()).unwrap();
        assert_eq!(json["handleId"], DEFAULT_HANDLE_ID);
        assert_eq!(json["forwardMouseMoves"], true);
        assert_eq!(json["autoAttach"], true);
    }

    #[test]
    fn test_set_overlay_config_validates() {
        set_overlay_config(OverlayConfig {
            handle_id: " handle ".to_string(),
            forward_mouse_moves: false,
            auto_attach: true,
        });
        assert_eq!(get_overlay_config().handle_id, "handle");
        assert!(!forward_mouse_moves());

        // Reset
        *OVERLAY_CONFIG.write() = OverlayConfig::default();
        assert!(forward_mouse_moves());
    }
}
