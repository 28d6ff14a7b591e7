//! Settings for freeadmin.
//!
//! [`Settings`] holds the configuration the form adapters read at runtime:
//! logging, and the HA no-sync map used to prune fields on a backup node.
//! Settings are loaded once at startup (see
//! [`settings_loader`](crate::settings_loader)) and handed to the services
//! that need them; there is no global instance.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::nosync::NoSyncMap;

/// The complete set of freeadmin settings.
///
/// # Examples
///
/// ```
/// use freeadmin_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(!settings.debug);
/// assert_eq!(settings.log_level, "info");
/// assert!(settings.no_sync_map.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log filter (e.g. "info", "freeadmin_common=debug").
    pub log_level: String,

    // ── High availability ────────────────────────────────────────────

    /// Tables that are not synchronized between HA nodes.
    pub no_sync_map: NoSyncMap,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "info".to_string(),
            no_sync_map: NoSyncMap::new(),
            extra: HashMap::new(),
        }
    }
}
