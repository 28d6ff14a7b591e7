//! Settings loading from configuration files.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `FREEADMIN_DEBUG` | `debug` |
//! | `FREEADMIN_LOG_LEVEL` | `log_level` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use freeadmin_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("/etc/freeadmin.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::AdminError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Keys missing from the TOML keep their default values.
///
/// # Examples
///
/// ```
/// use freeadmin_core::settings_loader::from_toml_str;
///
/// let settings = from_toml_str(r#"
///     log_level = "debug"
///
///     [no_sync_map.network_globalconfiguration]
///     fields = ["gc_hostname"]
/// "#).unwrap();
/// assert_eq!(settings.log_level, "debug");
/// assert!(settings.no_sync_map.visible_fields("network_globalconfiguration").is_some());
/// ```
pub fn from_toml_str(toml_str: &str) -> Result<Settings, AdminError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| AdminError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    let json_value = serde_json::to_value(toml_value)
        .map_err(|e| AdminError::ConfigurationError(format!("Failed to convert TOML: {e}")))?;
    merge_over_defaults(json_value, "TOML")
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, AdminError> {
    let content = read_config(path.as_ref(), "TOML")?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, AdminError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
pub fn from_json_str(json_str: &str) -> Result<Settings, AdminError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| AdminError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, AdminError> {
    let content = read_config(path.as_ref(), "JSON")?;
    from_json_str(&content)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, AdminError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
///
/// - `FREEADMIN_DEBUG` -> `debug` ("true"/"1"/"yes" => true, anything else => false)
/// - `FREEADMIN_LOG_LEVEL` -> `log_level`
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("FREEADMIN_DEBUG") {
        settings.debug = parse_bool(&val);
    }

    if let Ok(val) = std::env::var("FREEADMIN_LOG_LEVEL") {
        settings.log_level = val;
    }
}

// ============================================================
// Helpers
// ============================================================

fn parse_bool(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn read_config(path: &Path, kind: &str) -> Result<String, AdminError> {
    std::fs::read_to_string(path).map_err(|e| {
        AdminError::ConfigurationError(format!(
            "Failed to read {kind} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(value: serde_json::Value, kind: &str) -> Result<Settings, AdminError> {
    let mut merged = serde_json::to_value(Settings::default()).map_err(|e| {
        AdminError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;
    merge_into(&mut merged, value);
    serde_json::from_value(merged).map_err(|e| {
        AdminError::ConfigurationError(format!("Failed to deserialize settings from {kind}: {e}"))
    })
}

/// Overlays `overlay` onto `base`. Tables are merged key by key; any other
/// value in `overlay` replaces the one in `base`.
fn merge_into(base: &mut serde_json::Value, overlay: serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base_map), serde_json::Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge_into(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
