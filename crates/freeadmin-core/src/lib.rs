//! # freeadmin-core
//!
//! Core types shared by every freeadmin crate. This crate has no framework
//! dependencies and provides the foundation the form layers build on.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Configuration struct and defaults
//! - [`settings_loader`] - Loading settings from TOML/JSON and the environment
//! - [`nosync`] - Tables and fields that stay node-specific on an HA pair
//! - [`logging`] - Tracing-based logging integration
//! - [`utils`] - Utility types (`MultiValueDict`)

pub mod error;
pub mod logging;
pub mod nosync;
pub mod settings;
pub mod settings_loader;
pub mod utils;

// Re-export the most commonly used types at the crate root.
pub use error::{AdminError, AdminResult, ValidationError};
pub use nosync::{NoSyncMap, NoSyncRule};
pub use settings::Settings;
