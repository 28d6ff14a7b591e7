//! Error types shared across freeadmin.
//!
//! [`AdminError`] covers the failures the form adapters can surface to a
//! caller: validation, unknown form fields, malformed cron expressions,
//! configuration problems, and failures reported by the record being
//! deleted. Expected validation failures are not errors; they are collected
//! in a form's error map instead.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use thiserror::Error;

/// The error map of a form that failed validation.
///
/// Messages are keyed by field name, with form-level messages under
/// `__all__`. Fields are kept sorted so the rendered message is stable.
///
/// # Examples
///
/// ```
/// use freeadmin_core::error::ValidationError;
///
/// let err = ValidationError::new()
///     .with_error("gc_netmask", "Invalid netmask.")
///     .with_error("gc_hostname", "Invalid hostname.");
/// assert_eq!(err.to_string(), "gc_hostname: Invalid hostname.; gc_netmask: Invalid netmask.");
/// assert_eq!(err.messages("gc_hostname"), ["Invalid hostname.".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    /// Creates an empty error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `message` to the errors of `field`.
    #[must_use]
    pub fn with_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
        self
    }

    /// Returns the messages recorded for `field`.
    pub fn messages(&self, field: &str) -> &[String] {
        self.errors.get(field).map_or(&[], Vec::as_slice)
    }

    /// Returns the fields with errors, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.values().all(Vec::is_empty)
    }
}

impl From<&HashMap<String, Vec<String>>> for ValidationError {
    fn from(errors: &HashMap<String, Vec<String>>) -> Self {
        Self {
            errors: errors
                .iter()
                .filter(|(_, messages)| !messages.is_empty())
                .map(|(field, messages)| (field.clone(), messages.clone()))
                .collect(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for (field, messages) in &self.errors {
            for message in messages {
                write!(f, "{sep}{field}: {message}")?;
                sep = "; ";
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for freeadmin.
#[derive(Error, Debug)]
pub enum AdminError {
    /// One or more values failed validation.
    #[error("Validation error: {0}")]
    ValidationError(ValidationError),

    /// A form operation named a field the form does not declare.
    #[error("Unknown form field: {0}")]
    UnknownField(String),

    /// A cron expression could not be parsed or expanded.
    #[error("Invalid cron expression: {0}")]
    InvalidCronExpression(String),

    /// The record a form is bound to does not exist.
    #[error("Object does not exist: {0}")]
    DoesNotExist(String),

    /// The backing store rejected an operation (e.g. a delete).
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AdminError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `ValidationError`, `UnknownField`, `InvalidCronExpression` -> 400
    /// - `DoesNotExist` -> 404
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::ValidationError(_) | Self::UnknownField(_) | Self::InvalidCronExpression(_) => {
                400
            }
            Self::DoesNotExist(_) => 404,
            Self::DatabaseError(_) | Self::ConfigurationError(_) | Self::IoError(_) => 500,
        }
    }
}

impl From<ValidationError> for AdminError {
    fn from(err: ValidationError) -> Self {
        Self::ValidationError(err)
    }
}

/// A convenience type alias for `Result<T, AdminError>`.
pub type AdminResult<T> = Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_sorted() {
        let err = ValidationError::new()
            .with_error("netmask", "Invalid netmask.")
            .with_error("__all__", "Failover is administratively disabled.")
            .with_error("netmask", "Out of range.");
        assert_eq!(
            err.to_string(),
            "__all__: Failover is administratively disabled.; netmask: Invalid netmask.; netmask: Out of range."
        );
        assert_eq!(err.fields().collect::<Vec<_>>(), ["__all__", "netmask"]);
    }

    #[test]
    fn test_validation_error_from_map_skips_empty() {
        let mut map = HashMap::new();
        map.insert("hostname".to_string(), vec!["Required.".to_string()]);
        map.insert("domain".to_string(), Vec::new());
        let err = ValidationError::from(&map);
        assert_eq!(err.fields().collect::<Vec<_>>(), ["hostname"]);
        assert!(err.messages("domain").is_empty());
        assert!(!err.is_empty());
        assert!(ValidationError::new().is_empty());
    }

    #[test]
    fn test_admin_error_status_codes() {
        assert_eq!(AdminError::ValidationError(ValidationError::new()).status_code(), 400);
        assert_eq!(AdminError::UnknownField("x".into()).status_code(), 400);
        assert_eq!(AdminError::InvalidCronExpression("x".into()).status_code(), 400);
        assert_eq!(AdminError::DoesNotExist("x".into()).status_code(), 404);
        assert_eq!(AdminError::DatabaseError("x".into()).status_code(), 500);
        assert_eq!(AdminError::ConfigurationError("x".into()).status_code(), 500);
    }

    #[test]
    fn test_admin_error_display() {
        let err = AdminError::UnknownField("dayweek".into());
        assert_eq!(err.to_string(), "Unknown form field: dayweek");
        let err: AdminError = ValidationError::new().with_error("gc_hostname", "Required.").into();
        assert_eq!(err.to_string(), "Validation error: gc_hostname: Required.");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::other("disk unavailable");
        let err: AdminError = io_err.into();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("disk unavailable"));
    }
}
