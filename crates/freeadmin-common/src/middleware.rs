//! Mapping backend error attributes to form fields.
//!
//! Validation errors raised by the middleware name the attribute that failed
//! (`network.configuration.hostname`, `hostname`, ...). A form declares how
//! those attribute names translate to its own field names so each error can
//! be shown next to the right field.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// How a form maps middleware attribute names to its field names.
///
/// # Examples
///
/// ```
/// use freeadmin_common::middleware::MiddlewareErrorMap;
///
/// let map = MiddlewareErrorMap::new()
///     .with_schema("network_configuration_update")
///     .with_prefix("gc_")
///     .with_attr("hostname_virtual", "gc_hostname_virtual");
///
/// assert_eq!(map.field_for("network_configuration_update.domain"), "gc_domain");
/// assert_eq!(map.field_for("hostname_virtual"), "gc_hostname_virtual");
/// assert_eq!(map.field_for("nameserver1"), "gc_nameserver1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiddlewareErrorMap {
    /// Attribute name to field name.
    #[serde(default)]
    pub attr_map: HashMap<String, String>,
    /// Prefix added to unmapped attribute names to form the field name.
    #[serde(default)]
    pub attr_prefix: Option<String>,
    /// Name of the middleware schema the attributes belong to.
    #[serde(default)]
    pub attr_schema: Option<String>,
}

impl MiddlewareErrorMap {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps one attribute to a field.
    #[must_use]
    pub fn with_attr(mut self, attr: impl Into<String>, field: impl Into<String>) -> Self {
        self.attr_map.insert(attr.into(), field.into());
        self
    }

    /// Sets the attribute prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.attr_prefix = Some(prefix.into());
        self
    }

    /// Sets the attribute schema name.
    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.attr_schema = Some(schema.into());
        self
    }

    /// Resolves an attribute name to a form field name.
    ///
    /// A leading schema qualifier (`{schema}.`) is stripped. The attribute
    /// map is consulted first; unmapped names get the prefix prepended.
    pub fn field_for(&self, attr: &str) -> String {
        let name = self
            .attr_schema
            .as_deref()
            .and_then(|schema| attr.strip_prefix(schema))
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(attr);
        if let Some(field) = self.attr_map.get(name) {
            return field.clone();
        }
        match &self.attr_prefix {
            Some(prefix) => format!("{prefix}{name}"),
            None => name.to_string(),
        }
    }
}
