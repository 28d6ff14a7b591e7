//! Tables excluded from HA database synchronization.
//!
//! On a two-node high-availability pair most configuration is replicated
//! from the active node to the passive one. Tables listed in the
//! [`NoSyncMap`] are not replicated. When a rule lists `fields`, those fields
//! hold node-specific values (a hostname, for instance) and are the only ones
//! an administrator may still edit while the node is the backup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The no-sync rule for a single table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoSyncRule {
    /// Fields that stay visible on the passive node. `None` means the rule
    /// does not restrict form fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

impl NoSyncRule {
    /// Creates a rule that keeps only the given fields visible.
    pub fn with_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: Some(fields.into_iter().map(Into::into).collect()),
        }
    }
}

/// Mapping from database table name to its [`NoSyncRule`].
///
/// # Examples
///
/// ```
/// use freeadmin_core::nosync::{NoSyncMap, NoSyncRule};
///
/// let mut map = NoSyncMap::new();
/// map.insert("network_globalconfiguration", NoSyncRule::with_fields(["gc_hostname"]));
///
/// assert_eq!(
///     map.visible_fields("network_globalconfiguration"),
///     Some(&["gc_hostname".to_string()][..])
/// );
/// assert_eq!(map.visible_fields("account_bsdusers"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoSyncMap {
    tables: HashMap<String, NoSyncRule>,
}

impl NoSyncMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the rule for a table.
    pub fn insert(&mut self, table: impl Into<String>, rule: NoSyncRule) {
        self.tables.insert(table.into(), rule);
    }

    /// Returns the rule for a table, if any.
    pub fn get(&self, table: &str) -> Option<&NoSyncRule> {
        self.tables.get(table)
    }

    /// Returns the fields that remain visible on a backup node for `table`,
    /// or `None` when the table does not restrict its fields.
    pub fn visible_fields(&self, table: &str) -> Option<&[String]> {
        self.get(table).and_then(|rule| rule.fields.as_deref())
    }

    /// Returns the number of tables in the map.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` if no table is listed.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
