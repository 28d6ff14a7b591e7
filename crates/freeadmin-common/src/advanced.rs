//! Advanced-field grouping.
//!
//! Forms may tuck rarely-used fields behind an "advanced" toggle. The form
//! only records which fields those are; the UI decides how to show them.

/// The names of a form's advanced fields.
///
/// # Examples
///
/// ```
/// use freeadmin_common::advanced::AdvancedFields;
///
/// let adv = AdvancedFields::new(["gc_httpproxy", "gc_netwait_ip"]);
/// assert!(adv.is_advanced());
/// assert!(adv.contains("gc_httpproxy"));
/// assert!(!AdvancedFields::default().is_advanced());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvancedFields {
    names: Vec<String>,
}

impl AdvancedFields {
    /// Creates the list from field names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if the form declares any advanced fields.
    pub fn is_advanced(&self) -> bool {
        !self.names.is_empty()
    }

    /// Returns `true` if `name` is an advanced field.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Returns the advanced field names.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_not_advanced() {
        let adv = AdvancedFields::default();
        assert!(!adv.is_advanced());
        assert!(adv.names().is_empty());
    }

    #[test]
    fn test_contains() {
        let adv = AdvancedFields::new(vec!["a".to_string()]);
        assert!(adv.contains("a"));
        assert!(!adv.contains("b"));
    }
}
