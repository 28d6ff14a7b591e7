//! Formsets: collections of related forms on a single page.
//!
//! A [`FormSet`] manages several instances of the same form, handling the
//! management data (`TOTAL_FORMS`, `INITIAL_FORMS`, ...) and coordinating
//! validation across all forms. Model form adapters receive formsets by name
//! and hand them to registered formset cleaners.

use std::collections::BTreeMap;

use crate::data::FormData;
use crate::form::Form;

/// The default formset prefix.
const DEFAULT_PREFIX: &str = "form";

const TOTAL_FORMS: &str = "TOTAL_FORMS";
const INITIAL_FORMS: &str = "INITIAL_FORMS";
const MIN_NUM_FORMS: &str = "MIN_NUM_FORMS";
const MAX_NUM_FORMS: &str = "MAX_NUM_FORMS";

/// A collection of related forms managed together.
pub struct FormSet {
    /// The individual form instances.
    pub forms: Vec<Box<dyn Form>>,
    /// Minimum number of forms required.
    pub min_num: usize,
    /// Maximum number of forms allowed.
    pub max_num: usize,
    prefix: String,
    non_form_errors: Vec<String>,
    is_bound: bool,
}

impl std::fmt::Debug for FormSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormSet")
            .field("prefix", &self.prefix)
            .field("forms", &self.forms.len())
            .field("min_num", &self.min_num)
            .field("max_num", &self.max_num)
            .field("non_form_errors", &self.non_form_errors)
            .field("is_bound", &self.is_bound)
            .finish()
    }
}

impl FormSet {
    /// Creates a new `FormSet` with the given form instances.
    pub fn new(forms: Vec<Box<dyn Form>>) -> Self {
        Self {
            forms,
            min_num: 0,
            max_num: 1000,
            prefix: DEFAULT_PREFIX.to_string(),
            non_form_errors: Vec::new(),
            is_bound: false,
        }
    }

    /// Sets the minimum number of forms.
    #[must_use]
    pub fn with_min_num(mut self, min_num: usize) -> Self {
        self.min_num = min_num;
        self
    }

    /// Sets the maximum number of forms.
    #[must_use]
    pub fn with_max_num(mut self, max_num: usize) -> Self {
        self.max_num = max_num;
        self
    }

    /// Sets the formset prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Returns the formset prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the total number of forms.
    pub fn total_form_count(&self) -> usize {
        self.forms.len()
    }

    /// Returns the number of bound forms.
    pub fn initial_form_count(&self) -> usize {
        self.forms.iter().filter(|f| f.is_bound()).count()
    }

    /// Returns the management data, keyed by prefixed name.
    pub fn management_form_data(&self) -> BTreeMap<String, String> {
        let prefix = &self.prefix;
        BTreeMap::from([
            (
                format!("{prefix}-{TOTAL_FORMS}"),
                self.total_form_count().to_string(),
            ),
            (
                format!("{prefix}-{INITIAL_FORMS}"),
                self.initial_form_count().to_string(),
            ),
            (format!("{prefix}-{MIN_NUM_FORMS}"), self.min_num.to_string()),
            (format!("{prefix}-{MAX_NUM_FORMS}"), self.max_num.to_string()),
        ])
    }

    /// Renders the management data as hidden inputs.
    pub fn management_form_html(&self) -> String {
        self.management_form_data()
            .iter()
            .map(|(key, value)| format!(r#"<input type="hidden" name="{key}" value="{value}" />"#))
            .collect()
    }

    /// Binds submitted data to every form.
    ///
    /// Form `i` receives the keys starting with `{prefix}-{i}-`; forms are
    /// expected to carry that prefix themselves.
    pub fn bind(&mut self, data: &FormData) {
        self.is_bound = true;
        for (i, form) in self.forms.iter_mut().enumerate() {
            let form_prefix = format!("{}-{i}-", self.prefix);
            let mut form_data = FormData::new();
            for key in data.keys().filter(|k| k.starts_with(&form_prefix)) {
                for value in data.get_list(key) {
                    form_data.append(key.as_str(), value);
                }
            }
            form.bind(&form_data);
        }
    }

    /// Validates every form, then the form count limits.
    ///
    /// All forms are validated even after one fails, so each carries its
    /// errors.
    pub fn is_valid(&mut self) -> bool {
        if !self.is_bound {
            return false;
        }

        self.non_form_errors.clear();
        let mut all_valid = true;

        for form in &mut self.forms {
            if !form.is_valid() {
                all_valid = false;
            }
        }

        if self.forms.len() < self.min_num {
            self.non_form_errors
                .push(format!("Please submit at least {} forms.", self.min_num));
            all_valid = false;
        }
        if self.forms.len() > self.max_num {
            self.non_form_errors
                .push(format!("Please submit at most {} forms.", self.max_num));
            all_valid = false;
        }

        all_valid
    }

    /// Adds a formset-level error.
    pub fn add_non_form_error(&mut self, message: impl Into<String>) {
        self.non_form_errors.push(message.into());
    }

    /// Returns formset-level (non-form) errors.
    pub fn non_form_errors(&self) -> &[String] {
        &self.non_form_errors
    }

    /// Returns `true` if the formset has been bound to data.
    pub const fn is_bound(&self) -> bool {
        self.is_bound
    }
}

/// Creates a formset of `count` forms from a factory receiving each index.
pub fn create_formset<F>(form_factory: F, count: usize) -> FormSet
where
    F: Fn(usize) -> Box<dyn Form>,
{
    FormSet::new((0..count).map(form_factory).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FormFieldDef, FormFieldType};
    use crate::form::BaseForm;

    fn alias_form(i: usize) -> Box<dyn Form> {
        Box::new(
            BaseForm::new(vec![FormFieldDef::new("alias", FormFieldType::char())])
                .with_prefix(format!("alias-{i}")),
        )
    }

    #[test]
    fn test_unbound_is_invalid() {
        let mut fs = create_formset(alias_form, 2);
        assert!(!fs.is_bound());
        assert!(!fs.is_valid());
    }

    #[test]
    fn test_bind_routes_prefixed_data() {
        let mut fs = create_formset(alias_form, 2).with_prefix("alias");
        fs.bind(&FormData::parse("alias-0-alias=10.0.0.1&alias-1-alias=10.0.0.2"));
        assert!(fs.is_valid());
        assert_eq!(fs.initial_form_count(), 2);
    }

    #[test]
    fn test_invalid_member_form() {
        let mut fs = create_formset(alias_form, 2).with_prefix("alias");
        fs.bind(&FormData::parse("alias-0-alias=10.0.0.1"));
        assert!(!fs.is_valid());
        assert!(fs.forms[1].errors().contains_key("alias"));
        assert!(fs.forms[0].errors().is_empty());
    }

    #[test]
    fn test_min_num() {
        let mut fs = create_formset(alias_form, 1)
            .with_prefix("alias")
            .with_min_num(2);
        fs.bind(&FormData::parse("alias-0-alias=a"));
        assert!(!fs.is_valid());
        assert_eq!(fs.non_form_errors(), ["Please submit at least 2 forms."]);
    }

    #[test]
    fn test_add_non_form_error() {
        let mut fs = FormSet::new(vec![]);
        fs.add_non_form_error("duplicate alias");
        assert_eq!(fs.non_form_errors(), ["duplicate alias"]);
    }

    #[test]
    fn test_management_form() {
        let fs = create_formset(alias_form, 3).with_prefix("alias").with_max_num(5);
        let data = fs.management_form_data();
        assert_eq!(data["alias-TOTAL_FORMS"], "3");
        assert_eq!(data["alias-INITIAL_FORMS"], "0");
        assert_eq!(data["alias-MAX_NUM_FORMS"], "5");
        let html = fs.management_form_html();
        assert_eq!(html.matches("<input").count(), 4);
        assert!(html.starts_with(r#"<input type="hidden" name="alias-INITIAL_FORMS""#));
    }
}
