//! Form trait and `BaseForm` implementation.
//!
//! The [`Form`] trait is the abstraction the formset and adapter layers work
//! against. [`BaseForm`] is the concrete, general-purpose implementation: an
//! ordered list of field definitions plus the initial, raw, cleaned, and
//! error state of one request. Adapters hold a `BaseForm` and mutate it in
//! place (pruning fields, rewriting initial values, trimming cleaned data).

use std::collections::HashMap;

use crate::bound_field::BoundField;
use crate::data::FormData;
use crate::fields::FormFieldDef;
use crate::html::TABLE;
use crate::validation;
use crate::value::Value;
use crate::widgets;

/// Key under which form-level (non-field) errors are stored.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// The core form trait.
pub trait Form: Send + Sync {
    /// Returns the form's field definitions.
    fn fields(&self) -> &[FormFieldDef];

    /// Returns the initial (default) values for fields.
    fn initial(&self) -> &HashMap<String, Value>;

    /// Returns the form prefix (for namespacing multiple forms on one page).
    fn prefix(&self) -> Option<&str>;

    /// Binds raw form data to this form.
    fn bind(&mut self, data: &FormData);

    /// Returns `true` if this form has been bound to data.
    fn is_bound(&self) -> bool;

    /// Validates the form. Returns `true` if valid.
    ///
    /// After calling this, `errors()` and `cleaned_data()` are populated.
    fn is_valid(&mut self) -> bool;

    /// Returns per-field validation errors. Keys are field names, with
    /// form-level errors under [`NON_FIELD_ERRORS`].
    fn errors(&self) -> &HashMap<String, Vec<String>>;

    /// Returns the cleaned (validated and coerced) data.
    fn cleaned_data(&self) -> &HashMap<String, Value>;

    /// Renders the form as HTML table rows.
    fn as_table(&self) -> String;
}

/// Construction arguments shared by every form type.
#[derive(Debug, Clone, Default)]
pub struct FormKwargs {
    /// Submitted data; the form is bound when present.
    pub data: Option<FormData>,
    /// Initial values, overriding instance and declared initials.
    pub initial: HashMap<String, Value>,
    /// Prefix for HTML field names.
    pub prefix: Option<String>,
}

impl FormKwargs {
    /// Creates empty kwargs (an unbound form with no initial values).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the submitted data.
    #[must_use]
    pub fn data(mut self, data: FormData) -> Self {
        self.data = Some(data);
        self
    }

    /// Adds an initial value.
    #[must_use]
    pub fn initial(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.initial.insert(name.into(), value.into());
        self
    }

    /// Sets the prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

/// A general-purpose form implementation.
///
/// # Examples
///
/// ```
/// use freeadmin_forms::data::FormData;
/// use freeadmin_forms::fields::{FormFieldDef, FormFieldType};
/// use freeadmin_forms::form::{BaseForm, Form};
/// use freeadmin_forms::value::Value;
///
/// let mut form = BaseForm::new(vec![FormFieldDef::new("hostname", FormFieldType::char())]);
/// form.bind(&FormData::parse("hostname=nas"));
/// assert!(form.is_valid());
/// assert_eq!(form.cleaned_data()["hostname"], Value::from("nas"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BaseForm {
    field_defs: Vec<FormFieldDef>,
    initial_data: HashMap<String, Value>,
    prefix: Option<String>,
    bound: bool,
    raw_data: HashMap<String, Option<String>>,
    errors: HashMap<String, Vec<String>>,
    cleaned_data: HashMap<String, Value>,
    /// CSS class added to rows of fields with errors.
    pub error_css_class: Option<String>,
    /// CSS class added to rows of required fields.
    pub required_css_class: Option<String>,
}

impl BaseForm {
    /// Creates a new `BaseForm` with the given field definitions.
    pub fn new(fields: Vec<FormFieldDef>) -> Self {
        Self {
            field_defs: fields,
            ..Self::default()
        }
    }

    /// Creates a form from field definitions and construction kwargs,
    /// binding it when the kwargs carry data.
    pub fn from_kwargs(fields: Vec<FormFieldDef>, kwargs: &FormKwargs) -> Self {
        let mut form = Self::new(fields);
        form.initial_data.clone_from(&kwargs.initial);
        form.prefix.clone_from(&kwargs.prefix);
        if let Some(data) = &kwargs.data {
            form.bind(data);
        }
        form
    }

    /// Sets initial (default) values for fields.
    #[must_use]
    pub fn with_initial(mut self, initial: HashMap<String, Value>) -> Self {
        self.initial_data = initial;
        self
    }

    /// Sets the form prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Returns the definition of the named field.
    pub fn field(&self, name: &str) -> Option<&FormFieldDef> {
        self.field_defs.iter().find(|f| f.name == name)
    }

    /// Returns the definition of the named field, mutably.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormFieldDef> {
        self.field_defs.iter_mut().find(|f| f.name == name)
    }

    /// Returns all field definitions, mutably.
    pub fn fields_mut(&mut self) -> &mut [FormFieldDef] {
        &mut self.field_defs
    }

    /// Returns `true` if the form has a field named `name`.
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Returns field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.field_defs.iter().map(|f| f.name.as_str()).collect()
    }

    /// Removes every field whose name is not in `keep`, returning the removed
    /// names in declaration order.
    pub fn remove_fields_except(&mut self, keep: &[String]) -> Vec<String> {
        let mut removed = Vec::new();
        self.field_defs.retain(|f| {
            let kept = keep.contains(&f.name);
            if !kept {
                removed.push(f.name.clone());
            }
            kept
        });
        for name in &removed {
            self.raw_data.remove(name);
        }
        removed
    }

    /// Returns the initial values, mutably.
    pub fn initial_mut(&mut self) -> &mut HashMap<String, Value> {
        &mut self.initial_data
    }

    /// Returns the cleaned data, mutably.
    pub fn cleaned_data_mut(&mut self) -> &mut HashMap<String, Value> {
        &mut self.cleaned_data
    }

    /// Returns the effective initial value of a field: the form's initial map
    /// first, then the field's declared initial.
    pub fn initial_for(&self, name: &str) -> Option<&Value> {
        self.initial_data
            .get(name)
            .or_else(|| self.field(name).and_then(|f| f.initial.as_ref()))
    }

    /// Runs field-level validation, replacing any previous errors and
    /// cleaned data.
    pub fn clean_fields(&mut self) {
        self.errors.clear();
        self.cleaned_data.clear();
        validation::clean_fields(
            &self.field_defs,
            &self.initial_data,
            &self.raw_data,
            &mut self.cleaned_data,
            &mut self.errors,
        );
    }

    /// Merges form-level errors into the error map.
    pub fn merge_errors(&mut self, errors: HashMap<String, Vec<String>>) {
        validation::merge_errors(&mut self.errors, errors);
    }

    /// Adds an error message to a field, or to the form when `field` is `None`.
    pub fn add_error(&mut self, field: Option<&str>, message: impl Into<String>) {
        let key = field.unwrap_or(NON_FIELD_ERRORS).to_string();
        self.cleaned_data.remove(&key);
        self.errors.entry(key).or_default().push(message.into());
    }

    /// Returns `true` if the form has any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns the non-field (form-level) errors.
    pub fn non_field_errors(&self) -> &[String] {
        self.errors
            .get(NON_FIELD_ERRORS)
            .map_or(&[], Vec::as_slice)
    }

    /// Returns bound fields for rendering.
    ///
    /// A bound form renders the submitted value; an unbound form renders the
    /// initial value.
    pub fn bound_fields(&self) -> Vec<BoundField> {
        self.field_defs
            .iter()
            .map(|field| {
                let value = if self.bound {
                    self.raw_data.get(&field.name).cloned().flatten()
                } else {
                    self.initial_for(&field.name)
                        .filter(|v| !v.is_null())
                        .map(Value::to_form_string)
                };
                let errors = self.errors.get(&field.name).cloned().unwrap_or_default();
                BoundField::new(field, value, errors, self.prefix.as_deref())
            })
            .collect()
    }
}

impl Form for BaseForm {
    fn fields(&self) -> &[FormFieldDef] {
        &self.field_defs
    }

    fn initial(&self) -> &HashMap<String, Value> {
        &self.initial_data
    }

    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn bind(&mut self, data: &FormData) {
        self.bound = true;
        self.raw_data.clear();
        self.errors.clear();
        self.cleaned_data.clear();

        for field in &self.field_defs {
            let html_name = match &self.prefix {
                Some(p) => format!("{p}-{}", field.name),
                None => field.name.clone(),
            };
            let widget = widgets::create_widget(field.widget, field.choices());
            let value = widget.value_from_data(data, &html_name);
            self.raw_data.insert(field.name.clone(), value);
        }
    }

    fn is_bound(&self) -> bool {
        self.bound
    }

    fn is_valid(&mut self) -> bool {
        if !self.bound {
            return false;
        }
        self.clean_fields();
        self.errors.is_empty()
    }

    fn errors(&self) -> &HashMap<String, Vec<String>> {
        &self.errors
    }

    fn cleaned_data(&self) -> &HashMap<String, Value> {
        &self.cleaned_data
    }

    fn as_table(&self) -> String {
        TABLE.render(
            &self.bound_fields(),
            self.non_field_errors(),
            self.error_css_class.as_deref(),
            self.required_css_class.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FormFieldType;
    use crate::widgets::WidgetType;

    fn make_test_form() -> BaseForm {
        BaseForm::new(vec![
            FormFieldDef::new(
                "hostname",
                FormFieldType::Char {
                    min_length: Some(1),
                    max_length: Some(63),
                    strip: false,
                },
            ),
            FormFieldDef::new("email", FormFieldType::Email),
            FormFieldDef::new(
                "mtu",
                FormFieldType::Integer {
                    min_value: Some(576),
                    max_value: Some(9216),
                },
            )
            .required(false),
        ])
    }

    #[test]
    fn test_form_unbound() {
        let mut form = make_test_form();
        assert!(!form.is_bound());
        assert!(!form.is_valid());
    }

    #[test]
    fn test_form_bind_and_validate() {
        let mut form = make_test_form();
        form.bind(&FormData::parse("hostname=nas&email=root@nas.local&mtu=1500"));
        assert!(form.is_bound());
        assert!(form.is_valid());
        assert_eq!(form.cleaned_data().get("hostname"), Some(&Value::from("nas")));
        assert_eq!(form.cleaned_data().get("mtu"), Some(&Value::Int(1500)));
    }

    #[test]
    fn test_form_validation_errors() {
        let mut form = make_test_form();
        form.bind(&FormData::parse("email=not-email&mtu=10"));
        assert!(!form.is_valid());
        assert!(form.errors().contains_key("hostname"));
        assert!(form.errors().contains_key("email"));
        assert!(form.errors().contains_key("mtu"));
    }

    #[test]
    fn test_form_with_prefix() {
        let mut form = make_test_form().with_prefix("net");
        assert_eq!(form.prefix(), Some("net"));
        form.bind(&FormData::parse("net-hostname=nas&net-email=a@b.io"));
        assert!(form.is_valid());
    }

    #[test]
    fn test_from_kwargs_binds_when_data_given() {
        let kwargs = FormKwargs::new()
            .initial("hostname", "freenas")
            .data(FormData::parse("hostname=nas&email=a@b.io"));
        let mut form = BaseForm::from_kwargs(make_test_form().field_defs, &kwargs);
        assert!(form.is_bound());
        assert_eq!(form.initial().get("hostname"), Some(&Value::from("freenas")));
        assert!(form.is_valid());

        let unbound = BaseForm::from_kwargs(vec![], &FormKwargs::new());
        assert!(!unbound.is_bound());
    }

    #[test]
    fn test_remove_fields_except() {
        let mut form = make_test_form();
        let removed = form.remove_fields_except(&["email".to_string()]);
        assert_eq!(removed, vec!["hostname", "mtu"]);
        assert_eq!(form.field_names(), vec!["email"]);
    }

    #[test]
    fn test_add_error_and_non_field_errors() {
        let mut form = make_test_form();
        assert!(form.non_field_errors().is_empty());
        form.add_error(None, "first");
        form.add_error(None, "second");
        form.add_error(Some("hostname"), "taken");
        assert_eq!(form.non_field_errors(), ["first", "second"]);
        assert_eq!(form.errors()["hostname"], vec!["taken"]);
        assert!(form.has_errors());
    }

    #[test]
    fn test_merge_errors_after_clean() {
        let mut form = make_test_form();
        form.bind(&FormData::parse("hostname=nas&email=a@b.io"));
        form.clean_fields();
        assert!(!form.has_errors());
        let mut extra = HashMap::new();
        extra.insert(NON_FIELD_ERRORS.to_string(), vec!["conflict".to_string()]);
        form.merge_errors(extra);
        assert_eq!(form.non_field_errors(), ["conflict"]);
    }

    #[test]
    fn test_initial_for_falls_back_to_declared() {
        let mut form = BaseForm::new(vec![
            FormFieldDef::new("a", FormFieldType::char()).initial("declared"),
            FormFieldDef::new("b", FormFieldType::char()),
        ]);
        assert_eq!(form.initial_for("a"), Some(&Value::from("declared")));
        form.initial_mut().insert("a".into(), Value::from("override"));
        assert_eq!(form.initial_for("a"), Some(&Value::from("override")));
        assert_eq!(form.initial_for("b"), None);
    }

    #[test]
    fn test_disabled_field_cleans_to_form_initial() {
        let mut form = BaseForm::new(vec![
            FormFieldDef::new("name", FormFieldType::char()).disabled(true)
        ]);
        form.initial_mut().insert("name".into(), Value::from("stored"));
        form.bind(&FormData::parse("name=tampered"));
        assert!(form.is_valid());
        assert_eq!(form.cleaned_data().get("name"), Some(&Value::from("stored")));
    }

    #[test]
    fn test_unbound_renders_initial_and_bound_renders_data() {
        let mut initial = HashMap::new();
        initial.insert("hostname".to_string(), Value::from("freenas"));
        let mut form = make_test_form().with_initial(initial);
        assert!(form.as_table().contains(r#"value="freenas""#));
        form.bind(&FormData::parse("hostname=nas"));
        assert!(form.as_table().contains(r#"value="nas""#));
    }

    #[test]
    fn test_bind_multiple_select_joins_values() {
        let mut form = BaseForm::new(vec![FormFieldDef::new(
            "dow",
            FormFieldType::MultipleChoice {
                choices: (1..=7).map(|d| (d.to_string(), d.to_string())).collect(),
            },
        )]);
        assert_eq!(form.fields()[0].widget, WidgetType::SelectMultiple);
        form.bind(&FormData::parse("dow=1&dow=7"));
        assert!(form.is_valid());
        assert_eq!(form.cleaned_data()["dow"], Value::from(vec!["1", "7"]));
    }

    #[test]
    fn test_field_mut() {
        let mut form = make_test_form();
        if let Some(f) = form.field_mut("hostname") {
            f.label = "Hostname".to_string();
        }
        assert_eq!(form.field("hostname").map(|f| f.label.as_str()), Some("Hostname"));
        assert!(form.has_field("mtu"));
        assert!(!form.has_field("missing"));
    }
}
