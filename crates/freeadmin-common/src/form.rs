//! The plain form adapter.
//!
//! [`Form`] wraps a [`BaseForm`] built from explicit field definitions. On
//! construction it runs the `form_init` hooks and rerolls dynamic choices;
//! after a save it runs the `form_done` hooks.

use std::collections::HashMap;

use freeadmin_core::logging::form_span;
use freeadmin_core::{AdminResult, ValidationError};
use freeadmin_forms::data::FormData;
use freeadmin_forms::fields::FormFieldDef;
use freeadmin_forms::form::{self as base_form, BaseForm, Form as _, FormKwargs, NON_FIELD_ERRORS};
use freeadmin_forms::value::Value;
use freeadmin_hooks::{Events, RequestContext};

use crate::advanced::AdvancedFields;
use crate::ha::FormServices;
use crate::kwargs::AdminFormKwargs;
use crate::middleware::MiddlewareErrorMap;

/// Runs the `form_init` hooks on `form`, then rerolls every field's choices.
pub(crate) fn init_form(
    services: &FormServices,
    name: &str,
    form: &mut BaseForm,
    kwargs: &FormKwargs,
) {
    services.hooks.hook_form_init(name, form, kwargs);
    let rerolled = form
        .fields_mut()
        .iter_mut()
        .map(FormFieldDef::reroll)
        .filter(|&r| r)
        .count();
    if rerolled > 0 {
        tracing::trace!(target: "freeadmin::forms", rerolled, "rerolled dynamic choices");
    }
}

/// Turns a validation outcome into a result carrying the form's errors.
pub(crate) fn validation_result(form: &BaseForm, valid: bool) -> AdminResult<()> {
    if valid {
        return Ok(());
    }
    let mut err = ValidationError::from(form.errors());
    if !form.is_bound() {
        err = err.with_error(NON_FIELD_ERRORS, "No data was submitted.");
    }
    Err(err.into())
}

/// A non-model form.
///
/// # Examples
///
/// ```
/// use freeadmin_common::form::Form;
/// use freeadmin_common::ha::FormServices;
/// use freeadmin_common::kwargs::AdminFormKwargs;
/// use freeadmin_forms::data::FormData;
/// use freeadmin_forms::fields::{FormFieldDef, FormFieldType};
///
/// let services = FormServices::default();
/// let mut form = Form::new(
///     "ShutdownForm",
///     vec![FormFieldDef::new("confirm", FormFieldType::Boolean)],
///     AdminFormKwargs::new().data(FormData::parse("confirm=on")),
///     &services,
/// );
/// assert!(form.is_valid());
/// ```
#[derive(Debug)]
pub struct Form {
    name: String,
    base: BaseForm,
    advanced: AdvancedFields,
    middleware: MiddlewareErrorMap,
    parent: Option<String>,
    api_validation: bool,
    middleware_errors: Vec<(String, String)>,
    services: FormServices,
}

impl Form {
    /// Builds the form and runs its `form_init` hooks.
    pub fn new(
        name: impl Into<String>,
        fields: Vec<FormFieldDef>,
        kwargs: AdminFormKwargs,
        services: &FormServices,
    ) -> Self {
        let name = name.into();
        let span = form_span(&name);
        let _guard = span.enter();

        let AdminFormKwargs {
            base: base_kwargs,
            api_validation,
            parent,
            advanced_fields,
            middleware,
        } = kwargs;

        let mut base = BaseForm::from_kwargs(fields, &base_kwargs);
        init_form(services, &name, &mut base, &base_kwargs);
        tracing::debug!(target: "freeadmin::forms", bound = base.is_bound(), "form constructed");

        Self {
            name,
            base,
            advanced: advanced_fields,
            middleware,
            parent,
            api_validation,
            middleware_errors: Vec::new(),
            services: services.clone(),
        }
    }

    /// Returns the form's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the wrapped form.
    pub const fn base(&self) -> &BaseForm {
        &self.base
    }

    /// Returns the wrapped form mutably.
    pub fn base_mut(&mut self) -> &mut BaseForm {
        &mut self.base
    }

    /// Returns `true` if the form declares advanced fields.
    pub fn is_advanced(&self) -> bool {
        self.advanced.is_advanced()
    }

    /// Returns the advanced field names.
    pub const fn advanced_fields(&self) -> &AdvancedFields {
        &self.advanced
    }

    /// Returns `true` when validating an API request.
    pub const fn api_validation(&self) -> bool {
        self.api_validation
    }

    /// Returns the parent form or view name.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Returns the middleware error mapping.
    pub const fn middleware(&self) -> &MiddlewareErrorMap {
        &self.middleware
    }

    /// Validates the form's fields, then merges back any reported
    /// middleware errors. Those do not change the result.
    pub fn is_valid(&mut self) -> bool {
        let valid = base_form::Form::is_valid(&mut self.base);
        if self.base.is_bound() && !self.middleware_errors.is_empty() {
            let mut extra: HashMap<String, Vec<String>> = HashMap::new();
            for (key, message) in &self.middleware_errors {
                extra.entry(key.clone()).or_default().push(message.clone());
            }
            self.base.merge_errors(extra);
        }
        valid
    }

    /// Validates the form, returning its errors when it is invalid.
    pub fn validate(&mut self) -> AdminResult<()> {
        let valid = self.is_valid();
        validation_result(&self.base, valid)
    }

    /// Attaches a middleware validation error to the field `attr` maps to,
    /// or to the form's non-field errors when there is no such field.
    ///
    /// The error is kept, so a later [`is_valid`](Self::is_valid) does not
    /// drop it.
    pub fn report_middleware_error(&mut self, attr: &str, message: impl Into<String>) {
        let field = self.middleware.field_for(attr);
        let key = if self.base.has_field(&field) {
            field
        } else {
            NON_FIELD_ERRORS.to_string()
        };
        let message = message.into();
        self.base.add_error(Some(&key), message.clone());
        self.middleware_errors.push((key, message));
    }

    /// Runs the `form_done` hooks.
    pub fn done(&self, request: Option<&RequestContext>, events: &mut Events) {
        self.services
            .hooks
            .hook_form_done(&self.name, &self.base, request, events);
    }

    /// Renders the form as HTML table rows.
    pub fn as_table(&self) -> String {
        base_form::Form::as_table(&self.base)
    }
}

impl base_form::Form for Form {
    fn fields(&self) -> &[FormFieldDef] {
        self.base.fields()
    }

    fn initial(&self) -> &HashMap<String, Value> {
        self.base.initial()
    }

    fn prefix(&self) -> Option<&str> {
        self.base.prefix()
    }

    fn bind(&mut self, data: &FormData) {
        self.base.bind(data);
    }

    fn is_bound(&self) -> bool {
        self.base.is_bound()
    }

    fn is_valid(&mut self) -> bool {
        Self::is_valid(self)
    }

    fn errors(&self) -> &HashMap<String, Vec<String>> {
        self.base.errors()
    }

    fn cleaned_data(&self) -> &HashMap<String, Value> {
        self.base.cleaned_data()
    }

    fn as_table(&self) -> String {
        Self::as_table(self)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use freeadmin_forms::fields::FormFieldType;
    use freeadmin_forms::form::Form as _;
    use freeadmin_hooks::FormPlugin;

    use super::*;

    fn fields() -> Vec<FormFieldDef> {
        vec![
            FormFieldDef::new("gc_hostname", FormFieldType::char()),
            FormFieldDef::new("gc_domain", FormFieldType::char()).required(false),
        ]
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl FormPlugin for Recorder {
        fn form_init(&self, form_name: &str, form: &mut BaseForm, kwargs: &FormKwargs) {
            self.0
                .lock()
                .unwrap()
                .push(format!("init {form_name} {}", kwargs.initial.len()));
            form.initial_mut().insert("gc_domain".into(), "local".into());
        }

        fn form_done(
            &self,
            form_name: &str,
            _form: &BaseForm,
            _request: Option<&RequestContext>,
            events: &mut Events,
        ) {
            events.push(format!("refresh {form_name}"));
        }
    }

    #[test]
    fn test_kwargs_are_consumed() {
        let form = Form::new(
            "NetworkForm",
            fields(),
            AdminFormKwargs::new().api_validation(true).parent("Network"),
            &FormServices::default(),
        );
        assert!(form.api_validation());
        assert_eq!(form.parent(), Some("Network"));
        assert!(!base_form::Form::is_bound(&form));
        assert!(!form.is_advanced());
    }

    #[test]
    fn test_init_and_done_hooks() {
        let services = FormServices::default();
        let recorder = Arc::new(Recorder::default());
        services.hooks.register("recorder", recorder.clone());

        let form = Form::new(
            "NetworkForm",
            fields(),
            AdminFormKwargs::new().initial("gc_hostname", "nas"),
            &services,
        );
        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec!["init NetworkForm 1".to_string()]
        );
        assert_eq!(form.base().initial()["gc_domain"], Value::from("local"));

        let mut events = Events::new();
        form.done(None, &mut events);
        assert_eq!(events, vec!["refresh NetworkForm".to_string()]);
    }

    #[test]
    fn test_is_valid_unbound_is_false() {
        let mut form = Form::new("F", fields(), AdminFormKwargs::new(), &FormServices::default());
        assert!(!form.is_valid());
    }

    #[test]
    fn test_is_valid_bound() {
        let mut form = Form::new(
            "F",
            fields(),
            AdminFormKwargs::new().data(FormData::parse("gc_hostname=nas")),
            &FormServices::default(),
        );
        assert!(form.is_valid());
        assert_eq!(form.base().cleaned_data()["gc_hostname"], Value::from("nas"));
    }

    #[test]
    fn test_validate_reports_errors() {
        let mut form = Form::new(
            "F",
            fields(),
            AdminFormKwargs::new().data(FormData::parse("gc_domain=local")),
            &FormServices::default(),
        );
        let err = form.validate().unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("gc_hostname"), "{err}");

        let mut unbound = Form::new("F", fields(), AdminFormKwargs::new(), &FormServices::default());
        let err = unbound.validate().unwrap_err();
        assert!(err.to_string().contains("No data was submitted."), "{err}");
    }

    #[test]
    fn test_report_middleware_error() {
        let mut form = Form::new(
            "F",
            fields(),
            AdminFormKwargs::new()
                .middleware(MiddlewareErrorMap::new().with_prefix("gc_")),
            &FormServices::default(),
        );
        form.report_middleware_error("hostname", "Invalid hostname");
        form.report_middleware_error("ipv4gateway", "Unreachable");
        assert_eq!(form.base().errors()["gc_hostname"], vec!["Invalid hostname"]);
        assert_eq!(form.base().non_field_errors(), ["Unreachable".to_string()]);
    }

    #[test]
    fn test_middleware_errors_survive_revalidation() {
        let mut form = Form::new(
            "F",
            fields(),
            AdminFormKwargs::new()
                .data(FormData::parse("gc_hostname=nas"))
                .middleware(MiddlewareErrorMap::new().with_prefix("gc_")),
            &FormServices::default(),
        );
        assert!(form.is_valid());
        form.report_middleware_error("hostname", "Invalid hostname");
        form.report_middleware_error("ipv4gateway", "Unreachable");

        assert!(form.is_valid());
        assert_eq!(form.base().errors()["gc_hostname"], vec!["Invalid hostname"]);
        assert_eq!(form.base().non_field_errors(), ["Unreachable".to_string()]);
    }
}
