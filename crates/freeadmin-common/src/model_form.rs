//! The model form adapter.
//!
//! [`ModelForm`] builds a form from a model's metadata and wraps one record.
//! Construction runs in this order:
//!
//! 1. Fields are generated from the model; initial values come from the
//!    instance, overridden by the caller's initial values. The form is bound
//!    when data was given.
//! 2. On an existing record whose table has a no-sync rule, a backup node
//!    keeps only the rule's fields.
//! 3. `form_init` hooks run.
//! 4. Dynamic choices are rerolled.
//!
//! Validation trims text entered through validation-text inputs, then runs
//! the cleaners registered for any inline formsets, and finally merges the
//! queued middleware errors into the form-level errors.

use std::collections::{BTreeMap, HashMap};

use freeadmin_core::logging::form_span;
use freeadmin_core::AdminResult;
use freeadmin_forms::data::FormData;
use freeadmin_forms::fields::FormFieldDef;
use freeadmin_forms::form::{self as base_form, BaseForm, Form as _, NON_FIELD_ERRORS};
use freeadmin_forms::formset::FormSet;
use freeadmin_forms::model::Model;
use freeadmin_forms::model_form::{generate_form_fields, instance_initial, ModelFormConfig};
use freeadmin_forms::value::Value;
use freeadmin_forms::widgets::WidgetType;
use freeadmin_hooks::{Events, RequestContext};

use crate::advanced::AdvancedFields;
use crate::form::{init_form, validation_result};
use crate::ha::FormServices;
use crate::kwargs::AdminFormKwargs;
use crate::middleware::MiddlewareErrorMap;
use crate::normalize;

/// Inline formsets submitted with a model form, keyed by formset name.
pub type FormSets = BTreeMap<String, FormSet>;

/// Cross-validates a model form against one of its inline formsets.
///
/// Implemented for closures, so a cleaner can be registered inline:
///
/// ```
/// use freeadmin_common::model_form::FormsetCleaner;
/// use freeadmin_forms::form::BaseForm;
/// use freeadmin_forms::formset::FormSet;
///
/// fn accepts(_: &dyn FormsetCleaner) {}
/// accepts(&|_form: &mut BaseForm, formset: &mut FormSet| formset.total_form_count() <= 4);
/// ```
pub trait FormsetCleaner: Send + Sync {
    /// Returns `false` if the pair is invalid. May add errors to either side.
    fn clean(&self, form: &mut BaseForm, formset: &mut FormSet) -> bool;
}

impl<F> FormsetCleaner for F
where
    F: Fn(&mut BaseForm, &mut FormSet) -> bool + Send + Sync,
{
    fn clean(&self, form: &mut BaseForm, formset: &mut FormSet) -> bool {
        self(form, formset)
    }
}

/// A form bound to one model record.
pub struct ModelForm<M: Model> {
    name: String,
    base: BaseForm,
    instance: M,
    advanced: AdvancedFields,
    middleware: MiddlewareErrorMap,
    parent: Option<String>,
    api_validation: bool,
    fserrors: Vec<String>,
    field_errors: Vec<(String, String)>,
    services: FormServices,
    formset_cleaners: HashMap<String, Box<dyn FormsetCleaner>>,
}

impl<M: Model> ModelForm<M> {
    /// Builds the form for `instance`.
    pub fn new(
        name: impl Into<String>,
        config: &ModelFormConfig,
        instance: M,
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

        let mut initial = instance_initial(&instance);
        initial.extend(base_kwargs.initial.clone());
        let mut form_kwargs = base_kwargs.clone();
        form_kwargs.initial = initial;
        let mut base = BaseForm::from_kwargs(generate_form_fields(config), &form_kwargs);

        if has_identity(&instance) {
            if let Some(visible) = services.no_sync.visible_fields(M::table_name()) {
                if services.is_backup() {
                    let removed = base.remove_fields_except(visible);
                    tracing::debug!(
                        target: "freeadmin::forms",
                        table = M::table_name(),
                        removed = ?removed,
                        "pruned synchronized fields on backup node"
                    );
                }
            }
        }

        init_form(services, &name, &mut base, &base_kwargs);
        tracing::debug!(
            target: "freeadmin::forms",
            bound = base.is_bound(),
            fields = base.fields().len(),
            "model form constructed"
        );

        Self {
            name,
            base,
            instance,
            advanced: advanced_fields,
            middleware,
            parent,
            api_validation,
            fserrors: Vec::new(),
            field_errors: Vec::new(),
            services: services.clone(),
            formset_cleaners: HashMap::new(),
        }
    }

    /// Registers the cleaner run against the formset named `formset`.
    #[must_use]
    pub fn with_formset_cleaner(
        mut self,
        formset: impl Into<String>,
        cleaner: impl FormsetCleaner + 'static,
    ) -> Self {
        self.register_formset_cleaner(formset, cleaner);
        self
    }

    /// Registers the cleaner run against the formset named `formset`,
    /// replacing any previous one.
    pub fn register_formset_cleaner(
        &mut self,
        formset: impl Into<String>,
        cleaner: impl FormsetCleaner + 'static,
    ) {
        self.formset_cleaners
            .insert(formset.into(), Box::new(cleaner));
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

    /// Returns the record this form edits.
    pub const fn instance(&self) -> &M {
        &self.instance
    }

    /// Returns the record mutably.
    pub fn instance_mut(&mut self) -> &mut M {
        &mut self.instance
    }

    /// Returns `true` if the record already exists (has a primary key).
    pub fn has_identity(&self) -> bool {
        has_identity(&self.instance)
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

    /// Queued form-level errors not yet merged into the form's errors.
    pub fn fserrors(&self) -> &[String] {
        &self.fserrors
    }

    /// Queues a form-level error, merged into `__all__` on the next
    /// [`is_valid`](Self::is_valid).
    pub fn add_middleware_error(&mut self, message: impl Into<String>) {
        self.fserrors.push(message.into());
    }

    /// Attaches a middleware validation error to the field `attr` maps to.
    /// When the form has no such field the error is queued as a form-level
    /// error.
    ///
    /// A field error shows on the form at once and is also kept, so a later
    /// [`is_valid`](Self::is_valid) merges it back in with the queued
    /// form-level errors.
    pub fn report_middleware_error(&mut self, attr: &str, message: impl Into<String>) {
        let field = self.middleware.field_for(attr);
        if self.base.has_field(&field) {
            let message = message.into();
            self.base.add_error(Some(&field), message.clone());
            self.field_errors.push((field, message));
        } else {
            tracing::debug!(target: "freeadmin::forms", attr, field = %field, "no field for middleware error");
            self.add_middleware_error(message);
        }
    }

    /// Rewrites a multiple-choice initial value as a list.
    ///
    /// See [`normalize::normalize_multichoice`].
    pub fn normalize_multichoice(
        &mut self,
        field: &str,
        default: impl Into<Value>,
    ) -> AdminResult<()> {
        let has_identity = self.has_identity();
        normalize::normalize_multichoice(&mut self.base, has_identity, field, default)
    }

    /// Trims surrounding whitespace from text entered through
    /// validation-text inputs.
    pub fn clean(&mut self) {
        let names: Vec<String> = self
            .base
            .fields()
            .iter()
            .filter(|f| f.widget == WidgetType::ValidationTextInput)
            .map(|f| f.name.clone())
            .collect();
        let cleaned = self.base.cleaned_data_mut();
        for name in names {
            if let Some(Value::String(s)) = cleaned.get_mut(&name) {
                let trimmed = s.trim();
                if trimmed.len() != s.len() {
                    *s = trimmed.to_string();
                }
            }
        }
    }

    /// Validates the form, then each formset that has a registered cleaner.
    ///
    /// Returns `false` as soon as the form itself is invalid, without running
    /// any formset cleaner. Otherwise every matching cleaner runs and the
    /// result is the conjunction of theirs. Reported middleware errors are
    /// merged last, field errors onto their fields and queued form-level
    /// errors into `__all__`; they do not change the result.
    pub fn is_valid(&mut self, formsets: Option<&mut FormSets>) -> bool {
        if !self.base.is_bound() {
            return false;
        }
        self.base.clean_fields();
        self.clean();
        if self.base.has_errors() {
            return false;
        }

        let mut valid = true;
        if let Some(formsets) = formsets {
            for (name, formset) in formsets.iter_mut() {
                if let Some(cleaner) = self.formset_cleaners.get(name) {
                    let ok = cleaner.clean(&mut self.base, formset);
                    if !ok {
                        tracing::debug!(target: "freeadmin::forms", formset = %name, "formset cleaner failed");
                    }
                    valid &= ok;
                }
            }
        }

        let mut extra: HashMap<String, Vec<String>> = HashMap::new();
        for (field, message) in &self.field_errors {
            extra.entry(field.clone()).or_default().push(message.clone());
        }
        if !self.fserrors.is_empty() {
            extra.insert(NON_FIELD_ERRORS.to_string(), self.fserrors.clone());
        }
        if !extra.is_empty() {
            self.base.merge_errors(extra);
        }

        valid
    }

    /// Validates like [`is_valid`](Self::is_valid), returning the form's
    /// errors when it is invalid.
    ///
    /// API requests use this to report errors instead of re-rendering the
    /// form.
    pub fn validate(&mut self, formsets: Option<&mut FormSets>) -> AdminResult<()> {
        let valid = self.is_valid(formsets);
        validation_result(&self.base, valid)
    }

    /// Deletes the record, then runs the `form_delete` hooks.
    ///
    /// Hooks do not run when the delete fails.
    pub fn delete(
        &mut self,
        request: Option<&RequestContext>,
        events: &mut Events,
    ) -> AdminResult<()> {
        self.instance.delete()?;
        tracing::info!(target: "freeadmin::forms", form = %self.name, table = M::table_name(), "record deleted");
        self.services
            .hooks
            .hook_form_delete(&self.name, &self.base, request, events);
        Ok(())
    }

    /// Runs the `form_done` hooks.
    pub fn done(&self, request: Option<&RequestContext>, events: &mut Events) {
        self.services
            .hooks
            .hook_form_done(&self.name, &self.base, request, events);
    }

    /// Renders the form as HTML table rows.
    pub fn as_table(&self) -> String {
        self.base.as_table()
    }
}

impl<M: Model> std::fmt::Debug for ModelForm<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelForm")
            .field("name", &self.name)
            .field("table", &M::table_name())
            .field("base", &self.base)
            .field("fserrors", &self.fserrors)
            .field("field_errors", &self.field_errors)
            .field(
                "formset_cleaners",
                &self.formset_cleaners.keys().collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl<M: Model> base_form::Form for ModelForm<M> {
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
        Self::is_valid(self, None)
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

fn has_identity<M: Model>(instance: &M) -> bool {
    instance.pk().is_some_and(|pk| !pk.is_null())
}
