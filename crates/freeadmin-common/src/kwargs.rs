//! Construction arguments for the form adapters.

use freeadmin_forms::data::FormData;
use freeadmin_forms::form::FormKwargs;
use freeadmin_forms::value::Value;

use crate::advanced::AdvancedFields;
use crate::middleware::MiddlewareErrorMap;

/// Arguments accepted by [`ModelForm::new`](crate::model_form::ModelForm::new)
/// and [`Form::new`](crate::form::Form::new).
///
/// `api_validation` and `parent` are consumed by the adapter; only `base` is
/// forwarded to the form and to `form_init` hooks.
#[derive(Debug, Clone, Default)]
pub struct AdminFormKwargs {
    /// Data, initial values, and prefix for the underlying form.
    pub base: FormKwargs,
    /// Whether the form validates an API request rather than a UI post.
    pub api_validation: bool,
    /// Name of the form or view this form is nested in.
    pub parent: Option<String>,
    /// The form's advanced fields.
    pub advanced_fields: AdvancedFields,
    /// How middleware error attributes map to this form's fields.
    pub middleware: MiddlewareErrorMap,
}

impl AdminFormKwargs {
    /// Creates empty kwargs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the submitted data.
    #[must_use]
    pub fn data(mut self, data: FormData) -> Self {
        self.base = self.base.data(data);
        self
    }

    /// Adds an initial value.
    #[must_use]
    pub fn initial(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.base = self.base.initial(name, value);
        self
    }

    /// Sets the field name prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.base = self.base.prefix(prefix);
        self
    }

    /// Marks the form as validating an API request.
    #[must_use]
    pub const fn api_validation(mut self, api_validation: bool) -> Self {
        self.api_validation = api_validation;
        self
    }

    /// Sets the parent.
    #[must_use]
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Sets the advanced fields.
    #[must_use]
    pub fn advanced_fields(mut self, fields: AdvancedFields) -> Self {
        self.advanced_fields = fields;
        self
    }

    /// Sets the middleware error mapping.
    #[must_use]
    pub fn middleware(mut self, middleware: MiddlewareErrorMap) -> Self {
        self.middleware = middleware;
        self
    }
}
