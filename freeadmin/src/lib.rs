//! # freeadmin
//!
//! Forms for an appliance administration UI.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `freeadmin` to get everything, or depend on individual
//! crates for finer-grained control.

/// Settings, the no-sync map, logging setup, and error types.
pub use freeadmin_core as core;

/// Fields, widgets, `BaseForm`, formsets, and model metadata.
pub use freeadmin_forms as forms;

/// The plugin registry forms report their lifecycle to.
#[cfg(feature = "hooks")]
pub use freeadmin_hooks as hooks;

/// `ModelForm` and `Form` adapters, cron normalization, HA pruning.
#[cfg(feature = "common")]
pub use freeadmin_common as common;

/// Third-party crates re-exported so downstream code uses matching versions.
pub use serde;
pub use serde_json;
pub use tracing;
pub use tracing_subscriber;

/// The types most form code needs.
///
/// ```
/// use freeadmin::prelude::*;
///
/// let mut form = BaseForm::new(vec![FormFieldDef::new("hostname", FormFieldType::char())]);
/// form.bind(&FormData::parse("hostname=nas"));
/// assert!(form.is_valid());
/// ```
pub mod prelude {
    pub use freeadmin_core::{AdminError, AdminResult, NoSyncMap, NoSyncRule, Settings};
    pub use freeadmin_forms::{
        BaseForm, Form, FormData, FormFieldDef, FormFieldType, FormKwargs, FormSet, Model,
        ModelFieldDef, ModelFieldType, ModelFormConfig, ModelMeta, Rerollable, Value, WidgetType,
        NON_FIELD_ERRORS,
    };

    #[cfg(feature = "hooks")]
    pub use freeadmin_hooks::{AppPool, Events, FormPlugin, RequestContext};

    #[cfg(feature = "common")]
    pub use freeadmin_common::{
        AdminFormKwargs, FailoverNotifier, FailoverStatus, FormServices, FormsetCleaner,
        MiddlewareErrorMap, ModelForm,
    };
}
