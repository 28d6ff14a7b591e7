//! # freeadmin-forms
//!
//! The forms framework the freeadmin adapters are layered on. Provides field
//! definitions with validation, widgets for HTML rendering, bound fields,
//! [`BaseForm`](form::BaseForm), formsets, table rendering, and field
//! generation from model metadata.
//!
//! ## Modules
//!
//! - [`value`] - The [`Value`](value::Value) type for initial and cleaned data
//! - [`data`] - Submitted form payloads
//! - [`fields`] - Field definitions, rerollable choice sources, and cleaning
//! - [`widgets`] - HTML widgets
//! - [`bound_field`] - Fields paired with values and errors
//! - [`validation`] - The field-level validation pipeline
//! - [`html`] - Row-based HTML output (`as_table`)
//! - [`form`] - The [`Form`](form::Form) trait and `BaseForm`
//! - [`formset`] - Collections of related forms
//! - [`model`] - Model metadata and the [`Model`](model::Model) trait
//! - [`model_form`] - Generating form fields from model metadata

pub mod bound_field;
pub mod data;
pub mod fields;
pub mod form;
pub mod formset;
pub mod html;
pub mod model;
pub mod model_form;
pub mod validation;
pub mod value;
pub mod widgets;

pub use data::FormData;
pub use fields::{FormFieldDef, FormFieldType, Rerollable};
pub use form::{BaseForm, Form, FormKwargs, NON_FIELD_ERRORS};
pub use formset::FormSet;
pub use model::{Model, ModelFieldDef, ModelFieldType, ModelMeta};
pub use model_form::{ModelFormConfig, ModelFormFields};
pub use value::Value;
pub use widgets::WidgetType;
