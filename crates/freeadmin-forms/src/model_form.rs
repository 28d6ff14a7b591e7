//! Form fields generated from model metadata.
//!
//! [`ModelFormConfig`] specifies how to generate form fields from a model's
//! [`ModelMeta`]. [`generate_form_fields`] creates [`FormFieldDef`] instances
//! from the model's [`ModelFieldDef`] entries, and [`instance_initial`] seeds
//! initial values from an existing record.

use std::collections::HashMap;

use crate::fields::{FormFieldDef, FormFieldType};
use crate::model::{Model, ModelFieldDef, ModelFieldType, ModelMeta};
use crate::value::Value;
use crate::widgets::WidgetType;

/// Configuration for generating a model-backed form.
///
/// Specifies which model fields to include/exclude and allows overriding
/// widgets, labels, and help texts for the generated form fields.
#[derive(Debug, Clone)]
pub struct ModelFormConfig {
    /// The model metadata to generate fields from.
    pub model_meta: &'static ModelMeta,
    /// Which model fields to include in the form.
    pub fields: ModelFormFields,
    /// Widget overrides keyed by field name.
    pub widgets: HashMap<String, WidgetType>,
    /// Label overrides keyed by field name.
    pub labels: HashMap<String, String>,
    /// Help text overrides keyed by field name.
    pub help_texts: HashMap<String, String>,
}

/// Specifies which model fields to include in a model form.
#[derive(Debug, Clone)]
pub enum ModelFormFields {
    /// Include all editable fields.
    All,
    /// Include only the specified fields.
    Include(Vec<String>),
    /// Include all fields except the specified ones.
    Exclude(Vec<String>),
}

impl ModelFormConfig {
    /// Creates a new `ModelFormConfig` with all fields included.
    pub fn new(model_meta: &'static ModelMeta) -> Self {
        Self {
            model_meta,
            fields: ModelFormFields::All,
            widgets: HashMap::new(),
            labels: HashMap::new(),
            help_texts: HashMap::new(),
        }
    }

    /// Sets which fields to include.
    #[must_use]
    pub fn with_fields(mut self, fields: ModelFormFields) -> Self {
        self.fields = fields;
        self
    }

    /// Adds a widget override for a specific field.
    #[must_use]
    pub fn with_widget(mut self, field_name: impl Into<String>, widget: WidgetType) -> Self {
        self.widgets.insert(field_name.into(), widget);
        self
    }

    /// Adds a label override for a specific field.
    #[must_use]
    pub fn with_label(mut self, field_name: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(field_name.into(), label.into());
        self
    }

    /// Adds a help text override for a specific field.
    #[must_use]
    pub fn with_help_text(
        mut self,
        field_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.help_texts.insert(field_name.into(), text.into());
        self
    }

    fn includes(&self, name: &str) -> bool {
        match &self.fields {
            ModelFormFields::All => true,
            ModelFormFields::Include(include) => include.iter().any(|f| f == name),
            ModelFormFields::Exclude(exclude) => !exclude.iter().any(|f| f == name),
        }
    }
}

/// Generates form field definitions from a model form configuration.
///
/// Non-editable fields and primary keys are skipped. A field is required
/// unless it is nullable, may be blank, has a default, or is a boolean (an
/// unchecked box submits nothing).
pub fn generate_form_fields(config: &ModelFormConfig) -> Vec<FormFieldDef> {
    config
        .model_meta
        .fields
        .iter()
        .filter(|f| f.editable && !f.primary_key && config.includes(f.name))
        .map(|model_field| {
            let mut form_field =
                FormFieldDef::new(model_field.name, model_field_to_form_field_type(model_field));

            form_field.required = !model_field.null
                && !model_field.blank
                && model_field.default.is_none()
                && model_field.field_type != ModelFieldType::BooleanField;

            if let Some(widget) = config.widgets.get(model_field.name) {
                form_field.widget = *widget;
            }
            form_field.label = config
                .labels
                .get(model_field.name)
                .cloned()
                .unwrap_or_else(|| capitalize(&model_field.verbose_name));
            form_field.help_text = config
                .help_texts
                .get(model_field.name)
                .cloned()
                .unwrap_or_else(|| model_field.help_text.clone());
            form_field.initial.clone_from(&model_field.default);

            form_field
        })
        .collect()
}

/// Returns an instance's field values as a form initial map.
pub fn instance_initial<M: Model>(instance: &M) -> HashMap<String, Value> {
    instance
        .field_values()
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Converts a model field type to a form field type.
fn model_field_to_form_field_type(field_def: &ModelFieldDef) -> FormFieldType {
    if let Some(choices) = &field_def.choices {
        return FormFieldType::Choice {
            choices: choices.clone(),
        };
    }
    match field_def.field_type {
        ModelFieldType::CharField | ModelFieldType::TextField => FormFieldType::Char {
            min_length: None,
            max_length: field_def.max_length,
            strip: false,
        },
        ModelFieldType::IntegerField | ModelFieldType::AutoField => FormFieldType::Integer {
            min_value: None,
            max_value: None,
        },
        ModelFieldType::BooleanField => FormFieldType::Boolean,
        ModelFieldType::EmailField => FormFieldType::Email,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
