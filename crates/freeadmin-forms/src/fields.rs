//! Form field definitions and type-level validation.
//!
//! A [`FormFieldDef`] describes one field: its type, widget, label, initial
//! value, and an optional [`Rerollable`] choice source. Fields whose choices
//! depend on runtime state (system users, pools, interfaces) carry a choice
//! source, and forms reroll them on every construction so a form never shows
//! a stale option list.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::value::Value;
use crate::widgets::WidgetType;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});

/// The type of a form field, with its type-specific parameters.
#[derive(Debug, Clone)]
pub enum FormFieldType {
    /// A character (string) field.
    Char {
        /// Minimum length (characters).
        min_length: Option<usize>,
        /// Maximum length (characters).
        max_length: Option<usize>,
        /// Whether to strip leading/trailing whitespace while cleaning.
        strip: bool,
    },
    /// An integer field.
    Integer {
        /// Minimum allowed value.
        min_value: Option<i64>,
        /// Maximum allowed value.
        max_value: Option<i64>,
    },
    /// A boolean field.
    Boolean,
    /// An email address field.
    Email,
    /// A single-choice field.
    Choice {
        /// Available choices as `(value, display_label)` pairs.
        choices: Vec<(String, String)>,
    },
    /// A multiple-choice field. Submitted values arrive comma-joined.
    MultipleChoice {
        /// Available choices as `(value, display_label)` pairs.
        choices: Vec<(String, String)>,
    },
}

impl FormFieldType {
    /// A plain text field with no length limits that does not strip input.
    pub const fn char() -> Self {
        Self::Char {
            min_length: None,
            max_length: None,
            strip: false,
        }
    }
}

/// A source of dynamic choices, recomputed each time a form is built.
///
/// # Examples
///
/// ```
/// use freeadmin_forms::fields::{FormFieldDef, FormFieldType, Rerollable};
/// use std::sync::Arc;
///
/// #[derive(Debug)]
/// struct Shells;
///
/// impl Rerollable for Shells {
///     fn reroll(&self) -> Vec<(String, String)> {
///         vec![("/bin/sh".into(), "sh".into()), ("/bin/csh".into(), "csh".into())]
///     }
/// }
///
/// let mut field = FormFieldDef::new("shell", FormFieldType::Choice { choices: vec![] })
///     .rerollable(Arc::new(Shells));
/// assert!(field.reroll());
/// assert_eq!(field.choices().len(), 2);
/// ```
pub trait Rerollable: Send + Sync + fmt::Debug {
    /// Returns the current `(value, label)` choices.
    fn reroll(&self) -> Vec<(String, String)>;
}

/// Complete definition of a form field.
#[derive(Debug, Clone)]
pub struct FormFieldDef {
    /// The field name.
    pub name: String,
    /// The field type, controlling parsing and coercion.
    pub field_type: FormFieldType,
    /// Whether this field is required.
    pub required: bool,
    /// Declared initial value, used when the form's initial map has none.
    pub initial: Option<Value>,
    /// Help text displayed alongside the field.
    pub help_text: String,
    /// Human-readable label.
    pub label: String,
    /// The widget type used for rendering.
    pub widget: WidgetType,
    /// Custom error messages keyed by error code.
    pub error_messages: HashMap<String, String>,
    /// Whether the field is disabled (rendered but not editable).
    pub disabled: bool,
    /// Dynamic choice source, if the field's choices depend on runtime state.
    pub choice_source: Option<Arc<dyn Rerollable>>,
}

impl FormFieldDef {
    /// Creates a required field with the default widget for its type and a
    /// label derived from the name.
    pub fn new(name: impl Into<String>, field_type: FormFieldType) -> Self {
        let name = name.into();
        let widget = default_widget_for_field_type(&field_type);
        let label = default_label(&name);
        Self {
            name,
            field_type,
            required: true,
            initial: None,
            help_text: String::new(),
            label,
            widget,
            error_messages: HashMap::new(),
            disabled: false,
            choice_source: None,
        }
    }

    /// Sets whether this field is required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the declared initial value.
    #[must_use]
    pub fn initial(mut self, value: impl Into<Value>) -> Self {
        self.initial = Some(value.into());
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the widget type.
    #[must_use]
    pub fn widget(mut self, widget: WidgetType) -> Self {
        self.widget = widget;
        self
    }

    /// Sets a custom error message for a given code.
    #[must_use]
    pub fn error_message(mut self, code: impl Into<String>, msg: impl Into<String>) -> Self {
        self.error_messages.insert(code.into(), msg.into());
        self
    }

    /// Sets whether this field is disabled.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Attaches a dynamic choice source.
    #[must_use]
    pub fn rerollable(mut self, source: Arc<dyn Rerollable>) -> Self {
        self.choice_source = Some(source);
        self
    }

    /// Returns `true` if the field has a dynamic choice source.
    pub fn is_rerollable(&self) -> bool {
        self.choice_source.is_some()
    }

    /// Recomputes the field's choices from its choice source.
    ///
    /// Returns `false` when the field has no choice source. Fields that are
    /// not choice fields keep their type; the source is still consulted.
    pub fn reroll(&mut self) -> bool {
        let Some(source) = &self.choice_source else {
            return false;
        };
        let fresh = source.reroll();
        match &mut self.field_type {
            FormFieldType::Choice { choices } | FormFieldType::MultipleChoice { choices } => {
                *choices = fresh;
            }
            _ => {}
        }
        true
    }

    /// Returns the field's choices (empty for non-choice fields).
    pub fn choices(&self) -> &[(String, String)] {
        match &self.field_type {
            FormFieldType::Choice { choices } | FormFieldType::MultipleChoice { choices } => {
                choices
            }
            _ => &[],
        }
    }

    fn message(&self, code: &str, default: impl FnOnce() -> String) -> String {
        self.error_messages
            .get(code)
            .cloned()
            .unwrap_or_else(default)
    }
}

/// Derives a label from a field name: `gc_hostname` becomes `Gc hostname`.
fn default_label(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Returns the default widget type for a given form field type.
pub const fn default_widget_for_field_type(field_type: &FormFieldType) -> WidgetType {
    match field_type {
        FormFieldType::Char { .. } => WidgetType::TextInput,
        FormFieldType::Integer { .. } => WidgetType::NumberInput,
        FormFieldType::Boolean => WidgetType::CheckboxInput,
        FormFieldType::Email => WidgetType::EmailInput,
        FormFieldType::Choice { .. } => WidgetType::Select,
        FormFieldType::MultipleChoice { .. } => WidgetType::SelectMultiple,
    }
}

/// Cleans (validates and coerces) a raw submitted string into a [`Value`].
///
/// 1. Required check (missing or empty input)
/// 2. Type coercion
/// 3. Type-specific constraints (lengths, bounds, choices)
pub fn clean_field_value(field: &FormFieldDef, raw: Option<&str>) -> Result<Value, Vec<String>> {
    let raw_str = raw.unwrap_or("");

    if raw_str.is_empty() {
        if field.required {
            return Err(vec![
                field.message("required", || "This field is required.".to_string())
            ]);
        }
        if matches!(field.field_type, FormFieldType::Boolean) {
            return Ok(Value::Bool(false));
        }
        return Ok(field.initial.clone().unwrap_or(Value::Null));
    }

    let mut errors = Vec::new();

    let value = match &field.field_type {
        FormFieldType::Char {
            min_length,
            max_length,
            strip,
        } => {
            let s = if *strip { raw_str.trim() } else { raw_str };
            let len = s.chars().count();
            if let Some(min) = min_length {
                if len < *min {
                    errors.push(format!(
                        "Ensure this value has at least {min} characters (it has {len})."
                    ));
                }
            }
            if let Some(max) = max_length {
                if len > *max {
                    errors.push(format!(
                        "Ensure this value has at most {max} characters (it has {len})."
                    ));
                }
            }
            Value::String(s.to_string())
        }

        FormFieldType::Integer {
            min_value,
            max_value,
        } => match raw_str.trim().parse::<i64>() {
            Ok(n) => {
                if let Some(min) = min_value {
                    if n < *min {
                        errors.push(format!(
                            "Ensure this value is greater than or equal to {min}."
                        ));
                    }
                }
                if let Some(max) = max_value {
                    if n > *max {
                        errors.push(format!("Ensure this value is less than or equal to {max}."));
                    }
                }
                Value::Int(n)
            }
            Err(_) => {
                errors.push(field.message("invalid", || "Enter a whole number.".to_string()));
                Value::Null
            }
        },

        FormFieldType::Boolean => Value::Bool(matches!(
            raw_str.to_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        )),

        FormFieldType::Email => {
            let s = raw_str.trim();
            if !EMAIL_RE.is_match(s) {
                errors.push(field.message("invalid", || "Enter a valid email address.".to_string()));
            }
            Value::String(s.to_string())
        }

        FormFieldType::Choice { choices } => {
            if !choices.iter().any(|(v, _)| v == raw_str) {
                errors.push(format!(
                    "Select a valid choice. {raw_str} is not one of the available choices."
                ));
            }
            Value::String(raw_str.to_string())
        }

        FormFieldType::MultipleChoice { choices } => {
            let mut selected = Vec::new();
            for s in raw_str.split(',').map(str::trim) {
                if choices.iter().any(|(v, _)| v == s) {
                    selected.push(Value::String(s.to_string()));
                } else {
                    errors.push(format!(
                        "Select a valid choice. {s} is not one of the available choices."
                    ));
                }
            }
            Value::List(selected)
        }
    };

    if errors.is_empty() {
        Ok(value)
    } else {
        Err(errors)
    }
}
