//! Widgets: HTML rendering for form fields.
//!
//! Each widget renders itself for a field name and current value, extracts
//! its raw value from submitted [`FormData`], and reports the id a `<label>`
//! should point at. [`WidgetType::ValidationTextInput`] is the client-side
//! validating text box used by most administrative text fields; values
//! entered through it are whitespace-trimmed by the model form adapter.

use std::collections::HashMap;
use std::fmt;

use crate::data::FormData;

/// Enumerates the built-in widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetType {
    /// `<input type="text">`.
    TextInput,
    /// `<input type="text">` with client-side validation.
    ValidationTextInput,
    /// `<input type="number">`.
    NumberInput,
    /// `<input type="email">`.
    EmailInput,
    /// `<input type="password">` (value never rendered).
    PasswordInput,
    /// `<input type="hidden">`.
    HiddenInput,
    /// `<textarea>`.
    Textarea,
    /// `<input type="checkbox">`.
    CheckboxInput,
    /// `<select>`.
    Select,
    /// `<select multiple>`.
    SelectMultiple,
}

impl WidgetType {
    /// Returns `true` for widgets rendered without a visible row.
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::HiddenInput)
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextInput => "TextInput",
            Self::ValidationTextInput => "ValidationTextInput",
            Self::NumberInput => "NumberInput",
            Self::EmailInput => "EmailInput",
            Self::PasswordInput => "PasswordInput",
            Self::HiddenInput => "HiddenInput",
            Self::Textarea => "Textarea",
            Self::CheckboxInput => "CheckboxInput",
            Self::Select => "Select",
            Self::SelectMultiple => "SelectMultiple",
        };
        write!(f, "{name}")
    }
}

/// A trait for HTML form widgets.
pub trait Widget: Send + Sync + fmt::Debug {
    /// Returns the widget type enum variant.
    fn widget_type(&self) -> WidgetType;

    /// Renders the widget as an HTML string.
    fn render(&self, name: &str, value: Option<&str>, attrs: &HashMap<String, String>) -> String;

    /// Extracts the raw value for `name` from submitted data.
    fn value_from_data(&self, data: &FormData, name: &str) -> Option<String> {
        data.get(name).map(String::from)
    }

    /// Returns the HTML `id` a label targeting this widget should use.
    fn id_for_label(&self, id: &str) -> String {
        id.to_string()
    }

    /// Returns `true` if the widget renders as a hidden input.
    fn is_hidden(&self) -> bool {
        self.widget_type().is_hidden()
    }
}

/// Escapes text for use in HTML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

/// Formats an attributes map as ` key="value"` pairs, sorted by key.
fn render_attrs(attrs: &HashMap<String, String>) -> String {
    let mut keys: Vec<&String> = attrs.keys().collect();
    keys.sort();
    keys.into_iter()
        .map(|k| format!(r#" {k}="{}""#, escape(&attrs[k])))
        .collect()
}

// ---------------------------------------------------------------------------
// Built-in widgets
// ---------------------------------------------------------------------------

/// A single `<input>` element; the widget type picks the `type` attribute.
#[derive(Debug, Clone)]
pub struct Input {
    kind: WidgetType,
}

impl Input {
    /// Creates an input widget for one of the `<input>`-based widget types.
    pub const fn new(kind: WidgetType) -> Self {
        Self { kind }
    }

    const fn input_type(&self) -> &'static str {
        match self.kind {
            WidgetType::NumberInput => "number",
            WidgetType::EmailInput => "email",
            WidgetType::PasswordInput => "password",
            WidgetType::HiddenInput => "hidden",
            _ => "text",
        }
    }
}

impl Widget for Input {
    fn widget_type(&self) -> WidgetType {
        self.kind
    }

    fn render(&self, name: &str, value: Option<&str>, attrs: &HashMap<String, String>) -> String {
        let val = match self.kind {
            WidgetType::PasswordInput => "",
            _ => value.unwrap_or(""),
        };
        let validation = if self.kind == WidgetType::ValidationTextInput {
            r#" data-dojo-type="dijit.form.ValidationTextBox""#
        } else {
            ""
        };
        format!(
            r#"<input type="{}" name="{name}" value="{}"{validation}{} />"#,
            self.input_type(),
            escape(val),
            render_attrs(attrs)
        )
    }
}

/// A `<textarea>` widget.
#[derive(Debug, Clone)]
pub struct Textarea;

impl Widget for Textarea {
    fn widget_type(&self) -> WidgetType {
        WidgetType::Textarea
    }

    fn render(&self, name: &str, value: Option<&str>, attrs: &HashMap<String, String>) -> String {
        format!(
            r#"<textarea name="{name}"{}>{}</textarea>"#,
            render_attrs(attrs),
            escape(value.unwrap_or(""))
        )
    }
}

/// A `<input type="checkbox">` widget. Absence from the payload means unchecked.
#[derive(Debug, Clone)]
pub struct CheckboxInput;

impl Widget for CheckboxInput {
    fn widget_type(&self) -> WidgetType {
        WidgetType::CheckboxInput
    }

    fn render(&self, name: &str, value: Option<&str>, attrs: &HashMap<String, String>) -> String {
        let checked = matches!(value, Some("true" | "on" | "1"));
        let checked_attr = if checked { " checked" } else { "" };
        format!(
            r#"<input type="checkbox" name="{name}"{checked_attr}{} />"#,
            render_attrs(attrs)
        )
    }
}

/// A `<select>` widget, single or multiple.
#[derive(Debug, Clone)]
pub struct Select {
    /// The available choices as `(value, display_label)` pairs.
    pub choices: Vec<(String, String)>,
    multiple: bool,
}

impl Select {
    /// Creates a single-choice `<select>`.
    pub const fn new(choices: Vec<(String, String)>) -> Self {
        Self {
            choices,
            multiple: false,
        }
    }

    /// Creates a `<select multiple>`.
    pub const fn multiple(choices: Vec<(String, String)>) -> Self {
        Self {
            choices,
            multiple: true,
        }
    }
}

impl Widget for Select {
    fn widget_type(&self) -> WidgetType {
        if self.multiple {
            WidgetType::SelectMultiple
        } else {
            WidgetType::Select
        }
    }

    fn render(&self, name: &str, value: Option<&str>, attrs: &HashMap<String, String>) -> String {
        let current: Vec<&str> = match value {
            Some(v) if self.multiple => v.split(',').collect(),
            Some(v) => vec![v],
            None => Vec::new(),
        };
        let options: String = self
            .choices
            .iter()
            .map(|(val, label)| {
                let selected = if current.contains(&val.as_str()) {
                    " selected"
                } else {
                    ""
                };
                format!(
                    r#"<option value="{}"{selected}>{}</option>"#,
                    escape(val),
                    escape(label)
                )
            })
            .collect();
        let multiple = if self.multiple { " multiple" } else { "" };
        format!(
            r#"<select name="{name}"{multiple}{}>{options}</select>"#,
            render_attrs(attrs)
        )
    }

    fn value_from_data(&self, data: &FormData, name: &str) -> Option<String> {
        if self.multiple {
            let values = data.get_list(name);
            if values.is_empty() {
                None
            } else {
                Some(values.join(","))
            }
        } else {
            data.get(name).map(String::from)
        }
    }
}

/// Creates a boxed widget, populating choices for select widgets.
pub fn create_widget(widget_type: WidgetType, choices: &[(String, String)]) -> Box<dyn Widget> {
    match widget_type {
        WidgetType::Textarea => Box::new(Textarea),
        WidgetType::CheckboxInput => Box::new(CheckboxInput),
        WidgetType::Select => Box::new(Select::new(choices.to_vec())),
        WidgetType::SelectMultiple => Box::new(Select::multiple(choices.to_vec())),
        input => Box::new(Input::new(input)),
    }
}
