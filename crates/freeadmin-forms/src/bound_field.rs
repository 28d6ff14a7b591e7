//! Bound fields: a field definition paired with its current value and errors.
//!
//! A [`BoundField`] is what table rendering iterates over. Its value is the
//! submitted data when the form is bound and the initial value otherwise.

use std::collections::HashMap;

use crate::fields::FormFieldDef;
use crate::widgets::{self, escape, Widget};

/// A form field bound to a value and validation state.
#[derive(Debug)]
pub struct BoundField {
    /// The field's HTML name attribute (prefixed when the form has a prefix).
    pub name: String,
    /// The undecorated field name.
    pub field_name: String,
    /// Human-readable label.
    pub label: String,
    /// Help text.
    pub help_text: String,
    /// Whether the field is required.
    pub required: bool,
    /// Whether the field is disabled.
    pub disabled: bool,
    /// The value to render.
    pub value: Option<String>,
    /// Validation error messages for this field.
    pub errors: Vec<String>,
    /// The widget instance used for rendering.
    pub widget: Box<dyn Widget>,
}

impl BoundField {
    /// Creates a `BoundField` from a field definition and current state.
    pub fn new(
        field_def: &FormFieldDef,
        value: Option<String>,
        errors: Vec<String>,
        prefix: Option<&str>,
    ) -> Self {
        let html_name = prefix.map_or_else(
            || field_def.name.clone(),
            |p| format!("{p}-{}", field_def.name),
        );

        Self {
            name: html_name,
            field_name: field_def.name.clone(),
            label: field_def.label.clone(),
            help_text: field_def.help_text.clone(),
            required: field_def.required,
            disabled: field_def.disabled,
            value,
            errors,
            widget: widgets::create_widget(field_def.widget, field_def.choices()),
        }
    }

    /// Renders the widget HTML for this bound field.
    pub fn render(&self) -> String {
        let mut attrs = HashMap::new();
        attrs.insert("id".to_string(), self.auto_id());
        if self.disabled {
            attrs.insert("disabled".to_string(), "disabled".to_string());
        }
        self.widget.render(&self.name, self.value.as_deref(), &attrs)
    }

    /// Renders a `<label>` element for this field, or an empty string when
    /// the label is empty.
    pub fn label_tag(&self) -> String {
        if self.label.is_empty() {
            return String::new();
        }
        let label_id = self.widget.id_for_label(&self.auto_id());
        format!(r#"<label for="{label_id}">{}:</label>"#, escape(&self.label))
    }

    /// Returns the auto-generated HTML `id` for this field.
    pub fn auto_id(&self) -> String {
        format!("id_{}", self.name)
    }

    /// Returns `true` if the widget is a hidden input.
    pub fn is_hidden(&self) -> bool {
        self.widget.is_hidden()
    }

    /// Returns `true` if this field has any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Renders the error list as an HTML `<ul>` element.
    pub fn errors_as_ul(&self) -> String {
        errors_as_ul(&self.errors, "errorlist")
    }

    /// Returns the space-separated CSS classes for this field's row.
    pub fn css_classes(&self, error_class: Option<&str>, required_class: Option<&str>) -> String {
        let mut classes = Vec::new();
        if let (Some(class), true) = (error_class, self.has_errors()) {
            classes.push(class);
        }
        if let (Some(class), true) = (required_class, self.required) {
            classes.push(class);
        }
        classes.join(" ")
    }
}

/// Renders messages as `<ul class="{class}">`, or an empty string when there
/// are none.
pub fn errors_as_ul(errors: &[String], class: &str) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}</li>", escape(e)))
        .collect();
    format!(r#"<ul class="{class}">{items}</ul>"#)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FormFieldType;
    use crate::widgets::WidgetType;

    fn hostname() -> FormFieldDef {
        FormFieldDef::new("gc_hostname", FormFieldType::char()).label("Hostname")
    }

    #[test]
    fn test_prefixed_name_and_id() {
        let bf = BoundField::new(&hostname(), None, vec![], Some("net"));
        assert_eq!(bf.name, "net-gc_hostname");
        assert_eq!(bf.field_name, "gc_hostname");
        assert_eq!(bf.auto_id(), "id_net-gc_hostname");
    }

    #[test]
    fn test_render_includes_id_and_value() {
        let bf = BoundField::new(&hostname(), Some("nas".into()), vec![], None);
        let html = bf.render();
        assert!(html.contains(r#"id="id_gc_hostname""#));
        assert!(html.contains(r#"value="nas""#));
    }

    #[test]
    fn test_label_tag() {
        let bf = BoundField::new(&hostname(), None, vec![], None);
        assert_eq!(bf.label_tag(), r#"<label for="id_gc_hostname">Hostname:</label>"#);
        let unlabeled = BoundField::new(&hostname().label(""), None, vec![], None);
        assert_eq!(unlabeled.label_tag(), "");
    }

    #[test]
    fn test_disabled_render() {
        let bf = BoundField::new(&hostname().disabled(true), None, vec![], None);
        assert!(bf.render().contains(r#"disabled="disabled""#));
    }

    #[test]
    fn test_errors_as_ul() {
        let bf = BoundField::new(
            &hostname(),
            None,
            vec!["This field is required.".into()],
            None,
        );
        assert!(bf.has_errors());
        assert_eq!(
            bf.errors_as_ul(),
            r#"<ul class="errorlist"><li>This field is required.</li></ul>"#
        );
        let clean = BoundField::new(&hostname(), None, vec![], None);
        assert_eq!(clean.errors_as_ul(), "");
    }

    #[test]
    fn test_css_classes() {
        let bf = BoundField::new(&hostname(), None, vec!["bad".into()], None);
        assert_eq!(bf.css_classes(Some("error"), Some("required")), "error required");
        assert_eq!(bf.css_classes(None, None), "");
        let optional = BoundField::new(&hostname().required(false), None, vec![], None);
        assert_eq!(optional.css_classes(Some("error"), Some("required")), "");
    }

    #[test]
    fn test_hidden_field() {
        let bf = BoundField::new(
            &hostname().widget(WidgetType::HiddenInput),
            None,
            vec![],
            None,
        );
        assert!(bf.is_hidden());
    }
}
