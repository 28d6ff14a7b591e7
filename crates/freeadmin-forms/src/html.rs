//! Row-based HTML output for forms.
//!
//! An [`HtmlOutput`] describes the markup for one field row, one error row,
//! the closing tag of a row, and the wrapper for help text. [`TABLE`] is the
//! layout administrative forms render with; it has no `{help_text}` slot, so
//! help text stays out of table rows.
//!
//! Row templates use named placeholders (`{label}`, `{field}`, `{errors}`,
//! `{help_text}`, `{html_class_attr}`); the error row and help text wrappers
//! take a single `%s`.

use crate::bound_field::{errors_as_ul, BoundField};
use crate::widgets::escape;

/// Markup templates for rendering a form as a sequence of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlOutput {
    /// Template for a visible field's row.
    pub normal_row: &'static str,
    /// Template for a row holding only errors.
    pub error_row: &'static str,
    /// The closing markup of `normal_row`; hidden inputs go right before it.
    pub row_ender: &'static str,
    /// Wrapper for non-empty help text.
    pub help_text_html: &'static str,
    /// Whether field errors get their own row instead of sitting in the field cell.
    pub errors_on_separate_row: bool,
}

/// Table layout: one `<tr>` per visible field.
pub const TABLE: HtmlOutput = HtmlOutput {
    normal_row: "<tr{html_class_attr}><th>{label}</th><td>{errors}{field}</td></tr>",
    error_row: r#"<tr><td colspan="2">%s</td></tr>"#,
    row_ender: "</td></tr>",
    help_text_html: "<br />%s",
    errors_on_separate_row: false,
};

impl HtmlOutput {
    /// Renders bound fields into rows.
    ///
    /// Non-field errors, together with errors on hidden fields, are shown in
    /// a leading error row. Hidden inputs are appended inside the last row,
    /// before [`row_ender`](Self::row_ender).
    pub fn render(
        &self,
        bound_fields: &[BoundField],
        non_field_errors: &[String],
        error_css_class: Option<&str>,
        required_css_class: Option<&str>,
    ) -> String {
        let mut top_errors: Vec<String> = non_field_errors.to_vec();
        let mut output: Vec<String> = Vec::new();
        let mut hidden_fields: Vec<String> = Vec::new();

        for bf in bound_fields {
            if bf.is_hidden() {
                top_errors.extend(
                    bf.errors
                        .iter()
                        .map(|e| format!("(Hidden field {}) {e}", bf.field_name)),
                );
                hidden_fields.push(bf.render());
                continue;
            }

            let css_classes = bf.css_classes(error_css_class, required_css_class);
            let html_class_attr = if css_classes.is_empty() {
                String::new()
            } else {
                format!(r#" class="{css_classes}""#)
            };

            let errors = bf.errors_as_ul();
            if self.errors_on_separate_row && !errors.is_empty() {
                output.push(self.error_row.replacen("%s", &errors, 1));
            }

            let help_text = if bf.help_text.is_empty() {
                String::new()
            } else {
                self.help_text_html.replacen("%s", &escape(&bf.help_text), 1)
            };

            let label = bf.label_tag();
            let field = bf.render();
            let cell_errors = if self.errors_on_separate_row {
                ""
            } else {
                errors.as_str()
            };
            output.push(fill(
                self.normal_row,
                &[
                    ("errors", cell_errors),
                    ("label", label.as_str()),
                    ("field", field.as_str()),
                    ("help_text", help_text.as_str()),
                    ("html_class_attr", html_class_attr.as_str()),
                ],
            ));
        }

        if !top_errors.is_empty() {
            let ul = errors_as_ul(&top_errors, "errorlist nonfield");
            output.insert(0, self.error_row.replacen("%s", &ul, 1));
        }

        if !hidden_fields.is_empty() {
            let hidden = hidden_fields.concat();
            match output.last_mut() {
                Some(last) if last.ends_with(self.row_ender) => {
                    let at = last.len() - self.row_ender.len();
                    last.insert_str(at, &hidden);
                }
                _ => output.push(hidden),
            }
        }

        output.join("\n")
    }
}

/// Substitutes `{name}` placeholders in a single pass, so substituted text is
/// never re-scanned. Unknown placeholders are kept verbatim.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match values.iter().find(|(k, _)| *k == key) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
