//! Multiple-choice initial value normalization.
//!
//! Records store multiple-choice selections as one comma-delimited string
//! (`"1,3,5"`) with `*` meaning "all". Before such a form is rendered, the
//! stored value is turned into the list the multiple-choice widget expects.
//!
//! Schedule fields get extra treatment on existing records: a month or
//! day-of-week value is expanded through the cron evaluator, so ranges and
//! steps (`1-5`, `*/2`) become explicit values. Weekdays are shown as 1-7,
//! so the evaluator's Sunday (`0`) becomes `7`. A value covering the whole
//! range (`1-7`, `1-12`) collapses to `["*"]`.

use freeadmin_core::{AdminError, AdminResult};
use freeadmin_forms::form::{BaseForm, Form};
use freeadmin_forms::value::Value;

use crate::cron::{CronExpression, CronField, DAY_OF_WEEK, MONTH};

const WILDCARD: &str = "*";

/// Rewrites the initial value of `field` as a list.
///
/// The raw value is the form's initial entry for `field`, falling back to the
/// field's declared initial; a missing value means `*`.
///
/// - `*` becomes `default`.
/// - Anything else is split on commas.
/// - When `has_identity` is set and the field name has a `dayweek` or
///   `month` token, a non-wildcard value is expanded as that position of a
///   cron expression instead, with `0` mapped to `7`. An expansion that
///   covers the field's whole range is stored as `["*"]`.
///
/// # Errors
///
/// [`AdminError::UnknownField`] when the form has neither an initial entry
/// nor a field named `field`, and [`AdminError::InvalidCronExpression`] when a
/// schedule value cannot be expanded. In the latter case the initial value
/// has already been replaced by the comma-split list.
pub fn normalize_multichoice(
    form: &mut BaseForm,
    has_identity: bool,
    field: &str,
    default: impl Into<Value>,
) -> AdminResult<()> {
    if !form.initial().contains_key(field) && !form.has_field(field) {
        return Err(AdminError::UnknownField(field.to_string()));
    }

    let raw = match form.initial_for(field) {
        None | Some(Value::Null) => WILDCARD.to_string(),
        Some(value) => value.to_form_string(),
    };

    let normalized = if raw == WILDCARD {
        default.into()
    } else {
        Value::List(raw.split(',').map(Value::from).collect())
    };
    form.initial_mut().insert(field.to_string(), normalized);

    if has_identity && raw != WILDCARD && is_schedule_field(field) {
        let index = if field.contains("dayweek") {
            DAY_OF_WEEK
        } else {
            MONTH
        };
        let expression = (0..5)
            .map(|i| if i == index { raw.as_str() } else { WILDCARD })
            .collect::<Vec<_>>()
            .join(" ");
        let expr = CronExpression::parse(&expression)?;
        let expanded = match expr.expanded(index) {
            CronField::Any => Value::List(vec![WILDCARD.into()]),
            CronField::Values(values) => Value::List(
                values
                    .iter()
                    .map(|&v| Value::Int(i64::from(if v == 0 { 7 } else { v })))
                    .collect(),
            ),
        };
        form.initial_mut().insert(field.to_string(), expanded);
        tracing::trace!(
            target: "freeadmin::forms",
            field,
            expression = %expression,
            "expanded schedule field"
        );
    }

    Ok(())
}

fn is_schedule_field(field: &str) -> bool {
    field
        .split('_')
        .any(|token| token == "dayweek" || token == "month")
}
