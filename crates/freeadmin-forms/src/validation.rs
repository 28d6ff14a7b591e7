//! Field cleaning shared by every form type.
//!
//! [`clean_fields`] visits every field and collects all errors in one pass.
//! Cross-field cleaning belongs to the form types.

use std::collections::HashMap;

use crate::fields::{clean_field_value, FormFieldDef};
use crate::value::Value;

/// Cleans each field's submitted value with [`clean_field_value`], filling
/// `cleaned_data` or `errors` by field name.
///
/// Disabled fields skip validation and take their initial value: the entry
/// in `initial` when there is one, else the field's declared initial.
pub fn clean_fields(
    field_defs: &[FormFieldDef],
    initial: &HashMap<String, Value>,
    raw_data: &HashMap<String, Option<String>>,
    cleaned_data: &mut HashMap<String, Value>,
    errors: &mut HashMap<String, Vec<String>>,
) {
    for field in field_defs {
        if field.disabled {
            if let Some(value) = initial.get(&field.name).or(field.initial.as_ref()) {
                cleaned_data.insert(field.name.clone(), value.clone());
            }
            continue;
        }

        let raw = raw_data.get(&field.name).and_then(|v| v.as_deref());

        match clean_field_value(field, raw) {
            Ok(value) => {
                cleaned_data.insert(field.name.clone(), value);
            }
            Err(field_errors) => {
                tracing::trace!(
                    target: "freeadmin::forms",
                    field = %field.name,
                    count = field_errors.len(),
                    "field failed validation"
                );
                errors.insert(field.name.clone(), field_errors);
            }
        }
    }
}

/// Merges `extra` into `errors`, appending to existing message lists.
pub fn merge_errors(
    errors: &mut HashMap<String, Vec<String>>,
    extra: HashMap<String, Vec<String>>,
) {
    for (key, msgs) in extra {
        errors.entry(key).or_default().extend(msgs);
    }
}
