//! Five-field cron expressions.
//!
//! Only expansion is supported: each field of `minute hour day month
//! day-of-week` is turned into the sorted set of values it matches. Schedules
//! are not evaluated against a clock.

use std::fmt;
use std::str::FromStr;

use freeadmin_core::{AdminError, AdminResult};

/// Position of the minute field.
pub const MINUTE: usize = 0;
/// Position of the hour field.
pub const HOUR: usize = 1;
/// Position of the day-of-month field.
pub const DAY_OF_MONTH: usize = 2;
/// Position of the month field.
pub const MONTH: usize = 3;
/// Position of the day-of-week field.
pub const DAY_OF_WEEK: usize = 4;

const MONTH_NAMES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];
const DAY_NAMES: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

struct Bounds {
    min: u32,
    max: u32,
    names: &'static [&'static str],
}

const BOUNDS: [Bounds; 5] = [
    Bounds { min: 0, max: 59, names: &[] },
    Bounds { min: 0, max: 23, names: &[] },
    Bounds { min: 1, max: 31, names: &[] },
    Bounds { min: 1, max: 12, names: &MONTH_NAMES },
    Bounds { min: 0, max: 7, names: &DAY_NAMES },
];

impl Bounds {
    /// Number of distinct values the field can take. Day-of-week has seven,
    /// since `7` folds to `0`.
    const fn distinct(&self, index: usize) -> usize {
        let span = (self.max - self.min + 1) as usize;
        if index == DAY_OF_WEEK {
            span - 1
        } else {
            span
        }
    }
}

/// The expansion of a single cron field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CronField {
    /// Every value in the field's range matches, whether written as `*` or
    /// spelled out (`1-12`, `0-6`).
    Any,
    /// The sorted, de-duplicated values matched.
    Values(Vec<u32>),
}

/// A parsed five-field cron expression.
///
/// # Examples
///
/// ```
/// use freeadmin_common::cron::{CronExpression, CronField, DAY_OF_WEEK, MINUTE};
///
/// let expr: CronExpression = "*/15 * * * mon-fri,sun".parse().unwrap();
/// assert_eq!(expr.expanded(MINUTE), &CronField::Values(vec![0, 15, 30, 45]));
/// assert_eq!(expr.expanded(DAY_OF_WEEK), &CronField::Values(vec![0, 1, 2, 3, 4, 5]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronExpression {
    source: String,
    fields: Vec<CronField>,
}

impl CronExpression {
    /// Parses and expands an expression.
    ///
    /// Each field accepts `*`, numbers, month and weekday names, lists
    /// (`1,3`), ranges (`1-5`), and steps (`*/2`, `1-10/3`, `5/10`). A
    /// day-of-week of `7` is Sunday and folds to `0`.
    pub fn parse(expr: &str) -> AdminResult<Self> {
        let parts: Vec<&str> = expr.split_whitespace().collect();
        if parts.len() != BOUNDS.len() {
            return Err(invalid(
                expr,
                &format!("expected 5 fields, found {}", parts.len()),
            ));
        }
        let fields = parts
            .iter()
            .enumerate()
            .map(|(index, part)| parse_field(part, index).map_err(|reason| invalid(expr, &reason)))
            .collect::<AdminResult<Vec<_>>>()?;
        Ok(Self {
            source: expr.to_string(),
            fields,
        })
    }

    /// Returns the expansion of the field at `index` (see [`MINUTE`] through
    /// [`DAY_OF_WEEK`]).
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below 5.
    pub fn expanded(&self, index: usize) -> &CronField {
        &self.fields[index]
    }

    /// Returns every field's expansion in position order.
    pub fn fields(&self) -> &[CronField] {
        &self.fields
    }
}

impl FromStr for CronExpression {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CronExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

fn invalid(expr: &str, reason: &str) -> AdminError {
    AdminError::InvalidCronExpression(format!("{expr:?}: {reason}"))
}

fn parse_field(text: &str, index: usize) -> Result<CronField, String> {
    if text == "*" {
        return Ok(CronField::Any);
    }
    let bounds = &BOUNDS[index];
    let mut values = Vec::new();

    for item in text.split(',') {
        let (range, step) = match item.split_once('/') {
            Some((range, step)) => {
                let step: u32 = step
                    .parse()
                    .map_err(|_| format!("invalid step {step:?}"))?;
                if step == 0 {
                    return Err("step must be positive".to_string());
                }
                (range, Some(step))
            }
            None => (item, None),
        };

        let (start, end) = if range == "*" {
            (bounds.min, bounds.max)
        } else if let Some((a, b)) = range.split_once('-') {
            (parse_value(a, bounds)?, parse_value(b, bounds)?)
        } else {
            let start = parse_value(range, bounds)?;
            // `a/n` runs from `a` to the field maximum.
            (start, if step.is_some() { bounds.max } else { start })
        };
        if start > end {
            return Err(format!("range {range:?} is reversed"));
        }

        let step = step.unwrap_or(1) as usize;
        values.extend((start..=end).step_by(step));
    }

    if index == DAY_OF_WEEK {
        for v in &mut values {
            if *v == 7 {
                *v = 0;
            }
        }
    }
    values.sort_unstable();
    values.dedup();
    if values.len() == bounds.distinct(index) {
        return Ok(CronField::Any);
    }
    Ok(CronField::Values(values))
}

fn parse_value(text: &str, bounds: &Bounds) -> Result<u32, String> {
    let lower = text.to_ascii_lowercase();
    let value = match lower.parse::<u32>() {
        Ok(n) => n,
        Err(_) => {
            let offset = bounds.min.min(1);
            bounds
                .names
                .iter()
                .position(|name| *name == lower)
                .and_then(|i| u32::try_from(i).ok())
                .map(|i| i + offset)
                .ok_or_else(|| format!("invalid value {text:?}"))?
        }
    };
    if value < bounds.min || value > bounds.max {
        return Err(format!(
            "{value} is outside {}-{}",
            bounds.min, bounds.max
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(expr: &str, index: usize) -> CronField {
        CronExpression::parse(expr).unwrap().expanded(index).clone()
    }

    #[test]
    fn test_wildcards() {
        let expr = CronExpression::parse("* * * * *").unwrap();
        assert!(expr.fields().iter().all(|f| *f == CronField::Any));
        assert_eq!(expr.to_string(), "* * * * *");
    }

    #[test]
    fn test_lists_are_sorted_and_deduped() {
        assert_eq!(field("5,1,5,3 * * * *", MINUTE), CronField::Values(vec![1, 3, 5]));
    }

    #[test]
    fn test_ranges_and_steps() {
        assert_eq!(field("* 1-4 * * *", HOUR), CronField::Values(vec![1, 2, 3, 4]));
        assert_eq!(field("* */6 * * *", HOUR), CronField::Values(vec![0, 6, 12, 18]));
        assert_eq!(
            field("* * 1-10/3 * *", DAY_OF_MONTH),
            CronField::Values(vec![1, 4, 7, 10])
        );
        assert_eq!(field("50/5 * * * *", MINUTE), CronField::Values(vec![50, 55]));
    }

    #[test]
    fn test_month_step_starts_at_one() {
        assert_eq!(field("* * * */4 *", MONTH), CronField::Values(vec![1, 5, 9]));
    }

    #[test]
    fn test_names() {
        assert_eq!(field("* * * jan,Dec *", MONTH), CronField::Values(vec![1, 12]));
        assert_eq!(field("* * * * SUN,sat", DAY_OF_WEEK), CronField::Values(vec![0, 6]));
        assert_eq!(field("* * * * mon-wed", DAY_OF_WEEK), CronField::Values(vec![1, 2, 3]));
    }

    #[test]
    fn test_sunday_folds_to_zero() {
        assert_eq!(field("* * * * 7", DAY_OF_WEEK), CronField::Values(vec![0]));
        assert_eq!(
            field("* * * * 5-7", DAY_OF_WEEK),
            CronField::Values(vec![0, 5, 6])
        );
        assert_eq!(field("* * * * 0,7", DAY_OF_WEEK), CronField::Values(vec![0]));
    }

    #[test]
    fn test_invalid_expressions() {
        for bad in [
            "* * * *",
            "* * * * * *",
            "60 * * * *",
            "* * 0 * *",
            "* * * 13 *",
            "* * * * 8",
            "* * * * 5-1",
            "*/0 * * * *",
            "a * * * *",
            "1,,2 * * * *",
            "* * * foo *",
        ] {
            let err = CronExpression::parse(bad).unwrap_err();
            assert!(
                matches!(err, AdminError::InvalidCronExpression(_)),
                "{bad} -> {err}"
            );
        }
    }

    #[test]
    fn test_full_range_is_any() {
        assert_eq!(field("* * * * 1-7", DAY_OF_WEEK), CronField::Any);
        assert_eq!(field("* * * * 0-6", DAY_OF_WEEK), CronField::Any);
        assert_eq!(field("* * * * sun-sat", DAY_OF_WEEK), CronField::Any);
        assert_eq!(field("* * * 1-12 *", MONTH), CronField::Any);
        assert_eq!(field("*/1 * * * *", MINUTE), CronField::Any);
        assert_eq!(field("* 0-11,12-23 * * *", HOUR), CronField::Any);
        assert_eq!(
            field("* * * * 1-6", DAY_OF_WEEK),
            CronField::Values(vec![1, 2, 3, 4, 5, 6])
        );
        assert_eq!(
            field("* * * 1-11 *", MONTH),
            CronField::Values((1..=11).collect())
        );
    }

    #[test]
    fn test_from_str() {
        let expr: CronExpression = "0 0 * * 1".parse().unwrap();
        assert_eq!(expr.expanded(DAY_OF_WEEK), &CronField::Values(vec![1]));
    }
}
