//! Merge helpers for reconciling per-field settings into one block policy.
//!
//! Every cross-field property of a block is defined by exactly one of these
//! strategies. Centralizing the scans keeps the fail-fast behavior for
//! equality-required properties in one place instead of repeating the same
//! loop in every accessor.

use std::fmt::Debug;

use crate::problem::field::Field;
use crate::problem::field_info::FieldInfo;

/// All fields must report the identical value.
///
/// A mismatch means the upstream grouping produced an invalid block; this
/// is a programming-contract failure, so it panics instead of picking an
/// arbitrary field's value.
pub(crate) fn require_equal<T, F>(fields: &[Field], property: &str, get: F) -> T
where
    T: PartialEq + Copy + Debug,
    F: Fn(&FieldInfo) -> T,
{
    let first = get(fields[0].field_info());
    for field in &fields[1..] {
        let value = get(field.field_info());
        if value != first {
            panic!(
                "hard-coupled fields disagree on {property}: \
                 {first:?} (field '{}') vs {value:?} (field '{}')",
                fields[0].field_info().field_id(),
                field.field_info().field_id()
            );
        }
    }
    first
}

/// Smallest value across fields, compared literally; `seed` caps the result.
pub(crate) fn fold_min<T, F>(fields: &[Field], seed: T, get: F) -> T
where
    T: PartialOrd + Copy,
    F: Fn(&FieldInfo) -> T,
{
    let mut result = seed;
    for field in fields {
        let value = get(field.field_info());
        if value < result {
            result = value;
        }
    }
    result
}

/// Largest value across fields; `seed` is the floor of the result.
pub(crate) fn fold_max<T, F>(fields: &[Field], seed: T, get: F) -> T
where
    T: PartialOrd + Copy,
    F: Fn(&FieldInfo) -> T,
{
    let mut result = seed;
    for field in fields {
        let value = get(field.field_info());
        if value > result {
            result = value;
        }
    }
    result
}

/// Smallest value across fields, where a per-field value of exactly `0`
/// means "this criterion disabled" and must not drag the minimum down.
///
/// Returns `None` when every field reports the disabled sentinel.
pub(crate) fn fold_min_enabled<F>(fields: &[Field], get: F) -> Option<f64>
where
    F: Fn(&FieldInfo) -> f64,
{
    let mut result: Option<f64> = None;
    for field in fields {
        let value = get(field.field_info());
        if value == 0.0 {
            continue;
        }
        result = Some(match result {
            Some(current) if current <= value => current,
            _ => value,
        });
    }
    result
}

/// True only if every field reports true.
pub(crate) fn fold_and<F>(fields: &[Field], get: F) -> bool
where
    F: Fn(&FieldInfo) -> bool,
{
    fields.iter().all(|field| get(field.field_info()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn fields_with_tolerances(values: &[f64]) -> Vec<Field> {
        use crate::problem::field_info::{FieldSetting, SettingValue};
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let mut info = FieldInfo::new(&format!("field{i}"), 1);
                info.set_value(FieldSetting::AdaptivityTolerance, SettingValue::Double(v));
                Field::new(Rc::new(info))
            })
            .collect()
    }

    fn tolerance(info: &FieldInfo) -> f64 {
        use crate::problem::field_info::FieldSetting;
        info.value(FieldSetting::AdaptivityTolerance).as_f64()
    }

    #[test]
    fn test_min_treats_zero_as_disabled() {
        let fields = fields_with_tolerances(&[0.1, 0.05, 0.0]);
        let min = fold_min_enabled(&fields, tolerance);
        assert_eq!(min, Some(0.05));
    }

    #[test]
    fn test_min_all_disabled_yields_none() {
        let fields = fields_with_tolerances(&[0.0, 0.0]);
        assert_eq!(fold_min_enabled(&fields, tolerance), None);
    }

    #[test]
    fn test_literal_min_lets_zero_win() {
        let fields = fields_with_tolerances(&[0.3, 0.0]);
        let min = fold_min(&fields, 1.0, tolerance);
        assert_eq!(min, 0.0);
    }

    #[test]
    fn test_fold_max_respects_floor() {
        let fields = fields_with_tolerances(&[0.2, 0.4]);
        assert_eq!(fold_max(&fields, 1.0, tolerance), 1.0);
        assert_eq!(fold_max(&fields, 0.0, tolerance), 0.4);
    }

    #[test]
    #[should_panic(expected = "disagree on adaptivity tolerance")]
    fn test_require_equal_panics_on_mismatch() {
        let fields = fields_with_tolerances(&[0.1, 0.2]);
        require_equal(&fields, "adaptivity tolerance", tolerance);
    }

    #[test]
    fn test_require_equal_returns_common_value() {
        let fields = fields_with_tolerances(&[0.1, 0.1]);
        let value = require_equal(&fields, "adaptivity tolerance", tolerance);
        assert_eq!(value, 0.1);
    }
}
