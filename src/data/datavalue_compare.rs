use crate::data::datatable::{display_text, DataValue};
use std::cmp::Ordering;

/// Compare two cell values for column sorting.
///
/// Numbers compare numerically and sort ahead of everything else. Everything
/// else, absent values included, compares by lowercased display text. NaN
/// sorts after every other number.
pub fn compare_datavalues(a: Option<&DataValue>, b: Option<&DataValue>) -> Ordering {
    match (a.and_then(DataValue::as_f64), b.and_then(DataValue::as_f64)) {
        (Some(x), Some(y)) => compare_numbers(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => {
            let left = display_text(a).to_lowercase();
            let right = display_text(b).to_lowercase();
            left.cmp(&right)
        }
    }
}

fn compare_numbers(x: f64, y: f64) -> Ordering {
    match (x.is_nan(), y.is_nan()) {
        (false, false) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}
