//! JSON-safe numeric encoding
//!
//! One sanitization boundary applied at serialization time: non-finite values
//! become `null`, and foreign numeric wrappers from upstream collaborators
//! (arbitrary-precision decimals, raw JSON numbers) become standard floats.
//! No component upstream of the boundary special-cases encoding.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Number, Value};

/// NaN and ±infinity map to `None`; finite values pass through.
pub fn sanitize(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Arbitrary-precision decimal to a finite float.
///
/// `Decimal` holds 28-29 significant digits; the f64 conversion keeps well
/// over the 6 significant digits the output contract requires.
pub fn from_decimal(value: Decimal) -> Option<f64> {
    value.to_f64().and_then(sanitize)
}

/// Raw JSON number (integer or float, any width) to a finite float.
pub fn from_number(value: &Number) -> Option<f64> {
    value.as_f64().and_then(sanitize)
}

/// Recursively sanitize a JSON tree, replacing any number that is not a
/// representable finite float with `null`.
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::Number(n) => match from_number(&n).and_then(Number::from_f64) {
            Some(n) => Value::Number(n),
            None => Value::Null,
        },
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, sanitize_value(v)))
                .collect(),
        ),
        other => other,
    }
}
