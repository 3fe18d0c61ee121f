//! Flexible numeric deserializers for ODE JSON responses, which report
//! numeric fields as either JSON numbers or numeric strings inconsistently
//! across endpoints and fields.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Deserializes a required `f64` from either a JSON number or a numeric
/// string.
pub fn f64_required<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    as_f64(&value).ok_or_else(|| DeError::custom(format!("not a number: {value}")))
}

/// Deserializes an `Option<f64>` from either a JSON number, a numeric
/// string, `null`, or a missing field.
pub fn f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_f64))
}

/// Deserializes an `Option<i64>` from either a JSON number, a numeric
/// string, `null`, or a missing field.
pub fn i64_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "f64_required")]
        required: f64,
        #[serde(default, deserialize_with = "f64_opt")]
        optional: Option<f64>,
        #[serde(default, deserialize_with = "i64_opt")]
        count: Option<i64>,
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let sample: Sample = serde_json::from_str(r#"{"required": "1.5", "optional": 2.5, "count": "7"}"#).unwrap();
        assert_eq!(sample.required, 1.5);
        assert_eq!(sample.optional, Some(2.5));
        assert_eq!(sample.count, Some(7));
    }

    #[test]
    fn missing_optional_fields_are_none() {
        let sample: Sample = serde_json::from_str(r#"{"required": 1}"#).unwrap();
        assert_eq!(sample.optional, None);
        assert_eq!(sample.count, None);
    }
}
