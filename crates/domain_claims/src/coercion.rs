//! Lenient value coercion
//!
//! Extraction output and interpreter responses are loosely typed: amounts
//! arrive as numbers, numeric strings, German decimal strings or wrapped in
//! `{"amount": ..}` objects. These helpers turn such values into typed
//! fields once, at the boundary.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

/// Parses a JSON number or numeric string into a decimal
///
/// Strings may carry a currency marker or a trailing percent sign and may
/// use a decimal comma (`"45,50"`).
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                let repr = n.to_string();
                Decimal::from_str(&repr)
                    .or_else(|_| Decimal::from_scientific(&repr))
                    .ok()
                    .or_else(|| n.as_f64().and_then(Decimal::from_f64))
            }
        }
        Value::String(s) => decimal_from_str(s),
        _ => None,
    }
}

fn decimal_from_str(raw: &str) -> Option<Decimal> {
    let cleaned = strip_markers(raw);
    if cleaned.is_empty() {
        return None;
    }

    let normalized = normalize_separators(&cleaned);
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

/// Removes currency markers, percent signs and grouping spaces
fn strip_markers(raw: &str) -> String {
    let mut rest = raw.trim();
    loop {
        let before = rest;
        for marker in ["EUR", "€", "%"] {
            rest = rest
                .strip_prefix(marker)
                .or_else(|| rest.strip_suffix(marker))
                .unwrap_or(rest)
                .trim();
        }
        if rest == before {
            break;
        }
    }
    rest.chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Rewrites grouped amounts into plain decimal notation
///
/// With both `.` and `,` present, whichever comes last is the decimal
/// separator (`"1.250,00"`, `"1,250.00"`). A single kind that repeats is a
/// grouping separator (`"1.250.000"`). A lone comma is a decimal comma and a
/// lone dot a decimal point.
fn normalize_separators(cleaned: &str) -> String {
    let last_dot = cleaned.rfind('.');
    let last_comma = cleaned.rfind(',');
    match (last_dot, last_comma) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) if cleaned.matches(',').count() > 1 => cleaned.replace(',', ""),
        (None, Some(_)) => cleaned.replace(',', "."),
        (Some(_), None) if cleaned.matches('.').count() > 1 => cleaned.replace('.', ""),
        _ => cleaned.to_string(),
    }
}

/// Coerces an extracted amount; absent or unparsable values become zero
pub fn coerce_amount(value: Option<&Value>) -> Decimal {
    value.and_then(decimal_from_value).unwrap_or(Decimal::ZERO)
}

/// Coerces a policy amount such as a deductible or an annual limit
///
/// Accepts a number, a numeric string, the literal string `"null"`, an
/// object with an `amount` field, or JSON null. Anything that does not
/// yield a number means "not stated".
pub fn coerce_policy_amount(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Null | Value::Bool(_) | Value::Array(_) => None,
        Value::Object(map) => coerce_policy_amount(map.get("amount")),
        Value::String(s) if is_null_literal(s) => None,
        other => decimal_from_value(other),
    }
}

fn is_null_literal(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "" | "null" | "none" | "n/a"
    )
}

/// Coerces a flag; `None` when the value is absent
///
/// JSON null counts as false, as do the strings `"false"`, `"no"`, `"0"`
/// and the number zero.
pub fn coerce_flag(value: Option<&Value>) -> Option<bool> {
    let flag = match value? {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "" | "false" | "no" | "0" | "nein"
        ),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    };
    Some(flag)
}

/// Returns a textual field, rendering numbers as their JSON form
pub fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Returns a list of strings from a JSON array or a single string
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Coerces an integer count; `None` when absent or unparsable
pub fn coerce_integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_decimal_from_value() {
        assert_eq!(decimal_from_value(&json!(85)), Some(dec!(85)));
        assert_eq!(decimal_from_value(&json!(45.5)), Some(dec!(45.5)));
        assert_eq!(decimal_from_value(&json!("45.50")), Some(dec!(45.50)));
        assert_eq!(decimal_from_value(&json!("45,50")), Some(dec!(45.50)));
        assert_eq!(decimal_from_value(&json!("1,250.00")), Some(dec!(1250.00)));
        assert_eq!(decimal_from_value(&json!("€ 12.40")), Some(dec!(12.40)));
        assert_eq!(decimal_from_value(&json!("EUR 12.40")), Some(dec!(12.40)));
        assert_eq!(decimal_from_value(&json!("12,40 €")), Some(dec!(12.40)));
        assert_eq!(decimal_from_value(&json!("80%")), Some(dec!(80)));
        assert_eq!(decimal_from_value(&json!("abc")), None);
        assert_eq!(decimal_from_value(&json!(true)), None);
    }

    #[test]
    fn test_grouped_amounts() {
        assert_eq!(decimal_from_value(&json!("1.250,00")), Some(dec!(1250.00)));
        assert_eq!(decimal_from_value(&json!("1,250.00")), Some(dec!(1250.00)));
        assert_eq!(decimal_from_value(&json!("EUR 1.250,00")), Some(dec!(1250.00)));
        assert_eq!(decimal_from_value(&json!("1 250,00 €")), Some(dec!(1250.00)));
        assert_eq!(decimal_from_value(&json!("1.250.000")), Some(dec!(1250000)));
        assert_eq!(decimal_from_value(&json!("1.250.000,50")), Some(dec!(1250000.50)));
        // a lone dot is a decimal point, as in JSON
        assert_eq!(decimal_from_value(&json!("1.250")), Some(dec!(1.250)));
        assert_eq!(decimal_from_value(&json!("1,5,0.x")), None);
    }

    #[test]
    fn test_coerce_amount_defaults_to_zero() {
        assert_eq!(coerce_amount(None), Decimal::ZERO);
        assert_eq!(coerce_amount(Some(&json!("n/a"))), Decimal::ZERO);
        assert_eq!(coerce_amount(Some(&json!(12.4))), dec!(12.4));
    }

    #[test]
    fn test_coerce_policy_amount_shapes() {
        assert_eq!(coerce_policy_amount(Some(&json!(50))), Some(dec!(50)));
        assert_eq!(coerce_policy_amount(Some(&json!("50"))), Some(dec!(50)));
        assert_eq!(coerce_policy_amount(Some(&json!({"amount": 5000}))), Some(dec!(5000)));
        assert_eq!(coerce_policy_amount(Some(&json!({"amount": null}))), None);
        assert_eq!(coerce_policy_amount(Some(&json!("null"))), None);
        assert_eq!(coerce_policy_amount(Some(&json!(null))), None);
        assert_eq!(coerce_policy_amount(None), None);
    }

    #[test]
    fn test_coerce_flag() {
        assert_eq!(coerce_flag(None), None);
        assert_eq!(coerce_flag(Some(&json!(true))), Some(true));
        assert_eq!(coerce_flag(Some(&json!(null))), Some(false));
        assert_eq!(coerce_flag(Some(&json!("false"))), Some(false));
        assert_eq!(coerce_flag(Some(&json!("yes"))), Some(true));
    }

    #[test]
    fn test_string_list() {
        assert_eq!(string_list(Some(&json!(["a", null, 3]))), vec!["a", "3"]);
        assert_eq!(string_list(Some(&json!("single"))), vec!["single"]);
        assert!(string_list(Some(&json!({"x": 1}))).is_empty());
    }

    #[test]
    fn test_coerce_integer() {
        assert_eq!(coerce_integer(Some(&json!(2))), Some(2));
        assert_eq!(coerce_integer(Some(&json!(2.0))), Some(2));
        assert_eq!(coerce_integer(Some(&json!("3"))), Some(3));
        assert_eq!(coerce_integer(Some(&json!(2.5))), None);
        assert_eq!(coerce_integer(Some(&json!("x"))), None);
    }
}
