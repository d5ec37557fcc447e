//! Response normalization.
//!
//! Converts a raw response object into a [`Record`] following the
//! classification the type mapper assigned to each field at generation time.
//! Only fields present in the raw object are set; nothing is defaulted.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde_json::{Map, Value};

use crate::error::{NormalizeError, NormalizeResult};
use crate::value::{FieldValue, Record};

/// Conversion applied to one field.
#[derive(Debug, Clone, Copy)]
pub enum FieldRule {
    /// Passed through unchanged.
    Plain,
    /// Parsed as an integer with zero fractional digits.
    BigInt,
    /// Parsed preserving fractional precision.
    BigDecimal,
    /// Normalized recursively with the referenced entity's rules.
    Nested(fn() -> &'static [FieldSpec]),
}

/// Normalization rule of a named field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rule: FieldRule,
}

impl FieldSpec {
    pub const fn plain(name: &'static str) -> Self {
        Self {
            name,
            rule: FieldRule::Plain,
        }
    }

    pub const fn big_int(name: &'static str) -> Self {
        Self {
            name,
            rule: FieldRule::BigInt,
        }
    }

    pub const fn big_decimal(name: &'static str) -> Self {
        Self {
            name,
            rule: FieldRule::BigDecimal,
        }
    }

    pub const fn nested(name: &'static str, fields: fn() -> &'static [FieldSpec]) -> Self {
        Self {
            name,
            rule: FieldRule::Nested(fields),
        }
    }
}

/// Decides whether a raw field counts as present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PresencePolicy {
    /// Present when the key exists and the value is not `null`.
    #[default]
    Explicit,
    /// Present when the value is truthy: `0`, `""`, `false` and `null` are absent.
    Truthy,
}

impl PresencePolicy {
    fn is_present(self, value: &Value) -> bool {
        match self {
            Self::Explicit => !value.is_null(),
            Self::Truthy => match value {
                Value::Null => false,
                Value::Bool(flag) => *flag,
                Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
                Value::String(text) => !text.is_empty(),
                Value::Array(_) | Value::Object(_) => true,
            },
        }
    }
}

/// Normalize a raw response object.
pub fn normalize(
    raw: &Map<String, Value>,
    fields: &[FieldSpec],
    policy: PresencePolicy,
) -> NormalizeResult<Record> {
    let mut record = Record::new();

    for spec in fields {
        let Some(value) = raw.get(spec.name) else {
            continue;
        };
        if !policy.is_present(value) {
            continue;
        }
        record.insert(spec.name, convert(value, spec.name, spec.rule, policy)?);
    }

    Ok(record)
}

fn convert(
    value: &Value,
    field: &str,
    rule: FieldRule,
    policy: PresencePolicy,
) -> NormalizeResult<FieldValue> {
    if let Value::Array(items) = value {
        return items
            .iter()
            .map(|item| convert(item, field, rule, policy))
            .collect::<NormalizeResult<Vec<_>>>()
            .map(FieldValue::List);
    }

    match rule {
        FieldRule::Plain => Ok(FieldValue::Plain(value.clone())),
        FieldRule::BigInt => parse_big_int(value, field).map(FieldValue::BigInt),
        FieldRule::BigDecimal => parse_big_decimal(value, field).map(FieldValue::BigDecimal),
        FieldRule::Nested(fields) => match value {
            Value::Object(object) => normalize(object, fields(), policy).map(FieldValue::Nested),
            _ => Err(NormalizeError::UnexpectedShape {
                field: field.to_string(),
                expected: "object",
            }),
        },
    }
}

fn numeric_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Parse an integer. Decimal input is accepted and its fraction truncated.
pub fn parse_big_int(value: &Value, field: &str) -> NormalizeResult<BigInt> {
    let invalid = || NormalizeError::InvalidBigInt {
        field: field.to_string(),
        value: value.to_string(),
    };
    let text = numeric_text(value).ok_or_else(invalid)?;

    if let Ok(int) = BigInt::from_str(&text) {
        return Ok(int);
    }
    let dec = BigDecimal::from_str(&text).map_err(|_| invalid())?;
    let (int, _) = dec.with_scale(0).into_bigint_and_exponent();
    Ok(int)
}

/// Parse a decimal preserving every fractional digit.
pub fn parse_big_decimal(value: &Value, field: &str) -> NormalizeResult<BigDecimal> {
    let invalid = || NormalizeError::InvalidBigDecimal {
        field: field.to_string(),
        value: value.to_string(),
    };
    let text = numeric_text(value).ok_or_else(invalid)?;
    BigDecimal::from_str(&text).map_err(|_| invalid())
}
