//! Normalized response values and their typed conversions.
//!
//! [`crate::normalize::normalize`] turns a raw JSON object into a [`Record`];
//! generated `XPartial` types implement [`FromRecord`] to pull typed fields
//! out of it.

use std::collections::BTreeMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde_json::Value;

use crate::error::{NormalizeError, NormalizeResult};
use crate::normalize::FieldSpec;

// =============================================================================
// FieldValue / Record
// =============================================================================

/// A single normalized field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Passed through unchanged.
    Plain(Value),
    /// Arbitrary-precision integer.
    BigInt(BigInt),
    /// Arbitrary-precision decimal.
    BigDecimal(BigDecimal),
    /// Nested entity.
    Nested(Record),
    /// Element-wise normalized array.
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Convert back into JSON. Big numbers render as strings.
    pub fn into_json(self) -> Value {
        match self {
            Self::Plain(value) => value,
            Self::BigInt(int) => Value::String(int.to_string()),
            Self::BigDecimal(dec) => Value::String(dec.to_string()),
            Self::Nested(record) => Value::Object(
                record
                    .0
                    .into_iter()
                    .map(|(name, value)| (name, value.into_json()))
                    .collect(),
            ),
            Self::List(items) => Value::Array(items.into_iter().map(Self::into_json).collect()),
        }
    }
}

/// Fields present in one normalized response object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(BTreeMap<String, FieldValue>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove a field and convert it. Absent fields decode to `None`.
    pub fn decode<T: FromFieldValue>(&mut self, name: &str) -> NormalizeResult<Option<T>> {
        self.0
            .remove(name)
            .map(|value| T::from_field_value(value, name))
            .transpose()
    }
}

// =============================================================================
// Typed Conversions
// =============================================================================

/// Conversion from a normalized value into a field type.
pub trait FromFieldValue: Sized {
    fn from_field_value(value: FieldValue, field: &str) -> NormalizeResult<Self>;
}

/// Conversion from a normalized record into a generated entity type.
pub trait FromRecord: Sized {
    /// Normalization rules for every entity field.
    fn field_specs() -> &'static [FieldSpec];

    fn from_record(record: Record) -> NormalizeResult<Self>;
}

/// Decode a nested entity value.
pub fn nested<T: FromRecord>(value: FieldValue, field: &str) -> NormalizeResult<T> {
    match value {
        FieldValue::Nested(record) => T::from_record(record),
        _ => Err(shape(field, "object")),
    }
}

/// Unwrap a field required by a full result.
pub fn require<T>(value: Option<T>, field: &str) -> NormalizeResult<T> {
    value.ok_or_else(|| NormalizeError::Missing(field.to_string()))
}

fn shape(field: &str, expected: &'static str) -> NormalizeError {
    NormalizeError::UnexpectedShape {
        field: field.to_string(),
        expected,
    }
}

impl FromFieldValue for FieldValue {
    fn from_field_value(value: FieldValue, _field: &str) -> NormalizeResult<Self> {
        Ok(value)
    }
}

impl FromFieldValue for Value {
    fn from_field_value(value: FieldValue, _field: &str) -> NormalizeResult<Self> {
        Ok(value.into_json())
    }
}

impl FromFieldValue for String {
    fn from_field_value(value: FieldValue, field: &str) -> NormalizeResult<Self> {
        match value {
            FieldValue::Plain(Value::String(text)) => Ok(text),
            FieldValue::Plain(Value::Number(number)) => Ok(number.to_string()),
            _ => Err(shape(field, "string")),
        }
    }
}

impl FromFieldValue for bool {
    fn from_field_value(value: FieldValue, field: &str) -> NormalizeResult<Self> {
        match value {
            FieldValue::Plain(Value::Bool(flag)) => Ok(flag),
            _ => Err(shape(field, "boolean")),
        }
    }
}

impl FromFieldValue for i32 {
    fn from_field_value(value: FieldValue, field: &str) -> NormalizeResult<Self> {
        let wide = i64::from_field_value(value, field)?;
        i32::try_from(wide).map_err(|_| shape(field, "32-bit integer"))
    }
}

// Int8 and Timestamp are serialized as strings by some servers.
impl FromFieldValue for i64 {
    fn from_field_value(value: FieldValue, field: &str) -> NormalizeResult<Self> {
        match value {
            FieldValue::Plain(Value::Number(number)) => {
                number.as_i64().ok_or_else(|| shape(field, "integer"))
            }
            FieldValue::Plain(Value::String(text)) => {
                text.parse().map_err(|_| shape(field, "integer"))
            }
            _ => Err(shape(field, "integer")),
        }
    }
}

impl FromFieldValue for f64 {
    fn from_field_value(value: FieldValue, field: &str) -> NormalizeResult<Self> {
        match value {
            FieldValue::Plain(Value::Number(number)) => {
                number.as_f64().ok_or_else(|| shape(field, "number"))
            }
            FieldValue::Plain(Value::String(text)) => {
                text.parse().map_err(|_| shape(field, "number"))
            }
            _ => Err(shape(field, "number")),
        }
    }
}

impl FromFieldValue for BigInt {
    fn from_field_value(value: FieldValue, field: &str) -> NormalizeResult<Self> {
        match value {
            FieldValue::BigInt(int) => Ok(int),
            FieldValue::Plain(Value::String(text)) => {
                BigInt::from_str(&text).map_err(|_| NormalizeError::InvalidBigInt {
                    field: field.to_string(),
                    value: text,
                })
            }
            _ => Err(shape(field, "BigInt")),
        }
    }
}

impl FromFieldValue for BigDecimal {
    fn from_field_value(value: FieldValue, field: &str) -> NormalizeResult<Self> {
        match value {
            FieldValue::BigDecimal(dec) => Ok(dec),
            FieldValue::BigInt(int) => Ok(BigDecimal::from(int)),
            FieldValue::Plain(Value::String(text)) => {
                BigDecimal::from_str(&text).map_err(|_| NormalizeError::InvalidBigDecimal {
                    field: field.to_string(),
                    value: text,
                })
            }
            _ => Err(shape(field, "BigDecimal")),
        }
    }
}

impl<T: FromFieldValue> FromFieldValue for Vec<T> {
    fn from_field_value(value: FieldValue, field: &str) -> NormalizeResult<Self> {
        match value {
            FieldValue::List(items) => items
                .into_iter()
                .map(|item| T::from_field_value(item, field))
                .collect(),
            _ => Err(shape(field, "list")),
        }
    }
}

impl<T: FromFieldValue> FromFieldValue for Box<T> {
    fn from_field_value(value: FieldValue, field: &str) -> NormalizeResult<Self> {
        T::from_field_value(value, field).map(Box::new)
    }
}
