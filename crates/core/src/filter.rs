//! Rendering of typed filters into the JSON `where` argument.
//!
//! Generated `XFilter` types implement [`WhereClause`] by inserting each set
//! field with [`insert`]. Arbitrary-precision values render as strings, the
//! way subgraph servers accept them.

use std::fmt;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde_json::{Map, Number, Value};

/// A value usable inside a `where` argument.
pub trait FilterValue {
    fn to_filter_value(&self) -> Value;
}

/// A filter that renders into a `where` map.
pub trait WhereClause {
    fn to_where(&self) -> Map<String, Value>;
}

impl WhereClause for Map<String, Value> {
    fn to_where(&self) -> Map<String, Value> {
        self.clone()
    }
}

impl<T: WhereClause + ?Sized> WhereClause for Box<T> {
    fn to_where(&self) -> Map<String, Value> {
        (**self).to_where()
    }
}

/// Insert a filter field when it is set.
pub fn insert<T: FilterValue>(map: &mut Map<String, Value>, key: &str, value: &Option<T>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value.to_filter_value());
    }
}

impl FilterValue for String {
    fn to_filter_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl FilterValue for bool {
    fn to_filter_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FilterValue for i32 {
    fn to_filter_value(&self) -> Value {
        Value::from(*self)
    }
}

impl FilterValue for i64 {
    fn to_filter_value(&self) -> Value {
        Value::from(*self)
    }
}

impl FilterValue for f64 {
    fn to_filter_value(&self) -> Value {
        Number::from_f64(*self).map_or(Value::Null, Value::Number)
    }
}

impl FilterValue for BigInt {
    fn to_filter_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl FilterValue for BigDecimal {
    fn to_filter_value(&self) -> Value {
        Value::String(self.normalized().to_string())
    }
}

impl FilterValue for Value {
    fn to_filter_value(&self) -> Value {
        self.clone()
    }
}

impl<T: FilterValue> FilterValue for Vec<T> {
    fn to_filter_value(&self) -> Value {
        Value::Array(self.iter().map(FilterValue::to_filter_value).collect())
    }
}

impl<T: FilterValue + ?Sized> FilterValue for Box<T> {
    fn to_filter_value(&self) -> Value {
        (**self).to_filter_value()
    }
}

// =============================================================================
// Enum Values
// =============================================================================

/// Key marking an enum value inside a rendered `where` map.
///
/// `$` cannot start a GraphQL name, so the marker never clashes with a
/// filter field.
pub const ENUM_MARKER: &str = "$enum";

/// A GraphQL enum value used in a filter (e.g. `kind_in: [ERC20, ERC721]`).
///
/// Rendered unquoted by query builders; strict servers reject string
/// literals for enum inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnumValue(String);

impl EnumValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EnumValue {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for EnumValue {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FilterValue for EnumValue {
    fn to_filter_value(&self) -> Value {
        let mut marker = Map::new();
        marker.insert(ENUM_MARKER.to_string(), Value::String(self.0.clone()));
        Value::Object(marker)
    }
}

/// Enum name carried by a rendered filter value, if it is one.
pub fn enum_name(value: &Value) -> Option<&str> {
    match value {
        Value::Object(map) if map.len() == 1 => map.get(ENUM_MARKER)?.as_str(),
        _ => None,
    }
}

// =============================================================================
// Block Filter
// =============================================================================

/// Block-change constraint accepted by every entity filter (`_change_block`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockChangedFilter {
    pub number_gte: i64,
}

impl BlockChangedFilter {
    pub fn since(number_gte: i64) -> Self {
        Self { number_gte }
    }
}

impl WhereClause for BlockChangedFilter {
    fn to_where(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("number_gte".into(), Value::from(self.number_gte));
        map
    }
}

impl FilterValue for BlockChangedFilter {
    fn to_filter_value(&self) -> Value {
        Value::Object(self.to_where())
    }
}
