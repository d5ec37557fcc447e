//! Schema type mapper.
//!
//! Maps a schema field descriptor to the Rust shape generated for it and the
//! normalization its values need. The mapping is pure: the same descriptor
//! and context always produce the same [`MappedType`], and anything the
//! mapper has no rule for is a [`SchemaError`].

use std::collections::BTreeMap;

use crate::error::{SchemaError, SchemaResult};
use crate::models::{FILTER_SUFFIX, TypeKind, TypeRef};
use crate::normalize::FieldRule;

/// Input type name of the runtime block-change filter.
pub const BLOCK_CHANGED_FILTER: &str = "BlockChangedFilter";

/// Where a mapped type is used in generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingContext {
    /// Field of an `XFilter` input type.
    Filter,
    /// Field of an `XResult` / `XPartial` type.
    Result,
    /// Field of an `XFields` / `XArgs` selection descriptor.
    Fields,
}

impl MappingContext {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filter => "Filter",
            Self::Result => "Result",
            Self::Fields => "Fields",
        }
    }
}

/// Normalization applied to response values of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalization {
    Plain,
    BigInt,
    BigDecimal,
    Nested,
}

/// Which generated type of a referenced entity is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRole {
    /// `XPartial`
    Partial,
    /// `XFilter`
    Filter,
    /// `XArgs`
    Args,
}

/// Rust shape of a mapped field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetType {
    String,
    Bool,
    /// `i32`
    Int,
    /// `i64`
    Int8,
    /// `f64`
    Float,
    BigInt,
    BigDecimal,
    /// Selection flag (`bool`) in a Fields descriptor.
    Flag,
    /// Generated type of another entity.
    Entity { name: String, role: EntityRole },
    /// Enum value in a filter, rendered unquoted.
    Enum,
    /// Runtime block-change filter.
    BlockChangedFilter,
    List(Box<TargetType>),
}

/// Result of mapping one field descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    pub target: TargetType,
    pub normalization: Normalization,
    /// Whether the field is selected through a nested structure.
    pub nested_structure: bool,
    /// Base schema type name.
    pub base_type: String,
}

impl MappedType {
    /// Runtime normalization rule; nested rules are resolved by the caller.
    pub fn field_rule(&self) -> Option<FieldRule> {
        match self.normalization {
            Normalization::Plain => Some(FieldRule::Plain),
            Normalization::BigInt => Some(FieldRule::BigInt),
            Normalization::BigDecimal => Some(FieldRule::BigDecimal),
            Normalization::Nested => None,
        }
    }
}

/// Built-in scalar rules.
fn builtin_scalar(name: &str) -> Option<(TargetType, Normalization)> {
    let mapped = match name {
        "String" | "ID" | "Bytes" => (TargetType::String, Normalization::Plain),
        "Boolean" => (TargetType::Bool, Normalization::Plain),
        "Int" => (TargetType::Int, Normalization::Plain),
        "Int8" | "Timestamp" => (TargetType::Int8, Normalization::Plain),
        "Float" => (TargetType::Float, Normalization::Plain),
        "BigInt" => (TargetType::BigInt, Normalization::BigInt),
        "BigDecimal" => (TargetType::BigDecimal, Normalization::BigDecimal),
        _ => return None,
    };
    Some(mapped)
}

/// Maps schema descriptors to generated shapes.
#[derive(Debug, Clone, Default)]
pub struct TypeMapper {
    custom: BTreeMap<String, (TargetType, Normalization)>,
}

impl TypeMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom scalar, or override a built-in one.
    pub fn with_scalar(
        mut self,
        name: impl Into<String>,
        target: TargetType,
        normalization: Normalization,
    ) -> Self {
        self.custom.insert(name.into(), (target, normalization));
        self
    }

    /// Map a field descriptor in a context.
    pub fn map(&self, ty: &TypeRef, context: MappingContext) -> SchemaResult<MappedType> {
        match ty {
            TypeRef::NonNull(inner) => self.map(inner, context),
            TypeRef::List(inner) => {
                let element = self.map(inner, context)?;
                let target = match (&element.target, context) {
                    (TargetType::Flag, MappingContext::Fields) => TargetType::Flag,
                    (TargetType::Entity { .. }, MappingContext::Fields) => element.target.clone(),
                    _ => TargetType::List(Box::new(element.target.clone())),
                };
                Ok(MappedType { target, ..element })
            }
            TypeRef::Named { kind, name } => self.map_named(*kind, name, context),
        }
    }

    fn map_named(
        &self,
        kind: TypeKind,
        name: &str,
        context: MappingContext,
    ) -> SchemaResult<MappedType> {
        let mapped = |target, normalization, nested_structure| MappedType {
            target,
            normalization,
            nested_structure,
            base_type: name.to_string(),
        };

        match kind {
            TypeKind::Scalar => {
                let (target, normalization) = self
                    .custom
                    .get(name)
                    .cloned()
                    .or_else(|| builtin_scalar(name))
                    .ok_or_else(|| SchemaError::UnknownScalar(name.to_string()))?;
                Ok(match context {
                    MappingContext::Fields => mapped(TargetType::Flag, normalization, false),
                    _ => mapped(target, normalization, false),
                })
            }
            TypeKind::Enum => Ok(match context {
                MappingContext::Fields => mapped(TargetType::Flag, Normalization::Plain, false),
                MappingContext::Filter => mapped(TargetType::Enum, Normalization::Plain, false),
                MappingContext::Result => mapped(TargetType::String, Normalization::Plain, false),
            }),
            TypeKind::Object | TypeKind::Interface => match context {
                MappingContext::Fields => Ok(mapped(
                    TargetType::Entity {
                        name: name.to_string(),
                        role: EntityRole::Args,
                    },
                    Normalization::Nested,
                    true,
                )),
                MappingContext::Result => Ok(mapped(
                    TargetType::Entity {
                        name: name.to_string(),
                        role: EntityRole::Partial,
                    },
                    Normalization::Nested,
                    false,
                )),
                MappingContext::Filter => Err(SchemaError::InvalidContext {
                    name: name.to_string(),
                    context: context.as_str(),
                }),
            },
            TypeKind::InputObject => {
                if context != MappingContext::Filter {
                    return Err(SchemaError::InvalidContext {
                        name: name.to_string(),
                        context: context.as_str(),
                    });
                }
                if name == BLOCK_CHANGED_FILTER {
                    return Ok(mapped(TargetType::BlockChangedFilter, Normalization::Plain, false));
                }
                match name.strip_suffix(FILTER_SUFFIX) {
                    Some(entity) if !entity.is_empty() => Ok(mapped(
                        TargetType::Entity {
                            name: entity.to_string(),
                            role: EntityRole::Filter,
                        },
                        Normalization::Plain,
                        false,
                    )),
                    _ => Err(SchemaError::UnsupportedType {
                        name: name.to_string(),
                        kind: kind.to_string(),
                    }),
                }
            }
            TypeKind::Union | TypeKind::List | TypeKind::NonNull => {
                Err(SchemaError::UnsupportedType {
                    name: name.to_string(),
                    kind: kind.to_string(),
                })
            }
        }
    }
}
