//! Schema models consumed by the type mapper and the generator.
//!
//! These models are loader-agnostic: the introspection adapter in
//! `graphgen-graphql` produces them, the generator only reads them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Descriptors
// =============================================================================

/// Introspection kind of a named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

impl TypeKind {
    /// Introspection spelling of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "SCALAR",
            Self::Object => "OBJECT",
            Self::Interface => "INTERFACE",
            Self::Union => "UNION",
            Self::Enum => "ENUM",
            Self::InputObject => "INPUT_OBJECT",
            Self::List => "LIST",
            Self::NonNull => "NON_NULL",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema-level type descriptor of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Reference to a named type.
    Named { kind: TypeKind, name: String },
    /// List wrapper.
    List(Box<TypeRef>),
    /// Non-null wrapper.
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(kind: TypeKind, name: impl Into<String>) -> Self {
        Self::Named {
            kind,
            name: name.into(),
        }
    }

    pub fn scalar(name: impl Into<String>) -> Self {
        Self::named(TypeKind::Scalar, name)
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::named(TypeKind::Object, name)
    }

    pub fn list(inner: TypeRef) -> Self {
        Self::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        Self::NonNull(Box::new(inner))
    }

    /// Name of the innermost named type.
    pub fn base_name(&self) -> &str {
        match self {
            Self::Named { name, .. } => name,
            Self::List(inner) | Self::NonNull(inner) => inner.base_name(),
        }
    }

    /// Kind of the innermost named type.
    pub fn base_kind(&self) -> TypeKind {
        match self {
            Self::Named { kind, .. } => *kind,
            Self::List(inner) | Self::NonNull(inner) => inner.base_kind(),
        }
    }

    /// Whether a list wrapper appears anywhere in the descriptor.
    pub fn is_list(&self) -> bool {
        match self {
            Self::Named { .. } => false,
            Self::List(_) => true,
            Self::NonNull(inner) => inner.is_list(),
        }
    }

    /// Whether the base type is an object or interface reference.
    pub fn is_composite(&self) -> bool {
        matches!(self.base_kind(), TypeKind::Object | TypeKind::Interface)
    }
}

// =============================================================================
// Entities
// =============================================================================

/// A named, typed field of an entity or filter type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: TypeRef,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Schema type being turned into a typed client accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Type name, PascalCase by convention (e.g. "Token").
    pub name: String,
    /// Fields in schema order.
    pub fields: Vec<Field>,
}

/// Companion input type describing the filterable fields of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterEntity {
    /// Input type name (e.g. "Token_filter").
    pub name: String,
    /// Input fields in schema order.
    pub input_fields: Vec<Field>,
}

/// Suffix of the filter input type companion to an entity.
pub const FILTER_SUFFIX: &str = "_filter";

/// Name of the filter input type for an entity.
pub fn filter_type_name(entity: &str) -> String {
    format!("{entity}{FILTER_SUFFIX}")
}

// =============================================================================
// Schema
// =============================================================================

/// A named type of the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaType {
    pub name: String,
    pub kind: TypeKind,
    /// Output fields (objects and interfaces).
    pub fields: Vec<Field>,
    /// Input fields (input objects).
    pub input_fields: Vec<Field>,
}

/// Query-root accessor names of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessors {
    /// Singular accessor (e.g. "token").
    pub single: String,
    /// Collection accessor (e.g. "tokens").
    pub many: String,
}

/// Loaded schema: every named type keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    /// Name of the query root type, if declared.
    pub query_type: Option<String>,
    /// All named types, ordered by name.
    pub types: BTreeMap<String, SchemaType>,
}

impl Schema {
    pub fn new(query_type: Option<String>) -> Self {
        Self {
            query_type,
            types: BTreeMap::new(),
        }
    }

    /// Insert or replace a named type.
    pub fn insert(&mut self, ty: SchemaType) {
        self.types.insert(ty.name.clone(), ty);
    }

    pub fn get(&self, name: &str) -> Option<&SchemaType> {
        self.types.get(name)
    }

    /// Names of all entity types, in name order.
    ///
    /// An entity is an object type that is not the query root, is not
    /// `_`-prefixed, and has a companion `<Name>_filter` input type.
    pub fn entity_names(&self) -> Vec<&str> {
        self.types
            .values()
            .filter(|ty| ty.kind == TypeKind::Object)
            .filter(|ty| !ty.name.starts_with('_'))
            .filter(|ty| self.query_type.as_deref() != Some(ty.name.as_str()))
            .filter(|ty| self.types.contains_key(&filter_type_name(&ty.name)))
            .map(|ty| ty.name.as_str())
            .collect()
    }

    /// Entity description for a type name.
    pub fn entity(&self, name: &str) -> Option<Entity> {
        let ty = self.types.get(name)?;
        if !matches!(ty.kind, TypeKind::Object | TypeKind::Interface) {
            return None;
        }
        Some(Entity {
            name: ty.name.clone(),
            fields: ty.fields.clone(),
        })
    }

    /// Filter description companion to an entity.
    pub fn filter_for(&self, entity: &str) -> Option<FilterEntity> {
        let ty = self.types.get(&filter_type_name(entity))?;
        (ty.kind == TypeKind::InputObject).then(|| FilterEntity {
            name: ty.name.clone(),
            input_fields: ty.input_fields.clone(),
        })
    }

    /// Query-root accessors for an entity.
    ///
    /// Looks up the root fields returning the entity (singular and list);
    /// falls back to the lower-camel name and its naive plural.
    pub fn accessors(&self, entity: &str) -> Accessors {
        let root = self
            .query_type
            .as_deref()
            .and_then(|name| self.types.get(name));

        let mut single = None;
        let mut many = None;

        if let Some(root) = root {
            for field in &root.fields {
                if field.ty.base_name() != entity || field.name.starts_with('_') {
                    continue;
                }
                if field.ty.is_list() {
                    many.get_or_insert_with(|| field.name.clone());
                } else {
                    single.get_or_insert_with(|| field.name.clone());
                }
            }
        }

        let fallback = lower_first(entity);
        Accessors {
            many: many.unwrap_or_else(|| format!("{fallback}s")),
            single: single.unwrap_or(fallback),
        }
    }
}

/// Lowercase the first character of a type name.
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

// =============================================================================
// Tests
// =============================================================================
