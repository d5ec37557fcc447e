//! Per-entity generation context.
//!
//! Every field is mapped once, up front. A mapping failure aborts the
//! context so no partial module is ever emitted for the entity.

use std::collections::BTreeMap;

use proc_macro2::{Ident, TokenStream};
use quote::quote;

use graphgen_core::error::SchemaError;
use graphgen_core::mapper::{EntityRole, MappedType, MappingContext, TargetType, TypeMapper};
use graphgen_core::models::{Accessors, Schema};

use crate::error::{CodegenError, CodegenResult};
use crate::naming;

/// Functions every entity module declares besides the accessors.
pub const MODULE_FUNCTIONS: &[&str] = &["field_specs"];

/// A mapped entity field.
#[derive(Debug, Clone)]
pub struct FieldContext {
    /// GraphQL field name.
    pub name: String,
    pub ident: Ident,
    /// Mapping in Result context.
    pub result: MappedType,
    /// Mapping in Fields context.
    pub selection: MappedType,
    /// Whether the field may be used as `orderBy` (non-list scalar or enum).
    pub orderable: bool,
}

/// A mapped filter input field.
#[derive(Debug, Clone)]
pub struct FilterFieldContext {
    pub name: String,
    pub ident: Ident,
    pub mapped: MappedType,
}

/// Filter side of a queryable entity.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub accessors: Accessors,
    pub filter_fields: Vec<FilterFieldContext>,
}

/// Everything segments need to emit one entity module.
#[derive(Debug, Clone)]
pub struct EntityContext {
    /// Schema type name.
    pub name: String,
    pub module: Ident,
    pub fields: Vec<FieldContext>,
    /// Present when the entity has a filter type and can be fetched.
    pub query: Option<QueryContext>,
    /// Path of the runtime crate, e.g. `::graphgen_core`.
    pub runtime: TokenStream,
}

impl EntityContext {
    /// Map every field of a schema type.
    pub fn build(
        schema: &Schema,
        mapper: &TypeMapper,
        name: &str,
        runtime: &TokenStream,
    ) -> CodegenResult<Self> {
        let entity = schema
            .entity(name)
            .ok_or_else(|| SchemaError::EntityNotFound(name.to_string()))?;

        let mut seen = BTreeMap::new();
        let mut fields = Vec::with_capacity(entity.fields.len());
        for field in &entity.fields {
            let ident = naming::field_ident(&field.name);
            check_unique(&mut seen, name, &ident, &field.name)?;

            let result = mapper.map(&field.ty, MappingContext::Result)?;
            let selection = mapper.map(&field.ty, MappingContext::Fields)?;
            check_reference(schema, &result.target)?;

            let orderable = !field.ty.is_list() && !field.ty.is_composite();
            fields.push(FieldContext {
                name: field.name.clone(),
                ident,
                result,
                selection,
                orderable,
            });
        }

        let mut builders = BTreeMap::new();
        for field in &fields {
            let builder = naming::builder_ident(&field.name);
            check_unique(&mut builders, &format!("{name} builders"), &builder, &field.name)?;
        }

        let mut variants = BTreeMap::new();
        for field in fields.iter().filter(|f| f.orderable) {
            let variant = naming::variant_ident(&field.name);
            check_unique(&mut variants, &format!("{name} orderBy"), &variant, &field.name)?;
        }

        let query = match schema.filter_for(name) {
            Some(filter) => {
                let filter_scope = filter.name.clone();
                let mut seen = BTreeMap::new();
                let mut filter_fields = Vec::with_capacity(filter.input_fields.len());
                for field in &filter.input_fields {
                    let ident = naming::field_ident(&field.name);
                    check_unique(&mut seen, &filter_scope, &ident, &field.name)?;

                    let mapped = mapper.map(&field.ty, MappingContext::Filter)?;
                    check_reference(schema, &mapped.target)?;
                    filter_fields.push(FilterFieldContext {
                        name: field.name.clone(),
                        ident,
                        mapped,
                    });
                }
                let accessors = schema.accessors(name);
                let mut items: BTreeMap<String, String> = MODULE_FUNCTIONS
                    .iter()
                    .map(|item| (item.to_string(), item.to_string()))
                    .collect();
                for accessor in [&accessors.single, &accessors.many] {
                    let function = naming::field_ident(accessor);
                    check_unique(&mut items, &format!("{name} module"), &function, accessor)?;
                }
                Some(QueryContext {
                    accessors,
                    filter_fields,
                })
            }
            None => None,
        };

        Ok(Self {
            name: name.to_string(),
            module: naming::module_ident(name),
            fields,
            query,
            runtime: runtime.clone(),
        })
    }

    /// Generated type identifier for this entity, e.g. `TokenPartial`.
    pub fn type_ident(&self, suffix: &str) -> Ident {
        naming::type_ident(&self.name, suffix)
    }

    /// Schema types this entity's module refers to.
    pub fn references(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .fields
            .iter()
            .map(|f| &f.result.target)
            .chain(
                self.query
                    .iter()
                    .flat_map(|q| q.filter_fields.iter().map(|f| &f.mapped.target)),
            )
            .filter_map(entity_reference)
            .filter(|referenced| *referenced != self.name)
            .map(str::to_string)
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Rust type of a mapped target.
    ///
    /// Single references to other generated types are boxed; entity types
    /// can be mutually recursive.
    pub fn rust_type(&self, target: &TargetType) -> TokenStream {
        match target {
            TargetType::Entity { .. } => {
                let inner = self.base_type(target);
                quote! { Box<#inner> }
            }
            TargetType::List(inner) => {
                let inner = self.base_type(inner);
                quote! { Vec<#inner> }
            }
            other => self.base_type(other),
        }
    }

    /// Rust type of a mapped target without boxing.
    pub fn base_type(&self, target: &TargetType) -> TokenStream {
        let rt = &self.runtime;
        match target {
            TargetType::String => quote! { String },
            TargetType::Bool | TargetType::Flag => quote! { bool },
            TargetType::Int => quote! { i32 },
            TargetType::Int8 => quote! { i64 },
            TargetType::Float => quote! { f64 },
            TargetType::BigInt => quote! { #rt::BigInt },
            TargetType::BigDecimal => quote! { #rt::BigDecimal },
            TargetType::Enum => quote! { #rt::EnumValue },
            TargetType::BlockChangedFilter => quote! { #rt::BlockChangedFilter },
            TargetType::Entity { name, role } => {
                let module = naming::module_ident(name);
                let ty = naming::type_ident(name, role_suffix(*role));
                quote! { super::#module::#ty }
            }
            TargetType::List(inner) => {
                let inner = self.base_type(inner);
                quote! { Vec<#inner> }
            }
        }
    }
}

/// Type suffix of a generated entity role.
pub fn role_suffix(role: EntityRole) -> &'static str {
    match role {
        EntityRole::Partial => "Partial",
        EntityRole::Filter => "Filter",
        EntityRole::Args => "Args",
    }
}

fn entity_reference(target: &TargetType) -> Option<&str> {
    match target {
        TargetType::Entity { name, .. } => Some(name),
        TargetType::List(inner) => entity_reference(inner),
        _ => None,
    }
}

/// Referenced types must exist, otherwise the module would not compile.
fn check_reference(schema: &Schema, target: &TargetType) -> CodegenResult<()> {
    match entity_reference(target) {
        Some(name) if schema.entity(name).is_none() => {
            Err(SchemaError::EntityNotFound(name.to_string()).into())
        }
        _ => Ok(()),
    }
}

fn check_unique(
    seen: &mut BTreeMap<String, String>,
    scope: &str,
    ident: &Ident,
    name: &str,
) -> CodegenResult<()> {
    let key = ident.to_string();
    if let Some(first) = seen.get(&key) {
        return Err(CodegenError::IdentCollision {
            scope: scope.to_string(),
            ident: key,
            first: first.clone(),
            second: name.to_string(),
        });
    }
    seen.insert(key, name.to_string());
    Ok(())
}
