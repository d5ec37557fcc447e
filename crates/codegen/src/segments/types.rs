//! Filter, Result, Partial, Fields, Args and OrderBy declarations.

use proc_macro2::TokenStream;
use quote::quote;

use graphgen_core::mapper::TargetType;

use crate::context::{EntityContext, FieldContext};
use crate::error::CodegenResult;
use crate::naming;
use crate::segment::Segment;

/// Emits the structural types of an entity.
pub struct TypesSegment;

impl Segment for TypesSegment {
    fn name(&self) -> &'static str {
        "types"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn emit(&self, ctx: &EntityContext) -> CodegenResult<TokenStream> {
        let mut tokens = TokenStream::new();
        tokens.extend(filter_type(ctx));
        tokens.extend(result_types(ctx));
        tokens.extend(selection_types(ctx));
        tokens.extend(order_by_type(ctx));
        Ok(tokens)
    }
}

fn is_nested(field: &FieldContext) -> bool {
    matches!(field.selection.target, TargetType::Entity { .. })
}

// -----------------------------------------------------------------------------
// Filter
// -----------------------------------------------------------------------------

fn filter_type(ctx: &EntityContext) -> TokenStream {
    let Some(query) = &ctx.query else {
        return TokenStream::new();
    };
    let rt = &ctx.runtime;
    let filter = ctx.type_ident("Filter");
    let doc = format!(" `where` argument of `{}` queries.", ctx.name);

    let idents: Vec<_> = query.filter_fields.iter().map(|f| &f.ident).collect();
    let names: Vec<_> = query.filter_fields.iter().map(|f| f.name.as_str()).collect();
    let types: Vec<_> = query
        .filter_fields
        .iter()
        .map(|f| ctx.rust_type(&f.mapped.target))
        .collect();

    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct #filter {
            #( pub #idents: Option<#types>, )*
        }

        impl #rt::WhereClause for #filter {
            fn to_where(&self) -> #rt::serde_json::Map<String, #rt::serde_json::Value> {
                let mut map = #rt::serde_json::Map::new();
                #( #rt::filter::insert(&mut map, #names, &self.#idents); )*
                map
            }
        }

        impl #rt::FilterValue for #filter {
            fn to_filter_value(&self) -> #rt::serde_json::Value {
                #rt::serde_json::Value::Object(#rt::WhereClause::to_where(self))
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Result / Partial
// -----------------------------------------------------------------------------

fn result_types(ctx: &EntityContext) -> TokenStream {
    let rt = &ctx.runtime;
    let result = ctx.type_ident("Result");
    let partial = ctx.type_ident("Partial");
    let result_doc = format!(" `{}` with every field present.", ctx.name);
    let partial_doc = format!(
        " `{}` as returned by a fetch: only the selected fields are set.",
        ctx.name
    );

    let idents: Vec<_> = ctx.fields.iter().map(|f| &f.ident).collect();
    let names: Vec<_> = ctx.fields.iter().map(|f| f.name.as_str()).collect();
    let types: Vec<_> = ctx
        .fields
        .iter()
        .map(|f| ctx.rust_type(&f.result.target))
        .collect();

    quote! {
        #[doc = #result_doc]
        #[derive(Debug, Clone, PartialEq)]
        pub struct #result {
            #( pub #idents: #types, )*
        }

        #[doc = #partial_doc]
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct #partial {
            #( pub #idents: Option<#types>, )*
        }

        impl TryFrom<#partial> for #result {
            type Error = #rt::NormalizeError;

            fn try_from(partial: #partial) -> Result<Self, Self::Error> {
                Ok(Self {
                    #( #idents: #rt::value::require(partial.#idents, #names)?, )*
                })
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Fields / Args
// -----------------------------------------------------------------------------

fn selection_types(ctx: &EntityContext) -> TokenStream {
    let rt = &ctx.runtime;
    let fields_ty = ctx.type_ident("Fields");
    let args_ty = ctx.type_ident("Args");
    let fields_doc = format!(" Field selection descriptor of `{}`.", ctx.name);
    let args_doc = format!(
        " Fields of `{}` to request. Unset keys are not requested.",
        ctx.name
    );

    let idents: Vec<_> = ctx.fields.iter().map(|f| &f.ident).collect();
    let selection_types: Vec<_> = ctx
        .fields
        .iter()
        .map(|f| ctx.rust_type(&f.selection.target))
        .collect();

    let leaves: Vec<_> = ctx
        .fields
        .iter()
        .filter(|f| !is_nested(f))
        .map(|f| &f.ident)
        .collect();

    let builders = ctx.fields.iter().map(|field| {
        let ident = &field.ident;
        let builder = naming::builder_ident(&field.name);
        if is_nested(field) {
            let nested = ctx.base_type(&field.selection.target);
            let doc = format!(" Request `{}` with a sub-selection.", field.name);
            quote! {
                #[doc = #doc]
                pub fn #builder(mut self, args: #nested) -> Self {
                    self.#ident = Some(Box::new(args));
                    self
                }
            }
        } else {
            let doc = format!(" Request `{}`.", field.name);
            quote! {
                #[doc = #doc]
                pub fn #builder(mut self) -> Self {
                    self.#ident = Some(true);
                    self
                }
            }
        }
    });

    let pushes = ctx.fields.iter().map(|field| {
        let ident = &field.ident;
        let name = field.name.as_str();
        if is_nested(field) {
            quote! {
                if let Some(args) = &self.#ident {
                    selection.push_nested(#name, #rt::IntoSelection::selection(args));
                }
            }
        } else {
            quote! {
                if self.#ident == Some(true) {
                    selection.push_leaf(#name);
                }
            }
        }
    });

    quote! {
        #[doc = #fields_doc]
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct #fields_ty {
            #( pub #idents: #selection_types, )*
        }

        #[doc = #args_doc]
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct #args_ty {
            #( pub #idents: Option<#selection_types>, )*
        }

        impl #args_ty {
            pub fn new() -> Self {
                Self::default()
            }

            /// Request every scalar and enum field.
            pub fn scalars() -> Self {
                Self {
                    #( #leaves: Some(true), )*
                    ..Self::default()
                }
            }

            #( #builders )*
        }

        impl From<#fields_ty> for #args_ty {
            fn from(fields: #fields_ty) -> Self {
                Self {
                    #( #idents: Some(fields.#idents), )*
                }
            }
        }

        impl #rt::IntoSelection for #args_ty {
            fn selection(&self) -> #rt::Selection {
                let mut selection = #rt::Selection::new();
                #( #pushes )*
                selection
            }
        }
    }
}

// -----------------------------------------------------------------------------
// OrderBy
// -----------------------------------------------------------------------------

fn order_by_type(ctx: &EntityContext) -> TokenStream {
    if ctx.query.is_none() {
        return TokenStream::new();
    }
    let order_by = ctx.type_ident("OrderBy");
    let doc = format!(" Ordering keys of `{}` queries.", ctx.name);

    let orderable: Vec<_> = ctx.fields.iter().filter(|f| f.orderable).collect();
    let variants: Vec<_> = orderable
        .iter()
        .map(|f| naming::variant_ident(&f.name))
        .collect();
    let names: Vec<_> = orderable.iter().map(|f| f.name.as_str()).collect();

    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum #order_by {
            #( #variants, )*
        }

        impl #order_by {
            /// Field name as sent in `orderBy`.
            pub const fn as_str(self) -> &'static str {
                match self {
                    #( Self::#variants => #names, )*
                }
            }
        }

        impl AsRef<str> for #order_by {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }
    }
}
