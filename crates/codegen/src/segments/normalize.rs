//! Normalization rules and record decoding.

use proc_macro2::TokenStream;
use quote::quote;

use graphgen_core::mapper::{Normalization, TargetType};

use crate::context::{EntityContext, FieldContext};
use crate::error::CodegenResult;
use crate::naming;
use crate::segment::Segment;

/// Emits `FIELDS` and the `FromRecord` implementation of `XPartial`.
pub struct NormalizeSegment;

impl Segment for NormalizeSegment {
    fn name(&self) -> &'static str {
        "normalize"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn emit(&self, ctx: &EntityContext) -> CodegenResult<TokenStream> {
        let rt = &ctx.runtime;
        let partial = ctx.type_ident("Partial");
        let specs = ctx.fields.iter().map(|field| field_spec(ctx, field));
        let idents: Vec<_> = ctx.fields.iter().map(|f| &f.ident).collect();
        let names: Vec<_> = ctx.fields.iter().map(|f| f.name.as_str()).collect();

        Ok(quote! {
            /// Normalization rule of every field, in schema order.
            pub static FIELDS: &[#rt::FieldSpec] = &[ #( #specs, )* ];

            pub fn field_specs() -> &'static [#rt::FieldSpec] {
                FIELDS
            }

            impl #rt::FromRecord for #partial {
                fn field_specs() -> &'static [#rt::FieldSpec] {
                    FIELDS
                }

                fn from_record(mut record: #rt::Record) -> #rt::NormalizeResult<Self> {
                    Ok(Self {
                        #( #idents: record.decode(#names)?, )*
                    })
                }
            }

            impl #rt::FromFieldValue for #partial {
                fn from_field_value(
                    value: #rt::FieldValue,
                    field: &str,
                ) -> #rt::NormalizeResult<Self> {
                    #rt::value::nested(value, field)
                }
            }
        })
    }
}

fn field_spec(ctx: &EntityContext, field: &FieldContext) -> TokenStream {
    let rt = &ctx.runtime;
    let name = field.name.as_str();
    match field.result.normalization {
        Normalization::Plain => quote! { #rt::FieldSpec::plain(#name) },
        Normalization::BigInt => quote! { #rt::FieldSpec::big_int(#name) },
        Normalization::BigDecimal => quote! { #rt::FieldSpec::big_decimal(#name) },
        Normalization::Nested => {
            let module = naming::module_ident(referenced(&field.result.target));
            quote! { #rt::FieldSpec::nested(#name, super::#module::field_specs) }
        }
    }
}

fn referenced(target: &TargetType) -> &str {
    match target {
        TargetType::Entity { name, .. } => name,
        TargetType::List(inner) => referenced(inner),
        _ => "",
    }
}
