//! Single-record fetch function.

use proc_macro2::TokenStream;
use quote::quote;

use crate::context::EntityContext;
use crate::error::CodegenResult;
use crate::naming;
use crate::segment::Segment;

pub struct SingleFetchSegment;

impl Segment for SingleFetchSegment {
    fn name(&self) -> &'static str {
        "single"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn applies(&self, ctx: &EntityContext) -> bool {
        ctx.query.is_some()
    }

    fn emit(&self, ctx: &EntityContext) -> CodegenResult<TokenStream> {
        let Some(query) = &ctx.query else {
            return Ok(TokenStream::new());
        };
        let rt = &ctx.runtime;
        let accessor = query.accessors.single.as_str();
        let function = naming::field_ident(accessor);
        let args = ctx.type_ident("Args");
        let partial = ctx.type_ident("Partial");
        let doc = format!(
            " Fetch one `{}` by id. Issues one request; a missing record is `FetchError::NotFound`.",
            ctx.name
        );

        Ok(quote! {
            /// Query-root accessor for one record.
            pub const SINGLE_ACCESSOR: &str = #accessor;

            #[doc = #doc]
            pub async fn #function(
                client: &#rt::GraphClient,
                url: &str,
                options: &#rt::SingleQueryOptions,
                args: &#args,
            ) -> #rt::FetchResult<#partial> {
                client
                    .fetch_one(url, SINGLE_ACCESSOR, options, &#rt::IntoSelection::selection(args))
                    .await
            }
        })
    }
}
