//! Paginated collection fetch function.

use proc_macro2::TokenStream;
use quote::quote;

use crate::context::EntityContext;
use crate::error::CodegenResult;
use crate::naming;
use crate::segment::Segment;

pub struct ManyFetchSegment;

impl Segment for ManyFetchSegment {
    fn name(&self) -> &'static str {
        "many"
    }

    fn applies(&self, ctx: &EntityContext) -> bool {
        ctx.query.is_some()
    }

    fn emit(&self, ctx: &EntityContext) -> CodegenResult<TokenStream> {
        let Some(query) = &ctx.query else {
            return Ok(TokenStream::new());
        };
        let rt = &ctx.runtime;
        let accessor = query.accessors.many.as_str();
        let function = naming::field_ident(accessor);
        let filter = ctx.type_ident("Filter");
        let order_by = ctx.type_ident("OrderBy");
        let args = ctx.type_ident("Args");
        let partial = ctx.type_ident("Partial");
        let doc = format!(
            " Fetch a collection of `{}`. A `first` above `MAX_PAGE` is fetched over several requests.",
            ctx.name
        );

        Ok(quote! {
            /// Query-root accessor for collections.
            pub const MANY_ACCESSOR: &str = #accessor;

            #[doc = #doc]
            pub async fn #function(
                client: &#rt::GraphClient,
                url: &str,
                options: &#rt::MultiQueryOptions<#filter, #order_by>,
                args: &#args,
            ) -> #rt::FetchResult<Vec<#partial>> {
                client
                    .fetch_many(url, MANY_ACCESSOR, options, &#rt::IntoSelection::selection(args))
                    .await
            }
        })
    }
}
