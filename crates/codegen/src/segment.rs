//! Segment trait definition.

use proc_macro2::TokenStream;

use crate::context::EntityContext;
use crate::error::CodegenResult;

/// One self-contained part of a generated entity module.
///
/// Segments are registered in a [`crate::SegmentRegistry`] and emitted in
/// priority order (higher first) into the entity module.
///
/// # Example
///
/// ```ignore
/// pub struct DebugSegment;
///
/// impl Segment for DebugSegment {
///     fn name(&self) -> &'static str { "debug" }
///
///     fn emit(&self, ctx: &EntityContext) -> CodegenResult<TokenStream> {
///         let name = &ctx.name;
///         Ok(quote! { pub const TYPE_NAME: &str = #name; })
///     }
/// }
/// ```
pub trait Segment: Send + Sync {
    /// Unique name identifying this segment, used for logging.
    fn name(&self) -> &'static str;

    /// Priority for emission order (higher = earlier). Default is 0.
    fn priority(&self) -> i32 {
        0
    }

    /// Whether the segment has anything to emit for this entity.
    ///
    /// Fetch segments only apply to entities that have a filter type.
    fn applies(&self, ctx: &EntityContext) -> bool {
        let _ = ctx;
        true
    }

    /// Emit the segment's items.
    fn emit(&self, ctx: &EntityContext) -> CodegenResult<TokenStream>;
}
