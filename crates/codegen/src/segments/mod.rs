//! Built-in segments.

mod many;
mod normalize;
mod single;
mod types;

pub use many::ManyFetchSegment;
pub use normalize::NormalizeSegment;
pub use single::SingleFetchSegment;
pub use types::TypesSegment;
