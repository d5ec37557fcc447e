mod pagination;
mod query_builder;
mod schema_source;
mod transport;

pub use pagination::*;
pub use query_builder::*;
pub use schema_source::*;
pub use transport::*;
