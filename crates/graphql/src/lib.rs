//! GraphQL adapters for graphgen.
//!
//! Implements the query-text and schema-loading ports of `graphgen-core`:
//!
//! - [`GqlQueryBuilder`] - renders `{ tokens(first: 1000, ...) { id ... } }`
//! - [`IntrospectionFile`] / [`RemoteSchema`] - load a [`graphgen_core::models::Schema`]
//!   from an introspection result

mod introspection;
mod query;

pub use introspection::{INTROSPECTION_QUERY, IntrospectionFile, RemoteSchema, parse_introspection};
pub use query::GqlQueryBuilder;
