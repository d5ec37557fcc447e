//! Core domain layer for graphgen.
//!
//! This crate contains the schema models, port traits (interfaces), the type
//! mapper and the runtime that generated entity modules call into. It follows
//! hexagonal architecture principles - this is the innermost layer with
//! no dependencies on infrastructure.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     graphgen (binary)                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │ graphgen-codegen  │  graphgen-graphql  │  graphgen-http     │
//! │   (emission)      │ (query text, intro)│   (reqwest)        │
//! ├───────────────────┴────────────────────┴────────────────────┤
//! │                     graphgen-core  ← YOU ARE HERE           │
//! │      (models, ports, mapper, normalize, services)           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`models`] - Schema models (Entity, FilterEntity, TypeRef, Schema)
//! - [`ports`] - Interface traits for adapters to implement, query options
//! - [`mapper`] - Schema type to Rust shape mapping
//! - [`normalize`] - Raw response to [`value::Record`] conversion
//! - [`services`] - Fetch runtime ([`services::GraphClient`])
//! - [`error`] - Error types
//! - [`metrics`] - Metrics definitions
//!
//! # Key Concepts
//!
//! ## Ports
//!
//! - [`ports::Transport`] - POST a GraphQL request, return the envelope
//! - [`ports::QueryBuilder`] - Render query text from resolved arguments
//! - [`ports::SchemaSource`] - Load the schema to generate from
//!
//! ## Fetch Lifecycle
//!
//! 1. Generated code turns caller args into a [`Selection`]
//! 2. [`services::GraphClient`] resolves per-request [`ports::QueryArgs`]
//! 3. The query builder renders text, the transport posts it
//! 4. Rows are normalized and decoded into generated `XPartial` types
//! 5. Full pages continue from the last row's ordering value

pub mod error;
pub mod filter;
pub mod mapper;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod ports;
pub mod selection;
pub mod services;
pub mod value;

pub use error::{FetchError, FetchResult, NormalizeError, NormalizeResult};
pub use filter::{BlockChangedFilter, EnumValue, FilterValue, WhereClause};
pub use normalize::{FieldRule, FieldSpec, PresencePolicy};
pub use ports::{BlockPin, MAX_PAGE, MultiQueryOptions, OrderDirection, SingleQueryOptions};
pub use selection::{IntoSelection, Selected, Selection};
pub use services::{FetchConfig, GraphClient};
pub use value::{FieldValue, FromFieldValue, FromRecord, Record};

pub use bigdecimal::BigDecimal;
pub use num_bigint::BigInt;
pub use serde_json;
