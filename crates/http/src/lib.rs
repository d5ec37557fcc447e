//! HTTP adapter for graphgen.
//!
//! This crate implements the [`Transport`] port from `graphgen-core`,
//! posting GraphQL requests over HTTP(S) with `reqwest`.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use graphgen_core::GraphClient;
//! use graphgen_graphql::GqlQueryBuilder;
//! use graphgen_http::{HttpTransport, HttpTransportConfig};
//!
//! let transport = HttpTransport::new(HttpTransportConfig::default())?;
//! let client = GraphClient::new(Arc::new(transport), Arc::new(GqlQueryBuilder));
//! let tokens = generated::token::tokens(&client, url, &options, &args).await?;
//! ```
//!
//! [`Transport`]: graphgen_core::ports::Transport

mod client;

pub use client::{HttpTransport, HttpTransportConfig};
