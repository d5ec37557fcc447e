//! Port trait for the GraphQL transport.
//!
//! Implementations (e.g. `graphgen-http`) perform one POST per call and
//! return the decoded response envelope. They never retry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TransportResult;

/// Request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlRequest {
    pub query: String,
}

impl GraphqlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// One entry of the `errors` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

/// Response envelope: `{ data: { <key>: <object|array> }, errors?: [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
    #[serde(default)]
    pub errors: Option<Vec<GraphqlError>>,
}

impl ResponseEnvelope {
    /// First reported error, if the error list is non-empty.
    pub fn first_error(&self) -> Option<&GraphqlError> {
        self.errors.as_ref().and_then(|errors| errors.first())
    }

    pub fn error_count(&self) -> usize {
        self.errors.as_ref().map_or(0, Vec::len)
    }

    /// Value under the first (and only) top-level data key.
    pub fn into_sole_payload(self) -> Option<Value> {
        self.data
            .and_then(|data| data.into_iter().next())
            .map(|(_, value)| value)
    }
}

/// Port trait for sending GraphQL requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST one request to `url`.
    async fn post(&self, url: &str, request: &GraphqlRequest) -> TransportResult<ResponseEnvelope>;
}
