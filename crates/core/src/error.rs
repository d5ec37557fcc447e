//! Error types for the graphgen runtime and generator.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`SchemaError`] - Schema descriptors the type mapper cannot handle
//! - [`NormalizeError`] - Response values that cannot be normalized
//! - [`TransportError`] - Network/HTTP failures from a transport adapter
//! - [`FetchError`] - Top-level errors returned by fetch operations
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Schema Errors
// =============================================================================

/// Schema mapping and loading errors.
///
/// These are configuration errors: they are raised at generation time and
/// halt code emission for the affected entity.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Scalar type the mapper has no rule for.
    #[error("Unknown scalar type: {0}")]
    UnknownScalar(String),

    /// Named type whose kind cannot be mapped (e.g. unions).
    #[error("Unsupported type {name} of kind {kind}")]
    UnsupportedType {
        /// Schema type name.
        name: String,
        /// Introspection kind.
        kind: String,
    },

    /// Type used in a context it cannot appear in.
    #[error("Type {name} cannot be mapped in {context} context")]
    InvalidContext {
        /// Schema type name.
        name: String,
        /// Mapping context name.
        context: &'static str,
    },

    /// Entity without a companion `<Name>_filter` input type.
    #[error("Missing filter type for entity: {0}")]
    MissingFilter(String),

    /// Requested entity does not exist in the schema.
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// Introspection document could not be interpreted.
    #[error("Introspection error: {0}")]
    Introspection(String),
}

// =============================================================================
// Normalization Errors
// =============================================================================

/// Errors raised while turning raw response JSON into typed values.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Value could not be parsed as an arbitrary-precision integer.
    #[error("Field {field}: invalid BigInt value {value}")]
    InvalidBigInt {
        /// Field name.
        field: String,
        /// Offending raw value.
        value: String,
    },

    /// Value could not be parsed as an arbitrary-precision decimal.
    #[error("Field {field}: invalid BigDecimal value {value}")]
    InvalidBigDecimal {
        /// Field name.
        field: String,
        /// Offending raw value.
        value: String,
    },

    /// Value has a JSON shape the target type cannot accept.
    #[error("Field {field}: expected {expected}")]
    UnexpectedShape {
        /// Field name.
        field: String,
        /// Human description of the expected shape.
        expected: &'static str,
    },

    /// Field required by a full result was not selected or not returned.
    #[error("Field {0} is missing from the response")]
    Missing(String),
}

// =============================================================================
// Transport Errors
// =============================================================================

/// Errors produced by a [`crate::ports::Transport`] implementation.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Request could not be sent or the connection failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Server answered with a non-success status.
    #[error("HTTP status {status} with body: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated if needed).
        body: String,
    },

    /// Response body was not a GraphQL response envelope.
    #[error("Decode error: {0}")]
    Decode(String),
}

// =============================================================================
// Fetch Errors
// =============================================================================

/// Top-level errors returned by single and paginated fetches.
///
/// This is the error type of every generated fetch function.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The response envelope carried GraphQL errors.
    ///
    /// Holds the first reported message verbatim; further errors are dropped.
    #[error("{0}")]
    Query(String),

    /// Transport failure, propagated unchanged.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A returned record could not be normalized.
    #[error("Normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    /// Envelope had no data, or data of the wrong shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Single-record accessor returned `null`.
    #[error("{accessor} with id {id} not found")]
    NotFound {
        /// Accessor queried.
        accessor: String,
        /// Requested identifier.
        id: String,
    },

    /// Last record of a full page carried no value for the ordering field.
    #[error("Cannot paginate: last record has no value for {field}")]
    CursorUnavailable {
        /// Ordering field used as cursor.
        field: String,
    },

    /// Configured page ceiling was reached before the data was exhausted.
    #[error("Page limit of {pages} requests reached")]
    PageLimitExceeded {
        /// Number of pages requested.
        pages: u32,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for normalization.
pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    // Test critique: le message d'erreur GraphQL est exposé tel quel
    #[test]
    fn test_query_error_message_is_verbatim() {
        let err = FetchError::Query("not found".into());
        assert_eq!(err.to_string(), "not found");
    }

    // Test critique: la chaîne de conversion d'erreurs fonctionne
    // Permet d'utiliser ? à travers les couches
    #[test]
    fn test_error_conversion_chain() {
        let transport_err = TransportError::Status {
            status: 502,
            body: "bad gateway".into(),
        };
        let fetch_err: FetchError = transport_err.into();
        assert!(fetch_err.to_string().contains("bad gateway"));

        let normalize_err = NormalizeError::InvalidBigInt {
            field: "balance".into(),
            value: "abc".into(),
        };
        let fetch_err: FetchError = normalize_err.into();
        assert!(fetch_err.to_string().contains("balance"));
    }
}
