//! Error types for code generation.

use std::path::PathBuf;

use graphgen_core::error::SchemaError;
use thiserror::Error;

/// Errors raised while emitting or writing generated modules.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema descriptor the mapper cannot handle.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Two schema names map to the same Rust identifier.
    #[error("{scope}: `{first}` and `{second}` both map to `{ident}`")]
    IdentCollision {
        /// Where the collision happens (type or module list).
        scope: String,
        /// Colliding Rust identifier.
        ident: String,
        /// First schema name.
        first: String,
        /// Second schema name.
        second: String,
    },

    /// Emitted tokens do not parse as a Rust file.
    #[error("Generated module {module} is not valid Rust: {message}")]
    InvalidOutput {
        /// Module being emitted.
        module: String,
        /// Parser message.
        message: String,
    },

    /// Entity skipped because a type it references failed.
    #[error("{entity} skipped: referenced type {dependency} failed to generate")]
    DependencySkipped {
        /// Skipped entity.
        entity: String,
        /// Failed dependency.
        dependency: String,
    },

    /// Filesystem failure while writing output.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for code generation.
pub type CodegenResult<T> = Result<T, CodegenError>;
