//! Entity module emission for graphgen.
//!
//! Every entity of a schema becomes one Rust module assembled from
//! segments. Each segment is self-contained and emits one part of the
//! module:
//!
//! - `types` - `XFilter`, `XResult`, `XPartial`, `XFields`, `XArgs`, `XOrderBy`
//! - `normalize` - field normalization rules and `FromRecord` decoding
//! - `single` - single-record fetch function
//! - `many` - paginated collection fetch function
//!
//! # Adding a Segment
//!
//! ```ignore
//! use graphgen_codegen::{Generator, Segment, SegmentRegistry};
//!
//! let mut segments = SegmentRegistry::with_defaults();
//! segments.register(Box::new(DebugSegment));
//!
//! let generation = Generator::new(CodegenConfig::default())
//!     .with_segments(segments)
//!     .generate(&schema)?;
//! ```
//!
//! # Writing Output
//!
//! ```ignore
//! let writer = OutputWriter::new("src/generated");
//! writer.purge()?;
//! writer.write(&generation.files)?;
//! ```

pub mod context;
pub mod naming;
pub mod segments;

mod error;
mod generator;
mod registry;
mod segment;
mod writer;

pub use context::EntityContext;
pub use error::{CodegenError, CodegenResult};
pub use generator::{
    CodegenConfig, DEFAULT_RUNTIME_CRATE, GENERATED_HEADER, GeneratedFile, Generation, Generator,
};
pub use registry::SegmentRegistry;
pub use segment::Segment;
pub use writer::{OutputWriter, WriteSummary};
