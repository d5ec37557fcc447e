//! Typed clients generated by the build script from a fixed schema.
//!
//! Building this crate compiles the generated modules against
//! `graphgen-core`; its tests call the generated fetch functions.

include!(concat!(env!("OUT_DIR"), "/generated.rs"));
