//! Schema to source generation.
//!
//! The generator builds an [`EntityContext`] per target type, lets the
//! [`SegmentRegistry`] emit its items, and renders one module per entity
//! plus a `mod.rs` index. Output is deterministic: the same schema and
//! configuration always produce byte-identical files.

use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;

use proc_macro2::TokenStream;
use quote::quote;
use tracing::{debug, info, instrument, warn};

use graphgen_core::error::SchemaError;
use graphgen_core::mapper::TypeMapper;
use graphgen_core::models::Schema;

use crate::context::EntityContext;
use crate::error::{CodegenError, CodegenResult};
use crate::naming;
use crate::registry::{SegmentRegistry, compute_checksum};

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// @generated by graphgen. Do not edit.";

/// File stem of the module index.
const INDEX_FILE: &str = "mod";

/// Default runtime crate path referenced by generated code.
pub const DEFAULT_RUNTIME_CRATE: &str = "graphgen_core";

/// Generation options.
#[derive(Debug, Clone)]
pub struct CodegenConfig {
    /// Path of the runtime crate, e.g. `graphgen_core` or `crate::runtime`.
    pub runtime_crate: String,
    /// Entities to generate. Empty means every entity of the schema.
    pub entities: Vec<String>,
    /// Skip failing entities instead of aborting the whole run.
    pub keep_going: bool,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
            entities: Vec::new(),
            keep_going: false,
        }
    }
}

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the output directory.
    pub path: PathBuf,
    pub contents: String,
}

/// Outcome of a generation run.
#[derive(Debug, Default)]
pub struct Generation {
    /// Entity modules followed by `mod.rs`.
    pub files: Vec<GeneratedFile>,
    /// Entities left out, with the reason.
    pub skipped: Vec<(String, CodegenError)>,
}

impl Generation {
    /// Number of generated entity modules.
    pub fn module_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }
}

/// Generates typed client modules from a schema.
pub struct Generator {
    mapper: TypeMapper,
    segments: SegmentRegistry,
    config: CodegenConfig,
}

impl Generator {
    pub fn new(config: CodegenConfig) -> Self {
        Self {
            mapper: TypeMapper::new(),
            segments: SegmentRegistry::with_defaults(),
            config,
        }
    }

    /// Replace the type mapper, e.g. to register custom scalars.
    pub fn with_mapper(mut self, mapper: TypeMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Replace the segment registry.
    pub fn with_segments(mut self, segments: SegmentRegistry) -> Self {
        self.segments = segments;
        self
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Generate every target module.
    #[instrument(skip_all, fields(entities = self.config.entities.len()))]
    pub fn generate(&self, schema: &Schema) -> CodegenResult<Generation> {
        let runtime = runtime_path(&self.config.runtime_crate)?;
        let roots = self.roots(schema)?;
        info!("🧬 Generating from {} root entities", roots.len());

        let (mut contexts, mut failed) = self.build_contexts(schema, roots, &runtime)?;
        skip_dependents(&mut contexts, &mut failed);

        // The index owns `mod.rs`.
        let mut modules = BTreeMap::from([(INDEX_FILE.to_string(), "mod.rs".to_string())]);
        let mut files = Vec::with_capacity(contexts.len() + 1);
        for (name, ctx) in &contexts {
            let module = naming::module_file(&ctx.module);
            if let Some(first) = modules.insert(module.clone(), name.clone()) {
                return Err(CodegenError::IdentCollision {
                    scope: "modules".to_string(),
                    ident: module,
                    first,
                    second: name.clone(),
                });
            }

            let name_doc = format!(" Typed client for the `{name}` type.");
            let items = self.segments.emit(ctx)?;
            let contents = render(
                &module,
                quote! {
                    #![doc = #name_doc]
                    #items
                },
            )?;
            debug!(entity = %name, module = %module, "Module emitted");
            files.push(GeneratedFile {
                path: PathBuf::from(format!("{module}.rs")),
                contents,
            });
        }

        files.push(GeneratedFile {
            path: PathBuf::from(format!("{INDEX_FILE}.rs")),
            contents: render(INDEX_FILE, index(&contexts, &runtime))?,
        });

        let skipped: Vec<_> = failed.into_iter().collect();
        for (name, err) in &skipped {
            warn!(entity = %name, error = %err, "Entity skipped");
        }
        info!("✅ Generated {} modules, {} skipped", contexts.len(), skipped.len());

        Ok(Generation { files, skipped })
    }

    /// Entities the run starts from.
    fn roots(&self, schema: &Schema) -> CodegenResult<Vec<String>> {
        if self.config.entities.is_empty() {
            return Ok(schema.entity_names().into_iter().map(str::to_string).collect());
        }
        self.config
            .entities
            .iter()
            .map(|name| {
                if schema.entity(name).is_none() {
                    return Err(CodegenError::from(SchemaError::EntityNotFound(name.clone())));
                }
                if schema.filter_for(name).is_none() {
                    return Err(CodegenError::from(SchemaError::MissingFilter(name.clone())));
                }
                Ok(name.clone())
            })
            .collect()
    }

    /// Build contexts for the roots and every type they reference.
    fn build_contexts(
        &self,
        schema: &Schema,
        roots: Vec<String>,
        runtime: &TokenStream,
    ) -> CodegenResult<(BTreeMap<String, EntityContext>, BTreeMap<String, CodegenError>)> {
        let mut contexts = BTreeMap::new();
        let mut failed = BTreeMap::new();
        let mut queue: VecDeque<String> = roots.into();

        while let Some(name) = queue.pop_front() {
            if contexts.contains_key(&name) || failed.contains_key(&name) {
                continue;
            }
            match EntityContext::build(schema, &self.mapper, &name, runtime) {
                Ok(ctx) => {
                    queue.extend(ctx.references());
                    contexts.insert(name, ctx);
                }
                Err(err) if self.config.keep_going => {
                    warn!(entity = %name, error = %err, "Entity failed to map");
                    failed.insert(name, err);
                }
                Err(err) => return Err(err),
            }
        }

        Ok((contexts, failed))
    }
}

/// Drop entities that reference a failed one, until nothing changes.
fn skip_dependents(
    contexts: &mut BTreeMap<String, EntityContext>,
    failed: &mut BTreeMap<String, CodegenError>,
) {
    loop {
        let broken: Vec<(String, String)> = contexts
            .iter()
            .filter_map(|(name, ctx)| {
                ctx.references()
                    .into_iter()
                    .find(|dependency| failed.contains_key(dependency))
                    .map(|dependency| (name.clone(), dependency))
            })
            .collect();
        if broken.is_empty() {
            return;
        }
        for (entity, dependency) in broken {
            contexts.remove(&entity);
            failed.insert(
                entity.clone(),
                CodegenError::DependencySkipped { entity, dependency },
            );
        }
    }
}

/// `mod.rs`: module declarations and runtime re-exports.
fn index(contexts: &BTreeMap<String, EntityContext>, runtime: &TokenStream) -> TokenStream {
    let modules: BTreeMap<_, _> = contexts
        .values()
        .map(|ctx| (naming::module_file(&ctx.module), &ctx.module))
        .collect();
    let modules = modules.values();

    quote! {
        #![doc = " Typed GraphQL clients."]

        #( pub mod #modules; )*

        pub use #runtime::{
            BlockPin, FetchError, FetchResult, GraphClient, MAX_PAGE, MultiQueryOptions,
            OrderDirection, SingleQueryOptions,
        };
    }
}

/// Parse, pretty-print and stamp a module.
fn render(module: &str, tokens: TokenStream) -> CodegenResult<String> {
    let file: syn::File = syn::parse2(tokens).map_err(|err| CodegenError::InvalidOutput {
        module: module.to_string(),
        message: err.to_string(),
    })?;
    let body = prettyplease::unparse(&file);
    Ok(format!(
        "{GENERATED_HEADER}\n// checksum: {}\n\n{body}",
        compute_checksum(&body)
    ))
}

/// Runtime crate path as tokens; bare crate names become absolute.
fn runtime_path(runtime: &str) -> CodegenResult<TokenStream> {
    let invalid = |message: String| CodegenError::InvalidOutput {
        module: "runtime".to_string(),
        message,
    };
    let path: syn::Path = syn::parse_str(runtime).map_err(|err| invalid(err.to_string()))?;
    if path.leading_colon.is_none() && path.segments.len() == 1 {
        let name = &path.segments[0].ident;
        if name != "crate" && name != "self" && name != "super" {
            return Ok(quote! { ::#path });
        }
    }
    Ok(quote! { #path })
}
