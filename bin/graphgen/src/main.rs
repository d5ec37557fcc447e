//! graphgen - typed Rust clients for subgraph GraphQL APIs.
//!
//! # Usage
//!
//! ```bash
//! # Generate from a saved introspection result
//! graphgen --schema schema.json --out src/generated
//!
//! # Generate from a live endpoint, only Token and what it references
//! graphgen --endpoint https://api.example.com/subgraphs/name/tokens \
//!     --entity Token --out src/generated
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{ArgGroup, Parser};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use graphgen_codegen::{CodegenConfig, Generator, OutputWriter};
use graphgen_core::metrics::init_metrics;
use graphgen_core::ports::SchemaSource;
use graphgen_graphql::{IntrospectionFile, RemoteSchema};
use graphgen_http::{HttpTransport, HttpTransportConfig};

/// graphgen CLI.
#[derive(Parser, Debug)]
#[command(name = "graphgen")]
#[command(about = "Generate typed Rust clients from a subgraph GraphQL schema")]
#[command(version)]
#[command(group(ArgGroup::new("source").required(true).args(["schema", "endpoint"])))]
struct Cli {
    /// Introspection result (JSON) to generate from.
    #[arg(long, env = "GRAPHGEN_SCHEMA")]
    schema: Option<PathBuf>,

    /// GraphQL endpoint to introspect.
    #[arg(long, env = "GRAPHGEN_ENDPOINT")]
    endpoint: Option<String>,

    /// Output directory for generated modules.
    #[arg(long, short = 'o', env = "GRAPHGEN_OUT", default_value = "src/generated")]
    out: PathBuf,

    /// Entity to generate (repeatable). Defaults to every entity.
    #[arg(long = "entity", short = 'e')]
    entities: Vec<String>,

    /// Path of the runtime crate referenced by generated code.
    #[arg(long, env = "GRAPHGEN_RUNTIME_CRATE", default_value = "graphgen_core")]
    runtime_crate: String,

    /// Skip entities that fail to map instead of aborting.
    #[arg(long)]
    keep_going: bool,

    /// Remove previously generated files before writing.
    #[arg(long)]
    clean: bool,

    /// Skip confirmation prompt for --clean.
    #[arg(long, short = 'y')]
    yes: bool,

    /// Bearer token sent with introspection requests.
    #[arg(long, env = "GRAPHGEN_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Extra request header, as `Name: value` (repeatable).
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Request timeout in seconds.
    #[arg(long, env = "GRAPHGEN_TIMEOUT_SECS", default_value = "30")]
    timeout_secs: u64,

    /// Enable JSON log output.
    #[arg(long, env = "JSON_LOGS")]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

/// Parse a `Name: value` header.
fn parse_header(s: &str) -> Result<(String, String), String> {
    match s.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("Invalid header '{}'. Use 'Name: value'.", s)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);
    init_metrics();

    info!("🚀 Starting graphgen");

    // ─────────────────────────────────────────────────────────────────────────
    // 📥 SCHEMA
    // ─────────────────────────────────────────────────────────────────────────
    let source = schema_source(&cli)?;
    debug!(source = %mask_credentials(&source.describe()), "Schema source");

    let schema = source.load().await.context("Failed to load schema")?;
    info!(
        types = schema.types.len(),
        entities = schema.entity_names().len(),
        "📥 Schema loaded"
    );

    // ─────────────────────────────────────────────────────────────────────────
    // 🧬 GENERATION
    // ─────────────────────────────────────────────────────────────────────────
    let config = CodegenConfig {
        runtime_crate: cli.runtime_crate.clone(),
        entities: cli.entities.clone(),
        keep_going: cli.keep_going,
    };
    let generation = Generator::new(config)
        .generate(&schema)
        .context("Failed to generate modules")?;

    for (entity, err) in &generation.skipped {
        warn!("⚠️  Skipped {}: {}", entity, err);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 📝 OUTPUT
    // ─────────────────────────────────────────────────────────────────────────
    let writer = OutputWriter::new(&cli.out);
    if cli.clean && !handle_clean(&writer, cli.yes)? {
        return Ok(());
    }

    let summary = writer
        .write(&generation.files)
        .with_context(|| format!("Failed to write {}", cli.out.display()))?;

    info!("✅ graphgen done");
    info!("   🧬 Modules:   {}", generation.module_count());
    info!("   📝 Written:   {}", summary.written);
    info!("   💤 Unchanged: {}", summary.unchanged);
    if !generation.skipped.is_empty() {
        info!("   ⚠️  Skipped:   {}", generation.skipped.len());
    }

    Ok(())
}

/// Pick the schema source from the CLI.
fn schema_source(cli: &Cli) -> Result<Box<dyn SchemaSource>> {
    if let Some(path) = &cli.schema {
        return Ok(Box::new(IntrospectionFile::new(path)));
    }
    let Some(endpoint) = &cli.endpoint else {
        bail!("Either --schema or --endpoint is required");
    };

    let transport = HttpTransport::new(HttpTransportConfig {
        timeout: Duration::from_secs(cli.timeout_secs),
        bearer_token: cli.token.clone(),
        headers: cli.headers.clone(),
    })
    .context("Failed to build HTTP client")?;

    Ok(Box::new(RemoteSchema::new(Arc::new(transport), endpoint.clone())))
}

/// Initialize tracing subscriber.
fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    }
}

/// Mask credentials embedded in an endpoint URL for logging.
fn mask_credentials(source: &str) -> String {
    match url::Url::parse(source) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("****"));
            }
            url.to_string()
        }
        Err(_) => source.to_string(),
    }
}

/// Handle the --clean flag. Returns `false` when the user cancels.
fn handle_clean(writer: &OutputWriter, skip_confirmation: bool) -> Result<bool> {
    warn!(
        "⚠️  CLEAN MODE: generated files in {} will be removed",
        writer.root().display()
    );
    warn!("   - Hand-written files are preserved");

    if !skip_confirmation {
        print!("\n🔴 Remove previously generated files? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            info!("❌ Clean cancelled");
            return Ok(false);
        }
    }

    let removed = writer.purge().context("Failed to remove generated files")?;
    info!("   🧹 Removed {} generated file(s)", removed);
    Ok(true)
}
