//! Generates the fixture clients into `OUT_DIR/generated`.

use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use graphgen_codegen::{CodegenConfig, Generator, OutputWriter};

mod schema;

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=schema.rs");

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let generated = out_dir.join("generated");

    let generation = Generator::new(CodegenConfig::default()).generate(&schema::token_schema())?;
    let writer = OutputWriter::new(&generated);
    writer.purge()?;
    writer.write(&generation.files)?;

    // `mod.rs` keeps nested `pub mod` lookups inside the generated directory.
    let index = generated.join("mod.rs").display().to_string();
    fs::write(
        out_dir.join("generated.rs"),
        format!("#[path = {index:?}]\npub mod generated;\n"),
    )?;
    Ok(())
}
