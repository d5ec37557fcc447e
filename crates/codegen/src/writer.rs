//! Output directory management.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{CodegenError, CodegenResult};
use crate::generator::{GENERATED_HEADER, GeneratedFile};

/// Files touched by a write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    /// Files whose contents were already identical.
    pub unchanged: usize,
}

/// Writes generated files below a root directory.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    root: PathBuf,
}

impl OutputWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write files, leaving identical ones untouched.
    pub fn write(&self, files: &[GeneratedFile]) -> CodegenResult<WriteSummary> {
        fs::create_dir_all(&self.root).map_err(io_error(&self.root))?;

        let mut summary = WriteSummary::default();
        for file in files {
            let path = self.root.join(&file.path);
            if let Ok(existing) = fs::read_to_string(&path)
                && existing == file.contents
            {
                debug!(path = %path.display(), "Unchanged");
                summary.unchanged += 1;
                continue;
            }
            fs::write(&path, &file.contents).map_err(io_error(&path))?;
            debug!(path = %path.display(), "Written");
            summary.written += 1;
        }

        info!(
            "📝 {} files written, {} unchanged in {}",
            summary.written,
            summary.unchanged,
            self.root.display()
        );
        Ok(summary)
    }

    /// Remove previously generated files. Hand-written files are kept.
    pub fn purge(&self) -> CodegenResult<usize> {
        if !self.root.is_dir() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in fs::read_dir(&self.root).map_err(io_error(&self.root))? {
            let path = entry.map_err(io_error(&self.root))?.path();
            if path.extension().is_none_or(|ext| ext != "rs") {
                continue;
            }
            let contents = fs::read_to_string(&path).map_err(io_error(&path))?;
            if contents.starts_with(GENERATED_HEADER) {
                fs::remove_file(&path).map_err(io_error(&path))?;
                removed += 1;
            }
        }

        info!("🧹 Removed {} generated files from {}", removed, self.root.display());
        Ok(removed)
    }
}

fn io_error(path: &Path) -> impl Fn(std::io::Error) -> CodegenError + '_ {
    move |source| CodegenError::Io {
        path: path.to_path_buf(),
        source,
    }
}
