use lunaris_core::{LunarisError, Result, SchemaInspector};
use std::fs;
use std::path::{Path, PathBuf};

use crate::graph::DEFAULT_RANK_DIR;
use crate::{ErdFormat, ErdGraph, ErdRenderer};

/// Builds a diagram from a live schema and saves it.
///
/// Rendering happens inside a scratch directory created next to the
/// destination. Only the finished file is renamed into place; whatever
/// else the renderer leaves behind is removed with the directory.
pub struct ErdGenerator<R> {
    renderer: R,
    rank_dir: String,
}

impl<R: ErdRenderer> ErdGenerator<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            rank_dir: DEFAULT_RANK_DIR.to_string(),
        }
    }

    pub fn with_rank_dir(mut self, rank_dir: impl Into<String>) -> Self {
        self.rank_dir = rank_dir.into();
        self
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Draw every table of `inspector` into `output` as `format`
    #[tracing::instrument(skip(self, inspector), fields(output = %output.display()))]
    pub fn generate<I: SchemaInspector + ?Sized>(
        &self,
        inspector: &I,
        output: &Path,
        format: ErdFormat,
    ) -> Result<PathBuf> {
        let graph = ErdGraph::from_inspector(inspector)?.with_rank_dir(self.rank_dir.clone());
        let dot = graph.to_dot();

        let parent = match output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let file_name = output
            .file_name()
            .ok_or_else(|| LunarisError::Erd(format!("Not a file path: {}", output.display())))?;

        let scratch = tempfile::Builder::new()
            .prefix(".lunaris-erd-")
            .tempdir_in(parent)
            .map_err(|e| {
                LunarisError::Erd(format!("Cannot write to {}: {}", parent.display(), e))
            })?;
        let rendered = scratch.path().join(file_name);

        self.renderer.render(&dot, format, &rendered)?;
        if !rendered.is_file() {
            return Err(LunarisError::Erd(
                "The renderer did not produce an output file".into(),
            ));
        }

        fs::rename(&rendered, output).map_err(|e| {
            LunarisError::Erd(format!(
                "Failed to move diagram to {}: {}",
                output.display(),
                e
            ))
        })?;

        tracing::info!(
            tables = graph.tables.len(),
            relationships = graph.edges.len(),
            %format,
            "ERD saved"
        );
        Ok(output.to_path_buf())
    }
}
