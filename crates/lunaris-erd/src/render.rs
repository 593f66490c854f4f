//! Layout and rasterisation

use lunaris_core::{LunarisError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::ErdFormat;

/// Turns DOT text into a finished diagram file
pub trait ErdRenderer {
    /// Render `dot` as `format` into `output`
    fn render(&self, dot: &str, format: ErdFormat, output: &Path) -> Result<()>;
}

/// Renders by running the Graphviz `dot` program.
///
/// The DOT text is piped to stdin, so no intermediate file is written.
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    binary: PathBuf,
}

impl GraphvizRenderer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Find `dot` on `PATH`
    pub fn detect() -> Result<Self> {
        let binary = which::which("dot").map_err(|e| {
            LunarisError::Erd(format!("Graphviz 'dot' was not found on PATH: {}", e))
        })?;
        tracing::debug!(binary = %binary.display(), "found Graphviz");
        Ok(Self::new(binary))
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl ErdRenderer for GraphvizRenderer {
    #[tracing::instrument(skip(self, dot), fields(binary = %self.binary.display()))]
    fn render(&self, dot: &str, format: ErdFormat, output: &Path) -> Result<()> {
        let mut child = Command::new(&self.binary)
            .arg(format!("-T{}", format.as_str()))
            .arg("-o")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                LunarisError::Erd(format!(
                    "Failed to run {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(dot.as_bytes())
                .map_err(|e| LunarisError::Erd(format!("Failed to send graph to Graphviz: {}", e)))?;
        }

        let result = child
            .wait_with_output()
            .map_err(|e| LunarisError::Erd(format!("Graphviz did not finish: {}", e)))?;
        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(LunarisError::Erd(format!(
                "Graphviz failed ({}): {}",
                result.status,
                stderr.trim()
            )));
        }

        tracing::debug!("diagram rendered");
        Ok(())
    }
}
