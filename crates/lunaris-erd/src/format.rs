use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Output format of a rendered diagram
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErdFormat {
    #[default]
    Png,
    Pdf,
}

impl ErdFormat {
    /// File extension and Graphviz `-T` argument
    pub fn as_str(self) -> &'static str {
        match self {
            ErdFormat::Png => "png",
            ErdFormat::Pdf => "pdf",
        }
    }

    /// Format named by the extension of `path`, case-insensitively
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::parse(ext)
    }

    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("png") {
            Some(ErdFormat::Png)
        } else if s.eq_ignore_ascii_case("pdf") {
            Some(ErdFormat::Pdf)
        } else {
            None
        }
    }
}

impl std::fmt::Display for ErdFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final path and format for a diagram saved at `path`.
///
/// A `.png` or `.pdf` extension is kept and decides the format. Anything
/// else gets the `fallback` extension appended.
pub fn resolve_output_path(path: &Path, fallback: ErdFormat) -> (PathBuf, ErdFormat) {
    if let Some(format) = ErdFormat::from_path(path) {
        return (path.to_path_buf(), format);
    }
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(fallback.as_str());
    (PathBuf::from(name), fallback)
}
