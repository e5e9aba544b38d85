//! Structural render errors

use std::path::PathBuf;

use thiserror::Error;

use crate::layout::LayoutError;

/// Errors that abort the current render. Everything else degrades into a
/// diagnostic and an inline marker in the artifact.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("layout file not found: {0}")]
    MissingLayoutFile(PathBuf),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("theme template missing: {0}")]
    TemplateFileMissing(String),
    #[error("theme template {file} has no content marker")]
    TemplateMarkerMissing { file: String },
    #[error("invalid widget name: {0}")]
    InvalidWidgetName(String),
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
