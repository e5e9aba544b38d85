//! Core view and post models

use std::path::PathBuf;

use crate::config::ViewConfig;

/// One independently rendered site instance.
#[derive(Debug, Clone)]
pub struct View {
    pub name: String,
    /// Directory holding the view's manifest, directive files, and assets.
    pub root: PathBuf,
    /// Root of the generated static tree.
    pub out_dir: PathBuf,
    pub config: ViewConfig,
}

impl View {
    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }
}

/// A published post as handed over by the post provider. The body is already
/// rendered HTML; the authoring pipeline that produced it is not our concern.
#[derive(Debug, Clone)]
pub struct Post {
    pub slug: String,
    pub title: String,
    /// Publish time as a UTC epoch timestamp.
    pub published: i64,
    pub body_html: String,
    pub blurb: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Warning,
    Error,
}

/// A non-fatal finding surfaced during a render. Degraded output keeps the
/// build alive; the diagnostic records what degraded and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub source: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(source: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            source: source.map(str::to_string),
            message: message.into(),
        }
    }
}

/// Summary of one `assemble_view` call.
#[derive(Debug, Clone, Default)]
pub struct RenderReport {
    pub pages_written: usize,
    pub posts_written: usize,
    /// Section directive files that received the synthesized placeholder.
    pub seeded: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}
