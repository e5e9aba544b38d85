//! View manifest loading and layered directive-file resolution

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono_tz::Tz;
use serde::Deserialize;

/// Directive files a theme may provide defaults for, in materialize order.
pub const DIRECTIVE_FILES: &[&str] = &[
    "layout.txt",
    "header.txt",
    "footer.txt",
    "left.txt",
    "right.txt",
    "main.txt",
    "head.txt",
    "navbar.txt",
    "banner.txt",
];

#[derive(Debug, Deserialize)]
struct ViewConfigRaw {
    name: Option<String>,
    title: Option<String>,
    tagline: Option<String>,
    language: Option<String>,
    timezone: Option<String>,
    page_size: Option<usize>,
    base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub name: String,
    pub title: String,
    pub tagline: Option<String>,
    pub language: String,
    pub timezone: Tz,
    pub page_size: usize,
    pub base_url: Option<String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            name: "view".to_string(),
            title: "Untitled".to_string(),
            tagline: None,
            language: "en".to_string(),
            timezone: Tz::UTC,
            page_size: 10,
            base_url: None,
        }
    }
}

pub fn load_view_config(path: &Path) -> Result<ViewConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read view manifest {}", path.display()))?;
    let parsed: ViewConfigRaw = serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse YAML manifest {}", path.display()))?;

    let title = required_string(parsed.title, "title")?;
    let name = match parsed.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => title.clone(),
    };
    let timezone = match parsed.timezone {
        None => Tz::UTC,
        Some(value) => value
            .parse::<Tz>()
            .map_err(|_| anyhow::anyhow!("unknown timezone: {}", value))?,
    };
    let page_size = parsed.page_size.unwrap_or(10);
    if page_size == 0 {
        bail!("page_size must be > 0");
    }

    Ok(ViewConfig {
        name,
        title,
        tagline: parsed.tagline.and_then(|value| {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() { None } else { Some(trimmed) }
        }),
        language: match parsed.language {
            Some(value) if !value.trim().is_empty() => value,
            _ => "en".to_string(),
        },
        timezone,
        page_size,
        base_url: parsed.base_url,
    })
}

fn required_string(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => bail!("missing required field: {}", field),
    }
}

/// Ordered configuration source chain. Each file name is resolved against the
/// sources in order; the first hit wins. A view directory layered over a
/// theme directory gives per-view overrides with theme defaults underneath.
#[derive(Debug, Clone)]
pub struct ConfigSources {
    layers: Vec<PathBuf>,
}

impl ConfigSources {
    pub fn new(layers: Vec<PathBuf>) -> Self {
        Self { layers }
    }

    pub fn view_over_theme(view_dir: &Path, theme_dir: Option<&Path>) -> Self {
        let mut layers = vec![view_dir.to_path_buf()];
        if let Some(theme_dir) = theme_dir {
            layers.push(theme_dir.to_path_buf());
        }
        Self { layers }
    }

    /// First layer — the view directory, where seeded files are written.
    pub fn primary(&self) -> &Path {
        &self.layers[0]
    }

    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        self.layers
            .iter()
            .map(|layer| layer.join(relative))
            .find(|candidate| candidate.is_file())
    }

    pub fn read(&self, relative: &str) -> Result<Option<String>> {
        match self.resolve(relative) {
            Some(path) => {
                let contents = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                Ok(Some(contents))
            }
            None => Ok(None),
        }
    }
}

/// The explicit copy-on-apply step: theme-default directive files that the
/// view does not yet override are copied into the view directory. Returns the
/// names that were materialized. Idempotent — existing view files are never
/// touched.
pub fn materialize_view_defaults(view_dir: &Path, theme_dir: &Path) -> Result<Vec<String>> {
    let mut copied = Vec::new();
    for name in DIRECTIVE_FILES {
        let target = view_dir.join(name);
        if target.exists() {
            continue;
        }
        let source = theme_dir.join(name);
        if !source.is_file() {
            continue;
        }
        let contents = fs::read(&source)
            .with_context(|| format!("failed to read theme default {}", source.display()))?;
        fs::write(&target, contents)
            .with_context(|| format!("failed to write {}", target.display()))?;
        copied.push((*name).to_string());
    }
    Ok(copied)
}
