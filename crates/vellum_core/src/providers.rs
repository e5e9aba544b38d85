//! Collaborator interfaces consumed by the rendering engine
//!
//! Post authoring, widget generation, and theme storage live outside the
//! engine; it talks to them through these traits.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use walkdir::WalkDir;

use crate::model::{Post, View};

pub trait PostProvider {
    /// All renderable posts of the view. Order is preserved as the tie-break
    /// for equal publish timestamps, so providers should return a stable
    /// collection order.
    fn all_posts(&self, view: &View) -> Result<Vec<Post>>;
}

pub trait WidgetProvider {
    /// Regenerate the widget's backing content.
    fn generate(&self, name: &str) -> Result<()>;
    /// The widget's card markup, embedded verbatim into the section.
    fn card(&self, name: &str) -> Result<String>;
}

pub trait ThemeProvider {
    /// Resolves a theme file by relative path or bare file name. Zero or
    /// more than one match is an error: a theme with two `header.html`
    /// files is ambiguous, not a fallback chain.
    fn theme_file(&self, relative: &str) -> Result<PathBuf>;
}

/// Theme bundle stored as a plain directory tree.
#[derive(Debug, Clone)]
pub struct DirThemeProvider {
    root: PathBuf,
}

impl DirThemeProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ThemeProvider for DirThemeProvider {
    fn theme_file(&self, relative: &str) -> Result<PathBuf> {
        let direct = self.root.join(relative);
        if direct.is_file() {
            return Ok(direct);
        }
        let mut matches: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(&self.root).into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_file()
                && entry.file_name().to_string_lossy() == relative
            {
                matches.push(entry.into_path());
            }
        }
        match matches.len() {
            0 => bail!(
                "theme file '{}' not found under {}",
                relative,
                self.root.display()
            ),
            1 => Ok(matches.remove(0)),
            n => bail!(
                "theme file '{}' is ambiguous: {} matches under {}",
                relative,
                n,
                self.root.display()
            ),
        }
    }
}

/// Placeholder provider for views without a widget collaborator wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWidgets;

impl WidgetProvider for NoWidgets {
    fn generate(&self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn card(&self, name: &str) -> Result<String> {
        bail!("no widget provider configured; cannot render widget '{name}'");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        let path = std::env::temp_dir().join(format!("vellum-theme-{}", Uuid::new_v4()));
        fs::create_dir_all(&path).expect("create temp dir");
        path
    }

    #[test]
    fn direct_relative_path_resolves() {
        let root = temp_dir();
        fs::create_dir_all(root.join("sections")).expect("mkdir");
        fs::write(root.join("sections/header.html"), "<div></div>").expect("write");
        let theme = DirThemeProvider::new(&root);
        let path = theme
            .theme_file("sections/header.html")
            .expect("should resolve");
        assert!(path.ends_with("sections/header.html"));
    }

    #[test]
    fn bare_name_searches_the_tree() {
        let root = temp_dir();
        fs::create_dir_all(root.join("sections")).expect("mkdir");
        fs::write(root.join("sections/footer.html"), "<div></div>").expect("write");
        let theme = DirThemeProvider::new(&root);
        let path = theme.theme_file("footer.html").expect("should resolve");
        assert!(path.ends_with("sections/footer.html"));
    }

    #[test]
    fn zero_matches_is_an_error() {
        let theme = DirThemeProvider::new(temp_dir());
        let err = theme.theme_file("missing.html").expect_err("expected error");
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn multiple_matches_are_ambiguous() {
        let root = temp_dir();
        fs::create_dir_all(root.join("a")).expect("mkdir");
        fs::create_dir_all(root.join("b")).expect("mkdir");
        fs::write(root.join("a/main.html"), "a").expect("write");
        fs::write(root.join("b/main.html"), "b").expect("write");
        let theme = DirThemeProvider::new(&root);
        let err = theme.theme_file("main.html").expect_err("expected error");
        assert!(err.to_string().contains("ambiguous"));
    }
}
