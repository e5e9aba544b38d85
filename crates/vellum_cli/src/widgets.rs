//! Directory-backed widget provider
//!
//! A widget named `links` is backed by `<view>/widgets/links.txt`, a
//! line-oriented list of `Title<2+ spaces>URL` entries rendered as a card.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use vellum_core::lines::{escape_attr, escape_html_text, split_on_double_space};
use vellum_core::providers::WidgetProvider;

#[derive(Debug, Clone)]
pub struct FileWidgetProvider {
    widgets_dir: PathBuf,
}

impl FileWidgetProvider {
    pub fn new(widgets_dir: impl Into<PathBuf>) -> Self {
        Self {
            widgets_dir: widgets_dir.into(),
        }
    }
}

impl WidgetProvider for FileWidgetProvider {
    fn generate(&self, _name: &str) -> Result<()> {
        // Backing files are maintained by hand; nothing to regenerate.
        Ok(())
    }

    fn card(&self, name: &str) -> Result<String> {
        let path = self.widgets_dir.join(format!("{name}.txt"));
        if !path.is_file() {
            bail!("widget '{}' has no backing file at {}", name, path.display());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let mut out = String::new();
        out.push_str(&format!(
            "<div class=\"card widget-card\" data-widget=\"{}\">\n",
            escape_attr(name)
        ));
        out.push_str(&format!(
            "<div class=\"card-header\">{}</div>\n<ul class=\"list-group list-group-flush\">\n",
            escape_html_text(name)
        ));
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match split_on_double_space(line) {
                Some((title, url)) => out.push_str(&format!(
                    "<li class=\"list-group-item\"><a href=\"{}\">{}</a></li>\n",
                    escape_attr(url),
                    escape_html_text(title)
                )),
                None => out.push_str(&format!(
                    "<li class=\"list-group-item\">{}</li>\n",
                    escape_html_text(line)
                )),
            }
        }
        out.push_str("</ul>\n</div>\n");
        Ok(out)
    }
}
