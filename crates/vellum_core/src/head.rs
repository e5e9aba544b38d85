//! Page head metadata
//!
//! Built from a view's `head.txt` directive file. Unknown keys degrade to a
//! warning so an old head file keeps working against a newer engine.

use serde_json::json;

use crate::config::ViewConfig;
use crate::lines::{escape_attr, escape_html_text, is_comment_or_blank, strip_inline_comment};
use crate::model::Diagnostic;

const BOOTSTRAP_CSS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";
const BOOTSTRAP_JS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/js/bootstrap.bundle.min.js";
const HIGHLIGHT_CSS: &str =
    "https://cdn.jsdelivr.net/gh/highlightjs/cdn-release@11/build/styles/default.min.css";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadMeta {
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub author: Option<String>,
    pub robots: String,
    pub viewport: String,
    pub bootstrap: bool,
    pub highlight: bool,
    pub social_image: Option<String>,
    pub social_twitter: Option<String>,
}

impl Default for HeadMeta {
    fn default() -> Self {
        Self {
            description: None,
            keywords: None,
            author: None,
            robots: "index, follow".to_string(),
            viewport: "width=device-width, initial-scale=1".to_string(),
            bootstrap: true,
            highlight: true,
            social_image: None,
            social_twitter: None,
        }
    }
}

pub fn parse_head_config(input: &str, diagnostics: &mut Vec<Diagnostic>) -> HeadMeta {
    let mut meta = HeadMeta::default();
    for raw_line in input.lines() {
        if is_comment_or_blank(raw_line) {
            continue;
        }
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let (key, rest) = match line.split_once(char::is_whitespace) {
            Some((key, rest)) => (key, rest.trim()),
            None => (line, ""),
        };
        match key {
            "description" => meta.description = some_if_present(rest),
            "keywords" => meta.keywords = some_if_present(rest),
            "author" => meta.author = some_if_present(rest),
            "robots" => {
                if !rest.is_empty() {
                    meta.robots = rest.to_string();
                }
            }
            "viewport" => {
                if !rest.is_empty() {
                    meta.viewport = rest.to_string();
                }
            }
            "bootstrap" => meta.bootstrap = parse_switch(rest, true, key, diagnostics),
            "highlight" => meta.highlight = parse_switch(rest, true, key, diagnostics),
            "social.image" => meta.social_image = some_if_present(rest),
            "social.twitter" => meta.social_twitter = some_if_present(rest),
            _ => diagnostics.push(Diagnostic::warning(
                Some("head"),
                format!("unknown head directive key: {key}"),
            )),
        }
    }
    meta
}

fn some_if_present(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_switch(
    value: &str,
    default: bool,
    key: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> bool {
    match value {
        "on" => true,
        "off" => false,
        _ => {
            diagnostics.push(Diagnostic::warning(
                Some("head"),
                format!("{key} expects 'on' or 'off', got '{value}'"),
            ));
            default
        }
    }
}

/// Renders the full `<head>` element for a page. `base_href` is set for
/// pages written below the output root (the `posts/` tree) so their relative
/// links resolve against the root.
pub fn render_head(
    meta: &HeadMeta,
    config: &ViewConfig,
    page_title: Option<&str>,
    base_href: Option<&str>,
) -> String {
    let title = match page_title {
        Some(page_title) => format!("{} - {}", page_title, config.title),
        None => config.title.clone(),
    };

    let mut out = String::new();
    out.push_str("<head>\n<meta charset=\"utf-8\">\n");
    if let Some(base) = base_href {
        out.push_str(&format!("<base href=\"{}\">\n", escape_attr(base)));
    }
    out.push_str(&format!(
        "<meta name=\"viewport\" content=\"{}\">\n",
        escape_attr(&meta.viewport)
    ));
    out.push_str(&format!(
        "<meta name=\"robots\" content=\"{}\">\n",
        escape_attr(&meta.robots)
    ));
    out.push_str(&format!("<title>{}</title>\n", escape_html_text(&title)));
    if let Some(description) = &meta.description {
        out.push_str(&format!(
            "<meta name=\"description\" content=\"{}\">\n",
            escape_attr(description)
        ));
    }
    if let Some(keywords) = &meta.keywords {
        out.push_str(&format!(
            "<meta name=\"keywords\" content=\"{}\">\n",
            escape_attr(keywords)
        ));
    }
    if let Some(author) = &meta.author {
        out.push_str(&format!(
            "<meta name=\"author\" content=\"{}\">\n",
            escape_attr(author)
        ));
    }

    out.push_str(&format!(
        "<meta property=\"og:title\" content=\"{}\">\n",
        escape_attr(&title)
    ));
    out.push_str("<meta property=\"og:type\" content=\"website\">\n");
    if let Some(description) = &meta.description {
        out.push_str(&format!(
            "<meta property=\"og:description\" content=\"{}\">\n",
            escape_attr(description)
        ));
    }
    if let Some(image) = &meta.social_image {
        out.push_str(&format!(
            "<meta property=\"og:image\" content=\"{}\">\n",
            escape_attr(image)
        ));
        out.push_str("<meta name=\"twitter:card\" content=\"summary_large_image\">\n");
    } else {
        out.push_str("<meta name=\"twitter:card\" content=\"summary\">\n");
    }
    if let Some(handle) = &meta.social_twitter {
        out.push_str(&format!(
            "<meta name=\"twitter:site\" content=\"{}\">\n",
            escape_attr(handle)
        ));
    }

    if meta.bootstrap {
        out.push_str(&format!(
            "<link rel=\"stylesheet\" href=\"{BOOTSTRAP_CSS}\">\n"
        ));
        out.push_str(&format!("<script defer src=\"{BOOTSTRAP_JS}\"></script>\n"));
    }
    if meta.highlight {
        out.push_str(&format!(
            "<link rel=\"stylesheet\" href=\"{HIGHLIGHT_CSS}\">\n"
        ));
    }

    let mut ld = json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "name": config.title,
    });
    if let Some(base_url) = &config.base_url {
        ld["url"] = json!(base_url);
    }
    out.push_str(&format!(
        "<script type=\"application/ld+json\">{}</script>\n",
        ld
    ));

    out.push_str("</head>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ViewConfig {
        ViewConfig {
            title: "My Notes".to_string(),
            base_url: Some("https://example.com/".to_string()),
            ..ViewConfig::default()
        }
    }

    #[test]
    fn defaults_apply_for_empty_file() {
        let mut diagnostics = Vec::new();
        let meta = parse_head_config("", &mut diagnostics);
        assert_eq!(meta, HeadMeta::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn directives_override_defaults() {
        let mut diagnostics = Vec::new();
        let meta = parse_head_config(
            "description A quiet corner\nrobots noindex\nbootstrap off\nsocial.image cover.png\n",
            &mut diagnostics,
        );
        assert_eq!(meta.description.as_deref(), Some("A quiet corner"));
        assert_eq!(meta.robots, "noindex");
        assert!(!meta.bootstrap);
        assert_eq!(meta.social_image.as_deref(), Some("cover.png"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn unknown_key_warns_but_does_not_fail() {
        let mut diagnostics = Vec::new();
        parse_head_config("favicon icon.png\n", &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("favicon"));
    }

    #[test]
    fn bad_switch_value_warns_and_keeps_default() {
        let mut diagnostics = Vec::new();
        let meta = parse_head_config("bootstrap maybe\n", &mut diagnostics);
        assert!(meta.bootstrap);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn rendered_head_carries_metadata() {
        let mut diagnostics = Vec::new();
        let meta = parse_head_config(
            "description Notes & things\nsocial.image cover.png\n",
            &mut diagnostics,
        );
        let html = render_head(&meta, &config(), Some("Archive"), None);
        assert!(html.contains("<meta charset=\"utf-8\">"));
        assert!(!html.contains("<base"));
        assert!(html.contains("<title>Archive - My Notes</title>"));
        assert!(html.contains("content=\"Notes &amp; things\""));
        assert!(html.contains("og:image"));
        assert!(html.contains("summary_large_image"));
        assert!(html.contains("bootstrap.min.css"));
        assert!(html.contains("application/ld+json"));
        assert!(html.contains("https://example.com/"));
    }

    #[test]
    fn bootstrap_off_drops_the_cdn_links() {
        let mut diagnostics = Vec::new();
        let meta = parse_head_config("bootstrap off\nhighlight off\n", &mut diagnostics);
        let html = render_head(&meta, &config(), None, None);
        assert!(!html.contains("bootstrap"));
        assert!(!html.contains("highlight"));
        assert!(html.contains("<title>My Notes</title>"));
    }

    #[test]
    fn base_href_is_emitted_for_nested_pages() {
        let html = render_head(&HeadMeta::default(), &config(), Some("A post"), Some("../"));
        assert!(html.contains("<base href=\"../\">"));
    }
}
