//! Navigation bar parsing and rendering
//!
//! A navbar file lists top-level links and dropdown groups. `=Label` opens a
//! dropdown that stays current until the next `=` line; indented lines are
//! its children; `-Title` lines are standalone items. Children and items
//! split on the first run of two-or-more spaces into (title, target).

use std::collections::BTreeSet;

use crate::lines::{escape_attr, escape_html_text, split_on_double_space, strip_inline_comment};
use crate::model::Diagnostic;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub title: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Link(MenuItem),
    Dropdown { label: String, items: Vec<MenuItem> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuTree {
    pub entries: Vec<MenuEntry>,
}

pub fn parse_navbar(input: &str) -> MenuTree {
    let mut entries: Vec<MenuEntry> = Vec::new();
    for raw_line in input.lines() {
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let line = strip_inline_comment(raw_line);
        if let Some(label) = line.strip_prefix('=') {
            entries.push(MenuEntry::Dropdown {
                label: label.trim().to_string(),
                items: Vec::new(),
            });
        } else if line.starts_with(' ') || line.starts_with('\t') {
            let item = parse_item(line.trim_start());
            match entries.last_mut() {
                // a child without an open dropdown degrades to a top-level link
                Some(MenuEntry::Dropdown { items, .. }) => items.push(item),
                _ => entries.push(MenuEntry::Link(item)),
            }
        } else if let Some(rest) = line.strip_prefix('-') {
            entries.push(MenuEntry::Link(parse_item(rest.trim_start())));
        }
        // any other line shape is malformed and skipped
    }
    MenuTree { entries }
}

fn parse_item(text: &str) -> MenuItem {
    match split_on_double_space(text) {
        Some((title, target)) => MenuItem {
            title: title.to_string(),
            target: target.to_string(),
        },
        None => MenuItem {
            title: text.trim().to_string(),
            target: String::new(),
        },
    }
}

/// Renders dropdown-capable navigation markup. Targets without a matching
/// generated page still render as links, with an inline diagnostic comment
/// so the page stays inspectable.
pub fn render_navbar(
    tree: &MenuTree,
    known_targets: &BTreeSet<String>,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    let mut out = String::new();
    out.push_str("<nav class=\"navbar navbar-expand view-nav\">\n<ul class=\"navbar-nav\">\n");
    for entry in &tree.entries {
        match entry {
            MenuEntry::Link(item) => {
                out.push_str("<li class=\"nav-item\">");
                out.push_str(&link_markup(item, known_targets, diagnostics));
                out.push_str("</li>\n");
            }
            MenuEntry::Dropdown { label, items } => {
                out.push_str("<li class=\"nav-item dropdown\">\n");
                out.push_str(&format!(
                    "<a class=\"nav-link dropdown-toggle\" href=\"#\" data-bs-toggle=\"dropdown\">{}</a>\n",
                    escape_html_text(label)
                ));
                out.push_str("<ul class=\"dropdown-menu\">\n");
                for item in items {
                    out.push_str("<li>");
                    out.push_str(&link_markup(item, known_targets, diagnostics));
                    out.push_str("</li>\n");
                }
                out.push_str("</ul>\n</li>\n");
            }
        }
    }
    out.push_str("</ul>\n</nav>\n");
    out
}

fn link_markup(
    item: &MenuItem,
    known_targets: &BTreeSet<String>,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    let mut out = format!(
        "<a class=\"nav-link\" href=\"{}\">{}</a>",
        escape_attr(&item.target),
        escape_html_text(&item.title)
    );
    if item.target.is_empty() || !is_resolvable(&item.target, known_targets) {
        out.push_str(&format!(
            "<!-- missing page: {} -->",
            escape_html_text(if item.target.is_empty() {
                "(no target)"
            } else {
                &item.target
            })
        ));
        diagnostics.push(Diagnostic::warning(
            Some("navbar"),
            format!(
                "navbar entry '{}' points at '{}', which no generated page matches",
                item.title, item.target
            ),
        ));
    }
    out
}

fn is_resolvable(target: &str, known_targets: &BTreeSet<String>) -> bool {
    // External links are never checked against the generated tree.
    if target.starts_with("http://") || target.starts_with("https://") || target.starts_with('/') {
        return true;
    }
    known_targets.contains(target.trim_start_matches("./"))
}
