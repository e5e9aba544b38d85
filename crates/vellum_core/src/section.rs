//! Container building
//!
//! Each page container is built from its directive file: every line names a
//! component and an argument, the component resolves through a closed
//! dispatch table, and the rendered fragments are substituted into the
//! theme's per-section HTML skeleton.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pulldown_cmark::{Options, Parser, html};

use crate::banner::{fold_banner_style, parse_banner_config, render_banner};
use crate::config::ConfigSources;
use crate::error::RenderError;
use crate::layout::ContainerName;
use crate::lines::{
    escape_attr, escape_html_text, is_comment_or_blank, strip_inline_comment,
};
use crate::model::{Diagnostic, View};
use crate::navbar::{parse_navbar, render_navbar};
use crate::providers::{ThemeProvider, WidgetProvider};

/// Marker the theme skeleton must carry; the built content replaces it.
pub const CONTENT_MARKER: &str = "<!-- vellum:content -->";

const FRAGMENT_EXTENSIONS: &[&str] = &["md", "html", "txt"];

/// The closed component set. Names outside the table resolve to
/// `Unsupported`, which renders a diagnostic comment instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Text,
    Nav,
    Banner,
    Widget,
    Unsupported,
}

pub fn component_for(name: &str) -> Component {
    const TABLE: &[(&str, Component)] = &[
        ("text", Component::Text),
        ("nav", Component::Nav),
        ("banner", Component::Banner),
        ("widget", Component::Widget),
    ];
    TABLE
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, component)| *component)
        .unwrap_or(Component::Unsupported)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDirective {
    pub component: String,
    pub argument: String,
}

pub fn parse_section_directives(input: &str) -> Vec<SectionDirective> {
    let mut out = Vec::new();
    for raw_line in input.lines() {
        if is_comment_or_blank(raw_line) {
            continue;
        }
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let (component, argument) = match line.split_once(char::is_whitespace) {
            Some((component, argument)) => (component, argument.trim()),
            None => (line, ""),
        };
        out.push(SectionDirective {
            component: component.to_string(),
            argument: argument.to_string(),
        });
    }
    out
}

fn has_real_content(input: &str) -> bool {
    !parse_section_directives(input).is_empty()
}

/// Seeds an empty (or missing) directive file with a starting placeholder so
/// future edits have something to work from. Idempotent; `main` is never
/// seeded because its content is the generated post index. Returns whether a
/// rewrite occurred.
pub fn ensure_seeded(path: &Path, section: ContainerName) -> Result<bool> {
    if section == ContainerName::Main {
        return Ok(false);
    }
    let existing = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(err) => return Err(RenderError::io(path, err).into()),
    };
    if has_real_content(&existing) {
        return Ok(false);
    }
    let mut contents = existing;
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    contents.push_str(&format!("text This is {}...\n", section.as_str()));
    fs::write(path, contents).map_err(|err| RenderError::io(path, err))?;
    Ok(true)
}

pub struct SectionContext<'a> {
    pub view: &'a View,
    pub sources: &'a ConfigSources,
    pub theme: &'a dyn ThemeProvider,
    pub widgets: &'a dyn WidgetProvider,
    /// File names of every page the current render will generate.
    pub known_targets: &'a BTreeSet<String>,
    /// Shared repository-level asset directory, if any.
    pub repo_assets: Option<&'a Path>,
}

#[derive(Debug, Clone)]
pub struct SectionBuild {
    pub html: String,
    pub seeded: bool,
}

/// Builds one container: seed if empty, parse, render each directive, and
/// substitute the result into the theme's section skeleton.
pub fn build_section(
    ctx: &SectionContext<'_>,
    section: ContainerName,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<SectionBuild> {
    let file_name = section.directive_file();
    let primary_path = ctx.sources.primary().join(&file_name);
    let resolved = ctx.sources.resolve(&file_name);

    // Seeding targets the view's own file, and only when that file is the
    // effective source (or no source exists at all).
    let mut seeded = false;
    if resolved.as_deref().is_none_or(|path| path == primary_path) {
        seeded = ensure_seeded(&primary_path, section)?;
    }

    let contents = ctx.sources.read(&file_name)?.unwrap_or_default();
    let directives = parse_section_directives(&contents);
    let body = render_directives(ctx, &directives, diagnostics)?;
    let html = substitute_into_template(ctx.theme, section, &body)?;
    Ok(SectionBuild { html, seeded })
}

pub fn render_directives(
    ctx: &SectionContext<'_>,
    directives: &[SectionDirective],
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<String> {
    let mut out = String::new();
    for directive in directives {
        match component_for(&directive.component) {
            Component::Text => out.push_str(&render_text(ctx, &directive.argument, diagnostics)),
            Component::Nav => out.push_str(&render_nav(ctx, &directive.argument, diagnostics)?),
            Component::Banner => {
                out.push_str(&render_banner_directive(ctx, &directive.argument, diagnostics)?)
            }
            Component::Widget => {
                out.push_str(&render_widgets(ctx, &directive.argument)?);
            }
            Component::Unsupported => {
                diagnostics.push(Diagnostic::warning(
                    None,
                    format!("unsupported directive: {}", directive.component),
                ));
                out.push_str(&format!(
                    "<!-- unsupported directive: {} -->\n",
                    escape_html_text(&directive.component)
                ));
            }
        }
    }
    Ok(out)
}

fn render_text(
    ctx: &SectionContext<'_>,
    argument: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    if let Some(name) = argument.strip_prefix('@') {
        return render_fragment(ctx, name, diagnostics);
    }
    format!("<p class=\"view-text\">{}</p>\n", escape_html_text(argument))
}

fn render_fragment(
    ctx: &SectionContext<'_>,
    name: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    for ext in FRAGMENT_EXTENSIONS {
        let relative = format!("fragments/{name}.{ext}");
        let Some(path) = ctx.sources.resolve(&relative) else {
            continue;
        };
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                diagnostics.push(Diagnostic::warning(
                    Some(relative.as_str()),
                    format!("failed to read fragment: {err}"),
                ));
                continue;
            }
        };
        return match *ext {
            "md" => render_markdown(&contents),
            "html" => contents,
            _ => format!("<p class=\"view-text\">{}</p>\n", escape_html_text(contents.trim_end())),
        };
    }
    diagnostics.push(Diagnostic::warning(
        None,
        format!("text fragment '{name}' not found"),
    ));
    format!("[Missing: {}]", escape_html_text(name))
}

fn render_markdown(input: &str) -> String {
    let parser = Parser::new_ext(input, Options::empty());
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

fn render_nav(
    ctx: &SectionContext<'_>,
    argument: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<String> {
    let file_name = if argument.is_empty() {
        "navbar.txt"
    } else {
        argument
    };
    match ctx.sources.read(file_name)? {
        Some(contents) => {
            let tree = parse_navbar(&contents);
            Ok(render_navbar(&tree, ctx.known_targets, diagnostics))
        }
        None => {
            diagnostics.push(Diagnostic::warning(
                None,
                format!("navbar file '{file_name}' not found"),
            ));
            Ok(format!(
                "<!-- missing navbar: {} -->\n",
                escape_html_text(file_name)
            ))
        }
    }
}

fn render_banner_directive(
    ctx: &SectionContext<'_>,
    argument: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<String> {
    if argument.is_empty() || argument == "svg" {
        let config = ctx.sources.read("banner.txt")?.unwrap_or_default();
        let (events, mut parse_diags) = parse_banner_config(&config);
        diagnostics.append(&mut parse_diags);
        let (style, mut fold_diags) = fold_banner_style(&events);
        diagnostics.append(&mut fold_diags);
        let art = render_banner(
            &style,
            &ctx.view.config.title,
            ctx.view.config.tagline.as_deref().unwrap_or(""),
        );
        return Ok(format!(
            "<div class=\"view-banner\" id=\"view-banner\">\n{}<script>\n{}</script>\n</div>\n",
            art.svg, art.script
        ));
    }
    render_banner_image(ctx, argument, diagnostics)
}

/// Image banners resolve from view-assets first, then repo-assets. A
/// repo-level image is copied into the view's assets on first use so the
/// view remains self-contained, then into the output tree.
fn render_banner_image(
    ctx: &SectionContext<'_>,
    file_name: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<String> {
    let view_assets = ctx.view.assets_dir();
    let view_copy = view_assets.join(file_name);

    let source = if view_copy.is_file() {
        Some(view_copy.clone())
    } else {
        match ctx.repo_assets.map(|dir| dir.join(file_name)) {
            Some(repo_copy) if repo_copy.is_file() => {
                copy_if_changed(&repo_copy, &view_copy)?;
                Some(view_copy.clone())
            }
            _ => None,
        }
    };

    let Some(source) = source else {
        diagnostics.push(Diagnostic::warning(
            None,
            format!("banner image '{file_name}' not found in view or repo assets"),
        ));
        return Ok(format!(
            "<!-- missing banner image: {} -->\n",
            escape_html_text(file_name)
        ));
    };

    let out_copy = ctx.view.out_dir.join("assets").join(file_name);
    copy_if_changed(&source, &out_copy)?;

    Ok(format!(
        "<div class=\"view-banner\"><img class=\"view-banner-img\" src=\"assets/{}\" alt=\"{}\"></div>\n",
        escape_attr(file_name),
        escape_attr(&ctx.view.config.title)
    ))
}

/// Copy that skips byte-identical targets, so reruns keep the output tree
/// untouched.
fn copy_if_changed(source: &Path, target: &Path) -> Result<()> {
    let source_bytes =
        fs::read(source).map_err(|err| RenderError::io(source, err))?;
    if let Ok(existing) = fs::read(target) {
        if blake3::hash(&existing) == blake3::hash(&source_bytes) {
            return Ok(());
        }
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|err| RenderError::io(parent, err))?;
    }
    fs::write(target, source_bytes).map_err(|err| RenderError::io(target, err))?;
    Ok(())
}

fn render_widgets(ctx: &SectionContext<'_>, argument: &str) -> Result<String> {
    let names: Vec<&str> = argument.split_whitespace().collect();
    // Validate every name before any external call.
    for name in &names {
        if !is_valid_widget_name(name) {
            return Err(RenderError::InvalidWidgetName((*name).to_string()).into());
        }
    }
    let mut out = String::new();
    for name in names {
        ctx.widgets
            .generate(name)
            .with_context(|| format!("widget '{name}' failed to generate"))?;
        let card = ctx
            .widgets
            .card(name)
            .with_context(|| format!("widget '{name}' failed to render its card"))?;
        out.push_str(&card);
    }
    Ok(out)
}

fn is_valid_widget_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Substitutes built content into the theme's skeleton for the section.
pub fn substitute_into_template(
    theme: &dyn ThemeProvider,
    section: ContainerName,
    body: &str,
) -> Result<String> {
    let file_name = format!("{}.html", section.as_str());
    let path = theme
        .theme_file(&file_name)
        .map_err(|_| RenderError::TemplateFileMissing(file_name.clone()))?;
    let template =
        fs::read_to_string(&path).map_err(|err| RenderError::io(&path, err))?;
    if !template.contains(CONTENT_MARKER) {
        return Err(RenderError::TemplateMarkerMissing { file: file_name }.into());
    }
    Ok(template.replacen(CONTENT_MARKER, body, 1))
}
