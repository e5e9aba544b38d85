//! Page assembly and output-tree writing
//!
//! Combines the built containers into full pages and writes the view's
//! static tree: `index.html`, the paginated post index, and one page per
//! post. The whole tree is regenerated on every call; with unchanged inputs
//! the output is byte-identical.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::ConfigSources;
use crate::error::RenderError;
use crate::head::{HeadMeta, parse_head_config, render_head};
use crate::layout::{ContainerName, Layout, parse_layout};
use crate::lines::{escape_attr, escape_html_text};
use crate::model::{Diagnostic, Post, RenderReport, View};
use crate::paginate::{
    format_publish_date, page_file_name, paginate, render_index_page, sort_posts,
};
use crate::providers::{PostProvider, ThemeProvider, WidgetProvider};
use crate::section::{
    SectionContext, build_section, parse_section_directives, render_directives,
    substitute_into_template,
};

pub struct AssembleInputs<'a> {
    pub view: &'a View,
    pub sources: &'a ConfigSources,
    pub theme: &'a dyn ThemeProvider,
    pub posts: &'a dyn PostProvider,
    pub widgets: &'a dyn WidgetProvider,
    pub repo_assets: Option<&'a Path>,
}

pub fn assemble_view(inputs: &AssembleInputs<'_>) -> Result<RenderReport> {
    let view = inputs.view;
    let mut report = RenderReport::default();

    let layout_text = inputs
        .sources
        .read("layout.txt")?
        .ok_or_else(|| RenderError::MissingLayoutFile(inputs.sources.primary().join("layout.txt")))?;
    let layout = parse_layout(&layout_text).map_err(RenderError::from)?;

    let head_meta = match inputs.sources.read("head.txt")? {
        Some(contents) => parse_head_config(&contents, &mut report.diagnostics),
        None => HeadMeta::default(),
    };

    let mut posts = inputs
        .posts
        .all_posts(view)
        .context("post provider failed")?;
    sort_posts(&mut posts);

    let ranges = paginate(posts.len(), view.config.page_size);
    let known_targets = known_targets(&layout, &posts, ranges.len() as u32);

    let ctx = SectionContext {
        view,
        sources: inputs.sources,
        theme: inputs.theme,
        widgets: inputs.widgets,
        known_targets: &known_targets,
        repo_assets: inputs.repo_assets,
    };

    // Build the static containers once; they are shared by every page.
    let mut header_html = String::new();
    let mut footer_html = String::new();
    let mut left_html = String::new();
    let mut right_html = String::new();
    for (section, slot) in [
        (ContainerName::Header, &mut header_html),
        (ContainerName::Footer, &mut footer_html),
        (ContainerName::Left, &mut left_html),
        (ContainerName::Right, &mut right_html),
    ] {
        if !layout.contains(section) {
            continue;
        }
        let built = build_section(&ctx, section, &mut report.diagnostics)?;
        if built.seeded {
            report.seeded.push(section.directive_file());
        }
        *slot = built.html;
    }

    // Directives at the top of main.txt render above the post index.
    let main_lead = match inputs.sources.read(&ContainerName::Main.directive_file())? {
        Some(contents) => {
            let directives = parse_section_directives(&contents);
            render_directives(&ctx, &directives, &mut report.diagnostics)?
        }
        None => String::new(),
    };

    fs::create_dir_all(&view.out_dir)
        .map_err(|err| RenderError::io(&view.out_dir, err))?;

    if layout.contains(ContainerName::Main) {
        let mut first_page = Vec::new();
        for range in &ranges {
            let index_html = render_index_page(&posts, range, view.config.timezone);
            let main_html = substitute_into_template(
                inputs.theme,
                ContainerName::Main,
                &format!("{main_lead}{index_html}"),
            )?;
            let page = compose_page(
                view,
                &layout,
                &render_head(&head_meta, &view.config, None, None),
                &header_html,
                &left_html,
                &main_html,
                &right_html,
                &footer_html,
            );
            let path = view.out_dir.join(page_file_name(range.page_no));
            fs::write(&path, &page).map_err(|err| RenderError::io(&path, err))?;
            if range.page_no == 1 {
                first_page = page.into_bytes();
            }
            report.pages_written += 1;
        }

        // The front page shows page 1, and post_index.html stays a byte-copy
        // of page1.html for older automation.
        for name in ["index.html", "post_index.html"] {
            let path = view.out_dir.join(name);
            fs::write(&path, &first_page).map_err(|err| RenderError::io(&path, err))?;
        }

        let posts_dir = view.out_dir.join("posts");
        fs::create_dir_all(&posts_dir).map_err(|err| RenderError::io(&posts_dir, err))?;
        for post in &posts {
            let article = render_post_article(post, view);
            let main_html =
                substitute_into_template(inputs.theme, ContainerName::Main, &article)?;
            let page = compose_page(
                view,
                &layout,
                &render_head(&head_meta, &view.config, Some(&post.title), Some("../")),
                &header_html,
                &left_html,
                &main_html,
                &right_html,
                &footer_html,
            );
            let path = posts_dir.join(format!("{}.html", post.slug));
            fs::write(&path, &page).map_err(|err| RenderError::io(&path, err))?;
            report.posts_written += 1;
        }
    } else {
        // No main container: the front page is just the declared chrome.
        let page = compose_page(
            view,
            &layout,
            &render_head(&head_meta, &view.config, None, None),
            &header_html,
            &left_html,
            "",
            &right_html,
            &footer_html,
        );
        let path = view.out_dir.join("index.html");
        fs::write(&path, &page).map_err(|err| RenderError::io(&path, err))?;
    }

    Ok(report)
}

fn known_targets(layout: &Layout, posts: &[Post], total_pages: u32) -> BTreeSet<String> {
    let mut targets = BTreeSet::new();
    targets.insert("index.html".to_string());
    if layout.contains(ContainerName::Main) {
        targets.insert("post_index.html".to_string());
        for page_no in 1..=total_pages {
            targets.insert(page_file_name(page_no));
        }
        for post in posts {
            targets.insert(format!("posts/{}.html", post.slug));
        }
    }
    targets
}

fn render_post_article(post: &Post, view: &View) -> String {
    let mut out = String::new();
    out.push_str("<article class=\"post\">\n");
    out.push_str(&format!("<h1>{}</h1>\n", escape_html_text(&post.title)));
    out.push_str(&format!(
        "<time>{}</time>\n",
        escape_html_text(&format_publish_date(post.published, view.config.timezone))
    ));
    out.push_str(&post.body_html);
    if !post.body_html.ends_with('\n') {
        out.push('\n');
    }
    if !post.tags.is_empty() {
        out.push_str("<ul class=\"post-tags\">");
        for tag in &post.tags {
            out.push_str(&format!("<li>{}</li>", escape_html_text(tag)));
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</article>\n");
    out
}

#[allow(clippy::too_many_arguments)]
fn compose_page(
    view: &View,
    layout: &Layout,
    head: &str,
    header: &str,
    left: &str,
    main: &str,
    right: &str,
    footer: &str,
) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n");
    out.push_str(&format!(
        "<html lang=\"{}\">\n",
        escape_attr(&view.config.language)
    ));
    out.push_str(head);
    out.push_str("<body>\n");
    out.push_str(header);
    if layout.has_row() {
        out.push_str("<div class=\"view-row\" style=\"display: flex\">\n");
        for section in [ContainerName::Left, ContainerName::Main, ContainerName::Right] {
            if !layout.contains(section) {
                continue;
            }
            let html = match section {
                ContainerName::Left => left,
                ContainerName::Main => main,
                ContainerName::Right => right,
                _ => unreachable!(),
            };
            out.push_str(&column_markup(layout, section, html));
        }
        out.push_str("</div>\n");
    }
    out.push_str(footer);
    out.push_str("</body>\n</html>\n");
    out
}

fn column_markup(layout: &Layout, section: ContainerName, html: &str) -> String {
    let style = match layout.params(section) {
        Some(width) => format!("flex: 0 0 {}", width),
        None if section == ContainerName::Main => "flex: 1".to_string(),
        None => "flex: 0 0 auto".to_string(),
    };
    format!(
        "<div class=\"view-col view-col-{}\" style=\"{}\">\n{}</div>\n",
        section.as_str(),
        escape_attr(&style),
        html
    )
}
