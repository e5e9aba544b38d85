//! Post index pagination

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::lines::{escape_attr, escape_html_text};
use crate::model::Post;

/// Newest first. The sort is stable, so posts sharing a publish timestamp
/// keep the provider's collection order and regeneration stays deterministic.
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.published.cmp(&a.published));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub page_no: u32,
    pub total_pages: u32,
    pub start: usize,
    pub end: usize,
}

pub fn total_pages(total_items: usize, page_size: usize) -> u32 {
    if total_items == 0 {
        return 1;
    }
    (total_items.div_ceil(page_size)) as u32
}

pub fn paginate(total_items: usize, page_size: usize) -> Vec<PageRange> {
    let pages = total_pages(total_items, page_size);
    (1..=pages)
        .map(|page_no| {
            let start = (page_no as usize - 1) * page_size;
            let end = (start + page_size).min(total_items);
            PageRange {
                page_no,
                total_pages: pages,
                start,
                end,
            }
        })
        .collect()
}

pub fn page_file_name(page_no: u32) -> String {
    format!("page{page_no}.html")
}

pub fn format_publish_date(timestamp: i64, timezone: Tz) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(utc) => utc
            .with_timezone(&timezone)
            .format("%B %-d, %Y")
            .to_string(),
        None => String::new(),
    }
}

fn iso_date(timestamp: i64, timezone: Tz) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(utc) => utc.with_timezone(&timezone).format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

pub fn render_post_entry(post: &Post, timezone: Tz) -> String {
    let mut out = String::new();
    out.push_str("<article class=\"post-entry\">\n");
    out.push_str(&format!(
        "<h2><a href=\"posts/{}.html\">{}</a></h2>\n",
        escape_attr(&post.slug),
        escape_html_text(&post.title)
    ));
    out.push_str(&format!(
        "<time datetime=\"{}\">{}</time>\n",
        iso_date(post.published, timezone),
        escape_html_text(&format_publish_date(post.published, timezone))
    ));
    if !post.blurb.is_empty() {
        out.push_str(&format!(
            "<p class=\"post-blurb\">{}</p>\n",
            escape_html_text(&post.blurb)
        ));
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

/// One page of the post index: its slice of entries plus the selector bar.
pub fn render_index_page(posts: &[Post], range: &PageRange, timezone: Tz) -> String {
    let mut out = String::new();
    out.push_str("<div class=\"post-index\">\n");
    for post in &posts[range.start..range.end] {
        out.push_str(&render_post_entry(post, timezone));
    }
    out.push_str("</div>\n");
    out.push_str(&render_page_selector(range));
    out
}

fn render_page_selector(range: &PageRange) -> String {
    if range.total_pages <= 1 {
        return String::new();
    }
    let mut out = String::new();
    out.push_str("<nav class=\"page-selector\">\n");
    if range.page_no > 1 {
        out.push_str(&format!(
            "<a class=\"page-link\" href=\"{}\">Newer</a>\n",
            page_file_name(range.page_no - 1)
        ));
    }
    for page_no in 1..=range.total_pages {
        if page_no == range.page_no {
            out.push_str(&format!(
                "<span class=\"page-link current\">{page_no}</span>\n"
            ));
        } else {
            out.push_str(&format!(
                "<a class=\"page-link\" href=\"{}\">{}</a>\n",
                page_file_name(page_no),
                page_no
            ));
        }
    }
    if range.page_no < range.total_pages {
        out.push_str(&format!(
            "<a class=\"page-link\" href=\"{}\">Older</a>\n",
            page_file_name(range.page_no + 1)
        ));
    }
    out.push_str("</nav>\n");
    out
}
