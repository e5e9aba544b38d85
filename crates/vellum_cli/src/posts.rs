//! Directory-backed post provider
//!
//! Posts live under `<view>/posts/`: a `<slug>.html` body (produced by the
//! authoring pipeline) with a `<slug>.meta` sidecar holding `key: value`
//! metadata. Posts without a publish datetime are drafts and are skipped.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDateTime, TimeZone, Utc};
use walkdir::WalkDir;

use vellum_core::model::{Post, View};
use vellum_core::providers::PostProvider;

#[derive(Debug, Clone, Copy, Default)]
pub struct FilePostProvider;

#[derive(Debug, Default)]
struct PostMeta {
    title: Option<String>,
    published: Option<i64>,
    blurb: Option<String>,
    tags: Vec<String>,
}

impl PostProvider for FilePostProvider {
    fn all_posts(&self, view: &View) -> Result<Vec<Post>> {
        let posts_dir = view.root.join("posts");
        if !posts_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut meta_paths: Vec<_> = WalkDir::new(&posts_dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "meta")
            })
            .map(|entry| entry.into_path())
            .collect();
        // stable collection order: it is the pagination tie-break
        meta_paths.sort();

        let mut posts = Vec::new();
        for meta_path in meta_paths {
            let slug = meta_path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string)
                .with_context(|| format!("bad post file name {}", meta_path.display()))?;
            let meta_text = fs::read_to_string(&meta_path)
                .with_context(|| format!("failed to read {}", meta_path.display()))?;
            let meta = parse_post_meta(&meta_text)
                .with_context(|| format!("invalid post metadata in {}", meta_path.display()))?;

            let Some(published) = meta.published else {
                continue; // draft
            };

            let body_path = meta_path.with_extension("html");
            let body_html = read_body(&body_path)?;
            posts.push(Post {
                title: meta.title.unwrap_or_else(|| slug.clone()),
                slug,
                published,
                body_html,
                blurb: meta.blurb.unwrap_or_default(),
                tags: meta.tags,
            });
        }
        Ok(posts)
    }
}

fn read_body(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read post body {}", path.display()))
}

fn parse_post_meta(input: &str) -> Result<PostMeta> {
    let mut meta = PostMeta::default();
    for raw_line in input.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line
            .split_once(':')
            .with_context(|| format!("invalid metadata line: {line}"))?;
        let key = key.trim();
        let value = value.trim();
        match key {
            "title" => meta.title = non_empty(value),
            "published" => meta.published = parse_datetime(value)?,
            "blurb" => meta.blurb = non_empty(value),
            "tags" => {
                meta.tags = value
                    .split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            _ => bail!("unknown metadata key: {key}"),
        }
    }
    Ok(meta)
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_datetime(value: &str) -> Result<Option<i64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let parsed = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M")
        .with_context(|| format!("invalid datetime '{trimmed}', expected YYYY-MM-DD HH:MM"))?;
    Ok(Some(Utc.from_utc_datetime(&parsed).timestamp()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vellum_core::config::ViewConfig;

    fn view_with_posts(entries: &[(&str, &str, &str)]) -> (TempDir, View) {
        let temp = TempDir::new().expect("tempdir");
        let root = temp.path().to_path_buf();
        let posts_dir = root.join("posts");
        fs::create_dir_all(&posts_dir).expect("create posts dir");
        for (slug, meta, body) in entries {
            fs::write(posts_dir.join(format!("{slug}.meta")), meta).expect("write meta");
            fs::write(posts_dir.join(format!("{slug}.html")), body).expect("write body");
        }
        let view = View {
            name: "demo".to_string(),
            out_dir: root.join("out"),
            root,
            config: ViewConfig::default(),
        };
        (temp, view)
    }

    #[test]
    fn reads_published_posts() {
        let (_temp, view) = view_with_posts(&[(
            "hello",
            "title: Hello\npublished: 2024-01-03 04:05\ntags: a, b\nblurb: First\n",
            "<p>Hi</p>",
        )]);
        let posts = FilePostProvider.all_posts(&view).expect("should load");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "hello");
        assert_eq!(posts[0].title, "Hello");
        assert_eq!(posts[0].tags, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(posts[0].body_html, "<p>Hi</p>");
        assert!(posts[0].published > 0);
    }

    #[test]
    fn drafts_without_publish_date_are_skipped() {
        let (_temp, view) = view_with_posts(&[
            ("draft", "title: Draft\n", "<p>wip</p>"),
            (
                "live",
                "title: Live\npublished: 2024-01-03 04:05\n",
                "<p>out</p>",
            ),
        ]);
        let posts = FilePostProvider.all_posts(&view).expect("should load");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "live");
    }

    #[test]
    fn title_falls_back_to_slug() {
        let (_temp, view) =
            view_with_posts(&[("untitled", "published: 2024-01-03 04:05\n", "<p>x</p>")]);
        let posts = FilePostProvider.all_posts(&view).expect("should load");
        assert_eq!(posts[0].title, "untitled");
    }

    #[test]
    fn unknown_metadata_key_is_an_error() {
        let (_temp, view) =
            view_with_posts(&[("odd", "wibble: yes\npublished: 2024-01-03 04:05\n", "")]);
        let err = FilePostProvider.all_posts(&view).expect_err("expected error");
        assert!(format!("{err:#}").contains("wibble"));
    }

    #[test]
    fn invalid_datetime_is_an_error() {
        let (_temp, view) = view_with_posts(&[("odd", "published: tomorrow\n", "")]);
        let err = FilePostProvider.all_posts(&view).expect_err("expected error");
        assert!(format!("{err:#}").contains("tomorrow"));
    }

    #[test]
    fn missing_posts_dir_yields_empty_collection() {
        let temp = TempDir::new().expect("tempdir");
        let view = View {
            name: "demo".to_string(),
            root: temp.path().to_path_buf(),
            out_dir: temp.path().join("out"),
            config: ViewConfig::default(),
        };
        let posts = FilePostProvider.all_posts(&view).expect("should load");
        assert!(posts.is_empty());
    }
}
