use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;

use vellum_core::assemble::{AssembleInputs, assemble_view};
use vellum_core::config::{ConfigSources, ViewConfig};
use vellum_core::layout::ContainerName;
use vellum_core::model::{Post, View};
use vellum_core::providers::{DirThemeProvider, PostProvider, WidgetProvider};

struct FixedPosts(Vec<Post>);

impl PostProvider for FixedPosts {
    fn all_posts(&self, _view: &View) -> Result<Vec<Post>> {
        Ok(self.0.clone())
    }
}

struct LinksWidget;

impl WidgetProvider for LinksWidget {
    fn generate(&self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn card(&self, name: &str) -> Result<String> {
        Ok(format!(
            "<div class=\"widget-card\" data-widget=\"{name}\"><ul><li><a href=\"https://example.com/\">Example</a></li></ul></div>\n"
        ))
    }
}

fn make_theme(theme_dir: &PathBuf) {
    fs::create_dir_all(theme_dir).expect("create theme dir");
    for section in ContainerName::ALL {
        fs::write(
            theme_dir.join(format!("{}.html", section.as_str())),
            format!(
                "<div class=\"{}\">\n<!-- vellum:content -->\n</div>\n",
                section.as_str()
            ),
        )
        .expect("write skeleton");
    }
}

fn make_view(root: PathBuf, out_dir: PathBuf, page_size: usize) -> View {
    fs::create_dir_all(&root).expect("create view dir");
    View {
        name: "demo".to_string(),
        root,
        out_dir,
        config: ViewConfig {
            title: "Demo".to_string(),
            page_size,
            ..ViewConfig::default()
        },
    }
}

fn posts(count: usize) -> Vec<Post> {
    (0..count)
        .map(|i| Post {
            slug: format!("post-{i}"),
            title: format!("Post number {i}"),
            published: 10_000 - i as i64,
            body_html: format!("<p>Contents of post {i}</p>"),
            blurb: format!("Blurb {i}"),
            tags: vec!["log".to_string()],
        })
        .collect()
}

fn build(view: &View, theme_dir: &PathBuf, post_list: Vec<Post>) -> Result<vellum_core::model::RenderReport> {
    let sources = ConfigSources::view_over_theme(&view.root, Some(theme_dir.as_path()));
    let theme = DirThemeProvider::new(theme_dir);
    let provider = FixedPosts(post_list);
    let widgets = LinksWidget;
    assemble_view(&AssembleInputs {
        view,
        sources: &sources,
        theme: &theme,
        posts: &provider,
        widgets: &widgets,
        repo_assets: None,
    })
}

#[test]
fn header_main_right_view_with_twelve_posts() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path().to_path_buf();
    let theme_dir = root.join("theme");
    make_theme(&theme_dir);
    let view = make_view(root.join("view"), root.join("out"), 10);
    fs::write(view.root.join("layout.txt"), "header\nmain\nright 20%\n").expect("write layout");
    fs::write(view.root.join("header.txt"), "text Hello\n").expect("write header");
    fs::write(view.root.join("right.txt"), "widget links\n").expect("write right");

    let report = build(&view, &theme_dir, posts(12)).expect("build should succeed");
    assert_eq!(report.pages_written, 2);

    let page1 = fs::read_to_string(view.out_dir.join("page1.html")).expect("page1");
    let page2 = fs::read_to_string(view.out_dir.join("page2.html")).expect("page2");
    assert_eq!(page1.matches("<article class=\"post-entry\">").count(), 10);
    assert_eq!(page2.matches("<article class=\"post-entry\">").count(), 2);

    // the links widget card appears exactly once in the right container
    assert_eq!(page1.matches("data-widget=\"links\"").count(), 1);
    assert!(page1.contains("Hello"));
    assert!(page1.contains("flex: 0 0 20%"));

    // post_index.html resolves to the same content as page1.html
    let post_index = fs::read_to_string(view.out_dir.join("post_index.html")).expect("post_index");
    assert_eq!(page1, post_index);
}

#[test]
fn empty_header_file_is_seeded_exactly_once() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path().to_path_buf();
    let theme_dir = root.join("theme");
    make_theme(&theme_dir);
    let view = make_view(root.join("view"), root.join("out"), 10);
    fs::write(view.root.join("layout.txt"), "header\nmain\n").expect("write layout");
    fs::write(view.root.join("header.txt"), "").expect("write empty header");

    let report = build(&view, &theme_dir, posts(1)).expect("first build");
    assert_eq!(report.seeded, vec!["header.txt".to_string()]);
    let seeded = fs::read_to_string(view.root.join("header.txt")).expect("read header");
    assert_eq!(seeded, "text This is header...\n");

    let report = build(&view, &theme_dir, posts(1)).expect("second build");
    assert!(report.seeded.is_empty());
    let second = fs::read_to_string(view.root.join("header.txt")).expect("read header");
    assert_eq!(seeded, second);
}

#[test]
fn posts_sort_descending_across_page_boundaries() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path().to_path_buf();
    let theme_dir = root.join("theme");
    make_theme(&theme_dir);
    let view = make_view(root.join("view"), root.join("out"), 5);
    fs::write(view.root.join("layout.txt"), "main\n").expect("write layout");

    build(&view, &theme_dir, posts(7)).expect("build should succeed");
    let page1 = fs::read_to_string(view.out_dir.join("page1.html")).expect("page1");
    let page2 = fs::read_to_string(view.out_dir.join("page2.html")).expect("page2");

    // newest five on page 1, in order
    let mut last = 0;
    for i in 0..5 {
        let pos = page1
            .find(&format!("posts/post-{i}.html"))
            .unwrap_or_else(|| panic!("post-{i} should be on page 1"));
        assert!(pos > last || i == 0);
        last = pos;
    }
    assert!(page2.contains("posts/post-5.html"));
    assert!(page2.contains("posts/post-6.html"));
    assert!(!page2.contains("posts/post-4.html"));
}

#[test]
fn theme_defaults_feed_sections_the_view_does_not_override() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path().to_path_buf();
    let theme_dir = root.join("theme");
    make_theme(&theme_dir);
    fs::write(theme_dir.join("footer.txt"), "text Theme footer\n").expect("write theme footer");
    let view = make_view(root.join("view"), root.join("out"), 10);
    fs::write(view.root.join("layout.txt"), "main\nfooter\n").expect("write layout");

    build(&view, &theme_dir, posts(1)).expect("build should succeed");
    let index = fs::read_to_string(view.out_dir.join("index.html")).expect("index");
    assert!(index.contains("Theme footer"));
    // the theme-provided file is the effective source, so nothing is seeded
    assert!(!view.root.join("footer.txt").exists());
}
