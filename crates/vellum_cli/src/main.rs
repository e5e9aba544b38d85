use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use vellum_cli::posts::FilePostProvider;
use vellum_cli::widgets::FileWidgetProvider;
use vellum_core::assemble::{AssembleInputs, assemble_view};
use vellum_core::banner::{fold_banner_style, parse_banner_config};
use vellum_core::config::{ConfigSources, load_view_config, materialize_view_defaults};
use vellum_core::head::parse_head_config;
use vellum_core::layout::parse_layout;
use vellum_core::model::{Diagnostic, DiagnosticLevel, View};
use vellum_core::navbar::parse_navbar;
use vellum_core::providers::DirThemeProvider;

#[derive(Debug, Parser)]
#[command(name = "vellum")]
#[command(about = "Render a view's static site from its configuration files.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Build a view's output tree.")]
    Build {
        view_dir: PathBuf,
        #[arg(long, value_name = "PATH")]
        theme: PathBuf,
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
        #[arg(long, value_name = "PATH")]
        assets: Option<PathBuf>,
    },
    #[command(about = "Parse a view's configuration and report diagnostics without writing.")]
    Check {
        view_dir: PathBuf,
        #[arg(long, value_name = "PATH")]
        theme: Option<PathBuf>,
    },
    #[command(about = "Copy theme-default directive files into a view.")]
    ApplyTheme {
        view_dir: PathBuf,
        #[arg(long, value_name = "PATH")]
        theme: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Build {
            view_dir,
            theme,
            out,
            assets,
        } => build(&view_dir, &theme, out, assets),
        Command::Check { view_dir, theme } => check(&view_dir, theme.as_deref()),
        Command::ApplyTheme { view_dir, theme } => apply_theme(&view_dir, &theme),
    }
}

fn load_view(view_dir: &Path, out: Option<PathBuf>) -> Result<View> {
    let config = load_view_config(&view_dir.join("view.yaml"))?;
    Ok(View {
        name: config.name.clone(),
        root: view_dir.to_path_buf(),
        out_dir: out.unwrap_or_else(|| view_dir.join("out")),
        config,
    })
}

fn build(
    view_dir: &Path,
    theme_dir: &Path,
    out: Option<PathBuf>,
    assets: Option<PathBuf>,
) -> Result<()> {
    let view = load_view(view_dir, out)?;
    let sources = ConfigSources::view_over_theme(view_dir, Some(theme_dir));
    let theme = DirThemeProvider::new(theme_dir);
    let posts = FilePostProvider;
    let widgets = FileWidgetProvider::new(view_dir.join("widgets"));
    let repo_assets = assets.or_else(|| {
        view_dir
            .parent()
            .map(|parent| parent.join("assets"))
            .filter(|dir| dir.is_dir())
    });

    let report = assemble_view(&AssembleInputs {
        view: &view,
        sources: &sources,
        theme: &theme,
        posts: &posts,
        widgets: &widgets,
        repo_assets: repo_assets.as_deref(),
    })
    .with_context(|| format!("failed to build view {}", view.name))?;

    print_diagnostics(&report.diagnostics);
    for file in &report.seeded {
        println!("seeded {file} with a placeholder directive");
    }
    println!(
        "built {}: {} index page(s), {} post(s) -> {}",
        view.name,
        report.pages_written,
        report.posts_written,
        view.out_dir.display()
    );
    Ok(())
}

fn check(view_dir: &Path, theme_dir: Option<&Path>) -> Result<()> {
    let view = load_view(view_dir, None)?;
    let sources = ConfigSources::view_over_theme(view_dir, theme_dir);
    let mut diagnostics = Vec::new();

    let layout_text = sources
        .read("layout.txt")?
        .context("layout file not found: layout.txt")?;
    let layout = parse_layout(&layout_text)?;

    if let Some(contents) = sources.read("banner.txt")? {
        let (events, mut parse_diags) = parse_banner_config(&contents);
        diagnostics.append(&mut parse_diags);
        let (_, mut fold_diags) = fold_banner_style(&events);
        diagnostics.append(&mut fold_diags);
    }
    if let Some(contents) = sources.read("head.txt")? {
        parse_head_config(&contents, &mut diagnostics);
    }
    if let Some(contents) = sources.read("navbar.txt")? {
        let tree = parse_navbar(&contents);
        if tree.entries.is_empty() {
            diagnostics.push(Diagnostic::warning(
                Some("navbar"),
                "navbar file has no usable entries",
            ));
        }
    }

    print_diagnostics(&diagnostics);
    println!(
        "{}: layout declares {} container(s), {} warning(s)",
        view.name,
        layout.entries().len(),
        diagnostics.len()
    );
    Ok(())
}

fn apply_theme(view_dir: &Path, theme_dir: &Path) -> Result<()> {
    let copied = materialize_view_defaults(view_dir, theme_dir)?;
    if copied.is_empty() {
        println!("nothing to materialize; the view overrides every theme default");
    } else {
        for name in &copied {
            println!("materialized {name}");
        }
    }
    Ok(())
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        let level = match diagnostic.level {
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Error => "error",
        };
        match &diagnostic.source {
            Some(source) => eprintln!("{level}: [{source}] {}", diagnostic.message),
            None => eprintln!("{level}: {}", diagnostic.message),
        }
    }
}
