use anyhow::{Context, Result, bail};
use helpview::{Command, Config, DocumentSource, Navigator};
use std::fs;
use std::path::Path;

/// Renders one page through the navigator and writes it out.
fn render_page(
    config: &Config,
    source: Box<dyn DocumentSource>,
    page: &str,
    output: Option<&Path>,
    standalone: bool,
) -> Result<()> {
    let mut navigator = Navigator::new(source, config.rewriter());
    let displayed = navigator
        .display(page)
        .with_context(|| format!("Failed to display page {}", page))?;

    let html = if standalone {
        helpview::standalone_page(displayed).into_string()
    } else {
        displayed.html()
    };

    match output {
        Some(path) => {
            write_output(path, &html)?;
            println!("Generated: {} (from {})", path.display(), displayed.key());
        }
        None => println!("{}", html),
    }

    Ok(())
}

/// Builds the static site and optionally opens it.
fn build(source: &dyn DocumentSource, drawables: &str, output: &Path, open: bool) -> Result<()> {
    let summary = helpview::build_site(&source, drawables, output)
        .with_context(|| format!("Failed to build site in {}", output.display()))?;

    for page in &summary.pages {
        println!("Generated: {}", page.display());
    }
    println!("Generated {} pages", summary.pages.len());

    if open {
        match &summary.index {
            Some(index) => {
                open::that(index)
                    .with_context(|| format!("Failed to open {}", index.display()))?;
            }
            None => log::warn!("No home page, nothing to open"),
        }
    }

    Ok(())
}

/// Reports broken internal links, failing when any exist.
fn check(source: &dyn DocumentSource) -> Result<()> {
    let keys = source.keys();
    let broken = helpview::find_broken_links(&source);

    for link in &broken {
        println!("{}: broken link to {}", link.page, link.href);
    }

    if !broken.is_empty() {
        bail!("{} broken links in {} pages", broken.len(), keys.len());
    }

    println!("Checked {} pages, no broken links", keys.len());
    Ok(())
}

/// Exports markdown pages as string resources.
fn export(source: &dyn DocumentSource, output: &Path) -> Result<()> {
    let xml = helpview::export_strings(source).context("Failed to export strings")?;
    write_output(output, &xml)?;
    println!("Generated: {}", output.display());
    Ok(())
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

fn main() -> Result<()> {
    let config = Config::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level()))
        .init();

    config.validate().context("Invalid configuration")?;

    let source = config.source().context("Failed to load help pages")?;

    match &config.command {
        Command::Render {
            page,
            output,
            standalone,
        } => render_page(&config, source, page, output.as_deref(), *standalone),
        Command::Build { output, open } => build(source.as_ref(), &config.drawables, output, *open),
        Command::Check => check(source.as_ref()),
        Command::Export { output } => export(source.as_ref(), output),
    }
}
