//! Static help site generation.
//!
//! Writes every page of a source to `<out>/<id>.html` with internal links
//! pointing at the sibling pages, plus `index.html` for the home page.

use anyhow::{Context, Result};
use maud::{Markup, PreEscaped, html};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::assets::{self, STYLESHEET};
use crate::components::layout::page_wrapper;
use crate::components::nav::nav_bar;
use crate::markdown::{LinkStyle, Rewriter};
use crate::navigator::{DisplayedPage, Navigator};
use crate::source::{DocumentSource, HOME_PAGE, page_id_for_key};

/// Outcome of a site build.
#[derive(Debug, Clone, Default)]
pub struct SiteSummary {
    /// Pages written, in page id order.
    pub pages: Vec<PathBuf>,
    /// Path of `index.html`, when a home page exists.
    pub index: Option<PathBuf>,
}

/// Page ids served by a source.
///
/// Keys with the `help_` prefix serve the id without it, so `help_faq`
/// and `faq` both yield `faq`.
pub fn page_ids<S: DocumentSource + ?Sized>(source: &S) -> Vec<String> {
    source
        .keys()
        .iter()
        .map(|key| page_id_for_key(key).to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Builds the static help site into `output`.
///
/// # Arguments
///
/// * `source`: Documents to render
/// * `drawable_dir`: Directory image names resolve into
/// * `output`: Output directory, created if missing
///
/// # Errors
///
/// Returns error if directories or pages cannot be written. Pages that fail
/// to resolve are skipped with a warning.
pub fn build_site<S: DocumentSource>(
    source: &S,
    drawable_dir: &str,
    output: &Path,
) -> Result<SiteSummary> {
    fs::create_dir_all(output).context("Failed to create output directory")?;

    let assets_dir = output.join("assets");
    fs::create_dir_all(&assets_dir).context("Failed to create assets directory")?;
    assets::write_css_assets(&assets_dir)?;

    let rewriter = Rewriter::new(drawable_dir).with_link_style(LinkStyle::Static);
    let mut navigator = Navigator::new(source, rewriter);
    let mut summary = SiteSummary::default();
    let stylesheet = format!("assets/{}", STYLESHEET);

    for id in page_ids(source) {
        let page = match navigator.display(&id) {
            Ok(page) => page,
            Err(e) => {
                log::warn!("Skipping {}: {}", id, e);
                continue;
            }
        };

        let markup = site_page(page, &stylesheet);
        let page_path = output.join(format!("{}.html", id));
        fs::write(&page_path, markup.into_string())
            .with_context(|| format!("Failed to write page {}", page_path.display()))?;
        log::debug!("Wrote {}", page_path.display());

        if id == HOME_PAGE {
            let index_path = output.join("index.html");
            fs::copy(&page_path, &index_path)
                .with_context(|| format!("Failed to write {}", index_path.display()))?;
            summary.index = Some(index_path);
        }

        summary.pages.push(page_path);
    }

    Ok(summary)
}

fn site_page(page: &DisplayedPage, stylesheet: &str) -> Markup {
    let is_home = page.id() == HOME_PAGE;
    page_wrapper(
        page.id(),
        &[stylesheet],
        nav_bar("index.html", page.id(), is_home),
        PreEscaped(page.html()),
    )
}

/// Wraps a displayed page into a self-contained HTML document.
///
/// The stylesheet is inlined so the output can be opened on its own.
pub fn standalone_page(page: &DisplayedPage) -> Markup {
    let body = html! {
        style { (PreEscaped(assets::bundled_css())) }
    };
    page_wrapper(page.id(), &[], body, PreEscaped(page.html()))
}
