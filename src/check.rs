//! Broken internal link detection.

use crate::markdown::{Fragment, Link, MarkdownRenderer, Rewriter};
use crate::navigator::Navigator;
use crate::source::{DocumentSource, lookup};

/// Internal link whose target page does not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLink {
    /// Source key of the page containing the link.
    pub page: String,
    /// Link target as written.
    pub href: String,
}

/// Finds internal links that point at missing pages.
///
/// Every key of the source is rendered and its internal links resolved the
/// way the navigator would, including the `help_` fallback.
///
/// # Returns
///
/// Broken links ordered by page key, then document order
pub fn find_broken_links<S: DocumentSource>(source: &S) -> Vec<BrokenLink> {
    let navigator = Navigator::new(source, Rewriter::default());
    let mut broken = Vec::new();

    for key in source.keys() {
        log::debug!("Checking {}", key);
        let rendered = match navigator.render(&key) {
            Ok(rendered) => rendered,
            Err(e) => {
                log::warn!("Cannot render {}: {}", key, e);
                continue;
            }
        };

        for link in rendered.links() {
            let Link::Internal(href) = link else {
                continue;
            };
            if lookup(source, href).is_err() {
                broken.push(BrokenLink {
                    page: key.clone(),
                    href: href.clone(),
                });
            }
        }
    }

    broken
}

/// Internal link targets of a markdown text, in document order.
pub fn internal_links(markdown: &str) -> Vec<String> {
    let html = MarkdownRenderer::new().render(markdown);
    let (_, links) = Rewriter::default().rewrite(Fragment::parse(&html));
    links
        .into_iter()
        .filter_map(|link| match link {
            Link::Internal(href) => Some(href),
            Link::External(_) => None,
        })
        .collect()
}
