//! Image and link rewriting for rendered help pages.

use percent_encoding::percent_decode_str;

use super::Fragment;
use crate::source::page_id_for_key;

/// Directory image names resolve into unless configured otherwise.
pub const DEFAULT_DRAWABLE_DIR: &str = "../app/src/main/res/drawable-mdpi";

/// Attribute recording the page id an internal link navigates to.
const PAGE_ATTR: &str = "data-page";

/// Image reference written as `name` or `name|NN%`.
///
/// Only the part before the first `|` names the image. A percentage after
/// it scales the image relative to the line height; without one the image
/// is one line high.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    name: String,
    scale: Option<f64>,
}

impl ImageRef {
    /// Parses an image `src` attribute.
    ///
    /// # Arguments
    ///
    /// * `src`: Attribute value as found in the fragment
    /// * `decode`: Percent-decode first (markdown renders encode `|` and `%`)
    pub fn parse(src: &str, decode: bool) -> Self {
        let src = if decode {
            percent_decode_str(src).decode_utf8_lossy().into_owned()
        } else {
            src.to_string()
        };

        let mut parts = src.split('|');
        let name = parts.next().unwrap_or_default().to_string();
        let scale = parts
            .next()
            .and_then(|suffix| suffix.trim().strip_suffix('%'))
            .and_then(|percent| percent.trim().parse::<f64>().ok())
            .filter(|percent| percent.is_finite() && *percent > 0.0)
            .map(|percent| percent / 100.0);

        Self { name, scale }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scale factor relative to line height, when given.
    pub fn scale(&self) -> Option<f64> {
        self.scale
    }

    /// Resolved image path inside the drawable directory.
    pub fn path(&self, drawable_dir: &str) -> String {
        let dir = drawable_dir.trim_end_matches('/');
        if dir.is_empty() {
            format!("{}.png", self.name)
        } else {
            format!("{}/{}.png", dir, self.name)
        }
    }
}

/// Rewrites an image `src` to `<drawable_dir>/<name>.png`.
pub fn image_path(drawable_dir: &str, src: &str, decode: bool) -> String {
    ImageRef::parse(src, decode).path(drawable_dir)
}

/// Link found in a rewritten fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    /// Absolute link, opened in a new browsing context.
    External(String),
    /// Link to another help page, intercepted by the navigator.
    Internal(String),
}

impl Link {
    /// Classifies an `href`: anything starting with `http` is external.
    pub fn classify(href: &str) -> Self {
        if href.starts_with("http") {
            Link::External(href.to_string())
        } else {
            Link::Internal(href.to_string())
        }
    }

    pub fn href(&self) -> &str {
        match self {
            Link::External(href) | Link::Internal(href) => href,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Link::Internal(_))
    }
}

/// How internal links are written into the output markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStyle {
    /// Keep `href`; the navigator intercepts clicks.
    #[default]
    Intercept,
    /// Point `href` at the generated `<id>.html` page.
    Static,
}

/// Rewrites image sources and internal links of rendered fragments.
#[derive(Debug, Clone)]
pub struct Rewriter {
    drawable_dir: String,
    decode_images: bool,
    link_style: LinkStyle,
}

impl Rewriter {
    /// Creates rewriter resolving images into `drawable_dir`.
    pub fn new(drawable_dir: impl Into<String>) -> Self {
        Self {
            drawable_dir: drawable_dir.into(),
            decode_images: true,
            link_style: LinkStyle::Intercept,
        }
    }

    /// Sets whether image sources are percent-decoded (markdown sources).
    pub fn with_decode_images(mut self, decode: bool) -> Self {
        self.decode_images = decode;
        self
    }

    pub fn with_link_style(mut self, style: LinkStyle) -> Self {
        self.link_style = style;
        self
    }

    pub fn drawable_dir(&self) -> &str {
        &self.drawable_dir
    }

    pub fn link_style(&self) -> LinkStyle {
        self.link_style
    }

    /// Rewrites images and links in place.
    ///
    /// Every `<img>` gets its `src` resolved into the drawable directory.
    /// Every `<a>` with an `http` target opens in a new browsing context;
    /// other targets are tagged with the page id they navigate to.
    ///
    /// # Returns
    ///
    /// The rewritten fragment and the links found, in document order
    pub fn rewrite(&self, mut fragment: Fragment) -> (Fragment, Vec<Link>) {
        for img in fragment.tags_mut("img") {
            let Some(src) = img.attr("src") else {
                continue;
            };
            let image = ImageRef::parse(src, self.decode_images);
            img.set_attr("src", image.path(&self.drawable_dir));
            img.set_attr(
                "style",
                format!("height: {}em", image.scale().unwrap_or(1.0)),
            );
        }

        let mut links = Vec::new();
        for anchor in fragment.tags_mut("a") {
            let Some(href) = anchor.attr("href") else {
                continue;
            };
            let link = Link::classify(href);
            match &link {
                Link::External(_) => anchor.set_attr("target", "_blank"),
                Link::Internal(id) => {
                    anchor.set_attr(PAGE_ATTR, id.as_str());
                    if self.link_style == LinkStyle::Static && is_page_href(id) {
                        anchor.set_attr("href", format!("{}.html", page_id_for_key(id)));
                    }
                }
            }
            links.push(link);
        }

        (fragment, links)
    }
}

/// Whether an internal href names a help page.
///
/// Fragment-only hrefs (`#top`) and other URL schemes (`mailto:`) do not.
fn is_page_href(href: &str) -> bool {
    if href.is_empty() || href.starts_with('#') {
        return false;
    }
    match href.split_once(':') {
        Some((scheme, _)) => !scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        None => true,
    }
}

impl Default for Rewriter {
    fn default() -> Self {
        Self::new(DEFAULT_DRAWABLE_DIR)
    }
}
