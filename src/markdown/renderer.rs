//! Markdown rendering for help pages.

use comrak::Options;

/// Renders markdown help pages to HTML.
///
/// Enables the extensions help pages use (tables, strikethrough,
/// autolinks) and lets raw HTML through, since help pages are part of the
/// application and trusted.
pub struct MarkdownRenderer<'a> {
    options: Options<'a>,
}

impl<'a> MarkdownRenderer<'a> {
    /// Creates renderer with help page options.
    pub fn new() -> Self {
        let mut options = Options::default();

        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;

        // Help pages embed inline HTML (line breaks, spans)
        options.render.unsafe_ = true;

        Self { options }
    }

    /// Renders markdown content to an HTML string.
    ///
    /// # Arguments
    ///
    /// * `content`: Markdown content to render
    ///
    /// # Returns
    ///
    /// Rendered HTML fragment (no document wrapper)
    pub fn render(&self, content: &str) -> String {
        comrak::markdown_to_html(content, &self.options)
    }
}

impl<'a> Default for MarkdownRenderer<'a> {
    fn default() -> Self {
        Self::new()
    }
}
