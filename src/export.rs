//! Export of markdown help pages as Android string resources.
//!
//! Each `<key>.md` page becomes a `help_<key>` string holding the rendered
//! HTML, cleaned up for the reduced tag set Android's HTML loader handles.

use anyhow::{Context, Result, bail};
use percent_encoding::percent_decode_str;
use quick_xml::escape::escape;

use crate::markdown::{Fragment, MarkdownRenderer};
use crate::source::{DocumentSource, FALLBACK_PREFIX, SourceFormat};

/// Default output path for exported strings.
pub const DEFAULT_EXPORT_PATH: &str = "../app/src/main/res/values/strings_help.xml";

/// Rewrites rendered HTML into the form Android string resources expect.
///
/// - empty `alt` attributes are dropped
/// - `strong`/`em` become `b`/`i`
/// - void elements lose their `/>` close
/// - a leading paragraph holding only a bold link line is unwrapped
/// - single quotes are backslash escaped
pub fn android_html(html: &str) -> String {
    let mut html = html
        .trim_end()
        .replace(" alt=\"\"", "")
        .replace("strong>", "b>")
        .replace("em>", "i>")
        .replace(" />", ">");

    if html.starts_with("<p><b><a") {
        let line_end = html.find('\n').unwrap_or(html.len());
        if let Some(close) = html[..line_end].find("</b></p>") {
            let unwrapped = format!(
                "{}{}",
                &html["<p>".len()..close + "</b>".len()],
                &html[close + "</b></p>".len()..]
            );
            html = unwrapped;
        }
    }

    html.replace('\'', "\\'")
}

/// Undoes the percent-encoding comrak applies to image sources.
///
/// Android looks images up by the raw `name|NN%` form.
fn decode_image_sources(html: &str) -> String {
    let mut fragment = Fragment::parse(html);
    for img in fragment.tags_mut("img") {
        let Some(src) = img.attr("src") else {
            continue;
        };
        let decoded = percent_decode_str(src).decode_utf8_lossy().into_owned();
        if decoded != src {
            img.set_attr("src", decoded);
        }
    }
    fragment.to_html()
}

/// Renders every page of a markdown source into a string resource file.
///
/// # Errors
///
/// Returns error if the source does not hold markdown or a page cannot be
/// read.
pub fn export_strings<S: DocumentSource + ?Sized>(source: &S) -> Result<String> {
    if source.format() != SourceFormat::Markdown {
        bail!("String export needs a markdown source");
    }

    let renderer = MarkdownRenderer::new();
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str("<!-- Created automatically by helpview export -->\n");
    out.push_str("<resources>\n");

    for key in source.keys() {
        let name = format!("{}{}", FALLBACK_PREFIX, key);
        log::info!("Exporting {}", name);

        let text = source
            .fetch(&key)
            .with_context(|| format!("Failed to read page {}", key))?;
        let html = android_html(&decode_image_sources(&renderer.render(&text)));

        out.push_str(&format!(
            "    <string name=\"{}\" formatted=\"false\">\n",
            escape(name.as_str())
        ));
        out.push_str("<![CDATA[\n");
        // "]]>" cannot appear inside a CDATA section
        out.push_str(&html.replace("]]>", "]]]]><![CDATA[>"));
        out.push('\n');
        out.push_str("]]>\n");
        out.push_str("    </string>\n");
    }

    out.push_str("</resources>\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MemorySource, StringResources};

    #[test]
    fn test_android_html_cleanup() {
        // Arrange
        let html = "<p><strong>Bold</strong> <em>it's</em> <img src=\"x\" alt=\"\" /></p>\n";

        // Act
        let cleaned = android_html(html);

        // Assert
        assert_eq!(cleaned, "<p><b>Bold</b> <i>it\\'s</i> <img src=\"x\"></p>");
    }

    #[test]
    fn test_android_html_unwraps_leading_link_line() {
        // Arrange
        let html = "<p><strong><a href=\"home\">Home</a> | <a href=\"faq\">FAQ</a></strong></p>\n<p>Body</p>\n";

        // Act
        let cleaned = android_html(html);

        // Assert
        assert_eq!(
            cleaned,
            "<b><a href=\"home\">Home</a> | <a href=\"faq\">FAQ</a></b>\n<p>Body</p>"
        );
    }

    #[test]
    fn test_export_strings_round_trips_through_resources() {
        // Arrange
        let source = MemorySource::new(SourceFormat::Markdown)
            .with("home", "# Welcome\n\nIt's **here**: [FAQ](faq)")
            .with("faq", "Questions");

        // Act
        let xml = export_strings(&source).expect("Should export");
        let resources = StringResources::parse("strings_help.xml", &xml).expect("Should parse");

        // Assert
        assert_eq!(resources.keys(), vec!["help_faq".to_string(), "help_home".to_string()]);
        let home = resources.fetch("help_home").expect("Should find help_home");
        assert!(home.contains("<h1>Welcome</h1>"), "Rendered HTML: {}", home);
        assert!(home.contains("<b>here</b>"), "Android tags: {}", home);
        assert!(home.contains("It's"), "Quote escapes undone on load: {}", home);
    }

    #[test]
    fn test_decode_image_sources() {
        // Act
        let html = decode_image_sources("<p><img src=\"ic_star%7C50%25\" alt=\"\" /></p>");

        // Assert
        assert_eq!(html, "<p><img src=\"ic_star|50%\" alt=\"\" /></p>");
    }

    #[test]
    fn test_export_rejects_html_source() {
        // Arrange
        let source = MemorySource::new(SourceFormat::Html).with("home", "<p>x</p>");

        // Act
        let result = export_strings(&source);

        // Assert
        assert!(result.is_err(), "HTML sources cannot be exported");
    }
}
