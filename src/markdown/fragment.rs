//! In-memory HTML fragment.
//!
//! Splits rendered HTML into text runs and tags so image and anchor
//! attributes can be rewritten without re-serializing the whole document.
//! Only start tags are parsed into attributes; end tags, comments and
//! doctype declarations are kept verbatim.

use std::fmt::Write as _;

/// Elements whose content is raw text rather than markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// HTML start tag with parsed attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    name: String,
    attrs: Vec<(String, String)>,
    self_closing: bool,
    raw: String,
    dirty: bool,
}

impl Tag {
    /// Lowercase element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns decoded attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Sets attribute, replacing an existing value or appending a new one.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attrs
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name.to_string(), value)),
        }
        self.dirty = true;
    }

    fn write_html(&self, out: &mut String) {
        if !self.dirty {
            out.push_str(&self.raw);
            return;
        }

        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            // Writing to a String cannot fail
            let _ = write!(out, " {}=\"{}\"", key, escape_attr(value));
        }
        if self.self_closing {
            out.push_str(" /");
        }
        out.push('>');
    }
}

/// Fragment node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Text or markup kept verbatim (end tags, comments, raw text).
    Raw(String),
    /// Parsed start tag.
    Tag(Tag),
}

/// Parsed HTML fragment ready for rewriting and display.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    nodes: Vec<Node>,
}

impl Fragment {
    /// Parses an HTML fragment.
    ///
    /// Parsing is total: malformed markup is kept as raw text.
    pub fn parse(html: &str) -> Self {
        let mut nodes = Vec::new();
        let mut text_start = 0;
        let mut pos = 0;
        let bytes = html.as_bytes();

        while let Some(offset) = html[pos..].find('<') {
            let lt = pos + offset;
            let next = bytes.get(lt + 1).copied();

            let parsed = match next {
                Some(b'!') => {
                    let terminator = if html[lt..].starts_with("<!--") {
                        "-->"
                    } else {
                        ">"
                    };
                    html[lt..].find(terminator).map(|end| {
                        let end = lt + end + terminator.len();
                        (Node::Raw(html[lt..end].to_string()), end)
                    })
                }
                Some(b'/') => html[lt..]
                    .find('>')
                    .map(|end| (Node::Raw(html[lt..lt + end + 1].to_string()), lt + end + 1)),
                Some(c) if c.is_ascii_alphabetic() => {
                    parse_start_tag(html, lt).map(|(tag, end)| (Node::Tag(tag), end))
                }
                _ => None,
            };

            let Some((node, end)) = parsed else {
                // Literal '<', stays in the text run
                pos = lt + 1;
                continue;
            };

            if text_start < lt {
                nodes.push(Node::Raw(html[text_start..lt].to_string()));
            }

            let mut end = end;
            let raw_text_element = match &node {
                Node::Tag(tag) if !tag.self_closing => RAW_TEXT_ELEMENTS
                    .iter()
                    .find(|name| **name == tag.name)
                    .copied(),
                _ => None,
            };
            nodes.push(node);

            if let Some(name) = raw_text_element {
                let close = format!("</{}", name);
                let content_end = html[end..]
                    .to_ascii_lowercase()
                    .find(&close)
                    .map_or(html.len(), |p| end + p);
                if end < content_end {
                    nodes.push(Node::Raw(html[end..content_end].to_string()));
                }
                end = content_end;
            }

            text_start = end;
            pos = end;
        }

        if text_start < html.len() {
            nodes.push(Node::Raw(html[text_start..].to_string()));
        }

        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Iterates over start tags with the given element name.
    pub fn tags<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.nodes.iter().filter_map(move |node| match node {
            Node::Tag(tag) if tag.name == name => Some(tag),
            _ => None,
        })
    }

    /// Mutable variant of [`Fragment::tags`].
    pub fn tags_mut<'a>(&'a mut self, name: &'a str) -> impl Iterator<Item = &'a mut Tag> + 'a {
        self.nodes.iter_mut().filter_map(move |node| match node {
            Node::Tag(tag) if tag.name == name => Some(tag),
            _ => None,
        })
    }

    /// Serializes the fragment back to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Raw(text) => out.push_str(text),
                Node::Tag(tag) => tag.write_html(&mut out),
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Parses start tag beginning at `start` (the `<`).
///
/// Returns the tag and the byte offset after its closing `>`, or None when
/// the tag is unterminated.
fn parse_start_tag(html: &str, start: usize) -> Option<(Tag, usize)> {
    let bytes = html.as_bytes();
    let mut pos = start + 1;

    let name_start = pos;
    while pos < bytes.len() && !is_name_end(bytes[pos]) {
        pos += 1;
    }
    let name = html[name_start..pos].to_ascii_lowercase();

    let mut attrs = Vec::new();
    let mut self_closing = false;

    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        match bytes.get(pos)? {
            b'>' => {
                pos += 1;
                break;
            }
            b'/' => {
                if bytes.get(pos + 1) == Some(&b'>') {
                    self_closing = true;
                    pos += 2;
                    break;
                }
                pos += 1;
                continue;
            }
            _ => {}
        }

        let key_start = pos;
        while pos < bytes.len() && !is_name_end(bytes[pos]) && bytes[pos] != b'=' {
            pos += 1;
        }
        let key = html[key_start..pos].to_ascii_lowercase();

        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let mut value = String::new();
        if bytes.get(pos) == Some(&b'=') {
            pos += 1;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            match bytes.get(pos)? {
                quote @ (b'"' | b'\'') => {
                    let quote = *quote as char;
                    let value_start = pos + 1;
                    let len = html[value_start..].find(quote)?;
                    value = decode_entities(&html[value_start..value_start + len]);
                    pos = value_start + len + 1;
                }
                _ => {
                    let value_start = pos;
                    while pos < bytes.len()
                        && !bytes[pos].is_ascii_whitespace()
                        && bytes[pos] != b'>'
                    {
                        pos += 1;
                    }
                    value = decode_entities(&html[value_start..pos]);
                }
            }
        }

        if !key.is_empty() {
            attrs.push((key, value));
        }
    }

    Some((
        Tag {
            name,
            attrs,
            self_closing,
            raw: html[start..pos].to_string(),
            dirty: false,
        },
        pos,
    ))
}

fn is_name_end(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'>' || b == b'/'
}

/// Decodes the entities comrak emits inside attribute values.
fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
