//! Document sources backing the navigator.
//!
//! A source maps document keys to raw text. Markdown directories hold
//! `<key>.md` files; string resource files hold pre-rendered HTML inside
//! `<string name="key">` elements. Sources are built once and injected into
//! the navigator, so the XML file is parsed a single time per process.

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::HelpError;

/// Page shown when no identifier is given.
pub const HOME_PAGE: &str = "home";

/// Prefix of the secondary key tried when the primary lookup fails.
pub const FALLBACK_PREFIX: &str = "help_";

/// Text format stored by a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Markdown text, rendered to HTML and percent-decoded image paths.
    Markdown,
    /// Ready HTML, used as is.
    Html,
}

/// Key/value store of help documents.
pub trait DocumentSource {
    /// Format of the text returned by [`DocumentSource::fetch`].
    fn format(&self) -> SourceFormat;

    /// Fetches raw text stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns error if the key is absent or cannot be read.
    fn fetch(&self, key: &str) -> Result<String, HelpError>;

    /// Lists every key in the source, sorted.
    fn keys(&self) -> Vec<String>;
}

impl<S: DocumentSource + ?Sized> DocumentSource for &S {
    fn format(&self) -> SourceFormat {
        (**self).format()
    }

    fn fetch(&self, key: &str) -> Result<String, HelpError> {
        (**self).fetch(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

impl<S: DocumentSource + ?Sized> DocumentSource for Box<S> {
    fn format(&self) -> SourceFormat {
        (**self).format()
    }

    fn fetch(&self, key: &str) -> Result<String, HelpError> {
        (**self).fetch(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

/// Normalizes a page identifier, mapping empty input to [`HOME_PAGE`].
pub fn page_id(id: &str) -> &str {
    if id.is_empty() { HOME_PAGE } else { id }
}

/// Strips the fallback prefix from a key, giving the page id it serves.
pub fn page_id_for_key(key: &str) -> &str {
    match key.strip_prefix(FALLBACK_PREFIX) {
        Some(rest) if !rest.is_empty() => rest,
        _ => key,
    }
}

/// Looks up a page under its primary key, then under `help_<id>`.
///
/// The fallback is only consulted after the primary fetch fails.
///
/// # Returns
///
/// The key that matched and its raw text
///
/// # Errors
///
/// Returns `DocumentNotFound` when both lookups fail.
pub fn lookup<S: DocumentSource + ?Sized>(
    source: &S,
    id: &str,
) -> Result<(String, String), HelpError> {
    let id = page_id(id);

    match source.fetch(id) {
        Ok(text) => return Ok((id.to_string(), text)),
        Err(e) => log::debug!("Primary lookup for {} failed: {}", id, e),
    }

    let fallback = format!("{}{}", FALLBACK_PREFIX, id);
    match source.fetch(&fallback) {
        Ok(text) => {
            log::debug!("Resolved {} through fallback key {}", id, fallback);
            Ok((fallback, text))
        }
        Err(e) => {
            log::debug!("Fallback lookup for {} failed: {}", fallback, e);
            Err(HelpError::DocumentNotFound { id: id.to_string() })
        }
    }
}

/// Directory of `<key>.md` files.
#[derive(Debug, Clone)]
pub struct MarkdownDir {
    root: PathBuf,
}

impl MarkdownDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Option<PathBuf> {
        // Keys name files directly inside the root
        if key.is_empty() || key.contains(['/', '\\']) || key.contains("..") {
            return None;
        }
        Some(self.root.join(format!("{}.md", key)))
    }
}

impl DocumentSource for MarkdownDir {
    fn format(&self) -> SourceFormat {
        SourceFormat::Markdown
    }

    fn fetch(&self, key: &str) -> Result<String, HelpError> {
        let path = self
            .path_for(key)
            .ok_or_else(|| HelpError::DocumentNotFound { id: key.to_string() })?;

        fs::read_to_string(&path).map_err(|e| HelpError::Io {
            path,
            source: Arc::new(e),
        })
    }

    fn keys(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Cannot list {}: {}", self.root.display(), e);
                return Vec::new();
            }
        };

        let mut keys: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "md"))
            .filter_map(|path| path.file_stem()?.to_str().map(String::from))
            .collect();
        keys.sort();
        keys
    }
}

/// Android string resources, parsed once at construction.
#[derive(Debug, Clone)]
pub struct StringResources {
    path: PathBuf,
    strings: BTreeMap<String, String>,
}

impl StringResources {
    /// Reads and parses a `strings.xml` style resource file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not well formed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HelpError> {
        let path = path.as_ref().to_path_buf();
        let xml = fs::read_to_string(&path).map_err(|e| HelpError::Io {
            path: path.clone(),
            source: Arc::new(e),
        })?;
        Self::parse(path, &xml)
    }

    /// Parses resource XML; `path` only labels errors.
    ///
    /// # Errors
    ///
    /// Returns error if the XML is not well formed.
    pub fn parse(path: impl Into<PathBuf>, xml: &str) -> Result<Self, HelpError> {
        let path = path.into();
        let xml_error = |message: String| HelpError::Xml {
            path: path.clone(),
            message,
        };

        let mut reader = Reader::from_str(xml);
        let mut strings = BTreeMap::new();
        // (name, text, nesting depth inside the <string> element)
        let mut current: Option<(String, String, usize)> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    if let Some((_, _, depth)) = current.as_mut() {
                        *depth += 1;
                    } else if e.name().as_ref() == b"string" {
                        let name = e
                            .try_get_attribute("name")
                            .map_err(|err| xml_error(err.to_string()))?
                            .map(|attr| attr.unescape_value().map(|v| v.into_owned()))
                            .transpose()
                            .map_err(|err| xml_error(err.to_string()))?;
                        if let Some(name) = name {
                            current = Some((name, String::new(), 0));
                        }
                    }
                }
                Ok(Event::End(_)) => {
                    if matches!(current, Some((_, _, 0))) {
                        if let Some((name, text, _)) = current.take() {
                            strings.insert(name, unescape_resource(&text));
                        }
                    } else if let Some((_, _, depth)) = current.as_mut() {
                        *depth -= 1;
                    }
                }
                Ok(Event::Text(t)) => {
                    if let Some((_, text, _)) = current.as_mut() {
                        let unescaped = t.unescape().map_err(|err| xml_error(err.to_string()))?;
                        text.push_str(&unescaped);
                    }
                }
                Ok(Event::CData(c)) => {
                    if let Some((_, text, _)) = current.as_mut() {
                        text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(xml_error(format!(
                        "{} at byte {}",
                        e,
                        reader.buffer_position()
                    )));
                }
            }
        }

        log::debug!("Loaded {} strings from {}", strings.len(), path.display());

        Ok(Self { path, strings })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl DocumentSource for StringResources {
    fn format(&self) -> SourceFormat {
        SourceFormat::Html
    }

    fn fetch(&self, key: &str) -> Result<String, HelpError> {
        // Empty text counts as missing
        self.strings
            .get(key)
            .filter(|text| !text.trim().is_empty())
            .cloned()
            .ok_or_else(|| HelpError::DocumentNotFound { id: key.to_string() })
    }

    fn keys(&self) -> Vec<String> {
        self.strings.keys().cloned().collect()
    }
}

/// Reverses the backslash escapes Android applies to string resources.
fn unescape_resource(text: &str) -> String {
    text.replace("\\'", "'").replace("\\\"", "\"")
}

/// In-memory source, mostly for tests and embedding.
#[derive(Debug, Clone)]
pub struct MemorySource {
    format: SourceFormat,
    documents: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new(format: SourceFormat) -> Self {
        Self {
            format,
            documents: BTreeMap::new(),
        }
    }

    /// Adds a document, replacing any previous text under `key`.
    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(key, text);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.documents.insert(key.into(), text.into());
    }
}

impl DocumentSource for MemorySource {
    fn format(&self) -> SourceFormat {
        self.format
    }

    fn fetch(&self, key: &str) -> Result<String, HelpError> {
        self.documents
            .get(key)
            .cloned()
            .ok_or_else(|| HelpError::DocumentNotFound { id: key.to_string() })
    }

    fn keys(&self) -> Vec<String> {
        self.documents.keys().cloned().collect()
    }
}
