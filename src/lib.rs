//! Help page viewer and tooling.
//!
//! Resolves help pages by identifier from markdown files or Android string
//! resources, renders and rewrites them, and navigates between them with a
//! browser-style history.

mod assets;
mod check;
pub mod components;
mod config;
mod error;
mod export;
mod history;
mod markdown;
mod navigator;
mod site;
mod source;

pub use assets::write_css_assets;
pub use check::{BrokenLink, find_broken_links, internal_links};
pub use config::{Command, Config};
pub use error::HelpError;
pub use export::{DEFAULT_EXPORT_PATH, android_html, export_strings};
pub use history::{History, HistoryEntry, PopState};
pub use markdown::{
    DEFAULT_DRAWABLE_DIR, Fragment, ImageRef, Link, LinkStyle, MarkdownRenderer, Node, Rewriter,
    Tag, image_path,
};
pub use navigator::{
    Click, Completion, DisplayedPage, LinkSubscription, NavState, NavTicket, Navigator,
    RenderedPage,
};
pub use site::{SiteSummary, build_site, page_ids, standalone_page};
pub use source::{
    DocumentSource, FALLBACK_PREFIX, HOME_PAGE, MarkdownDir, MemorySource, SourceFormat,
    StringResources, lookup, page_id, page_id_for_key,
};
