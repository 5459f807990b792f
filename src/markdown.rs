//! Markdown rendering and fragment rewriting for help pages.
//!
//! This module renders markdown with comrak, parses the resulting HTML into
//! a flat fragment of text and tags, and rewrites image sources and link
//! targets for display.

mod fragment;
mod renderer;
mod rewrite;

pub use fragment::{Fragment, Node, Tag};
pub use renderer::MarkdownRenderer;
pub use rewrite::{DEFAULT_DRAWABLE_DIR, ImageRef, Link, LinkStyle, Rewriter, image_path};
