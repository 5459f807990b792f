//! Error types for document resolution and source loading.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while loading document sources or resolving pages.
#[derive(Error, Debug, Clone)]
pub enum HelpError {
    /// Neither the page id nor its `help_` fallback exists in the source.
    #[error("Document not found: {id} (also tried help_{id})")]
    DocumentNotFound { id: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("Malformed string resources in {}: {message}", path.display())]
    Xml { path: PathBuf, message: String },
}

impl HelpError {
    /// Returns true for the navigation error kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, HelpError::DocumentNotFound { .. })
    }
}
