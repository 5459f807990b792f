//! Shared test utilities for integration tests.
//!
//! Provides helpers for creating temporary help page directories and
//! string resource files.

#![allow(dead_code)]

use anyhow::Result;
use std::path::Path;
use tempfile::TempDir;

/// Creates temporary directory holding markdown help pages.
///
/// # Arguments
///
/// * `pages`: `(key, markdown)` pairs written as `<key>.md`
///
/// # Errors
///
/// Returns error if directory creation or file writes fail
pub fn create_help_dir(pages: &[(&str, &str)]) -> Result<TempDir> {
    let dir = TempDir::new()?;
    for (key, markdown) in pages {
        write_file(dir.path(), &format!("{}.md", key), markdown)?;
    }
    Ok(dir)
}

/// Small help set used across tests.
///
/// `home` exists only under its fallback key; `faq` exists under both keys
/// so the primary must win.
pub fn sample_pages() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "help_home",
            "# Welcome\n\n![](ic_launcher|150%) Start here.\n\n\
             - [Questions](faq)\n- [Project site](https://fasola.org)\n",
        ),
        ("faq", "# FAQ\n\nSee [about](about) or go [home](home).\n"),
        ("help_faq", "# Stale FAQ\n"),
        ("help_about", "# About\n\nVersion 1.\n"),
    ]
}

/// Writes file, creating parent directories as needed.
///
/// # Errors
///
/// Returns error if directory creation or file write fails
pub fn write_file(root: &Path, path: &str, content: &str) -> Result<()> {
    let file_path = root.join(path);
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}
