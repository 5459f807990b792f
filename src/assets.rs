//! CSS asset bundling

use anyhow::{Context, Result};
use std::{fs, path::Path};

const BASE: &str = include_str!("../assets/base.css");
const NAV: &str = include_str!("../assets/nav.css");
const PAGE: &str = include_str!("../assets/page.css");

/// Stylesheet file name written into the assets directory.
pub const STYLESHEET: &str = "help.css";

/// Writes the bundled help stylesheet to the assets directory
///
/// # Errors
///
/// Returns error if the file cannot be written.
pub fn write_css_assets(assets_dir: &Path) -> Result<()> {
    write_bundled(assets_dir, STYLESHEET, &[BASE, NAV, PAGE])
}

/// Returns the bundled stylesheet for inlining into standalone pages
pub fn bundled_css() -> String {
    [BASE, NAV, PAGE].join("\n")
}

fn write_bundled(dir: &Path, name: &str, parts: &[&str]) -> Result<()> {
    let css = parts.join("\n");
    fs::write(dir.join(name), css)
        .with_context(|| format!("Failed to write CSS asset: {}", name))?;
    Ok(())
}
