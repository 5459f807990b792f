//! Command line configuration.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::export::DEFAULT_EXPORT_PATH;
use crate::markdown::{DEFAULT_DRAWABLE_DIR, Rewriter};
use crate::source::{DocumentSource, MarkdownDir, StringResources};

/// Command line configuration for helpview.
#[derive(Debug, Clone, Parser)]
#[command(name = "helpview", version, about, long_about = None)]
pub struct Config {
    /// Directory of markdown help pages
    #[arg(long, default_value = "md", global = true)]
    pub docs: PathBuf,

    /// Read pages from an Android string resource file instead of markdown
    #[arg(long, global = true)]
    pub strings: Option<PathBuf>,

    /// Directory image names resolve into
    #[arg(long, default_value = DEFAULT_DRAWABLE_DIR, global = true)]
    pub drawables: String,

    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Operation to run.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Render one page (falling back to help_<page>) as HTML
    Render {
        /// Page identifier
        #[arg(default_value = "home")]
        page: String,

        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Wrap the page in a complete HTML document
        #[arg(long)]
        standalone: bool,
    },

    /// Generate a static site with one HTML file per page
    Build {
        /// Output directory
        #[arg(short, long, default_value = "dist")]
        output: PathBuf,

        /// Open the generated index in a browser
        #[arg(long)]
        open: bool,
    },

    /// Report internal links whose target page is missing
    Check,

    /// Write markdown pages as Android string resources
    Export {
        /// Output XML file
        #[arg(short, long, default_value = DEFAULT_EXPORT_PATH)]
        output: PathBuf,
    },
}

impl Config {
    /// Parses configuration from command line arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Validates configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the selected document source does not exist, or if
    /// export is asked to read string resources.
    pub fn validate(&self) -> Result<()> {
        match &self.strings {
            Some(strings) => {
                if !strings.is_file() {
                    bail!("String resource file does not exist: {}", strings.display());
                }
                if matches!(self.command, Command::Export { .. }) {
                    bail!("Export reads markdown pages; drop --strings");
                }
            }
            None => {
                if !self.docs.is_dir() {
                    bail!("Help page directory does not exist: {}", self.docs.display());
                }
            }
        }

        Ok(())
    }

    /// Builds the configured document source.
    ///
    /// String resources are parsed here, once, and shared by every
    /// navigation that follows.
    ///
    /// # Errors
    ///
    /// Returns error if the string resource file cannot be loaded.
    pub fn source(&self) -> Result<Box<dyn DocumentSource>> {
        match &self.strings {
            Some(strings) => Ok(Box::new(StringResources::load(strings)?)),
            None => Ok(Box::new(MarkdownDir::new(&self.docs))),
        }
    }

    /// Rewriter resolving images into the configured drawable directory.
    pub fn rewriter(&self) -> Rewriter {
        Rewriter::new(self.drawables.clone())
    }

    /// Default log filter when RUST_LOG is unset.
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceFormat;
    use std::fs;
    use tempfile::TempDir;

    fn config(docs: PathBuf, strings: Option<PathBuf>, command: Command) -> Config {
        Config {
            docs,
            strings,
            drawables: DEFAULT_DRAWABLE_DIR.to_string(),
            verbose: false,
            command,
        }
    }

    #[test]
    fn test_parse_render_defaults() {
        // Act
        let config = Config::try_parse_from(["helpview", "render"]).expect("Should parse");

        // Assert
        assert_eq!(config.docs, PathBuf::from("md"));
        assert_eq!(config.drawables, DEFAULT_DRAWABLE_DIR);
        assert!(config.strings.is_none());
        match config.command {
            Command::Render {
                page,
                output,
                standalone,
            } => {
                assert_eq!(page, "home", "Default page should be home");
                assert!(output.is_none());
                assert!(!standalone);
            }
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_options_after_subcommand() {
        // Act
        let config = Config::try_parse_from([
            "helpview",
            "build",
            "-o",
            "site",
            "--docs",
            "help",
            "--drawables",
            "img",
            "-v",
        ])
        .expect("Should parse");

        // Assert
        assert_eq!(config.docs, PathBuf::from("help"));
        assert_eq!(config.drawables, "img");
        assert_eq!(config.log_level(), "debug");
        assert!(matches!(
            config.command,
            Command::Build { ref output, open: false } if output == &PathBuf::from("site")
        ));
    }

    #[test]
    fn test_validate_missing_docs_dir() {
        // Arrange
        let config = config(PathBuf::from("/nonexistent/md"), None, Command::Check);

        // Act
        let result = config.validate();

        // Assert
        assert!(result.is_err(), "Missing docs directory should be rejected");
    }

    #[test]
    fn test_validate_rejects_export_from_strings() {
        // Arrange
        let dir = TempDir::new().expect("Should create temp dir");
        let strings = dir.path().join("strings.xml");
        fs::write(&strings, "<resources/>").expect("Should write");
        let config = config(
            dir.path().to_path_buf(),
            Some(strings),
            Command::Export {
                output: PathBuf::from("out.xml"),
            },
        );

        // Act
        let result = config.validate();

        // Assert
        assert!(result.is_err(), "Export needs markdown pages");
    }

    #[test]
    fn test_source_selects_string_resources() {
        // Arrange
        let dir = TempDir::new().expect("Should create temp dir");
        let strings = dir.path().join("strings.xml");
        fs::write(
            &strings,
            "<resources><string name=\"help_home\">&lt;p&gt;Hi&lt;/p&gt;</string></resources>",
        )
        .expect("Should write");
        let config = config(dir.path().to_path_buf(), Some(strings), Command::Check);

        // Act
        let source = config.source().expect("Should load strings");

        // Assert
        assert_eq!(source.format(), SourceFormat::Html);
        assert_eq!(source.fetch("help_home").expect("Should find"), "<p>Hi</p>");
    }

    #[test]
    fn test_source_defaults_to_markdown_dir() {
        // Arrange
        let dir = TempDir::new().expect("Should create temp dir");
        let config = config(dir.path().to_path_buf(), None, Command::Check);

        // Act
        let source = config.source().expect("Should build source");

        // Assert
        assert_eq!(source.format(), SourceFormat::Markdown);
        assert!(config.validate().is_ok());
    }
}
