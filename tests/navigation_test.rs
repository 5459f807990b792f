//! Navigation tests for the help viewer.
//!
//! Covers page resolution with fallback, link interception and history
//! replay against markdown directories and string resources.

mod common;

use anyhow::Result;
use helpview::{
    Click, HelpError, HistoryEntry, MarkdownDir, NavState, Navigator, Rewriter, StringResources,
};

fn markdown_navigator(dir: &std::path::Path) -> Navigator<MarkdownDir> {
    Navigator::new(MarkdownDir::new(dir), Rewriter::new("res/drawable-mdpi"))
}

/// Tests that an existing primary document is used without the fallback.
#[test]
fn test_primary_document_wins() -> Result<()> {
    // Arrange
    let dir = common::create_help_dir(&common::sample_pages())?;
    let mut nav = markdown_navigator(dir.path());

    // Act
    let page = nav.display("faq")?;

    // Assert
    assert_eq!(page.key(), "faq");
    assert!(page.html().contains("<h1>FAQ</h1>"), "Got: {}", page.html());
    assert!(!page.html().contains("Stale"), "Fallback should not be read");

    Ok(())
}

/// Tests first load with no history state renders help_home.
#[test]
fn test_start_without_state_shows_home() -> Result<()> {
    // Arrange
    let dir = common::create_help_dir(&common::sample_pages())?;
    let mut nav = markdown_navigator(dir.path());

    // Act
    let page = nav.start(None)?;

    // Assert
    assert_eq!(page.id(), "home");
    assert_eq!(page.key(), "help_home");
    let html = page.html();
    assert!(
        html.contains("src=\"res/drawable-mdpi/ic_launcher.png\""),
        "Image rewritten into drawable dir: {}",
        html
    );
    assert!(html.contains("style=\"height: 1.5em\""), "Scale kept: {}", html);
    assert!(
        html.contains("href=\"https://fasola.org\" target=\"_blank\""),
        "External link opens in new context: {}",
        html
    );

    Ok(())
}

/// Tests reload on a pushed state displays that state's page.
#[test]
fn test_start_with_pushed_state() -> Result<()> {
    // Arrange
    let dir = common::create_help_dir(&common::sample_pages())?;
    let mut nav = markdown_navigator(dir.path());

    // Act
    let page = nav.start(Some(HistoryEntry::new("about")))?;

    // Assert
    assert_eq!(page.key(), "help_about");
    assert_eq!(nav.history().state().map(HistoryEntry::id), Some("about"));

    Ok(())
}

/// Tests a missing page fails with DocumentNotFound and keeps content.
#[test]
fn test_missing_page_is_not_found() -> Result<()> {
    // Arrange
    let dir = common::create_help_dir(&common::sample_pages())?;
    let mut nav = markdown_navigator(dir.path());
    nav.start(None)?;

    // Act
    let result = nav.display("nowhere");

    // Assert
    match result {
        Err(HelpError::DocumentNotFound { id }) => assert_eq!(id, "nowhere"),
        other => panic!("Expected DocumentNotFound, got {:?}", other.map(|p| p.id().to_string())),
    }
    assert!(matches!(nav.state(), NavState::Failed { .. }));
    assert_eq!(nav.page().map(|p| p.id()), Some("home"), "Prior content remains");

    Ok(())
}

/// Tests link clicks: internal links push history, external ones do not.
#[test]
fn test_link_clicks_and_history() -> Result<()> {
    // Arrange
    let dir = common::create_help_dir(&common::sample_pages())?;
    let mut nav = markdown_navigator(dir.path());
    nav.start(None)?;

    // Act: external link
    let external = nav.click("https://fasola.org")?;

    // Assert
    assert!(matches!(external, Click::External { .. }));
    assert_eq!(nav.history().len(), 1, "External click pushes nothing");

    // Act: internal links
    let first = nav.click("faq")?;
    let second = nav.click("about")?;

    // Assert
    assert_eq!(
        first,
        Click::Navigated {
            entry: HistoryEntry::new("faq")
        }
    );
    assert_eq!(
        second,
        Click::Navigated {
            entry: HistoryEntry::new("about")
        }
    );
    assert_eq!(nav.history().len(), 3);
    assert_eq!(nav.history().state().map(HistoryEntry::url), Some("?page=about"));
    assert_eq!(nav.page().map(|p| p.key()), Some("help_about"));

    // Act: back twice replays without pushing
    assert!(nav.back()?);
    assert_eq!(nav.page().map(|p| p.id()), Some("faq"));
    assert!(nav.back()?);
    assert_eq!(nav.page().map(|p| p.id()), Some("home"));
    assert_eq!(nav.history().len(), 3, "Back does not push");

    Ok(())
}

/// Tests popstate carrying {id: "faq"} re-renders faq without a push.
#[test]
fn test_popstate_rerenders() -> Result<()> {
    // Arrange
    let dir = common::create_help_dir(&common::sample_pages())?;
    let mut nav = markdown_navigator(dir.path());
    nav.start(None)?;

    // Act
    let page = nav.popstate(Some(&HistoryEntry::new("faq")))?;

    // Assert
    assert_eq!(page.key(), "faq");
    assert_eq!(nav.history().len(), 1);

    Ok(())
}

/// Tests the navigator over string resources (no percent decoding).
#[test]
fn test_string_resource_navigation() -> Result<()> {
    // Arrange
    let dir = tempfile::TempDir::new()?;
    common::write_file(
        dir.path(),
        "values/strings.xml",
        r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="help_home" formatted="false"><![CDATA[
<h1>Home</h1><p><img src="ic_play|50%"> <a href="faq">FAQ</a></p>
]]></string>
    <string name="help_faq" formatted="false"><![CDATA[<h1>FAQ</h1>]]></string>
</resources>
"#,
    )?;
    let source = StringResources::load(dir.path().join("values/strings.xml"))?;
    let mut nav = Navigator::new(source, Rewriter::new("drawable"));

    // Act
    let home = nav.start(None)?.html();
    let click = nav.click("faq")?;

    // Assert
    assert!(home.contains("src=\"drawable/ic_play.png\""), "Got: {}", home);
    assert!(matches!(click, Click::Navigated { .. }));
    assert!(nav.page().map(|p| p.html()).unwrap_or_default().contains("<h1>FAQ</h1>"));

    Ok(())
}
