/*!
 * Tests for the extraction session cache
 */

use anyhow::Result;
use nextol::notebook_processor::{TitleMatchMode, TitleQuery};
use nextol::session::ExtractionSession;
use crate::common;

/// Test that a fresh session has no file open
#[test]
fn test_session_new_shouldNotBeOpen() {
    let session = ExtractionSession::new();

    assert!(!session.is_open());
    assert!(session.titles().is_empty());
}

/// Test opening a file and discovering its titles
#[test]
fn test_session_open_withSampleNotebook_shouldExposeTitles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let notebook = common::create_test_notebook(&temp_dir.path().to_path_buf(), "notes.txt")?;

    let mut session = ExtractionSession::new();
    session.open(&notebook)?;

    assert!(session.is_open());
    let titles = session.titles();
    assert!(titles.contains("Ein Buch (Autorin, 2020)"));
    assert!(titles.contains("Anderes Werk (Autor, 1999)"));

    Ok(())
}

/// Test that a non-conforming file fails to open and leaves the session
/// without a cached parse
#[test]
fn test_session_open_withNonNotebookFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let bogus = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "not-notes.txt",
        "plain text without separators",
    )?;

    let mut session = ExtractionSession::new();
    assert!(session.open(&bogus).is_err());
    assert!(!session.is_open());

    Ok(())
}

/// Test that the cached parse survives a query that matched nothing, so the
/// user can retry another title without re-reading the file
#[test]
fn test_session_export_withNoMatch_shouldKeepCacheForRetry() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let notebook = common::create_test_notebook(&temp_dir.path().to_path_buf(), "notes.txt")?;

    let mut session = ExtractionSession::new();
    session.open(&notebook)?;

    let miss = TitleQuery::new("Gibt Es Nicht", TitleMatchMode::Literal)?;
    assert!(session.export(&miss).is_none());

    // Still open; a corrected title works without another open() call
    assert!(session.is_open());
    let hit = TitleQuery::new("Ein Buch (Autorin, 2020)", TitleMatchMode::Literal)?;
    let document = session.export(&hit).expect("matching title yields a document");
    assert!(document.contains("Erster Satz des Zitats."));

    Ok(())
}

/// Test that opening a second file replaces the cached parse
#[test]
fn test_session_open_withSecondFile_shouldReplaceCache() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let first = common::create_test_notebook(&dir, "first.txt")?;
    let other_content = common::notebook_content(&[
        common::highlight_fragment("Drittes Buch (Dritter, 2015)", 1, "Neuer Inhalt"),
        common::highlight_fragment("Drittes Buch (Dritter, 2015)", 2, "Noch mehr"),
    ]);
    let second = common::create_test_file(&dir, "second.txt", &other_content)?;

    let mut session = ExtractionSession::new();
    session.open(&first)?;
    session.open(&second)?;

    let titles = session.titles();
    assert_eq!(titles.len(), 1);
    assert!(titles.contains("Drittes Buch (Dritter, 2015)"));

    Ok(())
}

/// Test extract on a session without an open file
#[test]
fn test_session_extract_withoutOpenFile_shouldReturnEmpty() -> Result<()> {
    let session = ExtractionSession::new();
    let query = TitleQuery::new("Egal", TitleMatchMode::Literal)?;

    assert!(session.extract(&query).is_empty());
    assert!(session.export(&query).is_none());

    Ok(())
}
