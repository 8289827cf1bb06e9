/*!
 * End-to-end tests for the open -> discover -> filter -> format pipeline
 */

use anyhow::Result;
use nextol::formatter::format_document;
use nextol::notebook_processor::{NotebookCollection, TitleMatchMode, TitleQuery};
use nextol::errors::NotebookError;
use crate::common;

/// Test the whole pipeline from file on disk to formatted document
#[test]
fn test_pipeline_withSampleNotebook_shouldProduceCleanDocument() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let notebook_path = common::create_test_notebook(&temp_dir.path().to_path_buf(), "notes.txt")?;

    let collection = NotebookCollection::open(&notebook_path)?;
    assert_eq!(collection.records.len(), 4);

    let titles = collection.discover_titles();
    assert_eq!(titles.len(), 2);

    let query = TitleQuery::new("Ein Buch (Autorin, 2020)", TitleMatchMode::Literal)?;
    let matched = collection.filter_by_title(&query);
    assert_eq!(matched.len(), 3);

    let document = format_document(&matched, query.title());

    assert!(document.starts_with("Markierungen und Notizen aus \"Ein Buch (Autorin, 2020)\":"));
    assert!(document.contains("S. 5: \"Erster Satz des Zitats.\""));
    assert!(document.contains("Notiz S. 8: Wichtige Stelle"));
    assert!(!document.contains("Lesezeichen"));
    assert!(!document.contains("Hinzugef\u{fc}gt am"));
    // Records from the other book never leak in
    assert!(!document.contains("Ganz anderer Text."));

    Ok(())
}

/// Test that a BOM written by the device does not disturb the pipeline
#[test]
fn test_pipeline_withBomFile_shouldParseNormally() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = format!("\u{feff}{}", common::sample_notebook());
    let notebook_path =
        common::create_test_file(&temp_dir.path().to_path_buf(), "notes.txt", &content)?;

    let collection = NotebookCollection::open(&notebook_path)?;
    assert_eq!(collection.records.len(), 4);
    assert!(collection
        .discover_titles()
        .contains("Ein Buch (Autorin, 2020)"));

    Ok(())
}

/// Test that opening a file without separators fails with the typed error
#[test]
fn test_pipeline_withNonNotebookFile_shouldFailWithMissingSeparator() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let bogus = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "random.txt",
        "some random file\nwith lines\n",
    )?;

    let error = NotebookCollection::open(&bogus).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<NotebookError>(),
        Some(NotebookError::MissingSeparator)
    ));

    Ok(())
}

/// Test that an unmatched title stops the flow before the formatter
#[test]
fn test_pipeline_withUnknownTitle_shouldSignalNothingFound() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let notebook_path = common::create_test_notebook(&temp_dir.path().to_path_buf(), "notes.txt")?;

    let collection = NotebookCollection::open(&notebook_path)?;
    let query = TitleQuery::new("Niemand Kennt Dieses Buch", TitleMatchMode::Literal)?;

    // Empty result is the "nothing found" sentinel; the caller must not
    // invoke the formatter in this case
    assert!(collection.filter_by_title(&query).is_empty());

    Ok(())
}

/// Test that the same parse serves several title queries in one session
#[test]
fn test_pipeline_withRepeatedQueries_shouldReuseParse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let notebook_path = common::create_test_notebook(&temp_dir.path().to_path_buf(), "notes.txt")?;

    let collection = NotebookCollection::open(&notebook_path)?;

    let first = TitleQuery::new("Ein Buch (Autorin, 2020)", TitleMatchMode::Literal)?;
    let second = TitleQuery::new("Anderes Werk (Autor, 1999)", TitleMatchMode::Literal)?;

    assert_eq!(collection.filter_by_title(&first).len(), 3);
    assert_eq!(collection.filter_by_title(&second).len(), 1);

    // Filtering never mutates the cached records
    assert_eq!(collection.records.len(), 4);

    Ok(())
}
