/*!
 * Tests for file utility functions
 */

use std::path::Path;
use anyhow::Result;
use nextol::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(&temp_dir.path().to_path_buf(), "present.txt", "content")?;

    assert!(FileManager::file_exists(&test_file));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that generate_output_path builds stem + title slug + extension next
/// to the input
#[test]
fn test_generate_output_path_withTitle_shouldCreateSluggedPath() {
    let input_file = Path::new("/tmp/device/notes.txt");

    let output_path =
        FileManager::generate_output_path(input_file, "Ein Buch (Autorin, 2020)", "txt");

    assert_eq!(
        output_path,
        Path::new("/tmp/device/notes.ein-buch-autorin-2020.txt")
    );
}

/// Test that a path without extension gets the configured one appended
#[test]
fn test_ensure_extension_withBarePath_shouldAppendExtension() {
    let path = Path::new("/tmp/out/mynotes");
    assert_eq!(
        FileManager::ensure_extension(path, "txt"),
        Path::new("/tmp/out/mynotes.txt")
    );
}

/// Test that an existing extension is left alone
#[test]
fn test_ensure_extension_withExistingExtension_shouldKeepIt() {
    let path = Path::new("/tmp/out/mynotes.md");
    assert_eq!(
        FileManager::ensure_extension(path, "txt"),
        Path::new("/tmp/out/mynotes.md")
    );
}

/// Test that find_files locates text files recursively
#[test]
fn test_find_files_withNestedTxt_shouldFindIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("deep").join("deeper");
    FileManager::ensure_dir(&nested)?;
    common::create_test_file(&nested, "notes.txt", "x")?;
    common::create_test_file(&temp_dir.path().to_path_buf(), "cover.jpg", "x")?;

    let found = FileManager::find_files(temp_dir.path(), "txt")?;

    assert_eq!(found.len(), 1);
    assert!(found[0].ends_with("deep/deeper/notes.txt"));

    Ok(())
}

/// Test that write_to_file creates missing parent directories
#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("new").join("output.txt");

    FileManager::write_to_file(&target, "document")?;

    assert_eq!(FileManager::read_to_string(&target)?, "document");

    Ok(())
}

/// Test the title slug edge cases
#[test]
fn test_title_slug_withPunctuation_shouldStayFilesystemSafe() {
    let slug = FileManager::title_slug("Ein Buch (Autorin, 2020)");
    assert_eq!(slug, "ein-buch-autorin-2020");

    // No usable characters at all falls back to a fixed name
    assert_eq!(FileManager::title_slug("!!!"), "notes");
}
