/*!
 * Extraction session owning the cached parse of one notebook file.
 *
 * The split records of the currently open file are kept in memory and reused
 * across repeated title queries, including queries that matched nothing.
 * Opening a different file replaces the cache.
 */

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Result;
use log::debug;

use crate::formatter;
use crate::notebook_processor::{NotebookCollection, TitleQuery};

/// Session state for one opened notebook file.
#[derive(Debug, Default)]
pub struct ExtractionSession {
    notebook: Option<NotebookCollection>,
}

impl ExtractionSession {
    /// Create a session with no file open yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a notebook file, replacing any previously cached parse
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let notebook = NotebookCollection::open(path)?;
        debug!("Session now holds {} records", notebook.records.len());
        self.notebook = Some(notebook);
        Ok(())
    }

    /// Whether a file is currently open
    pub fn is_open(&self) -> bool {
        self.notebook.is_some()
    }

    /// The currently open notebook, if any
    pub fn notebook(&self) -> Option<&NotebookCollection> {
        self.notebook.as_ref()
    }

    /// Titles discovered in the open file; empty when no file is open
    pub fn titles(&self) -> BTreeSet<String> {
        self.notebook
            .as_ref()
            .map(|n| n.discover_titles())
            .unwrap_or_default()
    }

    /// Records matching the query, in file order
    pub fn extract(&self, query: &TitleQuery) -> Vec<String> {
        self.notebook
            .as_ref()
            .map(|n| n.filter_by_title(query))
            .unwrap_or_default()
    }

    /// Extract and format in one step.
    ///
    /// Returns None when the query matched no record ("nothing found"); the
    /// cached parse stays valid so the caller can retry with another title
    /// without re-reading the file.
    pub fn export(&self, query: &TitleQuery) -> Option<String> {
        let matched = self.extract(query);
        if matched.is_empty() {
            return None;
        }
        Some(formatter::format_document(&matched, query.title()))
    }
}
