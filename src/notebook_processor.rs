use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};
use crate::errors::NotebookError;
use crate::file_utils::FileManager;

// @module: tolino notebook parsing and record selection

// @const: Record separator used by the tolino notes export,
// a 35-dash line flanked by line breaks
pub const RECORD_SEPARATOR: &str =
    "\n-----------------------------------\n";

// @const: "Title (Author, Year)" shaped substring, non-greedy
static TITLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r".+? \(.+?, .+?\)").expect("Invalid title regex")
});

// @const: Annotation kind marker plus page reference.
// The \u{a0} (non-breaking space) is part of the export format.
static KIND_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(Markierung|Notiz|Lesezeichen)\u{a0}auf Seite (\d+)")
        .expect("Invalid kind regex")
});

/// The three annotation kinds a tolino stores. The German labels are fixed
/// by the export format and intentionally not localized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    /// A highlighted excerpt ("Markierung")
    Highlight,
    /// A note attached to a passage ("Notiz")
    Note,
    /// A bare bookmark ("Lesezeichen"), carries no user content
    Bookmark,
}

impl AnnotationKind {
    /// The long marker label as it appears in the export
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Highlight => "Markierung\u{a0}auf Seite",
            Self::Note => "Notiz\u{a0}auf Seite",
            Self::Bookmark => "Lesezeichen\u{a0}auf Seite",
        }
    }

    /// The shortened label used in formatted output. Bookmarks are dropped
    /// before formatting, so they keep their long form.
    pub fn short_marker(&self) -> &'static str {
        match self {
            Self::Highlight => "S.",
            Self::Note => "Notiz S.",
            Self::Bookmark => "Lesezeichen\u{a0}auf Seite",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "Markierung" => Some(Self::Highlight),
            "Notiz" => Some(Self::Note),
            "Lesezeichen" => Some(Self::Bookmark),
            _ => None,
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Highlight => "highlight",
            Self::Note => "note",
            Self::Bookmark => "bookmark",
        };
        write!(f, "{}", name)
    }
}

// @struct: One annotation record parsed into its schema roles
#[derive(Debug, Clone)]
pub struct AnnotationRecord {
    // @field: Annotation kind from the marker line
    pub kind: AnnotationKind,

    // @field: Page number from the marker line
    pub page: u32,

    // @field: The "Title (Author, Year)" line
    pub source: String,

    // @field: Content lines between header and date footer
    pub body: String,

    // @field: Trailing "Hinzugefügt am ..." metadata line
    pub added_on: String,
}

impl AnnotationRecord {
    /// Parse one raw record into its schema roles.
    ///
    /// Expected shape after splitting: a blank line, the title/author line,
    /// the marker and content lines, then a trailing date line (a blank line
    /// directly before it is treated as part of the footer). Records that do
    /// not fit the schema fail with [`NotebookError::MalformedRecord`]
    /// instead of being silently truncated.
    pub fn parse(raw: &str) -> Result<Self, NotebookError> {
        let lines: Vec<&str> = raw.split('\n').collect();
        if lines.len() < 4 {
            return Err(NotebookError::MalformedRecord {
                reason: format!("expected at least 4 lines, got {}", lines.len()),
            });
        }

        let caps = KIND_REGEX.captures(raw).ok_or_else(|| {
            NotebookError::MalformedRecord {
                reason: "no annotation kind marker found".to_string(),
            }
        })?;

        let kind = AnnotationKind::from_label(&caps[1]).ok_or_else(|| {
            NotebookError::MalformedRecord {
                reason: format!("unknown annotation kind label: {}", &caps[1]),
            }
        })?;

        let page: u32 = caps[2].parse().map_err(|_| {
            NotebookError::MalformedRecord {
                reason: format!("page reference is not a number: {}", &caps[2]),
            }
        })?;

        // First line is the blank split artifact, second the title/author
        // line, the last two the footer. What is left in between is body.
        let body = lines[2..lines.len() - 2].join("\n");

        // The footer is the date line plus the blank the separator leaves
        // behind; which of the two is blank depends on where the record sat
        // in the file
        let footer = &lines[lines.len() - 2..];
        let added_on = footer
            .iter()
            .rev()
            .find(|l| !l.trim().is_empty())
            .copied()
            .unwrap_or("")
            .to_string();

        Ok(AnnotationRecord {
            kind,
            page,
            source: lines[1].to_string(),
            body,
            added_on,
        })
    }

    /// Kind detection over a raw record without a full schema parse.
    /// Best-effort; returns None when no marker is present.
    pub fn detect_kind(raw: &str) -> Option<AnnotationKind> {
        KIND_REGEX
            .captures(raw)
            .and_then(|caps| AnnotationKind::from_label(&caps[1]))
    }
}

/// How a title query is matched against record text.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TitleMatchMode {
    /// Plain substring search. Safe for titles containing regex
    /// metacharacters (parentheses, dots, brackets).
    #[default]
    Literal,
    /// The title string is compiled as a regex. Explicit opt-in, since
    /// a regex applied to an arbitrary title over- or under-matches on
    /// metacharacters.
    Pattern,
}

impl fmt::Display for TitleMatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal => write!(f, "literal"),
            Self::Pattern => write!(f, "pattern"),
        }
    }
}

impl std::str::FromStr for TitleMatchMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "literal" => Ok(Self::Literal),
            "pattern" => Ok(Self::Pattern),
            _ => Err(anyhow::anyhow!("Invalid match mode: {}", s)),
        }
    }
}

/// A validated, compiled title query.
#[derive(Debug, Clone)]
pub struct TitleQuery {
    title: String,
    matcher: TitleMatcher,
}

#[derive(Debug, Clone)]
enum TitleMatcher {
    Literal(String),
    Pattern(Regex),
}

impl TitleQuery {
    /// Build a query for the given title. Empty or whitespace-only titles
    /// are rejected here so an empty string never means "match everything".
    pub fn new(title: &str, mode: TitleMatchMode) -> Result<Self, NotebookError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(NotebookError::EmptyTitle);
        }

        let matcher = match mode {
            TitleMatchMode::Literal => TitleMatcher::Literal(trimmed.to_string()),
            TitleMatchMode::Pattern => {
                let regex = Regex::new(trimmed).map_err(|e| {
                    NotebookError::InvalidTitlePattern {
                        pattern: trimmed.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                TitleMatcher::Pattern(regex)
            }
        };

        Ok(TitleQuery {
            title: trimmed.to_string(),
            matcher,
        })
    }

    /// The title as the user entered it (trimmed), used for the output header
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether a record's text matches this query
    pub fn is_match(&self, record: &str) -> bool {
        match &self.matcher {
            TitleMatcher::Literal(needle) => record.contains(needle.as_str()),
            TitleMatcher::Pattern(regex) => regex.is_match(record),
        }
    }
}

/// The split records of one opened notebook file.
#[derive(Debug)]
pub struct NotebookCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// Annotation records in file order, each a raw text block
    pub records: Vec<String>,
}

impl NotebookCollection {
    /// Open a notebook file and split it into records
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)?;
        let records = Self::parse_notebook_string(&content)?;

        debug!("Split {:?} into {} records", path, records.len());

        Ok(NotebookCollection {
            source_file: path.to_path_buf(),
            records,
        })
    }

    /// Split raw notebook content into annotation records.
    ///
    /// An optional UTF-8 byte order mark is stripped first. The first record
    /// lacks the leading blank line the separator contributes to all others,
    /// so one is prepended to give every record the same shape. Input with
    /// zero separators is not a tolino notebook and fails with
    /// [`NotebookError::MissingSeparator`] rather than being treated as one
    /// giant record.
    pub fn parse_notebook_string(content: &str) -> Result<Vec<String>, NotebookError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        if !content.contains(RECORD_SEPARATOR) {
            return Err(NotebookError::MissingSeparator);
        }

        let mut records: Vec<String> = content
            .split(RECORD_SEPARATOR)
            .map(|r| r.to_string())
            .collect();

        // Fit the first record to the pattern of the other records
        records[0].insert(0, '\n');

        Ok(records)
    }

    /// Distinct "Title (Author, Year)" substrings found across the records.
    ///
    /// Discovery is best-effort: the first shaped match per record is
    /// collected, records without one are skipped. The result exists to help
    /// a human pick a title, so a stable sorted order is used for display.
    pub fn discover_titles(&self) -> BTreeSet<String> {
        let mut titles = BTreeSet::new();
        for record in &self.records {
            if let Some(m) = TITLE_REGEX.find(record) {
                titles.insert(m.as_str().to_string());
            }
        }
        titles
    }

    /// Records whose text matches the query, in original file order.
    ///
    /// An empty result means "nothing found" and is the caller's signal to
    /// report that; it is not an error.
    pub fn filter_by_title(&self, query: &TitleQuery) -> Vec<String> {
        self.records
            .iter()
            .filter(|record| query.is_match(record))
            .cloned()
            .collect()
    }
}

impl fmt::Display for NotebookCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Notebook Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Records: {}", self.records.len())?;
        Ok(())
    }
}
