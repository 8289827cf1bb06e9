/*!
 * Formatting of matched annotation records into the export document.
 *
 * Takes the raw record blocks selected for one book and produces a single
 * normalized text document: a title banner, then each highlight or note
 * body separated by blank lines. Bookmarks are dropped (they carry no user
 * content), the long German marker labels are shortened, and the date and
 * title/author boilerplate around each body is stripped. Pure string
 * transformation; no file I/O happens here.
 */

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::notebook_processor::{AnnotationKind, AnnotationRecord};

// Stray space before the closing quote of an excerpt. Anchored to the line
// end so the space before an opening quote is left alone.
static TRAILING_QUOTE_SPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m) "$"#).expect("Invalid quote cleanup regex"));

/// Format the matched records of one book into the final document.
///
/// The caller is expected to have checked for an empty match result already
/// ("nothing found" is reported upstream, not here), but an empty slice
/// still yields a valid header-only document rather than panicking.
///
/// Formatting is a pure function of its inputs: the same records and title
/// always produce byte-identical output.
pub fn format_document(records: &[String], title: &str) -> String {
    let header = format!("Markierungen und Notizen aus \"{}\":", title);

    // Dash rule exactly as wide as the banner, then two blank lines
    let mut text = format!("{}\n{}\n\n\n", header, "-".repeat(header.chars().count()));

    for record in records {
        if let Some(body) = format_record(record) {
            text.push_str(&body);
            text.push_str("\n\n");
        }
    }

    text
}

/// Format a single record body, or None when the record is a bookmark.
///
/// Records that do not fit the expected schema produce an empty body with a
/// warning instead of aborting the whole export.
fn format_record(record: &str) -> Option<String> {
    if AnnotationRecord::detect_kind(record) == Some(AnnotationKind::Bookmark) {
        return None;
    }

    match AnnotationRecord::parse(record) {
        Ok(parsed) => Some(normalize_body(&parsed.body)),
        Err(e) => {
            warn!("Emitting empty body for unparseable record: {}", e);
            Some(String::new())
        }
    }
}

/// Shorten the long marker labels and clean up stray spaces before closing
/// quotation marks in the excerpt text.
fn normalize_body(body: &str) -> String {
    let body = body.replace(
        AnnotationKind::Highlight.marker(),
        AnnotationKind::Highlight.short_marker(),
    );
    let body = body.replace(
        AnnotationKind::Note.marker(),
        AnnotationKind::Note.short_marker(),
    );
    // Cosmetic only: the export sometimes puts a space before the closing
    // quote of an excerpt
    TRAILING_QUOTE_SPACE_REGEX.replace_all(&body, "\"").into_owned()
}
