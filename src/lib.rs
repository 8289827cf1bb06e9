/*!
 * # nextol - tolino notes extractor
 *
 * A Rust library for extracting the marks and notes of one ebook from the
 * flat notes export of a tolino e-reader.
 *
 * ## Features
 *
 * - Split a tolino notes file into its annotation records
 * - Discover which books have annotations in the file
 * - Filter records by book title (literal substring by default, regex as
 *   an explicit opt-in)
 * - Format the matched highlights and notes into a clean text document
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `notebook_processor`: Notebook splitting, title discovery and filtering
 * - `formatter`: Rendering matched records into the export document
 * - `session`: Cached parse of the currently open notebook file
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod notebook_processor;
pub mod formatter;
pub mod session;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use notebook_processor::{
    AnnotationKind, AnnotationRecord, NotebookCollection, TitleMatchMode, TitleQuery,
};
pub use session::ExtractionSession;
pub use app_controller::{Controller, ExtractOptions};
pub use errors::{AppError, NotebookError};
