use anyhow::{Result, anyhow};
use log::{warn, info, debug};
use std::path::{Path, PathBuf};
use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::notebook_processor::TitleQuery;
use crate::session::ExtractionSession;

// @module: Application controller for notebook extraction

/// Per-invocation options, resolved from the command line
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Title of the book to extract; None is only valid with list_titles
    pub title: Option<String>,

    /// Explicit output path; derived from the input file when absent
    pub output: Option<PathBuf>,

    /// Print discovered titles instead of extracting
    pub list_titles: bool,

    /// Overwrite an existing output file
    pub force_overwrite: bool,
}

/// Main application controller for notebook extraction
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run the main workflow for one input path
    pub fn run(&self, input_path: &Path, options: &ExtractOptions) -> Result<()> {
        let notebook_file = self.resolve_notebook_file(input_path)?;

        let mut session = ExtractionSession::new();
        session.open(&notebook_file)?;

        if options.list_titles {
            return self.list_titles(&session);
        }

        let title = options.title.as_deref().ok_or_else(|| {
            anyhow!("A book title is required; pass --title or use --list-titles to see what the file contains")
        })?;

        let query = TitleQuery::new(title, self.config.match_mode)?;

        let document = session.export(&query).ok_or_else(|| {
            let titles = session.titles();
            if titles.is_empty() {
                anyhow!(
                    "Nothing found for \"{}\" and no titles could be discovered - is this a tolino notes file?",
                    query.title()
                )
            } else {
                anyhow!(
                    "Nothing found for \"{}\". Titles present in the file:\n  {}",
                    query.title(),
                    titles.into_iter().collect::<Vec<_>>().join("\n  ")
                )
            }
        })?;

        let output_path = self.resolve_output_path(&notebook_file, query.title(), options);

        if output_path.exists() && !options.force_overwrite {
            warn!(
                "Skipping, output file already exists (use -f to force overwrite): {:?}",
                output_path
            );
            return Ok(());
        }

        FileManager::write_to_file(&output_path, &document)?;
        info!("Saved notes for \"{}\" to {:?}", query.title(), output_path);

        Ok(())
    }

    /// Print the titles discovered in the open file
    fn list_titles(&self, session: &ExtractionSession) -> Result<()> {
        let titles = session.titles();
        if titles.is_empty() {
            warn!("No \"Title (Author, Year)\" entries discovered in this file");
            return Ok(());
        }
        for title in titles {
            println!("{}", title);
        }
        Ok(())
    }

    /// Resolve the notebook file from a file or directory input
    fn resolve_notebook_file(&self, input_path: &Path) -> Result<PathBuf> {
        if FileManager::file_exists(input_path) {
            return Ok(input_path.to_path_buf());
        }

        if !FileManager::dir_exists(input_path) {
            return Err(anyhow!("Input path does not exist: {:?}", input_path));
        }

        let candidates = FileManager::find_files(input_path, "txt")?;
        debug!("Found {} .txt candidates in {:?}", candidates.len(), input_path);

        if candidates.is_empty() {
            return Err(anyhow!("No .txt notebook file found in {:?}", input_path));
        }

        // The tolino stores its export as notes.txt; prefer that name when
        // the directory holds several text files
        if let Some(notes) = candidates.iter().find(|p| {
            p.file_name()
                .map(|n| n.eq_ignore_ascii_case("notes.txt"))
                .unwrap_or(false)
        }) {
            return Ok(notes.clone());
        }

        if candidates.len() == 1 {
            return Ok(candidates[0].clone());
        }

        Err(anyhow!(
            "Several .txt files found in {:?}, pass one of them explicitly:\n  {}",
            input_path,
            candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join("\n  ")
        ))
    }

    /// Resolve where the formatted document gets written
    fn resolve_output_path(
        &self,
        notebook_file: &Path,
        title: &str,
        options: &ExtractOptions,
    ) -> PathBuf {
        match &options.output {
            Some(path) => FileManager::ensure_extension(path, &self.config.output.extension),
            None => FileManager::generate_output_path(
                notebook_file,
                title,
                &self.config.output.extension,
            ),
        }
    }
}
