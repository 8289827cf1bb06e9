// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::PathBuf;
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use crate::app_controller::{Controller, ExtractOptions};
use crate::notebook_processor::TitleMatchMode;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod formatter;
mod notebook_processor;
mod session;

/// CLI Wrapper for TitleMatchMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliMatchMode {
    Literal,
    Pattern,
}

impl From<CliMatchMode> for TitleMatchMode {
    fn from(cli_mode: CliMatchMode) -> Self {
        match cli_mode {
            CliMatchMode::Literal => TitleMatchMode::Literal,
            CliMatchMode::Pattern => TitleMatchMode::Pattern,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract the marks and notes of one book (default command)
    Extract(ExtractArgs),

    /// List the book titles discovered in a notes file
    Titles {
        /// Notes file or directory containing one
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: String,
    },

    /// Generate shell completions for nextol
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ExtractArgs {
    /// Notes file or directory containing one
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Title of the book whose marks and notes to extract
    #[arg(short, long)]
    title: Option<String>,

    /// Output file path (derived from the input file when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List discovered titles instead of extracting
    #[arg(short, long)]
    list_titles: bool,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,

    /// How the title is matched against records
    #[arg(short, long, value_enum)]
    match_mode: Option<CliMatchMode>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// nextol - tolino notes extractor
///
/// Extracts and formats the marks and notes of a specific ebook from the
/// notes file exported by tolino e-readers.
#[derive(Parser, Debug)]
#[command(name = "nextol")]
#[command(version = "1.0.0")]
#[command(about = "Extract the marks and notes of one ebook from a tolino notes file")]
#[command(long_about = "nextol extracts and formats all marks and notes of a specific ebook from
the notes.txt file a tolino e-reader keeps on its storage.

EXAMPLES:
    nextol notes.txt -l                         # List books present in the file
    nextol notes.txt -t \"Ein Buch (Autorin, 2020)\"
    nextol notes.txt -t \"Ein Buch\" -o buch-notizen
    nextol /media/tolino -t \"Ein Buch\"          # Locate notes.txt on the device
    nextol -m pattern notes.txt -t \"Buch.*2020\" # Opt in to regex matching
    nextol completions bash > nextol.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Notes file or directory containing one
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Title of the book whose marks and notes to extract
    #[arg(short, long)]
    title: Option<String>,

    /// Output file path (derived from the input file when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List discovered titles instead of extracting
    #[arg(short, long)]
    list_titles: bool,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,

    /// How the title is matched against records
    #[arg(short, long, value_enum)]
    match_mode: Option<CliMatchMode>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "nextol", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Titles {
            input_path,
            config_path,
        }) => {
            let args = ExtractArgs {
                input_path,
                title: None,
                output: None,
                list_titles: true,
                force_overwrite: false,
                match_mode: None,
                config_path,
                log_level: None,
            };
            run_extract(args)
        }
        Some(Commands::Extract(args)) => run_extract(args),
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let extract_args = ExtractArgs {
                input_path,
                title: cli.title,
                output: cli.output,
                list_titles: cli.list_titles,
                force_overwrite: cli.force_overwrite,
                match_mode: cli.match_mode,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_extract(extract_args)
        }
    }
}

fn run_extract(options: ExtractArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        // Override config with CLI options if provided
        if let Some(match_mode) = &options.match_mode {
            config.match_mode = match_mode.clone().into();
        }

        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();

        if let Some(match_mode) = &options.match_mode {
            config.match_mode = match_mode.clone().into();
        }

        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    // Create controller and run the extraction
    let controller = Controller::with_config(config)?;

    let extract_options = ExtractOptions {
        title: options.title,
        output: options.output,
        list_titles: options.list_titles,
        force_overwrite: options.force_overwrite,
    };

    controller.run(&options.input_path, &extract_options)
}
