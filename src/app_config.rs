use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::notebook_processor::TitleMatchMode;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// How entered titles are matched against records
    #[serde(default)]
    pub match_mode: TitleMatchMode,

    /// Output file settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Configuration for the exported document file
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Extension appended when a chosen output path lacks one
    #[serde(default = "default_output_extension")]
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: default_output_extension(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_output_extension() -> String {
    "txt".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.output.extension.trim().is_empty() {
            return Err(anyhow!("Output extension must not be empty"));
        }
        if self.output.extension.starts_with('.') {
            return Err(anyhow!(
                "Output extension must not include the leading dot: {}",
                self.output.extension
            ));
        }
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            match_mode: TitleMatchMode::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
