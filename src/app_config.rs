use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::database::JournalMode;
use crate::ingest::{PipelineOptions, DEFAULT_COMMIT_EVERY};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Files or directories to ingest
    #[serde(default)]
    pub inputs: Vec<PathBuf>,

    /// Extension of the files picked up from directories
    #[serde(default = "default_input_extension")]
    pub input_extension: String,

    /// Word records per transaction
    #[serde(default = "default_commit_every")]
    pub commit_every: usize,

    /// Optional sub-batch size per reader
    #[serde(default)]
    pub chunk_size: Option<usize>,

    /// SQLite journal mode
    #[serde(default)]
    pub journal_mode: JournalMode,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
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

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./data.db")
}

fn default_input_extension() -> String {
    "json".to_string()
}

fn default_commit_every() -> usize {
    DEFAULT_COMMIT_EVERY
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load the configuration, writing a default file first when none exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        log::warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Save configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(anyhow!("Database path must not be empty"));
        }

        if self.commit_every == 0 {
            return Err(anyhow!("commit_every must be at least 1"));
        }

        if self.chunk_size == Some(0) {
            return Err(anyhow!("chunk_size must be at least 1 when set"));
        }

        if self.input_extension.trim_start_matches('.').is_empty() {
            return Err(anyhow!("input_extension must not be empty"));
        }

        Ok(())
    }

    /// Pipeline settings derived from this configuration
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            commit_every: self.commit_every,
            chunk_size: self.chunk_size,
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: default_database_path(),
            inputs: Vec::new(),
            input_extension: default_input_extension(),
            commit_every: default_commit_every(),
            chunk_size: None,
            journal_mode: JournalMode::default(),
            log_level: LogLevel::default(),
        }
    }
}
