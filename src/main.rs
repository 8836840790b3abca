// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use wordbank::app_config::{Config, LogLevel};
use wordbank::database::{DatabaseConnection, JournalMode};
use wordbank::file_utils::FileManager;
use wordbank::ingest::{JsonFileSource, Pipeline, SqliteStore};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for JournalMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliJournalMode {
    Wal,
    Delete,
    Memory,
}

impl From<CliJournalMode> for JournalMode {
    fn from(cli_mode: CliJournalMode) -> Self {
        match cli_mode {
            CliJournalMode::Wal => JournalMode::Wal,
            CliJournalMode::Delete => JournalMode::Delete,
            CliJournalMode::Memory => JournalMode::Memory,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for wordbank
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// wordbank - load vocabulary files into SQLite
///
/// Reads every input file concurrently and writes the words, translations
/// and phrases into one database, skipping files that cannot be parsed.
#[derive(Parser, Debug)]
#[command(name = "wordbank")]
#[command(version)]
#[command(about = "Concurrent vocabulary ingestion into SQLite")]
#[command(long_about = "wordbank reads JSON vocabulary files in parallel and stores them in SQLite.

EXAMPLES:
    wordbank words/cet4.json words/cet6.json    # Ingest two files
    wordbank ./json                             # Ingest every .json file under ./json
    wordbank -d vocab.db ./json                 # Write to a specific database
    wordbank --commit-every 500 ./json          # Smaller transactions
    wordbank completions bash > wordbank.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. Input paths given on the command line replace
    the configured inputs.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input files or directories to ingest
    #[arg(value_name = "INPUT_PATH")]
    inputs: Vec<PathBuf>,

    /// SQLite database file
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Word records per transaction
    #[arg(long)]
    commit_every: Option<usize>,

    /// Split each file into batches of this many records
    #[arg(long)]
    chunk_size: Option<usize>,

    /// SQLite journal mode
    #[arg(long, value_enum)]
    journal_mode: Option<CliJournalMode>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Tag and ANSI colour for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "1;31"),
            Level::Warn => ("WARN ", "1;33"),
            Level::Info => ("INFO ", "1;32"),
            Level::Debug => ("DEBUG", "1;36"),
            Level::Trace => ("TRACE", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (tag, colour) = Self::style_for_level(record.level());

            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                colour,
                now,
                tag,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info by default; the config may lower or raise it once loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "wordbank", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        log::set_max_level(LogLevel::from(level.clone()).to_level_filter());
    }

    let config = load_config(&cli)?;
    config.validate().context("Configuration validation failed")?;

    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    run_ingest(config).await
}

// Load the config file and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config_path)?;

    if !cli.inputs.is_empty() {
        config.inputs = cli.inputs.clone();
    }

    if let Some(database) = &cli.database {
        config.database_path = database.clone();
    }

    if let Some(commit_every) = cli.commit_every {
        config.commit_every = commit_every;
    }

    if cli.chunk_size.is_some() {
        config.chunk_size = cli.chunk_size;
    }

    if let Some(mode) = &cli.journal_mode {
        config.journal_mode = mode.clone().into();
    }

    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }

    Ok(config)
}

async fn run_ingest(config: Config) -> Result<()> {
    if config.inputs.is_empty() {
        return Err(anyhow!(
            "No inputs given. Pass INPUT_PATH arguments or set \"inputs\" in the config file"
        ));
    }

    let files = FileManager::collect_inputs(&config.inputs, &config.input_extension)?;
    if files.is_empty() {
        warn!("No .{} files found in the given inputs", config.input_extension);
        return Ok(());
    }

    info!("Found {} input files", files.len());

    let db = DatabaseConnection::open(&config.database_path, config.journal_mode)?;
    let pipeline = Pipeline::new(config.pipeline_options());

    let report = pipeline
        .run(SqliteStore::new(db.clone()), JsonFileSource::from_paths(&files))
        .await
        .context("Ingestion failed")?;

    for unit in report.skipped_units() {
        warn!("Skipped: {}", unit);
    }

    println!("{}", report);
    println!("{}", db.stats()?);

    Ok(())
}
