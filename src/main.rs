// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use cms_migrate::app_config::{self, Config};
use cms_migrate::database::{DatabaseConnection, Repository};
use cms_migrate::{ContentImageRewriter, VersionPublisher};

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rewrite <img> tags in content tables into [image] shortcodes
    RewriteImages(RewriteArgs),

    /// Publish versioned records that have no live version yet
    PublishVersions(PublishArgs),

    /// Generate shell completions for cms-migrate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct RewriteArgs {
    /// Content table to scan (repeatable, replaces the configured list)
    #[arg(short, long = "table", value_name = "TABLE")]
    tables: Vec<String>,

    /// Log the rows that would change without writing them
    #[arg(long)]
    dry_run: bool,
}

#[derive(Parser, Debug)]
struct PublishArgs {
    /// Record type to publish (repeatable, replaces the configured list)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    record_types: Vec<String>,
}

/// cms-migrate - one-shot CMS upgrade migrations
///
/// Rewrites legacy image tags for hash-partitioned asset storage and
/// publishes draft-only records of newly versioned types.
#[derive(Parser, Debug)]
#[command(name = "cms-migrate")]
#[command(author = "cms-migrate Team")]
#[command(version = "1.0.0")]
#[command(about = "One-shot CMS upgrade migrations")]
#[command(long_about = "cms-migrate runs the content migrations needed after upgrading to hashed asset storage.

EXAMPLES:
    cms-migrate rewrite-images                      # Rewrite images in the configured tables
    cms-migrate rewrite-images --dry-run            # Show which rows would change
    cms-migrate rewrite-images -t SiteTree          # Only scan the SiteTree table
    cms-migrate publish-versions                    # Publish draft-only versioned records
    cms-migrate -d site.db publish-versions -t Widget
    cms-migrate completions bash > cms-migrate.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// CMS database file (overrides the configured path)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// Level in effect; replaced once the config is loaded
static ACTIVE_LEVEL: RwLock<app_config::LogLevel> = RwLock::new(app_config::LogLevel::Info);

// @struct: Line logger writing to stdout
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: app_config::LogLevel) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        Self::set_level(level);
        Ok(())
    }

    // @updates: Active level and the global filter
    fn set_level(level: app_config::LogLevel) {
        if let Ok(mut active) = ACTIVE_LEVEL.write() {
            *active = level;
        }
        log::set_max_level(level.max_filter());
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
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
        ACTIVE_LEVEL
            .read()
            .map(|level| level.allows(metadata))
            .unwrap_or(true)
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stdout = std::io::stdout().lock();
            let _ = writeln!(
                stdout,
                "{}{} {:<5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

fn main() -> Result<()> {
    CustomLogger::init(app_config::LogLevel::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(cmd_log_level) = &cli.log_level {
        CustomLogger::set_level(cmd_log_level.clone().into());
    }

    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(*shell, &mut cmd, "cms-migrate", &mut std::io::stdout());
            Ok(())
        }
        Commands::RewriteImages(args) => {
            let mut config = load_config(&cli)?;
            if !args.tables.is_empty() {
                config.image_migration.content_tables = args.tables.clone();
            }
            config.validate().context("Configuration validation failed")?;
            run_rewrite_images(&config, args.dry_run)
        }
        Commands::PublishVersions(args) => {
            let mut config = load_config(&cli)?;
            if !args.record_types.is_empty() {
                config.version_migration.record_types = args.record_types.clone();
            }
            config.validate().context("Configuration validation failed")?;
            run_publish_versions(&config)
        }
    }
}

/// Load or create the configuration and apply global CLI overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let config_path = &cli.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        config
            .save(config_path)
            .with_context(|| format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    if let Some(database) = &cli.database {
        config.database_path = database.clone();
    }

    // Update log level in config if specified via command line
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    } else {
        CustomLogger::set_level(config.log_level);
    }

    Ok(config)
}

fn open_repository(config: &Config) -> Result<Repository> {
    let db = DatabaseConnection::new(&config.database_path)?;
    Ok(Repository::new(db)
        .with_content_column(config.image_migration.content_column.clone())
        .with_asset_table(config.image_migration.assets.clone()))
}

fn run_rewrite_images(config: &Config, dry_run: bool) -> Result<()> {
    let repo = open_repository(config)?;
    let tables = config.image_migration.content_tables.clone();

    repo.verify_image_migration(&tables)
        .context("Database is not ready for image migration")?;

    if dry_run {
        info!("Dry run: no rows will be written");
    }

    let rewriter = ContentImageRewriter::new(&repo, &repo, tables).dry_run(dry_run);
    let report = rewriter.run().context("Image migration aborted")?;

    if !report.unresolved.is_empty() {
        warn!("{} image links could not be resolved", report.unresolved.len());
    }
    Ok(())
}

fn run_publish_versions(config: &Config) -> Result<()> {
    let repo = open_repository(config)?;
    let record_types = config.version_migration.record_types.clone();

    repo.verify_version_migration(&record_types)
        .context("Database is not ready for version publishing")?;

    let publisher = VersionPublisher::new(&repo, record_types);
    publisher.run().context("Version publishing aborted")?;
    Ok(())
}
