//! `suraksha` - CLI for the on-device disaster report store
//!
//! This binary files reports and SOS alerts and lists what has been stored.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use suraksha::cli::{
    Cli, Command, ConfigCommand, ListCommand, OutputFormat, ReportCommand, SosCommand,
};
use suraksha::config::StorageBackend;
use suraksha::flows::{load_reports, send_sos, submit_report, Receipt, RETURN_HOME_NOTICE};
use suraksha::storage::open_backend;
use suraksha::{init_logging, Config, ReportStore, SqliteStore};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Report(cmd) => Ok(handle_report(&config, &cmd).await),
        Command::Sos(cmd) => Ok(handle_sos(&config, &cmd).await),
        Command::List(cmd) => handle_list(&config, &cmd).await,
        Command::Status(cmd) => handle_status(&config, cmd.json).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_store(config: &Config) -> anyhow::Result<ReportStore> {
    let backend = open_backend(config).context("failed to open report storage")?;
    Ok(ReportStore::new(backend))
}

/// Print a flow's outcome; failures show the short user-facing notice.
fn finish(outcome: suraksha::Result<Receipt>, after: Option<&str>) -> ExitCode {
    match outcome {
        Ok(receipt) => {
            println!("{receipt}");
            if let Some(notice) = after {
                println!();
                println!("{notice}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!("Flow failed: {}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn handle_report(config: &Config, cmd: &ReportCommand) -> ExitCode {
    finish(file_report(config, cmd).await, None)
}

async fn file_report(config: &Config, cmd: &ReportCommand) -> suraksha::Result<Receipt> {
    let draft = cmd.to_draft()?;
    let location = cmd.location.provider(config)?;
    let store = ReportStore::new(open_backend(config)?);
    submit_report(&store, &location, &draft).await
}

async fn handle_sos(config: &Config, cmd: &SosCommand) -> ExitCode {
    finish(raise_sos(config, cmd).await, Some(RETURN_HOME_NOTICE))
}

async fn raise_sos(config: &Config, cmd: &SosCommand) -> suraksha::Result<Receipt> {
    let location = cmd.location.provider(config)?;
    let store = ReportStore::new(open_backend(config)?);
    send_sos(&store, &location).await
}

async fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<ExitCode> {
    let store = open_store(config)?;
    let listing = load_reports(&store).await;

    match cmd.format {
        OutputFormat::Plain => println!("{}", listing.render_plain()),
        OutputFormat::Table => println!("{}", listing.render_table()),
        OutputFormat::Json => println!("{}", listing.render_json()?),
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_status(config: &Config, json: bool) -> anyhow::Result<ExitCode> {
    let (store, stats) = match config.storage.backend {
        StorageBackend::Sqlite => {
            let sqlite = Arc::new(
                SqliteStore::open(config.database_path())
                    .context("failed to open report storage")?,
            );
            let stats = sqlite.stats()?;
            (ReportStore::new(sqlite), Some(stats))
        }
        StorageBackend::Memory => (open_store(config)?, None),
    };
    let reports = store.read_all().await;
    let sos_count = reports.iter().filter(|r| r.is_sos()).count();
    let latest = reports.first().map(|r| r.created_at);

    if json {
        let status = serde_json::json!({
            "backend": config.storage.backend,
            "database_path": config.database_path(),
            "reports": reports.len(),
            "sos_alerts": sos_count,
            "latest_report": latest,
            "database_size_bytes": stats.as_ref().map(|s| s.db_size_bytes),
            "last_write": stats.as_ref().and_then(|s| s.last_write),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("suraksha status");
        println!("---------------");
        println!("Backend:       {}", config.storage.backend);
        println!("Database:      {}", config.database_path().display());
        println!("Reports:       {}", reports.len());
        println!("SOS alerts:    {sos_count}");
        if let Some(latest) = latest {
            println!("Latest:        {}", latest.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        if let Some(stats) = stats {
            println!("Size:          {} bytes", stats.db_size_bytes);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Backend:        {}", config.storage.backend);
                println!("  Database path:  {}", config.database_path().display());
                println!();
                println!("[Location]");
                match config.default_location() {
                    Some(position) => println!("  Default:        {position}"),
                    None => println!("  Default:        (not set)"),
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
