//! Command-line interface for suraksha.
//!
//! This module provides the CLI structure for the `suraksha` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, ListCommand, LocationArgs, OutputFormat, ReportCommand, SeverityArg,
    SosCommand, StatusCommand,
};

/// suraksha - Report disasters and send SOS alerts
///
/// Files disaster reports and emergency SOS alerts into an on-device store
/// and lists what has been submitted.
#[derive(Debug, Parser)]
#[command(name = "suraksha")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// File a disaster report
    Report(ReportCommand),

    /// Send an emergency SOS alert
    Sos(SosCommand),

    /// List submitted reports, newest first
    List(ListCommand),

    /// Show store status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Verbosity;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).unwrap()
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "suraksha");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["suraksha", "-q", "list"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["suraksha", "list"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["suraksha", "-v", "list"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["suraksha", "-vv", "list"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_report() {
        let cli = parse(&[
            "suraksha",
            "report",
            "--type",
            "Earthquake",
            "--severity",
            "critical",
            "--description",
            "Building collapsed",
            "--photo",
            "file:///one.jpg",
            "--photo",
            "file:///two.jpg",
            "--lat",
            "-33.86",
            "--lon",
            "151.21",
        ]);

        let Command::Report(cmd) = cli.command else {
            panic!("expected report command");
        };
        assert_eq!(cmd.disaster_type, "Earthquake");
        assert_eq!(cmd.severity, SeverityArg::Critical);
        assert_eq!(cmd.description, "Building collapsed");
        assert_eq!(cmd.photos.len(), 2);
        assert_eq!(cmd.location.latitude, Some(-33.86));
        assert_eq!(cmd.location.longitude, Some(151.21));
    }

    #[test]
    fn test_parse_report_defaults() {
        let Command::Report(cmd) = parse(&["suraksha", "report", "-t", "Fire"]).command else {
            panic!("expected report command");
        };
        assert_eq!(cmd.severity, SeverityArg::Low);
        assert!(cmd.description.is_empty());
        assert!(cmd.photos.is_empty());
        assert_eq!(cmd.location, LocationArgs::default());
    }

    #[test]
    fn test_parse_report_requires_type() {
        assert!(Cli::try_parse_from(["suraksha", "report"]).is_err());
    }

    #[test]
    fn test_parse_lat_requires_lon() {
        assert!(Cli::try_parse_from(["suraksha", "sos", "--lat", "12.0"]).is_err());
    }

    #[test]
    fn test_parse_sos() {
        let cli = parse(&["suraksha", "sos", "--lat", "12.34", "--lon", "56.78"]);
        let Command::Sos(cmd) = cli.command else {
            panic!("expected sos command");
        };
        assert_eq!(cmd.location.latitude, Some(12.34));
        assert_eq!(cmd.location.longitude, Some(56.78));
    }

    #[test]
    fn test_parse_list_format() {
        let cli = parse(&["suraksha", "list", "--format", "json"]);
        assert!(matches!(
            cli.command,
            Command::List(ListCommand {
                format: OutputFormat::Json
            })
        ));
    }

    #[test]
    fn test_parse_status() {
        let cli = parse(&["suraksha", "status", "--json"]);
        assert!(matches!(
            cli.command,
            Command::Status(StatusCommand { json: true })
        ));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = parse(&["suraksha", "config", "validate", "--file", "/tmp/c.toml"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["suraksha", "-c", "/custom/config.toml", "status"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }
}
