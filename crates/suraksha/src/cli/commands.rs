//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::config::Config;
use crate::error::Result;
use crate::flows::ReportDraft;
use crate::location::{Coordinates, StaticLocation};
use crate::report::Severity;

/// Device position given on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Args)]
pub struct LocationArgs {
    /// Latitude in decimal degrees (overrides the configured location)
    #[arg(
        long = "lat",
        value_name = "DEG",
        requires = "longitude",
        allow_negative_numbers = true
    )]
    pub latitude: Option<f64>,

    /// Longitude in decimal degrees (overrides the configured location)
    #[arg(
        long = "lon",
        value_name = "DEG",
        requires = "latitude",
        allow_negative_numbers = true
    )]
    pub longitude: Option<f64>,
}

impl LocationArgs {
    /// Pick the device position: flags first, then the configured location.
    ///
    /// # Errors
    ///
    /// Returns a location error if the flags are out of range.
    pub fn resolve(&self, config: &Config) -> Result<Option<Coordinates>> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => {
                Coordinates::validated(latitude, longitude).map(Some)
            }
            _ => Ok(config.default_location()),
        }
    }

    /// Build the location provider used by the flows.
    ///
    /// # Errors
    ///
    /// Returns a location error if the flags are out of range.
    pub fn provider(&self, config: &Config) -> Result<StaticLocation> {
        self.resolve(config).map(StaticLocation::from_option)
    }
}

/// Report command arguments.
#[derive(Debug, Args)]
pub struct ReportCommand {
    /// Disaster category (e.g. Earthquake, Flood, Fire)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub disaster_type: String,

    /// How serious the situation is
    #[arg(short, long, value_enum, default_value = "low")]
    pub severity: SeverityArg,

    /// Free-text description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Attach a photo URI (repeatable, at most 5)
    #[arg(short, long = "photo", value_name = "URI")]
    pub photos: Vec<String>,

    /// Device position
    #[command(flatten)]
    pub location: LocationArgs,
}

impl ReportCommand {
    /// Fill a draft from the arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if too many photos are given or a photo URI is empty.
    pub fn to_draft(&self) -> Result<ReportDraft> {
        let mut draft = ReportDraft::new(self.disaster_type.clone())
            .with_severity(self.severity.into())
            .with_description(self.description.clone());
        for photo in &self.photos {
            draft.add_photo(photo.clone())?;
        }
        Ok(draft)
    }
}

/// SOS command arguments.
#[derive(Debug, Args)]
pub struct SosCommand {
    /// Device position
    #[command(flatten)]
    pub location: LocationArgs,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Severity argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SeverityArg {
    /// Minor, no immediate danger
    #[default]
    Low,
    /// Needs attention soon
    Medium,
    /// Danger to people or property
    High,
    /// Life-threatening
    Critical,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Low => Self::Low,
            SeverityArg::Medium => Self::Medium,
            SeverityArg::High => Self::High,
            SeverityArg::Critical => Self::Critical,
        }
    }
}

/// Output format for the report list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One card per report
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON array, as stored
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn report_command(photos: Vec<String>) -> ReportCommand {
        ReportCommand {
            disaster_type: "Flood".to_string(),
            severity: SeverityArg::High,
            description: "River burst its banks".to_string(),
            photos,
            location: LocationArgs::default(),
        }
    }

    #[test]
    fn test_severity_arg_conversion() {
        assert_eq!(Severity::from(SeverityArg::Low), Severity::Low);
        assert_eq!(Severity::from(SeverityArg::Medium), Severity::Medium);
        assert_eq!(Severity::from(SeverityArg::High), Severity::High);
        assert_eq!(Severity::from(SeverityArg::Critical), Severity::Critical);
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_to_draft() {
        let cmd = report_command(vec!["file:///a.jpg".to_string()]);
        let draft = cmd.to_draft().unwrap();

        assert_eq!(draft.disaster_type(), "Flood");
        assert_eq!(draft.severity(), Severity::High);
        assert_eq!(draft.description(), "River burst its banks");
        assert_eq!(draft.photos(), &["file:///a.jpg".to_string()]);
    }

    #[test]
    fn test_to_draft_too_many_photos() {
        let photos = (0..6).map(|i| format!("file:///{i}.jpg")).collect();
        let err = report_command(photos).to_draft().unwrap_err();
        assert!(matches!(err, Error::PhotoLimitExceeded { max: 5 }));
    }

    #[test]
    fn test_location_flags_override_config() {
        let mut config = Config::default();
        config.location.latitude = Some(1.0);
        config.location.longitude = Some(2.0);

        let args = LocationArgs {
            latitude: Some(12.34),
            longitude: Some(56.78),
        };
        assert_eq!(
            args.resolve(&config).unwrap(),
            Some(Coordinates::new(12.34, 56.78))
        );

        let none = LocationArgs::default();
        assert_eq!(
            none.resolve(&config).unwrap(),
            Some(Coordinates::new(1.0, 2.0))
        );
    }

    #[test]
    fn test_location_without_any_source() {
        let args = LocationArgs::default();
        assert_eq!(args.resolve(&Config::default()).unwrap(), None);
        assert_eq!(
            args.provider(&Config::default()).unwrap(),
            StaticLocation::unavailable()
        );
    }

    #[test]
    fn test_location_out_of_range() {
        let args = LocationArgs {
            latitude: Some(95.0),
            longitude: Some(0.0),
        };
        assert!(args.resolve(&Config::default()).is_err());
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
