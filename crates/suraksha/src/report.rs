//! Core report types for suraksha.
//!
//! This module defines the record persisted for every disaster report and
//! SOS alert, along with the severity scale and the catalogue of well-known
//! disaster categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::location::Coordinates;

/// Maximum number of photos attached to a single report.
pub const MAX_PHOTOS: usize = 5;

/// Disaster type recorded for every SOS alert.
pub const SOS_DISASTER_TYPE: &str = "SOS Emergency";

/// Placeholder used for the description and photo of an SOS alert.
pub const SOS_PLACEHOLDER: &str = "N/A";

/// Disaster categories offered when filing a report.
///
/// `disaster_type` is free-form; these are the suggestions shown to users.
pub const KNOWN_DISASTER_TYPES: &[&str] = &[
    "Earthquake",
    "Flood",
    "Fire",
    "Landslide",
    "Cyclone",
    "Accident",
    "Medical Emergency",
    "Other",
];

/// How serious the reported situation is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Severity {
    /// Minor, no immediate danger.
    #[default]
    Low,
    /// Needs attention soon.
    Medium,
    /// Danger to people or property.
    High,
    /// Life-threatening; used for every SOS alert.
    Critical,
}

impl Severity {
    /// All severities, lowest first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// Processing status of a report.
///
/// Reports are created as `pending` and nothing in this crate moves them on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Stored on the device, not yet acted upon.
    #[default]
    Pending,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
        }
    }
}

/// A single disaster report or SOS alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Identifier, unique within the store.
    pub id: String,

    /// Free-form category such as "Earthquake" or "SOS Emergency".
    pub disaster_type: String,

    /// Reported severity.
    pub severity: Severity,

    /// Description entered by the reporter; may be empty.
    #[serde(default)]
    pub description: String,

    /// Latitude at submission time.
    pub latitude: f64,

    /// Longitude at submission time.
    pub longitude: f64,

    /// Device-local photo URIs, in the order they were attached.
    #[serde(default)]
    pub photos: Vec<String>,

    /// Processing status.
    pub status: ReportStatus,

    /// When the report was created.
    pub created_at: DateTime<Utc>,
}

impl Report {
    /// Create a new pending report stamped with a fresh id and the current time.
    #[must_use]
    pub fn new(
        disaster_type: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
        location: Coordinates,
        photos: Vec<String>,
    ) -> Self {
        Self {
            id: Self::generate_id(),
            disaster_type: disaster_type.into(),
            severity,
            description: description.into(),
            latitude: location.latitude,
            longitude: location.longitude,
            photos,
            status: ReportStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Create the fixed-content report sent by the SOS button.
    #[must_use]
    pub fn sos(location: Coordinates) -> Self {
        Self::new(
            SOS_DISASTER_TYPE,
            Severity::Critical,
            SOS_PLACEHOLDER,
            location,
            vec![SOS_PLACEHOLDER.to_string()],
        )
    }

    /// Generate a time-ordered report identifier.
    #[must_use]
    pub fn generate_id() -> String {
        Uuid::now_v7().to_string()
    }

    /// Where the report was filed.
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// The first attached photo, if any.
    #[must_use]
    pub fn first_photo(&self) -> Option<&str> {
        self.photos.first().map(String::as_str)
    }

    /// Whether this report came from the SOS flow.
    #[must_use]
    pub fn is_sos(&self) -> bool {
        self.disaster_type == SOS_DISASTER_TYPE
    }
}
