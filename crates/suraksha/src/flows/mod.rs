//! User-facing flows built on top of the report store.
//!
//! - [`submission`]: file a report from a filled-in draft.
//! - [`sos`]: send a zero-input Critical alert.
//! - [`listing`]: load and render the stored reports.
//!
//! Both write paths finish with a [`Receipt`], the data shown on the
//! confirmation screen.

pub mod listing;
pub mod sos;
pub mod submission;

use serde::Serialize;

use crate::location::Coordinates;
use crate::report::{Report, Severity};

pub use listing::{load_reports, ReportListing, EMPTY_STATE_MESSAGE};
pub use sos::{send_sos, RETURN_HOME_NOTICE};
pub use submission::{submit_report, ReportDraft};

/// Which flow produced a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptKind {
    /// A regular disaster report.
    Report,
    /// An emergency SOS alert.
    Sos,
}

/// Confirmation data for a stored report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    /// Which flow produced the report.
    pub kind: ReceiptKind,
    /// Identifier of the stored report.
    pub report_id: String,
    /// Disaster category.
    pub disaster_type: String,
    /// Reported severity.
    pub severity: Severity,
    /// Description, possibly empty.
    pub description: String,
    /// Where the report was filed.
    pub location: Coordinates,
    /// First attached photo, if any.
    pub photo: Option<String>,
}

impl Receipt {
    /// Build the receipt for a stored report.
    #[must_use]
    pub fn for_report(kind: ReceiptKind, report: &Report) -> Self {
        Self {
            kind,
            report_id: report.id.clone(),
            disaster_type: report.disaster_type.clone(),
            severity: report.severity,
            description: report.description.clone(),
            location: report.coordinates(),
            photo: report.first_photo().map(str::to_string),
        }
    }

    /// Headline of the confirmation screen.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self.kind {
            ReceiptKind::Report => "Report Submitted!",
            ReceiptKind::Sos => "SOS Submitted!",
        }
    }

    /// Subtitle of the confirmation screen.
    #[must_use]
    pub fn subtitle(&self) -> &'static str {
        match self.kind {
            ReceiptKind::Report => "Thank you for your contribution.",
            ReceiptKind::Sos => "Your emergency SOS has been sent.",
        }
    }
}

impl std::fmt::Display for Receipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.title())?;
        writeln!(f, "{}", self.subtitle())?;
        writeln!(f)?;
        writeln!(f, "Type:        {}", self.disaster_type)?;
        writeln!(f, "Severity:    {}", self.severity)?;
        writeln!(f, "Location:    {}", self.location)?;
        if !self.description.is_empty() {
            writeln!(f, "Description: {}", self.description)?;
        }
        if let Some(photo) = &self.photo {
            writeln!(f, "Photo:       {photo}")?;
        }
        write!(f, "Report ID:   {}", self.report_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_for_report() {
        let report = Report::new(
            "Flood",
            Severity::High,
            "Water rising",
            Coordinates::new(1.5, 2.5),
            vec!["file:///a.jpg".to_string(), "file:///b.jpg".to_string()],
        );
        let receipt = Receipt::for_report(ReceiptKind::Report, &report);

        assert_eq!(receipt.report_id, report.id);
        assert_eq!(receipt.disaster_type, "Flood");
        assert_eq!(receipt.severity, Severity::High);
        assert_eq!(receipt.location, Coordinates::new(1.5, 2.5));
        assert_eq!(receipt.photo.as_deref(), Some("file:///a.jpg"));
    }

    #[test]
    fn test_receipt_display_report() {
        let report = Report::new(
            "Fire",
            Severity::Medium,
            "",
            Coordinates::new(1.0, 2.0),
            Vec::new(),
        );
        let text = Receipt::for_report(ReceiptKind::Report, &report).to_string();

        assert!(text.starts_with("Report Submitted!"));
        assert!(text.contains("Type:        Fire"));
        assert!(text.contains("Location:    1.0000, 2.0000"));
        assert!(!text.contains("Description:"));
        assert!(!text.contains("Photo:"));
    }

    #[test]
    fn test_receipt_display_sos() {
        let report = Report::sos(Coordinates::new(12.34, 56.78));
        let text = Receipt::for_report(ReceiptKind::Sos, &report).to_string();

        assert!(text.starts_with("SOS Submitted!"));
        assert!(text.contains("Your emergency SOS has been sent."));
        assert!(text.contains("Severity:    Critical"));
        assert!(text.contains("Description: N/A"));
        assert!(text.contains("Photo:       N/A"));
    }
}
