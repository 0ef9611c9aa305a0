//! Filing a disaster report.
//!
//! A [`ReportDraft`] holds what the reporter has entered so far. Submitting
//! it stamps the device position, appends the report to the store and hands
//! back a [`Receipt`] for the confirmation screen.

use tracing::{info, warn};

use super::{Receipt, ReceiptKind};
use crate::error::{Error, Result};
use crate::location::{Coordinates, LocationProvider};
use crate::report::{Report, Severity, MAX_PHOTOS};
use crate::storage::ReportStore;

/// A report being filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDraft {
    disaster_type: String,
    severity: Severity,
    description: String,
    photos: Vec<String>,
}

impl ReportDraft {
    /// Start a draft for the given disaster category, with `Low` severity.
    #[must_use]
    pub fn new(disaster_type: impl Into<String>) -> Self {
        Self {
            disaster_type: disaster_type.into(),
            severity: Severity::default(),
            description: String::new(),
            photos: Vec::new(),
        }
    }

    /// Set the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Change the severity.
    pub fn set_severity(&mut self, severity: Severity) {
        self.severity = severity;
    }

    /// Change the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Attach a photo URI.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PhotoLimitExceeded`] if the draft already holds
    /// [`MAX_PHOTOS`] photos, or [`Error::InvalidDraft`] for an empty URI.
    pub fn add_photo(&mut self, uri: impl Into<String>) -> Result<()> {
        if self.photos.len() >= MAX_PHOTOS {
            return Err(Error::PhotoLimitExceeded { max: MAX_PHOTOS });
        }
        let uri = uri.into();
        if uri.trim().is_empty() {
            return Err(Error::invalid_draft("photo URI cannot be empty"));
        }
        self.photos.push(uri);
        Ok(())
    }

    /// Detach the photo at `index`, returning it.
    pub fn remove_photo(&mut self, index: usize) -> Option<String> {
        (index < self.photos.len()).then(|| self.photos.remove(index))
    }

    /// The disaster category.
    #[must_use]
    pub fn disaster_type(&self) -> &str {
        &self.disaster_type
    }

    /// The selected severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The description entered so far.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Attached photo URIs in the order they were added.
    #[must_use]
    pub fn photos(&self) -> &[String] {
        &self.photos
    }

    /// How many more photos can be attached.
    #[must_use]
    pub fn remaining_photo_slots(&self) -> usize {
        MAX_PHOTOS.saturating_sub(self.photos.len())
    }

    /// Check that the draft can be submitted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDraft`] if the disaster type is blank, or
    /// [`Error::PhotoLimitExceeded`] if too many photos are attached.
    pub fn validate(&self) -> Result<()> {
        if self.disaster_type.trim().is_empty() {
            return Err(Error::invalid_draft("disaster type is required"));
        }
        if self.photos.len() > MAX_PHOTOS {
            return Err(Error::PhotoLimitExceeded { max: MAX_PHOTOS });
        }
        Ok(())
    }

    /// Turn the draft into a pending report filed at `location`.
    #[must_use]
    pub fn to_report(&self, location: Coordinates) -> Report {
        Report::new(
            self.disaster_type.clone(),
            self.severity,
            self.description.clone(),
            location,
            self.photos.clone(),
        )
    }
}

/// Submit a draft: locate the device, store the report, return a receipt.
///
/// The draft is only borrowed, so after a failure the caller still holds
/// everything the reporter entered and can simply try again.
///
/// # Errors
///
/// - [`Error::InvalidDraft`] / [`Error::PhotoLimitExceeded`] if the draft is
///   not submittable.
/// - [`Error::LocationUnavailable`] if no position can be read, including
///   when location access was refused.
/// - Any storage error from [`ReportStore::append`].
pub async fn submit_report(
    store: &ReportStore,
    location: &dyn LocationProvider,
    draft: &ReportDraft,
) -> Result<Receipt> {
    draft.validate()?;

    let position = match location.locate().await.and_then(Coordinates::checked) {
        Ok(position) => position,
        Err(Error::LocationPermissionDenied) => {
            warn!("Report rejected: location permission denied");
            return Err(Error::location_unavailable("location permission denied"));
        }
        Err(e) => {
            warn!("Report rejected: {}", e);
            return Err(e);
        }
    };

    let report = draft.to_report(position);
    let receipt = Receipt::for_report(ReceiptKind::Report, &report);

    store.append(report).await?;

    info!(
        "Stored {} report {} ({})",
        receipt.disaster_type, receipt.report_id, receipt.severity
    );
    Ok(receipt)
}
