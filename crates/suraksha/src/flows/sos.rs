//! Emergency SOS.
//!
//! No input is collected: the only thing that varies between alerts is the
//! device position.

use tracing::{error, info};

use super::{Receipt, ReceiptKind};
use crate::error::Result;
use crate::location::{Coordinates, LocationProvider};
use crate::report::Report;
use crate::storage::ReportStore;

/// Shown after the SOS confirmation is dismissed.
pub const RETURN_HOME_NOTICE: &str = "Returning to the home screen.";

/// Send an SOS alert from the current device position.
///
/// # Errors
///
/// Returns [`crate::Error::LocationPermissionDenied`] if location access is
/// refused, any other location error if no position can be read, or a storage
/// error if the alert cannot be persisted. Nothing is stored on failure.
pub async fn send_sos(store: &ReportStore, location: &dyn LocationProvider) -> Result<Receipt> {
    let position = match location.locate().await.and_then(Coordinates::checked) {
        Ok(position) => position,
        Err(e) => {
            error!("SOS aborted, no location: {}", e);
            return Err(e);
        }
    };

    let report = Report::sos(position);
    let receipt = Receipt::for_report(ReceiptKind::Sos, &report);

    store.append(report).await?;

    info!("SOS {} stored at {}", receipt.report_id, receipt.location);
    Ok(receipt)
}
