//! The report list, persisted as one JSON array under a single key.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::error::Result;
use crate::report::Report;

/// Key under which the report list is stored.
pub const REPORTS_KEY: &str = "my_reports";

/// Newest-first list of every report filed on this device.
///
/// The whole list is stored as a JSON array under [`REPORTS_KEY`]. Appends
/// are read-modify-write cycles; cycles issued through the same `ReportStore`
/// are serialized, so concurrent appends from different flows sharing one
/// store never drop a report. Two processes writing the same database are not
/// coordinated and the last writer wins.
///
/// Stored contents that are not a valid report array read as an empty list.
/// This is logged but never reported to the caller, and appending on top of
/// such an array keeps its elements.
#[derive(Debug, Clone)]
pub struct ReportStore {
    kv: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl ReportStore {
    /// Create a report store on top of a key-value backend.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// The underlying key-value backend.
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.kv
    }

    /// Insert `report` at the front of the stored list.
    ///
    /// Existing array elements are carried over untouched, even ones that do
    /// not decode as a [`Report`]. The list only starts over when the stored
    /// value is missing, is not JSON, or is not an array.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read or write fails or the list
    /// cannot be serialized. Nothing is written in that case.
    pub async fn append(&self, report: Report) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let existing = self.kv.get(REPORTS_KEY).await?;
        let mut entries = existing.as_deref().map(decode_entries).unwrap_or_default();

        entries.insert(0, serde_json::to_value(&report)?);

        let encoded = serde_json::to_string(&entries)?;
        self.kv.set(REPORTS_KEY, &encoded).await?;

        debug!("Appended report {} ({} total)", report.id, entries.len());
        Ok(())
    }

    /// Read every stored report, newest first.
    ///
    /// Never fails: a missing key, unparseable contents or a backend error
    /// all yield an empty list.
    pub async fn read_all(&self) -> Vec<Report> {
        match self.kv.get(REPORTS_KEY).await {
            Ok(Some(raw)) => decode(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read stored reports: {}", e);
                Vec::new()
            }
        }
    }

    /// Number of stored reports.
    pub async fn len(&self) -> usize {
        self.read_all().await.len()
    }

    /// Whether no reports are stored.
    pub async fn is_empty(&self) -> bool {
        self.read_all().await.is_empty()
    }
}

/// Split the stored value into its raw array elements.
fn decode_entries(raw: &str) -> Vec<Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            warn!("Stored report list is not a JSON array, starting over");
            Vec::new()
        }
        Err(e) => {
            warn!("Stored report list is not valid JSON, starting over: {}", e);
            Vec::new()
        }
    }
}

/// Decode the whole stored list; any element that is not a report makes the
/// list unreadable.
fn decode(raw: &str) -> Vec<Report> {
    match serde_json::from_str::<Vec<Report>>(raw) {
        Ok(reports) => reports,
        Err(e) => {
            warn!("Stored report list is unreadable, treating it as empty: {}", e);
            Vec::new()
        }
    }
}
