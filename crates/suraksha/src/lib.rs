//! `suraksha` - On-device disaster report and emergency SOS store
//!
//! This library persists disaster reports and SOS alerts as a single JSON
//! array in a string-keyed store, newest first, and provides the submission,
//! SOS and listing flows built on top of it.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod flows;
pub mod location;
pub mod logging;
pub mod report;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use flows::{load_reports, send_sos, submit_report, Receipt, ReportDraft, ReportListing};
pub use location::{Coordinates, LocationProvider, StaticLocation};
pub use logging::init_logging;
pub use report::{Report, ReportStatus, Severity};
pub use storage::{KeyValueStore, MemoryStore, ReportStore, SqliteStore, StorageStats};
