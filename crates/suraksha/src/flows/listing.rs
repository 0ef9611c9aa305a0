//! The "My Reports" view.

use tracing::debug;

use crate::error::Result;
use crate::report::Report;
use crate::storage::ReportStore;

/// Shown in place of the list when nothing has been filed yet.
pub const EMPTY_STATE_MESSAGE: &str = "You haven't submitted any reports yet.";

/// Shown for a report without a description.
const NO_DESCRIPTION: &str = "(No description)";

/// Longest description rendered in a table cell.
const TABLE_DESCRIPTION_WIDTH: usize = 32;

/// A snapshot of the stored reports, newest first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportListing {
    reports: Vec<Report>,
}

/// Load every stored report.
pub async fn load_reports(store: &ReportStore) -> ReportListing {
    let reports = store.read_all().await;
    debug!("Loaded {} reports", reports.len());
    ReportListing { reports }
}

impl ReportListing {
    /// Wrap an already loaded list.
    #[must_use]
    pub fn new(reports: Vec<Report>) -> Self {
        Self { reports }
    }

    /// The reports, newest first.
    #[must_use]
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Number of reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Render one card per report.
    #[must_use]
    pub fn render_plain(&self) -> String {
        if self.is_empty() {
            return EMPTY_STATE_MESSAGE.to_string();
        }

        self.reports
            .iter()
            .map(render_card)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Render a compact table, one row per report.
    #[must_use]
    pub fn render_table(&self) -> String {
        if self.is_empty() {
            return EMPTY_STATE_MESSAGE.to_string();
        }

        let type_width = self
            .reports
            .iter()
            .map(|r| r.disaster_type.chars().count())
            .max()
            .unwrap_or(0)
            .max("TYPE".len());

        let header = format!(
            "{:<16}  {:<type_width$}  {:<8}  {:<7}  {:<19}  {:<6}  DESCRIPTION",
            "CREATED", "TYPE", "SEVERITY", "STATUS", "LOCATION", "PHOTOS"
        );
        let rows = self.reports.iter().map(|report| {
            format!(
                "{:<16}  {:<type_width$}  {:<8}  {:<7}  {:<19}  {:<6}  {}",
                report.created_at.format("%Y-%m-%d %H:%M").to_string(),
                report.disaster_type,
                report.severity.to_string(),
                report.status.to_string(),
                format!("{:.3}, {:.3}", report.latitude, report.longitude),
                report.photos.len(),
                truncate(description_or_placeholder(report), TABLE_DESCRIPTION_WIDTH),
            )
        });

        std::iter::once(header)
            .chain(rows)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the reports as a pretty-printed JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.reports)?)
    }
}

fn description_or_placeholder(report: &Report) -> &str {
    if report.description.is_empty() {
        NO_DESCRIPTION
    } else {
        &report.description
    }
}

fn render_card(report: &Report) -> String {
    let mut lines = vec![
        format!("{}  [{}]", report.disaster_type, report.severity),
        format!("Status: {}", report.status),
        description_or_placeholder(report).to_string(),
        format!("Location: {:.3}, {:.3}", report.latitude, report.longitude),
        format!(
            "Created: {}",
            report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
    ];
    if let Some(photo) = report.first_photo() {
        lines.push(format!("Photo: {photo}"));
    }
    lines.join("\n")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    }
}
