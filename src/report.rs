//! The run report written with `--report`.

use crate::xref::SkippedEntry;
use serde::Serialize;
use slog::debug;

/// What one run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// The file name links point at.
    pub bibliography: String,
    /// Distinct keys in the bibliography index.
    pub keys: usize,
    /// Bibliography entries with an id that could not be keyed.
    pub skipped_entries: Vec<SkippedEntry>,
    /// Citation-shaped text found in the chapter body.
    pub citations_found: usize,
    pub links_created: usize,
    /// Citations with no bibliography entry, in document order.
    pub unmatched: Vec<String>,
}

impl RunReport {
    /// The report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        debug!(slog_scope::logger(), "Serializing run report...");
        serde_json::to_string_pretty(self)
    }
}
