use serde::Serialize;

/// Result of applying insert-if-absent to a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SaveSummary {
    pub attempted: usize,
    pub inserted: usize,
    /// Candidates whose link was already stored (or repeated earlier in the batch).
    pub existing: usize,
}

impl SaveSummary {
    pub fn is_empty(&self) -> bool {
        self.attempted == 0
    }

    pub fn confirmed(&self) -> usize {
        self.inserted + self.existing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DedupeReport {
    pub removed: usize,
    pub unique_index: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLevel {
    #[default]
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ScrapeOutcome {
    Completed,
    NothingToSave,
    FetchFailed(String),
    PersistenceFailed {
        attempted: usize,
        confirmed: usize,
        message: String,
    },
}

/// Counts from one scrape-and-save run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeReport {
    pub source: String,
    pub found: usize,
    pub saved: usize,
    pub existing: usize,
    pub skipped: usize,
    pub outcome: ScrapeOutcome,
}

impl ScrapeReport {
    pub fn fetch_failed(source: &str, message: String) -> Self {
        Self {
            source: source.to_string(),
            found: 0,
            saved: 0,
            existing: 0,
            skipped: 0,
            outcome: ScrapeOutcome::FetchFailed(message),
        }
    }

    /// Candidates that were found but not confirmed in the store.
    pub fn failed(&self) -> usize {
        match &self.outcome {
            ScrapeOutcome::PersistenceFailed { confirmed, .. } => {
                self.found.saturating_sub(*confirmed)
            }
            _ => 0,
        }
    }

    pub fn message(&self) -> (StatusLevel, String) {
        let counts = format!(
            "found {} | saved {} | already stored {} | skipped {} | failed {}",
            self.found,
            self.saved,
            self.existing,
            self.skipped,
            self.failed()
        );

        match &self.outcome {
            ScrapeOutcome::Completed => (
                StatusLevel::Info,
                format!("{}: {counts}", self.source),
            ),
            ScrapeOutcome::NothingToSave => (
                StatusLevel::Warning,
                format!("{}: no articles to save (skipped {})", self.source, self.skipped),
            ),
            ScrapeOutcome::FetchFailed(e) => (
                StatusLevel::Error,
                format!("Error scraping {}: {e}", self.source),
            ),
            ScrapeOutcome::PersistenceFailed { message, .. } => (
                StatusLevel::Error,
                format!("{}: {counts} ({message})", self.source),
            ),
        }
    }
}
