use std::time::Duration;

use chrono::Utc;

use crate::config::Config;
use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::models::{ScrapeOutcome, ScrapeReport};

use super::{Extractor, Fetcher};

/// Fetch → extract → insert-if-absent for one configured source.
pub struct ScrapePipeline {
    url: String,
    fetcher: Fetcher,
    extractor: Extractor,
}

impl ScrapePipeline {
    pub fn new(config: &Config) -> Result<Self> {
        let fetcher = Fetcher::new(
            &config.user_agent,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        let extractor = Extractor::from_config(&config.source)?;

        Ok(Self {
            url: config.source.url.clone(),
            fetcher,
            extractor,
        })
    }

    pub fn source(&self) -> &str {
        self.extractor.source()
    }

    /// Run one scrape. Failures end up in the report, never as an error.
    pub async fn run(&self, repository: &Repository) -> ScrapeReport {
        match self.fetcher.fetch(&self.url).await {
            Ok(page) => {
                tracing::debug!(url = %self.url, status = %page.status, "Scraping listing page");
                self.ingest(&page.body, repository).await
            }
            Err(e) => {
                tracing::warn!(source = %self.source(), error = %e, "Fetch failed");
                ScrapeReport::fetch_failed(self.source(), e.to_string())
            }
        }
    }

    /// Extract candidates from `html` and save them.
    pub async fn ingest(&self, html: &str, repository: &Repository) -> ScrapeReport {
        let extraction = self.extractor.extract_html(html, Utc::now());
        let found = extraction.articles.len();
        let skipped = extraction.skipped.len();

        let mut report = ScrapeReport {
            source: self.source().to_string(),
            found,
            saved: 0,
            existing: 0,
            skipped,
            outcome: ScrapeOutcome::Completed,
        };

        match repository.save_articles(extraction.articles).await {
            Ok(summary) if summary.is_empty() => {
                report.outcome = ScrapeOutcome::NothingToSave;
            }
            Ok(summary) => {
                report.saved = summary.inserted;
                report.existing = summary.existing;
            }
            Err(AppError::Persistence {
                attempted,
                confirmed,
                inserted,
                message,
            }) => {
                report.saved = inserted;
                report.existing = confirmed - inserted;
                report.outcome = ScrapeOutcome::PersistenceFailed {
                    attempted,
                    confirmed,
                    message,
                };
            }
            Err(e) => {
                report.outcome = ScrapeOutcome::PersistenceFailed {
                    attempted: found,
                    confirmed: 0,
                    message: e.to_string(),
                };
            }
        }

        report
    }
}
