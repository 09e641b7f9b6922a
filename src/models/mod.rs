mod article;
mod report;

pub use article::{Article, NewArticle, UNKNOWN_CATEGORY};
pub use report::{DedupeReport, SaveSummary, ScrapeOutcome, ScrapeReport, StatusLevel};
