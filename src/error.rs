use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database error: {0}")]
    AsyncDatabase(#[from] tokio_rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Saving stopped after {confirmed} of {attempted} articles: {message}")]
    Persistence {
        attempted: usize,
        confirmed: usize,
        inserted: usize,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Failure of the single GET issued per scrape.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Request to {url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

impl FetchError {
    pub fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source,
            }
        }
    }
}

/// An article container that did not yield a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Skipped article container #{index}: {reason}")]
pub struct ExtractionSkip {
    pub index: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("missing title")]
    MissingTitle,
    #[error("missing link")]
    MissingLink,
    #[error("missing date")]
    MissingDate,
    #[error("link `{0}` cannot be resolved")]
    InvalidLink(String),
}
