use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// An article extracted from a listing page, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArticle {
    pub source: String,
    pub title: String,
    pub date: String,
    pub link: String,
    pub category: String,
    pub scraped_at: DateTime<Utc>,
}

/// A stored article. `id` follows insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub source: String,
    pub title: String,
    pub date: String,
    pub link: String,
    pub category: String,
    pub scraped_at: DateTime<Utc>,
}
