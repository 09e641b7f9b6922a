pub const SCHEMA: &str = r#"
-- articles table (link is the natural key; uniqueness is enforced by the
-- insert statement, and by idx_articles_link_unique once duplicates are collapsed)
CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source TEXT NOT NULL,
    title TEXT NOT NULL,
    date TEXT NOT NULL,
    link TEXT NOT NULL,
    category TEXT NOT NULL DEFAULT 'Unknown',
    scraped_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_articles_link ON articles(link);
CREATE INDEX IF NOT EXISTS idx_articles_scraped_at ON articles(scraped_at DESC);
CREATE INDEX IF NOT EXISTS idx_articles_source ON articles(source);
"#;

pub const UNIQUE_LINK_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_articles_link_unique ON articles(link)";
