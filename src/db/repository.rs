use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Row};
use tokio_rusqlite::Connection;

use crate::error::{AppError, Result};
use crate::models::{Article, DedupeReport, NewArticle, SaveSummary};

use super::schema::{SCHEMA, UNIQUE_LINK_INDEX};

const ARTICLE_COLUMNS: &str = "id, source, title, date, link, category, scraped_at";

/// How long a write waits for another connection's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the article store. Opened once at startup and passed around.
pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;
        Self::init(conn).await
    }

    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            conn.execute_batch(SCHEMA)?;
            // Liveness check: fail at startup rather than on the first scrape.
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    // Write path

    /// Insert `article` unless a row with the same link exists. The check and
    /// the insert are one statement, so concurrent writers cannot both insert.
    pub async fn insert_if_absent(&self, article: NewArticle) -> Result<bool> {
        let inserted = self
            .conn
            .call(move |conn| {
                let changed = conn.execute(
                    r#"INSERT OR IGNORE INTO articles
                           (source, title, date, link, category, scraped_at)
                       SELECT ?1, ?2, ?3, ?4, ?5, ?6
                       WHERE NOT EXISTS (SELECT 1 FROM articles WHERE link = ?4)"#,
                    params![
                        article.source,
                        article.title,
                        article.date,
                        article.link,
                        article.category,
                        format_timestamp(&article.scraped_at),
                    ],
                )?;
                Ok(changed > 0)
            })
            .await?;
        Ok(inserted)
    }

    /// Apply insert-if-absent to each article in order; the first occurrence
    /// of a repeated link wins. Rows written before a failure stay written.
    pub async fn save_articles(&self, articles: Vec<NewArticle>) -> Result<SaveSummary> {
        let mut summary = SaveSummary {
            attempted: articles.len(),
            ..SaveSummary::default()
        };
        if articles.is_empty() {
            tracing::info!("No articles to save");
            return Ok(summary);
        }

        for article in articles {
            let link = article.link.clone();
            match self.insert_if_absent(article).await {
                Ok(true) => summary.inserted += 1,
                Ok(false) => {
                    tracing::debug!(%link, "Article already stored");
                    summary.existing += 1;
                }
                Err(e) => {
                    tracing::warn!(%link, error = %e, "Failed to save article");
                    return Err(AppError::Persistence {
                        attempted: summary.attempted,
                        confirmed: summary.confirmed(),
                        inserted: summary.inserted,
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            attempted = summary.attempted,
            inserted = summary.inserted,
            existing = summary.existing,
            "Saved articles"
        );
        Ok(summary)
    }

    // Read path

    /// Up to `limit` articles, newest `scraped_at` first; ties go to the later insert.
    pub async fn recent_articles(&self, limit: usize) -> Result<Vec<Article>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let articles = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ARTICLE_COLUMNS} FROM articles \
                     ORDER BY scraped_at DESC, id DESC LIMIT ?1"
                ))?;
                let articles = stmt
                    .query_map(params![limit], article_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(articles)
            })
            .await?;
        Ok(articles)
    }

    pub async fn all_articles(&self) -> Result<Vec<Article>> {
        let articles = self
            .conn
            .call(|conn| {
                let mut stmt =
                    conn.prepare(&format!("SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY id"))?;
                let articles = stmt
                    .query_map([], article_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(articles)
            })
            .await?;
        Ok(articles)
    }

    // Maintenance

    /// One-time cleanup for stores written without the insert-if-absent
    /// guard: keep the earliest row per link, then add a unique index.
    pub async fn collapse_duplicates(&self) -> Result<DedupeReport> {
        let report = self
            .conn
            .call(|conn| {
                let tx = conn.transaction()?;
                let removed = tx.execute(
                    "DELETE FROM articles \
                     WHERE id NOT IN (SELECT MIN(id) FROM articles GROUP BY link)",
                    [],
                )?;
                tx.commit()?;

                let unique_index = match conn.execute_batch(UNIQUE_LINK_INDEX) {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to create unique index on link");
                        false
                    }
                };

                Ok(DedupeReport {
                    removed,
                    unique_index,
                })
            })
            .await?;

        if report.removed > 0 {
            tracing::info!(removed = report.removed, "Removed duplicate articles");
        }
        Ok(report)
    }
}

fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Only the form written by [`format_timestamp`] is accepted: recency
/// ordering compares the stored text, which matches time order for that form alone.
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .filter(|dt| dt.offset().local_minus_utc() == 0)
        .map(|dt| dt.with_timezone(&Utc))
}

fn article_from_row(row: &Row) -> rusqlite::Result<Article> {
    let scraped_at: String = row.get(6)?;
    let scraped_at = parse_datetime(&scraped_at).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            Type::Text,
            format!("invalid scraped_at timestamp `{scraped_at}`").into(),
        )
    })?;

    Ok(Article {
        id: row.get(0)?,
        source: row.get(1)?,
        title: row.get(2)?,
        date: row.get(3)?,
        link: row.get(4)?,
        category: row.get(5)?,
        scraped_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn candidate(link: &str, title: &str, scraped_at: DateTime<Utc>) -> NewArticle {
        NewArticle {
            source: "Detik".to_string(),
            title: title.to_string(),
            date: "Senin, 05 Mei 2025".to_string(),
            link: link.to_string(),
            category: "detikHot".to_string(),
            scraped_at,
        }
    }

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 6, 8, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let repo = Repository::in_memory().await.unwrap();
        let batch = vec![
            candidate("https://detik.com/1", "Satu", base_time()),
            candidate("https://detik.com/2", "Dua", base_time()),
        ];

        let first = repo.save_articles(batch.clone()).await.unwrap();
        let before = repo.all_articles().await.unwrap();
        let second = repo.save_articles(batch).await.unwrap();
        let after = repo.all_articles().await.unwrap();

        assert_eq!(first.inserted, 2);
        assert_eq!(second.inserted, 0);
        assert_eq!(second.existing, 2);
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_duplicate_links_in_batch_keep_first() {
        let repo = Repository::in_memory().await.unwrap();
        let batch = vec![
            candidate("https://detik.com/1", "Pertama", base_time()),
            candidate("https://detik.com/1", "Kedua", base_time()),
        ];

        let summary = repo.save_articles(batch).await.unwrap();
        let stored = repo.all_articles().await.unwrap();

        assert_eq!(
            summary,
            SaveSummary {
                attempted: 2,
                inserted: 1,
                existing: 1
            }
        );
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "Pertama");
    }

    #[tokio::test]
    async fn test_rescrape_does_not_touch_existing_record() {
        let repo = Repository::in_memory().await.unwrap();
        let original = candidate("https://detik.com/1", "Asli", base_time());
        let later = candidate("https://detik.com/1", "Diubah", base_time() + Duration::days(3));

        assert!(repo.insert_if_absent(original.clone()).await.unwrap());
        assert!(!repo.insert_if_absent(later).await.unwrap());

        let stored = repo.all_articles().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, original.title);
        assert_eq!(stored[0].scraped_at, original.scraped_at);
    }

    #[tokio::test]
    async fn test_empty_batch_is_nothing_to_save() {
        let repo = Repository::in_memory().await.unwrap();
        let summary = repo.save_articles(Vec::new()).await.unwrap();
        assert!(summary.is_empty());
    }

    #[tokio::test]
    async fn test_empty_store_reads_are_empty() {
        let repo = Repository::in_memory().await.unwrap();
        assert!(repo.recent_articles(10).await.unwrap().is_empty());
        assert!(repo.all_articles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recent_articles_newest_first() {
        let repo = Repository::in_memory().await.unwrap();
        // Insert out of chronological order.
        let batch: Vec<_> = (0..15)
            .map(|i| (i * 7) % 15)
            .map(|i| {
                candidate(
                    &format!("https://detik.com/{i}"),
                    &format!("Artikel {i}"),
                    base_time() + Duration::minutes(i),
                )
            })
            .collect();
        repo.save_articles(batch).await.unwrap();

        let recent = repo.recent_articles(10).await.unwrap();

        let titles: Vec<_> = recent.iter().map(|a| a.title.as_str()).collect();
        let expected: Vec<_> = (5..15).rev().map(|i| format!("Artikel {i}")).collect();
        assert_eq!(titles, expected);
    }

    #[tokio::test]
    async fn test_recent_ties_break_by_insertion_order() {
        let repo = Repository::in_memory().await.unwrap();
        repo.save_articles(vec![
            candidate("https://detik.com/a", "A", base_time()),
            candidate("https://detik.com/b", "B", base_time()),
        ])
        .await
        .unwrap();

        let recent = repo.recent_articles(2).await.unwrap();
        assert_eq!(recent[0].title, "B");
        assert_eq!(recent[1].title, "A");
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_applied_rows() {
        let repo = Repository::in_memory().await.unwrap();
        repo.conn
            .call(|conn| {
                conn.execute_batch(
                    "CREATE TRIGGER reject_boom BEFORE INSERT ON articles
                     WHEN NEW.title = 'boom'
                     BEGIN SELECT RAISE(ABORT, 'write rejected'); END;",
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let batch = vec![
            candidate("https://detik.com/1", "Satu", base_time()),
            candidate("https://detik.com/2", "boom", base_time()),
            candidate("https://detik.com/3", "Tiga", base_time()),
        ];
        let err = repo.save_articles(batch).await.unwrap_err();

        match err {
            AppError::Persistence { attempted, confirmed, inserted, .. } => {
                assert_eq!((attempted, confirmed, inserted), (3, 1, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(repo.all_articles().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_collapse_duplicates_keeps_earliest_row() {
        let repo = Repository::in_memory().await.unwrap();
        repo.conn
            .call(|conn| {
                for title in ["Pertama", "Kedua", "Ketiga"] {
                    conn.execute(
                        "INSERT INTO articles (source, title, date, link, category, scraped_at)
                         VALUES ('Detik', ?1, 'Senin', 'https://detik.com/dup', 'Unknown', ?2)",
                        params![title, format_timestamp(&base_time())],
                    )?;
                }
                Ok(())
            })
            .await
            .unwrap();
        repo.insert_if_absent(candidate("https://detik.com/other", "Lain", base_time()))
            .await
            .unwrap();

        let report = repo.collapse_duplicates().await.unwrap();
        let stored = repo.all_articles().await.unwrap();

        assert_eq!(
            report,
            DedupeReport {
                removed: 2,
                unique_index: true
            }
        );
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].title, "Pertama");

        let again = repo.collapse_duplicates().await.unwrap();
        assert_eq!(again.removed, 0);
    }

    #[tokio::test]
    async fn test_non_canonical_timestamp_is_a_read_error() {
        let repo = Repository::in_memory().await.unwrap();
        repo.conn
            .call(|conn| {
                conn.execute(
                    "INSERT INTO articles (source, title, date, link, category, scraped_at)
                     VALUES ('Detik', 'Lama', 'Senin', 'https://detik.com/old', 'Unknown',
                             '2025-05-06 08:30:00')",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        assert!(repo.recent_articles(10).await.is_err());
        assert!(repo.all_articles().await.is_err());
    }

    #[test]
    fn test_parse_datetime_accepts_only_utc_rfc3339() {
        let written = format_timestamp(&base_time());
        assert_eq!(written, "2025-05-06T08:30:00.000000Z");
        assert_eq!(parse_datetime(&written), Some(base_time()));
        assert_eq!(parse_datetime("2025-05-06T15:30:00+07:00"), None);
        assert_eq!(parse_datetime("2025-05-06 08:30:00"), None);
    }

    #[tokio::test]
    async fn test_concurrent_writers_insert_link_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.db");
        let path = path.to_string_lossy().to_string();

        let first = Repository::new(&path).await.unwrap();
        let second = Repository::new(&path).await.unwrap();

        let (a, b) = tokio::join!(
            first.insert_if_absent(candidate("https://detik.com/1", "Satu", base_time())),
            second.insert_if_absent(candidate("https://detik.com/1", "Dua", base_time())),
        );

        let outcomes = [a.unwrap(), b.unwrap()];
        assert_eq!(outcomes.iter().filter(|inserted| **inserted).count(), 1);
        assert_eq!(first.all_articles().await.unwrap().len(), 1);
        assert_eq!(second.all_articles().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.db");
        let path = path.to_string_lossy().to_string();

        {
            let repo = Repository::new(&path).await.unwrap();
            repo.insert_if_absent(candidate("https://detik.com/1", "Satu", base_time()))
                .await
                .unwrap();
        }

        let repo = Repository::new(&path).await.unwrap();
        let stored = repo.all_articles().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].scraped_at, base_time());
    }
}
