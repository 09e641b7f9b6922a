//! Aggregates over stored articles for the dashboard.
//!
//! All functions are pure and return empty results for empty input. Time
//! buckets come from `scraped_at` in UTC, not from the site's display date.

mod vocabulary;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::models::Article;

pub use vocabulary::WordFilter;

/// Number of words shown in the frequency chart.
pub const TOP_WORDS: usize = 15;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SourceFilter {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl SourceFilter {
    pub fn only<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(sources.into_iter().map(Into::into).collect())
    }

    pub fn includes(&self, source: &str) -> bool {
        match self {
            SourceFilter::All => true,
            SourceFilter::Only(sources) => sources.contains(source),
        }
    }

    pub fn label(&self) -> String {
        match self {
            SourceFilter::All => "All sources".to_string(),
            SourceFilter::Only(sources) => sources.iter().cloned().collect::<Vec<_>>().join(", "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub source: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthSourceCount {
    pub month: u32,
    pub month_name: String,
    pub source: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleDetail {
    pub title: String,
    pub date: String,
    pub link: String,
    pub scraped_at: DateTime<Utc>,
}

/// Every included article of one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceArticles {
    pub source: String,
    pub articles: Vec<ArticleDetail>,
}

fn included<'a>(
    articles: &'a [Article],
    filter: &'a SourceFilter,
) -> impl Iterator<Item = &'a Article> + 'a {
    articles.iter().filter(move |a| filter.includes(&a.source))
}

/// Article count per source, largest first.
pub fn by_source(articles: &[Article], filter: &SourceFilter) -> Vec<SourceCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for article in included(articles, filter) {
        *counts.entry(article.source.as_str()).or_default() += 1;
    }

    let mut rows: Vec<_> = counts
        .into_iter()
        .map(|(source, count)| SourceCount {
            source: source.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.source.cmp(&b.source)));
    rows
}

pub fn by_year(articles: &[Article], filter: &SourceFilter) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for article in included(articles, filter) {
        *counts.entry(article.scraped_at.year()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Counts per (month, source) within `year`, ordered by month then source.
pub fn by_month_and_source(
    articles: &[Article],
    filter: &SourceFilter,
    year: i32,
) -> Vec<MonthSourceCount> {
    let mut counts: BTreeMap<(u32, &str), usize> = BTreeMap::new();
    for article in included(articles, filter).filter(|a| a.scraped_at.year() == year) {
        *counts
            .entry((article.scraped_at.month(), article.source.as_str()))
            .or_default() += 1;
    }

    counts
        .into_iter()
        .map(|((month, source), count)| MonthSourceCount {
            month,
            month_name: month_name(month),
            source: source.to_string(),
            count,
        })
        .collect()
}

/// Frequency of vocabulary words across included titles, most frequent
/// first, ties alphabetical.
pub fn word_frequency(
    articles: &[Article],
    filter: &SourceFilter,
    words: &WordFilter,
) -> Vec<WordCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for article in included(articles, filter) {
        for word in words.tokens(&article.title) {
            *counts.entry(word).or_default() += 1;
        }
    }

    let mut rows: Vec<_> = counts
        .into_iter()
        .map(|(word, count)| WordCount { word, count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    rows
}

/// Included articles grouped by source (alphabetical), each group in store order.
pub fn article_details(articles: &[Article], filter: &SourceFilter) -> Vec<SourceArticles> {
    let mut groups: BTreeMap<&str, Vec<ArticleDetail>> = BTreeMap::new();
    for article in included(articles, filter) {
        groups
            .entry(article.source.as_str())
            .or_default()
            .push(ArticleDetail {
                title: article.title.clone(),
                date: article.date.clone(),
                link: article.link.clone(),
                scraped_at: article.scraped_at,
            });
    }

    groups
        .into_iter()
        .map(|(source, articles)| SourceArticles {
            source: source.to_string(),
            articles,
        })
        .collect()
}

pub fn available_sources(articles: &[Article]) -> Vec<String> {
    articles
        .iter()
        .map(|a| a.source.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct years over all articles, ignoring any source filter.
pub fn available_years(articles: &[Article]) -> Vec<i32> {
    articles
        .iter()
        .map(|a| a.scraped_at.year())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn month_name(month: u32) -> String {
    NaiveDate::from_ymd_opt(2000, month, 1)
        .map(|d| d.format("%B").to_string())
        .unwrap_or_default()
}

/// Every projection the dashboard renders, computed in one pass over the store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dashboard {
    pub total: usize,
    pub sources: Vec<String>,
    pub years: Vec<i32>,
    pub selected_year: Option<i32>,
    pub by_source: Vec<SourceCount>,
    pub by_year: Vec<YearCount>,
    pub by_month: Vec<MonthSourceCount>,
    pub top_words: Vec<WordCount>,
    pub details: Vec<SourceArticles>,
}

impl Dashboard {
    /// `year` defaults to the earliest available year when absent or unknown.
    pub fn build(
        articles: &[Article],
        filter: &SourceFilter,
        year: Option<i32>,
        words: &WordFilter,
    ) -> Self {
        let years = available_years(articles);
        let selected_year = year
            .filter(|y| years.contains(y))
            .or_else(|| years.first().copied());

        let mut top_words = word_frequency(articles, filter, words);
        top_words.truncate(TOP_WORDS);

        Self {
            total: included(articles, filter).count(),
            sources: available_sources(articles),
            selected_year,
            by_source: by_source(articles, filter),
            by_year: by_year(articles, filter),
            by_month: selected_year
                .map(|y| by_month_and_source(articles, filter, y))
                .unwrap_or_default(),
            top_words,
            details: article_details(articles, filter),
            years,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Rows of the details listing: one heading per source plus its articles.
    pub fn detail_rows(&self) -> usize {
        self.details.iter().map(|group| 1 + group.articles.len()).sum()
    }
}
