//! Selector-driven extraction of article candidates from a listing page.
//!
//! Every selector comes from [`SourceConfig`], so a markup change on the site
//! (or a new source) is a config edit. Containers that lack a required field
//! are skipped one at a time; they never abort the rest of the page.

use chrono::{DateTime, Utc};
use scraper::html::Select;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::SourceConfig;
use crate::error::{AppError, ExtractionSkip, Result, SkipReason};
use crate::models::{NewArticle, UNKNOWN_CATEGORY};

pub struct Extractor {
    source: String,
    base_url: Url,
    container: Selector,
    title: Selector,
    link: Option<Selector>,
    link_attr: String,
    date: Selector,
    category: Option<Selector>,
}

/// Candidates and skips from one page.
#[derive(Debug, Default)]
pub struct ExtractionReport {
    pub articles: Vec<NewArticle>,
    pub skipped: Vec<ExtractionSkip>,
}

impl Extractor {
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let base_url = Url::parse(&config.url)
            .map_err(|e| AppError::Config(format!("source.url `{}`: {e}", config.url)))?;

        Ok(Self {
            source: config.name.clone(),
            base_url,
            container: parse_selector(&config.container)?,
            title: parse_selector(&config.title)?,
            link: optional_selector(config.link.as_deref())?,
            link_attr: config.link_attr.clone(),
            date: parse_selector(&config.date)?,
            category: optional_selector(config.category.as_deref())?,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Lazily walk the article containers of `document`.
    pub fn extract<'a>(&'a self, document: &'a Html, scraped_at: DateTime<Utc>) -> Extraction<'a> {
        Extraction {
            extractor: self,
            containers: document.select(&self.container),
            scraped_at,
            index: 0,
        }
    }

    /// Parse `html` and drain the extraction. `Html` is not `Send`, so this
    /// stays synchronous.
    pub fn extract_html(&self, html: &str, scraped_at: DateTime<Utc>) -> ExtractionReport {
        let document = Html::parse_document(html);
        let mut report = ExtractionReport::default();

        for candidate in self.extract(&document, scraped_at) {
            match candidate {
                Ok(article) => report.articles.push(article),
                Err(skip) => {
                    tracing::debug!(source = %self.source, "{skip}");
                    report.skipped.push(skip);
                }
            }
        }

        tracing::info!(
            source = %self.source,
            found = report.articles.len(),
            skipped = report.skipped.len(),
            "Extracted articles"
        );
        report
    }

    fn extract_one(
        &self,
        container: ElementRef<'_>,
        index: usize,
        scraped_at: DateTime<Utc>,
    ) -> std::result::Result<NewArticle, ExtractionSkip> {
        let skip = |reason| ExtractionSkip { index, reason };

        let title_element = container.select(&self.title).next();
        let title = title_element
            .map(element_text)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| skip(SkipReason::MissingTitle))?;

        let link_element = match &self.link {
            Some(selector) => container.select(selector).next(),
            None => title_element,
        };
        let href = link_element
            .and_then(|el| el.value().attr(&self.link_attr))
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| skip(SkipReason::MissingLink))?;
        let link = self
            .canonical_link(href)
            .ok_or_else(|| skip(SkipReason::InvalidLink(href.to_string())))?;

        let date = container
            .select(&self.date)
            .next()
            .map(element_text)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| skip(SkipReason::MissingDate))?;

        let category = self
            .category
            .as_ref()
            .and_then(|selector| container.select(selector).next())
            .map(element_text)
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());

        Ok(NewArticle {
            source: self.source.clone(),
            title,
            date,
            link,
            category,
            scraped_at,
        })
    }

    /// Absolute URL without fragment, so relative and absolute hrefs for the
    /// same page share one key.
    fn canonical_link(&self, href: &str) -> Option<String> {
        let mut url = self.base_url.join(href).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        url.set_fragment(None);
        Some(url.to_string())
    }
}

pub struct Extraction<'a> {
    extractor: &'a Extractor,
    containers: Select<'a, 'a>,
    scraped_at: DateTime<Utc>,
    index: usize,
}

impl Iterator for Extraction<'_> {
    type Item = std::result::Result<NewArticle, ExtractionSkip>;

    fn next(&mut self) -> Option<Self::Item> {
        let container = self.containers.next()?;
        let index = self.index;
        self.index += 1;
        Some(self.extractor.extract_one(container, index, self.scraped_at))
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| AppError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// An empty selector string means the field is not looked up.
fn optional_selector(selector: Option<&str>) -> Result<Option<Selector>> {
    selector
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_selector)
        .transpose()
}

fn element_text(element: ElementRef<'_>) -> String {
    let text: String = element.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(
        title: Option<&str>,
        href: Option<&str>,
        date: Option<&str>,
        category: Option<&str>,
    ) -> String {
        let title = match (title, href) {
            (Some(t), Some(h)) => format!(r#"<a class="media__title" href="{h}">{t}</a>"#),
            (Some(t), None) => format!(r#"<a class="media__title">{t}</a>"#),
            (None, Some(h)) => format!(r#"<a class="media__link" href="{h}"></a>"#),
            (None, None) => String::new(),
        };
        let date = date
            .map(|d| format!(r#"<span class="media__date">{d}</span>"#))
            .unwrap_or_default();
        let category = category
            .map(|c| format!(r#"<div class="media__category">{c}</div>"#))
            .unwrap_or_default();
        format!(r#"<div class="list-content__item">{category}{title}{date}</div>"#)
    }

    fn page(items: &[String]) -> String {
        format!(
            "<html><body><div class=\"list-content\">{}</div></body></html>",
            items.concat()
        )
    }

    fn extractor() -> Extractor {
        Extractor::from_config(&SourceConfig::default()).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 6, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_skips_malformed_container_and_keeps_the_rest() {
        let html = page(&[
            item(Some("Balet Klasik"), Some("/a1"), Some("Senin, 05 Mei"), Some("detikNews")),
            item(Some("Penari Muda"), Some("/a2"), Some("Selasa, 06 Mei"), Some("detikHot")),
            item(None, Some("/a3"), Some("Rabu, 07 Mei"), Some("detikHot")),
            item(Some("Latihan Pointe"), Some("/a4"), Some("Kamis, 08 Mei"), None),
            item(Some("Pentas Akhir"), Some("/a5"), Some("Jumat, 09 Mei"), Some("detikEdu")),
        ]);

        let report = extractor().extract_html(&html, now());

        assert_eq!(report.articles.len(), 4);
        assert_eq!(
            report.skipped,
            vec![ExtractionSkip {
                index: 2,
                reason: SkipReason::MissingTitle
            }]
        );
        assert!(report
            .articles
            .iter()
            .all(|a| a.source == "Detik" && a.scraped_at == now()));
    }

    #[test]
    fn test_missing_category_defaults_to_unknown() {
        let html = page(&[item(Some("Latihan Pointe"), Some("/a4"), Some("Kamis"), None)]);

        let report = extractor().extract_html(&html, now());

        assert_eq!(report.articles.len(), 1);
        assert_eq!(report.articles[0].category, UNKNOWN_CATEGORY);
    }

    #[test]
    fn test_missing_link_or_date_is_skipped() {
        let html = page(&[
            item(Some("Tanpa Tautan"), None, Some("Senin"), None),
            item(Some("Tanpa Tanggal"), Some("/a2"), None, None),
            item(Some("Tanggal Kosong"), Some("/a3"), Some("   "), None),
        ]);

        let report = extractor().extract_html(&html, now());

        assert!(report.articles.is_empty());
        let reasons: Vec<_> = report.skipped.into_iter().map(|s| s.reason).collect();
        assert_eq!(
            reasons,
            vec![SkipReason::MissingLink, SkipReason::MissingDate, SkipReason::MissingDate]
        );
    }

    #[test]
    fn test_relative_links_resolve_against_source_url() {
        let html = page(&[
            item(Some("Relatif"), Some("/berita/balet-1#komentar"), Some("Senin"), None),
            item(
                Some("Absolut"),
                Some("https://www.detik.com/berita/balet-1"),
                Some("Senin"),
                None,
            ),
        ]);

        let report = extractor().extract_html(&html, now());

        assert_eq!(report.articles[0].link, "https://www.detik.com/berita/balet-1");
        assert_eq!(report.articles[0].link, report.articles[1].link);
    }

    #[test]
    fn test_non_http_link_is_invalid() {
        let html = page(&[item(Some("Skrip"), Some("javascript:void(0)"), Some("Senin"), None)]);

        let report = extractor().extract_html(&html, now());

        assert_eq!(
            report.skipped[0].reason,
            SkipReason::InvalidLink("javascript:void(0)".to_string())
        );
    }

    #[test]
    fn test_text_is_trimmed_and_whitespace_collapsed() {
        let html = page(&[item(
            Some("\n   Pertunjukan   <b>Balet</b>\n  Menakjubkan  "),
            Some("/a1"),
            Some("  Senin, 05 Mei 2025 "),
            Some(" detikHot "),
        )]);

        let article = &extractor().extract_html(&html, now()).articles[0];

        assert_eq!(article.title, "Pertunjukan Balet Menakjubkan");
        assert_eq!(article.date, "Senin, 05 Mei 2025");
        assert_eq!(article.category, "detikHot");
    }

    #[test]
    fn test_separate_link_selector() {
        let config = SourceConfig {
            container: "article".to_string(),
            title: "h2".to_string(),
            link: Some("a.permalink".to_string()),
            date: "time".to_string(),
            category: None,
            ..SourceConfig::default()
        };
        let html = r#"<article>
            <h2>Gala Balet</h2>
            <a class="permalink" href="/gala">baca</a>
            <time>2025-05-01</time>
        </article>"#;

        let report = Extractor::from_config(&config).unwrap().extract_html(html, now());

        assert_eq!(report.articles[0].link, "https://www.detik.com/gala");
        assert_eq!(report.articles[0].category, UNKNOWN_CATEGORY);
    }

    #[test]
    fn test_empty_selectors_are_disabled() {
        let config = SourceConfig {
            link: Some(String::new()),
            category: Some("  ".to_string()),
            ..SourceConfig::default()
        };
        let html = page(&[item(Some("Gala"), Some("/gala"), Some("Senin"), Some("detikHot"))]);

        let report = Extractor::from_config(&config).unwrap().extract_html(&html, now());

        assert_eq!(report.articles[0].link, "https://www.detik.com/gala");
        assert_eq!(report.articles[0].category, UNKNOWN_CATEGORY);
    }

    #[test]
    fn test_extraction_is_lazy_and_single_pass() {
        let html = page(&[
            item(Some("Satu"), Some("/1"), Some("Senin"), None),
            item(Some("Dua"), Some("/2"), Some("Senin"), None),
        ]);
        let document = Html::parse_document(&html);
        let extractor = extractor();

        let mut extraction = extractor.extract(&document, now());
        assert_eq!(extraction.next().unwrap().unwrap().title, "Satu");
        assert_eq!(extraction.next().unwrap().unwrap().title, "Dua");
        assert!(extraction.next().is_none());
    }

    #[test]
    fn test_page_without_containers_yields_nothing() {
        let html = "<html><body><p>Maintenance</p></body></html>";
        let report = extractor().extract_html(html, now());
        assert!(report.articles.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let config = SourceConfig {
            container: "div[[".to_string(),
            ..SourceConfig::default()
        };
        assert!(matches!(
            Extractor::from_config(&config),
            Err(AppError::Selector { .. })
        ));
    }
}
