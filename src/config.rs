use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub source: SourceConfig,
}

/// Where to scrape and how to find each field in the listing markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub name: String,
    pub url: String,
    pub container: String,
    pub title: String,
    /// Element carrying the link. Falls back to the title element when
    /// absent or empty.
    pub link: Option<String>,
    pub link_attr: String,
    pub date: String,
    /// Category element. An empty string turns the lookup off, and every
    /// article gets the `Unknown` category.
    pub category: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            name: "Detik".to_string(),
            url: "https://www.detik.com/tag/balet".to_string(),
            container: "div.list-content__item".to_string(),
            title: "a.media__title".to_string(),
            link: None,
            link_attr: "href".to_string(),
            date: "span.media__date".to_string(),
            category: Some("div.media__category".to_string()),
        }
    }
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ballet-news");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("articles.db").to_string_lossy().to_string()
}

fn default_recent_limit() -> usize {
    10
}

fn default_request_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            recent_limit: default_recent_limit(),
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
            source: SourceConfig::default(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location. A missing file is
    /// created with defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ballet-news")
            .join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.source.name.trim().is_empty() {
            return Err(AppError::Config("source.name must not be empty".to_string()));
        }
        url::Url::parse(&self.source.url)
            .map_err(|e| AppError::Config(format!("source.url `{}`: {e}", self.source.url)))?;
        Ok(())
    }
}
