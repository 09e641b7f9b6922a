use crate::analytics::{Dashboard, SourceFilter, WordFilter};
use crate::config::Config;
use crate::db::Repository;
use crate::error::Result;
use crate::models::{Article, StatusLevel};
use crate::scrape::ScrapePipeline;
use crate::tui::AppAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Recent,
    Analytics,
}

impl Tab {
    pub fn index(self) -> usize {
        match self {
            Tab::Recent => 0,
            Tab::Analytics => 1,
        }
    }

    fn next(self) -> Self {
        match self {
            Tab::Recent => Tab::Analytics,
            Tab::Analytics => Tab::Recent,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

pub struct App {
    // Data
    pub recent: Vec<Article>,
    pub articles: Vec<Article>,
    pub dashboard: Dashboard,

    // UI State
    pub tab: Tab,
    pub selected_index: usize,
    /// Highlighted row of the article details listing on the analytics tab.
    pub details_index: usize,
    pub source_filter: SourceFilter,
    pub selected_year: Option<i32>,
    pub show_help: bool,
    pub status: Option<StatusMessage>,

    /// Set by the scrape key; the run loop draws once, then performs the scrape.
    pub scrape_pending: bool,

    // Services
    pub repository: Repository,
    pipeline: ScrapePipeline,
    words: WordFilter,
    recent_limit: usize,
}

impl App {
    pub async fn new(config: &Config, repository: Repository) -> Result<Self> {
        let pipeline = ScrapePipeline::new(config)?;

        let mut app = Self {
            recent: Vec::new(),
            articles: Vec::new(),
            dashboard: Dashboard::default(),
            tab: Tab::default(),
            selected_index: 0,
            details_index: 0,
            source_filter: SourceFilter::All,
            selected_year: None,
            show_help: false,
            status: None,
            scrape_pending: false,
            repository,
            pipeline,
            words: WordFilter::ballet(),
            recent_limit: config.recent_limit,
        };
        app.reload().await?;
        Ok(app)
    }

    pub fn source_name(&self) -> &str {
        self.pipeline.source()
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.recent.get(self.selected_index)
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::MoveUp => match self.tab {
                Tab::Recent => self.selected_index = self.selected_index.saturating_sub(1),
                Tab::Analytics => self.details_index = self.details_index.saturating_sub(1),
            },

            AppAction::MoveDown => match self.tab {
                Tab::Recent => {
                    if self.selected_index + 1 < self.recent.len() {
                        self.selected_index += 1;
                    }
                }
                Tab::Analytics => {
                    if self.details_index + 1 < self.dashboard.detail_rows() {
                        self.details_index += 1;
                    }
                }
            },

            AppAction::OpenInBrowser => {
                if let Some(article) = self.selected_article() {
                    if let Err(e) = open::that(&article.link) {
                        tracing::warn!(link = %article.link, error = %e, "Failed to open browser");
                    }
                }
            }

            AppAction::Scrape => {
                self.scrape_pending = true;
                self.set_status(StatusLevel::Info, format!("Scraping {}...", self.source_name()));
            }

            AppAction::Reload => match self.reload().await {
                Ok(()) => self.status = None,
                Err(e) => self.set_status(StatusLevel::Error, format!("Reload failed: {e}")),
            },

            AppAction::NextTab => self.tab = self.tab.next(),

            AppAction::CycleSource => {
                self.source_filter =
                    next_source_filter(&self.source_filter, &self.dashboard.sources);
                self.rebuild_dashboard();
            }

            AppAction::PreviousYear => self.shift_year(-1),
            AppAction::NextYear => self.shift_year(1),

            AppAction::ShowHelp => self.show_help = true,
            AppAction::HideHelp => self.show_help = false,
        }

        Ok(false)
    }

    /// Perform a scrape requested by [`AppAction::Scrape`], then reload.
    /// A failed reload keeps the previous data and is reported on the status line.
    pub async fn run_pending_scrape(&mut self) -> Result<()> {
        if !self.scrape_pending {
            return Ok(());
        }
        self.scrape_pending = false;

        let report = self.pipeline.run(&self.repository).await;
        let (level, text) = report.message();
        self.set_status(level, text.clone());

        if let Err(e) = self.reload().await {
            self.set_status(StatusLevel::Error, format!("{text} | reload failed: {e}"));
        }
        Ok(())
    }

    /// Re-read the store. Nothing is replaced unless both reads succeed.
    async fn reload(&mut self) -> Result<()> {
        let recent = self.repository.recent_articles(self.recent_limit).await?;
        let articles = self.repository.all_articles().await?;
        self.recent = recent;
        self.articles = articles;

        if self.selected_index >= self.recent.len() {
            self.selected_index = self.recent.len().saturating_sub(1);
        }
        self.rebuild_dashboard();
        Ok(())
    }

    fn rebuild_dashboard(&mut self) {
        self.dashboard = Dashboard::build(
            &self.articles,
            &self.source_filter,
            self.selected_year,
            &self.words,
        );
        self.selected_year = self.dashboard.selected_year;
        self.details_index = self
            .details_index
            .min(self.dashboard.detail_rows().saturating_sub(1));
    }

    fn shift_year(&mut self, delta: isize) {
        let years = &self.dashboard.years;
        let Some(current) = self
            .selected_year
            .and_then(|y| years.iter().position(|&candidate| candidate == y))
        else {
            return;
        };

        let target = current.saturating_add_signed(delta).min(years.len() - 1);
        if target != current {
            self.selected_year = Some(years[target]);
            self.rebuild_dashboard();
        }
    }

    fn set_status(&mut self, level: StatusLevel, text: String) {
        match level {
            StatusLevel::Info => tracing::info!("{text}"),
            StatusLevel::Warning => tracing::warn!("{text}"),
            StatusLevel::Error => tracing::error!("{text}"),
        }
        self.status = Some(StatusMessage { level, text });
    }
}

/// All → each known source in turn → All.
fn next_source_filter(current: &SourceFilter, sources: &[String]) -> SourceFilter {
    let next_index = match current {
        SourceFilter::All => 0,
        SourceFilter::Only(selected) => sources
            .iter()
            .position(|s| selected.len() == 1 && selected.contains(s))
            .map_or(sources.len(), |i| i + 1),
    };

    sources
        .get(next_index)
        .map(|source| SourceFilter::only([source.clone()]))
        .unwrap_or(SourceFilter::All)
}
