use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        BarChart, Block, Borders, List, ListItem, ListState, Paragraph, Row, Table, TableState,
        Tabs,
    },
    Frame,
};

use crate::app::{App, Tab};
use crate::models::StatusLevel;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Tab content
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_tabs(frame, app, chunks[0]);
    match app.tab {
        Tab::Recent => render_recent(frame, app, chunks[1]),
        Tab::Analytics => render_analytics(frame, app, chunks[1]),
    }
    render_status(frame, app, chunks[2]);

    if app.show_help {
        render_help(frame);
    }
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(
        " Ballet News Scraper [{}] | {} stored ",
        app.source_filter.label(),
        app.articles.len()
    );

    let tabs = Tabs::new(vec!["Recent Articles", "Visualizations"])
        .select(app.tab.index())
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_recent(frame: &mut Frame, app: &App, area: Rect) {
    if app.recent.is_empty() {
        let paragraph = Paragraph::new("No articles yet. Press 's' to scrape.")
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .recent
        .iter()
        .map(|article| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    article.title.as_str(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(vec![
                    Span::styled(
                        format!("[{}] ", article.source),
                        Style::default().fg(Color::Blue),
                    ),
                    Span::styled(
                        format!("Date: {} | Category: {}", article.date, article.category),
                        Style::default().fg(Color::Gray),
                    ),
                ]),
                Line::from(Span::styled(
                    article.link.as_str(),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title(" Recent Articles ").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_analytics(frame: &mut Frame, app: &App, area: Rect) {
    if app.dashboard.is_empty() {
        let paragraph = Paragraph::new("No data available for visualization")
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Min(6),
        ])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    let dashboard = &app.dashboard;

    let by_source: Vec<(&str, u64)> = dashboard
        .by_source
        .iter()
        .map(|row| (row.source.as_str(), row.count as u64))
        .collect();
    render_bars(frame, top[0], " Articles by Source ", &by_source, 10, Color::Cyan);

    let year_labels: Vec<String> = dashboard
        .by_year
        .iter()
        .map(|row| row.year.to_string())
        .collect();
    let by_year: Vec<(&str, u64)> = year_labels
        .iter()
        .zip(&dashboard.by_year)
        .map(|(label, row)| (label.as_str(), row.count as u64))
        .collect();
    render_bars(frame, top[1], " Articles by Year ", &by_year, 6, Color::Green);

    render_monthly(frame, app, bottom[0]);

    let words: Vec<(&str, u64)> = dashboard
        .top_words
        .iter()
        .map(|row| (row.word.as_str(), row.count as u64))
        .collect();
    if words.is_empty() {
        let paragraph = Paragraph::new("No words to analyze after filtering")
            .block(Block::default().title(" Most Common Words ").borders(Borders::ALL))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, bottom[1]);
    } else {
        render_bars(frame, bottom[1], " Most Common Words ", &words, 8, Color::Magenta);
    }

    render_details(frame, app, rows[2]);
}

fn render_bars(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    data: &[(&str, u64)],
    bar_width: u16,
    color: Color,
) {
    let chart = BarChart::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .data(data)
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(color))
        .value_style(Style::default().fg(Color::Black).bg(color));

    frame.render_widget(chart, area);
}

fn render_monthly(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.selected_year {
        Some(year) => format!(" Monthly Articles in {year}  [/] "),
        None => " Monthly Articles ".to_string(),
    };

    let rows: Vec<Row> = app
        .dashboard
        .by_month
        .iter()
        .map(|row| {
            Row::new(vec![
                row.month_name.clone(),
                row.source.clone(),
                row.count.to_string(),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Min(8),
            Constraint::Length(6),
        ],
    )
    .header(
        Row::new(vec!["Month", "Source", "Count"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().title(title).borders(Borders::ALL));

    frame.render_widget(table, area);
}

fn render_details(frame: &mut Frame, app: &App, area: Rect) {
    let heading = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut rows = Vec::with_capacity(app.dashboard.detail_rows());
    for group in &app.dashboard.details {
        rows.push(
            Row::new(vec![
                format!("{} ({} articles)", group.source, group.articles.len()),
                String::new(),
                String::new(),
                String::new(),
            ])
            .style(heading),
        );
        rows.extend(group.articles.iter().map(|article| {
            Row::new(vec![
                article.title.clone(),
                article.date.clone(),
                article.scraped_at.format("%Y-%m-%d %H:%M").to_string(),
                article.link.clone(),
            ])
        }));
    }

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Length(22),
            Constraint::Length(16),
            Constraint::Min(20),
        ],
    )
    .header(
        Row::new(vec!["Title", "Date", "Scraped At", "Link"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .title(" Article Details  [j/k] ")
            .borders(Borders::ALL),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = TableState::default();
    state.select(Some(app.details_index));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = match &app.status {
        Some(status) => {
            let color = match status.level {
                StatusLevel::Info => Color::Green,
                StatusLevel::Warning => Color::Yellow,
                StatusLevel::Error => Color::Red,
            };
            (status.text.clone(), Style::default().fg(color))
        }
        None => (
            "s:scrape  tab:switch  j/k:nav  o:open  f:source  [/]:year  ?:help  q:quit".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    };

    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let help_text = [
        "",
        " Articles:",
        "   s        Scrape & save latest articles",
        "   r        Reload from the store",
        "   j / ↓    Move down",
        "   k / ↑    Move up",
        "   Enter/o  Open in browser",
        "",
        " Visualizations:",
        "   Tab      Switch tab",
        "   j / k    Scroll article details",
        "   f        Cycle source filter",
        "   [ / ]    Previous / next year",
        "",
        " General:",
        "   ?        Toggle this help",
        "   q        Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
