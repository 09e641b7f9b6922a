use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    MoveUp,
    MoveDown,
    OpenInBrowser,
    Scrape,
    Reload,
    NextTab,
    CycleSource,
    PreviousYear,
    NextYear,
    ShowHelp,
    HideHelp,
}

pub fn handle_key_event(key: KeyEvent, show_help: bool) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),

        (KeyCode::Enter, _) | (KeyCode::Char('o'), _) => Some(AppAction::OpenInBrowser),

        (KeyCode::Char('s'), _) => Some(AppAction::Scrape),
        (KeyCode::Char('r'), _) => Some(AppAction::Reload),
        (KeyCode::Tab, _) | (KeyCode::BackTab, _) => Some(AppAction::NextTab),
        (KeyCode::Char('f'), _) => Some(AppAction::CycleSource),
        (KeyCode::Char('['), _) | (KeyCode::Left, _) => Some(AppAction::PreviousYear),
        (KeyCode::Char(']'), _) | (KeyCode::Right, _) => Some(AppAction::NextYear),

        (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

        _ => None,
    }
}
