use crate::domain::{ParseError, SelectableEntry, SmartLog};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// What the caller should do once the session is over.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    NoAction,
    NavigateTo(String),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SessionState {
    Browsing,
    Confirmed { target: Option<String> },
    Cancelled,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NavEvent {
    MoveUp,
    MoveDown,
    Confirm,
    Cancel,
}

#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// SIGINT/SIGTERM delivered outside the terminal's key stream.
    Interrupt,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AppCommand {
    None,
    Redraw,
    Exit(Outcome),
}

#[derive(Clone, Debug)]
pub struct AppModel {
    log: SmartLog,
    cursor: usize,
    initial_checkout: usize,
    state: SessionState,
}

impl AppModel {
    /// Starts a session on the current checkout. Fails on a malformed snapshot.
    pub fn new(log: SmartLog) -> Result<Self, AppError> {
        let initial_checkout = log.current_checkout_position()?;
        tracing::debug!(
            entries = log.entries().len(),
            initial_checkout,
            "navigation session started"
        );
        Ok(Self {
            log,
            cursor: initial_checkout,
            initial_checkout,
            state: SessionState::Browsing,
        })
    }

    pub fn log(&self) -> &SmartLog {
        &self.log
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn initial_checkout(&self) -> usize {
        self.initial_checkout
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self.state, SessionState::Browsing)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match &self.state {
            SessionState::Browsing => None,
            SessionState::Confirmed {
                target: Some(commit),
            } => Some(Outcome::NavigateTo(commit.clone())),
            SessionState::Confirmed { target: None } | SessionState::Cancelled => {
                Some(Outcome::NoAction)
            }
        }
    }

    pub fn selected_entry(&self) -> Option<&SelectableEntry> {
        self.log.entries().get(self.cursor)
    }

    /// Raw line indices to highlight: the commit line and its message line, if any.
    pub fn highlighted_line_indices(&self) -> &[usize] {
        self.selected_entry()
            .map(|entry| entry.line_indices.as_slice())
            .unwrap_or(&[])
    }

    fn last_position(&self) -> usize {
        self.log.entries().len().saturating_sub(1)
    }
}

pub fn nav_event_for_key(key: &KeyEvent) -> Option<NavEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(NavEvent::Cancel),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(NavEvent::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(NavEvent::MoveDown),
        KeyCode::Enter => Some(NavEvent::Confirm),
        KeyCode::Esc | KeyCode::Char('q') => Some(NavEvent::Cancel),
        _ => None,
    }
}

pub fn update(model: AppModel, event: AppEvent) -> Result<(AppModel, AppCommand), AppError> {
    if model.is_finished() {
        return Ok((model, AppCommand::None));
    }

    match event {
        AppEvent::Key(key) => match nav_event_for_key(&key) {
            Some(nav) => apply_nav_event(model, nav),
            None => Ok((model, AppCommand::None)),
        },
        AppEvent::Resize => Ok((model, AppCommand::Redraw)),
        AppEvent::Interrupt => apply_nav_event(model, NavEvent::Cancel),
    }
}

pub fn apply_nav_event(
    model: AppModel,
    nav: NavEvent,
) -> Result<(AppModel, AppCommand), AppError> {
    let mut model = model;
    if model.is_finished() {
        return Ok((model, AppCommand::None));
    }

    match nav {
        NavEvent::MoveUp => {
            if model.cursor == 0 {
                return Ok((model, AppCommand::None));
            }
            model.cursor -= 1;
            Ok((model, AppCommand::Redraw))
        }
        NavEvent::MoveDown => {
            if model.cursor >= model.last_position() {
                return Ok((model, AppCommand::None));
            }
            model.cursor += 1;
            Ok((model, AppCommand::Redraw))
        }
        NavEvent::Confirm => {
            let target = if model.cursor == model.initial_checkout {
                None
            } else {
                Some(model.log.resolve_commit_id(model.cursor)?)
            };
            tracing::info!(cursor = model.cursor, ?target, "selection confirmed");
            model.state = SessionState::Confirmed { target };
            let outcome = model.outcome().unwrap_or(Outcome::NoAction);
            Ok((model, AppCommand::Exit(outcome)))
        }
        NavEvent::Cancel => {
            tracing::info!(cursor = model.cursor, "selection cancelled");
            model.state = SessionState::Cancelled;
            Ok((model, AppCommand::Exit(Outcome::NoAction)))
        }
    }
}
