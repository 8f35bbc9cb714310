mod app;
mod cli;
mod domain;
mod infra;
mod ui;

use crate::app::{AppCommand, AppEvent, AppModel, Outcome};
use crate::cli::CliInvocation;
use crate::domain::SmartLog;
use crate::infra::{
    INTERRUPT_POLL_INTERVAL, TerminalGuard, goto_commit, init_logging,
    install_interrupt_handler, load_smartlog, resolve_sl_binary, take_interrupt,
};
use crossterm::event::{self, Event};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout, Write};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
enum MainError {
    #[error(transparent)]
    App(#[from] crate::app::AppError),

    #[error(transparent)]
    Sapling(#[from] crate::infra::SaplingError),

    #[error(transparent)]
    Logging(#[from] crate::infra::LoggingError),

    #[error(transparent)]
    Cli(#[from] crate::cli::CliRunError),

    #[error(transparent)]
    Terminal(#[from] crate::infra::TerminalError),
}

fn main() {
    if let Err(error) = run_main() {
        tracing::error!(%error, "sl-up failed");
        let mut err = io::stderr().lock();
        let _ = writeln!(err, "{error}");
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), MainError> {
    let args = std::env::args().collect::<Vec<_>>();
    let invocation = match crate::cli::parse_invocation(&args) {
        Ok(invocation) => invocation,
        Err(error) => {
            let mut err = io::stderr().lock();
            let _ = writeln!(err, "{error}");
            let _ = writeln!(err);
            crate::cli::print_help();
            std::process::exit(2);
        }
    };

    match invocation {
        CliInvocation::PrintHelp => {
            crate::cli::print_help();
            Ok(())
        }
        CliInvocation::PrintVersion => {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliInvocation::Dump { sl_binary, json } => {
            init_logging()?;
            let binary = resolve_sl_binary(sl_binary);
            let log = SmartLog::parse(&load_smartlog(&binary)?);
            let mut out = io::stdout().lock();
            crate::cli::run_dump(&log, json, &mut out)?;
            Ok(())
        }
        CliInvocation::Pick { sl_binary } => run_picker(sl_binary),
    }
}

fn run_picker(sl_binary: Option<PathBuf>) -> Result<(), MainError> {
    init_logging()?;
    install_interrupt_handler()?;
    let binary = resolve_sl_binary(sl_binary);
    let log = SmartLog::parse(&load_smartlog(&binary)?);
    // Malformed snapshots fail here, before the terminal is touched.
    let model = AppModel::new(log)?;

    let outcome = {
        let mut guard = TerminalGuard::acquire().map_err(crate::app::AppError::from)?;
        run(&mut guard.terminal, model)?
    };

    match outcome {
        Outcome::NoAction => Ok(()),
        Outcome::NavigateTo(commit) => Ok(goto_commit(&binary, &commit)?),
    }
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    model: AppModel,
) -> Result<Outcome, crate::app::AppError> {
    let mut model = model;
    terminal.draw(|frame| ui::render(frame, &model))?;

    loop {
        let event = if take_interrupt() {
            tracing::info!("interrupted");
            AppEvent::Interrupt
        } else if !event::poll(INTERRUPT_POLL_INTERVAL)? {
            continue;
        } else {
            match event::read()? {
                Event::Key(key) => AppEvent::Key(key),
                Event::Resize(_, _) => AppEvent::Resize,
                _ => continue,
            }
        };

        let (next, command) = app::update(model, event)?;
        model = next;
        match command {
            AppCommand::None => {}
            AppCommand::Redraw => {
                terminal.draw(|frame| ui::render(frame, &model))?;
            }
            AppCommand::Exit(outcome) => {
                tracing::debug!(state = ?model.state(), "session finished");
                return Ok(outcome);
            }
        }
    }
}
