use crossterm::ExecutableCommand;
use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;

/// How often the event loop wakes up to look for a pending interrupt.
pub const INTERRUPT_POLL_INTERVAL: Duration = Duration::from_millis(100);

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static TERMINAL_ACTIVE: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("failed to install interrupt handler: {0}")]
    InterruptHandler(#[from] ctrlc::Error),
}

/// Routes SIGINT/SIGTERM into the event loop and restores the terminal if
/// anything panics while it is in raw mode.
pub fn install_interrupt_handler() -> Result<(), TerminalError> {
    ctrlc::set_handler(|| INTERRUPTED.store(true, Ordering::SeqCst))?;

    let default_panic = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore_terminal();
        default_panic(info);
    }));
    Ok(())
}

/// True once per delivered interrupt.
pub fn take_interrupt() -> bool {
    INTERRUPTED.swap(false, Ordering::SeqCst)
}

/// Leaves raw mode and the alternate screen. Safe to call more than once.
pub fn restore_terminal() {
    if !TERMINAL_ACTIVE.swap(false, Ordering::SeqCst) {
        return;
    }
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

/// Raw mode + alternate screen for as long as it lives.
pub struct TerminalGuard {
    pub terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    pub fn acquire() -> io::Result<Self> {
        enable_raw_mode()?;
        TERMINAL_ACTIVE.store(true, Ordering::SeqCst);

        let mut stdout = io::stdout();
        if let Err(error) = stdout.execute(EnterAlternateScreen) {
            restore_terminal();
            return Err(error);
        }
        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(error) => {
                restore_terminal();
                return Err(error);
            }
        };
        let mut guard = Self { terminal };
        guard.terminal.hide_cursor()?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}
