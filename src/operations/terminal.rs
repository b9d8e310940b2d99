use crate::error::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tracing::warn;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Runs `run` on the alternate screen in raw mode and restores the terminal afterwards,
/// whether `run` returns, fails or panics.
pub fn with_terminal<T>(run: impl FnOnce(&mut Tui) -> Result<T>) -> Result<T> {
    enable_raw_mode()?;
    let _restore = RestoreOnDrop(restore_terminal);

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    run(&mut terminal)
}

/// Leaves the alternate screen and raw mode. Each step runs even if the other fails.
fn restore_terminal() {
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, LeaveAlternateScreen) {
        warn!(error = %e, "failed to leave alternate screen");
    }
    if let Err(e) = disable_raw_mode() {
        warn!(error = %e, "failed to disable raw mode");
    }
}

/// Calls the wrapped closure when dropped.
struct RestoreOnDrop<F: FnMut()>(F);

impl<F: FnMut()> Drop for RestoreOnDrop<F> {
    fn drop(&mut self) {
        (self.0)();
    }
}

/// Redraws until the user presses `q` or `Esc`.
pub fn show_until_dismissed(terminal: &mut Tui, draw: impl Fn(&mut Frame)) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Release => {}
                Event::Key(key) if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) => break,
                _ => {}
            }
        }
    }
    Ok(())
}
