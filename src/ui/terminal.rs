use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::debug;

use crate::db::BlobStore;

use super::app::App;

/// Spin up the terminal backend, enter the draw loop, and keep processing input
/// until the user quits.
pub fn run_app<B: BlobStore + Clone>(app: &mut App<B>) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    debug!("Terminal UI started");

    let result = loop {
        if let Err(err) = terminal.draw(|frame| app.draw(frame)) {
            break Err(anyhow::Error::from(err).context("failed to draw frame"));
        }

        match poll_key() {
            Ok(Some((code, modifiers))) => {
                if modifiers.contains(KeyModifiers::CONTROL) {
                    match code {
                        KeyCode::Char('c') => break Ok(()),
                        KeyCode::Char('l') => {
                            app.handle_ctrl_l();
                            continue;
                        }
                        _ => {}
                    }
                }

                match app.handle_key(code) {
                    Ok(true) => break Ok(()),
                    Ok(false) => {}
                    Err(err) => break Err(err),
                }
            }
            Ok(None) => {}
            Err(err) => break Err(err),
        }
    };

    cleanup_terminal(&mut terminal)?;
    debug!("Terminal UI stopped");
    result
}

/// Wait briefly for a key press, ignoring releases and non-key events.
fn poll_key() -> Result<Option<(KeyCode, KeyModifiers)>> {
    if !event::poll(Duration::from_millis(250)).context("event polling failed")? {
        return Ok(None);
    }
    match event::read().context("failed to read event")? {
        Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
            Ok(Some((key_event.code, key_event.modifiers)))
        }
        _ => Ok(None),
    }
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal
        .show_cursor()
        .context("failed to restore cursor visibility")
}
