//! Terminal management and main run loop

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use happy_core::OrphanageApi;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::debug;

use super::app::App;
use super::event::{handle_key, handle_mouse, poll_event, HandleResult};
use super::ui;

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Run the create page until the user quits or the page navigates away
pub async fn run<A: OrphanageApi>(app: &mut App<A>) -> Result<()> {
    let mut terminal = init_terminal()?;

    let result = run_loop(&mut terminal, app).await;

    // Restore terminal (even if loop failed)
    restore_terminal(&mut terminal)?;

    result
}

async fn run_loop<B: Backend, A: OrphanageApi>(
    terminal: &mut Terminal<B>,
    app: &mut App<A>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        // 100ms timeout keeps the UI responsive
        if let Some(event) = poll_event(Duration::from_millis(100))? {
            let result = match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                _ => HandleResult::Continue,
            };

            match result {
                HandleResult::Quit => break,
                HandleResult::Continue => {}
                HandleResult::Submit => {
                    debug!("submitting from the terminal page");
                    app.begin_submit();
                    terminal.draw(|frame| ui::render(frame, app))?;
                    app.submit().await;
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
