//! Terminal commit-message editor
//!
//! A small modal editor that hosts the suggestion controller: the buffer is
//! a `tui_textarea` engine, suggestions are drawn as ghost text and the
//! worker's responses are applied between frames.

mod events;
mod host;
mod render;
mod state;

use std::io;
use std::time::{Duration, Instant};

use crossterm::event;
use ratatui::Terminal;
use ratatui::backend::Backend;

pub use host::TuiHost;
pub use state::{App, ExitStatus};

/// Upper bound on how long a frame waits for input
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the editor until the user saves-and-quits or aborts
pub fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<ExitStatus> {
    app.start(Instant::now());

    while !app.should_quit() {
        app.update(Instant::now());
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(POLL_INTERVAL)? {
            app.handle_event(event::read()?);
        }
    }

    Ok(app.exit_status())
}
