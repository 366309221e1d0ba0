//! Live terminal dashboard.
//!
//! Feature-gated behind `tui`. Launch with `--tui` on the CLI.

mod controls;
mod layout;
/// Interactive session state.
pub mod runtime;
mod style;

use std::io::{self, Stdout};

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use rand::rngs::StdRng;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use serde_json::Value;
use tracing::warn;

use crate::dashboard::render::{Renderer, Scene};
use crate::runner::Runner;
use crate::sim::scheduler::Timer;

use runtime::App;

/// [`Renderer`] that draws scenes onto the terminal.
pub struct TerminalRenderer {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalRenderer {
    pub fn new(terminal: Terminal<CrosstermBackend<Stdout>>) -> Self {
        Self { terminal }
    }
}

impl Renderer for TerminalRenderer {
    type Error = io::Error;

    fn render(&mut self, scene: &Scene<'_>) -> io::Result<()> {
        self.terminal.draw(|frame| layout::render(frame, scene))?;
        Ok(())
    }
}

/// Launches the terminal dashboard around `runner`.
///
/// Sets up the terminal (raw mode, alternate screen), applies `payload` if
/// given, runs the event loop, and restores the terminal on exit.
///
/// # Errors
///
/// Returns an `io::Error` if terminal setup or drawing fails.
pub fn run(runner: Runner<StdRng>, payload: Option<Value>) -> io::Result<()> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e);
    }

    let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(t) => t,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(e);
        }
    };

    let mut renderer = TerminalRenderer::new(terminal);
    let mut app = App::new(runner);
    let result =
        start(&mut app, &mut renderer, payload).and_then(|()| event_loop(&mut app, &mut renderer));

    // Teardown: always restore terminal state
    let _ = disable_raw_mode();
    let _ = execute!(renderer.terminal.backend_mut(), LeaveAlternateScreen);
    let _ = renderer.terminal.show_cursor();

    result
}

fn start(
    app: &mut App,
    renderer: &mut TerminalRenderer,
    payload: Option<Value>,
) -> io::Result<()> {
    let Some(payload) = payload else {
        return Ok(());
    };
    if let Err(e) = app.runner.dashboard_mut().apply_snapshot(payload, renderer) {
        warn!(error = %e, "initial snapshot not applied");
    }
    Ok(())
}

/// Core event loop: draw when something changed, poll input until the next
/// deadline, pump timers.
///
/// A simulation tick renders from inside the pump, so the loop only redraws
/// for input, clock updates without a tick, and link changes.
fn event_loop(app: &mut App, renderer: &mut TerminalRenderer) -> io::Result<()> {
    let mut dirty = true;
    loop {
        if dirty {
            renderer.render(&app.dashboard().scene())?;
        }

        if app.quit {
            return Ok(());
        }

        let poll_timeout = app.runner.until_next(app.elapsed());
        let mut key_handled = false;
        if event::poll(poll_timeout)? {
            if let Event::Key(key) = event::read()? {
                controls::handle_key(app, key);
                key_handled = true;
            }
        }

        let linked = app.dashboard().connection().is_connected();
        let fired = app.runner.pump(app.elapsed(), renderer)?;
        let link_changed = linked != app.dashboard().connection().is_connected();

        dirty = needs_redraw(&fired, key_handled, link_changed);
    }
}

/// Whether the loop must draw after a pump that fired `fired`.
fn needs_redraw(fired: &[Timer], key_handled: bool, link_changed: bool) -> bool {
    let ticked = fired.contains(&Timer::Simulation);
    key_handled || link_changed || (fired.contains(&Timer::Clock) && !ticked)
}
