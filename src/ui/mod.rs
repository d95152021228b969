//! Terminal presentation of the running simulation.

pub mod flappy_scene;

use crate::core::frame::{FrameView, Presenter, Signal};
use crate::error::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

pub use flappy_scene::render_frame;

/// Draws every frame to the terminal and paces the loop to the frame rate.
///
/// The terminal is put into raw mode on the alternate screen for the
/// lifetime of the presenter and restored when it is dropped.
pub struct TerminalPresenter {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    last_frame: Instant,
}

impl TerminalPresenter {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        let terminal = stdout
            .execute(EnterAlternateScreen)
            .map(|_| ())
            .and_then(|()| Terminal::new(CrosstermBackend::new(io::stdout())));
        match terminal {
            Ok(terminal) => Ok(Self {
                terminal,
                last_frame: Instant::now(),
            }),
            Err(e) => {
                restore_terminal(&mut stdout);
                Err(e.into())
            }
        }
    }
}

impl Presenter for TerminalPresenter {
    fn pace(&mut self, fps: u32) -> Result<Signal> {
        let deadline = self.last_frame + Duration::from_secs_f64(1.0 / fps.max(1) as f64);
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if event::poll(remaining)? {
                if let Event::Key(key) = event::read()? {
                    if is_quit(&key) {
                        log::info!("Quit requested from the keyboard");
                        return Ok(Signal::Quit);
                    }
                }
            }
            if Instant::now() >= deadline {
                break;
            }
        }
        self.last_frame = Instant::now();
        Ok(Signal::Continue)
    }

    fn present(&mut self, view: &FrameView<'_>) -> Result<()> {
        self.terminal.draw(|frame| {
            let area = frame.size();
            render_frame(frame, area, view);
        })?;
        Ok(())
    }
}

impl Drop for TerminalPresenter {
    fn drop(&mut self) {
        restore_terminal(self.terminal.backend_mut());
        let _ = self.terminal.show_cursor();
    }
}

/// Leave raw mode and the alternate screen. Safe to call when only part of
/// the setup succeeded.
fn restore_terminal<W: Write>(out: &mut W) {
    let _ = disable_raw_mode();
    let _ = out.execute(LeaveAlternateScreen);
}

fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
