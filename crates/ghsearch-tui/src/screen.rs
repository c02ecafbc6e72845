// Terminal ownership and input for the browse session
use crate::keymap::token_for;
use crate::session::InputEvent;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use std::io::{self, Stdout};

/// What the session needs from a terminal
pub trait Screen {
    fn area(&self) -> anyhow::Result<Rect>;

    fn draw(&mut self, render: &mut dyn FnMut(&mut Frame)) -> anyhow::Result<()>;

    /// Block until the next key press or resize
    fn next_event(&mut self) -> anyhow::Result<InputEvent>;

    fn clear(&mut self) -> anyhow::Result<()>;
}

/// The real terminal: raw mode plus the alternate screen while alive
pub struct CrosstermScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    released: bool,
}

impl CrosstermScreen {
    pub fn acquire() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        tracing::debug!("terminal acquired");
        Ok(Self {
            terminal,
            released: false,
        })
    }

    /// Restore the terminal; safe to call more than once
    pub fn release(&mut self) -> anyhow::Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        tracing::debug!("terminal released");
        Ok(())
    }
}

impl Drop for CrosstermScreen {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!("failed to restore terminal: {}", e);
        }
    }
}

impl Screen for CrosstermScreen {
    fn area(&self) -> anyhow::Result<Rect> {
        let size = self.terminal.size()?;
        Ok(Rect::new(0, 0, size.width, size.height))
    }

    fn draw(&mut self, render: &mut dyn FnMut(&mut Frame)) -> anyhow::Result<()> {
        self.terminal.draw(|f| render(f))?;
        Ok(())
    }

    fn next_event(&mut self) -> anyhow::Result<InputEvent> {
        loop {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    return Ok(InputEvent::Key(token_for(key)));
                }
                Event::Resize(width, height) => {
                    self.terminal.autoresize()?;
                    return Ok(InputEvent::Resize { width, height });
                }
                _ => {}
            }
        }
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        self.terminal.clear()?;
        Ok(())
    }
}

/// Put the terminal back before the default hook prints the panic message
pub fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}
