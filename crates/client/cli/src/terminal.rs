//! Crossterm backend for the message log terminal service.
use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{self, Event, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use message_log::{Attr, KeyCode, Terminal, TerminalError};
use tracing::debug;

use crate::input;

pub struct CrosstermTerminal {
    out: Stdout,
    size: (u16, u16),
}

impl CrosstermTerminal {
    /// Switch to raw mode on the alternate screen.
    ///
    /// Pair with a [`TerminalGuard`] so the screen is restored on exit.
    pub fn init() -> Result<Self, TerminalError> {
        enable_raw_mode()?;

        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, Clear(ClearType::All))?;

        let size = terminal::size()?;
        Ok(Self { out, size })
    }
}

fn color(attr: Attr) -> Color {
    match attr {
        Attr::White => Color::White,
        Attr::LightBlue => Color::Blue,
    }
}

impl Terminal for CrosstermTerminal {
    fn write_at(&mut self, col: u16, row: u16, attr: Attr, text: &str) -> Result<(), TerminalError> {
        queue!(
            self.out,
            MoveTo(col, row),
            SetForegroundColor(color(attr)),
            Print(text),
            ResetColor
        )?;
        Ok(())
    }

    fn erase(&mut self, col1: u16, row1: u16, col2: u16, row2: u16) -> Result<(), TerminalError> {
        let blank = " ".repeat(usize::from(col2.saturating_sub(col1)) + 1);
        for row in row1..=row2 {
            queue!(self.out, MoveTo(col1, row), Print(&blank))?;
        }
        queue!(self.out, MoveTo(col1, row1))?;
        Ok(())
    }

    fn read_key(&mut self) -> Result<KeyCode, TerminalError> {
        self.out.flush()?;
        loop {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(input::decode(key)),
                Event::Resize(width, height) => {
                    debug!(width, height, "terminal resized");
                    self.size = (width, height);
                }
                _ => {}
            }
        }
    }

    fn bell(&mut self) -> Result<(), TerminalError> {
        queue!(self.out, Print('\x07'))?;
        self.out.flush()?;
        Ok(())
    }

    fn locate_cursor(&mut self) -> Result<(u16, u16), TerminalError> {
        self.out.flush()?;
        Ok(cursor::position()?)
    }

    fn clear(&mut self) -> Result<(), TerminalError> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        self.size
    }

    fn refresh(&mut self) -> Result<(), TerminalError> {
        self.out.flush()?;
        Ok(())
    }
}

pub fn restore() -> io::Result<()> {
    execute!(io::stdout(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

pub struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore();
    }
}
