//! Scrollback viewer over the message history.
//!
//! Screen layout for a terminal of height `h`: row 0 holds the prompt, row 2
//! the "older messages" marker, rows `3..=h-2` the messages (newest at the
//! bottom) and row `h-1` the "newer messages" marker.

use tracing::debug;

use crate::store::MessageStore;
use crate::terminal::{Attr, KeyCode, Terminal, TerminalError, clip};

pub const RECALL_TITLE: &str = "Message Recall [press ESCAPE to exit] ";
pub const OLDER_MARKER: &str = "[... older messages continued above, use ^P to scroll ...]";
pub const NEWER_MARKER: &str = "[... newer messages continued below, use ^N to scroll ...]";
pub const NOTHING_TO_RECALL: &str = "There are no messages to recall.";

/// Rows reserved for prompt, blank line, and the two markers.
const CHROME_ROWS: u16 = 4;

/// Paged, read-only view of a [`MessageStore`].
#[derive(Debug)]
pub struct MessageRecall<'a> {
    store: &'a MessageStore,
    /// Age of the message on the bottom line.
    offset: u32,
    page: u32,
}

impl<'a> MessageRecall<'a> {
    pub fn new(store: &'a MessageStore, screen_height: u16) -> Self {
        Self {
            store,
            offset: 0,
            page: u32::from(screen_height.saturating_sub(CHROME_ROWS).max(1)),
        }
    }

    /// Age of the newest message currently on screen.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn page_size(&self) -> u32 {
        self.page
    }

    /// Show only the newest message on `row`, prefixed with `>`.
    pub fn quick<T>(store: &MessageStore, term: &mut T, row: u16) -> Result<(), TerminalError>
    where
        T: Terminal + ?Sized,
    {
        let (width, _) = term.size();
        term.erase(0, row, width.saturating_sub(1), row)?;
        if is_empty(store) {
            term.write_at(0, row, Attr::White, NOTHING_TO_RECALL)?;
        } else {
            term.write_at(0, row, Attr::White, ">")?;
            let room = usize::from(width.saturating_sub(1));
            term.write_at(1, row, Attr::White, clip(store.text(0), room))?;
        }
        term.refresh()
    }

    /// Browse the history until the player presses Escape.
    ///
    /// Ctrl-P pages toward older messages, Ctrl-N toward newer ones. A
    /// scroll past either end, or any other key, rings the bell. The screen
    /// is cleared on exit; the caller redraws it.
    pub fn run<T>(&mut self, term: &mut T) -> Result<(), TerminalError>
    where
        T: Terminal + ?Sized,
    {
        let total = self.store.count();
        let mut redraw = true;

        loop {
            if redraw {
                self.draw(term)?;
            }
            let (width, _) = term.size();
            term.erase(0, 0, width.saturating_sub(1), 0)?;
            term.write_at(0, 0, Attr::White, RECALL_TITLE)?;
            term.refresh()?;

            let key = term.read_key()?;
            let previous = self.offset;
            match key {
                KeyCode::Escape => break,
                KeyCode::Ctrl('p') if self.offset + self.page < total => {
                    self.offset += self.page;
                }
                KeyCode::Ctrl('n') if self.offset >= self.page => {
                    self.offset -= self.page;
                }
                _ => {}
            }

            redraw = self.offset != previous;
            if !redraw {
                term.bell()?;
            } else {
                debug!(offset = self.offset, total, "message recall scrolled");
            }
        }

        term.clear()?;
        term.refresh()
    }

    fn draw<T>(&self, term: &mut T) -> Result<(), TerminalError>
    where
        T: Terminal + ?Sized,
    {
        let (width, height) = term.size();
        let bottom = height.saturating_sub(2);
        let total = self.store.count();

        term.clear()?;
        for line in 0..self.page {
            let age = self.offset + line;
            if age >= total {
                break;
            }
            let row = bottom.saturating_sub(line as u16);
            term.write_at(0, row, Attr::White, clip(self.store.text(age), usize::from(width)))?;
        }

        if self.offset + self.page < total {
            term.write_at(0, 2, Attr::White, clip(OLDER_MARKER, usize::from(width)))?;
        }
        if self.offset > 0 {
            term.write_at(0, height.saturating_sub(1), Attr::White, clip(NEWER_MARKER, usize::from(width)))?;
        }
        Ok(())
    }
}

/// A history holding nothing but the initial empty message.
pub(crate) fn is_empty(store: &MessageStore) -> bool {
    store.count() == 1 && store.length(0) == 0
}
