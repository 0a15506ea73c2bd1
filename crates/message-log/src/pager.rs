//! The single on-screen message row.
//!
//! Short messages are packed onto the row separated by a blank. When the
//! next message would not fit, the pager shows `-more-` and waits for the
//! player before wiping the row. Every message shown is also remembered in
//! the [`MessageStore`].

use tracing::{debug, trace};

use crate::config::DisplayConfig;
use crate::store::MessageStore;
use crate::terminal::{Attr, KeyCode, Terminal, TerminalError, clip};

/// Acknowledgement state of the message row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PagerState {
    /// The row is empty or everything on it has been seen.
    #[default]
    Idle,
    /// The row holds text the player has not confirmed yet.
    PendingAck,
}

#[derive(Debug)]
pub struct Pager {
    row: u16,
    row_width: u16,
    message_width: usize,
    quick_messages: bool,
    /// Column where the next packed message starts; includes the blank
    /// after the previous message.
    column: usize,
    state: PagerState,
}

impl Pager {
    pub const MORE_PROMPT: &'static str = "-more-";

    pub fn new(display: &DisplayConfig) -> Self {
        Self {
            row: display.message_row,
            row_width: display.row_width,
            message_width: display.message_width,
            quick_messages: display.quick_messages,
            column: 0,
            state: PagerState::Idle,
        }
    }

    pub fn state(&self) -> PagerState {
        self.state
    }

    pub fn needs_ack(&self) -> bool {
        self.state == PagerState::PendingAck
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn row(&self) -> u16 {
        self.row
    }

    pub fn quick_messages(&self) -> bool {
        self.quick_messages
    }

    pub fn set_quick_messages(&mut self, quick: bool) {
        self.quick_messages = quick;
    }

    /// Forget the row contents, e.g. after the screen was cleared or resized.
    pub fn reset(&mut self) {
        self.column = 0;
        self.state = PagerState::Idle;
    }

    /// Treat everything on the row as seen.
    ///
    /// The next message starts a fresh row without a `-more-` prompt.
    pub fn acknowledge(&mut self) {
        if self.state == PagerState::PendingAck {
            trace!("pending messages acknowledged without prompt");
        }
        self.state = PagerState::Idle;
    }

    /// Display one message, or flush the row when `text` is `None`.
    ///
    /// `Some("")` only refreshes the display: it records nothing and never
    /// prompts.
    pub fn show<T>(
        &mut self,
        text: Option<&str>,
        store: &mut MessageStore,
        term: &mut T,
    ) -> Result<(), TerminalError>
    where
        T: Terminal + ?Sized,
    {
        let Some(text) = text else {
            return self.flush(term);
        };

        if text.is_empty() {
            if self.state == PagerState::Idle {
                self.erase_row(term)?;
            }
            return term.refresh();
        }

        if self.state == PagerState::PendingAck && self.column + text.len() > self.message_width {
            self.more(term)?;
        }

        if self.state == PagerState::Idle {
            self.erase_row(term)?;
            self.column = 0;
        }

        store.begin(text.as_bytes());

        let room = usize::from(self.row_width).saturating_sub(self.column);
        term.write_at(self.column as u16, self.row, Attr::White, clip(text, room))?;

        self.column += text.len() + 1;
        self.state = PagerState::PendingAck;
        term.refresh()
    }

    /// Make sure the player has seen the row, then clear it.
    pub fn flush<T>(&mut self, term: &mut T) -> Result<(), TerminalError>
    where
        T: Terminal + ?Sized,
    {
        if self.state == PagerState::PendingAck {
            return self.more(term);
        }
        self.erase_row(term)?;
        self.column = 0;
        term.refresh()
    }

    /// Show `-more-` and block until the player accepts.
    ///
    /// Space, Enter and Escape accept; anything else rings the bell, unless
    /// quick messages are enabled, in which case any key accepts.
    pub fn more<T>(&mut self, term: &mut T) -> Result<(), TerminalError>
    where
        T: Terminal + ?Sized,
    {
        let column = self.column.min(self.message_width) as u16;
        term.write_at(column, self.row, Attr::LightBlue, Self::MORE_PROMPT)?;
        term.refresh()?;
        debug!(column, "waiting for -more- acknowledgement");

        loop {
            let key = term.read_key()?;
            if self.quick_messages || accepts_more(key) {
                break;
            }
            trace!(?key, "key rejected at -more-");
            term.bell()?;
        }

        self.erase_row(term)?;
        self.reset();
        term.refresh()
    }

    fn erase_row<T>(&self, term: &mut T) -> Result<(), TerminalError>
    where
        T: Terminal + ?Sized,
    {
        term.erase(0, self.row, self.row_width.saturating_sub(1), self.row)
    }
}

fn accepts_more(key: KeyCode) -> bool {
    matches!(key, KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Escape)
}
