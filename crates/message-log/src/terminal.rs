//! Terminal service consumed by the pager and the recall viewer.
//!
//! The message log never talks to a concrete backend. Everything it needs
//! from the screen (fixed-width writes, erasing, one blocking key read and a
//! bell) is expressed by [`Terminal`], so the same pager drives crossterm in
//! the client and [`HeadlessTerminal`](crate::headless::HeadlessTerminal) in
//! tests.

/// Display attribute for text written to the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Attr {
    /// Regular message text.
    #[default]
    White,
    /// The `-more-` indicator.
    LightBlue,
}

/// Decoded key as seen by the message log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    /// Control chord, stored as the lowercase letter (`Ctrl('p')` is `^P`).
    Ctrl(char),
    Enter,
    Escape,
    /// Any key the message log has no binding for.
    Other,
}

/// Errors raised by a terminal backend.
#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// No further keys can be read (closed input or exhausted script).
    #[error("terminal input closed")]
    InputClosed,

    #[error("terminal backend error: {0}")]
    Backend(String),
}

/// Abstract screen and keyboard.
///
/// Coordinates are zero-based `(col, row)`.
pub trait Terminal {
    /// Write `text` starting at `(col, row)` without touching the rest of the row.
    fn write_at(&mut self, col: u16, row: u16, attr: Attr, text: &str) -> Result<(), TerminalError>;

    /// Erase the rectangle spanning `(col1, row1)` to `(col2, row2)` inclusive.
    fn erase(&mut self, col1: u16, row1: u16, col2: u16, row2: u16) -> Result<(), TerminalError>;

    /// Block until a key is pressed.
    fn read_key(&mut self) -> Result<KeyCode, TerminalError>;

    fn bell(&mut self) -> Result<(), TerminalError>;

    fn locate_cursor(&mut self) -> Result<(u16, u16), TerminalError>;

    /// Erase the whole screen.
    fn clear(&mut self) -> Result<(), TerminalError>;

    /// Current `(width, height)` in cells.
    fn size(&self) -> (u16, u16);

    /// Push buffered output to the screen.
    fn refresh(&mut self) -> Result<(), TerminalError> {
        Ok(())
    }
}

/// Longest prefix of `text` that fits in `cols` byte columns, cut on a char boundary.
pub(crate) fn clip(text: &str, cols: usize) -> &str {
    if text.len() <= cols {
        return text;
    }
    let mut end = cols;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
