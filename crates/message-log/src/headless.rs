//! In-memory terminal for tests and non-interactive environments.
//!
//! Keeps a character grid, a scripted queue of keys, and a log of every
//! write so callers can assert on what the pager painted and how often it
//! stopped at `-more-`.

use std::collections::VecDeque;

use crate::terminal::{Attr, KeyCode, Terminal, TerminalError};

/// One recorded `write_at` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Write {
    pub col: u16,
    pub row: u16,
    pub attr: Attr,
    pub text: String,
}

#[derive(Debug)]
pub struct HeadlessTerminal {
    width: u16,
    height: u16,
    cells: Vec<char>,
    keys: VecDeque<KeyCode>,
    writes: Vec<Write>,
    bells: usize,
    cursor: (u16, u16),
}

impl HeadlessTerminal {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; usize::from(width) * usize::from(height)],
            keys: VecDeque::new(),
            writes: Vec::new(),
            bells: 0,
            cursor: (0, 0),
        }
    }

    /// Queue keys to be returned by [`Terminal::read_key`], in order.
    pub fn with_keys(mut self, keys: impl IntoIterator<Item = KeyCode>) -> Self {
        self.keys.extend(keys);
        self
    }

    pub fn push_key(&mut self, key: KeyCode) {
        self.keys.push_back(key);
    }

    /// Keys queued but not yet read.
    pub fn pending_keys(&self) -> usize {
        self.keys.len()
    }

    /// Contents of `row` with trailing blanks removed.
    pub fn row_text(&self, row: u16) -> String {
        if row >= self.height {
            return String::new();
        }
        let start = usize::from(row) * usize::from(self.width);
        let line: String = self.cells[start..start + usize::from(self.width)]
            .iter()
            .collect();
        line.trim_end().to_string()
    }

    pub fn writes(&self) -> &[Write] {
        &self.writes
    }

    /// Number of writes whose text is exactly `text`.
    pub fn count_writes(&self, text: &str) -> usize {
        self.writes.iter().filter(|w| w.text == text).count()
    }

    pub fn bells(&self) -> usize {
        self.bells
    }

    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.bells = 0;
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells = vec![' '; usize::from(width) * usize::from(height)];
        self.cursor = (0, 0);
    }

    fn index(&self, col: u16, row: u16) -> Option<usize> {
        (col < self.width && row < self.height)
            .then(|| usize::from(row) * usize::from(self.width) + usize::from(col))
    }
}

impl Terminal for HeadlessTerminal {
    fn write_at(&mut self, col: u16, row: u16, attr: Attr, text: &str) -> Result<(), TerminalError> {
        self.writes.push(Write {
            col,
            row,
            attr,
            text: text.to_string(),
        });

        let mut x = col;
        for ch in text.chars() {
            match self.index(x, row) {
                Some(i) => self.cells[i] = ch,
                None => break,
            }
            x += 1;
        }
        self.cursor = (x.min(self.width.saturating_sub(1)), row);
        Ok(())
    }

    fn erase(&mut self, col1: u16, row1: u16, col2: u16, row2: u16) -> Result<(), TerminalError> {
        for row in row1..=row2.min(self.height.saturating_sub(1)) {
            for col in col1..=col2.min(self.width.saturating_sub(1)) {
                if let Some(i) = self.index(col, row) {
                    self.cells[i] = ' ';
                }
            }
        }
        self.cursor = (col1, row1);
        Ok(())
    }

    fn read_key(&mut self) -> Result<KeyCode, TerminalError> {
        self.keys.pop_front().ok_or(TerminalError::InputClosed)
    }

    fn bell(&mut self) -> Result<(), TerminalError> {
        self.bells += 1;
        Ok(())
    }

    fn locate_cursor(&mut self) -> Result<(u16, u16), TerminalError> {
        Ok(self.cursor)
    }

    fn clear(&mut self) -> Result<(), TerminalError> {
        self.cells.fill(' ');
        self.cursor = (0, 0);
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }
}

impl Default for HeadlessTerminal {
    fn default() -> Self {
        Self::new(80, 24)
    }
}
