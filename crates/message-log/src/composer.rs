//! Line composer: builds one player-visible message out of fragments and
//! word-wraps it into pager-sized lines.

use arrayvec::ArrayString;
use bitflags::bitflags;
use tracing::{debug, warn};

use crate::config::{DisplayConfig, WrapWindow};

bitflags! {
    /// Processing applied by [`LineComposer::emit`].
    ///
    /// `PIECE` overrides `SPLIT`, so splitting must be requested on the
    /// final fragment of a message. `emit(None, EmitMode::SPLIT)` splits and
    /// flushes whatever has been accumulated.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct EmitMode: u8 {
        /// Uppercase the first letter of this call's text.
        const CAPITALIZE = 1 << 0;
        /// Accumulate only; do not flush yet.
        const PIECE      = 1 << 1;
        /// Break overlong messages at a word boundary before flushing.
        const SPLIT      = 1 << 2;
    }
}

/// Bytes the composer can accumulate for a single message.
pub const PIECE_CAPACITY: usize = 1024;

/// Indent placed in front of each continuation line.
const CONTINUATION_INDENT: &str = "  ";

/// In-progress message text.
#[derive(Debug)]
pub struct LineComposer {
    buffer: ArrayString<PIECE_CAPACITY>,
    message_width: usize,
    wrap: WrapWindow,
}

impl LineComposer {
    pub fn new(display: &DisplayConfig) -> Self {
        Self {
            buffer: ArrayString::new(),
            message_width: display.message_width,
            wrap: display.wrap,
        }
    }

    /// Drop any accumulated fragments.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Text accumulated by `PIECE` calls and not yet flushed.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Feed `text` through the composer.
    ///
    /// Every finished line is handed to `flush`, in display order. A `None`
    /// line is a request to flush the pager itself (the fast path for a
    /// `None` text with nothing accumulated).
    pub fn emit<E>(
        &mut self,
        text: Option<&str>,
        mode: EmitMode,
        mut flush: impl FnMut(Option<&str>) -> Result<(), E>,
    ) -> Result<(), E> {
        if mode.contains(EmitMode::PIECE) {
            if let Some(text) = text.filter(|t| !t.is_empty()) {
                self.push(text, mode.contains(EmitMode::CAPITALIZE));
            }
            return Ok(());
        }

        if self.buffer.is_empty() && !mode.intersects(EmitMode::CAPITALIZE | EmitMode::SPLIT) {
            return flush(text);
        }

        if let Some(text) = text.filter(|t| !t.is_empty()) {
            self.push(text, mode.contains(EmitMode::CAPITALIZE));
        }

        let mut rest = std::mem::take(&mut self.buffer);

        while mode.contains(EmitMode::SPLIT) && rest.len() > self.message_width {
            let Some(split) = self.split_point(&rest) else {
                debug!(len = rest.len(), "no space in wrap window; flushing unsplit line");
                break;
            };

            flush(Some(&rest[..split]))?;

            let mut next = ArrayString::<PIECE_CAPACITY>::new();
            next.push_str(CONTINUATION_INDENT);
            next.push_str(&rest[split + 1..]);
            rest = next;
        }

        flush(Some(rest.as_str()))
    }

    /// Last space inside the wrap window.
    ///
    /// Never inside the continuation indent, so every break shortens the text.
    fn split_point(&self, text: &str) -> Option<usize> {
        let bytes = text.as_bytes();
        let first = self.wrap.min.max(CONTINUATION_INDENT.len() + 1);
        let last = self.wrap.max.min(bytes.len().saturating_sub(1));
        if first > last {
            return None;
        }
        (first..=last).rev().find(|&i| bytes[i] == b' ')
    }

    fn push(&mut self, text: &str, capitalize: bool) {
        let mut chars = text.chars();
        let first = chars.next().map(|ch| {
            if capitalize {
                ch.to_ascii_uppercase()
            } else {
                ch
            }
        });
        for ch in first.into_iter().chain(chars) {
            if !self.push_char(ch) {
                warn!(capacity = PIECE_CAPACITY, "message fragment truncated");
                break;
            }
        }
    }

    fn push_char(&mut self, ch: char) -> bool {
        self.buffer.try_push(ch).is_ok()
    }
}
