//! Message log configuration structures and loaders.
//!
//! Geometry of the pager row, capacity of the history store, and the
//! word-wrap window used by the line composer.

use std::env;

/// Top-level configuration for a [`MessageSession`](crate::MessageSession).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageLogConfig {
    pub display: DisplayConfig,
    pub history: HistoryConfig,
}

impl MessageLogConfig {
    pub const fn new(display: DisplayConfig, history: HistoryConfig) -> Self {
        Self { display, history }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `MESSAGE_ROW_WIDTH` - Width of the message row in columns (default: 80)
    /// - `MESSAGE_WIDTH` - Usable message width before `-more-` (default: 72)
    /// - `MESSAGE_ROW` - Screen row used for messages (default: 0)
    /// - `QUICK_MESSAGES` - Accept any key at `-more-` (default: false)
    /// - `MESSAGE_WRAP_MIN` - First column searched for a wrap point (default: 40)
    /// - `MESSAGE_WRAP_MAX` - Last column searched for a wrap point (default: 70)
    /// - `MESSAGE_HISTORY_SLOTS` - Number of remembered messages (default: 500)
    /// - `MESSAGE_ARENA_BYTES` - Bytes of text storage for history (default: 5000)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(width) = read_env::<u16>("MESSAGE_ROW_WIDTH") {
            config.display.row_width = width;
        }
        if let Some(width) = read_env::<usize>("MESSAGE_WIDTH") {
            config.display.message_width = width;
        }
        if let Some(row) = read_env::<u16>("MESSAGE_ROW") {
            config.display.message_row = row;
        }
        if let Some(quick) = read_env_bool("QUICK_MESSAGES") {
            config.display.quick_messages = quick;
        }
        if let Some(min) = read_env::<usize>("MESSAGE_WRAP_MIN") {
            config.display.wrap.min = min;
        }
        if let Some(max) = read_env::<usize>("MESSAGE_WRAP_MAX") {
            config.display.wrap.max = max;
        }

        if let Some(slots) = read_env::<usize>("MESSAGE_HISTORY_SLOTS") {
            config.history.slots = slots;
        }
        if let Some(bytes) = read_env::<usize>("MESSAGE_ARENA_BYTES") {
            config.history.arena_bytes = bytes;
        }

        config.normalized()
    }

    /// Clamp every field into a usable range.
    pub fn normalized(mut self) -> Self {
        self.display = self.display.normalized();
        self.history = self.history.normalized();
        self
    }
}

/// Pager row geometry and acknowledgement behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Total width of the message row in columns.
    pub row_width: u16,
    /// Columns usable by packed messages before a `-more-` is forced.
    pub message_width: usize,
    /// Screen row reserved for messages.
    pub message_row: u16,
    /// Accept any key at the `-more-` prompt.
    pub quick_messages: bool,
    pub wrap: WrapWindow,
}

impl DisplayConfig {
    pub const DEFAULT_ROW_WIDTH: u16 = 80;
    pub const DEFAULT_MESSAGE_WIDTH: usize = 72;

    fn normalized(mut self) -> Self {
        self.row_width = self.row_width.max(8);
        self.message_width = self.message_width.clamp(1, usize::from(self.row_width));
        self.wrap = self.wrap.clamped_to(self.message_width);
        self
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            row_width: Self::DEFAULT_ROW_WIDTH,
            message_width: Self::DEFAULT_MESSAGE_WIDTH,
            message_row: 0,
            quick_messages: false,
            wrap: WrapWindow::default(),
        }
    }
}

/// Inclusive column range searched (right to left wins) for a word break.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WrapWindow {
    pub min: usize,
    pub max: usize,
}

impl WrapWindow {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    fn clamped_to(self, width: usize) -> Self {
        let max = self.max.clamp(1, width);
        let min = self.min.clamp(1, max);
        Self { min, max }
    }
}

impl Default for WrapWindow {
    fn default() -> Self {
        Self { min: 40, max: 70 }
    }
}

/// Capacity of the message history store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Number of message slots (`N`).
    pub slots: usize,
    /// Bytes of text storage shared by all messages (`B`).
    pub arena_bytes: usize,
}

impl HistoryConfig {
    pub const DEFAULT_SLOTS: usize = 500;
    pub const DEFAULT_ARENA_BYTES: usize = 5000;
    pub const MIN_SLOTS: usize = 2;
    pub const MIN_ARENA_BYTES: usize = 16;

    pub const fn new(slots: usize, arena_bytes: usize) -> Self {
        Self { slots, arena_bytes }
    }

    pub(crate) fn normalized(mut self) -> Self {
        self.slots = self.slots.clamp(Self::MIN_SLOTS, u32::MAX as usize);
        self.arena_bytes = self.arena_bytes.clamp(Self::MIN_ARENA_BYTES, u32::MAX as usize);
        self
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            slots: Self::DEFAULT_SLOTS,
            arena_bytes: Self::DEFAULT_ARENA_BYTES,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_layout() {
        let config = MessageLogConfig::default();
        assert_eq!(config.display.row_width, 80);
        assert_eq!(config.display.message_width, 72);
        assert_eq!(config.display.wrap, WrapWindow::new(40, 70));
        assert_eq!(config.history.slots, 500);
        assert_eq!(config.history.arena_bytes, 5000);
        assert!(!config.display.quick_messages);
    }

    #[test]
    fn normalization_clamps_degenerate_values() {
        let config = MessageLogConfig::new(
            DisplayConfig {
                row_width: 40,
                message_width: 200,
                wrap: WrapWindow::new(90, 10),
                ..DisplayConfig::default()
            },
            HistoryConfig::new(0, 1),
        )
        .normalized();

        assert_eq!(config.display.message_width, 40);
        assert_eq!(config.display.wrap, WrapWindow::new(10, 10));
        assert_eq!(config.history.slots, HistoryConfig::MIN_SLOTS);
        assert_eq!(config.history.arena_bytes, HistoryConfig::MIN_ARENA_BYTES);
    }

    #[test]
    fn wrap_window_is_kept_inside_message_width() {
        let config = MessageLogConfig::new(
            DisplayConfig {
                message_width: 50,
                ..DisplayConfig::default()
            },
            HistoryConfig::default(),
        )
        .normalized();

        assert_eq!(config.display.wrap, WrapWindow::new(40, 50));
    }
}
