//! Top-level message UI session.
//!
//! [`MessageSession`] owns the history store, the line composer, the pager
//! and the terminal, and wires them together the way the game uses them.

use tracing::{debug, info};

use crate::composer::{EmitMode, LineComposer};
use crate::config::MessageLogConfig;
use crate::pager::{Pager, PagerState};
use crate::recall::MessageRecall;
use crate::store::MessageStore;
use crate::terminal::{Attr, Terminal, TerminalError, clip};

pub struct MessageSession<T: Terminal> {
    config: MessageLogConfig,
    store: MessageStore,
    composer: LineComposer,
    pager: Pager,
    terminal: T,
}

impl<T: Terminal> MessageSession<T> {
    pub fn new(config: MessageLogConfig, terminal: T) -> Self {
        let config = config.normalized();
        info!(
            row_width = config.display.row_width,
            message_width = config.display.message_width,
            slots = config.history.slots,
            arena_bytes = config.history.arena_bytes,
            "message session created"
        );
        Self {
            store: MessageStore::new(&config.history),
            composer: LineComposer::new(&config.display),
            pager: Pager::new(&config.display),
            config,
            terminal,
        }
    }

    pub fn config(&self) -> &MessageLogConfig {
        &self.config
    }

    /// Feed text through the composer into the pager.
    ///
    /// See [`EmitMode`] for how `mode` shapes the message. `emit(None,
    /// EmitMode::empty())` with nothing pending flushes the pager.
    pub fn emit(&mut self, text: Option<&str>, mode: EmitMode) -> Result<(), TerminalError> {
        let Self {
            store,
            composer,
            pager,
            terminal,
            ..
        } = self;
        composer.emit(text, mode, |line| pager.show(line, store, &mut *terminal))
    }

    /// Show a complete message, word-wrapping it if it is too long.
    pub fn log_message(&mut self, text: &str) -> Result<(), TerminalError> {
        self.emit(Some(text), EmitMode::SPLIT)
    }

    /// Make sure the player has seen everything on the message row.
    ///
    /// Text still being built from `PIECE` fragments stays in the composer.
    pub fn flush(&mut self) -> Result<(), TerminalError> {
        self.pager.flush(&mut self.terminal)
    }

    /// The player acted; pending messages count as read.
    pub fn acknowledge(&mut self) {
        self.pager.acknowledge();
    }

    /// Flush pending messages, then wipe the whole screen.
    pub fn clear_screen(&mut self) -> Result<(), TerminalError> {
        self.flush()?;
        self.terminal.clear()?;
        self.pager.reset();
        self.terminal.refresh()
    }

    /// The screen was resized and repainted by the caller.
    pub fn resize(&mut self) {
        debug!(size = ?self.terminal.size(), "terminal resized, pager reset");
        self.pager.reset();
    }

    /// Flush pending messages, then print `text` on the message row.
    ///
    /// Prompts are not recorded in the history.
    pub fn prompt(&mut self, text: &str) -> Result<(), TerminalError> {
        self.flush()?;
        let row = self.pager.row();
        let width = self.config.display.row_width;
        self.terminal.erase(0, row, width.saturating_sub(1), row)?;
        self.terminal
            .write_at(0, row, Attr::White, clip(text, usize::from(width)))?;
        self.terminal.refresh()
    }

    /// Show message history.
    ///
    /// With `quick`, or when there is only one message, the newest message is
    /// shown on the message row; otherwise the full-screen viewer runs until
    /// the player presses Escape.
    pub fn recall(&mut self, quick: bool) -> Result<(), TerminalError> {
        self.flush()?;

        if quick || self.store.count() <= 1 {
            MessageRecall::quick(&self.store, &mut self.terminal, self.pager.row())?;
        } else {
            let (_, height) = self.terminal.size();
            MessageRecall::new(&self.store, height).run(&mut self.terminal)?;
        }

        self.pager.reset();
        Ok(())
    }

    pub fn set_quick_messages(&mut self, quick: bool) {
        self.config.display.quick_messages = quick;
        self.pager.set_quick_messages(quick);
    }

    /// Forget all history and pending text.
    pub fn reset(&mut self) {
        self.store.reset();
        self.composer.reset();
        self.pager.reset();
    }

    pub fn history_count(&self) -> u32 {
        self.store.count()
    }

    pub fn history_text(&self, age: u32) -> &str {
        self.store.text(age)
    }

    pub fn history_length(&self, age: u32) -> u32 {
        self.store.length(age)
    }

    pub fn pager_state(&self) -> PagerState {
        self.pager.state()
    }

    /// Text accumulated from `PIECE` emits and not yet shown.
    pub fn pending_text(&self) -> &str {
        self.composer.pending()
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    pub fn into_terminal(self) -> T {
        self.terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessTerminal;
    use crate::terminal::KeyCode;

    fn session() -> MessageSession<HeadlessTerminal> {
        MessageSession::new(MessageLogConfig::default(), HeadlessTerminal::default())
    }

    #[test]
    fn log_message_records_and_waits_for_ack() {
        let mut s = session();
        s.log_message("You die.").unwrap();
        assert_eq!(s.history_count(), 1);
        assert_eq!(s.history_text(0), "You die.");
        assert_eq!(s.pager_state(), PagerState::PendingAck);
    }

    #[test]
    fn pieces_become_one_history_entry() {
        let mut s = session();
        s.emit(Some("the orc"), EmitMode::PIECE | EmitMode::CAPITALIZE).unwrap();
        assert_eq!(s.pending_text(), "The orc");
        assert_eq!(s.history_count(), 1);
        assert_eq!(s.history_length(0), 0);

        s.emit(Some(" hits you."), EmitMode::SPLIT).unwrap();
        assert_eq!(s.history_text(0), "The orc hits you.");
        assert_eq!(s.terminal().row_text(0), "The orc hits you.");
    }

    #[test]
    fn long_message_becomes_two_entries_and_one_more() {
        let mut s = session();
        s.terminal_mut().push_key(KeyCode::Char(' '));
        let text = (0..20).map(|i| format!("word{i:02}")).collect::<Vec<_>>().join(" ");
        s.log_message(&text).unwrap();

        assert_eq!(s.history_count(), 2);
        assert!(s.history_text(0).starts_with("  word10"));
        assert_eq!(s.terminal().count_writes(Pager::MORE_PROMPT), 1);
    }

    #[test]
    fn clear_screen_prompts_then_blanks() {
        let mut s = session();
        s.terminal_mut().push_key(KeyCode::Enter);
        s.log_message("The wand glows.").unwrap();
        s.clear_screen().unwrap();

        assert_eq!(s.terminal().count_writes(Pager::MORE_PROMPT), 1);
        assert_eq!(s.terminal().row_text(0), "");
        assert_eq!(s.pager().column(), 0);
    }

    #[test]
    fn flush_keeps_pending_pieces_buffered() {
        let mut s = session();
        s.emit(Some("the orc"), EmitMode::PIECE | EmitMode::CAPITALIZE).unwrap();
        s.flush().unwrap();

        assert_eq!(s.pending_text(), "The orc");
        assert_eq!(s.history_length(0), 0);
        assert_eq!(s.pager_state(), PagerState::Idle);
        assert_eq!(s.terminal().count_writes(Pager::MORE_PROMPT), 0);
    }

    #[test]
    fn prompt_is_not_recorded() {
        let mut s = session();
        s.prompt("In what direction?").unwrap();
        assert_eq!(s.terminal().row_text(0), "In what direction?");
        assert_eq!(s.history_length(0), 0);
    }

    #[test]
    fn resize_drops_pending_ack() {
        let mut s = session();
        s.log_message("You hear a door.").unwrap();
        s.resize();
        assert_eq!(s.pager_state(), PagerState::Idle);
        s.log_message("Something else.").unwrap();
        assert_eq!(s.terminal().count_writes(Pager::MORE_PROMPT), 0);
    }

    #[test]
    fn quick_recall_with_single_message() {
        let mut s = session();
        s.terminal_mut().push_key(KeyCode::Char(' '));
        s.log_message("You feel hungry.").unwrap();
        s.recall(false).unwrap();
        assert_eq!(s.terminal().row_text(0), ">You feel hungry.");
    }

    #[test]
    fn reset_forgets_history() {
        let mut s = session();
        s.log_message("one").unwrap();
        s.emit(Some("half"), EmitMode::PIECE).unwrap();
        s.reset();
        assert_eq!(s.history_count(), 1);
        assert_eq!(s.history_text(0), "");
        assert_eq!(s.pending_text(), "");
    }
}
