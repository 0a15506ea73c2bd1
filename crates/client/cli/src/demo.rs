//! Interactive demo loop driving a [`MessageSession`].
use message_log::{EmitMode, MessageSession, Terminal, TerminalError};
use rand::Rng;
use tracing::{debug, info};

use crate::input::{self, DemoCommand};
use crate::notices::{Notice, NoticeGenerator};

pub const HELP: &str = "[a]ttack [r]epeat [l]ook ^P recall [m]essage [c]lear [q]uit";

pub struct Demo<T: Terminal, R: Rng> {
    session: MessageSession<T>,
    notices: NoticeGenerator<R>,
    last: Option<Notice>,
    size: (u16, u16),
}

impl<T: Terminal, R: Rng> Demo<T, R> {
    pub fn new(session: MessageSession<T>, notices: NoticeGenerator<R>) -> Self {
        let size = session.terminal().size();
        Self {
            session,
            notices,
            last: None,
            size,
        }
    }

    pub fn session(&self) -> &MessageSession<T> {
        &self.session
    }

    /// Read commands until the player quits.
    pub fn run(&mut self) -> Result<(), TerminalError> {
        self.session.prompt(HELP)?;
        self.session.acknowledge();

        loop {
            let key = self.session.terminal_mut().read_key()?;
            self.track_resize();

            let command = input::command_for(key);
            debug!(?key, ?command, "demo command");

            // Any command is a player action, so whatever is on the row has been seen.
            self.session.acknowledge();

            match command {
                DemoCommand::Quit => break,
                DemoCommand::CombatRound => {
                    for notice in self.notices.combat_round() {
                        self.show_notice(notice)?;
                    }
                }
                DemoCommand::Repeat => match self.last {
                    Some(notice) => self.session.emit(Some(notice.outcome), EmitMode::SPLIT)?,
                    None => self.session.terminal_mut().bell()?,
                },
                DemoCommand::Describe => {
                    let description = self.notices.description();
                    self.session.log_message(description)?;
                }
                DemoCommand::Recall => self.session.recall(false)?,
                DemoCommand::QuickRecall => self.session.recall(true)?,
                DemoCommand::ClearScreen => self.session.clear_screen()?,
                DemoCommand::Help => self.session.prompt(HELP)?,
                DemoCommand::None => self.session.terminal_mut().bell()?,
            }
        }

        info!(messages = self.session.history_count(), "demo finished");
        Ok(())
    }

    /// Compose one notice out of fragments, the way game code builds messages.
    fn show_notice(&mut self, notice: Notice) -> Result<(), TerminalError> {
        self.session
            .emit(Some(notice.subject), EmitMode::PIECE | EmitMode::CAPITALIZE)?;
        self.session.emit(Some(" "), EmitMode::PIECE)?;
        self.session.emit(Some(notice.outcome), EmitMode::SPLIT)?;
        self.last = Some(notice);
        Ok(())
    }

    fn track_resize(&mut self) {
        let size = self.session.terminal().size();
        if size != self.size {
            self.size = size;
            self.session.resize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use message_log::{HeadlessTerminal, KeyCode, MessageLogConfig, PagerState};
    use rand::{SeedableRng, rngs::StdRng};

    fn demo(keys: impl IntoIterator<Item = KeyCode>) -> Demo<HeadlessTerminal, StdRng> {
        let session = MessageSession::new(
            MessageLogConfig::default(),
            HeadlessTerminal::default().with_keys(keys),
        );
        Demo::new(session, NoticeGenerator::new(StdRng::seed_from_u64(3)))
    }

    #[test]
    fn quit_leaves_history_empty() {
        let mut demo = demo([KeyCode::Char('q')]);
        demo.run().unwrap();
        assert_eq!(demo.session().history_length(0), 0);
        assert_eq!(demo.session().terminal().row_text(0), HELP);
    }

    #[test]
    fn repeat_without_notice_rings_bell() {
        let mut demo = demo([KeyCode::Char('r'), KeyCode::Char('z'), KeyCode::Char('q')]);
        demo.run().unwrap();
        assert_eq!(demo.session().terminal().bells(), 2);
    }

    #[test]
    fn description_wraps_into_history() {
        let mut demo = demo([KeyCode::Char('l'), KeyCode::Enter, KeyCode::Enter, KeyCode::Char('q')]);
        demo.run().unwrap();

        let session = demo.session();
        assert!(session.history_count() >= 2);
        assert!(session.history_text(0).starts_with("  "));
        assert!(session.history_text(session.history_count() - 1).starts_with("You "));
    }

    #[test]
    fn combat_notices_are_capitalized() {
        let mut demo = demo(
            [KeyCode::Char('a')]
                .into_iter()
                .chain(std::iter::repeat_n(KeyCode::Enter, 4))
                .chain([KeyCode::Char('q')]),
        );
        demo.run().unwrap();

        let session = demo.session();
        assert!(session.history_text(session.history_count() - 1).starts_with("The "));
        assert_ne!(session.pager_state(), PagerState::PendingAck);
    }
}
