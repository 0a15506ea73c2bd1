//! Message line primitives for terminal games.
//!
//! Houses the fixed-capacity message history, the line composer that builds
//! and word-wraps player-visible messages, and the `-more-` pager that owns
//! the on-screen message row. Terminal output goes through the [`Terminal`]
//! trait so any backend (or the in-memory [`HeadlessTerminal`]) can host it.
pub mod composer;
pub mod config;
pub mod headless;
pub mod pager;
pub mod recall;
pub mod session;
pub mod store;
pub mod terminal;

pub use composer::{EmitMode, LineComposer};
pub use config::{DisplayConfig, HistoryConfig, MessageLogConfig, WrapWindow};
pub use headless::HeadlessTerminal;
pub use pager::{Pager, PagerState};
pub use recall::MessageRecall;
pub use session::MessageSession;
pub use store::MessageStore;
pub use terminal::{Attr, KeyCode, Terminal, TerminalError};
