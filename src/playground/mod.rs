//! Command-driven playground for mention sessions
//!
//! The binary's front end. A [`Playground`] attaches a session to an
//! in-memory editor and turns commands like `type @al` or `key ArrowDown`
//! into the platform events they stand for, printing what the session did.
//! Commands come from a script file or from an interactive prompt.

mod command;
mod engine;
mod prompt;

pub use command::{Command, HELP, parse};
pub use engine::{Flow, Playground};
pub use prompt::PlaygroundPrompt;
