//! Operator REPL
//!
//! Line-oriented shell for the experiment operator: a rustyline loop
//! (`interactive`), a token dispatcher mapping commands onto the session
//! manager (`commands`), tab completion (`completion`), and blocking
//! yes/no prompts (`prompt`).

pub mod commands;
pub mod completion;
pub mod interactive;
pub mod prompt;

pub use commands::{dispatch, App, Dispatch};
pub use interactive::run_repl;
