//! Core engine of the shell.
//!
//! This module provides:
//! - [`Invocation`] tokenizing and the [`Command`] contract
//! - [`Registry`] name and alias resolution
//! - [`Shell`] dispatch of one line at a time
//! - [`autocomplete`] completion and hints
//! - [`Status`] and [`ErrorKind`], the result every step reports

pub mod autocomplete;
pub mod commands;
mod dispatch;
pub mod error;
pub mod help;
pub mod parser;
pub mod password;
pub mod prompt;
mod registry;
mod state;
mod status;

pub use commands::{Candidate, Command, CommandResult, Context, Flow};
pub use dispatch::{Dispatch, Shell};
pub use error::{ErrorKind, ShellError};
pub use parser::Invocation;
pub use prompt::{Prompter, ScriptedPrompter, TerminalPrompter};
pub use registry::{Registry, Resolved};
pub use state::ShellState;
pub use status::Status;
