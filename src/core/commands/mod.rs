//! The command contract and the built-in commands.
//!
//! This module provides:
//! - [`Command`] trait every command implements
//! - [`CommandResult`] and [`Flow`] for execution results
//! - [`Candidate`] for completion
//! - [`builtins`] listing the commands a new shell registers
//!
//! # Lifecycle
//!
//! For each line the dispatch loop builds an [`Invocation`], then calls
//! [`Command::validate`] and, only if that succeeds, [`Command::execute`].
//! Commands keep no per-line state of their own; anything derived during
//! validation is written back into the invocation.

mod builtin;
mod filesystem;
mod identity;
mod profile;
mod result;

pub use builtin::{EmptyCommand, UnrecognizedCommand};
pub use result::{CommandResult, Flow};

use crate::core::parser::Invocation;
use crate::core::registry::Registry;
use crate::core::state::ShellState;
use crate::core::status::Status;

/// What a command may touch while it executes.
pub struct Context<'a> {
    pub state: &'a mut ShellState,
    pub registry: &'a Registry,
}

/// One completion offered for the token under the cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Text that replaces the partial token.
    pub replacement: String,
    /// Text shown in the completion list.
    pub display: String,
}

impl Candidate {
    pub fn new(replacement: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            replacement: replacement.into(),
            display: display.into(),
        }
    }

    /// A candidate shown as it is inserted.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            display: text.clone(),
            replacement: text,
        }
    }
}

/// A shell command.
pub trait Command {
    /// Canonical name; unique within a registry.
    fn name(&self) -> &'static str;

    /// One-line summary shown by bare `help`.
    fn description(&self) -> &'static str {
        ""
    }

    /// Usage text, also returned when validation fails.
    fn help(&self) -> &'static str {
        ""
    }

    /// Other names that resolve to this command.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Check the shape of the arguments before anything happens.
    ///
    /// Must not perform side effects beyond recording derived values on
    /// `inv`. The default accepts anything.
    fn validate(&self, _inv: &mut Invocation, _state: &ShellState) -> Status {
        Status::ok()
    }

    /// Perform the command. The only step allowed to do I/O or prompt.
    fn execute(&self, inv: &Invocation, ctx: &mut Context<'_>) -> CommandResult;

    /// Completions for the arguments typed so far (command name excluded).
    fn autocomplete(&self, _partial: &[String], _state: &ShellState) -> Vec<Candidate> {
        Vec::new()
    }
}

/// Every built-in command, in registration order.
pub fn builtins() -> Vec<Box<dyn Command>> {
    vec![
        Box::new(filesystem::ChDirCommand),
        Box::new(filesystem::ListDirCommand),
        Box::new(builtin::ExitCommand),
        Box::new(builtin::HelpCommand),
        Box::new(builtin::ShellCommand),
        Box::new(builtin::SetInfoCommand),
        Box::new(profile::ProfileCommand),
        Box::new(identity::LoginCommand),
        Box::new(identity::LogoutCommand),
        Box::new(identity::MyInfoCommand),
        Box::new(identity::PreregisterCommand),
        Box::new(identity::RegisterCommand),
        Box::new(identity::RegCodeCommand),
    ]
}

/// Keep the completions that start with `partial`.
fn complete_words(words: &[&str], partial: &str) -> Vec<Candidate> {
    words
        .iter()
        .filter(|word| word.starts_with(partial))
        .map(|word| Candidate::plain(*word))
        .collect()
}
