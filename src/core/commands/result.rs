//! Command execution result type.

use crate::core::error::ErrorKind;
use crate::core::status::Status;

/// What the dispatch loop should do after a command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Flow {
    #[default]
    Continue,
    /// Stop reading input and leave the shell.
    Exit,
}

/// Result of executing a command.
///
/// Commands report a [`Status`] and optionally ask the loop to stop.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandResult {
    pub status: Status,
    pub flow: Flow,
}

impl CommandResult {
    /// Successful result with no output.
    pub fn ok() -> Self {
        Self::default()
    }

    /// Successful result with informational text.
    pub fn info(text: impl Into<String>) -> Self {
        Status::info_text(text).into()
    }

    pub fn error(kind: ErrorKind, text: impl Into<String>) -> Self {
        Status::error(kind, text).into()
    }

    /// Leave the shell without printing anything.
    pub fn exit() -> Self {
        Self {
            status: Status::ok(),
            flow: Flow::Exit,
        }
    }

    pub fn is_exit(&self) -> bool {
        self.flow == Flow::Exit
    }
}

impl From<Status> for CommandResult {
    fn from(status: Status) -> Self {
        Self {
            status,
            flow: Flow::Continue,
        }
    }
}
