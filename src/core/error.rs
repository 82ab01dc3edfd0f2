//! Error types for the shell.
//!
//! Two layers of failure exist:
//!
//! - [`ErrorKind`] - the kind carried by every [`Status`](crate::core::Status)
//!   that commands and the client hand back to the dispatch loop
//! - [`ShellError`] - startup and I/O failures that stop the shell itself

use std::fmt;
use std::path::PathBuf;

/// Classification of a failed command or client call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Non-text input reached the tokenizer
    BadType,
    /// An argument was present but out of range or malformed
    BadValue,
    /// The overall shape of the arguments was wrong
    BadData,
    /// A required argument was omitted
    EmptyData,
    /// A command, field, or resource does not exist
    NotFound,
    /// The resource being created already exists
    Exists,
    /// The server side of the client reported a failure
    ServerError,
    /// The command path is declared but has no behavior yet
    Unimplemented,
    /// A filesystem operation or child process failed
    FilesystemError,
    /// An operation needed a server connection that is not open
    NotConnected,
    /// Credentials were rejected
    Unauthorized,
}

impl ErrorKind {
    /// Taxonomy name as shown to the user.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadType => "BadType",
            Self::BadValue => "BadValue",
            Self::BadData => "BadData",
            Self::EmptyData => "EmptyData",
            Self::NotFound => "NotFound",
            Self::Exists => "Exists",
            Self::ServerError => "ServerError",
            Self::Unimplemented => "Unimplemented",
            Self::FilesystemError => "FilesystemError",
            Self::NotConnected => "NotConnected",
            Self::Unauthorized => "Unauthorized",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures that prevent the shell from starting or continuing.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// Two commands claim the same resolvable name.
    #[error("duplicate alias '{alias}': already registered for '{existing}', requested by '{incoming}'")]
    AliasConflict {
        alias: String,
        existing: String,
        incoming: String,
    },

    /// A command tried to register under a name the registry keeps for itself.
    #[error("command name '{0}' is reserved")]
    ReservedName(String),

    /// The tokenizer rejected its input; a defect in the caller.
    #[error("BUG: error setting info for command: {kind} / {info}")]
    Tokenize { kind: ErrorKind, info: String },

    /// The configuration file exists but could not be parsed.
    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The line editor failed for a reason other than EOF or interrupt.
    #[error("line editor error: {0}")]
    Editor(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
