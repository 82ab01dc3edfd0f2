//! Command-line tokenizer.
//!
//! Turns one raw line into an [`Invocation`]: the command name, the ordered
//! positional tokens, and the `key=value` named arguments.
//!
//! Grammar: `<command> [pos1] [pos2] ... [key=value ...]`, where `"` groups
//! words and `%"` writes a literal quote inside a quoted run.

mod lexer;

pub use lexer::{Lexer, is_open_quote, split_partial};

use std::collections::BTreeMap;

use crate::core::error::ErrorKind;
use crate::core::status::Status;

/// First whitespace-delimited word of a line, before any quote handling.
///
/// This is what the dispatch loop resolves against the registry.
pub fn command_name(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}

/// One tokenized command line.
///
/// Built fresh for every dispatch; [`Invocation::set`] clears everything
/// from a previous line before tokenizing the new one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Invocation {
    raw: String,
    name: String,
    tokens: Vec<String>,
    args: BTreeMap<String, String>,
}

impl Invocation {
    /// Tokenize a full command line, command name included.
    pub fn parse(raw: &str) -> Self {
        let mut invocation = Self::default();
        invocation.set(raw);
        invocation
    }

    /// Tokenize raw bytes read from a non-terminal input.
    ///
    /// Fails with [`ErrorKind::BadType`] when the bytes are not text.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, Status> {
        match std::str::from_utf8(raw) {
            Ok(text) => Ok(Self::parse(text)),
            Err(err) => Err(Status::error(
                ErrorKind::BadType,
                format!("command not a string: {err}"),
            )),
        }
    }

    /// Replace the contents of this invocation with a new line.
    pub fn set(&mut self, raw: &str) {
        self.raw = raw.to_string();
        self.name.clear();
        self.tokens.clear();
        self.args.clear();

        let mut words = Lexer::new(raw.trim());
        if let Some(name) = words.next() {
            self.name = name;
        }

        for word in words {
            match word.split_once('=') {
                // `=foo` has no key and stays positional
                Some((key, value)) if !key.is_empty() => {
                    self.args.insert(key.to_string(), value.to_string());
                }
                _ => self.tokens.push(word),
            }
        }
    }

    /// The line exactly as given.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Command name as typed (alias or canonical).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positional tokens, command name excluded.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Named arguments from `key=value` tokens.
    pub fn args(&self) -> &BTreeMap<String, String> {
        &self.args
    }

    pub fn arg(&self, key: &str) -> Option<&str> {
        self.args.get(key).map(String::as_str)
    }

    pub fn has_arg(&self, key: &str) -> bool {
        self.args.contains_key(key)
    }

    /// Record a derived value during validation (e.g. a normalized verb).
    pub fn set_arg(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.args.insert(key.into(), value.into());
    }
}

// =============================================================================
// Tests
// =============================================================================
