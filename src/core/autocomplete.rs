//! Tab completion for command names and command arguments.
//!
//! The line before the cursor is split with quotes kept, then:
//! - one token: complete it as a command name
//! - more tokens: hand the arguments to the resolved command's own
//!   [`Command::autocomplete`](crate::core::commands::Command::autocomplete)
//! - nothing typed: no completions
//!
//! Ghost-text hints use the same command-name matching.

use crate::core::commands::Candidate;
use crate::core::parser::{is_open_quote, split_partial};
use crate::core::registry::{Registry, Resolved};
use crate::core::state::ShellState;

// ============================================================================
// Public Types
// ============================================================================

/// Completions for the text before the cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Completion {
    /// Byte offset where the replaced text begins.
    pub start: usize,
    pub candidates: Vec<Candidate>,
}

impl Completion {
    fn none(start: usize) -> Self {
        Self {
            start,
            candidates: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Complete `line`, the input up to the cursor.
pub fn complete(line: &str, registry: &Registry, state: &ShellState) -> Completion {
    let mut tokens = split_partial(line);
    // A trailing space starts a new, empty argument unless a quote is open
    if let Some(last) = tokens.last()
        && !is_open_quote(last)
        && line.ends_with(char::is_whitespace)
    {
        tokens.push(String::new());
    }

    match tokens.as_slice() {
        [] => Completion::none(line.len()),
        [name] => complete_command(line.len(), name, registry),
        [name, args @ ..] => {
            let last_len = args.last().map_or(0, String::len);
            let start = line.len() - last_len;
            match registry.resolve(name) {
                Resolved::Found(cmd) => Completion {
                    start,
                    candidates: cmd.autocomplete(args, state),
                },
                _ => Completion::none(start),
            }
        }
    }
}

/// Suffix that would finish the command name being typed.
pub fn hint(line: &str, registry: &Registry) -> Option<String> {
    let partial = line.trim_start();
    if partial.is_empty() || partial.contains(char::is_whitespace) {
        return None;
    }
    registry
        .all_names()
        .into_iter()
        .find(|name| name.starts_with(partial) && *name != partial)
        .map(|name| name[partial.len()..].to_string())
}

// ============================================================================
// Command Completion
// ============================================================================

/// Each name with the prefix, completed from the cursor onwards.
fn complete_command(cursor: usize, partial: &str, registry: &Registry) -> Completion {
    let candidates = registry
        .all_names()
        .into_iter()
        .filter(|name| name.starts_with(partial))
        .map(|name| Candidate::new(&name[partial.len()..], name))
        .collect();
    Completion {
        start: cursor,
        candidates,
    }
}

// ============================================================================
// Tests
// ============================================================================
