//! Line sources for the dispatch loop.
//!
//! - [`EditorSource`] - rustyline editor with history, completion and hints
//! - [`StdinSource`] - piped standard input, shared with prompts
//! - [`ReaderSource`] - any [`BufRead`], for tests

use std::borrow::Cow;
use std::cell::RefCell;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::rc::Rc;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Editor, Helper};
use tracing::{debug, warn};

use crate::config::ShellConfig;
use crate::core::autocomplete::{complete, hint};
use crate::core::{ErrorKind, Registry, Shell, ShellError, ShellState};

/// Where the dispatch loop gets its lines.
pub trait LineSource {
    /// Next line without its terminator; `None` on end of input or interrupt.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError>;

    /// Whether output goes to a person at a terminal.
    fn is_interactive(&self) -> bool {
        false
    }
}

// =============================================================================
// Completion helper
// =============================================================================

/// Bridges rustyline's completion hooks to the shell's registry.
pub struct ShellHelper {
    registry: Rc<Registry>,
    state: Rc<RefCell<ShellState>>,
}

impl ShellHelper {
    pub fn new(registry: Rc<Registry>, state: Rc<RefCell<ShellState>>) -> Self {
        Self { registry, state }
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let Ok(state) = self.state.try_borrow() else {
            return Ok((pos, Vec::new()));
        };
        let completion = complete(&line[..pos], &self.registry, &state);
        let pairs = completion
            .candidates
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.display,
                replacement: candidate.replacement,
            })
            .collect();
        Ok((completion.start, pairs))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        hint(line, &self.registry)
    }
}

impl Highlighter for ShellHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{hint}\x1b[0m"))
    }
}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}

// =============================================================================
// Editor
// =============================================================================

/// Interactive input through rustyline.
pub struct EditorSource {
    editor: Editor<ShellHelper, DefaultHistory>,
    history_file: Option<PathBuf>,
}

fn editor_error(err: ReadlineError) -> ShellError {
    ShellError::Editor(err.to_string())
}

impl EditorSource {
    pub fn new(shell: &Shell, config: &ShellConfig) -> Result<Self, ShellError> {
        let rl_config = Config::builder()
            .max_history_size(config.history_size)
            .map_err(editor_error)?
            .completion_type(CompletionType::List)
            .build();

        let mut editor: Editor<ShellHelper, DefaultHistory> =
            Editor::with_config(rl_config).map_err(editor_error)?;
        editor.set_helper(Some(ShellHelper::new(
            shell.shared_registry(),
            shell.shared_state(),
        )));

        if let Some(path) = &config.history_file {
            // Missing on first run
            if let Err(err) = editor.load_history(path) {
                debug!(path = %path.display(), %err, "no history loaded");
            }
        }

        Ok(Self {
            editor,
            history_file: config.history_file.clone(),
        })
    }

    fn save_history(&mut self) {
        let Some(path) = &self.history_file else {
            return;
        };
        if let Some(parent) = path.parent()
            && let Err(err) = std::fs::create_dir_all(parent)
        {
            warn!(path = %parent.display(), %err, "cannot create history directory");
            return;
        }
        if let Err(err) = self.editor.save_history(path) {
            warn!(path = %path.display(), %err, "failed to save history");
        }
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor
                        .add_history_entry(line.as_str())
                        .map_err(editor_error)?;
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => Ok(None),
            Err(err) => Err(editor_error(err)),
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

impl Drop for EditorSource {
    fn drop(&mut self) {
        self.save_history();
    }
}

// =============================================================================
// Readers
// =============================================================================

/// One text line from `reader`, without its terminator.
///
/// Lines must be text; anything else stops the loop as a tokenizer defect.
fn read_text_line(reader: &mut impl BufRead) -> Result<Option<String>, ShellError> {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    while matches!(buf.last(), Some(b'\n' | b'\r')) {
        buf.pop();
    }

    String::from_utf8(buf)
        .map(Some)
        .map_err(|err| ShellError::Tokenize {
            kind: ErrorKind::BadType,
            info: format!("command not a string: {}", err.utf8_error()),
        })
}

/// Standard input when it is not a terminal.
///
/// The stdin lock is taken per line and released before dispatch, so a
/// command prompting for confirmation reads the next input line.
#[derive(Debug, Default)]
pub struct StdinSource;

impl LineSource for StdinSource {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>, ShellError> {
        read_text_line(&mut io::stdin().lock())
    }
}

/// Non-interactive input from any reader.
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>, ShellError> {
        read_text_line(&mut self.reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_source_lines() {
        let mut source = ReaderSource::new("help\r\n\nexit".as_bytes());
        assert_eq!(source.read_line("> ").unwrap().as_deref(), Some("help"));
        assert_eq!(source.read_line("> ").unwrap().as_deref(), Some(""));
        assert_eq!(source.read_line("> ").unwrap().as_deref(), Some("exit"));
        assert_eq!(source.read_line("> ").unwrap(), None);
        assert!(!source.is_interactive());
    }

    #[test]
    fn test_reader_source_rejects_non_text() {
        let mut source = ReaderSource::new(&b"cd \xff\xfe\n"[..]);
        match source.read_line("> ") {
            Err(ShellError::Tokenize { kind, info }) => {
                assert_eq!(kind, ErrorKind::BadType);
                assert!(info.starts_with("command not a string"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
