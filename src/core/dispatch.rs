//! The dispatch loop.
//!
//! One line in, one [`Dispatch`] out:
//!
//! 1. blank lines are skipped
//! 2. the first whitespace word is resolved through the [`Registry`]
//! 3. the line is tokenized into a fresh [`Invocation`]
//! 4. `validate` runs; a failure is shown and `execute` is skipped
//! 5. `execute` runs and its text is shown, error or not

use std::cell::{Ref, RefCell, RefMut};
use std::io::Write;
use std::rc::Rc;

use tracing::{debug, error, info};

use crate::core::commands::{Context, Flow};
use crate::core::error::ShellError;
use crate::core::parser::{Invocation, command_name};
use crate::core::registry::Registry;
use crate::core::state::ShellState;
use crate::core::status::Status;
use crate::models::OutputLine;
use crate::repl::LineSource;

/// What happened to one input line.
#[derive(Clone, Debug, PartialEq)]
pub struct Dispatch {
    /// Whether the loop should keep reading.
    pub flow: Flow,
    /// Validation failure or execution result; `ok` for a blank line.
    pub status: Status,
    /// Whether `execute` ran.
    pub executed: bool,
    /// Lines to show the user.
    pub output: Vec<OutputLine>,
}

impl Dispatch {
    fn skipped() -> Self {
        Self {
            flow: Flow::Continue,
            status: Status::ok(),
            executed: false,
            output: Vec::new(),
        }
    }

    pub fn is_exit(&self) -> bool {
        self.flow == Flow::Exit
    }
}

/// A registry and the shell state it operates on.
///
/// Both are reference counted so the line editor's completer can read them
/// between dispatches.
pub struct Shell {
    registry: Rc<Registry>,
    state: Rc<RefCell<ShellState>>,
}

impl Shell {
    pub fn new(registry: Registry, state: ShellState) -> Self {
        Self {
            registry: Rc::new(registry),
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn shared_registry(&self) -> Rc<Registry> {
        Rc::clone(&self.registry)
    }

    pub fn shared_state(&self) -> Rc<RefCell<ShellState>> {
        Rc::clone(&self.state)
    }

    pub fn state(&self) -> Ref<'_, ShellState> {
        self.state.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, ShellState> {
        self.state.borrow_mut()
    }

    /// Run one line through resolve, validate, and execute.
    pub fn dispatch(&self, line: &str) -> Dispatch {
        if command_name(line).is_empty() {
            return Dispatch::skipped();
        }
        self.dispatch_invocation(Invocation::parse(line))
    }

    /// Like [`Shell::dispatch`] for raw bytes.
    ///
    /// Bytes that are not text are a defect in the caller, not a user
    /// error, and come back as [`ShellError::Tokenize`].
    pub fn dispatch_bytes(&self, raw: &[u8]) -> Result<Dispatch, ShellError> {
        let inv = Invocation::from_bytes(raw).map_err(|status| ShellError::Tokenize {
            kind: status.kind().unwrap_or(crate::core::ErrorKind::BadType),
            info: status.info().to_string(),
        })?;
        if command_name(inv.raw()).is_empty() {
            return Ok(Dispatch::skipped());
        }
        Ok(self.dispatch_invocation(inv))
    }

    fn dispatch_invocation(&self, mut inv: Invocation) -> Dispatch {
        let resolved = self.registry.resolve(command_name(inv.raw()));
        let cmd = resolved.command();
        debug!(
            command = cmd.name(),
            typed = inv.name(),
            tokens = inv.len(),
            args = inv.args().len(),
            "dispatching"
        );

        let mut state = self.state.borrow_mut();

        let status = cmd.validate(&mut inv, &state);
        if status.is_err() {
            debug!(command = cmd.name(), kind = ?status.kind(), "validation failed");
            return Dispatch {
                flow: Flow::Continue,
                output: render_validation(&status),
                status,
                executed: false,
            };
        }

        let mut ctx = Context {
            state: &mut state,
            registry: &self.registry,
        };
        let result = cmd.execute(&inv, &mut ctx);

        let output = if result.is_exit() {
            Vec::new()
        } else {
            render_result(&result.status)
        };
        Dispatch {
            flow: result.flow,
            status: result.status,
            executed: true,
            output,
        }
    }

    /// Read and dispatch lines until end of input, interrupt, or `exit`.
    pub fn run(
        &self,
        source: &mut dyn LineSource,
        out: &mut dyn Write,
        prompt: &str,
    ) -> Result<(), ShellError> {
        info!(commands = self.registry.len(), "shell started");
        let styled = source.is_interactive();

        loop {
            let line = match source.read_line(prompt) {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(err) => {
                    error!(%err, "input error; stopping");
                    return Err(err);
                }
            };

            let dispatch = self.dispatch(&line);
            for output in &dispatch.output {
                if styled {
                    writeln!(out, "{}", output.styled())?;
                } else {
                    writeln!(out, "{output}")?;
                }
            }
            out.flush()?;

            if dispatch.is_exit() {
                break;
            }
        }

        info!("shell stopped");
        Ok(())
    }
}

/// Validation messages are usage text; show them as they are.
fn render_validation(status: &Status) -> Vec<OutputLine> {
    if status.info().is_empty() {
        return status
            .kind()
            .map(|kind| vec![OutputLine::error(kind.to_string())])
            .unwrap_or_default();
    }
    status.info().lines().map(OutputLine::error).collect()
}

/// Execution errors lead with their kind; successes show their text.
fn render_result(status: &Status) -> Vec<OutputLine> {
    let Some(kind) = status.kind() else {
        return status.info().lines().map(OutputLine::text).collect();
    };

    let mut lines = status.info().lines();
    let mut output = vec![match lines.next() {
        Some(first) => OutputLine::error(format!("Error: {kind}: {first}")),
        None => OutputLine::error(format!("Error: {kind}")),
    }];
    output.extend(lines.map(OutputLine::error));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;

    #[test]
    fn test_render_result() {
        let lines = render_result(&Status::error(ErrorKind::NotFound, "Unknown command"));
        assert_eq!(lines, vec![OutputLine::error("Error: NotFound: Unknown command")]);

        let lines = render_result(&Status::error(ErrorKind::FilesystemError, ""));
        assert_eq!(lines, vec![OutputLine::error("Error: FilesystemError")]);

        let lines = render_result(&Status::info_text("one\ntwo"));
        assert_eq!(lines, vec![OutputLine::text("one"), OutputLine::text("two")]);

        assert!(render_result(&Status::ok()).is_empty());
    }

    #[test]
    fn test_quoted_empty_name_matches_across_entry_points() {
        let shell = Shell::new(
            Registry::with_builtins().unwrap(),
            ShellState::new(
                Box::new(crate::client::OfflineClient::in_memory()),
                Box::new(crate::core::ScriptedPrompter::default()),
            ),
        );

        let from_text = shell.dispatch("\"\"");
        let from_bytes = shell.dispatch_bytes(b"\"\"").unwrap();
        assert_eq!(from_text, from_bytes);
        assert_eq!(from_text.status.kind(), Some(ErrorKind::NotFound));

        assert!(!shell.dispatch_bytes(b"  \t").unwrap().executed);
    }

    #[test]
    fn test_render_validation_shows_message_only() {
        let lines = render_validation(&Status::error(ErrorKind::BadData, "Usage: x\n\nMore"));
        assert_eq!(
            lines,
            vec![
                OutputLine::error("Usage: x"),
                OutputLine::error(""),
                OutputLine::error("More"),
            ]
        );
    }
}
