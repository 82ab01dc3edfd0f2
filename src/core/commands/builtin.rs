//! Commands that manage the shell itself.

use std::process;

use tracing::debug;

use super::{Command, CommandResult, Context};
use crate::core::error::ErrorKind;
use crate::core::help;
use crate::core::parser::{Invocation, command_name};
use crate::core::registry::Resolved;
use crate::core::state::ShellState;
use crate::core::status::Status;

// =============================================================================
// Placeholders
// =============================================================================

/// Stands in for a blank line; does nothing.
pub struct EmptyCommand;

impl Command for EmptyCommand {
    fn name(&self) -> &'static str {
        ""
    }

    fn execute(&self, _inv: &Invocation, _ctx: &mut Context<'_>) -> CommandResult {
        CommandResult::ok()
    }
}

/// Stands in for any name the registry does not know.
pub struct UnrecognizedCommand;

impl Command for UnrecognizedCommand {
    fn name(&self) -> &'static str {
        "unrecognized"
    }

    fn execute(&self, _inv: &Invocation, _ctx: &mut Context<'_>) -> CommandResult {
        CommandResult::error(ErrorKind::NotFound, "Unknown command")
    }
}

// =============================================================================
// exit
// =============================================================================

pub struct ExitCommand;

impl Command for ExitCommand {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn description(&self) -> &'static str {
        "Exits the shell"
    }

    fn help(&self) -> &'static str {
        "Usage: exit\nCloses the connection and exits the shell.\n\nAliases: x, q"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["x", "q"]
    }

    fn execute(&self, _inv: &Invocation, ctx: &mut Context<'_>) -> CommandResult {
        ctx.state.client.disconnect();
        CommandResult::exit()
    }
}

// =============================================================================
// help
// =============================================================================

pub struct HelpCommand;

impl Command for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }

    fn description(&self) -> &'static str {
        "Show help on a command"
    }

    fn help(&self) -> &'static str {
        "Usage: help [command|topic]\nProvides information on a command or help topic.\n\nAliases: ?"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["?"]
    }

    fn execute(&self, inv: &Invocation, ctx: &mut Context<'_>) -> CommandResult {
        let Some(topic) = inv.token(0) else {
            let listing: Vec<String> = ctx
                .registry
                .commands()
                .map(|cmd| format!("{}\t{}", cmd.name(), cmd.description()))
                .collect();
            return CommandResult::info(listing.join("\n"));
        };

        match ctx.registry.resolve(topic) {
            Resolved::Found(cmd) if !cmd.help().is_empty() => CommandResult::info(cmd.help()),
            _ => CommandResult::info(ctx.state.help.topic(topic)),
        }
    }

    fn autocomplete(&self, partial: &[String], state: &ShellState) -> Vec<super::Candidate> {
        match partial {
            [word] => {
                let topics: Vec<&str> = state.help.topic_names().collect();
                super::complete_words(&topics, word)
            }
            _ => Vec::new(),
        }
    }
}

// =============================================================================
// shell
// =============================================================================

pub struct ShellCommand;

impl ShellCommand {
    /// Everything after the command name, quotes intact.
    fn command_line(raw: &str) -> &str {
        let raw = raw.trim_start();
        raw[command_name(raw).len()..].trim()
    }

    fn system_shell(line: &str) -> process::Command {
        if cfg!(windows) {
            let mut cmd = process::Command::new("cmd");
            cmd.args(["/C", line]);
            cmd
        } else {
            let shell = std::env::var("SHELL").unwrap_or_else(|_| "sh".to_string());
            let mut cmd = process::Command::new(shell);
            cmd.args(["-c", line]);
            cmd
        }
    }
}

impl Command for ShellCommand {
    fn name(&self) -> &'static str {
        "shell"
    }

    fn description(&self) -> &'static str {
        "Run a shell command"
    }

    fn help(&self) -> &'static str {
        help::SHELL
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["sh", "`"]
    }

    fn validate(&self, inv: &mut Invocation, _state: &ShellState) -> Status {
        if Self::command_line(inv.raw()).is_empty() {
            return Status::error(ErrorKind::EmptyData, self.help());
        }
        Status::ok()
    }

    fn execute(&self, inv: &Invocation, ctx: &mut Context<'_>) -> CommandResult {
        let line = Self::command_line(inv.raw());
        debug!(line, pwd = %ctx.state.pwd.display(), "running system shell");

        match Self::system_shell(line).current_dir(&ctx.state.pwd).status() {
            Ok(_) => CommandResult::ok(),
            Err(err) => CommandResult::error(
                ErrorKind::FilesystemError,
                format!("Error running command: {err}"),
            ),
        }
    }
}

// =============================================================================
// setinfo
// =============================================================================

pub struct SetInfoCommand;

impl Command for SetInfoCommand {
    fn name(&self) -> &'static str {
        "setinfo"
    }

    fn description(&self) -> &'static str {
        "Set workspace information"
    }

    fn help(&self) -> &'static str {
        help::SETINFO
    }

    fn execute(&self, _inv: &Invocation, _ctx: &mut Context<'_>) -> CommandResult {
        CommandResult::error(ErrorKind::Unimplemented, "Not implemented yet. Sorry!")
    }
}
