//! Commands that work with the local filesystem: `chdir` and `ls`.

use std::fs;
use std::process;

use tracing::debug;

use super::{Candidate, Command, CommandResult, Context};
use crate::core::error::ErrorKind;
use crate::core::parser::Invocation;
use crate::core::state::ShellState;

// =============================================================================
// Directory completion
// =============================================================================

/// Directories whose path starts with the partial token.
///
/// A token opened with `"` stays quoted, and so does any match containing a
/// space. Paths are completed relative to the shell's working directory.
fn complete_directories(partial: &[String], state: &ShellState) -> Vec<Candidate> {
    let [token] = partial else {
        return Vec::new();
    };

    let quote_mode = token.starts_with('"');
    let typed = token.trim_matches('"');
    let (dir_part, name_part) = match typed.rfind(['/', '\\']) {
        Some(idx) => (&typed[..=idx], &typed[idx + 1..]),
        None => ("", typed),
    };

    let search_dir = if dir_part.is_empty() {
        state.pwd.clone()
    } else {
        state.resolve_path(dir_part)
    };
    let Ok(entries) = fs::read_dir(&search_dir) else {
        return Vec::new();
    };

    let mut matches: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(name_part))
        .map(|name| format!("{dir_part}{name}"))
        .collect();
    matches.sort();

    matches
        .into_iter()
        .map(|item| {
            if quote_mode || item.contains(' ') {
                Candidate::new(format!("\"{item}\""), item)
            } else {
                Candidate::plain(item)
            }
        })
        .collect()
}

// =============================================================================
// chdir
// =============================================================================

pub struct ChDirCommand;

impl Command for ChDirCommand {
    fn name(&self) -> &'static str {
        "chdir"
    }

    fn description(&self) -> &'static str {
        "change directory/location"
    }

    fn help(&self) -> &'static str {
        "Usage: cd [location]\nChanges to the specified directory. `~` is the home directory \
         and `-` the previous one; with no location, goes home.\n\nAliases: cd"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["cd"]
    }

    fn execute(&self, inv: &Invocation, ctx: &mut Context<'_>) -> CommandResult {
        let state = &mut *ctx.state;
        let target = match inv.token(0) {
            Some("-") => match &state.oldpwd {
                Some(previous) => previous.clone(),
                None => return CommandResult::error(ErrorKind::NotFound, "No previous directory"),
            },
            Some(path) => state.resolve_path(path),
            None => match &state.home {
                Some(home) => home.clone(),
                None => return CommandResult::error(ErrorKind::NotFound, "No home directory"),
            },
        };

        let target = match fs::canonicalize(&target) {
            Ok(path) if path.is_dir() => path,
            Ok(path) => {
                return CommandResult::error(
                    ErrorKind::FilesystemError,
                    format!("{} is not a directory", path.display()),
                );
            }
            Err(err) => {
                return CommandResult::error(
                    ErrorKind::FilesystemError,
                    format!("{}: {err}", target.display()),
                );
            }
        };

        debug!(from = %state.pwd.display(), to = %target.display(), "changing directory");
        state.change_dir(&target);
        CommandResult::ok()
    }

    fn autocomplete(&self, partial: &[String], state: &ShellState) -> Vec<Candidate> {
        complete_directories(partial, state)
    }
}

// =============================================================================
// ls
// =============================================================================

/// The platform's directory lister. `--color` is a GNU extension.
fn lister() -> process::Command {
    if cfg!(windows) {
        let mut cmd = process::Command::new("cmd");
        cmd.args(["/C", "dir", "/w"]);
        cmd
    } else {
        let mut cmd = process::Command::new("ls");
        if cfg!(target_os = "linux") {
            cmd.arg("--color=auto");
        }
        cmd
    }
}

pub struct ListDirCommand;

impl Command for ListDirCommand {
    fn name(&self) -> &'static str {
        "ls"
    }

    fn description(&self) -> &'static str {
        "list directory contents"
    }

    fn help(&self) -> &'static str {
        "Usage: as per bash ls command or Windows dir command\n\nAliases: dir"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["dir"]
    }

    fn execute(&self, inv: &Invocation, ctx: &mut Context<'_>) -> CommandResult {
        let mut args: Vec<String> = inv.tokens().to_vec();
        if let Some(first) = args.first_mut()
            && first.starts_with('~')
        {
            *first = ctx.state.expand_home(first).to_string_lossy().into_owned();
        }

        let mut cmd = lister();
        cmd.args(&args).current_dir(&ctx.state.pwd);

        match cmd.status() {
            Ok(status) if status.success() => CommandResult::ok(),
            Ok(_) => CommandResult::error(ErrorKind::FilesystemError, ""),
            Err(err) => CommandResult::error(ErrorKind::FilesystemError, err.to_string()),
        }
    }

    fn autocomplete(&self, partial: &[String], state: &ShellState) -> Vec<Candidate> {
        complete_directories(partial, state)
    }
}
