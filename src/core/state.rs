//! Shell-wide state passed to every command.

use std::path::{Path, PathBuf};

use crate::client::Client;
use crate::core::help::HelpIndex;
use crate::core::prompt::Prompter;
use crate::core::status::Status;
use crate::models::Domain;

/// State that outlives a single command.
///
/// The working directory is tracked here rather than in the process, so
/// commands that spawn children pass it along explicitly.
pub struct ShellState {
    pub pwd: PathBuf,
    pub oldpwd: Option<PathBuf>,
    pub home: Option<PathBuf>,
    pub client: Box<dyn Client>,
    pub prompter: Box<dyn Prompter>,
    pub help: HelpIndex,
}

impl ShellState {
    pub fn new(client: Box<dyn Client>, prompter: Box<dyn Prompter>) -> Self {
        let pwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            pwd,
            oldpwd: None,
            home: dirs::home_dir(),
            client,
            prompter,
            help: HelpIndex::builtin(),
        }
    }

    pub fn with_pwd(mut self, pwd: impl Into<PathBuf>) -> Self {
        self.pwd = pwd.into();
        self
    }

    /// Replace a leading `~` with the home directory.
    pub fn expand_home(&self, path: &str) -> PathBuf {
        match (path.strip_prefix('~'), &self.home) {
            (Some(""), Some(home)) => home.clone(),
            (Some(rest), Some(home)) if rest.starts_with(['/', '\\']) => {
                home.join(rest.trim_start_matches(['/', '\\']))
            }
            _ => PathBuf::from(path),
        }
    }

    /// Expand `~`, then resolve against the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let expanded = self.expand_home(path);
        if expanded.is_absolute() {
            expanded
        } else {
            self.pwd.join(expanded)
        }
    }

    /// Move to `dir`, remembering where we came from.
    pub fn change_dir(&mut self, dir: &Path) {
        let previous = std::mem::replace(&mut self.pwd, dir.to_path_buf());
        self.oldpwd = Some(previous);
    }

    /// Connect to `domain` unless a connection is already open.
    pub fn ensure_connection(&mut self, domain: &Domain) -> Status {
        if self.client.is_connected() {
            return Status::ok();
        }
        self.client.connect(domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::OfflineClient;
    use crate::core::prompt::ScriptedPrompter;

    fn state() -> ShellState {
        let mut state = ShellState::new(
            Box::new(OfflineClient::in_memory()),
            Box::new(ScriptedPrompter::default()),
        )
        .with_pwd("/work");
        state.home = Some(PathBuf::from("/home/user"));
        state
    }

    #[test]
    fn test_expand_home() {
        let state = state();
        assert_eq!(state.expand_home("~"), PathBuf::from("/home/user"));
        assert_eq!(state.expand_home("~/docs"), PathBuf::from("/home/user/docs"));
        assert_eq!(state.expand_home("~other"), PathBuf::from("~other"));
        assert_eq!(state.expand_home("docs"), PathBuf::from("docs"));
    }

    #[test]
    fn test_resolve_path() {
        let state = state();
        assert_eq!(state.resolve_path("docs"), PathBuf::from("/work/docs"));
        assert_eq!(state.resolve_path("/tmp"), PathBuf::from("/tmp"));
        assert_eq!(state.resolve_path("~/x"), PathBuf::from("/home/user/x"));
    }

    #[test]
    fn test_change_dir_tracks_previous() {
        let mut state = state();
        state.change_dir(Path::new("/tmp"));
        assert_eq!(state.pwd, PathBuf::from("/tmp"));
        assert_eq!(state.oldpwd, Some(PathBuf::from("/work")));
    }

    #[test]
    fn test_ensure_connection() {
        let mut state = state();
        assert!(!state.client.is_connected());
        assert!(state.ensure_connection(&"example.com".parse().unwrap()).is_ok());
        assert!(state.client.is_connected());
    }
}
