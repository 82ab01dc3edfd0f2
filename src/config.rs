//! Application configuration.
//!
//! Centralizes the constants used throughout the shell and the optional
//! user configuration file (`config.toml`).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::error::ShellError;

// =============================================================================
// Application Metadata
// =============================================================================

/// Application name.
pub const APP_NAME: &str = "mdshell";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "MDSHELL_CONFIG";

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "MDSHELL_LOG";

/// File name of the offline client's persisted state.
pub const STATE_FILE: &str = "state.json";

// =============================================================================
// Terminal Configuration
// =============================================================================

/// Prompt shown when no configuration overrides it.
pub const DEFAULT_PROMPT: &str = "🐧 > ";

/// Maximum number of command history entries to keep.
pub const MAX_COMMAND_HISTORY: usize = 1000;

/// Default tracing filter.
pub const DEFAULT_LOG_FILTER: &str = "warn";

// =============================================================================
// Identity Configuration
// =============================================================================

/// Identity constraints shared by models and the client.
pub mod identity {
    /// Maximum length of a user ID, in characters.
    pub const MAX_USER_ID_LEN: usize = 64;
    /// Profile created on first run.
    pub const PRIMARY_PROFILE: &str = "primary";
    /// Profile name that may not be created, renamed to, or deleted.
    pub const RESERVED_PROFILE: &str = "default";
    /// Number of characters in a generated registration code.
    pub const REGCODE_LEN: usize = 16;
    /// Group assigned to contact fields the user sets for themselves.
    pub const SELF_GROUP: &str = "self";
}

// =============================================================================
// User Configuration
// =============================================================================

/// Settings read from `config.toml`. Every field has a default.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShellConfig {
    /// Prompt string.
    pub prompt: String,
    /// History file; history is kept in memory only when unset.
    pub history_file: Option<PathBuf>,
    /// Maximum history entries.
    pub history_size: usize,
    /// Directory for profiles and the offline server table.
    pub data_dir: PathBuf,
    /// Tracing filter directive used when `MDSHELL_LOG` is unset.
    pub log_filter: String,
    /// Domain `preregister` uses when none is given.
    pub default_domain: Option<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME);
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            history_file: Some(data_dir.join("history.txt")),
            history_size: MAX_COMMAND_HISTORY,
            data_dir,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            default_domain: None,
        }
    }
}

impl ShellConfig {
    /// Load from `$MDSHELL_CONFIG`, else the platform config directory.
    ///
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load() -> Result<Self, ShellError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ShellError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Self::parse(&text).map_err(|source| ShellError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(ShellConfig::parse("").unwrap(), ShellConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = ShellConfig::parse(
            r#"
            prompt = "md> "
            history_size = 50
            data_dir = "/tmp/mdshell-test"
            "#,
        )
        .unwrap();
        assert_eq!(config.prompt, "md> ");
        assert_eq!(config.history_size, 50);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/mdshell-test"));
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert_eq!(config.default_domain, None);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "prompt = [").unwrap();
        assert!(matches!(
            ShellConfig::load_from(&path),
            Err(ShellError::Config { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ShellConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ShellConfig::default());
    }
}
