//! Uniform result shape shared by commands and the client.

use serde_json::{Map, Value};

use super::error::ErrorKind;

/// Outcome of a command step or a client call.
///
/// Carries an optional error kind, human-readable text, and named values
/// that calling code can consume without scraping the text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Status {
    error: Option<ErrorKind>,
    info: String,
    values: Map<String, Value>,
}

impl Status {
    /// A successful status with no text.
    pub fn ok() -> Self {
        Self::default()
    }

    /// A failed status of the given kind.
    pub fn error(kind: ErrorKind, info: impl Into<String>) -> Self {
        Self {
            error: Some(kind),
            info: info.into(),
            values: Map::new(),
        }
    }

    /// A successful status carrying informational text.
    pub fn info_text(info: impl Into<String>) -> Self {
        Self {
            error: None,
            info: info.into(),
            values: Map::new(),
        }
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.error
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    pub fn info(&self) -> &str {
        &self.info
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Convenience accessor for string-valued entries.
    pub fn str_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn has_value(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Prefix the text with higher-level context, keeping the error kind.
    ///
    /// `Couldn't create profile: Exists / profile 'work' already exists`
    pub fn wrap(mut self, context: &str) -> Self {
        self.info = match self.error {
            Some(kind) => format!("{context}: {kind} / {}", self.info),
            None => format!("{context}: {}", self.info),
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_has_no_error() {
        let status = Status::ok();
        assert!(status.is_ok());
        assert_eq!(status.kind(), None);
        assert_eq!(status.info(), "");
    }

    #[test]
    fn test_values() {
        let status = Status::ok()
            .with_value("wid", "abc")
            .with_value("count", 3);
        assert_eq!(status.str_value("wid"), Some("abc"));
        assert_eq!(status.value("count"), Some(&Value::from(3)));
        assert!(!status.has_value("uid"));
    }

    #[test]
    fn test_wrap_keeps_kind_and_concatenates() {
        let status = Status::error(ErrorKind::Exists, "already there").wrap("Couldn't create profile");
        assert_eq!(status.kind(), Some(ErrorKind::Exists));
        assert_eq!(status.info(), "Couldn't create profile: Exists / already there");
    }
}
