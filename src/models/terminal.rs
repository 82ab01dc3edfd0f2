//! Terminal output lines produced by the dispatch loop.

use std::fmt;

/// Represents a single line of shell output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLine {
    pub data: OutputLineData,
}

/// The actual content of an output line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputLineData {
    /// Plain text output
    Text(String),
    /// Error message (red)
    Error(String),
}

impl OutputLine {
    pub fn text(s: impl Into<String>) -> Self {
        Self {
            data: OutputLineData::Text(s.into()),
        }
    }

    pub fn error(s: impl Into<String>) -> Self {
        Self {
            data: OutputLineData::Error(s.into()),
        }
    }

    /// Line text without styling.
    pub fn as_str(&self) -> &str {
        match &self.data {
            OutputLineData::Text(s) | OutputLineData::Error(s) => s,
        }
    }

    /// Line text with ANSI styling for an interactive terminal.
    pub fn styled(&self) -> String {
        match &self.data {
            OutputLineData::Text(s) => s.clone(),
            OutputLineData::Error(s) => format!("\x1b[31m{s}\x1b[0m"),
        }
    }
}

impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_line_constructors() {
        assert_eq!(
            OutputLine::text("hello").data,
            OutputLineData::Text("hello".to_string())
        );
        assert_eq!(
            OutputLine::error("error").data,
            OutputLineData::Error("error".to_string())
        );
    }

    #[test]
    fn test_styled_only_colors_non_text() {
        assert_eq!(OutputLine::text("plain").styled(), "plain");
        assert!(OutputLine::error("bad").styled().starts_with("\x1b[31m"));
        assert_eq!(OutputLine::error("bad").to_string(), "bad");
    }
}
