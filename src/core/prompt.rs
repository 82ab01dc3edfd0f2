//! Interactive prompts used while a command executes.
//!
//! Commands never touch the terminal directly; they go through a
//! [`Prompter`] so the dispatch loop can be scripted.

use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};

/// Source of interactive answers during `execute`.
pub trait Prompter {
    /// Read a line without echoing it.
    fn read_secret(&mut self, prompt: &str) -> io::Result<String>;

    /// Read a visible line of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;

    /// Show a message that is not part of the command result.
    fn notice(&mut self, text: &str);

    /// Ask a yes/no question; anything but `y` or `yes` is no.
    fn confirm(&mut self, prompt: &str) -> bool {
        match self.read_line(prompt) {
            Ok(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

// =============================================================================
// Terminal
// =============================================================================

/// Prompts on the controlling terminal.
///
/// When standard input is piped, answers are the next input lines. The
/// stdin lock is held only for the read, never across prompts.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

fn show_prompt(prompt: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()
}

impl Prompter for TerminalPrompter {
    fn read_secret(&mut self, prompt: &str) -> io::Result<String> {
        if io::stdin().is_terminal() {
            return rpassword::prompt_password(prompt);
        }
        show_prompt(prompt)?;
        rpassword::read_password_from_bufread(&mut io::stdin().lock())
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        show_prompt(prompt)?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn notice(&mut self, text: &str) {
        println!("{text}");
    }
}

// =============================================================================
// Scripted
// =============================================================================

/// Replays canned answers and records notices.
///
/// Once the answers run out every prompt reads an empty line, which cancels
/// password entry and declines confirmations.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    notices: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            notices: Vec::new(),
        }
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    fn next_answer(&mut self) -> String {
        self.answers.pop_front().unwrap_or_default()
    }
}

impl Prompter for ScriptedPrompter {
    fn read_secret(&mut self, _prompt: &str) -> io::Result<String> {
        Ok(self.next_answer())
    }

    fn read_line(&mut self, _prompt: &str) -> io::Result<String> {
        Ok(self.next_answer())
    }

    fn notice(&mut self, text: &str) {
        self.notices.push(text.to_string());
    }
}
