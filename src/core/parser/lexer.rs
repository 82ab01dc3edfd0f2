//! Lexer for tokenizing shell input.
//!
//! Handles:
//! - Word tokenization (maximal runs of non-whitespace, non-quote characters)
//! - Double-quoted runs, unterminated runs extending to end of line
//! - The `%"` escape for a literal quote inside a quoted run

// =============================================================================
// Lexer
// =============================================================================

/// Lexer for splitting one command line into words.
///
/// Quotes are stripped and escapes resolved; the words come out ready for
/// positional/named argument separation.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Tokenize the entire input into a vector
    pub fn tokenize(self) -> Vec<String> {
        self.collect()
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() {
            let c = self.current_char();
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn current_char(&self) -> char {
        self.input[self.pos..].chars().next().unwrap_or('\0')
    }

    fn parse_quoted(&mut self) -> String {
        self.pos += 1; // skip opening "
        let mut result = String::new();

        while self.pos < self.input.len() {
            let c = self.current_char();
            self.pos += c.len_utf8();

            match c {
                '"' => return result,
                '%' if self.current_char() == '"' => {
                    // Only an escape when a closing quote is still ahead,
                    // otherwise this quote ends the run and `%` is literal.
                    if self.input[self.pos + 1..].contains('"') {
                        result.push('"');
                        self.pos += 1;
                    } else {
                        result.push('%');
                    }
                }
                _ => result.push(c),
            }
        }

        // Unterminated quote runs to end of line
        result
    }

    fn parse_word(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.input.len() {
            let c = self.current_char();
            if c.is_whitespace() || c == '"' {
                break;
            }
            self.pos += c.len_utf8();
        }
        self.input[start..self.pos].to_string()
    }
}

impl Iterator for Lexer<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        if self.pos >= self.input.len() {
            return None;
        }
        if self.current_char() == '"' {
            Some(self.parse_quoted())
        } else {
            Some(self.parse_word())
        }
    }
}

// =============================================================================
// Partial-line splitting (completion)
// =============================================================================

/// Split a partially typed line for completion.
///
/// Unlike [`Lexer`], quotes are kept on the tokens so completions can
/// replace exactly what the user typed. A token starting with `"` runs to
/// the next quote, or to end of line while still open (trailing spaces
/// included); any other token is a run of non-whitespace.
pub fn split_partial(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = line.trim_start();

    while !rest.is_empty() {
        let token_len = match rest.strip_prefix('"') {
            Some(after) => match after.find('"') {
                Some(0) => word_len(rest),
                Some(close) => close + 2,
                None => rest.len(),
            },
            None => word_len(rest),
        };
        tokens.push(rest[..token_len].to_string());
        rest = rest[token_len..].trim_start();
    }

    tokens
}

/// Whether a [`split_partial`] token is a quoted run still waiting for its
/// closing quote.
pub fn is_open_quote(token: &str) -> bool {
    match token.strip_prefix('"') {
        Some(after) => !after.ends_with('"'),
        None => false,
    }
}

fn word_len(s: &str) -> usize {
    s.find(char::is_whitespace).unwrap_or(s.len())
}

// =============================================================================
// Tests
// =============================================================================
