//! Password strength checking and interactive password entry.

use std::fmt;

use tracing::warn;
use unicode_normalization::UnicodeNormalization;

use super::prompt::Prompter;

/// Shortest password that can rate above [`Strength::VeryWeak`].
const MIN_LENGTH: usize = 8;

const PASSWORD_GUIDANCE: &str = "Please enter a passphrase. Use at least 10 characters with a \
mix of uppercase and lowercase letters and preferably a number or symbol. Non-English letters \
such as ß, ñ, Ω and Ç are welcome. Leading and trailing spaces are stripped.";

const TOO_WEAK: &str = "Unfortunately, the password you entered was too weak. Please use another.";

/// Rated strength of a password.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strength {
    VeryWeak,
    Weak,
    Medium,
    Strong,
}

impl Strength {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryWeak => "very weak",
            Self::Weak => "weak",
            Self::Medium => "medium",
            Self::Strong => "strong",
        }
    }

    /// Whether a password of this strength may be used.
    pub fn is_acceptable(self) -> bool {
        self >= Self::Medium
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a password the way it is stored: NFKC, trimmed.
pub fn normalize(password: &str) -> String {
    password.nfkc().collect::<String>().trim().to_string()
}

/// Rate a password by length and the classes of characters it uses.
pub fn check_complexity(password: &str) -> Strength {
    let password = normalize(password);
    let length = password.chars().count();
    if length < MIN_LENGTH {
        return Strength::VeryWeak;
    }

    let (mut lower, mut upper, mut digit, mut other) = (false, false, false, false);
    for c in password.chars() {
        if c.is_lowercase() {
            lower = true;
        } else if c.is_uppercase() {
            upper = true;
        } else if c.is_numeric() {
            digit = true;
        } else {
            other = true;
        }
    }

    let points = [lower, upper, digit, other, length >= 12, length >= 16]
        .into_iter()
        .filter(|&p| p)
        .count();

    match points {
        0..=2 => Strength::Weak,
        3 => Strength::Medium,
        _ => Strength::Strong,
    }
}

/// Ask for a new password until it is confirmed and strong enough.
///
/// An empty entry cancels and returns `None`.
pub fn set_password_interactive(prompter: &mut dyn Prompter) -> Option<String> {
    prompter.notice(PASSWORD_GUIDANCE);

    loop {
        let password = match prompter.read_secret("Password: ") {
            Ok(password) => normalize(&password),
            Err(err) => {
                warn!(%err, "password entry failed");
                return None;
            }
        };
        if password.is_empty() {
            return None;
        }

        let confirmation = match prompter.read_secret("Confirm password: ") {
            Ok(confirmation) => normalize(&confirmation),
            Err(err) => {
                warn!(%err, "password confirmation failed");
                return None;
            }
        };

        if password != confirmation {
            prompter.notice("Passwords do not match.");
            continue;
        }
        if !check_complexity(&password).is_acceptable() {
            prompter.notice(TOO_WEAK);
            continue;
        }
        return Some(password);
    }
}

/// Message shown when a password given on the command line is refused.
pub fn too_weak_message() -> &'static str {
    TOO_WEAK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prompt::ScriptedPrompter;

    #[test]
    fn test_strength_ratings() {
        assert_eq!(check_complexity("short"), Strength::VeryWeak);
        assert_eq!(check_complexity("password"), Strength::Weak);
        assert_eq!(check_complexity("abcdefgh12"), Strength::Weak);
        assert_eq!(check_complexity("Abcdefgh12"), Strength::Medium);
        assert_eq!(check_complexity("MyS3cretPassw0rd!"), Strength::Strong);
    }

    #[test]
    fn test_whitespace_does_not_count() {
        assert_eq!(check_complexity("   abc   "), Strength::VeryWeak);
    }

    #[test]
    fn test_interactive_retries_until_match() {
        let mut prompter = ScriptedPrompter::new([
            "Tr0ub4dor&3xyz",
            "Tr0ub4dor&3xyZ",
            "Tr0ub4dor&3xyz",
            "Tr0ub4dor&3xyz",
        ]);
        assert_eq!(
            set_password_interactive(&mut prompter).as_deref(),
            Some("Tr0ub4dor&3xyz")
        );
        assert!(prompter.notices().iter().any(|n| n == "Passwords do not match."));
    }

    #[test]
    fn test_interactive_rejects_weak() {
        let mut prompter =
            ScriptedPrompter::new(["password", "password", "CorrectHorse9!", "CorrectHorse9!"]);
        assert_eq!(
            set_password_interactive(&mut prompter).as_deref(),
            Some("CorrectHorse9!")
        );
        assert!(prompter.notices().iter().any(|n| n == TOO_WEAK));
    }

    #[test]
    fn test_interactive_empty_cancels() {
        let mut prompter = ScriptedPrompter::new([""]);
        assert_eq!(set_password_interactive(&mut prompter), None);
    }
}
