//! Help text and the topic index.
//!
//! Long usage texts live in `assets/help/` and are compiled in; short ones
//! stay next to their command.

use std::collections::BTreeMap;

// =============================================================================
// Command Help Text
// =============================================================================

pub const LOGIN: &str = include_str!("../../assets/help/login.txt");
pub const LOGOUT: &str = include_str!("../../assets/help/logout.txt");
pub const MYINFO: &str = include_str!("../../assets/help/myinfo.txt");
pub const MYINFO_FIELDS: &str = include_str!("../../assets/help/myinfo_fields.txt");
pub const PREREGISTER: &str = include_str!("../../assets/help/preregister.txt");
pub const PROFILE: &str = include_str!("../../assets/help/profile.txt");
pub const REGCODE: &str = include_str!("../../assets/help/regcode.txt");
pub const REGISTER: &str = include_str!("../../assets/help/register.txt");
pub const SETINFO: &str = include_str!("../../assets/help/setinfo.txt");
pub const SHELL: &str = include_str!("../../assets/help/shell.txt");

/// Topics that are not commands: (topic, text, keywords).
const TOPICS: &[(&str, &str, &[&str])] = &[(
    "myinfo_fields",
    MYINFO_FIELDS,
    &["contact", "fields", "mensago", "workspace"],
)];

// =============================================================================
// Topic Index
// =============================================================================

/// Case-insensitive help topics with a keyword fallback.
#[derive(Debug, Default)]
pub struct HelpIndex {
    topics: BTreeMap<String, &'static str>,
    keywords: BTreeMap<String, Vec<String>>,
}

impl HelpIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index with the built-in topics.
    pub fn builtin() -> Self {
        let mut index = Self::new();
        for (topic, text, keywords) in TOPICS {
            index.add_topic(topic, text, keywords);
        }
        index
    }

    pub fn add_topic(&mut self, topic: &str, text: &'static str, keywords: &[&str]) {
        self.topics.insert(topic.to_lowercase(), text);
        for keyword in keywords {
            self.keywords
                .entry(keyword.to_lowercase())
                .or_default()
                .push(topic.to_string());
        }
    }

    /// Topic text, else the topics listing the word as a keyword.
    pub fn topic(&self, topic: &str) -> String {
        let key = topic.to_lowercase();
        if let Some(text) = self.topics.get(&key) {
            return (*text).to_string();
        }

        match self.keywords.get(&key) {
            Some(matches) => {
                let mut out = vec![format!(
                    "No topics were found matching the keyword {topic}. \
                     However, the following topics include it as a keyword."
                )];
                out.extend(matches.iter().cloned());
                out.join("\n")
            }
            None => format!("No help found for the topic {topic}"),
        }
    }

    pub fn topic_names(&self) -> impl Iterator<Item = &str> {
        self.topics.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_lookup_is_case_insensitive() {
        let index = HelpIndex::builtin();
        assert_eq!(index.topic("MyInfo_Fields"), MYINFO_FIELDS);
    }

    #[test]
    fn test_keyword_fallback() {
        let index = HelpIndex::builtin();
        let text = index.topic("contact");
        assert!(text.starts_with("No topics were found matching the keyword contact."));
        assert!(text.ends_with("\nmyinfo_fields"));
    }

    #[test]
    fn test_unknown_topic() {
        let index = HelpIndex::builtin();
        assert_eq!(index.topic("bogus"), "No help found for the topic bogus");
    }

    #[test]
    fn test_help_assets_are_usage_texts() {
        for text in [LOGIN, LOGOUT, MYINFO, PREREGISTER, PROFILE, REGCODE, REGISTER, SHELL] {
            assert!(text.starts_with("Usage: "));
        }
    }
}
