//! The `profile` command.

use super::{Candidate, Command, CommandResult, Context, complete_words};
use crate::config::identity::RESERVED_PROFILE;
use crate::core::error::ErrorKind;
use crate::core::help;
use crate::core::parser::Invocation;
use crate::core::state::ShellState;
use crate::core::status::Status;

const VERBS: &[&str] = &["create", "delete", "get", "list", "rename", "set", "setdefault"];

pub struct ProfileCommand;

impl ProfileCommand {
    fn reserved() -> Status {
        Status::error(
            ErrorKind::BadData,
            format!("'{RESERVED_PROFILE}' is reserved and may not be used."),
        )
    }
}

impl Command for ProfileCommand {
    fn name(&self) -> &'static str {
        "profile"
    }

    fn description(&self) -> &'static str {
        "Manage profiles."
    }

    fn help(&self) -> &'static str {
        help::PROFILE
    }

    fn validate(&self, inv: &mut Invocation, _state: &ShellState) -> Status {
        let verb = inv.token(0).unwrap_or("get").to_lowercase();
        if !VERBS.contains(&verb.as_str()) {
            return Status::error(ErrorKind::BadData, self.help());
        }

        match verb.as_str() {
            "get" | "list" => {}
            "rename" => {
                let (Some(old), Some(new), 3) = (inv.token(1), inv.token(2), inv.len()) else {
                    return Status::error(ErrorKind::BadData, self.help());
                };
                let (old, new) = (old.to_lowercase(), new.to_lowercase());
                if old == RESERVED_PROFILE || new == RESERVED_PROFILE {
                    return Self::reserved();
                }
                inv.set_arg("oldname", old);
                inv.set_arg("newname", new);
            }
            _ => {
                let (Some(name), 2) = (inv.token(1), inv.len()) else {
                    return Status::error(ErrorKind::BadData, self.help());
                };
                let name = name.to_lowercase();
                if name == RESERVED_PROFILE {
                    return Self::reserved();
                }
                inv.set_arg("name", name);
            }
        }

        inv.set_arg("verb", verb);
        Status::ok()
    }

    fn execute(&self, inv: &Invocation, ctx: &mut Context<'_>) -> CommandResult {
        let client = &mut ctx.state.client;
        let name = inv.arg("name").unwrap_or_default();

        let status = match inv.arg("verb").unwrap_or("get") {
            "get" => match client.active_profile() {
                Ok(profile) => Status::info_text(format!(
                    "Active profile: {}, {}",
                    profile.name,
                    profile.identity_string()
                )),
                Err(status) => status.with_info("No active profile"),
            },
            "list" => {
                let mut lines = vec!["Profiles:".to_string()];
                lines.extend(client.profiles());
                Status::info_text(lines.join("\n"))
            }
            "create" => {
                let status = client.create_profile(name);
                if status.is_err() {
                    status.wrap("Couldn't create profile")
                } else {
                    status
                }
            }
            "delete" => {
                let prompter = &mut ctx.state.prompter;
                prompter
                    .notice("This will delete the profile and all of its files. It can't be undone.");
                if !prompter.confirm(&format!("Really delete profile '{name}'? [y/N] ")) {
                    return CommandResult::ok();
                }
                let status = ctx.state.client.delete_profile(name);
                if status.is_err() {
                    status.wrap("Couldn't delete profile")
                } else {
                    status.with_info(format!("Profile '{name}' has been deleted"))
                }
            }
            "set" => {
                let status = client.activate_profile(name);
                if status.is_err() {
                    status.wrap("Couldn't activate profile")
                } else {
                    status
                }
            }
            "setdefault" => {
                let status = client.set_default_profile(name);
                if status.is_err() {
                    status.wrap("Couldn't set profile as default")
                } else {
                    status
                }
            }
            "rename" => {
                let old = inv.arg("oldname").unwrap_or_default();
                let new = inv.arg("newname").unwrap_or_default();
                let status = client.rename_profile(old, new);
                if status.is_err() {
                    status.wrap("Couldn't rename profile")
                } else {
                    status
                }
            }
            _ => Status::info_text(self.help()),
        };
        status.into()
    }

    fn autocomplete(&self, partial: &[String], state: &ShellState) -> Vec<Candidate> {
        match partial {
            [verb] if !VERBS.contains(&verb.as_str()) => complete_words(VERBS, verb),
            [_, name] => {
                let profiles = state.client.profiles();
                if profiles.contains(name) {
                    return Vec::new();
                }
                let names: Vec<&str> = profiles.iter().map(String::as_str).collect();
                complete_words(&names, name)
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::OfflineClient;
    use crate::core::prompt::ScriptedPrompter;

    fn state() -> ShellState {
        ShellState::new(
            Box::new(OfflineClient::in_memory()),
            Box::new(ScriptedPrompter::default()),
        )
    }

    fn validate(line: &str) -> (Invocation, Status) {
        let mut inv = Invocation::parse(line);
        let status = ProfileCommand.validate(&mut inv, &state());
        (inv, status)
    }

    #[test]
    fn test_default_verb_is_get() {
        let (inv, status) = validate("profile");
        assert!(status.is_ok());
        assert_eq!(inv.arg("verb"), Some("get"));
    }

    #[test]
    fn test_reserved_name() {
        let (_, status) = validate("profile create Default");
        assert_eq!(status.kind(), Some(ErrorKind::BadData));
        assert!(status.info().contains("reserved"));

        let (_, status) = validate("profile rename work default");
        assert!(status.info().contains("reserved"));
    }

    #[test]
    fn test_shape_errors_show_usage() {
        for line in ["profile bogus", "profile create", "profile rename a", "profile set a b"] {
            let (_, status) = validate(line);
            assert_eq!(status.kind(), Some(ErrorKind::BadData), "{line}");
            assert_eq!(status.info(), help::PROFILE, "{line}");
        }
    }

    #[test]
    fn test_names_are_lowercased() {
        let (inv, _) = validate("profile rename Work Office");
        assert_eq!(inv.arg("oldname"), Some("work"));
        assert_eq!(inv.arg("newname"), Some("office"));
    }

    #[test]
    fn test_autocomplete() {
        let state = state();
        let verbs = ProfileCommand.autocomplete(&["se".to_string()], &state);
        assert_eq!(verbs, vec![Candidate::plain("set"), Candidate::plain("setdefault")]);

        let names = ProfileCommand.autocomplete(&["set".to_string(), "pr".to_string()], &state);
        assert_eq!(names, vec![Candidate::plain("primary")]);
    }
}
