//! Commands that manage accounts and contact information.
//!
//! Each command checks argument shape in `validate` and leaves the real
//! work to the [`Client`](crate::client::Client).

use super::{Candidate, Command, CommandResult, Context, complete_words};
use crate::config::identity::SELF_GROUP;
use crate::core::error::ErrorKind;
use crate::core::help;
use crate::core::parser::Invocation;
use crate::core::password::{check_complexity, set_password_interactive, too_weak_message};
use crate::core::state::ShellState;
use crate::core::status::Status;
use crate::models::{Domain, MAddress, UserId, normalize_field};

/// Password from the command line, else asked for interactively.
///
/// `None` means the user cancelled at the prompt.
fn password_for(inv: &Invocation, ctx: &mut Context<'_>) -> Option<String> {
    match inv.arg("password") {
        Some(password) => Some(password.to_string()),
        None => set_password_interactive(ctx.state.prompter.as_mut()),
    }
}

// =============================================================================
// login / logout
// =============================================================================

pub struct LoginCommand;

impl Command for LoginCommand {
    fn name(&self) -> &'static str {
        "login"
    }

    fn description(&self) -> &'static str {
        "Logs into the specified server"
    }

    fn help(&self) -> &'static str {
        help::LOGIN
    }

    fn validate(&self, inv: &mut Invocation, state: &ShellState) -> Status {
        if inv.len() > 1 {
            return Status::error(ErrorKind::BadValue, self.help());
        }
        if let Some(address) = inv.token(0)
            && address.parse::<MAddress>().is_err()
        {
            return Status::error(ErrorKind::BadValue, "Invalid address");
        }
        match state.client.active_profile() {
            Ok(_) => Status::ok(),
            Err(status) => status,
        }
    }

    fn execute(&self, inv: &Invocation, ctx: &mut Context<'_>) -> CommandResult {
        let address = match inv.token(0) {
            Some(text) => match text.parse::<MAddress>() {
                Ok(address) => address,
                Err(err) => return CommandResult::error(ErrorKind::BadValue, err.to_string()),
            },
            None => {
                let profile = match ctx.state.client.active_profile() {
                    Ok(profile) => profile,
                    Err(status) => return status.into(),
                };
                match profile.address() {
                    Some(address) => address,
                    None => {
                        return CommandResult::error(
                            ErrorKind::NotFound,
                            "The active profile has no identity; give an address to log into",
                        );
                    }
                }
            }
        };

        let status = ctx.state.ensure_connection(&address.domain);
        if status.is_err() {
            return status.into();
        }
        ctx.state.client.login(&address).into()
    }
}

pub struct LogoutCommand;

impl Command for LogoutCommand {
    fn name(&self) -> &'static str {
        "logout"
    }

    fn description(&self) -> &'static str {
        "Logs out of the currently-connected server"
    }

    fn help(&self) -> &'static str {
        help::LOGOUT
    }

    fn execute(&self, _inv: &Invocation, ctx: &mut Context<'_>) -> CommandResult {
        ctx.state.client.logout().into()
    }
}

// =============================================================================
// myinfo
// =============================================================================

const MYINFO_VERBS: &[&str] = &["check", "del", "get", "set"];

pub struct MyInfoCommand;

impl MyInfoCommand {
    fn field(&self, spec: &str) -> Result<String, Status> {
        normalize_field(spec).ok_or_else(|| {
            Status::error(ErrorKind::BadValue, format!("Invalid field specifier {spec}"))
        })
    }
}

impl Command for MyInfoCommand {
    fn name(&self) -> &'static str {
        "myinfo"
    }

    fn description(&self) -> &'static str {
        "Set workspace contact information"
    }

    fn help(&self) -> &'static str {
        help::MYINFO
    }

    fn validate(&self, inv: &mut Invocation, _state: &ShellState) -> Status {
        let usage = || Status::error(ErrorKind::BadData, self.help());
        if inv.len() > 3 {
            return usage();
        }

        let verb = inv.token(0).unwrap_or("get").to_lowercase();
        if !MYINFO_VERBS.contains(&verb.as_str()) {
            return Status::error(
                ErrorKind::BadValue,
                "Verb must be 'set', 'get', 'del', 'check'",
            );
        }

        match (verb.as_str(), inv.len()) {
            ("set", 3) => {
                let field = match self.field(inv.token(1).unwrap_or_default()) {
                    Ok(field) => field,
                    Err(status) => return status,
                };
                let value = inv.token(2).unwrap_or_default().trim().to_string();
                if value.is_empty() {
                    return Status::error(ErrorKind::BadValue, "Value may not be empty");
                }
                inv.set_arg("field", field);
                inv.set_arg("value", value);
            }
            ("del", 2) => match self.field(inv.token(1).unwrap_or_default()) {
                Ok(field) => inv.set_arg("field", field),
                Err(status) => return status,
            },
            ("get", 0 | 1) => inv.set_arg("field", "*"),
            ("get", 2) => match self.field(inv.token(1).unwrap_or_default()) {
                Ok(field) => inv.set_arg("field", field),
                Err(status) => return status,
            },
            ("check", 1) => {}
            _ => return usage(),
        }

        inv.set_arg("verb", verb);
        Status::ok()
    }

    fn execute(&self, inv: &Invocation, ctx: &mut Context<'_>) -> CommandResult {
        let client = &mut ctx.state.client;
        let field = inv.arg("field").unwrap_or("*");

        let status = match inv.arg("verb").unwrap_or("get") {
            "set" => client.save_field(field, inv.arg("value").unwrap_or_default(), SELF_GROUP),
            "del" => client.delete_field(field),
            "check" => client.check_fields(),
            _ => client.load_field(field),
        };
        status.into()
    }

    fn autocomplete(&self, partial: &[String], _state: &ShellState) -> Vec<Candidate> {
        match partial {
            [verb] if !MYINFO_VERBS.contains(&verb.as_str()) => complete_words(MYINFO_VERBS, verb),
            _ => Vec::new(),
        }
    }
}

// =============================================================================
// preregister
// =============================================================================

pub struct PreregisterCommand;

impl PreregisterCommand {
    fn user_id(token: &str) -> Result<Option<UserId>, Status> {
        if token.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        token
            .parse()
            .map(Some)
            .map_err(|_| Status::error(ErrorKind::BadData, "Bad user ID/workspace ID"))
    }
}

impl Command for PreregisterCommand {
    fn name(&self) -> &'static str {
        "preregister"
    }

    fn description(&self) -> &'static str {
        "Preregister a new account for someone."
    }

    fn help(&self) -> &'static str {
        help::PREREGISTER
    }

    fn validate(&self, inv: &mut Invocation, _state: &ShellState) -> Status {
        if !(1..=2).contains(&inv.len()) {
            return Status::error(ErrorKind::BadData, self.help());
        }
        if let Err(status) = Self::user_id(inv.token(0).unwrap_or_default()) {
            return status;
        }
        if let Some(domain) = inv.token(1)
            && domain.parse::<Domain>().is_err()
        {
            return Status::error(ErrorKind::BadData, "Bad domain");
        }
        Status::ok()
    }

    fn execute(&self, inv: &Invocation, ctx: &mut Context<'_>) -> CommandResult {
        let uid = match Self::user_id(inv.token(0).unwrap_or_default()) {
            Ok(uid) => uid,
            Err(status) => return status.into(),
        };
        let domain = match inv.token(1).map(str::parse::<Domain>).transpose() {
            Ok(domain) => domain,
            Err(_) => return CommandResult::error(ErrorKind::BadData, "Bad domain"),
        };

        let status = ctx.state.client.preregister(uid.as_ref(), domain.as_ref());
        if let Some(kind) = status.kind() {
            return CommandResult::error(
                ErrorKind::ServerError,
                format!("Preregistration error: {kind} / {}", status.info()),
            );
        }

        let wid = status.str_value("wid").unwrap_or_default();
        let regcode = status.str_value("regcode").unwrap_or_default();
        let mut text = String::from("Preregistration success:\n");
        if let Some(uid) = status.str_value("uid") {
            text.push_str(&format!("User ID: {uid}\n"));
        }
        text.push_str(&format!("Workspace ID: {wid}\nRegistration Code: {regcode}"));

        let mut out = Status::info_text(text);
        for key in ["wid", "regcode", "domain", "uid"] {
            if let Some(value) = status.value(key) {
                out.set_value(key, value.clone());
            }
        }
        out.into()
    }
}

// =============================================================================
// register
// =============================================================================

pub struct RegisterCommand;

impl Command for RegisterCommand {
    fn name(&self) -> &'static str {
        "register"
    }

    fn description(&self) -> &'static str {
        "Register a new account on the connected server."
    }

    fn help(&self) -> &'static str {
        help::REGISTER
    }

    fn validate(&self, inv: &mut Invocation, _state: &ShellState) -> Status {
        let Some(domain) = inv.token(0) else {
            return Status::error(ErrorKind::BadData, self.help());
        };
        if inv.len() > 1 {
            return Status::error(ErrorKind::BadData, self.help());
        }
        if domain.parse::<Domain>().is_err() {
            return Status::error(
                ErrorKind::BadValue,
                format!("{domain} isn't a valid server domain"),
            );
        }
        if let Some(password) = inv.arg("password")
            && !check_complexity(password).is_acceptable()
        {
            return Status::error(ErrorKind::BadValue, too_weak_message());
        }
        if let Some(uid) = inv.arg("userid")
            && uid.parse::<UserId>().is_err()
        {
            return Status::error(ErrorKind::BadValue, "The user ID given is not valid");
        }
        Status::ok()
    }

    fn execute(&self, inv: &Invocation, ctx: &mut Context<'_>) -> CommandResult {
        let (domain, uid) = match (
            inv.token(0).unwrap_or_default().parse::<Domain>(),
            inv.arg("userid").map(str::parse::<UserId>).transpose(),
        ) {
            (Ok(domain), Ok(uid)) => (domain, uid),
            (Err(err), _) => return CommandResult::error(ErrorKind::BadValue, err.to_string()),
            (_, Err(err)) => return CommandResult::error(ErrorKind::BadValue, err.to_string()),
        };

        let Some(password) = password_for(inv, ctx) else {
            return CommandResult::ok();
        };

        let status = ctx.state.client.register(&domain, &password, uid.as_ref());
        if status.is_err() {
            return status.into();
        }
        status.with_info("Registration successful").into()
    }
}

// =============================================================================
// regcode
// =============================================================================

pub struct RegCodeCommand;

impl Command for RegCodeCommand {
    fn name(&self) -> &'static str {
        "regcode"
    }

    fn description(&self) -> &'static str {
        "Finish registration of an account with a registration code"
    }

    fn help(&self) -> &'static str {
        help::REGCODE
    }

    fn validate(&self, inv: &mut Invocation, state: &ShellState) -> Status {
        if !(2..=3).contains(&inv.len()) {
            return Status::error(ErrorKind::BadData, self.help());
        }

        match state.client.active_profile() {
            Ok(profile) if profile.has_identity() => {
                return Status::error(
                    ErrorKind::Exists,
                    "An identity has already been assigned to this profile.",
                );
            }
            Ok(_) => {}
            Err(status) => return status,
        }

        if inv.token(0).unwrap_or_default().parse::<MAddress>().is_err() {
            return Status::error(ErrorKind::BadValue, "Invalid address");
        }
        if let Some(password) = inv.token(2).map(str::to_string) {
            inv.set_arg("password", password);
        }
        Status::ok()
    }

    fn execute(&self, inv: &Invocation, ctx: &mut Context<'_>) -> CommandResult {
        let address = match inv.token(0).unwrap_or_default().parse::<MAddress>() {
            Ok(address) => address,
            Err(err) => return CommandResult::error(ErrorKind::BadValue, err.to_string()),
        };
        let regcode = inv.token(1).unwrap_or_default();

        let Some(password) = password_for(inv, ctx) else {
            return CommandResult::ok();
        };

        let status = ctx.state.ensure_connection(&address.domain);
        if status.is_err() {
            return status.into();
        }

        let status = ctx.state.client.redeem_regcode(&address, regcode, &password);
        if let Some(kind) = status.kind() {
            let info = format!("An error occurred: {kind} / {}", status.info());
            return status.with_info(info).into();
        }
        status
            .with_info("Registration code redeemed successfully")
            .into()
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

    fn validate(cmd: &dyn Command, line: &str) -> (Invocation, Status) {
        let mut inv = Invocation::parse(line);
        let status = cmd.validate(&mut inv, &state());
        (inv, status)
    }

    #[test]
    fn test_myinfo_verbs() {
        let (inv, status) = validate(&MyInfoCommand, "myinfo");
        assert!(status.is_ok());
        assert_eq!(inv.arg("verb"), Some("get"));
        assert_eq!(inv.arg("field"), Some("*"));

        let (_, status) = validate(&MyInfoCommand, "myinfo frob");
        assert_eq!(status.kind(), Some(ErrorKind::BadValue));

        let (_, status) = validate(&MyInfoCommand, "myinfo check extra");
        assert_eq!(status.kind(), Some(ErrorKind::BadData));
    }

    #[test]
    fn test_myinfo_set_rejects_empty_value() {
        let (_, status) = validate(&MyInfoCommand, "myinfo set GivenName \"\"");
        assert_eq!(status.kind(), Some(ErrorKind::BadValue));
        assert_eq!(status.info(), "Value may not be empty");

        let (_, status) = validate(&MyInfoCommand, "myinfo set GivenName \"  \"");
        assert_eq!(status.kind(), Some(ErrorKind::BadValue));
    }

    #[test]
    fn test_myinfo_normalizes_field() {
        let (inv, status) = validate(&MyInfoCommand, "myinfo set mensago.0.label Home");
        assert!(status.is_ok());
        assert_eq!(inv.arg("field"), Some("Mensago.0.Label"));
        assert_eq!(inv.arg("value"), Some("Home"));

        let (_, status) = validate(&MyInfoCommand, "myinfo del Shoesize");
        assert_eq!(status.info(), "Invalid field specifier Shoesize");
    }

    #[test]
    fn test_preregister_validation() {
        assert!(validate(&PreregisterCommand, "preregister none").1.is_ok());
        assert!(validate(&PreregisterCommand, "preregister catlover example.com").1.is_ok());
        assert_eq!(
            validate(&PreregisterCommand, "preregister").1.kind(),
            Some(ErrorKind::BadData)
        );
        assert_eq!(
            validate(&PreregisterCommand, "preregister \"bad id\"").1.info(),
            "Bad user ID/workspace ID"
        );
        assert_eq!(
            validate(&PreregisterCommand, "preregister none bad_domain!").1.info(),
            "Bad domain"
        );
    }

    #[test]
    fn test_register_validation() {
        assert_eq!(
            validate(&RegisterCommand, "register").1.kind(),
            Some(ErrorKind::BadData)
        );
        assert_eq!(
            validate(&RegisterCommand, "register example.com password=abc").1.info(),
            too_weak_message()
        );
        assert_eq!(
            validate(&RegisterCommand, "register example.com \"userid=a b\"").1.info(),
            "The user ID given is not valid"
        );
        assert!(
            validate(&RegisterCommand, "register example.com password=CorrectHorse9!")
                .1
                .is_ok()
        );
    }

    #[test]
    fn test_regcode_validation_moves_password_to_args() {
        let (inv, status) = validate(&RegCodeCommand, "regcode catlover/example.com CODE secret");
        assert!(status.is_ok());
        assert_eq!(inv.arg("password"), Some("secret"));

        let (_, status) = validate(&RegCodeCommand, "regcode nodomain CODE");
        assert_eq!(status.info(), "Invalid address");
    }

    #[test]
    fn test_login_validation() {
        assert!(validate(&LoginCommand, "login").1.is_ok());
        assert!(validate(&LoginCommand, "login catlover/example.com").1.is_ok());
        assert_eq!(
            validate(&LoginCommand, "login bogus").1.kind(),
            Some(ErrorKind::BadValue)
        );
    }
}
