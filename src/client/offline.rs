//! In-process client.
//!
//! Holds profiles, their contact fields, and a simulated server account
//! table. When opened on a directory the whole state is written to
//! `state.json` after every change.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use super::Client;
use crate::config::STATE_FILE;
use crate::config::identity::{PRIMARY_PROFILE, REGCODE_LEN, SELF_GROUP};
use crate::core::password::normalize;
use crate::core::{ErrorKind, ShellError, Status};
use crate::models::{AddressId, ContactField, Domain, MAddress, Profile, UserId, WorkspaceId};

/// Characters a profile name may not contain.
const FORBIDDEN_PROFILE_CHARS: &[char] = &['<', '>', ':', '"', '\'', '/', '\\', '|', '?', '*'];

// =============================================================================
// Persisted State
// =============================================================================

/// A workspace on the simulated server.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct Account {
    wid: WorkspaceId,
    uid: Option<UserId>,
    domain: Domain,
    /// Salted hash; `None` until a preregistration is redeemed.
    password_hash: Option<String>,
    salt: String,
    regcode: Option<String>,
}

impl Account {
    fn matches(&self, address: &MAddress) -> bool {
        if self.domain != address.domain {
            return false;
        }
        match &address.id {
            AddressId::Workspace(wid) => &self.wid == wid,
            AddressId::User(uid) => self.uid.as_ref() == Some(uid),
        }
    }

    fn address(&self) -> MAddress {
        MAddress::new(AddressId::Workspace(self.wid.clone()), self.domain.clone())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OfflineState {
    active: String,
    default: String,
    profiles: BTreeMap<String, Profile>,
    #[serde(default)]
    accounts: Vec<Account>,
}

impl Default for OfflineState {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(PRIMARY_PROFILE.to_string(), Profile::new(PRIMARY_PROFILE));
        Self {
            active: PRIMARY_PROFILE.to_string(),
            default: PRIMARY_PROFILE.to_string(),
            profiles,
            accounts: Vec::new(),
        }
    }
}

// =============================================================================
// Offline Client
// =============================================================================

/// A [`Client`] that needs no network.
#[derive(Debug, Default)]
pub struct OfflineClient {
    state: OfflineState,
    path: Option<PathBuf>,
    default_domain: Option<Domain>,
    connection: Option<Domain>,
    session: Option<MAddress>,
}

impl OfflineClient {
    /// A client whose state lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load state from `dir`, creating the directory on first use.
    pub fn open(dir: &Path) -> Result<Self, ShellError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(STATE_FILE);

        let mut state = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str::<OfflineState>(&text).map_err(|err| {
                ShellError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => OfflineState::default(),
            Err(err) => return Err(err.into()),
        };
        // Start in the default profile, as on every launch
        if state.profiles.contains_key(&state.default) {
            state.active = state.default.clone();
        }

        info!(path = %path.display(), profiles = state.profiles.len(), "loaded client state");
        Ok(Self {
            state,
            path: Some(path),
            ..Self::default()
        })
    }

    /// Domain used by `preregister` when none is given.
    pub fn with_default_domain(mut self, domain: Option<Domain>) -> Self {
        self.default_domain = domain;
        self
    }

    /// The profile loaded on startup.
    pub fn default_profile(&self) -> &str {
        &self.state.default
    }

    fn save(&self) -> Status {
        let Some(path) = &self.path else {
            return Status::ok();
        };
        let text = match serde_json::to_string_pretty(&self.state) {
            Ok(text) => text,
            Err(err) => return Status::error(ErrorKind::BadData, err.to_string()),
        };
        match fs::write(path, text) {
            Ok(()) => Status::ok(),
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to save client state");
                Status::error(ErrorKind::FilesystemError, err.to_string())
            }
        }
    }

    fn active_mut(&mut self) -> Result<&mut Profile, Status> {
        let active = self.state.active.clone();
        self.state
            .profiles
            .get_mut(&active)
            .ok_or_else(|| Status::error(ErrorKind::NotFound, "No active profile"))
    }

    fn require_connection(&self) -> Result<(), Status> {
        if self.connection.is_none() {
            return Err(Status::error(ErrorKind::NotConnected, "Not connected to a server"));
        }
        Ok(())
    }

    fn uid_taken(&self, uid: &UserId, domain: &Domain) -> bool {
        self.state
            .accounts
            .iter()
            .any(|a| &a.domain == domain && a.uid.as_ref() == Some(uid))
    }

    /// Attach a workspace identity to the active profile.
    fn assign_identity(&mut self, account: &Account) -> Status {
        let profile = match self.active_mut() {
            Ok(profile) => profile,
            Err(status) => return status,
        };
        if profile.has_identity() {
            return Status::error(
                ErrorKind::Exists,
                "An identity has already been assigned to this profile.",
            );
        }

        profile.wid = Some(account.wid.clone());
        profile.uid = account.uid.clone();
        profile.domain = Some(account.domain.clone());

        let mut fields = vec![
            ("Mensago.0.Workspace", account.wid.to_string()),
            ("Mensago.0.Domain", account.domain.to_string()),
        ];
        if let Some(uid) = &account.uid {
            fields.push(("Mensago.0.UserID", uid.to_string()));
        }
        for (key, value) in fields {
            profile.fields.insert(
                key.to_string(),
                ContactField {
                    value,
                    group: SELF_GROUP.to_string(),
                },
            );
        }
        Status::ok()
    }

    fn validate_profile_name(name: &str) -> Result<String, Status> {
        let name = name.to_lowercase();
        if name.is_empty()
            || name.chars().any(char::is_whitespace)
            || name.contains(FORBIDDEN_PROFILE_CHARS)
        {
            return Err(Status::error(
                ErrorKind::BadValue,
                format!("'{name}' isn't a valid profile name"),
            ));
        }
        Ok(name)
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(normalize(password).as_bytes());
    hex::encode(hasher.finalize())
}

fn new_salt(rng: &mut impl Rng) -> String {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    hex::encode(bytes)
}

fn new_regcode(rng: &mut impl Rng) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(REGCODE_LEN)
        .map(char::from)
        .collect()
}

impl Client for OfflineClient {
    fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn connect(&mut self, domain: &Domain) -> Status {
        debug!(%domain, "connecting");
        self.connection = Some(domain.clone());
        Status::ok()
    }

    fn disconnect(&mut self) {
        self.session = None;
        self.connection = None;
    }

    fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    fn login(&mut self, address: &MAddress) -> Status {
        if let Err(status) = self.require_connection() {
            return status;
        }
        let Some(account) = self.state.accounts.iter().find(|a| a.matches(address)) else {
            return Status::error(ErrorKind::NotFound, format!("No workspace for {address}"));
        };
        if account.password_hash.is_none() {
            return Status::error(
                ErrorKind::Unauthorized,
                "Registration has not been completed for this workspace",
            );
        }

        let session = account.address();
        info!(address = %session, "logged in");
        self.session = Some(session);
        Status::info_text(format!("Logged in as {address}"))
    }

    fn logout(&mut self) -> Status {
        if let Some(session) = self.session.take() {
            info!(address = %session, "logged out");
        }
        Status::ok()
    }

    fn preregister(&mut self, uid: Option<&UserId>, domain: Option<&Domain>) -> Status {
        let Some(domain) = domain.or(self.default_domain.as_ref()).cloned() else {
            return Status::error(
                ErrorKind::EmptyData,
                "No domain given and no default domain is configured",
            );
        };
        if let Some(uid) = uid
            && self.uid_taken(uid, &domain)
        {
            return Status::error(ErrorKind::Exists, format!("{uid}/{domain} already exists"));
        }

        let mut rng = rand::thread_rng();
        let account = Account {
            wid: WorkspaceId::generate(&mut rng),
            uid: uid.cloned(),
            domain,
            password_hash: None,
            salt: new_salt(&mut rng),
            regcode: Some(new_regcode(&mut rng)),
        };

        let mut status = Status::ok()
            .with_value("wid", account.wid.to_string())
            .with_value("regcode", account.regcode.clone().unwrap_or_default())
            .with_value("domain", account.domain.to_string());
        if let Some(uid) = &account.uid {
            status.set_value("uid", uid.to_string());
        }

        self.state.accounts.push(account);
        let saved = self.save();
        if saved.is_err() {
            return saved;
        }
        status
    }

    fn register(&mut self, domain: &Domain, password: &str, uid: Option<&UserId>) -> Status {
        if let Some(uid) = uid
            && self.uid_taken(uid, domain)
        {
            return Status::error(ErrorKind::Exists, format!("{uid}/{domain} already exists"));
        }
        match self.active_profile() {
            Ok(profile) if profile.has_identity() => {
                return Status::error(
                    ErrorKind::Exists,
                    "An identity has already been assigned to this profile.",
                );
            }
            Ok(_) => {}
            Err(status) => return status,
        }

        let mut rng = rand::thread_rng();
        let salt = new_salt(&mut rng);
        let account = Account {
            wid: WorkspaceId::generate(&mut rng),
            uid: uid.cloned(),
            domain: domain.clone(),
            password_hash: Some(hash_password(&salt, password)),
            salt,
            regcode: None,
        };

        let assigned = self.assign_identity(&account);
        if assigned.is_err() {
            return assigned;
        }
        let wid = account.wid.to_string();
        self.state.accounts.push(account);
        self.connection = Some(domain.clone());

        let saved = self.save();
        if saved.is_err() {
            return saved;
        }
        Status::ok().with_value("wid", wid)
    }

    fn redeem_regcode(&mut self, address: &MAddress, regcode: &str, password: &str) -> Status {
        if let Err(status) = self.require_connection() {
            return status;
        }
        let Some(index) = self.state.accounts.iter().position(|a| a.matches(address)) else {
            return Status::error(ErrorKind::NotFound, format!("No workspace for {address}"));
        };
        if self.state.accounts[index].regcode.as_deref() != Some(regcode) {
            return Status::error(ErrorKind::Unauthorized, "Bad registration code");
        }

        let account = self.state.accounts[index].clone();
        let assigned = self.assign_identity(&account);
        if assigned.is_err() {
            return assigned;
        }

        let account = &mut self.state.accounts[index];
        account.password_hash = Some(hash_password(&account.salt, password));
        account.regcode = None;
        let wid = account.wid.to_string();

        let saved = self.save();
        if saved.is_err() {
            return saved;
        }
        Status::ok().with_value("wid", wid)
    }

    fn active_profile(&self) -> Result<&Profile, Status> {
        self.state
            .profiles
            .get(&self.state.active)
            .ok_or_else(|| Status::error(ErrorKind::NotFound, "No active profile"))
    }

    fn profiles(&self) -> Vec<String> {
        self.state.profiles.keys().cloned().collect()
    }

    fn create_profile(&mut self, name: &str) -> Status {
        let name = match Self::validate_profile_name(name) {
            Ok(name) => name,
            Err(status) => return status,
        };
        if self.state.profiles.contains_key(&name) {
            return Status::error(ErrorKind::Exists, format!("profile '{name}' already exists"));
        }
        self.state.profiles.insert(name.clone(), Profile::new(name));
        self.save()
    }

    fn delete_profile(&mut self, name: &str) -> Status {
        let name = name.to_lowercase();
        if !self.state.profiles.contains_key(&name) {
            return Status::error(ErrorKind::NotFound, format!("profile '{name}' doesn't exist"));
        }
        if name == self.state.active {
            return Status::error(ErrorKind::BadValue, "The active profile can't be deleted");
        }
        self.state.profiles.remove(&name);
        if name == self.state.default {
            self.state.default = self.state.active.clone();
        }
        self.save()
    }

    fn rename_profile(&mut self, old: &str, new: &str) -> Status {
        let old = old.to_lowercase();
        let new = match Self::validate_profile_name(new) {
            Ok(name) => name,
            Err(status) => return status,
        };
        if self.state.profiles.contains_key(&new) {
            return Status::error(ErrorKind::Exists, format!("profile '{new}' already exists"));
        }
        let Some(mut profile) = self.state.profiles.remove(&old) else {
            return Status::error(ErrorKind::NotFound, format!("profile '{old}' doesn't exist"));
        };

        profile.name = new.clone();
        self.state.profiles.insert(new.clone(), profile);
        if self.state.active == old {
            self.state.active = new.clone();
        }
        if self.state.default == old {
            self.state.default = new;
        }
        self.save()
    }

    fn activate_profile(&mut self, name: &str) -> Status {
        let name = name.to_lowercase();
        if !self.state.profiles.contains_key(&name) {
            return Status::error(ErrorKind::NotFound, format!("profile '{name}' doesn't exist"));
        }
        if name != self.state.active {
            self.disconnect();
            self.state.active = name;
        }
        self.save()
    }

    fn set_default_profile(&mut self, name: &str) -> Status {
        let name = name.to_lowercase();
        if !self.state.profiles.contains_key(&name) {
            return Status::error(ErrorKind::NotFound, format!("profile '{name}' doesn't exist"));
        }
        self.state.default = name;
        self.save()
    }

    fn load_field(&self, field: &str) -> Status {
        let profile = match self.active_profile() {
            Ok(profile) => profile,
            Err(status) => return status,
        };

        if field == "*" {
            let mut names = Vec::new();
            let mut values = Vec::new();
            let mut groups = Vec::new();
            let mut lines = Vec::new();
            for (name, entry) in &profile.fields {
                lines.push(format!("{name}: {}", entry.value));
                names.push(Value::from(name.as_str()));
                values.push(Value::from(entry.value.as_str()));
                groups.push(Value::from(entry.group.as_str()));
            }
            return Status::info_text(lines.join("\n"))
                .with_value("name", names)
                .with_value("value", values)
                .with_value("group", groups);
        }

        match profile.fields.get(field) {
            Some(entry) => Status::info_text(format!("{field}: {}", entry.value))
                .with_value("name", field)
                .with_value("value", entry.value.as_str())
                .with_value("group", entry.group.as_str()),
            None => Status::error(ErrorKind::NotFound, format!("{field} is not set")),
        }
    }

    fn save_field(&mut self, field: &str, value: &str, group: &str) -> Status {
        let profile = match self.active_mut() {
            Ok(profile) => profile,
            Err(status) => return status,
        };
        profile.fields.insert(
            field.to_string(),
            ContactField {
                value: value.to_string(),
                group: group.to_string(),
            },
        );
        self.save()
    }

    fn delete_field(&mut self, field: &str) -> Status {
        let profile = match self.active_mut() {
            Ok(profile) => profile,
            Err(status) => return status,
        };
        if profile.fields.remove(field).is_none() {
            return Status::ok();
        }
        self.save()
    }

    fn check_fields(&self) -> Status {
        let profile = match self.active_profile() {
            Ok(profile) => profile,
            Err(status) => return status,
        };
        let missing = profile.missing_fields();
        if missing.is_empty() {
            return Status::info_text("All required fields are present");
        }
        Status::error(
            ErrorKind::BadData,
            format!("Missing required fields: {}", missing.join(", ")),
        )
        .with_value("missing", missing)
    }
}
