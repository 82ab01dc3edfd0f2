//! Identifier and address value types.
//!
//! All types validate on construction and normalize to lower case, so a
//! value that exists is a value that is well formed.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::identity::MAX_USER_ID_LEN;

static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)*$")
        .expect("domain pattern compiles")
});

static USER_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_.\-]+$").expect("user id pattern compiles"));

static WORKSPACE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("workspace id pattern compiles")
});

/// Why an identifier was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("'{0}' isn't a valid domain")]
    Domain(String),
    #[error("'{0}' isn't a valid user ID")]
    UserId(String),
    #[error("'{0}' isn't a valid workspace ID")]
    WorkspaceId(String),
    #[error("'{0}' isn't a valid address")]
    Address(String),
}

// =============================================================================
// Domain
// =============================================================================

/// A server domain such as `example.com`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Domain(String);

impl Domain {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Domain {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        if normalized.len() > 253 || !DOMAIN_RE.is_match(&normalized) {
            return Err(AddressError::Domain(s.to_string()));
        }
        Ok(Self(normalized))
    }
}

// =============================================================================
// User ID
// =============================================================================

/// A human-friendly account name such as `catlover`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for UserId {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if normalized.chars().count() > MAX_USER_ID_LEN || !USER_ID_RE.is_match(&normalized) {
            return Err(AddressError::UserId(s.to_string()));
        }
        Ok(Self(normalized))
    }
}

// =============================================================================
// Workspace ID
// =============================================================================

/// A UUID-shaped workspace identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkspaceId(String);

impl WorkspaceId {
    /// Generate a random (version 4 layout) workspace ID.
    pub fn generate(rng: &mut impl Rng) -> Self {
        let mut bytes = [0u8; 16];
        rng.fill(&mut bytes);
        bytes[6] = (bytes[6] & 0x0f) | 0x40;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;
        let hex = hex::encode(bytes);
        Self(format!(
            "{}-{}-{}-{}-{}",
            &hex[..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for WorkspaceId {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        if !WORKSPACE_ID_RE.is_match(&normalized) {
            return Err(AddressError::WorkspaceId(s.to_string()));
        }
        Ok(Self(normalized))
    }
}

// =============================================================================
// Address
// =============================================================================

/// The identity half of an address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressId {
    Workspace(WorkspaceId),
    User(UserId),
}

impl AddressId {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Workspace(wid) => wid.as_str(),
            Self::User(uid) => uid.as_str(),
        }
    }
}

/// A full address: `catlover/example.com` or `<workspace id>/example.com`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MAddress {
    pub id: AddressId,
    pub domain: Domain,
}

impl MAddress {
    pub fn new(id: AddressId, domain: Domain) -> Self {
        Self { id, domain }
    }
}

impl FromStr for MAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AddressError::Address(s.to_string());
        let (id, domain) = s.trim().split_once('/').ok_or_else(invalid)?;
        let domain = domain.parse::<Domain>().map_err(|_| invalid())?;
        let id = match id.parse::<WorkspaceId>() {
            Ok(wid) => AddressId::Workspace(wid),
            Err(_) => AddressId::User(id.parse::<UserId>().map_err(|_| invalid())?),
        };
        Ok(Self { id, domain })
    }
}

// =============================================================================
// Shared trait impls
// =============================================================================

macro_rules! string_newtype {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = AddressError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }
    };
}

string_newtype!(Domain);
string_newtype!(UserId);
string_newtype!(WorkspaceId);

impl fmt::Display for AddressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for MAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.id, self.domain)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain() {
        assert_eq!("Example.COM".parse::<Domain>().unwrap().as_str(), "example.com");
        assert!("localhost".parse::<Domain>().is_ok());
        assert!("sub-domain.example.org".parse::<Domain>().is_ok());
        assert!("".parse::<Domain>().is_err());
        assert!("-bad.com".parse::<Domain>().is_err());
        assert!("bad..com".parse::<Domain>().is_err());
        assert!("has space.com".parse::<Domain>().is_err());
    }

    #[test]
    fn test_user_id() {
        assert_eq!("CatLover".parse::<UserId>().unwrap().as_str(), "catlover");
        assert!("john.q_public-2".parse::<UserId>().is_ok());
        assert!("has space".parse::<UserId>().is_err());
        assert!("slash/y".parse::<UserId>().is_err());
        assert!("a".repeat(65).parse::<UserId>().is_err());
        assert!("".parse::<UserId>().is_err());
    }

    #[test]
    fn test_workspace_id() {
        let wid: WorkspaceId = "557207FD-0A0A-45BB-A402-C38461251F8F".parse().unwrap();
        assert_eq!(wid.as_str(), "557207fd-0a0a-45bb-a402-c38461251f8f");
        assert!("557207fd-0a0a-45bb-a402".parse::<WorkspaceId>().is_err());
    }

    #[test]
    fn test_generated_workspace_id_is_valid() {
        let mut rng = rand::thread_rng();
        let wid = WorkspaceId::generate(&mut rng);
        assert!(wid.as_str().parse::<WorkspaceId>().is_ok());
        assert_eq!(&wid.as_str()[14..15], "4");
    }

    #[test]
    fn test_address() {
        let addr: MAddress = "CatLover/example.com".parse().unwrap();
        assert!(matches!(addr.id, AddressId::User(ref u) if u.as_str() == "catlover"));
        assert_eq!(addr.to_string(), "catlover/example.com");

        let addr: MAddress = "f009338a-ea14-4d59-aa48-016829835cd7/example.com"
            .parse()
            .unwrap();
        assert!(matches!(addr.id, AddressId::Workspace(_)));

        assert!("nodomain".parse::<MAddress>().is_err());
        assert!("bad user/example.com".parse::<MAddress>().is_err());
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let json = serde_json::to_string(&"example.com".parse::<Domain>().unwrap()).unwrap();
        assert_eq!(json, "\"example.com\"");
        assert!(serde_json::from_str::<Domain>("\"not a domain\"").is_err());
    }
}
