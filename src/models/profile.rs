//! Profile and contact-information records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::address::{AddressId, Domain, MAddress, UserId, WorkspaceId};

/// Contact fields that hold one value.
const SINGLE_FIELDS: &[&str] = &[
    "FormattedName",
    "GivenName",
    "FamilyName",
    "Prefix",
    "Gender",
    "Bio",
    "Anniversary",
    "Birthday",
    "Title",
    "Photo",
    "Notes",
];

/// Contact fields that hold an indexed list (`Name.<index>[.<sub>]`).
const LIST_FIELDS: &[&str] = &[
    "Nicknames",
    "AdditionalNames",
    "Suffixes",
    "Social",
    "Mensago",
    "MailingAddresses",
    "Phone",
    "Email",
    "Organization",
    "Categories",
    "Websites",
    "Languages",
    "Attachments",
    "Custom",
];

/// Sub-fields each `Mensago.<index>` entry must carry.
pub const REQUIRED_MENSAGO_FIELDS: &[&str] = &["Workspace", "Domain", "Label"];

/// Sub-field names given canonical case when they appear.
const KNOWN_SUBFIELDS: &[&str] = &["Workspace", "Domain", "Label", "UserID"];

/// Normalize a contact field specifier, or `None` if it is not one.
///
/// Field names match case-insensitively and come back in canonical case.
/// `Annotations.` may prefix any field.
pub fn normalize_field(spec: &str) -> Option<String> {
    let (prefix, rest) = match spec.split_once('.') {
        Some((head, tail)) if head.eq_ignore_ascii_case("annotations") => ("Annotations.", tail),
        _ => ("", spec),
    };

    let mut parts = rest.split('.');
    let head = parts.next()?;
    let tail: Vec<&str> = parts.collect();

    if let Some(name) = SINGLE_FIELDS.iter().find(|f| f.eq_ignore_ascii_case(head)) {
        return tail.is_empty().then(|| format!("{prefix}{name}"));
    }

    let name = LIST_FIELDS.iter().find(|f| f.eq_ignore_ascii_case(head))?;
    let (index, subs) = tail.split_first()?;
    if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if subs.iter().any(|s| s.is_empty()) {
        return None;
    }

    let mut out = format!("{prefix}{name}.{index}");
    for sub in subs {
        out.push('.');
        match KNOWN_SUBFIELDS.iter().find(|k| k.eq_ignore_ascii_case(sub)) {
            Some(known) => out.push_str(known),
            None => out.push_str(sub),
        }
    }
    Some(out)
}

/// One stored contact value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactField {
    pub value: String,
    pub group: String,
}

/// A local profile: an identity slot plus its contact information.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub wid: Option<WorkspaceId>,
    #[serde(default)]
    pub uid: Option<UserId>,
    #[serde(default)]
    pub domain: Option<Domain>,
    #[serde(default)]
    pub fields: BTreeMap<String, ContactField>,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether a workspace has been assigned to this profile.
    pub fn has_identity(&self) -> bool {
        self.wid.is_some()
    }

    /// The workspace address for this profile, if it has an identity.
    pub fn address(&self) -> Option<MAddress> {
        let wid = self.wid.clone()?;
        let domain = self.domain.clone()?;
        Some(MAddress::new(AddressId::Workspace(wid), domain))
    }

    /// Human-readable identity, preferring the user ID.
    pub fn identity_string(&self) -> String {
        match (&self.uid, &self.wid, &self.domain) {
            (Some(uid), _, Some(domain)) => format!("{uid}/{domain}"),
            (None, Some(wid), Some(domain)) => format!("{wid}/{domain}"),
            _ => "no identity".to_string(),
        }
    }

    /// Required contact fields that are not set.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut indices: Vec<&str> = self
            .fields
            .keys()
            .filter_map(|key| key.strip_prefix("Mensago."))
            .filter_map(|rest| rest.split('.').next())
            .collect();
        indices.dedup();
        if indices.is_empty() {
            indices.push("0");
        }

        let mut missing = Vec::new();
        for index in indices {
            for sub in REQUIRED_MENSAGO_FIELDS {
                let key = format!("Mensago.{index}.{sub}");
                if !self.fields.contains_key(&key) {
                    missing.push(key);
                }
            }
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_single_field() {
        assert_eq!(normalize_field("givenname").as_deref(), Some("GivenName"));
        assert_eq!(normalize_field("GivenName").as_deref(), Some("GivenName"));
        assert_eq!(normalize_field("GivenName.0"), None);
    }

    #[test]
    fn test_normalize_list_field() {
        assert_eq!(
            normalize_field("mensago.0.workspace").as_deref(),
            Some("Mensago.0.Workspace")
        );
        assert_eq!(normalize_field("Email.2").as_deref(), Some("Email.2"));
        assert_eq!(normalize_field("Email"), None);
        assert_eq!(normalize_field("Email.x"), None);
        assert_eq!(normalize_field("Email.1."), None);
    }

    #[test]
    fn test_normalize_annotations() {
        assert_eq!(
            normalize_field("Annotations.Nicknames.0").as_deref(),
            Some("Annotations.Nicknames.0")
        );
        assert_eq!(normalize_field("Annotations.Bogus"), None);
    }

    #[test]
    fn test_unknown_field() {
        assert_eq!(normalize_field("Shoesize"), None);
        assert_eq!(normalize_field(""), None);
    }

    #[test]
    fn test_missing_fields() {
        let mut profile = Profile::new("primary");
        assert_eq!(profile.missing_fields().len(), 3);

        for (key, value) in [
            ("Mensago.0.Workspace", "wid"),
            ("Mensago.0.Domain", "example.com"),
            ("Mensago.1.Workspace", "wid2"),
            ("Mensago.1.Domain", "example.com"),
        ] {
            profile.fields.insert(
                key.to_string(),
                ContactField {
                    value: value.to_string(),
                    group: "self".to_string(),
                },
            );
        }
        assert_eq!(
            profile.missing_fields(),
            vec!["Mensago.0.Label", "Mensago.1.Label"]
        );
    }
}
