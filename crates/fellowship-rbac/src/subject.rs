//! Authenticated subjects and the record-store boundary.
//!
//! A [`Subject`] is created by the identity/record collaborator and only
//! read here. [`SubjectRecord`] is the raw JSON shape the record store
//! returns; converting it is the single place where untrusted role strings
//! are revalidated against the closed role set.

use fellowship_types::{Email, SubjectId};
use serde::{Deserialize, Serialize};

use crate::roles::{Role, RoleSet};

/// An authenticated portal user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: SubjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub roles: RoleSet,
}

impl Subject {
    /// Creates a subject with the given id and roles.
    pub fn new(id: impl Into<SubjectId>, roles: impl Into<RoleSet>) -> Self {
        Self {
            id: id.into(),
            email: None,
            display_name: None,
            first_name: None,
            last_name: None,
            roles: roles.into(),
        }
    }

    /// Sets the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(Email::new(email));
        self
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets the first name.
    pub fn with_first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    /// Returns the highest-authority role, or `None` when the subject has no roles.
    pub fn highest_role(&self) -> Option<Role> {
        self.roles.highest()
    }

    /// Returns the name shown in the portal chrome.
    ///
    /// Falls back from display name to first name to email, then `"User"`.
    pub fn display_name_or_fallback(&self) -> &str {
        if let Some(name) = self.display_name.as_deref().filter(|n| !n.is_empty()) {
            return name;
        }
        if let Some(name) = self.first_name.as_deref().filter(|n| !n.is_empty()) {
            return name;
        }
        self.email.as_ref().map_or("User", Email::as_str)
    }
}

/// Returns true when the subject holds ANY of `roles` exactly.
///
/// An absent subject holds no roles.
pub fn user_has_role(subject: Option<&Subject>, roles: &[Role]) -> bool {
    subject.is_some_and(|s| s.roles.contains_any(roles))
}

/// Raw user record as returned by the record store.
///
/// Unknown fields are ignored so internal record fields never reach a
/// [`Subject`]. `roles` accepts anything: a missing, null or non-array
/// value yields no roles.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRecord {
    pub id: SubjectId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub roles: serde_json::Value,
}

impl SubjectRecord {
    /// Parses a record from JSON text.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Converts into a [`Subject`], dropping role values outside the closed set.
    ///
    /// Besides id, email, display name and roles, the first and last names
    /// are kept as well; [`Subject::display_name_or_fallback`] reads them.
    pub fn into_subject(self) -> Subject {
        let roles = match &self.roles {
            serde_json::Value::Array(values) => {
                RoleSet::parse_lenient(values.iter().filter_map(serde_json::Value::as_str))
            }
            _ => RoleSet::empty(),
        };

        Subject {
            id: self.id,
            email: self.email.map(Email::new),
            display_name: self.display_name,
            first_name: self.first_name,
            last_name: self.last_name,
            roles,
        }
    }
}

impl From<SubjectRecord> for Subject {
    fn from(record: SubjectRecord) -> Self {
        record.into_subject()
    }
}
