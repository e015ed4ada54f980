//! # fellowship-types: Core identifier types for `Fellowship`
//!
//! Shared by every crate in the workspace:
//! - Subject identity ([`SubjectId`], [`Email`])
//! - Resource ownership ([`OwnerId`])
//!
//! Identifiers arrive from the identity provider and the record store as
//! either JSON strings or JSON numbers. Both shapes deserialize into the
//! same types and compare by their canonical string form.

use std::fmt::{self, Display};

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Subject identity
// ============================================================================

/// Stable identifier of an authenticated subject.
///
/// Stored in canonical string form. Numeric ids from the record store are
/// converted with their decimal representation, so `42` and `"42"` are the
/// same subject.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubjectId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SubjectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for SubjectId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for SubjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawId::deserialize(deserializer)?;
        Ok(Self(raw.into_canonical()))
    }
}

/// Email address as reported by the identity provider.
///
/// No validation is applied; the identity provider owns that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Resource ownership
// ============================================================================

/// Identifier of the subject that owns a resource (profile, household, ...).
///
/// Keeps the shape it arrived in so the "unset" check can follow the record
/// store's conventions: an empty string and the number `0` both count as
/// unset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OwnerId {
    Number(i64),
    Text(String),
}

impl OwnerId {
    /// Returns true when the id carries no owner (`""` or `0`).
    ///
    /// `0` is treated as unset even though a numeric store could assign it.
    pub fn is_unset(&self) -> bool {
        match self {
            OwnerId::Number(n) => *n == 0,
            OwnerId::Text(s) => s.is_empty(),
        }
    }

    /// Compares against a subject id by canonical string form.
    pub fn is_owned_by(&self, subject: &SubjectId) -> bool {
        match self {
            OwnerId::Number(n) => subject.as_str() == n.to_string(),
            OwnerId::Text(s) => subject.as_str() == s,
        }
    }
}

impl Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerId::Number(n) => write!(f, "{n}"),
            OwnerId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for OwnerId {
    fn from(value: &str) -> Self {
        OwnerId::Text(value.to_string())
    }
}

impl From<String> for OwnerId {
    fn from(value: String) -> Self {
        OwnerId::Text(value)
    }
}

impl From<i64> for OwnerId {
    fn from(value: i64) -> Self {
        OwnerId::Number(value)
    }
}

impl From<&SubjectId> for OwnerId {
    fn from(value: &SubjectId) -> Self {
        OwnerId::Text(value.as_str().to_string())
    }
}

// ============================================================================
// Wire helpers
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Unsigned(u64),
    Signed(i64),
    Text(String),
}

impl RawId {
    fn into_canonical(self) -> String {
        match self {
            RawId::Unsigned(n) => n.to_string(),
            RawId::Signed(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}
