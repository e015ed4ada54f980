//! Role definitions for RBAC.
//!
//! Defines 10 roles ranked by authority. A lower rank means more authority:
//! `Admin` is rank 0, `Viewer` is rank 9. The ranking is fixed at compile
//! time and checked for uniqueness by a `const` assertion, so two roles can
//! never tie.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Error type for role parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleError {
    /// The name is not part of the closed role set.
    #[error("Unknown role: {0:?}")]
    UnknownRole(String),
}

/// Role in the portal.
///
/// Variants are declared in authority order, so the derived `Ord` agrees
/// with [`Role::rank`]: `Admin < Pastor < ... < Viewer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full control of the portal and the content system.
    Admin,
    /// Pastoral staff.
    Pastor,
    /// Ministry leaders.
    Leader,
    /// Pathways course instructors.
    Instructor,
    /// Pathways mentors.
    Mentor,
    /// Church office staff.
    Staff,
    Volunteer,
    Member,
    /// Enrolled Pathways student.
    Student,
    /// Signed-in visitor with no other assignment.
    Viewer,
}

impl Role {
    /// Every role, highest authority first.
    pub const ALL: [Role; 10] = [
        Role::Admin,
        Role::Pastor,
        Role::Leader,
        Role::Instructor,
        Role::Mentor,
        Role::Staff,
        Role::Volunteer,
        Role::Member,
        Role::Student,
        Role::Viewer,
    ];

    /// Returns the authority rank (0 = highest authority).
    pub const fn rank(self) -> u8 {
        match self {
            Role::Admin => 0,
            Role::Pastor => 1,
            Role::Leader => 2,
            Role::Instructor => 3,
            Role::Mentor => 4,
            Role::Staff => 5,
            Role::Volunteer => 6,
            Role::Member => 7,
            Role::Student => 8,
            Role::Viewer => 9,
        }
    }

    /// Returns the wire name of this role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Pastor => "pastor",
            Role::Leader => "leader",
            Role::Instructor => "instructor",
            Role::Mentor => "mentor",
            Role::Staff => "staff",
            Role::Volunteer => "volunteer",
            Role::Member => "member",
            Role::Student => "student",
            Role::Viewer => "viewer",
        }
    }

    /// Returns whether this role carries at least the authority of `minimum`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fellowship_rbac::roles::Role;
    ///
    /// assert!(Role::Admin.is_at_least(Role::Staff));
    /// assert!(Role::Staff.is_at_least(Role::Staff));
    /// assert!(!Role::Viewer.is_at_least(Role::Staff));
    /// ```
    pub const fn is_at_least(self, minimum: Role) -> bool {
        self.rank() <= minimum.rank()
    }
}

const fn ranking_is_injective() -> bool {
    let mut i = 0;
    while i < Role::ALL.len() {
        let mut j = i + 1;
        while j < Role::ALL.len() {
            if Role::ALL[i].rank() == Role::ALL[j].rank() {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

// A new role without a unique rank fails the build.
const _: () = assert!(ranking_is_injective());

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| RoleError::UnknownRole(s.to_string()))
    }
}

/// Returns the role with the lowest rank, or `None` for no roles.
pub fn highest_role<I>(roles: I) -> Option<Role>
where
    I: IntoIterator<Item = Role>,
{
    roles.into_iter().min_by_key(|role| role.rank())
}

/// Returns true iff ANY role in `candidates` has at least `minimum`'s authority.
///
/// This is OR-across-roles: `{viewer, admin}` satisfies `staff` through
/// `admin` even though `viewer` alone would not.
pub fn at_least<I>(candidates: I, minimum: Role) -> bool
where
    I: IntoIterator<Item = Role>,
{
    candidates.into_iter().any(|role| role.is_at_least(minimum))
}

/// Set of roles held by a subject.
///
/// Order-insensitive and duplicate-free; iteration yields roles highest
/// authority first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet {
    roles: BTreeSet<Role>,
}

impl RoleSet {
    /// Creates an empty role set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses role names, failing on the first name outside the closed set.
    pub fn parse_strict<I, S>(names: I) -> Result<Self, RoleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| name.as_ref().parse::<Role>())
            .collect()
    }

    /// Parses role names, dropping (and logging) names outside the closed set.
    ///
    /// Used at the identity boundary where the record store may hold stale
    /// or misspelled role strings.
    pub fn parse_lenient<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| match name.as_ref().parse::<Role>() {
                Ok(role) => Some(role),
                Err(err) => {
                    warn!(error = %err, "Dropping unrecognized role");
                    None
                }
            })
            .collect()
    }

    /// Adds a role. Adding a role twice is a no-op.
    pub fn insert(&mut self, role: Role) {
        self.roles.insert(role);
    }

    pub fn contains(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns true when the set holds any of `roles` exactly (no hierarchy).
    pub fn contains_any(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.roles.contains(role))
    }

    /// Returns the highest-authority role, or `None` when empty.
    pub fn highest(&self) -> Option<Role> {
        highest_role(self.iter())
    }

    /// Hierarchy check across all roles in the set.
    pub fn at_least(&self, minimum: Role) -> bool {
        at_least(self.iter(), minimum)
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Iterates roles highest authority first.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.iter().copied()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        Self {
            roles: iter.into_iter().collect(),
        }
    }
}

impl From<Role> for RoleSet {
    fn from(role: Role) -> Self {
        std::iter::once(role).collect()
    }
}

impl<const N: usize> From<[Role; N]> for RoleSet {
    fn from(roles: [Role; N]) -> Self {
        roles.into_iter().collect()
    }
}
