//! Profile field policies.
//!
//! Decides which profile fields a subject may edit. Staff and admins edit
//! everything; everyone else is limited to the fields the policy allows.

use serde::{Deserialize, Serialize};

use crate::roles::{Role, RoleSet};

pub use fellowship_config::MEMBER_EDITABLE_FIELDS;

/// Allow or deny rule for a profile field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFilter {
    /// Field name pattern (supports wildcards).
    ///
    /// Examples:
    /// - `"bio"` - Exact field name
    /// - `"contact*"` - All fields starting with "contact"
    /// - `"*Interests"` - All fields ending with "Interests"
    /// - `"*"` - Every field
    pub pattern: String,

    /// Whether this is an allow or deny rule.
    pub allow: bool,
}

impl FieldFilter {
    /// Creates a new field filter.
    pub fn new(pattern: impl Into<String>, allow: bool) -> Self {
        Self {
            pattern: pattern.into(),
            allow,
        }
    }

    /// Returns whether this filter matches the given field name.
    pub fn matches(&self, field: &str) -> bool {
        let pattern = self.pattern.as_str();

        if pattern == "*" {
            return true;
        }

        if let Some(prefix) = pattern.strip_suffix('*') {
            return field.starts_with(prefix);
        }

        if let Some(suffix) = pattern.strip_prefix('*') {
            return field.ends_with(suffix);
        }

        field == pattern
    }
}

/// Field-level edit policy for non-staff subjects.
///
/// **Evaluation Order:**
/// 1. Deny rules are evaluated first
/// 2. If any deny rule matches, editing is denied
/// 3. Allow rules are evaluated next
/// 4. If no allow rule matches, editing is denied
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPolicy {
    pub filters: Vec<FieldFilter>,
}

impl FieldPolicy {
    /// Creates an empty policy (denies every field).
    pub fn new() -> Self {
        Self::default()
    }

    /// The portal's standard member-editable field list.
    pub fn member_editable() -> Self {
        Self::allowing(MEMBER_EDITABLE_FIELDS)
    }

    /// Creates a policy that allows exactly the given patterns.
    pub fn allowing<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        patterns
            .into_iter()
            .fold(Self::new(), |policy, p| policy.allow_field(p.as_ref()))
    }

    /// Adds an allow rule.
    pub fn allow_field(mut self, pattern: impl Into<String>) -> Self {
        self.filters.push(FieldFilter::new(pattern, true));
        self
    }

    /// Adds a deny rule.
    pub fn deny_field(mut self, pattern: impl Into<String>) -> Self {
        self.filters.push(FieldFilter::new(pattern, false));
        self
    }

    /// Returns whether a non-staff subject may edit the field.
    pub fn allows_field(&self, field: &str) -> bool {
        if self.filters.iter().any(|f| !f.allow && f.matches(field)) {
            return false;
        }
        self.filters.iter().any(|f| f.allow && f.matches(field))
    }
}

/// Roles that may edit any profile field.
///
/// Exact membership, not hierarchy: a pastor without `staff` is limited to
/// the member-editable fields.
pub const FULL_EDIT_ROLES: [Role; 2] = [Role::Admin, Role::Staff];

/// Returns whether a subject with `roles` may edit `field` under `policy`.
pub fn can_edit_field(field: &str, roles: &RoleSet, policy: &FieldPolicy) -> bool {
    if roles.contains_any(&FULL_EDIT_ROLES) {
        return true;
    }
    policy.allows_field(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("bio", true)]
    #[test_case("spiritualGifts", true)]
    #[test_case("doNotContact", true)]
    #[test_case("email", false)]
    #[test_case("roles", false)]
    #[test_case("dateOfBirth", false)]
    fn test_member_editable(field: &str, expected: bool) {
        let roles = RoleSet::from(Role::Member);
        assert_eq!(
            can_edit_field(field, &roles, &FieldPolicy::member_editable()),
            expected
        );
    }

    #[test]
    fn test_admin_and_staff_edit_everything() {
        let policy = FieldPolicy::member_editable();
        assert!(can_edit_field("roles", &RoleSet::from(Role::Admin), &policy));
        assert!(can_edit_field("email", &RoleSet::from(Role::Staff), &policy));
    }

    #[test]
    fn test_full_edit_is_membership_not_hierarchy() {
        let policy = FieldPolicy::member_editable();
        let pastor = RoleSet::from(Role::Pastor);

        assert!(!can_edit_field("email", &pastor, &policy));
        assert!(can_edit_field("bio", &pastor, &policy));
    }

    #[test]
    fn test_field_filter_wildcards() {
        assert!(FieldFilter::new("*", true).matches("anything"));
        assert!(FieldFilter::new("contact*", true).matches("contactPhone"));
        assert!(FieldFilter::new("*Interests", true).matches("volunteerInterests"));
        assert!(!FieldFilter::new("bio", true).matches("biography"));
    }

    #[test]
    fn test_deny_wins_over_allow() {
        let policy = FieldPolicy::new().allow_field("*").deny_field("email");
        assert!(policy.allows_field("bio"));
        assert!(!policy.allows_field("email"));
    }

    #[test]
    fn test_empty_policy_denies() {
        assert!(!FieldPolicy::new().allows_field("bio"));
    }
}
