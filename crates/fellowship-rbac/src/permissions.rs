#![allow(clippy::match_same_arms)]
//! Permission predicates for server-side access checks.
//!
//! Every predicate is a pure function over an [`AccessContext`] and returns
//! a `bool`. Absent data degrades to deny. Predicates always look at the
//! subject's *real* roles; a view-as override never reaches this module.
//!
//! # Admin route escape hatch
//!
//! Most gates also pass when the evaluated path lies under the admin route
//! prefix (`/portal/admin` by default), regardless of role. Pages under that
//! prefix run their own, deeper authorization downstream.

use std::fmt;
use std::str::FromStr;

use fellowship_config::AccessConfig;
use fellowship_types::OwnerId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::policy::FieldPolicy;
use crate::roles::Role;
use crate::subject::Subject;

pub use fellowship_config::DEFAULT_ADMIN_ROUTE_PREFIX;

/// Error type for gate parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Unknown gate: {0:?}")]
    UnknownGate(String),
}

/// Deployment-level access rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRules {
    /// Paths under this prefix pass the route-based gates.
    pub admin_route_prefix: String,

    /// Which profile fields non-staff subjects may edit.
    pub field_policy: FieldPolicy,
}

impl AccessRules {
    /// Creates rules with a custom admin route prefix.
    pub fn with_admin_route_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.admin_route_prefix = prefix.into();
        self
    }

    /// Builds a context for evaluating predicates under these rules.
    pub fn context<'a>(&'a self, subject: Option<&'a Subject>) -> AccessContext<'a> {
        AccessContext {
            subject,
            pathname: None,
            admin_route_prefix: &self.admin_route_prefix,
        }
    }
}

impl Default for AccessRules {
    fn default() -> Self {
        Self {
            admin_route_prefix: DEFAULT_ADMIN_ROUTE_PREFIX.to_string(),
            field_policy: FieldPolicy::member_editable(),
        }
    }
}

impl From<&AccessConfig> for AccessRules {
    fn from(config: &AccessConfig) -> Self {
        Self {
            admin_route_prefix: config.admin_route_prefix.clone(),
            field_policy: FieldPolicy::allowing(config.editable_fields()),
        }
    }
}

/// Request-scoped inputs to the predicates.
#[derive(Debug, Clone, Copy)]
pub struct AccessContext<'a> {
    subject: Option<&'a Subject>,
    pathname: Option<&'a str>,
    admin_route_prefix: &'a str,
}

impl<'a> AccessContext<'a> {
    /// Creates a context with the default admin route prefix.
    pub fn new(subject: Option<&'a Subject>) -> Self {
        Self {
            subject,
            pathname: None,
            admin_route_prefix: DEFAULT_ADMIN_ROUTE_PREFIX,
        }
    }

    /// Sets the destination path being evaluated.
    pub fn at_path(mut self, pathname: &'a str) -> Self {
        self.pathname = Some(pathname);
        self
    }

    pub fn subject(&self) -> Option<&'a Subject> {
        self.subject
    }

    pub fn pathname(&self) -> Option<&'a str> {
        self.pathname
    }
}

// ============================================================================
// Basic predicates
// ============================================================================

/// True iff a subject is present. Session integrity is the identity
/// provider's concern.
pub fn is_logged_in(ctx: &AccessContext<'_>) -> bool {
    ctx.subject.is_some()
}

/// Hierarchy check over the subject's real roles. No subject, no roles.
pub fn has_role_at_least(ctx: &AccessContext<'_>, minimum: Role) -> bool {
    ctx.subject.is_some_and(|s| s.roles.at_least(minimum))
}

/// True when the evaluated path lies under the admin route prefix.
pub fn is_admin_route(ctx: &AccessContext<'_>) -> bool {
    ctx.pathname
        .is_some_and(|path| path.starts_with(ctx.admin_route_prefix))
}

// ============================================================================
// Named gates
// ============================================================================

pub fn public_read() -> bool {
    true
}

pub fn logged_in_only(ctx: &AccessContext<'_>) -> bool {
    is_logged_in(ctx)
}

pub fn admin_only(ctx: &AccessContext<'_>) -> bool {
    has_role_at_least(ctx, Role::Admin) || is_admin_route(ctx)
}

/// Staff and above.
pub fn staff_only(ctx: &AccessContext<'_>) -> bool {
    has_role_at_least(ctx, Role::Staff) || is_admin_route(ctx)
}

/// Instructor and above.
pub fn instructors_only(ctx: &AccessContext<'_>) -> bool {
    has_role_at_least(ctx, Role::Instructor) || is_admin_route(ctx)
}

/// Mentor and above.
pub fn mentors_only(ctx: &AccessContext<'_>) -> bool {
    has_role_at_least(ctx, Role::Mentor) || is_admin_route(ctx)
}

/// Pathways read access: students and above. Requires a subject even on
/// admin routes.
pub fn lms_read_access(ctx: &AccessContext<'_>) -> bool {
    if ctx.subject.is_none() {
        return false;
    }
    has_role_at_least(ctx, Role::Student) || is_admin_route(ctx)
}

/// Pathways write access: instructors and above.
pub fn lms_write_access(ctx: &AccessContext<'_>) -> bool {
    has_role_at_least(ctx, Role::Instructor) || is_admin_route(ctx)
}

/// Allows subjects holding any of `allowed` exactly.
pub fn allow_roles(ctx: &AccessContext<'_>, allowed: &[Role]) -> bool {
    let Some(subject) = ctx.subject else {
        return false;
    };
    if is_admin_route(ctx) {
        return true;
    }
    subject.roles.contains_any(allowed)
}

/// Allows staff-or-above, admin routes, or the resource owner.
///
/// An unset owner id (`""` or `0`) denies non-staff subjects, including a
/// numeric owner whose id really is `0`.
pub fn allow_if_self_or_admin(ctx: &AccessContext<'_>, resource_owner: Option<&OwnerId>) -> bool {
    let Some(subject) = ctx.subject else {
        return false;
    };

    if has_role_at_least(ctx, Role::Staff) || is_admin_route(ctx) {
        return true;
    }

    match resource_owner {
        Some(owner) if !owner.is_unset() => owner.is_owned_by(&subject.id),
        _ => false,
    }
}

/// Named coarse-grained gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gate {
    PublicRead,
    LoggedIn,
    AdminOnly,
    StaffOnly,
    InstructorsOnly,
    MentorsOnly,
    LmsRead,
    LmsWrite,
}

impl Gate {
    pub const ALL: [Gate; 8] = [
        Gate::PublicRead,
        Gate::LoggedIn,
        Gate::AdminOnly,
        Gate::StaffOnly,
        Gate::InstructorsOnly,
        Gate::MentorsOnly,
        Gate::LmsRead,
        Gate::LmsWrite,
    ];

    /// Evaluates the gate.
    pub fn check(self, ctx: &AccessContext<'_>) -> bool {
        match self {
            Gate::PublicRead => public_read(),
            Gate::LoggedIn => logged_in_only(ctx),
            Gate::AdminOnly => admin_only(ctx),
            Gate::StaffOnly => staff_only(ctx),
            Gate::InstructorsOnly => instructors_only(ctx),
            Gate::MentorsOnly => mentors_only(ctx),
            Gate::LmsRead => lms_read_access(ctx),
            Gate::LmsWrite => lms_write_access(ctx),
        }
    }

    /// Returns the role a subject needs to pass without the route override.
    pub fn minimum_role(self) -> Option<Role> {
        match self {
            Gate::PublicRead => None,
            Gate::LoggedIn => None,
            Gate::AdminOnly => Some(Role::Admin),
            Gate::StaffOnly => Some(Role::Staff),
            Gate::InstructorsOnly => Some(Role::Instructor),
            Gate::MentorsOnly => Some(Role::Mentor),
            Gate::LmsRead => Some(Role::Student),
            Gate::LmsWrite => Some(Role::Instructor),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gate::PublicRead => "public-read",
            Gate::LoggedIn => "logged-in",
            Gate::AdminOnly => "admin-only",
            Gate::StaffOnly => "staff-only",
            Gate::InstructorsOnly => "instructors-only",
            Gate::MentorsOnly => "mentors-only",
            Gate::LmsRead => "lms-read",
            Gate::LmsWrite => "lms-write",
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gate {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gate::ALL
            .into_iter()
            .find(|gate| gate.as_str() == s)
            .ok_or_else(|| GateError::UnknownGate(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn subject(roles: &[Role]) -> Subject {
        Subject::new("u-1", roles.iter().copied().collect::<crate::roles::RoleSet>())
    }

    #[test]
    fn test_is_logged_in() {
        let s = subject(&[]);
        assert!(is_logged_in(&AccessContext::new(Some(&s))));
        assert!(!is_logged_in(&AccessContext::new(None)));
    }

    #[test]
    fn test_absent_subject_never_has_role() {
        let ctx = AccessContext::new(None);
        for role in Role::ALL {
            assert!(!has_role_at_least(&ctx, role));
        }
    }

    #[test]
    fn test_has_role_at_least_or_across_roles() {
        let s = subject(&[Role::Viewer, Role::Admin]);
        assert!(has_role_at_least(&AccessContext::new(Some(&s)), Role::Staff));

        let s = subject(&[Role::Viewer]);
        assert!(!has_role_at_least(&AccessContext::new(Some(&s)), Role::Staff));
    }

    #[test_case(&[Role::Admin], Gate::AdminOnly, true)]
    #[test_case(&[Role::Pastor], Gate::AdminOnly, false)]
    #[test_case(&[Role::Staff], Gate::StaffOnly, true)]
    #[test_case(&[Role::Volunteer], Gate::StaffOnly, false)]
    #[test_case(&[Role::Instructor], Gate::InstructorsOnly, true)]
    #[test_case(&[Role::Mentor], Gate::InstructorsOnly, false)]
    #[test_case(&[Role::Mentor], Gate::MentorsOnly, true)]
    #[test_case(&[Role::Staff], Gate::MentorsOnly, false)]
    #[test_case(&[Role::Student], Gate::LmsRead, true)]
    #[test_case(&[Role::Viewer], Gate::LmsRead, false)]
    #[test_case(&[Role::Student], Gate::LmsWrite, false)]
    #[test_case(&[Role::Leader], Gate::LmsWrite, true)]
    #[test_case(&[], Gate::LoggedIn, true)]
    fn test_gate_by_role(roles: &[Role], gate: Gate, expected: bool) {
        let s = subject(roles);
        let ctx = AccessContext::new(Some(&s)).at_path("/portal/pathways");
        assert_eq!(gate.check(&ctx), expected);
    }

    // The admin route grants access regardless of role. This is intentional:
    // pages under the prefix perform their own authorization.
    #[test]
    fn test_admin_route_escape_hatch_is_intentional() {
        let s = subject(&[Role::Viewer]);
        let ctx = AccessContext::new(Some(&s)).at_path("/portal/admin/users");

        assert!(admin_only(&ctx));
        assert!(staff_only(&ctx));
        assert!(instructors_only(&ctx));
        assert!(mentors_only(&ctx));
        assert!(lms_read_access(&ctx));
        assert!(lms_write_access(&ctx));
        assert!(allow_roles(&ctx, &[Role::Admin]));
    }

    #[test]
    fn test_admin_route_without_subject() {
        let ctx = AccessContext::new(None).at_path("/portal/admin");

        // Role gates follow the route override even without a subject...
        assert!(admin_only(&ctx));
        assert!(staff_only(&ctx));
        // ...but subject-requiring gates still deny.
        assert!(!lms_read_access(&ctx));
        assert!(!allow_roles(&ctx, &[Role::Viewer]));
        assert!(!allow_if_self_or_admin(&ctx, Some(&OwnerId::from("u-1"))));
        assert!(!logged_in_only(&ctx));
    }

    #[test]
    fn test_custom_admin_route_prefix() {
        let rules = AccessRules::default().with_admin_route_prefix("/manage");
        let s = subject(&[Role::Viewer]);

        assert!(admin_only(&rules.context(Some(&s)).at_path("/manage/roles")));
        assert!(!admin_only(&rules.context(Some(&s)).at_path("/portal/admin")));
    }

    #[test]
    fn test_public_read_always_true() {
        assert!(public_read());
        assert!(Gate::PublicRead.check(&AccessContext::new(None)));
    }

    #[test]
    fn test_allow_roles_is_exact_intersection() {
        let s = subject(&[Role::Mentor, Role::Student]);
        let ctx = AccessContext::new(Some(&s));

        assert!(allow_roles(&ctx, &[Role::Student]));
        assert!(!allow_roles(&ctx, &[Role::Viewer]));
        assert!(!allow_roles(&ctx, &[]));
    }

    #[test]
    fn test_allow_if_self_or_admin_owner_match() {
        let s = Subject::new("42", Role::Member);
        let ctx = AccessContext::new(Some(&s));

        assert!(allow_if_self_or_admin(&ctx, Some(&OwnerId::from(42_i64))));
        assert!(allow_if_self_or_admin(&ctx, Some(&OwnerId::from("42"))));
        assert!(!allow_if_self_or_admin(&ctx, Some(&OwnerId::from(7_i64))));
        assert!(!allow_if_self_or_admin(&ctx, None));
    }

    #[test]
    fn test_allow_if_self_or_admin_staff_bypass() {
        let s = Subject::new("1", Role::Staff);
        let ctx = AccessContext::new(Some(&s));

        assert!(allow_if_self_or_admin(&ctx, Some(&OwnerId::from(99_i64))));
        assert!(allow_if_self_or_admin(&ctx, None));
    }

    // Numeric owner id 0 counts as "no owner" and denies, even when the
    // subject's own id is "0". Whether that is intended is unresolved; the
    // behavior is pinned here so any change is deliberate.
    #[test]
    fn test_allow_if_self_or_admin_zero_owner_denies() {
        let s = Subject::new("0", Role::Member);
        let ctx = AccessContext::new(Some(&s));

        assert!(!allow_if_self_or_admin(&ctx, Some(&OwnerId::from(0_i64))));
        assert!(!allow_if_self_or_admin(&ctx, Some(&OwnerId::from(""))));
        assert!(allow_if_self_or_admin(&ctx, Some(&OwnerId::from("0"))));
    }

    #[test]
    fn test_gate_round_trip_names() {
        for gate in Gate::ALL {
            assert_eq!(gate.as_str().parse::<Gate>().unwrap(), gate);
        }
        assert_eq!(
            "root".parse::<Gate>(),
            Err(GateError::UnknownGate("root".to_string()))
        );
    }

    #[test]
    fn test_gate_minimum_roles() {
        assert_eq!(Gate::LmsRead.minimum_role(), Some(Role::Student));
        assert_eq!(Gate::PublicRead.minimum_role(), None);
    }

    #[test]
    fn test_rules_from_config() {
        let config = AccessConfig {
            admin_route_prefix: "/office".to_string(),
            member_editable_fields: Some(vec!["bio".to_string()]),
        };
        let rules = AccessRules::from(&config);

        assert_eq!(rules.admin_route_prefix, "/office");
        assert!(rules.field_policy.allows_field("bio"));
        assert!(!rules.field_policy.allows_field("phone"));
    }
}
