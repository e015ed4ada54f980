//! Policy enforcement for server-side handlers.
//!
//! Turns the boolean predicates into `Result`s that handlers can propagate
//! with `?`, and writes an audit trail of every decision.

use fellowship_types::OwnerId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::permissions::{AccessContext, AccessRules, Gate, has_role_at_least};
use crate::policy::can_edit_field;
use crate::roles::Role;
use crate::subject::Subject;

/// Error type for policy enforcement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnforcementError {
    /// Access denied by a gate.
    #[error("Access denied: {reason}")]
    AccessDenied { reason: String },

    /// The profile has no owner, so only staff may edit it.
    #[error("Profile has no owner")]
    ProfileHasNoOwner,

    /// The subject does not own the resource.
    #[error("Forbidden")]
    Forbidden,
}

/// Result type for enforcement operations.
pub type Result<T> = std::result::Result<T, EnforcementError>;

/// Minimal view of a profile record needed for ownership checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRef {
    pub id: OwnerId,
    /// The subject that owns the profile, if any.
    #[serde(default)]
    pub user: Option<OwnerId>,
}

impl ProfileRef {
    pub fn new(id: impl Into<OwnerId>, user: Option<OwnerId>) -> Self {
        Self {
            id: id.into(),
            user,
        }
    }
}

/// Fails unless the subject may edit the profile.
///
/// Staff and above edit any profile. Everyone else must own it.
pub fn assert_can_edit_profile(profile: &ProfileRef, subject: &Subject) -> Result<()> {
    if subject.roles.at_least(Role::Staff) {
        return Ok(());
    }

    let owner = match &profile.user {
        Some(owner) if !owner.is_unset() => owner,
        _ => return Err(EnforcementError::ProfileHasNoOwner),
    };

    if owner.is_owned_by(&subject.id) {
        Ok(())
    } else {
        Err(EnforcementError::Forbidden)
    }
}

/// Access enforcement engine.
///
/// Wraps the deployment's [`AccessRules`] and logs every decision.
pub struct AccessEnforcer {
    rules: AccessRules,

    /// Whether to log access decisions.
    audit_enabled: bool,
}

impl AccessEnforcer {
    /// Creates a new enforcer.
    pub fn new(rules: AccessRules) -> Self {
        Self {
            rules,
            audit_enabled: true,
        }
    }

    /// Disables audit logging (for testing).
    pub fn without_audit(mut self) -> Self {
        self.audit_enabled = false;
        self
    }

    /// Returns the rules this enforcer applies.
    pub fn rules(&self) -> &AccessRules {
        &self.rules
    }

    /// Builds a predicate context under this enforcer's rules.
    pub fn context<'a>(
        &'a self,
        subject: Option<&'a Subject>,
        pathname: Option<&'a str>,
    ) -> AccessContext<'a> {
        let ctx = self.rules.context(subject);
        match pathname {
            Some(path) => ctx.at_path(path),
            None => ctx,
        }
    }

    /// Returns `Ok(())` if the gate passes, `Err` otherwise.
    ///
    /// **Audit:** Logs all attempts.
    pub fn enforce(
        &self,
        gate: Gate,
        subject: Option<&Subject>,
        pathname: Option<&str>,
    ) -> Result<()> {
        let ctx = self.context(subject, pathname);
        let allowed = gate.check(&ctx);

        if self.audit_enabled {
            let subject_id = subject.map(|s| s.id.as_str());
            if allowed {
                info!(gate = %gate, subject = ?subject_id, path = ?pathname, "Access granted");
            } else {
                warn!(gate = %gate, subject = ?subject_id, path = ?pathname, "Access denied");
            }
        }

        if allowed {
            Ok(())
        } else {
            Err(EnforcementError::AccessDenied {
                reason: format!("gate '{gate}' denied"),
            })
        }
    }

    /// Enforces profile ownership.
    ///
    /// **Audit:** Logs denials.
    pub fn enforce_profile_edit(&self, profile: &ProfileRef, subject: &Subject) -> Result<()> {
        let result = assert_can_edit_profile(profile, subject);

        if self.audit_enabled {
            if let Err(err) = &result {
                warn!(
                    subject = %subject.id,
                    profile = %profile.id,
                    error = %err,
                    "Profile edit denied"
                );
            }
        }

        result
    }

    /// Filters a requested field list down to the fields the subject may edit.
    ///
    /// **Audit:** Logs removed fields (if any).
    pub fn editable_fields(&self, subject: &Subject, requested: &[String]) -> Vec<String> {
        let (allowed, denied): (Vec<&String>, Vec<&String>) = requested
            .iter()
            .partition(|field| can_edit_field(field, &subject.roles, &self.rules.field_policy));

        if self.audit_enabled && !denied.is_empty() {
            warn!(
                subject = %subject.id,
                denied_fields = ?denied,
                "Fields filtered by policy"
            );
        }

        allowed.into_iter().cloned().collect()
    }

    /// Convenience hierarchy check that also writes to the audit log.
    pub fn require_role(&self, subject: Option<&Subject>, minimum: Role) -> Result<()> {
        let ctx = self.context(subject, None);
        if has_role_at_least(&ctx, minimum) {
            return Ok(());
        }

        if self.audit_enabled {
            warn!(
                subject = ?subject.map(|s| s.id.as_str()),
                minimum = %minimum,
                "Role requirement not met"
            );
        }

        Err(EnforcementError::AccessDenied {
            reason: format!("requires role '{minimum}' or above"),
        })
    }
}

impl Default for AccessEnforcer {
    fn default() -> Self {
        Self::new(AccessRules::default())
    }
}
