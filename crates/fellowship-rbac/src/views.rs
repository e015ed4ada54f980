#![allow(clippy::match_same_arms)]
//! View roles, the view matrix and preview detection.
//!
//! A [`ViewRole`] is a role the portal can *display as*. Which views a
//! subject may switch into is decided by the [`ViewMatrix`]: the union of
//! the rows for every role the subject holds. A view never changes what the
//! subject may *do*; predicates always see real roles.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::roles::{Role, RoleSet};
use crate::subject::Subject;

/// Error type for view parsing and switching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// The name is not a view role.
    #[error("Unknown view: {0:?}")]
    UnknownView(String),

    /// The role has no display view (e.g. `staff`, `volunteer`).
    #[error("Role '{0}' cannot be used as a view")]
    NotAViewRole(Role),

    /// The view matrix does not let this subject assume the view.
    #[error("View '{view}' is not permitted for this subject")]
    NotPermitted { view: ViewRole },
}

/// Error type for view matrix validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewMatrixError {
    /// A role that has a view of its own does not list it in its row.
    #[error("Role '{role}' does not list its own view")]
    MissingSelfView { role: Role },

    /// A row lets a role display a view with more authority than itself.
    #[error("Role '{role}' may not view as higher-authority '{view}'")]
    ViewAboveRole { role: Role, view: ViewRole },
}

/// Role usable as a display identity.
///
/// A proper subset of [`Role`]: there is no `instructor`, `staff` or
/// `volunteer` view. Shares [`Role`]'s ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewRole {
    Admin,
    Pastor,
    Leader,
    Mentor,
    Member,
    Student,
    Viewer,
}

impl ViewRole {
    /// Every view, highest authority first.
    pub const ALL: [ViewRole; 7] = [
        ViewRole::Admin,
        ViewRole::Pastor,
        ViewRole::Leader,
        ViewRole::Mentor,
        ViewRole::Member,
        ViewRole::Student,
        ViewRole::Viewer,
    ];

    /// Returns the role this view displays as.
    pub const fn as_role(self) -> Role {
        match self {
            ViewRole::Admin => Role::Admin,
            ViewRole::Pastor => Role::Pastor,
            ViewRole::Leader => Role::Leader,
            ViewRole::Mentor => Role::Mentor,
            ViewRole::Member => Role::Member,
            ViewRole::Student => Role::Student,
            ViewRole::Viewer => Role::Viewer,
        }
    }

    /// Rank of the corresponding [`Role`].
    pub const fn rank(self) -> u8 {
        self.as_role().rank()
    }

    pub const fn as_str(self) -> &'static str {
        self.as_role().as_str()
    }
}

impl From<ViewRole> for Role {
    fn from(view: ViewRole) -> Self {
        view.as_role()
    }
}

impl TryFrom<Role> for ViewRole {
    type Error = ViewError;

    fn try_from(role: Role) -> Result<Self, Self::Error> {
        match role {
            Role::Admin => Ok(ViewRole::Admin),
            Role::Pastor => Ok(ViewRole::Pastor),
            Role::Leader => Ok(ViewRole::Leader),
            Role::Mentor => Ok(ViewRole::Mentor),
            Role::Member => Ok(ViewRole::Member),
            Role::Student => Ok(ViewRole::Student),
            Role::Viewer => Ok(ViewRole::Viewer),
            Role::Instructor | Role::Staff | Role::Volunteer => Err(ViewError::NotAViewRole(role)),
        }
    }
}

impl fmt::Display for ViewRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewRole {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewRole::ALL
            .into_iter()
            .find(|view| view.as_str() == s)
            .ok_or_else(|| ViewError::UnknownView(s.to_string()))
    }
}

/// Which views each role may select.
///
/// Every role has a row; a role with no legal views has an empty row
/// rather than a missing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewMatrix {
    rows: BTreeMap<Role, BTreeSet<ViewRole>>,
}

impl ViewMatrix {
    /// Creates a matrix where every role has an empty row.
    pub fn empty() -> Self {
        Self {
            rows: Role::ALL.into_iter().map(|r| (r, BTreeSet::new())).collect(),
        }
    }

    /// The portal's reference matrix.
    pub fn standard() -> Self {
        use ViewRole as V;

        Self::empty()
            .with_row(
                Role::Admin,
                [V::Admin, V::Pastor, V::Leader, V::Mentor, V::Member, V::Student, V::Viewer],
            )
            .with_row(Role::Pastor, [V::Pastor, V::Leader, V::Member, V::Student, V::Viewer])
            .with_row(Role::Leader, [V::Leader, V::Member, V::Student, V::Viewer])
            .with_row(Role::Instructor, [V::Mentor, V::Student, V::Viewer])
            .with_row(Role::Mentor, [V::Mentor, V::Student, V::Viewer])
            .with_row(Role::Staff, [V::Member, V::Viewer])
            .with_row(Role::Volunteer, [V::Member, V::Viewer])
            .with_row(Role::Member, [V::Member, V::Viewer])
            .with_row(Role::Student, [V::Student, V::Viewer])
            .with_row(Role::Viewer, [V::Viewer])
    }

    /// Replaces the row for `role`.
    pub fn with_row(mut self, role: Role, views: impl IntoIterator<Item = ViewRole>) -> Self {
        self.rows.insert(role, views.into_iter().collect());
        self
    }

    /// Returns the views `role` may select.
    pub fn row(&self, role: Role) -> &BTreeSet<ViewRole> {
        static EMPTY: BTreeSet<ViewRole> = BTreeSet::new();
        self.rows.get(&role).unwrap_or(&EMPTY)
    }

    /// Union of the rows for every role in `roles`.
    pub fn views_for(&self, roles: &RoleSet) -> BTreeSet<ViewRole> {
        roles
            .iter()
            .flat_map(|role| self.row(role).iter().copied())
            .collect()
    }

    /// Returns whether any role in `roles` may select `view`.
    pub fn permits(&self, roles: &RoleSet, view: ViewRole) -> bool {
        roles.iter().any(|role| self.row(role).contains(&view))
    }

    /// Checks the matrix invariants.
    ///
    /// - A role that has a view of its own lists it.
    /// - No row reaches a view with more authority than its role.
    pub fn validate(&self) -> Result<(), ViewMatrixError> {
        for role in Role::ALL {
            let row = self.row(role);

            if let Ok(own) = ViewRole::try_from(role) {
                if !row.contains(&own) {
                    return Err(ViewMatrixError::MissingSelfView { role });
                }
            }

            if let Some(view) = row.iter().find(|view| view.rank() < role.rank()) {
                return Err(ViewMatrixError::ViewAboveRole { role, view: *view });
            }
        }
        Ok(())
    }
}

impl Default for ViewMatrix {
    fn default() -> Self {
        Self::standard()
    }
}

/// Views the subject may switch into, ordered highest authority first.
pub fn allowed_views(subject: &Subject, matrix: &ViewMatrix) -> BTreeSet<ViewRole> {
    matrix.views_for(&subject.roles)
}

/// Returns true when the active override shows strictly less authority than
/// the subject's real highest role.
///
/// No override, a lateral override, an upward override, or a subject with no
/// roles is never a preview.
pub fn is_preview_view(subject: &Subject, active: Option<ViewRole>) -> bool {
    let Some(view) = active else {
        return false;
    };
    let Some(highest) = subject.highest_role() else {
        return false;
    };
    view.rank() > highest.rank()
}

/// Roles used for *display* decisions such as navigation filtering.
///
/// The override, as a single role, when the matrix permits it for this
/// subject; otherwise the subject's real roles. An illegal override (for
/// example a stale value left in storage by another account) is ignored.
pub fn display_roles(subject: &Subject, active: Option<ViewRole>, matrix: &ViewMatrix) -> RoleSet {
    match active {
        Some(view) if matrix.permits(&subject.roles, view) => RoleSet::from(view.as_role()),
        Some(view) => {
            warn!(view = %view, subject = %subject.id, "Ignoring view override not permitted for subject");
            subject.roles.clone()
        }
        None => subject.roles.clone(),
    }
}
