//! # fellowship-rbac: Role-Based Access & View Authorization
//!
//! Decides what a portal subject may *do* and what the portal *shows* them:
//! - **Role model** (10 ranked roles, hierarchy checks)
//! - **Permission predicates** for server-side handlers
//! - **View-as overrides** (session-local, display only)
//! - **Navigation authorization** (role-filtered menu trees)
//! - **View matrix & preview detection**
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Subject (real roles from the identity layer) │
//! └───────────┬──────────────────────┬───────────┘
//!             │                      │
//!             ▼                      ▼
//! ┌──────────────────────┐  ┌────────────────────────────┐
//! │  Predicates / Gates  │  │  ViewOverrideStore          │
//! │  (real roles only)   │  │  + ViewMatrix (legal views) │
//! └──────────────────────┘  └─────────────┬──────────────┘
//!                                          │ display_roles
//!                                          ▼
//!                           ┌────────────────────────────┐
//!                           │  filter_nav (menu tree)     │
//!                           └────────────────────────────┘
//! ```
//!
//! An override changes only what is rendered. Every authorization decision
//! reads the subject's real roles.
//!
//! ## Roles
//!
//! | Role       | Rank | Own view |
//! |------------|------|----------|
//! | admin      | 0    | ✓        |
//! | pastor     | 1    | ✓        |
//! | leader     | 2    | ✓        |
//! | instructor | 3    | ✗        |
//! | mentor     | 4    | ✓        |
//! | staff      | 5    | ✗        |
//! | volunteer  | 6    | ✗        |
//! | member     | 7    | ✓        |
//! | student    | 8    | ✓        |
//! | viewer     | 9    | ✓        |
//!
//! ## Examples
//!
//! ### Gating a handler
//!
//! ```
//! use fellowship_rbac::enforcement::AccessEnforcer;
//! use fellowship_rbac::permissions::Gate;
//! use fellowship_rbac::roles::Role;
//! use fellowship_rbac::subject::Subject;
//!
//! let enforcer = AccessEnforcer::default();
//! let subject = Subject::new("42", Role::Instructor);
//!
//! enforcer.enforce(Gate::LmsWrite, Some(&subject), Some("/portal/pathways"))?;
//! assert!(enforcer.enforce(Gate::AdminOnly, Some(&subject), None).is_err());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Previewing a lower view
//!
//! ```
//! use fellowship_rbac::navigation::filter_nav;
//! use fellowship_rbac::portal::main_nav;
//! use fellowship_rbac::roles::Role;
//! use fellowship_rbac::store::{MemoryStorage, ViewOverrideStore};
//! use fellowship_rbac::subject::Subject;
//! use fellowship_rbac::switcher::ViewSwitcher;
//! use fellowship_rbac::views::{ViewMatrix, ViewRole};
//!
//! let admin = Subject::new("1", Role::Admin);
//! let matrix = ViewMatrix::standard();
//! let store = ViewOverrideStore::client(MemoryStorage::new());
//! let switcher = ViewSwitcher::new(&admin, &matrix, &store);
//!
//! switcher.select(ViewRole::Viewer)?;
//! assert!(switcher.is_previewing());
//!
//! let menu = filter_nav(&main_nav(), &switcher.display_roles());
//! assert!(menu.iter().all(|item| item.label != "Giving"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod enforcement;
pub mod navigation;
pub mod permissions;
pub mod policy;
pub mod portal;
pub mod roles;
pub mod store;
pub mod subject;
pub mod switcher;
pub mod views;

// Re-export commonly used types
pub use enforcement::{AccessEnforcer, EnforcementError, ProfileRef, assert_can_edit_profile};
pub use navigation::{NavNode, filter_for_subject, filter_nav};
pub use permissions::{AccessContext, AccessRules, Gate, GateError};
pub use policy::{FieldPolicy, can_edit_field};
pub use roles::{Role, RoleError, RoleSet};
pub use store::{MemoryStorage, OverrideStorage, Subscription, ViewOverrideStore};
pub use subject::{Subject, SubjectRecord, user_has_role};
pub use switcher::ViewSwitcher;
pub use views::{
    ViewError, ViewMatrix, ViewMatrixError, ViewRole, allowed_views, display_roles,
    is_preview_view,
};


// Kani proofs for bounded model checking
#[cfg(kani)]
mod kani_proofs;
