//! "View as" switcher.
//!
//! Ties a subject, the view matrix and the override store together: lists
//! the options, rejects illegal selections before they reach storage, and
//! reports the roles navigation should render with.

use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::roles::RoleSet;
use crate::store::ViewOverrideStore;
use crate::subject::Subject;
use crate::views::{ViewError, ViewMatrix, ViewRole, allowed_views, display_roles, is_preview_view};

/// View switcher for one subject in one session.
#[derive(Debug)]
pub struct ViewSwitcher<'a> {
    subject: &'a Subject,
    matrix: &'a ViewMatrix,
    store: &'a ViewOverrideStore,
}

impl<'a> ViewSwitcher<'a> {
    pub fn new(subject: &'a Subject, matrix: &'a ViewMatrix, store: &'a ViewOverrideStore) -> Self {
        Self {
            subject,
            matrix,
            store,
        }
    }

    /// Views the subject may pick, highest authority first.
    pub fn options(&self) -> BTreeSet<ViewRole> {
        allowed_views(self.subject, self.matrix)
    }

    /// Whether the switcher should be shown at all.
    ///
    /// Hidden when there is at most one option.
    pub fn is_available(&self) -> bool {
        self.options().len() > 1
    }

    /// The override currently in effect, if the matrix still permits it.
    pub fn active(&self) -> Option<ViewRole> {
        self.store
            .get_active_view()
            .filter(|view| self.matrix.permits(&self.subject.roles, *view))
    }

    /// Selects a view.
    ///
    /// # Errors
    ///
    /// [`ViewError::NotPermitted`] when the matrix does not allow the view
    /// for this subject. The store is left untouched.
    pub fn select(&self, view: ViewRole) -> Result<(), ViewError> {
        if !self.matrix.permits(&self.subject.roles, view) {
            warn!(subject = %self.subject.id, view = %view, "Rejected view selection");
            return Err(ViewError::NotPermitted { view });
        }

        info!(subject = %self.subject.id, view = %view, "View selected");
        self.store.set_active_view(view);
        Ok(())
    }

    /// Parses and selects a view by name.
    pub fn select_named(&self, name: &str) -> Result<(), ViewError> {
        self.select(name.parse()?)
    }

    /// Returns to the subject's real roles.
    pub fn reset(&self) {
        self.store.clear_active_view();
    }

    /// Whether the active override previews a lower-authority view.
    pub fn is_previewing(&self) -> bool {
        is_preview_view(self.subject, self.active())
    }

    /// Roles to render navigation and other display decisions with.
    pub fn display_roles(&self) -> RoleSet {
        display_roles(self.subject, self.store.get_active_view(), self.matrix)
    }
}
