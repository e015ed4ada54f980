//! Role-filtered navigation trees.
//!
//! Trees are owned values authored as static configuration (see
//! [`crate::portal`]) or loaded from a file. Filtering is depth-first:
//!
//! 1. A node whose `min_role` the roles do not reach is dropped together with
//!    its whole subtree. Its children are never visited.
//! 2. Surviving nodes have their children filtered recursively.
//! 3. A node is kept only if it has a destination or at least one child
//!    survived. Header-only sections with nothing visible under them vanish.
//!
//! Sibling order is preserved.

use serde::{Deserialize, Serialize};

use crate::roles::{Role, RoleSet};
use crate::subject::Subject;

/// A navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavNode {
    pub label: String,

    /// Destination. Section headers have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,

    /// Icon name for the renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Opens outside the portal.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub external: bool,

    /// Lowest role that may see this node and everything under it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_role: Option<Role>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavNode>,
}

impl NavNode {
    /// Creates a link.
    pub fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: Some(href.into()),
            icon: None,
            external: false,
            min_role: None,
            children: Vec::new(),
        }
    }

    /// Creates a section header with no destination.
    pub fn section(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: None,
            icon: None,
            external: false,
            min_role: None,
            children: Vec::new(),
        }
    }

    pub fn min_role(mut self, role: Role) -> Self {
        self.min_role = Some(role);
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = NavNode>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    /// Whether `roles` pass this node's own requirement.
    pub fn is_visible_to(&self, roles: &RoleSet) -> bool {
        self.min_role.is_none_or(|minimum| roles.at_least(minimum))
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(NavNode::count).sum::<usize>()
    }
}

/// Filters `nodes` down to what `roles` may see.
pub fn filter_nav(nodes: &[NavNode], roles: &RoleSet) -> Vec<NavNode> {
    nodes
        .iter()
        .filter(|node| node.is_visible_to(roles))
        .filter_map(|node| {
            let children = filter_nav(&node.children, roles);
            if node.href.is_none() && children.is_empty() {
                return None;
            }
            Some(NavNode {
                label: node.label.clone(),
                href: node.href.clone(),
                icon: node.icon.clone(),
                external: node.external,
                min_role: node.min_role,
                children,
            })
        })
        .collect()
}

/// Filters `nodes` for a subject's real roles.
///
/// An anonymous visitor holds no roles and only sees nodes without a
/// requirement.
pub fn filter_for_subject(nodes: &[NavNode], subject: Option<&Subject>) -> Vec<NavNode> {
    match subject {
        Some(subject) => filter_nav(nodes, &subject.roles),
        None => filter_nav(nodes, &RoleSet::empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(nodes: &[NavNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.label.as_str()).collect()
    }

    fn dashboard_tree() -> Vec<NavNode> {
        vec![
            NavNode::link("Dashboard", "/portal").min_role(Role::Viewer),
            NavNode::link("Pathways", "/portal/pathways")
                .min_role(Role::Student)
                .children([
                    NavNode::link("Journey", "/portal/pathways/journey").min_role(Role::Student),
                    NavNode::link("Settings", "/portal/pathways/settings").min_role(Role::Admin),
                ]),
        ]
    }

    #[test]
    fn test_student_sees_journey_not_settings() {
        let filtered = filter_nav(&dashboard_tree(), &RoleSet::from(Role::Student));

        assert_eq!(labels(&filtered), vec!["Dashboard", "Pathways"]);
        assert_eq!(labels(&filtered[1].children), vec!["Journey"]);
    }

    #[test]
    fn test_denied_node_prunes_subtree() {
        let filtered = filter_nav(&dashboard_tree(), &RoleSet::from(Role::Viewer));
        assert_eq!(labels(&filtered), vec!["Dashboard"]);
    }

    #[test]
    fn test_empty_header_is_pruned() {
        let tree = vec![
            NavNode::section("Administration")
                .children([NavNode::link("Settings", "/portal/settings").min_role(Role::Admin)]),
        ];

        assert!(filter_nav(&tree, &RoleSet::from(Role::Viewer)).is_empty());
        assert_eq!(filter_nav(&tree, &RoleSet::from(Role::Admin)).len(), 1);
    }

    #[test]
    fn test_link_kept_without_children() {
        let tree = vec![
            NavNode::link("Events", "/portal/events")
                .min_role(Role::Member)
                .children([NavNode::link("Admin", "/portal/events/admin").min_role(Role::Admin)]),
        ];

        let filtered = filter_nav(&tree, &RoleSet::from(Role::Member));
        assert_eq!(labels(&filtered), vec!["Events"]);
        assert!(filtered[0].children.is_empty());
    }

    #[test]
    fn test_malformed_leaf_is_dropped() {
        let tree = vec![NavNode::section("Nothing"), NavNode::link("Home", "/")];
        assert_eq!(labels(&filter_nav(&tree, &RoleSet::empty())), vec!["Home"]);
    }

    #[test]
    fn test_order_preserved() {
        let tree = vec![
            NavNode::link("C", "/c"),
            NavNode::link("A", "/a").min_role(Role::Admin),
            NavNode::link("B", "/b"),
        ];
        assert_eq!(labels(&filter_nav(&tree, &RoleSet::from(Role::Admin))), vec!["C", "A", "B"]);
        assert_eq!(labels(&filter_nav(&tree, &RoleSet::from(Role::Member))), vec!["C", "B"]);
    }

    #[test]
    fn test_anonymous_sees_only_unrestricted() {
        let tree = vec![
            NavNode::link("Support", "/support"),
            NavNode::link("Dashboard", "/portal").min_role(Role::Viewer),
        ];
        assert_eq!(labels(&filter_for_subject(&tree, None)), vec!["Support"]);
    }

    #[test]
    fn test_multi_role_uses_highest() {
        let subject = Subject::new("1", [Role::Viewer, Role::Leader]);
        let tree = vec![NavNode::link("Programs", "/programs").min_role(Role::Leader)];
        assert_eq!(filter_for_subject(&tree, Some(&subject)).len(), 1);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"[
            {"label": "Pathways", "minRole": "student", "children": [
                {"label": "Journey", "href": "/j", "minRole": "student"}
            ]},
            {"label": "Blog", "href": "https://example.org", "external": true}
        ]"#;
        let tree: Vec<NavNode> = serde_json::from_str(json).unwrap();

        assert_eq!(tree[0].min_role, Some(Role::Student));
        assert_eq!(tree[0].children.len(), 1);
        assert!(tree[1].external);
        assert_eq!(tree[1].min_role, None);
    }

    #[test]
    fn test_unknown_min_role_rejected() {
        let json = r#"[{"label": "X", "href": "/x", "minRole": "owner"}]"#;
        assert!(serde_json::from_str::<Vec<NavNode>>(json).is_err());
    }
}
