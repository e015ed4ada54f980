//! The portal's declared navigation trees.

use crate::navigation::NavNode;
use crate::roles::Role;

/// Main sidebar navigation.
pub fn main_nav() -> Vec<NavNode> {
    vec![
        NavNode::link("Dashboard", "/portal")
            .icon("book-open")
            .min_role(Role::Viewer),
        NavNode::link("Events", "/portal/events")
            .icon("calendar")
            .min_role(Role::Member),
        pathways(),
        NavNode::link("Media", "/portal/media")
            .icon("play")
            .min_role(Role::Viewer),
        NavNode::link("Community", "/portal/community")
            .icon("message-square")
            .min_role(Role::Member),
        NavNode::link("Giving", "/portal/giving")
            .icon("heart")
            .min_role(Role::Member),
    ]
}

/// Footer links. Every signed-in subject sees all of them.
pub fn footer_nav() -> Vec<NavNode> {
    vec![
        NavNode::link("Support", "/support").min_role(Role::Viewer),
        NavNode::link("Terms", "/terms").min_role(Role::Viewer),
        NavNode::link("Privacy", "/privacy").min_role(Role::Viewer),
    ]
}

fn pathways() -> NavNode {
    let item = |label: &str, path: &str, icon: &str, role: Role| {
        NavNode::link(label, format!("/portal/pathways/{path}"))
            .icon(icon)
            .min_role(role)
    };

    NavNode::link("Pathways", "/portal/pathways")
        .icon("map")
        .min_role(Role::Student)
        .children([
            NavNode::section("Overview").min_role(Role::Student).children([
                item("My Journey", "journey", "trending-up", Role::Student),
                item("Progress", "progress", "trending-up", Role::Student),
                item("Journal", "journal", "book-open", Role::Student),
            ]),
            NavNode::section("Learning").min_role(Role::Student).children([
                item("My Courses", "courses", "graduation-cap", Role::Student),
                item("Modules & Lessons", "lessons", "layers", Role::Student),
                item("Weekly Experiences", "weeks", "calendar", Role::Student),
            ]),
            NavNode::section("Formation").min_role(Role::Student).children([
                item("Formation Practices", "practices", "pen-tool", Role::Student),
                item("Assessments", "assessments", "check-square", Role::Student),
                item("Assignments", "assignments", "clipboard-list", Role::Student),
            ]),
            NavNode::section("Community").min_role(Role::Student).children([
                item("My Cohort", "cohort", "users", Role::Student),
                item("Mentors", "mentors", "users", Role::Mentor),
            ]),
            NavNode::section("Teaching").min_role(Role::Instructor).children([
                item("My Courses", "instructor/courses", "graduation-cap", Role::Instructor),
                item("Submissions", "instructor/submissions", "clipboard-list", Role::Instructor),
                item("Sessions & Attendance", "instructor/sessions", "calendar", Role::Instructor),
            ]),
            NavNode::section("Administration").min_role(Role::Leader).children([
                item("Programs & Phases", "programs", "layers", Role::Leader),
                item("Enrollments", "enrollments", "clipboard-list", Role::Staff),
                item("Notifications", "notifications", "bell", Role::Staff),
                item("Pathways Settings", "settings", "settings", Role::Admin),
            ]),
        ])
}
