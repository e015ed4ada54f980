//! CLI argument parsing and command behavior tests.
//!
//! Every command runs offline against the built-in menu and view matrix.

#![allow(deprecated)] // Command::cargo_bin is deprecated but replacement requires newer assert_cmd

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fellowship() -> Command {
    let mut cmd = Command::cargo_bin("fellowship").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Basics
// ============================================================================

#[test]
fn version_command_succeeds() {
    fellowship()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fellowship"));
}

#[test]
fn help_flag_shows_usage() {
    fellowship()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("view authorization"));
}

#[test]
fn no_command_shows_help() {
    fellowship()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

// ============================================================================
// nav
// ============================================================================

#[test]
fn nav_for_viewer_shows_public_items_only() {
    fellowship()
        .args(["nav", "--roles", "viewer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dashboard"))
        .stdout(predicate::str::contains("Media"))
        .stdout(predicate::str::contains("Pathways").not())
        .stdout(predicate::str::contains("Giving").not());
}

#[test]
fn nav_for_student_hides_teaching_section() {
    fellowship()
        .args(["nav", "--roles", "student"])
        .assert()
        .success()
        .stdout(predicate::str::contains("My Journey"))
        .stdout(predicate::str::contains("Teaching").not())
        .stdout(predicate::str::contains("Mentors").not());
}

#[test]
fn nav_view_override_narrows_menu() {
    fellowship()
        .args(["nav", "--roles", "admin", "--view", "viewer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dashboard"))
        .stdout(predicate::str::contains("Pathways Settings").not());
}

#[test]
fn nav_illegal_override_falls_back_to_real_roles() {
    fellowship()
        .args(["nav", "--roles", "student", "--view", "admin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("My Journey"))
        .stdout(predicate::str::contains("Pathways Settings").not());
}

#[test]
fn nav_footer_json() {
    fellowship()
        .args(["nav", "--roles", "member", "--footer", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"label\": \"Privacy\""))
        .stdout(predicate::str::contains("\"minRole\": \"viewer\""));
}

#[test]
fn nav_from_tree_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nav.json");
    std::fs::write(
        &path,
        r#"[
            {"label": "Admin", "children": [
                {"label": "Settings", "href": "/settings", "minRole": "admin"}
            ]},
            {"label": "Home", "href": "/"}
        ]"#,
    )
    .unwrap();

    fellowship()
        .args(["nav", "--roles", "viewer", "--tree", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Home"))
        .stdout(predicate::str::contains("Admin").not());
}

#[test]
fn nav_rejects_unknown_role() {
    fellowship()
        .args(["nav", "--roles", "owner"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("owner"));
}

#[test]
fn nav_rejects_non_view_role_as_view() {
    fellowship()
        .args(["nav", "--roles", "admin", "--view", "staff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--view"));
}

// ============================================================================
// views
// ============================================================================

#[test]
fn views_union_for_multi_role_subject() {
    fellowship()
        .args(["views", "--roles", "instructor,staff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mentor"))
        .stdout(predicate::str::contains("member"))
        .stdout(predicate::str::contains("student"))
        .stdout(predicate::str::contains("viewer"))
        .stdout(predicate::str::contains("leader").not());
}

#[test]
fn views_switcher_hidden_for_viewer() {
    fellowship()
        .args(["views", "--roles", "viewer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Switcher: hidden"));
}

#[test]
fn views_reports_preview() {
    fellowship()
        .args(["views", "--roles", "admin", "--active", "member"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Preview:"));
}

#[test]
fn views_lateral_override_is_not_preview() {
    fellowship()
        .args(["views", "--roles", "member", "--active", "member"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Preview:").not());
}

#[test]
fn views_requires_roles() {
    fellowship()
        .arg("views")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

// ============================================================================
// check
// ============================================================================

#[test]
fn check_allows_instructor_lms_write() {
    fellowship()
        .args(["check", "lms-write", "--roles", "instructor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("allow"));
}

#[test]
fn check_denies_student_lms_write() {
    fellowship()
        .args(["check", "lms-write", "--roles", "student"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("deny"));
}

#[test]
fn check_admin_route_escape_hatch() {
    fellowship()
        .args([
            "check",
            "admin-only",
            "--roles",
            "viewer",
            "--path",
            "/portal/admin/users",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("allow"));
}

#[test]
fn check_anonymous_lms_read_denied() {
    fellowship()
        .args(["check", "lms-read", "--anonymous"])
        .assert()
        .code(1);
}

#[test]
fn check_anonymous_public_read_allowed() {
    fellowship()
        .args(["check", "public-read", "--anonymous"])
        .assert()
        .success();
}

#[test]
fn check_unknown_gate_fails() {
    fellowship()
        .args(["check", "superuser", "--roles", "admin"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("superuser"));
}

#[test]
fn check_unknown_role_is_an_error_not_a_deny() {
    fellowship()
        .args(["check", "lms-read", "--roles", "owner"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("deny").not());
}

#[test]
fn check_honors_configured_admin_prefix() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("fellowship.toml"),
        "[access]\nadmin_route_prefix = \"/staff\"\n",
    )
    .unwrap();

    fellowship()
        .current_dir(temp.path())
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path())
        .args(["check", "admin-only", "--roles", "viewer", "--path", "/portal/admin/users"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("deny"));
}

#[test]
fn check_with_invalid_config_fails_instead_of_allowing() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("fellowship.toml"),
        "[access]\nadmin_route_prefix = \"/staff\"\n\n[view]\nstorage_key = \"\"\n",
    )
    .unwrap();

    fellowship()
        .current_dir(temp.path())
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path())
        .args(["check", "admin-only", "--roles", "viewer", "--path", "/portal/admin/users"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("allow").not())
        .stderr(predicate::str::contains("storage_key must not be empty"));
}

#[test]
fn nav_with_invalid_config_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("fellowship.toml"), "[access\n").unwrap();

    fellowship()
        .current_dir(temp.path())
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path())
        .args(["nav", "--roles", "admin"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn check_requires_gate() {
    fellowship()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

// ============================================================================
// config
// ============================================================================

#[test]
fn config_show_json_defaults() {
    let temp = TempDir::new().unwrap();

    fellowship()
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path())
        .args(["config", "show", "--format", "json", "--project"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"storage_key\": \"fwc:view\""))
        .stdout(predicate::str::contains("/portal/admin"));
}

#[test]
fn config_show_reads_project_file() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("fellowship.toml"),
        "[portal]\nname = \"Grace Fellowship\"\n",
    )
    .unwrap();

    fellowship()
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path())
        .args(["config", "show", "--project"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Grace Fellowship"));
}

#[test]
fn config_validate_rejects_bad_prefix() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("fellowship.toml");
    std::fs::write(&path, "[access]\nadmin_route_prefix = \"admin\"\n").unwrap();

    fellowship()
        .args(["config", "validate", "--file", path.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("validation failed"));
}

#[test]
fn config_show_rejects_unknown_format() {
    fellowship()
        .args(["config", "show", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
