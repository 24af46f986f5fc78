#![allow(deprecated)]
use assert_cmd::Command;
use mockito::{Matcher, Server, ServerGuard};
use predicates::prelude::*;
use serde_json::json;

fn github_standards() -> Command {
    let mut cmd = Command::cargo_bin("github-standards").unwrap();
    cmd.env_remove("GH_TOKEN")
        .env_remove("GH_ORG")
        .env_remove("GITHUB_API_URL")
        .env_remove("GH_STANDARDS_LOG_FORMAT")
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .env("RUST_LOG", "warn");
    cmd
}

fn against(server: &ServerGuard) -> Command {
    let mut cmd = github_standards();
    cmd.env("GH_TOKEN", "t0ken")
        .env("GITHUB_API_URL", server.url())
        .args(["--org", "acme"]);
    cmd
}

/// `widgets` opted in, with `has_projects` switched on and a compliant `main`.
fn mock_drifting_widgets(server: &mut ServerGuard) {
    server
        .mock("GET", "/repos/acme/widgets")
        .with_status(200)
        .with_body(
            json!({
                "name": "widgets",
                "default_branch": "main",
                "archived": false,
                "allow_auto_merge": false,
                "allow_merge_commit": true,
                "allow_rebase_merge": false,
                "allow_squash_merge": true,
                "allow_update_branch": true,
                "delete_branch_on_merge": true,
                "has_discussions": true,
                "has_issues": true,
                "has_projects": true,
                "has_wiki": false,
                "web_commit_signoff_required": true,
                "custom_properties": {"Auto-Apply-Standards": "true"}
            })
            .to_string(),
        )
        .create();
    server
        .mock("GET", "/repos/acme/widgets/branches/main")
        .with_status(200)
        .with_body(r#"{"name":"main"}"#)
        .create();
    server
        .mock("GET", "/repos/acme/widgets/branches/main/protection")
        .with_status(200)
        .with_body(
            json!({
                "allow_deletions": {"enabled": false},
                "allow_force_pushes": {"enabled": false}
            })
            .to_string(),
        )
        .create();
    server
        .mock(
            "GET",
            "/repos/acme/widgets/branches/main/protection/required_pull_request_reviews",
        )
        .with_status(200)
        .with_body(
            json!({
                "require_code_owner_reviews": true,
                "required_approving_review_count": 1
            })
            .to_string(),
        )
        .create();
    server
        .mock(
            "GET",
            "/repos/acme/widgets/branches/main/protection/required_signatures",
        )
        .with_status(200)
        .with_body(r#"{"enabled":true}"#)
        .create();
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn missing_token_exits_with_status_one() {
    github_standards()
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "GH_TOKEN environment variable not set.",
        ));
}

#[test]
fn blank_token_is_treated_as_missing() {
    github_standards()
        .env("GH_TOKEN", "")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("GH_TOKEN"));
}

#[test]
fn help_lists_the_main_flags() {
    github_standards()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--apply"))
        .stdout(predicate::str::contains("--repo"))
        .stdout(predicate::str::contains("--fail-on-drift"));
}

#[test]
fn invalid_api_url_fails() {
    github_standards()
        .env("GH_TOKEN", "t0ken")
        .args(["--api-url", "not a url", "--repo", "widgets"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid API base URL"));
}

// ---------------------------------------------------------------------------
// Runs against a mocked API
// ---------------------------------------------------------------------------

#[test]
fn report_only_run_prints_drift_without_writing() {
    let mut server = Server::new();
    mock_drifting_widgets(&mut server);
    let patch = server
        .mock("PATCH", "/repos/acme/widgets")
        .expect(0)
        .create();

    against(&server)
        .args(["--repo", "widgets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("widgets: drift"))
        .stdout(predicate::str::contains("repository: has_projects"))
        .stdout(predicate::str::contains("1 checked, 1 drifted, 0 compliant"));

    patch.assert();
}

#[test]
fn fail_on_drift_exits_with_status_two_and_json_report() {
    let mut server = Server::new();
    mock_drifting_widgets(&mut server);

    let assert = against(&server)
        .args(["--repo", "widgets", "--json", "--fail-on-drift"])
        .assert()
        .code(2);

    let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["mode"], "report_only");
    assert_eq!(report["outcomes"][0]["status"], "checked");
    assert_eq!(report["outcomes"][0]["repository_drift"], json!(["has_projects"]));
    assert_eq!(report["outcomes"][0]["branch_drift"], json!([]));
}

#[test]
fn apply_patches_the_drifting_repository() {
    let mut server = Server::new();
    mock_drifting_widgets(&mut server);
    let patch = server
        .mock("PATCH", "/repos/acme/widgets")
        .match_body(Matcher::PartialJson(json!({"has_projects": false})))
        .with_status(200)
        .with_body("{}")
        .create();

    against(&server)
        .args(["--repo", "widgets", "--apply"])
        .assert()
        .success()
        .stdout(predicate::str::contains("widgets: fixed"));

    patch.assert();
}

#[test]
fn organization_listing_skips_excluded_repositories() {
    let mut server = Server::new();
    server
        .mock("GET", "/orgs/acme/repos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!([{"name": ".github"}]).to_string())
        .create();
    let read = server
        .mock("GET", "/repos/acme/.github")
        .expect(0)
        .create();

    against(&server)
        .assert()
        .success()
        .stdout(predicate::str::contains(".github: excluded"));

    read.assert();
}

#[test]
fn api_failure_exits_with_status_one() {
    let mut server = Server::new();
    server
        .mock("GET", "/repos/acme/widgets")
        .with_status(403)
        .with_body(r#"{"message":"Resource not accessible by integration"}"#)
        .create();

    against(&server)
        .args(["--repo", "widgets"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Resource not accessible by integration",
        ));
}
