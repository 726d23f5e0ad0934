mod common;

use common::*;

#[test]
fn first_converge_publishes_and_fronts_the_site() {
    let env = TestEnv::builder().with_basic_site().build();

    let result = env.run(&["converge"]);

    assert!(result.is_success(), "stderr:\n{}", result.stderr);
    assert_output_contains!(result, "Converged with");
    assert_output_contains!(result, "3 files uploaded");
    assert_output_contains!(result, ".cloudfront.net");

    let state = env.state_toml();
    assert!(state.contains("[objects.\"index.html\"]"));
    assert!(state.contains("[objects.\"images/logo.png\"]"));
    assert!(state.contains("bucket = \"my-site\""));
}

#[test]
fn second_converge_changes_nothing() {
    let env = TestEnv::builder().with_basic_site().build();
    assert!(env.run(&["converge"]).is_success());

    let result = env.run(&["--json", "converge"]);

    assert!(result.is_success(), "stderr:\n{}", result.stderr);
    let complete = result.json_event("complete");
    assert_eq!(complete["status"], "converged");
    let report = result.json_event("report");
    assert_eq!(report["report"]["mutations"], serde_json::json!([]));
    assert!(report["report"]["invalidation"].is_null());
    assert_eq!(report["report"]["unchanged"].as_array().unwrap().len(), 3);
}

#[test]
fn first_converge_invalidates_each_scope_once() {
    let env = TestEnv::builder().with_basic_site().build();

    let result = env.run(&["--json", "converge"]);

    assert!(result.is_success(), "stderr:\n{}", result.stderr);
    let submitted = result.json_event("invalidation_submitted");
    assert_eq!(
        submitted["paths"],
        serde_json::json!(["/css/*", "/images/*", "/index.html"])
    );
}

#[test]
fn edited_document_invalidates_only_its_path() {
    let env = TestEnv::builder().with_basic_site().build();
    assert!(env.run(&["converge"]).is_success());

    env.write_site_file("index.html", "<h1>Changed</h1>");
    let result = env.run(&["--json", "converge"]);

    assert!(result.is_success(), "stderr:\n{}", result.stderr);
    let report = result.json_event("report")["report"].clone();
    assert_eq!(report["uploaded"], serde_json::json!(["index.html"]));
    assert_eq!(report["invalidation"]["paths"], serde_json::json!(["/index.html"]));
    assert_eq!(report["distribution_change"], "unchanged");
}

#[test]
fn removed_file_is_deleted_remotely() {
    let env = TestEnv::builder().with_basic_site().build();
    assert!(env.run(&["converge"]).is_success());

    env.remove_site_file("css/style.css");
    let result = env.run(&["--json", "converge"]);

    assert!(result.is_success(), "stderr:\n{}", result.stderr);
    let report = result.json_event("report")["report"].clone();
    assert_eq!(report["deleted"], serde_json::json!(["css/style.css"]));
    assert_eq!(report["invalidation"]["paths"], serde_json::json!(["/css/*"]));
    assert!(!env.state_toml().contains("css/style.css"));
}

#[test]
fn dry_run_leaves_no_state_behind() {
    let env = TestEnv::builder().with_basic_site().build();

    let result = env.run(&["converge", "--dry-run"]);

    assert!(result.is_success(), "stderr:\n{}", result.stderr);
    assert_output_contains!(result, "Dry run:");
    assert!(!env.path(".sitefront/state.toml").exists());

    let after = env.run(&["--json", "converge"]);
    assert_eq!(
        after.json_event("report")["report"]["uploaded"]
            .as_array()
            .unwrap()
            .len(),
        3
    );
}

#[test]
fn missing_source_directory_fails_with_a_hint() {
    let env = TestEnv::builder().build();

    let result = env.run(&["converge"]);

    assert!(!result.is_success());
    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("directory not found"), "{}", result.stderr);
    assert!(result.stderr.contains("Fix:"), "{}", result.stderr);
    assert!(!env.path(".sitefront/cloud").exists());
}

#[test]
fn missing_bucket_name_is_a_config_error() {
    let env = TestEnv::builder()
        .with_config("[site]\nsource = \"public\"\n")
        .with_basic_site()
        .build();

    let result = env.run(&["converge"]);

    assert!(!result.is_success());
    assert!(result.stderr.contains("bucket.name"), "{}", result.stderr);
}

#[test]
fn bucket_can_come_from_the_environment() {
    let env = TestEnv::builder().without_config().with_basic_site().build();

    let result = env.run_with_env(&["converge"], &[("SITEFRONT_BUCKET", "env-site")]);

    assert!(result.is_success(), "stderr:\n{}", result.stderr);
    assert!(env.state_toml().contains("bucket = \"env-site\""));
}

#[test]
fn json_errors_are_reported_as_events() {
    let env = TestEnv::builder().build();

    let result = env.run(&["--json", "converge"]);

    assert!(!result.is_success());
    let error = result.json_event("error");
    assert!(error["message"]
        .as_str()
        .unwrap()
        .contains("cannot read asset"));
}
