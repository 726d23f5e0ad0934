//! Scenario: a CI job previews and then applies a deploy.
//!
//! 1. `plan --json` is machine-readable and mutates nothing
//! 2. `converge --json --wait` applies and waits for the invalidation
//! 3. Every stdout line is one JSON event

use crate::common::*;

/// SCENARIO: Preview then apply from a pipeline using only JSON output.
#[test]
fn scenario_ci_previews_then_applies() {
    let env = TestEnv::builder()
        .with_config(
            "[bucket]\nname = \"my-site\"\n\n[invalidation]\npoll_interval_secs = 0\nwait_timeout_secs = 5\n",
        )
        .with_basic_site()
        .build();

    let plan = env.run_with_env(&["--json", "plan"], &[("CI", "true")]);
    assert!(plan.is_success(), "stderr:\n{}", plan.stderr);
    let document = plan.json_event("plan");
    assert_eq!(document["uploads"].as_array().unwrap().len(), 3);
    assert_eq!(document["create_bucket"], true);
    assert!(!env.path(".sitefront/state.toml").exists());

    let apply = env.run_with_env(&["--json", "converge", "--wait"], &[("CI", "true")]);
    assert!(apply.is_success(), "stderr:\n{}", apply.stderr);
    for line in apply.stdout.lines() {
        let event: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(event["event"].is_string(), "untagged line: {line}");
    }
    assert_eq!(apply.json_event("start")["asset_count"], 3);
    let report = apply.json_event("report")["report"].clone();
    assert_eq!(report["invalidation"]["status"], "submitted");
    assert_eq!(report["invalidation"]["completed"], true);
}
