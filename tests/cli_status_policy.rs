mod common;

use common::*;

#[test]
fn status_before_any_run() {
    let env = TestEnv::builder().with_basic_site().build();

    let result = env.run(&["status"]);

    assert!(result.is_success(), "stderr:\n{}", result.stderr);
    assert_output_contains!(result, "never converged");
}

#[test]
fn status_reports_recorded_distribution() {
    let env = TestEnv::builder().with_basic_site().build();
    assert!(env.run(&["converge"]).is_success());

    let result = env.run(&["--json", "status"]);

    assert!(result.is_success(), "stderr:\n{}", result.stderr);
    let status = result.json_event("status");
    assert_eq!(status["bucket"], BUCKET);
    assert_eq!(status["objects"], 3);
    assert!(status["distribution"]["domain_name"]
        .as_str()
        .unwrap()
        .ends_with(".cloudfront.net"));
    assert_eq!(status["pending_invalidation"], serde_json::json!([]));
}

#[test]
fn policy_requires_a_recorded_distribution() {
    let env = TestEnv::builder().with_basic_site().build();

    let result = env.run(&["policy"]);

    assert!(!result.is_success());
    assert!(
        result.stderr.contains("no distribution recorded"),
        "{}",
        result.stderr
    );
}

#[test]
fn policy_grants_read_to_the_recorded_distribution_only() {
    let env = TestEnv::builder().with_basic_site().build();
    assert!(env.run(&["converge"]).is_success());
    let status = env.run(&["--json", "status"]).json_event("status");
    let arn = status["distribution"]["arn"].as_str().unwrap().to_string();

    let result = env.run(&["policy"]);

    assert!(result.is_success(), "stderr:\n{}", result.stderr);
    let policy: serde_json::Value = serde_json::from_str(&result.stdout).unwrap();
    let statement = &policy["Statement"][0];
    assert_eq!(statement["Effect"], "Allow");
    assert_eq!(statement["Action"], "s3:GetObject");
    assert_eq!(statement["Resource"], "arn:aws:s3:::my-site/*");
    assert_eq!(statement["Principal"]["Service"], "cloudfront.amazonaws.com");
    assert_eq!(statement["Condition"]["StringEquals"]["AWS:SourceArn"], arn);
}
