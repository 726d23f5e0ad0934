//! Scenario: a site is published, edited, grown and pruned.
//!
//! 1. First converge builds bucket, distribution and policy
//! 2. A no-op run changes nothing
//! 3. A stylesheet edit invalidates its directory only
//! 4. A new page is uploaded and invalidated by exact path
//! 5. A removed image is deleted and its directory invalidated
//! 6. The distribution identity never changes along the way

use crate::common::*;

/// SCENARIO: A site evolves over five runs without rebuilding its front.
#[test]
fn scenario_site_evolves_without_rebuilding_its_front() {
    let env = TestEnv::builder().with_basic_site().build();

    // Step 1: first publish
    let first = env.run(&["--json", "converge"]);
    assert!(first.is_success(), "stderr:\n{}", first.stderr);
    let report = first.json_event("report")["report"].clone();
    assert_eq!(report["distribution_change"], "created");
    assert_eq!(report["policy_changed"], true);
    let distribution_id = report["distribution"]["id"].clone();

    // Step 2: nothing changed
    let idle = env.run(&["--json", "converge"]);
    assert_eq!(idle.json_event("complete")["status"], "converged");

    // Step 3: stylesheet edit
    env.write_site_file("css/style.css", "body { margin: 1rem; }");
    let styled = env.run(&["--json", "converge"]);
    let report = styled.json_event("report")["report"].clone();
    assert_eq!(report["uploaded"], serde_json::json!(["css/style.css"]));
    assert_eq!(report["invalidation"]["paths"], serde_json::json!(["/css/*"]));
    assert_eq!(report["policy_changed"], false);

    // Step 4: new page
    env.write_site_file("about.html", ABOUT_HTML);
    let grown = env.run(&["--json", "converge"]);
    let report = grown.json_event("report")["report"].clone();
    assert_eq!(report["uploaded"], serde_json::json!(["about.html"]));
    assert_eq!(report["invalidation"]["paths"], serde_json::json!(["/about.html"]));

    // Step 5: removed image
    env.remove_site_file("images/logo.png");
    let pruned = env.run(&["--json", "converge"]);
    let report = pruned.json_event("report")["report"].clone();
    assert_eq!(report["deleted"], serde_json::json!(["images/logo.png"]));
    assert_eq!(report["invalidation"]["paths"], serde_json::json!(["/images/*"]));

    // Step 6: same front throughout
    assert_eq!(report["distribution"]["id"], distribution_id);
    let status = env.run(&["--json", "status"]).json_event("status");
    assert_eq!(status["objects"], 3);
    assert_eq!(status["distribution"]["id"], distribution_id);
}
