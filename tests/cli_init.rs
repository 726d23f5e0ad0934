mod common;

use common::*;

#[test]
fn init_writes_a_usable_config() {
    let env = TestEnv::builder().without_config().with_basic_site().build();

    let result = env.run(&["init", "--bucket", "fresh-site"]);

    assert!(result.is_success(), "stderr:\n{}", result.stderr);
    let config = env.read_file("site.toml");
    assert!(config.contains("name = \"fresh-site\""));

    let converge = env.run(&["converge"]);
    assert!(converge.is_success(), "stderr:\n{}", converge.stderr);
    assert!(!converge.stderr.contains("Unknown config key"));
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let env = TestEnv::builder().build();
    let before = env.read_file("site.toml");

    let result = env.run(&["init"]);

    assert!(!result.is_success());
    assert!(result.stderr.contains("already exists"), "{}", result.stderr);
    assert_eq!(env.read_file("site.toml"), before);

    let forced = env.run(&["init", "--force", "--bucket", "other-site"]);
    assert!(forced.is_success(), "stderr:\n{}", forced.stderr);
    assert!(env.read_file("site.toml").contains("name = \"other-site\""));
}

#[test]
fn init_rejects_an_invalid_bucket_name() {
    let env = TestEnv::builder().without_config().build();

    let result = env.run(&["init", "--bucket", "Not_A_Bucket"]);

    assert!(!result.is_success());
    assert!(!env.path("site.toml").exists());
}

#[test]
fn init_honours_the_config_flag() {
    let env = TestEnv::builder().without_config().build();

    let result = env.run(&["--config", "deploy/site.toml", "init", "--bucket", "my-site"]);

    assert!(result.is_success(), "stderr:\n{}", result.stderr);
    assert!(env.path("deploy/site.toml").exists());
}
