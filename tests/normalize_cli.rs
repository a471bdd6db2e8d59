use std::process::Command;

fn devpulse(args: &[&str]) -> std::process::Output {
    let dir = tempfile::tempdir().unwrap();
    Command::new(env!("CARGO_BIN_EXE_devpulse"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("GITHUB_TOKEN")
        .env_remove("GH_TOKEN")
        .output()
        .unwrap()
}

#[test]
fn normalize_prints_canonical_reference() {
    for input in [
        "vercel/next.js",
        "https://github.com/vercel/next.js",
        "https://github.com/vercel/next.js.git",
        "github.com/vercel/next.js/tree/canary?tab=readme#top",
        "  http://www.github.com/vercel/next.js/  ",
    ] {
        let output = devpulse(&["normalize", input]);
        assert!(
            output.status.success(),
            "{input}: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "vercel/next.js");
    }
}

#[test]
fn normalize_json_has_owner_and_name() {
    let output = devpulse(&["normalize", "tokio-rs/tokio", "--format", "json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["owner"], "tokio-rs");
    assert_eq!(value["name"], "tokio");
}

#[test]
fn normalize_rejects_invalid_references() {
    for input in ["vercel", "", "https://github.com/", "https://gitlab.com/a/b"] {
        let output = devpulse(&["normalize", input]);
        assert!(!output.status.success(), "{input:?} should be rejected");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("invalid repository reference"), "{stderr}");
    }
}

#[test]
fn metrics_rejects_invalid_reference_before_fetching() {
    let dir = tempfile::tempdir().unwrap();
    // An unroutable base would hang or fail with a data source error if contacted.
    std::fs::write(
        dir.path().join(".devpulse.toml"),
        "[github]\napi_base = \"http://127.0.0.1:9\"\n",
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_devpulse"))
        .args(["metrics", "not-a-repo"])
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid repository reference"), "{stderr}");
    assert!(!stderr.contains("GitHub API error"), "{stderr}");
}
