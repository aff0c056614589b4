//! Integration tests for the rtdist CLI

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const ENV_VARS: [&str; 5] = [
    "RTDIST_CACHE",
    "RTDIST_STRICT_SSL",
    "RTDIST_DIST_DIR",
    "RTDIST_7ZA",
    "RTDIST_DEBUG_7Z",
];

fn rtdist(config: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rtdist"));
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG")
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("Failed to execute rtdist")
}

fn write_dist(root: &Path) {
    std::fs::create_dir_all(root.join("locales")).unwrap();
    std::fs::create_dir_all(root.join("resources")).unwrap();
    std::fs::write(root.join("electron"), "binary").unwrap();
    std::fs::write(root.join("resources/app.asar"), "asar").unwrap();
}

#[test]
fn test_cli_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_rtdist"))
        .arg("--version")
        .output()
        .expect("Failed to execute rtdist");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("rtdist"));
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_rtdist"))
        .arg("--help")
        .output()
        .expect("Failed to execute rtdist");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("unpack"));
}

#[test]
fn test_unpack_requires_version_and_out() {
    let output = Command::new(env!("CARGO_BIN_EXE_rtdist"))
        .arg("unpack")
        .output()
        .expect("Failed to execute rtdist");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--version"));
}

#[test]
fn test_unpack_copies_local_distribution() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    std::fs::write(&config, "[download]\nplatform = \"win32\"\n").unwrap();
    write_dist(&temp.path().join("dist"));
    let out = temp.path().join("out");

    let output = rtdist(
        &config,
        &[
            "unpack",
            "--platform",
            "linux",
            "--arch",
            "x64",
            "--version",
            "1.2.3",
            "--out",
            out.to_str().unwrap(),
            "--project-dir",
            temp.path().to_str().unwrap(),
            "--dist-dir",
            "dist",
        ],
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {stderr}");
    assert!(stderr.contains("\"download\" is deprecated, please use \"dist-download\" instead"));
    assert!(stderr.contains("download.platform will be inferred from the main options"));
    assert!(stderr.contains("Copying distribution from"));
    assert_eq!(
        std::fs::read_to_string(out.join("resources/app.asar")).unwrap(),
        "asar"
    );

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(out.join("locales"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o7777, 0o755);
    }
}

#[test]
fn test_unpack_json_reports_summary() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    std::fs::write(&config, "").unwrap();
    write_dist(&temp.path().join("dist"));
    let out = temp.path().join("out");

    let output = rtdist(
        &config,
        &[
            "--json",
            "unpack",
            "--platform",
            "win32",
            "--arch",
            "x64",
            "--version",
            "1.2.3",
            "--out",
            out.to_str().unwrap(),
            "--dist-dir",
            temp.path().join("dist").to_str().unwrap(),
        ],
    );

    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["variant"], "standard");
    assert_eq!(summary["version"], "1.2.3");
    assert!(output.stderr.is_empty());
}

#[test]
fn test_unpack_json_reports_bundle_source_for_darwin() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    std::fs::write(&config, "").unwrap();
    let dist = temp.path().join("dist");
    write_dist(&dist.join("App.app"));
    let out = temp.path().join("out");

    let output = rtdist(
        &config,
        &[
            "--json",
            "unpack",
            "--platform",
            "darwin",
            "--arch",
            "arm64",
            "--version",
            "1.2.3",
            "--out",
            out.to_str().unwrap(),
            "--dist-dir",
            dist.to_str().unwrap(),
            "--bundle-name",
            "App",
        ],
    );

    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        summary["copied_from"],
        dist.join("App.app").to_str().unwrap()
    );
    assert!(out.join("App.app/electron").is_file());
}

#[test]
fn test_unpack_missing_local_distribution_fails() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    std::fs::write(&config, "").unwrap();

    let output = rtdist(
        &config,
        &[
            "unpack",
            "--platform",
            "linux",
            "--version",
            "1.2.3",
            "--out",
            temp.path().join("out").to_str().unwrap(),
            "--dist-dir",
            temp.path().join("missing").to_str().unwrap(),
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Code: unpack.source_not_found"));
}

#[test]
fn test_unpack_rejects_prefixed_version() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    std::fs::write(&config, "").unwrap();

    let output = rtdist(
        &config,
        &["unpack", "--version", "v1.2.3", "--out", "out"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--version 1.2.3"));
}
