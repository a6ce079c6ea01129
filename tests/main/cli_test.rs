//! Runs the `wren` binary against an isolated home and working directory.

use std::fs;

use assert_cmd::Command;
use tempfile::TempDir;

const CODE_QUESTION: &str = "How do I fix this Python error?";

fn wren(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("wren").expect("binary should build");
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env_remove("OPENROUTER_API_URL")
        .env_remove("OPENROUTER_API_KEY")
        .env_remove("SITE_URL")
        .env_remove("SITE_NAME")
        .env_remove("PORT");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).expect("utf-8 stdout")
}

fn stderr_of_failure(cmd: &mut Command) -> String {
    let output = cmd.assert().failure().get_output().stderr.clone();
    String::from_utf8(output).expect("utf-8 stderr")
}

#[test]
fn classify_reports_code_route() {
    let home = TempDir::new().expect("tempdir");
    let out = stdout_of(wren(&home).args(["classify", CODE_QUESTION]));

    assert!(out.contains("category:    code"), "{out}");
    assert!(out.contains("qwen/qwen3-14b:free"), "{out}");
    assert!(out.contains("#e74c3c"), "{out}");
    assert!(out.contains("style:       questioned"), "{out}");
}

#[test]
fn classify_with_attachment_routes_multimodal() {
    let home = TempDir::new().expect("tempdir");
    let out = stdout_of(wren(&home).args(["classify", "--attachment", "what is this"]));

    assert!(out.contains("category:    multimodal"), "{out}");
}

#[test]
fn config_file_overrides_backend_model() {
    let home = TempDir::new().expect("tempdir");
    let config = home.path().join("wren.toml");
    fs::write(&config, "[models]\ncode = \"example/coder:free\"\n").expect("write config");

    let out = stdout_of(wren(&home).args([
        "--config",
        config.to_str().expect("utf-8 path"),
        "classify",
        "debug this function",
    ]));

    assert!(out.contains("example/coder:free"), "{out}");
}

#[test]
fn dotenv_in_working_dir_feeds_config_overrides() {
    let home = TempDir::new().expect("tempdir");
    fs::write(home.path().join(".env"), "OPENROUTER_API_URL=ftp://x\n").expect("write .env");

    let err = stderr_of_failure(wren(&home).args(["classify", CODE_QUESTION]));

    assert!(err.contains("http or https"), "{err}");
}

#[cfg(unix)]
#[test]
fn env_file_entries_feed_config_overrides() {
    use std::os::unix::fs::PermissionsExt;

    let home = TempDir::new().expect("tempdir");
    let env_file = home.path().join("wren.env");
    fs::write(&env_file, "OPENROUTER_API_URL=ftp://x\n").expect("write env file");
    fs::set_permissions(&env_file, fs::Permissions::from_mode(0o600)).expect("chmod");

    let err = stderr_of_failure(wren(&home).args([
        "--env-file",
        env_file.to_str().expect("utf-8 path"),
        "classify",
        CODE_QUESTION,
    ]));

    assert!(err.contains("http or https"), "{err}");
}

#[test]
fn time_mentions_dhaka() {
    let home = TempDir::new().expect("tempdir");
    let out = stdout_of(wren(&home).arg("time"));

    assert!(out.contains("Current time in Dhaka, Bangladesh:"), "{out}");
    assert!(out.contains("in Dhaka."), "{out}");
}
