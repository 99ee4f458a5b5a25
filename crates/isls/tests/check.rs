use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

fn isls_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_isls"))
}

const IMG_SOURCE: &str = "<div>\n  <img src=\"logo.png\">\n</div>\n";

const IMG_EVENTS: &str = r#"[
    {"kind": "tag-start", "tag_name": "div", "line": 1, "col": 1, "raw": "<div>"},
    {"kind": "tag-start", "tag_name": "img", "line": 2, "col": 3,
     "attrs": [{"name": "src", "value": "logo.png", "offset": 5}],
     "raw": "<img src=\"logo.png\">"},
    {"kind": "tag-end", "tag_name": "div", "line": 3, "col": 1, "raw": "</div>"}
]"#;

fn setup_template(dir: &Path) {
    let templates = dir.join("templates");
    std::fs::create_dir_all(&templates).unwrap();
    std::fs::write(templates.join("home.isml"), IMG_SOURCE).unwrap();
    std::fs::write(dir.join("home.events.json"), IMG_EVENTS).unwrap();
}

fn run_check(dir: &Path, extra: &[&str]) -> Output {
    Command::new(isls_binary())
        .arg("check")
        .args(extra)
        .args(["templates/home.isml", "--events", "home.events.json"])
        .current_dir(dir)
        .output()
        .unwrap()
}

#[test]
fn check_missing_alt_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    setup_template(dir.path());

    let output = run_check(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("error[tags-check]"),
        "Expected tags-check code in output:\n{stdout}"
    );
    assert!(
        stdout.contains("The <img> tag must have attr 'alt'."),
        "Expected missing alt message in output:\n{stdout}"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Found 1 error."), "stderr:\n{stderr}");
}

#[test]
fn check_rule_file_disables_rule() {
    let dir = tempfile::tempdir().unwrap();
    setup_template(dir.path());
    std::fs::write(
        dir.path().join("templates/.htmlhintrc"),
        "{\n  // handled elsewhere\n  \"tags-check\": false\n}\n",
    )
    .unwrap();

    let output = run_check(dir.path(), &[]);

    assert!(
        output.status.success(),
        "Expected exit 0, got {:?}\nstdout: {}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr),
    );
}

#[test]
fn check_config_flag_overrides_discovery() {
    let dir = tempfile::tempdir().unwrap();
    setup_template(dir.path());
    std::fs::write(
        dir.path().join("templates/.htmlhintrc"),
        r#"{ "tags-check": false }"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("rules.json"),
        r#"{ "tags-check": true, "max-length": 2 }"#,
    )
    .unwrap();

    let output = run_check(dir.path(), &["--config", "rules.json"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("error[tags-check]"), "stdout:\n{stdout}");
    assert!(stdout.contains("error[max-length]"), "stdout:\n{stdout}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Found 2 errors."), "stderr:\n{stderr}");
}

#[test]
fn check_quiet_prints_only_summary() {
    let dir = tempfile::tempdir().unwrap();
    setup_template(dir.path());

    let output = run_check(dir.path(), &["--quiet"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Found 1 error."), "stderr:\n{stderr}");
}

#[test]
fn check_disabled_in_settings_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    setup_template(dir.path());
    std::fs::write(dir.path().join("isls.toml"), "enabled = false\n").unwrap();

    let output = run_check(dir.path(), &[]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn check_malformed_events_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    setup_template(dir.path());
    let truncated = "[{\"kind\": \"tag-start\"";
    std::fs::write(dir.path().join("home.events.json"), truncated).unwrap();

    let output = run_check(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to parse events"),
        "stderr:\n{stderr}"
    );
}
