//! CLI contract tests.

use std::path::Path;

use assert_cmd::Command;

fn linkgate(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("linkgate").expect("binary should build");
    cmd.arg("--config")
        .arg(data_dir.join("config.toml"))
        .arg("--data-dir")
        .arg(data_dir)
        .env("RUST_LOG", "off");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("command should run");
    assert!(output.status.success(), "command failed: {output:?}");
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn check_untrusted_domain_requires_confirmation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = stdout_of(linkgate(dir.path()).args(["check", "https://example.org/a"]));
    assert!(out.contains("confirm: example.org is not trusted"), "{out}");
}

#[test]
fn check_static_domain_is_allowed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = stdout_of(linkgate(dir.path()).args(["check", "https://github.com/rust-lang"]));
    assert!(out.contains("allowed: built-in trusted domain"), "{out}");
}

#[test]
fn check_relative_link_is_allowed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = stdout_of(linkgate(dir.path()).args(["check", "/docs/intro"]));
    assert!(out.contains("allowed: not an external link"), "{out}");
}

#[test]
fn no_warn_flag_disables_gate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = stdout_of(
        linkgate(dir.path()).args(["--no-warn", "check", "https://example.org/a"]),
    );
    assert!(out.contains("allowed: warning disabled"), "{out}");
}

#[test]
fn open_dismissed_does_not_trust_domain() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = stdout_of(
        linkgate(dir.path())
            .args(["open", "https://example.org/a"])
            .write_stdin("n\n"),
    );
    assert!(out.contains("cancelled"), "{out}");

    let listed = stdout_of(linkgate(dir.path()).arg("trusted"));
    assert!(!listed.contains("example.org"), "{listed}");
}

#[test]
fn trusted_lists_builtin_domains() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = stdout_of(linkgate(dir.path()).arg("trusted"));
    assert!(out.contains("built-in:"));
    assert!(out.contains("  github.com"));
    assert!(out.contains("remembered:"));
}

#[test]
fn init_writes_default_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = stdout_of(linkgate(dir.path()).arg("init"));
    assert!(out.contains("wrote"), "{out}");

    let written = std::fs::read_to_string(dir.path().join("config.toml")).expect("config");
    assert!(written.contains("jump_out_link_warn = true"));

    let again = stdout_of(linkgate(dir.path()).arg("init"));
    assert!(again.contains("already exists"), "{again}");
}

#[test]
fn no_warn_open_leaves_relative_href_alone() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = stdout_of(
        linkgate(dir.path()).args(["--no-warn", "open", "../../etc/passwd"]),
    );
    assert!(out.contains("allowed: not an external link"), "{out}");
    assert!(!out.contains("opened"), "{out}");
}

#[test]
fn open_relative_href_is_not_opened() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = stdout_of(linkgate(dir.path()).args(["open", "../x"]));
    assert!(out.contains("allowed: not an external link"), "{out}");
    assert!(!out.contains("opened"), "{out}");
}
