use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[allow(deprecated)]
fn samewindow(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("samewindow").expect("binary");
    cmd.current_dir(workdir).env_remove("SAMEWINDOW_CONFIG");
    cmd
}

#[test]
fn check_reports_blank_anchors_with_lines() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("page.html"),
        "<body>\n<a href=\"/a\" target=\"_blank\">a</a>\n<a href=\"/b\">b</a>\n\n<a href=\"/c\" target=\"_blank\">c</a>\n</body>\n",
    )
    .unwrap();

    samewindow(temp.path())
        .args(["check", "page.html"])
        .assert()
        .code(1)
        .stdout(
            "page.html:2: <a href=\"/a\" target=\"_blank\">\npage.html:5: <a href=\"/c\" target=\"_blank\">\n",
        );
}

#[test]
fn check_passes_after_rewrite() {
    let temp = tempdir().unwrap();
    fs::create_dir_all(temp.path().join("docs")).unwrap();
    fs::write(
        temp.path().join("docs/index.html"),
        "<a href=\"https://example.com\" target=\"_blank\">x</a>",
    )
    .unwrap();

    samewindow(temp.path())
        .args(["check", "docs"])
        .assert()
        .code(1);

    samewindow(temp.path())
        .args(["rewrite", "--in-place", "docs"])
        .assert()
        .success();

    samewindow(temp.path())
        .args(["check", "docs"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn check_json_report() {
    let temp = tempdir().unwrap();
    let output = samewindow(temp.path())
        .args(["check", "--json"])
        .write_stdin("<a target=\"_top\">x</a>\n<a target=\"_blank\">y</a>")
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));

    let report: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(report["files_scanned"], 1);
    assert_eq!(report["anchors_scanned"], 2);
    let findings = report["findings"].as_array().unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["path"], "<stdin>");
    assert_eq!(findings[0]["line"], 2);
    assert_eq!(findings[0]["markup"], "<a target=\"_blank\">");
}

#[test]
fn check_ignores_other_targets() {
    let temp = tempdir().unwrap();
    samewindow(temp.path())
        .arg("check")
        .write_stdin("<a target=\"_parent\">p</a><a target=\"_self\">s</a><a>n</a>")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
