//! Command line behaviour of the `kodegen_bundler_assets` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::{fs, path::Path};

fn bin() -> Command {
    let mut cmd = Command::cargo_bin("kodegen_bundler_assets").unwrap();
    cmd.env_remove("KODEGEN_ASSETS_CONFIG");
    cmd
}

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn prints_artifact_name() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "assets/js/1.js", "alert(1);");

    let output = bin()
        .current_dir(dir.path())
        .args(["--dist", "dist", "--resource-root", "assets", "js/*.js"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^jsbuild-[0-9a-f]{40}\.js\n$").unwrap())
        .get_output()
        .stdout
        .clone();

    let name = String::from_utf8(output).unwrap();
    let built = fs::read_to_string(dir.path().join("dist").join(name.trim())).unwrap();
    assert_eq!(built, "alert(1);");
}

#[test]
fn link_prints_stylesheet_tag() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "css/site.css", "body{}");

    bin()
        .current_dir(dir.path())
        .args(["-k", "css", "-d", "out", "-u", "/static/", "--link", "css/site.css"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            r#"<link rel="stylesheet" type="text/css" href="/static/cssbuild-"#,
        ))
        .stdout(predicate::str::contains(r#".css" />"#));
}

#[test]
fn unreadable_source_fails_and_names_it() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.js", "a();");
    // Matches the pattern but cannot be read as a file.
    fs::create_dir_all(dir.path().join("broken.js")).unwrap();
    write(dir.path(), "list.txt", "a.js\nbroken.js\n");

    bin()
        .current_dir(dir.path())
        .args(["-d", "dist", "--file-list", "list.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("broken.js"))
        .stdout(predicate::str::is_empty());

    let leftovers: Vec<_> = fs::read_dir(dir.path().join("dist"))
        .map(|d| d.flatten().collect())
        .unwrap_or_default();
    assert!(leftovers.is_empty());
}

#[test]
fn missing_dist_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    bin()
        .current_dir(dir.path())
        .arg("a.js")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--dist"));
}

#[test]
fn config_file_supplies_defaults() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "site/assets/1.js", "one();");
    write(
        dir.path(),
        "site/assets.toml",
        "[bundle]\ndist_root = \"public\"\nresource_root = \"assets\"\nurl_base = \"/s\"\n",
    );

    bin()
        .current_dir(dir.path())
        .args(["--config", "site/assets.toml", "--link", "1.js"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            r#"<script type="text/javascript" src="/s/jsbuild-"#,
        ));

    let published: Vec<_> = fs::read_dir(dir.path().join("site/public"))
        .unwrap()
        .flatten()
        .collect();
    assert_eq!(published.len(), 1);
}

#[cfg(unix)]
#[test]
fn transform_command_rewrites_sources() {
    if which::which("tr").is_err() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.js", "abc");

    let output = bin()
        .current_dir(dir.path())
        .args(["-d", "dist", "-t", "tr a-z A-Z", "a.js"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let name = String::from_utf8(output).unwrap();
    assert_eq!(
        fs::read_to_string(dir.path().join("dist").join(name.trim())).unwrap(),
        "ABC"
    );
}
