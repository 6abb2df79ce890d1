use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[allow(deprecated)]
fn bemdecl_cmd() -> Command {
    Command::cargo_bin("bemdecl").unwrap()
}

fn read_json(path: &std::path::Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn bundle(tmp: &TempDir, name: &str) -> std::path::PathBuf {
    let dir = tmp.path().join(name);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_merge_writes_bundle_target() {
    let tmp = TempDir::new().unwrap();
    let dir = bundle(&tmp, "common");
    fs::write(dir.join("a.bemdecl.json"), r#"[{"name": "header"}]"#).unwrap();
    fs::write(dir.join("b.bemdecl.json"), r#"[{"name": "footer"}, {"name": "header"}]"#).unwrap();

    bemdecl_cmd()
        .current_dir(&dir)
        .args(["merge", "a.bemdecl.json", "b.bemdecl.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("common.bemdecl.json (2 entities)"));

    assert_eq!(
        read_json(&dir.join("common.bemdecl.json")),
        serde_json::json!({"blocks": [{"name": "header"}, {"name": "footer"}]})
    );
}

#[test]
fn test_intersect_with_bundle_flag() {
    let tmp = TempDir::new().unwrap();
    let dir = bundle(&tmp, "shared");
    fs::write(dir.join("a.json"), r#"[{"name": "x"}, {"name": "y"}]"#).unwrap();
    fs::write(dir.join("b.json"), r#"{"deps": [{"block": "y"}]}"#).unwrap();

    bemdecl_cmd()
        .args(["-C", dir.to_str().unwrap(), "intersect", "a.json", "b.json", "--format", "deps", "--compact"])
        .assert()
        .success();

    let written = fs::read_to_string(dir.join("shared.deps.json")).unwrap();
    assert_eq!(written, "{\"deps\":[{\"block\":\"y\"}]}\n");
}

#[test]
fn test_subtract() {
    let tmp = TempDir::new().unwrap();
    let dir = bundle(&tmp, "rest");
    fs::write(dir.join("from.json"), r#"[{"name": "block-1"}, {"name": "block-2"}]"#).unwrap();
    fs::write(dir.join("what.json"), r#"[{"name": "block-2"}]"#).unwrap();

    bemdecl_cmd()
        .current_dir(&dir)
        .args(["subtract", "--from", "from.json", "--what", "what.json", "-o", "out.json"])
        .assert()
        .success();

    assert_eq!(
        read_json(&dir.join("out.json")),
        serde_json::json!({"blocks": [{"name": "block-1"}]})
    );
}

#[test]
fn test_config_sets_output_format() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("bemdecl.toml"), "[output]\nformat = \"deps\"\n").unwrap();
    let dir = bundle(&tmp, "page");
    fs::write(dir.join("a.json"), r#"[{"name": "b", "elems": [{"name": "e"}]}]"#).unwrap();

    bemdecl_cmd()
        .current_dir(&dir)
        .args(["merge", "a.json"])
        .assert()
        .success();

    assert_eq!(
        read_json(&dir.join("page.deps.json")),
        serde_json::json!({"deps": [{"block": "b"}, {"block": "b", "elem": "e"}]})
    );
}

#[test]
fn test_missing_source_fails() {
    let tmp = TempDir::new().unwrap();
    let dir = bundle(&tmp, "page");

    bemdecl_cmd()
        .current_dir(&dir)
        .args(["merge", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn test_malformed_declaration_fails() {
    let tmp = TempDir::new().unwrap();
    let dir = bundle(&tmp, "page");
    fs::write(dir.join("a.json"), r#"[{"name": "bad name"}]"#).unwrap();

    bemdecl_cmd()
        .current_dir(&dir)
        .args(["merge", "a.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed"));
}
