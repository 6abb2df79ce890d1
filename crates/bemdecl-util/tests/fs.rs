use bemdecl_util::fs::{ensure_dir, find_ancestor_with, write_atomic};
use tempfile::TempDir;

#[test]
fn test_find_ancestor_with_direct() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("bemdecl.toml"), "").unwrap();
    let result = find_ancestor_with(tmp.path(), "bemdecl.toml");
    assert_eq!(result, Some(tmp.path().to_path_buf()));
}

#[test]
fn test_find_ancestor_with_nested() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("bemdecl.toml"), "").unwrap();
    let nested = tmp.path().join("bundles").join("index");
    std::fs::create_dir_all(&nested).unwrap();
    let result = find_ancestor_with(&nested, "bemdecl.toml");
    assert_eq!(result, Some(tmp.path().to_path_buf()));
}

#[test]
fn test_find_ancestor_with_not_found() {
    let tmp = TempDir::new().unwrap();
    let result = find_ancestor_with(tmp.path(), "NonExistent.file");
    assert_eq!(result, None);
}

#[test]
fn test_ensure_dir_creates_nested() {
    let tmp = TempDir::new().unwrap();
    let deep = tmp.path().join("x").join("y").join("z");
    assert!(!deep.exists());
    ensure_dir(&deep).unwrap();
    assert!(deep.is_dir());
}

#[test]
fn test_write_atomic_creates_parent_and_replaces() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("bundle").join("index.deps.json");
    write_atomic(&target, "first").unwrap();
    write_atomic(&target, "second").unwrap();
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "second");
}
