use std::path::Path;

use meddler_engine::{ensure_output_dir, AtomicFileWriter};
use pretty_assertions::assert_eq;

#[test]
fn writer_creates_nested_parent_directories() {
    let temp = tempfile::TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let target = writer
        .write(Path::new("content/posts/my-post/index.md"), "body")
        .unwrap();

    assert_eq!(std::fs::read_to_string(target).unwrap(), "body");
}

#[test]
fn writer_replaces_existing_files() {
    let temp = tempfile::TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    writer.write(Path::new("a.md"), "first").unwrap();
    let target = writer.write(Path::new("a.md"), "second").unwrap();

    assert_eq!(std::fs::read_to_string(target).unwrap(), "second");
}

#[test]
fn ensure_output_dir_accepts_existing_and_creates_missing() {
    let temp = tempfile::TempDir::new().unwrap();
    ensure_output_dir(temp.path()).unwrap();

    let nested = temp.path().join("x/y");
    ensure_output_dir(&nested).unwrap();
    assert!(nested.is_dir());
}

#[test]
fn ensure_output_dir_rejects_files() {
    let temp = tempfile::TempDir::new().unwrap();
    let file = temp.path().join("f");
    std::fs::write(&file, "x").unwrap();
    assert!(ensure_output_dir(&file).is_err());
}
