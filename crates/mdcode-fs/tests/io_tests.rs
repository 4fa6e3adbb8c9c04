use mdcode_fs::{Error, io};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("test.txt");

    io::write_atomic(&path, b"hello world").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "hello world");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("test.txt");
    fs::write(&path, "original").unwrap();

    io::write_atomic(&path, b"updated").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "updated");
}

#[test]
fn test_write_atomic_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("src/nested/deep/main.rs");

    io::write_text(&path, "fn main() {}\n").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "fn main() {}\n");
}

#[test]
fn test_read_text_existing_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("test.txt");
    fs::write(&path, "hello\r\nworld\r\n").unwrap();

    assert_eq!(io::read_text(&path).unwrap(), "hello\r\nworld\r\n");
}

#[test]
fn test_read_text_nonexistent_file_carries_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing.txt");

    let err = io::read_text(&path).unwrap_err();
    assert!(err.is_not_found());
    match &err {
        Error::Io { path: reported, .. } => assert_eq!(reported, &path),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("missing.txt"));
}
