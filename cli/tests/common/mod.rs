//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A test fixture with one source root and several destination roots.
pub struct TestFixture {
    pub src: TempDir,
    pub dsts: Vec<TempDir>,
}

impl TestFixture {
    /// Create a fixture with `destinations` fresh destination directories.
    pub fn new(destinations: usize) -> Self {
        Self {
            src: TempDir::new().expect("Failed to create temp source dir"),
            dsts: (0..destinations)
                .map(|_| TempDir::new().expect("Failed to create temp dest dir"))
                .collect(),
        }
    }

    /// Write an item under the source root, creating parent directories.
    pub fn create_item(&self, relative: &str, content: &str) {
        let path = self.src.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create directory");
        }
        fs::write(path, content).expect("Failed to write file");
    }

    /// `local://` URI of the source root.
    pub fn src_uri(&self) -> String {
        local_uri(self.src.path())
    }

    /// `local://` URIs of every destination root.
    pub fn dst_uris(&self) -> Vec<String> {
        self.dsts.iter().map(|d| local_uri(d.path())).collect()
    }

    /// Create a destination directory with a specific name and return it.
    pub fn named_dst(&self, name: &str) -> std::path::PathBuf {
        let path = self.dsts[0].path().join(name);
        fs::create_dir(&path).expect("Failed to create named destination");
        path
    }

    /// Check that every destination holds `relative` with `expected` content.
    pub fn assert_replicated(&self, relative: &str, expected: &str) {
        for dst in &self.dsts {
            assert_file_content(&dst.path().join(relative), expected);
        }
    }
}

/// Percent-encoded `local://` URI for a directory.
pub fn local_uri(path: &Path) -> String {
    let file_url = url::Url::from_directory_path(path).expect("Path must be absolute");
    format!("local:{}", &file_url.as_str()["file:".len()..])
}

/// Check if a file exists and has the expected content.
pub fn assert_file_content(path: &Path, expected: &str) {
    assert!(path.exists(), "File does not exist: {:?}", path);
    let actual = fs::read_to_string(path).expect("Failed to read file");
    assert_eq!(actual, expected, "File content mismatch");
}
