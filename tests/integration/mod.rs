// Integration test utilities and common code

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture helper for creating temporary CSV uploads and store files
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self {
            temp_dir,
            root_path,
        }
    }

    /// Write a file with raw content
    pub fn create_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Write a CSV upload with a `homeowner` header and one quoted cell per line
    pub fn create_homeowner_csv<P: AsRef<Path>>(&self, relative_path: P, homeowners: &[&str]) -> PathBuf {
        let mut content = String::from("homeowner\n");
        for homeowner in homeowners {
            content.push('"');
            content.push_str(&homeowner.replace('"', "\"\""));
            content.push_str("\"\n");
        }
        self.create_file(relative_path, &content)
    }

    /// Path for the JSON person store inside the fixture
    pub fn store_path(&self) -> PathBuf {
        self.root_path.join("people.json")
    }
}
