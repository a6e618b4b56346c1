use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tt::document::Document;
use tt::store::Store;

pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    /// Create an initialized project in a temp directory.
    pub fn init() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let store = Store::open(dir.path().to_path_buf());
        store.init("test-project").expect("init project");
        Self { dir }
    }

    /// Create a bare temp directory with no `.tt/` inside.
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store(&self) -> Store {
        Store::open(self.dir.path().to_path_buf())
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.store().tasks_file()
    }

    /// Overwrite the task document with raw JSON, bypassing the store.
    pub fn write_raw_document(&self, contents: &str) {
        let path = self.tasks_file();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create .tt");
        }
        fs::write(&path, contents).expect("write tasks.json");
    }

    pub fn read_raw_document(&self) -> String {
        fs::read_to_string(self.tasks_file()).expect("read tasks.json")
    }

    pub fn load(&self) -> Document {
        self.store().load().expect("load document")
    }

    /// A `tt` command rooted at this project.
    pub fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("tt").expect("binary");
        cmd.arg("--dir").arg(self.dir.path());
        cmd
    }
}
