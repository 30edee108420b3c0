// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

pub mod fixtures;

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture helper for creating temporary directories with news CSV files
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self { temp_dir, root_path }
    }

    /// Write a CSV file with the given raw content
    pub fn create_csv<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Write `Fake.csv` and `True.csv` with `rows` synthetic articles each
    pub fn create_corpus(&self, rows: usize) -> (PathBuf, PathBuf) {
        let fake = self.create_csv("Fake.csv", &synthetic_csv(fixtures::FAKE_VOCABULARY, rows));
        let real = self.create_csv("True.csv", &synthetic_csv(fixtures::REAL_VOCABULARY, rows));
        (fake, real)
    }

    pub fn path(&self, relative_path: &str) -> PathBuf {
        self.root_path.join(relative_path)
    }
}

/// Rows of `title,text,subject,date` built from rotating vocabulary words
pub fn synthetic_csv(vocabulary: &[&str], rows: usize) -> String {
    let n = vocabulary.len();
    let mut csv = String::from("title,text,subject,date\n");
    for i in 0..rows {
        csv.push_str(&format!(
            "\"{} {}\",\"{} said on {} that {} matters.\",politics,\"December {}, 2017\"\n",
            capitalize(vocabulary[i % n]),
            vocabulary[(i + 3) % n],
            capitalize(vocabulary[(i + 5) % n]),
            "Tuesday",
            vocabulary[(i + 1) % n],
            i % 28 + 1
        ));
    }
    csv
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
