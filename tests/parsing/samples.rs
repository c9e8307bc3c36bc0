use std::fs;
use std::path::{Path, PathBuf};

use sam::{output, parsing};

fn sam_files(dir: &Path) -> Vec<PathBuf> {
    let entries = fs::read_dir(dir).expect("Failed to read directory");

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.expect("Failed to read directory entry");
        let path = entry.path();

        if path
            .extension()
            .and_then(|s| s.to_str())
            == Some("sam")
        {
            files.push(path);
        }
    }
    files.sort();
    files
}

#[test]
fn ensure_samples_parse() {
    let dir = Path::new("tests/samples/");

    assert!(dir.exists(), "samples directory missing");

    let files = sam_files(dir);
    assert!(!files.is_empty(), "No .sam files found in samples directory");

    let mut failures = Vec::new();

    for file in &files {
        let content = parsing::load(&file)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

        match parsing::parse(&content) {
            Ok(document) => {
                let xml = output::to_string(&document);
                assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
                assert!(xml.ends_with("</sam>\n"));
            }
            Err(e) => {
                println!("File {:?} failed to parse: {:?}", file, e);
                failures.push(file.clone());
            }
        }
    }

    if !failures.is_empty() {
        panic!(
            "Sample files should parse successfully, but {} files failed",
            failures.len()
        );
    }
}

#[test]
fn ensure_broken_fail() {
    let dir = Path::new("tests/broken/");

    assert!(dir.exists(), "broken directory missing");

    let files = sam_files(dir);
    assert!(!files.is_empty(), "No .sam files found in broken directory");

    let mut unexpected_successes = Vec::new();

    for file in &files {
        let content = parsing::load(&file)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

        match parsing::parse(&content) {
            Ok(_) => {
                println!("File {:?} unexpectedly parsed successfully", file);
                unexpected_successes.push(file.clone());
            }
            Err(_) => {}
        }
    }

    if !unexpected_successes.is_empty() {
        panic!(
            "Broken files should not to parse successfully, but {} files passed",
            unexpected_successes.len()
        );
    }
}

#[test]
fn missing_file() {
    let result = parsing::load(Path::new("tests/samples/does-not-exist.sam"));
    let error = result.unwrap_err();
    assert_eq!(error.problem, "File not found");
}
