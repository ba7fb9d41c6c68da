//! Test harness for the decoder against fixture files.
//!
//! This harness decodes every .json file in test/json/ into dynamic values,
//! one top-level value after another, and compares the `Debug` rendering of
//! each (one per line) with the matching .out file. It also decodes every
//! .json file in test/nay/ (expected to fail) and compares the error, with
//! its offset, against the matching .error file.

use std::fs;
use std::path::{Path, PathBuf};

use libjsonwalk::{DecodeError, Decoder, Value};

/// Root test directory.
fn test_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("test")
}

/// Get all .json files from a subdirectory of test/.
fn get_json_files(subdir: &str) -> Vec<PathBuf> {
    let pattern = test_root().join(subdir).join("*.json");
    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .expect("fixture pattern is valid")
        .flatten()
        .collect();
    files.sort();
    files
}

/// Read the sibling of `path` with extension `ext`.
fn read_expected(path: &Path, ext: &str) -> Option<String> {
    fs::read_to_string(path.with_extension(ext)).ok()
}

/// Render an error the way the CLI reports it.
fn render_error(e: &DecodeError) -> String {
    match e.offset() {
        Some(offset) => format!("{} (offset {})", e, offset),
        None => e.to_string(),
    }
}

/// Decode every top-level value in `bytes`, stopping at the first error.
fn decode_all(bytes: &[u8]) -> (Vec<Value>, DecodeError) {
    let mut decoder = Decoder::new(bytes);
    let mut values = Vec::new();
    loop {
        let mut value = Value::Null;
        match decoder.decode(&mut value) {
            Ok(()) => values.push(value),
            Err(e) => return (values, e),
        }
    }
}

fn run_json_test(path: &Path) -> Result<(), String> {
    let filename = path.file_name().unwrap().to_string_lossy();
    let bytes = fs::read(path).map_err(|e| format!("{}: {}", filename, e))?;

    let (values, end) = decode_all(&bytes);
    if !end.is_eof() {
        return Err(format!("{}: unexpected error: {}", filename, render_error(&end)));
    }

    let actual: Vec<String> = values.iter().map(|v| format!("{:?}", v)).collect();
    let actual = actual.join("\n");
    match read_expected(path, "out") {
        Some(expected) => {
            if actual == expected.trim_end() {
                println!("  {} => {}", filename, actual.replace('\n', " | "));
                Ok(())
            } else {
                Err(format!(
                    "{}: output mismatch\n    expected: {}\n    actual:   {}",
                    filename,
                    expected.trim_end(),
                    actual
                ))
            }
        }
        None => Err(format!("{}: missing .out file", filename)),
    }
}

fn run_nay_test(path: &Path) -> Result<(), String> {
    let filename = path.file_name().unwrap().to_string_lossy();
    let bytes = fs::read(path).map_err(|e| format!("{}: {}", filename, e))?;

    let (_, end) = decode_all(&bytes);
    if end.is_eof() {
        return Err(format!("{}: expected an error, but input decoded", filename));
    }

    let actual = render_error(&end);
    match read_expected(path, "error") {
        Some(expected) => {
            if actual == expected.trim_end() {
                println!("  {} => {}", filename, actual);
                Ok(())
            } else {
                Err(format!(
                    "{}: error mismatch\n    expected: {}\n    actual:   {}",
                    filename,
                    expected.trim_end(),
                    actual
                ))
            }
        }
        None => Err(format!("{}: missing .error file", filename)),
    }
}

fn run_all(subdir: &str, run: fn(&Path) -> Result<(), String>) {
    let files = get_json_files(subdir);
    assert!(!files.is_empty(), "no fixtures found in test/{}", subdir);

    println!("\nRunning {} test/{} files:", files.len(), subdir);

    let mut passed = 0;
    let mut failed = 0;
    let mut errors = Vec::new();

    for path in &files {
        match run(path) {
            Ok(()) => passed += 1,
            Err(e) => {
                failed += 1;
                errors.push(e);
            }
        }
    }

    println!("\nResults: {} passed, {} failed", passed, failed);

    if !errors.is_empty() {
        println!("\nErrors:");
        for error in &errors {
            println!("  - {}", error);
        }
    }

    assert!(failed == 0, "{} test/{} fixtures failed", failed, subdir);
}

#[test]
fn test_all_json_fixtures() {
    run_all("json", run_json_test);
}

#[test]
fn test_all_nay_fixtures() {
    run_all("nay", run_nay_test);
}
