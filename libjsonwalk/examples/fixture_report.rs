//! Decode every fixture file and report how far each one got.

use libjsonwalk::{DecodeError, Decoder, Value};
use std::fs;
use std::path::Path;

fn main() {
    let test_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("test");

    let mut clean = 0;
    let mut failed = 0;

    for subdir in ["json", "nay"] {
        let mut paths: Vec<_> = fs::read_dir(test_dir.join(subdir))
            .unwrap()
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|e| e == "json").unwrap_or(false))
            .collect();
        paths.sort();

        for path in paths {
            let bytes = fs::read(&path).unwrap();
            let basename = path.file_stem().unwrap().to_string_lossy();
            let mut decoder = Decoder::new(&bytes[..]);
            let mut values = 0;

            let outcome = loop {
                let mut value = Value::Null;
                match decoder.decode(&mut value) {
                    Ok(()) => values += 1,
                    Err(DecodeError::Eof) => break None,
                    Err(e) => break Some(e),
                }
            };

            match outcome {
                None => {
                    clean += 1;
                    println!(
                        "{}/{}: {} values, {} of {} bytes",
                        subdir,
                        basename,
                        values,
                        decoder.offset(),
                        bytes.len()
                    );
                }
                Some(e) => {
                    failed += 1;
                    println!(
                        "{}/{}: {} values, then {} at offset {}",
                        subdir,
                        basename,
                        values,
                        e,
                        decoder.offset()
                    );
                }
            }
        }
    }

    println!("\nResults: {} clean, {} failed", clean, failed);
}
