//! jsonwalk command-line tool for decoding and checking JSON streams.
//!
//! Usage: jsonwalk [OPTIONS] [FILE|DIR]
//!
//! Options:
//!   -t, --into <KIND>      Destination kind (value, bool, string, i8, i16, i32,
//!                          i64, u8, u16, u32, u64, f32, f64, array, map)
//!                          [default: value]
//!   -1, --first            Decode only the first top-level value
//!   --check                Check if input is valid (exit 0 if valid, 1 if invalid)
//!   -h, --help             Print help
//!   -V, --version          Print version
//!
//! Set `RUST_LOG=libjsonwalk=trace` to watch the decoder work.

use libjsonwalk::{DecodeError, Decoder, Destination, Map, Value};
use log::debug;
use std::fmt::Debug;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::process;

/// Check whether a string is a recognized destination kind for -t.
fn is_kind_name(s: &str) -> bool {
    matches!(
        s,
        "value"
            | "bool"
            | "string"
            | "i8"
            | "i16"
            | "i32"
            | "i64"
            | "u8"
            | "u16"
            | "u32"
            | "u64"
            | "f32"
            | "f64"
            | "array"
            | "map"
    )
}

/// What to do with each input.
struct Options<'a> {
    kind: &'a str,
    first_only: bool,
    check_only: bool,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    let mut kind: Option<&str> = None;
    let mut first_only = false;
    let mut check_only = false;
    let mut input_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("jsonwalk {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "-t" | "--into" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: -t requires a kind argument");
                    process::exit(1);
                }
                if !is_kind_name(&args[i]) {
                    eprintln!("Error: Unknown kind: {}", args[i]);
                    process::exit(1);
                }
                kind = Some(&args[i]);
            }
            "-1" | "--first" => {
                first_only = true;
            }
            "--check" => {
                check_only = true;
            }
            "-" => {
                // Explicit stdin
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(1);
            }
            _ => {
                if input_path.is_some() {
                    eprintln!("Error: Multiple input paths not supported");
                    process::exit(1);
                }
                input_path = Some(&args[i]);
            }
        }
        i += 1;
    }

    let options = Options {
        kind: kind.unwrap_or("value"),
        first_only,
        check_only,
    };

    let exit_code = match input_path {
        Some(path) if Path::new(path).is_dir() => process_directory(path, &options),
        Some(path) => match File::open(path) {
            Ok(file) => process_input(BufReader::new(file), path, &options),
            Err(e) => {
                eprintln!("Error reading {}: {}", path, e);
                1
            }
        },
        None => process_input(io::stdin().lock(), "<stdin>", &options),
    };
    process::exit(exit_code);
}

fn process_directory(dir_path: &str, options: &Options) -> i32 {
    let entries = match fs::read_dir(dir_path) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error reading directory {}: {}", dir_path, e);
            return 1;
        }
    };

    let mut paths: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e == "json").unwrap_or(false))
        .collect();
    paths.sort();

    let mut had_errors = false;
    for path in paths {
        let path_str = path.to_string_lossy();
        let exit_code = match File::open(&path) {
            Ok(file) => process_input(BufReader::new(file), &path_str, options),
            Err(e) => {
                eprintln!("Error reading {}: {}", path_str, e);
                1
            }
        };
        if exit_code != 0 {
            had_errors = true;
        }
    }

    if had_errors {
        1
    } else {
        0
    }
}

fn process_input<R: Read>(source: R, label: &str, options: &Options) -> i32 {
    debug!("decoding {} into {}", label, options.kind);
    let decoder = Decoder::new(source);
    match options.kind {
        "bool" => run::<bool, R>(decoder, label, options),
        "string" => run::<String, R>(decoder, label, options),
        "i8" => run::<i8, R>(decoder, label, options),
        "i16" => run::<i16, R>(decoder, label, options),
        "i32" => run::<i32, R>(decoder, label, options),
        "i64" => run::<i64, R>(decoder, label, options),
        "u8" => run::<u8, R>(decoder, label, options),
        "u16" => run::<u16, R>(decoder, label, options),
        "u32" => run::<u32, R>(decoder, label, options),
        "u64" => run::<u64, R>(decoder, label, options),
        "f32" => run::<f32, R>(decoder, label, options),
        "f64" => run::<f64, R>(decoder, label, options),
        "array" => run::<Vec<Value>, R>(decoder, label, options),
        "map" => run::<Map, R>(decoder, label, options),
        _ => run::<Value, R>(decoder, label, options),
    }
}

/// Decode values of type `T` until the stream ends, printing each one.
fn run<T, R>(mut decoder: Decoder<R>, label: &str, options: &Options) -> i32
where
    T: Destination + Default + Debug,
    R: Read,
{
    let mut count = 0;
    loop {
        // Fresh destination per value, so null reads as the default.
        let mut dest = T::default();
        match decoder.decode(&mut dest) {
            Ok(()) => {
                count += 1;
                if !options.check_only {
                    println!("{:?}", dest);
                }
                if options.first_only {
                    break;
                }
            }
            Err(DecodeError::Eof) => break,
            Err(e) => {
                report_error(label, &e);
                return 1;
            }
        }
    }

    if options.check_only {
        if count == 0 {
            eprintln!("{}: no value", label);
            return 1;
        }
        println!("{}: ok", label);
    }
    0
}

fn report_error(label: &str, error: &DecodeError) {
    match error.offset() {
        Some(offset) => eprintln!("{}: {} (offset {})", label, error, offset),
        None => eprintln!("{}: {}", label, error),
    }
}

fn print_help() {
    println!(
        "jsonwalk - incremental JSON decoder

USAGE:
    jsonwalk [OPTIONS] [FILE|DIR]

ARGS:
    [FILE|DIR]    Input file or directory (reads from stdin if not provided)
                  When a directory is given, processes all .json files in it

OPTIONS:
    -t, --into <KIND>      Destination every value is decoded into [default: value]
                           Supported: value, bool, string, i8, i16, i32, i64,
                                      u8, u16, u32, u64, f32, f64, array, map

                           'array' is a growable sequence of dynamic values and
                           'map' an insertion-ordered object of dynamic values.

    -1, --first            Decode only the first top-level value

    --check                Check if input is valid (exit 0 if valid, 1 if invalid)

    -h, --help             Print help

    -V, --version          Print version

ENVIRONMENT:
    RUST_LOG               Log filter, e.g. RUST_LOG=libjsonwalk=trace

EXAMPLES:
    # Print every value in a stream
    jsonwalk values.json

    # Check that each file in a directory holds integers only
    jsonwalk --check --into i64 numbers/

    # Decode from stdin
    echo '[1, 2, 3]' | jsonwalk --into array"
    );
}
