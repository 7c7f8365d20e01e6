//! CLI tool to run, inspect, format and regression-test Kode programs.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use kode::{Options, RecordedLines};

fn usage() -> ExitCode {
    eprintln!("Usage: kode <command> [--debug] [files...]");
    eprintln!("       kode test <dirs...> [--bless]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run    Run program(s), reading INPUT from stdin");
    eprintln!("  ast    Print the parsed statement tree");
    eprintln!("  fmt    Format program(s) and print to stdout");
    eprintln!("  check  Check if program(s) are formatted");
    eprintln!("  test   Replay each <dir>/*.kode against its .out file");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  kode run hello.kode");
    eprintln!("  kode run --debug hello.kode");
    eprintln!("  kode test tests/programs --bless");
    ExitCode::from(2)
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        return usage();
    }

    let command = args[1].as_str();
    let flags: Vec<&str> = args[2..]
        .iter()
        .map(String::as_str)
        .filter(|a| a.starts_with("--"))
        .collect();
    let files: Vec<&str> = args[2..]
        .iter()
        .map(String::as_str)
        .filter(|a| !a.starts_with("--"))
        .collect();
    let debug = flags.contains(&"--debug");
    let bless = flags.contains(&"--bless");

    if let Some(unknown) = flags.iter().find(|f| !matches!(**f, "--debug" | "--bless")) {
        eprintln!("Unknown flag: {unknown}");
        return ExitCode::from(2);
    }

    if files.is_empty() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    if command == "test" {
        return if test_all(&files, bless) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    let mut had_error = false;

    for path in files {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{path}: {e}");
                had_error = true;
                continue;
            }
        };

        match command {
            "run" => {
                let execution = kode::run(&content, path, Options::new().debug(debug));
                if let Err(e) = execution.result {
                    eprint!("{}", e.report());
                    had_error = true;
                }
            }
            "ast" => match kode::parse(&content, path) {
                Ok(tree) => println!("{tree:#?}"),
                Err(e) => {
                    eprint!("{}", e.report());
                    had_error = true;
                }
            },
            "fmt" => match kode::parse(&content, path) {
                Ok(tree) => print!("{}", kode::format(&tree)),
                Err(e) => {
                    eprint!("{}", e.report());
                    had_error = true;
                }
            },
            "check" => match kode::parse(&content, path) {
                Ok(tree) => {
                    if kode::format(&tree) == content {
                        eprintln!("{path}: formatted");
                    } else {
                        eprintln!("{path}: not formatted");
                        had_error = true;
                    }
                }
                Err(e) => {
                    eprint!("{}", e.report());
                    had_error = true;
                }
            },
            _ => {
                eprintln!("Unknown command: {command}");
                return ExitCode::from(2);
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Replay every directory, reporting each, even after one fails.
fn test_all(dirs: &[&str], bless: bool) -> bool {
    dirs.iter().fold(true, |ok, dir| test(dir, bless) && ok)
}

/// Run every `.kode` file in `dir` silently with no input and compare its
/// output, followed by any rendered error, with the sibling `.out` file.
/// Errors name the unit by file name so golden files do not depend on the
/// working directory. Returns whether every program matched.
fn test(dir: &str, bless: bool) -> bool {
    let programs = match programs(Path::new(dir)) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{dir}: {e}");
            return false;
        }
    };

    let mut failed = 0usize;
    for program in &programs {
        let name = program.display().to_string();
        let content = match fs::read_to_string(program) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{name}: {e}");
                failed += 1;
                continue;
            }
        };
        let unit = program
            .file_name()
            .map_or_else(|| name.clone(), |n| n.to_string_lossy().into_owned());
        let actual = transcript(&content, &unit);
        let golden = program.with_extension("out");

        if bless {
            if let Err(e) = fs::write(&golden, &actual) {
                eprintln!("{}: {e}", golden.display());
                failed += 1;
            }
            continue;
        }

        match fs::read_to_string(&golden) {
            Ok(expected) if expected == actual => eprintln!("{name}: ok"),
            Ok(_) => {
                eprintln!("{name}: output differs from {}", golden.display());
                failed += 1;
            }
            Err(e) => {
                eprintln!("{}: {e}", golden.display());
                failed += 1;
            }
        }
    }

    eprintln!("{dir}: {} program(s), {failed} failed", programs.len());
    failed == 0
}

fn transcript(content: &str, unit: &str) -> String {
    let options = Options::new()
        .silent(true)
        .input(RecordedLines::default());
    let execution = kode::run(content, unit, options);
    let mut out = execution.output;
    if let Err(e) = execution.result {
        out.push_str(&e.report());
    }
    out
}

fn programs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut programs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "kode"))
        .collect();
    programs.sort();
    Ok(programs)
}
