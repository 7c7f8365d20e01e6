#![allow(dead_code)]

use kode::{Error, InterpreterError, Options, ParseError, RecordedLines, format, parse, run};

/// Options for tests: no live echo, no input lines.
pub fn quiet() -> Options {
    Options::new().silent(true).input(RecordedLines::default())
}

/// Run `source` and return its captured output, panicking on any error.
pub fn output(source: &str) -> String {
    output_with_input(source, &[])
}

pub fn output_with_input(source: &str, lines: &[&str]) -> String {
    let options = quiet().input(RecordedLines::new(lines.iter().copied()));
    let execution = run(source, "test.kode", options);
    if let Err(e) = execution.result {
        panic!("run failed:\n{}", e.report());
    }
    execution.output
}

pub fn parse_error(source: &str) -> ParseError {
    match run(source, "test.kode", quiet()).result {
        Err(Error::Parse(e)) => e,
        other => panic!("expected a parse error, got {other:?}"),
    }
}

pub fn interpreter_error(source: &str) -> InterpreterError {
    match run(source, "test.kode", quiet()).result {
        Err(Error::Interpreter(e)) => e,
        other => panic!("expected an interpreter error, got {other:?}"),
    }
}

/// Format `input`, parse the result and format again: both must agree,
/// and the reformatted program must produce the same output.
pub fn assert_format_stable(input: &str) {
    let tree = parse(input, "test.kode").expect("parse failed");
    let once = format(&tree);
    let reparsed = parse(&once, "test.kode").unwrap_or_else(|e| {
        panic!(
            "failed to re-parse formatted output:\n{}\n--- formatted ---\n{once}",
            e.report()
        )
    });
    let twice = format(&reparsed);
    assert_eq!(
        once, twice,
        "format not idempotent:\n--- once ---\n{once}\n--- twice ---\n{twice}"
    );
}
