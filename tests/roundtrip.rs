//! Canonical sources survive format unchanged, and formatting never
//! changes what a program does.

mod common;

use common::{assert_format_stable, output};
use kode::{format, parse};

fn roundtrip(input: &str) {
    let tree = parse(input, "test.kode").expect("parse failed");
    let output = format(&tree);
    assert_eq!(
        output, input,
        "round-trip mismatch:\n--- expected ---\n{input}\n--- got ---\n{output}"
    );
}

fn same_behaviour(input: &str) {
    let formatted = format(&parse(input, "test.kode").expect("parse failed"));
    assert_eq!(output(input), output(&formatted), "--- formatted ---\n{formatted}");
}

#[test]
fn roundtrip_assignment_and_show() {
    roundtrip("SET x TO 1.\nSHOW x.\n");
}

#[test]
fn roundtrip_loop() {
    roundtrip("SET i TO 0.\nWHILE i < 3 DO\n\tSET i TO i + 1.\n\tSHOW i.\nEND.\n");
}

#[test]
fn roundtrip_conditional_with_else() {
    roundtrip("IF 1 > 2 THEN\n\tSHOW \"yes\".\nELSE\n\tSHOW \"no\".\nEND.\n");
}

#[test]
fn roundtrip_input() {
    roundtrip("INPUT.\nSET n TO INPUT * 2.\n");
}

#[test]
fn roundtrip_empty_bodies() {
    roundtrip("IF TRUE THEN\nELSE\nEND.\nWHILE FALSE DO\nEND.\n");
}

#[test]
fn stable_messy_sources() {
    assert_format_stable("set a to 1.   show a plus 2 times 3.");
    assert_format_stable("IF a THEN WHILE b DO SET b TO FALSE. END ELSE SHOW 'x'. END");
    assert_format_stable("SET y TO IF c THEN 'a' ELSE 'b' END. y");
}

#[test]
fn formatting_preserves_behaviour() {
    same_behaviour("SET i TO 0. WHILE i < 4 DO IF i % 2 = 0 THEN SHOW i. END SET i TO i + 1. END");
    same_behaviour("SET s TO 'abc'. SHOW s AT -1 + s AT 0. SHOW s * 2.");
    same_behaviour("SHOW 10 - 4 - 3. SHOW 100 DIV 7 MOD 3.");
}
