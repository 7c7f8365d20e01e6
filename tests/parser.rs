//! Parser edge cases and error tests.

mod common;

use common::parse_error;
use kode::{OperatorKind, ParseErrorKind, Reserved, Statement, parse};

fn root_operator(input: &str) -> OperatorKind {
    let mut tree = parse(input, "test.kode").expect("parse");
    match tree.statements.remove(0) {
        Statement::Operation { operator, .. } => operator,
        other => panic!("expected an operation, got {other:?}"),
    }
}

// -----------------------------------------------------------
// Precedence.
// -----------------------------------------------------------

#[test]
fn lowest_rank_is_root() {
    assert_eq!(root_operator("1 + 2 * 3"), OperatorKind::Add);
    assert_eq!(root_operator("1 * 2 + 3"), OperatorKind::Add);
    assert_eq!(root_operator("a < b AND c"), OperatorKind::And);
    assert_eq!(root_operator("a AND b OR c"), OperatorKind::Or);
    assert_eq!(root_operator("x << 1 = 4"), OperatorKind::Equal);
    assert_eq!(root_operator("s AT 0 + t"), OperatorKind::Add);
}

#[test]
fn equal_rank_splits_at_last_operator() {
    let mut tree = parse("10 - 4 + 3", "test.kode").expect("parse");
    let Statement::Operation { lhs, operator, .. } = tree.statements.remove(0) else {
        panic!("expected an operation");
    };
    assert_eq!(operator, OperatorKind::Add);
    assert!(matches!(
        *lhs,
        Statement::Operation {
            operator: OperatorKind::Subtract,
            ..
        }
    ));
}

#[test]
fn separated_minus_subtracts() {
    assert_eq!(root_operator("x - 1"), OperatorKind::Subtract);
}

// -----------------------------------------------------------
// Statement shapes.
// -----------------------------------------------------------

#[test]
fn several_statements_in_order() {
    let tree = parse("SET a TO 1. SHOW a. INPUT. a", "test.kode").expect("parse");
    assert!(matches!(tree.statements[0], Statement::Assignment { .. }));
    assert!(matches!(tree.statements[1], Statement::Show { .. }));
    assert!(matches!(tree.statements[2], Statement::Input { .. }));
    assert!(matches!(tree.statements[3], Statement::Identifier(_)));
}

#[test]
fn block_statements_need_no_period() {
    let tree = parse("IF a THEN END WHILE b DO END", "test.kode").expect("parse");
    assert_eq!(tree.statements.len(), 2);
}

#[test]
fn nested_conditionals_pair_their_else() {
    let tree = parse(
        "IF a THEN IF b THEN SHOW 1. ELSE SHOW 2. END ELSE SHOW 3. END.",
        "test.kode",
    )
    .expect("parse");
    let Statement::Conditional { pass, fail, .. } = &tree.statements[0] else {
        panic!("expected conditional");
    };
    assert!(matches!(
        pass.statements[0],
        Statement::Conditional { fail: Some(_), .. }
    ));
    assert_eq!(fail.as_ref().map(|f| f.statements.len()), Some(1));
}

#[test]
fn else_is_not_allowed_in_loops() {
    let err = parse_error("WHILE a DO ELSE END.");
    assert_eq!(err.kind, ParseErrorKind::NoRuleMatches);
}

// -----------------------------------------------------------
// Errors.
// -----------------------------------------------------------

#[test]
fn parse_error_set_without_identifier() {
    let err = parse_error("SET TO 1.");
    assert_eq!(err.kind, ParseErrorKind::ExpectedIdentifier);
    assert_eq!(err.spans[0].text(), "TO");
}

#[test]
fn parse_error_missing_then() {
    let err = parse_error("IF a SHOW 1. END.");
    assert!(matches!(err.kind, ParseErrorKind::MissingTerminator { .. }));
}

#[test]
fn parse_error_unclosed_nested_block() {
    let err = parse_error("IF a THEN WHILE b DO SHOW 1. END.");
    assert_eq!(err.kind, ParseErrorKind::UnclosedBlock);
    assert!(err.spans[0].text().starts_with("IF a THEN"));
}

#[test]
fn parse_error_empty_value() {
    let err = parse_error("SHOW .");
    assert_eq!(err.kind, ParseErrorKind::ExpectedExpression);
    assert_eq!(err.spans[0].text(), "SHOW");
}

#[test]
fn parse_error_empty_condition() {
    let err = parse_error("WHILE DO END.");
    assert_eq!(err.kind, ParseErrorKind::ExpectedExpression);
}

#[test]
fn parse_error_missing_to() {
    let err = parse_error("SET x 5.");
    assert_eq!(
        err.kind,
        ParseErrorKind::ExpectedKeyword {
            expected: Reserved::To
        }
    );
}

#[test]
fn parse_error_leading_operator() {
    let err = parse_error("SHOW * 2.");
    assert_eq!(
        err.kind,
        ParseErrorKind::MissingOperand {
            operator: OperatorKind::Multiply
        }
    );
}

#[test]
fn parse_error_adjacent_sign_is_not_subtraction() {
    let err = parse_error("SHOW x -1.");
    assert_eq!(err.kind, ParseErrorKind::MissingOperator);
}

#[test]
fn parse_error_is_a_parse_variant() {
    let result = kode::run("SHOW 'x.", "test.kode", common::quiet()).result;
    assert!(matches!(result, Err(kode::Error::Parse(_))));
}
