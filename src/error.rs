use std::fmt;

use crate::report;
use crate::span::Span;
use crate::stream::Pattern;
use crate::token::{OperatorKind, Reserved};
use crate::value::ValueKind;

/// Classifies a parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Span that no token classifier accepts.
    UnrecognizedToken,
    /// Opening quote without a matching closing quote.
    UnterminatedString,
    /// Span accepted as a literal whose text is not a valid literal.
    InvalidLiteral,
    /// A statement ran to the end of input before its terminator.
    MissingTerminator { expected: Pattern },
    /// `SET` not followed by an identifier.
    ExpectedIdentifier,
    /// A required keyword is missing.
    ExpectedKeyword { expected: Reserved },
    /// A value position holds no tokens.
    ExpectedExpression,
    /// `IF`/`WHILE` without a matching `END`.
    UnclosedBlock,
    /// Second `ELSE` in the same conditional.
    DuplicateElse,
    /// No grammar rule accepts the remaining tokens.
    NoRuleMatches,
    /// Several operands with no operator between them.
    MissingOperator,
    /// Operator with nothing on one side.
    MissingOperand { operator: OperatorKind },
    /// Values or blocks nested past the parser's limit.
    NestingTooDeep { limit: usize },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedToken => write!(f, "unrecognized token"),
            Self::UnterminatedString => write!(f, "unterminated string"),
            Self::InvalidLiteral => write!(f, "invalid literal"),
            Self::MissingTerminator { expected } => {
                write!(f, "expected {expected} before end of input")
            }
            Self::ExpectedIdentifier => write!(f, "expected an identifier after SET"),
            Self::ExpectedKeyword { expected } => write!(f, "expected {expected}"),
            Self::ExpectedExpression => write!(f, "expected an expression"),
            Self::UnclosedBlock => write!(f, "block not closed, expected END"),
            Self::DuplicateElse => write!(f, "conditional has more than one ELSE"),
            Self::NoRuleMatches => write!(f, "could not match any statement to tokens"),
            Self::MissingOperator => write!(f, "expected an operator between operands"),
            Self::MissingOperand { operator } => {
                write!(f, "operator '{operator}' is missing an operand")
            }
            Self::NestingTooDeep { limit } => {
                write!(f, "nesting deeper than {limit} levels")
            }
        }
    }
}

/// Error produced while lexing, tokenizing, or parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub spans: Vec<Span>,
}

impl ParseError {
    #[must_use]
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self {
            kind,
            spans: vec![span],
        }
    }

    /// Render the error with caret-annotated source lines.
    #[must_use]
    pub fn report(&self) -> String {
        report::render("ParseError", &self.kind.to_string(), &self.spans)
    }
}

/// Classifies a runtime error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpreterErrorKind {
    UndefinedVariable { name: String },
    NonBooleanCondition { found: ValueKind },
    UnsupportedOperands {
        operator: OperatorKind,
        lhs: ValueKind,
        rhs: ValueKind,
    },
    DivisionByZero,
    Overflow { operator: OperatorKind },
    IndexOutOfRange { index: i64, len: usize },
    InvalidShift { amount: i64 },
    /// `INPUT` ran out of lines.
    InputExhausted,
    /// The input source failed.
    Input { message: String },
}

impl fmt::Display for InterpreterErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedVariable { name } => write!(f, "undefined variable '{name}'"),
            Self::NonBooleanCondition { found } => {
                write!(f, "condition must be a boolean, found {found}")
            }
            Self::UnsupportedOperands { operator, lhs, rhs } => {
                write!(f, "operator '{operator}' does not support {lhs} and {rhs}")
            }
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::Overflow { operator } => write!(f, "integer overflow in '{operator}'"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for string of length {len}")
            }
            Self::InvalidShift { amount } => write!(f, "invalid shift amount {amount}"),
            Self::InputExhausted => write!(f, "no more input lines"),
            Self::Input { message } => write!(f, "failed to read input: {message}"),
        }
    }
}

/// Error produced while evaluating a statement tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}")]
pub struct InterpreterError {
    pub kind: InterpreterErrorKind,
    pub spans: Vec<Span>,
}

impl InterpreterError {
    #[must_use]
    pub fn new(kind: InterpreterErrorKind, span: Span) -> Self {
        Self {
            kind,
            spans: vec![span],
        }
    }

    #[must_use]
    pub fn report(&self) -> String {
        report::render("InterpreterError", &self.kind.to_string(), &self.spans)
    }
}

/// Unified error type covering parsing and evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Interpreter(#[from] InterpreterError),
}

impl Error {
    #[must_use]
    pub fn spans(&self) -> &[Span] {
        match self {
            Self::Parse(e) => &e.spans,
            Self::Interpreter(e) => &e.spans,
        }
    }

    #[must_use]
    pub fn report(&self) -> String {
        match self {
            Self::Parse(e) => e.report(),
            Self::Interpreter(e) => e.report(),
        }
    }
}
