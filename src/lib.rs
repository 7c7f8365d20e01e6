//! Lexer, parser, formatter and tree-walking interpreter for Kode, a small
//! keyword-driven scripting language.
//!
//! Source text is split into spans, classified into tokens, parsed into an
//! immutable statement tree and evaluated against a block-scoped
//! environment. Every value carries the span it was computed from, so errors
//! point at the exact source responsible.
//!
//! # Quick start
//!
//! ## Run a program
//!
//! ```
//! use kode::{Options, run};
//!
//! let source = "SET i TO 0. WHILE i < 3 DO SET i TO i + 1. SHOW i. END.";
//! let execution = run(source, "count.kode", Options::new().silent(true));
//! assert_eq!(execution.output, "1\n2\n3\n");
//! ```
//!
//! ## Parse and re-format
//!
//! ```
//! use kode::{format, parse};
//!
//! let tree = parse("set x to 2 plus 3 times 4. show x.", "main.kode").unwrap();
//! assert_eq!(format(&tree), "SET x TO 2 + 3 * 4.\nSHOW x.\n");
//! ```
//!
//! ## Report an error
//!
//! ```
//! use kode::parse;
//!
//! let err = parse("SET TO 1.", "main.kode").unwrap_err();
//! assert!(err.report().contains("(main.kode:1:5) SET TO 1."));
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod error;
pub mod formatter;
pub mod interpreter;
pub mod lexer;
pub mod operators;
pub mod parser;
pub mod report;
pub mod scope;
pub mod span;
pub mod stream;
pub mod token;
pub mod tokenizer;
pub mod value;

pub use ast::{Block, Statement};
pub use error::{Error, InterpreterError, InterpreterErrorKind, ParseError, ParseErrorKind};
pub use formatter::format;
pub use interpreter::{
    Execution, InputSource, Interpreter, Options, RecordedLines, StdinLines, evaluate, run,
};
pub use lexer::spanize;
pub use parser::{parse, parse_tokens};
pub use scope::Scope;
pub use span::{Source, Span};
pub use stream::{Pattern, TokenStream};
pub use token::{OperatorKind, Punctuation, Reserved, Token, TokenKind};
pub use tokenizer::tokenize;
pub use value::{Literal, Value, ValueKind};
