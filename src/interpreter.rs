//! Tree-walking evaluator.
//!
//! Every step produces a [`Literal`]: a value tagged with the merged span of
//! everything it was computed from, so runtime errors can point at the
//! exact source responsible.

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead};

use crate::ast::{Block, Statement};
use crate::error::{Error, InterpreterError, InterpreterErrorKind};
use crate::operators::{self, Fault};
use crate::parser::parse;
use crate::scope::Scope;
use crate::span::Span;
use crate::token::{OperatorKind, TokenKind};
use crate::value::{Literal, Value, classify};

/// Supplies lines to `INPUT` statements.
pub trait InputSource {
    /// Next line without its line terminator, or `None` once exhausted.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when reading fails.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Reads lines from the process's standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinLines;

impl InputSource for StdinLines {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(strip_newline(line)))
    }
}

/// Pre-recorded lines handed out front to back.
#[derive(Debug, Default, Clone)]
pub struct RecordedLines {
    lines: VecDeque<String>,
}

impl RecordedLines {
    #[must_use]
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl InputSource for RecordedLines {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front().map(strip_newline))
    }
}

fn strip_newline(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

/// Evaluation settings.
///
/// ```
/// use kode::{Options, RecordedLines};
///
/// let options = Options::new()
///     .silent(true)
///     .input(RecordedLines::new(["42"]));
/// assert!(options.is_silent());
/// ```
pub struct Options {
    silent: bool,
    debug: bool,
    input: Box<dyn InputSource>,
}

impl Options {
    /// Echo `SHOW` output to standard output and read `INPUT` from
    /// standard input.
    #[must_use]
    pub fn new() -> Self {
        Self {
            silent: false,
            debug: false,
            input: Box::new(StdinLines),
        }
    }

    /// Suppress the live echo of `SHOW`. Output is still captured.
    #[must_use]
    pub const fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Trace every evaluated node to standard error.
    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn input(mut self, input: impl InputSource + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    #[must_use]
    pub const fn is_silent(&self) -> bool {
        self.silent
    }

    #[must_use]
    pub const fn is_debug(&self) -> bool {
        self.debug
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("silent", &self.silent)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

/// One evaluation run: its own scope, its own captured output.
#[derive(Debug)]
pub struct Interpreter {
    scope: Scope,
    output: String,
    options: Options,
}

impl Interpreter {
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self {
            scope: Scope::new(),
            output: String::new(),
            options,
        }
    }

    /// Evaluate a block, returning the literal of its last statement.
    ///
    /// Output produced before a failure stays in [`Interpreter::output`].
    ///
    /// # Errors
    ///
    /// Returns the first `InterpreterError`; evaluation stops there.
    pub fn run(&mut self, block: &Block) -> Result<Literal, InterpreterError> {
        self.block(block)
    }

    /// Everything `SHOW` has written so far, one line per statement.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    #[must_use]
    pub fn into_output(self) -> String {
        self.output
    }

    #[must_use]
    pub const fn scope(&self) -> &Scope {
        &self.scope
    }

    fn block(&mut self, block: &Block) -> Result<Literal, InterpreterError> {
        let mut last = None;
        for statement in &block.statements {
            last = Some(self.eval(statement)?);
        }
        Ok(last.unwrap_or_else(|| Literal::none(block.span())))
    }

    fn eval(&mut self, statement: &Statement) -> Result<Literal, InterpreterError> {
        let result = self.dispatch(statement)?;
        if self.options.debug {
            let span = statement.span();
            eprintln!(
                "[{}..{}] {} => {}",
                span.start(),
                span.end(),
                node_name(statement),
                result.value
            );
        }
        Ok(result)
    }

    fn dispatch(&mut self, statement: &Statement) -> Result<Literal, InterpreterError> {
        let span = statement.span();
        match statement {
            Statement::Statements(block) => self.block(block),
            Statement::Literal(token) => {
                let value = match &token.kind {
                    TokenKind::Literal(value) => value.clone(),
                    _ => Value::None,
                };
                Ok(Literal::new(value, span))
            }
            Statement::Identifier(token) => {
                let found = self.scope.get(token.text(), &token.span)?;
                Ok(found.clone().respan(span))
            }
            Statement::Assignment {
                identifier, value, ..
            } => {
                let value = self.eval(value)?;
                self.scope.put(identifier.text(), value.clone());
                Ok(value.respan(span))
            }
            Statement::Operation {
                lhs, operator, rhs, ..
            } => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                operate(*operator, &lhs, &rhs)
            }
            Statement::Show { value, .. } => {
                let value = self.eval(value)?;
                self.show(&value.value);
                Ok(value)
            }
            Statement::Input { keyword } => self.input(keyword),
            Statement::Conditional {
                condition,
                pass,
                fail,
                ..
            } => {
                self.scope.push();
                let result = self.conditional(condition, pass, fail.as_ref());
                self.scope.pop();
                Ok(result?.respan(span))
            }
            Statement::Loop {
                condition, body, ..
            } => {
                self.scope.push();
                let result = self.repeat(condition, body);
                self.scope.pop();
                Ok(result?.respan(span))
            }
        }
    }

    fn conditional(
        &mut self,
        condition: &Statement,
        pass: &Block,
        fail: Option<&Block>,
    ) -> Result<Literal, InterpreterError> {
        if self.condition(condition)? {
            return self.block(pass);
        }
        fail.map_or_else(|| Ok(Literal::none(Span::empty())), |fail| self.block(fail))
    }

    fn repeat(&mut self, condition: &Statement, body: &Block) -> Result<Literal, InterpreterError> {
        let mut last = Literal::none(Span::empty());
        while self.condition(condition)? {
            last = self.block(body)?;
        }
        Ok(last)
    }

    fn condition(&mut self, condition: &Statement) -> Result<bool, InterpreterError> {
        let literal = self.eval(condition)?;
        match literal.value {
            Value::Boolean(b) => Ok(b),
            other => Err(InterpreterError::new(
                InterpreterErrorKind::NonBooleanCondition {
                    found: other.kind(),
                },
                literal.span,
            )),
        }
    }

    fn show(&mut self, value: &Value) {
        let line = value.to_string();
        if !self.options.silent {
            println!("{line}");
        }
        self.output.push_str(&line);
        self.output.push('\n');
    }

    fn input(&mut self, keyword: &Span) -> Result<Literal, InterpreterError> {
        let line = self
            .options
            .input
            .read_line()
            .map_err(|e| {
                InterpreterError::new(
                    InterpreterErrorKind::Input {
                        message: e.to_string(),
                    },
                    keyword.clone(),
                )
            })?
            .ok_or_else(|| {
                InterpreterError::new(InterpreterErrorKind::InputExhausted, keyword.clone())
            })?;
        Ok(Literal::new(input_value(line), keyword.clone()))
    }
}

/// Convert one input line: empty is `NONE`, letters only are a string,
/// anything else goes through the literal classification chain and falls
/// back to a string.
fn input_value(line: String) -> Value {
    if line.is_empty() {
        return Value::None;
    }
    if line.chars().all(char::is_alphabetic) {
        return Value::String(line);
    }
    classify(&line).unwrap_or(Value::String(line))
}

fn operate(op: OperatorKind, lhs: &Literal, rhs: &Literal) -> Result<Literal, InterpreterError> {
    let span = lhs.span.merge(&rhs.span);
    let kind = match operators::apply(op, &lhs.value, &rhs.value) {
        Ok(value) => return Ok(Literal::new(value, span)),
        Err(Fault::Unsupported) => {
            return Err(InterpreterError {
                kind: InterpreterErrorKind::UnsupportedOperands {
                    operator: op,
                    lhs: lhs.value.kind(),
                    rhs: rhs.value.kind(),
                },
                spans: vec![lhs.span.clone(), rhs.span.clone()],
            });
        }
        Err(Fault::DivisionByZero) => InterpreterErrorKind::DivisionByZero,
        Err(Fault::Overflow) => InterpreterErrorKind::Overflow { operator: op },
        Err(Fault::IndexOutOfRange { index, len }) => {
            InterpreterErrorKind::IndexOutOfRange { index, len }
        }
        Err(Fault::InvalidShift { amount }) => InterpreterErrorKind::InvalidShift { amount },
    };
    Err(InterpreterError::new(kind, span))
}

const fn node_name(statement: &Statement) -> &'static str {
    match statement {
        Statement::Statements(_) => "Statements",
        Statement::Literal(_) => "Literal",
        Statement::Identifier(_) => "Identifier",
        Statement::Assignment { .. } => "Assignment",
        Statement::Operation { .. } => "Operation",
        Statement::Show { .. } => "Show",
        Statement::Input { .. } => "Input",
        Statement::Conditional { .. } => "Conditional",
        Statement::Loop { .. } => "Loop",
    }
}

/// Evaluate a parsed tree with a fresh interpreter.
///
/// # Errors
///
/// Returns the first `InterpreterError`.
pub fn evaluate(tree: &Block, options: Options) -> Result<Literal, InterpreterError> {
    Interpreter::new(options).run(tree)
}

/// Result of running a whole source unit.
#[derive(Debug)]
pub struct Execution {
    /// Captured `SHOW` output, including anything written before a failure.
    pub output: String,
    pub result: Result<Literal, Error>,
}

/// Parse and evaluate `source` in one step.
///
/// ```
/// use kode::{Options, run};
///
/// let execution = run("SHOW 1 + 2.", "main.kode", Options::new().silent(true));
/// assert_eq!(execution.output, "3\n");
/// assert!(execution.result.is_ok());
/// ```
#[must_use]
pub fn run(source: &str, unit: &str, options: Options) -> Execution {
    let tree = match parse(source, unit) {
        Ok(tree) => tree,
        Err(e) => {
            return Execution {
                output: String::new(),
                result: Err(e.into()),
            };
        }
    };
    let mut interpreter = Interpreter::new(options);
    let result = interpreter.run(&tree).map_err(Error::from);
    Execution {
        output: interpreter.into_output(),
        result,
    }
}
