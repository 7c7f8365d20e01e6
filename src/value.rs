//! Runtime values and the literal classification chain.

use std::fmt;

use crate::span::Span;

/// Kind of a [`Value`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Integer,
    Float,
    Boolean,
    None,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::None => "none",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    None,
}

impl Value {
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Integer(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::None => ValueKind::None,
        }
    }
}

/// Printable form, as written by `SHOW`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            // Debug keeps the fractional part of whole floats (`3.0`).
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Boolean(true) => f.write_str("TRUE"),
            Self::Boolean(false) => f.write_str("FALSE"),
            Self::None => f.write_str("NONE"),
        }
    }
}

/// A value together with the span of everything it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: Value,
    pub span: Span,
}

impl Literal {
    #[must_use]
    pub const fn new(value: Value, span: Span) -> Self {
        Self { value, span }
    }

    #[must_use]
    pub const fn none(span: Span) -> Self {
        Self::new(Value::None, span)
    }

    /// The same value attributed to a different span.
    #[must_use]
    pub fn respan(self, span: Span) -> Self {
        Self { span, ..self }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

pub const STRING_DELIMITERS: [char; 2] = ['"', '\''];

/// Classify literal text: quoted string, integer, float, boolean, none.
///
/// Returns `None` when the text is not a literal of any kind.
#[must_use]
pub fn classify(text: &str) -> Option<Value> {
    if let Some(quote) = text.chars().next().filter(|c| STRING_DELIMITERS.contains(c)) {
        let inner = text.strip_prefix(quote)?.strip_suffix(quote)?;
        return Some(Value::String(inner.to_string()));
    }
    if is_integer(text) {
        return text.parse().ok().map(Value::Integer);
    }
    if is_float(text) {
        return text.parse().ok().map(Value::Float);
    }
    match text.to_ascii_uppercase().as_str() {
        "TRUE" => Some(Value::Boolean(true)),
        "FALSE" => Some(Value::Boolean(false)),
        "NONE" => Some(Value::None),
        _ => None,
    }
}

/// A non-empty run of ASCII digits.
#[must_use]
pub fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn is_integer(text: &str) -> bool {
    is_digits(text.strip_prefix('-').unwrap_or(text))
}

fn is_float(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    unsigned
        .split_once('.')
        .is_some_and(|(whole, frac)| is_digits(whole) && is_digits(frac))
}
