use std::fmt;

use crate::span::Span;
use crate::value::Value;

/// Reserved words. Matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reserved {
    If,
    Then,
    Else,
    End,
    While,
    Do,
    Set,
    To,
    Show,
    Input,
}

impl Reserved {
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        let reserved = match word.to_ascii_uppercase().as_str() {
            "IF" => Self::If,
            "THEN" => Self::Then,
            "ELSE" => Self::Else,
            "END" => Self::End,
            "WHILE" => Self::While,
            "DO" => Self::Do,
            "SET" => Self::Set,
            "TO" => Self::To,
            "SHOW" => Self::Show,
            "INPUT" => Self::Input,
            _ => return None,
        };
        Some(reserved)
    }

    /// Words that open a block closed by `END`.
    #[must_use]
    pub const fn opens_block(self) -> bool {
        matches!(self, Self::If | Self::While)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::If => "IF",
            Self::Then => "THEN",
            Self::Else => "ELSE",
            Self::End => "END",
            Self::While => "WHILE",
            Self::Do => "DO",
            Self::Set => "SET",
            Self::To => "TO",
            Self::Show => "SHOW",
            Self::Input => "INPUT",
        }
    }
}

impl fmt::Display for Reserved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    IntegerDivide,
    Modulo,
    Index,
    ShiftLeft,
    ShiftRight,
    Less,
    Greater,
    Equal,
    BitAnd,
    BitXor,
    BitOr,
    And,
    Or,
}

impl OperatorKind {
    /// Single-word spellings.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        let op = match word.to_ascii_uppercase().as_str() {
            "+" | "PLUS" => Self::Add,
            "MINUS" => Self::Subtract,
            "*" | "TIMES" => Self::Multiply,
            "/" | "DIVIDE" => Self::Divide,
            "//" | "DIV" => Self::IntegerDivide,
            "%" | "MOD" => Self::Modulo,
            "AT" => Self::Index,
            "<<" => Self::ShiftLeft,
            ">>" => Self::ShiftRight,
            "<" => Self::Less,
            ">" => Self::Greater,
            "=" | "EQUALS" => Self::Equal,
            "&" => Self::BitAnd,
            "^" | "XOR" => Self::BitXor,
            "|" => Self::BitOr,
            "AND" => Self::And,
            "OR" => Self::Or,
            _ => return None,
        };
        Some(op)
    }

    /// Two-word spellings such as `GREATER THAN`.
    #[must_use]
    pub fn from_words(first: &str, second: &str) -> Option<Self> {
        let first = first.to_ascii_uppercase();
        let second = second.to_ascii_uppercase();
        match (first.as_str(), second.as_str()) {
            ("GREATER", "THAN") => Some(Self::Greater),
            ("LESS", "THAN") => Some(Self::Less),
            ("EQUAL", "TO") => Some(Self::Equal),
            _ => None,
        }
    }

    /// Binding strength. The split point of an operation is the operator
    /// with the lowest rank.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Multiply | Self::Divide | Self::IntegerDivide | Self::Modulo | Self::Index => 15,
            Self::Add | Self::Subtract => 14,
            Self::ShiftLeft | Self::ShiftRight => 13,
            Self::Less | Self::Greater => 12,
            Self::Equal => 11,
            Self::BitAnd => 10,
            Self::BitXor => 9,
            Self::BitOr => 8,
            Self::And => 7,
            Self::Or => 6,
        }
    }

    /// Canonical spelling.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::IntegerDivide => "//",
            Self::Modulo => "%",
            Self::Index => "AT",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::Less => "<",
            Self::Greater => ">",
            Self::Equal => "=",
            Self::BitAnd => "&",
            Self::BitXor => "^",
            Self::BitOr => "|",
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punctuation {
    Period,
    Minus,
}

impl Punctuation {
    #[must_use]
    pub fn from_text(text: &str) -> Option<Self> {
        match text {
            "." => Some(Self::Period),
            "-" => Some(Self::Minus),
            _ => None,
        }
    }
}

impl fmt::Display for Punctuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Period => f.write_str("."),
            Self::Minus => f.write_str("-"),
        }
    }
}

/// Token kinds produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Literal(Value),
    Reserved(Reserved),
    Operator(OperatorKind),
    Identifier,
    Punctuation(Punctuation),
}

/// A classified span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        self.span.text()
    }

    /// The operator this token stands for between two operands. A bare `-`
    /// is punctuation but subtracts in operator position.
    #[must_use]
    pub const fn operator(&self) -> Option<OperatorKind> {
        match self.kind {
            TokenKind::Operator(op) => Some(op),
            TokenKind::Punctuation(Punctuation::Minus) => Some(OperatorKind::Subtract),
            _ => None,
        }
    }
}
