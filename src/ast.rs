use crate::span::Span;
use crate::token::{OperatorKind, Token};

/// Ordered sequence of statements. An empty block is legal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Block {
    #[must_use]
    pub const fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    #[must_use]
    pub fn span(&self) -> Span {
        self.statements
            .iter()
            .fold(Span::empty(), |acc, s| acc.merge(&s.span()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Executable statement tree. Never mutated after parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Statements(Block),
    Literal(Token),
    Identifier(Token),
    /// `SET name TO value`.
    Assignment {
        keyword: Span,
        identifier: Token,
        value: Box<Self>,
    },
    Operation {
        lhs: Box<Self>,
        operator: OperatorKind,
        /// Span of the operator word or symbol as written.
        at: Span,
        rhs: Box<Self>,
    },
    /// `SHOW value`.
    Show { keyword: Span, value: Box<Self> },
    Input { keyword: Span },
    /// `IF condition THEN pass [ELSE fail] END`.
    Conditional {
        keyword: Span,
        condition: Box<Self>,
        pass: Block,
        fail: Option<Block>,
        end: Span,
    },
    /// `WHILE condition DO body END`.
    Loop {
        keyword: Span,
        condition: Box<Self>,
        body: Block,
        end: Span,
    },
}

impl Statement {
    /// Source range of the statement, derived from its children and its
    /// own keywords.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Statements(block) => block.span(),
            Self::Literal(token) | Self::Identifier(token) => token.span.clone(),
            Self::Assignment { keyword, value, .. } | Self::Show { keyword, value } => {
                keyword.merge(&value.span())
            }
            Self::Operation { lhs, rhs, .. } => lhs.span().merge(&rhs.span()),
            Self::Input { keyword } => keyword.clone(),
            Self::Conditional { keyword, end, .. } | Self::Loop { keyword, end, .. } => {
                keyword.merge(end)
            }
        }
    }
}
