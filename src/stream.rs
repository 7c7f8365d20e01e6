//! Cursor over a shared token list.
//!
//! Cloning a [`TokenStream`] copies only the cursor, so grammar rules can
//! try themselves on a copy and the caller commits the copy on success.

use std::fmt;
use std::sync::Arc;

use crate::error::{ParseError, ParseErrorKind};
use crate::span::Span;
use crate::token::{Punctuation, Reserved, Token, TokenKind};

/// What a token is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Literal,
    Identifier,
    /// Anything usable between two operands, see [`Token::operator`].
    Operator,
    Reserved(Reserved),
    Punctuation(Punctuation),
}

impl Pattern {
    #[must_use]
    pub fn matches(self, token: &Token) -> bool {
        match (self, &token.kind) {
            (Self::Literal, TokenKind::Literal(_)) | (Self::Identifier, TokenKind::Identifier) => {
                true
            }
            (Self::Operator, _) => token.operator().is_some(),
            (Self::Reserved(word), TokenKind::Reserved(r)) => word == *r,
            (Self::Punctuation(p), TokenKind::Punctuation(q)) => p == *q,
            _ => false,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal => write!(f, "a literal"),
            Self::Identifier => write!(f, "an identifier"),
            Self::Operator => write!(f, "an operator"),
            Self::Reserved(word) => write!(f, "{word}"),
            Self::Punctuation(p) => write!(f, "'{p}'"),
        }
    }
}

/// The next token did not match. Not an error by itself: the caller
/// decides whether to try another rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch;

#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Arc<[Token]>,
    pos: usize,
    end: usize,
}

impl TokenStream {
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = tokens.len();
        Self {
            tokens: tokens.into(),
            pos: 0,
            end,
        }
    }

    /// Number of tokens left.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.pos
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pos >= self.end
    }

    #[must_use]
    pub fn remaining(&self) -> &[Token] {
        &self.tokens[self.pos..self.end]
    }

    #[must_use]
    pub fn peek(&self) -> Option<&Token> {
        self.remaining().first()
    }

    #[must_use]
    pub fn peek_matches(&self, pattern: Pattern) -> bool {
        self.peek().is_some_and(|token| pattern.matches(token))
    }

    pub fn advance(&mut self) -> Option<Token> {
        let token = self.peek().cloned()?;
        self.pos += 1;
        Some(token)
    }

    /// Consume the next token if it matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`Mismatch`] without moving the cursor otherwise.
    pub fn advance_if_matches(&mut self, pattern: Pattern) -> Result<Token, Mismatch> {
        if self.peek_matches(pattern) {
            self.advance().ok_or(Mismatch)
        } else {
            Err(Mismatch)
        }
    }

    /// Consume tokens up to the first one matching `pattern` and return
    /// them as a stream of their own. With `inclusive` the matching token
    /// is consumed as well (it is never part of the returned stream).
    ///
    /// # Errors
    ///
    /// Fails with [`ParseErrorKind::MissingTerminator`] over the token
    /// before the cursor and everything after it when nothing matches.
    pub fn take_until(&mut self, pattern: Pattern, inclusive: bool) -> Result<Self, ParseError> {
        let start = self.pos;
        let Some(offset) = self.remaining().iter().position(|t| pattern.matches(t)) else {
            let from = start.saturating_sub(1);
            self.pos = self.end;
            return Err(ParseError::new(
                ParseErrorKind::MissingTerminator { expected: pattern },
                self.window(from, self.end).span(),
            ));
        };
        let stop = start + offset;
        self.pos = if inclusive { stop + 1 } else { stop };
        Ok(self.window(start, stop))
    }

    /// Merged span of the remaining tokens.
    #[must_use]
    pub fn span(&self) -> Span {
        Span::merge_all(self.remaining().iter().map(|t| &t.span))
    }

    /// Absolute cursor position, for use with [`TokenStream::window`].
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// A stream over `from..to` of the same token list.
    #[must_use]
    pub fn window(&self, from: usize, to: usize) -> Self {
        Self {
            tokens: Arc::clone(&self.tokens),
            pos: from,
            end: to,
        }
    }
}
