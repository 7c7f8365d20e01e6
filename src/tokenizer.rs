use crate::error::{ParseError, ParseErrorKind};
use crate::span::Span;
use crate::stream::TokenStream;
use crate::token::{OperatorKind, Punctuation, Reserved, Token, TokenKind};
use crate::value::{STRING_DELIMITERS, classify, is_digits};

/// Classify lexer spans into tokens.
///
/// Each non-whitespace span is offered to the literal, punctuation,
/// operator, reserved word and identifier classifiers in that order. The
/// first one that accepts it builds the token, possibly absorbing the
/// spans that follow (numbers, quoted strings, two-word operators).
///
/// # Errors
///
/// Returns `ParseError` for unterminated strings, malformed literals and
/// spans no classifier accepts.
pub fn tokenize(spans: &[Span]) -> Result<TokenStream, ParseError> {
    Tokenizer { spans, pos: 0 }.tokenize().map(TokenStream::new)
}

struct Tokenizer<'a> {
    spans: &'a [Span],
    pos: usize,
}

impl Tokenizer<'_> {
    fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        while let Some(span) = self.spans.get(self.pos) {
            if is_whitespace(span) {
                self.pos += 1;
                continue;
            }

            let rest = &self.spans[self.pos..];
            let (token, consumed) = if starts_literal(rest) {
                literal(rest)?
            } else if let Some(p) = Punctuation::from_text(span.text()) {
                (Token::new(TokenKind::Punctuation(p), span.clone()), 1)
            } else if let Some((op, consumed)) = operator(rest) {
                let span = Span::merge_all(&rest[..consumed]);
                (Token::new(TokenKind::Operator(op), span), consumed)
            } else if let Some(word) = Reserved::from_word(span.text()) {
                (Token::new(TokenKind::Reserved(word), span.clone()), 1)
            } else if is_identifier(span.text()) {
                (Token::new(TokenKind::Identifier, span.clone()), 1)
            } else {
                return Err(ParseError::new(
                    ParseErrorKind::UnrecognizedToken,
                    span.clone(),
                ));
            };

            tokens.push(token);
            self.pos += consumed;
        }

        Ok(tokens)
    }
}

fn is_whitespace(span: &Span) -> bool {
    span.text().chars().all(char::is_whitespace)
}

fn starts_literal(spans: &[Span]) -> bool {
    let text = spans[0].text();
    if text.starts_with(STRING_DELIMITERS) || is_digits(text) {
        return true;
    }
    if text == "-" {
        return spans.get(1).is_some_and(|next| is_digits(next.text()));
    }
    matches!(
        text.to_ascii_uppercase().as_str(),
        "TRUE" | "FALSE" | "NONE"
    )
}

/// Build a literal token from the front of `spans`, returning it with the
/// number of spans it absorbed.
fn literal(spans: &[Span]) -> Result<(Token, usize), ParseError> {
    let first = &spans[0];
    let text = first.text();

    let consumed = if text.starts_with(STRING_DELIMITERS) {
        let closing = spans
            .iter()
            .skip(1)
            .position(|span| span.text() == text)
            .ok_or_else(|| ParseError::new(ParseErrorKind::UnterminatedString, first.clone()))?;
        closing + 2
    } else if is_digits(text) || text == "-" {
        number_length(spans)
    } else {
        1
    };

    let span = Span::merge_all(&spans[..consumed]);
    let value = classify(span.text())
        .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidLiteral, span.clone()))?;

    Ok((Token::new(TokenKind::Literal(value), span), consumed))
}

/// Spans making up a number: an optional leading `-`, a digit run, and at
/// most one `.` that is directly followed by another digit run.
fn number_length(spans: &[Span]) -> usize {
    let mut len = usize::from(spans[0].text() == "-");
    len += 1;
    let is_fraction = spans.get(len).is_some_and(|s| s.text() == ".")
        && spans.get(len + 1).is_some_and(|s| is_digits(s.text()));
    if is_fraction {
        len += 2;
    }
    len
}

/// Operator at the front of `spans`: a single word, or two words separated
/// by one whitespace span.
fn operator(spans: &[Span]) -> Option<(OperatorKind, usize)> {
    if let [first, gap, second, ..] = spans {
        if is_whitespace(gap) {
            if let Some(op) = OperatorKind::from_words(first.text(), second.text()) {
                return Some((op, 3));
            }
        }
    }
    OperatorKind::from_word(spans[0].text()).map(|op| (op, 1))
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::spanize;
    use crate::span::Source;
    use crate::value::Value;

    fn tokens(input: &str) -> Vec<Token> {
        let source = Source::new("test", input);
        tokenize(&spanize(&source))
            .expect("tokenize failed")
            .remaining()
            .to_vec()
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokens(input).into_iter().map(|t| t.kind).collect()
    }

    fn error(input: &str) -> ParseError {
        let source = Source::new("test", input);
        tokenize(&spanize(&source)).expect_err("tokenize should fail")
    }

    #[test]
    fn assignment() {
        assert_eq!(
            kinds("SET x TO 1."),
            [
                TokenKind::Reserved(Reserved::Set),
                TokenKind::Identifier,
                TokenKind::Reserved(Reserved::To),
                TokenKind::Literal(Value::Integer(1)),
                TokenKind::Punctuation(Punctuation::Period),
            ]
        );
    }

    #[test]
    fn numbers_absorb_sign_and_fraction() {
        let t = tokens("SHOW -3.75.");
        assert_eq!(t[1].kind, TokenKind::Literal(Value::Float(-3.75)));
        assert_eq!(t[1].text(), "-3.75");
        assert_eq!(t[2].kind, TokenKind::Punctuation(Punctuation::Period));
    }

    #[test]
    fn trailing_period_is_not_a_fraction() {
        let t = tokens("SET x TO 3. SHOW x.");
        assert_eq!(t[3].kind, TokenKind::Literal(Value::Integer(3)));
        assert_eq!(t[4].kind, TokenKind::Punctuation(Punctuation::Period));
    }

    #[test]
    fn separated_minus_is_punctuation() {
        let t = tokens("x - 1");
        assert_eq!(t[1].kind, TokenKind::Punctuation(Punctuation::Minus));
        assert_eq!(t[2].kind, TokenKind::Literal(Value::Integer(1)));
    }

    #[test]
    fn strings_keep_inner_whitespace_and_punctuation() {
        let t = tokens("SHOW \"a b. c-d\".");
        assert_eq!(t[1].kind, TokenKind::Literal(Value::String("a b. c-d".into())));
        assert_eq!(t[1].text(), "\"a b. c-d\"");
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn other_quote_inside_string() {
        let t = tokens("'say \"hi\"'");
        assert_eq!(t[0].kind, TokenKind::Literal(Value::String("say \"hi\"".into())));
    }

    #[test]
    fn two_word_operator() {
        let t = tokens("a GREATER THAN b");
        assert_eq!(t.len(), 3);
        assert_eq!(t[1].kind, TokenKind::Operator(OperatorKind::Greater));
        assert_eq!(t[1].text(), "GREATER THAN");
    }

    #[test]
    fn lone_first_word_is_identifier() {
        assert_eq!(kinds("greater"), [TokenKind::Identifier]);
    }

    #[test]
    fn keyword_literals() {
        assert_eq!(
            kinds("true FALSE None"),
            [
                TokenKind::Literal(Value::Boolean(true)),
                TokenKind::Literal(Value::Boolean(false)),
                TokenKind::Literal(Value::None),
            ]
        );
    }

    #[test]
    fn unterminated_string() {
        let err = error("SHOW \"abc.");
        assert_eq!(err.kind, ParseErrorKind::UnterminatedString);
        assert_eq!(err.spans[0].text(), "\"");
    }

    #[test]
    fn unrecognized_token() {
        let err = error("SHOW 12ab.");
        assert_eq!(err.kind, ParseErrorKind::UnrecognizedToken);
        assert_eq!(err.spans[0].text(), "12ab");
        assert_eq!(error("SET x TO 1 ! 2.").spans[0].text(), "!");
    }
}
