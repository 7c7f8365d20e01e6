use crate::ast::{Block, Statement};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::spanize;
use crate::span::{Source, Span};
use crate::stream::{Mismatch, Pattern, TokenStream};
use crate::token::{Punctuation, Reserved, Token, TokenKind};
use crate::tokenizer::tokenize;

/// Outcome of trying one grammar rule that did not fail outright.
#[derive(Debug)]
pub enum Match<T> {
    Matched(T),
    /// The rule does not apply here; try the next one.
    NotApplicable,
}

type Rule = fn(&mut TokenStream, usize) -> Result<Match<Statement>, ParseError>;

/// Grammar rules in the order they are tried.
const RULES: [Rule; 8] = [
    literal_statement,
    identifier_statement,
    conditional,
    loop_statement,
    show,
    assignment,
    input,
    operation,
];

const PERIOD: Pattern = Pattern::Punctuation(Punctuation::Period);

/// Deepest nesting of value positions and block bodies a parse accepts.
/// Every level costs stack in the parser and again in the evaluator.
pub const MAX_DEPTH: usize = 100;

/// Lex, tokenize and parse a source unit into a statement block.
///
/// # Errors
///
/// Returns `ParseError` on the first lexical or grammatical problem.
pub fn parse(source: &str, unit: &str) -> Result<Block, ParseError> {
    let source = Source::new(unit, source);
    let tokens = tokenize(&spanize(&source))?;
    parse_tokens(tokens)
}

/// Parse an already tokenized stream into a statement block.
///
/// # Errors
///
/// Returns `ParseError` when no rule matches or a rule fails.
pub fn parse_tokens(mut tokens: TokenStream) -> Result<Block, ParseError> {
    block(&mut tokens, 0)
}

fn block(tokens: &mut TokenStream, depth: usize) -> Result<Block, ParseError> {
    let mut statements = Vec::new();
    while !tokens.is_empty() {
        statements.push(statement(tokens, depth)?);
    }
    Ok(Block::new(statements))
}

/// One level deeper than `depth`, or `NestingTooDeep` over `tokens`.
fn deeper(depth: usize, tokens: &TokenStream) -> Result<usize, ParseError> {
    if depth >= MAX_DEPTH {
        return Err(ParseError::new(
            ParseErrorKind::NestingTooDeep { limit: MAX_DEPTH },
            tokens.span(),
        ));
    }
    Ok(depth + 1)
}

/// Parse a nested block body.
fn body(mut tokens: TokenStream, depth: usize) -> Result<Block, ParseError> {
    let depth = deeper(depth, &tokens)?;
    block(&mut tokens, depth)
}

/// Try each rule on a copy of the stream; commit the first that matches.
fn statement(tokens: &mut TokenStream, depth: usize) -> Result<Statement, ParseError> {
    for rule in RULES {
        let mut trial = tokens.clone();
        if let Match::Matched(statement) = rule(&mut trial, depth)? {
            *tokens = trial;
            return Ok(statement);
        }
    }
    Err(ParseError::new(ParseErrorKind::NoRuleMatches, tokens.span()))
}

/// Parse a value position. A single statement is returned as is, several
/// are wrapped in a block.
fn value(
    mut tokens: TokenStream,
    anchor: &Span,
    depth: usize,
) -> Result<Statement, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::ExpectedExpression,
            anchor.clone(),
        ));
    }
    let depth = deeper(depth, &tokens)?;
    let mut block = block(&mut tokens, depth)?;
    if block.statements.len() == 1 {
        if let Some(statement) = block.statements.pop() {
            return Ok(statement);
        }
    }
    Ok(Statement::Statements(block))
}

/// Span of the next token, or `fallback` at the end of the stream.
fn next_span(tokens: &TokenStream, fallback: &Span) -> Span {
    tokens
        .peek()
        .map_or_else(|| fallback.clone(), |token| token.span.clone())
}

fn literal_statement(
    tokens: &mut TokenStream,
    _depth: usize,
) -> Result<Match<Statement>, ParseError> {
    if tokens.len() != 1 {
        return Ok(Match::NotApplicable);
    }
    let Ok(token) = tokens.advance_if_matches(Pattern::Literal) else {
        return Ok(Match::NotApplicable);
    };
    Ok(Match::Matched(Statement::Literal(token)))
}

fn identifier_statement(
    tokens: &mut TokenStream,
    _depth: usize,
) -> Result<Match<Statement>, ParseError> {
    if tokens.len() != 1 {
        return Ok(Match::NotApplicable);
    }
    let Ok(token) = tokens.advance_if_matches(Pattern::Identifier) else {
        return Ok(Match::NotApplicable);
    };
    Ok(Match::Matched(Statement::Identifier(token)))
}

fn conditional(
    tokens: &mut TokenStream,
    depth: usize,
) -> Result<Match<Statement>, ParseError> {
    let opened_at = tokens.position();
    let Ok(keyword) = tokens.advance_if_matches(Pattern::Reserved(Reserved::If)) else {
        return Ok(Match::NotApplicable);
    };
    let condition = tokens.take_until(Pattern::Reserved(Reserved::Then), false)?;
    let then = expect_keyword(tokens, Reserved::Then, &keyword.span)?;
    let BlockBody { pass, fail, end } = block_body(tokens, opened_at, true)?;
    let _ = tokens.advance_if_matches(PERIOD);

    let condition = value(condition, &keyword.span.merge(&then.span), depth)?;
    let pass = body(pass, depth)?;
    let fail = match fail {
        Some(fail) => Some(body(fail, depth)?),
        None => None,
    };

    Ok(Match::Matched(Statement::Conditional {
        keyword: keyword.span,
        condition: Box::new(condition),
        pass,
        fail,
        end: end.span,
    }))
}

fn loop_statement(
    tokens: &mut TokenStream,
    depth: usize,
) -> Result<Match<Statement>, ParseError> {
    let opened_at = tokens.position();
    let Ok(keyword) = tokens.advance_if_matches(Pattern::Reserved(Reserved::While)) else {
        return Ok(Match::NotApplicable);
    };
    let condition = tokens.take_until(Pattern::Reserved(Reserved::Do), false)?;
    let do_token = expect_keyword(tokens, Reserved::Do, &keyword.span)?;
    let BlockBody { pass, end, .. } = block_body(tokens, opened_at, false)?;
    let _ = tokens.advance_if_matches(PERIOD);

    let condition = value(condition, &keyword.span.merge(&do_token.span), depth)?;
    let statements = body(pass, depth)?;

    Ok(Match::Matched(Statement::Loop {
        keyword: keyword.span,
        condition: Box::new(condition),
        body: statements,
        end: end.span,
    }))
}

fn expect_keyword(
    tokens: &mut TokenStream,
    word: Reserved,
    fallback: &Span,
) -> Result<Token, ParseError> {
    tokens
        .advance_if_matches(Pattern::Reserved(word))
        .map_err(|Mismatch| {
            ParseError::new(
                ParseErrorKind::ExpectedKeyword { expected: word },
                next_span(tokens, fallback),
            )
        })
}

/// Token ranges of a block body up to its matching `END`.
struct BlockBody {
    pass: TokenStream,
    fail: Option<TokenStream>,
    end: Token,
}

/// Scan forward counting nested `IF`/`WHILE` against `END`. With
/// `allow_else`, one `ELSE` at the outermost depth splits the body.
fn block_body(
    tokens: &mut TokenStream,
    opened_at: usize,
    allow_else: bool,
) -> Result<BlockBody, ParseError> {
    let body_start = tokens.position();
    let mut depth = 1usize;
    let mut else_at = None;

    loop {
        let at = tokens.position();
        let Some(token) = tokens.advance() else {
            return Err(ParseError::new(
                ParseErrorKind::UnclosedBlock,
                tokens.window(opened_at, at).span(),
            ));
        };

        match token.kind {
            TokenKind::Reserved(word) if word.opens_block() => depth += 1,
            TokenKind::Reserved(Reserved::End) => {
                depth -= 1;
                if depth == 0 {
                    let (pass_end, fail) = match else_at {
                        Some(e) => (e, Some(tokens.window(e + 1, at))),
                        None => (at, None),
                    };
                    return Ok(BlockBody {
                        pass: tokens.window(body_start, pass_end),
                        fail,
                        end: token,
                    });
                }
            }
            TokenKind::Reserved(Reserved::Else) if allow_else && depth == 1 => {
                if else_at.is_some() {
                    return Err(ParseError::new(ParseErrorKind::DuplicateElse, token.span));
                }
                else_at = Some(at);
            }
            _ => {}
        }
    }
}

fn show(tokens: &mut TokenStream, depth: usize) -> Result<Match<Statement>, ParseError> {
    let Ok(keyword) = tokens.advance_if_matches(Pattern::Reserved(Reserved::Show)) else {
        return Ok(Match::NotApplicable);
    };
    let value_tokens = tokens.take_until(PERIOD, true)?;
    let value = value(value_tokens, &keyword.span, depth)?;
    Ok(Match::Matched(Statement::Show {
        keyword: keyword.span,
        value: Box::new(value),
    }))
}

fn assignment(
    tokens: &mut TokenStream,
    depth: usize,
) -> Result<Match<Statement>, ParseError> {
    let Ok(keyword) = tokens.advance_if_matches(Pattern::Reserved(Reserved::Set)) else {
        return Ok(Match::NotApplicable);
    };
    let identifier = tokens
        .advance_if_matches(Pattern::Identifier)
        .map_err(|Mismatch| {
            ParseError::new(
                ParseErrorKind::ExpectedIdentifier,
                next_span(tokens, &keyword.span),
            )
        })?;
    let to = expect_keyword(tokens, Reserved::To, &identifier.span)?;
    let value_tokens = tokens.take_until(PERIOD, true)?;
    let value = value(value_tokens, &to.span, depth)?;
    Ok(Match::Matched(Statement::Assignment {
        keyword: keyword.span,
        identifier,
        value: Box::new(value),
    }))
}

/// `INPUT` on its own. Followed by anything but a period it is an operand
/// and left to the operation rule.
fn input(
    tokens: &mut TokenStream,
    _depth: usize,
) -> Result<Match<Statement>, ParseError> {
    let Ok(keyword) = tokens.advance_if_matches(Pattern::Reserved(Reserved::Input)) else {
        return Ok(Match::NotApplicable);
    };
    if !tokens.is_empty() && tokens.advance_if_matches(PERIOD).is_err() {
        return Ok(Match::NotApplicable);
    }
    Ok(Match::Matched(Statement::Input {
        keyword: keyword.span,
    }))
}

fn is_operand(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::Literal(_) | TokenKind::Identifier | TokenKind::Reserved(Reserved::Input)
    )
}

/// Binary operation over all remaining tokens, split at the lowest-ranked
/// operator. Ties go to the rightmost one so operators of equal rank
/// associate to the left.
fn operation(
    tokens: &mut TokenStream,
    depth: usize,
) -> Result<Match<Statement>, ParseError> {
    let applicable = !tokens.is_empty()
        && tokens
            .remaining()
            .iter()
            .all(|t| is_operand(t) || t.operator().is_some());
    if !applicable {
        return Ok(Match::NotApplicable);
    }

    let split = tokens
        .remaining()
        .iter()
        .enumerate()
        .filter_map(|(i, t)| t.operator().map(|op| (i, op)))
        .min_by(|(i, a), (j, b)| a.rank().cmp(&b.rank()).then(j.cmp(i)));
    let Some((offset, op)) = split else {
        return Err(ParseError::new(
            ParseErrorKind::MissingOperator,
            tokens.span(),
        ));
    };

    let start = tokens.position();
    let end = start + tokens.len();
    let at = start + offset;
    let at_span = tokens.remaining()[offset].span.clone();
    let operand = |from: usize, to: usize| {
        let side = tokens.window(from, to);
        if side.is_empty() {
            return Err(ParseError::new(
                ParseErrorKind::MissingOperand { operator: op },
                at_span.clone(),
            ));
        }
        value(side, &at_span, depth)
    };
    let lhs = operand(start, at)?;
    let rhs = operand(at + 1, end)?;
    *tokens = tokens.window(end, end);

    Ok(Match::Matched(Statement::Operation {
        lhs: Box::new(lhs),
        operator: op,
        at: at_span,
        rhs: Box::new(rhs),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::OperatorKind;
    use crate::value::Value;

    fn parse_input(input: &str) -> Result<Block, ParseError> {
        parse(input, "test")
    }

    fn single(input: &str) -> Statement {
        let mut block = parse_input(input).expect("parse failed");
        assert_eq!(block.statements.len(), 1, "expected one statement");
        block.statements.remove(0)
    }

    /// Render an expression tree with explicit grouping.
    fn grouped(statement: &Statement) -> String {
        match statement {
            Statement::Operation {
                lhs, operator, rhs, ..
            } => format!("({} {} {})", grouped(lhs), operator.symbol(), grouped(rhs)),
            other => other.span().text().to_string(),
        }
    }

    fn shown(input: &str) -> String {
        match single(input) {
            Statement::Show { value, .. } => grouped(&value),
            other => panic!("expected SHOW, got {other:?}"),
        }
    }

    #[test]
    fn top_level_is_always_a_block() {
        let block = parse_input("SHOW 1.").expect("parse failed");
        assert_eq!(block.statements.len(), 1);
        assert!(parse_input("").expect("parse failed").is_empty());
    }

    #[test]
    fn literal_and_identifier_statements() {
        assert!(matches!(single("5"), Statement::Literal(_)));
        assert!(matches!(single("x"), Statement::Identifier(_)));
    }

    #[test]
    fn multiplication_binds_tighter() {
        assert_eq!(shown("SHOW 2 + 3 * 4."), "(2 + (3 * 4))");
        assert_eq!(shown("SHOW 2 * 3 + 4."), "((2 * 3) + 4)");
    }

    #[test]
    fn equal_rank_associates_left() {
        assert_eq!(shown("SHOW 10 - 4 - 3."), "((10 - 4) - 3)");
        assert_eq!(shown("SHOW 8 / 2 * 3."), "((8 / 2) * 3)");
    }

    #[test]
    fn logical_operators_split_first() {
        assert_eq!(
            shown("SHOW a < 1 OR b = 2 AND c."),
            "((a < 1) OR ((b = 2) AND c))"
        );
    }

    #[test]
    fn assignment() {
        let Statement::Assignment {
            identifier, value, ..
        } = single("SET x TO 1.")
        else {
            panic!("expected assignment");
        };
        assert_eq!(identifier.text(), "x");
        assert!(matches!(
            *value,
            Statement::Literal(Token {
                kind: TokenKind::Literal(Value::Integer(1)),
                ..
            })
        ));
    }

    #[test]
    fn assignment_without_identifier() {
        let err = parse_input("SET TO 1.").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedIdentifier);
        assert_eq!(err.spans[0].text(), "TO");
    }

    #[test]
    fn assignment_without_to() {
        let err = parse_input("SET x 1.").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::ExpectedKeyword {
                expected: Reserved::To
            }
        );
        assert_eq!(err.spans[0].text(), "1");
    }

    #[test]
    fn show_requires_period() {
        let err = parse_input("SHOW 1").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::MissingTerminator { .. }));
    }

    #[test]
    fn conditional_with_else() {
        let Statement::Conditional { pass, fail, .. } =
            single("IF 1 > 2 THEN SHOW \"yes\". ELSE SHOW \"no\". END.")
        else {
            panic!("expected conditional");
        };
        assert_eq!(pass.statements.len(), 1);
        assert_eq!(fail.map(|f| f.statements.len()), Some(1));
    }

    #[test]
    fn nested_blocks() {
        let Statement::Loop { body, .. } =
            single("WHILE a DO IF b THEN SHOW 1. ELSE SHOW 2. END. SHOW 3. END.")
        else {
            panic!("expected loop");
        };
        assert_eq!(body.statements.len(), 2);
        assert!(matches!(
            body.statements[0],
            Statement::Conditional { fail: Some(_), .. }
        ));
    }

    #[test]
    fn empty_body_is_legal() {
        let Statement::Conditional { pass, fail, .. } = single("IF TRUE THEN END.") else {
            panic!("expected conditional");
        };
        assert!(pass.is_empty());
        assert!(fail.is_none());
    }

    #[test]
    fn unclosed_block() {
        let err = parse_input("WHILE TRUE DO SHOW 1.").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnclosedBlock);
        assert_eq!(err.spans[0].text(), "WHILE TRUE DO SHOW 1.");
    }

    #[test]
    fn duplicate_else() {
        let err = parse_input("IF a THEN ELSE ELSE END.").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::DuplicateElse);
    }

    #[test]
    fn conditional_span_covers_keywords() {
        let statement = single("IF a THEN SHOW 1. END.");
        assert_eq!(statement.span().text(), "IF a THEN SHOW 1. END");
    }

    #[test]
    fn conditional_as_value() {
        let Statement::Assignment { value, .. } = single("SET y TO IF c THEN 1 ELSE 2 END.") else {
            panic!("expected assignment");
        };
        assert!(matches!(*value, Statement::Conditional { .. }));
    }

    #[test]
    fn input_statement_and_operand() {
        assert!(matches!(single("INPUT."), Statement::Input { .. }));
        assert_eq!(shown("SHOW INPUT + 1."), "(INPUT + 1)");
    }

    #[test]
    fn missing_operator() {
        let err = parse_input("SHOW 1 2.").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingOperator);
        assert_eq!(err.spans[0].text(), "1 2");
    }

    #[test]
    fn missing_operand() {
        let err = parse_input("SHOW 1 +.").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::MissingOperand {
                operator: OperatorKind::Add
            }
        );
        assert_eq!(err.spans[0].text(), "+");
    }

    #[test]
    fn no_rule_matches() {
        let err = parse_input("THEN.").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NoRuleMatches);
    }

    fn chain(terms: usize) -> String {
        format!("SHOW {}.", vec!["1"; terms].join(" + "))
    }

    #[test]
    fn long_chain_within_limit() {
        let statement = single(&chain(MAX_DEPTH - 10));
        assert!(matches!(statement, Statement::Show { .. }));
    }

    #[test]
    fn long_chain_is_an_error() {
        let err = parse_input(&chain(500)).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NestingTooDeep { limit: MAX_DEPTH });
    }

    #[test]
    fn deeply_nested_blocks_are_an_error() {
        let source = format!(
            "{}{}",
            "IF TRUE THEN ".repeat(MAX_DEPTH + 1),
            "END. ".repeat(MAX_DEPTH + 1)
        );
        let err = parse_input(&source).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NestingTooDeep { limit: MAX_DEPTH });
    }

    #[test]
    fn parse_is_deterministic() {
        let input = "SET i TO 0. WHILE i < 3 DO SET i TO i + 1. END.";
        assert_eq!(parse_input(input), parse_input(input));
    }
}
