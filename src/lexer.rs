use std::sync::Arc;

use crate::span::{Source, Span};

/// Characters that always form a one-character span of their own.
pub const PUNCTUATION: [char; 4] = ['.', '-', '"', '\''];

/// Split a source unit into minimal spans.
///
/// Runs close at whitespace boundaries and around punctuation. Whitespace
/// runs are kept as spans of their own so later stages can tell adjacent
/// spans from separated ones.
#[must_use]
pub fn spanize(source: &Arc<Source>) -> Vec<Span> {
    Lexer::new(source).spanize()
}

struct Lexer<'a> {
    source: &'a Arc<Source>,
    spans: Vec<Span>,
    start: usize,
    in_space: bool,
}

impl<'a> Lexer<'a> {
    const fn new(source: &'a Arc<Source>) -> Self {
        Self {
            source,
            spans: Vec::new(),
            start: 0,
            in_space: false,
        }
    }

    fn spanize(mut self) -> Vec<Span> {
        for (pos, ch) in self.source.text.char_indices() {
            if PUNCTUATION.contains(&ch) {
                self.close(pos);
                self.start = pos + ch.len_utf8();
                self.spans.push(Span::new(self.source, pos, self.start));
                self.in_space = false;
            } else if ch.is_whitespace() != self.in_space {
                self.close(pos);
                self.in_space = ch.is_whitespace();
            }
        }
        self.close(self.source.text.len());
        self.spans
    }

    fn close(&mut self, pos: usize) {
        if pos > self.start {
            self.spans.push(Span::new(self.source, self.start, pos));
        }
        self.start = pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        let source = Source::new("test", input);
        spanize(&source)
            .iter()
            .map(|s| s.text().to_string())
            .collect()
    }

    #[test]
    fn words_and_whitespace() {
        assert_eq!(texts("SHOW  x"), ["SHOW", "  ", "x"]);
    }

    #[test]
    fn punctuation_is_split_out() {
        assert_eq!(texts("SHOW 3.14."), ["SHOW", " ", "3", ".", "14", "."]);
        assert_eq!(texts("-5"), ["-", "5"]);
        assert_eq!(texts("\"ab cd\""), ["\"", "ab", " ", "cd", "\""]);
    }

    #[test]
    fn adjacent_punctuation() {
        assert_eq!(texts("..'"), [".", ".", "'"]);
    }

    #[test]
    fn leading_whitespace_and_newlines() {
        assert_eq!(texts("\n\tSET x"), ["\n\t", "SET", " ", "x"]);
    }

    #[test]
    fn empty_source() {
        assert!(texts("").is_empty());
    }

    #[test]
    fn spans_cover_source_exactly() {
        let input = "IF a > 2 THEN\n  SHOW 'x'.\nEND.";
        let source = Source::new("test", input);
        let spans = spanize(&source);
        let mut pos = 0;
        for span in &spans {
            assert_eq!(span.start(), pos);
            assert!(!span.is_empty());
            pos = span.end();
        }
        assert_eq!(pos, input.len());
    }
}
