//! Source buffers and located substrings.
//!
//! A [`Span`] never owns text. It points into an immutable [`Source`]
//! shared through an `Arc`, so merging two spans is integer min/max and
//! the covered text is sliced out on demand.

use std::fmt;
use std::sync::Arc;

/// A named unit of source text (a file path, `"web"`, `"<stdin>"`, ...).
#[derive(Debug, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub text: String,
}

impl Source {
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            text: text.into(),
        })
    }

    /// 1-based line and column (in characters) of a byte offset.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let before = &self.text[..offset.min(self.text.len())];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }
}

/// Byte range `start..end` of one source unit.
///
/// The empty span (no unit, `0..0`) is the identity of [`Span::merge`].
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Span {
    source: Option<Arc<Source>>,
    start: usize,
    end: usize,
}

impl Span {
    /// # Panics
    ///
    /// Panics if `start > end`.
    #[must_use]
    pub fn new(source: &Arc<Source>, start: usize, end: usize) -> Self {
        assert!(start <= end, "span start {start} is past its end {end}");
        Self {
            source: Some(Arc::clone(source)),
            start,
            end,
        }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            source: None,
            start: 0,
            end: 0,
        }
    }

    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[must_use]
    pub fn source(&self) -> Option<&Arc<Source>> {
        self.source.as_ref()
    }

    /// Name of the source unit, or `""` for the empty span.
    #[must_use]
    pub fn unit(&self) -> &str {
        self.source.as_ref().map_or("", |s| s.name.as_str())
    }

    /// The covered text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.source
            .as_ref()
            .map_or("", |s| &s.text[self.start..self.end])
    }

    /// Minimal span covering both `self` and `other`.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        match (&self.source, &other.source) {
            (None, _) if self.is_empty() => other.clone(),
            (_, None) if other.is_empty() => self.clone(),
            (source, other_source) => Self {
                source: source.clone().or_else(|| other_source.clone()),
                start: self.start.min(other.start),
                end: self.end.max(other.end),
            },
        }
    }

    /// Fold [`Span::merge`] over an iterator of spans.
    pub fn merge_all<'a>(spans: impl IntoIterator<Item = &'a Self>) -> Self {
        spans
            .into_iter()
            .fold(Self::empty(), |acc, span| acc.merge(span))
    }
}

// Offsets only, so tree dumps stay readable.
impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => {
                let (line, column) = source.line_col(self.start);
                write!(f, "{}:{line}:{column}", source.name)
            }
            None => write!(f, "<empty>"),
        }
    }
}
