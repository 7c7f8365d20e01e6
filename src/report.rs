//! Location-annotated error rendering shared by every front end.
//!
//! ```text
//! |
//! | ParseError: expected an identifier after SET
//! |
//! | (main.kode:1:5) SET TO 1.
//! |                     ^^
//! ```

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::span::{Source, Span};

/// Render a header naming the error and, for every source line touched by
/// `spans`, the line and a caret line beneath the covered columns.
#[must_use]
pub fn render(title: &str, message: &str, spans: &[Span]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "|\n| {title}: {message}\n|");

    let mut units: Vec<(&Arc<Source>, BTreeSet<usize>)> = Vec::new();
    for span in spans {
        let Some(source) = span.source() else {
            continue;
        };
        let found = units.iter().position(|(s, _)| Arc::ptr_eq(s, source));
        let index = match found {
            Some(index) => index,
            None => {
                units.push((source, BTreeSet::new()));
                units.len() - 1
            }
        };
        let marked = &mut units[index].1;
        if span.is_empty() {
            marked.insert(point_column(source, span.start()));
        } else {
            marked.extend(span.start()..span.end());
        }
    }

    for (source, marked) in &units {
        render_unit(&mut out, source, marked);
    }

    out
}

/// Where a zero-width span is drawn: its own offset, or the character
/// before it when it sits on a newline or the end of input.
fn point_column(source: &Source, offset: usize) -> usize {
    match source.text[offset..].chars().next() {
        Some(ch) if ch != '\n' => offset,
        _ => source.text[..offset]
            .char_indices()
            .next_back()
            .map_or(offset, |(i, _)| i),
    }
}

fn render_unit(out: &mut String, source: &Source, marked: &BTreeSet<usize>) {
    let mut line_start = 0;
    for (number, line) in source.text.split('\n').enumerate() {
        let line_end = line_start + line.len();
        let line = line.strip_suffix('\r').unwrap_or(line);
        let carets: String = line
            .char_indices()
            .map(|(i, _)| {
                if marked.contains(&(line_start + i)) {
                    '^'
                } else {
                    ' '
                }
            })
            .collect();
        if let Some(column) = carets.find('^') {
            let column = carets[..column].chars().count() + 1;
            let prefix = format!("({}:{}:{column})", source.name, number + 1);
            let text = line.replace('\t', " ");
            let _ = writeln!(out, "| {prefix} {text}");
            let _ = writeln!(
                out,
                "|{} {}",
                " ".repeat(prefix.chars().count() + 1),
                carets.trim_end()
            );
        }

        line_start = line_end + 1;
    }
}
