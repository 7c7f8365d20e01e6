//! Pretty-printer that serializes a statement tree back into canonical
//! Kode source.
//!
//! One statement per line, tab indentation inside `IF` and `WHILE` bodies,
//! upper-case keywords and canonical operator symbols. Literals and
//! identifiers keep the text they were written with.

use std::fmt::Write as _;

use crate::ast::{Block, Statement};

/// Format a statement tree as Kode source.
///
/// Statements that end in a terminator get their `.` only in statement
/// position. Anything in a value position (a `SET` value, a `SHOW` operand,
/// a condition) is printed on one line without terminators, since the
/// first `.` would end the enclosing statement.
#[must_use]
pub fn format(block: &Block) -> String {
    let mut out = String::new();
    format_block(&mut out, block, 0);
    out
}

fn format_block(out: &mut String, block: &Block, indent: usize) {
    for statement in &block.statements {
        format_statement(out, statement, indent);
    }
}

fn format_statement(out: &mut String, statement: &Statement, indent: usize) {
    if let Statement::Statements(block) = statement {
        format_block(out, block, indent);
        return;
    }

    let prefix = "\t".repeat(indent);
    out.push_str(&prefix);

    match statement {
        Statement::Conditional {
            condition,
            pass,
            fail,
            ..
        } => {
            let _ = writeln!(out, "IF {} THEN", inline(condition));
            format_block(out, pass, indent + 1);
            if let Some(fail) = fail {
                let _ = writeln!(out, "{prefix}ELSE");
                format_block(out, fail, indent + 1);
            }
            let _ = writeln!(out, "{prefix}END.");
        }
        Statement::Loop {
            condition, body, ..
        } => {
            let _ = writeln!(out, "WHILE {} DO", inline(condition));
            format_block(out, body, indent + 1);
            let _ = writeln!(out, "{prefix}END.");
        }
        Statement::Show { .. } | Statement::Assignment { .. } | Statement::Input { .. } => {
            let _ = writeln!(out, "{}.", inline(statement));
        }
        // Bare expressions are only legal as the last statement of a block
        // and take no terminator.
        _ => {
            let _ = writeln!(out, "{}", inline(statement));
        }
    }
}

/// Single-line form of a statement in value position.
fn inline(statement: &Statement) -> String {
    match statement {
        Statement::Statements(block) => inline_block(block),
        Statement::Literal(token) | Statement::Identifier(token) => token.text().to_string(),
        Statement::Assignment {
            identifier, value, ..
        } => format!("SET {} TO {}", identifier.text(), inline(value)),
        Statement::Operation {
            lhs, operator, rhs, ..
        } => format!("{} {} {}", inline(lhs), operator.symbol(), inline(rhs)),
        Statement::Show { value, .. } => format!("SHOW {}", inline(value)),
        Statement::Input { .. } => "INPUT".to_string(),
        Statement::Conditional {
            condition,
            pass,
            fail,
            ..
        } => {
            let mut text = format!("IF {} THEN", inline(condition));
            push_body(&mut text, pass);
            if let Some(fail) = fail {
                text.push_str(" ELSE");
                push_body(&mut text, fail);
            }
            text.push_str(" END");
            text
        }
        Statement::Loop {
            condition, body, ..
        } => {
            let mut text = format!("WHILE {} DO", inline(condition));
            push_body(&mut text, body);
            text.push_str(" END");
            text
        }
    }
}

fn inline_block(block: &Block) -> String {
    block
        .statements
        .iter()
        .map(inline)
        .collect::<Vec<_>>()
        .join(" ")
}

fn push_body(text: &mut String, block: &Block) {
    if !block.is_empty() {
        text.push(' ');
        text.push_str(&inline_block(block));
    }
}
