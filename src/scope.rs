use std::collections::HashMap;

use crate::error::{InterpreterError, InterpreterErrorKind};
use crate::span::Span;
use crate::value::Literal;

/// Block-structured variable bindings.
///
/// Values live in one flat map. Each frame records the names first bound
/// while it was the innermost frame, and popping the frame removes exactly
/// those names. Rebinding an existing name updates it in place and leaves
/// its record in the frame that introduced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    values: HashMap<String, Literal>,
    frames: Vec<Vec<String>>,
}

impl Scope {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            frames: vec![Vec::new()],
        }
    }

    pub fn push(&mut self) {
        self.frames.push(Vec::new());
    }

    /// Drop the innermost frame and its names. The outermost frame stays.
    pub fn pop(&mut self) {
        if self.frames.len() <= 1 {
            return;
        }
        if let Some(names) = self.frames.pop() {
            for name in names {
                self.values.remove(&name);
            }
        }
    }

    pub fn put(&mut self, name: &str, value: Literal) {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            return;
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.push(name.to_string());
        }
        self.values.insert(name.to_string(), value);
    }

    /// Look up `name`, citing `at` when it is unbound.
    ///
    /// # Errors
    ///
    /// Returns `UndefinedVariable` if no frame binds `name`.
    pub fn get(&self, name: &str, at: &Span) -> Result<&Literal, InterpreterError> {
        self.values.get(name).ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorKind::UndefinedVariable {
                    name: name.to_string(),
                },
                at.clone(),
            )
        })
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}
