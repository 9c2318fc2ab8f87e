//! Evaluation errors.
//!
//! `EvalErrorKind` is the structured category; factory functions populate
//! both the kind and a human-readable message, so call sites never format
//! strings ad hoc and messages stay consistent across the evaluator.

use std::fmt;

use rill_ir::Span;

use crate::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Arithmetic
    DivisionByZero,
    IntegerOverflow {
        operation: String,
    },

    // Types
    TypeMismatch {
        expected: String,
        got: String,
    },

    // Access
    UndefinedVariable {
        name: String,
    },
    ImmutableBinding {
        name: String,
    },

    // Calls
    NotCallable {
        type_name: String,
    },
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    NoDispatchImpl {
        name: String,
        type_name: String,
    },
    RecursionLimit {
        depth: usize,
    },

    // Special forms
    InvalidSpecialForm {
        form: &'static str,
        reason: String,
    },

    /// Catch-all for conditions without a structured kind.
    Custom {
        message: String,
    },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalErrorKind::DivisionByZero => write!(f, "division by zero"),
            EvalErrorKind::IntegerOverflow { operation } => {
                write!(f, "integer overflow in {operation}")
            }
            EvalErrorKind::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            EvalErrorKind::UndefinedVariable { name } => {
                write!(f, "undefined variable: {name}")
            }
            EvalErrorKind::ImmutableBinding { name } => {
                write!(f, "cannot assign to immutable binding: {name}")
            }
            EvalErrorKind::NotCallable { type_name } => {
                write!(f, "value of type {type_name} is not callable")
            }
            EvalErrorKind::ArityMismatch {
                name,
                expected,
                got,
            } => write!(f, "{name} expects {expected} argument(s), got {got}"),
            EvalErrorKind::NoDispatchImpl { name, type_name } => {
                write!(f, "no implementation of {name} for type {type_name}")
            }
            EvalErrorKind::RecursionLimit { depth } => {
                write!(f, "recursion limit exceeded at depth {depth}")
            }
            EvalErrorKind::InvalidSpecialForm { form, reason } => {
                write!(f, "invalid {form} form: {reason}")
            }
            EvalErrorKind::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    /// Structured category.
    pub kind: EvalErrorKind,
    /// Human-readable message (equals `kind.to_string()` for factory-created
    /// errors).
    pub message: String,
    /// Source location where the error occurred, when known.
    pub span: Option<Span>,
}

impl EvalError {
    /// Create an error with just a message (`Custom` kind).
    ///
    /// Prefer the specific factory functions when a structured kind exists.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
            span: None,
        }
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            span: None,
        }
    }

    /// Attach a source span.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(span) = self.span {
            write!(f, " at {span}")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

// Factory functions

pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

pub fn integer_overflow(operation: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow {
        operation: operation.into(),
    })
}

pub fn type_mismatch(expected: impl Into<String>, got: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.into(),
        got: got.into(),
    })
}

pub fn undefined_variable(name: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable { name: name.into() })
}

pub fn immutable_binding(name: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ImmutableBinding { name: name.into() })
}

pub fn not_callable(type_name: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        type_name: type_name.into(),
    })
}

pub fn arity_mismatch(name: impl Into<String>, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.into(),
        expected,
        got,
    })
}

pub fn no_dispatch_impl(name: impl Into<String>, type_name: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoDispatchImpl {
        name: name.into(),
        type_name: type_name.into(),
    })
}

pub fn recursion_limit_exceeded(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RecursionLimit { depth })
}

pub fn invalid_special_form(form: &'static str, reason: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidSpecialForm {
        form,
        reason: reason.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_message_matches_kind() {
        let err = undefined_variable("x");
        assert_eq!(err.message, "undefined variable: x");
        assert_eq!(err.kind.to_string(), err.message);
    }

    #[test]
    fn with_span_displays_location() {
        let err = division_by_zero().with_span(Span::new(3, 8));
        assert_eq!(err.to_string(), "division by zero at 3:8");
    }
}
