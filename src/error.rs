//! The shared error taxonomy (§7). Every fallible stage eventually produces
//! an [`EvalError`], tagged with the [`ErrorKind`] that becomes the
//! `errorType` field of the evaluation result (§6).
//!
//! Mirrors the source interpreter's own error-enum style: a flat enum, a
//! hand-written `Display`, and `From` conversions threading an earlier
//! stage's error into a later one's (see `ParseError`/`RunError` in the
//! interpreter this crate is grounded on) rather than a derive-macro error
//! crate.

use std::fmt;

/// Which bucket of §7 an error falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, serde::Serialize, serde::Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorKind {
    Syntax,
    Security,
    Type,
    Runtime,
    Complexity,
    Timeout,
}

/// A structured evaluation error: a kind (for machine dispatch) plus a
/// human-readable message (for display).
#[derive(Debug, Clone, PartialEq)]
pub struct EvalError {
    pub kind: ErrorKind,
    pub message: String,
}

impl EvalError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, message)
    }

    pub fn security(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Security, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Type, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Runtime, message)
    }

    pub fn complexity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Complexity, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for EvalError {}

pub type EvalResult<T> = Result<T, EvalError>;
