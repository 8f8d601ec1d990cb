use thiserror::Error as ThisError;

/// Broad category of a failure, used by callers to tell user-facing
/// formula mistakes apart from evaluation problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed formula text (lexer or parser).
    Parse,
    /// Wrong number of arguments for a construct.
    Arity,
    /// Invalid, duplicate or colliding binding name.
    Naming,
    /// A name that no scope and no root variable defines.
    UnresolvedReference,
    /// Type mismatches, reducer failures and other runtime problems.
    Evaluation,
    /// Invalid engine configuration.
    Config,
}

#[derive(Debug, Clone, PartialEq, ThisError)]
#[error("{}{}", .message, at_position(.position))]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub position: Option<usize>,
}

fn at_position(position: &Option<usize>) -> String {
    match position {
        Some(pos) => format!(" at position {}", pos),
        None => String::new(),
    }
}

impl Error {
    pub fn new<M: Into<String>>(message: M, position: Option<usize>) -> Self {
        Self::with_kind(ErrorKind::Evaluation, message, position)
    }

    pub fn with_kind<M: Into<String>>(kind: ErrorKind, message: M, position: Option<usize>) -> Self {
        Self { kind, message: message.into(), position }
    }

    pub fn parse<M: Into<String>>(message: M, position: Option<usize>) -> Self {
        Self::with_kind(ErrorKind::Parse, message, position)
    }

    pub fn arity<M: Into<String>>(message: M) -> Self {
        Self::with_kind(ErrorKind::Arity, message, None)
    }

    pub fn naming<M: Into<String>>(message: M) -> Self {
        Self::with_kind(ErrorKind::Naming, message, None)
    }

    pub fn unresolved(name: &str) -> Self {
        Self::with_kind(ErrorKind::UnresolvedReference, format!("Unresolved reference: {}", name), None)
    }

    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::with_kind(ErrorKind::Config, message, None)
    }
}
