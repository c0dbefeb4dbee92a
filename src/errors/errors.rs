use thiserror::Error;

use crate::Span;

/// A compile error: what went wrong, and where in the source.
///
/// Every stage raises at most one of these; nothing is accumulated. The
/// optimizer is total and raises none, and the generator only raises on
/// trees a conforming analyzer cannot produce.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        Error { kind, span }
    }

    pub fn get_span(&self) -> Span {
        self.span
    }

    pub fn get_kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The taxonomy name for this error, as surfaced by the driver.
    ///
    /// Front-end variants all collapse onto `SyntaxError`: the parser's
    /// only externally visible verdict is syntax validity plus a message.
    pub fn get_error_name(&self) -> &'static str {
        match &self.kind {
            ErrorKind::SyntaxError { .. }
            | ErrorKind::UnrecognisedToken { .. }
            | ErrorKind::UnexpectedToken { .. }
            | ErrorKind::UnexpectedTokenDetailed { .. }
            | ErrorKind::NumberParseError { .. } => "SyntaxError",
            ErrorKind::UndeclaredIdentifier { .. } => "UndeclaredIdentifier",
            ErrorKind::UndeclaredFunction { .. } => "UndeclaredFunction",
            ErrorKind::DuplicateDeclaration { .. } | ErrorKind::DuplicateFunction { .. } => {
                "DuplicateDeclaration"
            }
            ErrorKind::ImmutableAssignment { .. } => "ImmutableAssignment",
            ErrorKind::InvalidControlFlow { .. } => "InvalidControlFlow",
            ErrorKind::ExpectedBoolean
            | ErrorKind::ExpectedNumber
            | ErrorKind::ExpectedNumberOrString
            | ErrorKind::ExpectedArray
            | ErrorKind::ExpectedStruct { .. } => "TypeError",
            ErrorKind::TypeMismatch => "TypeMismatch",
            ErrorKind::ArityMismatch { .. } => "ArityMismatch",
            ErrorKind::UnknownField { .. } => "UnknownField",
            ErrorKind::CodegenError { .. } => "CodegenError",
        }
    }

    pub fn get_message(&self) -> String {
        self.kind.to_string()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.get_error_name(), self.kind)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    // Front end
    #[error("{message}")]
    SyntaxError { message: String },
    #[error("Unrecognised token `{token}`")]
    UnrecognisedToken { token: String },
    #[error("Unexpected token `{token}`")]
    UnexpectedToken { token: String },
    #[error("Unexpected token `{token}`, {message}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("Invalid number `{token}`")]
    NumberParseError { token: String },

    // Name resolution
    #[error("Identifier {name} not declared")]
    UndeclaredIdentifier { name: String },
    #[error("Function {name} not declared")]
    UndeclaredFunction { name: String },
    #[error("Identifier {name} already declared")]
    DuplicateDeclaration { name: String },
    #[error("Function {name} already declared")]
    DuplicateFunction { name: String },
    #[error("Cannot assign to immutable {name}")]
    ImmutableAssignment { name: String },
    #[error("{operation} can only appear in a {construct}")]
    InvalidControlFlow {
        operation: &'static str,
        construct: &'static str,
    },

    // Typing
    #[error("Expected a boolean")]
    ExpectedBoolean,
    #[error("Expected a number")]
    ExpectedNumber,
    #[error("Expected a number or string")]
    ExpectedNumberOrString,
    #[error("Expected an array")]
    ExpectedArray,
    #[error("Cannot access field {field} of non-struct type")]
    ExpectedStruct { field: String },
    #[error("Operands do not have the same type")]
    TypeMismatch,
    #[error("{expected} argument(s) required but {received} passed")]
    ArityMismatch { expected: usize, received: usize },
    #[error("Field {field} not found in struct")]
    UnknownField { field: String },

    // Back end (unreachable for analyzer-validated trees)
    #[error("Cannot generate code for {construct}")]
    CodegenError { construct: String },
}
