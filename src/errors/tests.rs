//! Unit tests for error handling.

use crate::errors::errors::{Error, ErrorKind};
use crate::Span;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorKind::UnrecognisedToken {
            token: "@".to_string(),
        },
        Span::new(10, 11),
    );

    assert_eq!(error.get_error_name(), "SyntaxError");
    assert_eq!(error.get_span(), Span::new(10, 11));
}

#[test]
fn test_undeclared_identifier_message() {
    let error = Error::new(
        ErrorKind::UndeclaredIdentifier {
            name: "x".to_string(),
        },
        Span::null(),
    );

    assert_eq!(error.get_error_name(), "UndeclaredIdentifier");
    assert_eq!(error.get_message(), "Identifier x not declared");
}

#[test]
fn test_duplicate_declaration_names() {
    let variable = Error::new(
        ErrorKind::DuplicateDeclaration {
            name: "x".to_string(),
        },
        Span::null(),
    );
    let function = Error::new(
        ErrorKind::DuplicateFunction {
            name: "f".to_string(),
        },
        Span::null(),
    );

    // Both namespaces report under the same taxonomy name.
    assert_eq!(variable.get_error_name(), "DuplicateDeclaration");
    assert_eq!(function.get_error_name(), "DuplicateDeclaration");
    assert_eq!(function.get_message(), "Function f already declared");
}

#[test]
fn test_control_flow_message() {
    let error = Error::new(
        ErrorKind::InvalidControlFlow {
            operation: "Break",
            construct: "loop",
        },
        Span::null(),
    );

    assert_eq!(error.get_error_name(), "InvalidControlFlow");
    assert_eq!(error.get_message(), "Break can only appear in a loop");
}

#[test]
fn test_arity_mismatch_message() {
    let error = Error::new(
        ErrorKind::ArityMismatch {
            expected: 1,
            received: 2,
        },
        Span::null(),
    );

    assert_eq!(error.get_message(), "1 argument(s) required but 2 passed");
}

#[test]
fn test_type_errors_share_taxonomy_name() {
    for kind in [
        ErrorKind::ExpectedBoolean,
        ErrorKind::ExpectedNumber,
        ErrorKind::ExpectedNumberOrString,
        ErrorKind::ExpectedArray,
    ] {
        assert_eq!(Error::new(kind, Span::null()).get_error_name(), "TypeError");
    }
}
