//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Numeric literals (integers and floats)
//! - String literals with escape sequences
//! - Operators and punctuation
//! - Error cases

use super::{lexer::tokenize, tokens::TokenKind};

#[test]
fn test_tokenize_keywords() {
    let source =
        "idol episode perform encore exitStage plotTwist fate audition repeat spotlight in till through true false"
            .to_string();
    let tokens = tokenize(source).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Idol);
    assert_eq!(tokens[1].kind, TokenKind::Episode);
    assert_eq!(tokens[2].kind, TokenKind::Perform);
    assert_eq!(tokens[3].kind, TokenKind::Encore);
    assert_eq!(tokens[4].kind, TokenKind::ExitStage);
    assert_eq!(tokens[5].kind, TokenKind::PlotTwist);
    assert_eq!(tokens[6].kind, TokenKind::Fate);
    assert_eq!(tokens[7].kind, TokenKind::Audition);
    assert_eq!(tokens[8].kind, TokenKind::Repeat);
    assert_eq!(tokens[9].kind, TokenKind::Spotlight);
    assert_eq!(tokens[10].kind, TokenKind::In);
    assert_eq!(tokens[11].kind, TokenKind::Till);
    assert_eq!(tokens[12].kind, TokenKind::Through);
    assert_eq!(tokens[13].kind, TokenKind::True);
    assert_eq!(tokens[14].kind, TokenKind::False);
    assert_eq!(tokens[15].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_identifiers() {
    let source = "foo bar baz_123 _underscore CamelCase".to_string();
    let tokens = tokenize(source).unwrap();

    for (i, name) in ["foo", "bar", "baz_123", "_underscore", "CamelCase"]
        .iter()
        .enumerate()
    {
        assert_eq!(tokens[i].kind, TokenKind::Identifier);
        assert_eq!(tokens[i].value, *name);
    }
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_pi() {
    let source = "perform π".to_string();
    let tokens = tokenize(source).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Perform);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].value, "π");
    assert_eq!(tokens[2].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let source = "42 3.14 0 100.5".to_string();
    let tokens = tokenize(source).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::Number);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Number);
    assert_eq!(tokens[2].value, "0");
    assert_eq!(tokens[3].kind, TokenKind::Number);
    assert_eq!(tokens[3].value, "100.5");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_strings() {
    let source = r#""hello" "multiple words" "tab\there""#.to_string();
    let tokens = tokenize(source).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].kind, TokenKind::String);
    assert_eq!(tokens[1].value, "multiple words");
    assert_eq!(tokens[2].kind, TokenKind::String);
    assert_eq!(tokens[2].value, "tab\there");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_operators() {
    let source = "+ - * / % ** == != < > <= >= = && || ! ? :".to_string();
    let tokens = tokenize(source).unwrap();

    let expected = [
        TokenKind::Plus,
        TokenKind::Dash,
        TokenKind::Star,
        TokenKind::Slash,
        TokenKind::Percent,
        TokenKind::StarStar,
        TokenKind::Equals,
        TokenKind::NotEquals,
        TokenKind::Less,
        TokenKind::Greater,
        TokenKind::LessEquals,
        TokenKind::GreaterEquals,
        TokenKind::Assignment,
        TokenKind::And,
        TokenKind::Or,
        TokenKind::Not,
        TokenKind::Question,
        TokenKind::Colon,
        TokenKind::EOF,
    ];
    for (i, kind) in expected.iter().enumerate() {
        assert_eq!(tokens[i].kind, *kind);
    }
}

#[test]
fn test_tokenize_exponent_before_star() {
    let source = "2**3*4".to_string();
    let tokens = tokenize(source).unwrap();

    assert_eq!(tokens[1].kind, TokenKind::StarStar);
    assert_eq!(tokens[3].kind, TokenKind::Star);
}

#[test]
fn test_tokenize_comments() {
    let source = "idol x = 1 // declares x\nperform x".to_string();
    let tokens = tokenize(source).unwrap();

    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Idol,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Number,
            TokenKind::Perform,
            TokenKind::Identifier,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_spans() {
    let source = "idol x".to_string();
    let tokens = tokenize(source).unwrap();

    assert_eq!(tokens[0].span.start, 0);
    assert_eq!(tokens[0].span.end, 4);
    assert_eq!(tokens[1].span.start, 5);
    assert_eq!(tokens[1].span.end, 6);
}

#[test]
fn test_tokenize_unrecognised_character() {
    let source = "idol コンパイラ = 100".to_string();
    let result = tokenize(source);

    assert!(result.is_err());
    assert_eq!(result.unwrap_err().get_error_name(), "SyntaxError");
}
