use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("idol", TokenKind::Idol);
        map.insert("episode", TokenKind::Episode);
        map.insert("perform", TokenKind::Perform);
        map.insert("encore", TokenKind::Encore);
        map.insert("exitStage", TokenKind::ExitStage);
        map.insert("plotTwist", TokenKind::PlotTwist);
        map.insert("fate", TokenKind::Fate);
        map.insert("audition", TokenKind::Audition);
        map.insert("repeat", TokenKind::Repeat);
        map.insert("spotlight", TokenKind::Spotlight);
        map.insert("in", TokenKind::In);
        map.insert("till", TokenKind::Till);
        map.insert("through", TokenKind::Through);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    String,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Dot,
    Question,
    Colon,
    Comma,

    Plus,
    Dash,
    Slash,
    Star,
    StarStar,
    Percent,

    // Reserved
    Idol,      // variable declaration, also the literal `true`
    Episode,   // function declaration
    Perform,   // print
    Encore,    // return
    ExitStage, // break
    PlotTwist, // if
    Fate,      // else
    Audition,  // while
    Repeat,
    Spotlight, // for
    In,
    Till,    // exclusive range bound
    Through, // inclusive range bound
    True,
    False,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{ kind: {}, value: {} }}", self.kind, self.value)
    }
}
