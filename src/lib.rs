#![allow(clippy::module_inception)]

//! IdolScript compiler.
//!
//! Compiles IdolScript source text into JavaScript through a three-stage
//! pipeline: semantic analysis, optimization, and code generation. The
//! front end (lexer + parser) produces a concrete syntax tree; the
//! analyzer turns it into a typed AST; the optimizer rewrites the typed
//! AST; the generator emits JavaScript source text.

use std::str::FromStr;

use crate::analyzer::typed_ast::TypedProgram;
use crate::ast::ast::Program;
use crate::errors::errors::{Error, ErrorKind};
use crate::parser::parser::{MatchResult, Matcher};

pub mod analyzer;
pub mod ast;
pub mod errors;
pub mod generator;
pub mod lexer;
pub mod macros;
pub mod optimizer;
pub mod parser;

extern crate regex;

/// A half-open range of byte offsets into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    pub fn null() -> Self {
        Span { start: 0, end: 0 }
    }

    /// The smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }
}

/// How far the pipeline runs and which artifact is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Parsed,
    Analyzed,
    Optimized,
    Js,
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parsed" => Ok(Stage::Parsed),
            "analyzed" => Ok(Stage::Analyzed),
            "optimized" => Ok(Stage::Optimized),
            "js" => Ok(Stage::Js),
            other => Err(format!(
                "unknown output stage `{}` (expected parsed, analyzed, optimized or js)",
                other
            )),
        }
    }
}

/// The artifact produced by the pipeline stage selected in [`compile`].
#[derive(Debug)]
pub enum Artifact {
    Parsed(Program),
    Analyzed(TypedProgram),
    Optimized(TypedProgram),
    Js(String),
}

/// Runs the compile pipeline over `source` up to `stage`.
///
/// The `matcher` is the syntax collaborator: it owns tokenization and
/// parsing and reports syntax validity. It is passed in explicitly so a
/// compile call has no hidden global state; each call builds a fresh
/// scope arena and a fresh name-mangling table.
pub fn compile(matcher: &Matcher, source: &str, stage: Stage) -> Result<Artifact, Error> {
    let program = match matcher.match_source(source) {
        MatchResult::Succeeded(program) => program,
        MatchResult::Failed(message) => {
            return Err(Error::new(ErrorKind::SyntaxError { message }, Span::null()))
        }
    };
    if stage == Stage::Parsed {
        return Ok(Artifact::Parsed(program));
    }

    let analyzed = analyzer::analyzer::analyze(&program)?;
    if stage == Stage::Analyzed {
        return Ok(Artifact::Analyzed(analyzed));
    }

    let optimized = optimizer::optimizer::optimize(analyzed);
    if stage == Stage::Optimized {
        return Ok(Artifact::Optimized(optimized));
    }

    Ok(Artifact::Js(generator::generator::generate(&optimized)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_from_str() {
        assert_eq!(Stage::from_str("parsed"), Ok(Stage::Parsed));
        assert_eq!(Stage::from_str("js"), Ok(Stage::Js));
        assert!(Stage::from_str("llvm").is_err());
    }

    #[test]
    fn test_span_join() {
        let joined = Span::new(3, 5).to(Span::new(8, 12));
        assert_eq!(joined, Span::new(3, 12));
    }
}
