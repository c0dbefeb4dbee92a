//! The standard library registry.
//!
//! Every built-in name is pre-seeded into the root scope as an
//! immutable variable, so user declarations cannot reuse them and
//! assigning to them is an `ImmutableAssignment`. Calls resolve user
//! functions first and fall back to [`Intrinsic::lookup`] by name;
//! `print` is statement-only (`perform`) and deliberately absent from
//! that fallback.

use crate::errors::errors::Error;
use crate::Span;

use super::context::{ScopeArena, ScopeId};
use super::typed_ast::TypedExpr;
use super::types::Type;

/// Built-in functions callable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intrinsic {
    Sin,
    Cos,
    Exp,
    Ln,
    Sqrt,
    Hypot,
    Bytes,
    Codepoints,
    Random,
}

impl Intrinsic {
    pub fn lookup(name: &str) -> Option<Intrinsic> {
        match name {
            "sin" => Some(Intrinsic::Sin),
            "cos" => Some(Intrinsic::Cos),
            "exp" => Some(Intrinsic::Exp),
            "ln" => Some(Intrinsic::Ln),
            "sqrt" => Some(Intrinsic::Sqrt),
            "hypot" => Some(Intrinsic::Hypot),
            "bytes" => Some(Intrinsic::Bytes),
            "codepoints" => Some(Intrinsic::Codepoints),
            "random" => Some(Intrinsic::Random),
            _ => None,
        }
    }

    pub fn param_count(&self) -> usize {
        match self {
            Intrinsic::Hypot => 2,
            _ => 1,
        }
    }

    /// The call's result type given its (already analyzed) arguments.
    /// Only `random` inspects them: it returns the element type of the
    /// array it picks from.
    pub fn return_type(&self, args: &[TypedExpr]) -> Type {
        match self {
            Intrinsic::Sin
            | Intrinsic::Cos
            | Intrinsic::Exp
            | Intrinsic::Ln
            | Intrinsic::Sqrt
            | Intrinsic::Hypot => Type::Float,
            Intrinsic::Bytes | Intrinsic::Codepoints => Type::Array(Box::new(Type::Int)),
            Intrinsic::Random => match args.first().map(|a| a.ty()) {
                Some(Type::Array(element)) => *element,
                _ => Type::Any,
            },
        }
    }
}

/// All names reserved by the standard library, `print` and the constant
/// `π` included.
const STDLIB_NAMES: [&str; 11] = [
    "print",
    "sin",
    "cos",
    "exp",
    "ln",
    "sqrt",
    "hypot",
    "π",
    "bytes",
    "codepoints",
    "random",
];

/// Seeds the root scope with the standard library bindings.
pub fn seed(arena: &mut ScopeArena, root: ScopeId) -> Result<(), Error> {
    for name in STDLIB_NAMES {
        let ty = if name == "π" { Type::Float } else { Type::Any };
        arena.declare_variable(root, name, false, ty, Span::null())?;
    }
    Ok(())
}
