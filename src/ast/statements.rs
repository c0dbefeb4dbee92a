use crate::Span;

use super::ast::{Expr, Stmt};

/// `idol x = value`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

/// `x = value`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

/// `episode f(a, b) { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct FnDeclStmt {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `perform value`
#[derive(Debug, Clone, PartialEq)]
pub struct PrintStmt {
    pub value: Expr,
    pub span: Span,
}

/// `exitStage`
#[derive(Debug, Clone, PartialEq)]
pub struct BreakStmt {
    pub span: Span,
}

/// `encore value` or the short form `encore`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// `plotTwist test { ... }` with an optional `fate` tail.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub test: Expr,
    pub consequent: Vec<Stmt>,
    pub alternate: Option<ElseTail>,
    pub span: Span,
}

/// A `fate` tail is either a plain block or a chained `fate plotTwist`.
#[derive(Debug, Clone, PartialEq)]
pub enum ElseTail {
    Block(Vec<Stmt>),
    If(Box<IfStmt>),
}

/// `audition test { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub test: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `repeat count { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatStmt {
    pub count: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `spotlight i in lo till hi { ... }`; `through` makes the upper bound
/// inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct ForRangeStmt {
    pub iterator: String,
    pub start: Expr,
    pub inclusive: bool,
    pub end: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `a.addMember(value)`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayPushStmt {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

/// `a.graduate()`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayPopStmt {
    pub name: String,
    pub span: Span,
}

/// A bare expression in statement position, e.g. a call `f(1, 2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}
