use std::fmt::Display;

use crate::Span;

use super::expressions::{
    ArrayExpr, BinaryExpr, BoolExpr, CallExpr, ConditionalExpr, FloatExpr, IdentExpr, IntExpr,
    MemberExpr, StringExpr, SubscriptExpr, UnaryExpr,
};
use super::statements::{
    ArrayPopStmt, ArrayPushStmt, AssignStmt, BreakStmt, ExpressionStmt, FnDeclStmt, ForRangeStmt,
    IfStmt, PrintStmt, RepeatStmt, ReturnStmt, VarDeclStmt, WhileStmt,
};

/// The root of a parsed source file: its top-level statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// A statement of the concrete syntax tree.
///
/// This is a closed set: every grammar production maps onto exactly one
/// variant, so the analyzer can match exhaustively instead of dispatching
/// through a table that may miss a kind at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VarDeclStmt),
    Assign(AssignStmt),
    FnDecl(FnDeclStmt),
    Print(PrintStmt),
    Break(BreakStmt),
    Return(ReturnStmt),
    If(IfStmt),
    While(WhileStmt),
    Repeat(RepeatStmt),
    ForRange(ForRangeStmt),
    ArrayPush(ArrayPushStmt),
    ArrayPop(ArrayPopStmt),
    Expression(ExpressionStmt),
}

/// An expression of the concrete syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(IntExpr),
    Float(FloatExpr),
    Str(StringExpr),
    Bool(BoolExpr),
    Ident(IdentExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Conditional(ConditionalExpr),
    Call(CallExpr),
    Member(MemberExpr),
    Subscript(SubscriptExpr),
    Array(ArrayExpr),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Int(e) => e.span,
            Expr::Float(e) => e.span,
            Expr::Str(e) => e.span,
            Expr::Bool(e) => e.span,
            Expr::Ident(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Conditional(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::Member(e) => e.span,
            Expr::Subscript(e) => e.span,
            Expr::Array(e) => e.span,
        }
    }
}

/// Binary operator kinds, shared by the concrete and typed trees.
///
/// `Coalesce` has no surface syntax; it exists at the typed-AST level for
/// optional unwrapping and is folded/emitted like any other operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Eq,
    NotEq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Coalesce,
}

impl BinaryOp {
    /// The operator's source-level token.
    pub fn token(&self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Less => "<",
            BinaryOp::LessEq => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::Coalesce => "??",
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Less
                | BinaryOp::LessEq
                | BinaryOp::Greater
                | BinaryOp::GreaterEq
                | BinaryOp::Eq
                | BinaryOp::NotEq
        )
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn token(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}
