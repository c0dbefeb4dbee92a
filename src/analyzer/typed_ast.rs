//! The typed AST produced by semantic analysis.
//!
//! Named entities (`Variable`, `Function`, struct declarations and
//! fields) are shared by `Rc`: every node that mentions one references
//! the same allocation, so the generator can key its mangling table on
//! identity and the optimizer can recognize self-assignment. A function
//! body sits in a `RefCell` so the optimizer can rewrite it in place.
//!
//! Statements and expressions are closed enums; the optimizer and
//! generator match exhaustively over them.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::ast::{BinaryOp, UnaryOp};

use super::types::{Field, FunctionType, StructType, Type};

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub mutable: bool,
    pub ty: Type,
}

#[derive(Debug, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Rc<Variable>>,
    pub body: RefCell<Vec<TypedStmt>>,
    pub ty: Rc<FunctionType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedProgram {
    pub statements: Vec<TypedStmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedStmt {
    VarDecl {
        variable: Rc<Variable>,
        initializer: TypedExpr,
    },
    Assign {
        target: Rc<Variable>,
        source: TypedExpr,
    },
    FnDecl {
        function: Rc<Function>,
    },
    StructDecl {
        struct_type: Rc<StructType>,
    },
    Print {
        value: TypedExpr,
    },
    Break,
    Return {
        value: TypedExpr,
    },
    ShortReturn,
    If(TypedIf),
    While {
        test: TypedExpr,
        body: Vec<TypedStmt>,
    },
    Repeat {
        count: TypedExpr,
        body: Vec<TypedStmt>,
    },
    ForRange {
        iterator: Rc<Variable>,
        start: TypedExpr,
        inclusive: bool,
        end: TypedExpr,
        body: Vec<TypedStmt>,
    },
    ForEach {
        iterator: Rc<Variable>,
        collection: TypedExpr,
        body: Vec<TypedStmt>,
    },
    ArrayPush {
        array: Rc<Variable>,
        element: TypedExpr,
    },
    ArrayPop {
        array: Rc<Variable>,
    },
    Increment {
        target: Rc<Variable>,
    },
    Decrement {
        target: Rc<Variable>,
    },
    Expression {
        expression: TypedExpr,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedIf {
    pub test: TypedExpr,
    pub consequent: Vec<TypedStmt>,
    pub alternate: Alternate,
}

/// The else side of an `if`: nothing, a block, or a chained else-if.
#[derive(Debug, Clone, PartialEq)]
pub enum Alternate {
    Empty,
    Block(Vec<TypedStmt>),
    ElseIf(Box<TypedIf>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Literal {
    pub fn ty(&self) -> Type {
        match self {
            Literal::Int(_) => Type::Int,
            Literal::Float(_) => Type::Float,
            Literal::Bool(_) => Type::Boolean,
            Literal::Str(_) => Type::String,
        }
    }
}

/// What a call resolved to: a user function or a built-in.
#[derive(Debug, Clone, PartialEq)]
pub enum Callee {
    User(Rc<Function>),
    Intrinsic(super::stdlib::Intrinsic),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedExpr {
    Literal(Literal),
    Variable(Rc<Variable>),
    Binary {
        op: BinaryOp,
        left: Box<TypedExpr>,
        right: Box<TypedExpr>,
        ty: Type,
    },
    Unary {
        op: UnaryOp,
        operand: Box<TypedExpr>,
        ty: Type,
    },
    Conditional {
        test: Box<TypedExpr>,
        consequent: Box<TypedExpr>,
        alternate: Box<TypedExpr>,
        ty: Type,
    },
    Call {
        callee: Callee,
        args: Vec<TypedExpr>,
        ty: Type,
    },
    ConstructorCall {
        struct_type: Rc<StructType>,
        args: Vec<TypedExpr>,
    },
    Member {
        object: Box<TypedExpr>,
        field: Rc<Field>,
    },
    /// Safe-navigation member access on an optional struct value.
    OptionalMember {
        object: Box<TypedExpr>,
        field: Rc<Field>,
    },
    Subscript {
        array: Box<TypedExpr>,
        index: Box<TypedExpr>,
        ty: Type,
    },
    Array {
        elements: Vec<TypedExpr>,
        ty: Type,
    },
    EmptyArray {
        ty: Type,
    },
    EmptyOptional {
        ty: Type,
    },
}

impl TypedExpr {
    /// The expression's resolved static type.
    pub fn ty(&self) -> Type {
        match self {
            TypedExpr::Literal(literal) => literal.ty(),
            TypedExpr::Variable(variable) => variable.ty.clone(),
            TypedExpr::Binary { ty, .. } => ty.clone(),
            TypedExpr::Unary { ty, .. } => ty.clone(),
            TypedExpr::Conditional { ty, .. } => ty.clone(),
            TypedExpr::Call { ty, .. } => ty.clone(),
            TypedExpr::ConstructorCall { struct_type, .. } => Type::Struct(Rc::clone(struct_type)),
            TypedExpr::Member { field, .. } => field.ty.clone(),
            TypedExpr::OptionalMember { field, .. } => Type::Optional(Box::new(field.ty.clone())),
            TypedExpr::Subscript { ty, .. } => ty.clone(),
            TypedExpr::Array { ty, .. } => ty.clone(),
            TypedExpr::EmptyArray { ty } => ty.clone(),
            TypedExpr::EmptyOptional { ty } => ty.clone(),
        }
    }
}
