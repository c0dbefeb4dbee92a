//! Semantic analysis: one pre-order walk over the concrete syntax
//! tree, producing the typed AST.
//!
//! The walk threads a [`ScopeId`] explicitly; all scopes live in one
//! [`ScopeArena`] owned by the compile call. Analysis halts at the
//! first violation.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::ast::{BinaryOp, Expr, Program, Stmt, UnaryOp};
use crate::ast::statements::{ElseTail, IfStmt};
use crate::errors::errors::{Error, ErrorKind};
use crate::Span;

use super::context::{ScopeArena, ScopeId};
use super::stdlib::{self, Intrinsic};
use super::typed_ast::{
    Alternate, Callee, Function, Literal, TypedExpr, TypedIf, TypedProgram, TypedStmt,
};
use super::types::{FunctionType, Type};

/// Analyzes a parsed program, producing the typed AST or the first
/// semantic error.
pub fn analyze(program: &Program) -> Result<TypedProgram, Error> {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    stdlib::seed(&mut arena, root)?;

    let mut analyzer = Analyzer { arena };
    let statements = analyzer.statements(&program.statements, root)?;
    Ok(TypedProgram { statements })
}

struct Analyzer {
    arena: ScopeArena,
}

impl Analyzer {
    fn statements(&mut self, statements: &[Stmt], scope: ScopeId) -> Result<Vec<TypedStmt>, Error> {
        statements.iter().map(|s| self.stmt(s, scope)).collect()
    }

    /// Analyzes a `{ ... }` body in a fresh child scope.
    fn block(&mut self, statements: &[Stmt], parent: ScopeId) -> Result<Vec<TypedStmt>, Error> {
        let scope = self.arena.child(parent, None, None);
        self.statements(statements, scope)
    }

    fn stmt(&mut self, stmt: &Stmt, scope: ScopeId) -> Result<TypedStmt, Error> {
        match stmt {
            Stmt::VarDecl(decl) => {
                let initializer = self.expr(&decl.value, scope)?;
                let variable = self.arena.declare_variable(
                    scope,
                    &decl.name,
                    true,
                    initializer.ty(),
                    decl.span,
                )?;
                Ok(TypedStmt::VarDecl {
                    variable,
                    initializer,
                })
            }
            Stmt::Assign(assign) => {
                let source = self.expr(&assign.value, scope)?;
                let target = self.arena.lookup_variable(scope, &assign.name, assign.span)?;
                if !target.mutable {
                    return Err(Error::new(
                        ErrorKind::ImmutableAssignment {
                            name: assign.name.clone(),
                        },
                        assign.span,
                    ));
                }
                Ok(TypedStmt::Assign { target, source })
            }
            Stmt::FnDecl(decl) => {
                // The body is analyzed before the name is bound in the
                // enclosing scope, so functions cannot recurse.
                let fn_scope = self.arena.child(scope, None, Some(true));
                let mut params = vec![];
                for param in &decl.params {
                    params.push(self.arena.declare_variable(
                        fn_scope,
                        param,
                        false,
                        Type::Any,
                        decl.span,
                    )?);
                }
                let body = self.block(&decl.body, fn_scope)?;

                let ty = Rc::new(FunctionType {
                    param_types: params.iter().map(|p| p.ty.clone()).collect(),
                    return_type: Type::Any,
                });
                let function = Rc::new(Function {
                    name: decl.name.clone(),
                    params,
                    body: RefCell::new(body),
                    ty,
                });
                self.arena
                    .declare_function(scope, Rc::clone(&function), decl.span)?;
                Ok(TypedStmt::FnDecl { function })
            }
            Stmt::Print(print) => {
                let value = self.expr(&print.value, scope)?;
                Ok(TypedStmt::Print { value })
            }
            Stmt::Break(brk) => {
                self.arena.require_in_loop(scope, "Break", brk.span)?;
                Ok(TypedStmt::Break)
            }
            Stmt::Return(ret) => {
                self.arena.require_in_function(scope, "Return", ret.span)?;
                match &ret.value {
                    Some(value) => {
                        let value = self.expr(value, scope)?;
                        Ok(TypedStmt::Return { value })
                    }
                    None => Ok(TypedStmt::ShortReturn),
                }
            }
            Stmt::If(if_stmt) => Ok(TypedStmt::If(self.if_stmt(if_stmt, scope)?)),
            Stmt::While(while_stmt) => {
                let test = self.expr(&while_stmt.test, scope)?;
                self.require_boolean(&test, while_stmt.test.span())?;
                let loop_scope = self.arena.child(scope, Some(true), None);
                let body = self.block(&while_stmt.body, loop_scope)?;
                Ok(TypedStmt::While { test, body })
            }
            Stmt::Repeat(repeat) => {
                // The count need not be boolean or even numeric at this
                // point; it is an ordinary count expression.
                let count = self.expr(&repeat.count, scope)?;
                let loop_scope = self.arena.child(scope, Some(true), None);
                let body = self.block(&repeat.body, loop_scope)?;
                Ok(TypedStmt::Repeat { count, body })
            }
            Stmt::ForRange(for_range) => {
                // Bounds are analyzed in the outer scope; the iterator
                // exists only inside the loop.
                let start = self.expr(&for_range.start, scope)?;
                let end = self.expr(&for_range.end, scope)?;
                let loop_scope = self.arena.child(scope, Some(true), None);
                let iterator = self.arena.declare_variable(
                    loop_scope,
                    &for_range.iterator,
                    true,
                    Type::Int,
                    for_range.span,
                )?;
                let body = self.block(&for_range.body, loop_scope)?;
                Ok(TypedStmt::ForRange {
                    iterator,
                    start,
                    inclusive: for_range.inclusive,
                    end,
                    body,
                })
            }
            Stmt::ArrayPush(push) => {
                let array = self.array_receiver(&push.name, scope, push.span)?;
                let element = self.expr(&push.value, scope)?;
                Ok(TypedStmt::ArrayPush { array, element })
            }
            Stmt::ArrayPop(pop) => {
                let array = self.array_receiver(&pop.name, scope, pop.span)?;
                Ok(TypedStmt::ArrayPop { array })
            }
            Stmt::Expression(expr_stmt) => {
                let expression = self.expr(&expr_stmt.expression, scope)?;
                Ok(TypedStmt::Expression { expression })
            }
        }
    }

    fn if_stmt(&mut self, if_stmt: &IfStmt, scope: ScopeId) -> Result<TypedIf, Error> {
        let test = self.expr(&if_stmt.test, scope)?;
        self.require_boolean(&test, if_stmt.test.span())?;
        let consequent = self.block(&if_stmt.consequent, scope)?;

        let alternate = match &if_stmt.alternate {
            None => Alternate::Empty,
            Some(ElseTail::Block(block)) => Alternate::Block(self.block(block, scope)?),
            Some(ElseTail::If(nested)) => Alternate::ElseIf(Box::new(self.if_stmt(nested, scope)?)),
        };

        Ok(TypedIf {
            test,
            consequent,
            alternate,
        })
    }

    fn array_receiver(
        &self,
        name: &str,
        scope: ScopeId,
        span: Span,
    ) -> Result<Rc<super::typed_ast::Variable>, Error> {
        let variable = self.arena.lookup_variable(scope, name, span)?;
        if !matches!(variable.ty, Type::Array(_)) {
            return Err(Error::new(ErrorKind::ExpectedArray, span));
        }
        Ok(variable)
    }

    fn expr(&mut self, expr: &Expr, scope: ScopeId) -> Result<TypedExpr, Error> {
        match expr {
            Expr::Int(int) => Ok(TypedExpr::Literal(Literal::Int(int.value))),
            Expr::Float(float) => Ok(TypedExpr::Literal(Literal::Float(float.value))),
            Expr::Str(string) => Ok(TypedExpr::Literal(Literal::Str(string.value.clone()))),
            Expr::Bool(boolean) => Ok(TypedExpr::Literal(Literal::Bool(boolean.value))),
            Expr::Ident(ident) => {
                let variable = self.arena.lookup_variable(scope, &ident.name, ident.span)?;
                Ok(TypedExpr::Variable(variable))
            }
            Expr::Binary(binary) => {
                let left = self.expr(&binary.left, scope)?;
                let right = self.expr(&binary.right, scope)?;
                let ty = self.binary_type(
                    binary.op,
                    &left,
                    &right,
                    binary.left.span(),
                    binary.right.span(),
                    binary.span,
                )?;
                Ok(TypedExpr::Binary {
                    op: binary.op,
                    left: Box::new(left),
                    right: Box::new(right),
                    ty,
                })
            }
            Expr::Unary(unary) => {
                let operand = self.expr(&unary.operand, scope)?;
                let operand_span = unary.operand.span();
                let ty = match unary.op {
                    UnaryOp::Not => {
                        self.require_boolean(&operand, operand_span)?;
                        Type::Boolean
                    }
                    UnaryOp::Neg => {
                        self.require_numeric(&operand, operand_span)?;
                        operand.ty()
                    }
                };
                Ok(TypedExpr::Unary {
                    op: unary.op,
                    operand: Box::new(operand),
                    ty,
                })
            }
            Expr::Conditional(conditional) => {
                let test = self.expr(&conditional.test, scope)?;
                self.require_boolean(&test, conditional.test.span())?;
                let consequent = self.expr(&conditional.consequent, scope)?;
                let alternate = self.expr(&conditional.alternate, scope)?;
                if !consequent.ty().matches(&alternate.ty()) {
                    return Err(Error::new(ErrorKind::TypeMismatch, conditional.span));
                }
                let ty = consequent.ty();
                Ok(TypedExpr::Conditional {
                    test: Box::new(test),
                    consequent: Box::new(consequent),
                    alternate: Box::new(alternate),
                    ty,
                })
            }
            Expr::Call(call) => {
                let args: Vec<TypedExpr> = call
                    .args
                    .iter()
                    .map(|a| self.expr(a, scope))
                    .collect::<Result<_, _>>()?;

                if let Some(function) = self.arena.lookup_function(scope, &call.callee) {
                    if function.params.len() != args.len() {
                        return Err(Error::new(
                            ErrorKind::ArityMismatch {
                                expected: function.params.len(),
                                received: args.len(),
                            },
                            call.span,
                        ));
                    }
                    let ty = function.ty.return_type.clone();
                    Ok(TypedExpr::Call {
                        callee: Callee::User(function),
                        args,
                        ty,
                    })
                } else if let Some(intrinsic) = Intrinsic::lookup(&call.callee) {
                    if intrinsic.param_count() != args.len() {
                        return Err(Error::new(
                            ErrorKind::ArityMismatch {
                                expected: intrinsic.param_count(),
                                received: args.len(),
                            },
                            call.span,
                        ));
                    }
                    let ty = intrinsic.return_type(&args);
                    Ok(TypedExpr::Call {
                        callee: Callee::Intrinsic(intrinsic),
                        args,
                        ty,
                    })
                } else {
                    Err(Error::new(
                        ErrorKind::UndeclaredFunction {
                            name: call.callee.clone(),
                        },
                        call.span,
                    ))
                }
            }
            Expr::Member(member) => {
                let object = self.expr(&member.object, scope)?;
                let struct_type = match object.ty() {
                    Type::Struct(struct_type) => struct_type,
                    _ => {
                        return Err(Error::new(
                            ErrorKind::ExpectedStruct {
                                field: member.field.clone(),
                            },
                            member.span,
                        ))
                    }
                };
                let field = struct_type
                    .fields
                    .iter()
                    .find(|f| f.name == member.field)
                    .cloned()
                    .ok_or_else(|| {
                        Error::new(
                            ErrorKind::UnknownField {
                                field: member.field.clone(),
                            },
                            member.span,
                        )
                    })?;
                Ok(TypedExpr::Member {
                    object: Box::new(object),
                    field,
                })
            }
            Expr::Subscript(subscript) => {
                let array = self.expr(&subscript.array, scope)?;
                let element_ty = match array.ty() {
                    Type::Array(element) => *element,
                    Type::Any => Type::Any,
                    _ => {
                        return Err(Error::new(
                            ErrorKind::ExpectedArray,
                            subscript.array.span(),
                        ))
                    }
                };
                let index = self.expr(&subscript.index, scope)?;
                let index_ty = index.ty();
                if index_ty != Type::Int && !index_ty.is_any() {
                    return Err(Error::new(
                        ErrorKind::ExpectedNumber,
                        subscript.index.span(),
                    ));
                }
                Ok(TypedExpr::Subscript {
                    array: Box::new(array),
                    index: Box::new(index),
                    ty: element_ty,
                })
            }
            Expr::Array(array) => {
                let elements: Vec<TypedExpr> = array
                    .elements
                    .iter()
                    .map(|e| self.expr(e, scope))
                    .collect::<Result<_, _>>()?;
                if elements.is_empty() {
                    return Ok(TypedExpr::EmptyArray {
                        ty: Type::Array(Box::new(Type::Any)),
                    });
                }
                let element_ty = elements[0].ty();
                for (element, node) in elements.iter().zip(&array.elements).skip(1) {
                    if !element_ty.matches(&element.ty()) {
                        return Err(Error::new(ErrorKind::TypeMismatch, node.span()));
                    }
                }
                Ok(TypedExpr::Array {
                    ty: Type::Array(Box::new(element_ty)),
                    elements,
                })
            }
        }
    }

    fn binary_type(
        &self,
        op: BinaryOp,
        left: &TypedExpr,
        right: &TypedExpr,
        left_span: Span,
        right_span: Span,
        span: Span,
    ) -> Result<Type, Error> {
        let lt = left.ty();
        let rt = right.ty();
        match op {
            BinaryOp::Or | BinaryOp::And => {
                self.require_boolean(left, left_span)?;
                self.require_boolean(right, right_span)?;
                Ok(Type::Boolean)
            }
            BinaryOp::Less
            | BinaryOp::LessEq
            | BinaryOp::Greater
            | BinaryOp::GreaterEq
            | BinaryOp::Eq
            | BinaryOp::NotEq => {
                if lt.matches(&rt) || (lt.is_numeric() && rt.is_numeric()) {
                    Ok(Type::Boolean)
                } else if lt.is_numeric() || rt.is_numeric() {
                    // One side is a number, so the other was expected
                    // to be one too.
                    let offending = if lt.is_numeric() { right_span } else { left_span };
                    Err(Error::new(ErrorKind::ExpectedNumber, offending))
                } else {
                    Err(Error::new(ErrorKind::TypeMismatch, span))
                }
            }
            BinaryOp::Add | BinaryOp::Sub => {
                let allowed =
                    |t: &Type| t.is_numeric() || *t == Type::String || t.is_any();
                if !allowed(&lt) {
                    return Err(Error::new(ErrorKind::ExpectedNumberOrString, left_span));
                }
                if !allowed(&rt) {
                    return Err(Error::new(ErrorKind::ExpectedNumberOrString, right_span));
                }
                if lt == Type::String || rt == Type::String {
                    if op == BinaryOp::Sub {
                        let offending = if lt == Type::String { left_span } else { right_span };
                        return Err(Error::new(ErrorKind::ExpectedNumber, offending));
                    }
                    // Concatenation requires strings on both sides.
                    if !lt.matches(&rt) {
                        return Err(Error::new(ErrorKind::TypeMismatch, span));
                    }
                    return Ok(Type::String);
                }
                Ok(numeric_result(&lt, &rt))
            }
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                self.require_numeric(left, left_span)?;
                self.require_numeric(right, right_span)?;
                Ok(numeric_result(&lt, &rt))
            }
            BinaryOp::Pow => {
                self.require_numeric(left, left_span)?;
                self.require_numeric(right, right_span)?;
                Ok(Type::Float)
            }
            // `??` has no surface syntax; the parser cannot produce it.
            BinaryOp::Coalesce => Ok(rt),
        }
    }

    fn require_boolean(&self, expr: &TypedExpr, span: Span) -> Result<(), Error> {
        let ty = expr.ty();
        if ty == Type::Boolean || ty.is_any() {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::ExpectedBoolean, span))
        }
    }

    fn require_numeric(&self, expr: &TypedExpr, span: Span) -> Result<(), Error> {
        let ty = expr.ty();
        if ty.is_numeric() || ty.is_any() {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::ExpectedNumber, span))
        }
    }
}

fn numeric_result(left: &Type, right: &Type) -> Type {
    if *left == Type::Float || *right == Type::Float {
        Type::Float
    } else if left.is_any() || right.is_any() {
        Type::Any
    } else {
        Type::Int
    }
}
