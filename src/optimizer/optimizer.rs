//! A single bottom-up rewrite pass over the typed AST.
//!
//! Children are optimized first, then each node's own rule applies. The
//! pass is total: a node with no applicable rule is returned with its
//! optimized children and nothing else changed. It is idempotent but not
//! iterated to a fixed point; a caller wanting maximal folding applies
//! it again.
//!
//! Statement rules may erase their statement outright (dead branches,
//! no-op loops, self-assignment), so statement optimization yields a
//! list that is spliced into the surrounding block.

use std::rc::Rc;

use crate::ast::ast::{BinaryOp, UnaryOp};

use crate::analyzer::typed_ast::{
    Alternate, Literal, TypedExpr, TypedIf, TypedProgram, TypedStmt,
};
use crate::analyzer::types::Type;

pub fn optimize(program: TypedProgram) -> TypedProgram {
    TypedProgram {
        statements: optimize_stmts(program.statements),
    }
}

fn optimize_stmts(statements: Vec<TypedStmt>) -> Vec<TypedStmt> {
    statements.into_iter().flat_map(optimize_stmt).collect()
}

fn optimize_stmt(stmt: TypedStmt) -> Vec<TypedStmt> {
    match stmt {
        TypedStmt::VarDecl {
            variable,
            initializer,
        } => vec![TypedStmt::VarDecl {
            variable,
            initializer: optimize_expr(initializer),
        }],
        TypedStmt::Assign { target, source } => {
            let source = optimize_expr(source);
            if let TypedExpr::Variable(variable) = &source {
                if Rc::ptr_eq(variable, &target) {
                    return vec![];
                }
            }
            vec![TypedStmt::Assign { target, source }]
        }
        TypedStmt::FnDecl { function } => {
            // The body lives behind the shared handle; rewrite it in
            // place so every reference to the function sees the result.
            let body = function.body.take();
            function.body.replace(optimize_stmts(body));
            vec![TypedStmt::FnDecl { function }]
        }
        TypedStmt::StructDecl { struct_type } => vec![TypedStmt::StructDecl { struct_type }],
        TypedStmt::Print { value } => vec![TypedStmt::Print {
            value: optimize_expr(value),
        }],
        TypedStmt::Break => vec![TypedStmt::Break],
        TypedStmt::Return { value } => vec![TypedStmt::Return {
            value: optimize_expr(value),
        }],
        TypedStmt::ShortReturn => vec![TypedStmt::ShortReturn],
        TypedStmt::If(if_stmt) => optimize_if(if_stmt),
        TypedStmt::While { test, body } => {
            let test = optimize_expr(test);
            if test == TypedExpr::Literal(Literal::Bool(false)) {
                return vec![];
            }
            vec![TypedStmt::While {
                test,
                body: optimize_stmts(body),
            }]
        }
        TypedStmt::Repeat { count, body } => {
            let count = optimize_expr(count);
            if count == TypedExpr::Literal(Literal::Int(0)) {
                return vec![];
            }
            vec![TypedStmt::Repeat {
                count,
                body: optimize_stmts(body),
            }]
        }
        TypedStmt::ForRange {
            iterator,
            start,
            inclusive,
            end,
            body,
        } => {
            let start = optimize_expr(start);
            let end = optimize_expr(end);
            let body = optimize_stmts(body);
            if let (Some(low), Some(high)) = (numeric_value(&start), numeric_value(&end)) {
                if low > high {
                    return vec![];
                }
            }
            vec![TypedStmt::ForRange {
                iterator,
                start,
                inclusive,
                end,
                body,
            }]
        }
        TypedStmt::ForEach {
            iterator,
            collection,
            body,
        } => {
            let collection = optimize_expr(collection);
            let body = optimize_stmts(body);
            if matches!(collection, TypedExpr::EmptyArray { .. }) {
                return vec![];
            }
            vec![TypedStmt::ForEach {
                iterator,
                collection,
                body,
            }]
        }
        TypedStmt::ArrayPush { array, element } => vec![TypedStmt::ArrayPush {
            array,
            element: optimize_expr(element),
        }],
        TypedStmt::ArrayPop { array } => vec![TypedStmt::ArrayPop { array }],
        TypedStmt::Increment { target } => vec![TypedStmt::Increment { target }],
        TypedStmt::Decrement { target } => vec![TypedStmt::Decrement { target }],
        TypedStmt::Expression { expression } => vec![TypedStmt::Expression {
            expression: optimize_expr(expression),
        }],
    }
}

fn optimize_if(if_stmt: TypedIf) -> Vec<TypedStmt> {
    let test = optimize_expr(if_stmt.test);
    let consequent = optimize_stmts(if_stmt.consequent);

    match test {
        TypedExpr::Literal(Literal::Bool(true)) => consequent,
        TypedExpr::Literal(Literal::Bool(false)) => match if_stmt.alternate {
            Alternate::Empty => vec![],
            Alternate::Block(block) => optimize_stmts(block),
            Alternate::ElseIf(nested) => optimize_if(*nested),
        },
        test => {
            let alternate = match if_stmt.alternate {
                Alternate::Empty => Alternate::Empty,
                Alternate::Block(block) => Alternate::Block(optimize_stmts(block)),
                Alternate::ElseIf(nested) => {
                    // A chained if may fold away; what remains of it
                    // becomes a plain else block.
                    let mut folded = optimize_if(*nested);
                    if folded.len() == 1 {
                        match folded.pop() {
                            Some(TypedStmt::If(inner)) => Alternate::ElseIf(Box::new(inner)),
                            Some(other) => Alternate::Block(vec![other]),
                            None => unreachable!(),
                        }
                    } else {
                        Alternate::Block(folded)
                    }
                }
            };
            vec![TypedStmt::If(TypedIf {
                test,
                consequent,
                alternate,
            })]
        }
    }
}

/// A numeric literal's value, for folding. Ints widen losslessly enough
/// for the comparisons and mixed arithmetic done here.
#[derive(Clone, Copy, PartialEq)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn as_f64(self) -> f64 {
        match self {
            Num::Int(n) => n as f64,
            Num::Float(f) => f,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Num::Int(n) => n == 0,
            Num::Float(f) => f == 0.0,
        }
    }

    fn is_one(self) -> bool {
        match self {
            Num::Int(n) => n == 1,
            Num::Float(f) => f == 1.0,
        }
    }

    fn literal(self) -> TypedExpr {
        match self {
            Num::Int(n) => TypedExpr::Literal(Literal::Int(n)),
            Num::Float(f) => TypedExpr::Literal(Literal::Float(f)),
        }
    }
}

impl PartialOrd for Num {
    fn partial_cmp(&self, other: &Num) -> Option<std::cmp::Ordering> {
        self.as_f64().partial_cmp(&other.as_f64())
    }
}

fn numeric_value(expr: &TypedExpr) -> Option<Num> {
    match expr {
        TypedExpr::Literal(Literal::Int(n)) => Some(Num::Int(*n)),
        TypedExpr::Literal(Literal::Float(f)) => Some(Num::Float(*f)),
        _ => None,
    }
}

fn optimize_expr(expr: TypedExpr) -> TypedExpr {
    match expr {
        TypedExpr::Literal(_)
        | TypedExpr::Variable(_)
        | TypedExpr::EmptyArray { .. }
        | TypedExpr::EmptyOptional { .. } => expr,
        TypedExpr::Binary {
            op,
            left,
            right,
            ty,
        } => {
            let left = optimize_expr(*left);
            let right = optimize_expr(*right);
            optimize_binary(op, left, right, ty)
        }
        TypedExpr::Unary { op, operand, ty } => {
            let operand = optimize_expr(*operand);
            match (op, &operand) {
                (UnaryOp::Neg, TypedExpr::Literal(Literal::Int(n))) => {
                    TypedExpr::Literal(Literal::Int(-n))
                }
                (UnaryOp::Neg, TypedExpr::Literal(Literal::Float(f))) => {
                    TypedExpr::Literal(Literal::Float(-f))
                }
                (UnaryOp::Not, TypedExpr::Literal(Literal::Bool(b))) => {
                    TypedExpr::Literal(Literal::Bool(!b))
                }
                _ => TypedExpr::Unary {
                    op,
                    operand: Box::new(operand),
                    ty,
                },
            }
        }
        TypedExpr::Conditional {
            test,
            consequent,
            alternate,
            ty,
        } => {
            let test = optimize_expr(*test);
            let consequent = optimize_expr(*consequent);
            let alternate = optimize_expr(*alternate);
            match test {
                TypedExpr::Literal(Literal::Bool(true)) => consequent,
                TypedExpr::Literal(Literal::Bool(false)) => alternate,
                test => TypedExpr::Conditional {
                    test: Box::new(test),
                    consequent: Box::new(consequent),
                    alternate: Box::new(alternate),
                    ty,
                },
            }
        }
        TypedExpr::Call { callee, args, ty } => TypedExpr::Call {
            callee,
            args: args.into_iter().map(optimize_expr).collect(),
            ty,
        },
        TypedExpr::ConstructorCall { struct_type, args } => TypedExpr::ConstructorCall {
            struct_type,
            args: args.into_iter().map(optimize_expr).collect(),
        },
        TypedExpr::Member { object, field } => TypedExpr::Member {
            object: Box::new(optimize_expr(*object)),
            field,
        },
        TypedExpr::OptionalMember { object, field } => TypedExpr::OptionalMember {
            object: Box::new(optimize_expr(*object)),
            field,
        },
        TypedExpr::Subscript { array, index, ty } => TypedExpr::Subscript {
            array: Box::new(optimize_expr(*array)),
            index: Box::new(optimize_expr(*index)),
            ty,
        },
        TypedExpr::Array { elements, ty } => TypedExpr::Array {
            elements: elements.into_iter().map(optimize_expr).collect(),
            ty,
        },
    }
}

fn optimize_binary(op: BinaryOp, left: TypedExpr, right: TypedExpr, ty: Type) -> TypedExpr {
    let keep = |left: TypedExpr, right: TypedExpr, ty| TypedExpr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        ty,
    };

    match op {
        BinaryOp::Coalesce => {
            if matches!(left, TypedExpr::EmptyOptional { .. }) {
                right
            } else {
                keep(left, right, ty)
            }
        }
        BinaryOp::And => match (&left, &right) {
            (TypedExpr::Literal(Literal::Bool(true)), _) => right,
            (_, TypedExpr::Literal(Literal::Bool(true))) => left,
            (TypedExpr::Literal(Literal::Bool(false)), _)
            | (_, TypedExpr::Literal(Literal::Bool(false))) => {
                TypedExpr::Literal(Literal::Bool(false))
            }
            _ => keep(left, right, ty),
        },
        BinaryOp::Or => match (&left, &right) {
            (TypedExpr::Literal(Literal::Bool(false)), _) => right,
            (_, TypedExpr::Literal(Literal::Bool(false))) => left,
            (TypedExpr::Literal(Literal::Bool(true)), _)
            | (_, TypedExpr::Literal(Literal::Bool(true))) => {
                TypedExpr::Literal(Literal::Bool(true))
            }
            _ => keep(left, right, ty),
        },
        _ => {
            if let Some(l) = numeric_value(&left) {
                if let Some(r) = numeric_value(&right) {
                    if let Some(folded) = fold_numeric(op, l, r) {
                        return folded;
                    }
                }
                // Identity and annihilation laws with a constant on the
                // left.
                if l.is_zero() {
                    match op {
                        BinaryOp::Add => return right,
                        BinaryOp::Sub => {
                            let operand_ty = right.ty();
                            return TypedExpr::Unary {
                                op: UnaryOp::Neg,
                                operand: Box::new(right),
                                ty: operand_ty,
                            };
                        }
                        BinaryOp::Mul | BinaryOp::Div => return left,
                        _ => {}
                    }
                }
                if l.is_one() {
                    match op {
                        BinaryOp::Mul => return right,
                        BinaryOp::Pow => return left,
                        _ => {}
                    }
                }
            } else if let Some(r) = numeric_value(&right) {
                if r.is_zero() {
                    match op {
                        BinaryOp::Add | BinaryOp::Sub => return left,
                        BinaryOp::Mul => return right,
                        BinaryOp::Pow => return TypedExpr::Literal(Literal::Int(1)),
                        _ => {}
                    }
                }
                if r.is_one() {
                    match op {
                        BinaryOp::Mul | BinaryOp::Div => return left,
                        _ => {}
                    }
                }
            }
            keep(left, right, ty)
        }
    }
}

/// Evaluates an operator over two numeric literals.
///
/// Integer pairs stay integral where the operation can be carried out
/// exactly: overflow, division by zero, and negative exponents leave
/// the expression unfolded or fall back to float evaluation.
fn fold_numeric(op: BinaryOp, l: Num, r: Num) -> Option<TypedExpr> {
    if let (Num::Int(a), Num::Int(b)) = (l, r) {
        match op {
            BinaryOp::Add => return a.checked_add(b).map(|n| Num::Int(n).literal()),
            BinaryOp::Sub => return a.checked_sub(b).map(|n| Num::Int(n).literal()),
            BinaryOp::Mul => return a.checked_mul(b).map(|n| Num::Int(n).literal()),
            BinaryOp::Div => return a.checked_div(b).map(|n| Num::Int(n).literal()),
            BinaryOp::Mod => return a.checked_rem(b).map(|n| Num::Int(n).literal()),
            BinaryOp::Pow => {
                if b >= 0 {
                    let exp = u32::try_from(b).ok()?;
                    return a.checked_pow(exp).map(|n| Num::Int(n).literal());
                }
                // Negative exponent: the value is fractional.
                return Some(Num::Float((a as f64).powf(b as f64)).literal());
            }
            _ => {}
        }
    }

    let (a, b) = (l.as_f64(), r.as_f64());
    match op {
        BinaryOp::Add => Some(Num::Float(a + b).literal()),
        BinaryOp::Sub => Some(Num::Float(a - b).literal()),
        BinaryOp::Mul => Some(Num::Float(a * b).literal()),
        BinaryOp::Div => Some(Num::Float(a / b).literal()),
        BinaryOp::Mod => Some(Num::Float(a % b).literal()),
        BinaryOp::Pow => Some(Num::Float(a.powf(b)).literal()),
        BinaryOp::Less => Some(TypedExpr::Literal(Literal::Bool(a < b))),
        BinaryOp::LessEq => Some(TypedExpr::Literal(Literal::Bool(a <= b))),
        BinaryOp::Greater => Some(TypedExpr::Literal(Literal::Bool(a > b))),
        BinaryOp::GreaterEq => Some(TypedExpr::Literal(Literal::Bool(a >= b))),
        BinaryOp::Eq => Some(TypedExpr::Literal(Literal::Bool(a == b))),
        BinaryOp::NotEq => Some(TypedExpr::Literal(Literal::Bool(a != b))),
        BinaryOp::Or | BinaryOp::And | BinaryOp::Coalesce => None,
    }
}
