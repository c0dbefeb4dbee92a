//! Optimizer tests over hand-built typed trees.
//!
//! Expressions are wrapped in a print statement so each case runs
//! through the public entry point.

use std::cell::RefCell;
use std::rc::Rc;

use crate::analyzer::typed_ast::{
    Alternate, Callee, Function, Literal, TypedExpr, TypedIf, TypedProgram, TypedStmt, Variable,
};
use crate::analyzer::types::{FunctionType, Type};
use crate::ast::ast::{BinaryOp, UnaryOp};
use crate::optimizer::optimizer::optimize;

fn int(value: i64) -> TypedExpr {
    TypedExpr::Literal(Literal::Int(value))
}

fn float(value: f64) -> TypedExpr {
    TypedExpr::Literal(Literal::Float(value))
}

fn boolean(value: bool) -> TypedExpr {
    TypedExpr::Literal(Literal::Bool(value))
}

fn float_var(name: &str) -> Rc<Variable> {
    Rc::new(Variable {
        name: name.to_string(),
        mutable: true,
        ty: Type::Float,
    })
}

fn binary(op: BinaryOp, left: TypedExpr, right: TypedExpr, ty: Type) -> TypedExpr {
    TypedExpr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        ty,
    }
}

fn neg(operand: TypedExpr) -> TypedExpr {
    let ty = operand.ty();
    TypedExpr::Unary {
        op: UnaryOp::Neg,
        operand: Box::new(operand),
        ty,
    }
}

/// Runs one expression through the pass.
fn opt(expr: TypedExpr) -> TypedExpr {
    let program = optimize(TypedProgram {
        statements: vec![TypedStmt::Print { value: expr }],
    });
    match program.statements.into_iter().next() {
        Some(TypedStmt::Print { value }) => value,
        other => panic!("print statement did not survive: {other:?}"),
    }
}

/// Runs a statement list through the pass.
fn opt_stmts(statements: Vec<TypedStmt>) -> Vec<TypedStmt> {
    optimize(TypedProgram { statements }).statements
}

#[test]
fn test_folds_integer_arithmetic() {
    let cases = [
        (BinaryOp::Add, 13),
        (BinaryOp::Sub, -3),
        (BinaryOp::Mul, 40),
        (BinaryOp::Div, 0),
        (BinaryOp::Mod, 5),
    ];
    for (op, expected) in cases {
        assert_eq!(opt(binary(op, int(5), int(8), Type::Int)), int(expected));
    }
}

#[test]
fn test_folds_comparisons() {
    let cases = [
        (BinaryOp::Less, true),
        (BinaryOp::LessEq, true),
        (BinaryOp::Eq, false),
        (BinaryOp::NotEq, true),
        (BinaryOp::GreaterEq, false),
        (BinaryOp::Greater, false),
    ];
    for (op, expected) in cases {
        assert_eq!(
            opt(binary(op, int(5), int(8), Type::Boolean)),
            boolean(expected)
        );
    }
    // Mixed int/float literals compare by numeric value.
    assert_eq!(
        opt(binary(BinaryOp::Less, float(3.5), int(4), Type::Boolean)),
        boolean(true)
    );
}

#[test]
fn test_folds_float_arithmetic() {
    assert_eq!(
        opt(binary(BinaryOp::Div, float(5.0), float(8.0), Type::Float)),
        float(0.625)
    );
    assert_eq!(
        opt(binary(BinaryOp::Add, int(1), float(2.5), Type::Float)),
        float(3.5)
    );
}

#[test]
fn test_folds_exponentiation() {
    assert_eq!(
        opt(binary(BinaryOp::Pow, int(5), int(8), Type::Float)),
        int(390625)
    );
    // A negative exponent leaves the integral domain.
    assert_eq!(
        opt(binary(BinaryOp::Pow, int(2), int(-3), Type::Float)),
        float(0.125)
    );
}

#[test]
fn test_division_by_zero_is_not_folded() {
    let expr = binary(BinaryOp::Div, int(5), int(0), Type::Int);
    assert_eq!(opt(expr.clone()), expr);
    let expr = binary(BinaryOp::Mod, int(5), int(0), Type::Int);
    assert_eq!(opt(expr.clone()), expr);
}

#[test]
fn test_identity_laws() {
    let x = float_var("x");
    let xref = || TypedExpr::Variable(Rc::clone(&x));

    // Right-hand constants.
    assert_eq!(opt(binary(BinaryOp::Add, xref(), int(0), Type::Float)), xref());
    assert_eq!(opt(binary(BinaryOp::Sub, xref(), int(0), Type::Float)), xref());
    assert_eq!(opt(binary(BinaryOp::Mul, xref(), int(1), Type::Float)), xref());
    assert_eq!(opt(binary(BinaryOp::Div, xref(), int(1), Type::Float)), xref());
    assert_eq!(opt(binary(BinaryOp::Mul, xref(), int(0), Type::Float)), int(0));
    assert_eq!(opt(binary(BinaryOp::Pow, xref(), int(0), Type::Float)), int(1));

    // Left-hand constants.
    assert_eq!(opt(binary(BinaryOp::Add, int(0), xref(), Type::Float)), xref());
    assert_eq!(opt(binary(BinaryOp::Sub, int(0), xref(), Type::Float)), neg(xref()));
    assert_eq!(opt(binary(BinaryOp::Mul, int(0), xref(), Type::Float)), int(0));
    assert_eq!(opt(binary(BinaryOp::Div, int(0), xref(), Type::Float)), int(0));
    assert_eq!(opt(binary(BinaryOp::Mul, int(1), xref(), Type::Float)), xref());
    assert_eq!(opt(binary(BinaryOp::Pow, int(1), xref(), Type::Float)), int(1));
}

#[test]
fn test_boolean_short_circuit_laws() {
    let x = float_var("x");
    let test = || {
        binary(
            BinaryOp::Less,
            TypedExpr::Variable(Rc::clone(&x)),
            int(1),
            Type::Boolean,
        )
    };

    assert_eq!(opt(binary(BinaryOp::Or, boolean(false), test(), Type::Boolean)), test());
    assert_eq!(opt(binary(BinaryOp::Or, test(), boolean(false), Type::Boolean)), test());
    assert_eq!(opt(binary(BinaryOp::Or, boolean(true), test(), Type::Boolean)), boolean(true));
    assert_eq!(opt(binary(BinaryOp::And, boolean(true), test(), Type::Boolean)), test());
    assert_eq!(opt(binary(BinaryOp::And, test(), boolean(true), Type::Boolean)), test());
    assert_eq!(opt(binary(BinaryOp::And, boolean(false), test(), Type::Boolean)), boolean(false));
}

#[test]
fn test_folds_unary_operators() {
    assert_eq!(opt(neg(int(8))), int(-8));
    assert_eq!(opt(neg(float(2.5))), float(-2.5));
    assert_eq!(
        opt(TypedExpr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(boolean(true)),
            ty: Type::Boolean,
        }),
        boolean(false)
    );
}

#[test]
fn test_coalesce_of_empty_optional() {
    let empty = TypedExpr::EmptyOptional {
        ty: Type::Optional(Box::new(Type::Int)),
    };
    assert_eq!(
        opt(binary(BinaryOp::Coalesce, empty, int(3), Type::Int)),
        int(3)
    );

    // A possibly-present left side is kept.
    let x = float_var("x");
    let expr = binary(
        BinaryOp::Coalesce,
        TypedExpr::Variable(Rc::clone(&x)),
        int(7),
        Type::Int,
    );
    assert_eq!(opt(expr.clone()), expr);
}

#[test]
fn test_folds_conditional_expressions() {
    assert_eq!(
        opt(TypedExpr::Conditional {
            test: Box::new(boolean(true)),
            consequent: Box::new(int(55)),
            alternate: Box::new(int(89)),
            ty: Type::Int,
        }),
        int(55)
    );
    assert_eq!(
        opt(TypedExpr::Conditional {
            test: Box::new(boolean(false)),
            consequent: Box::new(int(55)),
            alternate: Box::new(int(89)),
            ty: Type::Int,
        }),
        int(89)
    );
}

#[test]
fn test_removes_self_assignment() {
    let x = float_var("x");
    let self_assign = || TypedStmt::Assign {
        target: Rc::clone(&x),
        source: TypedExpr::Variable(Rc::clone(&x)),
    };
    let bump = || TypedStmt::Increment {
        target: Rc::clone(&x),
    };

    assert_eq!(opt_stmts(vec![self_assign(), bump()]), vec![bump()]);
    assert_eq!(opt_stmts(vec![bump(), self_assign()]), vec![bump()]);
    assert_eq!(
        opt_stmts(vec![bump(), self_assign(), bump()]),
        vec![bump(), bump()]
    );

    // Distinct variables that merely share a name are not the same
    // binding, so the assignment stays.
    let other = float_var("x");
    let kept = TypedStmt::Assign {
        target: Rc::clone(&x),
        source: TypedExpr::Variable(other),
    };
    assert_eq!(opt_stmts(vec![kept.clone()]), vec![kept]);
}

#[test]
fn test_eliminates_dead_branches() {
    let x = float_var("x");
    let bump = || TypedStmt::Increment {
        target: Rc::clone(&x),
    };
    let drop = || TypedStmt::Decrement {
        target: Rc::clone(&x),
    };

    // if true { x++ } else { x-- }
    let stmts = opt_stmts(vec![TypedStmt::If(TypedIf {
        test: boolean(true),
        consequent: vec![bump()],
        alternate: Alternate::Block(vec![drop()]),
    })]);
    assert_eq!(stmts, vec![bump()]);

    // if false { x++ } else { x-- }
    let stmts = opt_stmts(vec![TypedStmt::If(TypedIf {
        test: boolean(false),
        consequent: vec![bump()],
        alternate: Alternate::Block(vec![drop()]),
    })]);
    assert_eq!(stmts, vec![drop()]);

    // A short if with a false test disappears.
    let stmts = opt_stmts(vec![TypedStmt::If(TypedIf {
        test: boolean(false),
        consequent: vec![bump()],
        alternate: Alternate::Empty,
    })]);
    assert_eq!(stmts, vec![]);

    // Folding happens before the branch decision.
    let stmts = opt_stmts(vec![TypedStmt::If(TypedIf {
        test: binary(BinaryOp::Eq, int(1), int(1), Type::Boolean),
        consequent: vec![bump()],
        alternate: Alternate::Empty,
    })]);
    assert_eq!(stmts, vec![bump()]);

    // A false test falls through to a chained if.
    let stmts = opt_stmts(vec![TypedStmt::If(TypedIf {
        test: boolean(false),
        consequent: vec![bump()],
        alternate: Alternate::ElseIf(Box::new(TypedIf {
            test: boolean(true),
            consequent: vec![drop()],
            alternate: Alternate::Empty,
        })),
    })]);
    assert_eq!(stmts, vec![drop()]);
}

#[test]
fn test_eliminates_dead_loops() {
    let x = float_var("x");
    let bump = || TypedStmt::Increment {
        target: Rc::clone(&x),
    };
    let i = Rc::new(Variable {
        name: "i".to_string(),
        mutable: true,
        ty: Type::Int,
    });

    assert_eq!(
        opt_stmts(vec![TypedStmt::While {
            test: boolean(false),
            body: vec![bump()],
        }]),
        vec![]
    );
    assert_eq!(
        opt_stmts(vec![TypedStmt::Repeat {
            count: int(0),
            body: vec![bump()],
        }]),
        vec![]
    );
    assert_eq!(
        opt_stmts(vec![TypedStmt::ForRange {
            iterator: Rc::clone(&i),
            start: int(5),
            inclusive: true,
            end: int(3),
            body: vec![bump()],
        }]),
        vec![]
    );
    assert_eq!(
        opt_stmts(vec![TypedStmt::ForEach {
            iterator: Rc::clone(&i),
            collection: TypedExpr::EmptyArray {
                ty: Type::Array(Box::new(Type::Int)),
            },
            body: vec![bump()],
        }]),
        vec![]
    );
}

#[test]
fn test_optimizes_inside_function_bodies() {
    let f = Rc::new(Function {
        name: "f".to_string(),
        params: vec![],
        body: RefCell::new(vec![TypedStmt::Return {
            value: binary(BinaryOp::Add, int(1), int(1), Type::Int),
        }]),
        ty: Rc::new(FunctionType {
            param_types: vec![],
            return_type: Type::Int,
        }),
    });

    opt_stmts(vec![TypedStmt::FnDecl {
        function: Rc::clone(&f),
    }]);
    assert_eq!(*f.body.borrow(), vec![TypedStmt::Return { value: int(2) }]);
}

#[test]
fn test_optimizes_nested_expressions() {
    let one_plus_two = || binary(BinaryOp::Add, int(1), int(2), Type::Int);
    let a = Rc::new(Variable {
        name: "a".to_string(),
        mutable: true,
        ty: Type::Array(Box::new(Type::Int)),
    });

    assert_eq!(
        opt(TypedExpr::Subscript {
            array: Box::new(TypedExpr::Variable(Rc::clone(&a))),
            index: Box::new(one_plus_two()),
            ty: Type::Int,
        }),
        TypedExpr::Subscript {
            array: Box::new(TypedExpr::Variable(Rc::clone(&a))),
            index: Box::new(int(3)),
            ty: Type::Int,
        }
    );

    assert_eq!(
        opt(TypedExpr::Array {
            elements: vec![int(0), one_plus_two(), int(9)],
            ty: Type::Array(Box::new(Type::Int)),
        }),
        TypedExpr::Array {
            elements: vec![int(0), int(3), int(9)],
            ty: Type::Array(Box::new(Type::Int)),
        }
    );

    let id = Rc::new(Function {
        name: "id".to_string(),
        params: vec![Rc::new(Variable {
            name: "a".to_string(),
            mutable: false,
            ty: Type::Any,
        })],
        body: RefCell::new(vec![]),
        ty: Rc::new(FunctionType {
            param_types: vec![Type::Any],
            return_type: Type::Any,
        }),
    });
    assert_eq!(
        opt(TypedExpr::Call {
            callee: Callee::User(Rc::clone(&id)),
            args: vec![binary(BinaryOp::Mul, int(3), int(5), Type::Int)],
            ty: Type::Any,
        }),
        TypedExpr::Call {
            callee: Callee::User(id),
            args: vec![int(15)],
            ty: Type::Any,
        }
    );
}

#[test]
fn test_passes_through_nonoptimizable_constructs() {
    let x = float_var("x");
    let xref = || TypedExpr::Variable(Rc::clone(&x));
    let i = Rc::new(Variable {
        name: "i".to_string(),
        mutable: true,
        ty: Type::Int,
    });

    let statements = vec![
        TypedStmt::ShortReturn,
        TypedStmt::While {
            test: boolean(true),
            body: vec![TypedStmt::Break],
        },
        TypedStmt::Repeat {
            count: int(5),
            body: vec![TypedStmt::Return { value: int(1) }],
        },
        TypedStmt::If(TypedIf {
            test: binary(BinaryOp::Less, xref(), int(1), Type::Boolean),
            consequent: vec![],
            alternate: Alternate::Empty,
        }),
        TypedStmt::ForRange {
            iterator: Rc::clone(&i),
            start: int(2),
            inclusive: false,
            end: int(5),
            body: vec![],
        },
        TypedStmt::Print {
            value: TypedExpr::Conditional {
                test: Box::new(binary(BinaryOp::Less, xref(), int(1), Type::Boolean)),
                consequent: Box::new(int(1)),
                alternate: Box::new(int(2)),
                ty: Type::Int,
            },
        },
    ];
    assert_eq!(opt_stmts(statements.clone()), statements);
}
