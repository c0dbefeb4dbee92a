//! End-to-end pipeline tests: source text in, selected artifact out.

use idolscript::analyzer::typed_ast::{Literal, TypedExpr, TypedProgram, TypedStmt};
use idolscript::parser::parser::Matcher;
use idolscript::{compile, Artifact, Stage};

fn run(source: &str, stage: Stage) -> Result<Artifact, idolscript::errors::errors::Error> {
    let matcher = Matcher::new();
    compile(&matcher, source, stage)
}

fn optimized(source: &str) -> TypedProgram {
    match run(source, Stage::Optimized) {
        Ok(Artifact::Optimized(program)) => program,
        other => panic!("expected an optimized tree, got {other:?}"),
    }
}

#[test]
fn test_parsed_stage_returns_the_syntax_tree() {
    let artifact = run("idol x = 1 perform x", Stage::Parsed).unwrap();
    let Artifact::Parsed(program) = artifact else {
        panic!("expected a parse tree");
    };
    assert_eq!(program.statements.len(), 2);
}

#[test]
fn test_syntax_errors_stop_the_pipeline() {
    for stage in [Stage::Parsed, Stage::Analyzed, Stage::Optimized, Stage::Js] {
        let error = run("idol x = * 71", stage).unwrap_err();
        assert_eq!(error.get_error_name(), "SyntaxError");
        assert!(error.get_message().contains("Unexpected token"));
    }
}

#[test]
fn test_semantic_errors_stop_the_pipeline() {
    let error = run("perform f(1)", Stage::Js).unwrap_err();
    assert_eq!(error.get_error_name(), "UndeclaredFunction");
    assert_eq!(error.get_message(), "Function f not declared");
}

#[test]
fn test_arity_errors_name_both_counts() {
    let error = run("episode f(x) {} f(1, 2)", Stage::Js).unwrap_err();
    assert_eq!(error.get_message(), "1 argument(s) required but 2 passed");
}

#[test]
fn test_integer_arithmetic_folds_to_a_single_literal() {
    let program = optimized("perform 2*3+5-8/2");
    let [TypedStmt::Print { value }] = program.statements.as_slice() else {
        panic!("expected a lone print statement");
    };
    assert_eq!(*value, TypedExpr::Literal(Literal::Int(7)));
}

#[test]
fn test_mixed_arithmetic_folds_to_a_float() {
    let program = optimized("idol x=1 perform 2*3+5**(-3)/2-5%8");
    let Some(TypedStmt::Print { value }) = program.statements.last() else {
        panic!("expected a print statement");
    };
    assert!(matches!(value, TypedExpr::Literal(Literal::Float(_))));
}

#[test]
fn test_statically_false_loops_are_removed() {
    let program = optimized("audition 1 < 0 { perform 1 }");
    assert!(program.statements.is_empty());

    let program = optimized("repeat 0 { perform 1 }");
    assert!(program.statements.is_empty());
}

#[test]
fn test_full_pipeline_emits_javascript() {
    let artifact = run("episode f(x) { encore x } perform f(10)", Stage::Js).unwrap();
    let Artifact::Js(js) = artifact else {
        panic!("expected emitted code");
    };
    assert_eq!(
        js,
        "function f_1(x_2) {\n  return x_2;\n}\nconsole.log(f_1(10));"
    );
}

#[test]
fn test_analyzed_stage_precedes_optimization() {
    let artifact = run("perform 1 + 2", Stage::Analyzed).unwrap();
    let Artifact::Analyzed(program) = artifact else {
        panic!("expected an analyzed tree");
    };
    // The sum is still a binary expression at this stage.
    let [TypedStmt::Print { value }] = program.statements.as_slice() else {
        panic!("expected a lone print statement");
    };
    assert!(matches!(value, TypedExpr::Binary { .. }));
}
