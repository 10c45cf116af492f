use super::*;
use loopir_core::{analysis::ControlFlowGraph, Instruction, Interpreter};
use loopir_parser::{parse_program, BinaryOperator, Expr, TopLevel};

fn run(source: &str, n: i64) -> i64 {
    let module = match transform_source_to_ir(source) {
        Ok(module) => module,
        Err(err) => panic!("failed to compile {:?}: {}", source, err),
    };
    let function = module.function("mainloop").unwrap();
    Interpreter::new(function).run(&[n]).unwrap()
}

fn run_ast(body: Expr, n: i64) -> i64 {
    let mut generator = CodeGenerator::new();
    let name = generator.compile(&TopLevel::new(body)).unwrap();
    let function = generator.module().function(&name).unwrap();
    Interpreter::new(function).run(&[n]).unwrap()
}

#[test]
fn test_monus_matches_truncated_subtraction() {
    for a in 0..6i64 {
        for b in 0..6i64 {
            let source = format!("f = {} - {}", a, b);
            assert_eq!(run(&source, 0), (a - b).max(0), "{}", source);
        }
    }
}

#[test]
fn test_monus_on_variables() {
    assert_eq!(run("x = 3; f = n - x", 10), 7);
    assert_eq!(run("x = 3; f = n - x", 2), 0);
    assert_eq!(run("f = n - n - 1", 4), 0);
    assert_eq!(run("f = n - (n - 1)", 4), 1);
}

#[test]
fn test_loop_runs_count_times() {
    for k in [0, 1, 2, 7] {
        let source = format!("loop {} do f = f + 1 end", k);
        assert_eq!(run(&source, 0), k);
    }
}

#[test]
fn test_loop_count_evaluated_once() {
    assert_eq!(run("x = 3; loop x do x = x + 1; f = f + 1 end", 0), 3);
}

#[test]
fn test_loop_value_is_zero() {
    let body = Expr::sequence(
        Expr::assign("f", Expr::Number(7)),
        Some(Expr::assign(
            "f",
            Expr::looped(
                Expr::Number(3),
                Expr::assign(
                    "f",
                    Expr::binary(BinaryOperator::Plus, Expr::ident("f"), Expr::Number(1)),
                ),
            ),
        )),
    );
    assert_eq!(run_ast(body, 0), 0);
}

#[test]
fn test_assignment_is_an_expression() {
    let body = Expr::assign(
        "f",
        Expr::binary(
            BinaryOperator::Plus,
            Expr::assign("x", Expr::Number(4)),
            Expr::ident("x"),
        ),
    );
    assert_eq!(run_ast(body, 0), 8);
}

#[test]
fn test_counting_program() {
    assert_eq!(run("n = 5; f = 0; loop n do f = f + 1 end", 99), 5);
}

#[test]
fn test_monus_floors_every_iteration() {
    assert_eq!(run("loop 3 do f = f - 1 end", 0), 0);
}

#[test]
fn test_parameter_binding() {
    assert_eq!(run("f = n + n", 21), 42);
    assert_eq!(run("x = 1", 5), 0);
}

#[test]
fn test_variables_outlive_loops() {
    assert_eq!(run("loop 2 do x = 7 end; f = x", 0), 7);
    assert_eq!(run("loop 0 do x = 7 end; f = f + 1", 0), 1);
}

#[test]
fn test_nested_loops_multiply() {
    assert_eq!(run("loop n do loop n do f = f + 1 end end", 3), 9);
    assert_eq!(run("loop 4 do loop 2 - 1 do f = f + 1 end end", 0), 4);
}

#[test]
fn test_back_edge_after_monus_in_body() {
    let module = transform_source_to_ir("loop n do x = f - 2; f = f + 1 end").unwrap();
    let function = module.function("mainloop").unwrap();
    assert_eq!(Interpreter::new(function).run(&[5]).unwrap(), 5);

    let cfg = ControlFlowGraph::from_function(&function.body);
    let back_edges = cfg.back_edges();
    assert_eq!(back_edges.len(), 1);

    let (latch, condition) = back_edges[0];
    assert_eq!(function.body.get_block(condition).unwrap().name, "loopcondition");
    assert_eq!(function.body.get_block(latch).unwrap().name, "ifmerge");
}

#[test]
fn test_factorial_style_program() {
    let source = "f = 1; x = 0; loop n do x = x + 1; y = f; loop x - 1 do f = f + y end end";
    assert_eq!(run(source, 0), 1);
    assert_eq!(run(source, 1), 1);
    assert_eq!(run(source, 4), 24);
    assert_eq!(run(source, 5), 120);
}

#[test]
fn test_undefined_variable() {
    let mut generator = CodeGenerator::new();
    let err = generator.compile_source("x = y").unwrap_err();

    assert_eq!(err, TransformError::UndefinedVariable("y".to_string()));
    assert!(generator.module().is_empty());
}

#[test]
fn test_trailing_separator_is_rejected() {
    let mut generator = CodeGenerator::new();
    let err = generator.compile_source("f = 1;").unwrap_err();

    assert_eq!(err, TransformError::EmptyExpression);
    assert!(generator.module().is_empty());
}

#[test]
fn test_long_statement_chain_compiles() {
    let source = vec!["f = f + 1"; 20_000].join("; ");
    assert_eq!(run(&source, 0), 20_000);
}

#[test]
fn test_long_chain_of_loops_and_monus() {
    let source = vec!["loop 2 do f = f + 3 end; f = f - 1"; 5_000].join("; ");
    assert_eq!(run(&source, 0), 25_000);
}

#[test]
fn test_long_chain_with_trailing_separator_is_rejected() {
    let source = format!("{};", vec!["f = 1"; 20_000].join("; "));
    let mut generator = CodeGenerator::new();

    assert_eq!(
        generator.compile_source(&source).unwrap_err(),
        TransformError::EmptyExpression
    );
    assert!(generator.module().is_empty());
}

#[test]
fn test_literal_out_of_range() {
    let mut generator = CodeGenerator::new();
    let err = generator.compile_source("f = 9223372036854775808").unwrap_err();

    assert_eq!(err, TransformError::LiteralOutOfRange(9223372036854775808));
    assert_eq!(run("f = 9223372036854775807", 0), i64::MAX);
}

#[test]
fn test_syntax_error_surfaces() {
    let mut generator = CodeGenerator::new();
    let err = generator.compile_source("loop 1 do f = 1").unwrap_err();

    match err {
        TransformError::Syntax(parse) => assert_eq!(parse.expected, "`end`"),
        other => panic!("expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_units_get_distinct_names() {
    let mut generator = CodeGenerator::new();

    assert_eq!(generator.compile_source("f = 1").unwrap(), "mainloop");
    assert!(generator.compile_source("f = y").is_err());
    assert_eq!(generator.compile_source("f = 2").unwrap(), "mainloop.1");
    assert_eq!(generator.compile_source("f = 3").unwrap(), "mainloop.2");

    let names: Vec<&str> = generator
        .module()
        .functions
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(names, vec!["mainloop", "mainloop.1", "mainloop.2"]);
}

#[test]
fn test_symbols_do_not_leak_between_units() {
    let mut generator = CodeGenerator::new();
    generator.compile_source("x = 1").unwrap();

    let err = generator.compile_source("f = x").unwrap_err();
    assert_eq!(err, TransformError::UndefinedVariable("x".to_string()));
}

#[test]
fn test_one_slot_per_variable() {
    let source = "x = 1; x = x + 1; loop 2 do x = x + 1 end; f = x";
    let module = transform_source_to_ir(source).unwrap();
    let function = module.function("mainloop").unwrap();

    let names: Vec<&str> = function.body.slots.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["n", "f", "x"]);
}

#[test]
fn test_monus_block_shape() {
    let module = transform_source_to_ir("f = n - 1").unwrap();
    let function = module.function("mainloop").unwrap();

    let names: Vec<&str> = function.body.blocks.values().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["entry", "then", "else", "ifmerge"]);

    let merge = function.body.blocks.values().last().unwrap();
    assert!(matches!(
        &merge.instructions[0],
        Instruction::Phi { values, .. } if values.len() == 2
    ));
}

#[test]
fn test_case_sensitive_config() {
    let config = CompilerConfig {
        keyword_case: loopir_parser::KeywordCase::Sensitive,
        ..CompilerConfig::default()
    };

    let shouted = transform_source_to_ir_with_config("LOOP 2 do f = f + 1 end", config.clone());
    assert!(shouted.is_err());
    assert!(transform_source_to_ir_with_config("loop 2 do f = f + 1 end", config).is_ok());
    assert!(transform_source_to_ir("LOOP 2 DO f = f + 1 END").is_ok());
}

#[test]
fn test_config_from_json() {
    let config: CompilerConfig =
        serde_json::from_str(r#"{"function_name": "prog", "keyword_case": "sensitive"}"#).unwrap();

    assert_eq!(config.function_name, "prog");
    assert!(config.verify);

    let module = transform_source_to_ir_with_config("f = 3", config).unwrap();
    assert!(module.get_function("prog").is_some());
}

#[test]
fn test_parse_then_compile() {
    let program = parse_program("f = n + 2").unwrap();
    let mut generator = CodeGenerator::new();
    generator.compile(&program).unwrap();
    generator.compile(&program).unwrap();

    assert_eq!(generator.module().len(), 2);
}
