use insta::assert_snapshot;
use loopir_parser::{
    check, parse_program, parse_program_with, BinaryOperator, Expr, KeywordCase, LexerConfig,
    TokenKind,
};
use pretty_assertions::assert_eq;

fn render(source: &str) -> String {
    match parse_program(source) {
        Ok(program) => program.to_string(),
        Err(err) => panic!("failed to parse {:?}: {}", source, err),
    }
}

#[test]
fn test_minus_chain_is_left_nested() {
    assert_snapshot!(render("x = a - b - c"), @"x = ((a - b) - c)");
}

#[test]
fn test_mixed_operators_fold_left() {
    assert_snapshot!(render("x = 1 + y - 3 + z"), @"x = (((1 + y) - 3) + z)");
}

#[test]
fn test_parentheses_group() {
    assert_snapshot!(render("x = a - (b - c)"), @"x = (a - (b - c))");
}

#[test]
fn test_counting_program() {
    assert_snapshot!(
        render("n = 5; f = 0; loop n do f = f + 1 end"),
        @"n = 5; f = 0; loop n do f = (f + 1) end"
    );
}

#[test]
fn test_nested_loops() {
    assert_snapshot!(
        render("loop n do loop n do f = f + 1 end; x = f end"),
        @"loop n do loop n do f = (f + 1) end; x = f end"
    );
}

#[test]
fn test_loop_bound_may_be_an_expression() {
    let program = parse_program("loop (n + 1) - 2 do f = 1 end").unwrap();
    match &program.body {
        Expr::Loop { count, .. } => assert_eq!(count.to_string(), "((n + 1) - 2)"),
        other => panic!("expected loop, got {:?}", other),
    }
}

#[test]
fn test_syntax_error_messages() {
    let err = parse_program("x = ").unwrap_err();
    assert_snapshot!(err.to_string(), @"syntax error at offset 4: expected term, found end of input");

    let err = parse_program("x = (1 + 2").unwrap_err();
    assert_snapshot!(err.to_string(), @"syntax error at offset 10: expected `)`, found end of input");

    let err = parse_program("x = 1 $").unwrap_err();
    assert_snapshot!(err.to_string(), @"syntax error at offset 6: expected end of input, found invalid token `$`");

    let err = parse_program("= 1").unwrap_err();
    assert_snapshot!(err.to_string(), @"syntax error at offset 0: expected expression, found `=`");
}

#[test]
fn test_keyword_case_config() {
    let source = "Loop 2 Do f = f + 1 End";

    assert!(parse_program(source).is_ok());

    let config = LexerConfig {
        keyword_case: KeywordCase::Sensitive,
    };
    let err = parse_program_with(source, config).unwrap_err();
    assert_eq!(err.actual, TokenKind::Invalid);
}

#[test]
fn test_lexer_config_serde() {
    let config: LexerConfig = serde_json::from_str(r#"{"keyword_case": "sensitive"}"#).unwrap();
    assert_eq!(config, LexerConfig::case_sensitive());

    let config: LexerConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config.keyword_case, KeywordCase::Insensitive);
}

#[test]
fn test_check() {
    assert!(check("x = 1"));
    assert!(check("x = 1;"));
    assert!(!check("x"));
    assert!(!check("loop 1 do x = 1"));
}

#[test]
fn test_long_statement_chain() {
    let source = vec!["f = f + 1"; 20_000].join("; ");
    let program = parse_program(&source).unwrap();

    let mut statements = 1;
    let mut current = &program.body;
    while let Expr::Sequence {
        second: Some(rest), ..
    } = current
    {
        statements += 1;
        current = &**rest;
    }
    assert_eq!(statements, 20_000);
    assert_eq!(
        *current,
        Expr::assign(
            "f",
            Expr::binary(BinaryOperator::Plus, Expr::ident("f"), Expr::Number(1))
        )
    );
    assert!(program.to_string().starts_with("f = (f + 1); f = (f + 1); "));
}

#[test]
fn test_long_chain_with_trailing_separator() {
    let source = format!("{};", vec!["x = 1"; 20_000].join("; "));
    let program = parse_program(&source).unwrap();

    assert!(program.to_string().ends_with("x = 1; x = 1;"));
}
