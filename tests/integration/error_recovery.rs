// Error reporting and resynchronisation inside delimited sequences.

mod common;
use common::*;

use celparse::span::Span;
use celparse::{ParseError, ParserOptions};

fn no_recovery() -> ParserOptions {
    ParserOptions { error_recovery: false, ..ParserOptions::default() }
}

// ============================================================
// Single errors
// ============================================================

#[test]
fn empty_input() {
    let err = first_error("");
    assert_eq!(err, ParseError::UnexpectedEndOfInput { expected: vec!["expression".to_string()], span: Span::new(0, 0) });
}

#[test]
fn whitespace_only_input() {
    let err = first_error("   ");
    assert_eq!(err.span(), Span::new(3, 3));
}

#[test]
fn dangling_operator() {
    let err = first_error("a &&");
    assert!(matches!(err, ParseError::UnexpectedEndOfInput { .. }));
    assert_eq!(err.span(), Span::new(4, 4));
}

#[test]
fn unclosed_paren() {
    let err = first_error("(a + b");
    assert_eq!(err.to_string(), "unexpected end of input, expected ')'");
}

#[test]
fn stray_closer() {
    let err = first_error("a)");
    assert_eq!(err, ParseError::TrailingInput { found: "')'".to_string(), span: Span::new(1, 2) });
}

#[test]
fn missing_ternary_branch() {
    let err = first_error("a ? b");
    assert_eq!(err.to_string(), "unexpected end of input, expected ':'");
}

#[test]
fn unrecognized_character() {
    let err = first_error("a @ b");
    assert_eq!(err, ParseError::UnrecognizedToken { text: "@".to_string(), span: Span::new(2, 3) });
}

#[test]
fn reserved_identifier_and_call() {
    assert!(matches!(first_error("if"), ParseError::ReservedIdentifier { .. }));
    assert!(matches!(first_error("while(x)"), ParseError::ReservedIdentifier { .. }));
    // Method and field names are not checked.
    parse_ok("x.while(y)");
    parse_ok("M{return: 1}");
}

// ============================================================
// Recovery in sequences
// ============================================================

#[test]
fn list_collects_every_bad_element() {
    let diags = parse_err("[1, +, 2, *, 3]");
    assert_eq!(diags.len(), 2);
    let spans: Vec<Span> = diags.iter().map(|e| e.span()).collect();
    assert_eq!(spans, vec![Span::new(4, 5), Span::new(10, 11)]);
}

#[test]
fn argument_errors_are_collected() {
    let diags = parse_err("f(a b, c d)");
    assert_eq!(diags.len(), 2);
    assert!(diags.iter().all(|e| e.to_string().starts_with("unexpected token")));
}

#[test]
fn recovery_skips_nested_brackets() {
    // The bad element contains a comma inside brackets; recovery must not
    // stop there.
    let diags = parse_err("[a b [1, 2], c d]");
    assert_eq!(diags.len(), 2);
    assert_eq!(diags.errors()[0].span(), Span::new(3, 4));
    assert_eq!(diags.errors()[1].span(), Span::new(15, 16));
}

#[test]
fn map_and_message_errors_are_collected() {
    let diags = parse_err("{1 2, 3: 4, 5}");
    assert_eq!(diags.len(), 2);
    let diags = parse_err("M{a 1, b: 2, 'c': 3}");
    assert_eq!(diags.len(), 2);
}

#[test]
fn invalid_literals_are_collected() {
    let diags = parse_err("[99999999999999999999, '\\q', 1]");
    assert_eq!(diags.len(), 2);
    assert!(diags.iter().all(|e| matches!(e, ParseError::InvalidLiteral { .. })));
}

#[test]
fn nested_sequences_recover_independently() {
    let diags = parse_err("[f(a b), {1 2}]");
    assert_eq!(diags.len(), 2);
}

#[test]
fn end_of_input_is_not_recovered() {
    let diags = parse_err("[1, 2");
    assert_eq!(diags.len(), 1);
    assert!(matches!(diags.first(), ParseError::UnexpectedEndOfInput { .. }));
}

#[test]
fn recorded_errors_precede_fatal_error() {
    let diags = parse_err("[1 2, 3");
    assert_eq!(diags.len(), 2);
    assert!(matches!(diags.errors()[0], ParseError::UnexpectedToken { .. }));
    assert!(matches!(diags.errors()[1], ParseError::UnexpectedEndOfInput { .. }));
}

#[test]
fn recovery_disabled_stops_at_first_error() {
    let diags = parse_err_with("[1, +, 2, *, 3]", no_recovery());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.first().span(), Span::new(4, 5));
}

#[test]
fn recursion_limit_is_not_recovered() {
    let options = ParserOptions { max_recursion_depth: 2, ..ParserOptions::default() };
    let diags = parse_err_with("[[[1]], 2]", options);
    assert_eq!(diags.len(), 1);
    assert!(matches!(diags.first(), ParseError::RecursionLimitExceeded { limit: 2, .. }));
}

#[test]
fn deep_nesting_hits_default_limit() {
    let source = format!("{}x{}", "(".repeat(500), ")".repeat(500));
    let diags = parse_err(&source);
    assert!(matches!(diags.first(), ParseError::RecursionLimitExceeded { limit: 100, .. }));
}

#[test]
fn nesting_at_the_limit_is_accepted() {
    let source = format!("{}x{}", "[".repeat(99), "]".repeat(99));
    parse_ok(&source);
}

// ============================================================
// Rendering
// ============================================================

#[test]
fn plain_rendering_lists_all_errors() {
    let source = "[1, +,\n 2, *]";
    let plain = parse_err(source).to_plain(source, "rule.cel");
    assert_eq!(
        plain,
        "ERROR: rule.cel:1:5: unexpected token '+', expected expression\n\
         ERROR: rule.cel:2:5: unexpected token '*', expected expression\n"
    );
}

#[test]
fn ariadne_rendering_names_source() {
    let source = "a + )";
    let rendered = parse_err(source).render(source, "rule.cel");
    assert!(rendered.contains("rule.cel: syntax error"), "got:\n{rendered}");
    assert!(rendered.contains("unexpected token ')', expected expression"));
}
