// Aggregate literals: lists, maps and message construction.

mod common;
use common::*;

use celparse::parser::ast::Expr;
use celparse::span::Span;
use celparse::{ParseError, ParserOptions};

// ============================================================
// Lists
// ============================================================

#[test]
fn empty_list() {
    assert_eq!(sexpr("[]"), "(list)");
}

#[test]
fn list_elements() {
    assert_eq!(sexpr("[1, a + b, 'x']"), "(list 1 (+ a b) \"x\")");
}

#[test]
fn list_trailing_comma() {
    assert_eq!(sexpr("[1, 2,]"), "(list 1 2)");
}

#[test]
fn list_double_trailing_comma_fails() {
    let err = first_error("[1,,]");
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
}

#[test]
fn list_optional_elements() {
    assert_eq!(sexpr("[?a, b, ?c.d]"), "(list ?a b ?(select c d))");
}

#[test]
fn nested_lists() {
    assert_eq!(sexpr("[[1], [[]]]"), "(list (list 1) (list (list)))");
}

// ============================================================
// Maps
// ============================================================

#[test]
fn empty_map() {
    assert_eq!(sexpr("{}"), "(map)");
}

#[test]
fn map_entries() {
    assert_eq!(sexpr("{'a': 1, b: c ? d : e}"), "(map \"a\":1 b:(? c d e))");
}

#[test]
fn map_keys_are_expressions() {
    assert_eq!(sexpr("{1 + 2: x, f(y): z}"), "(map (+ 1 2):x (call f y):z)");
}

#[test]
fn map_optional_entry_and_trailing_comma() {
    assert_eq!(sexpr("{?'k': v,}"), "(map ?\"k\":v)");
}

#[test]
fn map_missing_colon() {
    let err = first_error("{'a' 1}");
    assert_eq!(err.to_string(), "unexpected token '1', expected ':'");
}

// ============================================================
// Messages
// ============================================================

#[test]
fn message_simple() {
    assert_eq!(sexpr("Msg{a: 1}"), "(msg Msg a:1)");
}

#[test]
fn message_empty() {
    assert_eq!(sexpr("Msg{}"), "(msg Msg)");
}

#[test]
fn message_qualified_and_rooted() {
    assert_eq!(sexpr("google.protobuf.Duration{seconds: 5}"), "(msg google.protobuf.Duration seconds:5)");
    assert_eq!(sexpr(".pkg.Msg{}"), "(msg .pkg.Msg)");
}

#[test]
fn message_optional_fields_and_trailing_comma() {
    assert_eq!(sexpr("M{?a: x, b: [1],}"), "(msg M ?a:x b:(list 1))");
}

#[test]
fn message_escaped_field_name() {
    assert_eq!(sexpr("M{`x-y`: 1}"), "(msg M x-y:1)");
}

#[test]
fn message_then_member() {
    assert_eq!(sexpr("M{a: 1}.a"), "(select (msg M a:1) a)");
}

#[test]
fn message_nested_values() {
    assert_eq!(sexpr("a.B{c: a.C{d: {}}}"), "(msg a.B c:(msg a.C d:(map)))");
}

#[test]
fn message_field_must_be_name() {
    let err = first_error("M{'a': 1}");
    assert_eq!(
        err.to_string(),
        "unexpected token ''a'', expected one of identifier, or escaped identifier"
    );
}

#[test]
fn message_type_segments_have_spans() {
    let expr = parse_ok("a.bc.D{}");
    let Expr::Message { type_name, rooted, .. } = &expr.node else {
        panic!("expected message, got {:?}", expr.node);
    };
    assert!(!rooted);
    let spans: Vec<Span> = type_name.iter().map(|s| s.span).collect();
    assert_eq!(spans, vec![Span::new(0, 1), Span::new(2, 4), Span::new(5, 6)]);
    assert_eq!(expr.span, Span::new(0, 8));
}

#[test]
fn message_after_index_or_call_is_trailing() {
    assert!(matches!(first_error("a[0]{}"), ParseError::TrailingInput { .. }));
    assert!(matches!(first_error("a.b(){}"), ParseError::TrailingInput { .. }));
    assert!(matches!(first_error("a.?b{}"), ParseError::TrailingInput { .. }));
}

#[test]
fn reserved_leading_segment_rejected() {
    let err = first_error("package.Msg{}");
    assert_eq!(err, ParseError::ReservedIdentifier { name: "package".to_string(), span: Span::new(0, 7) });
}

// ============================================================
// Optional syntax switch
// ============================================================

#[test]
fn optional_elements_rejected_when_disabled() {
    let options = ParserOptions { enable_optional_syntax: false, error_recovery: false, ..ParserOptions::default() };
    for source in ["[?a]", "{?a: b}", "M{?f: 1}", "a[?0]"] {
        let diags = parse_err_with(source, options);
        assert!(
            matches!(diags.first(), ParseError::UnsupportedSyntax { .. }),
            "{source}: {:?}",
            diags.first()
        );
    }
}
