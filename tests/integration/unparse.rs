// Unparsing: canonical output, minimal parentheses, round-trips and
// operator wrapping.

mod common;
use common::*;

use celparse::parser::ast::BinOp;
use celparse::pretty::WrapOperator;
use celparse::visit::erase_spans;
use celparse::{unparse, unparse_with_options, UnparseOptions};

fn fmt(source: &str) -> String {
    unparse(&parse_ok(source))
}

fn fmt_with(source: &str, options: &UnparseOptions) -> String {
    unparse_with_options(&parse_ok(source), options)
}

fn wrap(column: usize, ops: &[BinOp]) -> UnparseOptions {
    UnparseOptions {
        wrap_on_column: column,
        wrap_on_operators: ops.iter().copied().map(WrapOperator::Binary).collect(),
        wrap_after_column_limit: true,
    }
}

/// Parse, unparse, parse again; both trees must match ignoring spans.
fn assert_roundtrip(source: &str) {
    let mut first = parse_ok(source);
    let text = unparse(&first);
    let mut second = parse_ok(&text);
    erase_spans(&mut first);
    erase_spans(&mut second);
    assert_eq!(first, second, "round-trip changed the tree\n  source: {source}\n  output: {text}");
}

// ============================================================
// Canonical output
// ============================================================

#[test]
fn canonical_forms() {
    let cases = [
        ("a+b", "a + b"),
        ("a  &&b||c", "a && b || c"),
        ("( a )", "a"),
        ("f( x ,y )", "f(x, y)"),
        ("x.y( )", "x.y()"),
        ("[ 1 , 2 , ]", "[1, 2]"),
        ("{ 'a' : 1 }", "{\"a\": 1}"),
        ("M{ a : 1 , }", "M{a: 1}"),
        ("a [ 0 ]", "a[0]"),
        (". a . b", ".a.b"),
        ("0x10", "16"),
        ("0x10u", "16u"),
        ("1e2", "100.0"),
        ("r'a\\b'", "\"a\\\\b\""),
        ("'''x\ny'''", "\"x\\ny\""),
        ("b'\\x01'", "b\"\\001\""),
        ("!  ! a", "!!a"),
        ("- - 1", "--1"),
        ("!-1", "!(-1)"),
        ("!!-1.5", "!!(-1.5)"),
        ("!-1.abs()", "!(-1).abs()"),
    ];
    for (source, expected) in cases {
        assert_eq!(fmt(source), expected, "source: {source}");
    }
}

#[test]
fn parentheses_only_where_needed() {
    let cases = [
        ("(a + b) + c", "a + b + c"),
        ("a + (b + c)", "a + (b + c)"),
        ("(a * b) + c", "a * b + c"),
        ("(a + b) * c", "(a + b) * c"),
        ("(a || b) && c", "(a || b) && c"),
        ("a || (b && c)", "a || b && c"),
        ("(a < b) == c", "a < b == c"),
        ("a == (b < c)", "a == (b < c)"),
        ("(a ? b : c).d", "(a ? b : c).d"),
        ("(a + b)[0]", "(a + b)[0]"),
        ("(a.b).c", "a.b.c"),
        ("-(a.b)", "-a.b"),
        ("!(a || b)", "!(a || b)"),
        ("(-a) * b", "-a * b"),
        ("(-1).abs()", "(-1).abs()"),
    ];
    for (source, expected) in cases {
        assert_eq!(fmt(source), expected, "source: {source}");
    }
}

#[test]
fn ternary_parentheses() {
    assert_eq!(fmt("a ? b : c ? d : e"), "a ? b : c ? d : e");
    assert_eq!(fmt("a ? (b ? c : d) : e"), "a ? (b ? c : d) : e");
    assert_eq!(fmt("(a ? b : c) ? d : e"), "(a ? b : c) ? d : e");
    assert_eq!(fmt("a ? b || c : d && e"), "a ? b || c : d && e");
}

#[test]
fn negation_of_unsigned_literal_keeps_parentheses() {
    assert_eq!(fmt("-(1)"), "-(1)");
    assert_eq!(fmt("-(1.5)"), "-(1.5)");
    assert_eq!(fmt("-(1u)"), "-1u");
}

#[test]
fn keyword_field_names_are_escaped() {
    assert_eq!(fmt("a.`true`"), "a.`true`");
    assert_eq!(fmt("M{`null`: 1}"), "M{`null`: 1}");
    assert_eq!(fmt("a.`with space`"), "a.`with space`");
}

#[test]
fn string_escapes_in_output() {
    assert_eq!(fmt(r#"'say "hi"\t'"#), r#""say \"hi\"\t""#);
    assert_eq!(fmt(r"'\a'"), r#""\u0007""#);
    assert_eq!(fmt("'ünï'"), "\"ünï\"");
}

// ============================================================
// Round-trips
// ============================================================

#[test]
fn roundtrip_corpus() {
    let corpus = [
        "a",
        ".a.b.c",
        "a.b.c(d, e).f[g]",
        "a.?b[?c]",
        "f()",
        ".f(x)",
        "[1, ?x, 'y', b'z', 2u, 3.5, true, null]",
        "{?a: b, 'c': [d], 1: {}}",
        "pkg.Msg{a: 1, ?b: x.y, c: pkg.Other{}}",
        "!a || !!b && --c",
        "-1 - -1 - --1 - ---1",
        "!-1",
        "!!-1.5 && !-1.abs()",
        "-(-1)",
        "-(-(a))",
        "a ? b : c ? d : e",
        "(a ? b : c) ? (d ? e : f) : g",
        "x in [1, 2] && !(y in z)",
        "a + b * c - d / e % f",
        "(a + b) * (c - d)",
        "1 < 2 == 3 > 4 != 5 <= 6 >= 7",
        "size(a) > 0 ? a[0] : default",
        "(1).x + (2u).y + 1.5.z",
        "-(1).x",
        "a.`b-c`.`in`",
        "'\\n\\r\\t\\\\\\''",
        "b'\\x00\\xff'",
        "9223372036854775807 + -9223372036854775808",
        "0.1 + 1e-300 + 123456789.125",
    ];
    for source in corpus {
        assert_roundtrip(source);
    }
}

#[test]
fn unparse_is_idempotent() {
    let source = "a&&(b||c)&&!d.e(f)[0] ? [1,2,] : {'k':-1.5}";
    let once = fmt(source);
    assert_eq!(fmt(&once), once);
}

// ============================================================
// Wrapping
// ============================================================

#[test]
fn no_wrap_without_operators() {
    let options = UnparseOptions { wrap_on_column: 3, wrap_on_operators: Vec::new(), ..UnparseOptions::default() };
    assert_eq!(fmt_with("a + b + c + d", &options), "a + b + c + d");
}

#[test]
fn no_wrap_below_column() {
    assert_eq!(fmt_with("a + b + c + d", &wrap(1000, &[BinOp::Add])), "a + b + c + d");
    assert_eq!(fmt_with("a + b + c + d", &wrap(13, &[BinOp::Add])), "a + b + c + d");
}

#[test]
fn wrap_on_add() {
    assert_eq!(fmt_with("a + b - d * e", &wrap(3, &[BinOp::Add])), "a +\nb - d * e");
}

#[test]
fn wrap_on_add_and_subtract() {
    assert_eq!(
        fmt_with("a * b + c - d * e", &wrap(3, &[BinOp::Add, BinOp::Sub])),
        "a * b +\nc -\nd * e"
    );
}

#[test]
fn wrap_on_logical_operators() {
    assert_eq!(fmt_with("a && b && c && d && e", &wrap(3, &[BinOp::And])), "a &&\nb &&\nc &&\nd &&\ne");
    assert_eq!(fmt_with("a || b || c || d || e", &wrap(3, &[BinOp::Or])), "a ||\nb ||\nc ||\nd ||\ne");
    assert_eq!(fmt_with("a && b", &wrap(3, &[BinOp::And])), "a &&\nb");
}

#[test]
fn wrap_on_relations() {
    assert_eq!(fmt_with("a == b == c", &wrap(3, &[BinOp::Eq])), "a ==\nb ==\nc");
    assert_eq!(fmt_with("a in b", &wrap(3, &[BinOp::In])), "a in\nb");
}

#[test]
fn wrap_on_conditional() {
    let options = UnparseOptions {
        wrap_on_column: 3,
        wrap_on_operators: vec![WrapOperator::Conditional],
        ..UnparseOptions::default()
    };
    assert_eq!(fmt_with("a ? b : c ? d : e", &options), "a ?\nb : c ?\nd : e");
}

#[test]
fn wrap_before_operator() {
    let options = UnparseOptions { wrap_after_column_limit: false, ..wrap(3, &[BinOp::And]) };
    assert_eq!(fmt_with("a && b && c", &options), "a\n&& b\n&& c");
}

#[test]
fn wrap_counts_from_last_break() {
    // Each line restarts the column count.
    let options = wrap(12, &[BinOp::And]);
    assert_eq!(
        fmt_with("aaaa && bbbb && cccc && dddd", &options),
        "aaaa && bbbb &&\ncccc && dddd"
    );
}

#[test]
fn default_options_wrap_long_conjunctions() {
    let clauses: Vec<String> = (0..12).map(|i| format!("field_{i} == value_{i}")).collect();
    let source = clauses.join(" && ");
    let text = fmt(&source);
    assert!(text.lines().count() > 1, "expected wrapping, got {text}");
    assert!(text.lines().all(|line| line.len() <= 110));
    assert_roundtrip(&source);
    let mut reparsed = parse_ok(&text);
    let mut original = parse_ok(&source);
    erase_spans(&mut reparsed);
    erase_spans(&mut original);
    assert_eq!(reparsed, original);
}
