// Position tracking

use super::*;

#[test]
fn spans_are_byte_offsets() {
    assert_span("a + bc", 0, 0, 1);
    assert_span("a + bc", 1, 2, 3);
    assert_span("a + bc", 2, 4, 6);
}

#[test]
fn multibyte_string_span_counts_bytes() {
    assert_span("'é' + x", 0, 0, 4);
    assert_span("'é' + x", 2, 7, 8);
}

#[test]
fn spans_across_lines() {
    assert_span("a\n  &&\n b", 1, 4, 6);
    assert_span("a\n  &&\n b", 2, 8, 9);
}

#[test]
fn comments_are_skipped() {
    assert_kinds("a // x + y\n+ b // end", &[TokenKind::Ident, TokenKind::Plus, TokenKind::Ident]);
    assert_span("// lead\nz", 0, 8, 9);
}

#[test]
fn comment_only_source_is_empty() {
    assert!(lex_ok("// nothing here").is_empty());
}

#[test]
fn slash_is_not_a_comment() {
    assert_kinds("a / b", &[TokenKind::Ident, TokenKind::Slash, TokenKind::Ident]);
}

#[test]
fn form_feed_and_tabs_are_whitespace() {
    assert_kinds("a\t\x0C\r\nb", &[TokenKind::Ident, TokenKind::Ident]);
}

#[test]
fn eof_is_empty_span_at_end() {
    let tokens = lex("x  ").unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1].kind, TokenKind::Eof);
    assert_eq!(tokens[1].span, Span::new(3, 3));
    assert_eq!(tokens[1].text, "");
}

#[test]
fn error_span_points_at_offender() {
    let err = lex_fails("ab $");
    assert_eq!(err.span(), Span::new(3, 4));
}
