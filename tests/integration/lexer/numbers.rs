// Numeric literals

use super::*;

#[test]
fn decimal_int() {
    assert_single("0", TokenKind::Int);
    assert_single("1234567890", TokenKind::Int);
}

#[test]
fn leading_zeros_are_one_token() {
    assert_single("007", TokenKind::Int);
}

#[test]
fn hex_int() {
    assert_single("0x0", TokenKind::Int);
    assert_single("0XdeadBEEF", TokenKind::Int);
}

#[test]
fn uint_suffix() {
    assert_single("1u", TokenKind::Uint);
    assert_single("1U", TokenKind::Uint);
    assert_single("0xFFu", TokenKind::Uint);
}

#[test]
fn minus_is_separate_token() {
    assert_kinds("-42", &[TokenKind::Minus, TokenKind::Int]);
    assert_kinds("-1.5", &[TokenKind::Minus, TokenKind::Float]);
}

#[test]
fn float_forms() {
    assert_single("1.0", TokenKind::Float);
    assert_single("1e10", TokenKind::Float);
    assert_single("1E+10", TokenKind::Float);
    assert_single("1.5e-3", TokenKind::Float);
    assert_single(".5", TokenKind::Float);
    assert_single(".5e2", TokenKind::Float);
}

#[test]
fn trailing_dot_is_not_a_float() {
    assert_kinds("1.", &[TokenKind::Int, TokenKind::Dot]);
}

#[test]
fn int_followed_by_selector() {
    assert_kinds("1.x", &[TokenKind::Int, TokenKind::Dot, TokenKind::Ident]);
}

#[test]
fn float_followed_by_selector() {
    assert_kinds("1.5.x", &[TokenKind::Float, TokenKind::Dot, TokenKind::Ident]);
}

#[test]
fn float_has_no_uint_suffix() {
    assert_kinds("1.5u", &[TokenKind::Float, TokenKind::Ident]);
}

#[test]
fn number_then_identifier() {
    assert_kinds("12abc", &[TokenKind::Int, TokenKind::Ident]);
}

#[test]
fn huge_int_still_lexes() {
    // Range checking happens when the parser decodes the literal.
    assert_single("99999999999999999999999", TokenKind::Int);
}
