// Lexer test suite
//
// Categories:
// - numbers: int, uint and float forms and their boundaries with `.`
// - strings: quoting, prefixes, triple quotes, escapes left for decoding
// - operators: multi-character operators and punctuation
// - spans: byte offsets, comments, whitespace and the Eof marker

use celparse::diagnostics::ParseError;
use celparse::lexer::{lex, Token, TokenKind};
use celparse::span::Span;

/// Lex source and expect success. The trailing Eof is dropped.
pub fn lex_ok(source: &str) -> Vec<Token<'_>> {
    let mut tokens = lex(source).expect("lexing should succeed");
    let eof = tokens.pop().expect("token stream always ends in Eof");
    assert_eq!(eof.kind, TokenKind::Eof);
    tokens
}

/// Lex source and expect failure.
pub fn lex_fails(source: &str) -> ParseError {
    match lex(source) {
        Ok(tokens) => panic!("lexing should fail for {source:?}, got {tokens:?}"),
        Err(err) => err,
    }
}

/// Assert token kinds match (ignoring spans and Eof).
pub fn assert_kinds(source: &str, expected: &[TokenKind]) {
    let actual: Vec<TokenKind> = lex_ok(source).iter().map(|t| t.kind).collect();
    assert_eq!(actual, expected, "token mismatch for source: {source}");
}

/// Assert the source lexes to one token of `kind` covering all of it.
pub fn assert_single(source: &str, kind: TokenKind) {
    let tokens = lex_ok(source);
    assert_eq!(tokens.len(), 1, "expected one token for {source:?}, got {tokens:?}");
    assert_eq!(tokens[0].kind, kind);
    assert_eq!(tokens[0].text, source);
}

/// Assert the token at `index` has the given span.
pub fn assert_span(source: &str, index: usize, start: usize, end: usize) {
    let tokens = lex_ok(source);
    assert!(index < tokens.len(), "token index {index} out of bounds (len={})", tokens.len());
    assert_eq!(tokens[index].span, Span::new(start, end), "span mismatch for token {index} in {source:?}");
}

mod numbers;
mod spans;
