#![no_main]
use arbitrary::Arbitrary;
use celparse::lexer::{Token, TokenKind, TokenStream};
use celparse::span::Span;
use celparse::ParserOptions;
use libfuzzer_sys::fuzz_target;

/// Token shapes the lexer can produce, each with fixed sample text
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzToken {
    Ident,
    Keyword,
    EscapedIdent,
    Int,
    Uint,
    Float,
    String,
    Bytes,
    Plus,
    Minus,
    Bang,
    EqEq,
    AmpAmp,
    In,
    Question,
    Colon,
    Dot,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Eof,
}

impl FuzzToken {
    fn kind_and_text(self) -> (TokenKind, &'static str) {
        match self {
            FuzzToken::Ident => (TokenKind::Ident, "x"),
            FuzzToken::Keyword => (TokenKind::Ident, "while"),
            FuzzToken::EscapedIdent => (TokenKind::EscapedIdent, "`a.b`"),
            FuzzToken::Int => (TokenKind::Int, "42"),
            FuzzToken::Uint => (TokenKind::Uint, "7u"),
            FuzzToken::Float => (TokenKind::Float, "2.5"),
            FuzzToken::String => (TokenKind::String, "'s'"),
            FuzzToken::Bytes => (TokenKind::Bytes, "b'\\x00'"),
            FuzzToken::Plus => (TokenKind::Plus, "+"),
            FuzzToken::Minus => (TokenKind::Minus, "-"),
            FuzzToken::Bang => (TokenKind::Bang, "!"),
            FuzzToken::EqEq => (TokenKind::EqEq, "=="),
            FuzzToken::AmpAmp => (TokenKind::AmpAmp, "&&"),
            FuzzToken::In => (TokenKind::In, "in"),
            FuzzToken::Question => (TokenKind::Question, "?"),
            FuzzToken::Colon => (TokenKind::Colon, ":"),
            FuzzToken::Dot => (TokenKind::Dot, "."),
            FuzzToken::Comma => (TokenKind::Comma, ","),
            FuzzToken::LParen => (TokenKind::LParen, "("),
            FuzzToken::RParen => (TokenKind::RParen, ")"),
            FuzzToken::LBracket => (TokenKind::LBracket, "["),
            FuzzToken::RBracket => (TokenKind::RBracket, "]"),
            FuzzToken::LBrace => (TokenKind::LBrace, "{"),
            FuzzToken::RBrace => (TokenKind::RBrace, "}"),
            FuzzToken::Eof => (TokenKind::Eof, ""),
        }
    }
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    tokens: Vec<FuzzToken>,
    error_recovery: bool,
    enable_optional_syntax: bool,
    max_recursion_depth: u8,
}

fuzz_target!(|input: FuzzInput| {
    // Lay the tokens out one column apart so every span is distinct
    let mut offset = 0;
    let tokens: Vec<Token<'static>> = input
        .tokens
        .iter()
        .map(|t| {
            let (kind, text) = t.kind_and_text();
            let span = Span::new(offset, offset + text.len());
            offset += text.len() + 1;
            Token::new(kind, text, span)
        })
        .collect();

    let options = ParserOptions {
        max_recursion_depth: usize::from(input.max_recursion_depth).max(1),
        enable_optional_syntax: input.enable_optional_syntax,
        error_recovery: input.error_recovery,
    };
    if let Err(diags) = celparse::parse_tokens(TokenStream::new(&tokens), options) {
        assert!(!diags.is_empty());
        for err in diags.iter() {
            assert!(err.span().end <= offset.max(1));
        }
    }
});
