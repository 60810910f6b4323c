use logos::{Lexer, Logos};

use crate::span::Span;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\x0C]+")]
pub enum TokenKind {
    // Keywords
    #[token("in")]
    In,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // Literals
    #[regex(r"0[xX][0-9a-fA-F]+|[0-9]+")]
    Int,
    #[regex(r"(0[xX][0-9a-fA-F]+|[0-9]+)[uU]")]
    Uint,
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+|\.[0-9]+([eE][+-]?[0-9]+)?")]
    Float,
    #[regex(r#"[rR]?["']"#, lex_quoted)]
    String,
    #[regex(r#"([bB][rR]?|[rR][bB])["']"#, lex_quoted)]
    Bytes,

    // Identifiers
    #[regex(r"[_a-zA-Z][_a-zA-Z0-9]*")]
    Ident,
    #[regex(r"`[a-zA-Z0-9_./ \-]+`")]
    EscapedIdent,

    // Operators
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token(">")]
    Gt,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    // Comments (skip)
    #[regex(r"//[^\n]*")]
    Comment,

    /// Terminal marker appended by `lex`; never produced by the logos automaton.
    Eof,
}

/// Scan the body of a quoted literal whose prefix and opening quote are in
/// `lex.slice()`. Triple-quoted bodies may span lines; raw bodies treat `\`
/// as an ordinary character.
fn lex_quoted(lex: &mut Lexer<TokenKind>) -> bool {
    let prefix = lex.slice();
    let raw = prefix.contains(['r', 'R']);
    let Some(quote) = prefix.bytes().last() else {
        return false;
    };
    let rest = lex.remainder().as_bytes();
    let triple = rest.len() >= 2 && rest[0] == quote && rest[1] == quote;
    let body_start = if triple { 2 } else { 0 };

    let mut i = body_start;
    while i < rest.len() {
        match rest[i] {
            b'\\' if !raw => i += 2,
            b'\n' | b'\r' if !triple => return false,
            c if c == quote => {
                if !triple {
                    lex.bump(i + 1);
                    return true;
                }
                if rest[i..].starts_with(&[quote, quote, quote]) {
                    lex.bump(i + 3);
                    return true;
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    false
}

impl TokenKind {
    /// Human-readable description used in "expected ..." lists.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::In => "'in'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Null => "'null'",
            TokenKind::Int => "integer literal",
            TokenKind::Uint => "unsigned integer literal",
            TokenKind::Float => "floating-point literal",
            TokenKind::String => "string literal",
            TokenKind::Bytes => "bytes literal",
            TokenKind::Ident => "identifier",
            TokenKind::EscapedIdent => "escaped identifier",
            TokenKind::EqEq => "'=='",
            TokenKind::BangEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::LtEq => "'<='",
            TokenKind::GtEq => "'>='",
            TokenKind::Gt => "'>'",
            TokenKind::AmpAmp => "'&&'",
            TokenKind::PipePipe => "'||'",
            TokenKind::Bang => "'!'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Dot => "'.'",
            TokenKind::Comma => "','",
            TokenKind::Question => "'?'",
            TokenKind::Colon => "':'",
            TokenKind::Comment => "comment",
            TokenKind::Eof => "end of input",
        }
    }

    /// Opening or closing delimiter, used when resynchronising after an error.
    pub fn is_opener(self) -> bool {
        matches!(self, TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace)
    }

    pub fn is_closer(self) -> bool {
        matches!(self, TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// A lexed token borrowing its text from the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub span: Span,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, text: &'src str, span: Span) -> Self {
        Self { kind, text, span }
    }

    pub fn eof(offset: usize) -> Self {
        Self { kind: TokenKind::Eof, text: "", span: Span::empty(offset) }
    }

    /// Description of this token as it appears in diagnostics, e.g. `'foo'`.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => TokenKind::Eof.describe().to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}

/// Reserved words rejected as identifiers and global function names.
pub const RESERVED_IDENTIFIERS: &[&str] = &[
    "as", "break", "const", "continue", "else", "false", "for", "function", "if", "import",
    "in", "let", "loop", "package", "namespace", "null", "return", "true", "var", "void", "while",
];

/// Returns true if `name` may not be used as a bare identifier.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_IDENTIFIERS.contains(&name)
}

/// Returns true if `name` lexes as a single plain identifier token.
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        && !matches!(name, "in" | "true" | "false" | "null")
}
