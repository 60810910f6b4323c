pub mod span;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod pretty;
pub mod visit;
pub mod config;

use diagnostics::Diagnostics;
use lexer::{TokenSource, TokenStream};
use parser::ast::Expr;
use span::Spanned;

pub use diagnostics::ParseError;
pub use parser::{Parser, ParserOptions};
pub use pretty::{unparse, unparse_with_options, UnparseOptions};

/// Lex and parse a single expression with default options.
pub fn parse(source: &str) -> Result<Spanned<Expr>, Diagnostics> {
    parse_with_options(source, ParserOptions::default())
}

/// Lex and parse a single expression. Lexing stops at the first
/// unrecognised token, which is then the only diagnostic.
pub fn parse_with_options(source: &str, options: ParserOptions) -> Result<Spanned<Expr>, Diagnostics> {
    let tokens = lexer::lex(source)?;
    Parser::with_options(TokenStream::new(&tokens), options).parse()
}

/// Parse from any token source, for callers with their own lexer.
pub fn parse_tokens<'src, S: TokenSource<'src>>(
    tokens: S,
    options: ParserOptions,
) -> Result<Spanned<Expr>, Diagnostics> {
    Parser::with_options(tokens, options).parse()
}
