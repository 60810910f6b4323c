pub mod stream;
pub mod token;

pub use stream::{TokenSource, TokenStream};
pub use token::{is_plain_identifier, is_reserved, Token, TokenKind};

use logos::Logos;

use crate::diagnostics::ParseError;
use crate::span::Span;

/// Lex `source` into tokens. The result always ends with a single `Eof`
/// token at `source.len()`.
pub fn lex(source: &str) -> Result<Vec<Token<'_>>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(TokenKind::Comment) => continue,
            Ok(kind) => {
                tokens.push(Token::new(kind, lexer.slice(), Span::new(span.start, span.end)));
            }
            Err(()) => {
                return Err(ParseError::UnrecognizedToken {
                    text: source[span.start..span.end].to_string(),
                    span: Span::new(span.start, span.end),
                });
            }
        }
    }

    tokens.push(Token::eof(source.len()));
    Ok(tokens)
}
