use super::token::{Token, TokenKind};

/// Sequential access to a finite token sequence ending in an `Eof` marker.
///
/// The parser consumes tokens only through this trait, so any producer that
/// can hand out tokens one at a time (a pre-lexed buffer, a fuzzer, a
/// streaming lexer) can drive it.
pub trait TokenSource<'src> {
    /// The current token, without consuming it. Once input is exhausted this
    /// keeps returning the `Eof` marker.
    fn peek(&self) -> Token<'src>;

    /// Consume and return the current token. Advancing past `Eof` is a no-op
    /// that returns `Eof` again.
    fn advance(&mut self) -> Token<'src>;

    /// True once only the terminal marker remains.
    fn at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }
}

/// A cursor over a borrowed token slice.
pub struct TokenStream<'a, 'src> {
    tokens: &'a [Token<'src>],
    pos: usize,
    eof: Token<'src>,
}

impl<'a, 'src> TokenStream<'a, 'src> {
    /// Tokens after the first `Eof` are ignored. A slice without one gets an
    /// `Eof` synthesised at the end of its last token.
    pub fn new(tokens: &'a [Token<'src>]) -> Self {
        let end = tokens.iter().position(|t| t.kind == TokenKind::Eof);
        let (tokens, eof) = match end {
            Some(i) => (&tokens[..i], tokens[i]),
            None => {
                let offset = tokens.last().map_or(0, |t| t.span.end);
                (tokens, Token::eof(offset))
            }
        };
        Self { tokens, pos: 0, eof }
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'src> TokenSource<'src> for TokenStream<'_, 'src> {
    fn peek(&self) -> Token<'src> {
        self.tokens.get(self.pos).copied().unwrap_or(self.eof)
    }

    fn advance(&mut self) -> Token<'src> {
        let tok = self.peek();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}
