pub mod ast;
pub mod literal;

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostics, ParseError};
use crate::lexer::{is_reserved, Token, TokenKind, TokenSource};
use crate::span::{Span, Spanned};
use ast::*;

type PResult<T> = Result<T, ParseError>;

pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserOptions {
    /// Maximum nesting of full expressions (parentheses, call arguments,
    /// aggregate elements, index keys).
    pub max_recursion_depth: usize,
    /// Accept `.?`, `[?` and `?`-prefixed aggregate elements.
    pub enable_optional_syntax: bool,
    /// Resynchronise inside delimited sequences and keep collecting errors.
    pub error_recovery: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
            enable_optional_syntax: true,
            error_recovery: true,
        }
    }
}

/// Precedence parser over any `TokenSource`.
///
/// A parser handles exactly one expression: `parse` consumes it. All state
/// (cursor, nesting depth, collected errors) lives in the instance, so
/// separate parsers never interact.
pub struct Parser<'src, S> {
    tokens: S,
    options: ParserOptions,
    depth: usize,
    errors: Vec<ParseError>,
    _source: PhantomData<&'src str>,
}

impl<'src, S: TokenSource<'src>> Parser<'src, S> {
    pub fn new(tokens: S) -> Self {
        Self::with_options(tokens, ParserOptions::default())
    }

    pub fn with_options(tokens: S, options: ParserOptions) -> Self {
        Self { tokens, options, depth: 0, errors: Vec::new(), _source: PhantomData }
    }

    /// Parse a complete expression followed by end of input.
    pub fn parse(mut self) -> Result<Spanned<Expr>, Diagnostics> {
        let result = self.parse_expr().and_then(|expr| {
            if self.tokens.at_end() {
                Ok(expr)
            } else {
                let tok = self.peek();
                Err(ParseError::TrailingInput { found: tok.describe(), span: tok.span })
            }
        });
        match (result, Diagnostics::new(self.errors)) {
            (Ok(expr), None) => Ok(expr),
            (Ok(_), Some(diags)) => Err(diags),
            (Err(err), None) => Err(Diagnostics::single(err)),
            (Err(err), Some(mut diags)) => {
                diags.push(err);
                Err(diags)
            }
        }
    }

    // ── Cursor helpers ───────────────────────────────────────────────

    fn peek(&self) -> Token<'src> {
        self.tokens.peek()
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn advance(&mut self) -> Token<'src> {
        self.tokens.advance()
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token<'src>> {
        if self.at(kind) { Some(self.advance()) } else { None }
    }

    fn expect(&mut self, kind: TokenKind) -> PResult<Token<'src>> {
        match self.eat(kind) {
            Some(tok) => Ok(tok),
            None => Err(self.unexpected(&[kind.describe()])),
        }
    }

    fn unexpected(&self, expected: &[&str]) -> ParseError {
        let tok = self.peek();
        if tok.kind == TokenKind::Eof {
            ParseError::unexpected_eof(expected, tok.span)
        } else {
            ParseError::unexpected_token(tok.describe(), expected, tok.span)
        }
    }

    fn expect_ident(&mut self) -> PResult<Spanned<String>> {
        let tok = self.expect(TokenKind::Ident)?;
        Ok(Spanned::new(tok.text.to_string(), tok.span))
    }

    /// A selector or field name: a plain identifier, or an escaped identifier
    /// with its backticks removed. The flag reports which form was used.
    fn expect_field_name(&mut self) -> PResult<(Spanned<String>, bool)> {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Ident => {
                self.advance();
                Ok((Spanned::new(tok.text.to_string(), tok.span), false))
            }
            TokenKind::EscapedIdent => {
                self.advance();
                let name = tok.text.trim_start_matches('`').trim_end_matches('`');
                Ok((Spanned::new(name.to_string(), tok.span), true))
            }
            _ => Err(self.unexpected(&[
                TokenKind::Ident.describe(),
                TokenKind::EscapedIdent.describe(),
            ])),
        }
    }

    /// Consume an optional-syntax `?` marker if present.
    fn eat_optional_marker(&mut self, syntax: &str) -> PResult<bool> {
        let Some(q) = self.eat(TokenKind::Question) else {
            return Ok(false);
        };
        if !self.options.enable_optional_syntax {
            return Err(ParseError::UnsupportedSyntax { syntax: syntax.to_string(), span: q.span });
        }
        Ok(true)
    }

    // ── Expression tiers ─────────────────────────────────────────────

    /// `expr := conditionalOr ('?' conditionalOr ':' expr)?`
    fn parse_expr(&mut self) -> PResult<Spanned<Expr>> {
        if self.depth >= self.options.max_recursion_depth {
            return Err(ParseError::RecursionLimitExceeded {
                limit: self.options.max_recursion_depth,
                span: self.peek().span,
            });
        }
        self.depth += 1;
        let result = self.parse_conditional();
        self.depth -= 1;
        result
    }

    /// Ternary chains are collected iteratively and folded from the right,
    /// so `a ? b : c ? d : e` nests as `a ? b : (c ? d : e)`.
    fn parse_conditional(&mut self) -> PResult<Spanned<Expr>> {
        let mut arms = Vec::new();
        let mut tail = self.parse_binary(0)?;
        while self.eat(TokenKind::Question).is_some() {
            let if_true = self.parse_binary(0)?;
            self.expect(TokenKind::Colon)?;
            arms.push((tail, if_true));
            tail = self.parse_binary(0)?;
        }
        while let Some((cond, if_true)) = arms.pop() {
            let span = cond.span.merge(tail.span);
            tail = Spanned::new(
                Expr::Conditional {
                    cond: Box::new(cond),
                    if_true: Box::new(if_true),
                    if_false: Box::new(tail),
                },
                span,
            );
        }
        Ok(tail)
    }

    /// Logical, relational and arithmetic tiers by precedence climbing.
    /// Every operator is left-associative, so same-tier chains fold in the loop.
    fn parse_binary(&mut self, min_bp: u8) -> PResult<Spanned<Expr>> {
        let mut lhs = self.parse_unary()?;

        loop {
            let Some(op) = binary_op(self.peek().kind) else { break };
            let (lbp, rbp) = infix_binding_power(op);
            if lbp < min_bp {
                break;
            }
            self.advance(); // consume operator

            let rhs = self.parse_binary(rbp)?;
            let span = lhs.span.merge(rhs.span);
            lhs = Spanned::new(
                Expr::BinOp {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }

        Ok(lhs)
    }

    /// A run of `!` or `-` keeps its exact count. When a `-` run sits directly
    /// before an int or float literal, the innermost `-` becomes the literal's
    /// sign and the rest stay in the unary chain: `--1` is `-(-1)`. A `!` run
    /// may be followed by a single signed literal (`!-1`), but not by a `-`
    /// applied to anything else.
    fn parse_unary(&mut self) -> PResult<Spanned<Expr>> {
        let first = self.peek();
        let op = match first.kind {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            _ => return self.parse_member(),
        };

        let mut count: u32 = 0;
        let mut last = first;
        while self.at(first.kind) {
            last = self.advance();
            count = count.saturating_add(1);
        }

        let operand = if op == UnaryOp::Neg
            && matches!(self.peek().kind, TokenKind::Int | TokenKind::Float)
        {
            count -= 1;
            let number = self.parse_number(Some(last.span))?;
            self.parse_postfix(number, None)?
        } else if op == UnaryOp::Not && self.at(TokenKind::Minus) {
            let minus = self.advance();
            if !matches!(self.peek().kind, TokenKind::Int | TokenKind::Float) {
                return Err(ParseError::unexpected_token(minus.describe(), &["expression"], minus.span));
            }
            let number = self.parse_number(Some(minus.span))?;
            self.parse_postfix(number, None)?
        } else {
            self.parse_member()?
        };

        if count == 0 {
            return Ok(operand);
        }
        let span = first.span.merge(operand.span);
        Ok(Spanned::new(Expr::UnaryOp { op, count, operand: Box::new(operand) }, span))
    }

    fn parse_member(&mut self) -> PResult<Spanned<Expr>> {
        let (primary, path) = self.parse_primary()?;
        self.parse_postfix(primary, path)
    }

    /// Postfix chain: `.field`, `.?field`, `.method(args)`, `[key]`, `[?key]`.
    ///
    /// `path` holds the segments of `lhs` while it is still a bare dotted
    /// name (`a`, `.a.b`); only such a path may be followed by `{` to form a
    /// message literal.
    fn parse_postfix(&mut self, mut lhs: Spanned<Expr>, mut path: Option<TypePath>) -> PResult<Spanned<Expr>> {
        loop {
            match self.peek().kind {
                TokenKind::Dot => {
                    self.advance();
                    let safe = self.eat_optional_marker(".?")?;
                    let (field, escaped) = self.expect_field_name()?;
                    if !safe && !escaped && self.at(TokenKind::LParen) {
                        let (args, close) = self.parse_args()?;
                        let span = Span::new(lhs.span.start, close.end);
                        lhs = Spanned::new(
                            Expr::MethodCall { receiver: Box::new(lhs), method: field, args },
                            span,
                        );
                        path = None;
                    } else {
                        path = match path {
                            Some(mut p) if !safe && !escaped => {
                                p.segments.push(field.clone());
                                Some(p)
                            }
                            _ => None,
                        };
                        let span = Span::new(lhs.span.start, field.span.end);
                        lhs = Spanned::new(Expr::Select { receiver: Box::new(lhs), field, safe }, span);
                    }
                }
                TokenKind::LBracket => {
                    self.advance();
                    let safe = self.eat_optional_marker("[?")?;
                    let index = self.parse_expr()?;
                    let close = self.expect(TokenKind::RBracket)?;
                    let span = Span::new(lhs.span.start, close.span.end);
                    lhs = Spanned::new(
                        Expr::Index { receiver: Box::new(lhs), index: Box::new(index), safe },
                        span,
                    );
                    path = None;
                }
                TokenKind::LBrace => match path.take() {
                    Some(type_path) => lhs = self.parse_message(lhs.span.start, type_path)?,
                    None => return Ok(lhs),
                },
                _ => return Ok(lhs),
            }
        }
    }

    /// Returns the node and, for a bare name, the type path it may start.
    fn parse_primary(&mut self) -> PResult<(Spanned<Expr>, Option<TypePath>)> {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Dot => {
                self.advance();
                let name = self.expect_ident()?;
                self.parse_ident_or_call(name, true, tok.span.start)
            }
            TokenKind::Ident => {
                let name = self.expect_ident()?;
                self.parse_ident_or_call(name, false, tok.span.start)
            }
            TokenKind::LParen => {
                self.advance();
                let mut inner = self.parse_expr()?;
                let close = self.expect(TokenKind::RParen)?;
                // Grouping is not a node; widen the inner span over the parens.
                inner.span = tok.span.merge(close.span);
                Ok((inner, None))
            }
            TokenKind::LBracket => Ok((self.parse_list()?, None)),
            TokenKind::LBrace => Ok((self.parse_map()?, None)),
            TokenKind::Int | TokenKind::Uint | TokenKind::Float => Ok((self.parse_number(None)?, None)),
            TokenKind::String => {
                self.advance();
                let value = literal::decode_string(tok.text)
                    .map_err(|reason| ParseError::invalid_literal(LiteralKind::String, reason, tok.span))?;
                Ok((Spanned::new(Expr::Literal(Literal::String(value)), tok.span), None))
            }
            TokenKind::Bytes => {
                self.advance();
                let value = literal::decode_bytes(tok.text)
                    .map_err(|reason| ParseError::invalid_literal(LiteralKind::Bytes, reason, tok.span))?;
                Ok((Spanned::new(Expr::Literal(Literal::Bytes(value)), tok.span), None))
            }
            TokenKind::True | TokenKind::False | TokenKind::Null => {
                self.advance();
                let lit = match tok.kind {
                    TokenKind::True => Literal::Bool(true),
                    TokenKind::False => Literal::Bool(false),
                    _ => Literal::Null,
                };
                Ok((Spanned::new(Expr::Literal(lit), tok.span), None))
            }
            _ => Err(self.unexpected(&["expression"])),
        }
    }

    fn parse_ident_or_call(
        &mut self,
        name: Spanned<String>,
        rooted: bool,
        start: usize,
    ) -> PResult<(Spanned<Expr>, Option<TypePath>)> {
        if is_reserved(&name.node) {
            return Err(ParseError::ReservedIdentifier { name: name.node, span: name.span });
        }
        if self.at(TokenKind::LParen) {
            let (args, close) = self.parse_args()?;
            let span = Span::new(start, close.end);
            Ok((Spanned::new(Expr::Call { name, rooted, args }, span), None))
        } else {
            let span = Span::new(start, name.span.end);
            let ident = Expr::Ident { name: name.node.clone(), rooted };
            Ok((Spanned::new(ident, span), Some(TypePath { segments: vec![name], rooted })))
        }
    }

    /// `-`-folded or unsigned numeric literal. `sign` is the span of a folded
    /// leading minus.
    fn parse_number(&mut self, sign: Option<Span>) -> PResult<Spanned<Expr>> {
        let tok = self.advance();
        let negative = sign.is_some();
        let span = sign.map_or(tok.span, |s| s.merge(tok.span));
        let value = match tok.kind {
            TokenKind::Int => literal::parse_int(tok.text, negative)
                .map(Literal::Int)
                .map_err(|r| (LiteralKind::Int, r)),
            TokenKind::Uint => literal::parse_uint(tok.text)
                .map(Literal::Uint)
                .map_err(|r| (LiteralKind::Uint, r)),
            TokenKind::Float => literal::parse_float(tok.text, negative)
                .map(Literal::Float)
                .map_err(|r| (LiteralKind::Float, r)),
            _ => return Err(ParseError::unexpected_token(tok.describe(), &["number"], tok.span)),
        };
        value
            .map(|lit| Spanned::new(Expr::Literal(lit), span))
            .map_err(|(kind, reason)| ParseError::invalid_literal(kind, reason, span))
    }

    // ── Delimited sequences ──────────────────────────────────────────

    fn parse_args(&mut self) -> PResult<(Vec<Spanned<Expr>>, Span)> {
        self.expect(TokenKind::LParen)?;
        self.parse_sequence(TokenKind::RParen, false, |p| p.parse_expr())
    }

    fn parse_list(&mut self) -> PResult<Spanned<Expr>> {
        let open = self.expect(TokenKind::LBracket)?;
        let (elements, close) = self.parse_sequence(TokenKind::RBracket, true, |p| {
            let optional = p.eat_optional_marker("?")?;
            let value = p.parse_expr()?;
            Ok(ListElement { optional, value })
        })?;
        Ok(Spanned::new(Expr::List { elements }, open.span.merge(close)))
    }

    fn parse_map(&mut self) -> PResult<Spanned<Expr>> {
        let open = self.expect(TokenKind::LBrace)?;
        let (entries, close) = self.parse_sequence(TokenKind::RBrace, true, |p| {
            let optional = p.eat_optional_marker("?")?;
            let key = p.parse_expr()?;
            p.expect(TokenKind::Colon)?;
            let value = p.parse_expr()?;
            Ok(MapEntry { optional, key, value })
        })?;
        Ok(Spanned::new(Expr::Map { entries }, open.span.merge(close)))
    }

    /// Message literal body after its type path; `start` is where the path
    /// began, including any leading `.`.
    fn parse_message(&mut self, start: usize, path: TypePath) -> PResult<Spanned<Expr>> {
        let TypePath { segments: type_name, rooted } = path;
        self.expect(TokenKind::LBrace)?;
        let (fields, close) = self.parse_sequence(TokenKind::RBrace, true, |p| {
            let optional = p.eat_optional_marker("?")?;
            let (name, _) = p.expect_field_name()?;
            p.expect(TokenKind::Colon)?;
            let value = p.parse_expr()?;
            Ok(FieldInit { optional, name, value })
        })?;
        Ok(Spanned::new(Expr::Message { type_name, rooted, fields }, Span::new(start, close.end)))
    }

    /// Comma-separated elements up to `close`, which is consumed. The opening
    /// delimiter must already be consumed. With `allow_trailing`, a single
    /// comma may precede `close`.
    ///
    /// With recovery enabled, a recoverable error in one element is recorded
    /// and the cursor skips to the next `,` or `close` at the same nesting
    /// level. The failed element is dropped.
    fn parse_sequence<T>(
        &mut self,
        close: TokenKind,
        allow_trailing: bool,
        mut element: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<(Vec<T>, Span)> {
        let mut items = Vec::new();
        if !self.at(close) {
            loop {
                match element(self) {
                    Ok(item) => items.push(item),
                    Err(err) => self.recover(err, close)?,
                }
                let separated = if self.eat(TokenKind::Comma).is_some() {
                    true
                } else if self.at(close) {
                    false
                } else {
                    let err = self.unexpected(&[TokenKind::Comma.describe(), close.describe()]);
                    self.recover(err, close)?;
                    self.eat(TokenKind::Comma).is_some()
                };
                if !separated || (allow_trailing && self.at(close)) {
                    break;
                }
            }
        }
        let end = self.expect(close)?;
        Ok((items, end.span))
    }

    fn recover(&mut self, err: ParseError, close: TokenKind) -> PResult<()> {
        if !self.options.error_recovery || !err.is_recoverable() {
            return Err(err);
        }
        self.errors.push(err);
        let mut nesting = 0usize;
        loop {
            let kind = self.peek().kind;
            match kind {
                TokenKind::Eof => break,
                _ if nesting == 0 && (kind == TokenKind::Comma || kind == close) => break,
                _ if kind.is_opener() => nesting += 1,
                // A stray closer at depth 0 is skipped.
                _ if kind.is_closer() => nesting = nesting.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
        Ok(())
    }
}

/// Segments of a plain dotted name seen so far in a postfix chain.
struct TypePath {
    segments: Vec<Spanned<String>>,
    rooted: bool,
}

fn binary_op(kind: TokenKind) -> Option<BinOp> {
    let op = match kind {
        TokenKind::PipePipe => BinOp::Or,
        TokenKind::AmpAmp => BinOp::And,
        TokenKind::EqEq => BinOp::Eq,
        TokenKind::BangEq => BinOp::Neq,
        TokenKind::Lt => BinOp::Lt,
        TokenKind::LtEq => BinOp::LtEq,
        TokenKind::GtEq => BinOp::GtEq,
        TokenKind::Gt => BinOp::Gt,
        TokenKind::In => BinOp::In,
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        TokenKind::Star => BinOp::Mul,
        TokenKind::Slash => BinOp::Div,
        TokenKind::Percent => BinOp::Mod,
        _ => return None,
    };
    Some(op)
}

pub(crate) fn infix_binding_power(op: BinOp) -> (u8, u8) {
    match op {
        BinOp::Or => (1, 2),
        BinOp::And => (3, 4),
        BinOp::Eq | BinOp::Neq | BinOp::Lt | BinOp::LtEq | BinOp::GtEq | BinOp::Gt | BinOp::In => (5, 6),
        BinOp::Add | BinOp::Sub => (7, 8),
        BinOp::Mul | BinOp::Div | BinOp::Mod => (9, 10),
    }
}
