use crate::parser::ast::LiteralKind;
use crate::span::{LineIndex, Span};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected token {found}, expected {}", describe_expected(.expected))]
    UnexpectedToken { found: String, expected: Vec<String>, span: Span },

    #[error("unexpected end of input, expected {}", describe_expected(.expected))]
    UnexpectedEndOfInput { expected: Vec<String>, span: Span },

    #[error("invalid {kind} literal: {reason}")]
    InvalidLiteral { kind: LiteralKind, reason: String, span: Span },

    #[error("unexpected trailing input {found}")]
    TrailingInput { found: String, span: Span },

    #[error("unrecognized token '{text}'")]
    UnrecognizedToken { text: String, span: Span },

    #[error("reserved identifier: {name}")]
    ReservedIdentifier { name: String, span: Span },

    #[error("unsupported syntax '{syntax}'")]
    UnsupportedSyntax { syntax: String, span: Span },

    #[error("expression nesting exceeds the limit of {limit}")]
    RecursionLimitExceeded { limit: usize, span: Span },
}

impl ParseError {
    pub fn unexpected_token(found: impl Into<String>, expected: &[&str], span: Span) -> Self {
        Self::UnexpectedToken { found: found.into(), expected: expected_list(expected), span }
    }

    pub fn unexpected_eof(expected: &[&str], span: Span) -> Self {
        Self::UnexpectedEndOfInput { expected: expected_list(expected), span }
    }

    pub fn invalid_literal(kind: LiteralKind, reason: impl Into<String>, span: Span) -> Self {
        Self::InvalidLiteral { kind, reason: reason.into(), span }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::UnexpectedEndOfInput { span, .. }
            | Self::InvalidLiteral { span, .. }
            | Self::TrailingInput { span, .. }
            | Self::UnrecognizedToken { span, .. }
            | Self::ReservedIdentifier { span, .. }
            | Self::UnsupportedSyntax { span, .. }
            | Self::RecursionLimitExceeded { span, .. } => *span,
        }
    }

    /// Errors local to one element of a delimited sequence. The parser may
    /// resynchronise after these; the rest always unwind to the caller.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedToken { .. }
                | Self::InvalidLiteral { .. }
                | Self::ReservedIdentifier { .. }
                | Self::UnsupportedSyntax { .. }
        )
    }
}

/// Ordered, de-duplicated copy of the expected token descriptions.
fn expected_list(expected: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(expected.len());
    for e in expected {
        if !out.iter().any(|seen| seen == e) {
            out.push((*e).to_string());
        }
    }
    out
}

fn describe_expected(expected: &[String]) -> String {
    match expected {
        [] => "nothing".to_string(),
        [one] => one.clone(),
        [init @ .., last] => format!("one of {}, or {last}", init.join(", ")),
    }
}

/// A non-empty list of parse errors, ordered by source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics(Vec<ParseError>);

impl Diagnostics {
    /// Returns `None` when `errors` is empty.
    pub fn new(mut errors: Vec<ParseError>) -> Option<Self> {
        if errors.is_empty() {
            return None;
        }
        errors.sort_by_key(|e| e.span().start);
        Some(Self(errors))
    }

    pub fn single(err: ParseError) -> Self {
        Self(vec![err])
    }

    /// Add an error, keeping source order.
    pub fn push(&mut self, err: ParseError) {
        self.0.push(err);
        self.0.sort_by_key(|e| e.span().start);
    }

    pub fn first(&self) -> &ParseError {
        &self.0[0]
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParseError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<ParseError> {
        self.0
    }

    /// One `ERROR: name:line:col: message` line per diagnostic.
    pub fn to_plain(&self, source: &str, name: &str) -> String {
        let index = LineIndex::new(source);
        let mut out = String::new();
        for err in &self.0 {
            let loc = index.location(err.span().start);
            out.push_str(&format!("ERROR: {name}:{loc}: {err}\n"));
        }
        out
    }

    /// Render every diagnostic as an ariadne report, without colour.
    pub fn render(&self, source: &str, name: &str) -> String {
        let mut buf = Vec::new();
        for err in &self.0 {
            write_report(source, name, err, &mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

fn write_report(source: &str, name: &str, err: &ParseError, out: &mut Vec<u8>) {
    use ariadne::{Config, Label, Report, ReportKind, Source};

    let span = err.span();
    let end = span.end.max(span.start).min(source.len());
    let start = span.start.min(end);
    let report = Report::build(ReportKind::Error, (), start)
        .with_config(Config::default().with_color(false))
        .with_message(format!("{name}: syntax error"))
        .with_label(Label::new(start..end).with_message(err.to_string()))
        .finish();
    if report.write(Source::from(source), &mut *out).is_err() {
        out.extend_from_slice(format!("error: {name}: {err}\n").as_bytes());
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}

impl From<ParseError> for Diagnostics {
    fn from(err: ParseError) -> Self {
        Self::single(err)
    }
}

impl IntoIterator for Diagnostics {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a ParseError;
    type IntoIter = std::slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
