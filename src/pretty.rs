use crate::lexer::is_plain_identifier;
use crate::parser::ast::*;
use crate::span::Spanned;

/// An operator after which (or before which) the unparser may break a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapOperator {
    Binary(BinOp),
    /// The `?` of a ternary.
    Conditional,
}

impl WrapOperator {
    /// Accepts any binary operator symbol, or `?` for the ternary.
    pub fn from_symbol(symbol: &str) -> Option<WrapOperator> {
        match symbol {
            "?" | "?:" => Some(WrapOperator::Conditional),
            _ => BinOp::from_symbol(symbol).map(WrapOperator::Binary),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnparseOptions {
    /// Line length at which wrapping kicks in. Values below 1 act as 1.
    pub wrap_on_column: usize,
    pub wrap_on_operators: Vec<WrapOperator>,
    /// Break after the operator when true, before it when false.
    pub wrap_after_column_limit: bool,
}

impl Default for UnparseOptions {
    fn default() -> Self {
        Self {
            wrap_on_column: 80,
            wrap_on_operators: vec![
                WrapOperator::Binary(BinOp::And),
                WrapOperator::Binary(BinOp::Or),
            ],
            wrap_after_column_limit: true,
        }
    }
}

/// Render an expression tree back into source text with default options.
pub fn unparse(expr: &Spanned<Expr>) -> String {
    unparse_with_options(expr, &UnparseOptions::default())
}

/// Render an expression tree back into source text. Re-parsing the output
/// yields the same tree, ignoring spans.
pub fn unparse_with_options(expr: &Spanned<Expr>, options: &UnparseOptions) -> String {
    let mut up = Unparser::new(options);
    up.emit_expr(&expr.node, 0);
    up.buf
}

// Precedence levels, loosest first.
const PREC_CONDITIONAL: u8 = 1;
const PREC_UNARY: u8 = 7;
const PREC_MEMBER: u8 = 8;

struct Unparser<'o> {
    buf: String,
    line_start: usize,
    options: &'o UnparseOptions,
}

impl<'o> Unparser<'o> {
    fn new(options: &'o UnparseOptions) -> Self {
        Self { buf: String::new(), line_start: 0, options }
    }

    fn write(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    fn newline(&mut self) {
        self.buf.push('\n');
        self.line_start = self.buf.len();
    }

    fn column(&self) -> usize {
        self.buf[self.line_start..].chars().count()
    }

    fn emit_operator(&mut self, op: WrapOperator, symbol: &str) {
        let wraps = self.options.wrap_on_operators.contains(&op);
        // The operator is counted with two columns of padding.
        let width = self.column() + symbol.len() + 2;
        if wraps && width >= self.options.wrap_on_column.max(1) {
            if self.options.wrap_after_column_limit {
                self.write(" ");
                self.write(symbol);
                self.newline();
            } else {
                self.newline();
                self.write(symbol);
                self.write(" ");
            }
            return;
        }
        self.write(" ");
        self.write(symbol);
        self.write(" ");
    }

    fn emit_expr(&mut self, expr: &Expr, parent_prec: u8) {
        let need_parens = expr_prec(expr) < parent_prec;
        if need_parens {
            self.write("(");
        }
        match expr {
            Expr::Literal(lit) => self.emit_literal(lit),
            Expr::Ident { name, rooted } => {
                if *rooted {
                    self.write(".");
                }
                self.write(name);
            }
            Expr::Call { name, rooted, args } => {
                if *rooted {
                    self.write(".");
                }
                self.write(&name.node);
                self.emit_args(args);
            }
            Expr::MethodCall { receiver, method, args } => {
                self.emit_receiver(&receiver.node);
                self.write(".");
                self.write(&method.node);
                self.emit_args(args);
            }
            Expr::Select { receiver, field, safe } => {
                self.emit_receiver(&receiver.node);
                self.write(if *safe { ".?" } else { "." });
                self.write(&quote_field(&field.node));
            }
            Expr::Index { receiver, index, safe } => {
                self.emit_receiver(&receiver.node);
                self.write(if *safe { "[?" } else { "[" });
                self.emit_expr(&index.node, 0);
                self.write("]");
            }
            Expr::List { elements } => {
                self.write("[");
                for (i, el) in elements.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if el.optional {
                        self.write("?");
                    }
                    self.emit_expr(&el.value.node, 0);
                }
                self.write("]");
            }
            Expr::Map { entries } => {
                self.write("{");
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if entry.optional {
                        self.write("?");
                    }
                    self.emit_expr(&entry.key.node, 0);
                    self.write(": ");
                    self.emit_expr(&entry.value.node, 0);
                }
                self.write("}");
            }
            Expr::Message { type_name, rooted, fields } => {
                if *rooted {
                    self.write(".");
                }
                let path = type_name.iter().map(|s| s.node.as_str()).collect::<Vec<_>>().join(".");
                self.write(&path);
                self.write("{");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if field.optional {
                        self.write("?");
                    }
                    self.write(&quote_field(&field.name.node));
                    self.write(": ");
                    self.emit_expr(&field.value.node, 0);
                }
                self.write("}");
            }
            Expr::Conditional { cond, if_true, if_false } => {
                // Condition and middle operand sit at the `||` tier; the else
                // branch may itself be a ternary.
                self.emit_expr(&cond.node, PREC_CONDITIONAL + 1);
                self.emit_operator(WrapOperator::Conditional, "?");
                self.emit_expr(&if_true.node, PREC_CONDITIONAL + 1);
                self.write(" : ");
                self.emit_expr(&if_false.node, PREC_CONDITIONAL);
            }
            Expr::BinOp { op, lhs, rhs } => {
                let prec = binop_prec(*op);
                // Left child: same precedence (left-associative, no parens needed)
                self.emit_expr(&lhs.node, prec);
                self.emit_operator(WrapOperator::Binary(*op), op.as_str());
                // Right child: prec + 1 (forces parens for same-prec on right)
                self.emit_expr(&rhs.node, prec + 1);
            }
            Expr::UnaryOp { op, count, operand } => {
                for _ in 0..*count {
                    self.write(op.as_str());
                }
                if *op == UnaryOp::Neg && is_negative_number(&operand.node) {
                    // `--1` re-parses with the inner minus folded into the literal.
                    self.emit_expr(&operand.node, 0);
                } else if *op == UnaryOp::Neg && starts_with_unsigned_number(&operand.node) {
                    // `-(1)` must not re-parse as the literal -1.
                    self.write("(");
                    self.emit_expr(&operand.node, 0);
                    self.write(")");
                } else {
                    self.emit_expr(&operand.node, PREC_MEMBER);
                }
            }
        }
        if need_parens {
            self.write(")");
        }
    }

    /// Receivers of `.`/`[` bind at member level. A bare int literal is
    /// parenthesised so the following `.` is not read as a decimal point.
    fn emit_receiver(&mut self, receiver: &Expr) {
        match receiver {
            Expr::Literal(Literal::Int(n)) if *n >= 0 => {
                self.write("(");
                self.write(&n.to_string());
                self.write(")");
            }
            _ => self.emit_expr(receiver, PREC_MEMBER),
        }
    }

    fn emit_args(&mut self, args: &[Spanned<Expr>]) {
        self.write("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_expr(&arg.node, 0);
        }
        self.write(")");
    }

    fn emit_literal(&mut self, lit: &Literal) {
        match lit {
            Literal::Bool(b) => self.write(if *b { "true" } else { "false" }),
            Literal::Null => self.write("null"),
            Literal::Int(n) => self.write(&n.to_string()),
            Literal::Uint(n) => {
                self.write(&n.to_string());
                self.write("u");
            }
            Literal::Float(f) => {
                let s = f.to_string();
                self.write(&s);
                // Ensure decimal point is present
                if !s.contains('.') && !s.contains('e') && !s.contains('E') {
                    self.write(".0");
                }
            }
            Literal::String(s) => {
                self.write("\"");
                self.write(&escape_string(s));
                self.write("\"");
            }
            Literal::Bytes(bytes) => {
                self.write("b\"");
                for b in bytes {
                    self.write(&format!("\\{b:03o}"));
                }
                self.write("\"");
            }
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn binop_prec(op: BinOp) -> u8 {
    match op {
        BinOp::Or => 2,
        BinOp::And => 3,
        BinOp::Eq | BinOp::Neq | BinOp::Lt | BinOp::LtEq | BinOp::GtEq | BinOp::Gt | BinOp::In => 4,
        BinOp::Add | BinOp::Sub => 5,
        BinOp::Mul | BinOp::Div | BinOp::Mod => 6,
    }
}

fn expr_prec(expr: &Expr) -> u8 {
    match expr {
        Expr::Conditional { .. } => PREC_CONDITIONAL,
        Expr::BinOp { op, .. } => binop_prec(*op),
        Expr::UnaryOp { .. } => PREC_UNARY,
        // A negative literal prints with a leading `-`, so it groups like a unary.
        Expr::Literal(_) if is_negative_number(expr) => PREC_UNARY,
        _ => PREC_MEMBER,
    }
}

fn is_negative_number(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(Literal::Int(n)) => *n < 0,
        Expr::Literal(Literal::Float(f)) => f.is_sign_negative(),
        _ => false,
    }
}

/// True when the printed form of `expr` begins with a digit that a preceding
/// `-` would fold into.
fn starts_with_unsigned_number(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(Literal::Int(n)) => *n >= 0,
        Expr::Literal(Literal::Float(f)) => !f.is_sign_negative(),
        Expr::Select { receiver, .. }
        | Expr::Index { receiver, .. }
        | Expr::MethodCall { receiver, .. } => starts_with_unsigned_number(&receiver.node),
        _ => false,
    }
}

/// Field names that would not lex as a plain identifier are backtick-escaped.
fn quote_field(name: &str) -> String {
    if is_plain_identifier(name) {
        name.to_string()
    } else {
        format!("`{name}`")
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            other => out.push(other),
        }
    }
    out
}
