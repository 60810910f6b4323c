use serde::{Deserialize, Serialize};

use crate::span::Spanned;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(Literal),
    /// `name` or `.name`; `rooted` marks the leading dot.
    Ident {
        name: String,
        rooted: bool,
    },
    /// Global function call `name(args)` / `.name(args)`.
    Call {
        name: Spanned<String>,
        rooted: bool,
        args: Vec<Spanned<Expr>>,
    },
    MethodCall {
        receiver: Box<Spanned<Expr>>,
        method: Spanned<String>,
        args: Vec<Spanned<Expr>>,
    },
    Select {
        receiver: Box<Spanned<Expr>>,
        field: Spanned<String>,
        safe: bool,
    },
    Index {
        receiver: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
        safe: bool,
    },
    List {
        elements: Vec<ListElement>,
    },
    Map {
        entries: Vec<MapEntry>,
    },
    Message {
        type_name: Vec<Spanned<String>>,
        rooted: bool,
        fields: Vec<FieldInit>,
    },
    Conditional {
        cond: Box<Spanned<Expr>>,
        if_true: Box<Spanned<Expr>>,
        if_false: Box<Spanned<Expr>>,
    },
    BinOp {
        op: BinOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    /// `count` consecutive prefix operators, exactly as written.
    UnaryOp {
        op: UnaryOp,
        count: u32,
        operand: Box<Spanned<Expr>>,
    },
}

impl Expr {
    /// Dotted type name of a message literal, including the leading dot when rooted.
    pub fn qualified_name(&self) -> Option<String> {
        let Expr::Message { type_name, rooted, .. } = self else {
            return None;
        };
        let path = type_name.iter().map(|s| s.node.as_str()).collect::<Vec<_>>().join(".");
        Some(if *rooted { format!(".{path}") } else { path })
    }

    /// Immediate children in source order.
    pub fn children(&self) -> Vec<&Spanned<Expr>> {
        match self {
            Expr::Literal(_) | Expr::Ident { .. } => Vec::new(),
            Expr::Call { args, .. } => args.iter().collect(),
            Expr::MethodCall { receiver, args, .. } => {
                std::iter::once(&**receiver).chain(args.iter()).collect()
            }
            Expr::Select { receiver, .. } => vec![&**receiver],
            Expr::Index { receiver, index, .. } => vec![&**receiver, &**index],
            Expr::List { elements } => elements.iter().map(|e| &e.value).collect(),
            Expr::Map { entries } => entries.iter().flat_map(|e| [&e.key, &e.value]).collect(),
            Expr::Message { fields, .. } => fields.iter().map(|f| &f.value).collect(),
            Expr::Conditional { cond, if_true, if_false } => vec![&**cond, &**if_true, &**if_false],
            Expr::BinOp { lhs, rhs, .. } => vec![&**lhs, &**rhs],
            Expr::UnaryOp { operand, .. } => vec![&**operand],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Bool(bool),
    Null,
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
}

impl Literal {
    pub fn kind(&self) -> LiteralKind {
        match self {
            Literal::Bool(_) => LiteralKind::Bool,
            Literal::Null => LiteralKind::Null,
            Literal::Int(_) => LiteralKind::Int,
            Literal::Uint(_) => LiteralKind::Uint,
            Literal::Float(_) => LiteralKind::Float,
            Literal::String(_) => LiteralKind::String,
            Literal::Bytes(_) => LiteralKind::Bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralKind {
    Bool,
    Null,
    Int,
    Uint,
    Float,
    String,
    Bytes,
}

impl std::fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LiteralKind::Bool => "bool",
            LiteralKind::Null => "null",
            LiteralKind::Int => "int",
            LiteralKind::Uint => "uint",
            LiteralKind::Float => "double",
            LiteralKind::String => "string",
            LiteralKind::Bytes => "bytes",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListElement {
    pub optional: bool,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    pub optional: bool,
    pub key: Spanned<Expr>,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInit {
    pub optional: bool,
    pub name: Spanned<String>,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    Or,
    And,
    Eq,
    Neq,
    Lt,
    LtEq,
    GtEq,
    Gt,
    In,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    pub const ALL: [BinOp; 14] = [
        BinOp::Or,
        BinOp::And,
        BinOp::Eq,
        BinOp::Neq,
        BinOp::Lt,
        BinOp::LtEq,
        BinOp::GtEq,
        BinOp::Gt,
        BinOp::In,
        BinOp::Add,
        BinOp::Sub,
        BinOp::Mul,
        BinOp::Div,
        BinOp::Mod,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
            BinOp::Lt => "<",
            BinOp::LtEq => "<=",
            BinOp::GtEq => ">=",
            BinOp::Gt => ">",
            BinOp::In => "in",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<BinOp> {
        BinOp::ALL.into_iter().find(|op| op.as_str() == symbol)
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
        }
    }
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
