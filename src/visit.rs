//! Expression tree visitors
//!
//! Two traits with matching walk functions:
//!
//! - `Visitor`: shared reference traversal (analysis, collection)
//! - `VisitMut`: mutable traversal (in-place rewriting)
//!
//! Override only the methods you need and call the corresponding `walk_*`
//! function inside the override to keep recursing. Omitting the walk call
//! prunes traversal at that node.
//!
//! ```rust
//! use celparse::visit::{Visitor, walk_expr};
//! use celparse::parser::ast::Expr;
//! use celparse::span::Spanned;
//!
//! struct IdentCollector {
//!     names: Vec<String>,
//! }
//!
//! impl Visitor for IdentCollector {
//!     fn visit_expr(&mut self, expr: &Spanned<Expr>) {
//!         if let Expr::Ident { name, .. } = &expr.node {
//!             self.names.push(name.clone());
//!         }
//!         walk_expr(self, expr);
//!     }
//! }
//!
//! let expr = celparse::parse("a + f(b)").unwrap();
//! let mut collector = IdentCollector { names: Vec::new() };
//! collector.visit_expr(&expr);
//! assert_eq!(collector.names, ["a", "b"]);
//! ```

use crate::parser::ast::*;
use crate::span::{Span, Spanned};

// ============================================================================
// Visitor Trait (Read-Only)
// ============================================================================

/// Read-only visitor. Default implementations recurse into all children in
/// source order.
pub trait Visitor: Sized {
    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        walk_expr(self, expr);
    }

    /// Function, method, field and type-path segment names.
    fn visit_name(&mut self, _name: &Spanned<String>) {}
}

pub fn walk_expr<V: Visitor>(v: &mut V, expr: &Spanned<Expr>) {
    match &expr.node {
        Expr::Literal(_) | Expr::Ident { .. } => {}
        Expr::Call { name, args, .. } => {
            v.visit_name(name);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::MethodCall { receiver, method, args } => {
            v.visit_expr(receiver);
            v.visit_name(method);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::Select { receiver, field, .. } => {
            v.visit_expr(receiver);
            v.visit_name(field);
        }
        Expr::Index { receiver, index, .. } => {
            v.visit_expr(receiver);
            v.visit_expr(index);
        }
        Expr::List { elements } => {
            for el in elements {
                v.visit_expr(&el.value);
            }
        }
        Expr::Map { entries } => {
            for entry in entries {
                v.visit_expr(&entry.key);
                v.visit_expr(&entry.value);
            }
        }
        Expr::Message { type_name, fields, .. } => {
            for segment in type_name {
                v.visit_name(segment);
            }
            for field in fields {
                v.visit_name(&field.name);
                v.visit_expr(&field.value);
            }
        }
        Expr::Conditional { cond, if_true, if_false } => {
            v.visit_expr(cond);
            v.visit_expr(if_true);
            v.visit_expr(if_false);
        }
        Expr::BinOp { lhs, rhs, .. } => {
            v.visit_expr(lhs);
            v.visit_expr(rhs);
        }
        Expr::UnaryOp { operand, .. } => v.visit_expr(operand),
    }
}

// ============================================================================
// VisitMut Trait
// ============================================================================

/// Mutable visitor, same traversal order as `Visitor`.
pub trait VisitMut: Sized {
    fn visit_expr_mut(&mut self, expr: &mut Spanned<Expr>) {
        walk_expr_mut(self, expr);
    }

    fn visit_name_mut(&mut self, _name: &mut Spanned<String>) {}
}

pub fn walk_expr_mut<V: VisitMut>(v: &mut V, expr: &mut Spanned<Expr>) {
    match &mut expr.node {
        Expr::Literal(_) | Expr::Ident { .. } => {}
        Expr::Call { name, args, .. } => {
            v.visit_name_mut(name);
            for arg in args {
                v.visit_expr_mut(arg);
            }
        }
        Expr::MethodCall { receiver, method, args } => {
            v.visit_expr_mut(receiver);
            v.visit_name_mut(method);
            for arg in args {
                v.visit_expr_mut(arg);
            }
        }
        Expr::Select { receiver, field, .. } => {
            v.visit_expr_mut(receiver);
            v.visit_name_mut(field);
        }
        Expr::Index { receiver, index, .. } => {
            v.visit_expr_mut(receiver);
            v.visit_expr_mut(index);
        }
        Expr::List { elements } => {
            for el in elements {
                v.visit_expr_mut(&mut el.value);
            }
        }
        Expr::Map { entries } => {
            for entry in entries {
                v.visit_expr_mut(&mut entry.key);
                v.visit_expr_mut(&mut entry.value);
            }
        }
        Expr::Message { type_name, fields, .. } => {
            for segment in type_name {
                v.visit_name_mut(segment);
            }
            for field in fields {
                v.visit_name_mut(&mut field.name);
                v.visit_expr_mut(&mut field.value);
            }
        }
        Expr::Conditional { cond, if_true, if_false } => {
            v.visit_expr_mut(cond);
            v.visit_expr_mut(if_true);
            v.visit_expr_mut(if_false);
        }
        Expr::BinOp { lhs, rhs, .. } => {
            v.visit_expr_mut(lhs);
            v.visit_expr_mut(rhs);
        }
        Expr::UnaryOp { operand, .. } => v.visit_expr_mut(operand),
    }
}

// ============================================================================
// Utilities
// ============================================================================

struct SpanEraser;

impl VisitMut for SpanEraser {
    fn visit_expr_mut(&mut self, expr: &mut Spanned<Expr>) {
        expr.span = Span::dummy();
        walk_expr_mut(self, expr);
    }

    fn visit_name_mut(&mut self, name: &mut Spanned<String>) {
        name.span = Span::dummy();
    }
}

/// Reset every span in the tree, so two trees compare by structure alone.
pub fn erase_spans(expr: &mut Spanned<Expr>) {
    SpanEraser.visit_expr_mut(expr);
}

/// Count every expression node, the root included.
pub fn node_count(expr: &Spanned<Expr>) -> usize {
    struct Counter(usize);
    impl Visitor for Counter {
        fn visit_expr(&mut self, expr: &Spanned<Expr>) {
            self.0 += 1;
            walk_expr(self, expr);
        }
    }
    let mut counter = Counter(0);
    counter.visit_expr(expr);
    counter.0
}
