//! Type inference for filter predicates.

use std::sync::Arc;

use crate::query::{BinaryOp, Expr, ExprOp, UnaryOp};
use crate::types::{Literal, Type, TypeKind};

use super::checker::TypeChecker;
use super::context::Context;

/// Operand of a binary expression as seen by the compatibility rules.
struct Operand<'a> {
    ty: &'a Type,
    literal: Option<&'a Literal>,
}

impl Operand<'_> {
    fn is_text_literal(&self) -> bool {
        self.literal.is_some_and(Literal::is_string)
    }

    fn is_list_literal(&self) -> bool {
        self.literal.is_some_and(Literal::is_list)
    }
}

impl TypeChecker {
    /// Infers `expr` against the row context `ctx`.
    pub(super) fn infer_expr(&self, ctx: &Arc<Context>, expr: &Expr) -> (Expr, Arc<Context>) {
        let (op, next) = match &expr.op {
            ExprOp::Value { value } => (
                ExprOp::Value {
                    value: value.clone(),
                },
                Context::next(ctx, value.ty()),
            ),
            ExprOp::Navigate { path } => (
                ExprOp::Navigate { path: path.clone() },
                self.navigate(ctx, path),
            ),
            ExprOp::Query { query } => {
                let (query, qctx) = self.infer_query(ctx, query);
                let typed = Expr {
                    op: ExprOp::Query {
                        query: Box::new(query),
                    },
                    context: Some(Arc::clone(&qctx)),
                };
                return (typed, qctx);
            }
            ExprOp::Binary { op, left, right } => {
                let (left, lctx) = self.infer_expr(ctx, left);
                let (right, rctx) = self.infer_expr(ctx, right);
                let allowed = binary_allowed(
                    *op,
                    &Operand {
                        ty: &lctx.ty,
                        literal: left.as_literal(),
                    },
                    &Operand {
                        ty: &rctx.ty,
                        literal: right.as_literal(),
                    },
                );
                let next = boolean_or_invalid(ctx, allowed)
                    .taint(lctx.has_invalid_type || rctx.has_invalid_type);
                let op = ExprOp::Binary {
                    op: *op,
                    left: Box::new(left),
                    right: Box::new(right),
                };
                (op, next)
            }
            ExprOp::Unary { op, expression } => {
                let (expression, ectx) = self.infer_expr(ctx, expression);
                let allowed = !ectx.is_invalid()
                    && match op {
                        UnaryOp::Not => ectx.ty.is_boolean(),
                        UnaryOp::Exists => true,
                    };
                let next = boolean_or_invalid(ctx, allowed).taint(ectx.has_invalid_type);
                let op = ExprOp::Unary {
                    op: *op,
                    expression: Box::new(expression),
                };
                (op, next)
            }
            ExprOp::LogicalBinary { op, expressions } => {
                let mut typed = Vec::with_capacity(expressions.len());
                let mut allowed = true;
                let mut tainted = false;
                for operand in expressions {
                    let (operand, octx) = self.infer_expr(ctx, operand);
                    allowed &= octx.ty.is_boolean();
                    tainted |= octx.has_invalid_type;
                    typed.push(operand);
                }
                let next = boolean_or_invalid(ctx, allowed).taint(tainted);
                let op = ExprOp::LogicalBinary {
                    op: *op,
                    expressions: typed,
                };
                (op, next)
            }
        };

        let next = Arc::new(next);
        let typed = Expr {
            op,
            context: Some(Arc::clone(&next)),
        };
        (typed, next)
    }
}

fn boolean_or_invalid(ctx: &Arc<Context>, allowed: bool) -> Context {
    let ty = if allowed {
        Type::boolean()
    } else {
        Type::invalid()
    };
    Context::next(ctx, ty)
}

fn binary_allowed(op: BinaryOp, left: &Operand<'_>, right: &Operand<'_>) -> bool {
    if left.ty.is_invalid() || right.ty.is_invalid() || left.is_list_literal() {
        return false;
    }
    if right.is_list_literal() {
        return matches!(op, BinaryOp::Equal | BinaryOp::NotEqual) && left.ty.is_textual();
    }
    match op {
        BinaryOp::Contains => left.ty.is_textual() && right.ty.is_textual(),
        BinaryOp::Equal | BinaryOp::NotEqual => comparable(left, right),
        _ => comparable(left, right) && left.ty.is_orderable() && right.ty.is_orderable(),
    }
}

/// Returns true if both operands range over the same kind of values.
///
/// Text and enumerations are interchangeable, and a text literal may stand
/// for a date, time or datetime.
fn comparable(left: &Operand<'_>, right: &Operand<'_>) -> bool {
    if left.ty.is_textual() && right.ty.is_textual() {
        return true;
    }
    if (is_temporal(left.ty) && right.is_text_literal())
        || (is_temporal(right.ty) && left.is_text_literal())
    {
        return true;
    }
    matches!(
        (&left.ty.kind, &right.ty.kind),
        (TypeKind::Number, TypeKind::Number)
            | (TypeKind::Boolean, TypeKind::Boolean)
            | (TypeKind::Time, TypeKind::Time)
            | (
                TypeKind::Date | TypeKind::DateTime,
                TypeKind::Date | TypeKind::DateTime
            )
    )
}

fn is_temporal(ty: &Type) -> bool {
    matches!(ty.kind, TypeKind::Date | TypeKind::Time | TypeKind::DateTime)
}
