//! Minimal expression carrier.
//!
//! Arithmetic on expressions belongs to the modeling layer; the store only
//! needs to hold expressions, enumerate the references inside them and drop
//! references to deleted objects.

use std::collections::BTreeSet;

use crate::error::{ModelError, Result};
use crate::reference::GeneralRef;

/// Shape of an expression, from narrowest to widest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExpressionKind {
    Constant,
    Reference,
    Affine,
    Quadratic,
}

impl ExpressionKind {
    pub fn name(self) -> &'static str {
        match self {
            ExpressionKind::Constant => "constant",
            ExpressionKind::Reference => "reference",
            ExpressionKind::Affine => "affine",
            ExpressionKind::Quadratic => "quadratic",
        }
    }
}

/// `sum(coefficient * reference) + constant`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AffineExpr {
    pub terms: Vec<(f64, GeneralRef)>,
    pub constant: f64,
}

impl AffineExpr {
    pub fn new(terms: Vec<(f64, GeneralRef)>, constant: f64) -> Self {
        Self { terms, constant }
    }
}

/// `sum(coefficient * a * b) + affine`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuadExpr {
    pub terms: Vec<(f64, GeneralRef, GeneralRef)>,
    pub affine: AffineExpr,
}

impl QuadExpr {
    pub fn new(terms: Vec<(f64, GeneralRef, GeneralRef)>, affine: AffineExpr) -> Self {
        Self { terms, affine }
    }
}

/// Expression held by measures, constraints and the objective.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant(f64),
    Reference(GeneralRef),
    Affine(AffineExpr),
    Quadratic(QuadExpr),
}

impl Default for Expression {
    fn default() -> Self {
        Expression::Constant(0.0)
    }
}

impl Expression {
    pub fn kind(&self) -> ExpressionKind {
        match self {
            Expression::Constant(_) => ExpressionKind::Constant,
            Expression::Reference(_) => ExpressionKind::Reference,
            Expression::Affine(_) => ExpressionKind::Affine,
            Expression::Quadratic(_) => ExpressionKind::Quadratic,
        }
    }

    /// Distinct references inside the expression, in reference order.
    pub fn references(&self) -> Vec<GeneralRef> {
        let mut refs = BTreeSet::new();
        match self {
            Expression::Constant(_) => {}
            Expression::Reference(r) => {
                refs.insert(*r);
            }
            Expression::Affine(aff) => {
                refs.extend(aff.terms.iter().map(|(_, r)| *r));
            }
            Expression::Quadratic(quad) => {
                for (_, a, b) in &quad.terms {
                    refs.insert(*a);
                    refs.insert(*b);
                }
                refs.extend(quad.affine.terms.iter().map(|(_, r)| *r));
            }
        }
        refs.into_iter().collect()
    }

    pub fn contains_reference(&self, target: &GeneralRef) -> bool {
        match self {
            Expression::Constant(_) => false,
            Expression::Reference(r) => r == target,
            Expression::Affine(aff) => aff.terms.iter().any(|(_, r)| r == target),
            Expression::Quadratic(quad) => {
                quad.terms.iter().any(|(_, a, b)| a == target || b == target)
                    || quad.affine.terms.iter().any(|(_, r)| r == target)
            }
        }
    }

    /// Drops every term involving `target`; a bare reference becomes `0`.
    pub fn remove_reference(&mut self, target: &GeneralRef) {
        match self {
            Expression::Constant(_) => {}
            Expression::Reference(r) => {
                if r == target {
                    *self = Expression::Constant(0.0);
                }
            }
            Expression::Affine(aff) => aff.terms.retain(|(_, r)| r != target),
            Expression::Quadratic(quad) => {
                quad.terms.retain(|(_, a, b)| a != target && b != target);
                quad.affine.terms.retain(|(_, r)| r != target);
            }
        }
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Expression::Constant(value)
    }
}

impl From<GeneralRef> for Expression {
    fn from(r: GeneralRef) -> Self {
        Expression::Reference(r)
    }
}

impl From<AffineExpr> for Expression {
    fn from(aff: AffineExpr) -> Self {
        Expression::Affine(aff)
    }
}

impl From<QuadExpr> for Expression {
    fn from(quad: QuadExpr) -> Self {
        Expression::Quadratic(quad)
    }
}

/// Typed view of an [`Expression`].
///
/// Widening always succeeds; narrowing to a type that cannot represent the
/// stored shape fails with `TypeMismatch` instead of truncating.
pub trait FromExpression: Sized {
    const KIND: ExpressionKind;

    fn from_expression(expr: &Expression) -> Result<Self>;
}

fn mismatch(found: &Expression, requested: ExpressionKind) -> ModelError {
    ModelError::TypeMismatch {
        found: found.kind().name(),
        requested: requested.name(),
    }
}

impl FromExpression for f64 {
    const KIND: ExpressionKind = ExpressionKind::Constant;

    fn from_expression(expr: &Expression) -> Result<Self> {
        match expr {
            Expression::Constant(c) => Ok(*c),
            other => Err(mismatch(other, Self::KIND)),
        }
    }
}

impl FromExpression for GeneralRef {
    const KIND: ExpressionKind = ExpressionKind::Reference;

    fn from_expression(expr: &Expression) -> Result<Self> {
        match expr {
            Expression::Reference(r) => Ok(*r),
            other => Err(mismatch(other, Self::KIND)),
        }
    }
}

impl FromExpression for AffineExpr {
    const KIND: ExpressionKind = ExpressionKind::Affine;

    fn from_expression(expr: &Expression) -> Result<Self> {
        match expr {
            Expression::Constant(c) => Ok(AffineExpr::new(Vec::new(), *c)),
            Expression::Reference(r) => Ok(AffineExpr::new(vec![(1.0, *r)], 0.0)),
            Expression::Affine(aff) => Ok(aff.clone()),
            other => Err(mismatch(other, Self::KIND)),
        }
    }
}

impl FromExpression for QuadExpr {
    const KIND: ExpressionKind = ExpressionKind::Quadratic;

    fn from_expression(expr: &Expression) -> Result<Self> {
        match expr {
            Expression::Quadratic(quad) => Ok(quad.clone()),
            other => Ok(QuadExpr::new(Vec::new(), AffineExpr::from_expression(other)?)),
        }
    }
}

impl FromExpression for Expression {
    const KIND: ExpressionKind = ExpressionKind::Quadratic;

    fn from_expression(expr: &Expression) -> Result<Self> {
        Ok(expr.clone())
    }
}
