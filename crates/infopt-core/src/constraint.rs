//! Constraints over expressions, optionally restricted in parameter space.

use crate::bounds::ParameterBounds;
use crate::expression::Expression;

/// Set the constraint expression must belong to.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstraintSet {
    EqualTo(f64),
    LessThan(f64),
    GreaterThan(f64),
    Interval { lower: f64, upper: f64 },
    Integer,
    ZeroOne,
}

/// Expression, set and parameter-space restriction.
///
/// `parameter_bounds` are the effective bounds (author bounds merged with the
/// bounds of every hold variable in the expression); `original_bounds` are
/// the author bounds alone so they can be restored after rebinding.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub(crate) expression: Expression,
    pub(crate) set: ConstraintSet,
    pub(crate) parameter_bounds: ParameterBounds,
    pub(crate) original_bounds: ParameterBounds,
}

impl Constraint {
    pub fn new(expression: impl Into<Expression>, set: ConstraintSet) -> Self {
        Self {
            expression: expression.into(),
            set,
            parameter_bounds: ParameterBounds::new(),
            original_bounds: ParameterBounds::new(),
        }
    }

    /// Restricts the constraint to a parameter sub-domain.
    pub fn with_parameter_bounds(mut self, bounds: ParameterBounds) -> Self {
        self.original_bounds = bounds.clone();
        self.parameter_bounds = bounds;
        self
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn set(&self) -> &ConstraintSet {
        &self.set
    }

    /// Effective bounds.
    pub fn parameter_bounds(&self) -> &ParameterBounds {
        &self.parameter_bounds
    }

    /// Bounds as written by the author.
    pub fn original_bounds(&self) -> &ParameterBounds {
        &self.original_bounds
    }
}
