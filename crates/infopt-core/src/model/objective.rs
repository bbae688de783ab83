//! Objective sense and expression.

use std::fmt;

use tracing::debug;

use super::InfiniteModel;
use crate::error::{ModelError, Result};
use crate::expression::{Expression, FromExpression};

/// Optimization direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectiveSense {
    /// No objective; any feasible point will do.
    #[default]
    Feasibility,
    Minimize,
    Maximize,
}

impl fmt::Display for ObjectiveSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectiveSense::Feasibility => write!(f, "feasibility"),
            ObjectiveSense::Minimize => write!(f, "minimize"),
            ObjectiveSense::Maximize => write!(f, "maximize"),
        }
    }
}

impl InfiniteModel {
    /// Replaces the objective.
    ///
    /// The objective must be finite: an expression still varying over an
    /// infinite parameter fails with `NotFinite`. Wrap such terms in a
    /// measure or evaluate them at a point first.
    pub fn set_objective(
        &mut self,
        sense: ObjectiveSense,
        expr: impl Into<Expression>,
    ) -> Result<()> {
        let expr = expr.into();
        self.check_expression(&expr)?;
        let params = self.infinite_parameters_of(&expr)?;
        if !params.is_empty() {
            let names: Vec<String> = params.iter().map(|p| self.describe(p)).collect();
            return Err(ModelError::NotFinite(format!(
                "objective varies over {}",
                names.join(", ")
            )));
        }

        let old = self.link_targets(&self.objective.references())?;
        let new = self.link_targets(&expr.references())?;
        self.flag_objective(&old, false);
        self.flag_objective(&new, true);
        self.objective = expr;
        self.objective_sense = sense;
        debug!(
            event = "objective_set",
            sense = %sense,
            kind = self.objective.kind().name(),
            terms = new.len(),
        );
        self.touch();
        Ok(())
    }

    /// Replaces the objective expression, keeping the sense.
    pub fn set_objective_function(&mut self, expr: impl Into<Expression>) -> Result<()> {
        self.set_objective(self.objective_sense, expr)
    }

    pub fn set_objective_sense(&mut self, sense: ObjectiveSense) {
        self.objective_sense = sense;
        debug!(event = "objective_sense_set", sense = %sense);
        self.touch();
    }

    pub fn objective_sense(&self) -> ObjectiveSense {
        self.objective_sense
    }

    pub fn objective_function(&self) -> &Expression {
        &self.objective
    }

    /// The objective viewed as `T`.
    ///
    /// Fails with `TypeMismatch` when `T` is narrower than the stored
    /// expression.
    pub fn objective_function_as<T: FromExpression>(&self) -> Result<T> {
        T::from_expression(&self.objective)
    }
}
