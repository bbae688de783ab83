//! Constraints and parameter bounds.
//!
//! A constraint keeps the bounds its author gave (original) next to the
//! bounds actually in force (effective): the original merged with the
//! bounds of every hold variable appearing in the expression. Any change to
//! either side recomputes the effective bounds before anything is stored.

use tracing::debug;

use super::dependencies::LinkTargets;
use super::InfiniteModel;
use crate::bounds::ParameterBounds;
use crate::constraint::{Constraint, ConstraintSet};
use crate::data::{Dependent, DependentKind, ObjectData};
use crate::error::{ModelError, Result};
use crate::expression::Expression;
use crate::reference::{GeneralRef, ObjectIndex, RefKind};
use crate::store::{ConstraintIndex, HoldVariableIndex};

/// Object carrying parameter bounds.
enum BoundsOwner {
    Hold(HoldVariableIndex),
    Constraint(ConstraintIndex),
}

impl InfiniteModel {
    /// Inserts a constraint.
    ///
    /// The expression may reference parameters, variables and measures.
    /// Bounds keys must be infinite parameters; the stored effective bounds
    /// also include the bounds of hold variables in the expression, and the
    /// insert fails with `EmptyIntersection` when those conflict.
    ///
    /// # Example
    ///
    /// ```
    /// use infopt_core::prelude::*;
    ///
    /// let mut model = InfiniteModel::new();
    /// let t = model
    ///     .insert_parameter(IndependentParameter::new(IntervalDomain::new(0.0, 10.0)?), "t")?;
    /// let z = model.insert_variable(
    ///     HoldVariable::new().with_parameter_bounds(ParameterBounds::new().with(t, 0.0, 5.0)?),
    ///     "z",
    /// )?;
    /// let bounds = ParameterBounds::new().with(t, 2.0, 8.0)?;
    /// let c = model.insert_constraint(
    ///     Constraint::new(z, ConstraintSet::LessThan(1.0)).with_parameter_bounds(bounds),
    ///     "c",
    /// )?;
    ///
    /// let effective = model.parameter_bounds(&c)?;
    /// assert_eq!(effective.get(&t), Some(&IntervalDomain::new(2.0, 5.0)?));
    /// # Ok::<(), ModelError>(())
    /// ```
    pub fn insert_constraint(
        &mut self,
        mut constraint: Constraint,
        name: impl Into<String>,
    ) -> Result<GeneralRef> {
        let name = name.into();
        self.check_expression(&constraint.expression)?;
        self.check_bounds_keys(&constraint.original_bounds)?;
        constraint.parameter_bounds =
            self.effective_bounds(&constraint.expression, &constraint.original_bounds, None)?;
        let targets = self.constraint_targets(&constraint)?;

        let index = self.constraints.insert(ObjectData::new(constraint, name.clone()));
        self.link(&targets, Dependent::Constraint(index));
        let r = self.general(ObjectIndex::Constraint(index));
        debug!(event = "insert", kind = RefKind::Constraint.name(), object = %r, name = %name);
        self.invalidate_names();
        self.touch();
        Ok(r)
    }

    /// Replaces the expression of a constraint.
    pub fn set_constraint_expression(
        &mut self,
        r: &GeneralRef,
        expr: impl Into<Expression>,
    ) -> Result<()> {
        let index = self.user_constraint(r)?;
        let expr = expr.into();
        self.check_expression(&expr)?;

        let old = self.constraints.get(index)?.object.clone();
        let effective = self.effective_bounds(&expr, &old.original_bounds, None)?;
        let new = Constraint {
            expression: expr,
            parameter_bounds: effective,
            ..old.clone()
        };
        let old_targets = self.constraint_targets(&old)?;
        let new_targets = self.constraint_targets(&new)?;

        self.rewire(Dependent::Constraint(index), &old_targets, &new_targets);
        self.constraints.get_mut(index)?.object = new;
        debug!(event = "constraint_expression_set", constraint = %r);
        self.touch();
        Ok(())
    }

    /// Replaces the set a constraint's expression must lie in.
    pub fn set_constraint_set(&mut self, r: &GeneralRef, set: ConstraintSet) -> Result<()> {
        let index = self.user_constraint(r)?;
        self.constraints.get_mut(index)?.object.set = set;
        self.touch();
        Ok(())
    }

    /// Returns true if the constraint mirrors a variable's bound, fix value
    /// or integrality.
    pub fn is_info_constraint(&self, r: &GeneralRef) -> Result<bool> {
        let index = self.constraint_index(r)?;
        Ok(self.constraints.get(index)?.extra.is_some())
    }

    /// Bounds in force for a hold variable or constraint.
    ///
    /// For a constraint these are the effective bounds, see
    /// [`original_parameter_bounds`](Self::original_parameter_bounds).
    pub fn parameter_bounds(&self, r: &GeneralRef) -> Result<&ParameterBounds> {
        match self.bounds_owner(r)? {
            BoundsOwner::Hold(i) => Ok(&self.hold_vars.get(i)?.object.parameter_bounds),
            BoundsOwner::Constraint(i) => Ok(&self.constraints.get(i)?.object.parameter_bounds),
        }
    }

    /// Bounds a constraint was given, before hold variable bounds are merged.
    pub fn original_parameter_bounds(&self, r: &GeneralRef) -> Result<&ParameterBounds> {
        let index = self.constraint_index(r)?;
        Ok(&self.constraints.get(index)?.object.original_bounds)
    }

    /// Replaces the bounds of a hold variable or constraint.
    pub fn set_parameter_bounds(&mut self, r: &GeneralRef, bounds: ParameterBounds) -> Result<()> {
        match self.bounds_owner(r)? {
            BoundsOwner::Hold(i) => self.replace_hold_bounds(i, bounds)?,
            BoundsOwner::Constraint(i) => self.replace_constraint_bounds(i, bounds)?,
        }
        debug!(event = "parameter_bounds_set", object = %r);
        self.touch();
        Ok(())
    }

    /// Merges `bounds` into the bounds of a hold variable or constraint,
    /// keeping the tighter interval per shared parameter.
    pub fn merge_parameter_bounds(
        &mut self,
        r: &GeneralRef,
        bounds: &ParameterBounds,
    ) -> Result<()> {
        match self.bounds_owner(r)? {
            BoundsOwner::Hold(i) => {
                let merged = self.hold_vars.get(i)?.object.parameter_bounds.merge(bounds)?;
                self.replace_hold_bounds(i, merged)?;
            }
            BoundsOwner::Constraint(i) => {
                let merged = self.constraints.get(i)?.object.original_bounds.merge(bounds)?;
                self.replace_constraint_bounds(i, merged)?;
            }
        }
        debug!(event = "parameter_bounds_merge", object = %r, keys = bounds.len());
        self.touch();
        Ok(())
    }

    /// Drops the bounds of a hold variable or constraint. A constraint keeps
    /// the bounds of the hold variables it uses.
    pub fn delete_parameter_bounds(&mut self, r: &GeneralRef) -> Result<()> {
        self.set_parameter_bounds(r, ParameterBounds::new())
    }

    fn constraint_index(&self, r: &GeneralRef) -> Result<ConstraintIndex> {
        match self.resolve(r)?.index() {
            ObjectIndex::Constraint(i) => Ok(i),
            _ => Err(super::wrong_kind(r, RefKind::Constraint)),
        }
    }

    /// A constraint the user may edit directly.
    fn user_constraint(&self, r: &GeneralRef) -> Result<ConstraintIndex> {
        let index = self.constraint_index(r)?;
        if self.constraints.get(index)?.extra.is_some() {
            return Err(ModelError::InvalidArgument(format!(
                "{} is an info constraint; edit its variable instead",
                self.describe(r)
            )));
        }
        Ok(index)
    }

    fn bounds_owner(&self, r: &GeneralRef) -> Result<BoundsOwner> {
        match self.resolve(r)?.index() {
            ObjectIndex::HoldVariable(i) => Ok(BoundsOwner::Hold(i)),
            ObjectIndex::Constraint(_) => self.user_constraint(r).map(BoundsOwner::Constraint),
            _ => Err(ModelError::InvalidArgument(format!(
                "{} cannot carry parameter bounds",
                r.kind().name()
            ))),
        }
    }

    /// `original` merged with the bounds of every hold variable in `expr`.
    ///
    /// `replacing` substitutes new bounds for one hold variable before they
    /// are stored.
    pub(crate) fn effective_bounds(
        &self,
        expr: &Expression,
        original: &ParameterBounds,
        replacing: Option<(HoldVariableIndex, &ParameterBounds)>,
    ) -> Result<ParameterBounds> {
        let mut effective = original.clone();
        for r in expr.references() {
            if let ObjectIndex::HoldVariable(i) = r.index()? {
                let hold = match replacing {
                    Some((j, bounds)) if j == i => bounds,
                    _ => &self.hold_vars.get(i)?.object.parameter_bounds,
                };
                effective = effective.merge(hold)?;
            }
        }
        Ok(effective)
    }

    /// Everything a constraint links to: its expression references and the
    /// parameters of its effective bounds.
    pub(crate) fn constraint_targets(&self, constraint: &Constraint) -> Result<LinkTargets> {
        let mut targets = self.link_targets(&constraint.expression.references())?;
        targets.extend(self.link_targets(constraint.parameter_bounds.iter().map(|(k, _)| k))?);
        Ok(targets)
    }

    fn replace_constraint_bounds(
        &mut self,
        index: ConstraintIndex,
        bounds: ParameterBounds,
    ) -> Result<()> {
        self.check_bounds_keys(&bounds)?;
        let expression = &self.constraints.get(index)?.object.expression;
        let effective = self.effective_bounds(expression, &bounds, None)?;
        self.replace_effective_bounds(index, effective)?;
        self.constraints.get_mut(index)?.object.original_bounds = bounds;
        Ok(())
    }

    /// Stores new effective bounds, moving the constraint's parameter links.
    fn replace_effective_bounds(
        &mut self,
        index: ConstraintIndex,
        effective: ParameterBounds,
    ) -> Result<()> {
        let old = self.constraints.get(index)?.object.clone();
        let new = Constraint {
            parameter_bounds: effective,
            ..old.clone()
        };
        let old_targets = self.constraint_targets(&old)?;
        let new_targets = self.constraint_targets(&new)?;
        self.rewire(Dependent::Constraint(index), &old_targets, &new_targets);
        self.constraints.get_mut(index)?.object.parameter_bounds = new.parameter_bounds;
        Ok(())
    }

    /// Replaces a hold variable's bounds and recomputes the effective bounds
    /// of every constraint using it. All merges run before anything changes.
    fn replace_hold_bounds(&mut self, index: HoldVariableIndex, bounds: ParameterBounds) -> Result<()> {
        self.check_bounds_keys(&bounds)?;
        let data = self.hold_vars.get(index)?;
        let users = data.dependents.of_kind(DependentKind::Constraint);
        let old_keys = self.link_targets(data.object.parameter_bounds.iter().map(|(k, _)| k))?;
        let new_keys = self.link_targets(bounds.iter().map(|(k, _)| k))?;

        let mut updates = Vec::with_capacity(users.len());
        for user in users {
            if let Dependent::Constraint(c) = user {
                let constraint = &self.constraints.get(c)?.object;
                let effective = self.effective_bounds(
                    &constraint.expression,
                    &constraint.original_bounds,
                    Some((index, &bounds)),
                )?;
                updates.push((c, effective));
            }
        }

        self.rewire(Dependent::HoldVariable(index), &old_keys, &new_keys);
        self.hold_vars.get_mut(index)?.object.parameter_bounds = bounds;
        for (c, effective) in updates {
            self.replace_effective_bounds(c, effective)?;
        }
        self.refresh_hold_flag();
        Ok(())
    }
}
