//! Variable insertion and info constraints.
//!
//! Bounds, fix values and integrality stored in a [`VariableInfo`] are
//! mirrored by constraints the model creates and owns. The two are kept in
//! sync in both directions: changing the info rewrites the constraint, and
//! deleting the constraint clears the info.

use tracing::debug;

use super::InfiniteModel;
use crate::bounds::ParameterBounds;
use crate::constraint::{Constraint, ConstraintSet};
use crate::data::{Dependent, InfoConstraintKind, InfoConstraints, InfoOwner, ObjectData};
use crate::error::{ModelError, Result};
use crate::expression::Expression;
use crate::parameter::SupportLabel;
use crate::reference::{GeneralRef, ObjectIndex, RefKind};
use crate::store::ConstraintKind;
use crate::variable::{
    HoldVariable, InfiniteVariable, Integrality, PointVariable, ReducedVariable, Variable,
    VariableInfo,
};

use super::parameters::StagedSupport;

impl InfiniteModel {
    /// Inserts a variable of any kind.
    ///
    /// - infinite: the parameter tuple must hold live infinite parameters,
    ///   each once, with dependent groups complete and contiguous
    /// - reduced: fixed positions must exist in the infinite variable's
    ///   tuple and their values lie in the parameter domains
    /// - point: one value per tuple position, each in its domain; the point
    ///   is added to the parameters' supports as `UserDefined`
    /// - hold: parameter bounds keys must be infinite parameters
    ///
    /// Info bounds, fix values and integrality become info constraints.
    pub fn insert_variable(
        &mut self,
        var: impl Into<Variable>,
        name: impl Into<String>,
    ) -> Result<GeneralRef> {
        let name = name.into();
        let index = match var.into() {
            Variable::Infinite(var) => self.insert_infinite(var, name.clone())?,
            Variable::Reduced(var) => self.insert_reduced(var, name.clone())?,
            Variable::Point(var) => self.insert_point(var, name.clone())?,
            Variable::Hold(var) => self.insert_hold(var, name.clone())?,
        };
        let r = self.general(index);
        debug!(event = "insert", kind = r.kind().name(), object = %r, name = %name);
        self.invalidate_names();
        self.touch();
        Ok(r)
    }

    fn insert_infinite(&mut self, var: InfiniteVariable, name: String) -> Result<ObjectIndex> {
        self.check_parameter_tuple(&var.parameter_refs, "infinite variable")?;
        check_info(&var.info)?;
        let targets = self.link_targets(&var.parameter_refs)?;
        let info = var.info;

        let index = self.infinite_vars.insert(ObjectData::new(var, name));
        self.link(&targets, Dependent::InfiniteVariable(index));
        let index = ObjectIndex::InfiniteVariable(index);
        self.create_info_constraints(index, &info)?;
        Ok(index)
    }

    fn insert_reduced(&mut self, var: ReducedVariable, name: String) -> Result<ObjectIndex> {
        let tuple = &self.infinite_variable(&var.infinite_variable)?.parameter_refs;
        if var.eval_supports.is_empty() {
            return Err(ModelError::InvalidArgument(
                "a reduced variable must fix at least one position".to_string(),
            ));
        }
        for (&pos, &value) in &var.eval_supports {
            let param = tuple.get(pos).ok_or(ModelError::DimensionMismatch {
                expected: tuple.len(),
                found: pos + 1,
            })?;
            if value.is_nan() || !self.parameter_interval(param)?.contains(value) {
                return Err(ModelError::OutOfDomain {
                    parameter: self.describe(param),
                    value,
                });
            }
        }
        let targets = self.link_targets([&var.infinite_variable])?;

        let index = self.reduced_vars.insert(ObjectData::new(var, name));
        self.link(&targets, Dependent::ReducedVariable(index));
        Ok(ObjectIndex::ReducedVariable(index))
    }

    fn insert_point(&mut self, mut var: PointVariable, name: String) -> Result<ObjectIndex> {
        let tuple = &self.infinite_variable(&var.infinite_variable)?.parameter_refs;
        let staged = self.stage_point(tuple, &var.parameter_values)?;
        check_info(&var.info)?;
        let targets = self.link_targets([&var.infinite_variable])?;

        // Store the rounded point so it matches the supports it creates.
        var.parameter_values = staged
            .iter()
            .flat_map(|s| match s {
                StagedSupport::Scalar(_, v) => vec![*v],
                StagedSupport::Column(_, c) => c.clone(),
            })
            .collect();
        let info = var.info;
        let index = self.point_vars.insert(ObjectData::new(var, name));
        self.link(&targets, Dependent::PointVariable(index));
        self.apply_staged(staged, &SupportLabel::UserDefined);
        let index = ObjectIndex::PointVariable(index);
        self.create_info_constraints(index, &info)?;
        Ok(index)
    }

    fn insert_hold(&mut self, var: HoldVariable, name: String) -> Result<ObjectIndex> {
        self.check_bounds_keys(&var.parameter_bounds)?;
        check_info(&var.info)?;
        let targets = self.link_targets(var.parameter_bounds.iter().map(|(k, _)| k))?;
        let info = var.info;
        let bounded = !var.parameter_bounds.is_empty();

        let index = self.hold_vars.insert(ObjectData::new(var, name));
        self.link(&targets, Dependent::HoldVariable(index));
        self.has_hold_bounds |= bounded;
        let index = ObjectIndex::HoldVariable(index);
        self.create_info_constraints(index, &info)?;
        Ok(index)
    }

    /// Info of an infinite, point or hold variable.
    pub fn variable_info(&self, r: &GeneralRef) -> Result<&VariableInfo> {
        let index = self.resolve(r)?.index();
        Ok(self.info_parts(index)?.0)
    }

    /// Info constraint of `kind` attached to a variable, if any.
    pub fn info_constraint(
        &self,
        r: &GeneralRef,
        kind: InfoConstraintKind,
    ) -> Result<Option<GeneralRef>> {
        let index = self.resolve(r)?.index();
        Ok(self
            .info_parts(index)?
            .1
            .get(kind)
            .map(|c| self.general(ObjectIndex::Constraint(c))))
    }

    /// Tuple the point or reduced variable was derived from.
    pub fn infinite_variable_ref(&self, r: &GeneralRef) -> Result<GeneralRef> {
        match self.resolve(r)?.index() {
            ObjectIndex::PointVariable(i) => Ok(self.point_vars.get(i)?.object.infinite_variable),
            ObjectIndex::ReducedVariable(i) => {
                Ok(self.reduced_vars.get(i)?.object.infinite_variable)
            }
            _ => Err(super::wrong_kind(r, RefKind::PointVariable)),
        }
    }

    /// Evaluation point of a point variable, after rounding.
    pub fn parameter_values(&self, r: &GeneralRef) -> Result<&[f64]> {
        Ok(self.point_variable(r)?.parameter_values())
    }

    pub fn set_lower_bound(&mut self, r: &GeneralRef, value: f64) -> Result<()> {
        let index = self.resolve(r)?.index();
        let info = self.info_parts(index)?.0;
        check_not_fixed(info, "lower bound")?;
        check_number(value)?;
        if let Some(upper) = info.upper_bound.filter(|upper| value > *upper) {
            return Err(ModelError::InvalidBounds {
                lower: value,
                upper,
            });
        }
        self.put_info_constraint(index, InfoConstraintKind::LowerBound, ConstraintSet::GreaterThan(value))?;
        self.info_parts_mut(index)?.0.lower_bound = Some(value);
        debug!(event = "lower_bound_set", variable = %r, value);
        self.touch();
        Ok(())
    }

    pub fn delete_lower_bound(&mut self, r: &GeneralRef) -> Result<()> {
        self.drop_info_constraint(r, InfoConstraintKind::LowerBound, "lower bound")
    }

    pub fn set_upper_bound(&mut self, r: &GeneralRef, value: f64) -> Result<()> {
        let index = self.resolve(r)?.index();
        let info = self.info_parts(index)?.0;
        check_not_fixed(info, "upper bound")?;
        check_number(value)?;
        if let Some(lower) = info.lower_bound.filter(|lower| value < *lower) {
            return Err(ModelError::InvalidBounds {
                lower,
                upper: value,
            });
        }
        self.put_info_constraint(index, InfoConstraintKind::UpperBound, ConstraintSet::LessThan(value))?;
        self.info_parts_mut(index)?.0.upper_bound = Some(value);
        debug!(event = "upper_bound_set", variable = %r, value);
        self.touch();
        Ok(())
    }

    pub fn delete_upper_bound(&mut self, r: &GeneralRef) -> Result<()> {
        self.drop_info_constraint(r, InfoConstraintKind::UpperBound, "upper bound")
    }

    /// Fixes a variable to `value`; bounds are kept but no longer binding.
    pub fn fix(&mut self, r: &GeneralRef, value: f64) -> Result<()> {
        let index = self.resolve(r)?.index();
        self.info_parts(index)?;
        check_number(value)?;
        self.put_info_constraint(index, InfoConstraintKind::Fix, ConstraintSet::EqualTo(value))?;
        self.info_parts_mut(index)?.0.fix_value = Some(value);
        debug!(event = "fix", variable = %r, value);
        self.touch();
        Ok(())
    }

    pub fn unfix(&mut self, r: &GeneralRef) -> Result<()> {
        self.drop_info_constraint(r, InfoConstraintKind::Fix, "fix value")
    }

    pub fn set_integer(&mut self, r: &GeneralRef) -> Result<()> {
        self.set_integrality(r, Integrality::Integer)
    }

    pub fn set_binary(&mut self, r: &GeneralRef) -> Result<()> {
        self.set_integrality(r, Integrality::Binary)
    }

    pub fn unset_integrality(&mut self, r: &GeneralRef) -> Result<()> {
        self.drop_info_constraint(r, InfoConstraintKind::Integrality, "integrality")
    }

    /// Sets or clears the start value; no constraint is involved.
    pub fn set_start_value(&mut self, r: &GeneralRef, value: Option<f64>) -> Result<()> {
        let index = self.resolve(r)?.index();
        self.info_parts_mut(index)?.0.start_value = value;
        self.touch();
        Ok(())
    }

    fn set_integrality(&mut self, r: &GeneralRef, integrality: Integrality) -> Result<()> {
        let index = self.resolve(r)?.index();
        self.info_parts(index)?;
        let set = match integrality {
            Integrality::Binary => ConstraintSet::ZeroOne,
            _ => ConstraintSet::Integer,
        };
        self.put_info_constraint(index, InfoConstraintKind::Integrality, set)?;
        self.info_parts_mut(index)?.0.integrality = integrality;
        debug!(event = "integrality_set", variable = %r, integrality = ?integrality);
        self.touch();
        Ok(())
    }

    /// Deletes an info constraint; clearing the info field happens as part
    /// of the constraint's removal.
    fn drop_info_constraint(
        &mut self,
        r: &GeneralRef,
        kind: InfoConstraintKind,
        what: &str,
    ) -> Result<()> {
        let index = self.resolve(r)?.index();
        match self.info_parts(index)?.1.get(kind) {
            Some(c) => self.remove_object(ObjectIndex::Constraint(c)),
            None => Err(ModelError::NotFound(format!("{what} of {}", self.describe(r)))),
        }
    }

    /// Creates the info constraints implied by `info`.
    fn create_info_constraints(&mut self, var: ObjectIndex, info: &VariableInfo) -> Result<()> {
        if let Some(value) = info.lower_bound {
            self.put_info_constraint(var, InfoConstraintKind::LowerBound, ConstraintSet::GreaterThan(value))?;
        }
        if let Some(value) = info.upper_bound {
            self.put_info_constraint(var, InfoConstraintKind::UpperBound, ConstraintSet::LessThan(value))?;
        }
        if let Some(value) = info.fix_value {
            self.put_info_constraint(var, InfoConstraintKind::Fix, ConstraintSet::EqualTo(value))?;
        }
        match info.integrality {
            Integrality::Continuous => {}
            Integrality::Integer => {
                self.put_info_constraint(var, InfoConstraintKind::Integrality, ConstraintSet::Integer)?
            }
            Integrality::Binary => {
                self.put_info_constraint(var, InfoConstraintKind::Integrality, ConstraintSet::ZeroOne)?
            }
        }
        Ok(())
    }

    /// Updates the info constraint of `kind` in place, or creates it.
    fn put_info_constraint(
        &mut self,
        var: ObjectIndex,
        kind: InfoConstraintKind,
        set: ConstraintSet,
    ) -> Result<()> {
        if let Some(existing) = self.info_parts(var)?.1.get(kind) {
            self.constraints.get_mut(existing)?.object.set = set;
            return Ok(());
        }

        let expression = Expression::Reference(self.general(var));
        let effective = self.effective_bounds(&expression, &ParameterBounds::new(), None)?;
        let constraint = Constraint {
            expression,
            set,
            parameter_bounds: effective,
            original_bounds: ParameterBounds::new(),
        };
        let targets = self.constraint_targets(&constraint)?;
        let mut data: ObjectData<ConstraintKind> = ObjectData::new(constraint, String::new());
        data.extra = Some(InfoOwner {
            variable: var,
            kind,
        });

        let index = self.constraints.insert(data);
        self.link(&targets, Dependent::Constraint(index));
        *self.info_parts_mut(var)?.1.slot_mut(kind) = Some(index);
        Ok(())
    }

    pub(crate) fn info_parts(&self, var: ObjectIndex) -> Result<(&VariableInfo, &InfoConstraints)> {
        match var {
            ObjectIndex::InfiniteVariable(i) => {
                let data = self.infinite_vars.get(i)?;
                Ok((&data.object.info, &data.extra))
            }
            ObjectIndex::PointVariable(i) => {
                let data = self.point_vars.get(i)?;
                Ok((&data.object.info, &data.extra))
            }
            ObjectIndex::HoldVariable(i) => {
                let data = self.hold_vars.get(i)?;
                Ok((&data.object.info, &data.extra))
            }
            other => Err(ModelError::InvalidArgument(format!(
                "{} carries no variable info",
                other.kind().name()
            ))),
        }
    }

    pub(crate) fn info_parts_mut(
        &mut self,
        var: ObjectIndex,
    ) -> Result<(&mut VariableInfo, &mut InfoConstraints)> {
        match var {
            ObjectIndex::InfiniteVariable(i) => {
                let data = self.infinite_vars.get_mut(i)?;
                Ok((&mut data.object.info, &mut data.extra))
            }
            ObjectIndex::PointVariable(i) => {
                let data = self.point_vars.get_mut(i)?;
                Ok((&mut data.object.info, &mut data.extra))
            }
            ObjectIndex::HoldVariable(i) => {
                let data = self.hold_vars.get_mut(i)?;
                Ok((&mut data.object.info, &mut data.extra))
            }
            other => Err(ModelError::InvalidArgument(format!(
                "{} carries no variable info",
                other.kind().name()
            ))),
        }
    }

    /// Recomputes whether any hold variable is restricted.
    pub(crate) fn refresh_hold_flag(&mut self) {
        self.has_hold_bounds = self
            .hold_vars
            .iter()
            .any(|(_, data)| !data.object.parameter_bounds.is_empty());
    }
}

/// Clears the info field mirrored by an info constraint of `kind`.
pub(crate) fn clear_info_field(info: &mut VariableInfo, kind: InfoConstraintKind) {
    match kind {
        InfoConstraintKind::LowerBound => info.lower_bound = None,
        InfoConstraintKind::UpperBound => info.upper_bound = None,
        InfoConstraintKind::Fix => info.fix_value = None,
        InfoConstraintKind::Integrality => info.integrality = Integrality::Continuous,
    }
}

fn check_number(value: f64) -> Result<()> {
    if value.is_nan() {
        return Err(ModelError::InvalidArgument("value is NaN".to_string()));
    }
    Ok(())
}

fn check_not_fixed(info: &VariableInfo, what: &str) -> Result<()> {
    if info.fix_value.is_some() {
        return Err(ModelError::InvalidArgument(format!(
            "cannot set the {what} of a fixed variable"
        )));
    }
    Ok(())
}

fn check_info(info: &VariableInfo) -> Result<()> {
    for value in [info.lower_bound, info.upper_bound, info.fix_value, info.start_value]
        .into_iter()
        .flatten()
    {
        check_number(value)?;
    }
    if let (Some(lower), Some(upper)) = (info.lower_bound, info.upper_bound) {
        if lower > upper {
            return Err(ModelError::InvalidBounds { lower, upper });
        }
    }
    Ok(())
}
