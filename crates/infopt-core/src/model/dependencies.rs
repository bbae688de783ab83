//! Dependency graph bookkeeping.
//!
//! Dependent lists live on the data object being referenced. Links are kept
//! at the level of stored objects: a reference to one parameter of a
//! dependent group links the whole group.

use std::collections::BTreeSet;

use super::{with_data, with_data_mut, InfiniteModel};
use crate::bounds::ParameterBounds;
use crate::data::{Dependent, DependentKind, Dependents};
use crate::domain::IntervalDomain;
use crate::error::{ModelError, Result};
use crate::expression::Expression;
use crate::reference::{GeneralRef, ObjectIndex, RefKind};
use crate::store::{DependentParametersIndex, MeasureIndex, ReducedVariableIndex};

/// Stored objects a set of references links to.
pub(crate) type LinkTargets = BTreeSet<ObjectIndex>;

impl InfiniteModel {
    /// Objects referencing `r`.
    ///
    /// Individual dependent parameters report the dependents of their group.
    pub fn dependents(&self, r: &GeneralRef) -> Result<&Dependents> {
        let index = self.resolve(r)?.index();
        self.dependents_at(index)
    }

    /// Dependents of `r` of one kind, in the order they were recorded.
    pub fn dependents_of(&self, r: &GeneralRef, kind: DependentKind) -> Result<Vec<GeneralRef>> {
        Ok(self
            .dependents(r)?
            .of_kind(kind)
            .iter()
            .map(|d| d.to_general(self.id))
            .collect())
    }

    /// Returns true if the objective references `r`.
    pub fn is_used_by_objective(&self, r: &GeneralRef) -> Result<bool> {
        Ok(self.dependents(r)?.in_objective())
    }

    /// Returns true if any constraint references `r`.
    pub fn is_used_by_constraint(&self, r: &GeneralRef) -> Result<bool> {
        Ok(self.dependents(r)?.count(DependentKind::Constraint) > 0)
    }

    /// Returns true if any measure references `r`.
    pub fn is_used_by_measure(&self, r: &GeneralRef) -> Result<bool> {
        Ok(self.dependents(r)?.count(DependentKind::Measure) > 0)
    }

    /// Returns true if anything, the objective included, references `r`.
    pub fn is_used(&self, r: &GeneralRef) -> Result<bool> {
        let deps = self.dependents(r)?;
        Ok(!deps.is_empty() || deps.in_objective())
    }

    /// Infinite parameters an expression varies over.
    ///
    /// Infinite variables contribute their parameter tuple, reduced
    /// variables the positions left free and measures whatever remains
    /// after integration. Finite parameters, point variables and hold
    /// variables contribute nothing.
    pub fn infinite_parameters_of(&self, expr: &Expression) -> Result<Vec<GeneralRef>> {
        let mut params = Vec::new();
        for r in expr.references() {
            self.collect_infinite_parameters(&r, &mut params)?;
        }
        Ok(params)
    }

    /// Parameters an object varies over.
    ///
    /// For infinite variables this is the parameter tuple; for reduced
    /// variables the tuple minus the fixed positions; for measures the
    /// expression parameters minus the integrated ones; for constraints the
    /// parameters of the expression. Point and hold variables are finite.
    pub fn parameter_refs(&self, r: &GeneralRef) -> Result<Vec<GeneralRef>> {
        match self.resolve(r)?.index() {
            ObjectIndex::InfiniteVariable(i) => {
                Ok(self.infinite_vars.get(i)?.object.parameter_refs.clone())
            }
            ObjectIndex::ReducedVariable(i) => self.reduced_parameter_refs(i),
            ObjectIndex::PointVariable(_) | ObjectIndex::HoldVariable(_) => Ok(Vec::new()),
            ObjectIndex::Measure(i) => self.measure_parameter_refs(i),
            ObjectIndex::Constraint(i) => {
                let constraint = &self.constraints.get(i)?.object;
                self.infinite_parameters_of(&constraint.expression)
            }
            ObjectIndex::DependentParameters(i) => self.group_refs(i),
            ObjectIndex::IndependentParameter(_)
            | ObjectIndex::DependentParameter(_)
            | ObjectIndex::FiniteParameter(_) => Err(ModelError::InvalidArgument(format!(
                "{} has no parameter tuple",
                r.kind().name()
            ))),
        }
    }

    fn collect_infinite_parameters(
        &self,
        r: &GeneralRef,
        params: &mut Vec<GeneralRef>,
    ) -> Result<()> {
        let found = match self.resolve(r)?.index() {
            ObjectIndex::IndependentParameter(_) | ObjectIndex::DependentParameter(_) => vec![*r],
            ObjectIndex::FiniteParameter(_)
            | ObjectIndex::PointVariable(_)
            | ObjectIndex::HoldVariable(_) => Vec::new(),
            ObjectIndex::InfiniteVariable(i) => {
                self.infinite_vars.get(i)?.object.parameter_refs.clone()
            }
            ObjectIndex::ReducedVariable(i) => self.reduced_parameter_refs(i)?,
            ObjectIndex::Measure(i) => self.measure_parameter_refs(i)?,
            ObjectIndex::DependentParameters(_) | ObjectIndex::Constraint(_) => {
                return Err(not_expression_term(r))
            }
        };
        for p in found {
            if !params.contains(&p) {
                params.push(p);
            }
        }
        Ok(())
    }

    pub(crate) fn reduced_parameter_refs(
        &self,
        index: ReducedVariableIndex,
    ) -> Result<Vec<GeneralRef>> {
        let reduced = &self.reduced_vars.get(index)?.object;
        let infinite = self.infinite_variable(&reduced.infinite_variable)?;
        Ok(infinite
            .parameter_refs
            .iter()
            .enumerate()
            .filter(|(pos, _)| !reduced.eval_supports.contains_key(pos))
            .map(|(_, r)| *r)
            .collect())
    }

    pub(crate) fn measure_parameter_refs(
        &self,
        index: MeasureIndex,
    ) -> Result<Vec<GeneralRef>> {
        let measure = &self.measures.get(index)?.object;
        let params = self.infinite_parameters_of(&measure.expression)?;
        Ok(params
            .into_iter()
            .filter(|p| !measure.data.parameter_refs().contains(p))
            .collect())
    }

    pub(crate) fn group_refs(&self, index: DependentParametersIndex) -> Result<Vec<GeneralRef>> {
        let dimension = self.dependent_params.get(index)?.object.dimension();
        Ok((0..dimension)
            .map(|param| {
                GeneralRef::new(
                    self.id,
                    RefKind::DependentParameter,
                    index.value(),
                    Some(param),
                )
            })
            .collect())
    }

    pub(crate) fn dependents_at(&self, index: ObjectIndex) -> Result<&Dependents> {
        with_data!(self, index, |data| Ok(&data.dependents))
    }

    pub(crate) fn dependents_at_mut(&mut self, index: ObjectIndex) -> Result<&mut Dependents> {
        with_data_mut!(self, index, |data| Ok(&mut data.dependents))
    }

    /// Stored objects behind `refs`; dependent parameters map to their group.
    pub(crate) fn link_targets<'a>(
        &self,
        refs: impl IntoIterator<Item = &'a GeneralRef>,
    ) -> Result<LinkTargets> {
        refs.into_iter()
            .map(|r| -> Result<ObjectIndex> {
                Ok(match r.index()? {
                    ObjectIndex::DependentParameter(i) => ObjectIndex::DependentParameters(i.object),
                    index => index,
                })
            })
            .collect()
    }

    /// Records `dependent` on every target. Targets must have been
    /// validated beforehand.
    pub(crate) fn link(&mut self, targets: &LinkTargets, dependent: Dependent) {
        for target in targets {
            match self.dependents_at_mut(*target) {
                Ok(deps) => {
                    deps.insert(dependent);
                }
                Err(err) => panic!("linking {dependent:?} to a dead target: {err}"),
            }
        }
    }

    /// Forgets `dependent` on every live target.
    pub(crate) fn unlink(&mut self, targets: &LinkTargets, dependent: Dependent) {
        for target in targets {
            if let Ok(deps) = self.dependents_at_mut(*target) {
                deps.remove(dependent);
            }
        }
    }

    /// Moves `dependent` from the `old` targets to the `new` ones, leaving
    /// shared targets untouched.
    pub(crate) fn rewire(&mut self, dependent: Dependent, old: &LinkTargets, new: &LinkTargets) {
        let dropped: LinkTargets = old.difference(new).copied().collect();
        let added: LinkTargets = new.difference(old).copied().collect();
        self.unlink(&dropped, dependent);
        self.link(&added, dependent);
    }

    /// Sets or clears the objective flag on every target.
    pub(crate) fn flag_objective(&mut self, targets: &LinkTargets, value: bool) {
        for target in targets {
            if let Ok(deps) = self.dependents_at_mut(*target) {
                deps.set_in_objective(value);
            }
        }
    }

    /// Checks that every reference of `expr` is alive and may appear in an
    /// expression.
    pub(crate) fn check_expression(&self, expr: &Expression) -> Result<()> {
        for r in expr.references() {
            let index = self.resolve(&r)?.index();
            if matches!(
                index,
                ObjectIndex::DependentParameters(_) | ObjectIndex::Constraint(_)
            ) {
                return Err(not_expression_term(&r));
            }
        }
        Ok(())
    }

    /// Checks a parameter tuple of an infinite variable or measure.
    ///
    /// The tuple must be non-empty, hold only infinite parameters, hold none
    /// twice and list the parameters of a dependent group complete,
    /// contiguous and in group order.
    pub(crate) fn check_parameter_tuple(&self, refs: &[GeneralRef], who: &str) -> Result<()> {
        if refs.is_empty() {
            return Err(ModelError::InvalidArgument(format!(
                "{who} needs at least one infinite parameter"
            )));
        }
        let mut seen = BTreeSet::new();
        for r in refs {
            self.resolve(r)?;
            if !seen.insert(*r) {
                return Err(ModelError::InvalidArgument(format!(
                    "{r} appears more than once in {who}"
                )));
            }
        }

        let mut pos = 0;
        while pos < refs.len() {
            let r = refs[pos];
            match r.kind() {
                RefKind::IndependentParameter => pos += 1,
                RefKind::DependentParameter => {
                    let group = DependentParametersIndex::new(r.raw());
                    let expected = self.group_refs(group)?;
                    let window = refs.get(pos..pos + expected.len());
                    if window != Some(expected.as_slice()) {
                        return Err(ModelError::InvalidArgument(format!(
                            "parameters of {group} must appear complete, contiguous and in order in {who}"
                        )));
                    }
                    pos += expected.len();
                }
                RefKind::FiniteParameter => {
                    return Err(ModelError::InvalidArgument(format!(
                        "{who} cannot depend on finite parameter {r}"
                    )))
                }
                other => {
                    return Err(ModelError::InvalidArgument(format!(
                        "{who} expects infinite parameters, found {}",
                        other.name()
                    )))
                }
            }
        }
        Ok(())
    }

    /// Checks that every key is a live infinite parameter whose domain
    /// overlaps the requested interval.
    pub(crate) fn check_bounds_keys(&self, bounds: &ParameterBounds) -> Result<()> {
        for (r, interval) in bounds {
            self.resolve(r)?;
            if !r.kind().is_infinite_parameter() {
                return Err(ModelError::InvalidArgument(format!(
                    "parameter bounds key {r} is not an infinite parameter"
                )));
            }
            if self.parameter_interval(r)?.intersect(interval).is_none() {
                return Err(ModelError::EmptyIntersection(self.describe(r)));
            }
        }
        Ok(())
    }

    /// Domain bounds of one infinite parameter.
    pub(crate) fn parameter_interval(&self, r: &GeneralRef) -> Result<IntervalDomain> {
        match self.resolve(r)?.index() {
            ObjectIndex::IndependentParameter(i) => {
                Ok(self.independent_params.get(i)?.object.domain().bounds())
            }
            ObjectIndex::DependentParameter(i) => self
                .dependent_params
                .get(i.object)?
                .object
                .domain()
                .bounds(i.param)
                .ok_or_else(|| ModelError::NotFound(i.to_string())),
            _ => Err(ModelError::InvalidArgument(format!(
                "{r} is not an infinite parameter"
            ))),
        }
    }
}

fn not_expression_term(r: &GeneralRef) -> ModelError {
    ModelError::InvalidArgument(format!("{} cannot appear in an expression", r.kind().name()))
}
