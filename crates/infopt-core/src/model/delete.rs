//! Deletion under the configured policy.
//!
//! With [`DeletionPolicy::Restrict`] an object with live dependents cannot be
//! deleted. With [`DeletionPolicy::Cascade`] its dependents are deleted first,
//! depth first, each after its own dependents. The objective never blocks a
//! deletion; terms referencing the deleted object are dropped from it.

use std::collections::BTreeSet;

use infopt_config::DeletionPolicy;
use tracing::debug;

use super::dependencies::LinkTargets;
use super::variables::clear_info_field;
use super::InfiniteModel;
use crate::data::{Dependent, InfoConstraints};
use crate::error::{ModelError, Result};
use crate::reference::{GeneralRef, ObjectIndex};

impl InfiniteModel {
    /// Deletes the referenced object.
    ///
    /// Info constraints of a variable go with it and never block. A
    /// dependent parameter can only be deleted together with its group.
    ///
    /// # Errors
    ///
    /// `ObjectInUse` under the restrict policy when other variables,
    /// measures or constraints still reference the object.
    pub fn delete(&mut self, r: &GeneralRef) -> Result<()> {
        let index = self.resolve(r)?.index();
        if let ObjectIndex::DependentParameter(i) = index {
            return Err(ModelError::InvalidArgument(format!(
                "{i} is part of a group; delete the group instead"
            )));
        }

        match self.config.deletion_policy {
            DeletionPolicy::Restrict => {
                let blockers = self.deletion_blockers(index)?;
                if !blockers.is_empty() {
                    return Err(ModelError::ObjectInUse {
                        object: self.describe(r),
                        blockers,
                    });
                }
                self.remove_object(index)
            }
            DeletionPolicy::Cascade => {
                let order = self.cascade_order(index)?;
                debug!(event = "cascade", object = %r, count = order.len());
                for target in order {
                    // Info constraints may already be gone with their variable.
                    if self.check_live(target).is_ok() {
                        self.remove_object(target)?;
                    }
                }
                Ok(())
            }
        }
    }

    /// Dependents that prevent deleting `index`, by kind.
    fn deletion_blockers(&self, index: ObjectIndex) -> Result<Vec<(&'static str, usize)>> {
        let own = self.owned_info_constraints(index);
        Ok(self
            .dependents_at(index)?
            .blockers(|d| matches!(d, Dependent::Constraint(c) if own.contains(c))))
    }

    /// `root` and everything depending on it, dependents first.
    fn cascade_order(&self, root: ObjectIndex) -> Result<Vec<ObjectIndex>> {
        let mut order = Vec::new();
        let mut visited = BTreeSet::new();
        self.visit_dependents(root, &mut visited, &mut order)?;
        Ok(order)
    }

    fn visit_dependents(
        &self,
        index: ObjectIndex,
        visited: &mut BTreeSet<ObjectIndex>,
        order: &mut Vec<ObjectIndex>,
    ) -> Result<()> {
        if !visited.insert(index) {
            return Ok(());
        }
        for dependent in self.dependents_at(index)?.all() {
            self.visit_dependents(dependent.index(), visited, order)?;
        }
        order.push(index);
        Ok(())
    }

    fn owned_info_constraints(&self, index: ObjectIndex) -> InfoConstraints {
        self.info_parts(index)
            .map(|(_, info)| *info)
            .unwrap_or_default()
    }

    /// Removes one object, assuming nothing but its info constraints and the
    /// objective still references it.
    pub(crate) fn remove_object(&mut self, index: ObjectIndex) -> Result<()> {
        for c in self.owned_info_constraints(index).iter() {
            self.remove_object(ObjectIndex::Constraint(c))?;
        }

        let r = self.general(index);
        if self.dependents_at(index)?.in_objective() {
            self.drop_from_objective(index)?;
        }

        match index {
            ObjectIndex::IndependentParameter(i) => {
                self.independent_params.delete(i)?;
            }
            ObjectIndex::DependentParameters(i) => {
                self.dependent_params.delete(i)?;
            }
            ObjectIndex::DependentParameter(i) => {
                return Err(ModelError::InvalidArgument(format!(
                    "{i} cannot be removed on its own"
                )));
            }
            ObjectIndex::FiniteParameter(i) => {
                self.finite_params.delete(i)?;
            }
            ObjectIndex::InfiniteVariable(i) => {
                let data = self.infinite_vars.delete(i)?;
                let targets = self.link_targets(&data.object.parameter_refs)?;
                self.unlink(&targets, Dependent::InfiniteVariable(i));
            }
            ObjectIndex::ReducedVariable(i) => {
                let data = self.reduced_vars.delete(i)?;
                let targets = self.link_targets([&data.object.infinite_variable])?;
                self.unlink(&targets, Dependent::ReducedVariable(i));
            }
            ObjectIndex::PointVariable(i) => {
                let data = self.point_vars.delete(i)?;
                let targets = self.link_targets([&data.object.infinite_variable])?;
                self.unlink(&targets, Dependent::PointVariable(i));
            }
            ObjectIndex::HoldVariable(i) => {
                let data = self.hold_vars.delete(i)?;
                let targets =
                    self.link_targets(data.object.parameter_bounds.iter().map(|(k, _)| k))?;
                self.unlink(&targets, Dependent::HoldVariable(i));
                self.refresh_hold_flag();
            }
            ObjectIndex::Measure(i) => {
                let data = self.measures.delete(i)?;
                let measure = data.object;
                let mut targets = self.link_targets(&measure.expression.references())?;
                targets.extend(self.link_targets(measure.data.parameter_refs())?);
                self.unlink(&targets, Dependent::Measure(i));
                self.release_measure_supports(&measure)?;
            }
            ObjectIndex::Constraint(i) => {
                let data = self.constraints.delete(i)?;
                let targets = self.constraint_targets(&data.object)?;
                self.unlink(&targets, Dependent::Constraint(i));
                if let Some(owner) = data.extra {
                    if let Ok((info, slots)) = self.info_parts_mut(owner.variable) {
                        clear_info_field(info, owner.kind);
                        *slots.slot_mut(owner.kind) = None;
                    }
                }
            }
        }

        debug!(event = "delete", kind = index.kind().name(), object = %r);
        self.invalidate_names();
        self.touch();
        Ok(())
    }

    /// Drops every objective term referencing `index` and clears the
    /// objective flag of objects no longer in it.
    fn drop_from_objective(&mut self, index: ObjectIndex) -> Result<()> {
        let before = self.link_targets(&self.objective.references())?;
        let removed = match index {
            ObjectIndex::DependentParameters(i) => self.group_refs(i)?,
            _ => vec![self.general(index)],
        };
        for r in &removed {
            self.objective.remove_reference(r);
        }
        let after = self.link_targets(&self.objective.references())?;
        let dropped: LinkTargets = before.difference(&after).copied().collect();
        self.flag_objective(&dropped, false);
        debug!(
            event = "objective_term_drop",
            object = %self.general(index),
            remaining = after.len(),
        );
        Ok(())
    }
}
