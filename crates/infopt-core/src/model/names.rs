//! Display names and cached name lookups.

use std::collections::HashMap;

use tracing::debug;

use super::{with_data, with_data_mut, InfiniteModel, NameCache};
use crate::error::{ModelError, Result};
use crate::reference::{GeneralRef, ObjectIndex, RefKind};

impl InfiniteModel {
    /// Display name of the referenced object.
    pub fn name(&self, r: &GeneralRef) -> Result<&str> {
        let index = self.resolve(r)?.index();
        if let ObjectIndex::DependentParameter(i) = index {
            let group = self.dependent_params.get(i.object)?;
            return group
                .extra
                .get(i.param)
                .map(String::as_str)
                .ok_or_else(|| ModelError::NotFound(i.to_string()));
        }
        with_data!(self, index, |data| Ok(data.name.as_str()))
    }

    /// Renames the referenced object.
    pub fn set_name(&mut self, r: &GeneralRef, name: impl Into<String>) -> Result<()> {
        let index = self.resolve(r)?.index();
        let name = name.into();
        debug!(event = "rename", object = %r, name = %name);
        match index {
            ObjectIndex::DependentParameter(i) => {
                let group = self.dependent_params.get_mut(i.object)?;
                match group.extra.get_mut(i.param) {
                    Some(slot) => *slot = name,
                    None => return Err(ModelError::NotFound(i.to_string())),
                }
            }
            _ => with_data_mut!(self, index, |data| data.name = name),
        }
        self.invalidate_names();
        self.touch();
        Ok(())
    }

    /// Looks up a parameter (or dependent parameter group) by name.
    ///
    /// Fails with `NotFound` when no parameter carries `name` and with
    /// `AmbiguousName` when several do.
    pub fn parameter_by_name(&self, name: &str) -> Result<GeneralRef> {
        lookup(&self.param_lookup, name, || self.parameter_names())
    }

    /// Looks up a variable of any kind by name.
    pub fn variable_by_name(&self, name: &str) -> Result<GeneralRef> {
        lookup(&self.var_lookup, name, || self.variable_names())
    }

    /// Looks up a constraint by name; unnamed info constraints never match.
    pub fn constraint_by_name(&self, name: &str) -> Result<GeneralRef> {
        lookup(&self.constraint_lookup, name, || self.constraint_names())
    }

    fn parameter_names(&self) -> HashMap<String, Vec<GeneralRef>> {
        let mut names = NameIndex::default();
        for (index, data) in self.independent_params.iter() {
            names.add(&data.name, self.general(ObjectIndex::IndependentParameter(index)));
        }
        for (index, data) in self.dependent_params.iter() {
            names.add(&data.name, self.general(ObjectIndex::DependentParameters(index)));
            for (param, name) in data.extra.iter().enumerate() {
                let r = GeneralRef::new(
                    self.id,
                    RefKind::DependentParameter,
                    index.value(),
                    Some(param),
                );
                names.add(name, r);
            }
        }
        for (index, data) in self.finite_params.iter() {
            names.add(&data.name, self.general(ObjectIndex::FiniteParameter(index)));
        }
        names.0
    }

    fn variable_names(&self) -> HashMap<String, Vec<GeneralRef>> {
        let mut names = NameIndex::default();
        for (index, data) in self.infinite_vars.iter() {
            names.add(&data.name, self.general(ObjectIndex::InfiniteVariable(index)));
        }
        for (index, data) in self.reduced_vars.iter() {
            names.add(&data.name, self.general(ObjectIndex::ReducedVariable(index)));
        }
        for (index, data) in self.point_vars.iter() {
            names.add(&data.name, self.general(ObjectIndex::PointVariable(index)));
        }
        for (index, data) in self.hold_vars.iter() {
            names.add(&data.name, self.general(ObjectIndex::HoldVariable(index)));
        }
        names.0
    }

    fn constraint_names(&self) -> HashMap<String, Vec<GeneralRef>> {
        let mut names = NameIndex::default();
        for (index, data) in self.constraints.iter() {
            names.add(&data.name, self.general(ObjectIndex::Constraint(index)));
        }
        names.0
    }
}

#[derive(Default)]
struct NameIndex(HashMap<String, Vec<GeneralRef>>);

impl NameIndex {
    fn add(&mut self, name: &str, r: GeneralRef) {
        if !name.is_empty() {
            self.0.entry(name.to_string()).or_default().push(r);
        }
    }
}

fn lookup(
    cache: &NameCache,
    name: &str,
    build: impl FnOnce() -> HashMap<String, Vec<GeneralRef>>,
) -> Result<GeneralRef> {
    match cache.get_or_init(build).get(name).map(Vec::as_slice) {
        Some([single]) => Ok(*single),
        Some([_, _, ..]) => Err(ModelError::AmbiguousName(name.to_string())),
        _ => Err(ModelError::NotFound(format!("object named '{name}'"))),
    }
}
