//! The infinite-dimensional model container.
//!
//! [`InfiniteModel`] owns one [`DataStore`] per object kind and keeps the
//! dependency graph between them consistent. Operations are grouped by
//! concern:
//!
//! - `parameters`: parameter insertion, supports and domains
//! - `variables`: variable insertion and info constraints
//! - `measures`: measure insertion and support bookkeeping
//! - `constraints`: constraints, and parameter bounds of constraints and
//!   hold variables
//! - `objective`: objective sense and expression
//! - `dependencies`: dependent lists and graph queries
//! - `delete`: restrict and cascade deletion
//! - `names`: display names and cached name lookups
//!
//! Every fallible mutation validates its whole input before touching any
//! store, so a returned error always leaves the model unchanged.

mod constraints;
mod delete;
mod dependencies;
mod measures;
mod names;
mod objective;
mod parameters;
mod variables;

pub use objective::ObjectiveSense;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use infopt_config::{ModelConfig, MAX_SIGNIFICANT_DIGITS};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constraint::Constraint;
use crate::data::DataStore;
use crate::error::{ModelError, Result};
use crate::expression::Expression;
use crate::measure::Measure;
use crate::parameter::{
    DependentParameters, FiniteParameter, IndependentParameter, SupportLabel,
};
use crate::reference::{ConcreteRef, GeneralRef, ModelId, ObjectIndex, RefKind};
use crate::store::{
    ConstraintKind, DependentParametersKind, FiniteParameterKind, HoldVariableKind,
    IndependentParameterKind, InfiniteVariableKind, MeasureKind, PointVariableKind,
    ReducedVariableKind,
};
use crate::variable::{HoldVariable, InfiniteVariable, PointVariable, ReducedVariable};

/// Evaluates `$body` with `$data` bound to the data object at `$index`.
///
/// Individual dependent parameters resolve to their group's data object.
macro_rules! with_data {
    ($model:expr, $index:expr, |$data:ident| $body:expr) => {
        match $index {
            $crate::reference::ObjectIndex::IndependentParameter(i) => {
                let $data = $model.independent_params.get(i)?;
                $body
            }
            $crate::reference::ObjectIndex::DependentParameters(i) => {
                let $data = $model.dependent_params.get(i)?;
                $body
            }
            $crate::reference::ObjectIndex::DependentParameter(i) => {
                let $data = $model.dependent_params.get(i.object)?;
                $body
            }
            $crate::reference::ObjectIndex::FiniteParameter(i) => {
                let $data = $model.finite_params.get(i)?;
                $body
            }
            $crate::reference::ObjectIndex::InfiniteVariable(i) => {
                let $data = $model.infinite_vars.get(i)?;
                $body
            }
            $crate::reference::ObjectIndex::ReducedVariable(i) => {
                let $data = $model.reduced_vars.get(i)?;
                $body
            }
            $crate::reference::ObjectIndex::PointVariable(i) => {
                let $data = $model.point_vars.get(i)?;
                $body
            }
            $crate::reference::ObjectIndex::HoldVariable(i) => {
                let $data = $model.hold_vars.get(i)?;
                $body
            }
            $crate::reference::ObjectIndex::Measure(i) => {
                let $data = $model.measures.get(i)?;
                $body
            }
            $crate::reference::ObjectIndex::Constraint(i) => {
                let $data = $model.constraints.get(i)?;
                $body
            }
        }
    };
}

/// Mutable counterpart of `with_data!`.
macro_rules! with_data_mut {
    ($model:expr, $index:expr, |$data:ident| $body:expr) => {
        match $index {
            $crate::reference::ObjectIndex::IndependentParameter(i) => {
                let $data = $model.independent_params.get_mut(i)?;
                $body
            }
            $crate::reference::ObjectIndex::DependentParameters(i) => {
                let $data = $model.dependent_params.get_mut(i)?;
                $body
            }
            $crate::reference::ObjectIndex::DependentParameter(i) => {
                let $data = $model.dependent_params.get_mut(i.object)?;
                $body
            }
            $crate::reference::ObjectIndex::FiniteParameter(i) => {
                let $data = $model.finite_params.get_mut(i)?;
                $body
            }
            $crate::reference::ObjectIndex::InfiniteVariable(i) => {
                let $data = $model.infinite_vars.get_mut(i)?;
                $body
            }
            $crate::reference::ObjectIndex::ReducedVariable(i) => {
                let $data = $model.reduced_vars.get_mut(i)?;
                $body
            }
            $crate::reference::ObjectIndex::PointVariable(i) => {
                let $data = $model.point_vars.get_mut(i)?;
                $body
            }
            $crate::reference::ObjectIndex::HoldVariable(i) => {
                let $data = $model.hold_vars.get_mut(i)?;
                $body
            }
            $crate::reference::ObjectIndex::Measure(i) => {
                let $data = $model.measures.get_mut(i)?;
                $body
            }
            $crate::reference::ObjectIndex::Constraint(i) => {
                let $data = $model.constraints.get_mut(i)?;
                $body
            }
        }
    };
}

pub(crate) use {with_data, with_data_mut};

/// Handle to the transcription target of a model.
///
/// The model never calls into the backend; it only owns it and marks it
/// stale through the dirty flag.
pub trait TranscriptionBackend: fmt::Debug + Send + Sync {
    /// Short backend name for diagnostics.
    fn name(&self) -> &str;

    /// Access for downcasting to the concrete backend.
    fn as_any(&self) -> &dyn Any;
}

type NameCache = OnceLock<HashMap<String, Vec<GeneralRef>>>;

/// Mutable store of an infinite-dimensional optimization model.
///
/// # Example
///
/// ```
/// use infopt_core::prelude::*;
///
/// let mut model = InfiniteModel::new();
/// let t = model
///     .insert_parameter(IndependentParameter::new(IntervalDomain::new(0.0, 1.0).unwrap()), "t")
///     .unwrap();
/// model.add_supports(&t, &[0.0, 1.0], SupportLabel::UserDefined).unwrap();
///
/// let y = model
///     .insert_variable(InfiniteVariable::new(vec![t]), "y")
///     .unwrap();
/// let y0 = model
///     .insert_variable(PointVariable::new(y, vec![0.5]), "y0")
///     .unwrap();
/// model.set_objective(ObjectiveSense::Minimize, y0).unwrap();
///
/// // The infinite variable still depends on `t`.
/// assert!(model.delete(&t).is_err());
///
/// model.delete(&y0).unwrap();
/// model.delete(&y).unwrap();
/// model.delete(&t).unwrap();
/// assert!(model.resolve(&t).is_err());
/// ```
pub struct InfiniteModel {
    id: ModelId,
    config: ModelConfig,

    pub(crate) independent_params: DataStore<IndependentParameterKind>,
    pub(crate) dependent_params: DataStore<DependentParametersKind>,
    pub(crate) finite_params: DataStore<FiniteParameterKind>,
    pub(crate) infinite_vars: DataStore<InfiniteVariableKind>,
    pub(crate) reduced_vars: DataStore<ReducedVariableKind>,
    pub(crate) point_vars: DataStore<PointVariableKind>,
    pub(crate) hold_vars: DataStore<HoldVariableKind>,
    pub(crate) measures: DataStore<MeasureKind>,
    pub(crate) constraints: DataStore<ConstraintKind>,

    param_lookup: NameCache,
    var_lookup: NameCache,
    constraint_lookup: NameCache,

    pub(crate) has_hold_bounds: bool,
    pub(crate) objective_sense: ObjectiveSense,
    pub(crate) objective: Expression,

    extension_data: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    backend: Option<Box<dyn TranscriptionBackend>>,
    dirty: bool,

    pub(crate) rng: StdRng,
    label_counter: u64,
}

impl InfiniteModel {
    /// Creates an empty model with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    /// Creates an empty model using `config`.
    ///
    /// Support settings outside their valid ranges are clamped:
    /// `significant_digits` to `1..=MAX_SIGNIFICANT_DIGITS` and
    /// `default_num_supports` to at least one.
    pub fn with_config(mut config: ModelConfig) -> Self {
        let supports = &mut config.supports;
        supports.significant_digits = supports.significant_digits.clamp(1, MAX_SIGNIFICANT_DIGITS);
        supports.default_num_supports = supports.default_num_supports.max(1);
        let rng = match config.supports.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            id: ModelId::fresh(),
            config,
            independent_params: DataStore::new(),
            dependent_params: DataStore::new(),
            finite_params: DataStore::new(),
            infinite_vars: DataStore::new(),
            reduced_vars: DataStore::new(),
            point_vars: DataStore::new(),
            hold_vars: DataStore::new(),
            measures: DataStore::new(),
            constraints: DataStore::new(),
            param_lookup: OnceLock::new(),
            var_lookup: OnceLock::new(),
            constraint_lookup: OnceLock::new(),
            has_hold_bounds: false,
            objective_sense: ObjectiveSense::default(),
            objective: Expression::default(),
            extension_data: HashMap::new(),
            backend: None,
            dirty: false,
            rng,
            label_counter: 0,
        }
    }

    /// Identity stamped into every reference this model hands out.
    pub fn id(&self) -> ModelId {
        self.id
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Resolves a general reference to its concrete, kind-specific form.
    ///
    /// Fails with `OwningModelMismatch` for references of another model,
    /// `InvalidReferenceKind` for an inconsistent kind tag and `NotFound`
    /// once the object has been deleted.
    pub fn resolve(&self, r: &GeneralRef) -> Result<ConcreteRef> {
        self.check_owner(r)?;
        let index = r.index()?;
        self.check_live(index)?;
        Ok(ConcreteRef::new(self.id, index))
    }

    /// Returns true if `r` belongs to this model and its object is alive.
    pub fn is_valid(&self, r: &GeneralRef) -> bool {
        self.resolve(r).is_ok()
    }

    pub(crate) fn check_owner(&self, r: &GeneralRef) -> Result<()> {
        if r.model() != self.id {
            return Err(ModelError::OwningModelMismatch);
        }
        Ok(())
    }

    pub(crate) fn check_live(&self, index: ObjectIndex) -> Result<()> {
        if let ObjectIndex::DependentParameter(i) = index {
            let group = self.dependent_params.get(i.object)?;
            if i.param >= group.object.dimension() {
                return Err(ModelError::NotFound(i.to_string()));
            }
            return Ok(());
        }
        with_data!(self, index, |data| {
            let _ = data;
            Ok(())
        })
    }

    /// Reference for `index` owned by this model.
    pub(crate) fn general(&self, index: ObjectIndex) -> GeneralRef {
        index.to_general(self.id)
    }

    /// Reference plus display name, for error messages and events.
    pub(crate) fn describe(&self, r: &GeneralRef) -> String {
        match self.name(r) {
            Ok(name) if !name.is_empty() => format!("{r} '{name}'"),
            _ => r.to_string(),
        }
    }

    // Typed object access.

    pub fn independent_parameter(&self, r: &GeneralRef) -> Result<&IndependentParameter> {
        match self.resolve(r)?.index() {
            ObjectIndex::IndependentParameter(i) => Ok(&self.independent_params.get(i)?.object),
            _ => Err(wrong_kind(r, RefKind::IndependentParameter)),
        }
    }

    /// The group of a dependent parameter; accepts the group reference or
    /// a reference to any of its parameters.
    pub fn dependent_parameters(&self, r: &GeneralRef) -> Result<&DependentParameters> {
        match self.resolve(r)?.index() {
            ObjectIndex::DependentParameters(i) => Ok(&self.dependent_params.get(i)?.object),
            ObjectIndex::DependentParameter(i) => {
                Ok(&self.dependent_params.get(i.object)?.object)
            }
            _ => Err(wrong_kind(r, RefKind::DependentParameters)),
        }
    }

    pub fn finite_parameter(&self, r: &GeneralRef) -> Result<&FiniteParameter> {
        match self.resolve(r)?.index() {
            ObjectIndex::FiniteParameter(i) => Ok(&self.finite_params.get(i)?.object),
            _ => Err(wrong_kind(r, RefKind::FiniteParameter)),
        }
    }

    pub fn infinite_variable(&self, r: &GeneralRef) -> Result<&InfiniteVariable> {
        match self.resolve(r)?.index() {
            ObjectIndex::InfiniteVariable(i) => Ok(&self.infinite_vars.get(i)?.object),
            _ => Err(wrong_kind(r, RefKind::InfiniteVariable)),
        }
    }

    pub fn reduced_variable(&self, r: &GeneralRef) -> Result<&ReducedVariable> {
        match self.resolve(r)?.index() {
            ObjectIndex::ReducedVariable(i) => Ok(&self.reduced_vars.get(i)?.object),
            _ => Err(wrong_kind(r, RefKind::ReducedVariable)),
        }
    }

    pub fn point_variable(&self, r: &GeneralRef) -> Result<&PointVariable> {
        match self.resolve(r)?.index() {
            ObjectIndex::PointVariable(i) => Ok(&self.point_vars.get(i)?.object),
            _ => Err(wrong_kind(r, RefKind::PointVariable)),
        }
    }

    pub fn hold_variable(&self, r: &GeneralRef) -> Result<&HoldVariable> {
        match self.resolve(r)?.index() {
            ObjectIndex::HoldVariable(i) => Ok(&self.hold_vars.get(i)?.object),
            _ => Err(wrong_kind(r, RefKind::HoldVariable)),
        }
    }

    pub fn measure(&self, r: &GeneralRef) -> Result<&Measure> {
        match self.resolve(r)?.index() {
            ObjectIndex::Measure(i) => Ok(&self.measures.get(i)?.object),
            _ => Err(wrong_kind(r, RefKind::Measure)),
        }
    }

    pub fn constraint(&self, r: &GeneralRef) -> Result<&Constraint> {
        match self.resolve(r)?.index() {
            ObjectIndex::Constraint(i) => Ok(&self.constraints.get(i)?.object),
            _ => Err(wrong_kind(r, RefKind::Constraint)),
        }
    }

    // Counts and iteration.

    /// Number of individual parameters, dependent ones counted one by one.
    pub fn num_parameters(&self) -> usize {
        let dependent: usize = self
            .dependent_params
            .iter()
            .map(|(_, data)| data.object.dimension())
            .sum();
        self.independent_params.len() + dependent + self.finite_params.len()
    }

    pub fn num_variables(&self) -> usize {
        self.infinite_vars.len()
            + self.reduced_vars.len()
            + self.point_vars.len()
            + self.hold_vars.len()
    }

    pub fn num_measures(&self) -> usize {
        self.measures.len()
    }

    /// Number of constraints, info constraints included.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Independent, then individual dependent, then finite parameters.
    pub fn all_parameters(&self) -> Vec<GeneralRef> {
        let mut refs: Vec<GeneralRef> = self
            .independent_params
            .indices()
            .map(|i| self.general(ObjectIndex::IndependentParameter(i)))
            .collect();
        for (index, data) in self.dependent_params.iter() {
            refs.extend((0..data.object.dimension()).map(|param| {
                GeneralRef::new(
                    self.id,
                    RefKind::DependentParameter,
                    index.value(),
                    Some(param),
                )
            }));
        }
        refs.extend(
            self.finite_params
                .indices()
                .map(|i| self.general(ObjectIndex::FiniteParameter(i))),
        );
        refs
    }

    /// Infinite, reduced, point, then hold variables.
    pub fn all_variables(&self) -> Vec<GeneralRef> {
        let infinite = self
            .infinite_vars
            .indices()
            .map(ObjectIndex::InfiniteVariable);
        let reduced = self.reduced_vars.indices().map(ObjectIndex::ReducedVariable);
        let point = self.point_vars.indices().map(ObjectIndex::PointVariable);
        let hold = self.hold_vars.indices().map(ObjectIndex::HoldVariable);
        infinite
            .chain(reduced)
            .chain(point)
            .chain(hold)
            .map(|index| self.general(index))
            .collect()
    }

    pub fn all_measures(&self) -> Vec<GeneralRef> {
        self.measures
            .indices()
            .map(|i| self.general(ObjectIndex::Measure(i)))
            .collect()
    }

    pub fn all_constraints(&self) -> Vec<GeneralRef> {
        self.constraints
            .indices()
            .map(|i| self.general(ObjectIndex::Constraint(i)))
            .collect()
    }

    /// Returns true if any hold variable carries non-empty parameter bounds.
    pub fn has_hold_bounds(&self) -> bool {
        self.has_hold_bounds
    }

    // Transcription state.

    /// Returns true if the model changed since the last transcription.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears the dirty flag; called by the transcription step.
    pub fn mark_transcribed(&mut self) {
        self.dirty = false;
    }

    pub(crate) fn touch(&mut self) {
        self.dirty = true;
    }

    /// Installs the transcription target; the model becomes dirty.
    pub fn set_backend(&mut self, backend: Box<dyn TranscriptionBackend>) {
        self.backend = Some(backend);
        self.touch();
    }

    pub fn backend(&self) -> Option<&dyn TranscriptionBackend> {
        self.backend.as_deref()
    }

    pub fn take_backend(&mut self) -> Option<Box<dyn TranscriptionBackend>> {
        self.backend.take()
    }

    // Extension data, keyed by type.

    /// Stores `value`, returning the previous value of the same type.
    pub fn set_extension_data<T: Any + Send + Sync>(&mut self, value: T) -> Option<T> {
        self.extension_data
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    pub fn extension_data<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.extension_data
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    pub fn extension_data_mut<T: Any + Send + Sync>(&mut self) -> Option<&mut T> {
        self.extension_data
            .get_mut(&TypeId::of::<T>())
            .and_then(|value| value.downcast_mut::<T>())
    }

    pub fn remove_extension_data<T: Any + Send + Sync>(&mut self) -> Option<T> {
        self.extension_data
            .remove(&TypeId::of::<T>())
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value)
    }

    // Name lookup caches.

    pub(crate) fn invalidate_names(&mut self) {
        self.param_lookup.take();
        self.var_lookup.take();
        self.constraint_lookup.take();
    }

    /// Next model-unique `Generated` support label.
    pub fn generate_unique_label(&mut self) -> SupportLabel {
        self.label_counter += 1;
        SupportLabel::Generated(self.label_counter)
    }
}

impl Default for InfiniteModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InfiniteModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfiniteModel")
            .field("id", &self.id)
            .field("parameters", &self.num_parameters())
            .field("variables", &self.num_variables())
            .field("measures", &self.num_measures())
            .field("constraints", &self.num_constraints())
            .field("objective_sense", &self.objective_sense)
            .field("dirty", &self.dirty)
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

pub(crate) fn wrong_kind(r: &GeneralRef, expected: RefKind) -> ModelError {
    ModelError::InvalidReferenceKind(format!(
        "expected {}, found {}",
        expected.name(),
        r.kind().name()
    ))
}

#[cfg(test)]
mod tests;
