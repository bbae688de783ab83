//! Parameter insertion, supports and domains.

use tracing::{debug, trace};

use super::InfiniteModel;
use crate::data::{DependentKind, ObjectData};
use crate::domain::{GeneratedKind, InfiniteArrayDomain, InfiniteScalarDomain};
use crate::error::{ModelError, Result};
use crate::parameter::{
    DependentParameters, LabelSet, Parameter, ParameterSet, SupportColumns, SupportFilter,
    SupportLabel, Supports,
};
use crate::reference::{GeneralRef, ObjectIndex, RefKind};
use crate::store::{
    DependentParametersIndex, DependentParametersKind, FiniteParameterIndex,
    IndependentParameterIndex,
};

/// Parameter whose support storage an operation acts on.
#[derive(Debug, Clone, Copy)]
enum SupportTarget {
    Independent(IndependentParameterIndex),
    Group(DependentParametersIndex),
}

impl SupportTarget {
    fn index(self) -> ObjectIndex {
        match self {
            SupportTarget::Independent(i) => ObjectIndex::IndependentParameter(i),
            SupportTarget::Group(i) => ObjectIndex::DependentParameters(i),
        }
    }
}

/// Validated support insertion, applied once every value has been checked.
#[derive(Debug, Clone)]
pub(crate) enum StagedSupport {
    Scalar(IndependentParameterIndex, f64),
    Column(DependentParametersIndex, Vec<f64>),
}

impl InfiniteModel {
    /// Inserts an independent or finite parameter.
    ///
    /// Independent parameters without an explicit precision adopt the
    /// configured number of significant digits.
    pub fn insert_parameter(
        &mut self,
        param: impl Into<Parameter>,
        name: impl Into<String>,
    ) -> Result<GeneralRef> {
        let name = name.into();
        let index = match param.into() {
            Parameter::Independent(mut param) => {
                param.adopt_significant_digits(self.config().supports.significant_digits);
                let index = self.independent_params.insert(ObjectData::new(param, name.clone()));
                ObjectIndex::IndependentParameter(index)
            }
            Parameter::Finite(param) => {
                if !param.value().is_finite() {
                    return Err(ModelError::InvalidArgument(format!(
                        "finite parameter '{name}' needs a finite value, got {}",
                        param.value()
                    )));
                }
                let index = self.finite_params.insert(ObjectData::new(param, name.clone()));
                ObjectIndex::FiniteParameter(index)
            }
        };
        let r = self.general(index);
        debug!(event = "insert", kind = r.kind().name(), object = %r, name = %name);
        self.invalidate_names();
        self.touch();
        Ok(r)
    }

    /// Inserts a dependent parameter group and returns the group reference.
    ///
    /// Individual parameters are named `name[i]`; use
    /// [`dependent_parameter_refs`](Self::dependent_parameter_refs) to
    /// address them.
    pub fn insert_dependent_parameters(
        &mut self,
        mut params: DependentParameters,
        name: impl Into<String>,
    ) -> Result<GeneralRef> {
        let name = name.into();
        if params.dimension() == 0 {
            return Err(ModelError::InvalidArgument(format!(
                "dependent parameter group '{name}' is empty"
            )));
        }
        params.adopt_significant_digits(self.config().supports.significant_digits);
        let mut data: ObjectData<DependentParametersKind> =
            ObjectData::new(params, name.clone());
        data.extra = (0..data.object.dimension())
            .map(|i| format!("{name}[{i}]"))
            .collect();
        let index = self.dependent_params.insert(data);
        let r = self.general(ObjectIndex::DependentParameters(index));
        debug!(event = "insert", kind = r.kind().name(), object = %r, name = %name);
        self.invalidate_names();
        self.touch();
        Ok(r)
    }

    /// References of every parameter of a group, in group order.
    pub fn dependent_parameter_refs(&self, group: &GeneralRef) -> Result<Vec<GeneralRef>> {
        match self.resolve(group)?.index() {
            ObjectIndex::DependentParameters(i) => self.group_refs(i),
            ObjectIndex::DependentParameter(i) => self.group_refs(i.object),
            _ => Err(super::wrong_kind(group, RefKind::DependentParameters)),
        }
    }

    /// Characterizing set of an infinite parameter.
    pub fn parameter_set(&self, r: &GeneralRef) -> Result<ParameterSet<'_>> {
        match self.support_target(r)? {
            SupportTarget::Independent(i) => Ok(ParameterSet::Scalar(
                self.independent_params.get(i)?.object.domain(),
            )),
            SupportTarget::Group(i) => Ok(ParameterSet::Array(
                self.dependent_params.get(i)?.object.domain(),
            )),
        }
    }

    /// Adds one support to an independent parameter.
    ///
    /// Parameters of a dependent group take whole columns through
    /// [`add_supports`](Self::add_supports).
    pub fn add_support(&mut self, r: &GeneralRef, value: f64, label: SupportLabel) -> Result<()> {
        match self.support_target(r)? {
            SupportTarget::Independent(_) => self.add_supports(r, &[value], label),
            SupportTarget::Group(_) => Err(ModelError::InvalidArgument(format!(
                "{r} belongs to a dependent group; add a full column instead"
            ))),
        }
    }

    /// Adds supports with one label.
    ///
    /// For an independent parameter every value is a separate support. For
    /// a dependent group (or any of its parameters) `values` is one column
    /// holding a coordinate per parameter of the group. All values are
    /// checked before any is stored.
    pub fn add_supports(
        &mut self,
        r: &GeneralRef,
        values: &[f64],
        label: SupportLabel,
    ) -> Result<()> {
        let who = self.describe(r);
        let target = self.support_target(r)?;
        self.check_label_free(target, &label)?;
        let staged = match target {
            SupportTarget::Independent(i) => {
                let param = &self.independent_params.get(i)?.object;
                values
                    .iter()
                    .map(|v| Ok(StagedSupport::Scalar(i, param.check_value(*v, &who)?)))
                    .collect::<Result<Vec<_>>>()?
            }
            SupportTarget::Group(i) => {
                let group = &self.dependent_params.get(i)?.object;
                vec![StagedSupport::Column(i, group.check_column(values, &who)?)]
            }
        };
        self.apply_staged(staged, &label);
        Ok(())
    }

    /// Adds several columns to a dependent group with one label.
    pub fn add_support_columns(
        &mut self,
        r: &GeneralRef,
        columns: &[Vec<f64>],
        label: SupportLabel,
    ) -> Result<()> {
        let staged = self.stage_columns(r, columns)?;
        self.check_label_free(self.support_target(r)?, &label)?;
        self.apply_staged(staged, &label);
        Ok(())
    }

    /// Replaces every support of an independent parameter.
    ///
    /// Fails with `ObjectInUse` while a measure depends on the parameter.
    pub fn set_supports(
        &mut self,
        r: &GeneralRef,
        values: &[f64],
        label: SupportLabel,
    ) -> Result<()> {
        let i = match self.support_target(r)? {
            SupportTarget::Independent(i) => i,
            SupportTarget::Group(_) => {
                return Err(ModelError::InvalidArgument(format!(
                    "{r} belongs to a dependent group; use set_support_columns"
                )))
            }
        };
        self.check_no_measures(ObjectIndex::IndependentParameter(i))?;
        let who = self.describe(r);
        let param = &self.independent_params.get(i)?.object;
        let checked = values
            .iter()
            .map(|v| param.check_value(*v, &who))
            .collect::<Result<Vec<_>>>()?;

        let supports = self.independent_params.get_mut(i)?.object.supports_mut();
        supports.clear();
        for value in checked {
            supports.insert(value, label.clone());
        }
        trace!(event = "supports_set", parameter = %r, count = values.len(), label = %label);
        self.touch();
        Ok(())
    }

    /// Replaces every column of a dependent group.
    pub fn set_support_columns(
        &mut self,
        r: &GeneralRef,
        columns: &[Vec<f64>],
        label: SupportLabel,
    ) -> Result<()> {
        let staged = self.stage_columns(r, columns)?;
        if let SupportTarget::Group(i) = self.support_target(r)? {
            self.check_no_measures(ObjectIndex::DependentParameters(i))?;
            self.dependent_params.get_mut(i)?.object.supports_mut().clear();
        }
        self.apply_staged(staged, &label);
        Ok(())
    }

    /// Removes supports.
    ///
    /// `SupportFilter::All` clears everything and fails with `ObjectInUse`
    /// while a measure depends on the parameter. A label filter strips those
    /// labels and drops coordinates left without any label.
    pub fn delete_supports(&mut self, r: &GeneralRef, filter: SupportFilter) -> Result<()> {
        let target = self.support_target(r)?;
        match &filter {
            SupportFilter::All => {
                match target {
                    SupportTarget::Independent(i) => {
                        self.check_no_measures(ObjectIndex::IndependentParameter(i))?;
                        self.independent_params.get_mut(i)?.object.supports_mut().clear();
                    }
                    SupportTarget::Group(i) => {
                        self.check_no_measures(ObjectIndex::DependentParameters(i))?;
                        self.dependent_params.get_mut(i)?.object.supports_mut().clear();
                    }
                }
            }
            SupportFilter::Labels(labels) => {
                for label in labels {
                    self.strip_label(target, label)?;
                }
            }
        }
        trace!(event = "supports_delete", parameter = %r);
        self.touch();
        Ok(())
    }

    /// Supports of an infinite parameter passing `filter`.
    ///
    /// Independent parameters yield ascending coordinates; parameters of a
    /// dependent group yield their row in column order.
    pub fn supports(&self, r: &GeneralRef, filter: SupportFilter) -> Result<Supports<'_>> {
        match self.resolve(r)?.index() {
            ObjectIndex::IndependentParameter(i) => {
                Ok(self.independent_params.get(i)?.object.supports(filter))
            }
            ObjectIndex::DependentParameter(i) => Ok(self
                .dependent_params
                .get(i.object)?
                .object
                .supports(i.param, filter)),
            ObjectIndex::DependentParameters(_) => Err(ModelError::InvalidArgument(format!(
                "{r} is a group; use support_columns"
            ))),
            _ => Err(not_infinite(r)),
        }
    }

    /// Support columns of a dependent group passing `filter`.
    pub fn support_columns(
        &self,
        r: &GeneralRef,
        filter: SupportFilter,
    ) -> Result<SupportColumns<'_>> {
        match self.support_target(r)? {
            SupportTarget::Group(i) => {
                Ok(self.dependent_params.get(i)?.object.support_columns(filter))
            }
            SupportTarget::Independent(_) => Err(ModelError::InvalidArgument(format!(
                "{r} is not part of a dependent group"
            ))),
        }
    }

    /// Number of supports; every parameter of a group reports the group's
    /// column count.
    pub fn num_supports(&self, r: &GeneralRef) -> Result<usize> {
        match self.support_target(r)? {
            SupportTarget::Independent(i) => {
                Ok(self.independent_params.get(i)?.object.num_supports())
            }
            SupportTarget::Group(i) => Ok(self.dependent_params.get(i)?.object.num_supports()),
        }
    }

    pub fn has_supports(&self, r: &GeneralRef) -> Result<bool> {
        Ok(self.num_supports(r)? > 0)
    }

    /// Every label carried by at least one support.
    pub fn support_labels(&self, r: &GeneralRef) -> Result<LabelSet> {
        match self.support_target(r)? {
            SupportTarget::Independent(i) => {
                Ok(self.independent_params.get(i)?.object.support_storage().labels())
            }
            SupportTarget::Group(i) => {
                Ok(self.dependent_params.get(i)?.object.support_storage().labels())
            }
        }
    }

    /// Generates `num` supports (the configured default when `None`).
    ///
    /// Interval domains get a uniform grid including both endpoints,
    /// labelled `UniformGrid`; distributions get random samples labelled
    /// `McSample`. Collection domains of a group are generated per dimension
    /// and zipped into columns. Returns the number of new coordinates.
    pub fn fill_in_supports(&mut self, r: &GeneralRef, num: Option<usize>) -> Result<usize> {
        let num = num.unwrap_or(self.config().supports.default_num_supports);
        if num == 0 {
            return Err(ModelError::InvalidArgument(
                "number of supports must be positive".to_string(),
            ));
        }
        let who = self.describe(r);
        let target = self.support_target(r)?;
        let (staged, kind) = match target {
            SupportTarget::Independent(i) => {
                let param = &self.independent_params.get(i)?.object;
                let (values, kind) = param.domain().generate(num, &mut self.rng)?;
                let staged = values
                    .into_iter()
                    .map(|v| Ok(StagedSupport::Scalar(i, param.check_value(v, &who)?)))
                    .collect::<Result<Vec<_>>>()?;
                (staged, kind)
            }
            SupportTarget::Group(i) => {
                let group = &self.dependent_params.get(i)?.object;
                let (columns, kind) = group.domain().generate(num, &mut self.rng)?;
                let staged = columns
                    .iter()
                    .map(|c| Ok(StagedSupport::Column(i, group.check_column(c, &who)?)))
                    .collect::<Result<Vec<_>>>()?;
                (staged, kind)
            }
        };
        let label = match kind {
            GeneratedKind::Grid => SupportLabel::UniformGrid,
            GeneratedKind::Sample => SupportLabel::McSample,
        };
        let before = self.num_supports(r)?;
        self.apply_staged(staged, &label);
        Ok(self.num_supports(r)? - before)
    }

    /// Replaces the domain of an independent parameter.
    ///
    /// Fails with `ObjectInUse` while a measure depends on the parameter and
    /// with `OutOfDomain` if an existing support falls outside `domain`.
    pub fn set_infinite_domain(
        &mut self,
        r: &GeneralRef,
        domain: impl Into<InfiniteScalarDomain>,
    ) -> Result<()> {
        let i = match self.support_target(r)? {
            SupportTarget::Independent(i) => i,
            SupportTarget::Group(_) => {
                return Err(ModelError::InvalidArgument(format!(
                    "{r} belongs to a dependent group; use set_group_domain"
                )))
            }
        };
        self.check_no_measures(ObjectIndex::IndependentParameter(i))?;
        let domain = domain.into();
        let param = &self.independent_params.get(i)?.object;
        if let Some(value) = param.supports(SupportFilter::All).find(|v| !domain.contains(*v)) {
            return Err(ModelError::OutOfDomain {
                parameter: self.describe(r),
                value,
            });
        }
        self.independent_params.get_mut(i)?.object.set_domain(domain);
        debug!(event = "domain_set", parameter = %r);
        self.touch();
        Ok(())
    }

    /// Replaces the domain of a dependent group; the dimension must not
    /// change.
    pub fn set_group_domain(
        &mut self,
        r: &GeneralRef,
        domain: impl Into<InfiniteArrayDomain>,
    ) -> Result<()> {
        let i = match self.support_target(r)? {
            SupportTarget::Group(i) => i,
            SupportTarget::Independent(_) => {
                return Err(ModelError::InvalidArgument(format!(
                    "{r} is not part of a dependent group"
                )))
            }
        };
        self.check_no_measures(ObjectIndex::DependentParameters(i))?;
        let domain = domain.into();
        let group = &self.dependent_params.get(i)?.object;
        if domain.dimension() != group.dimension() {
            return Err(ModelError::DimensionMismatch {
                expected: group.dimension(),
                found: domain.dimension(),
            });
        }
        for column in group.support_columns(SupportFilter::All) {
            if let Some((dim, value)) = domain.first_violation(column) {
                return Err(ModelError::OutOfDomain {
                    parameter: format!("{}[{dim}]", self.describe(r)),
                    value,
                });
            }
        }
        self.dependent_params.get_mut(i)?.object.set_domain(domain);
        debug!(event = "domain_set", parameter = %r);
        self.touch();
        Ok(())
    }

    /// Value of a finite parameter.
    pub fn parameter_value(&self, r: &GeneralRef) -> Result<f64> {
        Ok(self.finite_params.get(self.finite_index(r)?)?.object.value())
    }

    /// Changes the value of a finite parameter.
    pub fn set_parameter_value(&mut self, r: &GeneralRef, value: f64) -> Result<()> {
        let i = self.finite_index(r)?;
        if !value.is_finite() {
            return Err(ModelError::InvalidArgument(format!(
                "finite parameter needs a finite value, got {value}"
            )));
        }
        self.finite_params.get_mut(i)?.object.set_value(value);
        debug!(event = "value_set", parameter = %r, value);
        self.touch();
        Ok(())
    }

    fn finite_index(&self, r: &GeneralRef) -> Result<FiniteParameterIndex> {
        match self.resolve(r)?.index() {
            ObjectIndex::FiniteParameter(i) => Ok(i),
            _ => Err(super::wrong_kind(r, RefKind::FiniteParameter)),
        }
    }

    fn support_target(&self, r: &GeneralRef) -> Result<SupportTarget> {
        match self.resolve(r)?.index() {
            ObjectIndex::IndependentParameter(i) => Ok(SupportTarget::Independent(i)),
            ObjectIndex::DependentParameters(i) => Ok(SupportTarget::Group(i)),
            ObjectIndex::DependentParameter(i) => Ok(SupportTarget::Group(i.object)),
            _ => Err(not_infinite(r)),
        }
    }

    /// Fails if a live measure on the target owns `label`.
    fn check_label_free(&self, target: SupportTarget, label: &SupportLabel) -> Result<()> {
        if self.measure_owns_label(target.index(), label)? {
            return Err(ModelError::InvalidArgument(format!(
                "label {label} belongs to a measure over {}",
                self.describe(&self.general(target.index()))
            )));
        }
        Ok(())
    }

    fn stage_columns(
        &self,
        r: &GeneralRef,
        columns: &[Vec<f64>],
    ) -> Result<Vec<StagedSupport>> {
        let who = self.describe(r);
        match self.support_target(r)? {
            SupportTarget::Group(i) => {
                let group = &self.dependent_params.get(i)?.object;
                columns
                    .iter()
                    .map(|c| Ok(StagedSupport::Column(i, group.check_column(c, &who)?)))
                    .collect()
            }
            SupportTarget::Independent(_) => Err(ModelError::InvalidArgument(format!(
                "{r} is not part of a dependent group"
            ))),
        }
    }

    /// Fails with `ObjectInUse` if a measure depends on the parameter.
    fn check_no_measures(&self, index: ObjectIndex) -> Result<()> {
        let count = self.dependents_at(index)?.count(DependentKind::Measure);
        if count > 0 {
            return Err(ModelError::ObjectInUse {
                object: self.describe(&self.general(index)),
                blockers: vec![(DependentKind::Measure.label(), count)],
            });
        }
        Ok(())
    }

    /// Validates a point given for a parameter tuple and stages the support
    /// insertions it implies.
    ///
    /// The tuple must already satisfy `check_parameter_tuple`.
    pub(crate) fn stage_point(
        &self,
        params: &[GeneralRef],
        values: &[f64],
    ) -> Result<Vec<StagedSupport>> {
        if values.len() != params.len() {
            return Err(ModelError::DimensionMismatch {
                expected: params.len(),
                found: values.len(),
            });
        }
        let mut staged = Vec::new();
        let mut pos = 0;
        while pos < params.len() {
            let r = &params[pos];
            match self.resolve(r)?.index() {
                ObjectIndex::IndependentParameter(i) => {
                    let param = &self.independent_params.get(i)?.object;
                    let value = param.check_value(values[pos], &self.describe(r))?;
                    staged.push(StagedSupport::Scalar(i, value));
                    pos += 1;
                }
                ObjectIndex::DependentParameter(i) => {
                    debug_assert_eq!(i.param, 0, "group must start at its first parameter");
                    let group = &self.dependent_params.get(i.object)?;
                    let dimension = group.object.dimension();
                    let column = group
                        .object
                        .check_column(&values[pos..pos + dimension], &group.name)?;
                    staged.push(StagedSupport::Column(i.object, column));
                    pos += dimension;
                }
                _ => return Err(not_infinite(r)),
            }
        }
        Ok(staged)
    }

    /// Stores staged supports; every target was validated while staging.
    pub(crate) fn apply_staged(&mut self, staged: Vec<StagedSupport>, label: &SupportLabel) {
        let count = staged.len();
        for support in staged {
            match support {
                StagedSupport::Scalar(i, value) => {
                    if let Ok(data) = self.independent_params.get_mut(i) {
                        data.object.supports_mut().insert(value, label.clone());
                    }
                }
                StagedSupport::Column(i, column) => {
                    if let Ok(data) = self.dependent_params.get_mut(i) {
                        data.object.supports_mut().insert(column, label.clone());
                    }
                }
            }
        }
        trace!(event = "supports_add", count, label = %label);
        self.touch();
    }

    /// Strips `label` from one parameter's supports.
    fn strip_label(&mut self, target: SupportTarget, label: &SupportLabel) -> Result<usize> {
        let dropped = match target {
            SupportTarget::Independent(i) => self
                .independent_params
                .get_mut(i)?
                .object
                .supports_mut()
                .remove_label(label),
            SupportTarget::Group(i) => self
                .dependent_params
                .get_mut(i)?
                .object
                .supports_mut()
                .remove_label(label),
        };
        Ok(dropped)
    }

    /// Strips a measure label from the parameter behind `r`.
    pub(crate) fn strip_label_from(
        &mut self,
        r: &GeneralRef,
        label: &SupportLabel,
    ) -> Result<usize> {
        let target = self.support_target(r)?;
        self.strip_label(target, label)
    }
}

fn not_infinite(r: &GeneralRef) -> ModelError {
    ModelError::InvalidArgument(format!("{r} is not an infinite parameter"))
}
