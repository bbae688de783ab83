//! Tests for the model container.

mod deletion;
mod names;
mod objective;
mod parameters;
mod variables;

use crate::prelude::*;

pub(super) fn interval_param(
    model: &mut InfiniteModel,
    name: &str,
    lo: f64,
    hi: f64,
) -> GeneralRef {
    model
        .insert_parameter(IndependentParameter::new(IntervalDomain::new(lo, hi).unwrap()), name)
        .unwrap()
}

pub(super) fn finite_param(model: &mut InfiniteModel, name: &str, value: f64) -> GeneralRef {
    model.insert_parameter(FiniteParameter::new(value), name).unwrap()
}

/// Group of `dims` unit-interval parameters; returns the group and its members.
pub(super) fn unit_group(
    model: &mut InfiniteModel,
    name: &str,
    dims: usize,
) -> (GeneralRef, Vec<GeneralRef>) {
    let domain = InfiniteArrayDomain::collection(
        (0..dims)
            .map(|_| IntervalDomain::new(0.0, 1.0).unwrap().into())
            .collect(),
    )
    .unwrap();
    let group = model
        .insert_dependent_parameters(DependentParameters::new(domain), name)
        .unwrap();
    let members = model.dependent_parameter_refs(&group).unwrap();
    (group, members)
}

pub(super) fn infinite_var(
    model: &mut InfiniteModel,
    name: &str,
    params: &[GeneralRef],
) -> GeneralRef {
    model
        .insert_variable(InfiniteVariable::new(params.to_vec()), name)
        .unwrap()
}

pub(super) fn hold_var(model: &mut InfiniteModel, name: &str) -> GeneralRef {
    model.insert_variable(HoldVariable::new(), name).unwrap()
}

pub(super) fn quadrature() -> SupportLabel {
    SupportLabel::Custom("quadrature".to_string())
}

/// Two-point trapezoid over `[0, 1]` for one parameter.
pub(super) fn trapezoid(t: GeneralRef, label: SupportLabel) -> MeasureData {
    MeasureData::new(
        vec![t],
        vec![0.5, 0.5],
        vec![vec![0.0], vec![1.0]],
        label,
        "integral",
    )
    .unwrap()
}

pub(super) fn all_supports(model: &InfiniteModel, r: &GeneralRef) -> Vec<f64> {
    model.supports(r, SupportFilter::All).unwrap().collect()
}

pub(super) fn cascade_model() -> InfiniteModel {
    InfiniteModel::with_config(ModelConfig::new().with_deletion_policy(DeletionPolicy::Cascade))
}
