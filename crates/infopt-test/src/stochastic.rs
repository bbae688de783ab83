//! Fixture with a random vector `xi` of three unit-interval parameters.
//!
//! `x(xi)` is an infinite variable, `e_x` its expectation over four equally
//! weighted scenarios and `cap` a constraint on the expectation.

use infopt_core::prelude::*;

/// Scenario points of `xi`, one row per scenario.
pub const SCENARIOS: [[f64; 3]; 4] = [
    [0.1, 0.2, 0.3],
    [0.4, 0.5, 0.6],
    [0.7, 0.8, 0.9],
    [1.0, 0.0, 0.5],
];

pub struct StochasticFixture {
    pub model: InfiniteModel,
    pub xi: GeneralRef,
    pub xi_members: Vec<GeneralRef>,
    pub x: GeneralRef,
    pub e_x: GeneralRef,
    pub cap: GeneralRef,
    pub label: SupportLabel,
}

impl StochasticFixture {
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    pub fn with_config(config: ModelConfig) -> Self {
        let mut model = InfiniteModel::with_config(config);
        let domain = InfiniteArrayDomain::collection(
            (0..3).map(|_| crate::unit_interval().into()).collect(),
        )
        .expect("three unit intervals");
        let xi = model
            .insert_dependent_parameters(DependentParameters::new(domain), "xi")
            .expect("dependent group");
        let xi_members = model.dependent_parameter_refs(&xi).expect("group members");
        let x = model
            .insert_variable(InfiniteVariable::new(xi_members.clone()), "x")
            .expect("infinite variable over xi");

        let label = model.generate_unique_label();
        let weight = 1.0 / SCENARIOS.len() as f64;
        let data = MeasureData::new(
            xi_members.clone(),
            vec![weight; SCENARIOS.len()],
            SCENARIOS.iter().map(|s| s.to_vec()).collect(),
            label.clone(),
            "expect",
        )
        .expect("one coefficient per scenario");
        let e_x = model
            .insert_measure(Measure::new(x, data), "e_x")
            .expect("scenarios inside the unit cube");
        let cap = model
            .insert_constraint(Constraint::new(e_x, ConstraintSet::LessThan(1.0)), "cap")
            .expect("measure constraint");

        Self {
            model,
            xi,
            xi_members,
            x,
            e_x,
            cap,
            label,
        }
    }
}

impl Default for StochasticFixture {
    fn default() -> Self {
        Self::new()
    }
}
