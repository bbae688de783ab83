//! Time-indexed fixture.
//!
//! `t ∈ [0, 1]` carries user supports at both ends, `y(t)` is an infinite
//! variable, `y_mid = y(0.5)` its point evaluation and the objective
//! minimizes `y_mid`.

use infopt_core::prelude::*;

pub struct DynamicFixture {
    pub model: InfiniteModel,
    pub t: GeneralRef,
    pub y: GeneralRef,
    pub y_mid: GeneralRef,
}

impl DynamicFixture {
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    /// Same model under a custom configuration, e.g. cascading deletes.
    pub fn with_config(config: ModelConfig) -> Self {
        let mut model = InfiniteModel::with_config(config);
        let t = model
            .insert_parameter(IndependentParameter::new(crate::unit_interval()), "t")
            .expect("time parameter");
        model
            .add_supports(&t, &[0.0, 1.0], SupportLabel::UserDefined)
            .expect("supports inside [0, 1]");
        let y = model
            .insert_variable(InfiniteVariable::new(vec![t]), "y")
            .expect("infinite variable over t");
        let y_mid = model
            .insert_variable(PointVariable::new(y, vec![0.5]), "y_mid")
            .expect("point inside [0, 1]");
        model
            .set_objective(ObjectiveSense::Minimize, y_mid)
            .expect("point variable is finite");
        Self { model, t, y, y_mid }
    }
}

impl Default for DynamicFixture {
    fn default() -> Self {
        Self::new()
    }
}
