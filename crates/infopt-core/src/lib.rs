//! infopt Core - Model store for infinite-dimensional optimization
//!
//! This crate provides the mutable model that sits between modeling code and
//! transcription:
//! - Stable-key object stores, one per object kind
//! - General and typed references with dispatch to the owning store
//! - Data objects with dependent lists keeping the dependency graph consistent
//! - Parameters with sorted, provenance-labelled supports
//! - Measures, parameter bounds, constraints and the objective

pub mod bounds;
pub mod constraint;
pub mod data;
pub mod domain;
pub mod error;
pub mod expression;
pub mod measure;
pub mod model;
pub mod parameter;
pub mod reference;
pub mod store;
pub mod variable;

pub use bounds::ParameterBounds;
pub use constraint::{Constraint, ConstraintSet};
pub use data::{Dependent, DependentKind, Dependents, InfoConstraintKind, ObjectData};
pub use domain::{
    InfiniteArrayDomain, InfiniteScalarDomain, IntervalDomain, JointDistribution,
    MultivariateNormal, UnivariateDistribution,
};
pub use error::{ModelError, Result};
pub use expression::{AffineExpr, Expression, ExpressionKind, FromExpression, QuadExpr};
pub use measure::{Measure, MeasureData, WeightFunction};
pub use model::{InfiniteModel, ObjectiveSense, TranscriptionBackend};
pub use parameter::{
    DependentParameters, FiniteParameter, IndependentParameter, LabelSet, Parameter,
    ParameterSet, SupportFilter, SupportLabel,
};
pub use reference::{ConcreteRef, GeneralRef, ModelId, ObjectIndex, RefKind};
pub use variable::{
    HoldVariable, InfiniteVariable, Integrality, PointVariable, ReducedVariable, Variable,
    VariableInfo,
};

pub use infopt_config::{DeletionPolicy, ModelConfig};

pub mod prelude {
    pub use crate::{
        AffineExpr, Constraint, ConstraintSet, DeletionPolicy, DependentKind,
        DependentParameters, Expression, FiniteParameter, GeneralRef, HoldVariable,
        IndependentParameter, InfiniteArrayDomain, InfiniteModel, InfiniteVariable,
        Integrality, IntervalDomain, Measure, MeasureData, ModelConfig, ModelError,
        ObjectiveSense, ParameterBounds, PointVariable, QuadExpr, ReducedVariable, RefKind,
        SupportFilter, SupportLabel, UnivariateDistribution, VariableInfo,
    };
}
