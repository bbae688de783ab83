//! infopt - Model store for infinite-dimensional optimization in Rust
//!
//! Build a model of parameters, variables, measures and constraints; the
//! store keeps references stable and the dependency graph consistent while
//! the model is edited.
//!
//! # Example
//!
//! ```rust
//! use infopt::prelude::*;
//!
//! let mut model = InfiniteModel::new();
//! let t = model.insert_parameter(IndependentParameter::new(IntervalDomain::new(0.0, 1.0)?), "t")?;
//! model.add_supports(&t, &[0.0, 1.0], SupportLabel::UserDefined)?;
//! let y = model.insert_variable(InfiniteVariable::new(vec![t]), "y")?;
//! let y_mid = model.insert_variable(PointVariable::new(y, vec![0.5]), "y_mid")?;
//! model.set_objective(ObjectiveSense::Minimize, y_mid)?;
//!
//! assert_eq!(model.num_supports(&t)?, 3);
//! assert!(model.delete(&t).is_err());
//! # Ok::<(), ModelError>(())
//! ```

// Model container
pub use infopt_core::model::{InfiniteModel, ObjectiveSense, TranscriptionBackend};

// References
pub use infopt_core::reference::{ConcreteRef, GeneralRef, ModelId, RefKind};

// Parameters, domains and supports
pub use infopt_core::domain::{
    InfiniteArrayDomain, InfiniteScalarDomain, IntervalDomain, JointDistribution,
    MultivariateNormal, UnivariateDistribution,
};
pub use infopt_core::parameter::{
    DependentParameters, FiniteParameter, IndependentParameter, LabelSet, Parameter,
    ParameterSet, SupportFilter, SupportLabel,
};

// Variables
pub use infopt_core::variable::{
    HoldVariable, InfiniteVariable, Integrality, PointVariable, ReducedVariable, Variable,
    VariableInfo,
};

// Expressions, measures and constraints
pub use infopt_core::bounds::ParameterBounds;
pub use infopt_core::constraint::{Constraint, ConstraintSet};
pub use infopt_core::expression::{AffineExpr, Expression, ExpressionKind, FromExpression, QuadExpr};
pub use infopt_core::measure::{Measure, MeasureData, WeightFunction};

// Dependency graph inspection
pub use infopt_core::data::{DependentKind, Dependents, InfoConstraintKind};

// Errors
pub use infopt_core::error::{ModelError, Result};

// Configuration
pub use infopt_config::{ConfigError, DeletionPolicy, ModelConfig, SupportConfig};

#[cfg(feature = "console")]
pub mod console;

pub mod prelude {
    pub use super::{InfiniteModel, ObjectiveSense};
    pub use super::{GeneralRef, RefKind};
    pub use super::{
        DependentParameters, FiniteParameter, IndependentParameter, InfiniteArrayDomain,
        IntervalDomain, SupportFilter, SupportLabel, UnivariateDistribution,
    };
    pub use super::{
        HoldVariable, InfiniteVariable, Integrality, PointVariable, ReducedVariable,
        VariableInfo,
    };
    pub use super::{
        AffineExpr, Constraint, ConstraintSet, Expression, Measure, MeasureData,
        ParameterBounds, QuadExpr,
    };
    pub use super::{DeletionPolicy, DependentKind, ModelConfig, ModelError};
}
