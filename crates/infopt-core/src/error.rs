//! Error types for infopt model operations

use thiserror::Error;

/// Main error type for model store operations.
///
/// Every variant is detected synchronously at the offending call and leaves
/// the model unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// An index or name does not (or no longer) resolve to a live object.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A reference created by one model was used with another.
    #[error("Reference belongs to a different model")]
    OwningModelMismatch,

    /// A reference carries a kind tag that is inconsistent with its payload.
    #[error("Invalid reference kind: {0}")]
    InvalidReferenceKind(String),

    /// Deletion is blocked by live dependents.
    #[error("{object} is still used by {}", format_blockers(.blockers))]
    ObjectInUse {
        /// Description of the object that could not be deleted.
        object: String,
        /// Blocking dependent kinds with their counts.
        blockers: Vec<(&'static str, usize)>,
    },

    /// A support or parameter value lies outside a parameter's domain.
    #[error("Value {value} is outside the domain of {parameter}")]
    OutOfDomain {
        /// Description of the parameter.
        parameter: String,
        /// The offending value.
        value: f64,
    },

    /// Wrong number of values for a dependent group, tuple or point.
    #[error("Dimension mismatch: expected {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Merging parameter bounds produced an empty interval.
    #[error("Parameter bounds on {0} have an empty intersection")]
    EmptyIntersection(String),

    /// An interval was constructed with lower > upper (or a NaN endpoint).
    #[error("Invalid bounds: lower {lower} exceeds upper {upper}")]
    InvalidBounds { lower: f64, upper: f64 },

    /// A stored expression cannot be viewed as the requested narrower type.
    #[error("Type mismatch: cannot view {found} expression as {requested}")]
    TypeMismatch {
        found: &'static str,
        requested: &'static str,
    },

    /// A name lookup matched more than one object.
    #[error("Ambiguous name: multiple objects are named '{0}'")]
    AmbiguousName(String),

    /// An infinite-dimensional quantity was used where a finite one is required.
    #[error("Not finite: {0}")]
    NotFinite(String),

    /// Structurally invalid input for the requested operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

fn format_blockers(blockers: &[(&'static str, usize)]) -> String {
    blockers
        .iter()
        .map(|(kind, count)| format!("{count} {kind}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;
