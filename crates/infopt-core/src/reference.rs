//! General and concrete references.
//!
//! A [`GeneralRef`] is the only handle allowed inside expressions: it erases
//! the object kind so parameters, variables and measures can be mixed in one
//! collection. Kind specific behavior resolves it to a [`ConcreteRef`] whose
//! [`ObjectIndex`] is matched exhaustively at every dispatch site.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{ModelError, Result};
use crate::model::InfiniteModel;
use crate::store::{
    ConstraintIndex, DependentParameterIndex, DependentParametersIndex, FiniteParameterIndex,
    HoldVariableIndex, IndependentParameterIndex, InfiniteVariableIndex, MeasureIndex,
    PointVariableIndex, ReducedVariableIndex,
};

static NEXT_MODEL_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one model instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModelId(u64);

impl ModelId {
    pub(crate) fn fresh() -> Self {
        Self(NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identity value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Kind tag carried by a [`GeneralRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RefKind {
    IndependentParameter,
    DependentParameters,
    DependentParameter,
    FiniteParameter,
    InfiniteVariable,
    ReducedVariable,
    PointVariable,
    HoldVariable,
    Measure,
    Constraint,
}

impl RefKind {
    /// Returns true for every parameter kind, finite ones included.
    pub fn is_parameter(self) -> bool {
        matches!(
            self,
            RefKind::IndependentParameter
                | RefKind::DependentParameters
                | RefKind::DependentParameter
                | RefKind::FiniteParameter
        )
    }

    /// Returns true for parameters that can carry supports.
    pub fn is_infinite_parameter(self) -> bool {
        matches!(
            self,
            RefKind::IndependentParameter | RefKind::DependentParameter
        )
    }

    /// Returns true for decision variable kinds.
    pub fn is_variable(self) -> bool {
        matches!(
            self,
            RefKind::InfiniteVariable
                | RefKind::ReducedVariable
                | RefKind::PointVariable
                | RefKind::HoldVariable
        )
    }

    /// Human readable kind name.
    pub fn name(self) -> &'static str {
        match self {
            RefKind::IndependentParameter => "independent parameter",
            RefKind::DependentParameters => "dependent parameter group",
            RefKind::DependentParameter => "dependent parameter",
            RefKind::FiniteParameter => "finite parameter",
            RefKind::InfiniteVariable => "infinite variable",
            RefKind::ReducedVariable => "reduced variable",
            RefKind::PointVariable => "point variable",
            RefKind::HoldVariable => "hold variable",
            RefKind::Measure => "measure",
            RefKind::Constraint => "constraint",
        }
    }
}

/// Kind-erased handle to any object of one model.
///
/// Two references are equal iff model, kind, raw index and sub-index match.
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
///
/// assert_eq!(t.kind(), RefKind::IndependentParameter);
/// assert_eq!(t.model(), model.id());
/// assert!(model.resolve(&t).is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeneralRef {
    model: ModelId,
    kind: RefKind,
    raw: u64,
    param_index: Option<usize>,
}

impl GeneralRef {
    /// Builds a reference from its raw parts.
    ///
    /// No validation happens here; [`InfiniteModel::resolve`] checks the
    /// parts against the model.
    pub fn new(model: ModelId, kind: RefKind, raw: u64, param_index: Option<usize>) -> Self {
        Self {
            model,
            kind,
            raw,
            param_index,
        }
    }

    /// The owning model.
    pub fn model(&self) -> ModelId {
        self.model
    }

    /// The kind tag.
    pub fn kind(&self) -> RefKind {
        self.kind
    }

    /// The raw store index.
    pub fn raw(&self) -> u64 {
        self.raw
    }

    /// Position inside a dependent parameter group, if any.
    pub fn param_index(&self) -> Option<usize> {
        self.param_index
    }

    /// Decodes the kind tag into a typed index without consulting a model.
    ///
    /// Fails with `InvalidReferenceKind` when the sub-index does not fit the
    /// tag: dependent parameters need one, every other kind must not have one.
    pub fn index(&self) -> Result<ObjectIndex> {
        let raw = self.raw;
        let index = match (self.kind, self.param_index) {
            (RefKind::DependentParameter, Some(param)) => ObjectIndex::DependentParameter(
                DependentParameterIndex::new(DependentParametersIndex::new(raw), param),
            ),
            (RefKind::DependentParameter, None) | (_, Some(_)) => {
                return Err(ModelError::InvalidReferenceKind(format!(
                    "{} with sub-index {:?}",
                    self.kind.name(),
                    self.param_index
                )))
            }
            (RefKind::IndependentParameter, None) => {
                ObjectIndex::IndependentParameter(IndependentParameterIndex::new(raw))
            }
            (RefKind::DependentParameters, None) => {
                ObjectIndex::DependentParameters(DependentParametersIndex::new(raw))
            }
            (RefKind::FiniteParameter, None) => {
                ObjectIndex::FiniteParameter(FiniteParameterIndex::new(raw))
            }
            (RefKind::InfiniteVariable, None) => {
                ObjectIndex::InfiniteVariable(InfiniteVariableIndex::new(raw))
            }
            (RefKind::ReducedVariable, None) => {
                ObjectIndex::ReducedVariable(ReducedVariableIndex::new(raw))
            }
            (RefKind::PointVariable, None) => {
                ObjectIndex::PointVariable(PointVariableIndex::new(raw))
            }
            (RefKind::HoldVariable, None) => ObjectIndex::HoldVariable(HoldVariableIndex::new(raw)),
            (RefKind::Measure, None) => ObjectIndex::Measure(MeasureIndex::new(raw)),
            (RefKind::Constraint, None) => ObjectIndex::Constraint(ConstraintIndex::new(raw)),
        };
        Ok(index)
    }
}

impl fmt::Display for GeneralRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.param_index {
            Some(param) => write!(f, "{} #{}[{}]", self.kind.name(), self.raw, param),
            None => write!(f, "{} #{}", self.kind.name(), self.raw),
        }
    }
}

/// Typed index of any stored object, one variant per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectIndex {
    IndependentParameter(IndependentParameterIndex),
    DependentParameters(DependentParametersIndex),
    DependentParameter(DependentParameterIndex),
    FiniteParameter(FiniteParameterIndex),
    InfiniteVariable(InfiniteVariableIndex),
    ReducedVariable(ReducedVariableIndex),
    PointVariable(PointVariableIndex),
    HoldVariable(HoldVariableIndex),
    Measure(MeasureIndex),
    Constraint(ConstraintIndex),
}

impl ObjectIndex {
    /// The kind tag of this index.
    pub fn kind(&self) -> RefKind {
        match self {
            ObjectIndex::IndependentParameter(_) => RefKind::IndependentParameter,
            ObjectIndex::DependentParameters(_) => RefKind::DependentParameters,
            ObjectIndex::DependentParameter(_) => RefKind::DependentParameter,
            ObjectIndex::FiniteParameter(_) => RefKind::FiniteParameter,
            ObjectIndex::InfiniteVariable(_) => RefKind::InfiniteVariable,
            ObjectIndex::ReducedVariable(_) => RefKind::ReducedVariable,
            ObjectIndex::PointVariable(_) => RefKind::PointVariable,
            ObjectIndex::HoldVariable(_) => RefKind::HoldVariable,
            ObjectIndex::Measure(_) => RefKind::Measure,
            ObjectIndex::Constraint(_) => RefKind::Constraint,
        }
    }

    /// Re-erases the kind into a [`GeneralRef`] owned by `model`.
    pub fn to_general(&self, model: ModelId) -> GeneralRef {
        let (raw, param_index) = match self {
            ObjectIndex::IndependentParameter(i) => (i.value(), None),
            ObjectIndex::DependentParameters(i) => (i.value(), None),
            ObjectIndex::DependentParameter(i) => (i.object.value(), Some(i.param)),
            ObjectIndex::FiniteParameter(i) => (i.value(), None),
            ObjectIndex::InfiniteVariable(i) => (i.value(), None),
            ObjectIndex::ReducedVariable(i) => (i.value(), None),
            ObjectIndex::PointVariable(i) => (i.value(), None),
            ObjectIndex::HoldVariable(i) => (i.value(), None),
            ObjectIndex::Measure(i) => (i.value(), None),
            ObjectIndex::Constraint(i) => (i.value(), None),
        };
        GeneralRef::new(model, self.kind(), raw, param_index)
    }
}

/// A resolved, kind-specific reference.
///
/// Produced by [`InfiniteModel::resolve`]; carries the owning model and the
/// typed index. The accessors take the model explicitly because references
/// never own or borrow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConcreteRef {
    model: ModelId,
    index: ObjectIndex,
}

impl ConcreteRef {
    pub(crate) fn new(model: ModelId, index: ObjectIndex) -> Self {
        Self { model, index }
    }

    /// The owning model.
    pub fn model(&self) -> ModelId {
        self.model
    }

    /// The typed index.
    pub fn index(&self) -> ObjectIndex {
        self.index
    }

    /// The kind tag.
    pub fn kind(&self) -> RefKind {
        self.index.kind()
    }

    /// Re-erases the kind.
    pub fn general(&self) -> GeneralRef {
        self.index.to_general(self.model)
    }

    /// Returns the display name of the referenced object.
    pub fn name<'m>(&self, model: &'m InfiniteModel) -> Result<&'m str> {
        model.name(&self.general())
    }

    /// Renames the referenced object.
    pub fn set_name(&self, model: &mut InfiniteModel, name: impl Into<String>) -> Result<()> {
        model.set_name(&self.general(), name)
    }

    /// Deletes the referenced object.
    pub fn delete(&self, model: &mut InfiniteModel) -> Result<()> {
        model.delete(&self.general())
    }

    /// Returns true if the referenced object is still alive in `model`.
    pub fn is_valid(&self, model: &InfiniteModel) -> bool {
        model.is_valid(&self.general())
    }
}
