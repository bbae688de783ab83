//! Data objects: the wrappers stored in every object store.
//!
//! An [`ObjectData`] owns the raw object, its display name and the
//! back-references of every object that embeds it ([`Dependents`]). Dependent
//! lists are set-like: inserting twice is a no-op and removing an absent entry
//! is idempotent.

use std::fmt;

use smallvec::SmallVec;

use crate::constraint::Constraint;
use crate::measure::Measure;
use crate::parameter::{DependentParameters, FiniteParameter, IndependentParameter};
use crate::reference::{GeneralRef, ModelId, ObjectIndex};
use crate::store::{
    ConstraintIndex, ConstraintKind, DependentParametersKind, FiniteParameterKind,
    HoldVariableIndex, HoldVariableKind, IndependentParameterKind, Index, InfiniteVariableIndex,
    InfiniteVariableKind, MeasureIndex, MeasureKind, ObjectKind, ObjectStore, PointVariableIndex,
    PointVariableKind, ReducedVariableIndex, ReducedVariableKind,
};
use crate::variable::{HoldVariable, InfiniteVariable, PointVariable, ReducedVariable};

/// Associates each store kind with the raw object it holds and any
/// kind-specific bookkeeping.
pub trait StoredKind: ObjectKind {
    /// The raw mathematical object.
    type Object: fmt::Debug + Send + Sync;
    /// Extra per-kind bookkeeping owned by the data object.
    type Extra: fmt::Debug + Default + Send + Sync;
}

impl StoredKind for IndependentParameterKind {
    type Object = IndependentParameter;
    type Extra = ();
}

impl StoredKind for DependentParametersKind {
    type Object = DependentParameters;
    /// Display names of the individual parameters.
    type Extra = Vec<String>;
}

impl StoredKind for FiniteParameterKind {
    type Object = FiniteParameter;
    type Extra = ();
}

impl StoredKind for InfiniteVariableKind {
    type Object = InfiniteVariable;
    type Extra = InfoConstraints;
}

impl StoredKind for ReducedVariableKind {
    type Object = ReducedVariable;
    type Extra = ();
}

impl StoredKind for PointVariableKind {
    type Object = PointVariable;
    type Extra = InfoConstraints;
}

impl StoredKind for HoldVariableKind {
    type Object = HoldVariable;
    type Extra = InfoConstraints;
}

impl StoredKind for MeasureKind {
    type Object = Measure;
    type Extra = ();
}

impl StoredKind for ConstraintKind {
    type Object = Constraint;
    /// Set when the constraint encodes a variable's bound, fix or integrality.
    type Extra = Option<InfoOwner>;
}

/// Store of data objects of kind `K`.
pub type DataStore<K> = ObjectStore<K, ObjectData<K>>;

/// Wrapper stored for every raw object.
pub struct ObjectData<K: StoredKind> {
    pub(crate) object: K::Object,
    pub(crate) name: String,
    pub(crate) dependents: Dependents,
    pub(crate) extra: K::Extra,
}

impl<K: StoredKind> ObjectData<K> {
    pub(crate) fn new(object: K::Object, name: impl Into<String>) -> Self {
        Self {
            object,
            name: name.into(),
            dependents: Dependents::default(),
            extra: K::Extra::default(),
        }
    }

    /// The raw object.
    pub fn object(&self) -> &K::Object {
        &self.object
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Objects referencing this one.
    pub fn dependents(&self) -> &Dependents {
        &self.dependents
    }

    /// Kind-specific bookkeeping.
    pub fn extra(&self) -> &K::Extra {
        &self.extra
    }
}

impl<K: StoredKind> fmt::Debug for ObjectData<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectData")
            .field("kind", &K::NAME)
            .field("name", &self.name)
            .field("object", &self.object)
            .field("dependents", &self.dependents)
            .field("extra", &self.extra)
            .finish()
    }
}

/// Which info constraint a constraint stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoConstraintKind {
    LowerBound,
    UpperBound,
    Fix,
    Integrality,
}

/// Back-reference from an info constraint to its variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoOwner {
    pub variable: ObjectIndex,
    pub kind: InfoConstraintKind,
}

/// At most one info constraint of each kind per variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InfoConstraints {
    pub lower_bound: Option<ConstraintIndex>,
    pub upper_bound: Option<ConstraintIndex>,
    pub fix: Option<ConstraintIndex>,
    pub integrality: Option<ConstraintIndex>,
}

impl InfoConstraints {
    /// The slot for `kind`.
    pub fn get(&self, kind: InfoConstraintKind) -> Option<ConstraintIndex> {
        match kind {
            InfoConstraintKind::LowerBound => self.lower_bound,
            InfoConstraintKind::UpperBound => self.upper_bound,
            InfoConstraintKind::Fix => self.fix,
            InfoConstraintKind::Integrality => self.integrality,
        }
    }

    pub(crate) fn slot_mut(&mut self, kind: InfoConstraintKind) -> &mut Option<ConstraintIndex> {
        match kind {
            InfoConstraintKind::LowerBound => &mut self.lower_bound,
            InfoConstraintKind::UpperBound => &mut self.upper_bound,
            InfoConstraintKind::Fix => &mut self.fix,
            InfoConstraintKind::Integrality => &mut self.integrality,
        }
    }

    /// All populated slots.
    pub fn iter(&self) -> impl Iterator<Item = ConstraintIndex> {
        [self.lower_bound, self.upper_bound, self.fix, self.integrality]
            .into_iter()
            .flatten()
    }

    /// Returns true if `index` is one of the slots.
    pub fn contains(&self, index: ConstraintIndex) -> bool {
        self.iter().any(|c| c == index)
    }
}

/// Identity of an object that embeds references to others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dependent {
    InfiniteVariable(InfiniteVariableIndex),
    ReducedVariable(ReducedVariableIndex),
    PointVariable(PointVariableIndex),
    HoldVariable(HoldVariableIndex),
    Measure(MeasureIndex),
    Constraint(ConstraintIndex),
}

impl Dependent {
    /// The category this dependent is filed under.
    pub fn kind(&self) -> DependentKind {
        match self {
            Dependent::InfiniteVariable(_) => DependentKind::InfiniteVariable,
            Dependent::ReducedVariable(_) => DependentKind::ReducedVariable,
            Dependent::PointVariable(_) => DependentKind::PointVariable,
            Dependent::HoldVariable(_) => DependentKind::HoldVariable,
            Dependent::Measure(_) => DependentKind::Measure,
            Dependent::Constraint(_) => DependentKind::Constraint,
        }
    }

    /// The dependent as a typed object index.
    pub fn index(&self) -> ObjectIndex {
        match *self {
            Dependent::InfiniteVariable(i) => ObjectIndex::InfiniteVariable(i),
            Dependent::ReducedVariable(i) => ObjectIndex::ReducedVariable(i),
            Dependent::PointVariable(i) => ObjectIndex::PointVariable(i),
            Dependent::HoldVariable(i) => ObjectIndex::HoldVariable(i),
            Dependent::Measure(i) => ObjectIndex::Measure(i),
            Dependent::Constraint(i) => ObjectIndex::Constraint(i),
        }
    }

    /// The dependent as a general reference owned by `model`.
    pub fn to_general(&self, model: ModelId) -> GeneralRef {
        self.index().to_general(model)
    }
}

/// Dependent categories queried through `dependents_of`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DependentKind {
    InfiniteVariable,
    ReducedVariable,
    PointVariable,
    HoldVariable,
    Measure,
    Constraint,
}

impl DependentKind {
    pub const ALL: [DependentKind; 6] = [
        DependentKind::InfiniteVariable,
        DependentKind::ReducedVariable,
        DependentKind::PointVariable,
        DependentKind::HoldVariable,
        DependentKind::Measure,
        DependentKind::Constraint,
    ];

    /// Plural label used in `ObjectInUse` messages.
    pub fn label(self) -> &'static str {
        match self {
            DependentKind::InfiniteVariable => "infinite variable(s)",
            DependentKind::ReducedVariable => "reduced variable(s)",
            DependentKind::PointVariable => "point variable(s)",
            DependentKind::HoldVariable => "hold variable(s)",
            DependentKind::Measure => "measure(s)",
            DependentKind::Constraint => "constraint(s)",
        }
    }
}

/// Insertion-ordered set of indices of one kind.
pub struct DependencyList<K> {
    items: SmallVec<[Index<K>; 4]>,
}

impl<K: ObjectKind> DependencyList<K> {
    /// Adds `index`; returns false if it was already present.
    pub fn insert(&mut self, index: Index<K>) -> bool {
        if self.items.contains(&index) {
            return false;
        }
        self.items.push(index);
        true
    }

    /// Removes `index`; returns false if it was absent.
    pub fn remove(&mut self, index: Index<K>) -> bool {
        match self.items.iter().position(|i| *i == index) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, index: Index<K>) -> bool {
        self.items.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Index<K>> + Clone + '_ {
        self.items.iter().copied()
    }
}

impl<K> Default for DependencyList<K> {
    fn default() -> Self {
        Self {
            items: SmallVec::new(),
        }
    }
}

impl<K> Clone for DependencyList<K> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<K: ObjectKind> fmt::Debug for DependencyList<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.items.iter().map(|i| i.value()))
            .finish()
    }
}

/// Back-references of one object, partitioned by dependent kind.
#[derive(Debug, Clone, Default)]
pub struct Dependents {
    infinite_variables: DependencyList<InfiniteVariableKind>,
    reduced_variables: DependencyList<ReducedVariableKind>,
    point_variables: DependencyList<PointVariableKind>,
    hold_variables: DependencyList<HoldVariableKind>,
    measures: DependencyList<MeasureKind>,
    constraints: DependencyList<ConstraintKind>,
    in_objective: bool,
}

impl Dependents {
    /// Records `dependent`; returns false if it was already recorded.
    pub(crate) fn insert(&mut self, dependent: Dependent) -> bool {
        match dependent {
            Dependent::InfiniteVariable(i) => self.infinite_variables.insert(i),
            Dependent::ReducedVariable(i) => self.reduced_variables.insert(i),
            Dependent::PointVariable(i) => self.point_variables.insert(i),
            Dependent::HoldVariable(i) => self.hold_variables.insert(i),
            Dependent::Measure(i) => self.measures.insert(i),
            Dependent::Constraint(i) => self.constraints.insert(i),
        }
    }

    /// Forgets `dependent`; idempotent.
    pub(crate) fn remove(&mut self, dependent: Dependent) -> bool {
        match dependent {
            Dependent::InfiniteVariable(i) => self.infinite_variables.remove(i),
            Dependent::ReducedVariable(i) => self.reduced_variables.remove(i),
            Dependent::PointVariable(i) => self.point_variables.remove(i),
            Dependent::HoldVariable(i) => self.hold_variables.remove(i),
            Dependent::Measure(i) => self.measures.remove(i),
            Dependent::Constraint(i) => self.constraints.remove(i),
        }
    }

    pub(crate) fn set_in_objective(&mut self, value: bool) {
        self.in_objective = value;
    }

    /// Returns true if `dependent` is recorded.
    pub fn contains(&self, dependent: Dependent) -> bool {
        match dependent {
            Dependent::InfiniteVariable(i) => self.infinite_variables.contains(i),
            Dependent::ReducedVariable(i) => self.reduced_variables.contains(i),
            Dependent::PointVariable(i) => self.point_variables.contains(i),
            Dependent::HoldVariable(i) => self.hold_variables.contains(i),
            Dependent::Measure(i) => self.measures.contains(i),
            Dependent::Constraint(i) => self.constraints.contains(i),
        }
    }

    /// Number of recorded dependents of `kind`.
    pub fn count(&self, kind: DependentKind) -> usize {
        match kind {
            DependentKind::InfiniteVariable => self.infinite_variables.len(),
            DependentKind::ReducedVariable => self.reduced_variables.len(),
            DependentKind::PointVariable => self.point_variables.len(),
            DependentKind::HoldVariable => self.hold_variables.len(),
            DependentKind::Measure => self.measures.len(),
            DependentKind::Constraint => self.constraints.len(),
        }
    }

    /// Dependents of `kind` in the order they were recorded.
    pub fn of_kind(&self, kind: DependentKind) -> Vec<Dependent> {
        match kind {
            DependentKind::InfiniteVariable => self
                .infinite_variables
                .iter()
                .map(Dependent::InfiniteVariable)
                .collect(),
            DependentKind::ReducedVariable => self
                .reduced_variables
                .iter()
                .map(Dependent::ReducedVariable)
                .collect(),
            DependentKind::PointVariable => self
                .point_variables
                .iter()
                .map(Dependent::PointVariable)
                .collect(),
            DependentKind::HoldVariable => self
                .hold_variables
                .iter()
                .map(Dependent::HoldVariable)
                .collect(),
            DependentKind::Measure => self.measures.iter().map(Dependent::Measure).collect(),
            DependentKind::Constraint => {
                self.constraints.iter().map(Dependent::Constraint).collect()
            }
        }
    }

    /// Every dependent, grouped by kind in [`DependentKind::ALL`] order.
    pub fn all(&self) -> Vec<Dependent> {
        DependentKind::ALL
            .iter()
            .flat_map(|kind| self.of_kind(*kind))
            .collect()
    }

    /// Returns true if no dependents of any kind are recorded.
    pub fn is_empty(&self) -> bool {
        DependentKind::ALL.iter().all(|kind| self.count(*kind) == 0)
    }

    /// Returns true if the objective references the object.
    pub fn in_objective(&self) -> bool {
        self.in_objective
    }

    /// Non-empty kinds with their counts, skipping dependents for which
    /// `ignore` returns true.
    pub(crate) fn blockers(
        &self,
        ignore: impl Fn(Dependent) -> bool,
    ) -> Vec<(&'static str, usize)> {
        DependentKind::ALL
            .iter()
            .filter_map(|kind| {
                let count = self
                    .of_kind(*kind)
                    .into_iter()
                    .filter(|d| !ignore(*d))
                    .count();
                (count > 0).then(|| (kind.label(), count))
            })
            .collect()
    }
}
