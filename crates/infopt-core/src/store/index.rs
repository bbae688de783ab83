//! Typed indices identifying a slot in exactly one store.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker trait for the closed set of stored object kinds.
///
/// Kinds are uninhabited enums; they only exist to keep indices of different
/// stores from being mixed up.
pub trait ObjectKind: 'static {
    /// Human readable kind name used in messages.
    const NAME: &'static str;
}

macro_rules! object_kinds {
    ($($(#[$meta:meta])* $kind:ident => $alias:ident, $name:literal;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub enum $kind {}

            impl ObjectKind for $kind {
                const NAME: &'static str = $name;
            }

            #[doc = concat!("Index of a ", $name, ".")]
            pub type $alias = Index<$kind>;
        )*
    };
}

object_kinds! {
    /// Scalar infinite parameters.
    IndependentParameterKind => IndependentParameterIndex, "independent parameter";
    /// Groups of dependent infinite parameters.
    DependentParametersKind => DependentParametersIndex, "dependent parameter group";
    /// Finite (constant-valued) parameters.
    FiniteParameterKind => FiniteParameterIndex, "finite parameter";
    /// Infinite variables.
    InfiniteVariableKind => InfiniteVariableIndex, "infinite variable";
    /// Reduced infinite variables.
    ReducedVariableKind => ReducedVariableIndex, "reduced variable";
    /// Point variables.
    PointVariableKind => PointVariableIndex, "point variable";
    /// Hold (finite) variables.
    HoldVariableKind => HoldVariableIndex, "hold variable";
    /// Measures.
    MeasureKind => MeasureIndex, "measure";
    /// Constraints.
    ConstraintKind => ConstraintIndex, "constraint";
}

/// Opaque, copyable identity of one slot in the store of kind `K`.
///
/// Ordering follows insertion order within the store.
pub struct Index<K> {
    value: u64,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Index<K> {
    /// Wraps a raw store key.
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self {
            value,
            _kind: PhantomData,
        }
    }

    /// Returns the raw store key.
    #[inline]
    pub const fn value(&self) -> u64 {
        self.value
    }
}

impl<K> Clone for Index<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Index<K> {}

impl<K> PartialEq for Index<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<K> Eq for Index<K> {}

impl<K> PartialOrd for Index<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for Index<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<K> Hash for Index<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<K: ObjectKind> fmt::Debug for Index<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Index<{}>({})", K::NAME, self.value)
    }
}

impl<K: ObjectKind> fmt::Display for Index<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", K::NAME, self.value)
    }
}

/// One parameter inside a dependent parameter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DependentParameterIndex {
    /// The group the parameter belongs to.
    pub object: DependentParametersIndex,
    /// Position of the parameter within the group.
    pub param: usize,
}

impl DependentParameterIndex {
    /// Creates an index for parameter `param` of `object`.
    pub fn new(object: DependentParametersIndex, param: usize) -> Self {
        Self { object, param }
    }
}

impl fmt::Display for DependentParameterIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.object, self.param)
    }
}
