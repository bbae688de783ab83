//! Stable-key object stores.
//!
//! Every object kind of a model lives in its own [`ObjectStore`]. Inserting
//! hands out the next integer of a per-store counter wrapped in a typed
//! [`Index`]; deleting leaves a permanent hole. Indices are never reused and
//! surviving entries are never renumbered, so an index issued once either
//! resolves to the same object or fails with `NotFound` forever after.

mod index;

pub use index::{
    ConstraintIndex, ConstraintKind, DependentParameterIndex, DependentParametersIndex,
    DependentParametersKind, FiniteParameterIndex, FiniteParameterKind, HoldVariableIndex,
    HoldVariableKind, IndependentParameterIndex, IndependentParameterKind, Index,
    InfiniteVariableIndex, InfiniteVariableKind, MeasureIndex, MeasureKind, ObjectKind,
    PointVariableIndex, PointVariableKind, ReducedVariableIndex, ReducedVariableKind,
};

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use crate::error::{ModelError, Result};

/// Keyed collection with monotonically increasing, never reused keys.
///
/// # Example
///
/// ```
/// use infopt_core::store::{MeasureKind, ObjectStore};
///
/// let mut store: ObjectStore<MeasureKind, &str> = ObjectStore::new();
/// let a = store.insert("a");
/// let b = store.insert("b");
/// store.delete(a).unwrap();
///
/// assert!(store.get(a).is_err());
/// assert_eq!(*store.get(b).unwrap(), "b");
///
/// // The freed slot is not handed out again.
/// let c = store.insert("c");
/// assert!(c > b);
/// ```
pub struct ObjectStore<K, T> {
    slots: BTreeMap<u64, T>,
    next: u64,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ObjectKind, T> ObjectStore<K, T> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
            next: 1,
            _kind: PhantomData,
        }
    }

    /// Inserts an object and returns its newly assigned index.
    pub fn insert(&mut self, object: T) -> Index<K> {
        let index = Index::new(self.next);
        self.next += 1;
        self.slots.insert(index.value(), object);
        index
    }

    /// Returns the object at `index`.
    pub fn get(&self, index: Index<K>) -> Result<&T> {
        self.slots
            .get(&index.value())
            .ok_or_else(|| not_found(index))
    }

    /// Returns the object at `index` mutably.
    pub fn get_mut(&mut self, index: Index<K>) -> Result<&mut T> {
        self.slots
            .get_mut(&index.value())
            .ok_or_else(|| not_found(index))
    }

    /// Removes the object at `index`; the index stays invalid forever.
    pub fn delete(&mut self, index: Index<K>) -> Result<T> {
        self.slots
            .remove(&index.value())
            .ok_or_else(|| not_found(index))
    }

    /// Returns true if `index` refers to a live object.
    pub fn contains(&self, index: Index<K>) -> bool {
        self.slots.contains_key(&index.value())
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no live objects remain.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates live `(index, object)` pairs in insertion order.
    pub fn iter(&self) -> Iter<'_, K, T> {
        Iter {
            inner: self.slots.iter(),
            _kind: PhantomData,
        }
    }

    /// Iterates live `(index, object)` pairs mutably in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Index<K>, &mut T)> + '_ {
        self.slots
            .iter_mut()
            .map(|(raw, object)| (Index::new(*raw), object))
    }

    /// Iterates live indices in insertion order.
    pub fn indices(&self) -> impl Iterator<Item = Index<K>> + Clone + '_ {
        self.slots.keys().map(|raw| Index::new(*raw))
    }
}

impl<K: ObjectKind, T> Default for ObjectStore<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ObjectKind, T: Clone> Clone for ObjectStore<K, T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            next: self.next,
            _kind: PhantomData,
        }
    }
}

impl<K: ObjectKind, T: fmt::Debug> fmt::Debug for ObjectStore<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStore")
            .field("kind", &K::NAME)
            .field("next", &self.next)
            .field("slots", &self.slots)
            .finish()
    }
}

/// Restartable iterator over the live entries of an [`ObjectStore`].
pub struct Iter<'a, K, T> {
    inner: btree_map::Iter<'a, u64, T>,
    _kind: PhantomData<fn() -> K>,
}

impl<K, T> Clone for Iter<'_, K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _kind: PhantomData,
        }
    }
}

impl<'a, K: ObjectKind, T> Iterator for Iter<'a, K, T> {
    type Item = (Index<K>, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(raw, object)| (Index::new(*raw), object))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K: ObjectKind, T> ExactSizeIterator for Iter<'_, K, T> {}

fn not_found<K: ObjectKind>(index: Index<K>) -> ModelError {
    ModelError::NotFound(index.to_string())
}

#[cfg(test)]
mod tests;
