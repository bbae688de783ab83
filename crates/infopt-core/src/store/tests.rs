//! Tests for the stable-key object store.

use super::*;

#[test]
fn test_insert_assigns_increasing_indices() {
    let mut store: ObjectStore<ConstraintKind, i32> = ObjectStore::new();
    let a = store.insert(10);
    let b = store.insert(20);
    let c = store.insert(30);

    assert!(a < b && b < c);
    assert_eq!(store.len(), 3);
    assert_eq!(*store.get(b).unwrap(), 20);
}

#[test]
fn test_delete_invalidates_only_that_index() {
    let mut store: ObjectStore<ConstraintKind, &str> = ObjectStore::new();
    let a = store.insert("a");
    let b = store.insert("b");
    let c = store.insert("c");

    assert_eq!(store.delete(b).unwrap(), "b");

    assert!(matches!(store.get(b), Err(ModelError::NotFound(_))));
    assert!(matches!(store.delete(b), Err(ModelError::NotFound(_))));
    assert_eq!(*store.get(a).unwrap(), "a");
    assert_eq!(*store.get(c).unwrap(), "c");
    assert!(!store.contains(b));
}

#[test]
fn test_indices_never_reused() {
    let mut store: ObjectStore<MeasureKind, u8> = ObjectStore::new();
    let a = store.insert(1);
    store.delete(a).unwrap();
    let b = store.insert(2);

    assert_ne!(a, b);
    assert!(store.get(a).is_err());
    assert_eq!(store.insert(3).value(), b.value() + 1);
}

#[test]
fn test_iteration_is_ordered_and_restartable() {
    let mut store: ObjectStore<MeasureKind, char> = ObjectStore::new();
    let ids: Vec<_> = "wxyz".chars().map(|ch| store.insert(ch)).collect();
    store.delete(ids[1]).unwrap();

    let iter = store.iter();
    let first: Vec<_> = iter.clone().map(|(_, ch)| *ch).collect();
    let second: Vec<_> = iter.map(|(i, _)| i).collect();

    assert_eq!(first, vec!['w', 'y', 'z']);
    assert_eq!(second, vec![ids[0], ids[2], ids[3]]);
}

#[test]
fn test_get_mut_updates_in_place() {
    let mut store: ObjectStore<HoldVariableKind, Vec<i32>> = ObjectStore::new();
    let a = store.insert(vec![1]);
    store.get_mut(a).unwrap().push(2);
    assert_eq!(store.get(a).unwrap(), &vec![1, 2]);
}

#[test]
fn test_index_display() {
    let index = InfiniteVariableIndex::new(4);
    assert_eq!(index.to_string(), "infinite variable #4");

    let dep = DependentParameterIndex::new(DependentParametersIndex::new(2), 1);
    assert_eq!(dep.to_string(), "dependent parameter group #2[1]");
}
