//! Copy-on-write maps with structural sharing.
//!
//! A [`PersistentMap`] is an immutable, reference-counted map. Every write
//! consumes a handle and returns a handle: when the write changes nothing the
//! returned handle is the input, otherwise it points to a shallow copy with
//! the change applied. The copied map shares every value (and so every nested
//! map) with the original.
//!
//! Writes accept an optional [`CloneTracker`]. Without one, each write that
//! changes the map clones it. With one, maps allocated under the tracker are
//! written in place for as long as they are uniquely owned, so repeated writes
//! into the same branch during a batch clone each level at most once.

use std::{borrow::Borrow, fmt, hash::Hash, mem, sync::Arc};

use indexmap::IndexMap;

use crate::CloneTracker;

/// Constant-time identity comparison of stored values.
///
/// Writes to a [`PersistentMap`] use this to detect no-ops: storing a value
/// that is [`Shared::same_as`] the current one leaves the map untouched.
/// Implementations compare handles, never contents.
pub trait Shared {
    /// Whether `self` and `other` are the same shared value.
    fn same_as(&self, other: &Self) -> bool;
}

impl<T: ?Sized> Shared for Arc<T> {
    fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: Shared> Shared for Option<T> {
    fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (None, None) => true,
            (Some(a), Some(b)) => a.same_as(b),
            _ => false,
        }
    }
}

/// An immutable map whose writes return new maps sharing unchanged data.
///
/// Iteration follows insertion order. Removing a key keeps the relative order
/// of the remaining keys, replacing the value of a key keeps its position.
///
/// Invariant: an empty map never holds an allocation, so all empty maps are
/// identical under [`Shared::same_as`].
pub struct PersistentMap<K, V> {
    inner: Option<Arc<IndexMap<K, V>>>,
}

impl<K, V> PersistentMap<K, V> {
    /// The empty map.
    pub const fn new() -> Self {
        Self { inner: None }
    }

    /// Number of entries in the map.
    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |map| map.len())
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    /// Whether `self` and `other` are handles to the same map.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// The address of the map's allocation, or null for the empty map.
    ///
    /// Only useful for identity checks, like [`PersistentMap::ptr_eq`] but
    /// without holding on to a handle.
    pub fn as_ptr(&self) -> *const () {
        self.inner
            .as_ref()
            .map_or(std::ptr::null(), |map| Arc::as_ptr(map).cast())
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter(self.inner.as_ref().map(|map| map.iter()))
    }

    /// Iterate over the keys in insertion order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Iterate over the values in insertion order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// The first entry in insertion order.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.inner.as_ref()?.first()
    }
}

/// Iterator over the entries of a [`PersistentMap`].
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V>(Option<indexmap::map::Iter<'a, K, V>>);

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.as_mut()?.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.as_ref().map_or((0, Some(0)), |it| it.size_hint())
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.as_mut()?.next_back()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> Default for Iter<'_, K, V> {
    fn default() -> Self {
        Self(None)
    }
}

impl<K: Hash + Eq, V> PersistentMap<K, V> {
    /// The value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.as_ref()?.get(key)
    }

    /// Whether the map contains `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.as_ref().is_some_and(|map| map.contains_key(key))
    }
}

impl<K: Hash + Eq + Clone, V: Clone> PersistentMap<K, V> {
    /// Set `key` to `value`.
    ///
    /// Returns `self` unchanged if `value` is [`Shared::same_as`] the value
    /// already stored under `key`.
    #[must_use]
    pub fn insert(self, key: K, value: V, clones: Option<&mut CloneTracker>) -> Self
    where
        V: Shared,
    {
        if self.get(&key).is_some_and(|current| current.same_as(&value)) {
            return self;
        }
        self.write(clones, |map| {
            map.insert(key, value);
        })
    }

    /// Remove `key` from the map.
    ///
    /// Returns `self` unchanged if `key` is absent, and the empty map if `key`
    /// was the only entry.
    #[must_use]
    pub fn remove<Q>(self, key: &Q, clones: Option<&mut CloneTracker>) -> Self
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if !self.contains_key(key) {
            return self;
        }
        if self.len() == 1 {
            return Self::new();
        }
        self.write(clones, |map| {
            map.shift_remove(key);
        })
    }

    /// Replace the value of a key that is already present.
    fn replace<Q>(self, key: &Q, value: V, clones: Option<&mut CloneTracker>) -> Self
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Shared,
    {
        let changed = self
            .get(key)
            .is_some_and(|current| !current.same_as(&value));
        if !changed {
            return self;
        }
        self.write(clones, |map| {
            if let Some(slot) = map.get_mut(key) {
                *slot = value;
            }
        })
    }

    /// Mutable access to the underlying map, if it is private to the batch
    /// owning `clones`.
    ///
    /// A map is private when it was allocated under the tracker and no other
    /// handle to it exists.
    fn private_mut(&mut self, clones: Option<&CloneTracker>) -> Option<&mut IndexMap<K, V>> {
        let clones = clones?;
        let map = self.inner.as_mut()?;
        if !clones.contains(map) {
            return None;
        }
        Arc::get_mut(map)
    }

    /// Apply `write` to the map, in place if it is private and to a fresh
    /// shallow copy otherwise.
    fn write(
        mut self,
        clones: Option<&mut CloneTracker>,
        write: impl FnOnce(&mut IndexMap<K, V>),
    ) -> Self {
        if let Some(map) = self.private_mut(clones.as_deref()) {
            write(map);
            return self.collapsed();
        }
        let mut map = self.inner.as_deref().cloned().unwrap_or_default();
        write(&mut map);
        Self::from_fresh(map, clones)
    }

    /// Wrap a newly built map, registering it with the tracker.
    fn from_fresh(map: IndexMap<K, V>, clones: Option<&mut CloneTracker>) -> Self {
        if map.is_empty() {
            return Self::new();
        }
        let map = Arc::new(map);
        if let Some(clones) = clones {
            clones.track(&map);
        }
        Self { inner: Some(map) }
    }

    /// Drop the allocation of a map that became empty.
    fn collapsed(self) -> Self {
        if self.inner.as_ref().is_some_and(|map| map.is_empty()) {
            Self::new()
        } else {
            self
        }
    }
}

impl<K, K2, V2> PersistentMap<K, PersistentMap<K2, V2>>
where
    K: Hash + Eq + Clone,
    K2: Hash + Eq + Clone,
    V2: Clone,
{
    /// Write into the child map stored under `key`, creating it if absent.
    ///
    /// `update` receives the child (or the empty map) and returns its new
    /// value. An empty result removes `key`, a result identical to the child
    /// leaves `self` unchanged.
    #[must_use]
    pub fn insert_in<F>(mut self, key: K, mut clones: Option<&mut CloneTracker>, update: F) -> Self
    where
        F: FnOnce(PersistentMap<K2, V2>, Option<&mut CloneTracker>) -> PersistentMap<K2, V2>,
    {
        if let Some(map) = self.private_mut(clones.as_deref()) {
            // Take the child out so that it is uniquely owned while updated.
            let child = map.get_mut(&key).map(mem::take).unwrap_or_default();
            let child = update(child, clones.as_deref_mut());
            if child.is_empty() {
                map.shift_remove(&key);
            } else {
                map.insert(key, child);
            }
            return self.collapsed();
        }
        let child = self.get(&key).cloned().unwrap_or_default();
        let child = update(child, clones.as_deref_mut());
        if child.is_empty() {
            self.remove(&key, clones)
        } else {
            self.insert(key, child, clones)
        }
    }

    /// Write into the child map stored under `key`, if there is one.
    ///
    /// Returns `self` unchanged if `key` is absent. Otherwise behaves as
    /// [`PersistentMap::insert_in`]: in particular an empty result removes
    /// `key`, and removes `self` in turn if that was its last entry.
    #[must_use]
    pub fn remove_in<Q, F>(mut self, key: &Q, mut clones: Option<&mut CloneTracker>, update: F) -> Self
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(PersistentMap<K2, V2>, Option<&mut CloneTracker>) -> PersistentMap<K2, V2>,
    {
        if !self.contains_key(key) {
            return self;
        }
        if let Some(map) = self.private_mut(clones.as_deref()) {
            if let Some(slot) = map.get_mut(key) {
                let child = update(mem::take(slot), clones.as_deref_mut());
                if child.is_empty() {
                    map.shift_remove(key);
                } else {
                    *slot = child;
                }
            }
            return self.collapsed();
        }
        let child = self.get(key).cloned().unwrap_or_default();
        let child = update(child, clones.as_deref_mut());
        if child.is_empty() {
            self.remove(key, clones)
        } else {
            self.replace(key, child, clones)
        }
    }
}

impl<K, V> Shared for PersistentMap<K, V> {
    fn same_as(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<K, V> Clone for PersistentMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> Default for PersistentMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PersistentMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for PersistentMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.inner == other.inner
    }
}

impl<K: Hash + Eq, V: Eq> Eq for PersistentMap<K, V> {}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for PersistentMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map: IndexMap<K, V> = iter.into_iter().collect();
        if map.is_empty() {
            Self::new()
        } else {
            Self {
                inner: Some(Arc::new(map)),
            }
        }
    }
}

impl<'a, K, V> IntoIterator for &'a PersistentMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use rstest::{fixture, rstest};

    use super::*;

    type Leaf = Arc<&'static str>;
    type Inner = PersistentMap<u32, Leaf>;
    type Outer = PersistentMap<&'static str, Inner>;

    fn leaf(s: &'static str) -> Leaf {
        Arc::new(s)
    }

    #[fixture]
    fn outer() -> Outer {
        Outer::new()
            .insert_in("a", None, |m, c| m.insert(1, leaf("a1"), c))
            .insert_in("a", None, |m, c| m.insert(2, leaf("a2"), c))
            .insert_in("b", None, |m, c| m.insert(1, leaf("b1"), c))
    }

    #[test]
    fn test_insert_get() {
        let map = Inner::new().insert(1, leaf("x"), None);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1).map(|v| **v), Some("x"));
        assert!(!map.contains_key(&2));
    }

    #[test]
    fn test_insert_same_value_is_noop() {
        let value = leaf("x");
        let map = Inner::new().insert(1, value.clone(), None);
        let same = map.clone().insert(1, value, None);
        assert!(same.ptr_eq(&map));

        // Equal contents behind a different handle is a change.
        let other = map.clone().insert(1, leaf("x"), None);
        assert!(!other.ptr_eq(&map));
    }

    #[test]
    fn test_insert_does_not_alias() {
        let map = Inner::new().insert(1, leaf("x"), None);
        let next = map.clone().insert(2, leaf("y"), None);
        assert_eq!(map.len(), 1);
        assert_eq!(next.len(), 2);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let map = Inner::new().insert(1, leaf("x"), None);
        assert!(map.clone().remove(&2, None).ptr_eq(&map));
        assert!(Inner::new().remove(&2, None).is_empty());
    }

    #[test]
    fn test_remove_last_collapses() {
        let map = Inner::new().insert(1, leaf("x"), None);
        let empty = map.remove(&1, None);
        assert!(empty.is_empty());
        assert!(empty.ptr_eq(&Inner::new()));
    }

    #[test]
    fn test_remove_keeps_order() {
        let map: Inner = [(3, leaf("c")), (1, leaf("a")), (2, leaf("b"))]
            .into_iter()
            .collect();
        let map = map.remove(&1, None);
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![3, 2]);
    }

    #[rstest]
    fn test_nested_sharing(outer: Outer) {
        let next = outer
            .clone()
            .insert_in("a", None, |m, c| m.insert(3, leaf("a3"), c));
        assert!(next.get("b").unwrap().ptr_eq(outer.get("b").unwrap()));
        assert!(!next.get("a").unwrap().ptr_eq(outer.get("a").unwrap()));
        assert_eq!(outer.get("a").unwrap().len(), 2);
    }

    #[rstest]
    fn test_nested_noop(outer: Outer) {
        let a1 = outer.get("a").unwrap().get(&1).unwrap().clone();
        let same = outer.clone().insert_in("a", None, |m, c| m.insert(1, a1, c));
        assert!(same.ptr_eq(&outer));

        let same = outer.clone().remove_in("zzz", None, |m, c| m.remove(&1, c));
        assert!(same.ptr_eq(&outer));
        let same = outer.clone().remove_in("a", None, |m, c| m.remove(&7, c));
        assert!(same.ptr_eq(&outer));
    }

    #[rstest]
    fn test_nested_cascading_collapse(outer: Outer) {
        let next = outer.remove_in("b", None, |m, c| m.remove(&1, c));
        assert!(!next.contains_key("b"));
        assert_eq!(next.keys().copied().collect::<Vec<_>>(), vec!["a"]);

        let next = next
            .remove_in("a", None, |m, c| m.remove(&1, c))
            .remove_in("a", None, |m, c| m.remove(&2, c));
        assert!(next.is_empty());
    }

    #[rstest]
    fn test_tracked_writes_reuse_clones(outer: Outer) {
        let mut clones = CloneTracker::new();
        let first = outer
            .clone()
            .insert_in("a", Some(&mut clones), |m, c| m.insert(3, leaf("a3"), c));
        // The outer map and the "a" branch were cloned once each.
        assert_eq!(clones.len(), 2);
        assert!(!first.ptr_eq(&outer));

        let second = first
            .insert_in("a", Some(&mut clones), |m, c| m.insert(4, leaf("a4"), c));
        assert_eq!(clones.len(), 2);
        assert_eq!(second.get("a").unwrap().len(), 4);
        // The snapshot taken before the batch is untouched.
        assert_eq!(outer.get("a").unwrap().len(), 2);
    }

    #[rstest]
    fn test_tracked_map_shared_elsewhere_is_cloned(outer: Outer) {
        let mut clones = CloneTracker::new();
        let first = outer.insert_in("a", Some(&mut clones), |m, c| m.insert(3, leaf("a3"), c));
        let held = first.clone();
        let second = first.insert_in("a", Some(&mut clones), |m, c| m.insert(4, leaf("a4"), c));
        assert_eq!(held.get("a").unwrap().len(), 3);
        assert_eq!(second.get("a").unwrap().len(), 4);
        assert!(!second.ptr_eq(&held));
    }

    #[test]
    fn test_new_branches_are_tracked() {
        let mut clones = CloneTracker::new();
        let map = Outer::new().insert_in("a", Some(&mut clones), |m, c| m.insert(1, leaf("1"), c));
        assert_eq!(clones.len(), 2);
        let map = map.insert_in("a", Some(&mut clones), |m, c| m.insert(2, leaf("2"), c));
        assert_eq!(clones.len(), 2);
        assert_eq!(map.get("a").unwrap().len(), 2);
    }

    proptest! {
        #[test]
        fn prop_insert_remove_collapses(keys in proptest::collection::vec((0u8..4, 0u32..8), 1..20)) {
            let mut map: PersistentMap<u8, Inner> = PersistentMap::new();
            for &(outer, inner) in &keys {
                map = map.insert_in(outer, None, |m, c| m.insert(inner, leaf("v"), c));
            }
            for &(outer, inner) in &keys {
                map = map.remove_in(&outer, None, |m, c| m.remove(&inner, c));
            }
            prop_assert!(map.is_empty());
            prop_assert!(map.ptr_eq(&PersistentMap::new()));
        }

        #[test]
        fn prop_tracked_matches_untracked(keys in proptest::collection::vec((0u8..4, 0u32..8, any::<bool>()), 1..30)) {
            let mut plain: PersistentMap<u8, Inner> = PersistentMap::new();
            let mut tracked = plain.clone();
            let mut clones = CloneTracker::new();
            for &(outer, inner, add) in &keys {
                if add {
                    plain = plain.insert_in(outer, None, |m, c| m.insert(inner, leaf("v"), c));
                    tracked = tracked.insert_in(outer, Some(&mut clones), |m, c| m.insert(inner, leaf("v"), c));
                } else {
                    plain = plain.remove_in(&outer, None, |m, c| m.remove(&inner, c));
                    tracked = tracked.remove_in(&outer, Some(&mut clones), |m, c| m.remove(&inner, c));
                }
            }
            let keys_of = |m: &PersistentMap<u8, Inner>| {
                m.iter()
                    .map(|(k, v)| (*k, v.keys().copied().collect::<Vec<_>>()))
                    .collect::<Vec<_>>()
            };
            prop_assert_eq!(keys_of(&plain), keys_of(&tracked));
        }
    }
}
