use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use ahash::RandomState;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};

/// Bucket count of a new or cleared map.
pub const MIN_CAPACITY: usize = 10;

/// An owned key/value pair stored in an [`OrderedMap`].
///
/// The key is read-only once stored: changing it would leave the record in
/// the wrong bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<K, V> {
    pub(super) key: K,
    pub(super) value: V,
}

impl<K, V> Record<K, V> {
    /// Create a record that is not yet owned by any map.
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// The record's key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The record's value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Mutable access to the record's value.
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Split the record into its key and value.
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// Hash table with separate chaining that iterates in insertion order.
///
/// Records are stored in `slots`, a vector in insertion order where removed
/// records leave a vacant slot until the next compaction. Each bucket is a
/// chain of indices into `slots`. A chain never owns a record, it only
/// locates it.
///
/// Mutating the map while iterating over it is not possible: the iterators
/// borrow the map.
#[derive(Clone)]
pub struct OrderedMap<K, V, S = RandomState> {
    slots: Vec<Option<Record<K, V>>>,
    buckets: Vec<Vec<usize>>,
    len: usize,
    hash_builder: S,
}

impl<K, V> OrderedMap<K, V> {
    /// Create an empty map with [`MIN_CAPACITY`] buckets.
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K, V, S> OrderedMap<K, V, S> {
    /// Create an empty map that hashes keys with `hash_builder`.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            slots: Vec::new(),
            buckets: vec![Vec::new(); MIN_CAPACITY],
            len: 0,
            hash_builder,
        }
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the map holds no records.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Remove every record and shrink back to [`MIN_CAPACITY`] buckets.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.buckets = vec![Vec::new(); MIN_CAPACITY];
        self.len = 0;
    }

    /// Iterate over `(key, value)` pairs, oldest first.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.slots.iter(), self.len)
    }

    /// Iterate over `(key, mutable value)` pairs, oldest first.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self.slots.iter_mut(), self.len)
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Iterate over values in insertion order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Iterate over mutable values in insertion order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut::new(self.iter_mut())
    }

    /// The hasher used to place keys in buckets.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }
}

impl<K, V, S> OrderedMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Append a record for `key`, even if one already exists.
    ///
    /// Returns the stored record. Triggers a rehash when the number of
    /// records reaches the bucket count.
    pub fn insert(&mut self, key: K, value: V) -> &mut Record<K, V> {
        self.insert_record(Record::new(key, value))
    }

    /// Append an already built record. See [`OrderedMap::insert`].
    pub fn insert_record(&mut self, record: Record<K, V>) -> &mut Record<K, V> {
        self.len += 1;
        if self.len >= self.buckets.len() {
            self.rehash();
        }

        let bucket = bucket_for(&self.hash_builder, &record.key, self.buckets.len());
        let index = self.slots.len();
        self.buckets[bucket].push(index);
        self.slots.push(None);
        self.slots[index].insert(record)
    }

    /// First value stored under `key`, if any.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (_, _, index) = self.find(key)?;
        self.slots[index].as_ref().map(|record| &record.value)
    }

    /// Mutable access to the first value stored under `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (_, _, index) = self.find(key)?;
        self.slots[index].as_mut().map(|record| &mut record.value)
    }

    /// First value stored under `key`, or `default` when there is none.
    pub fn get_or<'a, Q>(&'a self, key: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).unwrap_or(default)
    }

    /// Every value stored under `key`, oldest first.
    pub fn get_all<Q>(&self, key: &Q) -> Vec<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = bucket_for(&self.hash_builder, key, self.buckets.len());
        self.buckets[bucket]
            .iter()
            .filter_map(|&index| self.slots[index].as_ref())
            .filter(|record| record.key.borrow() == key)
            .map(|record| &record.value)
            .collect()
    }

    /// Returns true if at least one record is stored under `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    /// The first value stored under `key`, inserting `make()` when missing.
    pub fn get_or_insert_with<F>(&mut self, key: K, make: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let index = match self.find(&key) {
            Some((_, _, index)) => index,
            None => return &mut self.insert(key, make()).value,
        };
        // Chains only point at occupied slots, so the closure never runs.
        &mut self.slots[index]
            .get_or_insert_with(|| Record::new(key, make()))
            .value
    }

    /// The first value stored under `key`, inserting `V::default()` when
    /// missing.
    pub fn get_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Remove the first record stored under `key`.
    ///
    /// Returns true if a record was removed.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).is_some()
    }

    /// Remove and return the first record stored under `key`.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (bucket, position, index) = self.find(key)?;
        self.buckets[bucket].remove(position);
        let record = self.slots[index].take()?;
        self.len -= 1;

        let vacant = self.slots.len() - self.len;
        if vacant > self.len.max(MIN_CAPACITY) {
            self.compact();
        }

        Some(record.into_parts())
    }

    /// Locate the first record for `key` as (bucket, chain position, slot).
    fn find<Q>(&self, key: &Q) -> Option<(usize, usize, usize)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = bucket_for(&self.hash_builder, key, self.buckets.len());
        self.buckets[bucket]
            .iter()
            .enumerate()
            .find_map(|(position, &index)| match &self.slots[index] {
                Some(record) if record.key.borrow() == key => Some((bucket, position, index)),
                _ => None,
            })
    }

    fn rehash(&mut self) {
        let capacity = self.buckets.len() * 2;
        tracing::trace!(from = self.buckets.len(), to = capacity, "rehashing ordered map");
        self.rebuild_buckets(capacity);
    }

    /// Drop vacant slots. Every index shifts, so the chains are rebuilt in the
    /// same call.
    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        self.rebuild_buckets(self.buckets.len());
    }

    fn rebuild_buckets(&mut self, capacity: usize) {
        let mut buckets = vec![Vec::new(); capacity];
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(record) = slot {
                buckets[bucket_for(&self.hash_builder, &record.key, capacity)].push(index);
            }
        }
        self.buckets = buckets;
    }
}

fn bucket_for<Q, S>(hash_builder: &S, key: &Q, capacity: usize) -> usize
where
    Q: Hash + ?Sized,
    S: BuildHasher,
{
    (hash_builder.hash_one(key) % capacity as u64) as usize
}

impl<K, V, S: Default> Default for OrderedMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for OrderedMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Two maps are equal when they hold equal records in the same order.
impl<K: PartialEq, V: PartialEq, S> PartialEq for OrderedMap<K, V, S> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K, V, S> FromIterator<(K, V)> for OrderedMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for OrderedMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a OrderedMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut OrderedMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> IntoIterator for OrderedMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.slots.into_iter(), self.len)
    }
}

/// Serializes as a map in insertion order, duplicate keys included.
impl<K: Serialize, V: Serialize, S> Serialize for OrderedMap<K, V, S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut map = serializer.serialize_map(Some(self.len))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_map_is_empty() {
        let map: OrderedMap<String, i32> = OrderedMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.capacity(), MIN_CAPACITY);
        assert_eq!(map.iter().count(), 0);
    }

    #[test]
    fn test_insert_returns_stored_record() {
        let mut map = OrderedMap::new();
        let record = map.insert("a", 1);
        assert_eq!(*record.key(), "a");
        *record.value_mut() = 5;
        assert_eq!(map.get("a"), Some(&5));
    }

    #[test]
    fn test_rehash_at_capacity() {
        let mut map = OrderedMap::new();
        for i in 0..MIN_CAPACITY - 1 {
            map.insert(i, i);
        }
        assert_eq!(map.capacity(), MIN_CAPACITY);

        map.insert(MIN_CAPACITY - 1, 0);
        assert_eq!(map.capacity(), MIN_CAPACITY * 2);
    }

    #[test]
    fn test_duplicates_are_appended() {
        let mut map = OrderedMap::new();
        map.insert("k", 1);
        map.insert("k", 2);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("k"), Some(&1));
        assert_eq!(map.get_all("k"), vec![&1, &2]);
    }

    #[test]
    fn test_remove_takes_first_duplicate() {
        let mut map = OrderedMap::new();
        map.insert("k", 1);
        map.insert("k", 2);
        assert_eq!(map.remove_entry("k"), Some(("k", 1)));
        assert_eq!(map.get("k"), Some(&2));
        assert!(map.remove("k"));
        assert!(!map.remove("k"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_compaction_keeps_lookups_valid() {
        let mut map = OrderedMap::new();
        for i in 0..100 {
            map.insert(i, i * 10);
        }
        for i in 0..90 {
            assert!(map.remove(&i));
        }
        assert_eq!(map.len(), 10);
        for i in 90..100 {
            assert_eq!(map.get(&i), Some(&(i * 10)));
        }
        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, (90..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_get_or_default_inserts_once() {
        let mut map: OrderedMap<String, i32> = OrderedMap::new();
        *map.get_or_default("n".to_string()) += 1;
        *map.get_or_default("n".to_string()) += 1;
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("n"), Some(&2));
    }

    #[test]
    fn test_get_or_fallback() {
        let mut map = OrderedMap::new();
        map.insert("present", 1);
        let fallback = 0;
        assert_eq!(*map.get_or("present", &fallback), 1);
        assert_eq!(*map.get_or("absent", &fallback), 0);
    }

    #[test]
    fn test_clear_resets_capacity() {
        let mut map = OrderedMap::new();
        for i in 0..50 {
            map.insert(i, ());
        }
        assert!(map.capacity() > MIN_CAPACITY);
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.capacity(), MIN_CAPACITY);
        assert!(!map.contains_key(&1));
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let a: OrderedMap<&str, i32> = [("x", 1), ("y", 2)].into_iter().collect();
        let b: OrderedMap<&str, i32> = [("x", 1), ("y", 2)].into_iter().collect();
        let c: OrderedMap<&str, i32> = [("y", 2), ("x", 1)].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_debug_format() {
        let map: OrderedMap<&str, i32> = [("b", 2), ("a", 1)].into_iter().collect();
        assert_eq!(format!("{:?}", map), r#"{"b": 2, "a": 1}"#);
    }
}
