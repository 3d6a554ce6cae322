//! Order-preserving hash map used for JSON object storage.
//!
//! A separate-chaining hash table whose records live in one sequential
//! backing vector. Buckets hold chains of *positions* into that vector, never
//! the records themselves, so iteration order is insertion order no matter
//! how the table grows.
//!
//! # Invariants
//!
//! - `len()` is the number of live records.
//! - The table rehashes exactly when `len()` reaches `capacity()` on insert;
//!   capacity doubles and the backing vector is left untouched.
//! - Removal clears the backing slot and its bucket position in the same call.
//! - `insert` always appends, so duplicate keys are representable. Use
//!   [`OrderedMap::get_or_insert_with`] or [`OrderedMap::get_or_default`]
//!   for look-up-then-insert semantics.

mod iter;
mod ordered;

pub use iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
pub use ordered::{OrderedMap, Record, MIN_CAPACITY};
