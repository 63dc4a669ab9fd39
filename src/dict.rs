//! The fixed-size dictionary and its views.

use std::any;
use std::fmt;
use std::marker::PhantomData;
use std::ops;
use std::sync::Arc;

use crate::determinant::{Determinant, EnumDeterminant, Enumeration};
use crate::slots::{self, Slots};
use crate::{Error, Result};

/// A dictionary backed by a single array with one slot per possible key.
///
/// The mapping between keys and slots is provided by the determinant `D`.
/// Every keyed operation is a single array access;
/// the cost is `O(size)` memory regardless of how many entries are present.
///
/// # Versioning
/// The dictionary keeps a version counter that is incremented
/// on every write performed by its own mutators:
/// [`set`](Self::set) (including overwrites), a successful [`add`](Self::add),
/// [`remove`](Self::remove) and [`take`](Self::take) when an entry was present,
/// [`clear`](Self::clear), [`get_or_insert_with`](Self::get_or_insert_with) when it inserts,
/// [`retain`](Self::retain) when it removes anything, and [`Extend`].
/// Mutating a value in place through [`get_mut`](Self::get_mut), [`IndexMut`](ops::IndexMut),
/// [`iter_mut`](Self::iter_mut) or [`values_mut`](Self::values_mut) does not change the version.
/// [`Cursor`]s use the version to detect modification during enumeration.
pub struct FixedSizeDictionary<K, V, D> {
    determinant: Arc<D>,
    slots:       Slots<V>,
    version:     u64,
    _ph:         PhantomData<fn() -> K>,
}

static_assertions::assert_impl_all!(
    FixedSizeDictionary<usize, String, crate::BoundedDeterminant>: Send, Sync, Clone
);

/// A [`FixedSizeDictionary`] keyed by an [`Enumeration`].
pub type EnumDictionary<K, V> = FixedSizeDictionary<K, V, EnumDeterminant<K>>;

impl<K: Enumeration, V> FixedSizeDictionary<K, V, EnumDeterminant<K>> {
    /// Creates an empty dictionary with a newly built [`EnumDeterminant`].
    ///
    /// Prefer [`new`](Self::new) with a shared determinant
    /// when creating many dictionaries for the same key type.
    pub fn for_enum() -> Result<Self> { Self::new(Arc::new(EnumDeterminant::new()?)) }
}

impl<K: Copy, V, D: Determinant<K>> FixedSizeDictionary<K, V, D> {
    /// Creates an empty dictionary.
    ///
    /// Fails if the determinant reports a size of zero.
    pub fn new(determinant: Arc<D>) -> Result<Self> {
        let size = determinant.size();
        if size == 0 {
            return Err(Error::Config {
                type_name: any::type_name::<K>(),
                reason:    String::from("the determinant reports a size of zero"),
            });
        }

        log::trace!("Allocating {size} slots for dictionary keyed by {}", any::type_name::<K>());

        Ok(Self { determinant, slots: Slots::repeat_none(size), version: 0, _ph: PhantomData })
    }

    /// Creates a dictionary containing `entries`, inserted through [`add`](Self::add).
    ///
    /// Fails if `entries` yields the same key twice.
    pub fn from_entries(
        determinant: Arc<D>,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self> {
        let mut dict = Self::new(determinant)?;
        for (key, value) in entries {
            dict.add(key, value)?;
        }
        Ok(dict)
    }

    /// Copies another dictionary that uses the same determinant.
    ///
    /// The slot array is copied as a whole,
    /// then its length is checked against the determinant.
    pub fn from_dictionary(other: &Self) -> Result<Self>
    where
        V: Clone,
    {
        let copy = other.clone();

        let expected = copy.determinant.size();
        let actual = copy.slots.len();
        if expected != actual {
            return Err(Error::Inconsistent { expected, actual });
        }

        Ok(copy)
    }

    /// The determinant that maps keys of this dictionary.
    pub fn determinant(&self) -> &Arc<D> { &self.determinant }

    /// The number of entries in the dictionary.
    pub fn len(&self) -> usize { self.slots.count() }

    /// Returns `true` if the dictionary has no entries.
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// The number of slots, which is the determinant size at construction.
    pub fn capacity(&self) -> usize { self.slots.len() }

    /// The current version of the dictionary.
    pub fn version(&self) -> u64 { self.version }

    fn bump_version(&mut self) { self.version = self.version.wrapping_add(1); }

    fn key_at(&self, index: usize) -> K { key_at(&*self.determinant, index) }

    /// Returns the value for `key`, or [`Error::NotFound`] if it is absent.
    pub fn lookup(&self, key: &K) -> Result<&V> {
        let index = self.determinant.index_of(key);
        self.slots.get(index).ok_or(Error::NotFound { index })
    }

    /// Returns the value for `key` if it is present.
    pub fn get(&self, key: &K) -> Option<&V> { self.slots.get(self.determinant.index_of(key)) }

    /// Returns a mutable reference to the value for `key` if it is present.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.slots.get_mut(self.determinant.index_of(key))
    }

    /// Returns `true` if `key` has a value.
    pub fn contains_key(&self, key: &K) -> bool {
        self.slots.is_set(self.determinant.index_of(key))
    }

    /// Inserts or overwrites the value for `key`, returning the previous value.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let index = self.determinant.index_of(&key);
        let old = self.slots.replace(index, Some(value));
        self.bump_version();
        old
    }

    /// Inserts the value for `key`.
    ///
    /// Fails with [`Error::DuplicateKey`] without modifying the dictionary
    /// if `key` already has a value.
    pub fn add(&mut self, key: K, value: V) -> Result<()> {
        let index = self.determinant.index_of(&key);
        if self.slots.is_set(index) {
            return Err(Error::DuplicateKey { index });
        }

        self.slots.replace(index, Some(value));
        self.bump_version();
        Ok(())
    }

    /// Removes the value for `key`, returning whether it was present.
    pub fn remove(&mut self, key: &K) -> bool { self.take(key).is_some() }

    /// Removes and returns the value for `key`.
    pub fn take(&mut self, key: &K) -> Option<V> {
        let index = self.determinant.index_of(key);
        let old = self.slots.replace(index, None);
        if old.is_some() {
            self.bump_version();
        }
        old
    }

    /// Removes all entries.
    ///
    /// This takes `O(size)` time and keeps the slot array allocated.
    pub fn clear(&mut self) {
        log::trace!("Clearing {} of {} slots", self.len(), self.capacity());

        self.slots.clear();
        self.bump_version();
    }

    /// Returns the value for `key`, inserting the result of `factory` if it is absent.
    pub fn get_or_insert_with(&mut self, key: K, factory: impl FnOnce() -> V) -> &mut V {
        let index = self.determinant.index_of(&key);
        if !self.slots.is_set(index) {
            self.slots.replace(index, Some(factory()));
            self.bump_version();
        }
        self.slots.get_mut(index).expect("slot was filled above")
    }

    /// Removes all entries for which `keep` returns false.
    ///
    /// Entries are visited in ascending index order.
    pub fn retain(&mut self, mut keep: impl FnMut(K, &mut V) -> bool) {
        let determinant = &*self.determinant;
        let removed = self.slots.retain(|index, value| keep(key_at(determinant, index), value));
        if removed > 0 {
            self.bump_version();
        }
    }

    /// Iterates over the entries in ascending index order.
    pub fn iter(&self) -> Iter<'_, K, V, D> {
        Iter { determinant: &*self.determinant, inner: self.slots.iter(), _ph: PhantomData }
    }

    /// Iterates mutably over the entries in ascending index order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V, D> {
        IterMut {
            determinant: &*self.determinant,
            inner:       self.slots.iter_mut(),
            _ph:         PhantomData,
        }
    }

    /// A read-only view of the keys.
    pub fn keys(&self) -> Keys<'_, K, V, D> { Keys { dict: self } }

    /// A read-only view of the values.
    pub fn values(&self) -> Values<'_, K, V, D> { Values { dict: self } }

    /// Iterates mutably over the values in ascending index order.
    pub fn values_mut(&mut self) -> impl ExactSizeIterator<Item = &mut V> + '_ {
        self.slots.iter_mut().map(|(_, value)| value)
    }

    /// Starts a detached enumeration.
    ///
    /// See [`Cursor`] for details.
    pub fn cursor(&self) -> Cursor {
        Cursor { next_index: 0, version: self.version, count: self.len() }
    }
}

fn key_at<K: Copy, D: Determinant<K>>(determinant: &D, index: usize) -> K {
    determinant.key_of(index).expect("occupied slots are always mapped from a key")
}

impl<K, V: Clone, D> Clone for FixedSizeDictionary<K, V, D> {
    fn clone(&self) -> Self {
        Self {
            determinant: Arc::clone(&self.determinant),
            slots:       self.slots.clone(),
            version:     0,
            _ph:         PhantomData,
        }
    }
}

impl<K: Copy + fmt::Debug, V: fmt::Debug, D: Determinant<K>> fmt::Debug
    for FixedSizeDictionary<K, V, D>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Two dictionaries are equal if they have values at the same indices and the values are equal.
impl<K, V: PartialEq, D> PartialEq for FixedSizeDictionary<K, V, D> {
    fn eq(&self, other: &Self) -> bool { self.slots.iter().eq(other.slots.iter()) }
}

impl<K, V: Eq, D> Eq for FixedSizeDictionary<K, V, D> {}

impl<K: Copy, V, D: Determinant<K>> ops::Index<K> for FixedSizeDictionary<K, V, D> {
    type Output = V;

    fn index(&self, key: K) -> &V {
        match self.lookup(&key) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<K: Copy, V, D: Determinant<K>> ops::IndexMut<K> for FixedSizeDictionary<K, V, D> {
    fn index_mut(&mut self, key: K) -> &mut V {
        let index = self.determinant.index_of(&key);
        match self.slots.get_mut(index) {
            Some(value) => value,
            None => panic!("{}", Error::NotFound { index }),
        }
    }
}

impl<K: Copy, V, D: Determinant<K>> Extend<(K, V)> for FixedSizeDictionary<K, V, D> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<'t, K: Copy, V, D: Determinant<K>> IntoIterator for &'t FixedSizeDictionary<K, V, D> {
    type Item = (K, &'t V);
    type IntoIter = Iter<'t, K, V, D>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<'t, K: Copy, V, D: Determinant<K>> IntoIterator for &'t mut FixedSizeDictionary<K, V, D> {
    type Item = (K, &'t mut V);
    type IntoIter = IterMut<'t, K, V, D>;

    fn into_iter(self) -> Self::IntoIter { self.iter_mut() }
}

impl<K: Copy, V, D: Determinant<K>> IntoIterator for FixedSizeDictionary<K, V, D> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, D>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { determinant: self.determinant, inner: self.slots.into_iter(), _ph: PhantomData }
    }
}

/// Return value of [`FixedSizeDictionary::iter`].
pub struct Iter<'t, K, V, D> {
    determinant: &'t D,
    inner:       slots::Iter<'t, V>,
    _ph:         PhantomData<fn() -> K>,
}

impl<'t, K: Copy, V, D: Determinant<K>> Iterator for Iter<'t, K, V, D> {
    type Item = (K, &'t V);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, value) = self.inner.next()?;
        Some((key_at(self.determinant, index), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { self.inner.size_hint() }
}

impl<'t, K: Copy, V, D: Determinant<K>> ExactSizeIterator for Iter<'t, K, V, D> {}

/// Return value of [`FixedSizeDictionary::iter_mut`].
pub struct IterMut<'t, K, V, D> {
    determinant: &'t D,
    inner:       slots::IterMut<'t, V>,
    _ph:         PhantomData<fn() -> K>,
}

impl<'t, K: Copy, V, D: Determinant<K>> Iterator for IterMut<'t, K, V, D> {
    type Item = (K, &'t mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, value) = self.inner.next()?;
        Some((key_at(self.determinant, index), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { self.inner.size_hint() }
}

impl<'t, K: Copy, V, D: Determinant<K>> ExactSizeIterator for IterMut<'t, K, V, D> {}

/// Return value of [`FixedSizeDictionary::into_iter`].
pub struct IntoIter<K, V, D> {
    determinant: Arc<D>,
    inner:       slots::IntoIter<V>,
    _ph:         PhantomData<fn() -> K>,
}

impl<K: Copy, V, D: Determinant<K>> Iterator for IntoIter<K, V, D> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, value) = self.inner.next()?;
        Some((key_at(&*self.determinant, index), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { self.inner.size_hint() }
}

impl<K: Copy, V, D: Determinant<K>> ExactSizeIterator for IntoIter<K, V, D> {}

fn check_capacity(dest_len: usize, offset: usize, required: usize) -> Result<()> {
    let available = dest_len.saturating_sub(offset);
    if offset > dest_len || available < required {
        return Err(Error::Capacity { offset, available, required });
    }
    Ok(())
}

/// A read-only view of the keys of a [`FixedSizeDictionary`].
pub struct Keys<'t, K, V, D> {
    dict: &'t FixedSizeDictionary<K, V, D>,
}

impl<'t, K, V, D> Clone for Keys<'t, K, V, D> {
    fn clone(&self) -> Self { *self }
}

impl<'t, K, V, D> Copy for Keys<'t, K, V, D> {}

impl<'t, K: Copy, V, D: Determinant<K>> Keys<'t, K, V, D> {
    /// The number of keys.
    pub fn len(&self) -> usize { self.dict.len() }

    /// Returns `true` if there are no keys.
    pub fn is_empty(&self) -> bool { self.dict.is_empty() }

    /// Returns `true` if `key` is present in the dictionary.
    pub fn contains(&self, key: &K) -> bool { self.dict.contains_key(key) }

    /// Iterates over the keys in ascending index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = K> + 't {
        self.dict.iter().map(|(key, _)| key)
    }

    /// Copies the keys into `dest` starting at `offset`.
    ///
    /// Fails with [`Error::Capacity`] if `dest` has fewer than [`len`](Self::len) slots
    /// from `offset`.
    pub fn copy_to(&self, dest: &mut [K], offset: usize) -> Result<()> {
        check_capacity(dest.len(), offset, self.len())?;
        for (slot, key) in dest[offset..].iter_mut().zip(self.iter()) {
            *slot = key;
        }
        Ok(())
    }
}

/// A read-only view of the values of a [`FixedSizeDictionary`].
pub struct Values<'t, K, V, D> {
    dict: &'t FixedSizeDictionary<K, V, D>,
}

impl<'t, K, V, D> Clone for Values<'t, K, V, D> {
    fn clone(&self) -> Self { *self }
}

impl<'t, K, V, D> Copy for Values<'t, K, V, D> {}

impl<'t, K: Copy, V, D: Determinant<K>> Values<'t, K, V, D> {
    /// The number of values.
    pub fn len(&self) -> usize { self.dict.len() }

    /// Returns `true` if there are no values.
    pub fn is_empty(&self) -> bool { self.dict.is_empty() }

    /// Iterates over the values in ascending index order of their keys.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'t V> + 't {
        self.dict.slots.iter().map(|(_, value)| value)
    }

    /// Clones the values into `dest` starting at `offset`.
    ///
    /// Fails with [`Error::Capacity`] if `dest` has fewer than [`len`](Self::len) slots
    /// from `offset`.
    pub fn copy_to(&self, dest: &mut [V], offset: usize) -> Result<()>
    where
        V: Clone,
    {
        check_capacity(dest.len(), offset, self.len())?;
        for (slot, value) in dest[offset..].iter_mut().zip(self.iter()) {
            slot.clone_from(value);
        }
        Ok(())
    }
}

/// A detached enumeration over a [`FixedSizeDictionary`].
///
/// Unlike [`FixedSizeDictionary::iter`], a cursor does not borrow the dictionary between steps,
/// so the dictionary can be modified while an enumeration is in progress.
/// The cursor remembers the [version](FixedSizeDictionary::version) and length
/// at the time it was created,
/// and every [`advance`](Self::advance) fails with [`Error::ConcurrentModification`]
/// once either of them has changed.
///
/// A cursor should only be advanced with the dictionary that created it.
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use fixmap::{BoundedDeterminant, Error, FixedSizeDictionary};
///
/// let mut dict: FixedSizeDictionary<usize, &str, _> =
///     FixedSizeDictionary::new(Arc::new(BoundedDeterminant::new(4))).unwrap();
/// dict.set(1, "one");
/// dict.set(3, "three");
///
/// let mut cursor = dict.cursor();
/// assert_eq!(cursor.advance(&dict), Ok(Some((1, &"one"))));
///
/// dict.set(2, "two");
/// assert_eq!(cursor.advance(&dict), Err(Error::ConcurrentModification));
///
/// cursor.reset(&dict);
/// assert_eq!(cursor.advance(&dict), Ok(Some((1, &"one"))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    next_index: usize,
    version:    u64,
    count:      usize,
}

static_assertions::assert_impl_all!(Cursor: Send, Sync, Clone);

impl Cursor {
    /// Yields the next entry in ascending index order,
    /// or `None` if the enumeration is complete.
    pub fn advance<'t, K: Copy, V, D: Determinant<K>>(
        &mut self,
        dict: &'t FixedSizeDictionary<K, V, D>,
    ) -> Result<Option<(K, &'t V)>> {
        if dict.version() != self.version || dict.len() != self.count {
            return Err(Error::ConcurrentModification);
        }

        let index = match dict.slots.next_occupied(self.next_index) {
            Some(index) => index,
            None => {
                self.next_index = dict.capacity();
                return Ok(None);
            }
        };
        self.next_index = index + 1;

        let value = dict.slots.get(index).expect("next_occupied returns an occupied slot");
        Ok(Some((dict.key_at(index), value)))
    }

    /// Restarts the enumeration with a fresh snapshot of `dict`.
    pub fn reset<K: Copy, V, D: Determinant<K>>(&mut self, dict: &FixedSizeDictionary<K, V, D>) {
        *self = dict.cursor();
    }
}

#[cfg(test)]
mod tests;
