//! Determinants map keys to dense slot indices.

use std::any;

use itertools::{Itertools, MinMaxResult};

use crate::{Error, Result};

/// The largest ordinal accepted by [`EnumDeterminant`].
pub const MAX_ORDINAL: i128 = i32::MAX as i128;

/// A bijection between a key domain and the indices `0..size`.
///
/// A determinant is built once and never changes afterwards.
/// Dictionaries share it through an [`Arc`](std::sync::Arc)
/// and query [`size`](Self::size) only when they are constructed.
///
/// Implementors must ensure that
/// `key_of(index_of(&key)) == Some(key)` for every representable key,
/// which also implies that `index_of` is injective.
pub trait Determinant<K: Copy> {
    /// The number of valid indices.
    ///
    /// Dictionaries refuse to use a determinant of size zero.
    fn size(&self) -> usize;

    /// Maps a key to its index in `0..size`.
    ///
    /// Can panic if the key is outside the representable domain.
    fn index_of(&self, key: &K) -> usize;

    /// Maps an index back to its key.
    ///
    /// Returns `None` if no key maps to `index`,
    /// either because `index >= size`
    /// or because the index is a gap in a sparse key domain.
    fn key_of(&self, index: usize) -> Option<K>;
}

/// A fieldless enum whose variants can be listed at compile time.
///
/// This trait is usually implemented with `#[derive(Enumeration)]`.
pub trait Enumeration: Copy + 'static {
    /// All declared variants in declaration order.
    const VARIANTS: &'static [Self];

    /// The declared discriminant of the variant.
    ///
    /// `i128` holds the discriminant of every integer `repr` except `u128`,
    /// which the derive macro rejects.
    fn ordinal(self) -> i128;
}

/// A [`Determinant`] that uses the discriminant of an [`Enumeration`] as its index.
///
/// The size is the greatest ordinal plus one,
/// so indices below the smallest ordinal are never used.
/// Enums with large or sparse discriminants therefore allocate proportionally large dictionaries.
#[derive(Debug)]
pub struct EnumDeterminant<K> {
    keys: Box<[Option<K>]>,
}

impl<K: Enumeration> EnumDeterminant<K> {
    /// Validates the ordinals of `K` and builds the index table.
    ///
    /// Fails if `K` has no variants,
    /// if any ordinal is outside `0..=MAX_ORDINAL`,
    /// or if two variants report the same ordinal.
    pub fn new() -> Result<Self> {
        let type_name = any::type_name::<K>();
        let config_error = |reason: String| Error::Config { type_name, reason };

        let (min, max) = match K::VARIANTS.iter().map(|&key| key.ordinal()).minmax() {
            MinMaxResult::NoElements => {
                return Err(config_error(String::from("the enumeration has no variants")))
            }
            MinMaxResult::OneElement(ordinal) => (ordinal, ordinal),
            MinMaxResult::MinMax(min, max) => (min, max),
        };
        if min < 0 {
            return Err(config_error(format!("ordinal {min} is negative")));
        }
        if max > MAX_ORDINAL {
            return Err(config_error(format!("ordinal {max} is greater than {MAX_ORDINAL}")));
        }

        let size = ordinal_index(max) + 1;
        let mut keys = vec![None; size].into_boxed_slice();
        for &key in K::VARIANTS {
            let entry =
                keys.get_mut(ordinal_index(key.ordinal())).expect("size covers max ordinal");
            if entry.is_some() {
                return Err(config_error(format!(
                    "ordinal {} is declared more than once",
                    key.ordinal()
                )));
            }
            *entry = Some(key);
        }

        log::debug!(
            "Built determinant for {type_name} with {size} slots for {} variants",
            K::VARIANTS.len()
        );
        if K::VARIANTS.len() * 2 < size {
            log::warn!(
                "Determinant for {type_name} only uses {} of {size} slots; dictionaries keyed by \
                 it waste memory on unused ordinals",
                K::VARIANTS.len()
            );
        }

        Ok(Self { keys })
    }
}

/// Converts an ordinal that has already been checked against `0..=MAX_ORDINAL`.
fn ordinal_index(ordinal: i128) -> usize {
    usize::try_from(ordinal).expect("ordinal was validated to be in 0..=MAX_ORDINAL")
}

impl<K: Enumeration> Determinant<K> for EnumDeterminant<K> {
    fn size(&self) -> usize { self.keys.len() }

    fn index_of(&self, key: &K) -> usize { ordinal_index(key.ordinal()) }

    fn key_of(&self, index: usize) -> Option<K> { self.keys.get(index).copied().flatten() }
}

/// A [`Determinant`] for `usize` keys counting from zero.
///
/// Useful for keys that are known to be IDs in `0..size`.
/// Passing a key greater than or equal to `size` to a dictionary panics,
/// just like indexing a slice out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedDeterminant {
    size: usize,
}

impl BoundedDeterminant {
    /// Creates a determinant for the keys `0..size`.
    pub fn new(size: usize) -> Self { Self { size } }
}

impl Determinant<usize> for BoundedDeterminant {
    fn size(&self) -> usize { self.size }

    fn index_of(&self, &key: &usize) -> usize {
        assert!(
            key < self.size,
            "key {key} is out of range for a determinant of size {}",
            self.size
        );
        key
    }

    fn key_of(&self, index: usize) -> Option<usize> { (index < self.size).then_some(index) }
}
