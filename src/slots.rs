use std::iter;
use std::mem::{self, MaybeUninit};
use std::slice;
use std::vec;

use bitvec::prelude::BitVec;
use bitvec::slice::IterOnes;

/// A fixed-length `[Option<T>]`-like array with occupancy stored in a [`BitVec`].
pub(crate) struct Slots<T> {
    is_set: BitVec,
    data:   Box<[MaybeUninit<T>]>,
    count:  usize,
}

impl<T> Slots<T> {
    /// Creates `len` unoccupied slots.
    pub(crate) fn repeat_none(len: usize) -> Self {
        Self {
            is_set: BitVec::repeat(false, len),
            data:   iter::repeat_with(MaybeUninit::uninit).take(len).collect(),
            count:  0,
        }
    }

    /// Returns the fixed number of slots.
    pub(crate) fn len(&self) -> usize {
        debug_assert!(self.is_set.len() == self.data.len());
        self.data.len()
    }

    /// Returns the number of occupied slots.
    pub(crate) fn count(&self) -> usize { self.count }

    pub(crate) fn is_set(&self, index: usize) -> bool {
        self.is_set.get(index).map_or(false, |bit| *bit)
    }

    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        if self.is_set(index) {
            let data = self.data.get(index).expect("is_set is as long as data");
            // SAFETY: The `is_set` bit is set, so the `data` slot is initialized.
            Some(unsafe { data.assume_init_ref() })
        } else {
            None
        }
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if self.is_set(index) {
            let data = self.data.get_mut(index).expect("is_set is as long as data");
            // SAFETY: The `is_set` bit is set, so the `data` slot is initialized.
            Some(unsafe { data.assume_init_mut() })
        } else {
            None
        }
    }

    /// Sets or unsets the slot at `index`, returning the previous value.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub(crate) fn replace(&mut self, index: usize, value: Option<T>) -> Option<T> {
        let len = self.len();
        let was_set = match self.is_set.get(index) {
            Some(bit) => *bit,
            None => panic!("slot index {index} is out of bounds for {len} slots"),
        };
        self.is_set.set(index, value.is_some());

        let data = self.data.get_mut(index).expect("is_set is as long as data");
        let old = match value {
            Some(value) => mem::replace(data, MaybeUninit::new(value)),
            None => mem::replace(data, MaybeUninit::uninit()),
        };

        // split into two separate statements to avoid integer underflow
        if was_set {
            self.count -= 1;
        }
        if self.is_set(index) {
            self.count += 1;
        }

        if was_set {
            // SAFETY: The `is_set` bit was set, so the old slot was initialized.
            // The bit now reflects the new content, so the old value is moved out exactly once.
            Some(unsafe { old.assume_init() })
        } else {
            None
        }
    }

    /// Unsets all slots.
    pub(crate) fn clear(&mut self) {
        // Unmark everything before dropping,
        // so that a panicking destructor leaks values instead of dropping them twice.
        let was_set = mem::replace(&mut self.is_set, BitVec::repeat(false, self.data.len()));
        self.count = 0;

        for index in was_set.iter_ones() {
            let data = self.data.get_mut(index).expect("is_set is as long as data");
            // SAFETY: The `is_set` bit was set, and it has been cleared above.
            unsafe { data.assume_init_drop() }
        }
    }

    /// Returns the first occupied index that is not less than `from`.
    pub(crate) fn next_occupied(&self, from: usize) -> Option<usize> {
        let rest = self.is_set.get(from..)?;
        rest.first_one().map(|offset| from + offset)
    }

    /// Unsets all slots for which `keep` returns false.
    /// Returns the number of unset slots.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(usize, &mut T) -> bool) -> usize {
        let mut removed = 0;
        let mut from = 0;
        while let Some(index) = self.next_occupied(from) {
            from = index + 1;

            let value = self.get_mut(index).expect("next_occupied returns an occupied slot");
            if !keep(index, value) {
                self.replace(index, None);
                removed += 1;
            }
        }
        removed
    }

    /// Iterates over the occupied slots in ascending index order.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            ones:       self.is_set.iter_ones(),
            data:       self.data.iter(),
            next_index: 0,
            remaining:  self.count,
        }
    }

    /// Iterates mutably over the occupied slots in ascending index order.
    pub(crate) fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            ones:       self.is_set.iter_ones(),
            data:       self.data.iter_mut(),
            next_index: 0,
            remaining:  self.count,
        }
    }
}

impl<T> Drop for Slots<T> {
    fn drop(&mut self) { self.clear() }
}

impl<T: Clone> Clone for Slots<T> {
    fn clone(&self) -> Self {
        let mut clone = Self::repeat_none(self.len());
        for (index, value) in self.iter() {
            clone.replace(index, Some(value.clone()));
        }
        clone
    }
}

impl<T> IntoIterator for Slots<T> {
    type Item = (usize, T);
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> IntoIter<T> {
        // `self` is left empty, so its destructor drops nothing.
        let is_set = mem::take(&mut self.is_set);
        let data = mem::take(&mut self.data);
        let remaining = mem::replace(&mut self.count, 0);

        IntoIter { is_set, data: data.into_vec().into_iter(), next_index: 0, remaining }
    }
}

/// Return value of [`Slots::iter`].
pub(crate) struct Iter<'t, T> {
    ones:       IterOnes<'t, usize, bitvec::order::Lsb0>,
    /// `data` yields the slot at `next_index` next.
    data:       slice::Iter<'t, MaybeUninit<T>>,
    next_index: usize,
    remaining:  usize,
}

impl<'t, T> Iterator for Iter<'t, T> {
    type Item = (usize, &'t T);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.ones.next()?;
        let data = self.data.nth(index - self.next_index).expect("is_set is as long as data");
        self.next_index = index + 1;
        self.remaining -= 1;

        // SAFETY: `index` was yielded by `iter_ones`, so the slot is initialized.
        Some((index, unsafe { data.assume_init_ref() }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.remaining, Some(self.remaining)) }
}

impl<'t, T> ExactSizeIterator for Iter<'t, T> {}

/// Return value of [`Slots::iter_mut`].
pub(crate) struct IterMut<'t, T> {
    ones:       IterOnes<'t, usize, bitvec::order::Lsb0>,
    /// `data` yields the slot at `next_index` next.
    data:       slice::IterMut<'t, MaybeUninit<T>>,
    next_index: usize,
    remaining:  usize,
}

impl<'t, T> Iterator for IterMut<'t, T> {
    type Item = (usize, &'t mut T);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.ones.next()?;
        let data = self.data.nth(index - self.next_index).expect("is_set is as long as data");
        self.next_index = index + 1;
        self.remaining -= 1;

        // SAFETY: `index` was yielded by `iter_ones`, so the slot is initialized.
        Some((index, unsafe { data.assume_init_mut() }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.remaining, Some(self.remaining)) }
}

impl<'t, T> ExactSizeIterator for IterMut<'t, T> {}

/// Return value of [`Slots::into_iter`].
pub(crate) struct IntoIter<T> {
    is_set:     BitVec,
    /// `data` yields the slot at `next_index` next.
    data:       vec::IntoIter<MaybeUninit<T>>,
    next_index: usize,
    remaining:  usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = (usize, T);

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.is_set.get(self.next_index..)?;
        let index = self.next_index + rest.first_one()?;
        let data = self.data.nth(index - self.next_index).expect("is_set is as long as data");
        self.next_index = index + 1;
        self.remaining -= 1;

        // SAFETY: The `is_set` bit is set, and `data` is never yielded again.
        Some((index, unsafe { data.assume_init() }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.remaining, Some(self.remaining)) }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) { self.for_each(drop) }
}
