// SPDX-License-Identifier: MIT OR Apache-2.0
//! `DynArray<T>`: a resizable, refcounted array with power-of-two backing capacity.
//!
//! Mirrors the contract of the original dynamic array closely: elements are laid out
//! contiguously (no sparsity), growth and shrinkage happen in powers of two unless the
//! array is non-resizable, and a shared array can be "tightened" to reclaim slack once
//! its final size is known. Refcounting here is single-threaded (`Cell<usize>`) rather
//! than atomic, since an array is never shared across the reduction boundary in
//! [`ReduceGroup`](crate::reduce::ReduceGroup) — each rank keeps its own.

use std::fmt;
use std::rc::Rc;

use crate::error::{ForestError, Result};

bitflags::bitflags! {
    /// Behavioural flags set at [`DynArray::setup`] time.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct ArrayFlags: u8 {
        /// `resize` may grow or shrink the backing allocation. Cleared after
        /// [`DynArray::freeze`].
        const RESIZABLE = 0b001;
        /// Shrink the backing allocation to the next power of two above `ecount`
        /// whenever it would otherwise stay oversized after a `pop`.
        const TIGHTEN = 0b010;
    }
}

struct Inner<T> {
    data: Vec<T>,
    ecount: usize,
    flags: ArrayFlags,
}

/// A resizable array of `T` with the capacity and refcounting discipline described in
/// the module documentation.
pub struct DynArray<T> {
    inner: Rc<Inner<T>>,
}

impl<T> fmt::Debug for DynArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynArray")
            .field("ecount", &self.inner.ecount)
            .field("ealloc", &self.inner.data.capacity())
            .field("flags", &self.inner.flags)
            .field("refcount", &Rc::strong_count(&self.inner))
            .finish()
    }
}

impl<T: Clone + Default> DynArray<T> {
    /// Creates an empty, resizable, non-tightening array.
    pub fn new() -> Self {
        Self::setup(0, ArrayFlags::RESIZABLE)
    }

    /// Creates an array with `ecount` elements already present (`T::default()`) and
    /// backing capacity rounded up to the next power of two.
    pub fn setup(ecount: usize, flags: ArrayFlags) -> Self {
        let ealloc = next_pow2(ecount.max(1));
        let mut data = Vec::with_capacity(ealloc);
        data.resize(ecount, T::default());
        Self {
            inner: Rc::new(Inner { data, ecount, flags }),
        }
    }

    fn inner_mut(&mut self) -> &mut Inner<T> {
        Rc::get_mut(&mut self.inner).expect(
            "DynArray: mutation attempted while a reference is outstanding; call unref first",
        )
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.inner.ecount
    }

    pub fn is_empty(&self) -> bool {
        self.inner.ecount == 0
    }

    /// Current backing capacity; always a power of two (or `0`).
    pub fn ealloc(&self) -> usize {
        self.inner.data.capacity()
    }

    /// Grows or shrinks the live element count to `ecount`, reallocating the backing
    /// store to the next power of two when `ecount` would not fit (or, with
    /// [`ArrayFlags::TIGHTEN`] set, shrinking to the smallest power of two that still
    /// fits whenever `ecount` leaves the current capacity more than half unused).
    ///
    /// # Panics
    /// Panics if the array is not [`ArrayFlags::RESIZABLE`], or if a reference is
    /// outstanding (see [`DynArray::push`]).
    pub fn resize(&mut self, ecount: usize) {
        assert!(
            self.inner.flags.contains(ArrayFlags::RESIZABLE),
            "DynArray::resize: array is not resizable"
        );
        let tighten = self.inner.flags.contains(ArrayFlags::TIGHTEN);
        let inner = self.inner_mut();

        let want_alloc = if ecount == 0 {
            0
        } else if ecount > inner.data.capacity() {
            next_pow2(ecount)
        } else if tighten {
            let mut newalloc = inner.data.capacity();
            while newalloc / 2 >= ecount {
                newalloc /= 2;
            }
            newalloc
        } else {
            inner.data.capacity()
        };

        if want_alloc != inner.data.capacity() {
            log::trace!(
                "DynArray::resize: ealloc {} -> {}",
                inner.data.capacity(),
                want_alloc
            );
            let mut grown = Vec::with_capacity(want_alloc);
            grown.extend(inner.data.drain(..ecount.min(inner.data.len())));
            inner.data = grown;
        }

        if ecount > inner.data.len() {
            inner.data.resize(ecount, T::default());
        } else {
            inner.data.truncate(ecount);
        }
        inner.ecount = ecount;
    }

    /// Appends `count` default-valued elements and returns the index of the first one.
    pub fn push_count(&mut self, count: usize) -> usize {
        let start = self.len();
        self.resize(start + count);
        start
    }

    /// Appends a single element and returns its index.
    pub fn push(&mut self, value: T) -> usize {
        let idx = self.push_count(1);
        self.inner_mut().data[idx] = value;
        idx
    }

    /// Removes and returns the last element.
    ///
    /// # Panics
    /// Panics if the array is empty.
    pub fn pop(&mut self) -> T {
        assert!(!self.is_empty(), "DynArray::pop: array is empty");
        let last = self.len() - 1;
        let value = self.inner.data[last].clone();
        self.resize(last);
        value
    }

    /// Clears [`ArrayFlags::RESIZABLE`], and, if [`ArrayFlags::TIGHTEN`] is set,
    /// shrinks the backing allocation to exactly fit the current element count.
    /// Without `TIGHTEN`, `ealloc` is left untouched. A frozen array can still be
    /// read and indexed but no longer grown or shrunk.
    pub fn freeze(&mut self) {
        let ecount = self.len();
        if self.inner.flags.contains(ArrayFlags::TIGHTEN) {
            let inner = self.inner_mut();
            let mut shrunk = Vec::with_capacity(ecount);
            shrunk.extend(inner.data.drain(..ecount));
            inner.data = shrunk;
        }
        let inner = self.inner_mut();
        inner.flags.remove(ArrayFlags::RESIZABLE);
    }

    /// Borrows the element at `index`.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn index(&self, index: usize) -> &T {
        &self.inner.data[index]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.inner.data[..self.inner.ecount]
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let ecount = self.inner.ecount;
        &mut self.inner_mut().data[..ecount]
    }

    /// Returns a cheap handle sharing the same storage, bumping the refcount.
    ///
    /// # Panics
    /// Panics if the array is still [`ArrayFlags::RESIZABLE`]. A shared handle to an
    /// array that could still grow or shrink underneath it would observe a dangling
    /// or stale view, so the array must be frozen (or built unresizable from the
    /// start) before it can be referenced.
    pub fn reference(&self) -> Self {
        assert!(
            !self.inner.flags.contains(ArrayFlags::RESIZABLE),
            "DynArray::reference: array is still resizable"
        );
        Self {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Decrements the refcount. Dropping the last outstanding handle is equivalent to
    /// calling this explicitly; it exists so callers modeling the original API's
    /// explicit `destroy` step can mirror it 1:1.
    pub fn unref(self) {
        drop(self);
    }

    /// Reports a leak if this array still has other live references, consuming it.
    /// Intended for end-of-scope checks in tests and in the resource-cleanup paths
    /// described in the crate's error-handling design.
    pub fn check_no_leak(self) -> Result<()> {
        let outstanding = Rc::strong_count(&self.inner) - 1;
        if outstanding > 0 {
            return Err(ForestError::Leak(format!(
                "{outstanding} reference(s) outstanding at drop"
            )));
        }
        Ok(())
    }
}

impl<T: Clone + Default> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Default + Ord> DynArray<T> {
    pub fn is_sorted(&self) -> bool {
        self.as_slice().windows(2).all(|w| w[0] <= w[1])
    }
}

fn next_pow2(n: usize) -> usize {
    if n <= 1 {
        1
    } else {
        n.next_power_of_two()
    }
}

/// Splits a sorted array of `T` into buckets by applying `bucket` (assumed
/// monotonically non-decreasing over the array) and returns, for each bucket index `0
/// ..= num_buckets`, the offset of the first element in that bucket — so
/// `offsets[num_buckets] == array.len()` and bucket `b` occupies
/// `offsets[b]..offsets[b + 1]`.
///
/// Ported from the original's multi-way binary search: rather than scanning linearly,
/// each boundary is found by bisecting between the previous boundary and the array's
/// end, which keeps the whole split at `O(array.len() * log(num_buckets))` instead of
/// a full `O(array.len())` per bucket.
pub fn split<T>(array: &[T], num_buckets: usize, bucket: impl Fn(&T) -> usize) -> Vec<usize> {
    let mut offsets = vec![0usize; num_buckets + 1];
    if array.is_empty() {
        return offsets;
    }

    offsets[0] = 0;
    let mut low = 0usize;
    for b in 1..num_buckets {
        let mut lo = low;
        let mut hi = array.len();
        // Find the first index whose bucket is >= b.
        while lo < hi {
            let guess = lo + (hi - lo) / 2;
            if bucket(&array[guess]) < b {
                lo = guess + 1;
            } else {
                hi = guess;
            }
        }
        offsets[b] = lo;
        low = lo;
    }
    offsets[num_buckets] = array.len();
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_rounds_capacity_to_power_of_two() {
        let arr: DynArray<i32> = DynArray::setup(5, ArrayFlags::RESIZABLE);
        assert_eq!(arr.ealloc(), 8);
        assert_eq!(arr.len(), 5);
    }

    #[test]
    fn push_pop_roundtrip() {
        let mut arr: DynArray<i32> = DynArray::new();
        for i in 0..10 {
            arr.push(i);
        }
        assert_eq!(arr.as_slice(), &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(arr.pop(), 9);
        assert_eq!(arr.len(), 9);
    }

    #[test]
    #[should_panic]
    fn resize_panics_when_not_resizable() {
        let mut arr: DynArray<i32> = DynArray::setup(4, ArrayFlags::empty());
        arr.resize(8);
    }

    #[test]
    fn freeze_with_tighten_shrinks_to_fit() {
        let mut arr: DynArray<i32> = DynArray::setup(0, ArrayFlags::RESIZABLE | ArrayFlags::TIGHTEN);
        for i in 0..3 {
            arr.push(i);
        }
        assert_eq!(arr.ealloc(), 4); // capacity grew past ecount while pushing
        arr.freeze();
        assert_eq!(arr.ealloc(), 3);
        assert!(!arr.inner.flags.contains(ArrayFlags::RESIZABLE));
    }

    #[test]
    fn freeze_without_tighten_leaves_ealloc_untouched() {
        let mut arr: DynArray<i32> = DynArray::new();
        for i in 0..3 {
            arr.push(i);
        }
        let ealloc_before = arr.ealloc();
        assert_eq!(ealloc_before, 4);
        arr.freeze();
        assert_eq!(arr.ealloc(), ealloc_before);
        assert!(!arr.inner.flags.contains(ArrayFlags::RESIZABLE));
    }

    #[test]
    fn reference_shares_storage_and_blocks_mutation() {
        let mut arr: DynArray<i32> = DynArray::new();
        arr.push(1);
        arr.freeze();
        let handle = arr.reference();
        assert_eq!(handle.as_slice(), arr.as_slice());
        drop(handle);
        // `arr` itself is frozen (not resizable) after `freeze`, matching `ref`'s
        // precondition that the array isn't still growable.
        assert_eq!(arr.len(), 1);
    }

    #[test]
    #[should_panic]
    fn reference_panics_while_still_resizable() {
        let arr: DynArray<i32> = DynArray::new();
        let _ = arr.reference();
    }

    #[test]
    fn split_matches_scenario_table() {
        let data = [0, 0, 0, 1, 1, 2, 2, 2, 2];
        let offsets = split(&data, 4, |&v| v as usize);
        assert_eq!(offsets, vec![0, 3, 5, 9, 9]);
    }

    #[test]
    fn split_on_empty_array() {
        let data: [i32; 0] = [];
        let offsets = split(&data, 3, |&v| v as usize);
        assert_eq!(offsets, vec![0, 0, 0, 0]);
    }

    #[test]
    fn is_sorted_detects_order() {
        let mut arr: DynArray<i32> = DynArray::new();
        for v in [1, 2, 2, 5] {
            arr.push(v);
        }
        assert!(arr.is_sorted());
        arr.push(3);
        assert!(!arr.is_sorted());
    }
}
