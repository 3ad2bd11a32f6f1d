// SPDX-License-Identifier: MIT OR Apache-2.0
//! The coarsening sweep: merging families of `D::CHILDREN` sibling leaves in a sorted
//! tree array back into their common parent, in place.
//!
//! A single pass walks the array with two cursors, `before` (where the next kept or
//! merged octant is written) and `first` (the next octant to inspect); `before` never
//! runs ahead of `first`; so writing through `before` can never clobber data that
//! `first` hasn't read yet. Merging one family can expose a new one a level up (the
//! parent just written may itself now complete a family with its own siblings
//! elsewhere in the array), so passes repeat until one makes no change.

use crate::dim::Dimension;
use crate::family::is_family;
use crate::octant::Octant;

/// Runs one compaction pass over `slice` (assumed sorted in Morton order), merging
/// every maximal family for which `should_coarsen` returns `true`. `init_fn` runs on
/// each newly written parent before it's placed in the array, mirroring the
/// original's per-quadrant `init_fn` callback. Returns the number of live octants
/// remaining at the front of `slice` and whether anything changed.
fn coarsen_pass<D: Dimension>(
    slice: &mut [Octant<D>],
    mut should_coarsen: impl FnMut(&[Octant<D>]) -> bool,
    mut init_fn: impl FnMut(&mut Octant<D>),
) -> (usize, bool) {
    let children = D::CHILDREN as usize;
    let n = slice.len();
    let mut before = 0usize;
    let mut first = 0usize;
    let mut changed = false;

    while first < n {
        if first + children <= n {
            let mut family = [Octant::<D>::default(); 8];
            family[..children].copy_from_slice(&slice[first..first + children]);
            let family = &family[..children];
            if is_family::<D>(family) && should_coarsen(family) {
                let mut parent = family[0].parent();
                init_fn(&mut parent);
                slice[before] = parent;
                before += 1;
                first += children;
                changed = true;
                continue;
            }
        }
        slice[before] = slice[first];
        before += 1;
        first += 1;
    }

    (before, changed)
}

/// Coarsens `array` in place: merges maximal sibling families accepted by
/// `should_coarsen` into their parent, running `init_fn` on each new parent.
///
/// When `recursive` is `true`, the sweep restarts from the beginning whenever a pass
/// produced at least one new parent (since that parent may complete a family of its
/// own one level up), cascading all the way to a fixpoint. When `false`, exactly one
/// pass runs, matching the original's distinction between a single-level coarsen and
/// a recursive one.
///
/// `should_coarsen` receives the `D::CHILDREN` candidate siblings in child-id order
/// and decides whether to replace them with their parent.
pub fn coarsen<D: Dimension>(
    array: &mut crate::array::DynArray<Octant<D>>,
    recursive: bool,
    mut should_coarsen: impl FnMut(&[Octant<D>]) -> bool,
    mut init_fn: impl FnMut(&mut Octant<D>),
) {
    let before_count = array.len();
    loop {
        let new_len;
        let changed;
        {
            let slice = array.as_mut_slice();
            let (n, c) = coarsen_pass::<D>(slice, &mut should_coarsen, &mut init_fn);
            new_len = n;
            changed = c;
        }
        array.resize(new_len);
        if !changed || !recursive {
            break;
        }
    }
    log::trace!(
        "coarsen: {} quadrants -> {}",
        before_count,
        array.len()
    );
}
