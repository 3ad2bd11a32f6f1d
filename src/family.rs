// SPDX-License-Identifier: MIT OR Apache-2.0
//! Family recognition.
//!
//! The original C implementation had three near-identical overloads of `is_family`
//! (by value up to 8 arguments, by value-array, by pointer-array) purely to cope with
//! the absence of a uniform "array of up to 8 elements" abstraction. A Rust slice
//! already is that abstraction regardless of whether the caller owns a `Vec`, an
//! array, or a window borrowed from someone else's storage, so there is exactly one
//! function here (see the Open Question note in the crate design notes).

use crate::dim::{qlen, Dimension};
use crate::octant::Octant;

/// Returns `true` iff `children` is exactly the `D::CHILDREN` children of a common
/// parent, listed in child-id order (0, 1, 2, ... — the order they already occupy in
/// Morton order within a sorted tree array).
///
/// # Panics
/// Panics (in debug builds) if `children.len() != D::CHILDREN as usize` or if any
/// element fails [`Octant::is_extended`] — both are precondition violations on the
/// caller's part, not a "not a family" answer.
pub fn is_family<D: Dimension>(children: &[Octant<D>]) -> bool {
    debug_assert_eq!(
        children.len(),
        D::CHILDREN as usize,
        "is_family expects exactly D::CHILDREN candidates"
    );
    debug_assert!(
        children.iter().all(Octant::is_extended),
        "is_family candidates must be (at least) extended octants"
    );

    let level = children[0].level;
    if level == 0 {
        return false;
    }
    if !children.iter().all(|q| q.level == level) {
        return false;
    }

    let inc = qlen(level);
    let origin = children[0];
    children.iter().enumerate().all(|(k, q)| {
        let dx = if k & 0x1 != 0 { inc } else { 0 };
        let dy = if k & 0x2 != 0 { inc } else { 0 };
        let dz = if D::DIM == 3 && k & 0x4 != 0 { inc } else { 0 };
        q.x == origin.x + dx && q.y == origin.y + dy && q.z == origin.z + dz
    })
}
