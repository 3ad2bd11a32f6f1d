// SPDX-License-Identifier: MIT OR Apache-2.0
//! Coordinate transforms for crossing a shared edge between two root trees.
//!
//! An edge-touching octant has exactly one "free" coordinate, sliding along the edge;
//! the other two are pinned to either `0` or `ROOT_LEN - len` depending on which of
//! the edge's two corners it sits at. Crossing into a neighbor tree means carrying the
//! free coordinate over (flipped if the neighbor's edge runs the opposite way) and
//! re-deriving the two pinned coordinates from the neighbor's own corner pattern.

use crate::connectivity::EdgeTransform;
use crate::dim::{GridCoordinate, HasEdges, ROOT_LEN};
use crate::octant::Octant;
use crate::topology::EDGE_CORNERS;

#[inline]
fn axis_of_edge(edge: u8) -> usize {
    (edge / 4) as usize
}

/// Maps `q` — an extended octant known to touch `edge` of its own tree — into the
/// frame of the tree on the other side of `et`.
pub fn transform_edge<D: HasEdges>(q: &Octant<D>, edge: u8, et: &EdgeTransform) -> Octant<D> {
    debug_assert!(edge < 12, "edge index out of range");
    debug_assert!(et.nedge < 12, "neighbor edge index out of range");

    let axis = axis_of_edge(edge);
    let naxis = axis_of_edge(et.nedge);
    let h = q.len();
    let coords = [q.x, q.y, q.z];
    let slide = coords[axis];
    let nslide = if et.nflip { ROOT_LEN - h - slide } else { slide };

    let ncorner = EDGE_CORNERS[et.nedge as usize][0];
    let mut out = [0 as GridCoordinate; 3];
    out[naxis] = nslide;
    for axis_idx in 0..3usize {
        if axis_idx == naxis {
            continue;
        }
        let set = (ncorner >> axis_idx) & 1 != 0;
        out[axis_idx] = if set { ROOT_LEN - h } else { 0 };
    }
    Octant::new_raw(out[0], out[1], out[2], q.level)
}
