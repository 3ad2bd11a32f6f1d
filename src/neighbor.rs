// SPDX-License-Identifier: MIT OR Apache-2.0
//! Face and edge neighbor queries: finding the octant adjacent to a given one across
//! one of its faces or edges, crossing into a different root tree (and reconciling
//! orientation) when the neighbor falls outside the current tree.

use crate::connectivity::Connectivity;
use crate::dim::{Dimension, GridCoordinate, HasEdges, ROOT_LEN};
use crate::octant::Octant;
use crate::topology::{EDGE_CORNERS, EDGE_FACES};
use crate::transform::transform_edge;

#[inline]
fn axis_of_edge(edge: u8) -> usize {
    (edge / 4) as usize
}

fn in_plane_axes(face_axis: usize) -> [usize; 2] {
    match face_axis {
        0 => [1, 2],
        1 => [0, 2],
        2 => [0, 1],
        _ => unreachable!("face axis out of range"),
    }
}

/// The (possibly virtual, possibly outside-root) octant adjacent to `q` across
/// `face`, expressed in `q`'s own tree's coordinate frame.
pub fn face_neighbor<D: Dimension>(q: &Octant<D>, face: u8) -> Octant<D> {
    debug_assert!(face < D::FACES, "face index out of range");
    let axis = (face / 2) as usize;
    let h = q.len();
    let delta = if face % 2 == 0 { -h } else { h };
    let mut coords = [q.x, q.y, q.z];
    coords[axis] += delta;
    Octant::new_raw(coords[0], coords[1], coords[2], q.level)
}

/// Like [`face_neighbor`], but when the neighbor falls outside the root it is
/// re-expressed in the adjoining tree's frame via the connectivity's face transform.
/// Returns `None` if that face is a physical domain boundary.
pub fn face_neighbor_extra<D: Dimension>(
    q: &Octant<D>,
    tree: u32,
    face: u8,
    conn: &Connectivity<D>,
) -> Option<(Octant<D>, u32)> {
    let candidate = face_neighbor(q, face);
    let axis = (face / 2) as usize;
    let coords = [candidate.x, candidate.y, candidate.z];

    if (0..ROOT_LEN).contains(&coords[axis]) {
        return Some((candidate, tree));
    }

    let ft = conn.face_transform(tree, face)?;
    let h = q.len();
    let naxis = (ft.nface / 2) as usize;
    let mut out = [0 as GridCoordinate; 3];
    out[naxis] = if ft.nface % 2 == 0 { 0 } else { ROOT_LEN - h };

    let axes = in_plane_axes(axis);
    let naxes = in_plane_axes(naxis);
    let in_plane_count = if D::DIM == 3 { 2 } else { 1 };
    for i in 0..in_plane_count {
        let src = coords[axes[i]];
        let mapped = if ft.flip[i] { ROOT_LEN - h - src } else { src };
        out[naxes[ft.perm[i] as usize]] = mapped;
    }
    Some((Octant::new_raw(out[0], out[1], out[2], q.level), ft.ntree))
}

/// The octant diagonally adjacent to `q` across `edge` (one of the twelve edges of
/// `q` itself), moving `q` by one side length along the two axes perpendicular to the
/// edge and leaving the axis the edge runs along untouched.
pub fn edge_neighbor<D: HasEdges>(q: &Octant<D>, edge: u8) -> Octant<D> {
    debug_assert!(edge < 12, "edge index out of range");
    let axis = axis_of_edge(edge);
    let h = q.len();
    let corner = EDGE_CORNERS[edge as usize][0];
    let mut coords = [q.x, q.y, q.z];
    for perp in 0..3usize {
        if perp == axis {
            continue;
        }
        let bit = (corner >> perp) & 1 != 0;
        coords[perp] += if bit { h } else { -h };
    }
    Octant::new_raw(coords[0], coords[1], coords[2], q.level)
}

/// Whether `q` lies strictly outside the root tree along both axes perpendicular to
/// `edge`, and inside along the edge's own axis — i.e. `q` is a virtual octant
/// reachable only by actually crossing that tree edge, not just a face.
pub fn is_outside_edge<D: HasEdges>(q: &Octant<D>, edge: u8) -> bool {
    let axis = axis_of_edge(edge);
    let corner = EDGE_CORNERS[edge as usize][0];
    let coords = [q.x, q.y, q.z];
    for perp in 0..3usize {
        if perp == axis {
            continue;
        }
        let bit = (corner >> perp) & 1 != 0;
        let outside = if bit {
            coords[perp] >= ROOT_LEN
        } else {
            coords[perp] < 0
        };
        if !outside {
            return false;
        }
    }
    (0..ROOT_LEN).contains(&coords[axis])
}

/// Returns the local edge index `q` is outside of, if any, per [`is_outside_edge`].
pub fn is_outside_edge_extra<D: HasEdges>(q: &Octant<D>) -> Option<u8> {
    (0..12).find(|&e| is_outside_edge(q, e))
}

/// Whether `q` sits exactly on tree `edge`: its two perpendicular coordinates are
/// pinned to that edge's corner pattern, with no slack (unlike [`is_outside_edge`],
/// which additionally requires stepping past the boundary).
pub fn touches_edge<D: HasEdges>(q: &Octant<D>, edge: u8) -> bool {
    let axis = axis_of_edge(edge);
    let corner = EDGE_CORNERS[edge as usize][0];
    let h = q.len();
    let coords = [q.x, q.y, q.z];
    for perp in 0..3usize {
        if perp == axis {
            continue;
        }
        let bit = (corner >> perp) & 1 != 0;
        let expected = if bit { ROOT_LEN - h } else { 0 };
        if coords[perp] != expected {
            return false;
        }
    }
    true
}

/// Translates `q` onto `edge` of its own tree, keeping its position along the edge's
/// axis and `level` unchanged. Used to build a synthetic edge-touching candidate from
/// an octant that merely happens to share the edge's axis, e.g. when probing which
/// neighbor a coarsened octant newly touches.
pub fn shift_edge<D: HasEdges>(q: &Octant<D>, edge: u8) -> Octant<D> {
    let axis = axis_of_edge(edge);
    let corner = EDGE_CORNERS[edge as usize][0];
    let h = q.len();
    let mut coords = [q.x, q.y, q.z];
    for perp in 0..3usize {
        if perp == axis {
            continue;
        }
        let bit = (corner >> perp) & 1 != 0;
        coords[perp] = if bit { ROOT_LEN - h } else { 0 };
    }
    Octant::new_raw(coords[0], coords[1], coords[2], q.level)
}

/// Like [`edge_neighbor`], but crosses into a neighboring tree (via one face
/// transform, or via the connectivity's registered edge transforms) when the
/// neighbor falls outside the root.
///
/// Unlike [`face_neighbor_extra`] (at most one tree can lie across a face), an edge
/// can be shared by any number of trees meeting at that edge, so this returns every
/// `(neighbor, tree)` pair the connectivity knows about rather than just the first.
pub fn edge_neighbor_extra<D: HasEdges>(
    q: &Octant<D>,
    tree: u32,
    edge: u8,
    conn: &Connectivity<D>,
) -> Vec<(Octant<D>, u32)> {
    let candidate = edge_neighbor(q, edge);
    if candidate.is_inside_root() {
        return vec![(candidate, tree)];
    }

    let axis = axis_of_edge(edge);
    let coords = [candidate.x, candidate.y, candidate.z];
    let outside_axes: Vec<usize> = (0..3)
        .filter(|&a| a != axis && !(0..ROOT_LEN).contains(&coords[a]))
        .collect();

    if outside_axes.len() == 1 {
        // Only one of the two perpendicular axes left the root: a single face
        // crossing already lands us in the right tree.
        let out_axis = outside_axes[0];
        let Some(face) = EDGE_FACES[edge as usize]
            .iter()
            .copied()
            .find(|&f| (f / 2) as usize == out_axis)
        else {
            return Vec::new();
        };
        return face_neighbor_extra(&candidate, tree, face, conn)
            .into_iter()
            .collect();
    }

    // Both perpendicular axes left the root: every registered tree-edge transform
    // names a distinct tree touching this edge.
    conn.edge_transforms(tree, edge)
        .iter()
        .filter_map(|et| {
            let transformed = transform_edge(q, edge, et);
            transformed.is_extended().then_some((transformed, et.ntree))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::star;
    use crate::dim::Dim3;

    #[test]
    fn face_neighbor_steps_one_side_length() {
        let q = Octant::<Dim3>::new(0, 0, 0, 5);
        let h = q.len();
        let n = face_neighbor(&q, 1); // +x face
        assert_eq!(n.x, q.x + h);
        assert_eq!(n.y, q.y);
        assert_eq!(n.z, q.z);
    }

    #[test]
    fn face_neighbor_extra_on_physical_boundary_is_none() {
        let conn = star::<Dim3>();
        let q = Octant::<Dim3>::new(0, 0, 0, 5);
        assert!(face_neighbor_extra(&q, 0, 0, &conn).is_none());
    }

    #[test]
    fn face_neighbor_extra_inside_root_keeps_tree() {
        let conn = star::<Dim3>();
        let q = Octant::<Dim3>::new(1 << 20, 1 << 20, 1 << 20, 5);
        let (n, tree) = face_neighbor_extra(&q, 0, 1, &conn).unwrap();
        assert_eq!(tree, 0);
        assert_eq!(n, face_neighbor(&q, 1));
    }

    #[test]
    fn edge_neighbor_moves_both_perpendicular_axes() {
        let q = Octant::<Dim3>::new(1 << 20, 1 << 20, 1 << 20, 5);
        let h = q.len();
        // Edge 0 varies along x (corners {0,1} => perpendicular bits both 0).
        let n = edge_neighbor(&q, 0);
        assert_eq!(n.x, q.x);
        assert_eq!(n.y, q.y - h);
        assert_eq!(n.z, q.z - h);
    }

    #[test]
    fn touches_edge_requires_exact_pin() {
        let h = crate::dim::qlen(5);
        let q = Octant::<Dim3>::new(1 << 20, 0, 0, 5);
        assert!(touches_edge(&q, 0));
        let off = Octant::<Dim3>::new_raw(1 << 20, h, 0, 5);
        assert!(!touches_edge(&off, 0));
    }

    #[test]
    fn shift_edge_pins_perpendicular_axes() {
        let q = Octant::<Dim3>::new(1 << 20, 1 << 20, 1 << 20, 5);
        let shifted = shift_edge(&q, 0);
        assert!(touches_edge(&shifted, 0));
        assert_eq!(shifted.x, q.x);
    }

    #[test]
    fn is_outside_edge_detects_double_excursion() {
        let h = crate::dim::qlen(5);
        let q = Octant::<Dim3>::new_raw(1 << 20, -h, -h, 5);
        assert!(is_outside_edge(&q, 0));
        assert_eq!(is_outside_edge_extra(&q), Some(0));
    }

    #[test]
    fn edge_neighbor_extra_single_axis_excursion_is_a_two_hop() {
        use crate::connectivity::rotcubes;
        let conn = rotcubes();
        let h = crate::dim::qlen(5);
        // Edge 5 (axis=y, perpendicular x/z), positioned so only x leaves the root:
        // a single face crossing (via the glued +x face) already resolves it.
        let q = Octant::<Dim3>::new_raw(ROOT_LEN - h, 1 << 20, h, 5);
        let hits = edge_neighbor_extra(&q, 0, 5, &conn);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].1, 1);
    }

    #[test]
    fn edge_neighbor_extra_on_physical_boundary_is_empty() {
        let conn = star::<Dim3>();
        let h = crate::dim::qlen(5);
        let q = Octant::<Dim3>::new_raw(h, h, -h, 5);
        assert!(edge_neighbor_extra(&q, 0, 8, &conn).is_empty());
    }
}
