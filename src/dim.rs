// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dimension markers and the integer constants that size a quadtree/octree forest.
//!
//! [`Dim2`] and [`Dim3`] are zero-sized marker types selecting quadrant vs. octant
//! behaviour at compile time, the way the teacher codebase uses const generics and
//! marker types (`CHUNK_SIZE`, `Tex::Tile`) to push per-shape differences into the
//! type system instead of runtime branches.

use std::fmt;

/// Coordinate type for octant corners. Signed so that *extended* (virtual,
/// outside-root) coordinates can be represented directly, one cell below zero or
/// above [`ROOT_LEN`].
pub type GridCoordinate = i32;

/// A grid-aligned point; reused from `cgmath` rather than hand-rolled, matching the
/// teacher's own `GridPoint = Point3<GridCoordinate>` convention.
pub type GridPoint = cgmath::Point3<GridCoordinate>;

/// Refinement depth at which the root tree's side length hits exactly 1.
///
/// Chosen so `ROOT_LEN = 1 << MAXLEVEL` and one cell of slack on either side (for
/// extended/virtual coordinates) still fit in [`GridCoordinate`].
pub const MAXLEVEL: u8 = 30;

/// Deepest level an octant may legally occupy (`MAXLEVEL` itself is reserved for
/// node/corner points, which have zero extent).
pub const QMAXLEVEL: u8 = MAXLEVEL - 1;

/// Side length of the root tree.
pub const ROOT_LEN: GridCoordinate = 1 << MAXLEVEL;

/// Side length of an octant at the given level.
#[inline]
pub const fn qlen(level: u8) -> GridCoordinate {
    1 << (MAXLEVEL - level)
}

/// The largest coordinate an octant's lower corner may have on a given axis at
/// `level`, for it to remain inside the root.
#[inline]
pub const fn last_offset(level: u8) -> GridCoordinate {
    ROOT_LEN - qlen(level)
}

/// Selects quadrant (2D) vs. octant (3D) behaviour.
///
/// Sealed: only [`Dim2`] and [`Dim3`] implement it, so the rest of the crate can
/// match exhaustively on `Self::DIM` without worrying about a third dimensionality
/// appearing.
pub trait Dimension: Copy + Eq + fmt::Debug + private::Sealed + 'static {
    /// 2 or 3.
    const DIM: u8;
    /// `1 << DIM`: number of children of a parent octant, and of corners of a cube.
    const CHILDREN: u8 = 1 << Self::DIM;
    /// `2 * DIM`: number of faces of a cube.
    const FACES: u8 = 2 * Self::DIM;
}

/// Marker type for 2D quadtree forests.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Dim2;

/// Marker type for 3D octree forests.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Dim3;

impl Dimension for Dim2 {
    const DIM: u8 = 2;
}

impl Dimension for Dim3 {
    const DIM: u8 = 3;
}

/// Extra constants that exist only in 3D: edges have no analogue in a quadtree.
pub trait HasEdges: Dimension {
    /// Number of edges of a cube.
    const EDGES: u8 = 12;
}

impl HasEdges for Dim3 {}

mod private {
    pub trait Sealed {}
    impl Sealed for super::Dim2 {}
    impl Sealed for super::Dim3 {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_and_faces() {
        assert_eq!(Dim2::CHILDREN, 4);
        assert_eq!(Dim2::FACES, 4);
        assert_eq!(Dim3::CHILDREN, 8);
        assert_eq!(Dim3::FACES, 6);
        assert_eq!(Dim3::EDGES, 12);
    }

    #[test]
    fn qlen_and_last_offset() {
        assert_eq!(qlen(MAXLEVEL), 1);
        assert_eq!(qlen(0), ROOT_LEN);
        assert_eq!(last_offset(0), 0);
        assert_eq!(last_offset(QMAXLEVEL), ROOT_LEN - 2);
    }
}
