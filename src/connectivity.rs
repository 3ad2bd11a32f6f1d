// SPDX-License-Identifier: MIT OR Apache-2.0
//! The coarse mesh: a graph of root trees glued together along faces and (in 3D)
//! edges, each gluing carrying the orientation needed to map an octant's coordinates
//! from one tree's frame into its neighbor's.
//!
//! A tree boundary that is *not* glued to another tree is a physical domain boundary;
//! following the original convention, that is encoded as a tree referencing itself
//! with the same face index rather than via a sentinel value.

use crate::dim::{Dimension, HasEdges};

/// The coordinate remap needed to cross a face from one tree into another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceTransform {
    /// Neighbor tree reached by crossing this face.
    pub ntree: u32,
    /// The neighbor's local face index that this face glues to.
    pub nface: u8,
    /// Axis permutation of the two in-plane axes: `perm[i]` is which of the
    /// neighbor's in-plane axes corresponds to this face's `i`-th in-plane axis.
    pub perm: [u8; 2],
    /// Whether each of the two in-plane axes is flipped across the gluing.
    pub flip: [bool; 2],
}

/// The coordinate remap needed to cross an edge from one tree into another
/// (3D only).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeTransform {
    /// Neighbor tree sharing this edge.
    pub ntree: u32,
    /// The neighbor's local edge index.
    pub nedge: u8,
    /// Whether the neighbor's edge runs opposite to this tree's, i.e. the endpoint
    /// that is this edge's corner 0 is the neighbor's corner 1.
    pub nflip: bool,
}

/// A coarse connectivity graph of `num_trees` unit root trees.
#[derive(Clone, Debug)]
pub struct Connectivity<D: Dimension> {
    num_trees: u32,
    // tree_to_tree[t][f] / tree_to_face[t][f]: neighbor tree and face reached by
    // crossing face f of tree t. A physical boundary is encoded as
    // tree_to_tree[t][f] == t && tree_to_face[t][f] == (f, no flip).
    tree_to_tree: Vec<Vec<u32>>,
    tree_to_face: Vec<Vec<FaceTransform>>,
    // Only populated when D: HasEdges. tree_to_edge[t][e] indexes into
    // `edge_participants` when this tree-edge is part of a nonconforming multi-tree
    // edge; None means the edge is fully determined by its bordering faces.
    tree_to_edge: Vec<Vec<Option<u32>>>,
    edge_participants: Vec<Vec<EdgeTransform>>,
    _dim: std::marker::PhantomData<D>,
}

impl<D: Dimension> Connectivity<D> {
    pub fn num_trees(&self) -> u32 {
        self.num_trees
    }

    /// The face transform for crossing `face` of `tree`, or `None` if that face is a
    /// physical domain boundary.
    pub fn face_transform(&self, tree: u32, face: u8) -> Option<FaceTransform> {
        let ft = self.tree_to_face[tree as usize][face as usize];
        if ft.ntree == tree && ft.nface == face && !ft.flip[0] && !ft.flip[1] {
            None
        } else {
            Some(ft)
        }
    }

    pub fn tree_to_tree(&self, tree: u32, face: u8) -> u32 {
        self.tree_to_tree[tree as usize][face as usize]
    }
}

impl<D: HasEdges> Connectivity<D> {
    /// All other trees sharing `edge` of `tree` (excluding `tree` itself), with the
    /// transform needed to map an octant across. Empty if the edge borders no other
    /// tree beyond what its two adjoining faces already describe.
    pub fn edge_transforms(&self, tree: u32, edge: u8) -> &[EdgeTransform] {
        match self.tree_to_edge[tree as usize][edge as usize] {
            Some(id) => &self.edge_participants[id as usize],
            None => &[],
        }
    }
}

/// Builds the trivial one-tree connectivity: every face is a physical boundary. The
/// simplest possible coarse mesh, used as a baseline in boundary-scenario tests.
pub fn star<D: Dimension>() -> Connectivity<D> {
    let faces = D::FACES as usize;
    let self_faces: Vec<FaceTransform> = (0..faces as u8)
        .map(|f| FaceTransform {
            ntree: 0,
            nface: f,
            perm: [0, 1],
            flip: [false, false],
        })
        .collect();
    Connectivity {
        num_trees: 1,
        tree_to_tree: vec![vec![0; faces]],
        tree_to_face: vec![self_faces],
        tree_to_edge: vec![vec![None; edge_count::<D>()]],
        edge_participants: Vec::new(),
        _dim: std::marker::PhantomData,
    }
}

const fn edge_count<D: Dimension>() -> usize {
    // 12 for any 3D dimension marker, 0 (unused) for 2D; kept generic so `star`
    // doesn't need a HasEdges bound.
    if D::DIM == 3 {
        12
    } else {
        0
    }
}

/// Two cubes glued face-to-face with a quarter-turn twist, the minimal connectivity
/// that exercises a non-identity [`FaceTransform`]. Named after the classic
/// "rotated cubes" connectivity used to stress-test cross-tree transforms.
pub fn rotcubes() -> Connectivity<crate::dim::Dim3> {
    use crate::dim::Dim3;
    let faces = Dim3::FACES as usize;

    // Tree 0's face 1 (+x) glues to tree 1's face 0 (-x), rotated 90 degrees in the
    // shared y-z plane: tree 1's y axis is tree 0's z axis, and tree 1's z axis is
    // tree 0's flipped y axis.
    let mut t0: Vec<FaceTransform> = (0..faces as u8)
        .map(|f| FaceTransform {
            ntree: 0,
            nface: f,
            perm: [0, 1],
            flip: [false, false],
        })
        .collect();
    let mut t1 = t0.clone();
    for f in t1.iter_mut() {
        f.ntree = 1;
    }

    t0[1] = FaceTransform {
        ntree: 1,
        nface: 0,
        perm: [1, 0],
        flip: [false, true],
    };
    t1[0] = FaceTransform {
        ntree: 0,
        nface: 1,
        perm: [1, 0],
        flip: [true, false],
    };

    let mut tt0 = vec![0u32; faces];
    tt0[1] = 1;
    let mut tt1 = vec![1u32; faces];
    tt1[0] = 0;

    Connectivity {
        num_trees: 2,
        tree_to_tree: vec![tt0, tt1],
        tree_to_face: vec![t0, t1],
        tree_to_edge: vec![vec![None; 12]; 2],
        edge_participants: Vec::new(),
        _dim: std::marker::PhantomData,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dim::{Dim2, Dim3};

    #[test]
    fn star_has_no_face_transforms() {
        let conn = star::<Dim3>();
        for f in 0..Dim3::FACES {
            assert_eq!(conn.face_transform(0, f), None);
        }
        let conn2 = star::<Dim2>();
        for f in 0..Dim2::FACES {
            assert_eq!(conn2.face_transform(0, f), None);
        }
    }

    #[test]
    fn rotcubes_glues_exactly_one_face_pair() {
        let conn = rotcubes();
        assert!(conn.face_transform(0, 1).is_some());
        assert!(conn.face_transform(1, 0).is_some());
        for f in [0, 2, 3, 4, 5] {
            assert_eq!(conn.face_transform(0, f), None);
        }
    }

    #[test]
    fn rotcubes_transform_is_mutually_consistent() {
        let conn = rotcubes();
        let fwd = conn.face_transform(0, 1).unwrap();
        let back = conn.face_transform(1, 0).unwrap();
        assert_eq!(fwd.ntree, 1);
        assert_eq!(back.ntree, 0);
        assert_eq!(fwd.perm, back.perm);
    }
}
