// SPDX-License-Identifier: MIT OR Apache-2.0
//! Integer-coordinate quadtree/octree geometry and topology kernel.
//!
//! This crate implements the hard core of a distributed adaptive-mesh-refinement
//! forest: the octant value type and its bit arithmetic ([`octant`]), a refcounted
//! dynamic array with a multi-way split ([`array`]), static edge/face/corner topology
//! tables ([`topology`]), cross-tree face and edge neighbor queries ([`neighbor`],
//! [`transform`], [`connectivity`]), the in-place sibling-family coarsening sweep
//! ([`coarsen`]), and a pluggable binomial-tree parallel reduction ([`reduce`]).
//!
//! What it deliberately does not do: drive MPI, load a connectivity file, write VTK
//! output, or orchestrate a full forest refine/balance/partition pipeline. Those are
//! collaborators that sit on top of the interfaces exposed here.

pub mod array;
pub mod coarsen;
pub mod config;
pub mod connectivity;
pub mod dim;
pub mod error;
pub mod family;
pub mod neighbor;
pub mod octant;
pub mod reduce;
pub mod topology;
pub mod transform;

pub use array::{ArrayFlags, DynArray};
pub use coarsen::coarsen;
pub use config::ForestConfig;
pub use connectivity::{Connectivity, EdgeTransform, FaceTransform};
pub use dim::{Dim2, Dim3, Dimension, HasEdges};
pub use error::{ForestError, Result};
pub use family::is_family;
pub use neighbor::{
    edge_neighbor, edge_neighbor_extra, face_neighbor, face_neighbor_extra, is_outside_edge,
    is_outside_edge_extra, shift_edge, touches_edge,
};
pub use octant::Octant;
pub use reduce::{allreduce, reduce, BitReduceOp, BitReduceScalar, ReduceGroup, ReduceOp, ReduceScalar};
pub use transform::transform_edge;
