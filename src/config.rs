// SPDX-License-Identifier: MIT OR Apache-2.0
//! Library-wide tunables, gathered into one plain-data struct in the style of the
//! teacher's `TriangulatorOptions`/`GraphicsOptions`: a value callers construct once
//! and thread through the constructors that need it, rather than a pile of
//! free-standing parameters.

use crate::array::ArrayFlags;

/// Construction-time tunables for [`DynArray`](crate::array::DynArray) and
/// tree-backed structures built on top of it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ForestConfig {
    /// Shrink backing storage back down when it becomes mostly unused. Mirrors the
    /// original's `tighten` flag; on by default, since AMR trees shrink as often as
    /// they grow.
    pub tighten: bool,
}

impl ForestConfig {
    pub fn array_flags(&self) -> ArrayFlags {
        let mut flags = ArrayFlags::RESIZABLE;
        if self.tighten {
            flags |= ArrayFlags::TIGHTEN;
        }
        flags
    }
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self { tighten: true }
    }
}
