// SPDX-License-Identifier: MIT OR Apache-2.0
//! A pluggable binomial-tree reduction over an abstract group of ranks.
//!
//! [`ReduceGroup`] is the transport seam: a real deployment backs it with whatever
//! collective channel the partitioner uses, and [`ChannelGroup`] (test-only) backs it
//! with `crossbeam-channel` so the algorithm can be exercised without any real
//! process boundary. The reduction itself folds group sizes that are not a power of
//! two down to one that is (the "extra" ranks above the largest power of two send
//! once into the main tree) before running the usual recursive halving exchange.

use std::ops::{BitAnd, BitOr, BitXor};

use num_traits::{Bounded, Num};

use crate::error::{ForestError, Result};

/// Types a reduction can combine with the four arithmetic/order operators. Blanket
/// implemented for every numeric type that is `Copy`, ordered, and has additive and
/// multiplicative identities — which is exactly the built-in integer and float types.
pub trait ReduceScalar: Copy + PartialOrd + Num + Bounded {}
impl<T: Copy + PartialOrd + Num + Bounded> ReduceScalar for T {}

/// The subset of [`ReduceScalar`] types that additionally support bitwise
/// and/or/xor reduction — the integer types, but not `f32`/`f64`.
pub trait BitReduceScalar:
    ReduceScalar + BitAnd<Output = Self> + BitOr<Output = Self> + BitXor<Output = Self>
{
}
impl<T> BitReduceScalar for T where
    T: ReduceScalar + BitAnd<Output = T> + BitOr<Output = T> + BitXor<Output = T>
{
}

/// An arithmetic/order reduction operator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReduceOp {
    Max,
    Min,
    Sum,
    Prod,
}

impl ReduceOp {
    pub fn apply<T: ReduceScalar>(self, a: T, b: T) -> T {
        match self {
            ReduceOp::Max => {
                if a >= b {
                    a
                } else {
                    b
                }
            }
            ReduceOp::Min => {
                if a <= b {
                    a
                } else {
                    b
                }
            }
            ReduceOp::Sum => a + b,
            ReduceOp::Prod => a * b,
        }
    }
}

/// A bitwise reduction operator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BitReduceOp {
    And,
    Or,
    Xor,
}

impl BitReduceOp {
    pub fn apply<T: BitReduceScalar>(self, a: T, b: T) -> T {
        match self {
            BitReduceOp::And => a & b,
            BitReduceOp::Or => a | b,
            BitReduceOp::Xor => a ^ b,
        }
    }
}

/// An abstract collective group: enough to run a point-to-point binomial exchange
/// without the reduction caring how ranks actually talk to each other.
pub trait ReduceGroup<T> {
    fn rank(&self) -> u32;
    fn size(&self) -> u32;
    /// Blocking send of `value` to rank `to`.
    fn send(&self, to: u32, value: T) -> Result<()>;
    /// Blocking receive of a value sent by rank `from`.
    fn recv(&self, from: u32) -> Result<T>;
}

/// Largest power of two less than or equal to `size`.
fn largest_pow2_le(size: u32) -> u32 {
    assert!(size > 0, "group size must be positive");
    1u32 << (31 - size.leading_zeros())
}

/// Renumbers `rank` relative to `root` so that rank `root` becomes `0`, preserving
/// the cyclic order the binomial tree pairing relies on.
fn bias(rank: u32, root: u32, size: u32) -> u32 {
    (rank + size - root) % size
}

fn unbias(biased: u32, root: u32, size: u32) -> u32 {
    (biased + root) % size
}

/// Reduces `value` across every rank in `group` to `root`, combining with `op`.
/// Every non-root rank returns `Ok(None)`; `root` returns `Ok(Some(result))`.
pub fn reduce<T, G>(group: &G, value: T, op: impl Fn(T, T) -> T, root: u32) -> Result<Option<T>>
where
    T: Copy,
    G: ReduceGroup<T>,
{
    let size = group.size();
    let rank = bias(group.rank(), root, size);
    let pow2 = largest_pow2_le(size);
    let extra = size - pow2;

    // Ranks at or above `pow2` fold once into the power-of-two core.
    let mut acc = value;
    if rank >= pow2 {
        let target = unbias(rank - pow2, root, size);
        group.send(target, acc)?;
        return Ok(None);
    }
    if rank < extra {
        let source = unbias(rank + pow2, root, size);
        acc = op(acc, group.recv(source)?);
    }

    // Recursive halving exchange within the power-of-two core, converging on rank 0.
    let mut mask = 1u32;
    while mask < pow2 {
        let partner = rank ^ mask;
        if partner < pow2 {
            if rank & mask == 0 {
                let from = unbias(partner, root, size);
                log::trace!("reduce: rank {rank} receiving from biased rank {partner}");
                acc = op(acc, group.recv(from)?);
            } else {
                let to = unbias(partner, root, size);
                log::trace!("reduce: rank {rank} sending to biased rank {partner}");
                group.send(to, acc)?;
                return Ok(None);
            }
        }
        mask <<= 1;
    }

    Ok(Some(acc))
}

/// Like [`reduce`], but every rank ends up with the combined result.
pub fn allreduce<T, G>(group: &G, value: T, op: impl Fn(T, T) -> T + Copy, root: u32) -> Result<T>
where
    T: Copy,
    G: ReduceGroup<T>,
{
    let result = reduce(group, value, op, root)?;
    broadcast(group, result, root)
}

fn broadcast<T, G>(group: &G, value: Option<T>, root: u32) -> Result<T>
where
    T: Copy,
    G: ReduceGroup<T>,
{
    let size = group.size();
    let rank = bias(group.rank(), root, size);

    if rank == 0 {
        let value = value.expect("root must hold the reduced value after reduce()");
        for peer in 1..size {
            group.send(unbias(peer, root, size), value)?;
        }
        Ok(value)
    } else {
        group.recv(unbias(0, root, size))
    }
}

#[cfg(test)]
pub mod test_harness {
    use super::*;
    use crossbeam_channel::{Receiver, Sender};

    /// A [`ReduceGroup`] backed by `crossbeam-channel`, one pair of endpoints per
    /// ordered rank pair, entirely in-process.
    pub struct ChannelGroup<T> {
        rank: u32,
        size: u32,
        senders: Vec<Sender<T>>,
        receivers: Vec<Receiver<T>>,
    }

    impl<T: Send + 'static> ChannelGroup<T> {
        /// Builds `size` linked groups, one per rank, each able to send to and
        /// receive from every other rank.
        pub fn new_ring(size: u32) -> Vec<ChannelGroup<T>> {
            let size_usize = size as usize;
            let mut senders: Vec<Vec<Sender<T>>> = (0..size_usize).map(|_| Vec::new()).collect();
            let mut receivers: Vec<Vec<Receiver<T>>> = (0..size_usize).map(|_| Vec::new()).collect();

            for from in 0..size_usize {
                for to in 0..size_usize {
                    let (tx, rx) = crossbeam_channel::unbounded();
                    senders[from].push(tx);
                    receivers[to].push(rx);
                }
            }

            (0..size_usize)
                .map(|rank| ChannelGroup {
                    rank: rank as u32,
                    size,
                    senders: std::mem::take(&mut senders[rank]),
                    receivers: std::mem::take(&mut receivers[rank]),
                })
                .collect()
        }
    }

    impl<T: Send + 'static + Copy> ReduceGroup<T> for ChannelGroup<T> {
        fn rank(&self) -> u32 {
            self.rank
        }

        fn size(&self) -> u32 {
            self.size
        }

        fn send(&self, to: u32, value: T) -> Result<()> {
            self.senders[to as usize]
                .send(value)
                .map_err(|e| ForestError::Protocol(e.to_string()))
        }

        fn recv(&self, from: u32) -> Result<T> {
            self.receivers[from as usize]
                .recv()
                .map_err(|e| ForestError::Protocol(e.to_string()))
        }
    }
}
