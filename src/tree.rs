// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Fixed-capacity denary interval tree.
//!
//! A complete tree with branching factor 10, stored in a flat array: root at
//! slot 0, children of slot `i` at `10i + 1 ..= 10i + 10`, leaves in the
//! last `10^h` slots. Each slot is either absent or a node carrying the
//! inclusive leaf interval it covers and the merged statistic over it.
//!
//! Base 10 is deliberate: query windows are powers of ten, so an aligned
//! window coincides with one internal node and resolves near the root, while
//! a misaligned window only touches two fringe paths of width <= 9 per
//! level.

use crate::stats::Statistic;
use crate::{Error, Result};

/// Branching factor of the tree.
const FANOUT: usize = 10;

#[derive(Clone, Debug)]
struct Node<S> {
    /// First leaf index covered by this node (inclusive)
    lo: usize,

    /// Last leaf index covered by this node (inclusive)
    hi: usize,

    stat: S,
}

/// Indexed monoid aggregation over `[0, size)`.
///
/// Values are written at known leaf indices in batches; aggregate queries
/// over any contiguous leaf interval run in `O(log₁₀ size)` node visits.
/// Leaves that were never written contribute nothing.
///
/// The tree is generic over the aggregate type, so reduced statistics work
/// without paying for unused components. It is **not** internally
/// synchronized.
pub struct DenaryTree<S> {
    slots: Box<[Option<Node<S>>]>,
    size: usize,
    leaves_start: usize,
}

impl<S: Statistic> DenaryTree<S> {
    /// Creates a tree with capacity for `size` leaves.
    ///
    /// The leaf count is rounded up to the next power of ten internally, but
    /// only the first `size` leaves accept writes.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "tree capacity must be at least 1");

        let mut leaves = 1;
        while leaves < size {
            leaves *= FANOUT;
        }

        // Complete denary tree over `leaves`: (10^(h+1) - 1) / 9 slots
        let slot_count = (leaves * FANOUT - 1) / 9;

        Self {
            slots: vec![None; slot_count].into_boxed_slice(),
            size,
            leaves_start: slot_count - leaves,
        }
    }

    /// Number of writable leaf slots.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Writes `values` as consecutive leaves starting at index `start`,
    /// overwriting whatever was stored there, then repairs every ancestor
    /// whose child set changed.
    ///
    /// An empty batch is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] and leaves the tree untouched if the
    /// batch would step past the last writable leaf.
    pub fn add(&mut self, values: &[f64], start: usize) -> Result<()> {
        let len = values.len();

        if start + len > self.size {
            return Err(Error::OutOfRange(start, len, self.size));
        }
        if len == 0 {
            return Ok(());
        }

        log::trace!("writing {len} leaves at index {start}");

        for (offset, (slot, value)) in self
            .slots
            .iter_mut()
            .skip(self.leaves_start + start)
            .zip(values)
            .enumerate()
        {
            let leaf = start + offset;
            *slot = Some(Node {
                lo: leaf,
                hi: leaf,
                stat: S::create(*value),
            });
        }

        if self.leaves_start == 0 {
            // Single-leaf tree: the leaf is the root, nothing to repair
            return Ok(());
        }

        // Walk the touched parent span upward level by level. The root is
        // rebuilt exactly once, after the loop.
        let mut first = (self.leaves_start + start - 1) / FANOUT;
        let mut last = (self.leaves_start + start + len - 2) / FANOUT;

        while first != last || first != 0 {
            for slot in first..=last {
                self.rebuild(slot);
            }
            first = if first == 0 { 0 } else { (first - 1) / FANOUT };
            last = (last - 1) / FANOUT;
        }
        self.rebuild(0);

        Ok(())
    }

    /// Aggregates the leaves in the inclusive interval `[lo, hi]`.
    ///
    /// Returns `None` if no written leaf falls into the interval. Indices
    /// past the last leaf are permitted; the absent leaves there simply
    /// contribute nothing.
    #[must_use]
    pub fn calculate(&self, lo: usize, hi: usize) -> Option<S> {
        self.query(0, lo, hi)
    }

    fn query(&self, slot: usize, lo: usize, hi: usize) -> Option<S> {
        let node = self.slots.get(slot)?.as_ref()?;

        if node.hi < lo || hi < node.lo {
            return None;
        }
        if lo <= node.lo && node.hi <= hi {
            return Some(node.stat.clone());
        }

        // Partial overlap: recurse, merging children oldest-first so
        // order-sensitive components stay correct
        let first_child = FANOUT * slot + 1;
        let mut merged: Option<S> = None;

        for child in first_child..first_child + FANOUT {
            let Some(stat) = self.query(child, lo, hi) else {
                continue;
            };
            match merged.as_mut() {
                Some(acc) => acc.merge(&stat),
                None => merged = Some(stat),
            }
        }

        merged
    }

    /// Recomputes an internal node from its ten children.
    ///
    /// The node interval spans from the leftmost to the rightmost present
    /// child; children are merged in ascending index order.
    fn rebuild(&mut self, slot: usize) {
        let first_child = FANOUT * slot + 1;
        let mut merged: Option<Node<S>> = None;

        for child in first_child..first_child + FANOUT {
            let Some(child_node) = self.slots.get(child).and_then(Option::as_ref) else {
                continue;
            };
            match merged.as_mut() {
                Some(parent) => {
                    parent.hi = child_node.hi;
                    parent.stat.merge(&child_node.stat);
                }
                None => merged = Some(child_node.clone()),
            }
        }

        if let Some(target) = self.slots.get_mut(slot) {
            *target = merged;
        }
    }
}
