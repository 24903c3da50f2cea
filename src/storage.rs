// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Circular rolling-window storage over a denary interval tree.

use crate::stats::Statistic;
use crate::tree::DenaryTree;
use crate::Result;

/// Rolling window of the most recent `max_size` values of one time series.
///
/// New values overwrite the oldest ones once the buffer is full. Aggregates
/// over the last `n` values map onto one tree range, or two when the window
/// crosses the physical end of the buffer.
///
/// A storage instance is **not** internally synchronized; the registry
/// hands out one instance per symbol and callers serialize access to it.
pub struct StatsStorage<S> {
    max_size: usize,
    tree: DenaryTree<S>,

    /// Slot that receives the next value, one past the most recent write
    /// (modulo `max_size`)
    index: usize,
}

impl<S: Statistic> StatsStorage<S> {
    /// Creates a storage retaining the `max_size` most recent values.
    ///
    /// # Panics
    ///
    /// Panics if `max_size` is zero.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            tree: DenaryTree::new(max_size),
            index: 0,
        }
    }

    /// Capacity of the rolling window.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Appends a batch of values, oldest first.
    ///
    /// The batch lands left-to-right starting at the write cursor and wraps
    /// around the physical end of the buffer. A batch longer than the
    /// remaining capacity keeps wrapping; earlier values of the same batch
    /// are overwritten in order, so exactly the last `max_size` values
    /// survive.
    ///
    /// # Errors
    ///
    /// Forwards tree write errors; the chunking below never produces an
    /// out-of-range write.
    pub fn add(&mut self, values: &[f64]) -> Result<()> {
        let mut index = self.index;
        let mut rest = values;

        while !rest.is_empty() {
            let room = self.max_size - index;
            let (chunk, tail) = rest.split_at(room.min(rest.len()));

            if !tail.is_empty() {
                log::trace!(
                    "batch wraps: {} values at {index}, {} more at 0",
                    chunk.len(),
                    tail.len(),
                );
            }

            self.tree.add(chunk, index)?;
            index = (index + chunk.len()) % self.max_size;
            rest = tail;
        }

        self.index = index;
        Ok(())
    }

    /// Aggregates the `last_n` most recent values.
    ///
    /// Returns `None` when nothing was ever written. When fewer than
    /// `last_n` values exist, the aggregate covers all of them.
    ///
    /// # Panics
    ///
    /// Panics if `last_n` is zero or exceeds the window capacity.
    #[must_use]
    pub fn get(&self, last_n: usize) -> Option<S> {
        assert!(
            (1..=self.max_size).contains(&last_n),
            "window must be within buffer capacity",
        );

        // Slot of the most recent value; meaningless while the buffer is
        // still empty, but then every leaf is absent anyway
        let end = (self.index + self.max_size - 1) % self.max_size;

        if last_n <= end + 1 {
            return self.tree.calculate(end + 1 - last_n, end);
        }

        // The window wraps backwards past slot 0. Query the older segment
        // first so the ordered merge takes `last` from the newer one.
        let older = self
            .tree
            .calculate(self.max_size - (last_n - end - 1), self.max_size - 1);
        let newer = self.tree.calculate(0, end);

        match (older, newer) {
            (Some(mut older), Some(newer)) => {
                older.merge(&newer);
                Some(older)
            }
            (older, newer) => older.or(newer),
        }
    }
}
