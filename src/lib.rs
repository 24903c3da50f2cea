// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Rolling-window statistics for per-symbol tick streams.
//!
//! ##### About
//!
//! This crate keeps, per symbol, the last N floating-point values in a
//! circular buffer and answers queries for min, max, last, sum, count and
//! sum-of-squares over the most recent `10^k` values in sub-linear time.
//!
//! The heavy lifting is done by a fixed-capacity *denary* interval tree: a
//! complete tree with branching factor 10 stored in a flat array. Because
//! query windows are powers of ten, aligned windows coincide with a single
//! internal node and resolve in a handful of merges; misaligned windows only
//! touch two root-to-leaf fringes.
//!
//! Aggregates are generic over [`Statistic`], so reduced statistics (e.g.
//! sum-only) work with the same tree. The shipped [`Summary`] carries
//! everything the HTTP surface reports.
//!
//! # Example usage
//!
//! ```
//! use tick_stats::{StatsStorage, Summary};
//!
//! // Keeps the 1000 most recent values; older ones fall out of the window
//! let mut store = StatsStorage::<Summary>::new(1_000);
//! store.add(&[101.0, 102.5, 100.1, 99.7])?;
//!
//! let summary = store.get(3).expect("window has data");
//! assert_eq!(3, summary.count);
//! assert_eq!(99.7, summary.last);
//! #
//! # Ok::<(), tick_stats::Error>(())
//! ```
//!
//! The HTTP surface (see [`server`]) exposes exactly two operations: batch
//! ingest and window queries. All state is in-memory and dies with the
//! process.

#![forbid(unsafe_code)]
#![deny(clippy::all, missing_docs, clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]
#![allow(clippy::option_if_let_else)]

mod config;
mod error;
mod registry;
pub mod server;
mod stats;
mod storage;
mod tree;

pub use {
    config::Config,
    error::{Error, Result},
    registry::{Registry, SharedStorage},
    stats::{Statistic, Summary},
    storage::StatsStorage,
    tree::DenaryTree,
};
