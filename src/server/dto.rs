// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Request and response bodies of the HTTP surface.

use crate::stats::Summary;
use serde::{Deserialize, Serialize};

/// Body of `POST /add_batch/`.
#[derive(Clone, Debug, Deserialize)]
pub struct AddBatchRequest {
    /// Time series the batch belongs to
    pub symbol: String,

    /// Data points, oldest first
    pub values: Vec<f64>,
}

/// Success body of `POST /add_batch/`.
#[derive(Clone, Debug, Serialize)]
pub struct AddBatchResponse {
    /// Echo of the ingested symbol
    pub symbol: String,

    /// Always `"OK"`
    pub message: String,
}

/// Query parameters of `GET /stats/`.
#[derive(Clone, Debug, Deserialize)]
pub struct StatsQuery {
    /// Time series to query
    pub symbol: String,

    /// Window exponent; the query covers the last `10^k` values
    pub k: u32,
}

/// Derived statistics block of a stats response.
#[derive(Clone, Debug, Serialize)]
pub struct Statistics {
    /// Smallest value in the window
    pub min: f64,

    /// Largest value in the window
    pub max: f64,

    /// Most recent value
    pub last: f64,

    /// Arithmetic mean
    pub avg: f64,

    /// Population variance
    pub var: f64,
}

/// Success body of `GET /stats/`.
#[derive(Clone, Debug, Serialize)]
pub struct StatsResponse {
    /// Echo of the queried symbol
    pub symbol: String,

    /// Echo of the window exponent
    pub k: u32,

    /// Aggregates over the window
    pub statistics: Statistics,
}

impl StatsResponse {
    /// Shapes a window summary into the wire format.
    #[must_use]
    pub fn new(symbol: String, k: u32, summary: &Summary) -> Self {
        Self {
            symbol,
            k,
            statistics: Statistics {
                min: summary.min,
                max: summary.max,
                last: summary.last,
                avg: summary.avg(),
                var: summary.var(),
            },
        }
    }
}
