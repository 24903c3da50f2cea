// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::Result;
use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Environment variable prefix for configuration overrides.
const ENV_PREFIX: &str = "TICK_STATS_";

/// Process-wide configuration, fixed at startup.
///
/// Every field can be overridden through the environment using the
/// `TICK_STATS_` prefix, e.g. `TICK_STATS_MAX_K=4`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Largest supported window exponent; queries may ask for the last
    /// `10^k` values with `1 <= k <= max_k`
    pub max_k: u32,

    /// Upper bound on the number of values in a single ingest batch
    pub max_batch_size: usize,

    /// Socket address the HTTP server binds to
    pub bind: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_k: 8,
            max_batch_size: 10_000,
            bind: "127.0.0.1:8080".to_owned(),
        }
    }
}

impl Config {
    /// Loads the configuration, layering environment overrides on top of
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if an override cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let config = Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract::<Self>()?;
        Ok(config)
    }

    /// Per-symbol buffer capacity, `10^max_k`.
    ///
    /// This is also the largest answerable window.
    #[must_use]
    pub fn max_len(&self) -> usize {
        10_usize.pow(self.max_k)
    }
}
