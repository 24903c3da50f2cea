// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// Represents errors that can occur in the statistics engine
#[derive(Debug)]
pub enum Error {
    /// A batch write would step past the tree's leaf capacity
    /// (start index, batch length, capacity)
    OutOfRange(usize, usize, usize),

    /// Invalid or unloadable configuration
    Config(figment::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TickStatsError: {self:?}")
    }
}

impl std::error::Error for Error {}

impl From<figment::Error> for Error {
    fn from(value: figment::Error) -> Self {
        Self::Config(value)
    }
}

/// Crate result
pub type Result<T> = std::result::Result<T, Error>;
