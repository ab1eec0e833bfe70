// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the partition engine.
//!
//! Apart from the two configuration variants, every error here means an
//! internal invariant was broken. The caller must abandon the run.

/// Errors raised while partitioning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartitionError {
    /// The partition count must be in `1..=u32::MAX`.
    #[error("invalid partition count {0}: must be at least 1")]
    InvalidPartitionCount(usize),

    /// The V universe must be non-empty.
    #[error("invalid V universe size {0}: must be at least 1")]
    InvalidUniverse(usize),

    /// A block was built for a different V universe than the engine's.
    #[error("block V universe {actual} does not match engine universe {expected}")]
    UniverseMismatch { expected: usize, actual: usize },

    /// `min_index` was called with no eligible vertex left.
    #[error("cost table of partition {partition} has no eligible vertex left")]
    CostTableExhausted { partition: usize },

    /// A cost-table index is outside the table.
    #[error("cost table index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A cost would drop below zero.
    #[error("cost of vertex {index} would become negative")]
    NegativeCost { index: usize },

    /// Block assignments were merged out of stream order.
    #[error("block starts at U {actual}, expected U {expected}")]
    NonContiguousBlock { expected: u64, actual: u64 },
}
