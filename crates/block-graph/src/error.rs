// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for block construction and graph sources.

/// Errors that can occur while reading or building graph blocks.
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    /// The underlying source failed to read.
    #[error("graph source I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line of a text source could not be parsed.
    #[error("parse error on line {line}: {detail}")]
    Parse { line: usize, detail: String },

    /// The V universe must be in `1..=u32::MAX`.
    #[error("invalid V universe size {0}: must be in 1..=4294967295")]
    InvalidUniverse(usize),

    /// An offset table is not non-decreasing.
    #[error("offset table decreases at position {position}")]
    OffsetsNotMonotonic { position: usize },

    /// An offset table does not start at 0 or end at the index count.
    #[error("offset table does not span the index array: expected {expected}, got {actual}")]
    OffsetMismatch { expected: usize, actual: usize },

    /// An adjacency index is outside its declared bound.
    #[error("adjacency index {index} out of range (bound {bound})")]
    IndexOutOfRange { index: u64, bound: usize },

    /// The source produced a block with no rows while claiming more data.
    #[error("source produced an empty block at U offset {first_u} while reporting more data")]
    EmptyBlock { first_u: u64 },
}
