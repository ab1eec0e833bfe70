// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for memory budgets and the block queue.

/// Errors raised by [`crate::MemoryBudget`] parsing and [`crate::BlockQueue`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryError {
    /// The budget string could not be parsed.
    #[error("invalid memory budget '{0}': expected a number with an optional K/M/G suffix")]
    InvalidBudget(String),

    /// A budget of zero bytes can never admit a block.
    #[error("memory budget must be greater than zero")]
    ZeroBudget,

    /// The queue was closed (the pipeline was aborted).
    #[error("block queue is closed")]
    QueueClosed,

    /// A producer pushed after declaring the stream finished.
    #[error("block queue already finished; no further pushes are accepted")]
    QueueFinished,
}
