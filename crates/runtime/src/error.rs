// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for a partition run.
//!
//! Every variant is fatal for the run; no partial mapping is returned.

use block_graph::BlockError;
use memory_manager::MemoryError;
use partition_engine::PartitionError;

/// Errors that can end a partition run.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Rejected before any block was read.
    #[error("configuration error: {0}")]
    Config(String),

    /// The graph source failed or produced a malformed block.
    #[error("stream error: {0}")]
    Stream(#[from] BlockError),

    /// The hand-off queue refused a block.
    #[error("queue error: {0}")]
    Queue(#[from] MemoryError),

    /// The engine hit an internal consistency violation.
    #[error("partition engine error: {0}")]
    Engine(#[from] PartitionError),

    /// The loader thread could not be started.
    #[error("cannot spawn loader thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The loader thread panicked.
    #[error("loader thread panicked")]
    LoaderPanicked,

    /// The run was cancelled through its [`crate::CancelToken`].
    #[error("partition run cancelled")]
    Cancelled,
}
