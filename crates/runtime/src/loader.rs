// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The block loader: the producer side of the pipeline.
//!
//! [`BlockLoader::run`] drives a [`GraphSource`] to exhaustion on its own
//! thread:
//!
//! 1. Read up to `block_size` rows.
//! 2. Reduce V ids into `[0, v_size)` and build both adjacency layouts.
//! 3. Push the block into the [`BlockQueue`], weighted by its heap size.
//! 4. After the last block, `finish()` the queue exactly once.
//!
//! Block boundaries and end-of-stream rules come from [`BlockReader`]. On
//! any failure the queue is closed so the engine never waits on a dead
//! producer.

use crate::{CancelToken, RuntimeError};
use block_graph::{BlockReader, GraphBlock, GraphSource};
use memory_manager::BlockQueue;
use std::time::{Duration, Instant};

/// Counters reported by a finished loader.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct LoadStats {
    /// Blocks pushed.
    pub blocks: usize,
    /// U rows read.
    pub rows: u64,
    /// Edges after id reduction.
    pub edges: u64,
    /// Raw edges folded away by id reduction.
    pub collisions: u64,
    /// Sum of block heap sizes.
    pub bytes: u64,
    /// Time spent reading the source and building blocks.
    pub read_duration: Duration,
    /// Time spent waiting for budget in `push`.
    pub push_duration: Duration,
}

/// Closes the queue when dropped unless it was finished first.
///
/// Held by both ends of the pipeline so that an error or a panic on one
/// side wakes the other.
pub(crate) struct CloseOnDrop<'q, T>(pub(crate) &'q BlockQueue<T>);

impl<T> Drop for CloseOnDrop<'_, T> {
    fn drop(&mut self) {
        if !self.0.is_finished() {
            self.0.close();
        }
    }
}

/// Reads a [`GraphSource`] block by block into a [`BlockQueue`].
pub struct BlockLoader<'q, S> {
    reader: BlockReader<S>,
    queue: &'q BlockQueue<GraphBlock>,
    v_size: usize,
    cancel: CancelToken,
}

impl<'q, S: GraphSource> BlockLoader<'q, S> {
    pub fn new(
        source: S,
        queue: &'q BlockQueue<GraphBlock>,
        v_size: usize,
        block_size: usize,
        cancel: CancelToken,
    ) -> Self {
        Self {
            reader: BlockReader::new(source, v_size, block_size),
            queue,
            v_size,
            cancel,
        }
    }

    /// Loads the whole source, then finishes the queue.
    pub fn run(mut self) -> Result<LoadStats, RuntimeError> {
        let _guard = CloseOnDrop(self.queue);
        let mut stats = LoadStats::default();

        loop {
            if self.cancel.is_cancelled() {
                tracing::info!("loader: cancelled after {} blocks", stats.blocks);
                return Err(RuntimeError::Cancelled);
            }

            let read_start = Instant::now();
            let next = self.reader.read_block()?;
            stats.read_duration += read_start.elapsed();
            let Some(block) = next else { break };
            tracing::debug!("loader: {}", block.summary());

            let size = block.mem_size();
            stats.blocks += 1;
            stats.rows += block.num_u() as u64;
            stats.edges += block.nnz() as u64;
            stats.collisions += block.collisions() as u64;
            stats.bytes += size as u64;

            let push_start = Instant::now();
            self.queue.push(block, size)?;
            stats.push_duration += push_start.elapsed();
        }

        self.queue.finish();
        if stats.collisions > 0 {
            tracing::warn!(
                "loader: {} edges collapsed by reducing ids into a universe of {}",
                stats.collisions,
                self.v_size,
            );
        }
        tracing::info!(
            "loader: finished, {} blocks, {} rows, {} edges, {:.2} MB",
            stats.blocks,
            stats.rows,
            stats.edges,
            stats.bytes as f64 / (1024.0 * 1024.0),
        );
        Ok(stats)
    }
}

impl<S> std::fmt::Debug for BlockLoader<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockLoader")
            .field("reader", &self.reader)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
