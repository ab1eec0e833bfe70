// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Partition run profiling metrics.
//!
//! [`RunMetrics`] collects per-block timings on the engine side, the
//! loader's [`LoadStats`], the queue's [`QueueStats`] and the final quality
//! figures (partition sizes, coverage, replication factor).

use crate::LoadStats;
use memory_manager::QueueStats;
use partition_engine::ReplicationStats;
use std::time::Duration;

/// Metrics for a single partitioned block.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BlockMetrics {
    /// Global id of the first U vertex.
    pub first_u: u64,
    /// U vertices in the block.
    pub rows: usize,
    /// Edges in the block.
    pub edges: usize,
    /// Time spent in `partition_block`.
    pub partition_duration: Duration,
}

/// Aggregate metrics for a complete partition run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RunMetrics {
    /// Number of partitions.
    pub num_partitions: usize,
    /// Wall-clock time of the whole run.
    pub total_duration: Duration,
    /// Engine time spent partitioning blocks.
    pub total_partition_duration: Duration,
    /// Engine time spent blocked on an empty queue.
    pub pop_wait_duration: Duration,
    /// U vertices assigned.
    pub u_vertices: u64,
    /// Edges processed.
    pub edges: u64,
    /// U vertices per partition.
    pub partition_sizes: Vec<usize>,
    /// Covered V vertices per partition.
    pub coverage_sizes: Vec<usize>,
    /// Replication of V vertices across partitions.
    pub replication: Option<ReplicationStats>,
    /// Producer-side counters.
    pub load: LoadStats,
    /// Hand-off queue counters.
    pub queue: QueueStats,
    /// Per-block metrics.
    pub block_metrics: Vec<BlockMetrics>,
}

impl RunMetrics {
    /// Creates an empty metrics container.
    pub fn new(num_partitions: usize) -> Self {
        Self {
            num_partitions,
            total_duration: Duration::ZERO,
            total_partition_duration: Duration::ZERO,
            pop_wait_duration: Duration::ZERO,
            u_vertices: 0,
            edges: 0,
            partition_sizes: vec![0; num_partitions],
            coverage_sizes: vec![0; num_partitions],
            replication: None,
            load: LoadStats::default(),
            queue: QueueStats::default(),
            block_metrics: Vec::new(),
        }
    }

    /// Records time the engine waited for the next block.
    pub fn record_wait(&mut self, waited: Duration) {
        self.pop_wait_duration += waited;
    }

    /// Records one partitioned block.
    pub fn record_block(&mut self, first_u: u64, rows: usize, edges: usize, took: Duration) {
        self.total_partition_duration += took;
        self.u_vertices += rows as u64;
        self.edges += edges as u64;
        self.block_metrics.push(BlockMetrics {
            first_u,
            rows,
            edges,
            partition_duration: took,
        });
    }

    /// Number of blocks partitioned.
    pub fn blocks(&self) -> usize {
        self.block_metrics.len()
    }

    /// Returns U vertices per second over the whole run.
    pub fn vertices_per_second(&self) -> f64 {
        let secs = self.total_duration.as_secs_f64();
        if secs <= 0.0 || self.u_vertices == 0 {
            return 0.0;
        }
        self.u_vertices as f64 / secs
    }

    /// Replication factor, or `0.0` if nothing was covered.
    pub fn replication_factor(&self) -> f64 {
        self.replication.map_or(0.0, |r| r.factor)
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        let wait_pct = if self.total_duration.as_secs_f64() > 0.0 {
            self.pop_wait_duration.as_secs_f64() / self.total_duration.as_secs_f64() * 100.0
        } else {
            0.0
        };

        format!(
            "Partition: {:.2}ms total, {} U vertices in {} blocks into {} partitions, \
             {:.2}ms partitioning, {:.2}ms waiting on loader ({:.0}%), \
             replication {:.3} ({:.1} vertices/s)",
            self.total_duration.as_secs_f64() * 1000.0,
            self.u_vertices,
            self.blocks(),
            self.num_partitions,
            self.total_partition_duration.as_secs_f64() * 1000.0,
            self.pop_wait_duration.as_secs_f64() * 1000.0,
            wait_pct,
            self.replication_factor(),
            self.vertices_per_second(),
        )
    }
}
