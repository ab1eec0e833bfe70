// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The greedy single-pass assignment engine.
//!
//! # Per-Block Procedure
//!
//! ```text
//! for k in 0..K:  cost_k[u] = |N(u) \ coverage[k]|
//!
//! for i in 0..n:
//!     k  = i mod K                       round-robin target
//!     u  = cost_k.min_index()            cheapest unassigned vertex
//!     parts[u] = k
//!     remove u from every cost table
//!     for v in N(u) \ coverage[k]:
//!         coverage[k] += v
//!         for w in N(v), w unassigned:  cost_k[w] -= 1
//! ```
//!
//! Balance comes from the round-robin target alone; the cost tables only
//! decide *which* vertex fills the slot. The target restarts at partition 0
//! with every block, so each block is balanced on its own. Over a whole run
//! sizes stay within one of each other when every block holds a multiple of
//! `K` vertices; otherwise the low partitions absorb each block's remainder.
//!
//! The coverage sets persist across blocks; cost tables and the assigned
//! bitmap are rebuilt per block.

use crate::assignment::BlockAssignment;
use crate::bitmap::Bitmap;
use crate::cost_table::CostTable;
use crate::coverage::NeighborSet;
use crate::PartitionError;
use block_graph::{Adjacency, ColMajor, GraphBlock, RowMajor};
use serde::Serialize;
use std::fmt;

/// Replication of V vertices across partitions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReplicationStats {
    /// Sum of all coverage set sizes.
    pub total_copies: usize,
    /// V vertices covered by at least one partition.
    pub distinct_v: usize,
    /// `total_copies / distinct_v`; `0.0` before anything is covered.
    pub factor: f64,
}

/// Owns the run-wide partition state and assigns blocks one at a time.
///
/// # Example
/// ```
/// use block_graph::GraphBlock;
/// use partition_engine::PartitionEngine;
///
/// let block = GraphBlock::from_rows(0, &[vec![0u64, 1], vec![1], vec![0, 2], vec![1, 2]], 3)
///     .unwrap();
/// let mut engine = PartitionEngine::new(2, 3).unwrap();
/// let assignment = engine.partition_block(&block).unwrap();
/// assert_eq!(assignment.parts(), &[1, 0, 1, 0]);
/// ```
pub struct PartitionEngine {
    num_partitions: usize,
    v_size: usize,
    coverage: Vec<NeighborSet>,
    cost_tables: Vec<CostTable>,
    assigned: Bitmap,
    position: u64,
    blocks: usize,
    scratch: Vec<u32>,
}

impl PartitionEngine {
    /// Creates an engine for `num_partitions` partitions over a V universe
    /// of `v_size`.
    pub fn new(num_partitions: usize, v_size: usize) -> Result<Self, PartitionError> {
        if num_partitions == 0 || num_partitions > u32::MAX as usize {
            return Err(PartitionError::InvalidPartitionCount(num_partitions));
        }
        if v_size == 0 || v_size > u32::MAX as usize {
            return Err(PartitionError::InvalidUniverse(v_size));
        }

        Ok(Self {
            num_partitions,
            v_size,
            coverage: (0..num_partitions).map(|_| NeighborSet::new(v_size)).collect(),
            cost_tables: (0..num_partitions).map(CostTable::new).collect(),
            assigned: Bitmap::new(0),
            position: 0,
            blocks: 0,
            scratch: Vec::new(),
        })
    }

    pub fn num_partitions(&self) -> usize {
        self.num_partitions
    }

    pub fn v_size(&self) -> usize {
        self.v_size
    }

    /// Assigns every U vertex of `block` to a partition.
    ///
    /// On error the engine state is inconsistent and the run must be
    /// abandoned.
    pub fn partition_block(
        &mut self,
        block: &GraphBlock,
    ) -> Result<BlockAssignment, PartitionError> {
        if block.v_size() != self.v_size {
            return Err(PartitionError::UniverseMismatch {
                expected: self.v_size,
                actual: block.v_size(),
            });
        }

        let n = block.num_u();
        let rows = block.row_major();
        let cols = block.col_major();

        self.assigned.reset(n);
        self.init_costs(rows);

        let mut parts = vec![0u32; n];
        for i in 0..n {
            let k = i % self.num_partitions;
            let u = self.cost_tables[k].min_index()?;
            self.assigned.set(u);
            parts[u] = k as u32;
            self.update(u, k, rows, cols)?;
        }

        self.position += n as u64;
        self.blocks += 1;
        tracing::debug!(
            "partitioned block U[{}..{}): {} edges, coverage {:?}",
            block.first_u(),
            block.first_u() + n as u64,
            block.nnz(),
            self.coverage_sizes(),
        );

        Ok(BlockAssignment::new(block.first_u(), parts))
    }

    /// Loads each partition's cost table for a new block.
    fn init_costs(&mut self, rows: &Adjacency<RowMajor>) {
        for (table, coverage) in self.cost_tables.iter_mut().zip(&self.coverage) {
            self.scratch.clear();
            self.scratch.extend(rows.iter().map(|(_, vs)| {
                vs.iter().filter(|&&v| !coverage.contains(v)).count() as u32
            }));
            table.init(&self.scratch);
        }
    }

    /// Applies the assignment of local vertex `u` to partition `k`.
    fn update(
        &mut self,
        u: usize,
        k: usize,
        rows: &Adjacency<RowMajor>,
        cols: &Adjacency<ColMajor>,
    ) -> Result<(), PartitionError> {
        for table in &mut self.cost_tables {
            table.remove(u)?;
        }

        let table = &mut self.cost_tables[k];
        let coverage = &mut self.coverage[k];
        for &v in rows.neighbors(u) {
            if !coverage.insert(v) {
                continue;
            }
            for &w in cols.neighbors(v as usize) {
                let w = w as usize;
                if !self.assigned.get(w) {
                    table.decrement(w)?;
                }
            }
        }
        Ok(())
    }

    /// Coverage set of partition `k`.
    pub fn coverage(&self, k: usize) -> Option<&NeighborSet> {
        self.coverage.get(k)
    }

    /// Number of V vertices covered by each partition.
    pub fn coverage_sizes(&self) -> Vec<usize> {
        self.coverage.iter().map(NeighborSet::len).collect()
    }

    pub fn replication_stats(&self) -> ReplicationStats {
        let total_copies: usize = self.coverage.iter().map(NeighborSet::len).sum();
        let mut union = Bitmap::new(self.v_size);
        for set in &self.coverage {
            union.union_with(set.as_bitmap());
        }
        let distinct_v = union.count_ones();
        let factor = if distinct_v == 0 {
            0.0
        } else {
            total_copies as f64 / distinct_v as f64
        };
        ReplicationStats {
            total_copies,
            distinct_v,
            factor,
        }
    }

    /// U vertices assigned so far in the run.
    pub fn positions_assigned(&self) -> u64 {
        self.position
    }

    pub fn blocks_processed(&self) -> usize {
        self.blocks
    }

    /// Returns the engine to its freshly created state.
    pub fn reset(&mut self) {
        for set in &mut self.coverage {
            *set = NeighborSet::new(self.v_size);
        }
        self.assigned.reset(0);
        self.position = 0;
        self.blocks = 0;
    }

    pub fn summary(&self) -> String {
        let stats = self.replication_stats();
        format!(
            "{} partitions, {} blocks, {} U vertices, {} distinct V, replication {:.3}",
            self.num_partitions, self.blocks, self.position, stats.distinct_v, stats.factor,
        )
    }
}

impl fmt::Debug for PartitionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionEngine")
            .field("num_partitions", &self.num_partitions)
            .field("v_size", &self.v_size)
            .field("position", &self.position)
            .field("blocks", &self.blocks)
            .finish()
    }
}
