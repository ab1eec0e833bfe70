// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Bucket-by-cost priority structure for one partition.
//!
//! Costs are small non-negative integers bounded by vertex degree, so the
//! table keeps one ordered bucket of vertex indices per cost value:
//!
//! ```text
//! cost  bucket
//!  0    {}
//!  1    {1, 7}        <- min_bucket: min_index() = 1
//!  2    {0, 2, 3}
//! ```
//!
//! - `min_index` returns the smallest index of the lowest non-empty bucket,
//!   so ties are broken by the smallest index.
//! - `decrement` moves one index down a bucket and can only lower the
//!   minimum by one, so `min_bucket` is updated in O(1).
//! - `remove` may empty the lowest bucket; `min_index` then scans upward.
//!   Each upward step is paid for by an earlier decrement or by the
//!   initial cost range, which keeps the scan amortised O(1).
//!
//! Operations inside a bucket are `O(log b)` in the bucket size.

use crate::bitmap::Bitmap;
use crate::PartitionError;
use std::collections::BTreeSet;

/// Per-partition table of `cost(vertex)` over the currently eligible
/// vertices of a block.
#[derive(Debug, Clone)]
pub struct CostTable {
    partition: usize,
    costs: Vec<u32>,
    eligible: Bitmap,
    buckets: Vec<BTreeSet<usize>>,
    min_bucket: usize,
}

impl CostTable {
    /// Creates an empty table for `partition`.
    pub fn new(partition: usize) -> Self {
        Self {
            partition,
            costs: Vec::new(),
            eligible: Bitmap::new(0),
            buckets: Vec::new(),
            min_bucket: 0,
        }
    }

    /// Bulk-loads `costs`; every index becomes eligible.
    pub fn init(&mut self, costs: &[u32]) {
        let max_cost = costs.iter().copied().max().unwrap_or(0) as usize;

        self.costs.clear();
        self.costs.extend_from_slice(costs);
        self.eligible.reset(costs.len());
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.buckets.resize_with(max_cost + 1, BTreeSet::new);

        for (index, &cost) in costs.iter().enumerate() {
            self.eligible.set(index);
            self.buckets[cost as usize].insert(index);
        }
        self.min_bucket = 0;
    }

    /// Number of eligible indices.
    pub fn len(&self) -> usize {
        self.eligible.count_ones()
    }

    /// Returns `true` if no index is eligible.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current cost of `index`, or `None` if it is ineligible or unknown.
    pub fn cost(&self, index: usize) -> Option<u32> {
        (index < self.costs.len() && self.eligible.get(index)).then(|| self.costs[index])
    }

    /// Returns the eligible index with the lowest cost, smallest index first.
    pub fn min_index(&mut self) -> Result<usize, PartitionError> {
        while let Some(bucket) = self.buckets.get(self.min_bucket) {
            if let Some(&index) = bucket.first() {
                return Ok(index);
            }
            self.min_bucket += 1;
        }
        Err(PartitionError::CostTableExhausted {
            partition: self.partition,
        })
    }

    /// Lowers the cost of `index` by one. No-op for an ineligible index.
    pub fn decrement(&mut self, index: usize) -> Result<(), PartitionError> {
        self.check(index)?;
        if !self.eligible.get(index) {
            return Ok(());
        }

        let cost = self.costs[index] as usize;
        if cost == 0 {
            return Err(PartitionError::NegativeCost { index });
        }
        self.buckets[cost].remove(&index);
        self.buckets[cost - 1].insert(index);
        self.costs[index] -= 1;
        self.min_bucket = self.min_bucket.min(cost - 1);
        Ok(())
    }

    /// Makes `index` permanently ineligible. Idempotent.
    pub fn remove(&mut self, index: usize) -> Result<(), PartitionError> {
        self.check(index)?;
        if self.eligible.get(index) {
            self.buckets[self.costs[index] as usize].remove(&index);
            self.eligible.clear(index);
        }
        Ok(())
    }

    fn check(&self, index: usize) -> Result<(), PartitionError> {
        if index >= self.costs.len() {
            return Err(PartitionError::IndexOutOfRange {
                index,
                len: self.costs.len(),
            });
        }
        Ok(())
    }
}
