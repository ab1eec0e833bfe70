// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Queue statistics for profiling the loader/engine hand-off.
//!
//! A high `blocked_pushes` count means the engine is the bottleneck and the
//! budget is saturated; a peak well below the budget means the loader is.

/// Cumulative statistics about [`crate::BlockQueue`] traffic.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct QueueStats {
    /// Items accepted by `push`.
    pub pushes: u64,
    /// Items handed out by `pop`/`try_pop`.
    pub pops: u64,
    /// Pushes that had to wait for budget to free up.
    pub blocked_pushes: u64,
    /// Largest number of bytes queued at once.
    pub peak_queued_bytes: usize,
    /// Largest number of items queued at once.
    pub peak_queued_items: usize,
    /// Total bytes ever pushed.
    pub cumulative_bytes: u64,
}

impl QueueStats {
    pub(crate) fn record_push(&mut self, size: usize, waited: bool, queued_bytes: usize, queued_items: usize) {
        self.pushes += 1;
        self.cumulative_bytes += size as u64;
        if waited {
            self.blocked_pushes += 1;
        }
        self.peak_queued_bytes = self.peak_queued_bytes.max(queued_bytes);
        self.peak_queued_items = self.peak_queued_items.max(queued_items);
    }

    pub(crate) fn record_pop(&mut self) {
        self.pops += 1;
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Queue: {} pushes ({} blocked on budget), {} pops, peak {:.2} MB in {} blocks",
            self.pushes,
            self.blocked_pushes,
            self.pops,
            self.peak_queued_bytes as f64 / (1024.0 * 1024.0),
            self.peak_queued_items,
        )
    }
}
