// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # partition-engine
//!
//! Assigns the U vertices of a streamed bipartite graph to `K` balanced
//! partitions while keeping the replication of V vertices low.
//!
//! # Key Components
//!
//! | Type | Scope | Role |
//! |---|---|---|
//! | [`PartitionEngine`] | run | greedy round-robin assignment, owns all state |
//! | [`NeighborSet`] | run, per partition | V vertices already covered |
//! | [`CostTable`] | block, per partition | cheapest unassigned U vertex |
//! | [`BlockAssignment`] / [`PartitionMap`] | output | per-block and global mappings |
//!
//! The engine is single-threaded. Concurrency lives in the runtime, which
//! feeds it blocks through a bounded queue.

pub mod assignment;
pub mod bitmap;
pub mod cost_table;
pub mod coverage;
pub mod engine;
mod error;

pub use assignment::{BlockAssignment, PartitionMap};
pub use bitmap::Bitmap;
pub use cost_table::CostTable;
pub use coverage::NeighborSet;
pub use engine::{PartitionEngine, ReplicationStats};
pub use error::PartitionError;
