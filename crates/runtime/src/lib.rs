// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # runtime
//!
//! The pipeline that runs a streaming partition job end to end.
//!
//! The runtime takes:
//! - A [`PartitionConfig`] (universe size, block size, `K`, memory budget).
//! - Any [`block_graph::GraphSource`].
//!
//! And runs exactly two units of execution: a [`BlockLoader`] thread that
//! reads and builds blocks, and the calling thread driving the
//! [`partition_engine::PartitionEngine`]. They share nothing but a
//! budget-bounded [`memory_manager::BlockQueue`] and a [`CancelToken`].
//!
//! # Type-State Pipeline
//! ```text
//! Partitioner<Idle> → Partitioner<Ready> → PartitionOutput
//! ```
//! A configuration is validated once by `prepare()`; invalid values are
//! rejected before any block is read.

mod cancel;
mod config;
mod error;
mod loader;
mod metrics;
mod partitioner;

pub use cancel::CancelToken;
pub use config::PartitionConfig;
pub use error::RuntimeError;
pub use loader::{BlockLoader, LoadStats};
pub use metrics::{BlockMetrics, RunMetrics};
pub use partitioner::{Idle, PartitionOutput, Partitioner, PipelineState, Ready, LOADER_THREAD};
