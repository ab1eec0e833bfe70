// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The partition driver with a type-state–enforced lifecycle.
//!
//! ```text
//! Partitioner<Idle>
//!     │  .prepare()          validate config, parse budget
//!     ▼
//! Partitioner<Ready>
//!     │  .run(source)        one loader thread + the calling thread
//!     ▼
//!   PartitionOutput
//! ```
//!
//! # Pipeline
//!
//! ```text
//! "parsa-loader" thread              calling thread
//!   GraphSource                        AWAITING_BLOCK ◄──────────┐
//!     │ read_next_block                  │ queue.pop()           │
//!     ▼                                  ▼                       │
//!   GraphBlock ── push ──► BlockQueue ──► PARTITIONING_BLOCK ────┘
//!                 finish()               │ pop() == None
//!                                        ▼
//!                                       DONE
//! ```
//!
//! Each run builds a fresh [`PartitionEngine`], so a `Partitioner<Ready>`
//! can be run repeatedly and independent runs never share state.

use crate::loader::CloseOnDrop;
use crate::{BlockLoader, CancelToken, LoadStats, PartitionConfig, RunMetrics, RuntimeError};
use block_graph::{GraphBlock, GraphSource};
use memory_manager::{BlockQueue, MemoryBudget};
use partition_engine::{BlockAssignment, PartitionEngine, PartitionMap};
use std::thread;
use std::time::Instant;

/// Name of the producer thread.
pub const LOADER_THREAD: &str = "parsa-loader";

// ── Type-state markers ─────────────────────────────────────────

/// Configuration has not been validated yet.
#[derive(Debug)]
pub struct Idle;

/// Configuration is validated; runs can start.
#[derive(Debug)]
pub struct Ready {
    budget: MemoryBudget,
}

/// Sealed trait for partitioner states.
pub trait PipelineState: std::fmt::Debug {}
impl PipelineState for Idle {}
impl PipelineState for Ready {}

// ── Output ─────────────────────────────────────────────────────

/// The result of a successful run.
#[derive(Debug)]
pub struct PartitionOutput {
    /// Partition of every U vertex in the stream.
    pub map: PartitionMap,
    /// Timing and quality metrics.
    pub metrics: RunMetrics,
}

// ── Partitioner ────────────────────────────────────────────────

/// Drives the loader and the engine over one graph source.
///
/// # Example
/// ```
/// use block_graph::MemorySource;
/// use runtime::{PartitionConfig, Partitioner};
///
/// let config = PartitionConfig {
///     v_size: 3,
///     block_size: 4,
///     num_partitions: 2,
///     ..Default::default()
/// };
/// let partitioner = Partitioner::new(config).prepare().unwrap();
/// let source = MemorySource::new(vec![vec![0, 1], vec![1], vec![0, 2], vec![1, 2]]);
/// let output = partitioner.run(source).unwrap();
/// assert_eq!(output.map.as_slice(), &[1, 0, 1, 0]);
/// ```
pub struct Partitioner<S: PipelineState = Idle> {
    config: PartitionConfig,
    cancel: CancelToken,
    state: S,
}

// ── Idle → Ready ───────────────────────────────────────────────

impl Partitioner<Idle> {
    pub fn new(config: PartitionConfig) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
            state: Idle,
        }
    }

    /// Shares `token` with the runs of this partitioner.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Validates the configuration. Transitions to the `Ready` state.
    pub fn prepare(self) -> Result<Partitioner<Ready>, RuntimeError> {
        self.config.validate()?;
        let budget = self.config.parse_budget()?;
        tracing::info!(
            "partitioner ready: K={}, v_size={}, block_size={}, budget {budget}",
            self.config.num_partitions,
            self.config.v_size,
            self.config.block_size,
        );

        Ok(Partitioner {
            config: self.config,
            cancel: self.cancel,
            state: Ready { budget },
        })
    }
}

// ── Ready: run ─────────────────────────────────────────────────

impl Partitioner<Ready> {
    /// Partitions every U vertex of `source`.
    pub fn run<G>(&self, source: G) -> Result<PartitionOutput, RuntimeError>
    where
        G: GraphSource + Send,
    {
        self.run_with(source, |_| {})
    }

    /// Like [`run`](Self::run), calling `on_block` as each block finishes.
    ///
    /// `on_block` sees blocks in stream order. If the run fails, blocks
    /// already reported must be discarded by the caller.
    pub fn run_with<G, F>(&self, source: G, mut on_block: F) -> Result<PartitionOutput, RuntimeError>
    where
        G: GraphSource + Send,
        F: FnMut(&BlockAssignment),
    {
        let run_start = Instant::now();
        let queue = BlockQueue::new(self.budget());
        let mut engine = PartitionEngine::new(self.config.num_partitions, self.config.v_size)?;
        let mut map = PartitionMap::new(self.config.num_partitions);
        let mut metrics = RunMetrics::new(self.config.num_partitions);

        let (consumed, loaded) = thread::scope(|scope| {
            let loader = BlockLoader::new(
                source,
                &queue,
                self.config.v_size,
                self.config.block_size,
                self.cancel.clone(),
            );
            let handle = thread::Builder::new()
                .name(LOADER_THREAD.to_string())
                .spawn_scoped(scope, move || loader.run())
                .map_err(RuntimeError::Spawn)?;

            let consumed = {
                let _guard = CloseOnDrop(&queue);
                self.consume(&queue, &mut engine, &mut map, &mut metrics, &mut on_block)
            };
            let loaded = handle
                .join()
                .map_err(|_| RuntimeError::LoaderPanicked)
                .and_then(|result| result);
            Ok::<_, RuntimeError>((consumed, loaded))
        })?;

        // An engine failure closes the queue, so the loader's error is only
        // a consequence.
        consumed?;
        let load: LoadStats = loaded?;

        metrics.total_duration = run_start.elapsed();
        metrics.partition_sizes = map.partition_sizes();
        metrics.coverage_sizes = engine.coverage_sizes();
        metrics.replication = Some(engine.replication_stats());
        metrics.queue = queue.stats();
        metrics.load = load;

        tracing::info!("{}", engine.summary());
        tracing::info!("{}", metrics.queue.summary());
        tracing::info!("{}", metrics.summary());

        Ok(PartitionOutput { map, metrics })
    }

    /// Engine loop: pops blocks until the queue is finished and drained.
    fn consume<F>(
        &self,
        queue: &BlockQueue<GraphBlock>,
        engine: &mut PartitionEngine,
        map: &mut PartitionMap,
        metrics: &mut RunMetrics,
        on_block: &mut F,
    ) -> Result<(), RuntimeError>
    where
        F: FnMut(&BlockAssignment),
    {
        loop {
            if self.cancel.is_cancelled() {
                tracing::info!("engine: cancelled after {} blocks", metrics.blocks());
                return Err(RuntimeError::Cancelled);
            }

            let wait_start = Instant::now();
            let Some(block) = queue.pop() else { break };
            metrics.record_wait(wait_start.elapsed());

            let block_start = Instant::now();
            let assignment = engine.partition_block(&block)?;
            map.extend(&assignment)?;
            metrics.record_block(block.first_u(), block.num_u(), block.nnz(), block_start.elapsed());
            on_block(&assignment);
        }

        // The loader closes the queue when cancelled mid-stream.
        if self.cancel.is_cancelled() {
            return Err(RuntimeError::Cancelled);
        }
        Ok(())
    }

    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    pub fn budget(&self) -> MemoryBudget {
        self.state.budget
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }
}

impl<S: PipelineState> std::fmt::Debug for Partitioner<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Partitioner")
            .field("state", &self.state)
            .field("num_partitions", &self.config.num_partitions)
            .field("v_size", &self.config.v_size)
            .field("block_size", &self.config.block_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use block_graph::MemorySource;

    fn config(k: usize, v_size: usize, block_size: usize) -> PartitionConfig {
        PartitionConfig {
            v_size,
            block_size,
            num_partitions: k,
            memory_budget: "1M".into(),
            has_label: false,
        }
    }

    #[test]
    fn test_prepare_rejects_invalid_config() {
        let err = Partitioner::new(config(0, 3, 4)).prepare().unwrap_err();
        assert!(matches!(err, RuntimeError::Config(_)));
    }

    #[test]
    fn test_run_canonical() {
        let p = Partitioner::new(config(2, 3, 4)).prepare().unwrap();
        let out = p
            .run(MemorySource::new(vec![vec![0, 1], vec![1], vec![0, 2], vec![1, 2]]))
            .unwrap();
        assert_eq!(out.map.as_slice(), &[1, 0, 1, 0]);
        assert_eq!(out.metrics.coverage_sizes, vec![2, 3]);
        assert_eq!(out.metrics.blocks(), 1);
        assert_eq!(out.metrics.load.rows, 4);
    }

    #[test]
    fn test_run_with_streams_blocks_in_order() {
        let p = Partitioner::new(config(3, 16, 2)).prepare().unwrap();
        let mut firsts = Vec::new();
        let out = p
            .run_with(MemorySource::new((0..7).map(|i| vec![i]).collect()), |b| {
                firsts.push(b.first_u())
            })
            .unwrap();
        assert_eq!(firsts, vec![0, 2, 4, 6]);
        assert_eq!(out.map.len(), 7);
        // Every block restarts the round robin at partition 0.
        assert_eq!(out.map.as_slice(), &[0, 1, 0, 1, 0, 1, 0]);
        assert_eq!(out.metrics.partition_sizes, vec![4, 3, 0]);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let rows: Vec<Vec<u64>> = (0..50u64).map(|i| vec![i % 9, i * 7 % 13]).collect();
        let p = Partitioner::new(config(4, 13, 6)).prepare().unwrap();
        let a = p.run(MemorySource::new(rows.clone())).unwrap();
        let b = p.run(MemorySource::new(rows)).unwrap();
        assert_eq!(a.map, b.map);
    }

    #[test]
    fn test_cancelled_run() {
        let token = CancelToken::new();
        let p = Partitioner::new(config(2, 4, 1))
            .with_cancel_token(token.clone())
            .prepare()
            .unwrap();
        token.cancel();
        let err = p.run(MemorySource::new(vec![vec![1], vec![2]])).unwrap_err();
        assert!(matches!(err, RuntimeError::Cancelled));
    }

    #[test]
    fn test_debug_shows_state() {
        let p = Partitioner::new(config(2, 4, 1));
        assert!(format!("{p:?}").contains("Idle"));
        let p = p.prepare().unwrap();
        assert!(format!("{p:?}").contains("Ready"));
    }

    #[test]
    fn test_prepare_parses_budget() {
        let mut cfg = config(2, 4, 1);
        cfg.memory_budget = "3K".into();
        let p = Partitioner::new(cfg).prepare().unwrap();
        assert_eq!(p.budget().as_bytes(), 3 * 1024);
    }
}
