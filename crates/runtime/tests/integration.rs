// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: end-to-end partition pipeline.
//!
//! These tests exercise the complete flow from graph source → loader thread
//! → bounded queue → engine → global mapping, proving that the four library
//! crates compose correctly.

use block_graph::{BlockError, GraphSource, MemorySource, SourceChunk, TextSource};
use proptest::prelude::*;
use runtime::{CancelToken, PartitionConfig, Partitioner, RuntimeError, LOADER_THREAD};
use std::io::Write;
use std::sync::{Arc, Mutex};

// ── Helpers ────────────────────────────────────────────────────

fn config(k: usize, v_size: usize, block_size: usize, budget: &str) -> PartitionConfig {
    PartitionConfig {
        v_size,
        block_size,
        num_partitions: k,
        memory_budget: budget.into(),
        has_label: false,
    }
}

/// Rows with a skewed, overlapping neighbourhood structure.
fn synthetic_rows(n: u64) -> Vec<Vec<u64>> {
    (0..n)
        .map(|u| {
            let hub = u % 5;
            vec![hub, 100 + u % 17, 1_000 + (u * 31) % 97, u * 7_919]
        })
        .collect()
}

// ── Full Pipeline Tests ────────────────────────────────────────

#[test]
fn test_canonical_scenario_through_pipeline() {
    let p = Partitioner::new(config(2, 3, 8, "1M")).prepare().unwrap();
    let out = p
        .run(MemorySource::new(vec![vec![0, 1], vec![1], vec![0, 2], vec![1, 2]]))
        .unwrap();

    assert_eq!(out.map.as_slice(), &[1, 0, 1, 0]);
    assert_eq!(out.metrics.coverage_sizes, vec![2, 3]);
    assert_eq!(out.metrics.partition_sizes, vec![2, 2]);
    assert!((out.metrics.replication_factor() - 5.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_result_independent_of_budget() {
    let rows = synthetic_rows(500);
    let tight = Partitioner::new(config(4, 256, 16, "1B")).prepare().unwrap();
    let loose = Partitioner::new(config(4, 256, 16, "1G")).prepare().unwrap();

    let a = tight.run(MemorySource::new(rows.clone())).unwrap();
    let b = loose.run(MemorySource::new(rows)).unwrap();

    assert_eq!(a.map, b.map);
    // Every block exceeds a one-byte budget, so at most one is ever queued.
    assert_eq!(a.metrics.queue.peak_queued_items, 1);
    assert_eq!(a.metrics.queue.pushes, 32);
    assert_eq!(a.metrics.blocks(), 32);
}

#[test]
fn test_balance_when_blocks_are_multiples_of_k() {
    let rows = synthetic_rows(1_003);
    let p = Partitioner::new(config(7, 512, 14, "4K")).prepare().unwrap();
    let out = p.run(MemorySource::new(rows)).unwrap();

    // 71 full blocks give 2 vertices to each partition; the last block of 9
    // gives its 2 extra to partitions 0 and 1.
    assert_eq!(out.map.len(), 1_003);
    assert!(out.map.is_balanced());
    assert_eq!(
        out.map.partition_sizes(),
        vec![144, 144, 143, 143, 143, 143, 143]
    );
    assert_eq!(out.metrics.u_vertices, 1_003);
    assert_eq!(out.metrics.load.rows, 1_003);
}

#[test]
fn test_each_block_is_balanced() {
    let rows = synthetic_rows(1_003);
    let p = Partitioner::new(config(7, 512, 10, "4K")).prepare().unwrap();
    let mut block_sizes = Vec::new();
    let out = p
        .run_with(MemorySource::new(rows), |block| {
            let mut sizes = vec![0usize; 7];
            for &k in block.parts() {
                sizes[k as usize] += 1;
            }
            block_sizes.push(sizes);
        })
        .unwrap();

    assert_eq!(block_sizes.len(), 101);
    for sizes in &block_sizes[..100] {
        assert_eq!(sizes, &vec![2, 2, 2, 1, 1, 1, 1]);
    }
    assert_eq!(block_sizes[100], vec![1, 1, 1, 0, 0, 0, 0]);
    // Remainders land on the low partitions of every block.
    assert_eq!(
        out.map.partition_sizes(),
        vec![201, 201, 201, 100, 100, 100, 100]
    );
}

#[test]
fn test_streamed_blocks_match_final_map() {
    let rows = synthetic_rows(100);
    let p = Partitioner::new(config(3, 64, 9, "64K")).prepare().unwrap();
    let mut streamed = Vec::new();
    let out = p
        .run_with(MemorySource::new(rows), |block| {
            streamed.extend(block.iter());
        })
        .unwrap();
    assert_eq!(streamed, out.map.iter().collect::<Vec<_>>());
}

#[test]
fn test_text_file_source() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# label features").unwrap();
    writeln!(file, "1 0:1 1:1").unwrap();
    writeln!(file, "0 1:0.5").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "1 0:1 2:1").unwrap();
    writeln!(file, "0 4:1 5:1").unwrap();

    let mut cfg = config(2, 3, 3, "1M");
    cfg.has_label = true;
    let p = Partitioner::new(cfg.clone()).prepare().unwrap();
    let source = TextSource::open(file.path()).unwrap().with_label(cfg.has_label);
    let out = p.run(source).unwrap();

    // 4 and 5 reduce to 1 and 2. The second block restarts the round robin,
    // so its only vertex goes to partition 0, which already covers V1 and V2.
    assert_eq!(out.map.as_slice(), &[1, 0, 0, 0]);
    assert_eq!(out.metrics.blocks(), 2);
    assert_eq!(out.metrics.coverage_sizes, vec![3, 2]);
}

#[test]
fn test_borrowed_source_can_be_reused() {
    let mut source = MemorySource::new(synthetic_rows(40));
    let p = Partitioner::new(config(3, 128, 8, "1M")).prepare().unwrap();
    let first = p.run(&mut source).unwrap();
    source.rewind();
    let second = p.run(&mut source).unwrap();
    assert_eq!(first.map, second.map);
}

#[test]
fn test_loader_runs_on_named_thread() {
    struct Recording {
        inner: MemorySource,
        thread: Arc<Mutex<Option<String>>>,
    }
    impl GraphSource for Recording {
        fn read_next_block(&mut self, max_rows: usize) -> Result<SourceChunk, BlockError> {
            *self.thread.lock().unwrap() = std::thread::current().name().map(str::to_owned);
            self.inner.read_next_block(max_rows)
        }
    }

    let thread = Arc::new(Mutex::new(None));
    let source = Recording {
        inner: MemorySource::new(vec![vec![1]]),
        thread: Arc::clone(&thread),
    };
    Partitioner::new(config(1, 4, 4, "1M"))
        .prepare()
        .unwrap()
        .run(source)
        .unwrap();
    assert_eq!(thread.lock().unwrap().as_deref(), Some(LOADER_THREAD));
}

// ── Error Paths ────────────────────────────────────────────────

#[test]
fn test_invalid_config_rejected_before_reading() {
    for cfg in [
        config(0, 4, 4, "1M"),
        config(2, 0, 4, "1M"),
        config(2, 4, 0, "1M"),
        config(2, 4, 4, "nope"),
    ] {
        let err = Partitioner::new(cfg).prepare().unwrap_err();
        assert!(matches!(err, RuntimeError::Config(_)));
    }
}

#[test]
fn test_parse_error_is_stream_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "1 2").unwrap();
    writeln!(file, "3 four").unwrap();

    let p = Partitioner::new(config(2, 8, 1, "1M")).prepare().unwrap();
    let err = p.run(TextSource::open(file.path()).unwrap()).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Stream(BlockError::Parse { line: 2, .. })
    ));
}

#[test]
fn test_empty_block_mid_stream_is_fatal() {
    struct Stuttering(usize);
    impl GraphSource for Stuttering {
        fn read_next_block(&mut self, _: usize) -> Result<SourceChunk, BlockError> {
            self.0 += 1;
            let rows = if self.0 == 1 { vec![vec![1], vec![2]] } else { Vec::new() };
            Ok(SourceChunk {
                rows,
                more_available: true,
            })
        }
    }

    let p = Partitioner::new(config(2, 8, 2, "1M")).prepare().unwrap();
    let err = p.run(Stuttering(0)).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Stream(BlockError::EmptyBlock { first_u: 2 })
    ));
}

#[test]
fn test_cancel_between_blocks() {
    let token = CancelToken::new();
    let p = Partitioner::new(config(2, 64, 1, "1M"))
        .with_cancel_token(token.clone())
        .prepare()
        .unwrap();

    let mut seen = 0;
    let err = p
        .run_with(MemorySource::new(synthetic_rows(200)), |_| {
            seen += 1;
            token.cancel();
        })
        .unwrap_err();

    assert!(matches!(err, RuntimeError::Cancelled));
    assert_eq!(seen, 1);
}

#[test]
fn test_loader_panic_is_reported() {
    struct Exploding;
    impl GraphSource for Exploding {
        fn read_next_block(&mut self, _: usize) -> Result<SourceChunk, BlockError> {
            panic!("source exploded");
        }
    }

    let p = Partitioner::new(config(2, 8, 2, "1M")).prepare().unwrap();
    let err = p.run(Exploding).unwrap_err();
    assert!(matches!(err, RuntimeError::LoaderPanicked));
}

// ── Property: Balance, Totality, Determinism ───────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_pipeline_balanced_total_deterministic(
        rows in prop::collection::vec(prop::collection::vec(0u64..1_000, 0..8), 1..120),
        k in 1usize..9,
        v_size in 1usize..64,
        block_size in 1usize..17,
    ) {
        let p = Partitioner::new(config(k, v_size, block_size, "2K")).prepare().unwrap();
        let a = p.run(MemorySource::new(rows.clone())).unwrap();
        let b = p.run(MemorySource::new(rows.clone())).unwrap();

        prop_assert_eq!(&a.map, &b.map);
        prop_assert_eq!(a.map.len(), rows.len());
        prop_assert!(a.map.iter().all(|(_, part)| (part as usize) < k));
        for block in a.map.as_slice().chunks(block_size) {
            let mut sizes = vec![0usize; k];
            for &part in block {
                sizes[part as usize] += 1;
            }
            let m = block.len();
            prop_assert!(sizes.iter().all(|&s| s == m / k || s == m.div_ceil(k)));
        }
        if block_size % k == 0 {
            prop_assert!(a.map.is_balanced());
        }
    }
}
