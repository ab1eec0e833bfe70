// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `parsa benchmark` command: sweep partition counts and memory budgets.
//!
//! Runs the full pipeline once per combination and prints a comparison
//! table of replication, latency and loader stalls. The budget changes only
//! timing; the mapping for a given `K` is the same at every budget.

use super::{mb, open_source};
use memory_manager::MemoryBudget;
use runtime::{PartitionConfig, Partitioner};
use std::path::Path;

struct BenchResult {
    partitions: usize,
    budget_label: String,
    replication: f64,
    total_ms: f64,
    wait_ms: f64,
    blocked_pushes: u64,
    peak_mb: f64,
    vertices_per_sec: f64,
}

pub fn execute(
    input: &Path,
    base: PartitionConfig,
    sweep_partitions: &str,
    sweep_memory: &str,
) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║               parsa · Benchmark Suite                ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let partitions: Vec<usize> = sweep_partitions
        .split(',')
        .map(|s| {
            s.trim()
                .parse::<usize>()
                .map_err(|e| anyhow::anyhow!("invalid partition count '{}': {e}", s.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Parse up front so a typo fails before any run.
    let budgets: Vec<String> = sweep_memory
        .split(',')
        .map(|s| {
            let s = s.trim();
            MemoryBudget::parse(s)
                .map(|_| s.to_string())
                .map_err(|e| anyhow::anyhow!("invalid budget '{s}': {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    println!("  Input:      {}", input.display());
    println!("  Partitions: {partitions:?}");
    println!("  Budgets:    {budgets:?}");
    println!();

    // ── Results Table ──────────────────────────────────────────
    println!(
        "  {:>4} {:>8} {:>12} {:>10} {:>10} {:>8} {:>9} {:>12}",
        "K", "Budget", "Replication", "Latency", "Wait", "Stalls", "Peak MB", "U/s",
    );
    println!("  {}", "-".repeat(82));

    let mut results = Vec::new();
    for &k in &partitions {
        for budget in &budgets {
            let config = PartitionConfig {
                num_partitions: k,
                memory_budget: budget.clone(),
                ..base.clone()
            };
            match run_single(input, config) {
                Ok(r) => {
                    println!(
                        "  {:>4} {:>8} {:>12.4} {:>8.2}ms {:>8.2}ms {:>8} {:>9.2} {:>12.0}",
                        r.partitions,
                        r.budget_label,
                        r.replication,
                        r.total_ms,
                        r.wait_ms,
                        r.blocked_pushes,
                        r.peak_mb,
                        r.vertices_per_sec,
                    );
                    results.push(r);
                }
                Err(e) => {
                    tracing::warn!("benchmark K={k} budget={budget} failed: {e:#}");
                    println!("  {k:>4} {budget:>8}     FAILED: {e}");
                }
            }
        }
    }
    println!();

    // ── Summary ────────────────────────────────────────────────
    let Some(fastest) = results
        .iter()
        .min_by(|a, b| a.total_ms.total_cmp(&b.total_ms))
    else {
        println!("  No successful benchmark runs.");
        return Ok(());
    };
    println!("  Summary:");
    println!(
        "   Fastest:          K={} @ {} ({:.2}ms)",
        fastest.partitions, fastest.budget_label, fastest.total_ms,
    );
    for &k in &partitions {
        if let Some(r) = results.iter().find(|r| r.partitions == k) {
            println!("   Replication K={:<4} {:.4}", k, r.replication);
        }
    }
    println!();

    Ok(())
}

fn run_single(input: &Path, config: PartitionConfig) -> anyhow::Result<BenchResult> {
    let partitioner = Partitioner::new(config.clone()).prepare()?;
    let source = open_source(input, &config)?;
    let output = partitioner.run(source)?;
    let m = &output.metrics;

    Ok(BenchResult {
        partitions: config.num_partitions,
        budget_label: config.memory_budget,
        replication: m.replication_factor(),
        total_ms: m.total_duration.as_secs_f64() * 1000.0,
        wait_ms: m.pop_wait_duration.as_secs_f64() * 1000.0,
        blocked_pushes: m.queue.blocked_pushes,
        peak_mb: mb(m.queue.peak_queued_bytes as u64),
        vertices_per_sec: m.vertices_per_second(),
    })
}
