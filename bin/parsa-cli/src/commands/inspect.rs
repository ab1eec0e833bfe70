// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `parsa inspect` command: display the block structure of an input file.
//!
//! Reads the input exactly as the loader would (same block size, same id
//! reduction) and prints one line per block plus totals, without running
//! the partitioner.

use super::{mb, open_source};
use block_graph::{BlockReader, GraphBlock};
use runtime::PartitionConfig;
use std::path::Path;

pub fn execute(input: &Path, config: PartitionConfig) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║               parsa · Input Inspector                ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    config.validate()?;
    let source = open_source(input, &config)?;

    println!("  Input: {}", input.display());
    println!(
        "  V universe: {}, block size: {} rows",
        config.v_size, config.block_size
    );
    println!();

    // ── Per-Block Detail ───────────────────────────────────────
    println!(
        "  {:<6} {:>12} {:>8} {:>10} {:>10} {:>8} {:>10}",
        "Block", "First U", "Rows", "Edges", "Distinct V", "Max deg", "Size",
    );
    println!("  {}", "-".repeat(72));

    let mut reader = BlockReader::new(source, config.v_size, config.block_size);
    let mut totals = Totals::default();
    while let Some(block) = reader.read_block()? {
        println!(
            "  {:<6} {:>12} {:>8} {:>10} {:>10} {:>8} {:>7.1} KB",
            totals.blocks,
            block.first_u(),
            block.num_u(),
            block.nnz(),
            block.distinct_v(),
            block.row_major().max_degree(),
            block.mem_size() as f64 / 1024.0,
        );
        totals.add(&block);
    }
    println!();

    // ── Totals ─────────────────────────────────────────────────
    println!("  Totals:");
    println!("   Blocks:       {}", totals.blocks);
    println!("   U vertices:   {}", reader.next_u());
    println!("   Edges:        {}", totals.edges);
    println!("   Collisions:   {}  (raw ids folded by reduction)", totals.collisions);
    println!("   Max degree:   {}", totals.max_degree);
    println!("   Largest block: {:.2} MB", mb(totals.largest_block));
    if totals.rows > 0 {
        println!(
            "   Mean degree:  {:.2}",
            totals.edges as f64 / totals.rows as f64
        );
    }
    println!();

    // ── Budget Recommendation ──────────────────────────────────
    println!("  Budget Recommendation:");
    println!(
        "   Minimum:      {:.2} MB  (one block in flight)",
        mb(totals.largest_block),
    );
    println!(
        "   Comfortable:  {:.2} MB  (four blocks in flight)",
        mb(totals.largest_block * 4),
    );
    println!();

    Ok(())
}

#[derive(Debug, Default)]
struct Totals {
    blocks: usize,
    rows: u64,
    edges: u64,
    collisions: u64,
    max_degree: usize,
    largest_block: u64,
}

impl Totals {
    fn add(&mut self, block: &GraphBlock) {
        self.blocks += 1;
        self.rows += block.num_u() as u64;
        self.edges += block.nnz() as u64;
        self.collisions += block.collisions() as u64;
        self.max_degree = self.max_degree.max(block.row_major().max_degree());
        self.largest_block = self.largest_block.max(block.mem_size() as u64);
    }
}
