// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `parsa run` command: partition an input file.
//!
//! Drives the type-state pipeline:
//! ```text
//! Partitioner<Idle> → prepare → <Ready> → run_with(source, on_block)
//! ```
//! The mapping is streamed to `<output>.partial` block by block and renamed
//! into place only if the whole run succeeds.

use super::{mb, open_source};
use partition_engine::BlockAssignment;
use runtime::{PartitionConfig, PartitionOutput, Partitioner};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub fn execute(
    input: &Path,
    config: PartitionConfig,
    output: Option<&Path>,
    metrics_json: Option<&Path>,
) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              parsa · Partition Runner                ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    println!("  Config:");
    println!("   Input:      {}", input.display());
    println!("   Partitions: {}", config.num_partitions);
    println!("   V universe: {}", config.v_size);
    println!("   Block size: {} rows", config.block_size);
    println!("   Budget:     {}", config.memory_budget);
    println!("   Labels:     {}", if config.has_label { "yes" } else { "no" });
    println!();

    // Step 1: Idle → Ready (validate before touching the input).
    println!("  [1/2] Validating configuration...");
    let partitioner = Partitioner::new(config.clone()).prepare()?;
    let source = open_source(input, &config)?;
    println!();

    // Step 2: stream blocks through the loader and the engine.
    println!("  [2/2] Partitioning...");
    let result = match output {
        Some(path) => run_to_file(&partitioner, source, path),
        None => Ok(partitioner.run(source)?),
    }?;
    println!();

    print_results(&result);

    if let Some(path) = output {
        println!("  Mapping written to {}", path.display());
    }
    if let Some(path) = metrics_json {
        let file = File::create(path)
            .map_err(|e| anyhow::anyhow!("cannot create '{}': {e}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &result.metrics)?;
        writer.flush()?;
        println!("  Metrics written to {}", path.display());
    }

    Ok(())
}

/// Runs while streaming each finished block into a temporary file.
fn run_to_file<G>(
    partitioner: &Partitioner<runtime::Ready>,
    source: G,
    path: &Path,
) -> anyhow::Result<PartitionOutput>
where
    G: block_graph::GraphSource + Send,
{
    let partial = partial_path(path);
    let file = File::create(&partial)
        .map_err(|e| anyhow::anyhow!("cannot create '{}': {e}", partial.display()))?;
    let mut writer = BufWriter::new(file);
    let mut write_error = None;

    let result = partitioner.run_with(source, |block: &BlockAssignment| {
        if write_error.is_some() {
            return;
        }
        for (u, k) in block.iter() {
            if let Err(e) = writeln!(writer, "{u}\t{k}") {
                write_error = Some(e);
                return;
            }
        }
    });

    let finished = result.map_err(anyhow::Error::from).and_then(|output| {
        if let Some(e) = write_error {
            return Err(e.into());
        }
        writer.flush()?;
        Ok(output)
    });

    match finished {
        Ok(output) => {
            std::fs::rename(&partial, path)?;
            Ok(output)
        }
        Err(e) => {
            // A failed run has no valid mapping.
            let _ = std::fs::remove_file(&partial);
            Err(e)
        }
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

fn print_results(output: &PartitionOutput) {
    let metrics = &output.metrics;
    println!("  Results:");
    println!("   U vertices:   {}", output.map.len());
    println!("   Blocks:       {}", metrics.blocks());
    println!("   Sizes:        {:?}", output.map.partition_sizes());
    println!("   Coverage:     {:?}", metrics.coverage_sizes);
    println!("   Replication:  {:.4}", metrics.replication_factor());
    println!(
        "   Loaded:       {} edges, {:.2} MB of blocks, {} collisions",
        metrics.load.edges,
        mb(metrics.load.bytes),
        metrics.load.collisions,
    );
    println!();
    println!("  Metrics:");
    println!("   {}", metrics.summary());
    println!("   {}", metrics.queue.summary());
    println!();
}
