// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommands and the helpers they share.

pub mod benchmark;
pub mod inspect;
pub mod run;

use block_graph::TextSource;
use runtime::PartitionConfig;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` count picks the level.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Run parameters shared by every subcommand.
#[derive(Debug, Default, clap::Args)]
pub struct ConfigArgs {
    /// Number of partitions K.
    #[arg(short = 'k', long)]
    pub partitions: Option<usize>,

    /// Size of the reduced V universe.
    #[arg(long)]
    pub v_size: Option<usize>,

    /// Maximum U rows per block.
    #[arg(long)]
    pub block_size: Option<usize>,

    /// Memory budget for queued blocks (e.g., "64M", "1G").
    #[arg(short = 'b', long)]
    pub memory_budget: Option<String>,

    /// Input lines start with a label token.
    #[arg(short, long)]
    pub label: bool,
}

impl ConfigArgs {
    /// Loads `config` (or the defaults) and applies the flags on top.
    pub fn resolve(self, config: Option<&Path>) -> anyhow::Result<PartitionConfig> {
        let mut resolved = match config {
            Some(path) => PartitionConfig::from_file(path)?,
            None => PartitionConfig::default(),
        };
        if let Some(k) = self.partitions {
            resolved.num_partitions = k;
        }
        if let Some(v_size) = self.v_size {
            resolved.v_size = v_size;
        }
        if let Some(block_size) = self.block_size {
            resolved.block_size = block_size;
        }
        if let Some(budget) = self.memory_budget {
            resolved.memory_budget = budget;
        }
        resolved.has_label |= self.label;
        Ok(resolved)
    }
}

/// Opens `input` as a text source configured by `config`.
pub fn open_source(
    input: &Path,
    config: &PartitionConfig,
) -> anyhow::Result<TextSource<BufReader<File>>> {
    let source = TextSource::open(input)
        .map_err(|e| anyhow::anyhow!("cannot open input '{}': {e}", input.display()))?;
    Ok(source.with_label(config.has_label))
}

/// Formats a byte count as megabytes.
pub fn mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}
