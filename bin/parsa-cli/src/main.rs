// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # parsa
//!
//! Command-line interface for the streaming bipartite partitioner.
//!
//! ## Usage
//! ```bash
//! # Partition a libsvm-style file into 8 parts
//! parsa run --input data.txt --partitions 8 --v-size 1048576 --label --output parts.tsv
//!
//! # Compare partition counts and memory budgets
//! parsa benchmark --input data.txt --sweep-partitions 2,4,8 --sweep-memory 1M,256M
//!
//! # Inspect the block structure of an input file
//! parsa inspect --input data.txt --block-size 10000
//! ```

mod commands;

use clap::{Parser, Subcommand};
use commands::ConfigArgs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "parsa",
    about = "Streaming balanced partitioning of bipartite graphs",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file (CLI arguments override it).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Partition the U vertices of an input file.
    Run {
        /// Input file, one U vertex per line.
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        args: ConfigArgs,

        /// Write the `u<TAB>partition` mapping here.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write run metrics as JSON here.
        #[arg(long)]
        metrics_json: Option<PathBuf>,
    },

    /// Sweep partition counts and memory budgets over one input.
    Benchmark {
        /// Input file, one U vertex per line.
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        args: ConfigArgs,

        /// Comma-separated partition counts (e.g., "2,4,8").
        #[arg(long, default_value = "2,4,8,16")]
        sweep_partitions: String,

        /// Comma-separated memory budgets (e.g., "1M,64M").
        #[arg(long, default_value = "1M,64M")]
        sweep_memory: String,
    },

    /// Print the block structure of an input file without partitioning.
    Inspect {
        /// Input file, one U vertex per line.
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        args: ConfigArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Run {
            input,
            args,
            output,
            metrics_json,
        } => commands::run::execute(
            &input,
            args.resolve(config)?,
            output.as_deref(),
            metrics_json.as_deref(),
        ),
        Commands::Benchmark {
            input,
            args,
            sweep_partitions,
            sweep_memory,
        } => commands::benchmark::execute(
            &input,
            args.resolve(config)?,
            &sweep_partitions,
            &sweep_memory,
        ),
        Commands::Inspect { input, args } => {
            commands::inspect::execute(&input, args.resolve(config)?)
        }
    }
}
