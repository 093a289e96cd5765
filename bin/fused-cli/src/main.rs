// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # synet-fused
//!
//! Command-line interface for the synet-fused kernels.
//!
//! ## Usage
//! ```bash
//! # Check every kernel in every format against the reference
//! synet-fused verify --channels 32 --spatial 196
//!
//! # Time the kernels per format
//! synet-fused bench --channels 64 --spatial 3136 --iterations 50
//!
//! # List the supported formats
//! synet-fused formats
//! ```

mod commands;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "synet-fused",
    about = "Verify and benchmark fused-layer kernels across tensor formats",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file (CLI arguments override it).
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Tensor shape and selection flags shared by `verify` and `bench`.
#[derive(Args, Debug, Default)]
pub struct SweepArgs {
    /// Number of channels.
    #[arg(long)]
    pub channels: Option<usize>,

    /// Number of spatial positions.
    #[arg(long)]
    pub spatial: Option<usize>,

    /// Comma-separated formats (e.g., "nchw,nhwc,nchw8c").
    #[arg(long)]
    pub formats: Option<String>,

    /// Comma-separated kernels (e.g., "forward0,forward9").
    #[arg(long)]
    pub kinds: Option<String>,

    /// Seed for the random workload.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the report as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every kernel in every format against the reference.
    Verify {
        #[command(flatten)]
        sweep: SweepArgs,

        /// Largest accepted absolute difference from the reference.
        #[arg(long)]
        tolerance: Option<f32>,
    },

    /// Time every kernel in every format.
    Bench {
        #[command(flatten)]
        sweep: SweepArgs,

        /// Timed repetitions per case.
        #[arg(short, long)]
        iterations: Option<usize>,
    },

    /// List the supported tensor formats and their memory order.
    Formats,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Verify { sweep, tolerance } => {
            commands::verify::execute(cli.config.as_deref(), sweep, tolerance)
        }
        Commands::Bench { sweep, iterations } => {
            commands::bench::execute(cli.config.as_deref(), sweep, iterations)
        }
        Commands::Formats => commands::formats::execute(),
    }
}
