// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and shared setup.

pub mod bench;
pub mod formats;
pub mod verify;

use crate::SweepArgs;
use fused_runner::RunnerConfig;
use std::path::Path;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows the `-v` count.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Loads the config file (or defaults) and applies command-line overrides.
pub fn resolve_config(path: Option<&Path>, sweep: &SweepArgs) -> anyhow::Result<RunnerConfig> {
    let mut config = match path {
        Some(p) => RunnerConfig::from_file(p)?,
        None => RunnerConfig::default(),
    };

    if let Some(channels) = sweep.channels {
        config.channels = channels;
    }
    if let Some(spatial) = sweep.spatial {
        config.spatial = spatial;
    }
    if let Some(formats) = &sweep.formats {
        config.formats = split_list(formats);
    }
    if let Some(kinds) = &sweep.kinds {
        config.kinds = split_list(kinds);
    }
    if sweep.seed.is_some() {
        config.seed = sweep.seed;
    }

    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
