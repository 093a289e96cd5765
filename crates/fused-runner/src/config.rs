// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Runner configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! channels = 32
//! spatial = 196
//! formats = ["nchw", "nhwc", "nchw4c", "nchw8c", "nchw16c"]
//! kinds = ["forward0", "forward1", "forward2", "forward3", "forward4", "forward8", "forward9"]
//! iterations = 10
//! seed = 42
//! tolerance = 1e-6
//! ```

use crate::{FusedKind, RunnerError};
use std::path::Path;
use synet_fused::TensorFormat;

/// Configuration for a verification or benchmark sweep.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RunnerConfig {
    /// Number of channels of the logical tensor.
    #[serde(default = "default_channels")]
    pub channels: usize,
    /// Number of spatial positions of the logical tensor.
    #[serde(default = "default_spatial")]
    pub spatial: usize,
    /// Format names to exercise (see `TensorFormat::from_str_loose`).
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    /// Kernel names to exercise (see [`FusedKind::from_str_loose`]).
    #[serde(default = "default_kinds")]
    pub kinds: Vec<String>,
    /// Timed repetitions per case.
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Seed for the random workload; a fresh seed is drawn when absent.
    pub seed: Option<u64>,
    /// Largest accepted absolute difference from the reference.
    #[serde(default = "default_tolerance")]
    pub tolerance: f32,
}

fn default_channels() -> usize {
    32
}

fn default_spatial() -> usize {
    196
}

fn default_formats() -> Vec<String> {
    TensorFormat::SUPPORTED
        .iter()
        .map(|f| f.as_str().to_string())
        .collect()
}

fn default_kinds() -> Vec<String> {
    FusedKind::ALL.iter().map(|k| k.as_str().to_string()).collect()
}

fn default_iterations() -> usize {
    10
}

fn default_tolerance() -> f32 {
    1e-6
}

impl RunnerConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, RunnerError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RunnerError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, RunnerError> {
        toml::from_str(toml_str)
            .map_err(|e| RunnerError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, RunnerError> {
        toml::to_string_pretty(self)
            .map_err(|e| RunnerError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Checks the numeric settings.
    pub fn validate(&self) -> Result<(), RunnerError> {
        if self.iterations == 0 {
            return Err(RunnerError::ConfigError(
                "iterations must be at least 1".into(),
            ));
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(RunnerError::ConfigError(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    /// Parses the configured format names.
    pub fn parse_formats(&self) -> Result<Vec<TensorFormat>, RunnerError> {
        self.formats
            .iter()
            .map(|s| match TensorFormat::from_str_loose(s) {
                Some(TensorFormat::Unknown) => Err(RunnerError::ConfigError(format!(
                    "format '{s}' is not dispatchable"
                ))),
                Some(format) => Ok(format),
                None => Err(synet_fused::FusedError::UnknownFormat(s.clone()).into()),
            })
            .collect()
    }

    /// Parses the configured kernel names.
    pub fn parse_kinds(&self) -> Result<Vec<FusedKind>, RunnerError> {
        self.kinds
            .iter()
            .map(|s| {
                FusedKind::from_str_loose(s).ok_or_else(|| RunnerError::UnknownKind(s.clone()))
            })
            .collect()
    }

    /// Resolves the workload seed.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            spatial: default_spatial(),
            formats: default_formats(),
            kinds: default_kinds(),
            iterations: default_iterations(),
            seed: None,
            tolerance: default_tolerance(),
        }
    }
}
