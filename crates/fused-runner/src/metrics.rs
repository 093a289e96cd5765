// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-case and aggregate verification results.

use crate::FusedKind;
use std::time::Duration;
use synet_fused::TensorFormat;

/// Outcome of running one kernel in one format.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CaseReport {
    pub kind: FusedKind,
    pub format: TensorFormat,
    /// Whether the transposed traversal was requested (multi-input kernels).
    pub transposed: bool,
    pub channels: usize,
    pub spatial: usize,
    pub iterations: usize,
    /// Largest absolute difference from the reference output.
    pub max_abs_diff: f32,
    pub passed: bool,
    /// Wall-clock time of all timed iterations.
    pub elapsed: Duration,
}

impl CaseReport {
    /// Mean time of one kernel call.
    pub fn per_iteration(&self) -> Duration {
        self.elapsed.div_f64(self.iterations.max(1) as f64)
    }

    /// Mean time per processed input element, in nanoseconds.
    pub fn ns_per_element(&self) -> f64 {
        let elements = self.channels.saturating_mul(self.spatial).max(1) as f64;
        self.per_iteration().as_secs_f64() * 1e9 / elements
    }
}

/// A (kernel, format) pair that was not run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SkippedCase {
    pub kind: FusedKind,
    pub format: TensorFormat,
    pub reason: String,
}

/// Results of a whole sweep.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub cases: Vec<CaseReport>,
    pub skipped: Vec<SkippedCase>,
}

impl RunReport {
    /// Creates an empty report for a workload seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Returns `true` if every case that ran matched the reference.
    pub fn passed(&self) -> bool {
        self.cases.iter().all(|c| c.passed)
    }

    /// Cases whose output differed from the reference.
    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|c| !c.passed)
    }

    /// Largest difference over every case.
    pub fn max_abs_diff(&self) -> f32 {
        self.cases.iter().map(|c| c.max_abs_diff).fold(0.0, f32::max)
    }

    /// Returns a one-line summary.
    pub fn summary(&self) -> String {
        let failed = self.failures().count();
        format!(
            "{} cases, {} passed, {} failed, {} skipped, max |diff| = {:e} (seed {})",
            self.cases.len(),
            self.cases.len() - failed,
            failed,
            self.skipped.len(),
            self.max_abs_diff(),
            self.seed,
        )
    }
}
