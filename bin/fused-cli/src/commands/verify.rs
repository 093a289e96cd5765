// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `synet-fused verify` command: layout-equivalence check of every kernel.
//!
//! Runs each kernel in each requested format on a seeded random workload and
//! compares the result, moved back to channel-major order, with the
//! one-element-at-a-time reference.

use crate::SweepArgs;
use std::path::Path;

pub fn execute(
    config: Option<&Path>,
    sweep: SweepArgs,
    tolerance: Option<f32>,
) -> anyhow::Result<()> {
    let mut config = super::resolve_config(config, &sweep)?;
    config.iterations = 1;
    if let Some(t) = tolerance {
        config.tolerance = t;
    }

    let report = fused_runner::run_all(&config)?;

    if sweep.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("╔══════════════════════════════════════════════════════╗");
        println!("║          synet-fused · Layout Verification          ║");
        println!("╚══════════════════════════════════════════════════════╝");
        println!();
        println!(
            "  Tensor: {} channels x {} positions, tolerance {:e}, seed {}",
            config.channels, config.spatial, config.tolerance, report.seed,
        );
        println!();
        println!(
            "  {:<10} {:<9} {:>6} {:>12} {:>8}",
            "Kernel", "Format", "Trans", "Max |diff|", "Result",
        );
        println!("  {}", "-".repeat(50));
        for case in &report.cases {
            println!(
                "  {:<10} {:<9} {:>6} {:>12.3e} {:>8}",
                case.kind,
                case.format,
                case.transposed,
                case.max_abs_diff,
                if case.passed { "ok" } else { "FAILED" },
            );
        }
        for skipped in &report.skipped {
            println!(
                "  {:<10} {:<9} {:>6} {:>12} {:>8}   ({})",
                skipped.kind, skipped.format, "-", "-", "skipped", skipped.reason,
            );
        }
        println!();
        println!("  {}", report.summary());
        println!();
    }

    if !report.passed() {
        let failed: Vec<String> = report
            .failures()
            .map(|c| format!("{}/{}", c.kind, c.format))
            .collect();
        anyhow::bail!("layout verification failed for {}", failed.join(", "));
    }
    Ok(())
}
