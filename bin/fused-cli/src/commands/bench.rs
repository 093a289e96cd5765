// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `synet-fused bench` command: time every kernel in every format.
//!
//! Prints a table with the mean call time and the time per element, and
//! names the fastest format of each kernel. Results are still checked
//! against the reference; a mismatch aborts the command.

use crate::SweepArgs;
use fused_runner::CaseReport;
use std::path::Path;

pub fn execute(
    config: Option<&Path>,
    sweep: SweepArgs,
    iterations: Option<usize>,
) -> anyhow::Result<()> {
    let mut config = super::resolve_config(config, &sweep)?;
    if let Some(n) = iterations {
        config.iterations = n;
    }

    let report = fused_runner::run_all(&config)?;
    if !report.passed() {
        anyhow::bail!("kernel output mismatch: {}", report.summary());
    }

    if sweep.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║            synet-fused · Benchmark Suite            ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!(
        "  Tensor: {} channels x {} positions, {} iterations per case",
        config.channels, config.spatial, config.iterations,
    );
    println!();
    println!(
        "  {:<10} {:<9} {:>6} {:>12} {:>10}",
        "Kernel", "Format", "Trans", "Per call", "ns/elem",
    );
    println!("  {}", "-".repeat(52));
    for case in &report.cases {
        println!(
            "  {:<10} {:<9} {:>6} {:>9.3} us {:>10.3}",
            case.kind,
            case.format,
            case.transposed,
            case.per_iteration().as_secs_f64() * 1e6,
            case.ns_per_element(),
        );
    }
    println!();

    // ── Summary ────────────────────────────────────────────────
    println!("  Fastest format per kernel:");
    let mut kinds: Vec<_> = report.cases.iter().map(|c| c.kind).collect();
    kinds.dedup();
    for kind in kinds {
        if let Some(best) = fastest(report.cases.iter().filter(|c| c.kind == kind)) {
            println!(
                "   {:<10} {} ({:.3} ns/elem)",
                kind,
                best.format,
                best.ns_per_element()
            );
        }
    }
    println!();

    Ok(())
}

fn fastest<'a>(cases: impl Iterator<Item = &'a CaseReport>) -> Option<&'a CaseReport> {
    cases.min_by(|a, b| a.ns_per_element().total_cmp(&b.ns_per_element()))
}
