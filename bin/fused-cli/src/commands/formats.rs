// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `synet-fused formats` command: list the supported tensor formats.

use synet_fused::{element_offset, TensorFormat};

pub fn execute() -> anyhow::Result<()> {
    println!("  {:<9} {:>6}   {}", "Format", "Block", "Offset of (c, s)");
    println!("  {}", "-".repeat(58));
    for format in TensorFormat::SUPPORTED {
        let block = format
            .block_width()
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        println!("  {:<9} {:>6}   {}", format, block, offset_formula(format));
    }
    println!();

    // A small example makes the blocked interleave visible.
    let (channels, spatial) = (8, 2);
    println!("  Memory order of an {channels}x{spatial} tensor (channel.position):");
    for format in TensorFormat::SUPPORTED {
        let mut order = vec![String::new(); channels * spatial];
        for c in 0..channels {
            for s in 0..spatial {
                if let Some(o) = element_offset(format, channels, spatial, c, s) {
                    order[o] = format!("{c}.{s}");
                }
            }
        }
        println!("   {:<8} {}", format, order.join(" "));
    }
    println!();
    Ok(())
}

fn offset_formula(format: TensorFormat) -> String {
    match format.block_width() {
        Some(n) => format!("(c / {n}) * spatial * {n} + s * {n} + c % {n}"),
        None if format == TensorFormat::Nhwc => "s * channels + c".to_string(),
        None => "c * spatial + s".to_string(),
    }
}
