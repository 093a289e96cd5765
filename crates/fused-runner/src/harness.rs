// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Running kernels in a given format and checking them against the reference.

use crate::{
    reference, CaseReport, FusedKind, RunReport, RunnerConfig, RunnerError, SkippedCase, Workload,
};
use std::time::{Duration, Instant};
use synet_fused::{self as fused, FusedError, TensorFormat};

/// Runs `w.kind` with its inputs stored in `format`, `iterations` times, and
/// compares the output with [`reference::compute`].
///
/// Format-tagged kernels accept every supported format. Multi-input kernels
/// map [`TensorFormat::Nchw`] to the untransposed and [`TensorFormat::Nhwc`]
/// to the transposed traversal.
///
/// # Errors
/// Returns [`RunnerError::UnsupportedCase`] for a blocked format on a
/// multi-input kernel and [`RunnerError::Kernel`] when the format cannot
/// hold `w.channels` channels.
pub fn run_case(
    w: &Workload,
    format: TensorFormat,
    iterations: usize,
    tolerance: f32,
) -> Result<CaseReport, RunnerError> {
    let unsupported = || RunnerError::UnsupportedCase {
        kind: w.kind,
        format,
    };
    format.check_channels(w.channels).map_err(|e| match e {
        FusedError::UnsupportedFormat { .. } => unsupported(),
        other => other.into(),
    })?;

    let transposed = match (w.kind.layout_tagged(), format) {
        (true, _) => false,
        (false, TensorFormat::Nchw) => false,
        (false, TensorFormat::Nhwc) => true,
        (false, _) => return Err(unsupported()),
    };

    let expected = reference::compute(w);
    let (output, elapsed, copy_diff) = if w.kind.layout_tagged() {
        let (output, elapsed) = run_tagged(w, format, iterations)?;
        (output, elapsed, 0.0)
    } else {
        run_flagged(w, transposed, iterations)?
    };

    let max_abs_diff = max_abs_diff(&output, &expected).max(copy_diff);
    let passed = max_abs_diff <= tolerance;
    if passed {
        tracing::debug!(kind = %w.kind, %format, max_abs_diff, "case passed");
    } else {
        tracing::warn!(kind = %w.kind, %format, max_abs_diff, tolerance, "case failed");
    }

    Ok(CaseReport {
        kind: w.kind,
        format,
        transposed,
        channels: w.channels,
        spatial: w.spatial,
        iterations,
        max_abs_diff,
        passed,
        elapsed,
    })
}

/// Runs every configured (kernel, format) pair.
///
/// Pairs the kernels cannot handle (blocked formats on multi-input kernels,
/// channel counts a blocked format cannot tile) are recorded as skipped.
///
/// # Errors
/// Returns configuration errors and any unexpected case error.
pub fn run_all(config: &RunnerConfig) -> Result<RunReport, RunnerError> {
    config.validate()?;
    let formats = config.parse_formats()?;
    let kinds = config.parse_kinds()?;
    let seed = config.resolve_seed();

    tracing::info!(
        channels = config.channels,
        spatial = config.spatial,
        formats = formats.len(),
        kinds = kinds.len(),
        seed,
        "starting sweep"
    );

    let mut report = RunReport::new(seed);
    for (index, &kind) in kinds.iter().enumerate() {
        let workload = Workload::generate(
            kind,
            config.channels,
            config.spatial,
            seed.wrapping_add(index as u64),
        );
        for &format in &formats {
            match run_case(&workload, format, config.iterations, config.tolerance) {
                Ok(case) => report.cases.push(case),
                Err(e @ (RunnerError::UnsupportedCase { .. } | RunnerError::Kernel(_))) => {
                    tracing::debug!(%kind, %format, "skipped: {e}");
                    report.skipped.push(SkippedCase {
                        kind,
                        format,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }

    tracing::info!("{}", report.summary());
    Ok(report)
}

/// Forward0-3: inputs reordered into `format`, output reordered back.
fn run_tagged(
    w: &Workload,
    format: TensorFormat,
    iterations: usize,
) -> Result<(Vec<f32>, Duration), RunnerError> {
    let (channels, spatial) = (w.channels, w.spatial);
    let src = fused::reordered(&w.src0, channels, spatial, TensorFormat::Nchw, format)?;
    let mut dst = vec![0.0; channels * spatial];

    let start = Instant::now();
    for _ in 0..iterations {
        match w.kind {
            FusedKind::Forward0 => fused::fused_layer_forward0(
                &src, &w.param0, &w.param1, channels, spatial, &mut dst, format,
            ),
            FusedKind::Forward1 => fused::fused_layer_forward1(
                &src, &w.param0, &w.param1, &w.param2, channels, spatial, &mut dst, format,
            ),
            FusedKind::Forward2 => fused::fused_layer_forward2(
                &src,
                &w.param0,
                &w.param1,
                channels,
                spatial,
                std::slice::from_ref(&w.slope),
                &mut dst,
                format,
            ),
            FusedKind::Forward3 => fused::fused_layer_forward3(
                &src, &w.param0, &w.param1, channels, spatial, &mut dst, format,
            ),
            other => {
                return Err(RunnerError::UnsupportedCase {
                    kind: other,
                    format,
                })
            }
        }
    }
    let elapsed = start.elapsed();

    let output = fused::reordered(&dst, channels, spatial, format, TensorFormat::Nchw)?;
    Ok((output, elapsed))
}

/// Forward4, 8 and 9: inputs transposed when requested, output brought back
/// to channel-major. Also returns the largest copy-output difference for
/// forward9.
fn run_flagged(
    w: &Workload,
    transposed: bool,
    iterations: usize,
) -> Result<(Vec<f32>, Duration, f32), RunnerError> {
    let (channels, spatial) = (w.channels, w.spatial);
    let layout = |t: bool| {
        if t {
            TensorFormat::Nhwc
        } else {
            TensorFormat::Nchw
        }
    };
    let input = |v: &[f32], c: usize| {
        fused::reordered(v, c, spatial, TensorFormat::Nchw, layout(transposed))
    };
    let output = |v: &[f32], c: usize, t: bool| {
        fused::reordered(v, c, spatial, layout(t), TensorFormat::Nchw)
    };

    match w.kind {
        FusedKind::Forward4 => {
            let src = input(&w.src0, channels)?;
            let mut dst = vec![0.0; 2 * channels * spatial];
            let start = Instant::now();
            for _ in 0..iterations {
                fused::fused_layer_forward4(
                    &src, &w.param0, &w.param1, &w.param2, channels, spatial, &mut dst, transposed,
                );
            }
            let elapsed = start.elapsed();
            // The output block follows the traversal actually taken.
            let t = fused::count_inner_traversal(channels, spatial, transposed);
            Ok((output(&dst, 2 * channels, t)?, elapsed, 0.0))
        }
        FusedKind::Forward8 => {
            let src0 = input(&w.src0, channels)?;
            let src1 = input(&w.src1, channels)?;
            let mut dst = vec![0.0; channels * spatial];
            let start = Instant::now();
            for _ in 0..iterations {
                fused::fused_layer_forward8(
                    &src0, &src1, &w.param0, channels, spatial, &mut dst, transposed,
                );
            }
            let elapsed = start.elapsed();
            Ok((output(&dst, channels, transposed)?, elapsed, 0.0))
        }
        FusedKind::Forward9 => {
            let (count0, count1) = w.groups();
            let src0 = input(&w.src0, count0)?;
            let src1 = input(&w.src1, count1)?;
            let mut dst0 = vec![0.0; channels * spatial];
            let mut dst1 = vec![0.0; channels * spatial];
            let start = Instant::now();
            for _ in 0..iterations {
                fused::fused_layer_forward9(
                    &src0,
                    &src1,
                    &w.param0,
                    &w.param1,
                    count0,
                    count1,
                    spatial,
                    &mut dst0,
                    Some(&mut dst1),
                    transposed,
                );
            }
            let elapsed = start.elapsed();
            let copy = output(&dst1, channels, transposed)?;
            let copy_diff = max_abs_diff(&copy, &reference::concat(w));
            Ok((output(&dst0, channels, transposed)?, elapsed, copy_diff))
        }
        other => Err(RunnerError::UnsupportedCase {
            kind: other,
            format: layout(transposed),
        }),
    }
}

/// Largest absolute element difference.
///
/// NaN on both sides agrees; NaN on one side counts as infinite.
fn max_abs_diff(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x.is_nan(), y.is_nan()) {
            (true, true) => 0.0,
            (false, false) => (x - y).abs(),
            _ => f32::INFINITY,
        })
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_abs_diff() {
        assert_eq!(max_abs_diff(&[1.0, 2.0], &[1.0, 2.5]), 0.5);
        assert_eq!(max_abs_diff(&[1.0], &[1.0, 2.0]), f32::INFINITY);
        assert_eq!(max_abs_diff(&[f32::NAN], &[0.0]), f32::INFINITY);
        assert_eq!(max_abs_diff(&[0.0], &[f32::NAN]), f32::INFINITY);
        assert_eq!(max_abs_diff(&[f32::NAN, 1.0], &[f32::NAN, 1.0]), 0.0);
        assert_eq!(max_abs_diff(&[], &[]), 0.0);
    }

    #[test]
    fn test_tagged_kernels_in_every_format() {
        for kind in [
            FusedKind::Forward0,
            FusedKind::Forward1,
            FusedKind::Forward2,
            FusedKind::Forward3,
        ] {
            let w = Workload::generate(kind, 16, 7, 21);
            for format in TensorFormat::SUPPORTED {
                let r = run_case(&w, format, 1, 0.0).unwrap();
                assert!(r.passed, "{kind} {format}: {}", r.max_abs_diff);
                assert_eq!(r.max_abs_diff, 0.0);
            }
        }
    }

    #[test]
    fn test_flagged_kernels_both_traversals() {
        for kind in [FusedKind::Forward4, FusedKind::Forward8, FusedKind::Forward9] {
            for (channels, spatial) in [(5, 7), (1, 7), (6, 1), (1, 1)] {
                let w = Workload::generate(kind, channels, spatial, 8);
                for format in [TensorFormat::Nchw, TensorFormat::Nhwc] {
                    let r = run_case(&w, format, 2, 0.0).unwrap();
                    assert!(r.passed, "{kind} {format} {channels}x{spatial}");
                    assert_eq!(r.transposed, format == TensorFormat::Nhwc);
                }
            }
        }
    }

    #[test]
    fn test_unsupported_cases() {
        let w = Workload::generate(FusedKind::Forward8, 8, 3, 1);
        assert!(matches!(
            run_case(&w, TensorFormat::Nchw8c, 1, 0.0),
            Err(RunnerError::UnsupportedCase { .. })
        ));
        assert!(matches!(
            run_case(&w, TensorFormat::Unknown, 1, 0.0),
            Err(RunnerError::UnsupportedCase { .. })
        ));

        let w = Workload::generate(FusedKind::Forward0, 6, 3, 1);
        assert!(matches!(
            run_case(&w, TensorFormat::Nchw4c, 1, 0.0),
            Err(RunnerError::Kernel(FusedError::ChannelsNotAligned { .. }))
        ));
    }
}
