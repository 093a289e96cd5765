// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: every format and traversal must agree with the
//! channel-major result and with a one-element-at-a-time loop, bit for bit.

use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use synet_fused::{
    activation, count_inner_traversal, fused_layer_forward0, fused_layer_forward1,
    fused_layer_forward2, fused_layer_forward3, fused_layer_forward4, fused_layer_forward8,
    fused_layer_forward9, reordered, TensorFormat,
};

// ── Helpers ────────────────────────────────────────────────────

fn random_vec(rng: &mut StdRng, n: usize) -> Vec<f32> {
    (0..n).map(|_| rng.gen_range(-1.0f32..1.0)).collect()
}

/// Inputs of a single-input fused layer in channel-major order.
struct Layer {
    channels: usize,
    spatial: usize,
    src: Vec<f32>,
    p0: Vec<f32>,
    p1: Vec<f32>,
    p2: Vec<f32>,
}

impl Layer {
    fn random(channels: usize, spatial: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self {
            channels,
            spatial,
            src: random_vec(&mut rng, channels * spatial),
            p0: random_vec(&mut rng, channels),
            p1: random_vec(&mut rng, channels),
            p2: random_vec(&mut rng, channels),
        }
    }

    /// Runs variant `kind` with the input stored in `format`, returning the
    /// output in channel-major order.
    fn run(&self, kind: u8, format: TensorFormat) -> Vec<f32> {
        let (c, s) = (self.channels, self.spatial);
        let src = reordered(&self.src, c, s, TensorFormat::Nchw, format).unwrap();
        let mut dst = vec![f32::NAN; c * s];
        match kind {
            0 => fused_layer_forward0(&src, &self.p0, &self.p1, c, s, &mut dst, format),
            1 => fused_layer_forward1(&src, &self.p0, &self.p1, &self.p2, c, s, &mut dst, format),
            2 => fused_layer_forward2(&src, &self.p0, &self.p1, c, s, &[0.1], &mut dst, format),
            3 => fused_layer_forward3(&src, &self.p0, &self.p1, c, s, &mut dst, format),
            _ => unreachable!(),
        }
        reordered(&dst, c, s, format, TensorFormat::Nchw).unwrap()
    }

    /// One element at a time, channel-major.
    fn naive(&self, kind: u8) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.src.len());
        for c in 0..self.channels {
            for s in 0..self.spatial {
                let x = self.src[c * self.spatial + s];
                out.push(match kind {
                    0 => activation::fused0(x + self.p0[c], self.p1[c]),
                    1 => activation::fused1(x + self.p0[c], self.p1[c], self.p2[c]),
                    2 => activation::fused2(x, self.p0[c], self.p1[c], 0.1),
                    3 => activation::fused3(x + self.p0[c], self.p1[c]),
                    _ => unreachable!(),
                });
            }
        }
        out
    }
}

fn assert_bits_eq(actual: &[f32], expected: &[f32], context: &str) {
    assert_eq!(actual.len(), expected.len(), "{context}: length");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(a.to_bits(), e.to_bits(), "{context}: element {i}: {a} vs {e}");
    }
}

// ── Scenarios ──────────────────────────────────────────────────

#[test]
fn zero_bias_identity_scale_applies_formula_directly() {
    let (channels, spatial) = (3, 5);
    let src: Vec<f32> = (0..15).map(|i| (i as f32 - 7.0) * 0.3).collect();
    let bias = [0.0; 3];
    let scale = [1.0; 3];

    let mut dst = vec![0.0; 15];
    fused_layer_forward0(&src, &bias, &scale, channels, spatial, &mut dst, TensorFormat::Nchw);
    let expected: Vec<f32> = src.iter().map(|&x| activation::fused0(x, 1.0)).collect();
    assert_bits_eq(&dst, &expected, "forward0");

    fused_layer_forward3(&src, &bias, &scale, channels, spatial, &mut dst, TensorFormat::Nchw);
    let expected: Vec<f32> = src.iter().map(|&x| activation::fused3(x, 1.0)).collect();
    assert_bits_eq(&dst, &expected, "forward3");
}

#[test]
fn blocked4_tile_parameters_advance_once_per_tile() {
    let (channels, spatial) = (8, 3);
    let layer = Layer::random(channels, spatial, 7);
    let src = reordered(&layer.src, channels, spatial, TensorFormat::Nchw, TensorFormat::Nchw4c)
        .unwrap();

    let mut before = vec![0.0; channels * spatial];
    fused_layer_forward0(
        &src, &layer.p0, &layer.p1, channels, spatial, &mut before, TensorFormat::Nchw4c,
    );

    let mut bias = layer.p0.clone();
    for b in &mut bias[4..8] {
        *b += 10.0;
    }
    let mut after = vec![0.0; channels * spatial];
    fused_layer_forward0(
        &src, &bias, &layer.p1, channels, spatial, &mut after, TensorFormat::Nchw4c,
    );

    // First tile occupies the first 4 * spatial values of the blocked buffer.
    let tile = 4 * spatial;
    assert_bits_eq(&after[..tile], &before[..tile], "first tile");
    for (i, (a, b)) in after[tile..].iter().zip(&before[tile..]).enumerate() {
        assert_ne!(a, b, "second tile element {i} ignored its bias");
    }
}

#[test]
fn concat_groups_are_not_interleaved() {
    let src0 = [0.1, 0.2];
    let src1 = [1.1, 1.2, 1.3];
    let scale = [1.0; 5];
    let bias = [0.0; 5];
    let mut dst0 = [0.0; 5];
    let mut dst1 = [0.0; 5];
    fused_layer_forward9(&src0, &src1, &scale, &bias, 2, 3, 1, &mut dst0, Some(&mut dst1), true);
    assert_eq!(dst0, [0.1, 0.2, 1.1, 1.2, 1.3]);
    assert_eq!(dst1, [0.1, 0.2, 1.1, 1.2, 1.3]);
}

#[test]
fn concat_groups_per_position_when_transposed() {
    // count0 = 2, count1 = 1, size = 2; spatial-major inputs.
    let src0 = [1.0, 2.0, 3.0, 4.0];
    let src1 = [10.0, 20.0];
    let mut dst0 = [0.0; 6];
    fused_layer_forward9(&src0, &src1, &[1.0; 3], &[0.0; 3], 2, 1, 2, &mut dst0, None, true);
    assert_eq!(dst0, [1.0, 2.0, 10.0, 3.0, 4.0, 20.0]);
}

#[test]
fn every_format_matches_naive_loop_for_remainders() {
    for kind in 0..4 {
        for spatial in 0..10 {
            let layer = Layer::random(16, spatial, spatial as u64);
            let expected = layer.naive(kind);
            for format in TensorFormat::SUPPORTED {
                let got = layer.run(kind, format);
                let context = format!("forward{kind} {format} spatial={spatial}");
                assert_bits_eq(&got, &expected, &context);
            }
        }
    }
}

#[test]
fn spatial_major_matches_naive_loop_for_channel_remainders() {
    for kind in 0..4 {
        for channels in 1..10 {
            let layer = Layer::random(channels, 3, 100 + channels as u64);
            let got = layer.run(kind, TensorFormat::Nhwc);
            assert_bits_eq(&got, &layer.naive(kind), &format!("forward{kind} channels={channels}"));
        }
    }
}

#[test]
fn signed_zero_and_nan_survive_every_format() {
    let (channels, spatial) = (16, 3);
    let mut src = vec![-0.0f32; channels * spatial];
    src[5] = f32::NAN;
    let scale = vec![1.0; channels];
    let bias = vec![-0.0; channels];
    let neg_zero = (-0.0f32).to_bits();
    for format in TensorFormat::SUPPORTED {
        let mut dst = vec![1.0; channels * spatial];
        fused_layer_forward2(&src, &scale, &bias, channels, spatial, &[0.5], &mut dst, format);
        assert_eq!(dst.iter().filter(|v| v.is_nan()).count(), 1, "{format}");
        assert!(dst[5].is_nan(), "{format}");
        for (i, v) in dst.iter().enumerate().filter(|&(i, _)| i != 5) {
            assert_eq!(v.to_bits(), neg_zero, "{format} at {i}");
        }
    }
}

#[test]
#[should_panic(expected = "unsupported tensor format")]
fn unknown_format_is_fatal() {
    let mut dst = [0.0; 4];
    fused_layer_forward1(
        &[0.0; 4], &[0.0; 2], &[0.0; 2], &[0.0; 2], 2, 2, &mut dst, TensorFormat::Unknown,
    );
}

#[test]
#[should_panic(expected = "cannot be tiled by 16")]
fn misaligned_blocked_channels_are_fatal() {
    let mut dst = [0.0; 24];
    fused_layer_forward3(&[0.0; 24], &[0.0; 8], &[0.0; 8], 8, 3, &mut dst, TensorFormat::Nchw16c);
}

#[test]
fn degenerate_dimension_selects_traversal() {
    assert!(count_inner_traversal(4, 9, true));
    assert!(count_inner_traversal(4, 1, false));
    assert!(!count_inner_traversal(4, 9, false));
    assert!(!count_inner_traversal(1, 9, true));
    assert!(!count_inner_traversal(1, 1, true));
}

#[test]
fn count_one_ignores_transpose_flag() {
    let mut rng = StdRng::seed_from_u64(3);
    let size = 7;
    let src0 = random_vec(&mut rng, size);
    let src1 = random_vec(&mut rng, size);
    let src2 = random_vec(&mut rng, 1);

    let mut a = vec![0.0; size];
    let mut b = vec![0.0; size];
    fused_layer_forward8(&src0, &src1, &src2, 1, size, &mut a, true);
    fused_layer_forward8(&src0, &src1, &src2, 1, size, &mut b, false);
    assert_bits_eq(&a, &b, "forward8");

    let mut a = vec![0.0; 2 * size];
    let mut b = vec![0.0; 2 * size];
    fused_layer_forward4(&src0, &src2, &[-1.0], &[0.5], 1, size, &mut a, true);
    fused_layer_forward4(&src0, &src2, &[-1.0], &[0.5], 1, size, &mut b, false);
    assert_bits_eq(&a, &b, "forward4");
}

// ── Properties ─────────────────────────────────────────────────

proptest! {
    /// All supported formats agree with the channel-major result.
    #[test]
    fn prop_layouts_agree(
        kind in 0u8..4,
        blocks in 1usize..4,
        spatial in 0usize..12,
        seed in any::<u64>(),
    ) {
        let layer = Layer::random(blocks * 16, spatial, seed);
        let reference = layer.run(kind, TensorFormat::Nchw);
        prop_assert_eq!(&reference, &layer.naive(kind));
        for format in TensorFormat::SUPPORTED {
            let got = layer.run(kind, format);
            for (g, r) in got.iter().zip(&reference) {
                prop_assert_eq!(g.to_bits(), r.to_bits(), "forward{} {}", kind, format);
            }
        }
    }

    /// Transposed and channel-major traversals of the multi-input layers
    /// describe the same logical tensor.
    #[test]
    fn prop_transposed_multi_input_agree(
        count in 1usize..11,
        size in 1usize..11,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let src0 = random_vec(&mut rng, count * size);
        let src1 = random_vec(&mut rng, count * size);
        let src2 = random_vec(&mut rng, count);
        let to_nhwc = |v: &[f32], c: usize| {
            reordered(v, c, size, TensorFormat::Nchw, TensorFormat::Nhwc).unwrap()
        };
        let to_nchw = |v: &[f32], c: usize| {
            reordered(v, c, size, TensorFormat::Nhwc, TensorFormat::Nchw).unwrap()
        };

        let mut plain = vec![0.0; count * size];
        let mut trans = vec![0.0; count * size];
        fused_layer_forward8(&src0, &src1, &src2, count, size, &mut plain, false);
        fused_layer_forward8(
            &to_nhwc(&src0, count), &to_nhwc(&src1, count), &src2, count, size, &mut trans, true,
        );
        prop_assert_eq!(to_nchw(&trans, count), plain);

        let mut plain = vec![0.0; 2 * count * size];
        let mut trans = vec![0.0; 2 * count * size];
        fused_layer_forward4(&src0, &src2, &[-0.5], &[0.25], count, size, &mut plain, false);
        fused_layer_forward4(
            &to_nhwc(&src0, count), &src2, &[-0.5], &[0.25], count, size, &mut trans, true,
        );
        // A single channel never takes the count-inner path, so the output
        // stays channel-major even when the input is flagged as transposed.
        let trans = if count_inner_traversal(count, size, true) {
            to_nchw(&trans, 2 * count)
        } else {
            trans
        };
        prop_assert_eq!(trans, plain);
    }

    /// Omitting the copy output changes nothing about the first output.
    #[test]
    fn prop_concat_optional_copy(
        count0 in 0usize..6,
        count1 in 0usize..6,
        size in 1usize..6,
        transposed in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let count = count0 + count1;
        let src0 = random_vec(&mut rng, count0 * size);
        let src1 = random_vec(&mut rng, count1 * size);
        let scale = random_vec(&mut rng, count);
        let bias = random_vec(&mut rng, count);

        let mut with_copy = vec![0.0; count * size];
        let mut copy = vec![f32::NAN; count * size];
        let mut without_copy = vec![0.0; count * size];
        fused_layer_forward9(
            &src0, &src1, &scale, &bias, count0, count1, size,
            &mut with_copy, Some(&mut copy), transposed,
        );
        fused_layer_forward9(
            &src0, &src1, &scale, &bias, count0, count1, size,
            &mut without_copy, None, transposed,
        );
        prop_assert_eq!(&with_copy, &without_copy);

        // The copy is the channel concatenation of the inputs.
        let spatial_major = transposed || size == 1;
        for c in 0..count {
            for s in 0..size {
                let expected = if c < count0 {
                    if spatial_major { src0[s * count0 + c] } else { src0[c * size + s] }
                } else {
                    let c1 = c - count0;
                    if spatial_major { src1[s * count1 + c1] } else { src1[c1 * size + s] }
                };
                let at = if spatial_major { s * count + c } else { c * size + s };
                prop_assert_eq!(copy[at].to_bits(), expected.to_bits());
            }
        }
    }
}
