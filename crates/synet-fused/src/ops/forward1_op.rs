// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fused layer 1: bias, then a scaled and shifted negative half.

use super::layout::{self, ChannelKernel};
use super::require_len;
use crate::{activation, TensorFormat};

struct Forward1<'a> {
    bias0: &'a [f32],
    scale1: &'a [f32],
    bias1: &'a [f32],
}

impl ChannelKernel for Forward1<'_> {
    type Params = (f32, f32, f32);
    const NAME: &'static str = "fused_layer_forward1";

    #[inline(always)]
    fn params(&self, channel: usize) -> (f32, f32, f32) {
        (self.bias0[channel], self.scale1[channel], self.bias1[channel])
    }

    #[inline(always)]
    fn apply((bias0, scale1, bias1): (f32, f32, f32), x: f32) -> f32 {
        activation::fused1(x + bias0, scale1, bias1)
    }
}

/// Computes `dst = fused1(src + bias0[c], scale1[c], bias1[c])` for every element.
///
/// All three parameter vectors hold `channels` values.
///
/// # Panics
/// Panics on an unsupported `format`, on a blocked format whose width does
/// not divide `channels`, and on undersized buffers.
#[track_caller]
#[allow(clippy::too_many_arguments)]
pub fn fused_layer_forward1(
    src: &[f32],
    bias0: &[f32],
    scale1: &[f32],
    bias1: &[f32],
    channels: usize,
    spatial: usize,
    dst: &mut [f32],
    format: TensorFormat,
) {
    require_len(Forward1::NAME, "bias0", bias0.len(), channels);
    require_len(Forward1::NAME, "scale1", scale1.len(), channels);
    require_len(Forward1::NAME, "bias1", bias1.len(), channels);
    let kernel = Forward1 {
        bias0,
        scale1,
        bias1,
    };
    layout::forward(&kernel, src, channels, spatial, dst, format);
}
