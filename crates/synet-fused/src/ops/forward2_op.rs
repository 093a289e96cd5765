// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fused layer 2: affine transform and a leaky rectifier with a global slope.

use super::layout::{self, ChannelKernel};
use super::require_len;
use crate::{activation, TensorFormat};

struct Forward2<'a> {
    scale: &'a [f32],
    bias: &'a [f32],
    slope: f32,
}

impl ChannelKernel for Forward2<'_> {
    type Params = (f32, f32, f32);
    const NAME: &'static str = "fused_layer_forward2";

    #[inline(always)]
    fn params(&self, channel: usize) -> (f32, f32, f32) {
        (self.scale[channel], self.bias[channel], self.slope)
    }

    #[inline(always)]
    fn apply((scale, bias, slope): (f32, f32, f32), x: f32) -> f32 {
        activation::fused2(x, scale, bias, slope)
    }
}

/// Computes `dst = fused2(src, scale[c], bias[c], slope[0])` for every element.
///
/// `slope` is a single value shared by all channels; only `slope[0]` is read,
/// once per call.
///
/// # Panics
/// Panics on an unsupported `format`, on a blocked format whose width does
/// not divide `channels`, on an empty `slope` and on undersized buffers.
#[track_caller]
#[allow(clippy::too_many_arguments)]
pub fn fused_layer_forward2(
    src: &[f32],
    scale: &[f32],
    bias: &[f32],
    channels: usize,
    spatial: usize,
    slope: &[f32],
    dst: &mut [f32],
    format: TensorFormat,
) {
    require_len(Forward2::NAME, "scale", scale.len(), channels);
    require_len(Forward2::NAME, "bias", bias.len(), channels);
    require_len(Forward2::NAME, "slope", slope.len(), 1);
    let kernel = Forward2 {
        scale,
        bias,
        slope: slope[0],
    };
    layout::forward(&kernel, src, channels, spatial, dst, format);
}
