// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fused layer 0: channel bias followed by a signed-magnitude blend.

use super::layout::{self, ChannelKernel};
use super::require_len;
use crate::{activation, TensorFormat};

struct Forward0<'a> {
    bias: &'a [f32],
    scale: &'a [f32],
}

impl ChannelKernel for Forward0<'_> {
    type Params = (f32, f32);
    const NAME: &'static str = "fused_layer_forward0";

    #[inline(always)]
    fn params(&self, channel: usize) -> (f32, f32) {
        (self.bias[channel], self.scale[channel])
    }

    #[inline(always)]
    fn apply((bias, scale): (f32, f32), x: f32) -> f32 {
        activation::fused0(x + bias, scale)
    }
}

/// Computes `dst = fused0(src + bias[c], scale[c])` for every element.
///
/// # Arguments
/// * `src`      — input tensor of `channels * spatial` values in `format`.
/// * `bias`     — per-channel bias, `channels` values.
/// * `scale`    — per-channel scale of the negative part, `channels` values.
/// * `dst`      — output tensor, same extent and format as `src`.
///
/// # Panics
/// Panics on an unsupported `format`, on a blocked format whose width does
/// not divide `channels`, and on undersized buffers.
#[track_caller]
pub fn fused_layer_forward0(
    src: &[f32],
    bias: &[f32],
    scale: &[f32],
    channels: usize,
    spatial: usize,
    dst: &mut [f32],
    format: TensorFormat,
) {
    require_len(Forward0::NAME, "bias", bias.len(), channels);
    require_len(Forward0::NAME, "scale", scale.len(), channels);
    layout::forward(&Forward0 { bias, scale }, src, channels, spatial, dst, format);
}
