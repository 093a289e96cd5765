// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fused layer 3: channel bias followed by a parametric rectifier.

use super::layout::{self, ChannelKernel};
use super::require_len;
use crate::{activation, TensorFormat};

struct Forward3<'a> {
    bias: &'a [f32],
    scale: &'a [f32],
}

impl ChannelKernel for Forward3<'_> {
    type Params = (f32, f32);
    const NAME: &'static str = "fused_layer_forward3";

    #[inline(always)]
    fn params(&self, channel: usize) -> (f32, f32) {
        (self.bias[channel], self.scale[channel])
    }

    #[inline(always)]
    fn apply((bias, scale): (f32, f32), x: f32) -> f32 {
        activation::fused3(x + bias, scale)
    }
}

/// Computes `dst = fused3(src + bias[c], scale[c])` for every element.
///
/// `scale` is the per-channel slope of the negative part.
///
/// # Panics
/// Panics on an unsupported `format`, on a blocked format whose width does
/// not divide `channels`, and on undersized buffers.
#[track_caller]
pub fn fused_layer_forward3(
    src: &[f32],
    bias: &[f32],
    scale: &[f32],
    channels: usize,
    spatial: usize,
    dst: &mut [f32],
    format: TensorFormat,
) {
    require_len(Forward3::NAME, "bias", bias.len(), channels);
    require_len(Forward3::NAME, "scale", scale.len(), channels);
    layout::forward(&Forward3 { bias, scale }, src, channels, spatial, dst, format);
}
