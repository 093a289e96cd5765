// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fused layer 4: one input, two rectified outputs stored side by side.

use super::{count_inner_traversal, extent, require_len, unroll4};
use crate::activation;

const NAME: &str = "fused_layer_forward4";

/// Computes `(max(0, x), max(0, x * scale1[0] + bias1[0]))` with
/// `x = src + bias0[i]` and stores both halves in `dst`.
///
/// `src` holds `count * size` values and `dst` holds `2 * count * size`.
/// `scale1` and `bias1` are global: only their first value is read.
///
/// Output placement follows the traversal:
/// - spatial-major (`transposed || size == 1`, and `count != 1`): each
///   position `j` writes `count` first outputs then `count` second outputs,
///   i.e. a `(size, 2 * count)` row-major block;
/// - channel-major otherwise: all `count * size` first outputs, then all
///   second outputs, i.e. a `(2 * count, size)` block.
///
/// # Panics
/// Panics on undersized buffers.
#[track_caller]
#[allow(clippy::too_many_arguments)]
pub fn fused_layer_forward4(
    src: &[f32],
    bias0: &[f32],
    scale1: &[f32],
    bias1: &[f32],
    count: usize,
    size: usize,
    dst: &mut [f32],
    transposed: bool,
) {
    let len = extent(NAME, count, size);
    let out_len = extent(NAME, 2, len);
    require_len(NAME, "src", src.len(), len);
    require_len(NAME, "bias0", bias0.len(), count);
    require_len(NAME, "scale1", scale1.len(), 1);
    require_len(NAME, "bias1", bias1.len(), 1);
    require_len(NAME, "dst", dst.len(), out_len);

    let (s1, b1) = (scale1[0], bias1[0]);
    if count_inner_traversal(count, size, transposed) {
        tracing::trace!(op = NAME, count, size, transposed, "count-inner path");
        for j in 0..size {
            let src = &src[j * count..(j + 1) * count];
            let (dst0, dst1) = dst[j * 2 * count..(j + 1) * 2 * count].split_at_mut(count);
            unroll4(count, |i| {
                let (a, b) = activation::fused4(src[i], bias0[i], s1, b1);
                dst0[i] = a;
                dst1[i] = b;
            });
        }
    } else {
        tracing::trace!(op = NAME, count, size, transposed, "size-inner path");
        let (dst0, dst1) = dst[..out_len].split_at_mut(len);
        for i in 0..count {
            let b0 = bias0[i];
            let offset = i * size;
            let src = &src[offset..offset + size];
            let dst0 = &mut dst0[offset..offset + size];
            let dst1 = &mut dst1[offset..offset + size];
            unroll4(size, |j| {
                let (a, b) = activation::fused4(src[j], b0, s1, b1);
                dst0[j] = a;
                dst1[j] = b;
            });
        }
    }
}
