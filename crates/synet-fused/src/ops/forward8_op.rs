// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fused layer 8: `src0 + src1 * src2` with `src2` broadcast per channel.

use super::{count_inner_traversal, extent, require_len, unroll4};
use crate::activation;

const NAME: &str = "fused_layer_forward8";

/// Computes `dst = src0 + src1 * src2[i]`, where `i` is the element's
/// channel (`count` dimension).
///
/// `src0`, `src1` and `dst` hold `count * size` values; `src2` holds
/// `count`. The count-inner traversal is taken when `transposed || size == 1`
/// and `count != 1`.
///
/// # Panics
/// Panics on undersized buffers.
#[track_caller]
pub fn fused_layer_forward8(
    src0: &[f32],
    src1: &[f32],
    src2: &[f32],
    count: usize,
    size: usize,
    dst: &mut [f32],
    transposed: bool,
) {
    let len = extent(NAME, count, size);
    require_len(NAME, "src0", src0.len(), len);
    require_len(NAME, "src1", src1.len(), len);
    require_len(NAME, "src2", src2.len(), count);
    require_len(NAME, "dst", dst.len(), len);

    if count_inner_traversal(count, size, transposed) {
        tracing::trace!(op = NAME, count, size, transposed, "count-inner path");
        for j in 0..size {
            let offset = j * count;
            let src0 = &src0[offset..offset + count];
            let src1 = &src1[offset..offset + count];
            let dst = &mut dst[offset..offset + count];
            unroll4(count, |i| dst[i] = activation::fused8(src0[i], src1[i], src2[i]));
        }
    } else {
        tracing::trace!(op = NAME, count, size, transposed, "size-inner path");
        for i in 0..count {
            let s2 = src2[i];
            let offset = i * size;
            let src0 = &src0[offset..offset + size];
            let src1 = &src1[offset..offset + size];
            let dst = &mut dst[offset..offset + size];
            unroll4(size, |j| dst[j] = activation::fused8(src0[j], src1[j], s2));
        }
    }
}
