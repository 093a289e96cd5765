// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fused layer 9: concatenation of two channel groups, scaled, biased and
//! rectified, with an optional copy of the concatenated input.

use super::{extent, require_len};
use crate::activation;

const NAME: &str = "fused_layer_forward9";

/// Concatenates `src0` (`count0` channels) and `src1` (`count1` channels)
/// along the channel axis and computes `dst0 = max(0, x * scale[c] + bias[c])`
/// over the result.
///
/// `scale` and `bias` hold `count0 + count1` values: group 0's parameters
/// followed by group 1's. When `dst1` is given it receives the concatenated
/// input unchanged; when it is `None` only `dst0` is written.
///
/// With `transposed || size == 1` the tensors are spatial-major and every
/// position holds all of group 0's channels followed by all of group 1's.
/// Otherwise they are channel-major and group 1's channel rows follow group
/// 0's.
///
/// # Panics
/// Panics on undersized buffers.
#[track_caller]
#[allow(clippy::too_many_arguments)]
pub fn fused_layer_forward9(
    src0: &[f32],
    src1: &[f32],
    scale: &[f32],
    bias: &[f32],
    count0: usize,
    count1: usize,
    size: usize,
    dst0: &mut [f32],
    dst1: Option<&mut [f32]>,
    transposed: bool,
) {
    let count = match count0.checked_add(count1) {
        Some(count) => count,
        None => panic!("{NAME}: extent overflow ({count0} + {count1})"),
    };
    let len = extent(NAME, count, size);
    require_len(NAME, "src0", src0.len(), extent(NAME, count0, size));
    require_len(NAME, "src1", src1.len(), extent(NAME, count1, size));
    require_len(NAME, "scale", scale.len(), count);
    require_len(NAME, "bias", bias.len(), count);
    require_len(NAME, "dst0", dst0.len(), len);

    let groups = Groups {
        src0,
        src1,
        scale,
        bias,
        count0,
        count1,
        size,
    };
    let spatial_major = transposed || size == 1;
    tracing::trace!(
        op = NAME,
        count0,
        count1,
        size,
        spatial_major,
        copy = dst1.is_some(),
        "concat path"
    );
    match dst1 {
        Some(dst1) => {
            require_len(NAME, "dst1", dst1.len(), len);
            if spatial_major {
                groups.forward_nhwc::<true>(dst0, dst1);
            } else {
                groups.forward_nchw::<true>(dst0, dst1);
            }
        }
        None if spatial_major => groups.forward_nhwc::<false>(dst0, &mut []),
        None => groups.forward_nchw::<false>(dst0, &mut []),
    }
}

/// The two inputs and their shared parameter vectors.
struct Groups<'a> {
    src0: &'a [f32],
    src1: &'a [f32],
    scale: &'a [f32],
    bias: &'a [f32],
    count0: usize,
    count1: usize,
    size: usize,
}

impl Groups<'_> {
    fn forward_nhwc<const COPY: bool>(&self, dst0: &mut [f32], dst1: &mut [f32]) {
        let (count0, count1) = (self.count0, self.count1);
        let count = count0 + count1;
        let (scale1, bias1) = (&self.scale[count0..], &self.bias[count0..]);
        for j in 0..self.size {
            let row = j * count;
            let src0 = &self.src0[j * count0..(j + 1) * count0];
            for i in 0..count0 {
                dst0[row + i] = activation::fused9(src0[i], self.scale[i], self.bias[i]);
                if COPY {
                    dst1[row + i] = src0[i];
                }
            }
            let row = row + count0;
            let src1 = &self.src1[j * count1..(j + 1) * count1];
            for i in 0..count1 {
                dst0[row + i] = activation::fused9(src1[i], scale1[i], bias1[i]);
                if COPY {
                    dst1[row + i] = src1[i];
                }
            }
        }
    }

    fn forward_nchw<const COPY: bool>(&self, dst0: &mut [f32], dst1: &mut [f32]) {
        let size = self.size;
        let (scale1, bias1) = (&self.scale[self.count0..], &self.bias[self.count0..]);
        for i in 0..self.count0 {
            let (s, b) = (self.scale[i], self.bias[i]);
            let offset = i * size;
            for j in offset..offset + size {
                dst0[j] = activation::fused9(self.src0[j], s, b);
                if COPY {
                    dst1[j] = self.src0[j];
                }
            }
        }
        let base = self.count0 * size;
        for i in 0..self.count1 {
            let (s, b) = (scale1[i], bias1[i]);
            let offset = i * size;
            for j in offset..offset + size {
                dst0[base + j] = activation::fused9(self.src1[j], s, b);
                if COPY {
                    dst1[base + j] = self.src1[j];
                }
            }
        }
    }
}
