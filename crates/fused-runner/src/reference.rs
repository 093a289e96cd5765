// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! One-element-at-a-time reference semantics.
//!
//! Every kernel output, whatever its format or traversal, must equal this
//! after being moved back to channel-major order.

use crate::{FusedKind, Workload};
use synet_fused::activation;

/// Computes the channel-major output of `w.kind` with no unrolling and no
/// format handling.
pub fn compute(w: &Workload) -> Vec<f32> {
    let (channels, spatial) = (w.channels, w.spatial);
    let mut out = vec![0.0; w.output_len()];
    for c in 0..channels {
        for s in 0..spatial {
            let i = c * spatial + s;
            match w.kind {
                FusedKind::Forward0 => {
                    out[i] = activation::fused0(w.src0[i] + w.param0[c], w.param1[c]);
                }
                FusedKind::Forward1 => {
                    out[i] = activation::fused1(w.src0[i] + w.param0[c], w.param1[c], w.param2[c]);
                }
                FusedKind::Forward2 => {
                    out[i] = activation::fused2(w.src0[i], w.param0[c], w.param1[c], w.slope);
                }
                FusedKind::Forward3 => {
                    out[i] = activation::fused3(w.src0[i] + w.param0[c], w.param1[c]);
                }
                FusedKind::Forward4 => {
                    let (a, b) =
                        activation::fused4(w.src0[i], w.param0[c], w.param1[0], w.param2[0]);
                    out[i] = a;
                    out[(channels + c) * spatial + s] = b;
                }
                FusedKind::Forward8 => {
                    out[i] = activation::fused8(w.src0[i], w.src1[i], w.param0[c]);
                }
                FusedKind::Forward9 => {
                    out[i] = activation::fused9(concat_input(w, c, s), w.param0[c], w.param1[c]);
                }
            }
        }
    }
    out
}

/// Channel-major concatenation of the two forward9 inputs, which is also
/// what its copy output must hold.
pub fn concat(w: &Workload) -> Vec<f32> {
    let mut out = Vec::with_capacity(w.channels * w.spatial);
    for c in 0..w.channels {
        for s in 0..w.spatial {
            out.push(concat_input(w, c, s));
        }
    }
    out
}

fn concat_input(w: &Workload, c: usize, s: usize) -> f32 {
    let (count0, _) = w.groups();
    if c < count0 {
        w.src0[c * w.spatial + s]
    } else {
        w.src1[(c - count0) * w.spatial + s]
    }
}
