// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Seeded random inputs for one kernel.

use crate::FusedKind;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Inputs of one kernel invocation, stored channel-major.
///
/// The meaning of each buffer depends on [`Workload::kind`]:
///
/// | Kind     | `src0`             | `src1`             | `param0` | `param1` | `param2` |
/// |----------|--------------------|--------------------|----------|----------|----------|
/// | forward0 | `channels*spatial` | —                  | bias     | scale    | —        |
/// | forward1 | `channels*spatial` | —                  | bias0    | scale1   | bias1    |
/// | forward2 | `channels*spatial` | —                  | scale    | bias     | —        |
/// | forward3 | `channels*spatial` | —                  | bias     | scale    | —        |
/// | forward4 | `channels*spatial` | —                  | bias0    | scale1[1]| bias1[1] |
/// | forward8 | `channels*spatial` | `channels*spatial` | src2     | —        | —        |
/// | forward9 | `count0*spatial`   | `count1*spatial`   | scale    | bias     | —        |
///
/// `slope` is only read by forward2.
#[derive(Debug, Clone)]
pub struct Workload {
    pub kind: FusedKind,
    pub channels: usize,
    pub spatial: usize,
    pub src0: Vec<f32>,
    pub src1: Vec<f32>,
    pub param0: Vec<f32>,
    pub param1: Vec<f32>,
    pub param2: Vec<f32>,
    pub slope: f32,
}

impl Workload {
    /// Draws values uniformly from `[-1, 1]` with a seeded generator.
    pub fn generate(kind: FusedKind, channels: usize, spatial: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut draw = |n: usize| -> Vec<f32> {
            (0..n).map(|_| rng.gen_range(-1.0..=1.0)).collect()
        };

        let len = channels * spatial;
        let (src0, src1, param0, param1, param2) = match kind {
            FusedKind::Forward0 | FusedKind::Forward2 | FusedKind::Forward3 => {
                (draw(len), Vec::new(), draw(channels), draw(channels), Vec::new())
            }
            FusedKind::Forward1 => (
                draw(len),
                Vec::new(),
                draw(channels),
                draw(channels),
                draw(channels),
            ),
            FusedKind::Forward4 => (draw(len), Vec::new(), draw(channels), draw(1), draw(1)),
            FusedKind::Forward8 => (draw(len), draw(len), draw(channels), Vec::new(), Vec::new()),
            FusedKind::Forward9 => {
                let (count0, count1) = split_groups(channels);
                (
                    draw(count0 * spatial),
                    draw(count1 * spatial),
                    draw(channels),
                    draw(channels),
                    Vec::new(),
                )
            }
        };
        let slope = draw(1)[0];

        tracing::debug!(%kind, channels, spatial, seed, "workload generated");
        Self {
            kind,
            channels,
            spatial,
            src0,
            src1,
            param0,
            param1,
            param2,
            slope,
        }
    }

    /// Channel counts of the two forward9 groups.
    pub fn groups(&self) -> (usize, usize) {
        split_groups(self.channels)
    }

    /// Number of output values.
    pub fn output_len(&self) -> usize {
        self.kind.output_channels(self.channels) * self.spatial
    }
}

/// Splits `channels` into two groups, the first one never smaller.
fn split_groups(channels: usize) -> (usize, usize) {
    (channels.div_ceil(2), channels / 2)
}
