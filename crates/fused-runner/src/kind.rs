// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The fused-layer kernels the runner knows how to drive.

/// Identifies one of the `synet_fused::fused_layer_forward*` kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusedKind {
    /// Bias and signed-magnitude blend.
    Forward0,
    /// Bias, scaled and shifted negative half.
    Forward1,
    /// Affine transform and leaky rectifier with a global slope.
    Forward2,
    /// Bias and parametric rectifier.
    Forward3,
    /// Two rectified outputs side by side.
    Forward4,
    /// `src0 + src1 * src2` with a per-channel `src2`.
    Forward8,
    /// Two concatenated channel groups, scaled, biased and rectified.
    Forward9,
}

impl FusedKind {
    /// Every kernel, in numeric order.
    pub const ALL: [FusedKind; 7] = [
        FusedKind::Forward0,
        FusedKind::Forward1,
        FusedKind::Forward2,
        FusedKind::Forward3,
        FusedKind::Forward4,
        FusedKind::Forward8,
        FusedKind::Forward9,
    ];

    /// Returns `true` for kernels dispatched on a tensor format tag; the
    /// others take a transpose flag.
    pub fn layout_tagged(self) -> bool {
        matches!(
            self,
            Self::Forward0 | Self::Forward1 | Self::Forward2 | Self::Forward3
        )
    }

    /// Number of output channels produced from `channels` input channels.
    pub fn output_channels(self, channels: usize) -> usize {
        match self {
            Self::Forward4 => 2 * channels,
            _ => channels,
        }
    }

    /// Parses a kernel name.
    ///
    /// Accepts `"forward0"`, `"fused_layer_forward0"`, `"f0"` and `"0"`
    /// spellings.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let digit = s
            .strip_prefix("fused_layer_forward")
            .or_else(|| s.strip_prefix("forward"))
            .or_else(|| s.strip_prefix('f'))
            .unwrap_or(&s);
        match digit {
            "0" => Some(Self::Forward0),
            "1" => Some(Self::Forward1),
            "2" => Some(Self::Forward2),
            "3" => Some(Self::Forward3),
            "4" => Some(Self::Forward4),
            "8" => Some(Self::Forward8),
            "9" => Some(Self::Forward9),
            _ => None,
        }
    }

    /// Returns the canonical name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forward0 => "forward0",
            Self::Forward1 => "forward1",
            Self::Forward2 => "forward2",
            Self::Forward3 => "forward3",
            Self::Forward4 => "forward4",
            Self::Forward8 => "forward8",
            Self::Forward9 => "forward9",
        }
    }
}

impl std::fmt::Display for FusedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}
