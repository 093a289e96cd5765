// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor memory layout tags.

use crate::FusedError;

/// Memory layout of a `(channels, spatial)` tensor.
///
/// The kernels use the tag to choose an iteration order; per-channel
/// parameter vectors are always indexed by logical channel, whatever the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TensorFormat {
    /// Channel-major: all spatial positions of a channel are contiguous.
    Nchw,
    /// Spatial-major: all channels of a spatial position are contiguous.
    Nhwc,
    /// Channels tiled by 4, lanes of a tile interleaved per position.
    Nchw4c,
    /// Channels tiled by 8.
    Nchw8c,
    /// Channels tiled by 16.
    Nchw16c,
    /// No layout was specified. Kernels reject it.
    Unknown,
}

impl TensorFormat {
    /// The formats the kernels can dispatch, in dispatch order.
    pub const SUPPORTED: [TensorFormat; 5] = [
        TensorFormat::Nchw,
        TensorFormat::Nhwc,
        TensorFormat::Nchw4c,
        TensorFormat::Nchw8c,
        TensorFormat::Nchw16c,
    ];

    /// Returns the tile width of a blocked format.
    pub fn block_width(self) -> Option<usize> {
        match self {
            Self::Nchw4c => Some(4),
            Self::Nchw8c => Some(8),
            Self::Nchw16c => Some(16),
            Self::Nchw | Self::Nhwc | Self::Unknown => None,
        }
    }

    /// Returns `true` for the blocked formats.
    pub fn is_blocked(self) -> bool {
        self.block_width().is_some()
    }

    /// Returns `true` if a tensor in this format can be walked channel by
    /// channel with contiguous spatial rows.
    ///
    /// A single-channel spatial-major tensor has the same memory order as a
    /// channel-major one.
    pub fn nchw_compatible(self, channels: usize, _spatial: usize) -> bool {
        self == Self::Nchw || (self == Self::Nhwc && channels == 1)
    }

    /// Returns `true` if a tensor in this format can be walked position by
    /// position with contiguous channel rows.
    ///
    /// A channel-major tensor with one spatial position has the same memory
    /// order as a spatial-major one.
    pub fn nhwc_compatible(self, _channels: usize, spatial: usize) -> bool {
        self == Self::Nhwc || (self == Self::Nchw && spatial == 1)
    }

    /// Checks that `channels` can be stored in this format.
    ///
    /// # Errors
    /// Returns [`FusedError::UnsupportedFormat`] for [`TensorFormat::Unknown`]
    /// and [`FusedError::ChannelsNotAligned`] when a blocked format's width
    /// does not divide `channels`.
    pub fn check_channels(self, channels: usize) -> Result<(), FusedError> {
        if self == Self::Unknown {
            return Err(FusedError::UnsupportedFormat {
                op: "check_channels",
                format: self,
            });
        }
        match self.block_width() {
            Some(block) if channels % block != 0 => Err(FusedError::ChannelsNotAligned {
                format: self,
                channels,
                block,
            }),
            _ => Ok(()),
        }
    }

    /// Parses a format name.
    ///
    /// Accepts the canonical names (`"nchw"`, `"nhwc"`, `"nchw4c"`, ...) and
    /// the aliases `"channel-major"`, `"spatial-major"` and `"blocked4"`,
    /// `"blocked8"`, `"blocked16"`.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "nchw" | "channel-major" | "planar" => Some(Self::Nchw),
            "nhwc" | "spatial-major" | "interleaved" => Some(Self::Nhwc),
            "nchw4c" | "blocked4" | "blocked-4" => Some(Self::Nchw4c),
            "nchw8c" | "blocked8" | "blocked-8" => Some(Self::Nchw8c),
            "nchw16c" | "blocked16" | "blocked-16" => Some(Self::Nchw16c),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Returns the canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nchw => "nchw",
            Self::Nhwc => "nhwc",
            Self::Nchw4c => "nchw4c",
            Self::Nchw8c => "nchw8c",
            Self::Nchw16c => "nchw16c",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for TensorFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for TensorFormat {
    type Err = FusedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_loose(s).ok_or_else(|| FusedError::UnknownFormat(s.to_string()))
    }
}
