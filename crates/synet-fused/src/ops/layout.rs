// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Layout iterators and the format dispatcher shared by the single-input
//! fused layers.
//!
//! A fused layer describes itself as a [`ChannelKernel`]: how to load the
//! parameters of one channel, and how to map one source value given those
//! parameters. The iterators below own the traversal order:
//!
//! | Format    | Outer loop     | Inner loop          | Params loaded      |
//! |-----------|----------------|---------------------|--------------------|
//! | NCHW      | channels       | spatial, unrolled 4 | once per channel   |
//! | NHWC      | spatial        | channels, unrolled 4| every element      |
//! | NCHWxc    | tiles, spatial | N tile lanes        | once per tile      |

use super::{extent, require_len, unroll4};
use crate::TensorFormat;

/// Per-channel parameter access and element transform of a fused layer.
pub(crate) trait ChannelKernel {
    /// Parameters shared by every element of one channel.
    type Params: Copy;

    /// Operation name used in diagnostics.
    const NAME: &'static str;

    /// Loads the parameters of logical channel `channel`.
    fn params(&self, channel: usize) -> Self::Params;

    /// Maps one source value.
    fn apply(params: Self::Params, x: f32) -> f32;
}

/// Iteration order chosen for a format and extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Traversal {
    ChannelMajor,
    SpatialMajor,
    Blocked4,
    Blocked8,
    Blocked16,
}

/// Picks the traversal for `format`, or `None` when no iterator handles it.
///
/// Channel-major compatibility is checked first, then spatial-major, then the
/// blocked formats.
pub(crate) fn traversal(
    format: TensorFormat,
    channels: usize,
    spatial: usize,
) -> Option<Traversal> {
    if format.nchw_compatible(channels, spatial) {
        return Some(Traversal::ChannelMajor);
    }
    if format.nhwc_compatible(channels, spatial) {
        return Some(Traversal::SpatialMajor);
    }
    match format {
        TensorFormat::Nchw4c => Some(Traversal::Blocked4),
        TensorFormat::Nchw8c => Some(Traversal::Blocked8),
        TensorFormat::Nchw16c => Some(Traversal::Blocked16),
        TensorFormat::Nchw | TensorFormat::Nhwc | TensorFormat::Unknown => None,
    }
}

/// Routes to the iterator matching `format`.
///
/// # Panics
/// Panics if `src` or `dst` hold fewer than `channels * spatial` values, if
/// `format` is not one of the supported formats, or if a blocked format's
/// width does not divide `channels`.
#[track_caller]
pub(crate) fn forward<K: ChannelKernel>(
    kernel: &K,
    src: &[f32],
    channels: usize,
    spatial: usize,
    dst: &mut [f32],
    format: TensorFormat,
) {
    let len = extent(K::NAME, channels, spatial);
    require_len(K::NAME, "src", src.len(), len);
    require_len(K::NAME, "dst", dst.len(), len);

    let Some(path) = traversal(format, channels, spatial) else {
        panic!("{}: unsupported tensor format {format}", K::NAME);
    };
    tracing::trace!(op = K::NAME, %format, channels, spatial, ?path, "dispatch");
    match path {
        Traversal::ChannelMajor => forward_nchw(kernel, src, channels, spatial, dst),
        Traversal::SpatialMajor => forward_nhwc(kernel, src, channels, spatial, dst),
        Traversal::Blocked4 => forward_nchw_xc::<K, 4>(kernel, src, channels, spatial, dst),
        Traversal::Blocked8 => forward_nchw_xc::<K, 8>(kernel, src, channels, spatial, dst),
        Traversal::Blocked16 => forward_nchw_xc::<K, 16>(kernel, src, channels, spatial, dst),
    }
}

/// Channel-major traversal: one contiguous row of `spatial` values per channel.
pub(crate) fn forward_nchw<K: ChannelKernel>(
    kernel: &K,
    src: &[f32],
    channels: usize,
    spatial: usize,
    dst: &mut [f32],
) {
    for c in 0..channels {
        let params = kernel.params(c);
        let offset = c * spatial;
        let src = &src[offset..offset + spatial];
        let dst = &mut dst[offset..offset + spatial];
        unroll4(spatial, |s| dst[s] = K::apply(params, src[s]));
    }
}

/// Spatial-major traversal: one contiguous row of `channels` values per position.
pub(crate) fn forward_nhwc<K: ChannelKernel>(
    kernel: &K,
    src: &[f32],
    channels: usize,
    spatial: usize,
    dst: &mut [f32],
) {
    for s in 0..spatial {
        let offset = s * channels;
        let src = &src[offset..offset + channels];
        let dst = &mut dst[offset..offset + channels];
        unroll4(channels, |c| dst[c] = K::apply(kernel.params(c), src[c]));
    }
}

/// Blocked traversal over tiles of `N` channels.
///
/// Tile parameters are loaded once per tile; the data offset advances by `N`
/// per spatial position. There is no remainder path.
///
/// # Panics
/// Panics if `channels` is not a multiple of `N`.
#[track_caller]
pub(crate) fn forward_nchw_xc<K: ChannelKernel, const N: usize>(
    kernel: &K,
    src: &[f32],
    channels: usize,
    spatial: usize,
    dst: &mut [f32],
) {
    assert!(
        channels % N == 0,
        "{}: {channels} channels cannot be tiled by {N}",
        K::NAME
    );
    let mut offset = 0;
    for tile in (0..channels).step_by(N) {
        let params: [K::Params; N] = std::array::from_fn(|i| kernel.params(tile + i));
        for _ in 0..spatial {
            let src = &src[offset..offset + N];
            let dst = &mut dst[offset..offset + N];
            for i in 0..N {
                dst[i] = K::apply(params[i], src[i]);
            }
            offset += N;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Adds the channel index, so every output reveals which parameters it saw.
    struct AddChannel;

    impl ChannelKernel for AddChannel {
        type Params = f32;
        const NAME: &'static str = "add_channel";

        fn params(&self, channel: usize) -> f32 {
            channel as f32 * 100.0
        }

        fn apply(params: f32, x: f32) -> f32 {
            x + params
        }
    }

    fn iota(n: usize) -> Vec<f32> {
        (0..n).map(|i| i as f32).collect()
    }

    #[test]
    fn test_nchw_rows_use_their_channel() {
        let src = iota(6);
        let mut dst = vec![0.0; 6];
        forward(&AddChannel, &src, 2, 3, &mut dst, TensorFormat::Nchw);
        assert_eq!(dst, vec![0.0, 1.0, 2.0, 103.0, 104.0, 105.0]);
    }

    #[test]
    fn test_nhwc_channels_vary_fastest() {
        let src = iota(6);
        let mut dst = vec![0.0; 6];
        forward(&AddChannel, &src, 3, 2, &mut dst, TensorFormat::Nhwc);
        assert_eq!(dst, vec![0.0, 101.0, 202.0, 3.0, 104.0, 205.0]);
    }

    #[test]
    fn test_nhwc_single_channel_takes_channel_major_path() {
        let src = iota(5);
        let mut a = vec![0.0; 5];
        let mut b = vec![0.0; 5];
        forward(&AddChannel, &src, 1, 5, &mut a, TensorFormat::Nhwc);
        forward_nchw(&AddChannel, &src, 1, 5, &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_blocked_tiles() {
        // 8 channels, 2 positions, tiles of 4: [tile][pos][lane].
        let src = vec![0.0; 16];
        let mut dst = vec![0.0; 16];
        forward(&AddChannel, &src, 8, 2, &mut dst, TensorFormat::Nchw4c);
        assert_eq!(
            dst,
            vec![
                0.0, 100.0, 200.0, 300.0, 0.0, 100.0, 200.0, 300.0, //
                400.0, 500.0, 600.0, 700.0, 400.0, 500.0, 600.0, 700.0,
            ]
        );
    }

    #[test]
    fn test_remainders() {
        for spatial in [1usize, 3, 4, 5, 7, 8, 9] {
            let channels = 3;
            let src = iota(channels * spatial);
            let mut dst = vec![0.0; channels * spatial];
            forward_nchw(&AddChannel, &src, channels, spatial, &mut dst);
            for (i, (&d, &s)) in dst.iter().zip(&src).enumerate() {
                assert_eq!(d, s + (i / spatial) as f32 * 100.0);
            }
        }
    }

    #[test]
    fn test_empty_extents() {
        let mut dst: Vec<f32> = Vec::new();
        for format in TensorFormat::SUPPORTED {
            forward(&AddChannel, &[], 0, 7, &mut dst, format);
            forward(&AddChannel, &[], 16, 0, &mut dst, format);
        }
    }

    #[test]
    fn test_traversal_selection() {
        use TensorFormat::*;
        assert_eq!(traversal(Nchw, 3, 5), Some(Traversal::ChannelMajor));
        assert_eq!(traversal(Nhwc, 1, 5), Some(Traversal::ChannelMajor));
        assert_eq!(traversal(Nhwc, 3, 5), Some(Traversal::SpatialMajor));
        assert_eq!(traversal(Nchw, 3, 1), Some(Traversal::ChannelMajor));
        assert_eq!(traversal(Nchw4c, 8, 1), Some(Traversal::Blocked4));
        assert_eq!(traversal(Nchw8c, 8, 3), Some(Traversal::Blocked8));
        assert_eq!(traversal(Nchw16c, 16, 3), Some(Traversal::Blocked16));
        assert_eq!(traversal(Unknown, 1, 1), None);
        assert_eq!(traversal(Unknown, 8, 4), None);
    }

    #[test]
    #[should_panic(expected = "unsupported tensor format unknown")]
    fn test_unknown_format_panics() {
        let mut dst = vec![0.0; 4];
        forward(&AddChannel, &[0.0; 4], 2, 2, &mut dst, TensorFormat::Unknown);
    }

    #[test]
    #[should_panic(expected = "cannot be tiled by 8")]
    fn test_misaligned_blocked_panics() {
        let mut dst = vec![0.0; 12];
        forward(&AddChannel, &[0.0; 12], 4, 3, &mut dst, TensorFormat::Nchw8c);
    }

    #[test]
    #[should_panic(expected = "add_channel: extent overflow")]
    fn test_overflowing_extent_panics() {
        let mut dst: Vec<f32> = Vec::new();
        forward(&AddChannel, &[], usize::MAX, 2, &mut dst, TensorFormat::Nchw);
    }

    #[test]
    #[should_panic(expected = "buffer `dst` holds 5 values, 6 required")]
    fn test_short_dst_panics() {
        let mut dst = vec![0.0; 5];
        forward(&AddChannel, &[0.0; 6], 2, 3, &mut dst, TensorFormat::Nchw);
    }
}
