// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Moving `(channels, spatial)` tensors between memory formats.
//!
//! Used to prepare inputs for a kernel in a given format and to bring its
//! output back to channel-major order for comparison.

use crate::{FusedError, TensorFormat};

/// Returns the flat offset of element `(channel, position)` in `format`.
///
/// Returns `None` for [`TensorFormat::Unknown`]. The result is only
/// meaningful for `channel < channels` and `position < spatial`.
///
/// # Examples
/// ```
/// use synet_fused::{element_offset, TensorFormat};
/// assert_eq!(element_offset(TensorFormat::Nchw, 8, 3, 5, 2), Some(17));
/// assert_eq!(element_offset(TensorFormat::Nhwc, 8, 3, 5, 2), Some(21));
/// assert_eq!(element_offset(TensorFormat::Nchw4c, 8, 3, 5, 2), Some(21));
/// ```
pub fn element_offset(
    format: TensorFormat,
    channels: usize,
    spatial: usize,
    channel: usize,
    position: usize,
) -> Option<usize> {
    match format {
        TensorFormat::Nchw => Some(channel * spatial + position),
        TensorFormat::Nhwc => Some(position * channels + channel),
        TensorFormat::Nchw4c | TensorFormat::Nchw8c | TensorFormat::Nchw16c => {
            let n = format.block_width()?;
            Some((channel / n) * spatial * n + position * n + channel % n)
        }
        TensorFormat::Unknown => None,
    }
}

/// Copies `src`, stored in `from`, into `dst`, stored in `to`.
///
/// # Errors
/// Returns [`FusedError::UnsupportedFormat`] if either format is
/// [`TensorFormat::Unknown`], [`FusedError::ChannelsNotAligned`] if a blocked
/// format cannot tile `channels`, and [`FusedError::BufferSizeMismatch`] if
/// either buffer does not hold exactly `channels * spatial` values.
pub fn reorder(
    src: &[f32],
    channels: usize,
    spatial: usize,
    from: TensorFormat,
    to: TensorFormat,
    dst: &mut [f32],
) -> Result<(), FusedError> {
    for format in [from, to] {
        format.check_channels(channels).map_err(|e| match e {
            FusedError::UnsupportedFormat { format, .. } => FusedError::UnsupportedFormat {
                op: "reorder",
                format,
            },
            other => other,
        })?;
    }

    let expected = channels * spatial;
    if src.len() != expected {
        return Err(FusedError::BufferSizeMismatch {
            op: "reorder",
            buffer: "src",
            expected,
            actual: src.len(),
        });
    }
    if dst.len() != expected {
        return Err(FusedError::BufferSizeMismatch {
            op: "reorder",
            buffer: "dst",
            expected,
            actual: dst.len(),
        });
    }

    if from == to {
        dst.copy_from_slice(src);
        return Ok(());
    }

    let unsupported = |format| FusedError::UnsupportedFormat {
        op: "reorder",
        format,
    };
    for c in 0..channels {
        for s in 0..spatial {
            let i = element_offset(from, channels, spatial, c, s).ok_or_else(|| unsupported(from))?;
            let o = element_offset(to, channels, spatial, c, s).ok_or_else(|| unsupported(to))?;
            dst[o] = src[i];
        }
    }
    Ok(())
}

/// Allocating form of [`reorder`].
///
/// # Errors
/// Same as [`reorder`].
pub fn reordered(
    src: &[f32],
    channels: usize,
    spatial: usize,
    from: TensorFormat,
    to: TensorFormat,
) -> Result<Vec<f32>, FusedError> {
    let mut dst = vec![0.0; channels * spatial];
    reorder(src, channels, spatial, from, to, &mut dst)?;
    Ok(dst)
}
