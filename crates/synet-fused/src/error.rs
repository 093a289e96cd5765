// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the recoverable surfaces of the crate.
//!
//! Kernels themselves never return these: a kernel handed an unsupported
//! format or undersized buffer panics.

use crate::TensorFormat;

/// Errors reported by format parsing, pre-flight checks and reordering.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FusedError {
    /// The format tag cannot be handled by the requested operation.
    #[error("unsupported tensor format {format} for {op}")]
    UnsupportedFormat {
        op: &'static str,
        format: TensorFormat,
    },

    /// A blocked format was paired with a channel count that is not a
    /// multiple of its block width.
    #[error("{channels} channels cannot be tiled by {format} (block width {block})")]
    ChannelsNotAligned {
        format: TensorFormat,
        channels: usize,
        block: usize,
    },

    /// A buffer does not hold the number of elements the extents require.
    #[error("{op}: buffer `{buffer}` holds {actual} values, expected {expected}")]
    BufferSizeMismatch {
        op: &'static str,
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A format name could not be parsed.
    #[error("unknown tensor format '{0}'")]
    UnknownFormat(String),
}
