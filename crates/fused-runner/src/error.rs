// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the verification runner.

use crate::FusedKind;
use synet_fused::{FusedError, TensorFormat};

/// Errors that can occur while configuring or running verification cases.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A kernel kind name could not be parsed.
    #[error("unknown kernel '{0}'; expected forward0-forward4, forward8 or forward9")]
    UnknownKind(String),

    /// The kernel has no traversal for the requested format.
    #[error("{kind} cannot run in format {format}")]
    UnsupportedCase {
        kind: FusedKind,
        format: TensorFormat,
    },

    /// A format check or reorder failed.
    #[error("kernel error: {0}")]
    Kernel(#[from] FusedError),
}
