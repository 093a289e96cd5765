// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # synet-fused
//!
//! Reference fused-layer forward kernels for convolutional network inference.
//!
//! This crate provides:
//! - [`activation`] — the scalar formulas every kernel reduces to.
//! - [`TensorFormat`] — the memory layout tag (channel-major, spatial-major,
//!   blocked 4/8/16) and its compatibility rules.
//! - Layout-dispatched kernels [`fused_layer_forward0`] through
//!   [`fused_layer_forward3`], which pick a channel-major, spatial-major or
//!   blocked iterator from the format tag.
//! - Multi-input kernels [`fused_layer_forward4`], [`fused_layer_forward8`]
//!   and [`fused_layer_forward9`], which branch on a transpose flag and on
//!   degenerate (size 1) dimensions instead of a format tag.
//! - [`reorder`] helpers that move a tensor between formats.
//!
//! # Design Goals
//! - Kernels operate on caller-owned flat `f32` slices; shape travels as
//!   explicit `channels`/`spatial` (or `count`/`size`) extents.
//! - Every layout produces bit-identical results for the same logical tensor.
//! - Unsupported formats and malformed extents are programming errors and
//!   panic. Recoverable validation lives in [`TensorFormat::check_channels`]
//!   and the [`reorder`] module, which return [`FusedError`].

pub mod activation;
mod error;
mod format;
mod ops;
pub mod reorder;

pub use error::FusedError;
pub use format::TensorFormat;
pub use ops::{
    count_inner_traversal,
    fused_layer_forward0, fused_layer_forward1, fused_layer_forward2, fused_layer_forward3,
    fused_layer_forward4, fused_layer_forward8, fused_layer_forward9,
};
pub use reorder::{element_offset, reorder, reordered};
