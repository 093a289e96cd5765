// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Scalar fused-layer formulas.
//!
//! Each layout iterator reduces to exactly one call of the matching function
//! per element, so these are the definition of every kernel's output. The
//! operations are written out in evaluation order and must not be
//! rearranged: accelerated variants are compared against them bit for bit.
//!
//! The rectifiers use [`max`] and [`min`] below rather than `f32::max`: a tie
//! or a NaN yields the second operand, as a vector `max_ps(zero, x)` does, so
//! `-0.0` keeps its sign and NaN propagates.

/// `a > b ? a : b`.
#[inline(always)]
fn max(a: f32, b: f32) -> f32 {
    if a > b {
        a
    } else {
        b
    }
}

/// `a < b ? a : b`.
#[inline(always)]
fn min(a: f32, b: f32) -> f32 {
    if a < b {
        a
    } else {
        b
    }
}

/// Bias, then a signed-magnitude blend: `(x - |x|) * s + max(0, x)`.
///
/// `x` is the source value with the channel bias already added.
#[inline(always)]
pub fn fused0(x: f32, s: f32) -> f32 {
    (x - x.abs()) * s + max(0.0, x)
}

/// Negative half scaled and shifted, positive half passed through:
/// `max(0, -x) * s + b + max(0, x)`.
///
/// `x` is the source value with `bias0` already added.
#[inline(always)]
pub fn fused1(x: f32, s: f32, b: f32) -> f32 {
    max(0.0, -x) * s + b + max(0.0, x)
}

/// Affine transform followed by a leaky rectifier with a global slope.
#[inline(always)]
pub fn fused2(src: f32, scale: f32, bias: f32, slope: f32) -> f32 {
    let x = src * scale + bias;
    max(0.0, x) + min(0.0, x) * slope
}

/// Parametric rectifier: `max(0, x) + min(x, 0) * s`.
///
/// `x` is the source value with the channel bias already added.
#[inline(always)]
pub fn fused3(x: f32, s: f32) -> f32 {
    max(0.0, x) + min(x, 0.0) * s
}

/// Two-output rectifier pair.
///
/// Returns `(max(0, x), max(0, x * scale1 + bias1))` with `x = src + bias0`.
#[inline(always)]
pub fn fused4(src: f32, bias0: f32, scale1: f32, bias1: f32) -> (f32, f32) {
    let x = src + bias0;
    (max(0.0, x), max(0.0, x * scale1 + bias1))
}

/// Multiply-accumulate of three sources: `a + b * c`.
#[inline(always)]
pub fn fused8(a: f32, b: f32, c: f32) -> f32 {
    a + b * c
}

/// Scale, bias and rectify: `max(0, src * scale + bias)`.
#[inline(always)]
pub fn fused9(src: f32, scale: f32, bias: f32) -> f32 {
    max(0.0, src * scale + bias)
}
