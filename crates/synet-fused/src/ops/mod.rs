// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fused-layer forward kernels.
//!
//! Each kernel writes a caller-supplied output slice in place. Variants 0-3
//! are dispatched on a [`crate::TensorFormat`] through [`layout`]; variants
//! 4, 8 and 9 take raw `(count, size)` extents and a transpose flag.

mod forward0_op;
mod forward1_op;
mod forward2_op;
mod forward3_op;
mod forward4_op;
mod forward8_op;
mod forward9_op;
mod layout;

pub use forward0_op::fused_layer_forward0;
pub use forward1_op::fused_layer_forward1;
pub use forward2_op::fused_layer_forward2;
pub use forward3_op::fused_layer_forward3;
pub use forward4_op::fused_layer_forward4;
pub use forward8_op::fused_layer_forward8;
pub use forward9_op::fused_layer_forward9;

/// Returns `true` when the multi-input layers walk the `count` dimension in
/// their inner loop.
///
/// That is the case for transposed (spatial-major) tensors and for a single
/// spatial position, unless `count` is 1: a one-wide inner loop would lose
/// all unrolling, so the `size` dimension is walked instead.
#[inline]
pub fn count_inner_traversal(count: usize, size: usize, transposed: bool) -> bool {
    (transposed || size == 1) && count != 1
}

/// Rounds `size` down to a multiple of `align` (a power of two).
#[inline(always)]
pub(crate) fn align_lo(size: usize, align: usize) -> usize {
    size & !(align - 1)
}

/// Calls `body(i)` for every `i` in `0..len`, four at a time, then the
/// remainder one at a time.
///
/// The grouping only affects scheduling; every index is visited exactly once
/// in ascending order.
#[inline(always)]
pub(crate) fn unroll4(len: usize, mut body: impl FnMut(usize)) {
    let aligned = align_lo(len, 4);
    let mut i = 0;
    while i < aligned {
        body(i);
        body(i + 1);
        body(i + 2);
        body(i + 3);
        i += 4;
    }
    while i < len {
        body(i);
        i += 1;
    }
}

/// Returns `a * b`, the element count of an `a x b` tensor.
///
/// # Panics
/// Panics if the product overflows `usize`.
#[inline]
#[track_caller]
pub(crate) fn extent(op: &str, a: usize, b: usize) -> usize {
    match a.checked_mul(b) {
        Some(len) => len,
        None => panic!("{op}: extent overflow ({a} x {b})"),
    }
}

/// Panics unless `buffer` holds at least `needed` values.
#[inline]
#[track_caller]
pub(crate) fn require_len(op: &str, buffer: &str, actual: usize, needed: usize) {
    assert!(
        actual >= needed,
        "{op}: buffer `{buffer}` holds {actual} values, {needed} required"
    );
}
