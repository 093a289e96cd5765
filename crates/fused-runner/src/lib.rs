// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # fused-runner
//!
//! Verification and timing harness for the `synet-fused` kernels.
//!
//! The runner takes:
//! - A [`RunnerConfig`] (TOML or programmatic) naming the tensor extents,
//!   the formats and the kernels to exercise.
//! - A seeded [`Workload`] of random inputs in channel-major order.
//!
//! And, for every (kernel, format) pair, moves the inputs into the format,
//! runs the kernel, moves the output back and compares it against the
//! one-element-at-a-time [`reference`] result. Each pair yields a
//! [`CaseReport`]; the whole sweep yields a [`RunReport`].

mod config;
mod error;
mod harness;
mod kind;
mod metrics;
pub mod reference;
mod workload;

pub use config::RunnerConfig;
pub use error::RunnerError;
pub use harness::{run_all, run_case};
pub use kind::FusedKind;
pub use metrics::{CaseReport, RunReport, SkippedCase};
pub use workload::Workload;
