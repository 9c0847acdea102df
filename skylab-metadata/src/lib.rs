// Copyright (c) The skylab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Documented exit codes and machine-readable output formats for
//! [skylab](https://crates.io/crates/skylab-cli).
//!
//! This crate is meant for external tools that invoke `skylab` and want to interpret its exit
//! code or parse its JSON output without depending on the runner internals.

#![warn(missing_docs)]

mod exit_codes;
mod summaries;

pub use exit_codes::*;
pub use summaries::*;
