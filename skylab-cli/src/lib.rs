// Copyright (c) The skylab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A verdict engine for cloud-executed test matrix runs.
//!
//! For the underlying reconciliation and validation logic, see the
//! [skylab-runner](https://docs.rs/skylab-runner) crate.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::OutputWriter;
