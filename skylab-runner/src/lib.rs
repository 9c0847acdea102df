// Copyright (c) The skylab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for [skylab](https://crates.io/crates/skylab-cli), a verdict engine for
//! batches of remotely-executed test matrices.
//!
//! A test matrix is one remote execution unit covering a device/OS/locale combination, submitted
//! to a cloud device lab and polled for status until it reaches a terminal state. This crate owns
//! the in-memory record of the whole batch ([`MatrixMap`](matrix::MatrixMap)), the merge of
//! polled status updates into that record, and the final validation that turns the aggregate
//! state into a single verdict with a precise error classification.
//!
//! Submitting matrices and talking to the cloud service over HTTP are out of scope; the
//! [`StatusPoller`](poller::StatusPoller) trait is the seam where a client plugs in.

pub mod errors;
mod helpers;
pub mod matrix;
pub mod poller;
pub mod reporter;
pub mod run_log;
