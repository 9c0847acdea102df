// Copyright (c) The skylab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by skylab.

use crate::{helpers::plural, matrix::SavedMatrix};
use camino::Utf8PathBuf;
use smol_str::SmolStr;
use std::error;
use thiserror::Error;

/// The verdict produced by validating a [`MatrixMap`](crate::matrix::MatrixMap).
///
/// Exactly one of these is returned per validation call, selected by strict priority: see
/// [`MatrixMap::validate`](crate::matrix::MatrixMap::validate).
#[derive(Clone, Debug, Error)]
pub enum MatrixValidateError {
    /// A matrix was canceled by the user.
    #[error("matrix `{id}` was canceled by the user")]
    MatrixCanceled {
        /// Identifier of the canceled matrix.
        id: SmolStr,

        /// Diagnostic text reported by the service, if any.
        details: Option<String>,
    },

    /// A matrix stopped because of a fault in the test infrastructure.
    #[error("matrix `{id}` encountered an infrastructure failure")]
    InfrastructureFailure {
        /// Identifier of the affected matrix.
        id: SmolStr,

        /// Diagnostic text reported by the service, if any.
        details: Option<String>,
    },

    /// A matrix requested a device/API dimension the service cannot run. This is a
    /// configuration error, distinct from both infrastructure faults and test failures.
    #[error("matrix `{id}` requested an incompatible test dimension")]
    IncompatibleTestDimension {
        /// Identifier of the affected matrix.
        id: SmolStr,

        /// Diagnostic text reported by the service, if any.
        details: Option<String>,
    },

    /// Polling stopped before a matrix reached the finished state.
    #[error("matrix `{}` is in unexpected state: {}", .matrix.matrix_id, .matrix.state)]
    UnexpectedMatrixState {
        /// The offending matrix record.
        matrix: SavedMatrix,
    },

    /// One or more matrices finished with failing tests.
    #[error(
        "{} {} failed",
        .failed.len(),
        plural::matrices_str(.failed.len())
    )]
    FailedMatrices {
        /// Every matrix whose tests failed, in submission order.
        failed: Vec<SavedMatrix>,

        /// Report the failures but let the caller exit successfully anyway.
        should_ignore: bool,
    },
}

/// An error returned by a [`StatusPoller`](crate::poller::StatusPoller) implementation.
#[derive(Debug, Error)]
#[error("failed to poll matrix statuses")]
pub struct PollError {
    #[source]
    error: Box<dyn error::Error + Send + Sync>,
}

impl PollError {
    /// Wraps an underlying client error.
    pub fn new(error: impl Into<Box<dyn error::Error + Send + Sync>>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// An error occurred while driving a poller to completion.
#[derive(Debug, Error)]
pub enum PollLoopError {
    /// The underlying status poller failed.
    #[error("status poller failed")]
    Poll(
        #[from]
        #[source]
        PollError,
    ),

    /// Fail-fast validation found a fatal condition before polling completed.
    #[error("validation failed during polling")]
    Validate(
        #[from]
        #[source]
        MatrixValidateError,
    ),
}

/// An error occurred while reading or writing a run log.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunLogError {
    /// An I/O error occurred while reading the run log.
    #[error("error reading run log at `{path}`")]
    Read {
        /// The run log being read.
        path: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },

    /// An I/O error occurred while writing the run log.
    #[error("error writing run log")]
    Write {
        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },

    /// The run log did not start with a header line.
    #[error("run log at `{path}` is missing its header line")]
    MissingHeader {
        /// The run log being read.
        path: Utf8PathBuf,
    },

    /// A line in the run log failed to deserialize.
    #[error("malformed run log entry at `{path}` line {line}")]
    Malformed {
        /// The run log being read.
        path: Utf8PathBuf,

        /// The 1-based line number of the malformed entry.
        line: usize,

        /// The underlying deserialization error.
        #[source]
        error: serde_json::Error,
    },
}
