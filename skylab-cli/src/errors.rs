// Copyright (c) The skylab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use skylab_metadata::SkylabExitCode;
use skylab_runner::errors::{MatrixValidateError, RunLogError};
use std::error::Error;
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print
// out errors is with the display_to_stderr method.

/// An error with a documented exit code, expected to surface to the user.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("run log error")]
    RunLogError {
        #[from]
        err: RunLogError,
    },
    #[error("matrix validation failed")]
    ValidateError {
        #[from]
        err: MatrixValidateError,
    },
    #[error("error writing to output")]
    WriteOutputError {
        #[source]
        err: std::io::Error,
    },
}

impl ExpectedError {
    pub(crate) fn write_output(err: std::io::Error) -> Self {
        Self::WriteOutputError { err }
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::RunLogError { .. } => SkylabExitCode::SETUP_ERROR,
            Self::WriteOutputError { .. } => SkylabExitCode::WRITE_OUTPUT_ERROR,
            Self::ValidateError { err } => match err {
                MatrixValidateError::MatrixCanceled { .. } => SkylabExitCode::MATRIX_CANCELED,
                MatrixValidateError::InfrastructureFailure { .. } => {
                    SkylabExitCode::INFRASTRUCTURE_FAILURE
                }
                MatrixValidateError::IncompatibleTestDimension { .. } => {
                    SkylabExitCode::INCOMPATIBLE_TEST_DIMENSION
                }
                MatrixValidateError::UnexpectedMatrixState { .. } => {
                    SkylabExitCode::UNEXPECTED_MATRIX_STATE
                }
                MatrixValidateError::FailedMatrices { .. } => SkylabExitCode::TEST_RUN_FAILED,
            },
        }
    }

    /// Displays this error to stderr, along with its causes.
    pub fn display_to_stderr(&self) {
        let mut next_error = match self {
            Self::RunLogError { err } => {
                error!("failed to load run log");
                Some(err as &dyn Error)
            }
            Self::ValidateError { err } => {
                error!("{err}");
                match err {
                    MatrixValidateError::MatrixCanceled { details, .. }
                    | MatrixValidateError::InfrastructureFailure { details, .. }
                    | MatrixValidateError::IncompatibleTestDimension { details, .. } => {
                        if let Some(details) = details {
                            error!("  service reported: {details}");
                        }
                    }
                    MatrixValidateError::UnexpectedMatrixState { .. }
                    | MatrixValidateError::FailedMatrices { .. } => {}
                }
                None
            }
            Self::WriteOutputError { err } => {
                error!("error writing to output");
                Some(err as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            error!("  caused by: {err}");
            next_error = err.source();
        }
    }
}
