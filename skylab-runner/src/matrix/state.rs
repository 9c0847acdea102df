// Copyright (c) The skylab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state reported by the cloud service for one test matrix.
///
/// The serialized names match the service's wire format.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatrixState {
    /// The service did not report a recognized state.
    Unspecified,
    /// The matrix is being checked for validity before execution.
    Validating,
    /// The matrix has been accepted and is waiting for devices.
    Pending,
    /// At least one execution in the matrix is running.
    Running,
    /// Every execution in the matrix finished and reported an outcome.
    Finished,
    /// The matrix stopped because of an infrastructure failure.
    Error,
    /// The requested environment is not supported by the service.
    UnsupportedEnvironment,
    /// The requested environment is valid but incompatible with the
    /// submitted test (e.g. an API level below the app's minimum).
    IncompatibleEnvironment,
    /// The submitted binaries do not run on the requested architecture.
    IncompatibleArchitecture,
    /// The matrix was canceled by the user.
    Canceled,
    /// The submitted inputs were invalid and the matrix was rejected.
    Invalid,
}

impl MatrixState {
    /// Returns true if no further status updates are expected for a matrix in this state.
    pub fn is_terminal(self) -> bool {
        match self {
            Self::Finished
            | Self::Error
            | Self::UnsupportedEnvironment
            | Self::IncompatibleEnvironment
            | Self::IncompatibleArchitecture
            | Self::Canceled
            | Self::Invalid => true,
            Self::Unspecified | Self::Validating | Self::Pending | Self::Running => false,
        }
    }
}

impl fmt::Display for MatrixState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unspecified => "unspecified",
            Self::Validating => "validating",
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Error => "error",
            Self::UnsupportedEnvironment => "unsupported environment",
            Self::IncompatibleEnvironment => "incompatible environment",
            Self::IncompatibleArchitecture => "incompatible architecture",
            Self::Canceled => "canceled",
            Self::Invalid => "invalid",
        };
        write!(f, "{s}")
    }
}

/// Test verdict reported on a matrix once it has finished.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixOutcome {
    /// Every test in the matrix passed.
    Success,
    /// At least one test in the matrix failed.
    Failure,
    /// The matrix finished but the service could not determine a verdict.
    Inconclusive,
    /// Every test in the matrix was skipped.
    Skipped,
    /// Tests failed and then passed on retry.
    Flaky,
}

impl fmt::Display for MatrixOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Inconclusive => "inconclusive",
            Self::Skipped => "skipped",
            Self::Flaky => "flaky",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(MatrixState::Unspecified, false)]
    #[test_case(MatrixState::Validating, false)]
    #[test_case(MatrixState::Pending, false)]
    #[test_case(MatrixState::Running, false)]
    #[test_case(MatrixState::Finished, true)]
    #[test_case(MatrixState::Error, true)]
    #[test_case(MatrixState::UnsupportedEnvironment, true)]
    #[test_case(MatrixState::IncompatibleEnvironment, true)]
    #[test_case(MatrixState::IncompatibleArchitecture, true)]
    #[test_case(MatrixState::Canceled, true)]
    #[test_case(MatrixState::Invalid, true)]
    fn terminal_states(state: MatrixState, is_terminal: bool) {
        assert_eq!(state.is_terminal(), is_terminal, "{state} terminal");
    }

    #[test]
    fn wire_names() {
        assert_eq!(
            serde_json::to_string(&MatrixState::UnsupportedEnvironment).unwrap(),
            r#""UNSUPPORTED_ENVIRONMENT""#,
        );
        assert_eq!(
            serde_json::from_str::<MatrixState>(r#""FINISHED""#).unwrap(),
            MatrixState::Finished,
        );
        assert_eq!(
            serde_json::to_string(&MatrixOutcome::Flaky).unwrap(),
            r#""flaky""#,
        );
    }
}
