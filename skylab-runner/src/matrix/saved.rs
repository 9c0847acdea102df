// Copyright (c) The skylab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    matrix::{MatrixOutcome, MatrixState},
    poller::MatrixStatus,
};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// The last known state of one remote test matrix.
///
/// A `SavedMatrix` is a snapshot: merging a fresh status produces a new value via
/// [`updated_with`](Self::updated_with) rather than mutating in place. All classification
/// predicates are pure functions of the recorded state and outcome.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMatrix {
    /// Unique identifier of the matrix within its run.
    pub matrix_id: SmolStr,
    /// Last known lifecycle state.
    pub state: MatrixState,
    /// Test verdict, recorded once the matrix finishes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<MatrixOutcome>,
    /// Free-text diagnostic accompanying a terminal result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome_details: Option<String>,
    /// Web console URL for this matrix, used when reporting results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_link: Option<String>,
}

impl SavedMatrix {
    /// Creates the initial record for a freshly submitted matrix, before any polling.
    pub fn new(matrix_id: impl Into<SmolStr>) -> Self {
        Self {
            matrix_id: matrix_id.into(),
            state: MatrixState::Pending,
            outcome: None,
            outcome_details: None,
            web_link: None,
        }
    }

    /// Returns a new record with `status` merged in.
    ///
    /// Two rules keep a record from losing information across polls:
    ///
    /// * A terminal record never regresses: a stale non-terminal (or unspecified) state in
    ///   `status` leaves the recorded state untouched.
    /// * An absent or empty outcome, diagnostic or web link in `status` never clobbers a
    ///   recorded one.
    ///
    /// Merging the same status twice yields the same record as merging it once.
    pub fn updated_with(&self, status: &MatrixStatus) -> Self {
        let state = if status.state == MatrixState::Unspecified
            || (self.state.is_terminal() && !status.state.is_terminal())
        {
            self.state
        } else {
            status.state
        };

        Self {
            matrix_id: self.matrix_id.clone(),
            state,
            outcome: status.outcome.or(self.outcome),
            outcome_details: merge_text(
                status.outcome_details.as_deref(),
                self.outcome_details.as_deref(),
            ),
            web_link: merge_text(status.web_link.as_deref(), self.web_link.as_deref()),
        }
    }

    /// Returns true if the matrix was canceled by the user.
    pub fn canceled_by_user(&self) -> bool {
        self.state == MatrixState::Canceled
    }

    /// Returns true if the matrix stopped because of a fault in the test infrastructure,
    /// including rejection of invalid inputs.
    pub fn infrastructure_fail(&self) -> bool {
        matches!(self.state, MatrixState::Error | MatrixState::Invalid)
    }

    /// Returns true if the matrix requested a device/API dimension the service cannot run.
    pub fn incompatible_fail(&self) -> bool {
        matches!(
            self.state,
            MatrixState::UnsupportedEnvironment
                | MatrixState::IncompatibleEnvironment
                | MatrixState::IncompatibleArchitecture
        )
    }

    /// Returns true if this matrix counts against the overall run succeeding.
    pub fn is_failed(&self) -> bool {
        self.canceled_by_user()
            || self.infrastructure_fail()
            || self.incompatible_fail()
            || matches!(
                self.outcome,
                Some(MatrixOutcome::Failure | MatrixOutcome::Inconclusive)
            )
    }
}

fn merge_text(new: Option<&str>, old: Option<&str>) -> Option<String> {
    match new {
        Some(s) if !s.is_empty() => Some(s.to_owned()),
        _ => old.map(str::to_owned),
    }
}
