// Copyright (c) The skylab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The seam between the verdict engine and the cloud test service.
//!
//! The HTTP/RPC client that actually talks to the service lives outside this crate; it plugs in
//! through [`StatusPoller`]. The engine consumes batches of [`MatrixStatus`] records and never
//! performs I/O, sleeps or retries itself.

use crate::{
    errors::{PollError, PollLoopError},
    matrix::{MatrixMap, MatrixOutcome, MatrixState},
};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::debug;

/// One status record polled from the cloud service.
///
/// A polling round yields at most one record per matrix, and need not cover every tracked
/// matrix.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixStatus {
    /// Identifier of the matrix this record describes.
    pub matrix_id: SmolStr,

    /// Lifecycle state reported by the service.
    pub state: MatrixState,

    /// Test verdict, present once the matrix has finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<MatrixOutcome>,

    /// Free-text diagnostic accompanying a terminal result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome_details: Option<String>,

    /// Web console URL for the matrix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_link: Option<String>,
}

/// Polls the cloud service for fresh matrix statuses.
///
/// Implementations own pacing, retries and concurrency; the engine only merges the batches
/// they return, one at a time.
pub trait StatusPoller {
    /// Returns the next batch of statuses.
    fn poll(&mut self) -> Result<Vec<MatrixStatus>, PollError>;
}

/// Policy for [`poll_until_complete`].
#[derive(Copy, Clone, Debug)]
pub struct PollPolicy {
    /// Maximum number of polling rounds before giving up. Exhausting the budget is not an
    /// error here: the subsequent [`MatrixMap::validate`] call reports any matrix left in a
    /// non-terminal state.
    pub max_rounds: usize,

    /// Stop polling as soon as a round reveals a canceled, infrastructure-failed or
    /// incompatible matrix, instead of waiting for the rest of the batch.
    pub fail_fast: bool,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_rounds: usize::MAX,
            fail_fast: false,
        }
    }
}

/// Drives `poller` until every tracked matrix is terminal, merging each batch into `map`.
///
/// Returns once the batch is fully terminal or the round budget is exhausted. With
/// `fail_fast`, a round that reveals a cancellation, infrastructure failure or incompatible
/// dimension aborts polling immediately with that validation error; plain test failures never
/// abort the loop, since the remaining matrices are still worth draining for the report.
pub fn poll_until_complete(
    map: &mut MatrixMap,
    poller: &mut dyn StatusPoller,
    policy: PollPolicy,
) -> Result<(), PollLoopError> {
    for round in 0..policy.max_rounds {
        if map.is_all_terminal() {
            return Ok(());
        }

        let batch = poller.poll()?;
        debug!(round, received = batch.len(), "merging status batch");
        map.merge_updates(&batch);

        if policy.fail_fast {
            use crate::errors::MatrixValidateError as E;
            match map.validate(false) {
                Err(
                    err @ (E::MatrixCanceled { .. }
                    | E::InfrastructureFailure { .. }
                    | E::IncompatibleTestDimension { .. }),
                ) => return Err(err.into()),
                // Non-terminal matrices and failed tests are expected mid-run.
                Ok(()) | Err(_) => {}
            }
        }
    }
    Ok(())
}
