// Copyright (c) The skylab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::MatrixValidateError,
    matrix::{MatrixState, SavedMatrix},
    poller::MatrixStatus,
};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::debug;

/// The single source of truth for the state of one batch of test matrices.
///
/// The key set is fixed at construction, one entry per submitted matrix; polling rounds only
/// replace values. The map is not internally synchronized: the driver that merges polled
/// batches must do so from a single writer at a time.
#[derive(Clone, Debug)]
pub struct MatrixMap {
    run_path: Utf8PathBuf,
    matrices: IndexMap<SmolStr, SavedMatrix>,
}

impl MatrixMap {
    /// Creates a map over a batch of freshly submitted matrices.
    ///
    /// `run_path` is an opaque output-location token for the whole batch, surfaced to the
    /// reporting layer to locate associated artifacts.
    pub fn new(
        run_path: impl Into<Utf8PathBuf>,
        matrices: impl IntoIterator<Item = SavedMatrix>,
    ) -> Self {
        Self {
            run_path: run_path.into(),
            matrices: matrices
                .into_iter()
                .map(|matrix| (matrix.matrix_id.clone(), matrix))
                .collect(),
        }
    }

    /// Returns the output location for this batch.
    pub fn run_path(&self) -> &Utf8Path {
        &self.run_path
    }

    /// Returns a read-only view of the tracked matrices, in submission order.
    pub fn matrices(&self) -> &IndexMap<SmolStr, SavedMatrix> {
        &self.matrices
    }

    /// Replaces the record for `id` with `saved`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a tracked matrix. Batch membership is fixed at construction, so
    /// an unknown id here is a programmer error, not a runtime failure path.
    pub fn update(&mut self, id: &str, saved: SavedMatrix) {
        match self.matrices.get_mut(id) {
            Some(slot) => *slot = saved,
            None => panic!("matrix `{id}` is not tracked in this run"),
        }
    }

    /// Merges a freshly polled batch of statuses into the map.
    ///
    /// Statuses for identifiers outside the tracked batch (e.g. shards retried by the service)
    /// are skipped with a debug log line.
    pub fn merge_updates<'a>(&mut self, batch: impl IntoIterator<Item = &'a MatrixStatus>) {
        for status in batch {
            let Some(existing) = self.matrices.get(status.matrix_id.as_str()) else {
                debug!(
                    matrix_id = %status.matrix_id,
                    "ignoring status for matrix outside the tracked batch"
                );
                continue;
            };
            let updated = existing.updated_with(status);
            self.update(status.matrix_id.as_str(), updated);
        }
    }

    /// Returns true if no tracked matrix has failed so far.
    ///
    /// This may flip to false before polling completes, as soon as any matrix reports a
    /// failure.
    pub fn is_all_successful(&self) -> bool {
        !self.matrices.values().any(SavedMatrix::is_failed)
    }

    /// Returns true if every tracked matrix has reached a terminal state.
    pub fn is_all_terminal(&self) -> bool {
        self.matrices
            .values()
            .all(|matrix| matrix.state.is_terminal())
    }

    /// Validates the aggregate state of the batch, producing the overall verdict.
    ///
    /// Failure causes are checked in strict priority order, each rule scanning the whole map;
    /// the first matching rule wins and exactly one error is returned per call:
    ///
    /// 1. a matrix canceled by the user,
    /// 2. an infrastructure failure,
    /// 3. an incompatible test dimension,
    /// 4. a matrix that never reached the finished state,
    /// 5. matrices whose tests failed (reported together, with `should_ignore` attached so the
    ///    caller can downgrade the verdict while still reporting the failures).
    ///
    /// Cancellation and infrastructure faults are not test failures and must not be conflated
    /// with them; the representative matrix attached to an error is the first match in
    /// submission order.
    pub fn validate(&self, should_ignore: bool) -> Result<(), MatrixValidateError> {
        if let Some(matrix) = self.matrices.values().find(|m| m.canceled_by_user()) {
            return Err(MatrixValidateError::MatrixCanceled {
                id: matrix.matrix_id.clone(),
                details: matrix.outcome_details.clone(),
            });
        }
        if let Some(matrix) = self.matrices.values().find(|m| m.infrastructure_fail()) {
            return Err(MatrixValidateError::InfrastructureFailure {
                id: matrix.matrix_id.clone(),
                details: matrix.outcome_details.clone(),
            });
        }
        if let Some(matrix) = self.matrices.values().find(|m| m.incompatible_fail()) {
            return Err(MatrixValidateError::IncompatibleTestDimension {
                id: matrix.matrix_id.clone(),
                details: matrix.outcome_details.clone(),
            });
        }
        if let Some(matrix) = self
            .matrices
            .values()
            .find(|m| m.state != MatrixState::Finished)
        {
            return Err(MatrixValidateError::UnexpectedMatrixState {
                matrix: matrix.clone(),
            });
        }

        let failed: Vec<SavedMatrix> = self
            .matrices
            .values()
            .filter(|m| m.is_failed())
            .cloned()
            .collect();
        if !failed.is_empty() {
            return Err(MatrixValidateError::FailedMatrices {
                failed,
                should_ignore,
            });
        }

        Ok(())
    }
}
