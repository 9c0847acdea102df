// Copyright (c) The skylab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: drive a scripted poller to completion and check the verdict.

use camino::Utf8Path;
use skylab_runner::{
    errors::{MatrixValidateError, PollError},
    matrix::{MatrixMap, MatrixOutcome, MatrixState, SavedMatrix},
    poller::{MatrixStatus, PollPolicy, StatusPoller, poll_until_complete},
    run_log::{RunLog, RunLogHeader, RunLogWriter},
};

/// Replays a fixed script of batches, recording them to a run log as it goes.
struct RecordingPoller {
    batches: std::vec::IntoIter<Vec<MatrixStatus>>,
    log: RunLogWriter<Vec<u8>>,
}

impl RecordingPoller {
    fn new(header: &RunLogHeader, batches: Vec<Vec<MatrixStatus>>) -> Self {
        Self {
            batches: batches.into_iter(),
            log: RunLogWriter::new(Vec::new(), header).expect("header written"),
        }
    }
}

impl StatusPoller for RecordingPoller {
    fn poll(&mut self) -> Result<Vec<MatrixStatus>, PollError> {
        let batch = self.batches.next().unwrap_or_default();
        self.log.write_batch(&batch).map_err(PollError::new)?;
        Ok(batch)
    }
}

fn status(id: &str, state: MatrixState, outcome: Option<MatrixOutcome>) -> MatrixStatus {
    MatrixStatus {
        matrix_id: id.into(),
        state,
        outcome,
        outcome_details: None,
        web_link: None,
    }
}

fn header(ids: &[&str]) -> RunLogHeader {
    RunLogHeader {
        run_path: "results/e2e".into(),
        matrix_ids: ids.iter().map(|id| (*id).into()).collect(),
    }
}

fn fresh_map(header: &RunLogHeader) -> MatrixMap {
    MatrixMap::new(
        header.run_path.clone(),
        header.matrix_ids.iter().cloned().map(SavedMatrix::new),
    )
}

#[test]
fn passing_run_polls_to_success() {
    let header = header(&["pixel-api33", "pixel-api34"]);
    let mut map = fresh_map(&header);
    let mut poller = RecordingPoller::new(
        &header,
        vec![
            vec![
                status("pixel-api33", MatrixState::Validating, None),
                status("pixel-api34", MatrixState::Pending, None),
            ],
            vec![
                status("pixel-api33", MatrixState::Running, None),
                status("pixel-api34", MatrixState::Running, None),
            ],
            vec![
                status(
                    "pixel-api33",
                    MatrixState::Finished,
                    Some(MatrixOutcome::Success),
                ),
                status(
                    "pixel-api34",
                    MatrixState::Finished,
                    Some(MatrixOutcome::Flaky),
                ),
            ],
        ],
    );

    poll_until_complete(&mut map, &mut poller, PollPolicy::default()).expect("polling completes");
    assert!(map.is_all_successful());
    map.validate(false).expect("run passed");

    // The recorded log replays to the same verdict.
    let bytes = poller.log.into_inner().expect("log flushed");
    let log = RunLog::from_reader(Utf8Path::new("e2e.log"), bytes.as_slice()).expect("log parses");
    log.replay().validate(false).expect("replay passed");
}

#[test]
fn canceled_run_wins_over_failed_tests_end_to_end() {
    let header = header(&["a", "b"]);
    let mut map = fresh_map(&header);
    let mut poller = RecordingPoller::new(
        &header,
        vec![
            vec![
                status("a", MatrixState::Finished, Some(MatrixOutcome::Failure)),
                status("b", MatrixState::Running, None),
            ],
            vec![status("b", MatrixState::Canceled, None)],
        ],
    );

    poll_until_complete(&mut map, &mut poller, PollPolicy::default()).expect("polling completes");

    // Cancellation takes priority over the failed tests in matrix a, for any ignore flag.
    for should_ignore in [false, true] {
        match map.validate(should_ignore).unwrap_err() {
            MatrixValidateError::MatrixCanceled { id, .. } => assert_eq!(id, "b"),
            other => panic!("expected MatrixCanceled, got {other:?}"),
        }
    }
}

#[test]
fn statuses_for_retried_shards_do_not_disturb_the_batch() {
    let header = header(&["a"]);
    let mut map = fresh_map(&header);
    let mut poller = RecordingPoller::new(
        &header,
        vec![vec![
            status("a", MatrixState::Finished, Some(MatrixOutcome::Success)),
            // The service re-reports a shard skylab is not tracking.
            status("a-retry-1", MatrixState::Error, None),
        ]],
    );

    poll_until_complete(&mut map, &mut poller, PollPolicy::default()).expect("polling completes");
    assert_eq!(map.matrices().len(), 1);
    map.validate(false).expect("untracked shard is ignored");
}
