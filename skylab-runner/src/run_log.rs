// Copyright (c) The skylab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recorded run logs.
//!
//! A run log captures everything needed to reproduce a verdict offline: a header naming the
//! run's output location and the tracked matrix identifiers, followed by one line per polling
//! round holding the status batch that round returned. The format is newline-delimited JSON so
//! a live run can append batches as they arrive and a truncated log still replays cleanly up
//! to the cut.

use crate::{
    errors::RunLogError,
    matrix::{MatrixMap, SavedMatrix},
    poller::MatrixStatus,
};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
};

/// Header line of a run log.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunLogHeader {
    /// Output location for the whole batch.
    pub run_path: Utf8PathBuf,

    /// Identifiers of every tracked matrix, in submission order.
    pub matrix_ids: Vec<SmolStr>,
}

/// A fully parsed run log.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunLog {
    /// The header line.
    pub header: RunLogHeader,

    /// One entry per recorded polling round.
    pub batches: Vec<Vec<MatrixStatus>>,
}

impl RunLog {
    /// Reads a run log from a file on disk.
    pub fn from_path(path: &Utf8Path) -> Result<Self, RunLogError> {
        let file = File::open(path).map_err(|error| RunLogError::Read {
            path: path.to_owned(),
            error,
        })?;
        Self::from_reader(path, BufReader::new(file))
    }

    /// Reads a run log from `reader`. `path` is used for error messages only.
    pub fn from_reader(path: &Utf8Path, reader: impl BufRead) -> Result<Self, RunLogError> {
        let mut lines = reader.lines().enumerate();

        let header = loop {
            let Some((index, line)) = lines.next() else {
                return Err(RunLogError::MissingHeader {
                    path: path.to_owned(),
                });
            };
            let line = line.map_err(|error| RunLogError::Read {
                path: path.to_owned(),
                error,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            break serde_json::from_str::<RunLogHeader>(&line).map_err(|error| {
                RunLogError::Malformed {
                    path: path.to_owned(),
                    line: index + 1,
                    error,
                }
            })?;
        };

        let mut batches = Vec::new();
        for (index, line) in lines {
            let line = line.map_err(|error| RunLogError::Read {
                path: path.to_owned(),
                error,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let batch: Vec<MatrixStatus> =
                serde_json::from_str(&line).map_err(|error| RunLogError::Malformed {
                    path: path.to_owned(),
                    line: index + 1,
                    error,
                })?;
            batches.push(batch);
        }

        Ok(Self { header, batches })
    }

    /// Writes the log out as newline-delimited JSON.
    pub fn write_to(&self, writer: impl Write) -> Result<(), RunLogError> {
        let mut writer = RunLogWriter::new(writer, &self.header)?;
        for batch in &self.batches {
            writer.write_batch(batch)?;
        }
        writer.into_inner().map(|_| ())
    }

    /// Replays the recorded batches into a fresh [`MatrixMap`].
    ///
    /// Statuses recorded for identifiers outside the header's batch are skipped, exactly as
    /// they were during the live run.
    pub fn replay(&self) -> MatrixMap {
        let mut map = MatrixMap::new(
            self.header.run_path.clone(),
            self.header.matrix_ids.iter().cloned().map(SavedMatrix::new),
        );
        for batch in &self.batches {
            map.merge_updates(batch);
        }
        map
    }
}

/// Appends status batches to a live run log as they arrive.
#[derive(Debug)]
pub struct RunLogWriter<W: Write> {
    writer: W,
}

impl<W: Write> RunLogWriter<W> {
    /// Starts a run log by writing the header line.
    pub fn new(mut writer: W, header: &RunLogHeader) -> Result<Self, RunLogError> {
        serde_json::to_writer(&mut writer, header)
            .map_err(io::Error::other)
            .and_then(|()| writeln!(writer))
            .map_err(|error| RunLogError::Write { error })?;
        Ok(Self { writer })
    }

    /// Appends one polling round's batch.
    pub fn write_batch(&mut self, batch: &[MatrixStatus]) -> Result<(), RunLogError> {
        serde_json::to_writer(&mut self.writer, batch)
            .map_err(io::Error::other)
            .and_then(|()| writeln!(self.writer))
            .map_err(|error| RunLogError::Write { error })
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(mut self) -> Result<W, RunLogError> {
        self.writer
            .flush()
            .map_err(|error| RunLogError::Write { error })?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::MatrixValidateError, matrix::MatrixOutcome};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    static FAILED_RUN_LOG: &str = indoc! {r#"
        {"runPath":"results/2026-08-24","matrixIds":["matrix-1","matrix-2"]}
        [{"matrixId":"matrix-1","state":"RUNNING"},{"matrixId":"matrix-2","state":"PENDING"}]
        [{"matrixId":"matrix-1","state":"FINISHED","outcome":"success"},{"matrixId":"matrix-2","state":"FINISHED","outcome":"failure","outcomeDetails":"2 tests failed"}]
    "#};

    fn parse(input: &str) -> RunLog {
        RunLog::from_reader(Utf8Path::new("test.log"), input.as_bytes()).expect("run log parses")
    }

    #[test]
    fn replays_to_the_recorded_verdict() {
        let log = parse(FAILED_RUN_LOG);
        assert_eq!(log.batches.len(), 2);

        let map = log.replay();
        assert_eq!(map.run_path(), Utf8Path::new("results/2026-08-24"));
        assert_eq!(map.matrices()["matrix-1"].outcome, Some(MatrixOutcome::Success));

        match map.validate(false).unwrap_err() {
            MatrixValidateError::FailedMatrices { failed, .. } => {
                assert_eq!(failed.len(), 1);
                assert_eq!(failed[0].matrix_id, "matrix-2");
                assert_eq!(failed[0].outcome_details.as_deref(), Some("2 tests failed"));
            }
            other => panic!("expected FailedMatrices, got {other:?}"),
        }
    }

    #[test]
    fn truncated_log_replays_to_unexpected_state() {
        // Only the first (non-terminal) round made it to disk.
        let truncated: String = FAILED_RUN_LOG.lines().take(2).collect::<Vec<_>>().join("\n");
        let map = parse(&truncated).replay();
        assert!(matches!(
            map.validate(false).unwrap_err(),
            MatrixValidateError::UnexpectedMatrixState { .. }
        ));
    }

    #[test]
    fn missing_header_is_an_error() {
        let err = RunLog::from_reader(Utf8Path::new("test.log"), "".as_bytes()).unwrap_err();
        assert!(matches!(err, RunLogError::MissingHeader { .. }));
    }

    #[test]
    fn malformed_batch_line_reports_its_line_number() {
        let input = indoc! {r#"
            {"runPath":"results/run","matrixIds":["matrix-1"]}
            not json
        "#};
        let err = RunLog::from_reader(Utf8Path::new("test.log"), input.as_bytes()).unwrap_err();
        match err {
            RunLogError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn writer_round_trips() {
        let log = parse(FAILED_RUN_LOG);

        let mut writer = RunLogWriter::new(Vec::new(), &log.header).expect("header written");
        for batch in &log.batches {
            writer.write_batch(batch).expect("batch written");
        }
        let bytes = writer.into_inner().expect("flushes");

        let reread = RunLog::from_reader(Utf8Path::new("test.log"), bytes.as_slice()).expect("rereads");
        assert_eq!(reread, log);
    }

    #[test]
    fn write_to_round_trips() {
        let log = parse(FAILED_RUN_LOG);
        let mut bytes = Vec::new();
        log.write_to(&mut bytes).expect("writes");
        assert_eq!(parse(std::str::from_utf8(&bytes).unwrap()), log);
    }
}
