// Copyright (c) The skylab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Machine-readable summary of one run, emitted by `skylab --message-format json`.
///
/// States and outcomes are carried as the display strings the human reporter uses, so the
/// format stays stable even if the runner grows new internal states.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunSummary {
    /// Output location of the run, where artifacts are written.
    pub run_path: Utf8PathBuf,

    /// Overall verdict for the run.
    pub verdict: RunVerdict,

    /// Per-matrix results, in submission order.
    pub matrices: Vec<MatrixSummary>,
}

/// Overall verdict for a run.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunVerdict {
    /// Every matrix finished and passed.
    Passed,

    /// Some matrices failed, but failures were ignored by configuration. The process exits
    /// successfully.
    FailedIgnored,

    /// Some matrices failed.
    Failed,

    /// A matrix was canceled by the user.
    Canceled,

    /// The cloud service reported an infrastructure failure.
    InfrastructureFailure,

    /// A matrix requested an incompatible test dimension.
    IncompatibleTestDimension,

    /// A matrix never reached a terminal finished state.
    UnexpectedState,
}

/// Summary of a single matrix within a run.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MatrixSummary {
    /// Identifier of the matrix.
    pub matrix_id: SmolStr,

    /// Last known lifecycle state, as a display string.
    pub state: String,

    /// Test verdict, if the matrix reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,

    /// Free-text diagnostic accompanying a terminal result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome_details: Option<String>,

    /// Web console URL for the matrix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_round_trips_through_json() {
        let summary = RunSummary {
            run_path: "results/run".into(),
            verdict: RunVerdict::FailedIgnored,
            matrices: vec![MatrixSummary {
                matrix_id: "matrix-1".into(),
                state: "finished".to_owned(),
                outcome: Some("failure".to_owned()),
                outcome_details: None,
                web_link: None,
            }],
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains(r#""verdict":"failed-ignored""#), "{json}");
        assert_eq!(serde_json::from_str::<RunSummary>(&json).unwrap(), summary);
    }
}
