// Copyright (c) The skylab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::{ExpectedError, Result},
    output::{OutputContext, OutputOpts, OutputWriter},
};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use skylab_metadata::{MatrixSummary, RunSummary, RunVerdict, SkylabExitCode};
use skylab_runner::{
    errors::MatrixValidateError, matrix::MatrixMap, reporter::VerdictReporter, run_log::RunLog,
};
use std::io::Write;
use tracing::info;

/// A verdict engine for cloud-executed test matrix runs.
#[derive(Debug, Parser)]
#[command(
    version,
    bin_name = "skylab",
    styles = crate::output::clap_styles::style(),
    max_term_width = 100,
)]
pub struct SkylabApp {
    #[clap(flatten)]
    output: OutputOpts,

    #[command(subcommand)]
    command: Command,
}

impl SkylabApp {
    /// Executes the app, returning the process exit code on success.
    pub fn exec(self, output_writer: &mut OutputWriter) -> Result<i32> {
        let output = self.output.init();
        self.command.exec(output, output_writer)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay a recorded run log and produce the overall verdict
    Verdict(VerdictOpts),
}

impl Command {
    fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        match self {
            Self::Verdict(opts) => opts.exec(output, output_writer),
        }
    }
}

#[derive(Debug, Args)]
struct VerdictOpts {
    /// Path to the recorded run log (newline-delimited JSON)
    #[arg(long, value_name = "PATH")]
    run_log: Utf8PathBuf,

    /// Report failed matrices but exit successfully
    #[arg(long)]
    ignore_failed: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t, value_name = "FORMAT")]
    message_format: MessageFormat,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum MessageFormat {
    /// Human-readable report
    #[default]
    Human,
    /// Machine-readable JSON summary
    Json,
}

impl VerdictOpts {
    fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        let log = RunLog::from_path(&self.run_log)?;
        if output.verbose {
            info!(
                "replaying {} polling rounds from {}",
                log.batches.len(),
                self.run_log
            );
        }
        let map = log.replay();
        let verdict = map.validate(self.ignore_failed);

        let mut writer = output_writer.stdout_writer();
        match self.message_format {
            MessageFormat::Human => {
                let mut reporter = VerdictReporter::new();
                if output.color.should_colorize(supports_color::Stream::Stdout) {
                    reporter.colorize();
                }
                reporter
                    .write_results(&map, &mut writer)
                    .map_err(ExpectedError::write_output)?;
                reporter
                    .write_verdict(verdict.as_ref().map(|_| ()), &mut writer)
                    .map_err(ExpectedError::write_output)?;
            }
            MessageFormat::Json => {
                let summary = run_summary(&map, &verdict);
                serde_json::to_writer_pretty(&mut writer, &summary)
                    .map_err(|err| ExpectedError::write_output(err.into()))?;
                writeln!(writer).map_err(ExpectedError::write_output)?;
            }
        }
        drop(writer);

        match verdict {
            Ok(()) => Ok(SkylabExitCode::OK),
            // The failures were reported above; the ignore flag downgrades the exit code only.
            Err(MatrixValidateError::FailedMatrices {
                should_ignore: true,
                ..
            }) => Ok(SkylabExitCode::OK),
            Err(err) => Err(err.into()),
        }
    }
}

fn run_summary(map: &MatrixMap, verdict: &Result<(), MatrixValidateError>) -> RunSummary {
    let verdict = match verdict {
        Ok(()) => RunVerdict::Passed,
        Err(MatrixValidateError::FailedMatrices {
            should_ignore: true,
            ..
        }) => RunVerdict::FailedIgnored,
        Err(MatrixValidateError::FailedMatrices { .. }) => RunVerdict::Failed,
        Err(MatrixValidateError::MatrixCanceled { .. }) => RunVerdict::Canceled,
        Err(MatrixValidateError::InfrastructureFailure { .. }) => RunVerdict::InfrastructureFailure,
        Err(MatrixValidateError::IncompatibleTestDimension { .. }) => {
            RunVerdict::IncompatibleTestDimension
        }
        Err(MatrixValidateError::UnexpectedMatrixState { .. }) => RunVerdict::UnexpectedState,
    };

    RunSummary {
        run_path: map.run_path().to_owned(),
        verdict,
        matrices: map
            .matrices()
            .values()
            .map(|matrix| MatrixSummary {
                matrix_id: matrix.matrix_id.clone(),
                state: matrix.state.to_string(),
                outcome: matrix.outcome.map(|outcome| outcome.to_string()),
                outcome_details: matrix.outcome_details.clone(),
                web_link: matrix.web_link.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    static RUN_LOG: &str = indoc! {r#"
        {"runPath":"results/2026-08-24","matrixIds":["matrix-1","matrix-2"]}
        [{"matrixId":"matrix-1","state":"FINISHED","outcome":"success"},{"matrixId":"matrix-2","state":"FINISHED","outcome":"failure","outcomeDetails":"2 tests failed"}]
    "#};

    #[test]
    fn verify_app() {
        use clap::CommandFactory;
        SkylabApp::command().debug_assert();
    }

    fn exec(args: &[&str], log_contents: &str) -> (Result<i32>, String) {
        let dir = camino_tempfile::tempdir().expect("created temp dir");
        let log_path = dir.path().join("run.log");
        std::fs::write(&log_path, log_contents).expect("wrote run log");

        let mut full_args = vec!["skylab", "verdict", "--run-log", log_path.as_str()];
        full_args.extend_from_slice(args);

        let app = SkylabApp::try_parse_from(full_args).expect("args parse");
        let mut output_writer = OutputWriter::new_test();
        let result = app.exec(&mut output_writer);
        let stdout = output_writer
            .stdout_str()
            .expect("test writer captures stdout")
            .to_owned();
        (result, stdout)
    }

    #[test]
    fn failed_matrices_fail_the_process() {
        let (result, stdout) = exec(&[], RUN_LOG);
        let err = result.expect_err("failed matrices produce an error");
        assert_eq!(err.process_exit_code(), SkylabExitCode::TEST_RUN_FAILED);
        assert!(stdout.contains("FAIL matrix-2"), "{stdout}");
    }

    #[test]
    fn ignore_failed_downgrades_the_exit_code() {
        let (result, stdout) = exec(&["--ignore-failed"], RUN_LOG);
        assert_eq!(result.expect("ignored failures"), SkylabExitCode::OK);
        // Failures are still reported even though the exit code is 0.
        assert!(stdout.contains("FAIL matrix-2"), "{stdout}");
        assert!(stdout.contains("IGNORED"), "{stdout}");
    }

    #[test]
    fn json_summary_carries_the_verdict() {
        let (result, stdout) = exec(&["--message-format", "json"], RUN_LOG);
        assert_eq!(
            result.expect_err("failed").process_exit_code(),
            SkylabExitCode::TEST_RUN_FAILED
        );

        let summary: RunSummary = serde_json::from_str(&stdout).expect("valid summary JSON");
        assert_eq!(summary.verdict, RunVerdict::Failed);
        assert_eq!(summary.run_path, Utf8Path::new("results/2026-08-24"));
        assert_eq!(summary.matrices.len(), 2);
        assert_eq!(summary.matrices[1].outcome.as_deref(), Some("failure"));
    }
}
