// Copyright (c) The skylab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable reporting of matrix results and the final verdict.

use crate::{
    errors::MatrixValidateError,
    helpers::plural,
    matrix::{MatrixMap, MatrixOutcome, SavedMatrix},
};
use owo_colors::{OwoColorize, Style};
use std::io;

/// Renders per-matrix result lines and the overall verdict.
#[derive(Debug, Default)]
pub struct VerdictReporter {
    styles: Styles,
}

impl VerdictReporter {
    /// Creates a reporter with colors disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Colorizes output.
    pub fn colorize(&mut self) {
        self.styles.colorize();
    }

    /// Writes one line per tracked matrix, followed by a count summary.
    pub fn write_results(&self, map: &MatrixMap, mut writer: impl io::Write) -> io::Result<()> {
        let mut passed = 0;
        let mut failed = 0;
        for matrix in map.matrices().values() {
            if matrix.is_failed() {
                failed += 1;
            } else if matrix.state.is_terminal() {
                passed += 1;
            }
            self.write_matrix_line(matrix, &mut writer)?;
        }

        let total = map.matrices().len();
        writeln!(
            writer,
            "{:>12} {} {} run: {} {}, {} {}",
            "Summary".style(self.styles.count),
            total.style(self.styles.count),
            plural::matrices_str(total),
            passed.style(self.styles.pass),
            "passed".style(self.styles.pass),
            failed.style(self.styles.fail),
            "failed".style(self.styles.fail),
        )?;
        writeln!(writer, "{:>12} results at {}", "", map.run_path())
    }

    /// Writes the final verdict line for a validation result.
    pub fn write_verdict(
        &self,
        verdict: Result<(), &MatrixValidateError>,
        mut writer: impl io::Write,
    ) -> io::Result<()> {
        match verdict {
            Ok(()) => writeln!(
                writer,
                "{:>12} all matrices passed",
                "PASS".style(self.styles.pass)
            ),
            Err(MatrixValidateError::FailedMatrices {
                failed,
                should_ignore: true,
            }) => writeln!(
                writer,
                "{:>12} {} {} failed but {} ignored",
                "IGNORED".style(self.styles.skip),
                failed.len().style(self.styles.count),
                plural::matrices_str(failed.len()),
                plural::were_str(failed.len()),
            ),
            Err(err) => writeln!(writer, "{:>12} {err}", "ERROR".style(self.styles.fail)),
        }
    }

    fn write_matrix_line(
        &self,
        matrix: &SavedMatrix,
        writer: &mut impl io::Write,
    ) -> io::Result<()> {
        let (word, style) = self.status_word(matrix);
        write!(
            writer,
            "{:>12} {} ({})",
            word.style(style),
            matrix.matrix_id,
            matrix.state
        )?;
        if let Some(details) = &matrix.outcome_details
            && matrix.is_failed()
        {
            write!(writer, ": {details}")?;
        }
        if let Some(link) = &matrix.web_link {
            write!(writer, " <{link}>")?;
        }
        writeln!(writer)
    }

    fn status_word(&self, matrix: &SavedMatrix) -> (&'static str, Style) {
        if matrix.canceled_by_user() {
            ("CANCELED", self.styles.fail)
        } else if matrix.infrastructure_fail() {
            ("INFRA", self.styles.fail)
        } else if matrix.incompatible_fail() {
            ("INCOMPAT", self.styles.fail)
        } else if !matrix.state.is_terminal() {
            ("WAITING", self.styles.skip)
        } else if matrix.is_failed() {
            ("FAIL", self.styles.fail)
        } else {
            match matrix.outcome {
                Some(MatrixOutcome::Skipped) => ("SKIP", self.styles.skip),
                Some(MatrixOutcome::Flaky) => ("FLAKY", self.styles.skip),
                _ => ("PASS", self.styles.pass),
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
struct Styles {
    count: Style,
    pass: Style,
    fail: Style,
    skip: Style,
}

impl Styles {
    fn colorize(&mut self) {
        self.count = Style::new().bold();
        self.pass = Style::new().green().bold();
        self.fail = Style::new().red().bold();
        self.skip = Style::new().yellow().bold();
    }
}
