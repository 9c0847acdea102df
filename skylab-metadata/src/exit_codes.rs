// Copyright (c) The skylab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `skylab` failures.
///
/// `skylab` runs may fail for a variety of reasons. This structure documents the exit codes
/// that may occur in case of expected failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum SkylabExitCode {}

impl SkylabExitCode {
    /// No errors occurred and skylab exited normally.
    pub const OK: i32 = 0;

    /// One or more matrices finished with failing tests.
    ///
    /// Not produced when failures are ignored via `--ignore-failed`; the failures are still
    /// reported, but skylab exits with [`OK`](Self::OK).
    pub const TEST_RUN_FAILED: i32 = 100;

    /// A matrix was canceled by the user before it finished.
    pub const MATRIX_CANCELED: i32 = 101;

    /// The cloud service reported an infrastructure failure.
    pub const INFRASTRUCTURE_FAILURE: i32 = 102;

    /// A matrix requested a device/API dimension the service cannot run.
    pub const INCOMPATIBLE_TEST_DIMENSION: i32 = 103;

    /// Polling stopped before every matrix reached a terminal finished state.
    pub const UNEXPECTED_MATRIX_STATE: i32 = 104;

    /// A user issue happened while setting up a skylab invocation.
    pub const SETUP_ERROR: i32 = 96;

    /// Writing data to stdout or stderr produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
