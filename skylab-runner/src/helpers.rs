// Copyright (c) The skylab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Utilities for pluralizing various words based on count or plurality.
pub(crate) mod plural {
    /// Returns "matrices" if `count` is plural, otherwise "matrix".
    pub(crate) fn matrices_str(count: usize) -> &'static str {
        if count == 1 { "matrix" } else { "matrices" }
    }

    /// Returns "were" if `count` is plural, otherwise "was".
    pub(crate) fn were_str(count: usize) -> &'static str {
        if count == 1 { "was" } else { "were" }
    }
}
