// Copyright (c) The skylab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracked state for a batch of remote test matrices.

mod map;
mod saved;
mod state;

pub use map::*;
pub use saved::*;
pub use state::*;
