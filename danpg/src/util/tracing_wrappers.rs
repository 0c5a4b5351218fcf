// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Logging macros that compile to nothing unless the `tracing` feature is
//! enabled. Modules import everything with `use crate::util::tracing_wrappers::*`.

#[cfg(feature = "tracing")]
#[allow(unused_imports)]
pub use tracing::{debug, error, info, instrument, trace, warn};

#[cfg(not(feature = "tracing"))]
#[allow(unused_imports)]
pub use danpg_macros::noop as instrument;

// Expands to the unit expression so that a log call can stand in any
// expression position, e.g. as a match arm.
#[cfg(not(feature = "tracing"))]
macro_rules! log_noop {
    ($($arg:tt)*) => {
        ()
    };
}

// A `macro_rules! warn` would be ambiguous with the built-in `#[warn]`
// attribute, so every name is an alias.
#[cfg(not(feature = "tracing"))]
#[allow(unused_imports)]
pub(crate) use {
    log_noop as debug, log_noop as error, log_noop as info, log_noop as trace, log_noop as warn,
};
