// Copyright 2025 the Overlook Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors for programmer mistakes in harness usage.

use core::fmt;
use core::time::Duration;

/// A harness operation could not run as requested.
///
/// These are returned in addition to being reported, so callers can stop a
/// test early with `?`. Snapshot mismatches are never returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HarnessError {
    /// The view does not implement a required capability.
    MissingCapability {
        /// Name of the capability.
        capability: &'static str,
    },
    /// A presentation completion was not observed in time.
    PresentationTimeout {
        /// How long the harness waited.
        timeout: Duration,
    },
    /// A presentation completion was dropped without firing.
    PresentationAbandoned,
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCapability { capability } => {
                write!(f, "view doesn't support the {capability} capability")
            }
            Self::PresentationTimeout { timeout } => {
                write!(f, "presentation did not complete within {timeout:?}")
            }
            Self::PresentationAbandoned => {
                f.write_str("presentation completion was dropped without being fulfilled")
            }
        }
    }
}

impl core::error::Error for HarnessError {}
