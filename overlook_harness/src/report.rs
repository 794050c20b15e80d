// Copyright 2025 the Overlook Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Failure reporting.
//!
//! The harness reports every problem it finds through a [`Reporter`] and keeps
//! going, so a single call can surface failures for many configurations.

use core::fmt;

use crate::capture::SourceLocation;

/// What went wrong.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The capture differs from its reference.
    Mismatch,
    /// The capture collaborator could not compare (missing reference, i/o).
    Capture,
    /// A per-configuration setup callback failed.
    Setup,
    /// The view's layout is under- or over-constrained.
    AmbiguousLayout,
    /// The view lacks a capability the operation requires.
    MissingCapability,
    /// A presentation did not complete in time.
    PresentationTimeout,
}

impl FailureKind {
    /// Returns `true` for programmer errors, as opposed to per-configuration
    /// comparison problems.
    #[must_use]
    pub const fn is_hard(self) -> bool {
        matches!(self, Self::MissingCapability | Self::PresentationTimeout)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mismatch => "snapshot mismatch",
            Self::Capture => "capture failed",
            Self::Setup => "setup failed",
            Self::AmbiguousLayout => "ambiguous layout",
            Self::MissingCapability => "missing capability",
            Self::PresentationTimeout => "presentation timed out",
        })
    }
}

/// A single reported failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    /// Category of the failure.
    pub kind: FailureKind,
    /// Identity of the test that reported it.
    pub test_name: String,
    /// Configuration label, when the failure belongs to one configuration.
    pub label: Option<String>,
    /// Capture identifier, when one was set.
    pub identifier: Option<String>,
    /// Where the failing operation was called from.
    pub location: SourceLocation,
    /// Human-readable detail.
    pub message: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}", self.location, self.test_name)?;
        if let Some(identifier) = &self.identifier {
            write!(f, " {identifier}")?;
        }
        if let Some(label) = &self.label {
            write!(f, " @ {label}")?;
        }
        write!(f, "] {}: {}", self.kind, self.message)
    }
}

/// Receives failures without halting the enclosing test.
pub trait Reporter {
    /// Records `failure`.
    fn report(&mut self, failure: Failure);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, failure: Failure) {
        (**self).report(failure);
    }
}

/// A [`Reporter`] that collects failures for a final assertion.
#[derive(Clone, Debug, Default)]
pub struct FailureLog {
    failures: Vec<Failure>,
}

impl FailureLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All failures in report order.
    #[must_use]
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Returns `true` if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of reported failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Number of failures of `kind`.
    #[must_use]
    pub fn count(&self, kind: FailureKind) -> usize {
        self.failures.iter().filter(|f| f.kind == kind).count()
    }

    /// Drops all recorded failures.
    pub fn clear(&mut self) {
        self.failures.clear();
    }

    /// Panics listing every failure, if any were reported.
    #[track_caller]
    pub fn assert_clean(&self) {
        if self.failures.is_empty() {
            return;
        }

        eprintln!(
            "Snapshot failures (use `OVERLOOK_SNAPSHOT=accept` to bless; `cargo xtask report` to view diffs):"
        );
        for failure in &self.failures {
            eprintln!("  - {failure}");
        }
        panic!("snapshot failures: {}", self.failures.len());
    }
}

impl Reporter for FailureLog {
    fn report(&mut self, failure: Failure) {
        self.failures.push(failure);
    }
}
