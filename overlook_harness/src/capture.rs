// Copyright 2025 the Overlook Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The capture-and-compare seam.
//!
//! The harness never rasterizes or diffs images itself. It builds a
//! [`CaptureRequest`] per configuration and hands it, together with the view,
//! to a [`Capturer`].

use core::fmt;
use core::panic::Location;
use std::io;
use std::path::PathBuf;

use peniko::Color;

/// Where in the test source a capture was requested.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// Source file of the caller.
    pub file: &'static str,
    /// Line of the caller.
    pub line: u32,
}

impl SourceLocation {
    /// The location of the (tracked) caller.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        Location::caller().into()
    }
}

impl From<&'static Location<'static>> for SourceLocation {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Everything a [`Capturer`] needs to know about one capture.
#[derive(Clone, Debug)]
pub struct CaptureRequest<'a> {
    /// Identity of the running test.
    pub test_name: &'a str,
    /// Configuration label, for captures made as part of a sweep.
    pub label: Option<&'a str>,
    /// Free-form identifier distinguishing captures within one test.
    pub identifier: &'a str,
    /// Fraction of pixels, in `0.0..=1.0`, allowed to differ.
    pub tolerance: f32,
    /// Background the view is rendered over.
    pub background: Color,
    /// Source location failures are attributed to.
    pub location: SourceLocation,
}

impl CaptureRequest<'_> {
    /// The reference name: test identity, identifier and label joined by `_`.
    ///
    /// Empty identifiers and absent labels are left out.
    #[must_use]
    pub fn snapshot_name(&self) -> String {
        let mut name = String::from(self.test_name);
        for part in [Some(self.identifier), self.label].into_iter().flatten() {
            if !part.is_empty() {
                name.push('_');
                name.push_str(part);
            }
        }
        name
    }
}

/// Outcome of a successful capture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Comparison {
    /// The capture matched the reference within tolerance.
    Matched,
    /// The capture was written as the new reference.
    Recorded {
        /// Path of the written reference.
        reference: PathBuf,
    },
    /// The capture differs from the reference beyond tolerance.
    Mismatched {
        /// Number of differing pixels.
        different_pixels: u64,
        /// Number of pixels compared.
        total_pixels: u64,
        /// Diff artifact (usually the current image), if one was written.
        artifact: Option<PathBuf>,
    },
}

/// A capture that could not be compared at all.
#[derive(Debug)]
pub enum CaptureError {
    /// No reference exists and recording was not requested.
    MissingReference {
        /// Expected reference path.
        reference: PathBuf,
        /// Where the current output was written, if anywhere.
        current: Option<PathBuf>,
    },
    /// Reading or writing snapshot files failed.
    Io(io::Error),
    /// The rendering or diffing backend failed.
    Backend(Box<dyn core::error::Error + Send + Sync>),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingReference { reference, current } => {
                write!(f, "missing reference `{}`", reference.display())?;
                if let Some(current) = current {
                    write!(f, " (wrote current `{}`)", current.display())?;
                }
                Ok(())
            }
            Self::Io(err) => write!(f, "snapshot i/o failed: {err}"),
            Self::Backend(err) => write!(f, "capture backend failed: {err}"),
        }
    }
}

impl core::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::MissingReference { .. } => None,
            Self::Io(err) => Some(err),
            Self::Backend(err) => Some(err.as_ref()),
        }
    }
}

impl From<io::Error> for CaptureError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Renders a view and compares it against its reference.
pub trait Capturer<V: ?Sized> {
    /// Captures `view` as described by `request`.
    fn capture(
        &mut self,
        view: &V,
        request: &CaptureRequest<'_>,
    ) -> Result<Comparison, CaptureError>;
}

impl<V: ?Sized, C: Capturer<V> + ?Sized> Capturer<V> for &mut C {
    fn capture(
        &mut self,
        view: &V,
        request: &CaptureRequest<'_>,
    ) -> Result<Comparison, CaptureError> {
        (**self).capture(view, request)
    }
}
