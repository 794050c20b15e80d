// Copyright 2025 the Overlook Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=overlook_harness --heading-base-level=0

//! Overlook Harness: a toolkit-agnostic visual regression harness.
//!
//! Overlook renders a view under many named configurations (device screen
//! sizes, widths, light and dark color schemes) and compares each rendering
//! against a reference image. The harness itself only orchestrates: it applies
//! a configuration, lets layout settle, and hands the view to a capture
//! collaborator, keyed by test identity and configuration label.
//!
//! ## Seams
//!
//! - [`View`]: frame and layout control over the view under test, plus
//!   optional capabilities such as [`Themeable`].
//! - [`Capturer`]: renders a view and compares it with its reference.
//!   `overlook_snapshot` provides a Kompari-backed implementation.
//! - [`Reporter`]: receives [`Failure`]s without stopping the test.
//!   [`FailureLog`] collects them for a final [`FailureLog::assert_clean`].
//! - [`Presentable`]: views shown by presenting them on a host window, with an
//!   asynchronous [`Completion`].
//!
//! ## API overview
//!
//! - [`Harness::verify`]: one capture.
//! - [`Harness::verify_across_sizes`] and the phone/device variants: one
//!   capture per [`DeviceScreen`] size, with an optional per-size setup.
//! - [`Harness::verify_across_widths`] and the phone/tablet variants: one
//!   capture per width at the view's fitting height, after a single
//!   ambiguous-layout check.
//! - [`Harness::verify_theme_variants`]: light then dark.
//! - [`Harness::verify_transient_presentation`]: present, wait for completion
//!   with a timeout, capture.
//! - [`Harness::reset_style_state`]: restore the shared [`StyleContext`].
//!
//! ## Failures
//!
//! Snapshot mismatches are reported and never interrupt a sweep, so one call
//! surfaces every failing configuration. Each [`Failure`] carries the test
//! identity, the configuration label, and the caller's source location.
//! Programmer errors (a view without a required capability, a presentation
//! that never completes) are reported and also returned as [`HarnessError`].
//!
//! ## Configuration
//!
//! [`HarnessConfig::from_env`] honors `OVERLOOK_SNAPSHOT_CASE`, a comma or
//! whitespace separated list of label globs, to run a subset of
//! configurations:
//!
//! - `OVERLOOK_SNAPSHOT_CASE='iPad*' cargo test`
//!
//! Configurations iterate in label order, so runs are reproducible.

mod capture;
mod config;
mod devices;
mod error;
mod harness;
mod presentation;
mod report;
mod style;
mod view;

#[cfg(test)]
mod testing;

pub use capture::{CaptureError, CaptureRequest, Capturer, Comparison, SourceLocation};
pub use config::{
    CASE_FILTER_ENV, DEFAULT_PRESENTATION_TIMEOUT, DEFAULT_PUMP_INTERVAL, HarnessConfig,
};
pub use devices::{ConfigurationSet, DeviceScreen};
pub use error::HarnessError;
pub use harness::{Harness, SAFE_AREA_INSETS, SAFE_AREA_SIZE, VerifyOptions};
pub use presentation::{Completion, HOST_WINDOW_SIZE, HostWindow, Presentable};
pub use report::{Failure, FailureKind, FailureLog, Reporter};
pub use style::{StyleContext, TextStyle};
pub use view::{
    ColorSchemeVariant, LayoutAmbiguity, SingleRowHost, Themeable, View, without_animation,
};
