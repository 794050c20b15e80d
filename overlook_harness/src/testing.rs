// Copyright 2025 the Overlook Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles for the harness's own unit tests.

use core::cell::Cell;

use kurbo::{Insets, Rect, Size};
use peniko::color::Rgba8;

use crate::capture::{CaptureError, CaptureRequest, Capturer, Comparison};
use crate::presentation::{Completion, HostWindow, Presentable};
use crate::view::{ColorSchemeVariant, LayoutAmbiguity, Themeable, View};

/// A view that records what the harness does to it.
#[derive(Debug)]
pub(crate) struct MockView {
    pub(crate) frame: Rect,
    pub(crate) needs_layout: bool,
    pub(crate) layout_passes: u32,
    pub(crate) animations_enabled: bool,
    pub(crate) theme: Option<ColorSchemeVariant>,
    pub(crate) safe_area: Insets,
    pub(crate) fitting_height: Option<f64>,
    pub(crate) ambiguous: bool,
    pub(crate) ambiguity_checks: Cell<u32>,
}

impl MockView {
    pub(crate) fn new(size: Size) -> Self {
        Self {
            frame: Rect::from_origin_size((0.0, 0.0), size),
            needs_layout: true,
            layout_passes: 0,
            animations_enabled: true,
            theme: None,
            safe_area: Insets::ZERO,
            fitting_height: None,
            ambiguous: false,
            ambiguity_checks: Cell::new(0),
        }
    }

    pub(crate) fn with_theme(mut self) -> Self {
        self.theme = Some(ColorSchemeVariant::default());
        self
    }

    pub(crate) fn with_fitting_height(mut self, height: f64) -> Self {
        self.fitting_height = Some(height);
        self
    }

    pub(crate) fn with_ambiguity(mut self) -> Self {
        self.ambiguous = true;
        self
    }
}

impl Themeable for MockView {
    fn color_scheme_variant(&self) -> ColorSchemeVariant {
        self.theme.unwrap_or_default()
    }

    fn set_color_scheme_variant(&mut self, variant: ColorSchemeVariant) {
        self.theme = Some(variant);
        self.needs_layout = true;
    }
}

impl View for MockView {
    fn frame(&self) -> Rect {
        self.frame
    }

    fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
        self.needs_layout = true;
    }

    fn set_needs_layout(&mut self) {
        self.needs_layout = true;
    }

    fn layout_if_needed(&mut self) {
        if self.needs_layout {
            self.layout_passes += 1;
            self.needs_layout = false;
        }
    }

    fn fitting_size(&self, width: f64) -> Size {
        Size::new(width, self.fitting_height.unwrap_or(self.frame.height()))
    }

    fn layout_ambiguity(&self) -> Option<LayoutAmbiguity> {
        self.ambiguity_checks.set(self.ambiguity_checks.get() + 1);
        self.ambiguous.then(|| LayoutAmbiguity::UnderConstrained {
            detail: "missing height constraint".into(),
        })
    }

    fn themeable(&mut self) -> Option<&mut dyn Themeable> {
        if self.theme.is_some() {
            Some(self)
        } else {
            None
        }
    }

    fn set_animations_enabled(&mut self, enabled: bool) {
        self.animations_enabled = enabled;
    }

    fn set_safe_area_insets(&mut self, insets: Insets) {
        self.safe_area = insets;
    }
}

/// A presentable that completes after a number of event pumps, never, or
/// drops its completion outright.
#[derive(Debug)]
pub(crate) struct MockAlert {
    frame: Rect,
    complete_after_pumps: Option<u32>,
    drops_completion: bool,
    pumps: u32,
    completion: Option<Completion>,
    pub(crate) presented_on_key_window: bool,
}

impl MockAlert {
    pub(crate) fn completing_after_pumps(pumps: u32) -> Self {
        Self {
            frame: Rect::ZERO,
            complete_after_pumps: Some(pumps),
            drops_completion: false,
            pumps: 0,
            completion: None,
            presented_on_key_window: false,
        }
    }

    pub(crate) fn never_completing() -> Self {
        Self {
            complete_after_pumps: None,
            ..Self::completing_after_pumps(0)
        }
    }

    pub(crate) fn dropping_completion() -> Self {
        Self {
            drops_completion: true,
            ..Self::never_completing()
        }
    }

    fn maybe_complete(&mut self) {
        if self.complete_after_pumps.is_some_and(|after| self.pumps >= after)
            && let Some(completion) = self.completion.take()
        {
            completion.fulfill();
        }
    }
}

impl View for MockAlert {
    fn frame(&self) -> Rect {
        self.frame
    }

    fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    fn layout_if_needed(&mut self) {}
}

impl Presentable for MockAlert {
    fn present(&mut self, host: &mut HostWindow, completion: Completion) {
        self.presented_on_key_window = host.is_key();
        self.frame = host.frame();
        if self.drops_completion {
            drop(completion);
            return;
        }
        self.completion = Some(completion);
        self.maybe_complete();
    }

    fn pump_events(&mut self) {
        self.pumps += 1;
        self.maybe_complete();
    }
}

/// What a [`RecordingCapturer`] saw for one capture.
#[derive(Clone, Debug)]
pub(crate) struct RecordedCapture {
    pub(crate) label: Option<String>,
    pub(crate) identifier: String,
    pub(crate) tolerance: f32,
    pub(crate) background: Rgba8,
    pub(crate) frame: Rect,
    pub(crate) theme: Option<ColorSchemeVariant>,
    pub(crate) layout_passes: u32,
}

/// A capturer that records requests and fails on demand.
#[derive(Debug, Default)]
pub(crate) struct RecordingCapturer {
    pub(crate) captures: Vec<RecordedCapture>,
    pub(crate) mismatch_labels: Vec<String>,
    pub(crate) fail_all: bool,
}

impl RecordingCapturer {
    fn record(
        &mut self,
        request: &CaptureRequest<'_>,
        frame: Rect,
        theme: Option<ColorSchemeVariant>,
        layout_passes: u32,
    ) -> Result<Comparison, CaptureError> {
        self.captures.push(RecordedCapture {
            label: request.label.map(ToOwned::to_owned),
            identifier: request.identifier.to_owned(),
            tolerance: request.tolerance,
            background: request.background.to_rgba8(),
            frame,
            theme,
            layout_passes,
        });

        if self.fail_all {
            return Err(CaptureError::MissingReference {
                reference: format!("{}.png", request.snapshot_name()).into(),
                current: None,
            });
        }
        let mismatched = request
            .label
            .is_some_and(|label| self.mismatch_labels.iter().any(|l| l == label));
        if mismatched {
            return Ok(Comparison::Mismatched {
                different_pixels: 3,
                total_pixels: 100,
                artifact: None,
            });
        }
        Ok(Comparison::Matched)
    }
}

impl Capturer<MockView> for RecordingCapturer {
    fn capture(
        &mut self,
        view: &MockView,
        request: &CaptureRequest<'_>,
    ) -> Result<Comparison, CaptureError> {
        self.record(request, view.frame, view.theme, view.layout_passes)
    }
}

impl Capturer<MockAlert> for RecordingCapturer {
    fn capture(
        &mut self,
        view: &MockAlert,
        request: &CaptureRequest<'_>,
    ) -> Result<Comparison, CaptureError> {
        self.record(request, view.frame, None, 0)
    }
}
