// Copyright 2025 the Overlook Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The harness and its verification operations.

use core::fmt::Display;

use kurbo::{Insets, Point, Rect, Size};
use peniko::Color;
use tracing::{debug, info, warn};

use crate::capture::{CaptureRequest, Capturer, Comparison, SourceLocation};
use crate::config::HarnessConfig;
use crate::devices::{ConfigurationSet, DeviceScreen};
use crate::error::HarnessError;
use crate::presentation::{self, HOST_WINDOW_SIZE, HostWindow, Presentable, WaitOutcome};
use crate::report::{Failure, FailureKind, FailureLog, Reporter};
use crate::style::StyleContext;
use crate::view::{ColorSchemeVariant, View, without_animation};

/// Safe-area insets applied by [`Harness::verify_safe_areas`]: a status bar on
/// top and a home indicator at the bottom.
pub const SAFE_AREA_INSETS: Insets = Insets {
    x0: 0.0,
    y0: 44.0,
    x1: 0.0,
    y1: 34.0,
};

/// Frame size used by [`Harness::verify_safe_areas`].
pub const SAFE_AREA_SIZE: Size = DeviceScreen::IPHONE_5_8_INCH;

/// Options for a single capture.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VerifyOptions<'a> {
    /// Run a second layout pass before capturing, for views whose layout
    /// depends on a previous pass.
    pub extra_layout_pass: bool,
    /// Identifier distinguishing captures within one test.
    pub identifier: &'a str,
    /// Fraction of pixels, in `0.0..=1.0`, allowed to differ.
    pub tolerance: f32,
    /// Configuration label to attach.
    pub label: Option<&'a str>,
}

impl<'a> VerifyOptions<'a> {
    /// Options for a plain capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identifier.
    #[must_use]
    pub fn identifier(mut self, identifier: &'a str) -> Self {
        self.identifier = identifier;
        self
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the configuration label.
    #[must_use]
    pub fn label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// Requests a second layout pass.
    #[must_use]
    pub fn extra_layout_pass(mut self, extra_layout_pass: bool) -> Self {
        self.extra_layout_pass = extra_layout_pass;
        self
    }
}

type Setup<'s, V> = &'s mut dyn FnMut(&mut V, bool) -> Result<(), String>;

/// Drives views through sizes, widths and color schemes and captures each one.
///
/// A harness belongs to one test. It owns the [`Capturer`] that renders and
/// compares, the [`Reporter`] failures go to, and the [`StyleContext`] shared
/// with the views under test.
///
/// Every operation is synchronous and attributes failures to the line that
/// called it. Snapshot mismatches are reported and never stop a sweep.
///
/// # Example
///
/// ```rust
/// use kurbo::Rect;
/// use overlook_harness::{
///     CaptureError, CaptureRequest, Capturer, Comparison, DeviceScreen, Harness, View,
/// };
///
/// struct Banner {
///     frame: Rect,
/// }
///
/// impl View for Banner {
///     fn frame(&self) -> Rect {
///         self.frame
///     }
///     fn set_frame(&mut self, frame: Rect) {
///         self.frame = frame;
///     }
///     fn layout_if_needed(&mut self) {}
/// }
///
/// /// Accepts everything and remembers what it saw.
/// #[derive(Default)]
/// struct Seen(Vec<String>);
///
/// impl Capturer<Banner> for Seen {
///     fn capture(
///         &mut self,
///         _view: &Banner,
///         request: &CaptureRequest<'_>,
///     ) -> Result<Comparison, CaptureError> {
///         self.0.push(request.snapshot_name());
///         Ok(Comparison::Matched)
///     }
/// }
///
/// let mut harness = Harness::new("banner", Seen::default());
/// let mut banner = Banner { frame: Rect::ZERO };
///
/// harness.verify_in_all_device_sizes(&mut banner, false);
///
/// assert_eq!(harness.capturer().0.len(), DeviceScreen::device_sizes().len());
/// harness.reporter().assert_clean();
/// ```
#[derive(Debug)]
pub struct Harness<C, R = FailureLog> {
    test_name: String,
    capturer: C,
    reporter: R,
    style: StyleContext,
    config: HarnessConfig,
    background: Color,
}

impl<C> Harness<C, FailureLog> {
    /// Creates a harness for `test_name` that collects failures in a [`FailureLog`].
    pub fn new(test_name: impl Into<String>, capturer: C) -> Self {
        Self::with_reporter(test_name, capturer, FailureLog::new())
    }
}

impl<C, R: Reporter> Harness<C, R> {
    /// Creates a harness reporting to `reporter`.
    pub fn with_reporter(test_name: impl Into<String>, capturer: C, reporter: R) -> Self {
        Self {
            test_name: test_name.into(),
            capturer,
            reporter,
            style: StyleContext::new(),
            config: HarnessConfig::default(),
            background: Color::WHITE,
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: HarnessConfig) -> Self {
        self.config = config;
        self
    }

    /// Shares `style` with the harness instead of a private context.
    #[must_use]
    pub fn with_style(mut self, style: StyleContext) -> Self {
        self.style = style;
        self
    }

    /// Identity of the test this harness belongs to.
    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    /// The active configuration.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// The shared style context.
    pub fn style(&self) -> &StyleContext {
        &self.style
    }

    /// The capture collaborator.
    pub fn capturer(&self) -> &C {
        &self.capturer
    }

    /// The capture collaborator, mutably.
    pub fn capturer_mut(&mut self) -> &mut C {
        &mut self.capturer
    }

    /// The reporting collaborator.
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// The reporting collaborator, mutably.
    pub fn reporter_mut(&mut self) -> &mut R {
        &mut self.reporter
    }

    /// Splits the harness into its capturer and reporter.
    pub fn into_parts(self) -> (C, R) {
        (self.capturer, self.reporter)
    }

    /// Background views are captured over.
    pub fn background(&self) -> Color {
        self.background
    }

    /// Sets the background views are captured over.
    pub fn set_background(&mut self, background: Color) {
        self.background = background;
    }

    /// Restores the shared style context to its defaults.
    ///
    /// Call this from every test that changes the color scheme or cached text
    /// styles, so the change does not leak into the next test. Calling it
    /// again has no further effect.
    pub fn reset_style_state(&mut self) {
        debug!(test = %self.test_name, "resetting style state");
        self.style.reset();
    }

    /// Captures `view` once.
    #[track_caller]
    pub fn verify<V>(&mut self, view: &mut V, options: VerifyOptions<'_>)
    where
        V: View + ?Sized,
        C: Capturer<V>,
    {
        let location = SourceLocation::caller();
        if let Some(label) = options.label
            && self.skips(label)
        {
            return;
        }
        self.capture_at(view, &options, location);
    }

    /// Captures `view` at every size in `sizes`.
    ///
    /// Every configuration is attempted even when earlier ones fail.
    #[track_caller]
    pub fn verify_across_sizes<V>(
        &mut self,
        view: &mut V,
        sizes: &ConfigurationSet<Size>,
        extra_layout_pass: bool,
    ) where
        V: View + ?Sized,
        C: Capturer<V>,
    {
        let location = SourceLocation::caller();
        self.sweep_sizes(view, sizes, extra_layout_pass, None, location);
    }

    /// Like [`verify_across_sizes`](Self::verify_across_sizes), calling
    /// `setup` before each capture.
    ///
    /// `setup` receives the resized view and whether the size is a registered
    /// tablet size, and runs with implicit animations disabled. If it fails,
    /// the failure is reported against that configuration's label and its
    /// capture is skipped.
    #[track_caller]
    pub fn verify_across_sizes_with<V, F, E>(
        &mut self,
        view: &mut V,
        sizes: &ConfigurationSet<Size>,
        extra_layout_pass: bool,
        mut setup: F,
    ) where
        V: View + ?Sized,
        C: Capturer<V>,
        F: FnMut(&mut V, bool) -> Result<(), E>,
        E: Display,
    {
        let location = SourceLocation::caller();
        let mut setup = |view: &mut V, is_tablet: bool| {
            setup(view, is_tablet).map_err(|err| err.to_string())
        };
        self.sweep_sizes(view, sizes, extra_layout_pass, Some(&mut setup), location);
    }

    /// Captures `view` at every phone size.
    #[track_caller]
    pub fn verify_in_all_phone_sizes<V>(&mut self, view: &mut V, extra_layout_pass: bool)
    where
        V: View + ?Sized,
        C: Capturer<V>,
    {
        let location = SourceLocation::caller();
        let sizes = DeviceScreen::phone_sizes();
        self.sweep_sizes(view, &sizes, extra_layout_pass, None, location);
    }

    /// Captures `view` at every phone size, calling `setup` before each capture.
    #[track_caller]
    pub fn verify_in_all_phone_sizes_with<V, F, E>(
        &mut self,
        view: &mut V,
        extra_layout_pass: bool,
        mut setup: F,
    ) where
        V: View + ?Sized,
        C: Capturer<V>,
        F: FnMut(&mut V) -> Result<(), E>,
        E: Display,
    {
        let location = SourceLocation::caller();
        let sizes = DeviceScreen::phone_sizes();
        let mut setup = |view: &mut V, _is_tablet: bool| setup(view).map_err(|err| err.to_string());
        self.sweep_sizes(view, &sizes, extra_layout_pass, Some(&mut setup), location);
    }

    /// Captures `view` at every phone and tablet size.
    ///
    /// Only meaningful for views that are presented full screen.
    #[track_caller]
    pub fn verify_in_all_device_sizes<V>(&mut self, view: &mut V, extra_layout_pass: bool)
    where
        V: View + ?Sized,
        C: Capturer<V>,
    {
        let location = SourceLocation::caller();
        let sizes = DeviceScreen::device_sizes();
        self.sweep_sizes(view, &sizes, extra_layout_pass, None, location);
    }

    /// Captures `view` at every phone and tablet size, calling `setup` before
    /// each capture with whether the size is a tablet.
    #[track_caller]
    pub fn verify_in_all_device_sizes_with<V, F, E>(
        &mut self,
        view: &mut V,
        extra_layout_pass: bool,
        mut setup: F,
    ) where
        V: View + ?Sized,
        C: Capturer<V>,
        F: FnMut(&mut V, bool) -> Result<(), E>,
        E: Display,
    {
        let location = SourceLocation::caller();
        let sizes = DeviceScreen::device_sizes();
        let mut setup = |view: &mut V, is_tablet: bool| {
            setup(view, is_tablet).map_err(|err| err.to_string())
        };
        self.sweep_sizes(view, &sizes, extra_layout_pass, Some(&mut setup), location);
    }

    /// Captures `view` at every width in `widths`, at its fitting height.
    ///
    /// The view's current layout is checked for ambiguity once, before any
    /// width is applied.
    #[track_caller]
    pub fn verify_across_widths<V>(
        &mut self,
        view: &mut V,
        widths: &ConfigurationSet<f64>,
        tolerance: f32,
        extra_layout_pass: bool,
    ) where
        V: View + ?Sized,
        C: Capturer<V>,
    {
        let location = SourceLocation::caller();
        self.sweep_widths(view, widths, tolerance, extra_layout_pass, location);
    }

    /// Captures `view` at every distinct phone width.
    #[track_caller]
    pub fn verify_in_all_phone_widths<V>(
        &mut self,
        view: &mut V,
        tolerance: f32,
        extra_layout_pass: bool,
    ) where
        V: View + ?Sized,
        C: Capturer<V>,
    {
        let location = SourceLocation::caller();
        let widths = DeviceScreen::phone_widths();
        self.sweep_widths(view, &widths, tolerance, extra_layout_pass, location);
    }

    /// Captures `view` at every tablet width.
    #[track_caller]
    pub fn verify_in_all_tablet_widths<V>(
        &mut self,
        view: &mut V,
        tolerance: f32,
        extra_layout_pass: bool,
    ) where
        V: View + ?Sized,
        C: Capturer<V>,
    {
        let location = SourceLocation::caller();
        let widths = DeviceScreen::tablet_widths();
        self.sweep_widths(view, &widths, tolerance, extra_layout_pass, location);
    }

    /// Captures `view` in the light and then the dark color scheme.
    ///
    /// The captures use the identifiers `"LightTheme"` and `"DarkTheme"` and
    /// are rendered over white and black respectively. The harness background
    /// is restored afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::MissingCapability`] (after reporting it) if the
    /// view is not [`Themeable`](crate::Themeable). Nothing is captured then.
    #[track_caller]
    pub fn verify_theme_variants<V>(&mut self, view: &mut V, tolerance: f32) -> Result<(), HarnessError>
    where
        V: View + ?Sized,
        C: Capturer<V>,
    {
        let location = SourceLocation::caller();
        if view.themeable().is_none() {
            let err = HarnessError::MissingCapability {
                capability: "Themeable",
            };
            self.report(
                FailureKind::MissingCapability,
                None,
                None,
                location,
                err.to_string(),
            );
            return Err(err);
        }

        let previous_background = self.background;
        for variant in ColorSchemeVariant::ALL {
            if let Some(themeable) = view.themeable() {
                themeable.set_color_scheme_variant(variant);
            }
            self.background = variant.background();
            view.set_needs_layout();
            let options = VerifyOptions::new()
                .identifier(variant.snapshot_identifier())
                .tolerance(tolerance);
            self.capture_at(view, &options, location);
        }
        self.background = previous_background;
        Ok(())
    }

    /// Presents `presentable` on a throwaway host window and captures it once
    /// the presentation completes.
    ///
    /// Blocks for at most [`HarnessConfig::presentation_timeout`].
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::PresentationTimeout`] or
    /// [`HarnessError::PresentationAbandoned`] (after reporting it) if the
    /// completion is not observed. Nothing is captured then.
    #[track_caller]
    pub fn verify_transient_presentation<P>(&mut self, presentable: &mut P) -> Result<(), HarnessError>
    where
        P: Presentable + ?Sized,
        C: Capturer<P>,
    {
        let location = SourceLocation::caller();
        let mut host = HostWindow::new(HOST_WINDOW_SIZE);
        host.make_key_and_visible();
        presentable.set_needs_layout();
        presentable.layout_if_needed();

        let (completion, pending) = presentation::completion();
        presentable.present(&mut host, completion);

        let timeout = self.config.presentation_timeout;
        let outcome = pending.wait(timeout, self.config.pump_interval, || {
            presentable.pump_events();
        });
        let err = match outcome {
            WaitOutcome::Presented => {
                debug!(test = %self.test_name, "presentation completed");
                self.capture_at(presentable, &VerifyOptions::new(), location);
                return Ok(());
            }
            WaitOutcome::TimedOut => HarnessError::PresentationTimeout { timeout },
            WaitOutcome::Abandoned => HarnessError::PresentationAbandoned,
        };
        self.report(
            FailureKind::PresentationTimeout,
            None,
            None,
            location,
            err.to_string(),
        );
        Err(err)
    }

    /// Captures `view` at the smallest supported phone size.
    #[track_caller]
    pub fn verify_in_phone_size<V>(&mut self, view: &mut V)
    where
        V: View + ?Sized,
        C: Capturer<V>,
    {
        let location = SourceLocation::caller();
        view.set_frame(Rect::from_origin_size(Point::ORIGIN, DeviceScreen::DEFAULT_PHONE));
        view.set_needs_layout();
        view.layout_if_needed();
        self.capture_at(view, &VerifyOptions::new(), location);
    }

    /// Captures `view` with [`SAFE_AREA_INSETS`] applied at [`SAFE_AREA_SIZE`].
    #[track_caller]
    pub fn verify_safe_areas<V>(&mut self, view: &mut V, tolerance: f32)
    where
        V: View + ?Sized,
        C: Capturer<V>,
    {
        let location = SourceLocation::caller();
        view.set_safe_area_insets(SAFE_AREA_INSETS);
        view.set_frame(Rect::from_origin_size(Point::ORIGIN, SAFE_AREA_SIZE));
        self.capture_at(view, &VerifyOptions::new().tolerance(tolerance), location);
    }

    fn sweep_sizes<V>(
        &mut self,
        view: &mut V,
        sizes: &ConfigurationSet<Size>,
        extra_layout_pass: bool,
        mut setup: Option<Setup<'_, V>>,
        location: SourceLocation,
    ) where
        V: View + ?Sized,
        C: Capturer<V>,
    {
        for (label, size) in sizes.iter() {
            if self.skips(label) {
                continue;
            }
            debug!(test = %self.test_name, label, ?size, "applying size");
            view.set_frame(Rect::from_origin_size(Point::ORIGIN, *size));

            if let Some(setup) = setup.as_mut() {
                let is_tablet = self.config.tablet_sizes.contains_value(size);
                if let Err(message) = without_animation(view, |view| setup(view, is_tablet)) {
                    self.report(FailureKind::Setup, Some(label), None, location, message);
                    continue;
                }
            }

            let options = VerifyOptions::new()
                .label(label)
                .extra_layout_pass(extra_layout_pass);
            self.capture_at(view, &options, location);
        }
    }

    fn sweep_widths<V>(
        &mut self,
        view: &mut V,
        widths: &ConfigurationSet<f64>,
        tolerance: f32,
        extra_layout_pass: bool,
        location: SourceLocation,
    ) where
        V: View + ?Sized,
        C: Capturer<V>,
    {
        if let Some(ambiguity) = view.layout_ambiguity() {
            self.report(
                FailureKind::AmbiguousLayout,
                None,
                None,
                location,
                ambiguity.to_string(),
            );
        }

        for (label, width) in widths.iter() {
            if self.skips(label) {
                continue;
            }
            let height = view.fitting_size(*width).height;
            debug!(test = %self.test_name, label, width, height, "applying width");
            view.set_frame(Rect::new(0.0, 0.0, *width, height));

            let options = VerifyOptions::new()
                .label(label)
                .tolerance(tolerance)
                .extra_layout_pass(extra_layout_pass);
            self.capture_at(view, &options, location);
        }
    }

    fn capture_at<V>(&mut self, view: &mut V, options: &VerifyOptions<'_>, location: SourceLocation)
    where
        V: View + ?Sized,
        C: Capturer<V>,
    {
        view.layout_if_needed();
        if options.extra_layout_pass {
            view.set_needs_layout();
            view.layout_if_needed();
        }

        let request = CaptureRequest {
            test_name: &self.test_name,
            label: options.label,
            identifier: options.identifier,
            tolerance: options.tolerance,
            background: self.background,
            location,
        };
        let name = request.snapshot_name();
        debug!(snapshot = %name, "capturing");

        let identifier = (!options.identifier.is_empty()).then_some(options.identifier);
        match self.capturer.capture(view, &request) {
            Ok(Comparison::Matched) => {}
            Ok(Comparison::Recorded { reference }) => {
                info!(snapshot = %name, reference = %reference.display(), "recorded reference");
            }
            Ok(Comparison::Mismatched {
                different_pixels,
                total_pixels,
                artifact,
            }) => {
                let mut message = format!("{different_pixels} of {total_pixels} pixels differ");
                if let Some(artifact) = artifact {
                    message.push_str(&format!(" (wrote `{}`)", artifact.display()));
                }
                self.report(FailureKind::Mismatch, options.label, identifier, location, message);
            }
            Err(err) => {
                self.report(
                    FailureKind::Capture,
                    options.label,
                    identifier,
                    location,
                    err.to_string(),
                );
            }
        }
    }

    fn skips(&self, label: &str) -> bool {
        let skip = !self.config.selects(label);
        if skip {
            debug!(test = %self.test_name, label, "configuration filtered out");
        }
        skip
    }

    fn report(
        &mut self,
        kind: FailureKind,
        label: Option<&str>,
        identifier: Option<&str>,
        location: SourceLocation,
        message: String,
    ) {
        let failure = Failure {
            kind,
            test_name: self.test_name.clone(),
            label: label.map(ToOwned::to_owned),
            identifier: identifier.map(ToOwned::to_owned),
            location,
            message,
        };
        warn!(%failure, "snapshot failure");
        self.reporter.report(failure);
    }
}
