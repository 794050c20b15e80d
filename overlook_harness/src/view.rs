// Copyright 2025 the Overlook Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The view abstraction the harness drives, and its optional capabilities.

use core::fmt;

use kurbo::{Insets, Point, Rect, Size};
use peniko::Color;

/// A light or dark color scheme.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorSchemeVariant {
    /// Dark content on a light background.
    #[default]
    Light,
    /// Light content on a dark background.
    Dark,
}

impl ColorSchemeVariant {
    /// Both variants, in the order they are captured.
    pub const ALL: [Self; 2] = [Self::Light, Self::Dark];

    /// The background a snapshot of this variant is expected to show.
    #[must_use]
    pub const fn background(self) -> Color {
        match self {
            Self::Light => Color::WHITE,
            Self::Dark => Color::BLACK,
        }
    }

    /// The snapshot identifier used for captures of this variant.
    #[must_use]
    pub const fn snapshot_identifier(self) -> &'static str {
        match self {
            Self::Light => "LightTheme",
            Self::Dark => "DarkTheme",
        }
    }
}

/// A view whose color scheme can be switched between light and dark.
pub trait Themeable {
    /// The variant currently applied.
    fn color_scheme_variant(&self) -> ColorSchemeVariant;

    /// Applies `variant` to the view.
    fn set_color_scheme_variant(&mut self, variant: ColorSchemeVariant);
}

/// A layout-constraint state with no unique solution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutAmbiguity {
    /// Not enough constraints to determine a frame.
    UnderConstrained {
        /// Toolkit-provided description of the offending constraints.
        detail: String,
    },
    /// Conflicting constraints.
    OverConstrained {
        /// Toolkit-provided description of the offending constraints.
        detail: String,
    },
}

impl fmt::Display for LayoutAmbiguity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnderConstrained { detail } => write!(f, "layout is under-constrained: {detail}"),
            Self::OverConstrained { detail } => write!(f, "layout is over-constrained: {detail}"),
        }
    }
}

/// A renderable view under test.
///
/// This is the seam between the harness and a UI toolkit. Only frame
/// management and layout are required; everything else has a default that
/// matches a view without the corresponding capability.
pub trait View {
    /// The view's frame in its parent's coordinates.
    fn frame(&self) -> Rect;

    /// Replaces the view's frame. Implementations should mark layout as needed.
    fn set_frame(&mut self, frame: Rect);

    /// Invalidates the current layout so the next
    /// [`layout_if_needed`](Self::layout_if_needed) recomputes it.
    fn set_needs_layout(&mut self) {}

    /// Runs any pending layout until the view settles.
    fn layout_if_needed(&mut self);

    /// The size the view wants when constrained to `width`.
    ///
    /// The default keeps the current height.
    fn fitting_size(&self, width: f64) -> Size {
        Size::new(width, self.frame().height())
    }

    /// Reports a constraint problem in the view's current layout, if any.
    fn layout_ambiguity(&self) -> Option<LayoutAmbiguity> {
        None
    }

    /// The light/dark theming capability, for views that have one.
    fn themeable(&mut self) -> Option<&mut dyn Themeable> {
        None
    }

    /// Enables or disables implicit animations of property changes.
    fn set_animations_enabled(&mut self, _enabled: bool) {}

    /// Applies additional safe-area insets.
    fn set_safe_area_insets(&mut self, _insets: Insets) {}
}

/// Runs `f` with implicit animations disabled on `view`, then re-enables them.
///
/// Animations are re-enabled even if `f` panics.
pub fn without_animation<V, R>(view: &mut V, f: impl FnOnce(&mut V) -> R) -> R
where
    V: View + ?Sized,
{
    view.set_animations_enabled(false);
    let mut guard = AnimationsRestored(view);
    f(&mut *guard.0)
}

/// Re-enables animations on drop.
struct AnimationsRestored<'a, V: View + ?Sized>(&'a mut V);

impl<V: View + ?Sized> Drop for AnimationsRestored<'_, V> {
    fn drop(&mut self) {
        self.0.set_animations_enabled(true);
    }
}

/// Hosts a single self-sizing row.
///
/// The row is sized to its fitting height at the host's width, so views that
/// are normally shown as list rows can be captured at their natural height.
/// The host's own fitting size is the row's.
#[derive(Clone, Debug)]
pub struct SingleRowHost<V> {
    row: V,
    frame: Rect,
}

impl<V: View> SingleRowHost<V> {
    /// Wraps `row`, keeping its current width.
    pub fn new(mut row: V) -> Self {
        let width = row.frame().width();
        row.layout_if_needed();
        let size = row.fitting_size(width);
        let frame = Rect::from_origin_size(Point::ORIGIN, size);
        row.set_frame(frame);
        row.layout_if_needed();
        Self { row, frame }
    }

    /// The hosted row.
    pub fn row(&self) -> &V {
        &self.row
    }

    /// The hosted row, mutably.
    pub fn row_mut(&mut self) -> &mut V {
        &mut self.row
    }

    /// Height of the row within the host.
    pub fn row_height(&self) -> f64 {
        self.row.frame().height()
    }

    fn fit_row(&mut self) {
        let width = self.frame.width();
        let height = self.row.fitting_size(width).height;
        self.row
            .set_frame(Rect::from_origin_size(Point::ORIGIN, (width, height)));
    }
}

impl<V: View> View for SingleRowHost<V> {
    fn frame(&self) -> Rect {
        self.frame
    }

    fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
        self.fit_row();
    }

    fn set_needs_layout(&mut self) {
        self.row.set_needs_layout();
    }

    fn layout_if_needed(&mut self) {
        self.row.layout_if_needed();
    }

    fn fitting_size(&self, width: f64) -> Size {
        self.row.fitting_size(width)
    }

    fn layout_ambiguity(&self) -> Option<LayoutAmbiguity> {
        self.row.layout_ambiguity()
    }

    fn themeable(&mut self) -> Option<&mut dyn Themeable> {
        self.row.themeable()
    }

    fn set_animations_enabled(&mut self, enabled: bool) {
        self.row.set_animations_enabled(enabled);
    }

    fn set_safe_area_insets(&mut self, insets: Insets) {
        self.row.set_safe_area_insets(insets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockView;

    #[test]
    fn variants_map_to_backgrounds_and_identifiers() {
        assert_eq!(
            ColorSchemeVariant::Light.background().to_rgba8(),
            Color::WHITE.to_rgba8()
        );
        assert_eq!(
            ColorSchemeVariant::Dark.background().to_rgba8(),
            Color::BLACK.to_rgba8()
        );
        assert_eq!(ColorSchemeVariant::Light.snapshot_identifier(), "LightTheme");
        assert_eq!(ColorSchemeVariant::Dark.snapshot_identifier(), "DarkTheme");
    }

    #[test]
    fn without_animation_restores_animations() {
        let mut view = MockView::new(Size::new(10.0, 10.0));
        let seen = without_animation(&mut view, |view| view.animations_enabled);
        assert!(!seen);
        assert!(view.animations_enabled);
    }

    #[test]
    fn without_animation_restores_animations_after_panic() {
        let mut view = MockView::new(Size::new(10.0, 10.0));
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            without_animation(&mut view, |_| -> u32 { panic!("setup failed") });
        }));
        assert!(result.is_err());
        assert!(view.animations_enabled, "animations are back on after unwinding");
    }

    #[test]
    fn single_row_host_sizes_row_to_fitting_height() {
        let row = MockView::new(Size::new(320.0, 10.0)).with_fitting_height(88.0);
        let host = SingleRowHost::new(row);
        assert_eq!(host.frame(), Rect::new(0.0, 0.0, 320.0, 88.0));
        assert_eq!(host.row_height(), 88.0);
        assert!(host.row().layout_passes >= 1);
    }

    #[test]
    fn single_row_host_refits_on_resize() {
        let row = MockView::new(Size::new(320.0, 10.0)).with_fitting_height(44.0);
        let mut host = SingleRowHost::new(row);
        host.set_frame(Rect::new(0.0, 0.0, 414.0, 600.0));
        assert_eq!(host.frame().width(), 414.0);
        assert_eq!(host.row().frame(), Rect::new(0.0, 0.0, 414.0, 44.0));
    }

    #[test]
    fn single_row_host_forwards_theming() {
        let row = MockView::new(Size::new(100.0, 20.0)).with_theme();
        let mut host = SingleRowHost::new(row);
        host.themeable()
            .expect("row is themeable")
            .set_color_scheme_variant(ColorSchemeVariant::Dark);
        assert_eq!(host.row().theme, Some(ColorSchemeVariant::Dark));
    }
}
