// Copyright 2025 the Overlook Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared style state.
//!
//! Views under test read the active color scheme and cached text styles from a
//! [`StyleContext`]. The context is shared by handle rather than hidden in a
//! global, and tests that mutate it reset it explicitly, normally through
//! [`Harness::reset_style_state`](crate::Harness::reset_style_state).

use core::cell::RefCell;
use std::rc::Rc;

use crate::view::ColorSchemeVariant;

/// Text metrics cached per context.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in points.
    pub font_size: f64,
    /// Line height in points.
    pub line_height: f64,
    /// Extra space after each paragraph, in points.
    pub paragraph_spacing: f64,
}

#[derive(Debug, Default, PartialEq)]
struct StyleState {
    variant: ColorSchemeVariant,
    markdown: Option<TextStyle>,
    paragraph: Option<TextStyle>,
}

/// Handle to shared, mutable style state.
///
/// Cloning is cheap; clones observe the same state.
///
/// # Example
///
/// ```rust
/// use overlook_harness::{ColorSchemeVariant, StyleContext};
///
/// let style = StyleContext::new();
/// let view_style = style.clone();
///
/// style.set_variant(ColorSchemeVariant::Dark);
/// assert_eq!(view_style.variant(), ColorSchemeVariant::Dark);
///
/// style.reset();
/// assert!(view_style.is_default());
/// ```
#[derive(Clone, Debug, Default)]
pub struct StyleContext {
    inner: Rc<RefCell<StyleState>>,
}

impl StyleContext {
    /// Creates a context in its default state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The active color scheme variant.
    #[must_use]
    pub fn variant(&self) -> ColorSchemeVariant {
        self.inner.borrow().variant
    }

    /// Switches the active color scheme variant.
    pub fn set_variant(&self, variant: ColorSchemeVariant) {
        self.inner.borrow_mut().variant = variant;
    }

    /// The cached markdown text style, built with `build` on first use.
    pub fn markdown_style(&self, build: impl FnOnce(ColorSchemeVariant) -> TextStyle) -> TextStyle {
        let mut state = self.inner.borrow_mut();
        let variant = state.variant;
        *state.markdown.get_or_insert_with(|| build(variant))
    }

    /// The cached paragraph text style, built with `build` on first use.
    pub fn paragraph_style(
        &self,
        build: impl FnOnce(ColorSchemeVariant) -> TextStyle,
    ) -> TextStyle {
        let mut state = self.inner.borrow_mut();
        let variant = state.variant;
        *state.paragraph.get_or_insert_with(|| build(variant))
    }

    /// Drops the cached markdown style.
    pub fn invalidate_markdown_style(&self) {
        self.inner.borrow_mut().markdown = None;
    }

    /// Drops the cached paragraph style.
    pub fn invalidate_paragraph_style(&self) {
        self.inner.borrow_mut().paragraph = None;
    }

    /// Restores the light variant and drops every cached text style.
    pub fn reset(&self) {
        *self.inner.borrow_mut() = StyleState::default();
    }

    /// Returns `true` if the context is in its default state.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self.inner.borrow() == StyleState::default()
    }
}
