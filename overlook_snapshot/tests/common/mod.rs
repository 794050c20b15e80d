// Copyright 2025 the Overlook Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Views and helpers shared by the snapshot integration tests.

#![allow(
    missing_docs,
    reason = "Integration-test helper module; not part of the public API."
)]
#![allow(
    dead_code,
    reason = "Each test binary uses a different subset of the helpers."
)]

use std::fs;
use std::path::PathBuf;

use kurbo::{Rect, Size};
use overlook_harness::{
    ColorSchemeVariant, Completion, HostWindow, Presentable, Themeable, View,
};
use overlook_snapshot::{Paint, cpu_rect};
use peniko::Color;
use tracing_subscriber::EnvFilter;
use vello_cpu::RenderContext;

pub(crate) const BLUE: Color = Color::from_rgb8(0x2f, 0x6f, 0xeb);
pub(crate) const GREEN: Color = Color::from_rgb8(0x1c, 0x9a, 0x4b);
pub(crate) const RED: Color = Color::from_rgb8(0xd9, 0x2d, 0x20);

/// Installs a test-friendly subscriber once; `RUST_LOG` controls the filter.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A fresh, empty directory for one test's store.
pub(crate) fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "overlook_snapshot_{test}_{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

/// A solid block of color with an optional red badge in local coordinates.
#[derive(Debug)]
pub(crate) struct Swatch {
    pub(crate) frame: Rect,
    pub(crate) color: Color,
    pub(crate) badge: Option<Rect>,
    pub(crate) fitting_height: f64,
}

impl Swatch {
    pub(crate) fn new(size: Size, color: Color) -> Self {
        Self {
            frame: Rect::from_origin_size((0.0, 0.0), size),
            color,
            badge: None,
            fitting_height: size.height,
        }
    }

    pub(crate) fn with_badge(mut self, badge: Rect) -> Self {
        self.badge = Some(badge);
        self
    }
}

impl View for Swatch {
    fn frame(&self) -> Rect {
        self.frame
    }

    fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    fn layout_if_needed(&mut self) {}

    fn fitting_size(&self, width: f64) -> Size {
        Size::new(width, self.fitting_height)
    }
}

impl Paint for Swatch {
    fn paint(&self, cx: &mut RenderContext) {
        cx.set_paint(self.color);
        cx.fill_rect(&cpu_rect(self.frame.with_origin((0.0, 0.0))));
        if let Some(badge) = self.badge {
            cx.set_paint(RED);
            cx.fill_rect(&cpu_rect(badge));
        }
    }
}

/// A card inset from its frame, contrasting with the color scheme's background.
#[derive(Debug)]
pub(crate) struct ThemedCard {
    pub(crate) frame: Rect,
    pub(crate) variant: ColorSchemeVariant,
}

impl ThemedCard {
    pub(crate) const INSET: f64 = 8.0;

    pub(crate) fn new(size: Size) -> Self {
        Self {
            frame: Rect::from_origin_size((0.0, 0.0), size),
            variant: ColorSchemeVariant::Light,
        }
    }

    pub(crate) fn foreground(&self) -> Color {
        match self.variant {
            ColorSchemeVariant::Light => Color::from_rgb8(0x33, 0x33, 0x33),
            ColorSchemeVariant::Dark => Color::from_rgb8(0xdd, 0xdd, 0xdd),
        }
    }
}

impl Themeable for ThemedCard {
    fn color_scheme_variant(&self) -> ColorSchemeVariant {
        self.variant
    }

    fn set_color_scheme_variant(&mut self, variant: ColorSchemeVariant) {
        self.variant = variant;
    }
}

impl View for ThemedCard {
    fn frame(&self) -> Rect {
        self.frame
    }

    fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    fn layout_if_needed(&mut self) {}

    fn themeable(&mut self) -> Option<&mut dyn Themeable> {
        Some(self)
    }
}

impl Paint for ThemedCard {
    fn paint(&self, cx: &mut RenderContext) {
        let card = self
            .frame
            .with_origin((0.0, 0.0))
            .inset(-Self::INSET);
        cx.set_paint(self.foreground());
        cx.fill_rect(&cpu_rect(card));
    }
}

/// A toast that fills its host window and finishes presenting on the first
/// event pump.
#[derive(Debug, Default)]
pub(crate) struct Toast {
    pub(crate) frame: Rect,
    completion: Option<Completion>,
}

impl View for Toast {
    fn frame(&self) -> Rect {
        self.frame
    }

    fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    fn layout_if_needed(&mut self) {}
}

impl Presentable for Toast {
    fn present(&mut self, host: &mut HostWindow, completion: Completion) {
        self.frame = host.frame();
        self.completion = Some(completion);
    }

    fn pump_events(&mut self) {
        if let Some(completion) = self.completion.take() {
            completion.fulfill();
        }
    }
}

impl Paint for Toast {
    fn paint(&self, cx: &mut RenderContext) {
        let size = self.frame.size();
        cx.set_paint(Color::from_rgb8(0x20, 0x20, 0x24));
        cx.fill_rect(&vello_cpu::kurbo::Rect::new(
            16.0,
            size.height - 96.0,
            size.width - 16.0,
            size.height - 48.0,
        ));
    }
}
