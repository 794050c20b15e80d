// Copyright 2025 the Overlook Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Painting views into a CPU render context.

use overlook_harness::{SingleRowHost, View};
use vello_cpu::RenderContext;

/// A view that can draw itself with Vello CPU.
///
/// Views paint in local coordinates: the origin is the top-left corner of
/// their frame, and the render target is exactly the frame's size.
pub trait Paint {
    /// Draws the view into `cx`.
    fn paint(&self, cx: &mut RenderContext);
}

impl<V: View + Paint> Paint for SingleRowHost<V> {
    fn paint(&self, cx: &mut RenderContext) {
        self.row().paint(cx);
    }
}

/// Converts a harness rectangle into the rectangle type Vello CPU draws with.
#[must_use]
pub fn cpu_rect(rect: kurbo::Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1)
}
