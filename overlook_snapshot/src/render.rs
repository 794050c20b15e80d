// Copyright 2025 the Overlook Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rasterization of views into Kompari images.

use kompari::Image;
use overlook_harness::{CaptureError, View};
use peniko::Color;
use vello_cpu::{Pixmap, RenderContext, RenderMode, RenderSettings};

use crate::paint::Paint;

/// Renders `view` at its frame size over `background`.
///
/// Fractional frame sizes are rounded up to whole pixels; empty frames render
/// as a single pixel.
///
/// # Errors
///
/// Returns [`CaptureError::Backend`] if the frame is not finite or does not fit
/// a render target.
pub fn render<V>(view: &V, background: Color) -> Result<Image, CaptureError>
where
    V: View + Paint + ?Sized,
{
    let size = view.frame().size();
    let width = pixel_extent(size.width)?;
    let height = pixel_extent(size.height)?;

    let settings = RenderSettings {
        // Force the u8 pipeline to keep snapshots stable across feature sets.
        render_mode: RenderMode::OptimizeSpeed,
        ..RenderSettings::default()
    };
    let mut ctx = RenderContext::new_with(width, height, settings);
    ctx.set_paint(background);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(width),
        f64::from(height),
    ));
    view.paint(&mut ctx);

    let mut pixmap = Pixmap::new(width, height);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    let unpremul = pixmap.take_unpremultiplied();
    let mut bytes = Vec::with_capacity(unpremul.len() * 4);
    for p in unpremul {
        bytes.extend_from_slice(&[p.r, p.g, p.b, p.a]);
    }

    kompari::image::ImageBuffer::from_raw(u32::from(width), u32::from(height), bytes).ok_or_else(
        || CaptureError::Backend("RGBA buffer size does not match image dimensions".into()),
    )
}

fn pixel_extent(points: f64) -> Result<u16, CaptureError> {
    if !points.is_finite() || points > f64::from(u16::MAX) {
        return Err(CaptureError::Backend(
            format!("view extent {points} cannot be rendered").into(),
        ));
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "range checked above, and ceil leaves an integral value"
    )]
    let pixels = points.ceil().max(1.0) as u16;
    Ok(pixels)
}
