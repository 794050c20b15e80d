// Copyright 2025 the Overlook Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=overlook_snapshot --heading-base-level=0

//! Overlook Snapshot: a Kompari-backed capture store for the Overlook harness.
//!
//! Views implement [`Paint`] to draw themselves with Vello CPU. A
//! [`SnapshotStore`] then acts as the harness's `Capturer`: it rasterizes the
//! view at its frame size with [`render`], and compares the result with a PNG
//! reference using Kompari.
//!
//! ## Layout on disk
//!
//! - `<root>/snapshots/<name>.png`: reference images, checked in.
//! - `<root>/current/<name>.png`: current renderings of failing captures, for
//!   `cargo xtask report`.
//!
//! ## Modes
//!
//! `OVERLOOK_SNAPSHOT` selects the [`SnapshotMode`]:
//!
//! - unset: compare only.
//! - `accept`: write missing and mismatching references.
//! - `generate-all`: also write current images for matching captures.
//!
//! ```no_run
//! use overlook_harness::{DeviceScreen, Harness, View};
//! use overlook_snapshot::{Paint, SnapshotStore};
//! use vello_cpu::RenderContext;
//!
//! struct Banner {
//!     frame: kurbo::Rect,
//! }
//!
//! impl View for Banner {
//!     fn frame(&self) -> kurbo::Rect {
//!         self.frame
//!     }
//!     fn set_frame(&mut self, frame: kurbo::Rect) {
//!         self.frame = frame;
//!     }
//!     fn layout_if_needed(&mut self) {}
//! }
//!
//! impl Paint for Banner {
//!     fn paint(&self, cx: &mut RenderContext) {
//!         cx.set_paint(peniko::Color::from_rgb8(0x2f, 0x6f, 0xeb));
//!         cx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, 40.0, 40.0));
//!     }
//! }
//!
//! let store = SnapshotStore::for_crate(env!("CARGO_MANIFEST_DIR"));
//! let mut harness = Harness::new("banner", store);
//! let mut banner = Banner {
//!     frame: kurbo::Rect::ZERO,
//! };
//! harness.verify_in_all_phone_sizes(&mut banner, false);
//! harness.reporter().assert_clean();
//! ```

mod paint;
mod render;
mod store;

pub use paint::{Paint, cpu_rect};
pub use render::render;
pub use store::{MODE_ENV, SnapshotMode, SnapshotStore};
