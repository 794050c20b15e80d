// Copyright 2025 the Overlook Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! On-disk reference images and the comparison against them.

use std::fs;
use std::path::{Path, PathBuf};

use kompari::{
    Image, ImageDifference, SizeOptimizationLevel, compare_images, image_to_png, load_image,
};
use overlook_harness::{CaptureError, CaptureRequest, Capturer, Comparison, View};
use tracing::{debug, info};

use crate::paint::Paint;
use crate::render::render;

/// Environment variable selecting the [`SnapshotMode`].
pub const MODE_ENV: &str = "OVERLOOK_SNAPSHOT";

/// What a [`SnapshotStore`] does with reference images.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SnapshotMode {
    /// Compare against existing references; never write them.
    #[default]
    Compare,
    /// Write missing or mismatching references instead of failing.
    Accept,
    /// Compare, and write the current image for every capture, including
    /// matching ones, so a full report can be built.
    GenerateAll,
}

impl SnapshotMode {
    /// Reads [`MODE_ENV`]: `accept` or `generate-all`, case-insensitive.
    ///
    /// Anything else, including an unset variable, means [`Compare`](Self::Compare).
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var(MODE_ENV)
            .ok()
            .and_then(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("accept") {
            Some(Self::Accept)
        } else if value.eq_ignore_ascii_case("generate-all") {
            Some(Self::GenerateAll)
        } else {
            None
        }
    }
}

/// A directory of reference snapshots.
///
/// References live in `<root>/snapshots/<name>.png`. Current renderings of
/// failing (or, in [`SnapshotMode::GenerateAll`], all) captures are written to
/// `<root>/current/<name>.png`, which is the layout `cargo xtask report`
/// expects.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    root: PathBuf,
    mode: SnapshotMode,
}

impl SnapshotStore {
    /// A store rooted at `root`, in [`SnapshotMode::Compare`].
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mode: SnapshotMode::Compare,
        }
    }

    /// A store rooted at `root`, in the mode given by [`MODE_ENV`].
    pub fn from_env(root: impl Into<PathBuf>) -> Self {
        Self::new(root).with_mode(SnapshotMode::from_env())
    }

    /// The conventional store for a crate's tests: `<manifest_dir>/tests`,
    /// in the mode given by [`MODE_ENV`].
    ///
    /// Pass `env!("CARGO_MANIFEST_DIR")`.
    pub fn for_crate(manifest_dir: &str) -> Self {
        Self::from_env(Path::new(manifest_dir).join("tests"))
    }

    /// Replaces the mode.
    #[must_use]
    pub fn with_mode(mut self, mode: SnapshotMode) -> Self {
        self.mode = mode;
        self
    }

    /// The current mode.
    pub fn mode(&self) -> SnapshotMode {
        self.mode
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding reference images.
    pub fn snapshots_dir(&self) -> PathBuf {
        self.root.join("snapshots")
    }

    /// Directory holding current renderings.
    pub fn current_dir(&self) -> PathBuf {
        self.root.join("current")
    }

    /// Path of the reference image called `name`.
    pub fn reference_path(&self, name: &str) -> PathBuf {
        self.snapshots_dir().join(format!("{name}.png"))
    }

    /// Path of the current rendering called `name`.
    pub fn current_path(&self, name: &str) -> PathBuf {
        self.current_dir().join(format!("{name}.png"))
    }

    /// Compares `image` with the reference called `name`.
    ///
    /// `tolerance` is the fraction of pixels allowed to differ. Images of
    /// different sizes never match.
    ///
    /// # Errors
    ///
    /// [`CaptureError::MissingReference`] when there is no reference and the
    /// store is not accepting; [`CaptureError::Io`] or
    /// [`CaptureError::Backend`] when reading, decoding or writing fails.
    pub fn check(
        &self,
        name: &str,
        image: &Image,
        tolerance: f32,
    ) -> Result<Comparison, CaptureError> {
        let reference = self.reference_path(name);
        let current = self.current_path(name);
        fs::create_dir_all(self.snapshots_dir())?;
        fs::create_dir_all(self.current_dir())?;

        if !reference.exists() {
            if self.mode == SnapshotMode::Accept {
                write_png(&reference, image, SizeOptimizationLevel::High)?;
                info!(path = %reference.display(), "recorded new reference");
                return Ok(Comparison::Recorded { reference });
            }
            write_png(&current, image, SizeOptimizationLevel::Fast)?;
            return Err(CaptureError::MissingReference {
                reference,
                current: Some(current),
            });
        }

        let expected = load_image(&reference).map_err(|err| CaptureError::Backend(Box::new(err)))?;
        let total_pixels = u64::from(image.width()) * u64::from(image.height());
        match compare_images(&expected, image) {
            ImageDifference::None => {
                self.write_current_if_generating(&current, image)?;
                debug!(name, "snapshot matches");
                Ok(Comparison::Matched)
            }
            ImageDifference::Content {
                n_different_pixels, ..
            } if within_tolerance(n_different_pixels, total_pixels, tolerance) => {
                self.write_current_if_generating(&current, image)?;
                debug!(name, n_different_pixels, "snapshot within tolerance");
                Ok(Comparison::Matched)
            }
            diff => {
                let different_pixels = match diff {
                    ImageDifference::Content {
                        n_different_pixels, ..
                    } => n_different_pixels,
                    _ => total_pixels,
                };
                if self.mode == SnapshotMode::Accept {
                    write_png(&reference, image, SizeOptimizationLevel::High)?;
                    info!(path = %reference.display(), different_pixels, "updated reference");
                    return Ok(Comparison::Recorded { reference });
                }
                write_png(&current, image, SizeOptimizationLevel::Fast)?;
                Ok(Comparison::Mismatched {
                    different_pixels,
                    total_pixels,
                    artifact: Some(current),
                })
            }
        }
    }

    fn write_current_if_generating(&self, path: &Path, image: &Image) -> Result<(), CaptureError> {
        if self.mode == SnapshotMode::GenerateAll {
            write_png(path, image, SizeOptimizationLevel::Fast)?;
        }
        Ok(())
    }
}

impl<V> Capturer<V> for SnapshotStore
where
    V: View + Paint + ?Sized,
{
    fn capture(
        &mut self,
        view: &V,
        request: &CaptureRequest<'_>,
    ) -> Result<Comparison, CaptureError> {
        let image = render(view, request.background)?;
        self.check(&request.snapshot_name(), &image, request.tolerance)
    }
}

fn write_png(path: &Path, image: &Image, level: SizeOptimizationLevel) -> Result<(), CaptureError> {
    fs::write(path, image_to_png(image, level))?;
    Ok(())
}

fn within_tolerance(different: u64, total: u64, tolerance: f32) -> bool {
    tolerance > 0.0 && different as f64 <= f64::from(tolerance) * total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_parse_case_insensitively() {
        assert_eq!(SnapshotMode::parse("accept"), Some(SnapshotMode::Accept));
        assert_eq!(SnapshotMode::parse(" ACCEPT "), Some(SnapshotMode::Accept));
        assert_eq!(
            SnapshotMode::parse("Generate-All"),
            Some(SnapshotMode::GenerateAll)
        );
        assert_eq!(SnapshotMode::parse("yes"), None);
        assert_eq!(SnapshotMode::parse(""), None);
    }

    #[test]
    fn zero_tolerance_requires_exact_match() {
        assert!(!within_tolerance(1, 10_000, 0.0));
        assert!(!within_tolerance(0, 10_000, 0.0));
    }

    #[test]
    fn tolerance_is_a_pixel_fraction() {
        assert!(within_tolerance(100, 10_000, 0.01));
        assert!(!within_tolerance(101, 10_000, 0.01));
        assert!(within_tolerance(10_000, 10_000, 1.0));
    }

    #[test]
    fn paths_follow_store_layout() {
        let store = SnapshotStore::new("/tmp/overlook");
        assert_eq!(
            store.reference_path("card_LightTheme"),
            Path::new("/tmp/overlook/snapshots/card_LightTheme.png")
        );
        assert_eq!(
            store.current_path("card_320"),
            Path::new("/tmp/overlook/current/card_320.png")
        );
        assert_eq!(store.mode(), SnapshotMode::Compare);
    }
}
