// Copyright 2025 the Overlook Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named configurations and the device reference data they are built from.
//!
//! This module provides [`ConfigurationSet`], a label-keyed collection of
//! layout parameters, and [`DeviceScreen`], the static screen sizes and widths
//! that the harness sweeps by default.

use core::fmt;

use kurbo::Size;

/// A set of named configurations, keyed by a unique label.
///
/// Each entry pairs a human-readable label (for example `"iPhone4_7Inch"`) with
/// a layout parameter such as a [`Size`] or a width.
///
/// # Ordering
///
/// Entries are stored sorted by label, so iteration order is deterministic
/// across runs. Inserting a label that is already present replaces its value,
/// which is what makes [`merge`](Self::merge) resolve collisions in favor of
/// the later set.
///
/// # Example
///
/// ```rust
/// use kurbo::Size;
/// use overlook_harness::ConfigurationSet;
///
/// let phones = ConfigurationSet::new().with("A", Size::new(100.0, 100.0));
/// let tablets = ConfigurationSet::new().with("A", Size::new(200.0, 200.0));
///
/// let all = phones.merge(tablets);
/// assert_eq!(all.len(), 1);
/// assert_eq!(all.get("A"), Some(&Size::new(200.0, 200.0)));
/// ```
#[derive(Clone, PartialEq)]
pub struct ConfigurationSet<T> {
    /// Sorted by label for binary search lookup.
    entries: Vec<(String, T)>,
}

impl<T> ConfigurationSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns `true` if the set has no entries.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of entries.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Inserts an entry, returning the value previously stored under `label`.
    pub fn insert(&mut self, label: impl Into<String>, value: T) -> Option<T> {
        let label = label.into();
        match self
            .entries
            .binary_search_by(|(existing, _)| existing.as_str().cmp(label.as_str()))
        {
            Ok(idx) => Some(core::mem::replace(&mut self.entries[idx].1, value)),
            Err(idx) => {
                self.entries.insert(idx, (label, value));
                None
            }
        }
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, label: impl Into<String>, value: T) -> Self {
        self.insert(label, value);
        self
    }

    /// Gets the value for `label`, if present.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&T> {
        self.entries
            .binary_search_by(|(existing, _)| existing.as_str().cmp(label))
            .ok()
            .map(|idx| &self.entries[idx].1)
    }

    /// Returns `true` if the set has an entry for `label`.
    #[must_use]
    pub fn contains_label(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    /// Iterates over `(label, value)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> + '_ {
        self.entries
            .iter()
            .map(|(label, value)| (label.as_str(), value))
    }

    /// Iterates over the labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    /// Merges `other` into this set. Entries of `other` win on label collision.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        for (label, value) in other.entries {
            self.insert(label, value);
        }
        self
    }

    /// Returns a new set with the same labels and transformed values.
    #[must_use]
    pub fn map_values<U>(&self, mut f: impl FnMut(&T) -> U) -> ConfigurationSet<U> {
        ConfigurationSet {
            entries: self
                .entries
                .iter()
                .map(|(label, value)| (label.clone(), f(value)))
                .collect(),
        }
    }
}

impl<T: PartialEq> ConfigurationSet<T> {
    /// Returns `true` if any entry holds a value equal to `value`.
    #[must_use]
    pub fn contains_value(&self, value: &T) -> bool {
        self.entries.iter().any(|(_, v)| v == value)
    }
}

impl<T> Default for ConfigurationSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ConfigurationSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<L: Into<String>, T> FromIterator<(L, T)> for ConfigurationSet<T> {
    fn from_iter<I: IntoIterator<Item = (L, T)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (label, value) in iter {
            set.insert(label, value);
        }
        set
    }
}

/// Screen sizes of the supported devices, in points.
///
/// Phones are portrait; tablets are listed in both orientations.
#[derive(Copy, Clone, Debug)]
pub struct DeviceScreen;

impl DeviceScreen {
    /// 4.0" phone.
    pub const IPHONE_4_0_INCH: Size = Size::new(320.0, 568.0);
    /// 4.7" phone.
    pub const IPHONE_4_7_INCH: Size = Size::new(375.0, 667.0);
    /// 5.5" phone.
    pub const IPHONE_5_5_INCH: Size = Size::new(414.0, 736.0);
    /// 5.8" phone.
    pub const IPHONE_5_8_INCH: Size = Size::new(375.0, 812.0);
    /// 6.5" phone.
    pub const IPHONE_6_5_INCH: Size = Size::new(414.0, 896.0);
    /// Tablet in portrait.
    pub const IPAD_PORTRAIT: Size = Size::new(768.0, 1024.0);
    /// Tablet in landscape.
    pub const IPAD_LANDSCAPE: Size = Size::new(1024.0, 768.0);

    /// The smallest phone size the application supports.
    pub const DEFAULT_PHONE: Size = Self::IPHONE_4_0_INCH;

    /// Named phone screen sizes.
    #[must_use]
    pub fn phone_sizes() -> ConfigurationSet<Size> {
        [
            ("iPhone4_0Inch", Self::IPHONE_4_0_INCH),
            ("iPhone4_7Inch", Self::IPHONE_4_7_INCH),
            ("iPhone5_5Inch", Self::IPHONE_5_5_INCH),
            ("iPhone5_8Inch", Self::IPHONE_5_8_INCH),
            ("iPhone6_5Inch", Self::IPHONE_6_5_INCH),
        ]
        .into_iter()
        .collect()
    }

    // TODO: add the 12.9" and 11" tablet sizes (1366x1024, 1194x834).
    /// Named tablet screen sizes.
    #[must_use]
    pub fn tablet_sizes() -> ConfigurationSet<Size> {
        [
            ("iPadPortrait", Self::IPAD_PORTRAIT),
            ("iPadLandscape", Self::IPAD_LANDSCAPE),
        ]
        .into_iter()
        .collect()
    }

    /// Phone and tablet sizes combined.
    #[must_use]
    pub fn device_sizes() -> ConfigurationSet<Size> {
        Self::phone_sizes().merge(Self::tablet_sizes())
    }

    /// Distinct phone widths, labelled by their point value.
    ///
    /// The 5.8" phone shares its width with the 4.7" one, and the 6.5" phone
    /// with the 5.5" one, so three widths cover every phone.
    #[must_use]
    pub fn phone_widths() -> ConfigurationSet<f64> {
        [
            ("320", Self::IPHONE_4_0_INCH.width),
            ("375", Self::IPHONE_4_7_INCH.width),
            ("414", Self::IPHONE_5_5_INCH.width),
        ]
        .into_iter()
        .collect()
    }

    /// Tablet widths, labelled like the tablet sizes they come from.
    #[must_use]
    pub fn tablet_widths() -> ConfigurationSet<f64> {
        Self::tablet_sizes().map_values(|size| size.width)
    }
}
