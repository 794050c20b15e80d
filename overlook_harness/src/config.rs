// Copyright 2025 the Overlook Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Harness configuration.

use core::time::Duration;

use kurbo::Size;

use crate::devices::{ConfigurationSet, DeviceScreen};

/// Environment variable selecting a subset of configuration labels.
///
/// Patterns are separated by commas or whitespace and support `*` globs,
/// e.g. `OVERLOOK_SNAPSHOT_CASE='iPhone*,iPadPortrait'`.
pub const CASE_FILTER_ENV: &str = "OVERLOOK_SNAPSHOT_CASE";

/// How long a transient presentation may take before the test fails.
pub const DEFAULT_PRESENTATION_TIMEOUT: Duration = Duration::from_secs(2);

/// How often the presentable's event pump is driven while waiting.
pub const DEFAULT_PUMP_INTERVAL: Duration = Duration::from_millis(10);

/// Settings shared by every operation of a [`Harness`](crate::Harness).
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    /// Upper bound on the wait for a presentation completion.
    pub presentation_timeout: Duration,
    /// Interval between event pumps during the presentation wait.
    pub pump_interval: Duration,
    /// Label globs to run; `None` runs every configuration.
    pub label_filters: Option<Vec<String>>,
    /// Sizes that count as tablets when sweeping sizes.
    pub tablet_sizes: ConfigurationSet<Size>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            presentation_timeout: DEFAULT_PRESENTATION_TIMEOUT,
            pump_interval: DEFAULT_PUMP_INTERVAL,
            label_filters: None,
            tablet_sizes: DeviceScreen::tablet_sizes(),
        }
    }
}

impl HarnessConfig {
    /// Default configuration with the label filter read from [`CASE_FILTER_ENV`].
    #[must_use]
    pub fn from_env() -> Self {
        let label_filters = std::env::var(CASE_FILTER_ENV)
            .ok()
            .and_then(|raw| parse_filters(&raw));
        if let Some(filters) = &label_filters {
            tracing::debug!(?filters, "filtering configurations from {CASE_FILTER_ENV}");
        }
        Self {
            label_filters,
            ..Self::default()
        }
    }

    /// Sets the presentation timeout.
    #[must_use]
    pub fn with_presentation_timeout(mut self, timeout: Duration) -> Self {
        self.presentation_timeout = timeout;
        self
    }

    /// Restricts sweeps to labels matching any of `patterns`.
    #[must_use]
    pub fn with_label_filters<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let filters: Vec<String> = patterns.into_iter().map(Into::into).collect();
        self.label_filters = (!filters.is_empty()).then_some(filters);
        self
    }

    /// Returns `true` if the configuration `label` should run.
    #[must_use]
    pub fn selects(&self, label: &str) -> bool {
        match &self.label_filters {
            None => true,
            Some(filters) => filters.iter().any(|f| matches_glob(f, label)),
        }
    }
}

fn parse_filters(raw: &str) -> Option<Vec<String>> {
    let filters: Vec<String> = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect();
    (!filters.is_empty()).then_some(filters)
}

/// Matches `text` against a pattern where `*` stands for any run of characters.
///
/// The text before the first `*` anchors at the start and the text after the
/// last `*` anchors at the end; segments in between match leftmost-first.
pub(crate) fn matches_glob(pattern: &str, text: &str) -> bool {
    let mut parts = pattern.split('*');
    let Some(first) = parts.next() else {
        return text.is_empty();
    };
    let Some(mut remainder) = text.strip_prefix(first) else {
        return false;
    };
    let Some(last) = parts.next_back() else {
        // No `*` at all.
        return remainder.is_empty();
    };
    for part in parts {
        match remainder.find(part) {
            Some(idx) => remainder = &remainder[idx + part.len()..],
            None => return false,
        }
    }
    remainder.ends_with(last)
}
