// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Turns a group-by duration such as `5m` into the model's training interval
//! and span.
//!
//! Parsing splits leading digits from a unit token. Anything that does not
//! parse, or parses to a zero duration, takes the fallback path; these
//! functions never fail.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

pub const MIN_INTERVAL_SECOND: u64 = 5;
pub const MAX_INTERVAL_SECOND: u64 = 60;
pub const MIN_SPAN: u32 = 10;
pub const MAX_SPAN: u32 = 100;

const SECONDS_PER_DAY: f64 = 86_400.0;
// Calendar units as the dashboard's date library converts them.
const DAYS_PER_MONTH: f64 = 146_097.0 / 4_800.0;
const DAYS_PER_YEAR: f64 = DAYS_PER_MONTH * 12.0;

#[allow(clippy::unwrap_used)]
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)(.*)$").unwrap());

fn unit_seconds(unit: &str) -> Option<f64> {
    let seconds = match unit {
        "" | "ms" => 0.001,
        "s" => 1.0,
        "m" => 60.0,
        "h" => 3_600.0,
        "d" => SECONDS_PER_DAY,
        "w" => 7.0 * SECONDS_PER_DAY,
        "M" => DAYS_PER_MONTH * SECONDS_PER_DAY,
        "y" => DAYS_PER_YEAR * SECONDS_PER_DAY,
        long => match long.to_ascii_lowercase().as_str() {
            "millisecond" | "milliseconds" => 0.001,
            "second" | "seconds" => 1.0,
            "minute" | "minutes" => 60.0,
            "hour" | "hours" => 3_600.0,
            "day" | "days" => SECONDS_PER_DAY,
            "week" | "weeks" => 7.0 * SECONDS_PER_DAY,
            "month" | "months" => DAYS_PER_MONTH * SECONDS_PER_DAY,
            "year" | "years" => DAYS_PER_YEAR * SECONDS_PER_DAY,
            _ => return None,
        },
    };
    Some(seconds)
}

/// Duration of `raw` in seconds, or `None` when it is unparseable or zero.
pub fn parse_duration_seconds(raw: &str) -> Option<f64> {
    let caps = DURATION_RE.captures(raw.trim())?;
    let magnitude: u64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2).map_or("", |m| m.as_str().trim());
    let seconds = magnitude as f64 * unit_seconds(unit)?;
    (seconds > 0.0).then_some(seconds)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NormalizeBounds {
    pub min_interval_second: u64,
    pub max_interval_second: u64,
    pub min_span: u32,
    pub max_span: u32,
}

impl Default for NormalizeBounds {
    fn default() -> Self {
        Self {
            min_interval_second: MIN_INTERVAL_SECOND,
            max_interval_second: MAX_INTERVAL_SECOND,
            min_span: MIN_SPAN,
            max_span: MAX_SPAN,
        }
    }
}

impl NormalizeBounds {
    /// Interval returned when the raw duration cannot be used.
    pub fn fallback_interval(&self) -> String {
        format!("{}s", self.min_interval_second)
    }

    /// Training interval as whole seconds, `"<n>s"`, within
    /// `[min_interval_second, max_interval_second]`.
    pub fn normalize_interval(&self, raw: &str) -> String {
        let Some(seconds) = parse_duration_seconds(raw) else {
            return self.fallback_interval();
        };
        let seconds = seconds.ceil() as u64;
        let normalized = self
            .min_interval_second
            .max(seconds.min(self.max_interval_second));
        format!("{normalized}s")
    }

    /// Number of buckets per day, within `[min_span, max_span]`.
    pub fn normalize_span(&self, raw: &str) -> u32 {
        let Some(seconds) = parse_duration_seconds(raw) else {
            return self.min_span;
        };
        let per_day = (SECONDS_PER_DAY / seconds).ceil();
        let capped = per_day.min(f64::from(self.max_span)) as u32;
        self.min_span.max(capped)
    }

    pub(crate) fn check(&self) -> Result<(), String> {
        if self.min_interval_second == 0 {
            return Err("min_interval_second must be greater than zero".to_string());
        }
        if self.min_interval_second > self.max_interval_second {
            return Err(format!(
                "min_interval_second ({}) exceeds max_interval_second ({})",
                self.min_interval_second, self.max_interval_second
            ));
        }
        if self.min_span > self.max_span {
            return Err(format!(
                "min_span ({}) exceeds max_span ({})",
                self.min_span, self.max_span
            ));
        }
        Ok(())
    }
}

pub fn normalize_interval(raw: &str) -> String {
    NormalizeBounds::default().normalize_interval(raw)
}

pub fn normalize_span(raw: &str) -> u32 {
    NormalizeBounds::default().normalize_span(raw)
}
