//! Vertical week axis
//!
//! Maps 1-based week numbers and fractional week offsets to pixel tops.
//! The direction is chosen once per layout and every component goes
//! through the same [`WeekAxis`], so zooming is only a different
//! `week_height`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ConfigError;

/// Which end of the timeline is drawn at the top
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisDirection {
    /// Latest week at the top, like a commit log
    #[default]
    Descending,
    /// Week 1 at the top, increasing downward
    Ascending,
}

impl AxisDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            AxisDirection::Descending => "descending",
            AxisDirection::Ascending => "ascending",
        }
    }
}

impl fmt::Display for AxisDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AxisDirection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "descending" | "desc" => Ok(AxisDirection::Descending),
            "ascending" | "asc" => Ok(AxisDirection::Ascending),
            other => Err(ConfigError::UnknownAxis(other.to_string())),
        }
    }
}

/// Pixel geometry of the week ruler for one layout pass
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekAxis {
    pub total_weeks: u32,
    /// Pixels per week after scale and zoom
    pub week_height: f64,
    pub direction: AxisDirection,
}

impl WeekAxis {
    pub fn new(total_weeks: u32, week_height: f64, direction: AxisDirection) -> Self {
        Self {
            total_weeks,
            week_height,
            direction,
        }
    }

    /// Pixel top of a 1-based week band
    pub fn week_top(&self, week_number: i64) -> f64 {
        match self.direction {
            AxisDirection::Descending => {
                week_to_pixel_top(week_number, self.total_weeks, self.week_height)
            }
            AxisDirection::Ascending => (week_number - 1) as f64 * self.week_height,
        }
    }

    /// Pixel top of a fractional offset in weeks from the origin
    pub fn offset_top(&self, week_offset: f64) -> f64 {
        match self.direction {
            AxisDirection::Descending => {
                (f64::from(self.total_weeks) - 1.0 - week_offset) * self.week_height
            }
            AxisDirection::Ascending => week_offset * self.week_height,
        }
    }

    /// Top edge of the block covering weeks `first..=last`
    pub fn block_top(&self, first: u32, last: u32) -> f64 {
        self.week_top(i64::from(first))
            .min(self.week_top(i64::from(last)))
    }

    /// Full ruler height
    pub fn height(&self) -> f64 {
        f64::from(self.total_weeks) * self.week_height
    }
}

/// Chronological-descending week top: `(total_weeks - week_number) * week_height`
pub fn week_to_pixel_top(week_number: i64, total_weeks: u32, week_height: f64) -> f64 {
    (i64::from(total_weeks) - week_number) as f64 * week_height
}

/// Inclusive, 1-based range of weeks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekRange {
    pub start: u32,
    pub end: u32,
}

impl WeekRange {
    /// Build a range from two endpoints in either order
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// The whole timeline
    pub fn full(total_weeks: u32) -> Self {
        Self::new(1, total_weeks.max(1))
    }

    /// Clamp into `[1, total_weeks]` keeping `start <= end`
    pub fn clamped(self, total_weeks: u32) -> Self {
        let total = total_weeks.max(1);
        let start = self.start.clamp(1, total);
        let end = self.end.clamp(start, total);
        Self { start, end }
    }

    /// Number of weeks covered, at least one
    pub fn week_count(&self) -> u32 {
        (self.end.saturating_sub(self.start) + 1).max(1)
    }

    /// A single-week range is a click rather than a selection
    pub fn is_single_week(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, week: u32) -> bool {
        (self.start..=self.end).contains(&week)
    }
}

impl fmt::Display for WeekRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl FromStr for WeekRange {
    type Err = ConfigError;

    /// Parses `A..B`, `A-B` or a single week `A`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidValue {
            field: "range".into(),
            message: format!("expected A..B, got '{s}'"),
        };
        let trimmed = s.trim();
        let (a, b) = trimmed
            .split_once("..")
            .or_else(|| trimmed.split_once('-'))
            .unwrap_or((trimmed, trimmed));
        let a: u32 = a.trim().parse().map_err(|_| invalid())?;
        let b: u32 = b.trim().parse().map_err(|_| invalid())?;
        Ok(WeekRange::new(a, b))
    }
}
