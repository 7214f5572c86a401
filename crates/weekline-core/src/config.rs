//! Per-render timeline configuration
//!
//! Nothing here is persisted: a [`TimelineConfig`] is built (or
//! deserialized) by the caller and handed to the layout engine on every
//! pass. The tunable constants that size cards, slop and lanes live in
//! [`LayoutTuning`] so tests can vary them independently.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::axis::AxisDirection;
use crate::ConfigError;

/// Discrete zoom level chosen in the settings drawer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Small,
    #[default]
    Medium,
    Large,
}

impl Scale {
    pub fn multiplier(self) -> f64 {
        match self {
            Scale::Small => 0.8,
            Scale::Medium => 1.0,
            Scale::Large => 1.2,
        }
    }

    /// Base week height for this scale, rounded to whole pixels
    pub fn week_height(self, base: f64) -> f64 {
        match self {
            Scale::Medium => base,
            other => (base * other.multiplier()).round(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scale::Small => "small",
            Scale::Medium => "medium",
            Scale::Large => "large",
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" | "s" => Ok(Scale::Small),
            "medium" | "m" => Ok(Scale::Medium),
            "large" | "l" => Ok(Scale::Large),
            other => Err(ConfigError::UnknownScale(other.to_string())),
        }
    }
}

/// How items that collide vertically inside a track are resolved
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapMode {
    /// Parallel lines, one lane per concurrent item
    #[default]
    Lanes,
    /// Stacked cards with a count badge
    Clusters,
}

impl OverlapMode {
    pub fn as_str(self) -> &'static str {
        match self {
            OverlapMode::Lanes => "lanes",
            OverlapMode::Clusters => "clusters",
        }
    }
}

impl FromStr for OverlapMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lanes" | "lines" => Ok(OverlapMode::Lanes),
            "clusters" | "stack" | "stacks" => Ok(OverlapMode::Clusters),
            other => Err(ConfigError::UnknownOverlap(other.to_string())),
        }
    }
}

/// Labels drawn next to week ruler ticks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekLabelMode {
    /// "Week 7"
    #[default]
    Weeks,
    /// "Feb 12", the Monday of the week
    Dates,
}

impl FromStr for WeekLabelMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weeks" | "week" => Ok(WeekLabelMode::Weeks),
            "dates" | "date" => Ok(WeekLabelMode::Dates),
            other => Err(ConfigError::UnknownLabelMode(other.to_string())),
        }
    }
}

/// Geometry constants consumed by the layout functions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutTuning {
    /// Estimated rendered height of an item card
    pub card_height_estimate: f64,
    /// Distance from a card's top edge to its date anchor
    pub card_anchor_offset: f64,
    /// Gap still treated as overlap when stacking cards
    pub stack_slop: f64,
    /// Minimum clearance between consecutive lines in one lane
    pub lane_gap: f64,
    /// Floor for span and line heights
    pub min_span_height: f64,
    /// Height of the track/week header above the ruler
    pub header_offset: f64,
    /// Padding between the header and the first week
    pub guide_padding: f64,
    /// Milestones labelled per row before collapsing into a count
    pub milestone_label_limit: usize,
    /// Space kept above a scroll target
    pub scroll_margin: f64,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            card_height_estimate: 70.0,
            card_anchor_offset: 14.0,
            stack_slop: 4.0,
            lane_gap: 4.0,
            min_span_height: 6.0,
            header_offset: 36.0,
            guide_padding: 14.0,
            milestone_label_limit: 3,
            scroll_margin: 24.0,
        }
    }
}

impl LayoutTuning {
    /// Offset from the top of the timeline body to week ruler pixel 0
    pub fn guide_top_offset(&self) -> f64 {
        self.header_offset + self.guide_padding
    }
}

/// Largest configured week count accepted, about a century
pub const MAX_WEEKS: u32 = 5200;

/// Caller-supplied configuration for one layout pass
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Minimum week count; the data may require more
    pub weeks: Option<u32>,
    /// Weeks per sprint band
    pub sprint_length: u32,
    /// Pixels per week at medium scale
    pub week_height: f64,
    pub axis: AxisDirection,
    pub overlap: OverlapMode,
    pub week_labels: WeekLabelMode,
    /// Track names listed first, in this order
    pub track_priority: Vec<String>,
    pub tuning: LayoutTuning,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            weeks: None,
            sprint_length: 2,
            week_height: 90.0,
            axis: AxisDirection::default(),
            overlap: OverlapMode::default(),
            week_labels: WeekLabelMode::default(),
            track_priority: Vec::new(),
            tuning: LayoutTuning::default(),
        }
    }
}

impl TimelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum number of weeks to show
    pub fn weeks(mut self, weeks: u32) -> Self {
        self.weeks = Some(weeks);
        self
    }

    pub fn sprint_length(mut self, weeks: u32) -> Self {
        self.sprint_length = weeks;
        self
    }

    pub fn week_height(mut self, px: f64) -> Self {
        self.week_height = px;
        self
    }

    pub fn axis(mut self, direction: AxisDirection) -> Self {
        self.axis = direction;
        self
    }

    pub fn overlap(mut self, mode: OverlapMode) -> Self {
        self.overlap = mode;
        self
    }

    pub fn week_labels(mut self, mode: WeekLabelMode) -> Self {
        self.week_labels = mode;
        self
    }

    pub fn track_priority<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.track_priority = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn tuning(mut self, tuning: LayoutTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Reject values the layout cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(weeks) = self.weeks.filter(|&w| w > MAX_WEEKS) {
            return Err(ConfigError::InvalidValue {
                field: "weeks".into(),
                message: format!("must be at most {MAX_WEEKS}, got {weeks}"),
            });
        }
        if self.sprint_length < 1 {
            return Err(ConfigError::InvalidValue {
                field: "sprint_length".into(),
                message: "must be at least 1".into(),
            });
        }
        if !self.week_height.is_finite() || self.week_height <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "week_height".into(),
                message: format!("must be a positive number, got {}", self.week_height),
            });
        }
        let tuning = &self.tuning;
        for (field, value) in [
            ("card_height_estimate", tuning.card_height_estimate),
            ("card_anchor_offset", tuning.card_anchor_offset),
            ("stack_slop", tuning.stack_slop),
            ("lane_gap", tuning.lane_gap),
            ("min_span_height", tuning.min_span_height),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    message: format!("must be a non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_medium_scale() {
        let config = TimelineConfig::default();
        assert_eq!(config.sprint_length, 2);
        assert_eq!(config.week_height, 90.0);
        assert_eq!(config.axis, AxisDirection::Descending);
        assert_eq!(config.overlap, OverlapMode::Lanes);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn scale_heights_round_to_pixels() {
        assert_eq!(Scale::Small.week_height(90.0), 72.0);
        assert_eq!(Scale::Medium.week_height(90.0), 90.0);
        assert_eq!(Scale::Large.week_height(90.0), 108.0);
        assert_eq!(Scale::Small.week_height(33.0), 26.0);
        assert_eq!(Scale::Medium.week_height(33.3), 33.3);
    }

    #[test]
    fn scale_parses_names() {
        assert_eq!("Large".parse::<Scale>().unwrap(), Scale::Large);
        assert!("huge".parse::<Scale>().is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(TimelineConfig::new().sprint_length(0).validate().is_err());
        assert!(TimelineConfig::new().week_height(0.0).validate().is_err());
        assert!(TimelineConfig::new().week_height(f64::NAN).validate().is_err());

        let mut tuning = LayoutTuning::default();
        tuning.lane_gap = -1.0;
        let err = TimelineConfig::new().tuning(tuning).validate().unwrap_err();
        assert!(err.to_string().contains("lane_gap"));
    }

    #[test]
    fn validate_bounds_week_count() {
        assert!(TimelineConfig::new().weeks(MAX_WEEKS).validate().is_ok());
        let err = TimelineConfig::new().weeks(4_000_000_000).validate().unwrap_err();
        assert!(err.to_string().contains("weeks"));
    }

    #[test]
    fn deserializes_partial_json_with_defaults() {
        let config: TimelineConfig = serde_json::from_str(
            r#"{"weeks": 12, "axis": "ascending", "tuning": {"stack_slop": 8}}"#,
        )
        .unwrap();
        assert_eq!(config.weeks, Some(12));
        assert_eq!(config.axis, AxisDirection::Ascending);
        assert_eq!(config.sprint_length, 2);
        assert_eq!(config.tuning.stack_slop, 8.0);
        assert_eq!(config.tuning.card_height_estimate, 70.0);
    }

    #[test]
    fn guide_offset_sums_header_and_padding() {
        assert_eq!(LayoutTuning::default().guide_top_offset(), 50.0);
    }
}
