//! # weekline-core
//!
//! Core domain model and traits for the weekline timeline engine.
//!
//! This crate provides:
//! - Domain types: `Track`, `TimelineItem`, `Milestone`
//! - Per-render configuration: `TimelineConfig`, `Scale`, `LayoutTuning`
//! - UTC week arithmetic (`dates`) and the vertical week axis (`axis`)
//! - Layout output types consumed by renderers: `TimelineLayout`, `TrackLayout`, ...
//! - The `Renderer` trait and error types
//!
//! ## Example
//!
//! ```rust
//! use weekline_core::{TimelineBounds, TimelineItem, Track};
//!
//! let track = Track::new("api")
//!     .name("API")
//!     .color("#1fb6ff")
//!     .item(TimelineItem::new("auth").title("Auth flow").starts("2024-01-03").ends("2024-01-19"))
//!     .item(TimelineItem::new("docs").title("Docs"));
//!
//! let bounds = TimelineBounds::from_tracks(&[track], None);
//! assert_eq!(bounds.total_weeks, 3);
//! ```

pub mod axis;
pub mod config;
pub mod dates;

pub use axis::{week_to_pixel_top, AxisDirection, WeekAxis, WeekRange};
pub use config::{LayoutTuning, OverlapMode, Scale, TimelineConfig, WeekLabelMode, MAX_WEEKS};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a track
pub type TrackId = String;

/// Identifier of an item, unique within its track
pub type ItemId = String;

// ============================================================================
// Items and Tracks
// ============================================================================

/// A dated (or undated) entry inside a track
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineItem {
    pub id: ItemId,
    pub title: String,
    /// Normalized category tag (lowercase, brackets stripped)
    #[serde(default)]
    pub annotation: String,
    /// Raw start date; unparseable strings count as absent
    #[serde(default, alias = "at")]
    pub start_date: Option<String>,
    /// Raw end date; may precede the start date
    #[serde(default, alias = "endAt")]
    pub end_date: Option<String>,
}

impl TimelineItem {
    /// Create an undated item whose title defaults to its id
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            annotation: String::new(),
            start_date: None,
            end_date: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = annotation.into();
        self
    }

    /// Set the start date (raw string)
    pub fn starts(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    /// Set the end date (raw string)
    pub fn ends(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into());
        self
    }

    /// Parsed start day, if usable
    pub fn start(&self) -> Option<NaiveDate> {
        dates::parse_date_opt(self.start_date.as_deref())
    }

    /// Parsed end day, if usable
    pub fn end(&self) -> Option<NaiveDate> {
        dates::parse_date_opt(self.end_date.as_deref())
    }

    /// Ordered `(first, last)` days when both dates parse
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let (a, b) = (self.start()?, self.end()?);
        Some((a.min(b), a.max(b)))
    }
}

/// A named, colored column of items
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    /// CSS color, used verbatim and as the base for tints
    pub color: String,
    #[serde(default)]
    pub items: Vec<TimelineItem>,
    /// First visible week (1-based, inclusive)
    #[serde(default)]
    pub start_week: Option<i64>,
    /// Last visible week (1-based, inclusive)
    #[serde(default)]
    pub end_week: Option<i64>,
}

impl Track {
    /// Create an empty track named after its id
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            color: "#8492a6".into(),
            items: Vec::new(),
            start_week: None,
            end_week: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn item(mut self, item: TimelineItem) -> Self {
        self.items.push(item);
        self
    }

    /// Restrict the track to weeks `start..=end`
    pub fn weeks(mut self, start: i64, end: i64) -> Self {
        self.start_week = Some(start);
        self.end_week = Some(end);
        self
    }

    /// The track's week range clamped into `[1, total_weeks]`
    pub fn clamped_weeks(&self, total_weeks: u32) -> WeekRange {
        let total = i64::from(total_weeks.max(1));
        let start = self.start_week.unwrap_or(1).clamp(1, total);
        let end = self.end_week.unwrap_or(total).clamp(start, total);
        WeekRange {
            start: start as u32,
            end: end as u32,
        }
    }
}

/// A cross-track marker at a specific date
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub project: String,
    pub title: String,
    pub at: String,
}

impl Milestone {
    pub fn new(
        project: impl Into<String>,
        title: impl Into<String>,
        at: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            title: title.into(),
            at: at.into(),
        }
    }

    /// Selection identity, `"{title}-{at}"`
    pub fn id(&self) -> String {
        format!("{}-{}", self.title, self.at)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        dates::parse_date(&self.at)
    }

    /// Text shown next to the marker
    pub fn label(&self) -> String {
        format!("{} {}", self.project, self.title)
    }
}

// ============================================================================
// Timeline Bounds
// ============================================================================

/// Origin and length of the timeline, derived from the data on every pass
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineBounds {
    /// Monday of the week holding the earliest item date
    pub origin: Option<NaiveDate>,
    pub total_weeks: u32,
}

impl TimelineBounds {
    /// Compute bounds over every parseable start and end date.
    ///
    /// `configured_weeks` is a minimum: the result covers at least the week
    /// of the latest date.
    pub fn from_tracks(tracks: &[Track], configured_weeks: Option<u32>) -> Self {
        let mut earliest: Option<NaiveDate> = None;
        let mut latest: Option<NaiveDate> = None;

        let all_dates = tracks
            .iter()
            .flat_map(|track| &track.items)
            .flat_map(|item| [item.start(), item.end()])
            .flatten();
        for date in all_dates {
            earliest = Some(earliest.map_or(date, |e| e.min(date)));
            latest = Some(latest.map_or(date, |l| l.max(date)));
        }

        let (origin, data_weeks) = match (earliest, latest) {
            (Some(first), Some(last)) => {
                let origin = dates::start_of_week(first);
                (Some(origin), dates::total_weeks_spanned(origin, last))
            }
            _ => (None, 1),
        };

        Self {
            origin,
            total_weeks: configured_weeks.map_or(data_weeks, |w| w.max(data_weeks)),
        }
    }

    /// Fractional week offset of `date` from the origin
    pub fn week_offset(&self, date: NaiveDate) -> Option<f64> {
        self.origin.map(|origin| dates::weeks_between(origin, date))
    }

    /// 1-based week number holding `date`
    pub fn week_of(&self, date: NaiveDate) -> Option<i64> {
        self.origin
            .map(|origin| (date - origin).num_days().div_euclid(dates::DAYS_PER_WEEK) + 1)
    }
}

// ============================================================================
// Layout Output
// ============================================================================

/// An item anchored at a vertical position within its track
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedItem {
    pub item: TimelineItem,
    pub top_px: f64,
}

/// Vertical extent of a ranged item
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationSpan {
    pub id: ItemId,
    pub top_px: f64,
    pub height_px: f64,
}

/// A positioned item with its estimated card rectangle
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusteredItem {
    pub item: TimelineItem,
    pub top_px: f64,
    pub card_top: f64,
    pub card_bottom: f64,
}

/// A run of overlapping cards rendered as one stack
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCluster {
    /// Member ids joined with `-`
    pub id: String,
    pub items: Vec<ClusteredItem>,
    pub container_top: f64,
    pub container_height: f64,
}

impl ItemCluster {
    /// Stacks of more than one card get a count badge
    pub fn is_stack(&self) -> bool {
        self.items.len() > 1
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.items.iter().any(|entry| entry.item.id == item_id)
    }
}

/// An item drawn as a vertical line in a lane
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemLine {
    pub id: ItemId,
    pub title: String,
    pub annotation: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub top_px: f64,
    pub height_px: f64,
    pub lane: usize,
}

impl ItemLine {
    pub fn bottom_px(&self) -> f64 {
        self.top_px + self.height_px
    }
}

/// Overlap resolution result for one track
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum TrackOverlap {
    Clusters { clusters: Vec<ItemCluster> },
    Lanes { lines: Vec<ItemLine>, lane_count: usize },
}

impl TrackOverlap {
    pub fn mode(&self) -> OverlapMode {
        match self {
            TrackOverlap::Clusters { .. } => OverlapMode::Clusters,
            TrackOverlap::Lanes { .. } => OverlapMode::Lanes,
        }
    }

    pub fn clusters(&self) -> &[ItemCluster] {
        match self {
            TrackOverlap::Clusters { clusters } => clusters,
            TrackOverlap::Lanes { .. } => &[],
        }
    }

    pub fn lines(&self) -> &[ItemLine] {
        match self {
            TrackOverlap::Lanes { lines, .. } => lines,
            TrackOverlap::Clusters { .. } => &[],
        }
    }
}

/// Layout of a single track column
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackLayout {
    pub track_id: TrackId,
    pub name: String,
    pub color: String,
    pub weeks: WeekRange,
    /// Ruler pixel where the track column begins
    pub offset_top: f64,
    pub height: f64,
    pub items: Vec<PositionedItem>,
    pub spans: Vec<DurationSpan>,
    pub overlap: TrackOverlap,
}

impl TrackLayout {
    pub fn item_top(&self, item_id: &str) -> Option<f64> {
        self.items
            .iter()
            .find(|p| p.item.id == item_id)
            .map(|p| p.top_px)
    }

    pub fn span(&self, item_id: &str) -> Option<&DurationSpan> {
        self.spans.iter().find(|s| s.id == item_id)
    }
}

/// Same-day milestones sharing one horizontal marker
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneRow {
    pub day: NaiveDate,
    pub top_px: f64,
    pub milestones: Vec<Milestone>,
    /// How many milestones get their own label
    pub label_limit: usize,
}

impl MilestoneRow {
    /// Milestones shown with a label
    pub fn labelled(&self) -> &[Milestone] {
        let shown = self.milestones.len().min(self.label_limit);
        &self.milestones[..shown]
    }

    /// Whether the row collapses into a "N markers" count
    pub fn has_overflow(&self) -> bool {
        self.milestones.len() > self.label_limit
    }

    pub fn contains(&self, milestone_id: &str) -> bool {
        self.milestones.iter().any(|m| m.id() == milestone_id)
    }
}

/// Alternating background band covering one sprint
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintBand {
    pub index: usize,
    pub weeks: WeekRange,
    pub top_px: f64,
    pub height_px: f64,
    pub shaded: bool,
}

/// A tick on the week ruler
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekMarker {
    pub week: u32,
    pub top_px: f64,
    pub label: String,
    pub sprint_boundary: bool,
}

/// Complete geometry of one layout pass
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineLayout {
    pub bounds: TimelineBounds,
    pub axis: WeekAxis,
    /// Week height for the selected scale, before zoom
    pub base_week_height: f64,
    /// Active zoom selection, already clamped
    pub view_range: Option<WeekRange>,
    /// Offset from the body top to ruler pixel 0
    pub guide_top_offset: f64,
    pub tracks: Vec<TrackLayout>,
    pub milestones: Vec<MilestoneRow>,
    pub sprints: Vec<SprintBand>,
    pub weeks: Vec<WeekMarker>,
}

impl TimelineLayout {
    pub fn total_weeks(&self) -> u32 {
        self.bounds.total_weeks
    }

    /// Week height after zoom
    pub fn effective_week_height(&self) -> f64 {
        self.axis.week_height
    }

    pub fn is_zoomed(&self) -> bool {
        self.view_range.is_some()
    }

    /// Weeks currently in view
    pub fn visible_range(&self) -> WeekRange {
        self.view_range
            .unwrap_or_else(|| WeekRange::full(self.total_weeks()))
    }

    /// Ruler pixel top of a week, for scroll anchoring
    pub fn week_top(&self, week: u32) -> f64 {
        self.axis.week_top(i64::from(week))
    }

    pub fn total_height(&self) -> f64 {
        self.axis.height()
    }

    pub fn track(&self, id: &str) -> Option<&TrackLayout> {
        self.tracks.iter().find(|t| t.track_id == id)
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Turns a computed layout into some output format
pub trait Renderer {
    type Output;

    fn render(&self, layout: &TimelineLayout) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Invalid configuration value
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown scale: {0} (expected small, medium or large)")]
    UnknownScale(String),

    #[error("Unknown axis direction: {0} (expected ascending or descending)")]
    UnknownAxis(String),

    #[error("Unknown overlap mode: {0} (expected lanes or clusters)")]
    UnknownOverlap(String),

    #[error("Unknown week label mode: {0} (expected weeks or dates)")]
    UnknownLabelMode(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn item_builder() {
        let item = TimelineItem::new("auth")
            .title("Auth flow")
            .annotation("feature")
            .starts("2024-05-10")
            .ends("2024-05-01");

        assert_eq!(item.id, "auth");
        assert_eq!(item.title, "Auth flow");
        assert_eq!(item.start(), Some(date(2024, 5, 10)));
        assert_eq!(item.date_range(), Some((date(2024, 5, 1), date(2024, 5, 10))));
    }

    #[test]
    fn item_with_bad_date_is_undated() {
        let item = TimelineItem::new("x").starts("soon").ends("2024-01-01");
        assert_eq!(item.start(), None);
        assert_eq!(item.date_range(), None);
    }

    #[test]
    fn item_deserializes_original_field_names() {
        let item: TimelineItem =
            serde_json::from_str(r#"{"id":"a","title":"A","at":"2024-01-02","endAt":"2024-01-09"}"#)
                .unwrap();
        assert_eq!(item.start_date.as_deref(), Some("2024-01-02"));
        assert_eq!(item.end_date.as_deref(), Some("2024-01-09"));
        assert_eq!(item.annotation, "");
    }

    #[test]
    fn track_week_clamping() {
        let track = Track::new("t").weeks(-2, 40);
        assert_eq!(track.clamped_weeks(10), WeekRange { start: 1, end: 10 });

        let track = Track::new("t").weeks(7, 3);
        assert_eq!(track.clamped_weeks(10), WeekRange { start: 7, end: 7 });

        let track = Track::new("t");
        assert_eq!(track.clamped_weeks(6), WeekRange { start: 1, end: 6 });
    }

    #[test]
    fn bounds_use_monday_of_earliest_date() {
        let track = Track::new("t")
            .item(TimelineItem::new("a").starts("2024-01-03"))
            .item(TimelineItem::new("b").starts("2024-01-20").ends("2024-01-10"));
        let bounds = TimelineBounds::from_tracks(&[track], None);
        assert_eq!(bounds.origin, Some(date(2024, 1, 1)));
        assert_eq!(bounds.total_weeks, 3);
    }

    #[test]
    fn bounds_respect_configured_minimum() {
        let track = Track::new("t").item(TimelineItem::new("a").starts("2024-01-03"));
        assert_eq!(TimelineBounds::from_tracks(&[track.clone()], Some(12)).total_weeks, 12);
        assert_eq!(TimelineBounds::from_tracks(&[track], Some(0)).total_weeks, 1);
    }

    #[test]
    fn bounds_without_dates() {
        let track = Track::new("t").item(TimelineItem::new("a"));
        let bounds = TimelineBounds::from_tracks(&[track], None);
        assert_eq!(bounds, TimelineBounds { origin: None, total_weeks: 1 });
        assert_eq!(TimelineBounds::from_tracks(&[], Some(8)).total_weeks, 8);
    }

    #[test]
    fn week_of_counts_from_one() {
        let bounds = TimelineBounds {
            origin: Some(date(2024, 1, 1)),
            total_weeks: 4,
        };
        assert_eq!(bounds.week_of(date(2024, 1, 1)), Some(1));
        assert_eq!(bounds.week_of(date(2024, 1, 14)), Some(2));
        assert_eq!(bounds.week_of(date(2023, 12, 31)), Some(0));
    }

    #[test]
    fn week_offset_is_fractional_from_origin() {
        let bounds = TimelineBounds {
            origin: Some(date(2024, 1, 1)),
            total_weeks: 4,
        };
        assert_eq!(bounds.week_offset(date(2024, 1, 15)), Some(2.0));
        assert_eq!(bounds.week_offset(date(2024, 1, 4)), Some(3.0 / 7.0));
        assert_eq!(bounds.week_offset(date(2023, 12, 25)), Some(-1.0));

        let undated = TimelineBounds {
            origin: None,
            total_weeks: 1,
        };
        assert_eq!(undated.week_offset(date(2024, 1, 4)), None);
    }

    #[test]
    fn milestone_identity() {
        let m = Milestone::new("Core", "Beta", "2024-03-01");
        assert_eq!(m.id(), "Beta-2024-03-01");
        assert_eq!(m.label(), "Core Beta");
        assert_eq!(m.date(), Some(date(2024, 3, 1)));
    }

    #[test]
    fn milestone_row_overflow() {
        let row = MilestoneRow {
            day: date(2024, 3, 1),
            top_px: 0.0,
            milestones: (0..5)
                .map(|i| Milestone::new("p", format!("m{i}"), "2024-03-01"))
                .collect(),
            label_limit: 3,
        };
        assert_eq!(row.labelled().len(), 3);
        assert!(row.has_overflow());
        assert!(row.contains("m4-2024-03-01"));
    }

    #[test]
    fn render_error_display() {
        let err = RenderError::InvalidData("no tracks".into());
        assert!(err.to_string().contains("no tracks"));
    }
}
