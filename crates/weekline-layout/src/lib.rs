//! # weekline-layout
//!
//! Layout engine for week-based vertical timelines.
//!
//! This crate provides:
//! - Date to pixel mapping for items (`position`) and ranged spans (`spans`)
//! - Overlap resolution, either stacked clusters or parallel lanes (`overlap`)
//! - Zoom to a week range (`zoom`) and the interaction reducer that drives it
//! - Track ordering, milestone rows, sprint bands, week markers, minimap math
//!
//! Every function here is pure: the same tracks, milestones, config and
//! view always produce the same layout.
//!
//! ## Example
//!
//! ```rust
//! use weekline_core::{AxisDirection, TimelineConfig, TimelineItem, Track};
//! use weekline_layout::{TimelineEngine, ViewState};
//!
//! let tracks = vec![Track::new("api")
//!     .item(TimelineItem::new("auth").starts("2024-01-01").ends("2024-01-10"))
//!     .item(TimelineItem::new("docs").starts("2024-01-15"))];
//!
//! let engine = TimelineEngine::new(TimelineConfig::new().axis(AxisDirection::Ascending));
//! let layout = engine.layout(&tracks, &[], &ViewState::default());
//!
//! assert_eq!(layout.total_weeks(), 3);
//! assert_eq!(layout.tracks[0].item_top("docs"), Some(180.0));
//! ```

pub mod activity;
pub mod guides;
pub mod interaction;
pub mod milestones;
pub mod minimap;
pub mod ordering;
pub mod overlap;
pub mod position;
pub mod spans;
pub mod zoom;

pub use activity::DayActivity;
pub use interaction::{Action, InteractionState};
pub use minimap::{MinimapBox, MinimapMarker, ViewportMeasure};
pub use ordering::order_tracks;
pub use position::{compute_top_offset, PositionInput, TrackFrame};
pub use zoom::{effective_week_height, ResolvedView, ViewState};

use tracing::debug;
use weekline_core::{
    ConfigError, Milestone, OverlapMode, TimelineBounds, TimelineConfig, TimelineLayout, Track,
    TrackLayout, TrackOverlap, WeekAxis,
};

/// Computes [`TimelineLayout`]s for one configuration
#[derive(Clone, Debug, Default)]
pub struct TimelineEngine {
    config: TimelineConfig,
}

impl TimelineEngine {
    pub fn new(config: TimelineConfig) -> Self {
        Self { config }
    }

    /// Like [`TimelineEngine::new`], rejecting unusable configuration
    pub fn try_new(config: TimelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Origin and week count for `tracks`
    pub fn bounds(&self, tracks: &[Track]) -> TimelineBounds {
        TimelineBounds::from_tracks(tracks, self.config.weeks)
    }

    /// Lay out every track, milestone and guide for the given view
    pub fn layout(
        &self,
        tracks: &[Track],
        milestones: &[Milestone],
        view: &ViewState,
    ) -> TimelineLayout {
        let config = &self.config;
        let bounds = self.bounds(tracks);
        let resolved = view.resolve(config, bounds.total_weeks);
        let axis = WeekAxis::new(bounds.total_weeks, resolved.effective_week_height, config.axis);

        debug!(
            tracks = tracks.len(),
            total_weeks = bounds.total_weeks,
            week_height = axis.week_height,
            zoomed = resolved.range.is_some(),
            "computing layout"
        );

        let track_layouts = order_tracks(tracks, &config.track_priority)
            .into_iter()
            .map(|track| layout_track(track, &bounds, axis, config))
            .collect();

        TimelineLayout {
            bounds,
            axis,
            base_week_height: resolved.base_week_height,
            view_range: resolved.range,
            guide_top_offset: config.tuning.guide_top_offset(),
            tracks: track_layouts,
            milestones: milestones::milestone_rows(
                milestones,
                &bounds,
                &axis,
                config.tuning.milestone_label_limit,
            ),
            sprints: guides::sprint_bands(&axis, config.sprint_length),
            weeks: guides::week_markers(&bounds, &axis, config.sprint_length, config.week_labels),
        }
    }

    /// Page offset to scroll to so the top of the visible range shows
    /// just below the header
    pub fn scroll_target(&self, layout: &TimelineLayout, body_page_top: f64) -> f64 {
        scroll_target(layout, body_page_top, self.config.tuning.scroll_margin)
    }

    /// Minimap dots for `tracks`, in display order
    pub fn minimap(&self, tracks: &[Track], width: f64, height: f64) -> Vec<MinimapMarker> {
        let ordered = order_tracks(tracks, &self.config.track_priority);
        minimap::minimap_markers(&ordered, &self.bounds(tracks), self.config.axis, width, height)
    }

    pub fn activity(&self, tracks: &[Track]) -> DayActivity {
        DayActivity::from_tracks(tracks)
    }
}

/// Layout of a single track: anchors, spans and overlap resolution
pub fn layout_track(
    track: &Track,
    bounds: &TimelineBounds,
    axis: WeekAxis,
    config: &TimelineConfig,
) -> TrackLayout {
    let tuning = &config.tuning;
    let frame = TrackFrame::new(track, bounds, axis);
    let items = position::position_items(track, &frame);
    let spans = spans::build_spans(track, &frame, tuning);

    let overlap = match config.overlap {
        OverlapMode::Clusters => TrackOverlap::Clusters {
            clusters: overlap::build_clusters(&items, tuning),
        },
        OverlapMode::Lanes => {
            let candidates = overlap::line_candidates(track, &frame, tuning);
            let assignment = overlap::assign_lanes(candidates, tuning.lane_gap);
            TrackOverlap::Lanes {
                lines: assignment.lines,
                lane_count: assignment.lane_count,
            }
        }
    };

    TrackLayout {
        track_id: track.id.clone(),
        name: track.name.clone(),
        color: track.color.clone(),
        weeks: frame.weeks,
        offset_top: frame.offset_top,
        height: frame.height,
        items,
        spans,
        overlap,
    }
}

/// Scroll target for `layout`, floored at zero
pub fn scroll_target(layout: &TimelineLayout, body_page_top: f64, scroll_margin: f64) -> f64 {
    let visible = layout.visible_range();
    let week_top = layout.axis.block_top(visible.start, visible.end);
    (body_page_top + layout.guide_top_offset + week_top - scroll_margin).max(0.0)
}

/// One-shot layout with a fresh engine
pub fn layout_timeline(
    tracks: &[Track],
    milestones: &[Milestone],
    config: &TimelineConfig,
    view: &ViewState,
) -> TimelineLayout {
    TimelineEngine::new(config.clone()).layout(tracks, milestones, view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use weekline_core::{AxisDirection, Scale, TimelineItem, WeekRange};

    fn sample_tracks() -> Vec<Track> {
        vec![
            Track::new("web")
                .name("Web")
                .item(TimelineItem::new("landing").starts("2024-01-03").ends("2024-01-12"))
                .item(TimelineItem::new("blog").starts("2024-01-04")),
            Track::new("api")
                .name("API")
                .item(TimelineItem::new("auth").starts("2024-01-22")),
        ]
    }

    #[test]
    fn engine_orders_tracks() {
        let engine = TimelineEngine::new(TimelineConfig::default());
        let layout = engine.layout(&sample_tracks(), &[], &ViewState::default());
        let ids: Vec<&str> = layout.tracks.iter().map(|t| t.track_id.as_str()).collect();
        assert_eq!(ids, vec!["api", "web"]);

        let engine = TimelineEngine::new(TimelineConfig::new().track_priority(["web"]));
        let layout = engine.layout(&sample_tracks(), &[], &ViewState::default());
        assert_eq!(layout.tracks[0].track_id, "web");
    }

    #[test]
    fn overlap_mode_selects_one_strategy() {
        let tracks = sample_tracks();
        let lanes =
            layout_timeline(&tracks, &[], &TimelineConfig::default(), &ViewState::default());
        let web = lanes.track("web").unwrap();
        assert_eq!(web.overlap.mode(), OverlapMode::Lanes);
        assert!(web.overlap.clusters().is_empty());
        assert_eq!(web.overlap.lines().len(), 2);

        let config = TimelineConfig::new().overlap(OverlapMode::Clusters);
        let clusters = layout_timeline(&tracks, &[], &config, &ViewState::default());
        let web = clusters.track("web").unwrap();
        assert!(web.overlap.lines().is_empty());
        assert_eq!(web.overlap.clusters().len(), 1);
    }

    #[test]
    fn zoom_changes_week_height_only() {
        let engine = TimelineEngine::new(TimelineConfig::default());
        let view = ViewState::new()
            .scale(Scale::Small)
            .range(WeekRange::new(2, 3))
            .viewport_height(500.0);
        let layout = engine.layout(&sample_tracks(), &[], &view);
        assert_eq!(layout.base_week_height, 72.0);
        assert_eq!(layout.effective_week_height(), 250.0);
        assert_eq!(layout.total_height(), 1000.0);
        assert!(layout.is_zoomed());
    }

    #[test]
    fn scroll_target_points_at_top_of_visible_range() {
        let engine = TimelineEngine::new(TimelineConfig::default());
        let layout = engine.layout(&sample_tracks(), &[], &ViewState::default());
        // descending and unzoomed: the latest week is already at the top
        assert_eq!(engine.scroll_target(&layout, 100.0), 126.0);
        assert_eq!(engine.scroll_target(&layout, 0.0), 26.0);

        let view = ViewState::new().range(WeekRange::new(1, 2)).viewport_height(400.0);
        let layout = engine.layout(&sample_tracks(), &[], &view);
        // weeks 1..2 sit below week 4 and 3, 200px each
        assert_eq!(engine.scroll_target(&layout, 0.0), 50.0 + 400.0 - 24.0);
    }

    #[test]
    fn ascending_scroll_target_uses_start_week() {
        let engine = TimelineEngine::new(TimelineConfig::new().axis(AxisDirection::Ascending));
        let view = ViewState::new().range(WeekRange::new(3, 4)).viewport_height(400.0);
        let layout = engine.layout(&sample_tracks(), &[], &view);
        assert_eq!(engine.scroll_target(&layout, 0.0), 50.0 + 400.0 - 24.0);
    }

    #[test]
    fn try_new_validates() {
        assert!(TimelineEngine::try_new(TimelineConfig::new().sprint_length(0)).is_err());
        assert!(TimelineEngine::try_new(TimelineConfig::default()).is_ok());
    }

    #[test]
    fn minimap_follows_track_order() {
        let engine = TimelineEngine::new(TimelineConfig::default());
        let markers = engine.minimap(&sample_tracks(), 200.0, 120.0);
        assert_eq!(markers[0].id, "auth");
        assert_eq!(markers[0].left, 50.0);
        assert_eq!(markers.len(), 3);
    }
}
