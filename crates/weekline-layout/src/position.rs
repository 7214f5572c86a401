//! Position mapper
//!
//! Converts an item's date (or, lacking one, its index) into a pixel
//! offset inside its track column.

use chrono::NaiveDate;
use tracing::trace;
use weekline_core::dates::{clamp_number, weeks_between};
use weekline_core::{PositionedItem, TimelineBounds, Track, WeekAxis, WeekRange};

/// Inputs for placing a single item
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionInput {
    pub date: Option<NaiveDate>,
    pub origin: Option<NaiveDate>,
    pub axis: WeekAxis,
    /// Position of the item in its track, for the undated fallback
    pub index: usize,
    pub item_count: usize,
    pub track_height: f64,
    /// Ruler pixel where the track column begins
    pub track_offset: f64,
}

/// Pixel offset of an item within `[0, track_height]`.
///
/// Dated items are placed on the week axis and pinned to the nearest edge
/// when outside the track. Undated items are spread evenly by index, a
/// lone item sitting in the middle.
pub fn compute_top_offset(input: &PositionInput) -> f64 {
    if let (Some(date), Some(origin)) = (input.date, input.origin) {
        if input.axis.total_weeks > 0 {
            let weeks = weeks_between(origin, date);
            let last_offset = f64::from(input.axis.total_weeks.saturating_sub(1));
            let clamped = clamp_number(weeks, 0.0, last_offset);
            let position = input.axis.offset_top(clamped) - input.track_offset;
            return clamp_number(position, 0.0, input.track_height);
        }
    }

    if input.item_count <= 1 {
        return input.track_height / 2.0;
    }
    input.index as f64 / (input.item_count - 1) as f64 * input.track_height
}

/// Geometry shared by every item of one track
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackFrame {
    pub axis: WeekAxis,
    pub origin: Option<NaiveDate>,
    pub weeks: WeekRange,
    pub offset_top: f64,
    pub height: f64,
}

impl TrackFrame {
    /// Frame for `track` on the given axis.
    ///
    /// Without an origin there is nothing to anchor week bounds to, so the
    /// track spans the whole timeline.
    pub fn new(track: &Track, bounds: &TimelineBounds, axis: WeekAxis) -> Self {
        let weeks = if bounds.origin.is_some() {
            track.clamped_weeks(bounds.total_weeks)
        } else {
            WeekRange::full(bounds.total_weeks)
        };
        Self::for_weeks(weeks, bounds.origin, axis)
    }

    /// Frame covering `weeks` of the axis
    pub fn for_weeks(weeks: WeekRange, origin: Option<NaiveDate>, axis: WeekAxis) -> Self {
        Self {
            axis,
            origin,
            weeks,
            offset_top: axis.block_top(weeks.start, weeks.end),
            height: f64::from(weeks.week_count()) * axis.week_height,
        }
    }

    /// Pixel offset for a date (or the index fallback) in this frame
    pub fn top_for(&self, date: Option<NaiveDate>, index: usize, item_count: usize) -> f64 {
        compute_top_offset(&PositionInput {
            date,
            origin: self.origin,
            axis: self.axis,
            index,
            item_count,
            track_height: self.height,
            track_offset: self.offset_top,
        })
    }
}

/// Anchor every item of a track by its start date
pub fn position_items(track: &Track, frame: &TrackFrame) -> Vec<PositionedItem> {
    let count = track.items.len();
    track
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let date = item.start();
            if date.is_none() {
                trace!(track = %track.id, item = %item.id, "undated item placed by index");
            }
            PositionedItem {
                item: item.clone(),
                top_px: frame.top_for(date, index, count),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekline_core::{AxisDirection, TimelineItem};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(date: Option<NaiveDate>, axis: WeekAxis) -> PositionInput {
        PositionInput {
            date,
            origin: Some(self::date(2024, 1, 1)),
            axis,
            index: 0,
            item_count: 1,
            track_height: axis.height(),
            track_offset: 0.0,
        }
    }

    #[test]
    fn week_two_start_is_one_week_down_ascending() {
        let axis = WeekAxis::new(4, 100.0, AxisDirection::Ascending);
        assert_eq!(compute_top_offset(&input(Some(date(2024, 1, 8)), axis)), 100.0);
    }

    #[test]
    fn week_two_start_descending() {
        let axis = WeekAxis::new(4, 100.0, AxisDirection::Descending);
        assert_eq!(compute_top_offset(&input(Some(date(2024, 1, 8)), axis)), 200.0);
        assert_eq!(compute_top_offset(&input(Some(date(2024, 1, 1)), axis)), 300.0);
    }

    #[test]
    fn dates_outside_timeline_are_pinned() {
        let axis = WeekAxis::new(4, 100.0, AxisDirection::Ascending);
        assert_eq!(compute_top_offset(&input(Some(date(2023, 6, 1)), axis)), 0.0);
        assert_eq!(compute_top_offset(&input(Some(date(2025, 6, 1)), axis)), 300.0);
    }

    #[test]
    fn track_offset_is_subtracted_then_clamped() {
        let axis = WeekAxis::new(10, 10.0, AxisDirection::Ascending);
        let mut probe = input(Some(date(2024, 1, 29)), axis);
        probe.track_offset = 20.0;
        probe.track_height = 30.0;
        assert_eq!(compute_top_offset(&probe), 20.0);

        probe.date = Some(date(2024, 1, 1));
        assert_eq!(compute_top_offset(&probe), 0.0);

        probe.date = Some(date(2024, 3, 1));
        assert_eq!(compute_top_offset(&probe), 30.0);
    }

    #[test]
    fn undated_items_spread_by_index() {
        let axis = WeekAxis::new(4, 100.0, AxisDirection::Ascending);
        let mut probe = input(None, axis);
        probe.item_count = 5;
        let tops: Vec<f64> = (0..5)
            .map(|index| compute_top_offset(&PositionInput { index, ..probe }))
            .collect();
        assert_eq!(tops, vec![0.0, 100.0, 200.0, 300.0, 400.0]);
    }

    #[test]
    fn single_undated_item_is_centered() {
        let axis = WeekAxis::new(4, 100.0, AxisDirection::Descending);
        assert_eq!(compute_top_offset(&input(None, axis)), 200.0);
    }

    #[test]
    fn missing_origin_falls_back_to_index() {
        let axis = WeekAxis::new(4, 100.0, AxisDirection::Ascending);
        let mut probe = input(Some(date(2024, 1, 8)), axis);
        probe.origin = None;
        assert_eq!(compute_top_offset(&probe), 200.0);
    }

    #[test]
    fn identical_inputs_give_identical_outputs() {
        let axis = WeekAxis::new(9, 33.3, AxisDirection::Descending);
        let probe = input(Some(date(2024, 2, 7)), axis);
        assert_eq!(compute_top_offset(&probe), compute_top_offset(&probe));
    }

    #[test]
    fn frame_for_partial_track() {
        let bounds = TimelineBounds {
            origin: Some(date(2024, 1, 1)),
            total_weeks: 4,
        };
        let track = Track::new("t").weeks(2, 3);

        let axis = WeekAxis::new(4, 100.0, AxisDirection::Descending);
        let desc = TrackFrame::new(&track, &bounds, axis);
        assert_eq!(desc.offset_top, 100.0);
        assert_eq!(desc.height, 200.0);

        let axis = WeekAxis::new(4, 100.0, AxisDirection::Ascending);
        let asc = TrackFrame::new(&track, &bounds, axis);
        assert_eq!(asc.offset_top, 100.0);
        assert_eq!(asc.height, 200.0);
    }

    #[test]
    fn frame_without_origin_spans_everything() {
        let bounds = TimelineBounds {
            origin: None,
            total_weeks: 6,
        };
        let track = Track::new("t").weeks(2, 3);
        let axis = WeekAxis::new(6, 10.0, AxisDirection::Descending);
        let frame = TrackFrame::new(&track, &bounds, axis);
        assert_eq!(frame.weeks, WeekRange { start: 1, end: 6 });
        assert_eq!(frame.offset_top, 0.0);
        assert_eq!(frame.height, 60.0);
    }

    #[test]
    fn position_items_uses_start_date() {
        let bounds = TimelineBounds {
            origin: Some(date(2024, 1, 1)),
            total_weeks: 4,
        };
        let track = Track::new("t")
            .item(TimelineItem::new("a").starts("2024-01-15"))
            .item(TimelineItem::new("b").ends("2024-01-15"));
        let axis = WeekAxis::new(4, 70.0, AxisDirection::Ascending);
        let frame = TrackFrame::new(&track, &bounds, axis);
        let items = position_items(&track, &frame);
        assert_eq!(items[0].top_px, 140.0);
        // no start date: index fallback, last of two sits at the bottom
        assert_eq!(items[1].top_px, 280.0);
    }
}
