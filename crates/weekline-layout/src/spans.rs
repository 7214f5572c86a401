//! Duration span builder

use tracing::trace;
use weekline_core::dates::clamp_number;
use weekline_core::{DurationSpan, LayoutTuning, TimelineItem, Track};

use crate::position::TrackFrame;

/// Vertical extent `(top, height)` of a ranged item.
///
/// Returns `None` unless both dates parse. Reversed dates are accepted.
pub fn span_extent(
    item: &TimelineItem,
    index: usize,
    item_count: usize,
    frame: &TrackFrame,
    tuning: &LayoutTuning,
) -> Option<(f64, f64)> {
    let (start, end) = (item.start()?, item.end()?);
    let start_px = frame.top_for(Some(start), index, item_count);
    let end_px = frame.top_for(Some(end), index, item_count);

    let top = clamp_number(start_px.min(end_px), 0.0, frame.height);
    let bottom = clamp_number(start_px.max(end_px), 0.0, frame.height);
    Some((top, tuning.min_span_height.max(bottom - top)))
}

/// Spans for every item of `track` that has both a start and an end date
pub fn build_spans(track: &Track, frame: &TrackFrame, tuning: &LayoutTuning) -> Vec<DurationSpan> {
    let count = track.items.len();
    track
        .items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let Some((top_px, height_px)) = span_extent(item, index, count, frame, tuning) else {
                trace!(track = %track.id, item = %item.id, "no span without two dates");
                return None;
            };
            Some(DurationSpan {
                id: item.id.clone(),
                top_px,
                height_px,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use weekline_core::{AxisDirection, TimelineBounds, WeekAxis};

    fn frame(direction: AxisDirection) -> TrackFrame {
        let bounds = TimelineBounds {
            origin: NaiveDate::from_ymd_opt(2024, 4, 29),
            total_weeks: 6,
        };
        TrackFrame::new(&Track::new("t"), &bounds, WeekAxis::new(6, 70.0, direction))
    }

    #[test]
    fn empty_track_has_no_spans() {
        let spans = build_spans(
            &Track::new("t"),
            &frame(AxisDirection::Ascending),
            &LayoutTuning::default(),
        );
        assert!(spans.is_empty());
    }

    #[test]
    fn reversed_dates_produce_the_same_span() {
        let tuning = LayoutTuning::default();
        for direction in [AxisDirection::Ascending, AxisDirection::Descending] {
            let f = frame(direction);
            let forward = Track::new("t")
                .item(TimelineItem::new("x").starts("2024-05-01").ends("2024-05-10"));
            let backward = Track::new("t")
                .item(TimelineItem::new("x").starts("2024-05-10").ends("2024-05-01"));
            assert_eq!(
                build_spans(&forward, &f, &tuning),
                build_spans(&backward, &f, &tuning)
            );
        }
    }

    #[test]
    fn reversed_span_starts_at_earlier_date() {
        let track =
            Track::new("t").item(TimelineItem::new("x").starts("2024-05-10").ends("2024-05-01"));
        let spans =
            build_spans(&track, &frame(AxisDirection::Ascending), &LayoutTuning::default());
        assert_eq!(spans.len(), 1);
        // 2024-05-01 is two days after the Monday origin; 70px per week = 10px per day
        assert_eq!(spans[0].top_px, 20.0);
        assert_eq!(spans[0].height_px, 90.0);
    }

    #[test]
    fn same_day_span_gets_minimum_height() {
        let track =
            Track::new("t").item(TimelineItem::new("x").starts("2024-05-02").ends("2024-05-02"));
        let spans =
            build_spans(&track, &frame(AxisDirection::Descending), &LayoutTuning::default());
        assert_eq!(spans[0].height_px, 6.0);
    }

    #[test]
    fn items_missing_a_date_are_skipped() {
        let track = Track::new("t")
            .item(TimelineItem::new("only-start").starts("2024-05-02"))
            .item(TimelineItem::new("bad-end").starts("2024-05-02").ends("whenever"))
            .item(TimelineItem::new("none"));
        let spans = build_spans(&track, &frame(AxisDirection::Ascending), &LayoutTuning::default());
        assert!(spans.is_empty());
    }
}
