//! Milestone marker rows

use tracing::debug;
use weekline_core::{Milestone, MilestoneRow, TimelineBounds, WeekAxis};

/// Place milestones on the axis and group them by calendar day.
///
/// Milestones with an unusable date, or dated outside the timeline, are
/// left out rather than pinned to an edge: a marker line at the wrong
/// date would be misleading. Rows come back sorted by pixel top.
pub fn milestone_rows(
    milestones: &[Milestone],
    bounds: &TimelineBounds,
    axis: &WeekAxis,
    label_limit: usize,
) -> Vec<MilestoneRow> {
    if bounds.origin.is_none() || milestones.is_empty() || bounds.total_weeks < 1 {
        return Vec::new();
    }

    let last_offset = f64::from(bounds.total_weeks - 1);
    let mut rows: Vec<MilestoneRow> = Vec::new();

    for milestone in milestones {
        let Some(day) = milestone.date() else {
            debug!(milestone = %milestone.id(), "skipping milestone with unusable date");
            continue;
        };
        let Some(offset) = bounds.week_offset(day) else {
            continue;
        };
        if !(0.0..=last_offset).contains(&offset) {
            debug!(milestone = %milestone.id(), offset, "milestone outside timeline");
            continue;
        }

        match rows.iter_mut().find(|row| row.day == day) {
            Some(row) => row.milestones.push(milestone.clone()),
            None => rows.push(MilestoneRow {
                day,
                top_px: axis.offset_top(offset),
                milestones: vec![milestone.clone()],
                label_limit,
            }),
        }
    }

    rows.sort_by(|a, b| a.top_px.total_cmp(&b.top_px));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use weekline_core::AxisDirection;

    fn bounds() -> TimelineBounds {
        TimelineBounds {
            origin: NaiveDate::from_ymd_opt(2024, 1, 1),
            total_weeks: 4,
        }
    }

    #[test]
    fn same_day_milestones_share_a_row() {
        let axis = WeekAxis::new(4, 70.0, AxisDirection::Ascending);
        let rows = milestone_rows(
            &[
                Milestone::new("Core", "Beta", "2024-01-15"),
                Milestone::new("Web", "Launch", "2024-01-08"),
                Milestone::new("Mobile", "Beta", "2024-01-15T18:00:00Z"),
            ],
            &bounds(),
            &axis,
            3,
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].top_px, 70.0);
        assert_eq!(rows[1].top_px, 140.0);
        assert_eq!(rows[1].milestones.len(), 2);
        assert_eq!(rows[1].milestones[0].project, "Core");
    }

    #[test]
    fn mid_week_milestone_sits_between_week_tops() {
        let axis = WeekAxis::new(4, 70.0, AxisDirection::Ascending);
        let rows = milestone_rows(
            &[Milestone::new("a", "thursday", "2024-01-11")],
            &bounds(),
            &axis,
            3,
        );
        assert!((rows[0].top_px - 100.0).abs() < 1e-9);
    }

    #[test]
    fn later_days_sit_higher_within_a_descending_week() {
        let axis = WeekAxis::new(4, 70.0, AxisDirection::Descending);
        let rows = milestone_rows(
            &[
                Milestone::new("a", "thursday", "2024-01-11"),
                Milestone::new("a", "friday", "2024-01-12"),
            ],
            &bounds(),
            &axis,
            3,
        );
        assert_eq!(rows[0].milestones[0].title, "friday");
        assert!((rows[0].top_px - 100.0).abs() < 1e-9);
        assert!((rows[1].top_px - 110.0).abs() < 1e-9);
    }

    #[test]
    fn descending_rows_put_latest_first() {
        let axis = WeekAxis::new(4, 70.0, AxisDirection::Descending);
        let rows = milestone_rows(
            &[
                Milestone::new("a", "early", "2024-01-02"),
                Milestone::new("b", "late", "2024-01-22"),
            ],
            &bounds(),
            &axis,
            3,
        );
        assert_eq!(rows[0].milestones[0].title, "late");
        assert_eq!(rows[1].milestones[0].title, "early");
    }

    #[test]
    fn out_of_range_and_invalid_are_dropped() {
        let axis = WeekAxis::new(4, 70.0, AxisDirection::Ascending);
        let rows = milestone_rows(
            &[
                Milestone::new("a", "before", "2023-12-31"),
                Milestone::new("a", "after", "2024-01-23"),
                Milestone::new("a", "garbage", "someday"),
                Milestone::new("a", "last", "2024-01-22"),
            ],
            &bounds(),
            &axis,
            3,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].milestones[0].title, "last");
    }

    #[test]
    fn no_origin_no_rows() {
        let axis = WeekAxis::new(4, 70.0, AxisDirection::Ascending);
        let bounds = TimelineBounds {
            origin: None,
            total_weeks: 4,
        };
        let rows = milestone_rows(&[Milestone::new("a", "b", "2024-01-02")], &bounds, &axis, 3);
        assert!(rows.is_empty());
        assert!(milestone_rows(&[], &self::bounds(), &axis, 3).is_empty());
    }
}
