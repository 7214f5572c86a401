//! Sprint bands and the week ruler

use tracing::trace;
use weekline_core::dates::week_start_date;
use weekline_core::{SprintBand, TimelineBounds, WeekAxis, WeekLabelMode, WeekMarker, WeekRange};

/// Alternating bands of `sprint_length` weeks; the last band may be shorter
pub fn sprint_bands(axis: &WeekAxis, sprint_length: u32) -> Vec<SprintBand> {
    let total = axis.total_weeks;
    if total < 1 {
        return Vec::new();
    }
    let length = sprint_length.max(1);

    (0..total.div_ceil(length))
        .map(|index| {
            let start = index * length + 1;
            let weeks = WeekRange::new(start, (start + length - 1).min(total));
            SprintBand {
                index: index as usize,
                weeks,
                top_px: axis.block_top(weeks.start, weeks.end),
                height_px: f64::from(weeks.week_count()) * axis.week_height,
                shaded: index % 2 == 0,
            }
        })
        .collect()
}

/// One marker per week, `1..=total_weeks`
pub fn week_markers(
    bounds: &TimelineBounds,
    axis: &WeekAxis,
    sprint_length: u32,
    mode: WeekLabelMode,
) -> Vec<WeekMarker> {
    let length = sprint_length.max(1);
    (1..=axis.total_weeks)
        .map(|week| WeekMarker {
            week,
            top_px: axis.week_top(i64::from(week)),
            label: week_label(bounds, week, mode),
            sprint_boundary: (week - 1) % length == 0,
        })
        .collect()
}

/// "Week N", or the week's Monday as "Jan 8" in date mode
pub fn week_label(bounds: &TimelineBounds, week: u32, mode: WeekLabelMode) -> String {
    match (mode, bounds.origin) {
        (WeekLabelMode::Dates, Some(origin)) => {
            week_start_date(origin, week).format("%b %-d").to_string()
        }
        (WeekLabelMode::Dates, None) => {
            trace!(week, "no origin for date labels");
            format!("Week {week}")
        }
        (WeekLabelMode::Weeks, _) => format!("Week {week}"),
    }
}
