//! Minimap geometry
//!
//! A scaled-down copy of the timeline: one dot per dated item and a box
//! showing which part of the body is on screen. Everything works on plain
//! measurements so hosts can feed it from any scroll source.

use serde::Serialize;
use weekline_core::dates::{clamp_number, weeks_between};
use weekline_core::{AxisDirection, TimelineBounds, Track, WeekAxis};

/// Default minimap width in pixels
pub const MINIMAP_WIDTH: f64 = 220.0;

/// Smallest height of the viewport box
pub const MIN_VIEWPORT_BOX: f64 = 24.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MinimapMarker {
    pub id: String,
    pub top: f64,
    /// Horizontal center of the track column
    pub left: f64,
    pub color: String,
}

/// Minimap height for a window, one sixth of it
pub fn minimap_height_for(window_height: f64) -> f64 {
    (window_height / 6.0).round()
}

/// Dots for every item with a start date. `tracks` must already be in
/// display order; each gets an equal-width column.
pub fn minimap_markers(
    tracks: &[&Track],
    bounds: &TimelineBounds,
    direction: AxisDirection,
    width: f64,
    height: f64,
) -> Vec<MinimapMarker> {
    let Some(origin) = bounds.origin else {
        return Vec::new();
    };
    let total = bounds.total_weeks.max(1);
    let column = width / tracks.len().max(1) as f64;
    let axis = WeekAxis::new(total, height / f64::from(total), direction);
    let last_offset = f64::from(total - 1);

    tracks
        .iter()
        .enumerate()
        .flat_map(|(column_index, track)| {
            let left = column_index as f64 * column + column / 2.0;
            track.items.iter().filter_map(move |item| {
                let start = item.start()?;
                let offset = clamp_number(weeks_between(origin, start), 0.0, last_offset);
                Some(MinimapMarker {
                    id: item.id.clone(),
                    top: axis.offset_top(offset),
                    left,
                    color: track.color.clone(),
                })
            })
        })
        .collect()
}

/// Page measurements needed to place the viewport box
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportMeasure {
    /// Page offset of the timeline body's top edge
    pub body_top: f64,
    pub body_height: f64,
    pub scroll_y: f64,
    pub viewport_height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MinimapBox {
    pub top: f64,
    pub height: f64,
}

/// Visible slice of the body, scaled into minimap pixels.
///
/// An empty slice shows a quarter of the minimap; the box is never smaller
/// than [`MIN_VIEWPORT_BOX`].
pub fn minimap_viewport(measure: &ViewportMeasure, minimap_height: f64) -> MinimapBox {
    let visible_start = measure.scroll_y.max(measure.body_top);
    let visible_end = (measure.scroll_y + measure.viewport_height)
        .min(measure.body_top + measure.body_height);
    let visible_height = (visible_end - visible_start).max(0.0);
    let ratio = if measure.body_height > 0.0 {
        minimap_height / measure.body_height
    } else {
        0.0
    };

    let scaled = visible_height * ratio;
    let height = if scaled > 0.0 { scaled } else { minimap_height / 4.0 };
    MinimapBox {
        top: (visible_start - measure.body_top) * ratio,
        height: height.max(MIN_VIEWPORT_BOX),
    }
}
