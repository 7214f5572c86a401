//! View range and zoom
//!
//! Zooming never moves items around on its own: it picks a week range and
//! stretches the week height so that range fills the viewport. Every
//! position is then computed with the zoomed height through the same axis.

use serde::{Deserialize, Serialize};
use tracing::debug;
use weekline_core::{Scale, TimelineConfig, WeekRange};

/// Height assumed for the viewport when the host has not measured it
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 900.0;

/// What the user is looking at, independent of the data
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewState {
    pub scale: Scale,
    /// Zoom selection; `None` shows the whole timeline
    pub range: Option<WeekRange>,
    pub viewport_height: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            scale: Scale::default(),
            range: None,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    pub fn range(mut self, range: WeekRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn viewport_height(mut self, px: f64) -> Self {
        self.viewport_height = px;
        self
    }

    /// Week heights and the clamped range for a timeline of `total_weeks`.
    ///
    /// A range that covers a single week after clamping is treated as no
    /// zoom, the same as a single-week drag selection.
    pub fn resolve(&self, config: &TimelineConfig, total_weeks: u32) -> ResolvedView {
        let base = self.scale.week_height(config.week_height);
        let range = self.range.and_then(|requested| {
            let clamped = requested.clamped(total_weeks);
            if clamped != requested {
                debug!(%requested, %clamped, total_weeks, "view range clamped");
            }
            if clamped.is_single_week() {
                debug!(%clamped, "single-week range ignored");
                return None;
            }
            Some(clamped)
        });
        ResolvedView {
            base_week_height: base,
            effective_week_height: effective_week_height(
                base,
                self.viewport_height,
                range,
                total_weeks,
            ),
            range,
        }
    }
}

/// Output of [`ViewState::resolve`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedView {
    pub base_week_height: f64,
    pub effective_week_height: f64,
    pub range: Option<WeekRange>,
}

/// Week height that fits `range` into the viewport, or `base` when not zoomed.
///
/// A viewport that yields no usable height keeps the base height.
pub fn effective_week_height(
    base: f64,
    viewport_height: f64,
    range: Option<WeekRange>,
    total_weeks: u32,
) -> f64 {
    let Some(range) = range else {
        return base;
    };
    let visible = range.clamped(total_weeks).week_count();
    let zoomed = viewport_height / f64::from(visible);
    if zoomed.is_finite() && zoomed > 0.0 {
        zoomed
    } else {
        base
    }
}
