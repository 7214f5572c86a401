//! Interaction state
//!
//! Hosts keep one [`InteractionState`] per timeline and feed it
//! [`Action`]s from their event handlers. The state is a plain value:
//! `reduce` consumes it and returns the next one, and
//! [`InteractionState::view_state`] turns it into the input the layout
//! engine needs.

use serde::{Deserialize, Serialize};
use tracing::trace;
use weekline_core::dates::clamp_number;
use weekline_core::{Scale, WeekRange};

use crate::zoom::{ViewState, DEFAULT_VIEWPORT_HEIGHT};

pub const LINE_WIDTH_RANGE: (u32, u32) = (2, 16);
pub const LANE_SPACING_RANGE: (u32, u32) = (10, 36);
pub const DEFAULT_LINE_WIDTH: u32 = 4;
pub const DEFAULT_LANE_SPACING: u32 = 12;

/// The line whose detail card is open
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedLine {
    pub track_id: String,
    pub line_id: String,
}

/// A week-rail drag in progress
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeDrag {
    pub anchor: u32,
    pub current: u32,
}

impl RangeDrag {
    pub fn range(&self) -> WeekRange {
        WeekRange::new(self.anchor, self.current)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    SelectLine { track_id: String, line_id: String },
    ClearLine,
    /// Select a milestone, or deselect it when already selected
    ToggleMilestone { id: String },
    SetScale { scale: Scale },
    PointerDown { week: u32 },
    PointerMove { week: u32 },
    PointerUp,
    ResetZoom,
    SetViewportHeight { px: f64 },
    OpenSettings,
    CloseSettings,
    SetLineWidth { px: u32 },
    SetLaneSpacing { px: u32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionState {
    pub selected_line: Option<SelectedLine>,
    pub selected_milestone: Option<String>,
    pub scale: Scale,
    pub view_range: Option<WeekRange>,
    pub drag: Option<RangeDrag>,
    pub settings_open: bool,
    pub line_width: u32,
    pub lane_spacing: u32,
    pub viewport_height: f64,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            selected_line: None,
            selected_milestone: None,
            scale: Scale::default(),
            view_range: None,
            drag: None,
            settings_open: false,
            line_width: DEFAULT_LINE_WIDTH,
            lane_spacing: DEFAULT_LANE_SPACING,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action
    #[must_use]
    pub fn reduce(mut self, action: Action) -> Self {
        trace!(?action, "interaction");
        match action {
            Action::SelectLine { track_id, line_id } => {
                self.selected_line = Some(SelectedLine { track_id, line_id });
            }
            Action::ClearLine => self.selected_line = None,
            Action::ToggleMilestone { id } => {
                self.selected_milestone = match self.selected_milestone.take() {
                    Some(current) if current == id => None,
                    _ => Some(id),
                };
            }
            Action::SetScale { scale } => self.scale = scale,
            Action::PointerDown { week } => {
                self.drag = Some(RangeDrag {
                    anchor: week,
                    current: week,
                });
            }
            Action::PointerMove { week } => {
                if let Some(drag) = self.drag.as_mut() {
                    drag.current = week;
                }
            }
            Action::PointerUp => {
                if let Some(drag) = self.drag.take() {
                    let range = drag.range();
                    // a click without movement resets the zoom
                    self.view_range = (!range.is_single_week()).then_some(range);
                }
            }
            Action::ResetZoom => {
                self.view_range = None;
                self.drag = None;
            }
            Action::SetViewportHeight { px } => {
                if px.is_finite() && px > 0.0 {
                    self.viewport_height = px;
                }
            }
            Action::OpenSettings => self.settings_open = true,
            Action::CloseSettings => self.settings_open = false,
            Action::SetLineWidth { px } => {
                self.line_width = px.clamp(LINE_WIDTH_RANGE.0, LINE_WIDTH_RANGE.1);
            }
            Action::SetLaneSpacing { px } => {
                self.lane_spacing = px.clamp(LANE_SPACING_RANGE.0, LANE_SPACING_RANGE.1);
            }
        }
        self
    }

    /// Range under the pointer while dragging, for highlighting
    pub fn candidate_range(&self) -> Option<WeekRange> {
        self.drag.map(|drag| drag.range())
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Input for the layout engine
    pub fn view_state(&self) -> ViewState {
        ViewState {
            scale: self.scale,
            range: self.view_range,
            viewport_height: clamp_number(self.viewport_height, 1.0, f64::MAX),
        }
    }
}
