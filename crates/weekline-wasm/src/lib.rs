//! WebAssembly bindings for the weekline layout engine
//!
//! This crate exposes two surfaces to JavaScript:
//! - One-shot functions (`layout_json`, `render_svg`) that take JSON strings
//!   and return JSON or SVG
//! - A stateful [`TimelineView`] holding loaded data plus the interaction
//!   state, driven by actions from the host's pointer and keyboard events

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use weekline_core::dates::parse_date;
use weekline_core::{Milestone, Renderer, Scale, TimelineConfig, TimelineLayout, Track};
use weekline_layout::minimap::{self, MinimapBox, MinimapMarker};
use weekline_layout::{Action, InteractionState, TimelineEngine, ViewState, ViewportMeasure};
use weekline_loader::{load_milestones_str, load_tracks_str, parse_config, FieldMapping};
use weekline_render::SvgRenderer;

/// Initialize panic hook for better error messages in console
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// ============================================================================
// One-shot functions
// ============================================================================

/// Options accepted by the one-shot functions
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LayoutOptions {
    config: TimelineConfig,
    view: ViewState,
    mapping: FieldMapping,
}

fn layout_internal(
    tracks_json: &str,
    milestones_json: &str,
    options_json: &str,
) -> Result<TimelineLayout, String> {
    let options: LayoutOptions = if options_json.trim().is_empty() {
        LayoutOptions::default()
    } else {
        serde_json::from_str(options_json).map_err(|e| format!("Invalid options: {}", e))?
    };
    let tracks = load_tracks_str(tracks_json, &options.mapping).map_err(|e| e.to_string())?;
    let milestones = if milestones_json.trim().is_empty() {
        Vec::new()
    } else {
        load_milestones_str(milestones_json).map_err(|e| e.to_string())?
    };
    let engine = TimelineEngine::try_new(options.config).map_err(|e| e.to_string())?;
    Ok(engine.layout(&tracks, &milestones, &options.view))
}

/// Compute a layout and return it as JSON
///
/// `milestones_json` and `options_json` may be empty strings.
#[wasm_bindgen]
pub fn layout_json(
    tracks_json: &str,
    milestones_json: &str,
    options_json: &str,
) -> Result<String, JsValue> {
    let layout = layout_internal(tracks_json, milestones_json, options_json)
        .map_err(|e| JsValue::from_str(&e))?;
    serde_json::to_string(&layout).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Compute a layout and render it as SVG
#[wasm_bindgen]
pub fn render_svg(
    tracks_json: &str,
    milestones_json: &str,
    options_json: &str,
) -> Result<String, JsValue> {
    let layout = layout_internal(tracks_json, milestones_json, options_json)
        .map_err(|e| JsValue::from_str(&e))?;
    SvgRenderer::new()
        .render(&layout)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

// ============================================================================
// TimelineView Class
// ============================================================================

#[derive(Serialize)]
struct LoadResult {
    success: bool,
    error: Option<String>,
    tracks: usize,
    items: usize,
    milestones: usize,
}

/// Loaded timeline data plus the user's interaction state
#[wasm_bindgen]
pub struct TimelineView {
    engine: TimelineEngine,
    mapping: FieldMapping,
    tracks: Vec<Track>,
    milestones: Vec<Milestone>,
    state: InteractionState,
    last_error: Option<String>,
}

#[wasm_bindgen]
impl TimelineView {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            engine: TimelineEngine::default(),
            mapping: FieldMapping::default(),
            tracks: Vec::new(),
            milestones: Vec::new(),
            state: InteractionState::new(),
            last_error: None,
        }
    }

    /// Apply a TOML configuration
    ///
    /// Returns false and records the error when the configuration is invalid.
    pub fn configure(&mut self, toml: &str) -> bool {
        match parse_config(toml) {
            Ok(config) => {
                self.engine = TimelineEngine::new(config.timeline);
                self.mapping = config.mapping;
                self.last_error = None;
                true
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    /// Load tracks and milestones from JSON
    ///
    /// # Returns
    /// `{ success, error, tracks, items, milestones }`
    pub fn load(&mut self, tracks_json: &str, milestones_json: &str) -> JsValue {
        let result = self.load_internal(tracks_json, milestones_json);
        serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
    }

    /// Apply one interaction action, e.g. `{ type: "pointerDown", week: 3 }`
    pub fn dispatch(&mut self, action: JsValue) -> Result<(), JsValue> {
        let action: Action = serde_wasm_bindgen::from_value(action)?;
        self.apply(action);
        Ok(())
    }

    /// Same as `dispatch`, with the action as a JSON string
    pub fn dispatch_json(&mut self, action_json: &str) -> bool {
        match serde_json::from_str::<Action>(action_json) {
            Ok(action) => {
                self.apply(action);
                true
            }
            Err(e) => {
                self.last_error = Some(format!("Invalid action: {}", e));
                false
            }
        }
    }

    pub fn pointer_down(&mut self, week: u32) {
        self.apply(Action::PointerDown { week });
    }

    pub fn pointer_move(&mut self, week: u32) {
        self.apply(Action::PointerMove { week });
    }

    pub fn pointer_up(&mut self) {
        self.apply(Action::PointerUp);
    }

    pub fn reset_zoom(&mut self) {
        self.apply(Action::ResetZoom);
    }

    /// Set the zoom scale by name; unknown names leave it unchanged
    pub fn set_scale(&mut self, scale: &str) -> bool {
        match scale.parse::<Scale>() {
            Ok(scale) => {
                self.apply(Action::SetScale { scale });
                true
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    pub fn set_viewport_height(&mut self, px: f64) {
        self.apply(Action::SetViewportHeight { px });
    }

    /// Week range being dragged, as `[start, end]`, or empty
    pub fn candidate_range(&self) -> Vec<u32> {
        self.state
            .candidate_range()
            .map(|r| vec![r.start, r.end])
            .unwrap_or_default()
    }

    /// Layout for the current data and view as JSON
    pub fn layout_json(&self) -> String {
        serde_json::to_string(&self.current_layout()).unwrap_or_default()
    }

    /// Current interaction state as JSON
    pub fn state_json(&self) -> String {
        serde_json::to_string(&self.state).unwrap_or_default()
    }

    /// Render the current view with the selected line and milestone highlighted
    ///
    /// # Returns
    /// SVG string, or empty string when nothing is loaded
    pub fn render_svg(&self) -> String {
        self.render_internal().unwrap_or_default()
    }

    /// Page offset that brings the visible range's top under the header
    pub fn scroll_target(&self, body_page_top: f64) -> f64 {
        self.engine
            .scroll_target(&self.current_layout(), body_page_top)
    }

    /// Minimap dots as JSON `[{ id, top, left, color }]`
    ///
    /// A non-positive `width` uses the default minimap width.
    pub fn minimap_json(&self, width: f64, height: f64) -> String {
        let width = if width > 0.0 { width } else { minimap::MINIMAP_WIDTH };
        let markers: Vec<MinimapMarker> = self.engine.minimap(&self.tracks, width, height);
        serde_json::to_string(&markers).unwrap_or_default()
    }

    /// Minimap viewport box as JSON `{ top, height }`
    pub fn minimap_viewport_json(
        &self,
        body_top: f64,
        body_height: f64,
        scroll_y: f64,
        viewport_height: f64,
        minimap_height: f64,
    ) -> String {
        let measure = ViewportMeasure {
            body_top,
            body_height,
            scroll_y,
            viewport_height,
        };
        let viewport: MinimapBox = minimap::minimap_viewport(&measure, minimap_height);
        serde_json::to_string(&viewport).unwrap_or_default()
    }

    /// Number of items active on `day` (`YYYY-MM-DD`)
    pub fn active_count(&self, day: &str) -> usize {
        parse_date(day).map_or(0, |day| self.engine.activity(&self.tracks).active_count(day))
    }

    pub fn get_last_error(&self) -> Option<String> {
        self.last_error.clone()
    }
}

impl TimelineView {
    fn apply(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(action);
    }

    fn load_internal(&mut self, tracks_json: &str, milestones_json: &str) -> LoadResult {
        let loaded = load_tracks_str(tracks_json, &self.mapping).and_then(|tracks| {
            let milestones = if milestones_json.trim().is_empty() {
                Vec::new()
            } else {
                load_milestones_str(milestones_json)?
            };
            Ok((tracks, milestones))
        });

        match loaded {
            Ok((tracks, milestones)) => {
                self.tracks = tracks;
                self.milestones = milestones;
                self.last_error = None;
                LoadResult {
                    success: true,
                    error: None,
                    tracks: self.tracks.len(),
                    items: self.tracks.iter().map(|t| t.items.len()).sum(),
                    milestones: self.milestones.len(),
                }
            }
            Err(e) => {
                let message = e.to_string();
                self.last_error = Some(message.clone());
                LoadResult {
                    success: false,
                    error: Some(message),
                    tracks: 0,
                    items: 0,
                    milestones: 0,
                }
            }
        }
    }

    fn current_layout(&self) -> TimelineLayout {
        self.engine
            .layout(&self.tracks, &self.milestones, &self.state.view_state())
    }

    fn render_internal(&self) -> Result<String, String> {
        let renderer = SvgRenderer::new()
            .line_width(f64::from(self.state.line_width))
            .lane_spacing(f64::from(self.state.lane_spacing))
            .selected_milestone(self.state.selected_milestone.clone())
            .selected_item(self.state.selected_line.as_ref().map(|s| s.line_id.clone()));
        renderer
            .render(&self.current_layout())
            .map_err(|e| e.to_string())
    }
}

impl Default for TimelineView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACKS: &str = r##"[
      {"id": "web", "name": "Web", "colour": "#13ce66", "items": [
        {"id": "login", "name": "Login", "at": "2024-01-01", "endAt": "2024-01-12"},
        {"id": "search", "name": "Search", "at": "2024-01-03", "endAt": "2024-01-08"}
      ]},
      {"id": "api", "name": "API", "colour": "#7e5bef", "items": [
        {"id": "rate", "name": "Rate limits", "at": "2024-02-20"}
      ]}
    ]"##;

    #[test]
    fn one_shot_layout() {
        let layout = layout_internal(TRACKS, "", "").unwrap();
        assert_eq!(layout.total_weeks(), 8);
        assert_eq!(layout.tracks[0].track_id, "api");
    }

    #[test]
    fn one_shot_layout_with_options() {
        let options = r#"{
            "config": {"axis": "ascending"},
            "view": {"range": {"start": 2, "end": 3}, "viewportHeight": 500}
        }"#;
        let layout = layout_internal(TRACKS, "", options).unwrap();
        assert_eq!(layout.effective_week_height(), 250.0);
        assert_eq!(layout.tracks[1].item_top("login"), Some(0.0));
    }

    #[test]
    fn one_shot_layout_reports_bad_options() {
        let err = layout_internal(TRACKS, "", "{").unwrap_err();
        assert!(err.starts_with("Invalid options"));
    }

    #[test]
    fn view_loads_and_zooms() {
        let mut view = TimelineView::new();
        let result = view.load_internal(TRACKS, "");
        assert!(result.success);
        assert_eq!(result.items, 3);

        view.pointer_down(2);
        view.pointer_move(4);
        assert_eq!(view.candidate_range(), vec![2, 4]);
        view.pointer_up();

        let layout = view.current_layout();
        assert_eq!(layout.view_range.map(|r| (r.start, r.end)), Some((2, 4)));
        assert_eq!(layout.effective_week_height(), 300.0);

        view.reset_zoom();
        assert!(!view.current_layout().is_zoomed());
    }

    #[test]
    fn view_dispatches_json_actions() {
        let mut view = TimelineView::new();
        view.load_internal(TRACKS, "");

        assert!(view.dispatch_json(r#"{"type": "setScale", "scale": "large"}"#));
        assert_eq!(view.current_layout().effective_week_height(), 108.0);

        assert!(!view.dispatch_json(r#"{"type": "explode"}"#));
        assert!(view.get_last_error().is_some());
    }

    #[test]
    fn view_load_failure_keeps_previous_data() {
        let mut view = TimelineView::new();
        view.load_internal(TRACKS, "");
        let result = view.load_internal("[{\"id\": 1}]", "");
        assert!(!result.success);
        assert_eq!(view.tracks.len(), 2);
    }

    #[test]
    fn view_configure() {
        let mut view = TimelineView::new();
        assert!(view.configure("[timeline]\noverlap = \"clusters\"\n"));
        assert!(!view.configure("[timeline]\nsprint_length = 0\n"));
        assert!(view.get_last_error().is_some());
    }

    #[test]
    fn view_renders_selected_line() {
        let mut view = TimelineView::new();
        view.load_internal(TRACKS, "");
        assert!(!view.render_svg().contains("#1fb6ff\""));

        view.dispatch_json(r#"{"type": "selectLine", "trackId": "web", "lineId": "search"}"#);
        let svg = view.render_svg();
        assert!(svg.contains("stroke=\"#1fb6ff\""));
    }

    #[test]
    fn view_minimap() {
        let mut view = TimelineView::new();
        view.load_internal(TRACKS, "");
        let markers: serde_json::Value =
            serde_json::from_str(&view.minimap_json(0.0, 160.0)).unwrap();
        assert_eq!(markers.as_array().map(Vec::len), Some(3));
        assert_eq!(markers[0]["left"], 55.0);
    }

    #[test]
    fn view_active_count() {
        let mut view = TimelineView::new();
        view.load_internal(TRACKS, "");
        assert_eq!(view.active_count("2024-01-05"), 2);
        assert_eq!(view.active_count("2024-01-10"), 1);
        assert_eq!(view.active_count("not a date"), 0);
    }
}
