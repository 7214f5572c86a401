//! # weekline-render
//!
//! Rendering backends for weekline layouts.
//!
//! This crate provides:
//! - SVG rendering of a full timeline: sprint bands, week rail, track
//!   columns with spans, lanes or stacked cards, milestone rows
//! - A plain text summary for the console
//! - Color helpers for tinting track colors (`color`)
//!
//! Renderers never compute positions themselves; they draw the geometry of
//! a [`TimelineLayout`] produced by `weekline-layout`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use weekline_core::Renderer;
//! use weekline_render::SvgRenderer;
//!
//! let layout = engine.layout(&tracks, &milestones, &view);
//! let svg = SvgRenderer::new().column_width(200.0).render(&layout)?;
//! std::fs::write("timeline.svg", svg)?;
//! ```

pub mod color;

use std::fmt::Write as _;

use svg::node::element::{Circle, Group, Line, Rectangle, Text};
use svg::Document;
use tracing::debug;
use weekline_core::{
    ItemCluster, ItemLine, MilestoneRow, RenderError, Renderer, SprintBand, TimelineLayout,
    TrackLayout, TrackOverlap, WeekMarker,
};

const SELECTED_COLOR: &str = "#1fb6ff";
const SPRINT_BOUNDARY_COLOR: &str = "#ff7849";
const WEEK_DOT_COLOR: &str = "#8492a6";

/// SVG timeline renderer configuration
#[derive(Clone, Debug)]
pub struct SvgRenderer {
    /// Padding around the whole drawing
    pub padding: f64,
    /// Width of the week rail on the left
    pub rail_width: f64,
    /// Width of one track column
    pub column_width: f64,
    /// Horizontal gap between track columns
    pub column_gap: f64,
    /// Stroke width of item lines
    pub line_width: f64,
    /// Extra horizontal space between lanes
    pub lane_spacing: f64,
    /// Width of duration span bars
    pub span_width: f64,
    pub background_color: String,
    pub text_color: String,
    pub font_family: String,
    pub font_size: u32,
    /// Milestone id (`"{title}-{at}"`) drawn highlighted
    pub selected_milestone: Option<String>,
    /// Item id drawn highlighted
    pub selected_item: Option<String>,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            padding: 20.0,
            rail_width: 140.0,
            column_width: 180.0,
            column_gap: 40.0,
            line_width: 4.0,
            lane_spacing: 12.0,
            span_width: 8.0,
            background_color: "#ffffff".into(),
            text_color: "#3c4858".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
            selected_milestone: None,
            selected_item: None,
        }
    }
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column_width(mut self, width: f64) -> Self {
        self.column_width = width;
        self
    }

    pub fn line_width(mut self, width: f64) -> Self {
        self.line_width = width.max(2.0);
        self
    }

    pub fn lane_spacing(mut self, spacing: f64) -> Self {
        self.lane_spacing = spacing;
        self
    }

    pub fn selected_milestone(mut self, id: Option<String>) -> Self {
        self.selected_milestone = id;
        self
    }

    pub fn selected_item(mut self, id: Option<String>) -> Self {
        self.selected_item = id;
        self
    }

    fn total_width(&self, track_count: usize) -> f64 {
        self.padding * 2.0
            + self.rail_width
            + track_count as f64 * (self.column_width + self.column_gap)
    }

    /// Page y of ruler pixel 0
    fn ruler_top(&self, layout: &TimelineLayout) -> f64 {
        self.padding + layout.guide_top_offset
    }

    fn column_x(&self, index: usize) -> f64 {
        self.padding + self.rail_width + index as f64 * (self.column_width + self.column_gap)
    }

    fn text(&self, content: impl Into<String>, x: f64, y: f64) -> Text {
        Text::new(content.into())
            .set("x", x)
            .set("y", y)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size)
            .set("fill", self.text_color.as_str())
    }

    fn render_sprints(&self, bands: &[SprintBand], top: f64, width: f64) -> Group {
        let mut group = Group::new().set("class", "sprints");
        for band in bands {
            let fill = if band.shaded {
                "rgba(132,146,166,0.06)"
            } else {
                "none"
            };
            let rect = Rectangle::new()
                .set("x", self.padding)
                .set("y", top + band.top_px)
                .set("width", width - self.padding * 2.0)
                .set("height", band.height_px)
                .set("fill", fill)
                .set("stroke", "rgba(132,146,166,0.25)")
                .set("stroke-dasharray", "4 4");
            group = group.add(rect);
        }
        group
    }

    fn render_week_rail(&self, markers: &[WeekMarker], top: f64, height: f64) -> Group {
        let x = self.padding + 16.0;
        let mut group = Group::new().set("class", "week-rail");
        group = group.add(
            Line::new()
                .set("x1", x)
                .set("y1", top)
                .set("x2", x)
                .set("y2", top + height)
                .set("stroke", "#d3dce6")
                .set("stroke-width", 2),
        );
        for marker in markers {
            let y = top + marker.top_px;
            let fill = if marker.sprint_boundary {
                SPRINT_BOUNDARY_COLOR
            } else {
                WEEK_DOT_COLOR
            };
            group = group
                .add(Circle::new().set("cx", x).set("cy", y).set("r", 6).set("fill", fill))
                .add(self.text(marker.label.as_str(), x + 14.0, y + 4.0).set("font-weight", "600"));
        }
        group
    }

    fn render_track(&self, track: &TrackLayout, index: usize, top: f64) -> Group {
        let x = self.column_x(index);
        let column_top = top + track.offset_top;
        let mut group = Group::new()
            .set("class", "track")
            .set("data-track", track.track_id.as_str());

        // header
        group = group
            .add(
                Circle::new()
                    .set("cx", x + 6.0)
                    .set("cy", self.padding + 12.0)
                    .set("r", 6)
                    .set("fill", track.color.as_str()),
            )
            .add(
                self.text(track.name.as_str(), x + 18.0, self.padding + 16.0)
                    .set("font-weight", "bold"),
            );

        group = group.add(
            Rectangle::new()
                .set("x", x)
                .set("y", column_top)
                .set("width", self.column_width)
                .set("height", track.height)
                .set("rx", 8)
                .set("fill", color::with_alpha(&track.color, 0.06))
                .set("stroke", color::lighten(&track.color, 0.7)),
        );

        for span in &track.spans {
            group = group.add(
                Rectangle::new()
                    .set("x", x + 4.0)
                    .set("y", column_top + span.top_px)
                    .set("width", self.span_width)
                    .set("height", span.height_px)
                    .set("rx", self.span_width / 2.0)
                    .set("fill", color::with_alpha(&track.color, 0.35))
                    .set("data-item", span.id.as_str()),
            );
        }

        match &track.overlap {
            TrackOverlap::Lanes { lines, .. } => {
                for line in lines {
                    group = group.add(self.render_line(line, &track.color, x, column_top));
                }
            }
            TrackOverlap::Clusters { clusters } => {
                for cluster in clusters {
                    group = group.add(self.render_cluster(cluster, &track.color, x, column_top));
                }
            }
        }

        group
    }

    fn render_line(&self, line: &ItemLine, track_color: &str, x: f64, top: f64) -> Group {
        let selected = self.selected_item.as_deref() == Some(line.id.as_str());
        let stroke = if selected { SELECTED_COLOR } else { track_color };
        let lx = x + 24.0 + line.lane as f64 * (self.line_width + self.lane_spacing);
        let (y1, y2) = (top + line.top_px, top + line.bottom_px());
        let node_radius = self.line_width / 2.0 + 2.0;

        let mut title = line.title.clone();
        if !line.annotation.is_empty() {
            let _ = write!(title, " [{}]", line.annotation);
        }

        Group::new()
            .set("class", "item-line")
            .set("data-item", line.id.as_str())
            .set("data-lane", line.lane as u32)
            .set("aria-label", title)
            .add(
                Line::new()
                    .set("x1", lx)
                    .set("y1", y1)
                    .set("x2", lx)
                    .set("y2", y2)
                    .set("stroke", stroke)
                    .set("stroke-opacity", if selected { 1.0 } else { 0.85 })
                    .set("stroke-width", self.line_width)
                    .set("stroke-linecap", "round"),
            )
            .add(
                Circle::new()
                    .set("cx", lx)
                    .set("cy", y1)
                    .set("r", node_radius)
                    .set("fill", stroke),
            )
            .add(
                Circle::new()
                    .set("cx", lx)
                    .set("cy", y2)
                    .set("r", node_radius)
                    .set("fill", stroke),
            )
    }

    fn render_cluster(&self, cluster: &ItemCluster, track_color: &str, x: f64, top: f64) -> Group {
        let card_x = x + 20.0;
        let card_width = self.column_width - 28.0;
        let y = top + cluster.container_top;
        let selected = self
            .selected_item
            .as_deref()
            .is_some_and(|id| cluster.contains(id));

        let mut group = Group::new().set("class", "item-cluster").add(
            Rectangle::new()
                .set("x", card_x)
                .set("y", y)
                .set("width", card_width)
                .set("height", cluster.container_height)
                .set("rx", 6)
                .set("fill", "#ffffff")
                .set("stroke", if selected { SELECTED_COLOR } else { "#d3dce6" }),
        );

        let lead = cluster.items.first().map(|c| c.item.title.as_str()).unwrap_or_default();
        group = group.add(self.text(truncate(lead, 22), card_x + 10.0, y + 20.0));

        if cluster.is_stack() {
            let badge_x = card_x + card_width - 12.0;
            group = group
                .add(
                    Circle::new()
                        .set("cx", badge_x)
                        .set("cy", y + 14.0)
                        .set("r", 9)
                        .set("fill", color::darken(track_color, 0.15)),
                )
                .add(
                    self.text(cluster.items.len().to_string(), badge_x, y + 18.0)
                        .set("fill", "#ffffff")
                        .set("text-anchor", "middle"),
                );
        }
        group
    }

    fn render_milestones(&self, rows: &[MilestoneRow], top: f64, width: f64) -> Group {
        let mut group = Group::new().set("class", "milestones");
        let x1 = self.padding + self.rail_width;
        let x2 = width - self.padding;

        for row in rows {
            let y = top + row.top_px;
            let selected = self
                .selected_milestone
                .as_deref()
                .is_some_and(|id| row.contains(id));

            group = group.add(
                Line::new()
                    .set("x1", x1)
                    .set("y1", y)
                    .set("x2", x2)
                    .set("y2", y)
                    .set("stroke", if selected { SELECTED_COLOR } else { "rgba(132,146,166,0.4)" })
                    .set("stroke-width", if selected { 2 } else { 1 }),
            );

            let mut label = row
                .labelled()
                .iter()
                .map(|m| m.label())
                .collect::<Vec<_>>()
                .join("  ·  ");
            if row.has_overflow() {
                let _ = write!(label, "  ({} markers)", row.milestones.len());
            }
            group = group.add(
                self.text(label, x2, y - 4.0)
                    .set("text-anchor", "end")
                    .set("font-size", self.font_size.saturating_sub(1)),
            );
        }
        group
    }
}

impl Renderer for SvgRenderer {
    type Output = String;

    fn render(&self, layout: &TimelineLayout) -> Result<String, RenderError> {
        if layout.tracks.is_empty() {
            return Err(RenderError::InvalidData("No tracks to render".into()));
        }

        let width = self.total_width(layout.tracks.len());
        let top = self.ruler_top(layout);
        let height = top + layout.total_height() + self.padding;
        debug!(width, height, tracks = layout.tracks.len(), "rendering svg");

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .set("xmlns", "http://www.w3.org/2000/svg");

        document = document.add(
            Rectangle::new()
                .set("width", "100%")
                .set("height", "100%")
                .set("fill", self.background_color.as_str()),
        );

        document = document.add(self.render_sprints(&layout.sprints, top, width));
        document = document.add(self.render_week_rail(&layout.weeks, top, layout.total_height()));
        for (index, track) in layout.tracks.iter().enumerate() {
            document = document.add(self.render_track(track, index, top));
        }
        document = document.add(self.render_milestones(&layout.milestones, top, width));

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| RenderError::Format(format!("Failed to write SVG: {}", e)))?;

        String::from_utf8(output).map_err(|e| RenderError::Format(format!("Invalid UTF-8: {}", e)))
    }
}

/// Truncate to `max` characters with an ellipsis
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Plain text summary for console output
#[derive(Default)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, layout: &TimelineLayout) -> Result<String, RenderError> {
        let mut out = String::new();
        let origin = layout
            .bounds
            .origin
            .map_or_else(|| "undated".to_string(), |d| d.to_string());
        let _ = writeln!(
            out,
            "Timeline: {} weeks from {} ({}, {:.0}px/week)",
            layout.total_weeks(),
            origin,
            layout.axis.direction,
            layout.effective_week_height()
        );
        if let Some(range) = layout.view_range {
            let _ = writeln!(out, "Zoomed to weeks {range}");
        }

        for track in &layout.tracks {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "{} ({}) weeks {}, {} items",
                track.name,
                track.track_id,
                track.weeks,
                track.items.len()
            );
            match &track.overlap {
                TrackOverlap::Lanes { lines, lane_count } => {
                    let _ = writeln!(out, "  {lane_count} lanes");
                    for line in lines {
                        let _ = writeln!(
                            out,
                            "  [lane {}] {} {:.1}..{:.1}",
                            line.lane,
                            line.title,
                            line.top_px,
                            line.bottom_px()
                        );
                    }
                }
                TrackOverlap::Clusters { clusters } => {
                    let _ = writeln!(out, "  {} clusters", clusters.len());
                    for cluster in clusters {
                        let titles: Vec<&str> =
                            cluster.items.iter().map(|c| c.item.title.as_str()).collect();
                        let _ = writeln!(
                            out,
                            "  [{:.1}] {}",
                            cluster.container_top,
                            titles.join(", ")
                        );
                    }
                }
            }
        }

        if !layout.milestones.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Milestones:");
            for row in &layout.milestones {
                let labels: Vec<String> = row.labelled().iter().map(|m| m.label()).collect();
                let _ = write!(out, "  {} {}", row.day, labels.join(", "));
                if row.has_overflow() {
                    let _ = write!(out, " ({} markers)", row.milestones.len());
                }
                let _ = writeln!(out);
            }
        }

        Ok(out)
    }
}
