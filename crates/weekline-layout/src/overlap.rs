//! Overlap resolution
//!
//! Two strategies for items that collide vertically inside a track:
//!
//! - **Clusters**: one sweep over card rectangles sorted by top edge,
//!   merging every card that starts within `stack_slop` of the running
//!   cluster bottom. Rendered as stacked cards with a count badge.
//! - **Lanes**: first-fit interval packing. Each item goes to the lowest
//!   lane whose last occupant ends before the item starts (minus
//!   `lane_gap`), otherwise a new lane opens.
//!
//! Both sort with a stable sort, so ties keep the track's item order.

use weekline_core::{
    ClusteredItem, ItemCluster, ItemLine, LayoutTuning, PositionedItem, TimelineItem, Track,
};

use crate::position::TrackFrame;
use crate::spans::span_extent;

// ============================================================================
// Clusters
// ============================================================================

/// Group positioned items whose estimated cards overlap
pub fn build_clusters(items: &[PositionedItem], tuning: &LayoutTuning) -> Vec<ItemCluster> {
    if items.is_empty() {
        return Vec::new();
    }

    let mut cards: Vec<ClusteredItem> = items
        .iter()
        .map(|positioned| {
            let card_top = (positioned.top_px - tuning.card_anchor_offset).max(0.0);
            ClusteredItem {
                item: positioned.item.clone(),
                top_px: positioned.top_px,
                card_top,
                card_bottom: card_top + tuning.card_height_estimate,
            }
        })
        .collect();
    cards.sort_by(|a, b| a.card_top.total_cmp(&b.card_top));

    let mut clusters = Vec::new();
    let mut current: Vec<ClusteredItem> = Vec::new();
    let mut current_end = f64::NEG_INFINITY;

    for card in cards {
        let overlaps = card.card_top <= current_end + tuning.stack_slop;
        if !overlaps && !current.is_empty() {
            clusters.push(close_cluster(std::mem::take(&mut current)));
        }
        current_end = current_end.max(card.card_bottom);
        current.push(card);
    }

    if !current.is_empty() {
        clusters.push(close_cluster(current));
    }

    clusters
}

fn close_cluster(items: Vec<ClusteredItem>) -> ItemCluster {
    let top = items
        .iter()
        .map(|c| c.card_top)
        .fold(f64::INFINITY, f64::min);
    let bottom = items
        .iter()
        .map(|c| c.card_bottom)
        .fold(f64::NEG_INFINITY, f64::max);
    let id = items
        .iter()
        .map(|c| c.item.id.as_str())
        .collect::<Vec<_>>()
        .join("-");

    ItemCluster {
        id,
        items,
        container_top: top,
        container_height: bottom - top,
    }
}

// ============================================================================
// Lanes
// ============================================================================

/// An item with its vertical extent, waiting for a lane
#[derive(Clone, Debug, PartialEq)]
pub struct LineCandidate {
    pub item: TimelineItem,
    pub top_px: f64,
    pub height_px: f64,
}

/// Result of lane packing for one track
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LaneAssignment {
    /// Lines in ascending top order
    pub lines: Vec<ItemLine>,
    pub lane_count: usize,
}

/// Extents for every item of a track: ranged items use their span, point
/// items their anchor with the minimum span height.
pub fn line_candidates(
    track: &Track,
    frame: &TrackFrame,
    tuning: &LayoutTuning,
) -> Vec<LineCandidate> {
    let count = track.items.len();
    track
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let (top_px, height_px) = span_extent(item, index, count, frame, tuning)
                .unwrap_or_else(|| {
                    let top = frame.top_for(item.start(), index, count);
                    (top, tuning.min_span_height)
                });
            LineCandidate {
                item: item.clone(),
                top_px,
                height_px,
            }
        })
        .collect()
}

/// First-fit lane packing
pub fn assign_lanes(mut candidates: Vec<LineCandidate>, lane_gap: f64) -> LaneAssignment {
    candidates.sort_by(|a, b| a.top_px.total_cmp(&b.top_px));

    let mut lane_bottoms: Vec<f64> = Vec::new();
    let mut lines = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let bottom = candidate.top_px + candidate.height_px;
        let threshold = candidate.top_px - lane_gap;
        let lane = match lane_bottoms.iter().position(|&last| last < threshold) {
            Some(lane) => {
                lane_bottoms[lane] = bottom;
                lane
            }
            None => {
                lane_bottoms.push(bottom);
                lane_bottoms.len() - 1
            }
        };

        let LineCandidate {
            item,
            top_px,
            height_px,
        } = candidate;
        lines.push(ItemLine {
            id: item.id,
            title: item.title,
            annotation: item.annotation,
            start_date: item.start_date,
            end_date: item.end_date,
            top_px,
            height_px,
            lane,
        });
    }

    LaneAssignment {
        lines,
        lane_count: lane_bottoms.len(),
    }
}
