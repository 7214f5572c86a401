//! Field names used to read tracks and items from JSON
//!
//! Exports from different tools name the same things differently
//! (`colour` vs `color`, `at` vs `start`). A [`FieldMapping`] says where to
//! look; it can be given in code or in the `[mapping]` table of a config
//! file.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackFields {
    pub id: String,
    pub name: String,
    pub color: String,
    pub items: String,
    /// `None` ignores week bounds in the input
    pub start_week: Option<String>,
    pub end_week: Option<String>,
}

impl Default for TrackFields {
    fn default() -> Self {
        Self {
            id: "id".into(),
            name: "name".into(),
            color: "colour".into(),
            items: "items".into(),
            start_week: Some("startWeek".into()),
            end_week: Some("endWeek".into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemFields {
    pub id: String,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub annotation: String,
}

impl Default for ItemFields {
    fn default() -> Self {
        Self {
            id: "id".into(),
            title: "name".into(),
            start_date: "at".into(),
            end_date: "endAt".into(),
            annotation: "annotation".into(),
        }
    }
}

/// Where each track and item field lives in the input objects
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub track: TrackFields,
    pub item: ItemFields,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track_color(mut self, field: impl Into<String>) -> Self {
        self.track.color = field.into();
        self
    }

    pub fn item_title(mut self, field: impl Into<String>) -> Self {
        self.item.title = field.into();
        self
    }

    pub fn item_dates(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.item.start_date = start.into();
        self.item.end_date = end.into();
        self
    }

    pub fn item_annotation(mut self, field: impl Into<String>) -> Self {
        self.item.annotation = field.into();
        self
    }
}
