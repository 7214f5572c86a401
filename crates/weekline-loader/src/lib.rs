//! # weekline-loader
//!
//! Reads tracks and milestones from JSON exports and timeline settings
//! from TOML.
//!
//! This crate provides:
//! - Validating JSON loaders driven by a [`FieldMapping`]
//! - Annotation normalization and duplicate item id renaming
//! - TOML configuration loading (`[timeline]`, `[tuning]`, `[mapping]`)
//!
//! ## Example
//!
//! ```rust
//! use weekline_loader::{load_tracks_str, FieldMapping};
//!
//! let input = r##"[
//!   {"id": "web", "name": "Web", "colour": "#1fb6ff", "items": [
//!     {"id": "login", "name": "Login", "at": "2024-02-05", "annotation": "[Feature]"}
//!   ]}
//! ]"##;
//!
//! let tracks = load_tracks_str(input, &FieldMapping::default()).unwrap();
//! assert_eq!(tracks[0].items[0].annotation, "feature");
//! ```

pub mod config;
pub mod mapping;

pub use config::{load_config_file, parse_config, WeeklineConfig};
pub use mapping::{FieldMapping, ItemFields, TrackFields};

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use weekline_core::dates::parse_date;
use weekline_core::{ConfigError, Milestone, TimelineItem, Track};

/// Loading error
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid data: {0}")]
    Invalid(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl LoadError {
    fn invalid(message: impl Into<String>) -> Self {
        LoadError::Invalid(message.into())
    }
}

type Object = Map<String, Value>;

// ============================================================================
// Tracks
// ============================================================================

/// Parse and validate a JSON array of tracks
pub fn load_tracks_str(input: &str, mapping: &FieldMapping) -> Result<Vec<Track>, LoadError> {
    let value: Value = serde_json::from_str(input)?;
    load_tracks_value(&value, mapping)
}

/// Validate already-parsed JSON tracks
pub fn load_tracks_value(value: &Value, mapping: &FieldMapping) -> Result<Vec<Track>, LoadError> {
    let raw_tracks = value
        .as_array()
        .ok_or_else(|| LoadError::invalid("Tracks data must be an array"))?;
    let tracks = raw_tracks
        .iter()
        .map(|raw| read_track(raw, mapping))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        tracks = tracks.len(),
        items = tracks.iter().map(|t| t.items.len()).sum::<usize>(),
        "loaded tracks"
    );
    Ok(tracks)
}

/// Read tracks from a JSON file
pub fn load_tracks_file(path: &Path, mapping: &FieldMapping) -> Result<Vec<Track>, LoadError> {
    load_tracks_str(&read_file(path)?, mapping)
}

fn read_track(value: &Value, mapping: &FieldMapping) -> Result<Track, LoadError> {
    let fields = &mapping.track;
    let object = value
        .as_object()
        .ok_or_else(|| LoadError::invalid("Track must be an object"))?;

    let id = string_field(object, &fields.id, "Track id")?;
    let name = string_field(object, &fields.name, "Track name")?;
    let color = string_field(object, &fields.color, "Track color")?;

    let raw_items = object
        .get(&fields.items)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            LoadError::invalid(format!(
                "Track {id} items must be an array (expected field: {})",
                fields.items
            ))
        })?;

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut items = Vec::with_capacity(raw_items.len());
    for raw in raw_items {
        let mut item = read_item(raw, mapping)?;
        let count = seen.entry(item.id.clone()).or_insert(0);
        *count += 1;
        if *count > 1 {
            let renamed = format!("{}__{}", item.id, count);
            debug!(track = %id, item = %item.id, %renamed, "duplicate item id renamed");
            item.id = renamed;
        }
        items.push(item);
    }

    let start_week = week_field(object, fields.start_week.as_deref(), &id, "startWeek")?;
    let end_week = week_field(object, fields.end_week.as_deref(), &id, "endWeek")?;

    Ok(Track {
        id,
        name,
        color,
        items,
        start_week,
        end_week,
    })
}

fn read_item(value: &Value, mapping: &FieldMapping) -> Result<TimelineItem, LoadError> {
    let fields = &mapping.item;
    let object = value
        .as_object()
        .ok_or_else(|| LoadError::invalid("Item must be an object"))?;

    let id = string_field(object, &fields.id, "Item id")?;
    let title = string_field(object, &fields.title, "Item title")?;

    let annotation = object
        .get(&fields.annotation)
        .filter(|v| !v.is_null())
        .or_else(|| {
            (fields.annotation != "annotation")
                .then(|| object.get("annotation"))
                .flatten()
        })
        .and_then(Value::as_str)
        .map(normalize_annotation)
        .unwrap_or_default();

    let start_date = match object.get(&fields.start_date).and_then(Value::as_str) {
        Some(raw) if parse_date(raw).is_some() => raw.to_string(),
        _ => {
            return Err(LoadError::invalid(format!(
                "Invalid start date for item {id} (expected field: {})",
                fields.start_date
            )))
        }
    };

    let end_date = match object.get(&fields.end_date) {
        None => None,
        Some(Value::String(raw)) if parse_date(raw).is_some() => Some(raw.clone()),
        Some(_) => {
            return Err(LoadError::invalid(format!(
                "Invalid end date for item {id} (expected field: {})",
                fields.end_date
            )))
        }
    };

    Ok(TimelineItem {
        id,
        title,
        annotation,
        start_date: Some(start_date),
        end_date,
    })
}

/// Trim, drop one surrounding pair of brackets, lowercase: `" [Bug] "` → `"bug"`
pub fn normalize_annotation(raw: &str) -> String {
    let cleaned = raw.trim();
    let cleaned = cleaned.strip_prefix('[').unwrap_or(cleaned);
    let cleaned = cleaned.strip_suffix(']').unwrap_or(cleaned);
    cleaned.trim().to_lowercase()
}

fn string_field(object: &Object, field: &str, label: &str) -> Result<String, LoadError> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            LoadError::invalid(format!("{label} must be a string (expected field: {field})"))
        })
}

/// Optional week bound; fractional weeks round down
fn week_field(
    object: &Object,
    field: Option<&str>,
    track_id: &str,
    label: &str,
) -> Result<Option<i64>, LoadError> {
    let Some(field) = field else {
        return Ok(None);
    };
    match object.get(field) {
        None => Ok(None),
        Some(value) => value
            .as_f64()
            .filter(|n| n.is_finite())
            .map(|n| Some(n.floor() as i64))
            .ok_or_else(|| {
                LoadError::invalid(format!(
                    "Track {track_id} has invalid {label} (expected field: {field})"
                ))
            }),
    }
}

// ============================================================================
// Milestones
// ============================================================================

/// Parse and validate a JSON array of milestones
/// (`{"project_name", "title", "at"}` objects)
pub fn load_milestones_str(input: &str) -> Result<Vec<Milestone>, LoadError> {
    let value: Value = serde_json::from_str(input)?;
    load_milestones_value(&value)
}

pub fn load_milestones_value(value: &Value) -> Result<Vec<Milestone>, LoadError> {
    let raw = value
        .as_array()
        .ok_or_else(|| LoadError::invalid("Milestones data must be an array"))?;
    let milestones = raw.iter().map(read_milestone).collect::<Result<Vec<_>, _>>()?;
    debug!(milestones = milestones.len(), "loaded milestones");
    Ok(milestones)
}

pub fn load_milestones_file(path: &Path) -> Result<Vec<Milestone>, LoadError> {
    load_milestones_str(&read_file(path)?)
}

fn read_milestone(value: &Value) -> Result<Milestone, LoadError> {
    let object = value
        .as_object()
        .ok_or_else(|| LoadError::invalid("Milestone must be an object"))?;
    let project = object
        .get("project_name")
        .and_then(Value::as_str)
        .ok_or_else(|| LoadError::invalid("Milestone missing project_name"))?;
    let title = object
        .get("title")
        .and_then(Value::as_str)
        .ok_or_else(|| LoadError::invalid("Milestone missing title"))?;
    let at = object
        .get("at")
        .and_then(Value::as_str)
        .filter(|raw| parse_date(raw).is_some())
        .ok_or_else(|| LoadError::invalid(format!("Milestone {title} has invalid date")))?;
    Ok(Milestone::new(project, title, at))
}

pub(crate) fn read_file(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
