//! TOML configuration
//!
//! ```toml
//! [timeline]
//! weeks = 12
//! axis = "descending"
//! overlap = "lanes"
//! track_priority = ["Platform", "Mobile"]
//!
//! [tuning]
//! stack_slop = 6
//!
//! [mapping.track]
//! color = "color"
//! ```
//!
//! Every table and key is optional. `[tuning]` is a shorthand for
//! `[timeline.tuning]` and wins when both are present.

use serde::Deserialize;
use std::path::Path;
use tracing::debug;
use weekline_core::{LayoutTuning, TimelineConfig};

use crate::{read_file, FieldMapping, LoadError};

/// Everything a config file can set
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeeklineConfig {
    pub timeline: TimelineConfig,
    pub mapping: FieldMapping,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    timeline: TimelineConfig,
    tuning: Option<LayoutTuning>,
    mapping: FieldMapping,
}

/// Parse and validate a TOML configuration
pub fn parse_config(input: &str) -> Result<WeeklineConfig, LoadError> {
    let file: ConfigFile = toml::from_str(input)?;
    let mut timeline = file.timeline;
    if let Some(tuning) = file.tuning {
        timeline.tuning = tuning;
    }
    timeline.validate()?;
    debug!(axis = %timeline.axis, overlap = timeline.overlap.as_str(), "configuration loaded");
    Ok(WeeklineConfig {
        timeline,
        mapping: file.mapping,
    })
}

pub fn load_config_file(path: &Path) -> Result<WeeklineConfig, LoadError> {
    parse_config(&read_file(path)?)
}
