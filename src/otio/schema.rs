//! The subset of the OpenTimelineIO JSON schema the exporter emits.
//!
//! Every object carries its `OTIO_SCHEMA` tag first, followed by fields in a fixed order, so
//! serialization is byte-stable.

use serde_json::{Map, Value};

use crate::foundation::error::{ReelcutError, ReelcutResult};

pub const TIMELINE_SCHEMA: &str = "Timeline.1";
pub const STACK_SCHEMA: &str = "Stack.1";
pub const TRACK_SCHEMA: &str = "Track.1";
pub const CLIP_SCHEMA: &str = "Clip.2";
pub const EXTERNAL_REFERENCE_SCHEMA: &str = "ExternalReference.1";
pub const TIME_RANGE_SCHEMA: &str = "TimeRange.1";
pub const RATIONAL_TIME_SCHEMA: &str = "RationalTime.1";

/// Key of the single media reference each clip carries.
pub const DEFAULT_MEDIA_KEY: &str = "DEFAULT_MEDIA";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RationalTime {
    #[serde(rename = "OTIO_SCHEMA")]
    pub schema: String,
    pub rate: f64,
    pub value: f64,
}

impl RationalTime {
    pub fn frames(value: u64, rate: f64) -> Self {
        Self {
            schema: RATIONAL_TIME_SCHEMA.to_owned(),
            rate,
            value: value as f64,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeRange {
    #[serde(rename = "OTIO_SCHEMA")]
    pub schema: String,
    pub duration: RationalTime,
    pub start_time: RationalTime,
}

impl TimeRange {
    /// `[start_frame, end_frame)` at `rate`.
    pub fn frames(start_frame: u64, end_frame: u64, rate: f64) -> Self {
        Self {
            schema: TIME_RANGE_SCHEMA.to_owned(),
            duration: RationalTime::frames(end_frame.saturating_sub(start_frame), rate),
            start_time: RationalTime::frames(start_frame, rate),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExternalReference {
    #[serde(rename = "OTIO_SCHEMA")]
    pub schema: String,
    pub metadata: Map<String, Value>,
    pub name: String,
    pub available_range: Option<TimeRange>,
    pub available_image_bounds: Option<Value>,
    pub target_url: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OtioClip {
    #[serde(rename = "OTIO_SCHEMA")]
    pub schema: String,
    pub metadata: Map<String, Value>,
    pub name: String,
    pub source_range: TimeRange,
    pub effects: Vec<Value>,
    pub markers: Vec<Value>,
    pub enabled: bool,
    pub media_references: std::collections::BTreeMap<String, ExternalReference>,
    pub active_media_reference_key: String,
}

impl OtioClip {
    /// The clip's `DEFAULT_MEDIA` reference, if present.
    pub fn default_media(&self) -> Option<&ExternalReference> {
        self.media_references.get(DEFAULT_MEDIA_KEY)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OtioTrack {
    #[serde(rename = "OTIO_SCHEMA")]
    pub schema: String,
    pub metadata: Map<String, Value>,
    pub name: String,
    pub source_range: Option<TimeRange>,
    pub effects: Vec<Value>,
    pub markers: Vec<Value>,
    pub enabled: bool,
    pub children: Vec<OtioClip>,
    pub kind: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OtioStack {
    #[serde(rename = "OTIO_SCHEMA")]
    pub schema: String,
    pub metadata: Map<String, Value>,
    pub name: String,
    pub source_range: Option<TimeRange>,
    pub effects: Vec<Value>,
    pub markers: Vec<Value>,
    pub enabled: bool,
    pub children: Vec<OtioTrack>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Root of an `.otio` document.
pub struct OtioTimeline {
    #[serde(rename = "OTIO_SCHEMA")]
    pub schema: String,
    pub metadata: Map<String, Value>,
    pub name: String,
    pub global_start_time: Option<RationalTime>,
    pub tracks: OtioStack,
}

impl OtioTimeline {
    pub fn from_json(s: &str) -> ReelcutResult<Self> {
        serde_json::from_str(s).map_err(|e| ReelcutError::serde(format!("parse OTIO JSON: {e}")))
    }

    pub fn to_json_pretty(&self) -> ReelcutResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ReelcutError::serde(format!("serialize OTIO JSON: {e}")))
    }

    /// Clips of every track, in play order.
    pub fn clips(&self) -> impl Iterator<Item = &OtioClip> {
        self.tracks.children.iter().flat_map(|t| t.children.iter())
    }
}
