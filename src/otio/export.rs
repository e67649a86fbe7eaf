use std::collections::BTreeMap;

use serde_json::{Map, Value, json};

use crate::{
    config::{CompilerConfig, DurationPolicy},
    duration,
    foundation::core::{Fps, FrameRange},
    foundation::error::ReelcutResult,
    otio::schema::{
        CLIP_SCHEMA, DEFAULT_MEDIA_KEY, EXTERNAL_REFERENCE_SCHEMA, ExternalReference, OtioClip,
        OtioStack, OtioTimeline, OtioTrack, STACK_SCHEMA, TIMELINE_SCHEMA, TRACK_SCHEMA,
        TimeRange,
    },
    timeline::cursor::Fragment,
    timeline::model::{Timeline, Track},
};

/// MIME type offered with the `.otio` download.
pub const OTIO_CONTENT_TYPE: &str = "application/json";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// An edited episode as stored by the dashboard.
pub struct Episode {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Kept ranges on the virtual timeline, as ISO-8601 durations from its start.
    pub tracks: Vec<EpisodeTrack>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EpisodeTrack {
    pub start: String,
    pub end: String,
}

impl EpisodeTrack {
    pub fn from_seconds(start: f64, end: f64) -> Self {
        Self {
            start: duration::from_seconds(start),
            end: duration::from_seconds(end),
        }
    }
}

impl Episode {
    /// Convert duration text to seconds under `policy`.
    pub fn seconds_tracks(&self, policy: DurationPolicy) -> ReelcutResult<Vec<Track>> {
        let read = |text: &str| match policy {
            DurationPolicy::Lenient => Ok(duration::to_seconds(text)),
            DurationPolicy::Strict => duration::parse_seconds(text),
        };
        self.tracks
            .iter()
            .map(|t| Ok(Track::new(read(&t.start)?, read(&t.end)?)))
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A ready-to-download interchange document.
pub struct OtioExport {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: String,
}

/// Export `episode` as a downloadable `.otio` document.
#[tracing::instrument(skip(episode, timeline, cfg), fields(title = %episode.title))]
pub fn export_otio(
    episode: &Episode,
    timeline: &Timeline,
    cfg: &CompilerConfig,
) -> ReelcutResult<OtioExport> {
    let doc = build_otio_timeline(episode, timeline, cfg)?;
    Ok(OtioExport {
        file_name: otio_file_name(&episode.title),
        content_type: OTIO_CONTENT_TYPE,
        body: doc.to_json_pretty()?,
    })
}

/// Map `episode` onto `timeline` and build the OTIO tree.
///
/// Only edited content is represented; stingers belong to the cut list. Any empty resolution,
/// including one caused by an empty track or clip list, is a coverage error.
pub fn build_otio_timeline(
    episode: &Episode,
    timeline: &Timeline,
    cfg: &CompilerConfig,
) -> ReelcutResult<OtioTimeline> {
    cfg.validate()?;
    let tracks = episode.seconds_tracks(cfg.durations)?;
    let resolution = timeline.resolve_tracks(&tracks, cfg.overrun);
    resolution.require_coverage(timeline, &tracks, cfg.coverage)?;

    let clips = resolution
        .fragments
        .iter()
        .zip(resolution.frame_ranges(cfg.fps))
        .map(|(f, frames)| otio_clip(f, frames, timeline, cfg.fps))
        .collect();

    let mut metadata = Map::new();
    metadata.insert(
        "description".to_owned(),
        Value::String(episode.description.clone()),
    );

    Ok(OtioTimeline {
        schema: TIMELINE_SCHEMA.to_owned(),
        metadata,
        name: episode.title.clone(),
        global_start_time: None,
        tracks: OtioStack {
            schema: STACK_SCHEMA.to_owned(),
            metadata: Map::new(),
            name: "tracks".to_owned(),
            source_range: None,
            effects: Vec::new(),
            markers: Vec::new(),
            enabled: true,
            children: vec![OtioTrack {
                schema: TRACK_SCHEMA.to_owned(),
                metadata: Map::new(),
                name: "Video".to_owned(),
                source_range: None,
                effects: Vec::new(),
                markers: Vec::new(),
                enabled: true,
                children: clips,
                kind: "Video".to_owned(),
            }],
        },
    })
}

fn otio_clip(
    fragment: &Fragment,
    frames: FrameRange,
    timeline: &Timeline,
    fps: Fps,
) -> OtioClip {
    let rate = fps.as_f64();
    let clip_secs = timeline
        .clip(fragment.clip_index)
        .map_or(0.0, |c| c.duration_seconds);

    let mut metadata = Map::new();
    metadata.insert(
        "reelcut".to_owned(),
        json!({
            "clip_index": fragment.clip_index,
            "track_index": fragment.track_index,
        }),
    );

    let reference = ExternalReference {
        schema: EXTERNAL_REFERENCE_SCHEMA.to_owned(),
        metadata: Map::new(),
        name: String::new(),
        available_range: Some(TimeRange::frames(
            0,
            fps.secs_to_frames_ceil(clip_secs),
            rate,
        )),
        available_image_bounds: None,
        target_url: fragment.source_path.clone(),
    };

    OtioClip {
        schema: CLIP_SCHEMA.to_owned(),
        metadata,
        name: base_name(&fragment.source_path).to_owned(),
        source_range: TimeRange::frames(frames.start, frames.end, rate),
        effects: Vec::new(),
        markers: Vec::new(),
        enabled: true,
        media_references: BTreeMap::from([(DEFAULT_MEDIA_KEY.to_owned(), reference)]),
        active_media_reference_key: DEFAULT_MEDIA_KEY.to_owned(),
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\'])
        .find(|s| !s.is_empty())
        .unwrap_or(path)
}

/// Lowercase ASCII slug of `title` with an `.otio` extension.
pub fn otio_file_name(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "timeline.otio".to_owned()
    } else {
        format!("{slug}.otio")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/otio/export.rs"]
mod tests;
