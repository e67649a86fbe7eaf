use std::{fs::File, io::BufReader, path::Path};

use crate::foundation::{
    core::Fps,
    error::{ReelcutError, ReelcutResult},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Knobs shared by the cut-list builder and the OTIO exporter.
///
/// Every field has a default, so an empty JSON object is a valid config.
pub struct CompilerConfig {
    /// Output frame rate used for every seconds -> frames conversion.
    pub fps: Fps,
    /// Fixed media appended to every cut list.
    pub stingers: StingerTable,
    /// Length of the fade into the outro stinger.
    pub outro_fade_secs: f64,
    /// What to do with tracks that map onto no clip while others do.
    pub coverage: CoveragePolicy,
    /// What to do with a track ending past the last clip.
    pub overrun: OverrunPolicy,
    /// How malformed duration text in episode tracks is treated.
    pub durations: DurationPolicy,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            stingers: StingerTable::default(),
            outro_fade_secs: 5.0,
            coverage: CoveragePolicy::default(),
            overrun: OverrunPolicy::default(),
            durations: DurationPolicy::default(),
        }
    }
}

impl CompilerConfig {
    /// Parse a config from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> ReelcutResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| ReelcutError::serde(format!("parse compiler config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> ReelcutResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ReelcutError::validation(format!("open compiler config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate frame rate, fade length and the stinger table.
    pub fn validate(&self) -> ReelcutResult<()> {
        self.fps.validate()?;
        if !self.outro_fade_secs.is_finite() || self.outro_fade_secs < 0.0 {
            return Err(ReelcutError::validation(
                "outro_fade_secs must be finite and >= 0",
            ));
        }
        self.stingers.validate()
    }

    /// Fade-in length of the outro transition, in output frames.
    pub fn outro_fade_frames(&self) -> u64 {
        self.fps.secs_to_frames_floor(self.outro_fade_secs)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Handling of tracks that resolve to no fragments while other tracks do.
pub enum CoveragePolicy {
    /// Drop the unmatched tracks and log them.
    #[default]
    Lenient,
    /// Fail with a coverage error naming the unmatched tracks.
    Strict,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Handling of a track end beyond the end of the virtual timeline.
pub enum OverrunPolicy {
    /// Clamp the end to the end of the last clip.
    #[default]
    Clamp,
    /// Treat the track as unmatched.
    Reject,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Handling of malformed ISO-8601 duration text.
pub enum DurationPolicy {
    /// Malformed text reads as zero seconds.
    #[default]
    Lenient,
    /// Malformed text is a validation error.
    Strict,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Compositing mode the render engine applies to an overlay.
pub enum CompositeType {
    /// Use the overlay's own alpha channel.
    #[default]
    Alpha,
    /// Key out the overlay's background color.
    Colorkey,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
/// One fixed media asset.
pub struct Stinger {
    /// Path of the media file as the render engine sees it.
    pub source_path: String,
    /// Played length in output frames.
    pub duration_frames: u64,
    /// Absolute placement from the start of the output. Ignored for the outro.
    #[serde(default)]
    pub placement_secs: f64,
    /// Compositing mode. Ignored for the outro.
    #[serde(default)]
    pub composite: CompositeType,
}

impl Stinger {
    fn validate(&self, name: &str) -> ReelcutResult<()> {
        if self.source_path.trim().is_empty() {
            return Err(ReelcutError::validation(format!(
                "stinger '{name}' source_path must be non-empty"
            )));
        }
        if self.duration_frames == 0 {
            return Err(ReelcutError::validation(format!(
                "stinger '{name}' duration_frames must be > 0"
            )));
        }
        if !self.placement_secs.is_finite() || self.placement_secs < 0.0 {
            return Err(ReelcutError::validation(format!(
                "stinger '{name}' placement_secs must be finite and >= 0"
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
/// The outro plus the three overlay stingers.
pub struct StingerTable {
    /// Appended to the play order after all content, with a fade-in.
    pub outro: Stinger,
    /// Overlay at the very start of the output.
    pub intro_effect: Stinger,
    /// Platform watermark overlay.
    pub watermark: Stinger,
    /// Reminder banner overlay.
    pub reminder: Stinger,
}

impl Default for StingerTable {
    fn default() -> Self {
        Self {
            outro: Stinger {
                source_path: "stingers/outro.mp4".to_owned(),
                duration_frames: 600,
                placement_secs: 0.0,
                composite: CompositeType::Alpha,
            },
            intro_effect: Stinger {
                source_path: "stingers/intro_effect.mov".to_owned(),
                duration_frames: 180,
                placement_secs: 0.0,
                composite: CompositeType::Colorkey,
            },
            watermark: Stinger {
                source_path: "stingers/watermark.mov".to_owned(),
                duration_frames: 300,
                placement_secs: 30.0,
                composite: CompositeType::Alpha,
            },
            reminder: Stinger {
                source_path: "stingers/reminder.mov".to_owned(),
                duration_frames: 480,
                placement_secs: 60.0,
                composite: CompositeType::Colorkey,
            },
        }
    }
}

impl StingerTable {
    /// Overlay stingers in emission order.
    pub fn overlays(&self) -> [(&'static str, &Stinger); 3] {
        [
            ("intro_effect", &self.intro_effect),
            ("watermark", &self.watermark),
            ("reminder", &self.reminder),
        ]
    }

    fn validate(&self) -> ReelcutResult<()> {
        self.outro.validate("outro")?;
        for (name, stinger) in self.overlays() {
            stinger.validate(name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
