use crate::{
    config::CompositeType,
    foundation::error::{ReelcutError, ReelcutResult},
};

/// Schema version stamped into every cut list.
pub const CUT_LIST_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Render-engine description of what to play, in which order, with which overlays.
pub struct CutList {
    /// Source files, deduplicated by path, in first-seen order.
    pub input_media: Vec<InputMedia>,
    /// Linear play order.
    pub output_track: Vec<OutputEntry>,
    /// Compositing layers anchored to absolute output frames.
    pub overlay_tracks: Vec<OverlayEntry>,
    pub version: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputMedia {
    pub source_path: String,
    /// In-file frame spans, in the order they were first referenced.
    pub sections: Vec<Section>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub start_frame: u64,
    pub end_frame: u64,
}

impl Section {
    pub fn len_frames(self) -> u64 {
        self.end_frame.saturating_sub(self.start_frame)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputEntry {
    pub media_index: usize,
    pub section_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_in: Option<Transition>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    #[serde(rename = "type")]
    pub kind: TransitionKind,
    pub duration_frames: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Fade,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayEntry {
    pub media_index: usize,
    pub section_index: usize,
    /// Absolute frame in the finished output.
    pub start_frame: u64,
    #[serde(rename = "type")]
    pub kind: CompositeType,
}

impl CutList {
    /// Parse a cut list from JSON and check its internal references.
    pub fn from_json(s: &str) -> ReelcutResult<Self> {
        let cut: Self = serde_json::from_str(s)
            .map_err(|e| ReelcutError::serde(format!("parse cut list JSON: {e}")))?;
        cut.validate()?;
        Ok(cut)
    }

    /// Pretty JSON in field-declaration order.
    pub fn to_json_pretty(&self) -> ReelcutResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ReelcutError::serde(format!("serialize cut list JSON: {e}")))
    }

    /// Every media/section index must resolve and every section must be ordered.
    pub fn validate(&self) -> ReelcutResult<()> {
        for media in &self.input_media {
            for section in &media.sections {
                if section.start_frame > section.end_frame {
                    return Err(ReelcutError::validation(format!(
                        "section of '{}' has start_frame > end_frame",
                        media.source_path
                    )));
                }
            }
        }
        for entry in &self.output_track {
            self.section(entry.media_index, entry.section_index)?;
        }
        for entry in &self.overlay_tracks {
            self.section(entry.media_index, entry.section_index)?;
        }
        Ok(())
    }

    /// Look up a section by media and section index.
    pub fn section(&self, media_index: usize, section_index: usize) -> ReelcutResult<Section> {
        self.input_media
            .get(media_index)
            .and_then(|m| m.sections.get(section_index))
            .copied()
            .ok_or_else(|| {
                ReelcutError::validation(format!(
                    "cut list references missing section {media_index}/{section_index}"
                ))
            })
    }

    /// Total played frames along the output track.
    pub fn output_len_frames(&self) -> ReelcutResult<u64> {
        self.output_track.iter().try_fold(0u64, |acc, e| {
            let len = self.section(e.media_index, e.section_index)?.len_frames();
            acc.checked_add(len).ok_or_else(|| {
                ReelcutError::validation("output track length overflows the frame counter")
            })
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cutlist/model.rs"]
mod tests;
