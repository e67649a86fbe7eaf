use crate::foundation::error::{ReelcutError, ReelcutResult};

/// Tolerance used when comparing positions on the virtual timeline.
pub const BOUNDARY_EPSILON: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One recorded file segment.
pub struct PhysicalClip {
    /// Path or URI of the recorded file.
    pub source_path: String,
    /// Length of the file in seconds.
    pub duration_seconds: f64,
    /// Position on the virtual timeline; the previous clip's end when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_offset_seconds: Option<f64>,
}

impl PhysicalClip {
    pub fn new(source_path: impl Into<String>, duration_seconds: f64) -> Self {
        Self {
            source_path: source_path.into(),
            duration_seconds,
            start_offset_seconds: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A user-selected `[start, end)` range on the virtual timeline.
pub struct Track {
    pub start_seconds: f64,
    pub end_seconds: f64,
}

impl Track {
    pub fn new(start_seconds: f64, end_seconds: f64) -> Self {
        Self {
            start_seconds,
            end_seconds,
        }
    }

    /// Finite bounds with `start < end`.
    pub fn is_well_formed(self) -> bool {
        self.start_seconds.is_finite()
            && self.end_seconds.is_finite()
            && self.start_seconds < self.end_seconds
    }
}

/// The physical clips of one recording laid out on the virtual timeline.
///
/// Clip positions are precomputed once so cursor lookups are binary searches.
#[derive(Clone, Debug)]
pub struct Timeline {
    clips: Vec<PhysicalClip>,
    starts: Vec<f64>,
    ends: Vec<f64>,
}

impl Timeline {
    /// Lay out `clips` in the given order.
    ///
    /// Rejects negative or non-finite durations and explicit offsets that would move a clip
    /// before the end of its predecessor.
    pub fn new(clips: Vec<PhysicalClip>) -> ReelcutResult<Self> {
        let mut starts = Vec::with_capacity(clips.len());
        let mut ends = Vec::with_capacity(clips.len());
        let mut prev_end = 0.0f64;

        for (i, clip) in clips.iter().enumerate() {
            if !clip.duration_seconds.is_finite() || clip.duration_seconds < 0.0 {
                return Err(ReelcutError::validation(format!(
                    "clip #{i} '{}' duration must be finite and >= 0",
                    clip.source_path
                )));
            }
            let start = match clip.start_offset_seconds {
                Some(offset) => {
                    if !offset.is_finite() || offset < prev_end - 1e-6 {
                        return Err(ReelcutError::validation(format!(
                            "clip #{i} '{}' starts at {offset}s, before the previous clip ends at \
                             {prev_end}s; clips must be sorted by timeline position",
                            clip.source_path
                        )));
                    }
                    offset.max(prev_end)
                }
                None => prev_end,
            };
            let end = start + clip.duration_seconds;
            starts.push(start);
            ends.push(end);
            prev_end = end;
        }

        Ok(Self {
            clips,
            starts,
            ends,
        })
    }

    pub fn clips(&self) -> &[PhysicalClip] {
        &self.clips
    }

    pub fn clip(&self, index: usize) -> Option<&PhysicalClip> {
        self.clips.get(index)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// End of the last clip, or zero for an empty timeline.
    pub fn total_secs(&self) -> f64 {
        self.ends.last().copied().unwrap_or(0.0)
    }

    pub(crate) fn starts(&self) -> &[f64] {
        &self.starts
    }

    pub(crate) fn ends(&self) -> &[f64] {
        &self.ends
    }

    pub(crate) fn clip_start(&self, index: usize) -> f64 {
        self.starts[index]
    }

    pub(crate) fn clip_duration(&self, index: usize) -> f64 {
        self.clips[index].duration_seconds
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
