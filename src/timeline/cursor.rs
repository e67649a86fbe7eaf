use crate::{
    config::{CoveragePolicy, OverrunPolicy},
    foundation::core::{Fps, FrameRange},
    foundation::error::{CoverageError, ReelcutResult, UnmatchedTrack},
    timeline::model::{BOUNDARY_EPSILON, Timeline, Track},
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// A position inside one physical clip.
pub struct ClipCursor {
    /// Index into [`Timeline::clips`].
    pub clip_index: usize,
    /// Seconds from the start of the clip.
    pub in_clip_offset: f64,
    /// Seconds of the clip left after `in_clip_offset`.
    pub available_secs: f64,
}

/// Cursors refer to the same clip regardless of offset.
pub fn same_clip(a: &ClipCursor, b: &ClipCursor) -> bool {
    a.clip_index == b.clip_index
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// The part of one track that falls inside one physical clip.
pub struct Fragment {
    /// Track this fragment came from.
    pub track_index: usize,
    /// Clip this fragment plays from.
    pub clip_index: usize,
    pub source_path: String,
    pub in_clip_start_secs: f64,
    pub in_clip_end_secs: f64,
}

impl Fragment {
    /// In-clip frame span: start floors, end ceils.
    pub fn frames(&self, fps: Fps) -> FrameRange {
        FrameRange::covering_secs(fps, self.in_clip_start_secs, self.in_clip_end_secs)
    }

    pub fn len_secs(&self) -> f64 {
        self.in_clip_end_secs - self.in_clip_start_secs
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Fragments for a whole track list, in track order.
pub struct Resolution {
    pub fragments: Vec<Fragment>,
    /// Indices of tracks that produced no fragment.
    pub unmatched: Vec<usize>,
    pub track_count: usize,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Fail when nothing resolved, or when any track is unmatched under
    /// [`CoveragePolicy::Strict`]. Lenient drops are logged.
    pub fn require_coverage(
        &self,
        timeline: &Timeline,
        tracks: &[Track],
        policy: CoveragePolicy,
    ) -> ReelcutResult<()> {
        if self.fragments.is_empty() {
            return Err(self.coverage_error(timeline, tracks).into());
        }
        if self.unmatched.is_empty() {
            return Ok(());
        }
        match policy {
            CoveragePolicy::Strict => Err(self.coverage_error(timeline, tracks).into()),
            CoveragePolicy::Lenient => {
                tracing::warn!(
                    unmatched = ?self.unmatched,
                    timeline_secs = timeline.total_secs(),
                    "dropping tracks that map onto no clip"
                );
                Ok(())
            }
        }
    }

    /// Frame spans for every fragment, in fragment order.
    ///
    /// Starts floor and ends ceil, so two fragments of one source that meet inside a frame would
    /// both claim it. The later-listed fragment gives the frame up. Fragments that overlap in
    /// seconds keep their overlap.
    pub fn frame_ranges(&self, fps: Fps) -> Vec<FrameRange> {
        let mut out: Vec<FrameRange> = Vec::with_capacity(self.fragments.len());
        for (i, fragment) in self.fragments.iter().enumerate() {
            let mut frames = fragment.frames(fps);
            for (prior, taken) in self.fragments[..i].iter().zip(&out) {
                if prior.source_path != fragment.source_path {
                    continue;
                }
                if fragment.in_clip_start_secs >= prior.in_clip_end_secs - BOUNDARY_EPSILON {
                    frames.start = frames.start.max(taken.end).min(frames.end);
                } else if fragment.in_clip_end_secs <= prior.in_clip_start_secs + BOUNDARY_EPSILON
                {
                    frames.end = frames.end.min(taken.start).max(frames.start);
                }
            }
            out.push(frames);
        }
        out
    }

    /// Describe the unmatched tracks of this resolution.
    pub fn coverage_error(&self, timeline: &Timeline, tracks: &[Track]) -> CoverageError {
        CoverageError {
            track_count: self.track_count,
            clip_count: timeline.len(),
            timeline_secs: timeline.total_secs(),
            unmatched: self
                .unmatched
                .iter()
                .filter_map(|&index| {
                    tracks.get(index).map(|t| UnmatchedTrack {
                        index,
                        start_secs: t.start_seconds,
                        end_secs: t.end_seconds,
                    })
                })
                .collect(),
        }
    }
}

impl Timeline {
    fn cursor_at(&self, clip_index: usize, offset: f64) -> ClipCursor {
        let duration = self.clip_duration(clip_index);
        let in_clip_offset = offset.clamp(0.0, duration);
        ClipCursor {
            clip_index,
            in_clip_offset,
            available_secs: duration - in_clip_offset,
        }
    }

    /// Cursor for the clip whose `[start, end)` contains `t`.
    ///
    /// A boundary belongs to the following clip; the last clip also owns its end point. A point
    /// before the first clip or inside a gap moves forward to the start of the next clip.
    pub fn locate_start(&self, t: f64) -> Option<ClipCursor> {
        if self.is_empty() || !t.is_finite() {
            return None;
        }
        let after = self
            .starts()
            .partition_point(|&s| s <= t + BOUNDARY_EPSILON);
        if after == 0 {
            return Some(self.cursor_at(0, 0.0));
        }

        let i = after - 1;
        let start = self.clip_start(i);
        let end = self.ends()[i];
        let last = self.len() - 1;
        if t < end - BOUNDARY_EPSILON || (i == last && t <= end + BOUNDARY_EPSILON) {
            return Some(self.cursor_at(i, t - start));
        }
        if i < last {
            return Some(self.cursor_at(i + 1, 0.0));
        }
        None
    }

    /// Cursor for the clip with `start < t <= end`.
    ///
    /// A point inside a gap resolves to the end of the preceding clip and a point past the end of
    /// the timeline clamps to the end of the last clip.
    pub fn locate_end(&self, t: f64) -> Option<ClipCursor> {
        if self.is_empty() || !t.is_finite() {
            return None;
        }
        if t <= self.clip_start(0) + BOUNDARY_EPSILON {
            return None;
        }

        let i = self.ends().partition_point(|&e| e < t - BOUNDARY_EPSILON);
        if i == self.len() {
            let last = self.len() - 1;
            return Some(self.cursor_at(last, self.clip_duration(last)));
        }
        let start = self.clip_start(i);
        if start < t - BOUNDARY_EPSILON {
            return Some(self.cursor_at(i, t - start));
        }
        // `t` sits in a gap (or on a zero-length clip) before clip `i`.
        let prev = i.checked_sub(1)?;
        Some(self.cursor_at(prev, self.clip_duration(prev)))
    }

    /// Full-length cursors for every clip strictly between `start` and `end`.
    pub fn middle_clips(&self, start: &ClipCursor, end: &ClipCursor) -> Vec<ClipCursor> {
        (start.clip_index + 1..end.clip_index)
            .map(|i| self.cursor_at(i, 0.0))
            .collect()
    }

    /// Split one track into per-clip fragments.
    ///
    /// Malformed tracks and tracks outside the covered range yield nothing. Zero-length pieces are
    /// dropped.
    pub fn resolve_track(
        &self,
        track_index: usize,
        track: Track,
        overrun: OverrunPolicy,
    ) -> Vec<Fragment> {
        if !track.is_well_formed() {
            return Vec::new();
        }
        if overrun == OverrunPolicy::Reject
            && track.end_seconds > self.total_secs() + BOUNDARY_EPSILON
        {
            return Vec::new();
        }
        let (Some(start), Some(end)) = (
            self.locate_start(track.start_seconds),
            self.locate_end(track.end_seconds),
        ) else {
            return Vec::new();
        };
        if end.clip_index < start.clip_index {
            // Both ends fell into the same gap.
            return Vec::new();
        }

        let mut spans = Vec::with_capacity(end.clip_index - start.clip_index + 1);
        if same_clip(&start, &end) {
            spans.push((start.clip_index, start.in_clip_offset, end.in_clip_offset));
        } else {
            spans.push((
                start.clip_index,
                start.in_clip_offset,
                self.clip_duration(start.clip_index),
            ));
            for mid in self.middle_clips(&start, &end) {
                spans.push((mid.clip_index, 0.0, mid.available_secs));
            }
            spans.push((end.clip_index, 0.0, end.in_clip_offset));
        }

        spans
            .into_iter()
            .filter(|&(_, from, to)| to - from > BOUNDARY_EPSILON)
            .map(|(clip_index, from, to)| Fragment {
                track_index,
                clip_index,
                source_path: self.clips()[clip_index].source_path.clone(),
                in_clip_start_secs: from,
                in_clip_end_secs: to,
            })
            .collect()
    }

    /// Resolve every track in caller order.
    #[tracing::instrument(skip(self, tracks), fields(tracks = tracks.len(), clips = self.len()))]
    pub fn resolve_tracks(&self, tracks: &[Track], overrun: OverrunPolicy) -> Resolution {
        let mut out = Resolution {
            track_count: tracks.len(),
            ..Resolution::default()
        };
        for (index, &track) in tracks.iter().enumerate() {
            let fragments = self.resolve_track(index, track, overrun);
            if fragments.is_empty() {
                out.unmatched.push(index);
            }
            out.fragments.extend(fragments);
        }
        tracing::debug!(
            fragments = out.fragments.len(),
            unmatched = out.unmatched.len(),
            "resolved tracks"
        );
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/cursor.rs"]
mod tests;
