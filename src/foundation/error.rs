use std::fmt;

/// Convenience result type used across reelcut.
pub type ReelcutResult<T> = Result<T, ReelcutError>;

/// Top-level error taxonomy used by compiler APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelcutError {
    /// Invalid user-provided clip, track or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// No usable mapping between the requested tracks and the available clips.
    #[error("coverage error: {0}")]
    Coverage(CoverageError),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelcutError {
    /// Build a [`ReelcutError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelcutError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return the coverage details when this is a [`ReelcutError::Coverage`].
    pub fn as_coverage(&self) -> Option<&CoverageError> {
        match self {
            Self::Coverage(c) => Some(c),
            _ => None,
        }
    }
}

impl From<CoverageError> for ReelcutError {
    fn from(value: CoverageError) -> Self {
        Self::Coverage(value)
    }
}

/// A track that could not be mapped onto any clip.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct UnmatchedTrack {
    /// Position of the track in the caller's list.
    pub index: usize,
    /// Searched range start on the virtual timeline.
    pub start_secs: f64,
    /// Searched range end on the virtual timeline.
    pub end_secs: f64,
}

/// Context for a failed track-to-clip mapping.
///
/// The [`fmt::Display`] output is meant to be shown to end users as-is.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CoverageError {
    /// Number of tracks in the request.
    pub track_count: usize,
    /// Number of clips the tracks were matched against.
    pub clip_count: usize,
    /// Length of the virtual timeline in seconds.
    pub timeline_secs: f64,
    /// Tracks that produced no fragments, in request order.
    pub unmatched: Vec<UnmatchedTrack>,
}

impl fmt::Display for CoverageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.track_count == 0 {
            return write!(f, "no tracks were selected");
        }
        if self.clip_count == 0 {
            return write!(
                f,
                "no source clips are available to cover {} track(s)",
                self.track_count
            );
        }
        write!(
            f,
            "{} of {} track(s) fall outside the {:.3}s covered by {} clip(s)",
            self.unmatched.len(),
            self.track_count,
            self.timeline_secs,
            self.clip_count
        )?;
        if let Some(first) = self.unmatched.first() {
            write!(
                f,
                "; track #{} searched [{:.3}s, {:.3}s)",
                first.index, first.start_secs, first.end_secs
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for CoverageError {}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
