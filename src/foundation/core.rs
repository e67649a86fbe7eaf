use crate::foundation::error::{ReelcutError, ReelcutResult};

/// Frame-count products closer than this to an integer are treated as that integer.
pub const FRAME_SNAP_EPSILON: f64 = 1e-6;

/// Default output frame rate.
pub const DEFAULT_FPS: u32 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    pub start: u64,
    pub end: u64,
}

impl FrameRange {
    pub fn new(start: u64, end: u64) -> ReelcutResult<Self> {
        if start > end {
            return Err(ReelcutError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Floor the start and ceil the end so no boundary frame is lost.
    pub fn covering_secs(fps: Fps, start_secs: f64, end_secs: f64) -> Self {
        let start = fps.secs_to_frames_floor(start_secs);
        let end = fps.secs_to_frames_ceil(end_secs).max(start);
        Self { start, end }
    }

    pub fn len_frames(self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Default for Fps {
    fn default() -> Self {
        Self {
            num: DEFAULT_FPS,
            den: 1,
        }
    }
}

impl Fps {
    pub fn new(num: u32, den: u32) -> ReelcutResult<Self> {
        let fps = Self { num, den };
        fps.validate()?;
        Ok(fps)
    }

    pub fn validate(self) -> ReelcutResult<()> {
        if self.den == 0 {
            return Err(ReelcutError::validation("Fps den must be > 0"));
        }
        if self.num == 0 {
            return Err(ReelcutError::validation("Fps num must be > 0"));
        }
        Ok(())
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        self.snapped_frames(secs).floor().max(0.0) as u64
    }

    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        self.snapped_frames(secs).ceil().max(0.0) as u64
    }

    fn snapped_frames(self, secs: f64) -> f64 {
        if !secs.is_finite() {
            return 0.0;
        }
        let frames = secs * self.as_f64();
        let nearest = frames.round();
        if (frames - nearest).abs() < FRAME_SNAP_EPSILON {
            nearest
        } else {
            frames
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
