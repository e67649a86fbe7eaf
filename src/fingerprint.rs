use xxhash_rust::xxh3::Xxh3;

use crate::{
    config::CompositeType,
    cutlist::model::{CutList, TransitionKind},
    otio::export::OtioExport,
};

const XXH3_SEED: u64 = 0x52ee_1c07_d1a5_4f3b;

/// Stable 128-bit digest of a compiled artifact.
///
/// Equal inputs always produce equal fingerprints, so renderers can skip replays of unchanged
/// cut lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Fingerprint a cut list field by field, independent of its JSON formatting.
pub fn fingerprint_cut_list(cut: &CutList) -> Fingerprint {
    let mut h = StableHasher::new();
    h.write_u32(cut.version);

    h.write_len(cut.input_media.len());
    for media in &cut.input_media {
        h.write_str(&media.source_path);
        h.write_len(media.sections.len());
        for s in &media.sections {
            h.write_u64(s.start_frame);
            h.write_u64(s.end_frame);
        }
    }

    h.write_len(cut.output_track.len());
    for e in &cut.output_track {
        h.write_len(e.media_index);
        h.write_len(e.section_index);
        match e.transition_in {
            None => h.write_u8(0),
            Some(t) => {
                h.write_u8(1);
                h.write_u8(match t.kind {
                    TransitionKind::Fade => 0,
                });
                h.write_u64(t.duration_frames);
            }
        }
    }

    h.write_len(cut.overlay_tracks.len());
    for o in &cut.overlay_tracks {
        h.write_len(o.media_index);
        h.write_len(o.section_index);
        h.write_u64(o.start_frame);
        h.write_u8(match o.kind {
            CompositeType::Alpha => 0,
            CompositeType::Colorkey => 1,
        });
    }
    h.finish()
}

/// Fingerprint the download name and body of an OTIO export.
pub fn fingerprint_otio(export: &OtioExport) -> Fingerprint {
    let mut h = StableHasher::new();
    h.write_str(&export.file_name);
    h.write_str(export.content_type);
    h.write_str(&export.body);
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_len(&mut self, v: usize) {
        self.write_u64(v as u64);
    }

    fn write_str(&mut self, s: &str) {
        self.write_len(s.len());
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> Fingerprint {
        let v = self.inner.digest128();
        Fingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/fingerprint.rs"]
mod tests;
