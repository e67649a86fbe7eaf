use std::collections::BTreeMap;

use crate::{
    config::CompilerConfig,
    cutlist::model::{
        CUT_LIST_VERSION, CutList, InputMedia, OutputEntry, OverlayEntry, Section, Transition,
        TransitionKind,
    },
    foundation::core::FrameRange,
    foundation::error::ReelcutResult,
    timeline::model::{Timeline, Track},
};

/// Compile tracks over `timeline` into a render-engine cut list.
///
/// Content plays in track order, followed by the outro stinger with a fade-in. The overlay
/// stingers are placed at absolute output frames regardless of content.
///
/// Fails with [`crate::ReelcutError::Coverage`] when no track maps onto any clip, or when any
/// track is unmatched under [`crate::CoveragePolicy::Strict`].
#[tracing::instrument(skip(timeline, tracks, cfg), fields(tracks = tracks.len(), clips = timeline.len()))]
pub fn build_cut_list(
    timeline: &Timeline,
    tracks: &[Track],
    cfg: &CompilerConfig,
) -> ReelcutResult<CutList> {
    cfg.validate()?;
    let resolution = timeline.resolve_tracks(tracks, cfg.overrun);
    resolution.require_coverage(timeline, tracks, cfg.coverage)?;

    let mut media = MediaTable::default();
    let mut output_track = Vec::with_capacity(resolution.fragments.len() + 1);
    let frame_ranges = resolution.frame_ranges(cfg.fps);
    for (fragment, frames) in resolution.fragments.iter().zip(frame_ranges) {
        let (media_index, section_index) = media.push_section(&fragment.source_path, frames);
        output_track.push(OutputEntry {
            media_index,
            section_index,
            transition_in: None,
        });
    }

    let outro = &cfg.stingers.outro;
    let (media_index, section_index) = media.push_section(
        &outro.source_path,
        FrameRange {
            start: 0,
            end: outro.duration_frames,
        },
    );
    output_track.push(OutputEntry {
        media_index,
        section_index,
        transition_in: Some(Transition {
            kind: TransitionKind::Fade,
            duration_frames: cfg.outro_fade_frames(),
        }),
    });

    let mut overlay_tracks = Vec::with_capacity(3);
    for (_, stinger) in cfg.stingers.overlays() {
        let (media_index, section_index) = media.push_section(
            &stinger.source_path,
            FrameRange {
                start: 0,
                end: stinger.duration_frames,
            },
        );
        overlay_tracks.push(OverlayEntry {
            media_index,
            section_index,
            start_frame: cfg.fps.secs_to_frames_floor(stinger.placement_secs),
            kind: stinger.composite,
        });
    }

    let cut = CutList {
        input_media: media.finish(),
        output_track,
        overlay_tracks,
        version: CUT_LIST_VERSION,
    };
    tracing::debug!(
        media = cut.input_media.len(),
        outputs = cut.output_track.len(),
        "built cut list"
    );
    Ok(cut)
}

/// Input media deduplicated by source path, in first-seen order.
#[derive(Default)]
struct MediaTable {
    entries: Vec<InputMedia>,
    by_path: BTreeMap<String, usize>,
}

impl MediaTable {
    fn push_section(&mut self, source_path: &str, frames: FrameRange) -> (usize, usize) {
        let media_index = match self.by_path.get(source_path) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.entries.push(InputMedia {
                    source_path: source_path.to_owned(),
                    sections: Vec::new(),
                });
                self.by_path.insert(source_path.to_owned(), i);
                i
            }
        };
        let sections = &mut self.entries[media_index].sections;
        sections.push(Section {
            start_frame: frames.start,
            end_frame: frames.end,
        });
        (media_index, sections.len() - 1)
    }

    fn finish(self) -> Vec<InputMedia> {
        self.entries
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cutlist/builder.rs"]
mod tests;
