use super::*;
use crate::{
    config::{CoveragePolicy, OverrunPolicy},
    timeline::model::PhysicalClip,
};

fn timeline(durations: &[f64]) -> Timeline {
    Timeline::new(
        durations
            .iter()
            .enumerate()
            .map(|(i, &d)| PhysicalClip::new(format!("https://cdn.example/rec/{i}.mp4"), d))
            .collect(),
    )
    .unwrap()
}

fn episode(tracks: &[(&str, &str)]) -> Episode {
    Episode {
        title: "Episode 12: Rust & Video!".to_owned(),
        description: "weekly stream".to_owned(),
        tracks: tracks
            .iter()
            .map(|(s, e)| EpisodeTrack {
                start: (*s).to_owned(),
                end: (*e).to_owned(),
            })
            .collect(),
    }
}

#[test]
fn builds_one_clip_per_fragment() {
    let doc = build_otio_timeline(
        &episode(&[("PT0S", "PT3M20S"), ("PT2M30S", "PT5M50S")]),
        &timeline(&[100.0, 200.0, 100.0]),
        &CompilerConfig::default(),
    )
    .unwrap();

    assert_eq!(doc.schema, "Timeline.1");
    assert_eq!(doc.name, "Episode 12: Rust & Video!");
    assert_eq!(doc.metadata["description"], "weekly stream");
    assert_eq!(doc.tracks.children.len(), 1);
    assert_eq!(doc.tracks.children[0].kind, "Video");

    let ranges: Vec<_> = doc
        .clips()
        .map(|c| {
            (
                c.name.as_str(),
                c.source_range.start_time.value,
                c.source_range.duration.value,
            )
        })
        .collect();
    assert_eq!(
        ranges,
        vec![
            ("0.mp4", 0.0, 6000.0),
            ("1.mp4", 0.0, 6000.0),
            ("1.mp4", 3000.0, 9000.0),
            ("2.mp4", 0.0, 3000.0),
        ]
    );
}

#[test]
fn clips_reference_full_source_media() {
    let doc = build_otio_timeline(
        &episode(&[("PT10S", "PT20S")]),
        &timeline(&[100.0]),
        &CompilerConfig::default(),
    )
    .unwrap();
    let clip = doc.clips().next().unwrap();
    assert_eq!(clip.schema, "Clip.2");
    assert_eq!(clip.active_media_reference_key, "DEFAULT_MEDIA");
    let media = clip.default_media().unwrap();
    assert_eq!(media.target_url, "https://cdn.example/rec/0.mp4");
    let available = media.available_range.as_ref().unwrap();
    assert_eq!(available.duration.value, 6000.0);
    assert_eq!(available.start_time.rate, 60.0);
    assert_eq!(clip.metadata["reelcut"]["track_index"], 0);
}

#[test]
fn empty_inputs_raise_coverage_errors() {
    let cfg = CompilerConfig::default();
    let no_tracks = build_otio_timeline(&episode(&[]), &timeline(&[100.0]), &cfg).unwrap_err();
    assert_eq!(no_tracks.as_coverage().unwrap().track_count, 0);

    let no_clips =
        build_otio_timeline(&episode(&[("PT0S", "PT10S")]), &timeline(&[]), &cfg).unwrap_err();
    assert_eq!(no_clips.as_coverage().unwrap().clip_count, 0);
}

#[test]
fn tracks_past_the_recording_raise_coverage_errors() {
    let err = build_otio_timeline(
        &episode(&[("PT5M", "PT6M40S")]),
        &timeline(&[100.0, 100.0, 100.0]),
        &CompilerConfig::default(),
    )
    .unwrap_err();
    let cov = err.as_coverage().unwrap();
    assert_eq!(cov.unmatched[0].start_secs, 300.0);
    assert_eq!(cov.unmatched[0].end_secs, 400.0);
}

#[test]
fn malformed_duration_text_reads_as_zero_unless_strict() {
    // "bogus" -> 0s, so the range is [0, 10).
    let lenient = build_otio_timeline(
        &episode(&[("bogus", "PT10S")]),
        &timeline(&[100.0]),
        &CompilerConfig::default(),
    )
    .unwrap();
    assert_eq!(lenient.clips().next().unwrap().source_range.start_time.value, 0.0);

    let strict = CompilerConfig {
        durations: DurationPolicy::Strict,
        ..CompilerConfig::default()
    };
    let err = build_otio_timeline(&episode(&[("bogus", "PT10S")]), &timeline(&[100.0]), &strict)
        .unwrap_err();
    assert!(matches!(err, crate::foundation::error::ReelcutError::Validation(_)));
}

#[test]
fn policies_apply_to_the_export_path() {
    let tl = timeline(&[100.0]);
    let ep = episode(&[("PT0S", "PT10S"), ("PT50S", "PT3M")]);
    let strict = CompilerConfig {
        overrun: OverrunPolicy::Reject,
        coverage: CoveragePolicy::Strict,
        ..CompilerConfig::default()
    };
    assert!(build_otio_timeline(&ep, &tl, &strict).is_err());
    assert_eq!(
        build_otio_timeline(&ep, &tl, &CompilerConfig::default())
            .unwrap()
            .clips()
            .count(),
        2
    );
}

#[test]
fn export_names_the_download() {
    let out = export_otio(
        &episode(&[("PT0S", "PT10S")]),
        &timeline(&[100.0]),
        &CompilerConfig::default(),
    )
    .unwrap();
    assert_eq!(out.file_name, "episode-12-rust-video.otio");
    assert_eq!(out.content_type, "application/json");
    let reparsed = OtioTimeline::from_json(&out.body).unwrap();
    assert_eq!(reparsed.clips().count(), 1);
    assert!(out.body.starts_with("{\n  \"OTIO_SCHEMA\": \"Timeline.1\""));
}

#[test]
fn file_name_slug_edge_cases() {
    assert_eq!(otio_file_name(""), "timeline.otio");
    assert_eq!(otio_file_name("  !!  "), "timeline.otio");
    assert_eq!(otio_file_name("--Hello  World--"), "hello-world.otio");
}

#[test]
fn base_name_handles_separators() {
    assert_eq!(base_name("a/b/c.mp4"), "c.mp4");
    assert_eq!(base_name("C:\\rec\\c.mp4"), "c.mp4");
    assert_eq!(base_name("dir/"), "dir");
    assert_eq!(base_name("plain.mp4"), "plain.mp4");
}

#[test]
fn episode_tracks_roundtrip_through_text() {
    let t = EpisodeTrack::from_seconds(150.0, 350.5);
    assert_eq!(t.start, "PT2M30S");
    assert_eq!(t.end, "PT5M50.5S");
    let ep = Episode {
        title: String::new(),
        description: String::new(),
        tracks: vec![t],
    };
    assert_eq!(
        ep.seconds_tracks(DurationPolicy::Strict).unwrap(),
        vec![Track::new(150.0, 350.5)]
    );
}

#[test]
fn clips_meeting_inside_a_frame_match_the_cut_list() {
    let doc = build_otio_timeline(
        &episode(&[("PT0S", "PT10.001S"), ("PT10.002S", "PT20S")]),
        &timeline(&[100.0]),
        &CompilerConfig::default(),
    )
    .unwrap();
    let ranges: Vec<_> = doc
        .clips()
        .map(|c| (c.source_range.start_time.value, c.source_range.duration.value))
        .collect();
    assert_eq!(ranges, vec![(0.0, 601.0), (601.0, 599.0)]);
}
