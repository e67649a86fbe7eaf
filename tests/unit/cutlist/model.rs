use super::*;

fn sample() -> CutList {
    CutList {
        input_media: vec![
            InputMedia {
                source_path: "a.mp4".to_owned(),
                sections: vec![Section {
                    start_frame: 0,
                    end_frame: 600,
                }],
            },
            InputMedia {
                source_path: "wm.mov".to_owned(),
                sections: vec![Section {
                    start_frame: 0,
                    end_frame: 300,
                }],
            },
        ],
        output_track: vec![OutputEntry {
            media_index: 0,
            section_index: 0,
            transition_in: Some(Transition {
                kind: TransitionKind::Fade,
                duration_frames: 300,
            }),
        }],
        overlay_tracks: vec![OverlayEntry {
            media_index: 1,
            section_index: 0,
            start_frame: 1800,
            kind: CompositeType::Colorkey,
        }],
        version: CUT_LIST_VERSION,
    }
}

#[test]
fn json_field_names_follow_render_contract() {
    let v = serde_json::to_value(sample()).unwrap();
    assert_eq!(v["inputMedia"][0]["sourcePath"], "a.mp4");
    assert_eq!(v["inputMedia"][0]["sections"][0]["endFrame"], 600);
    assert_eq!(v["outputTrack"][0]["transitionIn"]["type"], "fade");
    assert_eq!(v["outputTrack"][0]["transitionIn"]["durationFrames"], 300);
    assert_eq!(v["overlayTracks"][0]["startFrame"], 1800);
    assert_eq!(v["overlayTracks"][0]["type"], "colorkey");
    assert_eq!(v["version"], 1);
}

#[test]
fn absent_transition_is_omitted() {
    let mut cut = sample();
    cut.output_track[0].transition_in = None;
    let v = serde_json::to_value(&cut).unwrap();
    assert!(v["outputTrack"][0].get("transitionIn").is_none());
}

#[test]
fn json_reparses_to_the_same_value() {
    let cut = sample();
    let text = cut.to_json_pretty().unwrap();
    assert_eq!(CutList::from_json(&text).unwrap(), cut);
}

#[test]
fn dangling_references_are_rejected() {
    let mut cut = sample();
    cut.overlay_tracks[0].section_index = 3;
    assert!(cut.validate().is_err());

    let mut cut = sample();
    cut.input_media[0].sections[0].start_frame = 700;
    assert!(cut.validate().is_err());
}

#[test]
fn output_length_sums_played_sections() {
    assert_eq!(sample().output_len_frames().unwrap(), 600);
}

#[test]
fn output_length_overflow_is_an_error() {
    let mut cut = sample();
    cut.input_media[0].sections[0].end_frame = u64::MAX;
    cut.output_track.push(cut.output_track[0]);
    let err = cut.output_len_frames().unwrap_err();
    assert!(err.to_string().contains("overflows"));
}
