use super::*;

fn coverage(track_count: usize, clip_count: usize) -> CoverageError {
    CoverageError {
        track_count,
        clip_count,
        timeline_secs: 300.0,
        unmatched: vec![UnmatchedTrack {
            index: 1,
            start_secs: 300.0,
            end_secs: 400.0,
        }],
    }
}

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ReelcutError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ReelcutError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        ReelcutError::from(coverage(2, 3))
            .to_string()
            .contains("coverage error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReelcutError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn coverage_message_names_first_unmatched_track() {
    let msg = coverage(2, 3).to_string();
    assert!(msg.contains("1 of 2 track(s)"), "{msg}");
    assert!(msg.contains("300.000s covered by 3 clip(s)"), "{msg}");
    assert!(msg.contains("track #1 searched [300.000s, 400.000s)"), "{msg}");
}

#[test]
fn coverage_message_for_empty_inputs() {
    assert_eq!(coverage(0, 3).to_string(), "no tracks were selected");
    assert_eq!(
        coverage(2, 0).to_string(),
        "no source clips are available to cover 2 track(s)"
    );
}

#[test]
fn as_coverage_only_matches_coverage_variant() {
    assert!(ReelcutError::from(coverage(1, 1)).as_coverage().is_some());
    assert!(ReelcutError::validation("x").as_coverage().is_none());
}
