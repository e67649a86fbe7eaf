//! reelcut compiles edit ranges over a multi-file stream recording into render-ready artifacts.
//!
//! A recording is a list of physical clips played back to back on a *virtual timeline*. Users
//! keep ranges ("tracks") of that timeline; reelcut maps each track onto the clips it spans and
//! serializes the result two ways:
//!
//! - [`build_cut_list`]: a [`CutList`] for the render engine, with the outro and overlay stingers
//!   from [`CompilerConfig`] appended.
//! - [`export_otio`]: an OpenTimelineIO document for third-party editors, content only.
//!
//! Both go through the same resolver ([`Timeline::resolve_tracks`]), so their frame numbers
//! always agree. Everything is pure and deterministic: equal inputs give byte-identical output.
#![forbid(unsafe_code)]

mod config;
mod cutlist;
mod fingerprint;
mod foundation;
mod otio;
mod timeline;

/// ISO-8601 duration text conversions.
pub mod duration;

pub use config::{
    CompilerConfig, CompositeType, CoveragePolicy, DurationPolicy, OverrunPolicy, Stinger,
    StingerTable,
};
pub use cutlist::builder::build_cut_list;
pub use cutlist::model::{
    CUT_LIST_VERSION, CutList, InputMedia, OutputEntry, OverlayEntry, Section, Transition,
    TransitionKind,
};
pub use fingerprint::{Fingerprint, fingerprint_cut_list, fingerprint_otio};
pub use foundation::core::{DEFAULT_FPS, Fps, FrameRange};
pub use foundation::error::{CoverageError, ReelcutError, ReelcutResult, UnmatchedTrack};
pub use otio::export::{
    Episode, EpisodeTrack, OTIO_CONTENT_TYPE, OtioExport, build_otio_timeline, export_otio,
    otio_file_name,
};
pub use otio::schema::{
    ExternalReference, OtioClip, OtioStack, OtioTimeline, OtioTrack, RationalTime, TimeRange,
};
pub use timeline::cursor::{ClipCursor, Fragment, Resolution, same_clip};
pub use timeline::model::{PhysicalClip, Timeline, Track};
