//! OpenTimelineIO interchange export.

pub(crate) mod export;
pub(crate) mod schema;
