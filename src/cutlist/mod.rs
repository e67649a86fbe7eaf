//! Render-engine cut lists.

pub(crate) mod builder;
pub(crate) mod model;
