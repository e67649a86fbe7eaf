//! The virtual timeline and the clip cursor resolver shared by every serializer.

pub(crate) mod cursor;
pub(crate) mod model;
