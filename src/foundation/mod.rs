//! Core value types, the error taxonomy and premultiplied pixel math.

pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod math;
