//! Import review: an undoable editing session over parser output before it is
//! merged into a stored resume.

pub mod actions;
pub mod confidence;
pub mod handlers;
pub mod history;
pub mod import;
pub mod sessions;
