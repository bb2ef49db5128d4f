//! Narration-driven scene timing and the frames attached to it.

pub mod plan;
pub mod render;
