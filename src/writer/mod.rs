//! Output side: render processed blocks.
pub mod json;
