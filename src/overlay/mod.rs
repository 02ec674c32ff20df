//! Annotation of processed frames.
//!
//! Changed pixels are painted in place in the caller's frame; no copy is
//! made. Once rendered, the original colours of changed pixels are gone.

mod color;
mod renderer;

pub use color::{ColorParseError, HighlightColor};
pub use renderer::OverlayRenderer;
