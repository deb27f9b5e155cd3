//! WebGPU rendering module
//!
//! The scene is a single flat-color triangle list built on the CPU each
//! frame and drawn with one pipeline.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, arena_to_ndc};
pub use scene::{Starfield, build_scene};
pub use vertex::Vertex;
