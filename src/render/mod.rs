//! Rendering module
//!
//! `Scene` turns the game state into a vertex-coloured triangle list each
//! frame; `RenderState` uploads and draws it with WebGPU.

pub mod color;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use color::Rgb;
pub use pipeline::{RenderError, RenderState};
pub use scene::{DrawLayer, Scene};
pub use vertex::Vertex;
