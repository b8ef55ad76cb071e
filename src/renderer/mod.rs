//! Rendering
//!
//! `scene` describes a frame as draw commands; `canvas` executes them on a
//! browser 2D context.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use scene::{DrawCommand, Scene, TextAlign, build_scene};
