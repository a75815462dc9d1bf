//! Frontend collaborators of the editor
//!
//! The editor talks to its surroundings through two traits: a [`Canvas`]
//! that owns the flow graph and reports clicks, and a [`Renderer`] that
//! displays results. Headless implementations are provided for both.
//!
//! # Main Types
//!
//! - [`Canvas`] / [`MemoryCanvas`] - Graph ownership, configuration updates, click events
//! - [`Renderer`] / [`TextRenderer`] - Result display

pub mod canvas;
pub mod plot;

pub use canvas::{Canvas, MemoryCanvas, NodeClick, NEW_NODE_POSITION};
pub use plot::{Renderer, TextRenderer};
