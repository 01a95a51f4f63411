mod camera;
mod component;
mod interaction;
mod layout;
pub mod palette;
mod render;
mod scene;
mod state;
mod types;

pub use component::KnowledgeGraph3D;
pub use types::{GraphSnapshot, Node, WireGraph};
#[cfg(test)]
pub use types::Link;
