pub mod element;
pub mod resolver;

pub use element::*;
pub use resolver::{frame_path, resolve};
