pub mod aspect_ratio;
pub mod canvas;
pub mod color;
pub mod error;
pub mod sharpen;
