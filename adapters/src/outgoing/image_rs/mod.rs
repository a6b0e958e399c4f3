pub mod canvas_compositor;
mod sharpen;
