pub mod compositor;
pub mod segmentation;
