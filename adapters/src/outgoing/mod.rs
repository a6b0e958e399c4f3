pub mod image_rs;
pub mod segmentation_reqwest;
