//! Utility functions for model artifacts, label files and images.

pub mod buffer;
pub mod image;
pub mod labels;

pub use buffer::RawFileBuffer;
pub use image::{dynamic_to_rgb, flatten_chw, image_to_chw, load_image, load_image_buffer};
pub use labels::LabelTable;
