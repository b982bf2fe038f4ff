//! Pre- and post-processing around the forward pass.

pub mod argmax;
pub mod mean;

pub use argmax::{ArgmaxResult, argmax};
pub use mean::MeanSubtraction;
