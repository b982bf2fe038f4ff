//! Mean-image subtraction.

use crate::core::errors::{PredError, PredResult};

/// Per-element normalization tensor subtracted from every input image.
///
/// The tensor is laid out exactly like the image buffers it is applied to.
#[derive(Debug, Clone, PartialEq)]
pub struct MeanSubtraction {
    mean: Vec<f32>,
}

impl MeanSubtraction {
    /// Wraps a mean tensor, checking it covers `expected_len` elements.
    ///
    /// # Errors
    ///
    /// `PredError::InvalidInputSize` if the lengths differ.
    pub fn new(mean: Vec<f32>, expected_len: usize) -> PredResult<Self> {
        if mean.len() != expected_len {
            return Err(PredError::invalid_input_size(expected_len, mean.len()));
        }
        Ok(Self { mean })
    }

    /// Subtracts the mean from `image` in place.
    ///
    /// # Errors
    ///
    /// `PredError::InvalidInputSize` if `image` is not the tensor's length;
    /// the buffer is left untouched in that case.
    pub fn apply(&self, image: &mut [f32]) -> PredResult<()> {
        if image.len() != self.mean.len() {
            return Err(PredError::invalid_input_size(self.mean.len(), image.len()));
        }
        image
            .iter_mut()
            .zip(&self.mean)
            .for_each(|(pixel, mean)| *pixel -= mean);
        Ok(())
    }
}
