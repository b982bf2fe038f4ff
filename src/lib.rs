//! # image-pred
//!
//! Image classification on top of the MXNet prediction API.
//!
//! The crate loads a pretrained classifier from a model directory, feeds it
//! preprocessed pixel buffers and returns either the top label or the full
//! probability vector. All numerical work happens inside the engine; this
//! crate sequences the engine calls, owns the native handles and turns every
//! failure into a typed [`PredError`](core::PredError).
//!
//! ## Modules
//!
//! * [`core`] - Configuration, errors, the backend traits and the MXNet backend
//! * [`predictor`] - [`ImagePredictor`](predictor::ImagePredictor)
//! * [`processors`] - Mean subtraction and argmax
//! * [`utils`] - Raw file buffers, label tables and image loading
//!
//! ## Quick Start
//!
//! Build with `--features mxnet` and point `MXNET_LIB_DIR` at the directory
//! holding `libmxnet`.
//!
//! ```rust,ignore
//! use image_pred::prelude::*;
//!
//! let mut predictor = ImagePredictor::new(MxNetBackend::new(), 224, 224, 3)?;
//! predictor.load_model("models/inception")?;
//!
//! let mut pixels = load_image_buffer("cat.jpg".as_ref(), 224, 224, 3)?;
//! println!("{}", predictor.predict(&mut pixels)?);
//! # Ok::<(), PredError>(())
//! ```

pub mod core;
pub mod predictor;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use image_pred::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{Device, DeviceType, PredError, PredResult, PredictorConfig};
    pub use crate::predictor::{ImagePredictor, Prediction};
    pub use crate::utils::{LabelTable, load_image, load_image_buffer};

    #[cfg(feature = "mxnet")]
    pub use crate::core::inference::MxNetBackend;
}
