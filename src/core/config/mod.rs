//! Configuration for the image predictor.

pub mod errors;
pub mod predictor;

pub use errors::{ConfigError, ConfigValidator};
pub use predictor::{DEFAULT_INPUT_NAME, Device, DeviceType, ModelFiles, PredictorConfig};
