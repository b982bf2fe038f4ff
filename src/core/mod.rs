//! The core module of the image predictor.
//!
//! This module contains:
//! - Configuration management
//! - Error handling
//! - Inference engine backends
//! - Traits defining the engine seam

pub mod config;
pub mod errors;
pub mod inference;
pub mod traits;

pub use config::{ConfigError, ConfigValidator, Device, DeviceType, ModelFiles, PredictorConfig};
pub use errors::{PredError, PredResult};
pub use traits::{InferenceBackend, InferenceSession, InputSpec, NdArrayEntry, SessionSpec};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
