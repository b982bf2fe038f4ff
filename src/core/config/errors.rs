//! Configuration error types and validation traits.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that the predictor geometry is invalid.
    #[error("invalid geometry: {message}")]
    InvalidGeometry { message: String },

    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error indicating that a configuration file could not be read or parsed.
    #[error("failed to read configuration from {}: {message}", path.display())]
    ReadFailed { path: PathBuf, message: String },
}

/// A trait for validating configuration parameters.
///
/// Implementors provide [`validate`](ConfigValidator::validate) and
/// [`get_defaults`](ConfigValidator::get_defaults); the provided helpers
/// cover the checks shared by predictor configurations.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates image dimensions.
    ///
    /// Width, height and channel count must all be positive, and their
    /// product must fit in `usize`.
    ///
    /// # Arguments
    ///
    /// * `width` - The width to validate.
    /// * `height` - The height to validate.
    /// * `channels` - The channel count to validate.
    fn validate_image_dimensions(
        &self,
        width: u32,
        height: u32,
        channels: u32,
    ) -> Result<(), ConfigError> {
        if width == 0 || height == 0 || channels == 0 {
            return Err(ConfigError::InvalidGeometry {
                message: format!(
                    "width, height and channels must be positive, got {width}x{height}x{channels}"
                ),
            });
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(channels as usize))
            .map(|_| ())
            .ok_or_else(|| ConfigError::InvalidGeometry {
                message: format!("image size {width}x{height}x{channels} overflows"),
            })
    }

    /// Validates that a string field is not empty.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to validate.
    /// * `field_name` - The name of the field being validated.
    fn validate_non_empty(&self, value: &str, field_name: &str) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            Err(ConfigError::InvalidConfig {
                message: format!("{field_name} must not be empty"),
            })
        } else {
            Ok(())
        }
    }
}
