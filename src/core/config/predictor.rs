//! Predictor configuration: input geometry, device placement and the
//! model directory layout.

use super::errors::{ConfigError, ConfigValidator};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the single input node declared to the engine.
pub const DEFAULT_INPUT_NAME: &str = "data";

/// Device the engine places the model on.
///
/// The discriminants are the device type codes understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    /// Host CPU.
    #[default]
    Cpu = 1,
    /// CUDA GPU.
    Gpu = 2,
    /// Host CPU with pinned memory.
    CpuPinned = 3,
}

impl DeviceType {
    /// Returns the engine's numeric code for this device type.
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl std::str::FromStr for DeviceType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "gpu" | "cuda" => Ok(Self::Gpu),
            "cpu_pinned" => Ok(Self::CpuPinned),
            other => Err(ConfigError::InvalidConfig {
                message: format!("unsupported device: {other} (supported: cpu, gpu, cpu_pinned)"),
            }),
        }
    }
}

/// Device selection: type plus ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Device {
    pub device_type: DeviceType,
    pub device_id: i32,
}

impl Device {
    /// CPU device 0, the engine default.
    pub fn cpu() -> Self {
        Self::default()
    }

    /// GPU with the given ordinal.
    pub fn gpu(device_id: i32) -> Self {
        Self {
            device_type: DeviceType::Gpu,
            device_id,
        }
    }
}

/// File names of the model artifacts, relative to the model directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelFiles {
    /// Label file, one `<synset-id> <label>` entry per line.
    pub synset: String,
    /// Graph definition.
    pub symbol: String,
    /// Weights.
    pub params: String,
    /// Normalization tensor in the engine's multi-array list format.
    pub mean: String,
}

impl Default for ModelFiles {
    fn default() -> Self {
        Self {
            synset: "synset.txt".to_string(),
            symbol: "model-symbol.json".to_string(),
            params: "model.params".to_string(),
            mean: "mean.nd".to_string(),
        }
    }
}

/// Configuration for an [`ImagePredictor`](crate::predictor::ImagePredictor).
///
/// Geometry is fixed for the lifetime of the predictor; the engine session
/// is created with input shape `[1, channels, width, height]`.
///
/// ```rust
/// use image_pred::core::config::{Device, PredictorConfig};
///
/// let config = PredictorConfig::new(224, 224, 3).with_device(Device::gpu(1));
/// assert_eq!(config.image_size(), 224 * 224 * 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    pub device: Device,
    /// Input node name.
    pub input_name: String,
    /// Output node read after the forward pass.
    pub output_index: u32,
    pub files: ModelFiles,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self::get_defaults()
    }
}

impl PredictorConfig {
    /// Creates a configuration with the given geometry and default device,
    /// input name and file layout.
    pub fn new(width: u32, height: u32, channels: u32) -> Self {
        Self {
            width,
            height,
            channels,
            ..Self::get_defaults()
        }
    }

    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    pub fn with_input_name(mut self, input_name: impl Into<String>) -> Self {
        self.input_name = input_name.into();
        self
    }

    pub fn with_output_index(mut self, output_index: u32) -> Self {
        self.output_index = output_index;
        self
    }

    pub fn with_files(mut self, files: ModelFiles) -> Self {
        self.files = files;
        self
    }

    /// Flat length of one image: `width * height * channels`.
    pub fn image_size(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }

    /// Input shape declared to the engine.
    pub fn input_shape(&self) -> [u32; 4] {
        [1, self.channels, self.width, self.height]
    }

    /// Reads and validates a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::ReadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }
}

impl ConfigValidator for PredictorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_image_dimensions(self.width, self.height, self.channels)?;
        self.validate_non_empty(&self.input_name, "input_name")?;
        self.validate_non_empty(&self.files.synset, "files.synset")?;
        self.validate_non_empty(&self.files.symbol, "files.symbol")?;
        self.validate_non_empty(&self.files.params, "files.params")?;
        self.validate_non_empty(&self.files.mean, "files.mean")?;
        if self.device.device_id < 0 {
            return Err(ConfigError::InvalidConfig {
                message: format!("device_id must be non-negative, got {}", self.device.device_id),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self {
            width: 224,
            height: 224,
            channels: 3,
            device: Device::cpu(),
            input_name: DEFAULT_INPUT_NAME.to_string(),
            output_index: 0,
            files: ModelFiles::default(),
        }
    }
}
