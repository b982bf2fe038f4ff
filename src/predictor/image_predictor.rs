//! Image classifier driving an external inference engine.
//!
//! An [`ImagePredictor`] is created with a fixed input geometry, loads a
//! model directory once, then answers any number of predictions. The model
//! directory holds four artifacts:
//!
//! | file                | contents                                   |
//! |---------------------|--------------------------------------------|
//! | `synset.txt`        | class labels, `<synset-id> <label>` per line |
//! | `model-symbol.json` | graph definition                           |
//! | `model.params`      | weights                                    |
//! | `mean.nd`           | mean image in the engine's multi-array list format |
//!
//! Predictions subtract the mean image from the caller's buffer **in
//! place** and run a single forward pass with batch size 1.
//!
//! # Threading
//!
//! One predictor owns one engine session. `predict` and
//! `predict_probabilities` take `&mut self`, so calls on an instance are
//! serialized by the borrow checker. To share a predictor between threads,
//! wrap it in a `Mutex`.

use crate::core::config::{ConfigValidator, PredictorConfig};
use crate::core::errors::{PredError, PredResult};
use crate::core::traits::{InferenceBackend, InferenceSession, InputSpec, SessionSpec};
use crate::processors::{MeanSubtraction, argmax};
use crate::utils::{LabelTable, RawFileBuffer};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Top-1 classification result.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class_id: usize,
    pub label: String,
    pub score: f32,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Prediction: {} Score: {:.6}", self.label, self.score)
    }
}

/// Handles and tables that exist only once a model is loaded.
struct LoadedModel<S> {
    labels: LabelTable,
    mean: MeanSubtraction,
    session: S,
}

/// Image classifier bound to one inference backend.
///
/// ```rust,ignore
/// use image_pred::core::inference::MxNetBackend;
/// use image_pred::predictor::ImagePredictor;
///
/// let mut predictor = ImagePredictor::new(MxNetBackend::new(), 224, 224, 3)?;
/// predictor.load_model("models/resnet-18")?;
///
/// let mut pixels = image_pred::utils::load_image_buffer("cat.jpg".as_ref(), 224, 224, 3)?;
/// let prediction = predictor.predict(&mut pixels)?;
/// println!("{prediction}");
/// ```
pub struct ImagePredictor<B: InferenceBackend> {
    backend: B,
    config: PredictorConfig,
    image_size: usize,
    model: Option<LoadedModel<B::Session>>,
}

impl<B: InferenceBackend> fmt::Debug for ImagePredictor<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePredictor")
            .field("backend", &self.backend)
            .field("config", &self.config)
            .field("image_size", &self.image_size)
            .field("loaded", &self.model.is_some())
            .finish()
    }
}

impl<B: InferenceBackend> ImagePredictor<B> {
    /// Creates an unloaded predictor for `width x height x channels` images
    /// on CPU device 0.
    pub fn new(backend: B, width: u32, height: u32, channels: u32) -> PredResult<Self> {
        Self::with_config(backend, PredictorConfig::new(width, height, channels))
    }

    /// Creates an unloaded predictor from a full configuration.
    ///
    /// # Errors
    ///
    /// `PredError::Config` if the configuration does not validate.
    pub fn with_config(backend: B, config: PredictorConfig) -> PredResult<Self> {
        config.validate()?;
        let image_size = config.image_size();
        Ok(Self {
            backend,
            config,
            image_size,
            model: None,
        })
    }

    /// Sets the engine's random seed.
    ///
    /// The seed is global to the engine and affects every predictor in the
    /// process, not just this one.
    pub fn set_seed(&self, seed: i32) -> PredResult<()> {
        debug!("setting engine random seed to {}", seed);
        self.backend.set_seed(seed)
    }

    /// Loads labels, weights and the mean image from `model_dir` and creates
    /// the engine session.
    ///
    /// Nothing is kept if any step fails; the predictor stays unloaded.
    ///
    /// # Errors
    ///
    /// * `PredError::AlreadyLoaded` if a model is already loaded.
    /// * `PredError::ModelLoadFailed` if an artifact is missing or
    ///   unreadable, the mean tensor is empty or does not match the input
    ///   geometry, or the engine rejects the model.
    pub fn load_model(&mut self, model_dir: impl AsRef<Path>) -> PredResult<()> {
        if self.model.is_some() {
            return Err(PredError::AlreadyLoaded);
        }
        let dir = model_dir.as_ref();
        let files = &self.config.files;

        let synset_path = dir.join(&files.synset);
        let labels = LabelTable::load(&synset_path).map_err(|e| {
            PredError::model_load_error_with_source(&synset_path, "failed to read label table", e)
        })?;

        let symbol = read_artifact(dir, &files.symbol)?;
        let params = read_artifact(dir, &files.params)?;
        let mean_buf = read_artifact(dir, &files.mean)?;
        debug!(
            "read model artifacts: symbol {} bytes, params {} bytes, mean {} bytes",
            symbol.len(),
            params.len(),
            mean_buf.len()
        );

        let mean = self.load_mean(&mean_buf)?;

        let input_shape = self.config.input_shape();
        let inputs = [InputSpec {
            name: &self.config.input_name,
            shape: &input_shape,
        }];
        let spec = SessionSpec {
            symbol_json: symbol.as_bytes(),
            params: params.as_bytes(),
            device: self.config.device,
            inputs: &inputs,
        };
        let session = self.backend.create_session(&spec).map_err(|e| {
            PredError::model_load_error_with_source(dir, "engine failed to create a session", e)
        })?;

        let output_shape = session
            .output_shape(self.config.output_index)
            .map_err(|e| {
                PredError::model_load_error_with_source(dir, "failed to query output shape", e)
            })?;
        let output_size: usize = output_shape.iter().map(|&d| d as usize).product();
        if output_size != labels.len() {
            warn!(
                "model output has {} classes (shape {:?}) but label table has {} entries",
                output_size,
                output_shape,
                labels.len()
            );
        }

        info!(
            "loaded model from {} with {}: {} labels, input {:?}, output {:?}",
            dir.display(),
            self.backend.engine_info(),
            labels.len(),
            input_shape,
            output_shape
        );

        self.model = Some(LoadedModel {
            labels,
            mean,
            session,
        });
        Ok(())
    }

    fn load_mean(&self, buffer: &RawFileBuffer) -> PredResult<MeanSubtraction> {
        let path = buffer.path();
        let entries = self.backend.load_ndarray_list(buffer.as_bytes()).map_err(|e| {
            PredError::model_load_error_with_source(path, "failed to parse mean tensor", e)
        })?;
        if entries.len() > 1 {
            debug!(
                "mean file holds {} arrays, using the first",
                entries.len()
            );
        }
        let entry = entries
            .into_iter()
            .next()
            .ok_or_else(|| PredError::model_load_error(path, "mean file contains no arrays"))?;
        if entry.element_count() != entry.data.len() {
            return Err(PredError::model_load_error(
                path,
                format!(
                    "mean tensor shape {:?} does not match its {} values",
                    entry.shape,
                    entry.data.len()
                ),
            ));
        }

        let len = entry.data.len();
        MeanSubtraction::new(entry.data, self.image_size).map_err(|_| {
            PredError::model_load_error(
                path,
                format!(
                    "mean tensor has {} elements, expected {} ({}x{}x{})",
                    len,
                    self.image_size,
                    self.config.width,
                    self.config.height,
                    self.config.channels
                ),
            )
        })
    }

    /// Classifies one image and returns the best class.
    ///
    /// `image` must hold exactly `width * height * channels` values in the
    /// mean image's layout. The mean is subtracted from it in place.
    ///
    /// # Errors
    ///
    /// * `PredError::NotLoaded` before a successful `load_model`.
    /// * `PredError::InvalidInputSize` for a wrongly sized buffer.
    /// * `PredError::LabelIndexOutOfRange` if the winning class has no label.
    /// * `PredError::Inference` if the engine produced an empty output.
    /// * `PredError::Engine` if an engine call fails.
    pub fn predict(&mut self, image: &mut [f32]) -> PredResult<Prediction> {
        let output = self.run(image)?;
        let best = argmax(&output)
            .ok_or_else(|| PredError::inference_error("model produced an empty output"))?;

        let labels = &self.model.as_ref().ok_or(PredError::NotLoaded)?.labels;
        let label = labels
            .get(best.index)
            .ok_or(PredError::LabelIndexOutOfRange {
                index: best.index,
                len: labels.len(),
            })?;

        let prediction = Prediction {
            class_id: best.index,
            label: label.to_string(),
            score: best.score,
        };
        info!("{}", prediction);
        Ok(prediction)
    }

    /// Runs the same preprocessing and forward pass as [`predict`](Self::predict)
    /// and returns the raw output vector.
    pub fn predict_probabilities(&mut self, image: &mut [f32]) -> PredResult<Vec<f32>> {
        self.run(image)
    }

    fn run(&mut self, image: &mut [f32]) -> PredResult<Vec<f32>> {
        let model = self.model.as_mut().ok_or(PredError::NotLoaded)?;
        if image.len() != self.image_size {
            return Err(PredError::invalid_input_size(self.image_size, image.len()));
        }

        model.mean.apply(image)?;
        model.session.set_input(&self.config.input_name, image)?;
        model.session.forward()?;

        let output_index = self.config.output_index;
        let shape = model.session.output_shape(output_index)?;
        let size: usize = shape.iter().map(|&d| d as usize).product();
        let mut output = vec![0.0; size];
        model.session.output(output_index, &mut output)?;
        Ok(output)
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Label table of the loaded model.
    pub fn labels(&self) -> Option<&LabelTable> {
        self.model.as_ref().map(|m| &m.labels)
    }

    /// `width * height * channels`.
    pub fn image_size(&self) -> usize {
        self.image_size
    }

    pub fn input_shape(&self) -> [u32; 4] {
        self.config.input_shape()
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }
}

fn read_artifact(dir: &Path, name: &str) -> PredResult<RawFileBuffer> {
    let path = dir.join(name);
    RawFileBuffer::open(&path).map_err(|e| {
        PredError::model_load_error_with_source(&path, format!("failed to read {name}"), e)
    })
}
