//! Predictors built on top of an inference backend.

pub mod image_predictor;

pub use image_predictor::{ImagePredictor, Prediction};
