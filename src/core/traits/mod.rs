//! Trait definitions for the inference engine seam.
//!
//! The predictor never talks to a native library directly. It drives an
//! [`InferenceBackend`], which creates [`InferenceSession`]s, so the same
//! orchestration runs against the MXNet backend or a test double.

pub mod engine;

pub use engine::{InferenceBackend, InferenceSession, InputSpec, NdArrayEntry, SessionSpec};
