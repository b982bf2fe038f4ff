//! Backend and session traits.

use crate::core::config::Device;
use crate::core::errors::PredResult;
use std::fmt::Debug;

/// One named tensor taken out of the engine's multi-array list format.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArrayEntry {
    /// Key stored with the array; empty when the list is unnamed.
    pub key: String,
    pub shape: Vec<u32>,
    pub data: Vec<f32>,
}

impl NdArrayEntry {
    /// Number of elements implied by the shape.
    pub fn element_count(&self) -> usize {
        self.shape.iter().map(|&d| d as usize).product()
    }
}

/// Name and shape of one input node.
#[derive(Debug, Clone, Copy)]
pub struct InputSpec<'a> {
    pub name: &'a str,
    pub shape: &'a [u32],
}

/// Everything the engine needs to create a session.
#[derive(Debug, Clone, Copy)]
pub struct SessionSpec<'a> {
    /// Graph definition bytes (JSON).
    pub symbol_json: &'a [u8],
    /// Weight bytes.
    pub params: &'a [u8],
    pub device: Device,
    pub inputs: &'a [InputSpec<'a>],
}

/// Trait for an external inference engine.
///
/// Implementations wrap a native runtime. Sessions returned by
/// [`create_session`](InferenceBackend::create_session) own their engine
/// handle and release it when dropped.
pub trait InferenceBackend: Debug {
    /// Session type produced by this backend.
    type Session: InferenceSession;

    /// Sets the engine's random seed.
    ///
    /// This is process-wide state inside the engine, not state of any one
    /// session.
    fn set_seed(&self, seed: i32) -> PredResult<()>;

    /// Parses a serialized multi-array list and copies every entry out.
    fn load_ndarray_list(&self, bytes: &[u8]) -> PredResult<Vec<NdArrayEntry>>;

    /// Creates a ready-to-run session.
    fn create_session(&self, spec: &SessionSpec<'_>) -> PredResult<Self::Session>;

    /// Short description of the backend for logging.
    fn engine_info(&self) -> String;
}

/// A loaded model instance inside the engine.
///
/// Methods take `&mut self` where the engine mutates session state, so a
/// session is never driven from two places at once.
pub trait InferenceSession {
    /// Copies `data` into the named input node.
    fn set_input(&mut self, name: &str, data: &[f32]) -> PredResult<()>;

    /// Runs the forward pass.
    fn forward(&mut self) -> PredResult<()>;

    /// Shape of the output node at `index`.
    fn output_shape(&self, index: u32) -> PredResult<Vec<u32>>;

    /// Copies the output node at `index` into `out`.
    ///
    /// `out` must hold exactly the number of elements given by
    /// [`output_shape`](InferenceSession::output_shape).
    fn output(&self, index: u32, out: &mut [f32]) -> PredResult<()>;
}
