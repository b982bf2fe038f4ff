//! In-memory backend used by the unit tests.
//!
//! The stub never touches a native library. It returns a fixed output
//! vector and records every call so tests can assert on what the predictor
//! handed to the engine.

use crate::core::errors::{PredError, PredResult};
use crate::core::traits::{InferenceBackend, InferenceSession, NdArrayEntry, SessionSpec};
use std::sync::{Arc, Mutex, MutexGuard};

/// Everything the stub observed.
#[derive(Debug, Default)]
pub struct StubLog {
    pub seeds: Vec<i32>,
    pub list_parses: usize,
    pub sessions_created: usize,
    pub sessions_freed: usize,
    pub input_shapes: Vec<Vec<u32>>,
    pub inputs: Vec<(String, Vec<f32>)>,
    pub forwards: usize,
}

#[derive(Debug, Clone)]
pub struct StubBackend {
    output: Vec<f32>,
    output_shape: Option<Vec<u32>>,
    arrays: Vec<NdArrayEntry>,
    fail_create: bool,
    log: Arc<Mutex<StubLog>>,
}

impl StubBackend {
    /// Stub that produces `output` from every forward pass.
    pub fn new(output: Vec<f32>) -> Self {
        Self {
            output,
            output_shape: None,
            arrays: Vec::new(),
            fail_create: false,
            log: Arc::new(Mutex::new(StubLog::default())),
        }
    }

    /// Appends a flat `mean_img` array to the list `load_ndarray_list`
    /// returns. Without any arrays the parsed list is empty.
    pub fn with_mean(self, mean: Vec<f32>) -> Self {
        self.with_array(NdArrayEntry {
            key: "mean_img".to_string(),
            shape: vec![mean.len() as u32],
            data: mean,
        })
    }

    /// Appends an arbitrary array to the parsed list.
    pub fn with_array(mut self, entry: NdArrayEntry) -> Self {
        self.arrays.push(entry);
        self
    }

    /// Overrides the reported output shape (defaults to `[1, output.len()]`).
    pub fn with_output_shape(mut self, shape: Vec<u32>) -> Self {
        self.output_shape = Some(shape);
        self
    }

    /// Makes `create_session` fail.
    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn log(&self) -> MutexGuard<'_, StubLog> {
        self.log.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl InferenceBackend for StubBackend {
    type Session = StubSession;

    fn set_seed(&self, seed: i32) -> PredResult<()> {
        self.log().seeds.push(seed);
        Ok(())
    }

    fn load_ndarray_list(&self, _bytes: &[u8]) -> PredResult<Vec<NdArrayEntry>> {
        self.log().list_parses += 1;
        Ok(self.arrays.clone())
    }

    fn create_session(&self, spec: &SessionSpec<'_>) -> PredResult<StubSession> {
        if self.fail_create {
            return Err(PredError::engine_error("create_session", -1, "stub failure"));
        }
        let mut log = self.log();
        log.sessions_created += 1;
        log.input_shapes
            .extend(spec.inputs.iter().map(|input| input.shape.to_vec()));
        drop(log);

        let shape = self
            .output_shape
            .clone()
            .unwrap_or_else(|| vec![1, self.output.len() as u32]);
        Ok(StubSession {
            output: self.output.clone(),
            shape,
            log: Arc::clone(&self.log),
        })
    }

    fn engine_info(&self) -> String {
        "stub".to_string()
    }
}

#[derive(Debug)]
pub struct StubSession {
    output: Vec<f32>,
    shape: Vec<u32>,
    log: Arc<Mutex<StubLog>>,
}

impl StubSession {
    fn log(&self) -> MutexGuard<'_, StubLog> {
        self.log.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl InferenceSession for StubSession {
    fn set_input(&mut self, name: &str, data: &[f32]) -> PredResult<()> {
        self.log().inputs.push((name.to_string(), data.to_vec()));
        Ok(())
    }

    fn forward(&mut self) -> PredResult<()> {
        self.log().forwards += 1;
        Ok(())
    }

    fn output_shape(&self, _index: u32) -> PredResult<Vec<u32>> {
        Ok(self.shape.clone())
    }

    fn output(&self, _index: u32, out: &mut [f32]) -> PredResult<()> {
        if out.len() != self.output.len() {
            return Err(PredError::invalid_input_size(self.output.len(), out.len()));
        }
        out.copy_from_slice(&self.output);
        Ok(())
    }
}

impl Drop for StubSession {
    fn drop(&mut self) {
        self.log().sessions_freed += 1;
    }
}
