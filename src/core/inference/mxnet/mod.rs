//! Safe wrappers around the MXNet prediction C API.
//!
//! Native handles live inside owning types ([`MxSession`], [`NdList`])
//! whose `Drop` implementations call the matching free function exactly
//! once, on every exit path.

pub mod ffi;

use crate::core::errors::{PredError, PredResult};
use crate::core::traits::{InferenceBackend, InferenceSession, NdArrayEntry, SessionSpec};
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;
use tracing::{debug, warn};

/// Returns the engine's last error message for the calling thread.
fn last_error() -> String {
    // SAFETY: MXGetLastError returns a pointer to a thread-local,
    // NUL-terminated buffer owned by the engine, or null.
    unsafe {
        let msg = ffi::MXGetLastError();
        if msg.is_null() {
            String::new()
        } else {
            CStr::from_ptr(msg).to_string_lossy().into_owned()
        }
    }
}

fn check(call: &'static str, code: c_int) -> PredResult<()> {
    if code == 0 {
        Ok(())
    } else {
        Err(PredError::engine_error(call, code, last_error()))
    }
}

fn to_c_int(call: &'static str, len: usize) -> PredResult<c_int> {
    c_int::try_from(len).map_err(|_| {
        PredError::engine_error(call, -1, format!("buffer of {len} bytes exceeds engine limit"))
    })
}

fn to_mx_uint(call: &'static str, len: usize) -> PredResult<ffi::MxUint> {
    ffi::MxUint::try_from(len).map_err(|_| {
        PredError::engine_error(call, -1, format!("length {len} exceeds engine limit"))
    })
}

fn to_cstring(call: &'static str, bytes: &[u8]) -> PredResult<CString> {
    let trimmed = bytes.strip_suffix(&[0u8]).unwrap_or(bytes);
    CString::new(trimmed)
        .map_err(|e| PredError::engine_error(call, -1, format!("interior NUL byte: {e}")))
}

/// A parsed multi-array list, freed on drop.
#[derive(Debug)]
pub struct NdList {
    handle: ffi::NDListHandle,
    len: u32,
}

impl NdList {
    /// Parses the engine's multi-array list binary format.
    pub fn parse(bytes: &[u8]) -> PredResult<Self> {
        let size = to_c_int("MXNDListCreate", bytes.len())?;
        let mut handle: ffi::NDListHandle = ptr::null_mut();
        let mut len: ffi::MxUint = 0;
        // SAFETY: `bytes` is valid for `size` bytes for the duration of the
        // call; the engine copies what it needs into the list.
        let code = unsafe {
            ffi::MXNDListCreate(
                bytes.as_ptr() as *const c_char,
                size,
                &mut handle,
                &mut len,
            )
        };
        check("MXNDListCreate", code)?;
        if handle.is_null() {
            return Err(PredError::engine_error(
                "MXNDListCreate",
                code,
                "engine returned a null list handle",
            ));
        }
        Ok(Self { handle, len })
    }

    /// Number of arrays in the list.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copies the array at `index` out of the list.
    pub fn get(&self, index: usize) -> PredResult<NdArrayEntry> {
        let mx_index = to_mx_uint("MXNDListGet", index)?;
        let mut key: *const c_char = ptr::null();
        let mut data: *const ffi::MxFloat = ptr::null();
        let mut shape: *const ffi::MxUint = ptr::null();
        let mut ndim: ffi::MxUint = 0;
        // SAFETY: the handle is live for `self`; out-pointers are valid
        // locals.
        let code = unsafe {
            ffi::MXNDListGet(
                self.handle,
                mx_index,
                &mut key,
                &mut data,
                &mut shape,
                &mut ndim,
            )
        };
        check("MXNDListGet", code)?;

        // SAFETY: on success `shape` points at `ndim` dims and `data` at
        // their product of floats, both owned by the list, which outlives
        // this borrow. `key` is NUL-terminated or null.
        unsafe {
            let shape = if shape.is_null() || ndim == 0 {
                Vec::new()
            } else {
                std::slice::from_raw_parts(shape, ndim as usize).to_vec()
            };
            let count: usize = shape.iter().map(|&d| d as usize).product();
            let data = if count == 0 {
                Vec::new()
            } else if data.is_null() {
                return Err(PredError::engine_error(
                    "MXNDListGet",
                    code,
                    format!("null data pointer for array {index}"),
                ));
            } else {
                std::slice::from_raw_parts(data, count).to_vec()
            };
            let key = if key.is_null() {
                String::new()
            } else {
                CStr::from_ptr(key).to_string_lossy().into_owned()
            };
            Ok(NdArrayEntry { key, shape, data })
        }
    }
}

impl Drop for NdList {
    fn drop(&mut self) {
        // SAFETY: the handle came from MXNDListCreate and is freed only here.
        let code = unsafe { ffi::MXNDListFree(self.handle) };
        if code != 0 {
            warn!("MXNDListFree failed: {}", last_error());
        }
    }
}

/// A live MXNet predictor, freed on drop.
#[derive(Debug)]
pub struct MxSession {
    handle: ffi::PredictorHandle,
}

// SAFETY: the predictor handle is not tied to the creating thread; it may
// move between threads as long as it is used from one thread at a time,
// which `&mut self` on the mutating calls and the absence of `Sync`
// guarantee.
unsafe impl Send for MxSession {}

impl InferenceSession for MxSession {
    fn set_input(&mut self, name: &str, data: &[f32]) -> PredResult<()> {
        let key = to_cstring("MXPredSetInput", name.as_bytes())?;
        let size = to_mx_uint("MXPredSetInput", data.len())?;
        // SAFETY: live handle; `data` is valid for `size` floats and the
        // engine copies it before returning.
        let code = unsafe { ffi::MXPredSetInput(self.handle, key.as_ptr(), data.as_ptr(), size) };
        check("MXPredSetInput", code)
    }

    fn forward(&mut self) -> PredResult<()> {
        // SAFETY: live handle.
        let code = unsafe { ffi::MXPredForward(self.handle) };
        check("MXPredForward", code)
    }

    fn output_shape(&self, index: u32) -> PredResult<Vec<u32>> {
        let mut shape: *mut ffi::MxUint = ptr::null_mut();
        let mut ndim: ffi::MxUint = 0;
        // SAFETY: live handle; out-pointers are valid locals.
        let code =
            unsafe { ffi::MXPredGetOutputShape(self.handle, index, &mut shape, &mut ndim) };
        check("MXPredGetOutputShape", code)?;
        if shape.is_null() || ndim == 0 {
            return Ok(Vec::new());
        }
        // SAFETY: the engine keeps `ndim` dims alive until the next call on
        // this handle; they are copied immediately.
        Ok(unsafe { std::slice::from_raw_parts(shape, ndim as usize) }.to_vec())
    }

    fn output(&self, index: u32, out: &mut [f32]) -> PredResult<()> {
        let size = to_mx_uint("MXPredGetOutput", out.len())?;
        // SAFETY: live handle; `out` is valid for `size` floats.
        let code = unsafe { ffi::MXPredGetOutput(self.handle, index, out.as_mut_ptr(), size) };
        check("MXPredGetOutput", code)
    }
}

impl Drop for MxSession {
    fn drop(&mut self) {
        // SAFETY: the handle came from MXPredCreate and is freed only here.
        let code = unsafe { ffi::MXPredFree(self.handle) };
        if code != 0 {
            warn!("MXPredFree failed: {}", last_error());
        }
    }
}

/// Backend driving the MXNet shared library.
#[derive(Debug, Default, Clone, Copy)]
pub struct MxNetBackend;

impl MxNetBackend {
    pub fn new() -> Self {
        Self
    }
}

impl InferenceBackend for MxNetBackend {
    type Session = MxSession;

    fn set_seed(&self, seed: i32) -> PredResult<()> {
        // SAFETY: plain value call.
        let code = unsafe { ffi::MXRandomSeed(seed) };
        check("MXRandomSeed", code)
    }

    fn load_ndarray_list(&self, bytes: &[u8]) -> PredResult<Vec<NdArrayEntry>> {
        let list = NdList::parse(bytes)?;
        debug!("parsed multi-array list with {} entries", list.len());
        (0..list.len()).map(|i| list.get(i)).collect()
    }

    fn create_session(&self, spec: &SessionSpec<'_>) -> PredResult<MxSession> {
        let symbol = to_cstring("MXPredCreate", spec.symbol_json)?;
        let param_size = to_c_int("MXPredCreate", spec.params.len())?;
        let num_inputs = to_mx_uint("MXPredCreate", spec.inputs.len())?;

        let keys = spec
            .inputs
            .iter()
            .map(|input| to_cstring("MXPredCreate", input.name.as_bytes()))
            .collect::<PredResult<Vec<_>>>()?;
        let key_ptrs: Vec<*const c_char> = keys.iter().map(|k| k.as_ptr()).collect();

        let mut indptr: Vec<ffi::MxUint> = Vec::with_capacity(spec.inputs.len() + 1);
        let mut shape_data: Vec<ffi::MxUint> = Vec::new();
        indptr.push(0);
        for input in spec.inputs {
            shape_data.extend_from_slice(input.shape);
            indptr.push(to_mx_uint("MXPredCreate", shape_data.len())?);
        }

        let mut handle: ffi::PredictorHandle = ptr::null_mut();
        // SAFETY: every pointer references a local buffer that outlives the
        // call; the engine copies symbol, params and shapes internally.
        let code = unsafe {
            ffi::MXPredCreate(
                symbol.as_ptr(),
                spec.params.as_ptr() as *const std::ffi::c_void,
                param_size,
                spec.device.device_type.code(),
                spec.device.device_id,
                num_inputs,
                key_ptrs.as_ptr(),
                indptr.as_ptr(),
                shape_data.as_ptr(),
                &mut handle,
            )
        };
        check("MXPredCreate", code)?;
        if handle.is_null() {
            return Err(PredError::engine_error(
                "MXPredCreate",
                code,
                "engine returned a null predictor handle",
            ));
        }
        Ok(MxSession { handle })
    }

    fn engine_info(&self) -> String {
        "MXNet prediction API".to_string()
    }
}
