//! Raw declarations for the MXNet prediction C API.
//!
//! Use the safe wrappers in the parent module instead of calling these
//! directly. Every function returns `0` on success and `-1` on failure, with
//! the message available from [`MXGetLastError`].

use std::ffi::c_void;
use std::os::raw::{c_char, c_int, c_uint};

pub type MxUint = c_uint;
pub type MxFloat = f32;

/// Opaque handle to a predictor (session).
pub type PredictorHandle = *mut c_void;

/// Opaque handle to a parsed multi-array list.
pub type NDListHandle = *mut c_void;

#[link(name = "mxnet")]
unsafe extern "C" {
    pub fn MXGetLastError() -> *const c_char;

    pub fn MXRandomSeed(seed: c_int) -> c_int;

    // Multi-array list
    pub fn MXNDListCreate(
        nd_file_bytes: *const c_char,
        nd_file_size: c_int,
        out: *mut NDListHandle,
        out_length: *mut MxUint,
    ) -> c_int;
    pub fn MXNDListGet(
        handle: NDListHandle,
        index: MxUint,
        out_key: *mut *const c_char,
        out_data: *mut *const MxFloat,
        out_shape: *mut *const MxUint,
        out_ndim: *mut MxUint,
    ) -> c_int;
    pub fn MXNDListFree(handle: NDListHandle) -> c_int;

    // Predictor lifecycle
    pub fn MXPredCreate(
        symbol_json_str: *const c_char,
        param_bytes: *const c_void,
        param_size: c_int,
        dev_type: c_int,
        dev_id: c_int,
        num_input_nodes: MxUint,
        input_keys: *const *const c_char,
        input_shape_indptr: *const MxUint,
        input_shape_data: *const MxUint,
        out: *mut PredictorHandle,
    ) -> c_int;
    pub fn MXPredFree(handle: PredictorHandle) -> c_int;

    // Inference
    pub fn MXPredSetInput(
        handle: PredictorHandle,
        key: *const c_char,
        data: *const MxFloat,
        size: MxUint,
    ) -> c_int;
    pub fn MXPredForward(handle: PredictorHandle) -> c_int;
    pub fn MXPredGetOutputShape(
        handle: PredictorHandle,
        index: MxUint,
        shape_data: *mut *mut MxUint,
        shape_ndim: *mut MxUint,
    ) -> c_int;
    pub fn MXPredGetOutput(
        handle: PredictorHandle,
        index: MxUint,
        data: *mut MxFloat,
        size: MxUint,
    ) -> c_int;
}
