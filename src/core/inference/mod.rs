//! Inference engine backends.
//!
//! The native MXNet backend is compiled with the `mxnet` feature, which
//! links against `libmxnet`.

#[cfg(feature = "mxnet")]
pub mod mxnet;
#[cfg(test)]
pub(crate) mod stub;

#[cfg(feature = "mxnet")]
pub use mxnet::{MxNetBackend, MxSession, NdList};
