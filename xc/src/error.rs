//! Error types for the XC module

use crate::traits::XCFamily;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, XCError>;

/// Errors that can occur in XC kernel evaluation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XCError {
    /// An entry point was called on a kernel outside its functional family
    #[error("{op} ({requested}) is not implemented for kernel '{kernel}'")]
    Unsupported {
        op: &'static str,
        requested: XCFamily,
        kernel: &'static str,
    },

    /// A caller-supplied buffer is too short for the requested point count
    #[error("buffer '{name}' holds {len} values, {expected} needed for {npts} points")]
    BufferSize {
        name: &'static str,
        len: usize,
        expected: usize,
        npts: usize,
    },

    /// The driver was not given a buffer the kernel family needs
    #[error("{family} evaluation needs the '{name}' buffer")]
    MissingBuffer {
        name: &'static str,
        family: XCFamily,
    },

    /// The classification flags of a model do not select exactly one family
    #[error("kernel traits of '{model}' are inconsistent: {reason}")]
    TraitMisconfigured {
        model: &'static str,
        reason: String,
    },

    /// A device entry point was called on a kernel without a device backend
    #[error("no device backend is configured for kernel '{kernel}'")]
    DeviceUnavailable { kernel: &'static str },

    /// Failure reported by the device backend or one of its streams
    #[error("device error: {0}")]
    Device(String),

    /// Spin scheme name not recognised
    #[error("unknown spin scheme '{0}', expected 'nonspin' or 'spin'")]
    UnknownSpinScheme(String),
}
