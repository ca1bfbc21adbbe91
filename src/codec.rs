//! The ZFP chunk codec.
//!
//! [`ZfpCodec`] transforms whole chunks: it dispatches on the configured [`ZfpMode`] to the
//! numeric kernel supplied by [`zfp-sys`](https://crates.io/crates/zfp-sys), with the chunk's
//! [`ChunkRepresentation`](crate::chunk::ChunkRepresentation) dictating the kernel field geometry
//! and the decoded buffer size. Reversible mode reconstructs chunks bit-exactly; the other modes
//! are lossy with the error bounded per their configured parameter.
//!
//! [`ZfpMode`]: crate::metadata::ZfpMode

mod kernel;
mod zfp_codec;

pub use zfp_codec::ZfpCodec;

use thiserror::Error;

use crate::chunk::DataType;
use crate::metadata::MetadataError;

/// A chunk encode/decode error.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The persisted configuration array could not be decoded.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    /// The chunk dimensionality is outside the range the kernel supports.
    #[error("chunk dimensionality {_0} is outside the supported range 1..=4")]
    UnsupportedDimensionality(usize),
    /// Fixed accuracy mode was applied to integer data.
    #[error("fixed accuracy mode applies to floating point data only, not {_0}")]
    AccuracyUnsupportedDataType(DataType),
    /// The size of a chunk does not match its representation.
    #[error("the size of a chunk is {_0}, expected {_1}")]
    UnexpectedChunkSize(usize, u64),
    /// Encoding was attempted through a filter not enabled for it.
    #[error("the {_0} filter is not enabled for encoding")]
    EncodeDisabled(&'static str),
    /// Decoding was attempted through a filter not enabled for it.
    #[error("the {_0} filter is not enabled for decoding")]
    DecodeDisabled(&'static str),
    /// The compression kernel reported a failure; propagated unchanged and never retried.
    #[error("{_0}")]
    Kernel(String),
}

impl From<&str> for CodecError {
    fn from(err: &str) -> Self {
        Self::Kernel(err.to_string())
    }
}

impl From<String> for CodecError {
    fn from(err: String) -> Self {
        Self::Kernel(err)
    }
}
