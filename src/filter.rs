//! The ZFP filter: identity, capabilities, lifecycle, and the host entry points.
//!
//! The host engine addresses this codec by its globally reserved identifier [`ZFP_FILTER_ID`].
//! [`initialize`] and [`finalize`] bracket all use of the filter with reference-counted
//! registration in the host [filter table](lookup); the per-chunk entry points [`encode_chunk`]
//! and [`decode_chunk`] are invoked by the host's chunk I/O path, never by end users directly.

mod descriptor;
mod lifecycle;
mod registry;

pub use descriptor::{FilterCapabilities, FilterDescriptor};
pub use lifecycle::{finalize, initialize, LifecycleError};
pub use registry::{is_registered, lookup, register, unregister};

use crate::chunk::ChunkRepresentation;
use crate::codec::{CodecError, ZfpCodec};

/// The globally reserved HDF5 filter identifier for ZFP.
pub const ZFP_FILTER_ID: u32 = 32013;

/// The name of the ZFP filter.
pub const ZFP_FILTER_NAME: &str = "zfp";

/// Compress one chunk with the configuration persisted in `cd_values`.
///
/// The filter state is decoded from `cd_values` afresh on every call; nothing is shared between
/// chunk operations, so concurrent invocations against the same persisted configuration but
/// different chunks never interfere.
///
/// # Errors
///
/// Returns a [`CodecError`] if `cd_values` is malformed or the codec fails.
pub fn encode_chunk(
    cd_values: &[u32],
    chunk: Vec<u8>,
    representation: &ChunkRepresentation,
) -> Result<Vec<u8>, CodecError> {
    ZfpCodec::from_cd_values(cd_values)?.encode(chunk, representation)
}

/// Decompress one chunk with the configuration persisted in `cd_values`.
///
/// The decompressed buffer size is derived from `representation`, never from lengths embedded in
/// the compressed chunk, which is file content and untrusted.
///
/// # Errors
///
/// Returns a [`CodecError`] if `cd_values` is malformed or the codec fails.
pub fn decode_chunk(
    cd_values: &[u32],
    chunk: Vec<u8>,
    representation: &ChunkRepresentation,
) -> Result<Vec<u8>, CodecError> {
    ZfpCodec::from_cd_values(cd_values)?.decode(chunk, representation)
}

/// The descriptor registered for the ZFP filter, with encoding and decoding enabled.
#[must_use]
pub const fn zfp_filter_descriptor() -> FilterDescriptor {
    FilterDescriptor::new(
        ZFP_FILTER_ID,
        ZFP_FILTER_NAME,
        FilterCapabilities::new(true, true),
        encode_chunk,
        decode_chunk,
    )
}
