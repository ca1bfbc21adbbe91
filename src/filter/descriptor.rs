//! The host-facing filter descriptor.

use crate::chunk::ChunkRepresentation;
use crate::codec::CodecError;

/// A per-chunk filter entry point.
type ChunkFn = fn(&[u32], Vec<u8>, &ChunkRepresentation) -> Result<Vec<u8>, CodecError>;

/// The encode/decode capabilities of a filter.
///
/// The two capabilities are independent so a host can probe them before attempting either
/// operation. A decode-only filter supports read-only environments that lack the compression side
/// of the kernel.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FilterCapabilities {
    encode: bool,
    decode: bool,
}

impl FilterCapabilities {
    /// Create a new [`FilterCapabilities`].
    #[must_use]
    pub const fn new(encode: bool, decode: bool) -> Self {
        Self { encode, decode }
    }

    /// Returns true if the filter can compress chunks.
    #[must_use]
    pub const fn encode(&self) -> bool {
        self.encode
    }

    /// Returns true if the filter can decompress chunks.
    #[must_use]
    pub const fn decode(&self) -> bool {
        self.decode
    }
}

/// A filter as seen by the host engine: identity, capabilities, and per-chunk entry points.
#[derive(Clone, Copy, Debug)]
pub struct FilterDescriptor {
    /// The globally reserved identifier of the filter.
    id: u32,
    /// The name of the filter.
    name: &'static str,
    /// What the filter supports.
    capabilities: FilterCapabilities,
    /// Compress one chunk.
    encode_fn: ChunkFn,
    /// Decompress one chunk.
    decode_fn: ChunkFn,
}

impl FilterDescriptor {
    /// Create a new filter descriptor for registration.
    #[must_use]
    pub const fn new(
        id: u32,
        name: &'static str,
        capabilities: FilterCapabilities,
        encode_fn: ChunkFn,
        decode_fn: ChunkFn,
    ) -> Self {
        Self {
            id,
            name,
            capabilities,
            encode_fn,
            decode_fn,
        }
    }

    /// Return the identifier of the filter.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Return the name of the filter.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Return the capabilities of the filter.
    #[must_use]
    pub const fn capabilities(&self) -> FilterCapabilities {
        self.capabilities
    }

    /// Compress one chunk through the filter.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EncodeDisabled`] if the filter is not enabled for encoding, otherwise
    /// whatever the entry point returns.
    pub fn encode(
        &self,
        cd_values: &[u32],
        chunk: Vec<u8>,
        representation: &ChunkRepresentation,
    ) -> Result<Vec<u8>, CodecError> {
        if !self.capabilities.encode() {
            return Err(CodecError::EncodeDisabled(self.name));
        }
        (self.encode_fn)(cd_values, chunk, representation)
    }

    /// Decompress one chunk through the filter.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::DecodeDisabled`] if the filter is not enabled for decoding, otherwise
    /// whatever the entry point returns.
    pub fn decode(
        &self,
        cd_values: &[u32],
        chunk: Vec<u8>,
        representation: &ChunkRepresentation,
    ) -> Result<Vec<u8>, CodecError> {
        if !self.capabilities.decode() {
            return Err(CodecError::DecodeDisabled(self.name));
        }
        (self.decode_fn)(cd_values, chunk, representation)
    }
}
