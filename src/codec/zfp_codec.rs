//! The ZFP codec implementation.

use zfp_sys::{
    zfp_compress, zfp_decompress, zfp_stream_maximum_size, zfp_stream_rewind,
    zfp_stream_set_bit_stream,
};

use crate::chunk::ChunkRepresentation;
use crate::metadata::{MetadataError, ZfpExpertParams, ZfpFilterConfiguration, ZfpMode};

use super::kernel::{ZfpBitstream, ZfpField, ZfpStream};
use super::CodecError;

/// A ZFP codec implementation.
///
/// The codec is stateless per operation: `encode` and `decode` never mutate the mode, so one
/// codec (or the persisted configuration it was decoded from) can serve concurrent chunk
/// operations without interference.
#[derive(Clone, Copy, Debug)]
pub struct ZfpCodec {
    mode: ZfpMode,
}

impl ZfpCodec {
    /// Create a new ZFP codec with `mode`.
    #[must_use]
    pub const fn new(mode: ZfpMode) -> Self {
        Self { mode }
    }

    /// Create a new ZFP codec in expert mode.
    #[must_use]
    pub const fn new_expert(params: ZfpExpertParams) -> Self {
        Self::new(ZfpMode::Expert(params))
    }

    /// Create a new ZFP codec in fixed rate mode.
    #[must_use]
    pub const fn new_fixed_rate(rate: f64) -> Self {
        Self::new(ZfpMode::FixedRate(rate))
    }

    /// Create a new ZFP codec in fixed precision mode.
    #[must_use]
    pub const fn new_fixed_precision(precision: u32) -> Self {
        Self::new(ZfpMode::FixedPrecision(precision))
    }

    /// Create a new ZFP codec in fixed accuracy mode.
    #[must_use]
    pub const fn new_fixed_accuracy(tolerance: f64) -> Self {
        Self::new(ZfpMode::FixedAccuracy(tolerance))
    }

    /// Create a new ZFP codec in reversible mode.
    #[must_use]
    pub const fn new_reversible() -> Self {
        Self::new(ZfpMode::Reversible)
    }

    /// Create a new ZFP codec from a declarative configuration.
    #[must_use]
    pub fn new_with_configuration(configuration: &ZfpFilterConfiguration) -> Self {
        Self::new(ZfpMode::from(*configuration))
    }

    /// Create a new ZFP codec from a persisted cd\_values array.
    ///
    /// # Errors
    ///
    /// Returns a [`MetadataError`] if the array is malformed.
    pub fn from_cd_values(cd_values: &[u32]) -> Result<Self, MetadataError> {
        ZfpMode::from_cd_values(cd_values).map(Self::new)
    }

    /// Return the mode of the codec.
    #[must_use]
    pub const fn mode(&self) -> &ZfpMode {
        &self.mode
    }

    /// Compress a chunk.
    ///
    /// `decoded_value` must hold exactly `representation.size()` bytes. The returned buffer is
    /// trimmed to the compressed byte count reported by the kernel.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] if the chunk does not match its representation, the mode does not
    /// apply to the chunk's data type, or the kernel fails.
    pub fn encode(
        &self,
        mut decoded_value: Vec<u8>,
        representation: &ChunkRepresentation,
    ) -> Result<Vec<u8>, CodecError> {
        self.validate(representation)?;
        if decoded_value.len() as u64 != representation.size() {
            return Err(CodecError::UnexpectedChunkSize(
                decoded_value.len(),
                representation.size(),
            ));
        }
        let Some(field) = ZfpField::new(&mut decoded_value, representation) else {
            return Err(CodecError::from("failed to create zfp field"));
        };
        let Some(zfp) = ZfpStream::new(
            &self.mode,
            representation.data_type(),
            representation.dimensionality(),
        ) else {
            return Err(CodecError::from("failed to create zfp stream"));
        };

        let bufsize = unsafe { zfp_stream_maximum_size(zfp.as_zfp_stream(), field.as_zfp_field()) };
        let mut encoded_value: Vec<u8> = vec![0; bufsize];
        let Some(stream) = ZfpBitstream::new(&mut encoded_value) else {
            return Err(CodecError::from("failed to create zfp bitstream"));
        };
        unsafe {
            zfp_stream_set_bit_stream(zfp.as_zfp_stream(), stream.as_bitstream());
            zfp_stream_rewind(zfp.as_zfp_stream());
        }

        let size = unsafe { zfp_compress(zfp.as_zfp_stream(), field.as_zfp_field()) };
        if size == 0 {
            return Err(CodecError::from("zfp compression failed"));
        }
        drop(stream);
        encoded_value.truncate(size);
        Ok(encoded_value)
    }

    /// Decompress a chunk.
    ///
    /// The output buffer is sized from `representation` (the shape hint), never from any length
    /// embedded in `encoded_value`, which is file content and untrusted.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] if the representation is unsupported, the mode does not apply to
    /// the chunk's data type, or the kernel fails.
    pub fn decode(
        &self,
        mut encoded_value: Vec<u8>,
        representation: &ChunkRepresentation,
    ) -> Result<Vec<u8>, CodecError> {
        self.validate(representation)?;
        let mut decoded_value = vec![0u8; representation.size_usize()];
        let Some(field) = ZfpField::new(&mut decoded_value, representation) else {
            return Err(CodecError::from("failed to create zfp field"));
        };
        let Some(zfp) = ZfpStream::new(
            &self.mode,
            representation.data_type(),
            representation.dimensionality(),
        ) else {
            return Err(CodecError::from("failed to create zfp stream"));
        };
        let Some(stream) = ZfpBitstream::new(&mut encoded_value) else {
            return Err(CodecError::from("failed to create zfp bitstream"));
        };
        unsafe {
            zfp_stream_set_bit_stream(zfp.as_zfp_stream(), stream.as_bitstream());
            zfp_stream_rewind(zfp.as_zfp_stream());
        }

        let ret = unsafe { zfp_decompress(zfp.as_zfp_stream(), field.as_zfp_field()) };
        if ret == 0 {
            Err(CodecError::from("zfp decompression failed"))
        } else {
            Ok(decoded_value)
        }
    }

    /// Check that `representation` is within kernel limits and compatible with the mode.
    fn validate(&self, representation: &ChunkRepresentation) -> Result<(), CodecError> {
        if !(1..=4).contains(&representation.dimensionality()) {
            return Err(CodecError::UnsupportedDimensionality(
                representation.dimensionality(),
            ));
        }
        if matches!(self.mode, ZfpMode::FixedAccuracy(_))
            && !representation.data_type().is_float()
        {
            return Err(CodecError::AccuracyUnsupportedDataType(
                *representation.data_type(),
            ));
        }
        Ok(())
    }
}
