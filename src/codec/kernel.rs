//! RAII wrappers over the `zfp-sys` kernel types.
//!
//! The wrappers own the kernel handles and release them on drop. Constructors return [`None`] on
//! kernel allocation failure; the codec maps that to an opaque kernel error.

use std::ptr::NonNull;

use zfp_sys::{
    bitstream, stream_close, stream_open, zfp_field, zfp_field_1d, zfp_field_2d, zfp_field_3d,
    zfp_field_4d, zfp_field_free, zfp_stream, zfp_stream_close, zfp_stream_open,
    zfp_stream_set_accuracy, zfp_stream_set_params, zfp_stream_set_precision, zfp_stream_set_rate,
    zfp_stream_set_reversible, zfp_type, zfp_type_zfp_type_double, zfp_type_zfp_type_float,
    zfp_type_zfp_type_int32, zfp_type_zfp_type_int64,
};

use crate::chunk::{ChunkRepresentation, DataType};
use crate::metadata::{ZfpExpertParams, ZfpMode};

/// The kernel scalar type for `data_type`.
///
/// Unsigned types compress as their signed counterparts of the same width.
pub(super) const fn zfp_type_for(data_type: &DataType) -> zfp_type {
    match data_type {
        DataType::Int32 | DataType::UInt32 => zfp_type_zfp_type_int32,
        DataType::Int64 | DataType::UInt64 => zfp_type_zfp_type_int64,
        DataType::Float32 => zfp_type_zfp_type_float,
        DataType::Float64 => zfp_type_zfp_type_double,
    }
}

/// A kernel compression stream configured for one mode.
pub(super) struct ZfpStream(NonNull<zfp_stream>);

impl Drop for ZfpStream {
    fn drop(&mut self) {
        unsafe {
            zfp_stream_close(self.0.as_ptr());
        }
    }
}

impl ZfpStream {
    /// Open a stream configured for `mode`.
    ///
    /// The data type and dimensionality participate in fixed rate mode, where the compressed
    /// block size depends on both. Returns [`None`] on allocation failure, or if `mode` is fixed
    /// accuracy and `data_type` is not floating point.
    pub fn new(mode: &ZfpMode, data_type: &DataType, dimensionality: usize) -> Option<Self> {
        let zfp = NonNull::new(unsafe { zfp_stream_open(std::ptr::null_mut()) })?;
        match mode {
            ZfpMode::Expert(ZfpExpertParams {
                minbits,
                maxbits,
                maxprec,
                minexp,
            }) => {
                unsafe {
                    zfp_stream_set_params(zfp.as_ptr(), *minbits, *maxbits, *maxprec, *minexp)
                };
            }
            ZfpMode::FixedRate(rate) => {
                unsafe {
                    zfp_stream_set_rate(
                        zfp.as_ptr(),
                        *rate,
                        zfp_type_for(data_type),
                        dimensionality as u32,
                        0,
                    )
                };
            }
            ZfpMode::FixedPrecision(precision) => unsafe {
                zfp_stream_set_precision(zfp.as_ptr(), *precision);
            },
            ZfpMode::FixedAccuracy(tolerance) => {
                if data_type.is_float() {
                    unsafe { zfp_stream_set_accuracy(zfp.as_ptr(), *tolerance) };
                } else {
                    unsafe { zfp_stream_close(zfp.as_ptr()) };
                    return None;
                }
            }
            ZfpMode::Reversible => {
                unsafe { zfp_stream_set_reversible(zfp.as_ptr()) };
            }
        }
        Some(Self(zfp))
    }

    pub const fn as_zfp_stream(&self) -> *mut zfp_stream {
        self.0.as_ptr()
    }
}

/// A kernel field describing one chunk's geometry over its uncompressed bytes.
pub(super) struct ZfpField(NonNull<zfp_field>);

impl Drop for ZfpField {
    fn drop(&mut self) {
        unsafe {
            zfp_field_free(self.0.as_ptr());
        }
    }
}

impl ZfpField {
    /// Create a field over `data` with the geometry of `representation`.
    ///
    /// `data` must hold exactly `representation.size()` bytes and the dimensionality must be in
    /// `1..=4`; the fastest varying dimension is the last (C order).
    pub fn new(data: &mut [u8], representation: &ChunkRepresentation) -> Option<Self> {
        if data.len() != representation.size_usize() {
            return None;
        }
        let zfp_type_ = zfp_type_for(representation.data_type());
        let shape = representation.shape();
        let dim = |i: usize| usize::try_from(shape[i].get()).unwrap();
        let pointer = data.as_mut_ptr().cast::<std::ffi::c_void>();
        let field = match shape.len() {
            1 => unsafe { zfp_field_1d(pointer, zfp_type_, dim(0)) },
            2 => unsafe { zfp_field_2d(pointer, zfp_type_, dim(1), dim(0)) },
            3 => unsafe { zfp_field_3d(pointer, zfp_type_, dim(2), dim(1), dim(0)) },
            4 => unsafe { zfp_field_4d(pointer, zfp_type_, dim(3), dim(2), dim(1), dim(0)) },
            _ => return None,
        };
        NonNull::new(field).map(Self)
    }

    pub const fn as_zfp_field(&self) -> *mut zfp_field {
        self.0.as_ptr()
    }
}

/// A kernel bitstream over a compressed buffer.
pub(super) struct ZfpBitstream(NonNull<bitstream>);

impl Drop for ZfpBitstream {
    fn drop(&mut self) {
        unsafe {
            stream_close(self.0.as_ptr());
        }
    }
}

impl ZfpBitstream {
    pub fn new(buffer: &mut [u8]) -> Option<Self> {
        let stream =
            unsafe { stream_open(buffer.as_mut_ptr().cast::<std::ffi::c_void>(), buffer.len()) };
        NonNull::new(stream).map(Self)
    }

    pub const fn as_bitstream(&self) -> *mut bitstream {
        self.0.as_ptr()
    }
}
