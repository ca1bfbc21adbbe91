//! Chunk shape hints and typed chunk elements.
//!
//! A chunk is a fixed-shape contiguous block of a larger array dataset and the unit of compression.
//! [`ChunkRepresentation`] is the shape hint the host engine passes alongside every chunk operation:
//! the codec derives the kernel field geometry and the decoded buffer size from it, never from
//! lengths embedded in compressed (and therefore untrusted) chunk content.

use std::num::NonZeroU64;

use derive_more::Display;

/// A chunk element type supported by the ZFP kernel.
///
/// Unsigned integer types are compressed as their signed counterparts, which have the same width.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Display)]
pub enum DataType {
    /// A 32-bit signed integer.
    #[display("int32")]
    Int32,
    /// A 32-bit unsigned integer.
    #[display("uint32")]
    UInt32,
    /// A 64-bit signed integer.
    #[display("int64")]
    Int64,
    /// A 64-bit unsigned integer.
    #[display("uint64")]
    UInt64,
    /// A 32-bit IEEE-754 floating point number.
    #[display("float32")]
    Float32,
    /// A 64-bit IEEE-754 floating point number.
    #[display("float64")]
    Float64,
}

impl DataType {
    /// Return the size of an element in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        match self {
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }

    /// Returns true if this is a floating point type.
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }
}

/// The shape and data type of a chunk.
///
/// Chunks have nonzero dimensions by construction.
#[derive(Clone, Debug, Display)]
#[display("{shape:?} {data_type}")]
pub struct ChunkRepresentation {
    /// The shape of the chunk.
    shape: Vec<NonZeroU64>,
    /// The data type of the chunk.
    data_type: DataType,
}

impl ChunkRepresentation {
    /// Create a new [`ChunkRepresentation`].
    #[must_use]
    pub fn new(shape: Vec<NonZeroU64>, data_type: DataType) -> Self {
        Self { shape, data_type }
    }

    /// Return the shape of the chunk.
    #[must_use]
    pub fn shape(&self) -> &[NonZeroU64] {
        &self.shape
    }

    /// Return the dimensionality of the chunk.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.shape.len()
    }

    /// Return the data type of the chunk.
    #[must_use]
    pub const fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Return the number of elements in the chunk.
    ///
    /// Equal to the product of its shape.
    #[must_use]
    pub fn num_elements(&self) -> u64 {
        self.shape.iter().map(|&i| i.get()).product::<u64>()
    }

    /// Return the number of elements in the chunk as a [`usize`].
    ///
    /// # Panics
    ///
    /// Panics if [`num_elements()`](Self::num_elements) is greater than [`usize::MAX`].
    #[must_use]
    pub fn num_elements_usize(&self) -> usize {
        usize::try_from(self.num_elements()).unwrap()
    }

    /// Return the element size in bytes.
    #[must_use]
    pub const fn element_size(&self) -> usize {
        self.data_type.size()
    }

    /// Return the total size of the chunk in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.num_elements() * self.element_size() as u64
    }

    /// Return the total size of the chunk in bytes as a [`usize`].
    ///
    /// # Panics
    ///
    /// Panics if the size is greater than [`usize::MAX`].
    #[must_use]
    pub fn size_usize(&self) -> usize {
        self.num_elements_usize() * self.element_size()
    }
}

/// Reinterpret a slice of chunk elements as bytes.
#[must_use]
pub fn elements_to_bytes<T: bytemuck::Pod>(elements: &[T]) -> Vec<u8> {
    bytemuck::cast_slice(elements).to_vec()
}

/// Reinterpret chunk bytes as elements of type `T`.
///
/// # Panics
///
/// Panics if the length of `bytes` is not a multiple of the size of `T`.
#[must_use]
pub fn elements_from_bytes<T: bytemuck::Pod>(bytes: &[u8]) -> Vec<T> {
    bytemuck::pod_collect_to_vec(bytes)
}
