//! ZFP compression filter for HDF5-style chunked array storage.
//!
//! [zfp](https://zfp.io/) is a compressed number format for 1D to 4D arrays of 32/64-bit floating point or integer data.
//! This crate implements the configuration codec and invocation contract of a ZFP chunk filter:
//!  - the fixed-layout integer metadata array ("cd\_values") persisted with a dataset, which selects
//!    one of five mutually exclusive compression modes (rate, precision, accuracy, expert, reversible),
//!  - the process-wide filter lifecycle (reference-counted registration with the host engine), and
//!  - the per-chunk encode/decode entry points invoked by the host engine's chunk I/O path.
//!
//! The numeric compression kernel is supplied by [`zfp-sys`](https://crates.io/crates/zfp-sys).
//!
//! ## Example
//! ```
//! use h5z_zfp::metadata::ZfpMode;
//!
//! // Select fixed rate mode with 8 compressed bits per value.
//! let mode = ZfpMode::FixedRate(8.0);
//!
//! // The persisted form is a fixed-layout array of 32-bit words.
//! let cd_values = mode.to_cd_values()?;
//! assert_eq!(cd_values.len(), 4);
//!
//! // Decoding reconstructs the mode exactly.
//! assert_eq!(ZfpMode::from_cd_values(&cd_values)?, mode);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(unused_variables)]
#![warn(dead_code)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![deny(clippy::missing_panics_doc)]

pub mod chunk;
pub mod codec;
pub mod filter;
pub mod metadata;
