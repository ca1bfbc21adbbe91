//! Filter configuration metadata.
//!
//! The only configuration form ever persisted with a dataset is a fixed-layout array of unsigned
//! 32-bit words ("cd\_values", after the HDF5 client-data convention). The first word is always the
//! mode identifier; the remaining words and the total length are dictated by the mode:
//!
//! | Mode            | Id | cd\_values                                        |
//! |-----------------|----|---------------------------------------------------|
//! | Fixed rate      | 1  | `[1, rate_hi, rate_lo, 0]`                        |
//! | Fixed precision | 2  | `[2, precision, 0]`                               |
//! | Fixed accuracy  | 3  | `[3, tolerance_hi, tolerance_lo, emin]`           |
//! | Expert          | 4  | `[4, minbits, maxbits, maxprec, minexp, 0]`       |
//! | Reversible      | 5  | `[5]`                                             |
//!
//! 64-bit floating point parameters are stored as two words holding the high and low halves of the
//! IEEE-754 bit pattern, high word first. `emin` is derived from the tolerance (see
//! [`ZfpMode::to_cd_values`]). Mode identifiers and layouts are persisted in files and are stable
//! forever.
//!
//! [`ZfpFilterConfiguration`] is the declarative `JSON` form of the same configuration, for hosts
//! that persist or accept a human-readable filter description.

mod cd_values;
mod configuration;
mod mode;

pub use cd_values::{ConfigurationError, MetadataError};
pub use configuration::{ZfpFilterConfiguration, ZfpFilterConfigurationV1};
pub use mode::{
    arity_for, known_mode_ids, ZfpExpertParams, ZfpMode, MODE_ID_EXPERT, MODE_ID_FIXED_ACCURACY,
    MODE_ID_FIXED_PRECISION, MODE_ID_FIXED_RATE, MODE_ID_REVERSIBLE,
};
