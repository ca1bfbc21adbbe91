//! Encoding and decoding of the persisted filter configuration array.

use thiserror::Error;

use super::mode::{
    arity_for, ZfpExpertParams, ZfpMode, MODE_ID_EXPERT, MODE_ID_FIXED_ACCURACY,
    MODE_ID_FIXED_PRECISION, MODE_ID_FIXED_RATE, MODE_ID_REVERSIBLE,
};

/// The smallest bit plane exponent the kernel encodes (the exponent of the smallest subnormal
/// 64-bit float is -1074, and a tolerance of zero selects one below that).
const ZFP_MIN_EXP: i32 = -1075;

/// The largest number of bit planes a 64-bit value can hold.
const ZFP_MAX_PREC: u32 = 64;

/// An out-of-domain configuration parameter, rejected at encode time.
///
/// Parameters are never silently clamped; clamping would desynchronise the persisted metadata from
/// caller intent.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The rate is not a finite positive number.
    #[error("rate {_0} is not a finite positive number of bits per value")]
    InvalidRate(f64),
    /// The precision is outside `1..=64`.
    #[error("precision {_0} is outside the representable range 1..=64")]
    InvalidPrecision(u32),
    /// The tolerance is not finite and non-negative.
    #[error("tolerance {_0} is not a finite non-negative number")]
    InvalidTolerance(f64),
    /// The expert block size window contains no valid size.
    #[error("expert window minbits {minbits}..=maxbits {maxbits} is empty")]
    EmptyExpertWindow {
        /// The minimum number of compressed bits per block.
        minbits: u32,
        /// The maximum number of compressed bits per block.
        maxbits: u32,
    },
    /// The expert `maxprec` is outside `1..=64`.
    #[error("expert maxprec {_0} is outside the representable range 1..=64")]
    InvalidMaxPrec(u32),
    /// The expert `minexp` is below the smallest encodable bit plane exponent.
    #[error("expert minexp {_0} is below the smallest encodable bit plane exponent -1075")]
    InvalidMinExp(i32),
}

/// A malformed persisted configuration array.
///
/// The array is file content and untrusted; every branch of the decoder rejects rather than
/// guesses.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The array is empty.
    #[error("the filter metadata array is empty")]
    Empty,
    /// The leading word is not a known mode identifier.
    #[error("unknown mode identifier {_0}")]
    UnknownModeId(u32),
    /// The array length does not match the arity of the claimed mode.
    #[error("mode {mode_id} expects {expected} words but the metadata array has {actual}")]
    UnexpectedLength {
        /// The claimed mode identifier.
        mode_id: u32,
        /// The word count dictated by the mode.
        expected: usize,
        /// The actual word count.
        actual: usize,
    },
    /// A reserved word is not zero.
    #[error("reserved word {index} is {value}, expected zero")]
    NonZeroReservedWord {
        /// The index of the reserved word.
        index: usize,
        /// The stored value.
        value: u32,
    },
    /// A reassembled parameter is outside its mode's domain.
    #[error(transparent)]
    InvalidParameter(#[from] ConfigurationError),
    /// The stored tolerance exponent disagrees with the tolerance it was derived from.
    #[error("stored tolerance exponent {stored} does not match {derived} derived from the tolerance")]
    InconsistentToleranceExponent {
        /// The exponent word stored in the array.
        stored: i32,
        /// The exponent re-derived from the stored tolerance.
        derived: i32,
    },
}

/// Split a 64-bit float into the high and low halves of its bit pattern.
fn split_words(value: f64) -> (u32, u32) {
    let bits = value.to_bits();
    ((bits >> 32) as u32, bits as u32)
}

/// Reassemble a 64-bit float from the high and low halves of its bit pattern.
fn join_words(high: u32, low: u32) -> f64 {
    f64::from_bits((u64::from(high) << 32) | u64::from(low))
}

/// The smallest encoded bit plane exponent for `tolerance`: `floor(log2(tolerance))` for a
/// positive tolerance, [`ZFP_MIN_EXP`] for zero.
///
/// Computed from the bit pattern so the result is exact for every positive finite input,
/// subnormals included. This matches the exponent the kernel derives when the stream accuracy is
/// set, so the stored word is exactly the bit plane cutoff the kernel runs with.
fn tolerance_min_exp(tolerance: f64) -> i32 {
    if tolerance == 0.0 {
        return ZFP_MIN_EXP;
    }
    let bits = tolerance.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    if biased == 0 {
        // Subnormal: take the exponent of the leading mantissa bit.
        let mantissa = bits & ((1u64 << 52) - 1);
        (63 - mantissa.leading_zeros() as i32) - 1074
    } else {
        biased - 1023
    }
}

fn validate_rate(rate: f64) -> Result<(), ConfigurationError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidRate(rate))
    }
}

fn validate_precision(precision: u32) -> Result<(), ConfigurationError> {
    if (1..=ZFP_MAX_PREC).contains(&precision) {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidPrecision(precision))
    }
}

fn validate_tolerance(tolerance: f64) -> Result<(), ConfigurationError> {
    if tolerance.is_finite() && tolerance >= 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidTolerance(tolerance))
    }
}

fn validate_expert(params: &ZfpExpertParams) -> Result<(), ConfigurationError> {
    if params.maxbits == 0 || params.minbits > params.maxbits {
        return Err(ConfigurationError::EmptyExpertWindow {
            minbits: params.minbits,
            maxbits: params.maxbits,
        });
    }
    if !(1..=ZFP_MAX_PREC).contains(&params.maxprec) {
        return Err(ConfigurationError::InvalidMaxPrec(params.maxprec));
    }
    if params.minexp < ZFP_MIN_EXP {
        return Err(ConfigurationError::InvalidMinExp(params.minexp));
    }
    Ok(())
}

fn reserved_zero(cd_values: &[u32], index: usize) -> Result<(), MetadataError> {
    let value = cd_values[index];
    if value == 0 {
        Ok(())
    } else {
        Err(MetadataError::NonZeroReservedWord { index, value })
    }
}

impl ZfpMode {
    /// Encode the mode and its parameters into a cd\_values array.
    ///
    /// The output always satisfies `output.len() == arity_for(output[0])`. See the
    /// [module documentation](crate::metadata) for the per-mode layouts. The high word of a split
    /// 64-bit float is the most significant half of its bit pattern; this order is fixed forever.
    ///
    /// The fixed accuracy layout carries one derived word, `emin`, the smallest encoded bit plane
    /// exponent for the tolerance (`floor(log2(tolerance))`, or -1075 for a tolerance of zero),
    /// stored as an `i32` cast to `u32`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if a parameter is outside the representable range for its
    /// mode. Parameters are never clamped.
    pub fn to_cd_values(&self) -> Result<Vec<u32>, ConfigurationError> {
        match self {
            Self::FixedRate(rate) => {
                validate_rate(*rate)?;
                let (high, low) = split_words(*rate);
                Ok(vec![MODE_ID_FIXED_RATE, high, low, 0])
            }
            Self::FixedPrecision(precision) => {
                validate_precision(*precision)?;
                Ok(vec![MODE_ID_FIXED_PRECISION, *precision, 0])
            }
            Self::FixedAccuracy(tolerance) => {
                validate_tolerance(*tolerance)?;
                let (high, low) = split_words(*tolerance);
                let emin = tolerance_min_exp(*tolerance);
                Ok(vec![MODE_ID_FIXED_ACCURACY, high, low, emin as u32])
            }
            Self::Expert(params) => {
                validate_expert(params)?;
                Ok(vec![
                    MODE_ID_EXPERT,
                    params.minbits,
                    params.maxbits,
                    params.maxprec,
                    params.minexp as u32,
                    0,
                ])
            }
            Self::Reversible => Ok(vec![MODE_ID_REVERSIBLE]),
        }
    }

    /// Decode a cd\_values array back into a mode.
    ///
    /// This is the only place file-persisted words become typed filter state. The array is
    /// validated before any word is interpreted: the mode identifier must be known, the length
    /// must match the mode's arity, reserved words must be zero, reassembled parameters must be
    /// within their mode's domain, and a stored tolerance exponent must agree with the tolerance
    /// it is derived from.
    ///
    /// # Errors
    ///
    /// Returns a [`MetadataError`] if the array is malformed in any of the above ways.
    pub fn from_cd_values(cd_values: &[u32]) -> Result<Self, MetadataError> {
        let Some(&mode_id) = cd_values.first() else {
            return Err(MetadataError::Empty);
        };
        let Some(expected) = arity_for(mode_id) else {
            return Err(MetadataError::UnknownModeId(mode_id));
        };
        if cd_values.len() != expected {
            return Err(MetadataError::UnexpectedLength {
                mode_id,
                expected,
                actual: cd_values.len(),
            });
        }
        match mode_id {
            MODE_ID_FIXED_RATE => {
                reserved_zero(cd_values, 3)?;
                let rate = join_words(cd_values[1], cd_values[2]);
                validate_rate(rate)?;
                Ok(Self::FixedRate(rate))
            }
            MODE_ID_FIXED_PRECISION => {
                reserved_zero(cd_values, 2)?;
                let precision = cd_values[1];
                validate_precision(precision)?;
                Ok(Self::FixedPrecision(precision))
            }
            MODE_ID_FIXED_ACCURACY => {
                let tolerance = join_words(cd_values[1], cd_values[2]);
                validate_tolerance(tolerance)?;
                let stored = cd_values[3] as i32;
                let derived = tolerance_min_exp(tolerance);
                if stored != derived {
                    return Err(MetadataError::InconsistentToleranceExponent { stored, derived });
                }
                Ok(Self::FixedAccuracy(tolerance))
            }
            MODE_ID_EXPERT => {
                reserved_zero(cd_values, 5)?;
                let params = ZfpExpertParams {
                    minbits: cd_values[1],
                    maxbits: cd_values[2],
                    maxprec: cd_values[3],
                    minexp: cd_values[4] as i32,
                };
                validate_expert(&params)?;
                Ok(Self::Expert(params))
            }
            MODE_ID_REVERSIBLE => Ok(Self::Reversible),
            _ => Err(MetadataError::UnknownModeId(mode_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cd_values_round_trip_all_modes() {
        let expert = ZfpExpertParams {
            minbits: 1,
            maxbits: 16657,
            maxprec: 64,
            minexp: -1074,
        };
        let modes = [
            ZfpMode::FixedRate(10.5),
            ZfpMode::FixedPrecision(19),
            ZfpMode::FixedAccuracy(0.05),
            ZfpMode::FixedAccuracy(0.0),
            ZfpMode::Expert(expert),
            ZfpMode::Reversible,
        ];
        for mode in modes {
            let cd_values = mode.to_cd_values().unwrap();
            assert_eq!(cd_values.len(), arity_for(cd_values[0]).unwrap());
            assert_eq!(ZfpMode::from_cd_values(&cd_values).unwrap(), mode);
        }
    }

    #[test]
    fn cd_values_fixed_rate_layout() {
        // 4.0f64 is 0x4010_0000_0000_0000, split high word first.
        let cd_values = ZfpMode::FixedRate(4.0).to_cd_values().unwrap();
        assert_eq!(cd_values, vec![1, 0x4010_0000, 0, 0]);
        assert_eq!(
            ZfpMode::from_cd_values(&cd_values).unwrap(),
            ZfpMode::FixedRate(4.0)
        );
    }

    #[test]
    fn cd_values_accuracy_exponent_word() {
        // 2^-20 <= 1e-6 < 2^-19
        let cd_values = ZfpMode::FixedAccuracy(1e-6).to_cd_values().unwrap();
        assert_eq!(cd_values[3] as i32, -20);
        // An exact power of two maps to its own exponent.
        let cd_values = ZfpMode::FixedAccuracy(0.25).to_cd_values().unwrap();
        assert_eq!(cd_values[3] as i32, -2);
        // A zero tolerance selects the smallest encodable bit plane.
        let cd_values = ZfpMode::FixedAccuracy(0.0).to_cd_values().unwrap();
        assert_eq!(cd_values[3] as i32, -1075);
        // Subnormal tolerances still derive an exact exponent.
        let cd_values = ZfpMode::FixedAccuracy(f64::from_bits(1)).to_cd_values().unwrap();
        assert_eq!(cd_values[3] as i32, -1074);
    }

    #[test]
    fn cd_values_rejects_out_of_domain_parameters() {
        assert!(ZfpMode::FixedRate(0.0).to_cd_values().is_err());
        assert!(ZfpMode::FixedRate(-1.0).to_cd_values().is_err());
        assert!(ZfpMode::FixedRate(f64::NAN).to_cd_values().is_err());
        assert!(ZfpMode::FixedRate(f64::INFINITY).to_cd_values().is_err());
        assert!(ZfpMode::FixedPrecision(0).to_cd_values().is_err());
        assert!(ZfpMode::FixedPrecision(65).to_cd_values().is_err());
        assert!(ZfpMode::FixedAccuracy(-1e-6).to_cd_values().is_err());
        assert!(ZfpMode::FixedAccuracy(f64::NAN).to_cd_values().is_err());
        let empty_window = ZfpExpertParams {
            minbits: 8,
            maxbits: 4,
            maxprec: 64,
            minexp: -1074,
        };
        assert!(ZfpMode::Expert(empty_window).to_cd_values().is_err());
        let bad_prec = ZfpExpertParams {
            minbits: 1,
            maxbits: 16657,
            maxprec: 65,
            minexp: -1074,
        };
        assert!(ZfpMode::Expert(bad_prec).to_cd_values().is_err());
        let bad_minexp = ZfpExpertParams {
            minbits: 1,
            maxbits: 16657,
            maxprec: 64,
            minexp: -1076,
        };
        assert!(ZfpMode::Expert(bad_minexp).to_cd_values().is_err());
    }

    #[test]
    fn cd_values_rejects_malformed_arrays() {
        assert!(matches!(
            ZfpMode::from_cd_values(&[]),
            Err(MetadataError::Empty)
        ));
        assert!(matches!(
            ZfpMode::from_cd_values(&[0]),
            Err(MetadataError::UnknownModeId(0))
        ));
        assert!(matches!(
            ZfpMode::from_cd_values(&[6, 0, 0]),
            Err(MetadataError::UnknownModeId(6))
        ));
        // Reversible with trailing words.
        assert!(matches!(
            ZfpMode::from_cd_values(&[5, 0]),
            Err(MetadataError::UnexpectedLength { .. })
        ));
        // Rate truncated to the arity of another mode.
        assert!(matches!(
            ZfpMode::from_cd_values(&[1, 0x4010_0000, 0]),
            Err(MetadataError::UnexpectedLength { .. })
        ));
        // Nonzero reserved word.
        assert!(matches!(
            ZfpMode::from_cd_values(&[1, 0x4010_0000, 0, 7]),
            Err(MetadataError::NonZeroReservedWord { index: 3, value: 7 })
        ));
        // Out-of-domain decoded precision.
        assert!(matches!(
            ZfpMode::from_cd_values(&[2, 65, 0]),
            Err(MetadataError::InvalidParameter(_))
        ));
        // Tolerance exponent word inconsistent with the tolerance.
        let mut cd_values = ZfpMode::FixedAccuracy(1e-6).to_cd_values().unwrap();
        cd_values[3] = (-19i32) as u32;
        assert!(matches!(
            ZfpMode::from_cd_values(&cd_values),
            Err(MetadataError::InconsistentToleranceExponent {
                stored: -19,
                derived: -20
            })
        ));
    }
}
