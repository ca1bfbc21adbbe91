//! The ZFP compression modes and their descriptor table.

use serde::{Deserialize, Serialize};

/// The mode identifier of fixed rate mode.
pub const MODE_ID_FIXED_RATE: u32 = 1;
/// The mode identifier of fixed precision mode.
pub const MODE_ID_FIXED_PRECISION: u32 = 2;
/// The mode identifier of fixed accuracy mode.
pub const MODE_ID_FIXED_ACCURACY: u32 = 3;
/// The mode identifier of expert mode.
pub const MODE_ID_EXPERT: u32 = 4;
/// The mode identifier of reversible mode.
pub const MODE_ID_REVERSIBLE: u32 = 5;

/// ZFP expert mode parameters.
///
/// Expert mode controls all compression knobs simultaneously; the other lossy modes are
/// presets over these parameters. Further information can be found in the
/// [zfp documentation](https://zfp.readthedocs.io/en/latest/modes.html#expert-mode).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
pub struct ZfpExpertParams {
    /// The minimum number of compressed bits used to represent a block.
    ///
    /// Usually one bit, unless each and every block is to be stored using a fixed number of bits to
    /// facilitate random access, in which case it should be set to the same value as `maxbits`.
    pub minbits: u32,
    /// The maximum number of bits used to represent a block.
    ///
    /// Sets a hard upper bound on compressed block size and governs the rate in fixed rate mode.
    pub maxbits: u32,
    /// The maximum number of bit planes encoded.
    ///
    /// Governs the relative error. This is the parameter that specifies the precision in fixed
    /// precision mode.
    pub maxprec: u32,
    /// The smallest absolute bit plane number encoded (floating point data only).
    ///
    /// Governs the absolute error in fixed accuracy mode.
    pub minexp: i32,
}

/// The ZFP mode: one of five mutually exclusive compression strategies.
///
/// A `ZfpMode` is both the parameter carrier handed to the encoder and the filter state
/// reconstructed by [`from_cd_values`](ZfpMode::from_cd_values). Every decode produces an
/// independent value, so concurrent chunk operations against the same persisted configuration
/// never interfere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZfpMode {
    /// Expert mode: direct control of all compression parameters.
    Expert(ZfpExpertParams),
    /// Fixed rate mode: the given number of compressed bits per value.
    FixedRate(f64),
    /// Fixed precision mode: the given number of uncompressed bits per value.
    FixedPrecision(u32),
    /// Fixed accuracy mode: absolute error bounded by the given tolerance.
    FixedAccuracy(f64),
    /// Reversible (lossless) mode.
    Reversible,
}

impl ZfpMode {
    /// Return the stable numeric identifier of the mode.
    ///
    /// Identifiers are persisted in files and are never renumbered.
    #[must_use]
    pub const fn mode_id(&self) -> u32 {
        match self {
            Self::FixedRate(_) => MODE_ID_FIXED_RATE,
            Self::FixedPrecision(_) => MODE_ID_FIXED_PRECISION,
            Self::FixedAccuracy(_) => MODE_ID_FIXED_ACCURACY,
            Self::Expert(_) => MODE_ID_EXPERT,
            Self::Reversible => MODE_ID_REVERSIBLE,
        }
    }
}

/// Return the cd\_values word count for `mode_id`, or [`None`] for an unknown identifier.
///
/// The count includes the leading mode identifier word and is fixed per mode, independent of the
/// data. Both the encoder and the decoder validate lengths against this table before interpreting
/// contents.
#[must_use]
pub const fn arity_for(mode_id: u32) -> Option<usize> {
    match mode_id {
        MODE_ID_FIXED_RATE | MODE_ID_FIXED_ACCURACY => Some(4),
        MODE_ID_FIXED_PRECISION => Some(3),
        MODE_ID_EXPERT => Some(6),
        MODE_ID_REVERSIBLE => Some(1),
        _ => None,
    }
}

/// Return the set of known mode identifiers.
#[must_use]
pub const fn known_mode_ids() -> [u32; 5] {
    [
        MODE_ID_FIXED_RATE,
        MODE_ID_FIXED_PRECISION,
        MODE_ID_FIXED_ACCURACY,
        MODE_ID_EXPERT,
        MODE_ID_REVERSIBLE,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_ids_are_stable() {
        assert_eq!(ZfpMode::FixedRate(1.0).mode_id(), 1);
        assert_eq!(ZfpMode::FixedPrecision(1).mode_id(), 2);
        assert_eq!(ZfpMode::FixedAccuracy(1.0).mode_id(), 3);
        let expert = ZfpExpertParams {
            minbits: 1,
            maxbits: 16657,
            maxprec: 64,
            minexp: -1074,
        };
        assert_eq!(ZfpMode::Expert(expert).mode_id(), 4);
        assert_eq!(ZfpMode::Reversible.mode_id(), 5);
    }

    #[test]
    fn arity_table() {
        assert_eq!(arity_for(MODE_ID_FIXED_RATE), Some(4));
        assert_eq!(arity_for(MODE_ID_FIXED_PRECISION), Some(3));
        assert_eq!(arity_for(MODE_ID_FIXED_ACCURACY), Some(4));
        assert_eq!(arity_for(MODE_ID_EXPERT), Some(6));
        assert_eq!(arity_for(MODE_ID_REVERSIBLE), Some(1));
        assert_eq!(arity_for(0), None);
        assert_eq!(arity_for(6), None);
        for mode_id in known_mode_ids() {
            assert!(arity_for(mode_id).is_some());
        }
    }
}
