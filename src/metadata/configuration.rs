//! The declarative `JSON` form of the filter configuration.

use derive_more::From;
use serde::{Deserialize, Serialize};

use super::mode::{ZfpExpertParams, ZfpMode};

/// A wrapper to handle various versions of the ZFP filter configuration.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, From)]
#[serde(untagged)]
pub enum ZfpFilterConfiguration {
    /// Version 1.0.
    V1(ZfpFilterConfigurationV1),
}

/// Configuration parameters for the ZFP filter (version 1.0).
///
/// Further information on the meaning of these parameters can be found in the
/// [zfp documentation](https://zfp.readthedocs.io/en/latest/).
///
/// Valid examples:
///
/// ### Encode in fixed rate mode with 10.5 compressed bits per value
/// ```rust
/// # let JSON = r#"
/// {
///     "mode": "fixed_rate",
///     "rate": 10.5
/// }
/// # "#;
/// # let configuration: h5z_zfp::metadata::ZfpFilterConfigurationV1 = serde_json::from_str(JSON).unwrap();
/// ```
///
/// ### Encode in fixed precision mode with 19 uncompressed bits per value
/// ```rust
/// # let JSON = r#"
/// {
///     "mode": "fixed_precision",
///     "precision": 19
/// }
/// # "#;
/// # let configuration: h5z_zfp::metadata::ZfpFilterConfigurationV1 = serde_json::from_str(JSON).unwrap();
/// ```
///
/// ### Encode in fixed accuracy mode with a tolerance of 0.05
/// ```rust
/// # let JSON = r#"
/// {
///     "mode": "fixed_accuracy",
///     "tolerance": 0.05
/// }
/// # "#;
/// # let configuration: h5z_zfp::metadata::ZfpFilterConfigurationV1 = serde_json::from_str(JSON).unwrap();
/// ```
///
/// ### Encode in reversible mode
/// ```rust
/// # let JSON = r#"
/// {
///     "mode": "reversible"
/// }
/// # "#;
/// # let configuration: h5z_zfp::metadata::ZfpFilterConfigurationV1 = serde_json::from_str(JSON).unwrap();
/// ```
///
/// ### Encode in expert mode
/// ```rust
/// # let JSON = r#"
/// {
///     "mode": "expert",
///     "minbits": 1,
///     "maxbits": 16657,
///     "maxprec": 64,
///     "minexp": -1074
/// }
/// # "#;
/// # let configuration: h5z_zfp::metadata::ZfpFilterConfigurationV1 = serde_json::from_str(JSON).unwrap();
/// ```
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ZfpFilterConfigurationV1 {
    /// Expert mode.
    Expert(ZfpExpertParams),
    /// Fixed rate mode.
    FixedRate {
        /// The number of compressed bits per value.
        rate: f64,
    },
    /// Fixed precision mode.
    FixedPrecision {
        /// The number of uncompressed bits per value to store; indirectly governs the relative
        /// error.
        precision: u32,
    },
    /// Fixed accuracy mode.
    FixedAccuracy {
        /// Values in the decompressed array differ from the input array by no more than this
        /// tolerance.
        tolerance: f64,
    },
    /// Reversible mode.
    Reversible,
}

impl TryFrom<&str> for ZfpFilterConfiguration {
    type Error = serde_json::Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        serde_json::from_str(s)
    }
}

impl From<ZfpFilterConfigurationV1> for ZfpMode {
    fn from(configuration: ZfpFilterConfigurationV1) -> Self {
        match configuration {
            ZfpFilterConfigurationV1::Expert(params) => Self::Expert(params),
            ZfpFilterConfigurationV1::FixedRate { rate } => Self::FixedRate(rate),
            ZfpFilterConfigurationV1::FixedPrecision { precision } => Self::FixedPrecision(precision),
            ZfpFilterConfigurationV1::FixedAccuracy { tolerance } => Self::FixedAccuracy(tolerance),
            ZfpFilterConfigurationV1::Reversible => Self::Reversible,
        }
    }
}

impl From<ZfpMode> for ZfpFilterConfigurationV1 {
    fn from(mode: ZfpMode) -> Self {
        match mode {
            ZfpMode::Expert(params) => Self::Expert(params),
            ZfpMode::FixedRate(rate) => Self::FixedRate { rate },
            ZfpMode::FixedPrecision(precision) => Self::FixedPrecision { precision },
            ZfpMode::FixedAccuracy(tolerance) => Self::FixedAccuracy { tolerance },
            ZfpMode::Reversible => Self::Reversible,
        }
    }
}

impl From<ZfpFilterConfiguration> for ZfpMode {
    fn from(configuration: ZfpFilterConfiguration) -> Self {
        let ZfpFilterConfiguration::V1(configuration) = configuration;
        configuration.into()
    }
}

impl From<ZfpMode> for ZfpFilterConfiguration {
    fn from(mode: ZfpMode) -> Self {
        Self::V1(mode.into())
    }
}
