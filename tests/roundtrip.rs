use std::{error::Error, num::NonZeroU64};

use h5z_zfp::{
    chunk::{elements_from_bytes, elements_to_bytes, ChunkRepresentation, DataType},
    codec::ZfpCodec,
    filter::{
        decode_chunk, encode_chunk, finalize, initialize, lookup, ZFP_FILTER_ID, ZFP_FILTER_NAME,
    },
    metadata::{ZfpExpertParams, ZfpFilterConfiguration, ZfpMode},
};

fn representation(dims: &[u64], data_type: DataType) -> ChunkRepresentation {
    ChunkRepresentation::new(
        dims.iter()
            .map(|&d| NonZeroU64::new(d).unwrap())
            .collect(),
        data_type,
    )
}

/// A smooth signal; ZFP compresses it well in every lossy mode.
fn sinusoid(n: usize) -> Vec<f64> {
    (0..n).map(|i| (i as f64 * 0.01).sin()).collect()
}

fn max_abs_difference(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

#[test]
fn host_path_lifecycle_and_chunk_io() -> Result<(), Box<dyn Error>> {
    // The host initializes the filter, looks it up by identifier at chunk I/O time, and runs
    // every chunk operation through the descriptor with freshly persisted cd_values.
    initialize()?;
    let descriptor = lookup(ZFP_FILTER_ID).expect("filter must be registered after initialize");
    assert_eq!(descriptor.id(), ZFP_FILTER_ID);
    assert_eq!(descriptor.name(), ZFP_FILTER_NAME);
    assert!(descriptor.capabilities().encode());
    assert!(descriptor.capabilities().decode());

    let chunk_representation = representation(&[32, 16], DataType::Float64);
    let elements = sinusoid(512);
    let bytes = elements_to_bytes(&elements);

    let cd_values = ZfpMode::Reversible.to_cd_values()?;
    let encoded = descriptor.encode(&cd_values, bytes.clone(), &chunk_representation)?;
    let decoded = descriptor.decode(&cd_values, encoded, &chunk_representation)?;
    assert_eq!(decoded, bytes);

    finalize()?;
    assert!(lookup(ZFP_FILTER_ID).is_none());
    Ok(())
}

#[test]
fn reversible_round_trip_is_bit_exact() -> Result<(), Box<dyn Error>> {
    let chunk_representation = representation(&[8, 8, 8], DataType::Float64);
    // Contents the lossy modes could not reproduce exactly.
    let elements: Vec<f64> = (0..512)
        .map(|i| (i as f64 * 1.7).sin() * 1e10 + (i as f64).sqrt())
        .collect();
    let bytes = elements_to_bytes(&elements);

    let cd_values = ZfpMode::Reversible.to_cd_values()?;
    let encoded = encode_chunk(&cd_values, bytes.clone(), &chunk_representation)?;
    let decoded = decode_chunk(&cd_values, encoded, &chunk_representation)?;
    assert_eq!(decoded, bytes);

    // Integer chunks round trip bit-exactly too.
    let chunk_representation = representation(&[64], DataType::Int32);
    let elements: Vec<i32> = (0..64).map(|i| i * i * 31 - 1000).collect();
    let bytes = elements_to_bytes(&elements);
    let encoded = encode_chunk(&cd_values, bytes.clone(), &chunk_representation)?;
    let decoded = decode_chunk(&cd_values, encoded, &chunk_representation)?;
    assert_eq!(decoded, bytes);
    Ok(())
}

#[test]
fn fixed_accuracy_respects_tolerance() -> Result<(), Box<dyn Error>> {
    let tolerance = 1e-6;
    let chunk_representation = representation(&[2048], DataType::Float64);
    let elements = sinusoid(2048);
    let bytes = elements_to_bytes(&elements);

    let cd_values = ZfpMode::FixedAccuracy(tolerance).to_cd_values()?;
    let encoded = encode_chunk(&cd_values, bytes.clone(), &chunk_representation)?;
    assert!(encoded.len() < bytes.len());
    let decoded = decode_chunk(&cd_values, encoded, &chunk_representation)?;

    let decoded_elements = elements_from_bytes::<f64>(&decoded);
    assert!(max_abs_difference(&elements, &decoded_elements) <= tolerance);
    Ok(())
}

#[test]
fn fixed_rate_respects_bit_budget() -> Result<(), Box<dyn Error>> {
    let chunk_representation = representation(&[2048], DataType::Float64);
    let elements = sinusoid(2048);
    let bytes = elements_to_bytes(&elements);

    let cd_values = ZfpMode::FixedRate(4.0).to_cd_values()?;
    let encoded = encode_chunk(&cd_values, bytes.clone(), &chunk_representation)?;
    // 4 bits per value against 64 uncompressed, with headroom for block padding.
    assert!(encoded.len() <= bytes.len() / 8);
    let decoded = decode_chunk(&cd_values, encoded, &chunk_representation)?;
    assert_eq!(decoded.len(), bytes.len());
    Ok(())
}

#[test]
fn fixed_precision_round_trip() -> Result<(), Box<dyn Error>> {
    let chunk_representation = representation(&[16, 16], DataType::Float32);
    let elements: Vec<f32> = (0..256).map(|i| i as f32).collect();
    let bytes = elements_to_bytes(&elements);

    let configuration = ZfpFilterConfiguration::try_from(
        r#"{
        "mode": "fixed_precision",
        "precision": 24
    }"#,
    )?;
    let codec = ZfpCodec::new_with_configuration(&configuration);
    let encoded = codec.encode(bytes, &chunk_representation)?;
    let decoded = codec.decode(encoded, &chunk_representation)?;
    assert_eq!(elements_from_bytes::<f32>(&decoded), elements);
    Ok(())
}

#[test]
fn expert_mode_configuration_end_to_end() -> Result<(), Box<dyn Error>> {
    // Declarative configuration -> mode -> persisted cd_values -> codec.
    let json = r#"{
        "mode": "expert",
        "minbits": 1,
        "maxbits": 16657,
        "maxprec": 64,
        "minexp": -1074
    }"#;
    let configuration = ZfpFilterConfiguration::try_from(json)?;
    let mode = ZfpMode::from(configuration);
    assert_eq!(
        mode,
        ZfpMode::Expert(ZfpExpertParams {
            minbits: 1,
            maxbits: 16657,
            maxprec: 64,
            minexp: -1074,
        })
    );

    let cd_values = mode.to_cd_values()?;
    let chunk_representation = representation(&[512], DataType::Float64);
    let elements = sinusoid(512);
    let bytes = elements_to_bytes(&elements);

    let encoded = encode_chunk(&cd_values, bytes.clone(), &chunk_representation)?;
    let decoded = decode_chunk(&cd_values, encoded, &chunk_representation)?;
    let decoded_elements = elements_from_bytes::<f64>(&decoded);
    // Unconstrained expert parameters retain full precision on doubles.
    assert!(max_abs_difference(&elements, &decoded_elements) <= 1e-6);
    Ok(())
}
