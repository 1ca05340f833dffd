use arith_codec_core::{
    compress_bytes, decode, decompress_bytes, encode, required_precision, Alphabet, CodecError,
    CoderParams,
};

/// Encode-then-decode through the public API, asserting exact recovery.
fn round_trip(sequence: &[usize], probabilities: Vec<f64>) {
    let params = CoderParams::default();
    let distribution = arith_codec_core::Distribution::new(probabilities).unwrap();
    let encoded = encode(sequence, &distribution, &params).unwrap();
    let decoded = decode(encoded.value(), sequence.len(), &distribution, &params).unwrap();
    assert_eq!(decoded, sequence);
}

#[test]
fn reference_scenario_abac() {
    // alphabet {a, b, c} -> indices {0, 1, 2}, "abac" -> [0, 1, 0, 2]
    let text: Vec<char> = "abac".chars().collect();
    let (alphabet, distribution) = Alphabet::from_observed(&text).unwrap();
    assert_eq!(alphabet.symbols(), &['a', 'b', 'c']);
    assert_eq!(distribution.probabilities(), &[0.5, 0.25, 0.25]);

    let sequence = alphabet.indices(&text).unwrap();
    assert_eq!(sequence, [0, 1, 0, 2]);

    let params = CoderParams::default();
    let encoded = encode(&sequence, &distribution, &params).unwrap();
    // midpoint of the final interval [0.296875, 0.3125)
    assert_eq!(encoded.value().to_decimal_string(), "0.3046875");

    let decoded = decode(encoded.value(), 4, &distribution, &params).unwrap();
    assert_eq!(alphabet.raw_values(&decoded).unwrap(), text);
}

#[test]
fn empty_sequence_round_trips() {
    let params = CoderParams::default();
    let distribution = arith_codec_core::Distribution::new(vec![0.5, 0.5]).unwrap();
    let encoded = encode(&[], &distribution, &params).unwrap();
    assert_eq!(encoded.length(), 0);
    // any value in [0, 1) decodes to the empty sequence at n = 0
    assert!(decode(encoded.value(), 0, &distribution, &params)
        .unwrap()
        .is_empty());
}

#[test]
fn single_symbol_alphabet() {
    // one symbol carries zero information; the interval never shrinks
    round_trip(&[0; 500], vec![1.0]);
}

#[test]
fn skewed_and_uniform_both_round_trip_at_n_1000() {
    let params = CoderParams::default();
    let skewed = vec![0.99, 0.01];
    let uniform = vec![0.5, 0.5];
    assert!(
        required_precision(&skewed, 1000, &params) < required_precision(&uniform, 1000, &params)
    );

    // a sequence with roughly the skewed distribution's composition
    let mut sequence = vec![0usize; 1000];
    for i in 0..10 {
        sequence[i * 100] = 1;
    }
    round_trip(&sequence, skewed);

    let alternating: Vec<usize> = (0..1000).map(|i| i % 2).collect();
    round_trip(&alternating, uniform);
}

#[test]
fn forced_under_precision_raises_rather_than_corrupting() {
    let params = CoderParams {
        precision_cap: Some(16),
        ..Default::default()
    };
    let distribution = arith_codec_core::Distribution::new(vec![0.5, 0.5]).unwrap();
    let sequence: Vec<usize> = (0..64).map(|i| i % 2).collect();
    let err = encode(&sequence, &distribution, &params).unwrap_err();
    assert!(matches!(err, CodecError::PrecisionExhausted { .. }));
}

#[test]
fn longer_text_round_trips_through_archive() {
    let params = CoderParams::default();
    let data = b"It is a truth universally acknowledged, that a single man in \
                 possession of a good fortune, must be in want of a wife."
        .repeat(4);
    let archive = compress_bytes(&data, &params).unwrap();
    assert_eq!(decompress_bytes(&archive, &params).unwrap(), data);
}

#[test]
fn all_256_byte_values_round_trip() {
    let params = CoderParams::default();
    let data: Vec<u8> = (0..=255u8).cycle().take(512).collect();
    let archive = compress_bytes(&data, &params).unwrap();
    assert_eq!(archive.symbols.len(), 256);
    assert_eq!(decompress_bytes(&archive, &params).unwrap(), data);
}

#[test]
fn larger_safety_factor_recovers_an_exhausted_pass() {
    // a sequence much less probable than the distribution's entropy
    // suggests can exhaust the estimate; a larger safety factor is the
    // documented recovery
    let distribution = arith_codec_core::Distribution::new(vec![0.97, 0.03]).unwrap();
    let sequence = vec![1usize; 400];

    let default_params = CoderParams::default();
    let generous = CoderParams {
        safety_factor: 30.0,
        ..Default::default()
    };

    match encode(&sequence, &distribution, &default_params) {
        Err(CodecError::PrecisionExhausted { .. }) => {
            let encoded = encode(&sequence, &distribution, &generous).unwrap();
            let decoded = decode(encoded.value(), 400, &distribution, &generous).unwrap();
            assert_eq!(decoded, sequence);
        }
        Ok(encoded) => {
            let decoded =
                decode(encoded.value(), 400, &distribution, &default_params).unwrap();
            assert_eq!(decoded, sequence);
        }
        Err(other) => panic!("unexpected failure: {other}"),
    }
}
