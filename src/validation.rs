/// Cross-module validation.
///
/// These tests verify:
/// 1. **Round-trip correctness** of the adaptive coder across several reset
///    periods, with the default schedule
/// 2. **Determinism** - both sides of the adaptive coder build identical
///    trees at every rebuild point
/// 3. **Composition** - compress, protect, corrupt, repair, decompress
/// 4. **Correction bound** - Reed-Solomon repairs up to `ec / 2` errors and
///    never silently returns the original data past that
#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::adaptive::{self, AdaptiveModel, AdaptiveOptions};
    use crate::bitio::{BitInputStream, BitOutputStream};
    use crate::codec::{ReedSolomonCodec, CHUNK_BLOCK_LEN};
    use crate::frequency::FrequencyTable;
    use crate::huffman::{HuffmanDecoder, HuffmanEncoder};
    use crate::{CodecError, EOF_SYMBOL, RESET_PERIOD};

    // ---------------------------------------------------------------
    // Helper: generate test vectors
    // ---------------------------------------------------------------

    /// Deterministic pseudo-random bytes (xorshift32).
    fn data_noise(n: usize, seed: u32) -> Vec<u8> {
        let mut x = seed.max(1);
        (0..n)
            .map(|_| {
                x ^= x << 13;
                x ^= x >> 17;
                x ^= x << 5;
                x as u8
            })
            .collect()
    }

    /// Distribution that drifts: the active alphabet changes every `phase`
    /// bytes, so stale statistics hurt until the model resets.
    fn data_drifting(n: usize, phase: usize) -> Vec<u8> {
        (0..n)
            .map(|i| {
                let base = ((i / phase) * 40) as u8;
                base.wrapping_add((i % 13) as u8)
            })
            .collect()
    }

    fn data_text(n: usize) -> Vec<u8> {
        b"Reed-Solomon codes repair bytes; Huffman codes shrink them. "
            .iter()
            .copied()
            .cycle()
            .take(n)
            .collect()
    }

    // ---------------------------------------------------------------
    // Adaptive Huffman
    // ---------------------------------------------------------------

    #[test]
    fn test_round_trip_across_default_resets() {
        let n = 2 * RESET_PERIOD as usize + 12_345;
        let mut input = data_drifting(n, 100_000);
        input[RESET_PERIOD as usize - 1] = 0xFF;
        input[RESET_PERIOD as usize] = 0x00;
        let compressed = adaptive::encode(&input).unwrap();
        let decompressed = adaptive::decode(&compressed).unwrap();
        assert_eq!(decompressed.len(), input.len());
        assert!(decompressed == input, "round trip diverged");
    }

    #[test]
    fn test_round_trip_exact_period_lengths() {
        let options = AdaptiveOptions { reset_period: 64 };
        for n in [63usize, 64, 65, 127, 128, 129, 640] {
            let input = data_noise(n, n as u32);
            let mut compressed = Vec::new();
            adaptive::compress(&input[..], &mut compressed, &options).unwrap();
            let mut output = Vec::new();
            adaptive::decompress(&compressed[..], &mut output, &options).unwrap();
            assert_eq!(output, input, "length {}", n);
        }
    }

    #[test]
    fn test_mismatched_options_diverge() {
        let input = data_text(4000);
        let mut compressed = Vec::new();
        adaptive::compress(&input[..], &mut compressed, &AdaptiveOptions { reset_period: 32 })
            .unwrap();
        let mut output = Vec::new();
        let result =
            adaptive::decompress(&compressed[..], &mut output, &AdaptiveOptions::default());
        assert!(result.is_err() || output != input);
    }

    #[test]
    fn test_both_sides_build_identical_trees() {
        let options = AdaptiveOptions { reset_period: 1000 };
        let input = data_drifting(5000, 700);

        // Encoder side: record the tree installed at every rebuild.
        let mut model = AdaptiveModel::new(&options).unwrap();
        let mut encoder = HuffmanEncoder::new(BitOutputStream::new(Vec::new()));
        encoder.set_code_tree(model.code_tree().unwrap());
        let mut installed = vec![(0, encoder.code_tree().cloned())];
        for &b in &input {
            encoder.write(b as u32).unwrap();
            if let Some(tree) = model.update(b as u32).unwrap() {
                encoder.set_code_tree(tree);
                installed.push((model.count(), encoder.code_tree().cloned()));
            }
        }
        encoder.write(EOF_SYMBOL).unwrap();
        let compressed = encoder.finish().unwrap();

        // Decoder side: each rebuild must install the encoder's tree.
        let mut model = AdaptiveModel::new(&options).unwrap();
        let mut decoder = HuffmanDecoder::new(BitInputStream::new(&compressed[..]));
        decoder.set_code_tree(model.code_tree().unwrap());
        assert_eq!(decoder.code_tree(), installed[0].1.as_ref());
        let mut rebuilds = 0;
        let mut decoded = Vec::new();
        loop {
            let symbol = decoder.read().unwrap();
            if symbol == EOF_SYMBOL {
                break;
            }
            decoded.push(symbol as u8);
            if let Some(tree) = model.update(symbol).unwrap() {
                decoder.set_code_tree(tree);
                rebuilds += 1;
                let (count, expected) = &installed[rebuilds];
                assert_eq!(model.count(), *count);
                assert_eq!(decoder.code_tree(), expected.as_ref(), "tree at count {}", count);
            }
        }
        assert_eq!(rebuilds + 1, installed.len());
        assert_eq!(decoded, input);

        let points: Vec<u64> = installed.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            points,
            vec![0, 1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1000, 2000, 3000, 4000, 5000]
        );
        // The boundary tree reflects the drifted statistics, not the reset.
        assert_ne!(installed[0].1, installed[11].1);
    }

    #[test]
    fn test_compression_is_deterministic() {
        let input = data_noise(20_000, 7);
        assert_eq!(adaptive::encode(&input).unwrap(), adaptive::encode(&input).unwrap());
    }

    #[test]
    fn test_tie_break_is_stable() {
        // All counts equal: codes depend only on the symbol order.
        let a = FrequencyTable::uniform(257).unwrap().build_code_tree().unwrap();
        let b = FrequencyTable::from_counts(vec![5; 257])
            .unwrap()
            .build_code_tree()
            .unwrap();
        assert_eq!(a, b);
        for s in 0..257 {
            let len = a.get_code(s).unwrap().len();
            assert!(len == 8 || len == 9, "symbol {} has {} bits", s, len);
        }
    }

    // ---------------------------------------------------------------
    // Composition
    // ---------------------------------------------------------------

    #[test]
    fn test_compress_protect_corrupt_recover() {
        let input = data_text(10_000);
        let compressed = adaptive::encode(&input).unwrap();
        let mut codec = ReedSolomonCodec::new();
        let mut protected = codec.encode_chunked(&compressed, 16).unwrap();

        // Up to 8 corrupted bytes per block, byte 0 of every block included.
        for (i, block) in protected.chunks_mut(CHUNK_BLOCK_LEN).enumerate() {
            let n = block.len();
            block[0] ^= 0xC3;
            for k in 1..8usize {
                let pos = 1 + (k * 31 + i * 7) % (n - 1);
                block[pos] ^= 0x5A ^ k as u8;
            }
        }

        let repaired = codec.decode_chunked(&protected, 16).unwrap();
        assert_eq!(repaired, compressed);
        assert_eq!(adaptive::decode(&repaired).unwrap(), input);
    }

    #[test]
    fn test_ten_byte_block_scenario() {
        let mut codec = ReedSolomonCodec::new();
        let data: Vec<u8> = (0x01..=0x0A).collect();
        let encoded = codec.encode(&data, 4).unwrap();
        let mut corrupted = encoded.clone();
        corrupted[3] = 0x00;
        corrupted[12] ^= 0xC3;
        assert_eq!(codec.decode(&corrupted, 4).unwrap(), data);
    }

    // ---------------------------------------------------------------
    // Properties
    // ---------------------------------------------------------------

    fn block_strategy() -> impl Strategy<Value = (Vec<u8>, usize)> {
        (1usize..=64).prop_flat_map(|ec| {
            (prop::collection::vec(any::<u8>(), 1..=(255 - ec)), Just(ec))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_adaptive_round_trip(input in prop::collection::vec(any::<u8>(), 0..3000)) {
            let compressed = adaptive::encode(&input).unwrap();
            prop_assert_eq!(adaptive::decode(&compressed).unwrap(), input);
        }

        #[test]
        fn prop_adaptive_round_trip_short_period(
            input in prop::collection::vec(0u8..8, 0..2000),
            period in 1u64..100,
        ) {
            let options = AdaptiveOptions { reset_period: period };
            let mut compressed = Vec::new();
            adaptive::compress(&input[..], &mut compressed, &options).unwrap();
            let mut output = Vec::new();
            adaptive::decompress(&compressed[..], &mut output, &options).unwrap();
            prop_assert_eq!(output, input);
        }

        #[test]
        fn prop_rs_identity((data, ec) in block_strategy()) {
            let mut codec = ReedSolomonCodec::new();
            let encoded = codec.encode(&data, ec).unwrap();
            prop_assert_eq!(encoded.len(), data.len() + ec);
            prop_assert_eq!(codec.decode(&encoded, ec).unwrap(), data);
        }

        #[test]
        fn prop_rs_corrects_up_to_half_parity(
            (data, ec) in block_strategy(),
            errors in prop::collection::vec((any::<prop::sample::Index>(), 1u8..=255), 0..32),
        ) {
            let mut codec = ReedSolomonCodec::new();
            let encoded = codec.encode(&data, ec).unwrap();
            let mut corrupted = encoded.clone();
            let mut hit = Vec::new();
            for (index, delta) in errors {
                if hit.len() == ec / 2 {
                    break;
                }
                let pos = index.index(encoded.len());
                if !hit.contains(&pos) {
                    hit.push(pos);
                    corrupted[pos] ^= delta;
                }
            }
            prop_assert_eq!(codec.decode(&corrupted, ec).unwrap(), data);
        }

        #[test]
        fn prop_rs_over_capacity_fails_or_differs(
            data in prop::collection::vec(any::<u8>(), 4..40),
            seed in 1u32..u32::MAX,
        ) {
            let mut codec = ReedSolomonCodec::new();
            let encoded = codec.encode(&data, 4).unwrap();
            let mut corrupted = encoded.clone();
            let noise = data_noise(3, seed);
            let n = encoded.len();
            let s = seed as usize;
            let positions = [s % n, (s / 7 + 1) % n, (s / 49 + 2) % n];
            let mut flipped = 0;
            for (k, &pos) in positions.iter().enumerate() {
                if corrupted[pos] == encoded[pos] {
                    corrupted[pos] ^= noise[k] | 1;
                    flipped += 1;
                }
            }
            prop_assume!(flipped == 3);
            match codec.decode(&corrupted, 4) {
                Ok(decoded) => prop_assert_ne!(decoded, data),
                Err(e) => prop_assert!(matches!(e, CodecError::Uncorrectable(_))),
            }
        }
    }
}
