
#[cfg(test)]
fn random_data(seed: u64, len: usize, alphabet: u32) -> alloc::vec::Vec<u8> {
    use rand::{Rng, SeedableRng};

    let mut rng = rand::rngs::SmallRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            // squaring skews the distribution towards small symbols
            let x: u32 = rng.gen_range(0..alphabet);
            (x * x / alphabet) as u8
        })
        .collect()
}

#[cfg(test)]
fn assert_round_trip(data: &[u8]) {
    let compressed = crate::compress(data);
    let decompressed = crate::decompress(&compressed).unwrap();
    assert_eq!(decompressed.len(), data.len());
    assert!(decompressed == data, "round trip changed the data");
}

#[test]
fn round_trip_edge_cases() {
    assert_round_trip(&[]);
    assert_round_trip(b"a");
    assert_round_trip(b"aaaa");
    assert_round_trip(b"ab");
    assert_round_trip(b"abracadabra");
    assert_round_trip(&[0; 4096]);
    assert_round_trip(&[0xff, 0x00, 0xff]);
}

#[test]
fn round_trip_all_byte_values() {
    let data: alloc::vec::Vec<u8> = (0..=255u8).collect();
    assert_round_trip(&data);

    let mut reversed = data.clone();
    reversed.reverse();
    assert_round_trip(&reversed);
}

#[test]
fn round_trip_random() {
    for seed in 0..16 {
        assert_round_trip(&random_data(seed, 10_000, 256));
        assert_round_trip(&random_data(seed, 333, 16));
    }
}

#[test]
fn round_trip_fibonacci_weights() {
    // Fibonacci counts give the deepest possible tree for their total
    let mut data = alloc::vec::Vec::new();
    let (mut a, mut b) = (1usize, 1usize);
    for symbol in 0..20u8 {
        data.extend(core::iter::repeat(symbol).take(a));
        let next = a + b;
        a = b;
        b = next;
    }
    let tree = crate::CodeTree::build(&crate::FrequencyTable::build(&data));
    assert_eq!(tree.depth(), Some(19));
    assert_round_trip(&data);
}

#[test]
fn payload_is_optimal() {
    use crate::huffman::CodeBook;

    let data = random_data(7, 50_000, 256);
    let table = crate::FrequencyTable::build(&data);
    let book = CodeBook::derive(&crate::CodeTree::build(&table));
    let container_bytes = crate::compress(&data);
    let container = crate::Container::deserialize(&container_bytes).unwrap();
    assert_eq!(container.payload_bits(), book.encoded_bit_len(&table));
    // skewed data should compress
    assert!(container_bytes.len() < data.len());
}

#[test]
fn single_symbol_uses_one_bit_each() {
    let compressed = crate::compress(&[b'z'; 1000]);
    let container = crate::Container::deserialize(&compressed).unwrap();
    assert_eq!(container.payload_bits(), 1000);
    assert_eq!(container.payload().len(), 125);
}

#[test]
fn output_is_deterministic() {
    let data = random_data(3, 4096, 64);
    let first = crate::compress(&data);
    for _ in 0..4 {
        assert_eq!(crate::compress(&data), first);
    }
}

#[test]
fn truncation_is_detected() {
    let compressed = crate::compress(b"the quick brown fox jumps over the lazy dog");
    for len in 0..compressed.len() {
        assert!(
            crate::decompress(&compressed[..len]).is_err(),
            "{} of {} bytes decoded",
            len,
            compressed.len()
        );
    }
}

#[test]
fn appended_bytes_are_detected() {
    let mut compressed = crate::compress(b"no trailing garbage");
    compressed.push(0);
    assert!(matches!(
        crate::decompress(&compressed),
        Err(crate::DecompressError::ContainerError(
            crate::ContainerError::PayloadSizeMismatch { .. }
        ))
    ));
}

#[cfg(feature = "hash")]
#[test]
fn payload_bit_flips_are_detected() {
    let data = random_data(11, 1000, 32);
    let compressed = crate::compress(&data);
    let header_size = crate::Container::deserialize(&compressed)
        .unwrap()
        .header_size();
    for byte in header_size..compressed.len() {
        for bit in 0..8 {
            let mut corrupted = compressed.clone();
            corrupted[byte] ^= 1 << bit;
            // flipping padding bits is harmless, everything else must be caught
            if let Ok(decoded) = crate::decompress(&corrupted) {
                assert!(decoded == data, "corruption at {}:{} went unnoticed", byte, bit);
            }
        }
    }
}

#[test]
fn garbage_never_panics() {
    for seed in 0..64 {
        let garbage = random_data(seed, (seed as usize) * 7, 256);
        let _ = crate::decompress(&garbage);

        // keep a valid header so the payload checks get exercised too
        let mut forged = crate::compress(b"header stays intact");
        let header_size = crate::Container::deserialize(&forged).unwrap().header_size();
        for (byte, noise) in forged[header_size..].iter_mut().zip(garbage.iter()) {
            *byte ^= noise;
        }
        let _ = crate::decompress(&forged);
    }
}
