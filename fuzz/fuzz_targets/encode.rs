#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate ruhuff;

fuzz_target!(|data: &[u8]| {
    let compressed = ruhuff::compress(data);
    let decoded = ruhuff::decompress(&compressed).unwrap();
    assert_eq!(data, &decoded[..]);
    assert_eq!(compressed, ruhuff::compress(data));
});
