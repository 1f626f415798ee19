#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate ruhuff;

fuzz_target!(|data: &[u8]| {
    // errors are expected, panics are bugs
    if let Ok(decoded) = ruhuff::decompress(data) {
        let _ = ruhuff::compress(&decoded);
    }
});
