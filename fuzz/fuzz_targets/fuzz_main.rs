#![no_main]

use dirtree_core::{convert_tagged, ConvertConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = convert_tagged(input, &ConvertConfig::default());
    }
});
