#![no_main]
use libfuzzer_sys::fuzz_target;
use neurovol::{minc, HeaderModel};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(raw) = minc::read_header(text) {
            let _ = HeaderModel::normalize(raw);
        }
    }
});
