#![no_main]
use libfuzzer_sys::fuzz_target;
use neurovol::NiftiHeader;

fuzz_target!(|data: &[u8]| {
    if let Ok(header) = NiftiHeader::from_bytes(data) {
        let _ = header.data_type();
        let _ = header.data_offset();
        let _ = header.transform();
        let _ = header.raw_header();
    }
});
