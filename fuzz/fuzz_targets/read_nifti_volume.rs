#![no_main]
use libfuzzer_sys::fuzz_target;
use neurovol::{nifti, ReaderOptions, Space};

fuzz_target!(|data: &[u8]| {
    if let Ok(volume) = nifti::read_volume(data, &ReaderOptions::default()) {
        for axis in Space::ALL.iter() {
            let _ = volume.slice(*axis, Some(0), None);
        }
        let _ = volume.get_world_coords();
    }
});
