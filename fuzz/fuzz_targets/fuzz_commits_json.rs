#![no_main]

use commitsong_backend_midi::generate_midi;
use commitsong_spec::{Commit, GenerateConfig, Mode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(commits) = serde_json::from_slice::<Vec<Commit>>(data) else {
        return;
    };

    for mode in Mode::all() {
        let config = GenerateConfig::default().with_mode(*mode);
        match generate_midi(&commits, &config) {
            Ok(result) => assert_eq!(&result.data[0..4], b"MThd"),
            Err(_) => assert!(commits.is_empty()),
        }
    }
});
